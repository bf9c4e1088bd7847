// Copyright (C) 2009 The Libphonenumber Authors
// Copyright (C) 2025 Kashin Vladislav (Rust adaptation author)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use strum::EnumIter;

/// Defines the various standardized formats for representing phone numbers.
///
/// `International` and `National` formats align with the ITU-T E.123
/// recommendation, but use local conventions like hyphens (-) instead of
/// spaces for separators.
///
/// For example, the Google Switzerland office number would be:
/// - **INTERNATIONAL**: `+41 44 668 1800`
/// - **NATIONAL**: `044 668 1800`
/// - **E164**: `+41446681800` (international format without formatting)
/// - **RFC3966**: `tel:+41-44-668-1800` (hyphen-separated with a "tel:" prefix)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhoneNumberFormat {
    /// Standardized international format with no spaces or symbols, always
    /// starting with a `+` followed by the country code. Example:
    /// `+41446681800`.
    E164,
    /// Includes the country code and is formatted with spaces for
    /// readability, as recommended for international display. Example:
    /// `+41 44 668 1800`.
    International,
    /// The format used for dialing within the number's own country. It may
    /// include a national prefix (like '0') and uses local formatting
    /// conventions. Example: `044 668 1800`.
    National,
    /// A technical format used in contexts like web links. It starts with
    /// "tel:", uses hyphens as separators, and can include extensions.
    /// Example: `tel:+41-44-668-1800`.
    RFC3966,
}

/// Categorizes phone numbers based on their primary use.
#[derive(Debug, EnumIter, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhoneNumberType {
    /// Traditional landline numbers tied to a specific geographic location.
    FixedLine,
    /// Numbers assigned to wireless devices like mobile phones.
    Mobile,
    /// Used in regions (e.g. the USA) where it's impossible to distinguish
    /// between fixed-line and mobile numbers by looking at the phone number
    /// itself.
    FixedLineOrMobile,
    /// Calls to these numbers are free for the caller, with the cost being
    /// paid by the recipient. Examples include "800" numbers in the US.
    TollFree,
    /// Numbers charging a higher rate than normal calls, often used for
    /// services like horoscopes or tech support.
    PremiumRate,
    /// The cost of the call is split between the caller and the recipient.
    SharedCost,
    /// Numbers used for services that transmit voice calls over the internet.
    VoIP,
    /// A number associated with a person rather than a location or device;
    /// it can be routed to different destinations as configured by the user.
    PersonalNumber,
    /// Numbers used for sending messages to paging devices.
    Pager,
    /// Universal Access Numbers: a single number a company uses to route
    /// calls to different offices or departments.
    UAN,
    /// Numbers used to directly access a voicemail service.
    VoiceMail,
    /// The number does not match any of the known patterns for its region
    /// and its type cannot be determined.
    Unknown,
}

/// Describes the degree of similarity between two phone numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    /// At least one of the compared inputs could not be parsed as a phone
    /// number at all.
    NotANumber,
    /// The two numbers are entirely different.
    NoMatch,
    /// One number is a shorter version of the other's national significant
    /// number, or the numbers differ only in an Italian leading zero or an
    /// extension. For example, `2530000` is a short match for `6502530000`.
    ShortNsnMatch,
    /// The numbers share the same NSN but one of them carries no country
    /// code. For example, `044 668 1800` and `+41 44 668 1800` are an NSN
    /// match.
    NsnMatch,
    /// The two numbers are identical in every aspect, including country
    /// code, NSN, and any specified extension.
    ExactMatch,
}
