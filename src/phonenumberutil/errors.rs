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

use thiserror::Error;

/// The reasons `parse` can reject an input string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ParseError {
    /// The country calling code of the number could not be established,
    /// either from the number itself or from the supplied default region.
    #[error("Invalid country calling code")]
    InvalidCountryCode,
    /// The input does not have the shape of a phone number at all.
    #[error("The string supplied did not seem to be a phone number")]
    NotANumber,
    /// An international direct dialling prefix was recognized, but too few
    /// digits followed it.
    #[error("The string is too short after the international dialling prefix")]
    TooShortAfterIdd,
    /// The national significant number is shorter than any phone number can
    /// be.
    #[error("The string is too short to be a national significant number")]
    TooShortNsn,
    /// The national significant number is longer than any phone number can
    /// be.
    #[error("The string is too long to be a national significant number")]
    TooLongNsn,
}

// The possibility check splits the ValidationResult of the original into an
// Ok unit and this error enum so callers get a plain Result.

/// The failing outcomes when testing whether a phone number is possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ValidationError {
    /// The number has an invalid country calling code.
    #[error("The number has an invalid country calling code")]
    InvalidCountryCode,
    /// The number is shorter than all valid numbers for this region.
    #[error("The number is shorter than all valid numbers for this region")]
    TooShort,
    /// The number is longer than all valid numbers for this region.
    #[error("The number is longer than all valid numbers for this region")]
    TooLong,
}
