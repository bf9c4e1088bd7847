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

use serde::{Deserialize, Serialize};

/// Records how the country calling code of a parsed number was discovered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountryCodeSource {
    /// The number began with a plus sign (or its full-width variant).
    FromNumberWithPlusSign,
    /// The number began with an international direct dialling prefix of the
    /// default region, e.g. "011" in the USA.
    FromNumberWithIdd,
    /// The number carried the country calling code without any prefix; this
    /// happens for inputs like "1 650 253 0000" parsed with "US" as the
    /// default region.
    FromNumberWithoutPlusSign,
    /// The calling code was taken from the default region supplied by the
    /// caller.
    #[default]
    FromDefaultCountry,
}

/// The neutral carrier of a parsed phone number.
///
/// Two instances are equal iff every attribute matches; in particular the
/// Italian leading zero is part of the identity, so +39 0236618300 and a
/// hypothetical +39 236618300 never compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber {
    country_code: i32,
    national_number: u64,
    italian_leading_zero: bool,
    extension: Option<String>,
    country_code_source: CountryCodeSource,
    preferred_domestic_carrier_code: Option<String>,
}

impl PhoneNumber {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn country_code(&self) -> i32 {
        self.country_code
    }

    pub fn set_country_code(&mut self, country_code: i32) {
        self.country_code = country_code;
    }

    pub fn national_number(&self) -> u64 {
        self.national_number
    }

    pub fn set_national_number(&mut self, national_number: u64) {
        self.national_number = national_number;
    }

    /// When true a single literal `0` prefixes the decimal rendering of the
    /// national number to form the national significant number.
    pub fn italian_leading_zero(&self) -> bool {
        self.italian_leading_zero
    }

    pub fn set_italian_leading_zero(&mut self, italian_leading_zero: bool) {
        self.italian_leading_zero = italian_leading_zero;
    }

    pub fn has_extension(&self) -> bool {
        self.extension.is_some()
    }

    pub fn extension(&self) -> &str {
        self.extension.as_deref().unwrap_or("")
    }

    pub fn set_extension(&mut self, extension: String) {
        self.extension = Some(extension);
    }

    pub fn clear_extension(&mut self) {
        self.extension = None;
    }

    pub fn country_code_source(&self) -> CountryCodeSource {
        self.country_code_source
    }

    pub fn set_country_code_source(&mut self, country_code_source: CountryCodeSource) {
        self.country_code_source = country_code_source;
    }

    pub fn has_preferred_domestic_carrier_code(&self) -> bool {
        self.preferred_domestic_carrier_code.is_some()
    }

    pub fn preferred_domestic_carrier_code(&self) -> &str {
        self.preferred_domestic_carrier_code.as_deref().unwrap_or("")
    }

    pub fn set_preferred_domestic_carrier_code(&mut self, carrier_code: String) {
        self.preferred_domestic_carrier_code = Some(carrier_code);
    }

    pub fn clear(&mut self) {
        *self = Default::default();
    }
}
