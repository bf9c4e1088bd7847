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

fn is_false(b: &bool) -> bool {
    !*b
}

/// The rules for numbers of a single semantic category within a region.
///
/// The sentinel pattern string "NA" in a materialized record means no numbers
/// of this type exist for the region; the store converts it to an absent
/// pattern before the record reaches the matcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneNumberDesc {
    /// Anchored regex matched against the full national significant number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_number_pattern: Option<String>,
    /// Anchored length-class sieve, cheaper than the full pattern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub possible_number_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_number: Option<String>,
}

impl PhoneNumberDesc {
    pub fn has_national_number_pattern(&self) -> bool {
        self.national_number_pattern.is_some()
    }

    pub fn national_number_pattern(&self) -> &str {
        self.national_number_pattern.as_deref().unwrap_or("")
    }

    pub fn has_possible_number_pattern(&self) -> bool {
        self.possible_number_pattern.is_some()
    }

    pub fn possible_number_pattern(&self) -> &str {
        self.possible_number_pattern.as_deref().unwrap_or("")
    }

    pub fn has_example_number(&self) -> bool {
        self.example_number.is_some()
    }

    pub fn example_number(&self) -> &str {
        self.example_number.as_deref().unwrap_or("")
    }
}

/// A single formatting rule. `pattern` captures groups out of the national
/// significant number and `format` rebuilds them with `$1..$N` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    pub pattern: String,
    pub format: String,
    /// Prefix alternatives deciding whether this rule applies; evaluated in
    /// their declared order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub leading_digits_pattern: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_prefix_formatting_rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domestic_carrier_code_formatting_rule: Option<String>,
}

impl NumberFormat {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn national_prefix_formatting_rule(&self) -> &str {
        self.national_prefix_formatting_rule.as_deref().unwrap_or("")
    }

    pub fn domestic_carrier_code_formatting_rule(&self) -> &str {
        self.domestic_carrier_code_formatting_rule
            .as_deref()
            .unwrap_or("")
    }
}

/// The materialized rules of one region, or of one non-geographical calling
/// code (id "001").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneMetadata {
    pub id: String,
    pub country_code: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub international_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_international_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_extn_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_prefix_for_parsing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_prefix_transform_rule: Option<String>,
    /// Prefix pattern disambiguating this region from others sharing its
    /// calling code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leading_digits: Option<String>,

    #[serde(skip_serializing_if = "is_false")]
    pub main_country_for_code: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub leading_zero_possible: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub same_mobile_and_fixed_line_pattern: bool,

    pub general_desc: PhoneNumberDesc,
    pub fixed_line: PhoneNumberDesc,
    pub mobile: PhoneNumberDesc,
    pub toll_free: PhoneNumberDesc,
    pub premium_rate: PhoneNumberDesc,
    pub shared_cost: PhoneNumberDesc,
    pub voip: PhoneNumberDesc,
    pub personal_number: PhoneNumberDesc,
    pub pager: PhoneNumberDesc,
    pub uan: PhoneNumberDesc,
    pub voicemail: PhoneNumberDesc,
    pub emergency: PhoneNumberDesc,
    pub short_code: PhoneNumberDesc,
    pub standard_rate: PhoneNumberDesc,
    pub no_international_dialling: PhoneNumberDesc,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub number_format: Vec<NumberFormat>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub intl_number_format: Vec<NumberFormat>,
}

impl PhoneMetadata {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn country_code(&self) -> i32 {
        self.country_code
    }

    pub fn has_international_prefix(&self) -> bool {
        self.international_prefix.is_some()
    }

    pub fn international_prefix(&self) -> &str {
        self.international_prefix.as_deref().unwrap_or("")
    }

    pub fn has_national_prefix(&self) -> bool {
        self.national_prefix.is_some()
    }

    pub fn national_prefix(&self) -> &str {
        self.national_prefix.as_deref().unwrap_or("")
    }

    pub fn has_preferred_extn_prefix(&self) -> bool {
        self.preferred_extn_prefix.is_some()
    }

    pub fn preferred_extn_prefix(&self) -> &str {
        self.preferred_extn_prefix.as_deref().unwrap_or("")
    }

    pub fn has_national_prefix_for_parsing(&self) -> bool {
        self.national_prefix_for_parsing.is_some()
    }

    pub fn national_prefix_for_parsing(&self) -> &str {
        self.national_prefix_for_parsing.as_deref().unwrap_or("")
    }

    pub fn national_prefix_transform_rule(&self) -> &str {
        self.national_prefix_transform_rule.as_deref().unwrap_or("")
    }

    pub fn has_leading_digits(&self) -> bool {
        self.leading_digits.is_some()
    }

    pub fn leading_digits(&self) -> &str {
        self.leading_digits.as_deref().unwrap_or("")
    }

    pub fn main_country_for_code(&self) -> bool {
        self.main_country_for_code
    }

    pub fn same_mobile_and_fixed_line_pattern(&self) -> bool {
        self.same_mobile_and_fixed_line_pattern
    }

    pub(crate) fn descs_mut(&mut self) -> [&mut PhoneNumberDesc; 15] {
        [
            &mut self.general_desc,
            &mut self.fixed_line,
            &mut self.mobile,
            &mut self.toll_free,
            &mut self.premium_rate,
            &mut self.shared_cost,
            &mut self.voip,
            &mut self.personal_number,
            &mut self.pager,
            &mut self.uan,
            &mut self.voicemail,
            &mut self.emergency,
            &mut self.short_code,
            &mut self.standard_rate,
            &mut self.no_international_dialling,
        ]
    }
}
