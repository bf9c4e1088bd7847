// Copyright (C) 2009 The Libphonenumber Authors
// Copyright (C) 2025 The Kashin Vladislav (Rust adaptation author)
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

use std::collections::HashMap;

use regex::Regex;

use crate::{
    phonenumberutil::{
        helper_constants::{
            CAPTURE_UP_TO_SECOND_NUMBER_START, DIGITS, MIN_LENGTH_FOR_NSN, PLUS_CHARS,
            VALID_ALPHA, VALID_PUNCTUATION,
        },
        helper_functions::create_extn_pattern,
    },
    regexp_cache::RegexCache,
};

#[allow(unused)]
pub(super) struct PhoneNumberRegExpsAndMappings {
    /// Regular expression of viable phone numbers. This is location
    /// independent. Checks we have at least three leading digits, and only
    /// valid punctuation, alpha characters and digits in the phone number.
    /// Does not include extension data. The symbol 'x' is allowed here as
    /// valid punctuation since it is often used as a placeholder for carrier
    /// codes, for example in Brazilian phone numbers. We also allow multiple
    /// plus-signs at the start.
    ///
    /// Corresponds to the following:
    /// `plus_sign*([punctuation]*[digits]){3,}([punctuation]|[digits]|[alpha])*`
    valid_phone_number: String,

    /// Regexp of all possible ways to write extensions, for use when
    /// parsing. This will be run as a case-insensitive regexp match. Wide
    /// character versions are also provided after each ASCII version.
    /// For parsing, we are slightly more lenient in our interpretation than
    /// for matching. Here we allow "comma" and "semicolon" as possible
    /// extension indicators. When matching, these are hardly ever used to
    /// indicate this.
    extn_patterns_for_parsing: String,

    /// Regexp of all possible ways to write extensions, for use when finding
    /// phone numbers in text. Wide character versions are also provided
    /// after each ASCII version.
    pub extn_patterns_for_matching: String,

    pub regexp_cache: RegexCache,

    /// These mappings map a character (key) to a specific digit that should
    /// replace it for normalization purposes. It covers both the E.161
    /// keypad letters and the ASCII digits themselves.
    pub alpha_phone_mappings: HashMap<char, char>,

    /// Regular expression of a single decimal digit, capturing it.
    pub capturing_digit_pattern: Regex,

    /// Regular expression of acceptable characters that may start a phone
    /// number for the purposes of parsing. This allows us to strip away
    /// meaningless prefixes to phone numbers that may be mistakenly given to
    /// us. This consists of digits and the plus symbol. It does not contain
    /// alpha characters, although they may be used later in the number. It
    /// also does not include other punctuation, as this will be stripped
    /// later during parsing and is of no information value when parsing a
    /// number.
    pub valid_start_char_pattern: Regex,

    /// Regular expression of valid characters before a marker that might
    /// indicate a second number.
    pub capture_up_to_second_number_start_pattern: Regex,

    /// Regular expression of trailing characters that we want to remove. We
    /// remove all characters that are not alpha or numerical characters. The
    /// hash character is retained here, as it may signify the previous block
    /// was an extension.
    pub unwanted_end_char_pattern: Regex,

    /// Regular expression of groups of valid punctuation characters.
    pub separator_pattern: Regex,

    /// Regexp of all known extension prefixes used by different regions
    /// followed by 1 or more valid digits, for use when parsing. Anchored to
    /// the end of the input.
    pub extn_pattern: Regex,

    /// We append optionally the extension pattern to the end here, as a
    /// valid phone number may have an extension prefix appended, followed by
    /// 1 or more digits.
    pub valid_phone_number_pattern: Regex,

    /// We use this pattern to check if the phone number has at least three
    /// letters in it - if so, then we treat it as a number where some
    /// phone-number digits are represented by letters.
    pub valid_alpha_phone_pattern: Regex,

    /// The first_group_capturing_pattern was originally set to $1 but there
    /// are some countries for which the first group is not used in the
    /// national pattern (e.g. Argentina) so the $1 group does not match
    /// correctly. Therefore, we use \d, so that the first group actually
    /// used in the pattern will be matched.
    pub first_group_capturing_pattern: Regex,

    pub carrier_code_pattern: Regex,

    pub plus_chars_pattern: Regex,
}

impl PhoneNumberRegExpsAndMappings {
    fn initialize_mappings(&mut self) {
        // Simple ASCII digits map used to populate alpha_phone_mappings.
        let mut ascii_digit_mappings = HashMap::with_capacity(10);
        for d in '0'..='9' {
            ascii_digit_mappings.insert(d, d);
        }

        // The ITU E.161 keypad mapping. Only uppercase letters are listed;
        // lookups fold case (and full-width forms) before consulting the map.
        let mut alpha_map = HashMap::with_capacity(40);
        alpha_map.insert('A', '2');
        alpha_map.insert('B', '2');
        alpha_map.insert('C', '2');
        alpha_map.insert('D', '3');
        alpha_map.insert('E', '3');
        alpha_map.insert('F', '3');
        alpha_map.insert('G', '4');
        alpha_map.insert('H', '4');
        alpha_map.insert('I', '4');
        alpha_map.insert('J', '5');
        alpha_map.insert('K', '5');
        alpha_map.insert('L', '5');
        alpha_map.insert('M', '6');
        alpha_map.insert('N', '6');
        alpha_map.insert('O', '6');
        alpha_map.insert('P', '7');
        alpha_map.insert('Q', '7');
        alpha_map.insert('R', '7');
        alpha_map.insert('S', '7');
        alpha_map.insert('T', '8');
        alpha_map.insert('U', '8');
        alpha_map.insert('V', '8');
        alpha_map.insert('W', '9');
        alpha_map.insert('X', '9');
        alpha_map.insert('Y', '9');
        alpha_map.insert('Z', '9');

        let mut combined_map = HashMap::with_capacity(40);
        combined_map.extend(alpha_map.iter());
        combined_map.extend(ascii_digit_mappings.iter());
        self.alpha_phone_mappings = combined_map;
    }

    pub fn new() -> Self {
        // It'll be initialized only once, so we can use slow format!
        let extn_patterns_for_parsing = create_extn_pattern(true);
        let valid_phone_number = format!(
            "[{}]*(?:[{}]*{}){{{},}}[{}{}{}]*",
            PLUS_CHARS,
            VALID_PUNCTUATION,
            DIGITS,
            MIN_LENGTH_FOR_NSN,
            VALID_PUNCTUATION,
            VALID_ALPHA,
            DIGITS,
        );

        let mut instance = Self {
            valid_phone_number: valid_phone_number.clone(),
            extn_patterns_for_parsing: extn_patterns_for_parsing.clone(),
            extn_patterns_for_matching: create_extn_pattern(false),
            regexp_cache: RegexCache::with_capacity(128),
            alpha_phone_mappings: Default::default(),
            capturing_digit_pattern: Regex::new(&format!("([{}])", DIGITS)).unwrap(),
            valid_start_char_pattern: Regex::new(&format!("[{}{}]", PLUS_CHARS, DIGITS)).unwrap(),
            capture_up_to_second_number_start_pattern: Regex::new(
                CAPTURE_UP_TO_SECOND_NUMBER_START,
            )
            .unwrap(),
            unwanted_end_char_pattern: Regex::new("[^\\p{N}\\p{L}#]").unwrap(),
            separator_pattern: Regex::new(&format!("[{}]+", VALID_PUNCTUATION)).unwrap(),
            extn_pattern: Regex::new(&format!("(?i)(?:{})$", &extn_patterns_for_parsing)).unwrap(),
            valid_phone_number_pattern: Regex::new(&format!(
                "(?i)^(?:{})(?:{})?$",
                &valid_phone_number, &extn_patterns_for_parsing
            ))
            .unwrap(),
            valid_alpha_phone_pattern: Regex::new("(?:.*?[A-Za-z]){3}.*").unwrap(),
            first_group_capturing_pattern: Regex::new("(\\$\\d)").unwrap(),
            carrier_code_pattern: Regex::new("\\$CC").unwrap(),
            plus_chars_pattern: Regex::new(&format!("[{}]+", PLUS_CHARS)).unwrap(),
        };
        instance.initialize_mappings();
        instance
    }
}
