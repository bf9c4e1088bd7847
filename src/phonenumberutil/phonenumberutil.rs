use std::{borrow::Cow, collections::HashSet, path::PathBuf, sync::Arc};

use log::{error, trace, warn};

use super::phone_number_regexps_and_mappings::PhoneNumberRegExpsAndMappings;
use crate::{
    generated::COUNTRY_CODE_TO_REGION_CODE,
    i18n,
    interfaces::MatcherApi,
    macros::owned_from_cow_or,
    metadata::{FileMetadataStore, NumberFormat, PhoneMetadata, PhoneNumberDesc},
    phonenumber::{CountryCodeSource, PhoneNumber},
    phonenumberutil::{
        errors::{ParseError, ValidationError},
        helper_constants::{
            DEFAULT_EXTN_PREFIX, MAX_LENGTH_COUNTRY_CODE, MAX_LENGTH_FOR_NSN, MIN_LENGTH_FOR_NSN,
            NANPA_COUNTRY_CODE, REGION_CODE_FOR_NON_GEO_ENTITY, RFC3966_EXTN_PREFIX,
        },
        helper_functions::{
            self, get_number_desc_by_type, get_supported_types_for_metadata,
            is_national_number_suffix_of_the_other, prefix_number_with_country_calling_code,
        },
        MatchType, PhoneNumberFormat, PhoneNumberType,
    },
    regex_based_matcher::RegexBasedMatcher,
    regex_util::{RegexConsume, RegexFullMatch, RegexMatchStart},
};

/// The order in which the classifier tests the unambiguous categories.
/// Fixed-line and mobile need the shared-pattern logic and are handled after
/// this ladder is exhausted.
const CLASSIFICATION_ORDER: [PhoneNumberType; 8] = [
    PhoneNumberType::PremiumRate,
    PhoneNumberType::TollFree,
    PhoneNumberType::SharedCost,
    PhoneNumberType::VoIP,
    PhoneNumberType::PersonalNumber,
    PhoneNumberType::Pager,
    PhoneNumberType::UAN,
    PhoneNumberType::VoiceMail,
];

pub struct PhoneNumberUtil {
    /// An API for validation checking.
    matcher_api: Box<dyn MatcherApi + Send + Sync>,

    /// Helper class holding useful regular expressions and character
    /// mappings.
    reg_exps: PhoneNumberRegExpsAndMappings,

    /// The lazy store of materialized per-region metadata records.
    metadata_store: FileMetadataStore,

    /// A mapping from a country calling code to the region codes which
    /// denote the regions represented by that country calling code. Note
    /// regions under NANPA share the country calling code 1 and Russia and
    /// Kazakhstan share the country calling code 7. The list order encodes
    /// priority: the first entry is the main region for the code. This is
    /// a sorted vector to achieve better performance.
    country_calling_code_to_region_code_map: &'static [(i32, &'static [&'static str])],

    /// The set of regions the country-code index knows about. Lookups of
    /// anything else never touch the metadata store.
    supported_regions: HashSet<&'static str>,

    /// The set of regions that share country calling code 1.
    nanpa_regions: HashSet<&'static str>,
}

impl PhoneNumberUtil {
    /// Creates an instance observing metadata record files addressed by the
    /// given path prefix, e.g. a prefix of `/data/PhoneNumberMetadata` makes
    /// the United States record live in `/data/PhoneNumberMetadata_US.json`.
    pub fn new<P: Into<PathBuf>>(metadata_file_prefix: P) -> Self {
        let mut supported_regions = HashSet::new();
        let mut nanpa_regions = HashSet::new();
        for (country_calling_code, region_codes) in COUNTRY_CODE_TO_REGION_CODE {
            for region_code in *region_codes {
                if REGION_CODE_FOR_NON_GEO_ENTITY != *region_code {
                    supported_regions.insert(*region_code);
                }
                if *country_calling_code == NANPA_COUNTRY_CODE {
                    nanpa_regions.insert(*region_code);
                }
            }
        }
        Self {
            matcher_api: Box::new(RegexBasedMatcher::new()),
            reg_exps: PhoneNumberRegExpsAndMappings::new(),
            metadata_store: FileMetadataStore::new(metadata_file_prefix),
            country_calling_code_to_region_code_map: COUNTRY_CODE_TO_REGION_CODE,
            supported_regions,
            nanpa_regions,
        }
    }

    pub fn get_supported_regions(&self) -> impl Iterator<Item = &str> {
        self.supported_regions.iter().copied()
    }

    pub fn get_supported_calling_codes(&self) -> impl Iterator<Item = i32> + '_ {
        self.country_calling_code_to_region_code_map
            .iter()
            .map(|(code, _)| *code)
    }

    pub fn get_supported_global_network_calling_codes(&self) -> impl Iterator<Item = i32> + '_ {
        self.country_calling_code_to_region_code_map
            .iter()
            .filter(|(_, region_codes)| region_codes.first() == Some(&REGION_CODE_FOR_NON_GEO_ENTITY))
            .map(|(code, _)| *code)
    }

    pub fn is_supported_region(&self, region_code: &str) -> bool {
        self.supported_regions.contains(region_code)
    }

    /// Returns true if the region shares the NANPA country calling code 1.
    pub fn is_nanpa_country(&self, region_code: &str) -> bool {
        self.nanpa_regions.contains(region_code)
    }

    /// Returns the materialized metadata of a geographical region, loading
    /// it on first reference. Unsupported regions resolve to `None` without
    /// touching the filesystem.
    pub fn get_metadata_for_region(&self, region_code: &str) -> Option<Arc<PhoneMetadata>> {
        if !self.supported_regions.contains(region_code) {
            return None;
        }
        self.metadata_store.metadata_for_key(region_code)
    }

    /// Returns the materialized metadata of a non-geographical entity, e.g.
    /// 800 (International Toll Free Service) or 808 (International Shared
    /// Cost Service).
    pub fn get_metadata_for_non_geographical_region(
        &self,
        country_calling_code: i32,
    ) -> Option<Arc<PhoneMetadata>> {
        if self.get_region_code_for_country_code(country_calling_code)
            != REGION_CODE_FOR_NON_GEO_ENTITY
        {
            return None;
        }
        let mut buf = itoa::Buffer::new();
        self.metadata_store
            .metadata_for_key(buf.format(country_calling_code))
    }

    fn get_metadata_for_region_or_calling_code(
        &self,
        country_calling_code: i32,
        region_code: &str,
    ) -> Option<Arc<PhoneMetadata>> {
        if REGION_CODE_FOR_NON_GEO_ENTITY == region_code {
            self.get_metadata_for_non_geographical_region(country_calling_code)
        } else {
            self.get_metadata_for_region(region_code)
        }
    }

    /// Returns the country calling code a valid region's metadata declares,
    /// or `None` when the region is unknown or its metadata cannot be
    /// materialized.
    pub fn get_country_code_for_region(&self, region_code: &str) -> Option<i32> {
        let metadata = self.get_metadata_for_region(region_code)?;
        Some(metadata.country_code())
    }

    /// Returns the region code that matches the specific country calling
    /// code. In the case of no region code being found, the unknown region
    /// code will be returned.
    pub fn get_region_code_for_country_code(&self, country_calling_code: i32) -> &'static str {
        self.get_region_codes_for_country_calling_code(country_calling_code)
            .and_then(|region_codes| region_codes.first())
            .copied()
            .unwrap_or(i18n::RegionCode::get_unknown())
    }

    /// Returns the region codes that match the specific country calling
    /// code, main region first.
    pub fn get_region_codes_for_country_calling_code(
        &self,
        country_calling_code: i32,
    ) -> Option<&'static [&'static str]> {
        self.country_calling_code_to_region_code_map
            .binary_search_by_key(&country_calling_code, |(code, _)| *code)
            .ok()
            .map(|index| self.country_calling_code_to_region_code_map[index].1)
    }

    fn has_valid_country_calling_code(&self, country_calling_code: i32) -> bool {
        self.country_calling_code_to_region_code_map
            .binary_search_by_key(&country_calling_code, |(code, _)| *code)
            .is_ok()
    }

    pub fn get_supported_types_for_region(
        &self,
        region_code: &str,
    ) -> Option<HashSet<PhoneNumberType>> {
        match self.get_metadata_for_region(region_code) {
            Some(metadata) => Some(get_supported_types_for_metadata(&metadata)),
            None => {
                warn!("Invalid or unknown region code provided: {}", region_code);
                None
            }
        }
    }

    pub fn get_supported_types_for_non_geo_entity(
        &self,
        country_calling_code: i32,
    ) -> Option<HashSet<PhoneNumberType>> {
        match self.get_metadata_for_non_geographical_region(country_calling_code) {
            Some(metadata) => Some(get_supported_types_for_metadata(&metadata)),
            None => {
                warn!(
                    "Unknown country calling code for a non-geographical entity provided: {}",
                    country_calling_code
                );
                None
            }
        }
    }

    /// Returns the national dialling prefix of a region, e.g. "0" for the
    /// United Kingdom. Some prefixes contain "~" to signal waiting for a
    /// tone; `strip_non_digits` removes it.
    pub fn get_ndd_prefix_for_region(
        &self,
        region_code: &str,
        strip_non_digits: bool,
    ) -> Option<String> {
        let Some(metadata) = self.get_metadata_for_region(region_code) else {
            warn!("Invalid or unknown region code ({}) provided.", region_code);
            return None;
        };
        let mut prefix = metadata.national_prefix().to_owned();
        if strip_non_digits {
            prefix = prefix.replace("~", "");
        }
        Some(prefix)
    }

    /// Renders the national significant number: the Italian leading zero, if
    /// set, followed by the decimal digits of the national number.
    pub fn get_national_significant_number(phone_number: &PhoneNumber) -> String {
        let mut buf = itoa::Buffer::new();
        let national_number = buf.format(phone_number.national_number());
        let mut national_significant_number = String::with_capacity(1 + national_number.len());
        // Note this is not a national prefix; the zero is part of the
        // number itself.
        if phone_number.italian_leading_zero() {
            national_significant_number.push('0');
        }
        national_significant_number.push_str(national_number);
        national_significant_number
    }

    /// Checks the number for the basic shape of a phone number: at least
    /// three digits, and nothing but permitted punctuation, plus signs,
    /// digits and keypad letters.
    pub fn is_viable_phone_number(&self, phone_number: &str) -> bool {
        if phone_number.chars().count() < MIN_LENGTH_FOR_NSN {
            return false;
        }
        self.reg_exps.valid_phone_number_pattern.full_match(phone_number)
    }

    /// Normalizes the string in place. A number carrying three or more
    /// keypad letters goes through the E.161 mapping (with everything
    /// unmappable stripped); anything else keeps only its decimal digits,
    /// folded to ASCII. Idempotent on its own output.
    pub fn normalize(&self, phone_number: &mut String) {
        if self.reg_exps.valid_alpha_phone_pattern.full_match(phone_number) {
            helper_functions::normalize_helper(
                &self.reg_exps.alpha_phone_mappings,
                true,
                phone_number,
            );
        } else {
            *phone_number = self.normalize_digits_only(phone_number);
        }
    }

    /// Keeps only the characters carrying a Unicode decimal-digit value,
    /// folding each to its ASCII equivalent. Covers full-width forms,
    /// Arabic-Indic digits and the other decimal scripts.
    pub fn normalize_digits_only(&self, phone_number: &str) -> String {
        let mut normalized = String::with_capacity(phone_number.len());
        for c in phone_number.chars() {
            if let Some(digit) = helper_functions::decimal_digit_value(c) {
                normalized.push(digit);
            }
        }
        normalized
    }

    /// Strips a trailing extension from the number, if one is present and
    /// what remains is still a viable number. Returns the extension digits,
    /// or `None` with the input untouched.
    pub fn maybe_strip_extension(&self, phone_number: &mut String) -> Option<String> {
        let (match_start, extension) = {
            let captures = self.reg_exps.extn_pattern.captures(phone_number)?;
            let whole_match = captures.get(0)?;
            if !self.is_viable_phone_number(&phone_number[..whole_match.start()]) {
                return None;
            }
            // The extension lives in the first non-empty capture group; the
            // alternatives of the pattern capture into different groups.
            let extension = captures
                .iter()
                .skip(1)
                .flatten()
                .map(|group| group.as_str())
                .find(|candidate| !candidate.is_empty())
                .map(|candidate| candidate.to_owned());
            (whole_match.start(), extension)
        };
        let extension = extension?;
        phone_number.truncate(match_start);
        Some(extension)
    }

    /// Returns true for numbers written with keypad letters in place of some
    /// digits, like "1800 MICROSOFT". An extension does not count towards
    /// the letters.
    pub fn is_alpha_number(&self, phone_number: &str) -> bool {
        if !self.is_viable_phone_number(phone_number) {
            // Number is too short, or doesn't match the basic phone number
            // pattern.
            return false;
        }
        let mut stripped = phone_number.to_owned();
        self.maybe_strip_extension(&mut stripped);
        self.reg_exps.valid_alpha_phone_pattern.full_match(&stripped)
    }

    /// Resolves the region a parsed number belongs to. When several regions
    /// share the number's calling code they are probed in index order,
    /// first by their leading-digits pattern and then by the type
    /// classifier, so the answer is deterministic for identical inputs.
    pub fn get_region_code_for_number(&self, phone_number: &PhoneNumber) -> Option<&'static str> {
        let country_calling_code = phone_number.country_code();
        let Some(region_codes) =
            self.get_region_codes_for_country_calling_code(country_calling_code)
        else {
            trace!(
                "Missing/invalid country calling code ({})",
                country_calling_code
            );
            return None;
        };
        if region_codes.len() == 1 {
            return Some(region_codes[0]);
        }
        self.get_region_code_for_number_from_region_list(phone_number, region_codes)
    }

    fn get_region_code_for_number_from_region_list(
        &self,
        phone_number: &PhoneNumber,
        region_codes: &'static [&'static str],
    ) -> Option<&'static str> {
        let national_number = Self::get_national_significant_number(phone_number);
        for region_code in region_codes.iter().copied() {
            // Regions whose metadata cannot be materialized cannot claim the
            // number.
            let Some(metadata) = self.get_metadata_for_region(region_code) else {
                continue;
            };
            if metadata.has_leading_digits() {
                match self.reg_exps.regexp_cache.get_regex(metadata.leading_digits()) {
                    Ok(leading_digits_pattern) => {
                        if leading_digits_pattern
                            .consume_start(&national_number)
                            .is_some()
                        {
                            return Some(region_code);
                        }
                    }
                    Err(err) => {
                        error!("Invalid leading digits pattern for {}: {}", region_code, err);
                    }
                }
            } else if self.get_number_type_helper(&national_number, &metadata)
                != PhoneNumberType::Unknown
            {
                return Some(region_code);
            }
        }
        None
    }

    /// Classifies a parsed number, returning `Unknown` when the number does
    /// not match any category of its region.
    pub fn get_number_type(&self, phone_number: &PhoneNumber) -> PhoneNumberType {
        let Some(region_code) = self.get_region_code_for_number(phone_number) else {
            return PhoneNumberType::Unknown;
        };
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(phone_number.country_code(), region_code)
        else {
            return PhoneNumberType::Unknown;
        };
        let national_significant_number = Self::get_national_significant_number(phone_number);
        self.get_number_type_helper(&national_significant_number, &metadata)
    }

    pub(crate) fn get_number_type_helper(
        &self,
        national_number: &str,
        metadata: &PhoneMetadata,
    ) -> PhoneNumberType {
        if !self.is_number_matching_desc(national_number, &metadata.general_desc) {
            trace!(
                "Number '{national_number}' type unknown - doesn't match general national number pattern"
            );
            return PhoneNumberType::Unknown;
        }
        for number_type in CLASSIFICATION_ORDER {
            if self.is_number_matching_desc(
                national_number,
                get_number_desc_by_type(metadata, number_type),
            ) {
                trace!("Number '{national_number}' is of type {:?}.", number_type);
                return number_type;
            }
        }

        let is_fixed_line = self.is_number_matching_desc(national_number, &metadata.fixed_line);
        if is_fixed_line {
            if metadata.same_mobile_and_fixed_line_pattern() {
                trace!(
                    "Number '{national_number}': fixed-line and mobile patterns equal,\
                 number is fixed-line or mobile"
                );
                return PhoneNumberType::FixedLineOrMobile;
            } else if self.is_number_matching_desc(national_number, &metadata.mobile) {
                trace!(
                    "Number '{national_number}': fixed-line and mobile patterns differ, but number is \
                        still fixed-line or mobile"
                );
                return PhoneNumberType::FixedLineOrMobile;
            }
            trace!("Number '{national_number}' is a fixed line number.");
            return PhoneNumberType::FixedLine;
        }
        // Otherwise, test to see if the number is mobile. Only do this if
        // certain that the patterns for mobile and fixed line aren't the
        // same.
        if !metadata.same_mobile_and_fixed_line_pattern()
            && self.is_number_matching_desc(national_number, &metadata.mobile)
        {
            trace!("Number '{national_number}' is a mobile number.");
            return PhoneNumberType::Mobile;
        }
        trace!(
            "Number '{national_number}' type unknown - doesn't match any specific number type pattern."
        );
        PhoneNumberType::Unknown
    }

    fn is_number_matching_desc(
        &self,
        national_number: &str,
        number_desc: &PhoneNumberDesc,
    ) -> bool {
        // The possible-number sieve is the cheaper check, so it runs first;
        // only when it passes is the full national pattern consulted.
        self.matcher_api
            .match_possible_number(national_number, number_desc)
            && helper_functions::is_match(self.matcher_api.as_ref(), national_number, number_desc)
    }

    pub fn is_valid_number(&self, phone_number: &PhoneNumber) -> bool {
        let Some(region_code) = self.get_region_code_for_number(phone_number) else {
            return false;
        };
        self.is_valid_number_for_region(phone_number, region_code)
    }

    pub fn is_valid_number_for_region(&self, phone_number: &PhoneNumber, region_code: &str) -> bool {
        let country_calling_code = phone_number.country_code();
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(country_calling_code, region_code)
        else {
            return false;
        };
        if REGION_CODE_FOR_NON_GEO_ENTITY != region_code
            && metadata.country_code() != country_calling_code
        {
            // The country calling code and the region supplied contradict
            // each other.
            return false;
        }
        let national_significant_number = Self::get_national_significant_number(phone_number);
        if !metadata.general_desc.has_national_number_pattern() {
            // Regions without a general pattern fall back to the ITU length
            // range for the national significant number.
            trace!("Validating number with incomplete metadata.");
            let number_length = national_significant_number.chars().count();
            return (MIN_LENGTH_FOR_NSN..=MAX_LENGTH_FOR_NSN).contains(&number_length);
        }
        self.get_number_type_helper(&national_significant_number, &metadata)
            != PhoneNumberType::Unknown
    }

    pub fn is_possible_number(&self, phone_number: &PhoneNumber) -> bool {
        self.is_possible_number_with_reason(phone_number).is_ok()
    }

    /// Checks length and the general length-class sieve only; much cheaper
    /// than full validation and intentionally more permissive.
    pub fn is_possible_number_with_reason(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<(), ValidationError> {
        let country_calling_code = phone_number.country_code();
        if !self.has_valid_country_calling_code(country_calling_code) {
            return Err(ValidationError::InvalidCountryCode);
        }
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(country_calling_code, region_code)
        else {
            return Err(ValidationError::InvalidCountryCode);
        };
        let national_number = Self::get_national_significant_number(phone_number);
        let number_length = national_number.chars().count();
        if number_length < MIN_LENGTH_FOR_NSN {
            return Err(ValidationError::TooShort);
        }
        if number_length > MAX_LENGTH_FOR_NSN {
            return Err(ValidationError::TooLong);
        }
        self.test_number_length_against_pattern(&national_number, &metadata.general_desc)
    }

    fn test_number_length_against_pattern(
        &self,
        national_number: &str,
        desc: &PhoneNumberDesc,
    ) -> Result<(), ValidationError> {
        let Some(possible_pattern) = desc.possible_number_pattern.as_deref() else {
            // No sieve: the ITU length bounds checked above are all we have.
            return Ok(());
        };
        let possible_pattern = match self.reg_exps.regexp_cache.get_regex(possible_pattern) {
            Ok(pattern) => pattern,
            Err(err) => {
                error!("Invalid possible number pattern: {}", err);
                return Ok(());
            }
        };
        if possible_pattern.full_match(national_number) {
            return Ok(());
        }
        // A match at the start means the number carries extra trailing
        // digits; no match at the start means it ended too early.
        if possible_pattern.match_start(national_number) {
            Err(ValidationError::TooLong)
        } else {
            Err(ValidationError::TooShort)
        }
    }

    pub fn is_possible_number_for_string(
        &self,
        phone_number: &str,
        region_dialing_from: &str,
    ) -> bool {
        match self.parse(phone_number, region_dialing_from) {
            Ok(parsed) => self.is_possible_number(&parsed),
            Err(_) => false,
        }
    }

    pub fn can_be_internationally_dialled(&self, phone_number: &PhoneNumber) -> bool {
        let Some(region_code) = self.get_region_code_for_number(phone_number) else {
            // Note numbers belonging to non-geographical entities (e.g. +800
            // numbers) are always internationally diallable, and will be
            // caught here.
            return true;
        };
        let Some(metadata) = self.get_metadata_for_region(region_code) else {
            return true;
        };
        let national_significant_number = Self::get_national_significant_number(phone_number);
        !self.is_number_matching_desc(
            &national_significant_number,
            &metadata.no_international_dialling,
        )
    }

    /// Formats a parsed number in the requested format. Numbers with an
    /// unknown country calling code come back as their plain national
    /// significant number.
    pub fn format(&self, phone_number: &PhoneNumber, number_format: PhoneNumberFormat) -> String {
        let country_calling_code = phone_number.country_code();
        let mut formatted_number = Self::get_national_significant_number(phone_number);
        if matches!(number_format, PhoneNumberFormat::E164) {
            // Early exit for E164 case (even if the country calling code is
            // invalid) since no formatting of the national number needs to
            // be applied. Extensions are not formatted.
            prefix_number_with_country_calling_code(
                country_calling_code,
                PhoneNumberFormat::E164,
                &mut formatted_number,
            );
            return formatted_number;
        }
        if !self.has_valid_country_calling_code(country_calling_code) {
            return formatted_number;
        }
        // Note that all NANPA formatting rules are contained by the main
        // region for the code, so the main region's metadata formats the
        // whole code space. The same applies to the Russian Fed regions.
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(country_calling_code, region_code)
        else {
            return formatted_number;
        };
        formatted_number = owned_from_cow_or!(
            self.format_nsn(&formatted_number, &metadata, number_format),
            formatted_number
        );
        if let Some(formatted_extension) =
            Self::get_formatted_extension(phone_number, &metadata, number_format)
        {
            formatted_number.push_str(&formatted_extension);
        }
        prefix_number_with_country_calling_code(
            country_calling_code,
            number_format,
            &mut formatted_number,
        );
        formatted_number
    }

    /// Formats in national format, splicing the given carrier code in via
    /// the rule's `$CC` placeholder where the chosen formatting rule carries
    /// one.
    pub fn format_national_number_with_carrier_code(
        &self,
        phone_number: &PhoneNumber,
        carrier_code: &str,
    ) -> String {
        let country_calling_code = phone_number.country_code();
        let national_significant_number = Self::get_national_significant_number(phone_number);
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(country_calling_code, region_code)
        else {
            return national_significant_number;
        };
        let mut formatted_number = owned_from_cow_or!(
            self.format_nsn_with_carrier(
                &national_significant_number,
                &metadata,
                PhoneNumberFormat::National,
                carrier_code,
            ),
            national_significant_number
        );
        if let Some(formatted_extension) =
            Self::get_formatted_extension(phone_number, &metadata, PhoneNumberFormat::National)
        {
            formatted_number.push_str(&formatted_extension);
        }
        prefix_number_with_country_calling_code(
            country_calling_code,
            PhoneNumberFormat::National,
            &mut formatted_number,
        );
        formatted_number
    }

    pub fn format_national_number_with_preferred_carrier_code(
        &self,
        phone_number: &PhoneNumber,
        fallback_carrier_code: &str,
    ) -> String {
        let carrier_code = if !phone_number.preferred_domestic_carrier_code().is_empty() {
            phone_number.preferred_domestic_carrier_code()
        } else {
            fallback_carrier_code
        };
        self.format_national_number_with_carrier_code(phone_number, carrier_code)
    }

    fn format_nsn<'b>(
        &self,
        number: &'b str,
        metadata: &PhoneMetadata,
        number_format: PhoneNumberFormat,
    ) -> Cow<'b, str> {
        self.format_nsn_with_carrier(number, metadata, number_format, "")
    }

    fn format_nsn_with_carrier<'b>(
        &self,
        number: &'b str,
        metadata: &PhoneMetadata,
        number_format: PhoneNumberFormat,
        carrier_code: &str,
    ) -> Cow<'b, str> {
        // When the intl_number_formats exists, we use that to format
        // national number for the INTERNATIONAL format instead of using the
        // number_formats.
        let available_formats = if metadata.intl_number_format.is_empty()
            || number_format == PhoneNumberFormat::National
        {
            &metadata.number_format
        } else {
            &metadata.intl_number_format
        };
        if let Some(formatting_pattern) =
            self.choose_formatting_pattern_for_number(available_formats, number)
        {
            self.format_nsn_using_pattern_with_carrier(
                number,
                formatting_pattern,
                number_format,
                carrier_code,
            )
        } else {
            Cow::Borrowed(number)
        }
    }

    fn choose_formatting_pattern_for_number<'b>(
        &self,
        available_formats: &'b [NumberFormat],
        national_number: &str,
    ) -> Option<&'b NumberFormat> {
        'next_format: for format in available_formats {
            if !format.leading_digits_pattern.is_empty() {
                // The alternatives are tried in their declared order; the
                // first one matching as a prefix elects the rule.
                let mut prefix_matched = false;
                for leading_digits in &format.leading_digits_pattern {
                    match self.reg_exps.regexp_cache.get_regex(leading_digits) {
                        Ok(pattern) => {
                            if pattern.consume_start(national_number).is_some() {
                                prefix_matched = true;
                                break;
                            }
                        }
                        Err(err) => {
                            error!("Invalid leading digits pattern: {}", err);
                            continue 'next_format;
                        }
                    }
                }
                if !prefix_matched {
                    continue;
                }
            }
            match self.reg_exps.regexp_cache.get_regex(format.pattern()) {
                Ok(pattern_to_match) => {
                    if pattern_to_match.full_match(national_number) {
                        return Some(format);
                    }
                }
                Err(err) => error!("Invalid number format pattern: {}", err),
            }
        }
        None
    }

    // Note that carrier_code is optional - if an empty string, no carrier
    // code replacement will take place.
    fn format_nsn_using_pattern_with_carrier<'b>(
        &self,
        national_number: &'b str,
        formatting_pattern: &NumberFormat,
        number_format: PhoneNumberFormat,
        carrier_code: &str,
    ) -> Cow<'b, str> {
        let mut number_format_rule = Cow::Borrowed(formatting_pattern.format());
        if matches!(number_format, PhoneNumberFormat::National)
            && !carrier_code.is_empty()
            && !formatting_pattern
                .domestic_carrier_code_formatting_rule()
                .is_empty()
        {
            // Replace the $CC in the formatting rule with the desired
            // carrier code.
            let carrier_code_formatting_rule = self
                .reg_exps
                .carrier_code_pattern
                .replace(
                    formatting_pattern.domestic_carrier_code_formatting_rule(),
                    carrier_code,
                )
                .into_owned();
            number_format_rule = Cow::Owned(
                self.reg_exps
                    .first_group_capturing_pattern
                    .replace(&number_format_rule, carrier_code_formatting_rule.as_str())
                    .into_owned(),
            );
        } else {
            // Use the national prefix formatting rule instead.
            let national_prefix_formatting_rule =
                formatting_pattern.national_prefix_formatting_rule();
            if matches!(number_format, PhoneNumberFormat::National)
                && !national_prefix_formatting_rule.is_empty()
            {
                // Apply the national_prefix_formatting_rule as the
                // formatting_pattern contains only information on how the
                // national significant number should be formatted at this
                // point.
                number_format_rule = Cow::Owned(
                    self.reg_exps
                        .first_group_capturing_pattern
                        .replace(&number_format_rule, national_prefix_formatting_rule)
                        .into_owned(),
                );
            }
        }

        let pattern_to_match = match self.reg_exps.regexp_cache.get_regex(formatting_pattern.pattern())
        {
            Ok(pattern) => pattern,
            Err(err) => {
                error!("Invalid number format pattern: {}", err);
                return Cow::Borrowed(national_number);
            }
        };
        let mut formatted_number =
            pattern_to_match.replace_all(national_number, number_format_rule.as_ref());

        if matches!(number_format, PhoneNumberFormat::RFC3966) {
            // First consume any leading punctuation, if any was present.
            if let Some(rest) = self.reg_exps.separator_pattern.consume_start(&formatted_number) {
                let rest = rest.into_owned();
                formatted_number = Cow::Owned(rest);
            }
            // Then replace all separators with a "-".
            formatted_number = Cow::Owned(
                self.reg_exps
                    .separator_pattern
                    .replace_all(&formatted_number, "-")
                    .into_owned(),
            );
        }
        formatted_number
    }

    // Returns the formatted extension of a phone number, if the phone number
    // had an extension specified else None.
    fn get_formatted_extension(
        phone_number: &PhoneNumber,
        metadata: &PhoneMetadata,
        number_format: PhoneNumberFormat,
    ) -> Option<String> {
        if !phone_number.has_extension() || phone_number.extension().is_empty() {
            return None;
        }
        let prefix = if matches!(number_format, PhoneNumberFormat::RFC3966) {
            RFC3966_EXTN_PREFIX
        } else if metadata.has_preferred_extn_prefix() {
            metadata.preferred_extn_prefix()
        } else {
            DEFAULT_EXTN_PREFIX
        };
        let mut formatted_extension =
            String::with_capacity(prefix.len() + phone_number.extension().len());
        formatted_extension.push_str(prefix);
        formatted_extension.push_str(phone_number.extension());
        Some(formatted_extension)
    }

    /// Compares two parsed numbers for equality, tolerating missing country
    /// codes and shortened national significant numbers.
    pub fn is_number_match(
        &self,
        first_number: &PhoneNumber,
        second_number: &PhoneNumber,
    ) -> MatchType {
        let first = Self::copy_core_fields_only(first_number);
        let second = Self::copy_core_fields_only(second_number);
        if first.has_extension() && second.has_extension() && first.extension() != second.extension()
        {
            return MatchType::NoMatch;
        }
        let first_country_code = first.country_code();
        let second_country_code = second.country_code();
        if first_country_code != 0 && second_country_code != 0 {
            if first == second {
                return MatchType::ExactMatch;
            }
            if first_country_code == second_country_code
                && is_national_number_suffix_of_the_other(&first, &second)
            {
                // A SHORT_NSN_MATCH occurs if there is a difference because
                // of the presence or absence of an 'Italian leading zero',
                // the presence or absence of an extension, or one NSN being
                // a shorter variant of the other.
                return MatchType::ShortNsnMatch;
            }
            return MatchType::NoMatch;
        }
        // One of the numbers has no country code set; level the field and
        // compare the national significant numbers only.
        let mut first = first;
        first.set_country_code(second_country_code);
        if first == second {
            return MatchType::NsnMatch;
        }
        if is_national_number_suffix_of_the_other(&first, &second) {
            return MatchType::ShortNsnMatch;
        }
        MatchType::NoMatch
    }

    /// String form of `is_number_match`. Each operand is parsed against the
    /// unknown region, so only fully qualified inputs (with a plus sign or
    /// an IDD) can produce a verdict other than `NotANumber`.
    pub fn is_number_match_for_strings(
        &self,
        first_number: &str,
        second_number: &str,
    ) -> MatchType {
        let Ok(first) = self.parse(first_number, i18n::RegionCode::get_unknown()) else {
            return MatchType::NotANumber;
        };
        let Ok(second) = self.parse(second_number, i18n::RegionCode::get_unknown()) else {
            return MatchType::NotANumber;
        };
        self.is_number_match(&first, &second)
    }

    /// Returns a new phone number containing only the fields needed to
    /// uniquely identify a phone number, rather than any fields that capture
    /// the context in which it was parsed.
    fn copy_core_fields_only(from_number: &PhoneNumber) -> PhoneNumber {
        let mut to_number = PhoneNumber::new();
        to_number.set_country_code(from_number.country_code());
        to_number.set_national_number(from_number.national_number());
        if from_number.has_extension() && !from_number.extension().is_empty() {
            to_number.set_extension(from_number.extension().to_owned());
        }
        if from_number.italian_leading_zero() {
            to_number.set_italian_leading_zero(true);
        }
        to_number
    }

    /// Parses a string into a `PhoneNumber`. The default region is consulted
    /// when the input carries no international prefix of its own and decides
    /// which national prefix is stripped.
    pub fn parse(
        &self,
        number_to_parse: &str,
        default_region: &str,
    ) -> Result<PhoneNumber, ParseError> {
        let national_number = self.extract_possible_number(number_to_parse)?;
        if !self.is_viable_phone_number(national_number) {
            return Err(ParseError::NotANumber);
        }
        if !self.check_region_for_parsing(national_number, default_region) {
            trace!("Missing or invalid default region.");
            return Err(ParseError::InvalidCountryCode);
        }

        let mut national_number = national_number.to_owned();
        let extension = self.maybe_strip_extension(&mut national_number);

        let default_metadata = self.get_metadata_for_region(default_region);
        let (extracted_country_code, country_code_source, mut normalized_national_number) =
            self.maybe_extract_country_code(&national_number, default_metadata.as_deref())?;

        let mut phone_number = PhoneNumber::new();
        phone_number.set_country_code_source(country_code_source);
        if let Some(extension) = extension {
            phone_number.set_extension(extension);
        }

        let (country_code, country_metadata) = if extracted_country_code != 0 {
            let phone_number_region = self.get_region_code_for_country_code(extracted_country_code);
            (
                extracted_country_code,
                self.get_metadata_for_region_or_calling_code(
                    extracted_country_code,
                    phone_number_region,
                ),
            )
        } else {
            // No country calling code in the number itself; the default
            // region supplies it.
            let Some(default_metadata) = default_metadata else {
                return Err(ParseError::InvalidCountryCode);
            };
            (default_metadata.country_code(), Some(default_metadata))
        };

        if normalized_national_number.chars().count() < MIN_LENGTH_FOR_NSN {
            return Err(ParseError::TooShortNsn);
        }

        if let Some(metadata) = &country_metadata {
            let mut potential_national_number = normalized_national_number.clone();
            let carrier_code = self
                .maybe_strip_national_prefix_and_carrier_code(&mut potential_national_number, metadata);
            // Only keep the stripped version when it leaves something that
            // could still be a number.
            if potential_national_number.chars().count() >= MIN_LENGTH_FOR_NSN {
                normalized_national_number = potential_national_number;
                if let Some(carrier_code) = carrier_code {
                    phone_number.set_preferred_domestic_carrier_code(carrier_code);
                }
            }
        }

        let number_length = normalized_national_number.chars().count();
        if number_length < MIN_LENGTH_FOR_NSN {
            return Err(ParseError::TooShortNsn);
        }
        if number_length > MAX_LENGTH_FOR_NSN {
            return Err(ParseError::TooLongNsn);
        }
        if normalized_national_number.starts_with('0') {
            phone_number.set_italian_leading_zero(true);
        }
        phone_number.set_country_code(country_code);
        phone_number.set_national_number(
            normalized_national_number
                .parse()
                .map_err(|_| ParseError::NotANumber)?,
        );
        Ok(phone_number)
    }

    /// Attempts to locate a phone-number-shaped substring: starts at the
    /// first plus sign or digit, drops trailing characters that can be
    /// neither part of the number nor an extension marker, and cuts off
    /// anything that looks like the start of a second phone number.
    fn extract_possible_number<'b>(&self, number_to_parse: &'b str) -> Result<&'b str, ParseError> {
        let Some(start) = self.reg_exps.valid_start_char_pattern.find(number_to_parse) else {
            return Err(ParseError::NotANumber);
        };
        let mut candidate = &number_to_parse[start.start()..];

        let mut end = candidate.len();
        let mut char_buf = [0u8; 4];
        for c in candidate.chars().rev() {
            if self
                .reg_exps
                .unwanted_end_char_pattern
                .full_match(c.encode_utf8(&mut char_buf))
            {
                end -= c.len_utf8();
            } else {
                break;
            }
        }
        candidate = &candidate[..end];

        if let Some(captures) = self
            .reg_exps
            .capture_up_to_second_number_start_pattern
            .captures(candidate)
        {
            if let Some(up_to_second_number) = captures.get(1) {
                candidate = up_to_second_number.as_str();
            }
        }
        Ok(candidate)
    }

    /// Parsing needs either a supported default region or a number carrying
    /// its own plus sign.
    fn check_region_for_parsing(&self, number_to_parse: &str, default_region: &str) -> bool {
        self.supported_regions.contains(default_region)
            || self.reg_exps.plus_chars_pattern.match_start(number_to_parse)
    }

    /// Tries to establish the country calling code of the number: from a
    /// leading plus sign, from the default region's international dialling
    /// prefix, or from the number plainly starting with the default region's
    /// calling code. Returns the code (0 when the default region is to
    /// supply it), its provenance, and the remaining normalized national
    /// number.
    fn maybe_extract_country_code(
        &self,
        national_number: &str,
        default_metadata: Option<&PhoneMetadata>,
    ) -> Result<(i32, CountryCodeSource, String), ParseError> {
        let mut full_number = national_number.to_owned();
        let possible_idd_prefix =
            default_metadata.and_then(|metadata| metadata.international_prefix.as_deref());
        let country_code_source =
            self.maybe_strip_international_prefix_and_normalize(&mut full_number, possible_idd_prefix);

        if !matches!(country_code_source, CountryCodeSource::FromDefaultCountry) {
            if full_number.chars().count() <= MIN_LENGTH_FOR_NSN {
                return Err(ParseError::TooShortAfterIdd);
            }
            if let Some((country_code, rest)) = self.extract_country_code(&full_number) {
                return Ok((country_code, country_code_source, rest.to_owned()));
            }
            // If this fails, they must be using a strange country calling
            // code that we don't recognize, or that doesn't exist.
            return Err(ParseError::InvalidCountryCode);
        }

        if let Some(metadata) = default_metadata {
            // Check to see if the number starts with the country calling
            // code of the default region. If so, we remove the country
            // calling code, and do some checks on the validity of the number
            // before and after.
            let mut buf = itoa::Buffer::new();
            let default_country_code = buf.format(metadata.country_code());
            if let Some(potential_national_number) = full_number.strip_prefix(default_country_code)
            {
                let mut potential_national_number = potential_national_number.to_owned();
                self.maybe_strip_national_prefix_and_carrier_code(
                    &mut potential_national_number,
                    metadata,
                );
                let general_desc = &metadata.general_desc;
                // If the number was not valid before but is valid now, or if
                // it was too long before, we consider the number with the
                // country calling code stripped to be a better result.
                if (!helper_functions::is_match(
                    self.matcher_api.as_ref(),
                    &full_number,
                    general_desc,
                ) && helper_functions::is_match(
                    self.matcher_api.as_ref(),
                    &potential_national_number,
                    general_desc,
                )) || full_number.chars().count() > MAX_LENGTH_FOR_NSN
                {
                    return Ok((
                        metadata.country_code(),
                        CountryCodeSource::FromNumberWithoutPlusSign,
                        potential_national_number,
                    ));
                }
            }
        }
        Ok((0, CountryCodeSource::FromDefaultCountry, full_number))
    }

    /// Reads off the leading 1..3 digits that form a known country calling
    /// code. The input must already be normalized to ASCII digits.
    fn extract_country_code<'b>(&self, full_number: &'b str) -> Option<(i32, &'b str)> {
        if full_number.is_empty() || full_number.starts_with('0') {
            // Country codes do not begin with a '0'.
            return None;
        }
        for length in 1..=MAX_LENGTH_COUNTRY_CODE {
            if length > full_number.len() {
                break;
            }
            let (potential_country_code, rest) = full_number.split_at(length);
            let Ok(country_code) = potential_country_code.parse::<i32>() else {
                break;
            };
            if self.has_valid_country_calling_code(country_code) {
                return Some((country_code, rest));
            }
        }
        None
    }

    /// Strips a leading plus sign or the region's international dialling
    /// prefix, normalizing the number in the process, and reports where the
    /// country code will come from.
    fn maybe_strip_international_prefix_and_normalize(
        &self,
        phone_number: &mut String,
        possible_idd_prefix: Option<&str>,
    ) -> CountryCodeSource {
        if phone_number.is_empty() {
            return CountryCodeSource::FromDefaultCountry;
        }
        if let Some(rest) = self.reg_exps.plus_chars_pattern.consume_start(phone_number) {
            let mut rest = rest.into_owned();
            // Can now normalize the rest of the number since we've consumed
            // the "+" sign at the start.
            self.normalize(&mut rest);
            *phone_number = rest;
            return CountryCodeSource::FromNumberWithPlusSign;
        }
        // Attempt to parse the rest as an international direct dialling
        // prefix of the default region.
        self.normalize(phone_number);
        let Some(possible_idd_prefix) = possible_idd_prefix else {
            return CountryCodeSource::FromDefaultCountry;
        };
        let idd_pattern = match self.reg_exps.regexp_cache.get_regex(possible_idd_prefix) {
            Ok(pattern) => pattern,
            Err(err) => {
                error!("Invalid international prefix pattern: {}", err);
                return CountryCodeSource::FromDefaultCountry;
            }
        };
        if self.parse_prefix_as_idd(&idd_pattern, phone_number) {
            CountryCodeSource::FromNumberWithIdd
        } else {
            CountryCodeSource::FromDefaultCountry
        }
    }

    fn parse_prefix_as_idd(&self, idd_pattern: &regex::Regex, phone_number: &mut String) -> bool {
        let stripped = {
            let Some(rest) = idd_pattern.consume_start(phone_number) else {
                return false;
            };
            // Only strip this if the first digit after the match is not a 0,
            // since country calling codes cannot begin with 0.
            if let Some(captures) = self.reg_exps.capturing_digit_pattern.captures(&rest) {
                let first_digit = captures
                    .get(1)
                    .and_then(|group| group.as_str().chars().next())
                    .and_then(helper_functions::decimal_digit_value);
                if first_digit == Some('0') {
                    return false;
                }
            }
            rest.into_owned()
        };
        *phone_number = stripped;
        true
    }

    /// Strips the national prefix (or applies its transform rule) when the
    /// region declares one, capturing any carrier code on the way. Stripping
    /// never turns a number matching the region's general description into
    /// one that does not.
    fn maybe_strip_national_prefix_and_carrier_code(
        &self,
        phone_number: &mut String,
        metadata: &PhoneMetadata,
    ) -> Option<String> {
        let possible_national_prefix = metadata.national_prefix_for_parsing.as_deref()?;
        if phone_number.is_empty() || possible_national_prefix.is_empty() {
            return None;
        }
        let prefix_pattern = match self.reg_exps.regexp_cache.get_regex(possible_national_prefix) {
            Ok(pattern) => pattern,
            Err(err) => {
                error!("Invalid national prefix for parsing: {}", err);
                return None;
            }
        };
        let is_viable_original_number = helper_functions::is_match(
            self.matcher_api.as_ref(),
            phone_number,
            &metadata.general_desc,
        );

        let transform_rule = metadata.national_prefix_transform_rule();
        let (stripped_number, carrier_code) = {
            let captures = prefix_pattern.captures(phone_number)?;
            let whole_match = captures.get(0)?;
            if whole_match.start() != 0 {
                return None;
            }
            let group_count = captures.len() - 1;
            let last_group_present = group_count > 0 && captures.get(group_count).is_some();
            if !transform_rule.is_empty() && last_group_present {
                // The prefix transforms the number rather than being removed
                // outright, e.g. for Argentinian mobile numbers.
                let transformed = prefix_pattern.replace(phone_number, transform_rule).into_owned();
                (transformed, None)
            } else {
                let carrier_code = if group_count > 0 {
                    captures
                        .get(1)
                        .map(|group| group.as_str())
                        .filter(|candidate| !candidate.is_empty())
                        .map(|candidate| candidate.to_owned())
                } else {
                    None
                };
                (phone_number[whole_match.end()..].to_owned(), carrier_code)
            }
        };
        if is_viable_original_number
            && !helper_functions::is_match(
                self.matcher_api.as_ref(),
                &stripped_number,
                &metadata.general_desc,
            )
        {
            return None;
        }
        *phone_number = stripped_number;
        carrier_code
    }
}
