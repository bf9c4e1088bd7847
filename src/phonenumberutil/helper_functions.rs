use std::collections::{HashMap, HashSet};

use strum::IntoEnumIterator;

use crate::{
    interfaces::MatcherApi,
    metadata::{PhoneMetadata, PhoneNumberDesc},
    phonenumber::PhoneNumber,
};

use super::{
    helper_constants::{
        DIGITS, OPTIONAL_EXT_SUFFIX, PLUS_SIGN, POSSIBLE_CHARS_AFTER_EXT_LABEL,
        POSSIBLE_SEPARATORS_BETWEEN_NUMBER_AND_EXT_LABEL, RFC3966_EXTN_PREFIX, RFC3966_PREFIX,
    },
    PhoneNumberFormat, PhoneNumberType,
};

/// Returns a reference to the description inside the metadata of the
/// appropriate type.
pub(super) fn get_number_desc_by_type(
    metadata: &PhoneMetadata,
    phone_number_type: PhoneNumberType,
) -> &PhoneNumberDesc {
    match phone_number_type {
        PhoneNumberType::PremiumRate => &metadata.premium_rate,
        PhoneNumberType::TollFree => &metadata.toll_free,
        PhoneNumberType::Mobile => &metadata.mobile,
        PhoneNumberType::FixedLine | PhoneNumberType::FixedLineOrMobile => &metadata.fixed_line,
        PhoneNumberType::SharedCost => &metadata.shared_cost,
        PhoneNumberType::VoIP => &metadata.voip,
        PhoneNumberType::PersonalNumber => &metadata.personal_number,
        PhoneNumberType::Pager => &metadata.pager,
        PhoneNumberType::UAN => &metadata.uan,
        PhoneNumberType::VoiceMail => &metadata.voicemail,
        // Instead of the default case, we only match `Unknown`
        PhoneNumberType::Unknown => &metadata.general_desc,
    }
}

/// A helper function that is used by Format and its carrier-code variants.
pub(super) fn prefix_number_with_country_calling_code(
    country_calling_code: i32,
    number_format: PhoneNumberFormat,
    formatted_number: &mut String,
) {
    let mut buf = itoa::Buffer::new();
    let country_calling_code_str = buf.format(country_calling_code);

    // We anyway allocate a new string in concatenation, so we do it once
    // with the capacity of the resulting string.
    let mut prefixed = String::with_capacity(
        RFC3966_PREFIX.len() + 2 + country_calling_code_str.len() + formatted_number.len(),
    );
    match number_format {
        PhoneNumberFormat::E164 => {
            prefixed.push_str(PLUS_SIGN);
            prefixed.push_str(country_calling_code_str);
            prefixed.push_str(formatted_number);
        }
        PhoneNumberFormat::International => {
            prefixed.push_str(PLUS_SIGN);
            prefixed.push_str(country_calling_code_str);
            prefixed.push(' ');
            prefixed.push_str(formatted_number);
        }
        PhoneNumberFormat::RFC3966 => {
            prefixed.push_str(RFC3966_PREFIX);
            prefixed.push_str(PLUS_SIGN);
            prefixed.push_str(country_calling_code_str);
            prefixed.push('-');
            prefixed.push_str(formatted_number);
        }
        PhoneNumberFormat::National => return,
    }
    *formatted_number = prefixed;
}

// Returns true when one national number is the suffix of the other or both
// are the same.
pub(super) fn is_national_number_suffix_of_the_other(
    first_number: &PhoneNumber,
    second_number: &PhoneNumber,
) -> bool {
    let mut buf = itoa::Buffer::new();
    let first_number_national_number = buf.format(first_number.national_number());
    let mut buf = itoa::Buffer::new();
    let second_number_national_number = buf.format(second_number.national_number());
    // Note that ends_with returns true if the numbers are equal.
    return first_number_national_number.ends_with(second_number_national_number)
        || second_number_national_number.ends_with(first_number_national_number);
}

/// Helper method for constructing regular expressions for parsing. Creates an
/// expression that captures up to max_length digits.
pub(super) fn extn_digits(max_length: u32) -> String {
    format!("([{}]{{1,{}}})", DIGITS, max_length)
}

// Helper initialiser method to create the regular-expression pattern to match
// extensions. Note that:
// - There are currently six capturing groups for the extension itself. If
// this number is changed, MaybeStripExtension needs to be updated.
// - The only capturing groups should be around the digits that you want to
// capture as part of the extension, or else parsing will fail!
pub(super) fn create_extn_pattern(for_parsing: bool) -> String {
    // Extensions are capped at seven digits; the trailing North-American
    // "- 503#" form is more ambiguous and is capped at five.
    let ext_limit_after_explicit_label = 7;
    let ext_limit_after_ambiguous_char = 7;
    let ext_limit_when_not_sure = 5;

    // Canonical-equivalence is not an option here, so we allow two options
    // for representing any non-ASCII character like ó - the character itself,
    // and one in the unicode decomposed form with the combining acute accent.

    // Here the extension is called out in a more explicit way, i.e mentioning
    // it obvious patterns like "ext.".
    let explicit_ext_labels =
        "(?:e?xt(?:ensi(?:o\u{0301}?|\u{00F3}))?n?|(?:\u{FF45})?\u{FF58}\u{FF54}(?:\u{FF4E})?|anexo)";
    // One-character symbols that can be used to indicate an extension, and
    // less commonly used or more ambiguous extension labels.
    let ambiguous_ext_labels = "(?:[x\u{FF58}#\u{FF03}~\u{FF5E}]|int|\u{FF49}\u{FF4E}\u{FF54})";
    // When extension is not separated clearly.
    let ambiguous_separator = "[- ]+";

    let rfc_extn = format!(
        "{}{}",
        RFC3966_EXTN_PREFIX,
        extn_digits(ext_limit_after_explicit_label)
    );
    let explicit_extn = format!(
        "{}{}{}{}{}",
        POSSIBLE_SEPARATORS_BETWEEN_NUMBER_AND_EXT_LABEL,
        explicit_ext_labels,
        POSSIBLE_CHARS_AFTER_EXT_LABEL,
        extn_digits(ext_limit_after_explicit_label),
        OPTIONAL_EXT_SUFFIX
    );
    let ambiguous_extn = format!(
        "{}{}{}{}{}",
        POSSIBLE_SEPARATORS_BETWEEN_NUMBER_AND_EXT_LABEL,
        ambiguous_ext_labels,
        POSSIBLE_CHARS_AFTER_EXT_LABEL,
        extn_digits(ext_limit_after_ambiguous_char),
        OPTIONAL_EXT_SUFFIX
    );
    let american_style_extn_with_suffix = format!(
        "{}{}#",
        ambiguous_separator,
        extn_digits(ext_limit_when_not_sure)
    );

    // The first regular expression covers RFC 3966 format, where the
    // extension is added using ";ext=". The second more generic where
    // extension is mentioned with explicit labels like "ext:". In both the
    // above cases we allow more numbers in extension than any other extension
    // labels. The third one captures when single character extension labels
    // or less commonly used labels are present. In such cases we capture
    // fewer extension digits in order to reduce the chance of falsely
    // interpreting two numbers beside each other as a number + extension.
    // The fourth one covers the special case of American numbers where the
    // extension is written with a hash at the end, such as "- 503#".
    let extension_pattern = format!(
        "{}|{}|{}|{}",
        rfc_extn, explicit_extn, ambiguous_extn, american_style_extn_with_suffix
    );
    // Additional pattern that is supported when parsing extensions, not when
    // matching.
    if for_parsing {
        // ",," is commonly used for auto dialling the extension when
        // connected. Semi-colon works in Iphone and also in Android to pop
        // up a button with the extension number following.
        let auto_dialling_and_ext_labels_found = "(?:,{2}|;)";
        // This is same as POSSIBLE_SEPARATORS_BETWEEN_NUMBER_AND_EXT_LABEL,
        // but not matching comma as extension label may have it.
        let possible_separators_number_ext_label_no_comma = "[ \u{00A0}\\t]*";

        let auto_dialling_extn = format!(
            "{}{}{}{}{}",
            possible_separators_number_ext_label_no_comma,
            auto_dialling_and_ext_labels_found,
            POSSIBLE_CHARS_AFTER_EXT_LABEL,
            extn_digits(ext_limit_after_explicit_label),
            OPTIONAL_EXT_SUFFIX
        );
        let only_commas_extn = format!(
            "{}(?:,)+{}{}{}",
            possible_separators_number_ext_label_no_comma,
            POSSIBLE_CHARS_AFTER_EXT_LABEL,
            extn_digits(ext_limit_after_ambiguous_char),
            OPTIONAL_EXT_SUFFIX
        );
        // Here the first pattern is exclusive for extension autodialling
        // formats which are used when dialling and in this case we accept
        // longer extensions. However, the second pattern is more liberal on
        // number of commas that acts as extension labels, so we have strict
        // cap on number of digits in such extensions.
        return format!(
            "{}|{}|{}",
            extension_pattern, auto_dialling_extn, only_commas_extn
        );
    }
    extension_pattern
}

/// Normalizes a string of characters representing a phone number by replacing
/// all characters found in the accompanying map with the values therein, and
/// stripping all other characters if remove_non_matches is true.
///
/// Parameters:
/// * `normalization_replacements` - a mapping of characters to what they
///   should be replaced by in the normalized version of the phone number
/// * `remove_non_matches` - indicates whether characters that are not able to
///   be replaced should be stripped from the number. If this is false, they
///   will be left unchanged in the number.
/// * `phone_number` - the string of characters representing a phone number to
///   be normalized.
pub(super) fn normalize_helper(
    normalization_replacements: &HashMap<char, char>,
    remove_non_matches: bool,
    phone_number: &mut String,
) {
    let mut normalized_number = String::with_capacity(phone_number.len());
    for phone_char in phone_number.chars() {
        let key = fold_full_width_alpha(phone_char).to_ascii_uppercase();
        if let Some(replacement) = normalization_replacements.get(&key) {
            normalized_number.push(*replacement);
        } else if let Some(digit) = decimal_digit_value(phone_char) {
            normalized_number.push(digit);
        } else if !remove_non_matches {
            normalized_number.push(phone_char);
        }
        // If none of the above are true, we remove this character.
    }
    *phone_number = normalized_number;
}

/// Maps the full-width ASCII letter forms onto their ASCII counterparts so
/// the E.161 keypad table covers them too.
fn fold_full_width_alpha(c: char) -> char {
    match c as u32 {
        0xFF21..=0xFF3A => char::from_u32(c as u32 - 0xFF21 + 'A' as u32).unwrap_or(c),
        0xFF41..=0xFF5A => char::from_u32(c as u32 - 0xFF41 + 'a' as u32).unwrap_or(c),
        _ => c,
    }
}

/// First code points of the runs of ten that make up the Unicode decimal
/// digit (`Nd`) blocks: ASCII, Arabic-Indic, Extended Arabic-Indic, the
/// Brahmic scripts, full-width forms and the supplementary-plane scripts.
/// Every run starts at its zero.
const DECIMAL_DIGIT_BLOCK_STARTS: &[u32] = &[
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66,
    0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946,
    0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0,
    0xA9F0, 0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0,
    0x112F0, 0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11C50, 0x11D50, 0x11DA0,
    0x16A60, 0x16B50, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6, 0x1E950,
];

/// Returns the ASCII digit a character folds to when it carries a Unicode
/// decimal-digit value, e.g. '\u{FF12}' (full-width two) and '\u{0662}'
/// (Arabic-Indic two) both fold to '2'.
pub(super) fn decimal_digit_value(c: char) -> Option<char> {
    let code_point = c as u32;
    let run_start = match DECIMAL_DIGIT_BLOCK_STARTS.binary_search(&code_point) {
        Ok(_) => return Some('0'),
        Err(0) => return None,
        Err(insertion) => DECIMAL_DIGIT_BLOCK_STARTS[insertion - 1],
    };
    let offset = code_point - run_start;
    if offset < 10 {
        char::from_digit(offset, 10)
    } else {
        None
    }
}

/// Returns `true` if there is any data set for a particular PhoneNumberDesc.
pub(super) fn desc_has_data(desc: &PhoneNumberDesc) -> bool {
    desc.has_example_number()
        || desc.has_national_number_pattern()
        || desc.has_possible_number_pattern()
}

/// Returns the types we have metadata for based on the PhoneMetadata object
/// passed in.
pub(super) fn get_supported_types_for_metadata(
    metadata: &PhoneMetadata,
) -> HashSet<PhoneNumberType> {
    PhoneNumberType::iter()
        // Never return FIXED_LINE_OR_MOBILE (it is a convenience type, and
        // represents that a particular number type can't be determined) or
        // UNKNOWN (the non-type).
        .filter(|number_type| {
            !matches!(
                number_type,
                PhoneNumberType::FixedLineOrMobile | PhoneNumberType::Unknown
            )
        })
        .filter(|number_type| desc_has_data(get_number_desc_by_type(metadata, *number_type)))
        .collect()
}

/// Determines whether the given number is a national number match for the
/// given PhoneNumberDesc. Does not check the possible-number sieve!
pub(super) fn is_match(
    matcher_api: &dyn MatcherApi,
    number: &str,
    number_desc: &PhoneNumberDesc,
) -> bool {
    matcher_api.match_national_number(number, number_desc, false)
}
