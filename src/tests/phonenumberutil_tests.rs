use std::sync::Arc;

use crate::{
    CountryCodeSource, MatchType, ParseError, PhoneMetadata, PhoneNumber, PhoneNumberFormat,
    PhoneNumberType, PhoneNumberUtil, ValidationError,
};

use super::region_code::RegionCode;

static ONCE: std::sync::Once = std::sync::Once::new();

fn get_phone_util() -> PhoneNumberUtil {
    ONCE.call_once(|| {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Trace)
            .is_test(true)
            .try_init();
    });
    PhoneNumberUtil::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/testdata/PhoneNumberMetadata"
    ))
}

fn us_number(national_number: u64) -> PhoneNumber {
    let mut number = PhoneNumber::new();
    number.set_country_code(1);
    number.set_national_number(national_number);
    number
}

#[test]
fn get_supported_regions() {
    let phone_util = get_phone_util();
    assert!(phone_util.get_supported_regions().count() > 0);
    assert!(phone_util.is_supported_region(RegionCode::us()));
    assert!(phone_util.is_supported_region(RegionCode::fr()));
    // "001" is not a region, and "ZZ" is nothing at all.
    assert!(!phone_util.is_supported_region(RegionCode::un001()));
    assert!(!phone_util.is_supported_region(RegionCode::zz()));
}

#[test]
fn get_supported_calling_codes() {
    let phone_util = get_phone_util();
    let calling_codes: Vec<i32> = phone_util.get_supported_calling_codes().collect();
    assert!(!calling_codes.is_empty());
    for &code in &calling_codes {
        assert!(code > 0);
    }
    assert!(calling_codes.contains(&1));
    assert!(calling_codes.contains(&979));

    let global_network_codes: Vec<i32> = phone_util
        .get_supported_global_network_calling_codes()
        .collect();
    assert!(!global_network_codes.is_empty());
    assert!(calling_codes.len() > global_network_codes.len());
    for &code in &global_network_codes {
        assert_eq!(
            RegionCode::un001(),
            phone_util.get_region_code_for_country_code(code)
        );
    }
}

#[test]
fn get_region_codes_for_country_calling_code() {
    let phone_util = get_phone_util();

    let regions = phone_util
        .get_region_codes_for_country_calling_code(1)
        .expect("NANPA should be known");
    assert_eq!(Some(&RegionCode::us()), regions.first());
    assert!(regions.contains(&RegionCode::bs()));

    let regions = phone_util
        .get_region_codes_for_country_calling_code(44)
        .expect("44 should be known");
    assert!(regions.contains(&RegionCode::gb()));

    let regions = phone_util
        .get_region_codes_for_country_calling_code(800)
        .expect("800 should be known");
    assert_eq!(1, regions.len());
    assert_eq!(RegionCode::un001(), regions[0]);

    const INVALID_COUNTRY_CODE: i32 = 2;
    assert!(phone_util
        .get_region_codes_for_country_calling_code(INVALID_COUNTRY_CODE)
        .is_none());
}

#[test]
fn get_region_code_for_country_code() {
    let phone_util = get_phone_util();
    assert_eq!(RegionCode::us(), phone_util.get_region_code_for_country_code(1));
    assert_eq!(RegionCode::gb(), phone_util.get_region_code_for_country_code(44));
    assert_eq!(RegionCode::de(), phone_util.get_region_code_for_country_code(49));
    assert_eq!(
        RegionCode::un001(),
        phone_util.get_region_code_for_country_code(800)
    );
    assert_eq!(RegionCode::zz(), phone_util.get_region_code_for_country_code(2));
}

#[test]
fn get_instance_load_us_metadata() {
    let phone_util = get_phone_util();
    let metadata = phone_util
        .get_metadata_for_region(RegionCode::us())
        .expect("US record should materialize");
    assert_eq!("US", metadata.id());
    assert_eq!(1, metadata.country_code());
    assert_eq!("011", metadata.international_prefix());
    assert!(metadata.has_national_prefix());
    assert!(metadata.main_country_for_code());
    assert_eq!(2, metadata.number_format.len());
    assert_eq!(
        "(\\d{3})(\\d{3})(\\d{4})",
        metadata.number_format[1].pattern()
    );
    assert_eq!("$1 $2 $3", metadata.number_format[1].format());
    assert_eq!(
        "[13-689]\\d{9}|2[0-35-9]\\d{8}",
        metadata.general_desc.national_number_pattern()
    );
    assert_eq!("900\\d{7}", metadata.premium_rate.national_number_pattern());
    // The "NA" sentinel is scrubbed at materialization time.
    assert!(!metadata.shared_cost.has_national_number_pattern());
    assert!(!metadata.shared_cost.has_possible_number_pattern());
}

#[test]
fn metadata_is_cached_after_first_touch() {
    let phone_util = get_phone_util();
    let first = phone_util
        .get_metadata_for_region(RegionCode::gb())
        .expect("GB record should materialize");
    let second = phone_util
        .get_metadata_for_region(RegionCode::gb())
        .expect("GB record is cached");
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn metadata_lookup_degrades_to_absent() {
    let phone_util = get_phone_util();
    // Unsupported region: never touches the filesystem.
    assert!(phone_util.get_metadata_for_region(RegionCode::zz()).is_none());
    // Supported region without a record file.
    assert!(phone_util.get_metadata_for_region(RegionCode::fr()).is_none());
    // Supported region with a malformed record file.
    assert!(phone_util.get_metadata_for_region(RegionCode::jp()).is_none());
    // Non-geographical lookup of a geographic code.
    assert!(phone_util.get_metadata_for_non_geographical_region(44).is_none());
    assert!(phone_util.get_metadata_for_non_geographical_region(800).is_some());
}

#[test]
fn country_code_index_and_metadata_agree() {
    let phone_util = get_phone_util();
    for region in [
        RegionCode::us(),
        RegionCode::bs(),
        RegionCode::it(),
        RegionCode::gb(),
        RegionCode::de(),
        RegionCode::nz(),
        RegionCode::ar(),
    ] {
        let country_code = phone_util
            .get_country_code_for_region(region)
            .expect("record should materialize");
        let regions = phone_util
            .get_region_codes_for_country_calling_code(country_code)
            .expect("calling code should be in the index");
        assert!(regions.contains(&region), "{} not listed for {}", region, country_code);
    }
    // Exactly the head of a shared-code list is flagged as main.
    let us_metadata = phone_util.get_metadata_for_region(RegionCode::us()).unwrap();
    assert!(us_metadata.main_country_for_code());
    let bs_metadata = phone_util.get_metadata_for_region(RegionCode::bs()).unwrap();
    assert!(!bs_metadata.main_country_for_code());

    assert!(phone_util.get_country_code_for_region(RegionCode::zz()).is_none());
}

#[test]
fn is_nanpa_country() {
    let phone_util = get_phone_util();
    assert!(phone_util.is_nanpa_country(RegionCode::us()));
    assert!(phone_util.is_nanpa_country(RegionCode::bs()));
    assert!(!phone_util.is_nanpa_country(RegionCode::de()));
}

#[test]
fn get_national_significant_number() {
    let mut number = PhoneNumber::new();
    number.set_country_code(1);
    number.set_national_number(6502530000);
    assert_eq!(
        "6502530000",
        PhoneNumberUtil::get_national_significant_number(&number)
    );

    // An Italian mobile number.
    number.clear();
    number.set_country_code(39);
    number.set_national_number(312345678);
    assert_eq!(
        "312345678",
        PhoneNumberUtil::get_national_significant_number(&number)
    );

    // An Italian fixed-line number: the leading zero is part of the number.
    number.clear();
    number.set_country_code(39);
    number.set_national_number(236618300);
    number.set_italian_leading_zero(true);
    assert_eq!(
        "0236618300",
        PhoneNumberUtil::get_national_significant_number(&number)
    );

    number.clear();
    number.set_country_code(800);
    number.set_national_number(12345678);
    assert_eq!(
        "12345678",
        PhoneNumberUtil::get_national_significant_number(&number)
    );
}

#[test]
fn is_viable_phone_number() {
    let phone_util = get_phone_util();
    // Only one or two digits before possible punctuation.
    assert!(!phone_util.is_viable_phone_number("12"));
    assert!(!phone_util.is_viable_phone_number("1+1+1"));
    assert!(phone_util.is_viable_phone_number("1-800-MICROSOFT"));
    assert!(phone_util.is_viable_phone_number("+41 44 668 1800"));
    assert!(phone_util.is_viable_phone_number("(650) 253-0000"));
    assert!(phone_util.is_viable_phone_number("\u{FF11}\u{FF12}\u{FF13}"));
    // Alpha and extension data are permitted after the required digits.
    assert!(phone_util.is_viable_phone_number("0800 DA SIEGE"));
    assert!(phone_util.is_viable_phone_number("1234567 ext. 89"));
    assert!(!phone_util.is_viable_phone_number("This is not a phone number"));
    assert!(!phone_util.is_viable_phone_number(""));
}

#[test]
fn normalise_remove_punctuation() {
    let phone_util = get_phone_util();
    let mut input_number = "034-56&+#2\u{AD}34".to_string();
    phone_util.normalize(&mut input_number);
    assert_eq!(
        "03456234", input_number,
        "Conversion did not correctly remove punctuation"
    );
}

#[test]
fn normalise_replace_alpha_characters() {
    let phone_util = get_phone_util();
    let mut input_number = "034-I-am-HUNGRY".to_string();
    phone_util.normalize(&mut input_number);
    assert_eq!(
        "034426486479", input_number,
        "Conversion did not correctly replace alpha characters"
    );

    let mut vanity_number = "1-800-MICROSOFT".to_string();
    phone_util.normalize(&mut vanity_number);
    assert_eq!("1800642767638", vanity_number);
}

#[test]
fn normalise_other_digits() {
    let phone_util = get_phone_util();
    // Full-width 1, 2, 3.
    assert_eq!(
        "123",
        phone_util.normalize_digits_only("\u{FF11}\u{FF12}\u{FF13}")
    );
    // Arabic-Indic 1, 2, 3.
    assert_eq!(
        "123",
        phone_util.normalize_digits_only("\u{0661}\u{0662}\u{0663}")
    );
    // Extended Arabic-Indic mixed with ASCII.
    assert_eq!(
        "1239",
        phone_util.normalize_digits_only("1\u{06F2}3\u{06F9}")
    );
    assert_eq!("", phone_util.normalize_digits_only("abc-def"));
}

#[test]
fn normalize_digits_only_is_idempotent() {
    let phone_util = get_phone_util();
    for input in ["\u{FF11}\u{FF12}\u{FF13}", "(650) 253-0000", "١٢٣٤٥٦٧", ""] {
        let once = phone_util.normalize_digits_only(input);
        let twice = phone_util.normalize_digits_only(&once);
        assert_eq!(once, twice);
    }
}

#[test]
fn maybe_strip_extension() {
    let phone_util = get_phone_util();

    let mut number = "1234576 ext. 1234".to_string();
    assert_eq!(
        Some("1234".to_string()),
        phone_util.maybe_strip_extension(&mut number)
    );
    assert_eq!("1234576", number);

    let mut number = "1234567;ext=89".to_string();
    assert_eq!(
        Some("89".to_string()),
        phone_util.maybe_strip_extension(&mut number)
    );
    assert_eq!("1234567", number);

    // The trailing North-American form.
    let mut number = "1234567-89#".to_string();
    assert_eq!(
        Some("89".to_string()),
        phone_util.maybe_strip_extension(&mut number)
    );
    assert_eq!("1234567", number);

    let mut number = "1234567 x 2345678".to_string();
    assert_eq!(
        Some("2345678".to_string()),
        phone_util.maybe_strip_extension(&mut number)
    );
    assert_eq!("1234567", number);

    // No extension present: the number is left untouched.
    let mut number = "1234567".to_string();
    assert_eq!(None, phone_util.maybe_strip_extension(&mut number));
    assert_eq!("1234567", number);

    // What remains would not be viable, so nothing is stripped.
    let mut number = "ext. 123".to_string();
    assert_eq!(None, phone_util.maybe_strip_extension(&mut number));
    assert_eq!("ext. 123", number);
}

#[test]
fn is_alpha_number() {
    let phone_util = get_phone_util();
    assert!(phone_util.is_alpha_number("1800 six-flags"));
    assert!(phone_util.is_alpha_number("1800 six-flags ext. 1234"));
    assert!(!phone_util.is_alpha_number("1800 123-1234"));
    assert!(!phone_util.is_alpha_number("1 six-flags"));
    assert!(!phone_util.is_alpha_number("1800 123-1234 extension: 1234"));
}

#[test]
fn get_region_code_for_number() {
    let phone_util = get_phone_util();

    let number = us_number(6502530000);
    assert_eq!(Some(RegionCode::us()), phone_util.get_region_code_for_number(&number));

    // A Bahamian number shares the calling code 1; the main region does not
    // claim it, so the scan continues down the list until the Bahamian
    // leading-digits pattern does.
    let number = us_number(2423651234);
    assert_eq!(Some(RegionCode::bs()), phone_util.get_region_code_for_number(&number));

    let mut number = PhoneNumber::new();
    number.set_country_code(44);
    number.set_national_number(7912345678);
    assert_eq!(Some(RegionCode::gb()), phone_util.get_region_code_for_number(&number));

    // Non-geographical numbers resolve to "001".
    let mut number = PhoneNumber::new();
    number.set_country_code(800);
    number.set_national_number(12345678);
    assert_eq!(
        Some(RegionCode::un001()),
        phone_util.get_region_code_for_number(&number)
    );

    // An unknown country calling code.
    let mut number = PhoneNumber::new();
    number.set_country_code(2);
    number.set_national_number(12345678);
    assert_eq!(None, phone_util.get_region_code_for_number(&number));

    // A NANPA number no region claims.
    let number = us_number(2530000);
    assert_eq!(None, phone_util.get_region_code_for_number(&number));
}

#[test]
fn get_number_type() {
    let phone_util = get_phone_util();

    assert_eq!(
        PhoneNumberType::PremiumRate,
        phone_util.get_number_type(&us_number(9002530000))
    );
    assert_eq!(
        PhoneNumberType::TollFree,
        phone_util.get_number_type(&us_number(8002530000))
    );
    // US fixed-line and mobile patterns are declared identical.
    assert_eq!(
        PhoneNumberType::FixedLineOrMobile,
        phone_util.get_number_type(&us_number(6502530000))
    );

    let mut it_number = PhoneNumber::new();
    it_number.set_country_code(39);
    it_number.set_national_number(236618300);
    it_number.set_italian_leading_zero(true);
    assert_eq!(PhoneNumberType::FixedLine, phone_util.get_number_type(&it_number));

    let mut gb_mobile = PhoneNumber::new();
    gb_mobile.set_country_code(44);
    gb_mobile.set_national_number(7912345678);
    assert_eq!(PhoneNumberType::Mobile, phone_util.get_number_type(&gb_mobile));

    let mut nz_mobile = PhoneNumber::new();
    nz_mobile.set_country_code(64);
    nz_mobile.set_national_number(211234567);
    assert_eq!(PhoneNumberType::Mobile, phone_util.get_number_type(&nz_mobile));

    let mut non_geo = PhoneNumber::new();
    non_geo.set_country_code(800);
    non_geo.set_national_number(12345678);
    assert_eq!(PhoneNumberType::TollFree, phone_util.get_number_type(&non_geo));

    assert_eq!(
        PhoneNumberType::Unknown,
        phone_util.get_number_type(&us_number(2530000))
    );
}

#[test]
fn number_type_ladder_ignores_emergency() {
    let phone_util = get_phone_util();
    // Brazilian-style short-number metadata: toll-free and emergency share
    // the three-digit space, but emergency is not part of the public
    // taxonomy and must never surface from the classifier.
    let mut metadata = PhoneMetadata::default();
    metadata.id = "BR".to_owned();
    metadata.same_mobile_and_fixed_line_pattern = true;
    metadata.general_desc.national_number_pattern = Some(r"1\d{2}".to_owned());
    metadata.general_desc.possible_number_pattern = Some(r"\d{3}".to_owned());
    metadata.toll_free.national_number_pattern = Some("1(?:00|81)".to_owned());
    metadata.toll_free.possible_number_pattern = Some(r"\d{3}".to_owned());
    metadata.emergency.national_number_pattern = Some("190".to_owned());
    metadata.emergency.possible_number_pattern = Some(r"\d{3}".to_owned());

    assert_eq!(
        PhoneNumberType::TollFree,
        phone_util.get_number_type_helper("181", &metadata)
    );
    assert_eq!(
        PhoneNumberType::Unknown,
        phone_util.get_number_type_helper("190", &metadata)
    );
}

#[test]
fn na_sentinel_never_matches() {
    let phone_util = get_phone_util();
    // A record that dodged materialization still cannot match anything: the
    // literal pattern "NA" matches no digit string.
    let mut metadata = PhoneMetadata::default();
    metadata.id = "BR".to_owned();
    metadata.general_desc.national_number_pattern = Some("NA".to_owned());
    metadata.general_desc.possible_number_pattern = Some("NA".to_owned());
    assert_eq!(
        PhoneNumberType::Unknown,
        phone_util.get_number_type_helper("181", &metadata)
    );
}

#[test]
fn is_valid_number() {
    let phone_util = get_phone_util();
    assert!(phone_util.is_valid_number(&us_number(6502530000)));
    assert!(phone_util.is_valid_number(&us_number(8002530000)));

    let mut it_number = PhoneNumber::new();
    it_number.set_country_code(39);
    it_number.set_national_number(236618300);
    it_number.set_italian_leading_zero(true);
    assert!(phone_util.is_valid_number(&it_number));

    let mut gb_mobile = PhoneNumber::new();
    gb_mobile.set_country_code(44);
    gb_mobile.set_national_number(7912345678);
    assert!(phone_util.is_valid_number(&gb_mobile));

    let mut non_geo = PhoneNumber::new();
    non_geo.set_country_code(800);
    non_geo.set_national_number(12345678);
    assert!(phone_util.is_valid_number(&non_geo));
}

#[test]
fn is_not_valid_number() {
    let phone_util = get_phone_util();
    // Seven digits match the US length sieve but not the full pattern.
    assert!(!phone_util.is_valid_number(&us_number(2530000)));

    // The Italian number without its leading zero is a different, invalid
    // number.
    let mut it_number = PhoneNumber::new();
    it_number.set_country_code(39);
    it_number.set_national_number(236618300);
    assert!(!phone_util.is_valid_number(&it_number));

    let mut unknown_code = PhoneNumber::new();
    unknown_code.set_country_code(2);
    unknown_code.set_national_number(12345678);
    assert!(!phone_util.is_valid_number(&unknown_code));

    let mut non_geo = PhoneNumber::new();
    non_geo.set_country_code(800);
    non_geo.set_national_number(123456789);
    assert!(!phone_util.is_valid_number(&non_geo));
}

#[test]
fn is_valid_number_for_region() {
    let phone_util = get_phone_util();
    let number = us_number(6502530000);
    assert!(phone_util.is_valid_number_for_region(&number, RegionCode::us()));
    // Valid number, wrong region.
    assert!(!phone_util.is_valid_number_for_region(&number, RegionCode::gb()));
    // Regions we have no record for are never valid.
    assert!(!phone_util.is_valid_number_for_region(&number, RegionCode::fr()));
    assert!(!phone_util.is_valid_number_for_region(&number, RegionCode::zz()));

    let mut bs_number = PhoneNumber::new();
    bs_number.set_country_code(1);
    bs_number.set_national_number(2423651234);
    assert!(phone_util.is_valid_number_for_region(&bs_number, RegionCode::bs()));
    assert!(!phone_util.is_valid_number_for_region(&bs_number, RegionCode::us()));
}

#[test]
fn validation_falls_back_to_itu_length_range() {
    let phone_util = get_phone_util();
    // The Argentinian record deliberately carries no general pattern, so
    // only the ITU length range [3, 15] applies.
    let mut ar_number = PhoneNumber::new();
    ar_number.set_country_code(54);
    ar_number.set_national_number(12345678);
    assert!(phone_util.is_valid_number(&ar_number));

    ar_number.set_national_number(123);
    assert!(phone_util.is_valid_number(&ar_number));

    ar_number.set_national_number(12);
    assert!(!phone_util.is_valid_number(&ar_number));

    ar_number.set_national_number(1234567890123456);
    assert!(!phone_util.is_valid_number(&ar_number));
}

#[test]
fn is_possible_number() {
    let phone_util = get_phone_util();
    assert!(phone_util.is_possible_number(&us_number(6502530000)));
    // Local-length US numbers are possible even though they are not valid.
    assert!(phone_util.is_possible_number(&us_number(2530000)));

    assert!(phone_util.is_possible_number_for_string("+1 650 253 0000", RegionCode::us()));
    assert!(phone_util.is_possible_number_for_string("253-0000", RegionCode::us()));
    assert!(!phone_util.is_possible_number_for_string("not a number", RegionCode::us()));
}

#[test]
fn is_possible_number_with_reason() {
    let phone_util = get_phone_util();

    assert_eq!(
        Ok(()),
        phone_util.is_possible_number_with_reason(&us_number(6502530000))
    );
    assert_eq!(
        Ok(()),
        phone_util.is_possible_number_with_reason(&us_number(2530000))
    );
    assert_eq!(
        Err(ValidationError::TooShort),
        phone_util.is_possible_number_with_reason(&us_number(253000))
    );
    assert_eq!(
        Err(ValidationError::TooLong),
        phone_util.is_possible_number_with_reason(&us_number(65025300000))
    );

    let mut number = PhoneNumber::new();
    number.set_country_code(0);
    number.set_national_number(2530000);
    assert_eq!(
        Err(ValidationError::InvalidCountryCode),
        phone_util.is_possible_number_with_reason(&number)
    );
    number.set_country_code(2);
    assert_eq!(
        Err(ValidationError::InvalidCountryCode),
        phone_util.is_possible_number_with_reason(&number)
    );
}

#[test]
fn valid_implies_possible() {
    let phone_util = get_phone_util();
    let mut it_number = PhoneNumber::new();
    it_number.set_country_code(39);
    it_number.set_national_number(236618300);
    it_number.set_italian_leading_zero(true);
    let mut non_geo = PhoneNumber::new();
    non_geo.set_country_code(800);
    non_geo.set_national_number(12345678);
    for number in [
        us_number(6502530000),
        us_number(8002530000),
        it_number,
        non_geo,
    ] {
        assert!(phone_util.is_valid_number(&number));
        assert_eq!(Ok(()), phone_util.is_possible_number_with_reason(&number));
    }
}

#[test]
fn can_be_internationally_dialled() {
    let phone_util = get_phone_util();
    // US toll-free numbers are marked no-international-dialling in the test
    // records.
    assert!(!phone_util.can_be_internationally_dialled(&us_number(8002530000)));
    assert!(phone_util.can_be_internationally_dialled(&us_number(6502530000)));
    // Unclassifiable numbers and non-geographical entities are assumed
    // diallable.
    assert!(phone_util.can_be_internationally_dialled(&us_number(2530000)));
    let mut non_geo = PhoneNumber::new();
    non_geo.set_country_code(800);
    non_geo.set_national_number(12345678);
    assert!(phone_util.can_be_internationally_dialled(&non_geo));
}

#[test]
fn get_supported_types_for_region() {
    let phone_util = get_phone_util();
    let types = phone_util
        .get_supported_types_for_region(RegionCode::us())
        .expect("region should exist");
    assert!(types.contains(&PhoneNumberType::FixedLine));
    assert!(types.contains(&PhoneNumberType::Mobile));
    assert!(types.contains(&PhoneNumberType::TollFree));
    assert!(types.contains(&PhoneNumberType::PremiumRate));
    // Scrubbed "NA" descriptors carry no data.
    assert!(!types.contains(&PhoneNumberType::SharedCost));
    assert!(!types.contains(&PhoneNumberType::FixedLineOrMobile));
    assert!(!types.contains(&PhoneNumberType::Unknown));

    assert!(phone_util
        .get_supported_types_for_region(RegionCode::zz())
        .is_none());
}

#[test]
fn get_supported_types_for_non_geo_entity() {
    let phone_util = get_phone_util();
    assert!(phone_util.get_supported_types_for_non_geo_entity(999).is_none());

    let types = phone_util
        .get_supported_types_for_non_geo_entity(800)
        .expect("code should exist");
    assert!(types.contains(&PhoneNumberType::TollFree));
    assert!(!types.contains(&PhoneNumberType::Mobile));
}

#[test]
fn get_ndd_prefix_for_region() {
    let phone_util = get_phone_util();
    assert_eq!(
        Some("1".to_string()),
        phone_util.get_ndd_prefix_for_region(RegionCode::us(), false)
    );
    assert_eq!(
        Some("0".to_string()),
        phone_util.get_ndd_prefix_for_region(RegionCode::gb(), false)
    );
    assert_eq!(None, phone_util.get_ndd_prefix_for_region(RegionCode::zz(), false));
}

#[test]
fn format_us_number() {
    let phone_util = get_phone_util();
    let number = us_number(6502530000);
    assert_eq!(
        "650 253 0000",
        phone_util.format(&number, PhoneNumberFormat::National)
    );
    assert_eq!(
        "+1 650 253 0000",
        phone_util.format(&number, PhoneNumberFormat::International)
    );
    assert_eq!(
        "+16502530000",
        phone_util.format(&number, PhoneNumberFormat::E164)
    );
    assert_eq!(
        "tel:+1-650-253-0000",
        phone_util.format(&number, PhoneNumberFormat::RFC3966)
    );
}

#[test]
fn format_gb_number() {
    let phone_util = get_phone_util();
    let mut number = PhoneNumber::new();
    number.set_country_code(44);
    number.set_national_number(2087389353);
    assert_eq!(
        "(020) 8738 9353",
        phone_util.format(&number, PhoneNumberFormat::National)
    );
    assert_eq!(
        "+44 20 8738 9353",
        phone_util.format(&number, PhoneNumberFormat::International)
    );

    number.set_national_number(7912345678);
    assert_eq!(
        "(07912) 345 678",
        phone_util.format(&number, PhoneNumberFormat::National)
    );
    assert_eq!(
        "+44 7912 345 678",
        phone_util.format(&number, PhoneNumberFormat::International)
    );
}

#[test]
fn format_it_number_keeps_leading_zero() {
    let phone_util = get_phone_util();
    let mut number = PhoneNumber::new();
    number.set_country_code(39);
    number.set_national_number(236618300);
    number.set_italian_leading_zero(true);
    assert_eq!(
        "02 3661 8300",
        phone_util.format(&number, PhoneNumberFormat::National)
    );
    assert_eq!(
        "+39 02 3661 8300",
        phone_util.format(&number, PhoneNumberFormat::International)
    );
    assert_eq!(
        "+390236618300",
        phone_util.format(&number, PhoneNumberFormat::E164)
    );
}

#[test]
fn format_nz_number_applies_national_prefix_rule() {
    let phone_util = get_phone_util();
    let mut number = PhoneNumber::new();
    number.set_country_code(64);
    number.set_national_number(33316005);
    assert_eq!(
        "03-331 6005",
        phone_util.format(&number, PhoneNumberFormat::National)
    );
    assert_eq!(
        "+64 3-331 6005",
        phone_util.format(&number, PhoneNumberFormat::International)
    );
}

#[test]
fn format_number_with_extension() {
    let phone_util = get_phone_util();
    let mut number = us_number(6502530000);
    number.set_extension("4567".to_owned());
    assert_eq!(
        "650 253 0000 ext. 4567",
        phone_util.format(&number, PhoneNumberFormat::National)
    );
    assert_eq!(
        "tel:+1-650-253-0000;ext=4567",
        phone_util.format(&number, PhoneNumberFormat::RFC3966)
    );
    // Extensions are never rendered in E164.
    assert_eq!(
        "+16502530000",
        phone_util.format(&number, PhoneNumberFormat::E164)
    );
}

#[test]
fn format_number_with_unknown_country_code() {
    let phone_util = get_phone_util();
    let mut number = PhoneNumber::new();
    number.set_country_code(2);
    number.set_national_number(12345678);
    // Formatting degrades to the plain national significant number.
    assert_eq!(
        "12345678",
        phone_util.format(&number, PhoneNumberFormat::National)
    );
    assert_eq!(
        "+212345678",
        phone_util.format(&number, PhoneNumberFormat::E164)
    );
}

#[test]
fn format_national_number_with_carrier_code() {
    let phone_util = get_phone_util();
    let mut number = PhoneNumber::new();
    number.set_country_code(54);
    number.set_national_number(2912345678);
    assert_eq!(
        "29 1234-5678",
        phone_util.format(&number, PhoneNumberFormat::National)
    );
    assert_eq!(
        "029 15 1234-5678",
        phone_util.format_national_number_with_carrier_code(&number, "15")
    );
    // An empty carrier code leaves the plain national format.
    assert_eq!(
        "29 1234-5678",
        phone_util.format_national_number_with_carrier_code(&number, "")
    );

    // The carrier code stored on the number wins over the fallback.
    number.set_preferred_domestic_carrier_code("19".to_owned());
    assert_eq!(
        "029 19 1234-5678",
        phone_util.format_national_number_with_preferred_carrier_code(&number, "15")
    );
}

#[test]
fn parse_national_number() {
    let phone_util = get_phone_util();
    let mut nz_number = PhoneNumber::new();
    nz_number.set_country_code(64);
    nz_number.set_national_number(33316005);

    let test_number = phone_util
        .parse("033316005", RegionCode::nz())
        .expect("should parse");
    assert_eq!(nz_number, test_number);
    assert_eq!(
        CountryCodeSource::FromDefaultCountry,
        test_number.country_code_source()
    );

    // National prefix missing but the number is still recognizable.
    let test_number = phone_util
        .parse("33316005", RegionCode::nz())
        .expect("should parse");
    assert_eq!(nz_number, test_number);

    // National prefix and formatting.
    let test_number = phone_util
        .parse("03 331 6005", RegionCode::nz())
        .expect("should parse");
    assert_eq!(nz_number, test_number);

    let test_number = phone_util
        .parse("(650) 253-0000", RegionCode::us())
        .expect("should parse");
    assert_eq!(us_number(6502530000), test_number);
}

#[test]
fn parse_number_with_international_prefix() {
    let phone_util = get_phone_util();

    let mut expected = PhoneNumber::new();
    expected.set_country_code(64);
    expected.set_national_number(33316005);
    expected.set_country_code_source(CountryCodeSource::FromNumberWithPlusSign);
    let test_number = phone_util
        .parse("+64 3 331 6005", RegionCode::us())
        .expect("should parse");
    assert_eq!(expected, test_number);

    expected.set_country_code_source(CountryCodeSource::FromNumberWithIdd);
    let test_number = phone_util
        .parse("0064 3 331 6005", RegionCode::nz())
        .expect("should parse");
    assert_eq!(expected, test_number);

    // A US number dialled from within the US with its country code but no
    // plus sign.
    let test_number = phone_util
        .parse("16502530000", RegionCode::us())
        .expect("should parse");
    let mut expected = us_number(6502530000);
    expected.set_country_code_source(CountryCodeSource::FromNumberWithoutPlusSign);
    assert_eq!(expected, test_number);

    // Parsing through the US IDD.
    let test_number = phone_util
        .parse("011 44 2087389353", RegionCode::us())
        .expect("should parse");
    let mut expected = PhoneNumber::new();
    expected.set_country_code(44);
    expected.set_national_number(2087389353);
    expected.set_country_code_source(CountryCodeSource::FromNumberWithIdd);
    assert_eq!(expected, test_number);

    // Full-width plus sign.
    let test_number = phone_util
        .parse("\u{FF0B}1 (650) 253-0000", RegionCode::get_unknown())
        .expect("should parse");
    let mut expected = us_number(6502530000);
    expected.set_country_code_source(CountryCodeSource::FromNumberWithPlusSign);
    assert_eq!(expected, test_number);
}

#[test]
fn parse_italian_leading_zero() {
    let phone_util = get_phone_util();
    let test_number = phone_util
        .parse("02 3661 8300", RegionCode::it())
        .expect("should parse");
    let mut expected = PhoneNumber::new();
    expected.set_country_code(39);
    expected.set_national_number(236618300);
    expected.set_italian_leading_zero(true);
    assert_eq!(expected, test_number);
    // And the classifier sees the zero again.
    assert_eq!(
        "0236618300",
        PhoneNumberUtil::get_national_significant_number(&test_number)
    );

    let test_number = phone_util
        .parse("312 345 678", RegionCode::it())
        .expect("should parse");
    let mut expected = PhoneNumber::new();
    expected.set_country_code(39);
    expected.set_national_number(312345678);
    assert_eq!(expected, test_number);
}

#[test]
fn parse_non_geographical_number() {
    let phone_util = get_phone_util();
    let test_number = phone_util
        .parse("+800 1234 5678", RegionCode::us())
        .expect("should parse");
    let mut expected = PhoneNumber::new();
    expected.set_country_code(800);
    expected.set_national_number(12345678);
    expected.set_country_code_source(CountryCodeSource::FromNumberWithPlusSign);
    assert_eq!(expected, test_number);
    assert!(phone_util.is_valid_number(&test_number));
}

#[test]
fn parse_vanity_number() {
    let phone_util = get_phone_util();
    let test_number = phone_util
        .parse("1-800-FLOWERS", RegionCode::us())
        .expect("should parse");
    let mut expected = us_number(8003569377);
    expected.set_country_code_source(CountryCodeSource::FromNumberWithoutPlusSign);
    assert_eq!(expected, test_number);
    assert_eq!(PhoneNumberType::TollFree, phone_util.get_number_type(&test_number));
}

#[test]
fn parse_extensions() {
    let phone_util = get_phone_util();
    let mut nz_number = PhoneNumber::new();
    nz_number.set_country_code(64);
    nz_number.set_national_number(33316005);
    nz_number.set_extension("3456".to_owned());

    let test_number = phone_util
        .parse("03 331 6005 ext 3456", RegionCode::nz())
        .expect("should parse");
    assert_eq!(nz_number, test_number);

    let test_number = phone_util
        .parse("03 331 6005 #3456", RegionCode::nz())
        .expect("should parse");
    assert_eq!(nz_number, test_number);

    let test_number = phone_util
        .parse("03 331 6005;ext=3456", RegionCode::nz())
        .expect("should parse");
    assert_eq!(nz_number, test_number);

    // An ambiguous "x" label with the maximum seven digits.
    let test_number = phone_util
        .parse("(800) 901-3355 x 7246433", RegionCode::us())
        .expect("should parse");
    let mut expected = us_number(8009013355);
    expected.set_extension("7246433".to_owned());
    assert_eq!(expected, test_number);

    // Two extension markers: everything from the second number on is cut.
    let test_number = phone_util
        .parse("(530) 583-6985 x302/x2303", RegionCode::us())
        .expect("should parse");
    let mut expected = us_number(5305836985);
    expected.set_extension("302".to_owned());
    assert_eq!(expected, test_number);
}

#[test]
fn failed_parse_on_invalid_numbers() {
    let phone_util = get_phone_util();

    assert_eq!(
        Err(ParseError::NotANumber),
        phone_util.parse("This is not a phone number", RegionCode::nz())
    );
    assert_eq!(
        Err(ParseError::NotANumber),
        phone_util.parse("01", RegionCode::nz())
    );
    assert_eq!(
        Err(ParseError::InvalidCountryCode),
        phone_util.parse("123 456 7890", RegionCode::get_unknown())
    );
    assert_eq!(
        Err(ParseError::InvalidCountryCode),
        phone_util.parse("123 456 7890", RegionCode::un001())
    );
    assert_eq!(
        Err(ParseError::TooLongNsn),
        phone_util.parse("01495 72553301873 810104", RegionCode::gb())
    );
    assert_eq!(
        Err(ParseError::TooShortAfterIdd),
        phone_util.parse("011", RegionCode::us())
    );
    assert_eq!(
        Err(ParseError::TooShortNsn),
        phone_util.parse("+64 12", RegionCode::nz())
    );
    // A plus sign with an unknown country calling code.
    assert_eq!(
        Err(ParseError::InvalidCountryCode),
        phone_util.parse("+02366", RegionCode::get_unknown())
    );
}

#[test]
fn parse_with_unsupported_region_needs_plus_sign() {
    let phone_util = get_phone_util();
    // With a plus sign the default region does not matter.
    let test_number = phone_util
        .parse("+44 7912 345 678", RegionCode::get_unknown())
        .expect("should parse");
    assert_eq!(44, test_number.country_code());
    assert_eq!(7912345678, test_number.national_number());
}

#[test]
fn is_number_match() {
    let phone_util = get_phone_util();

    let mut first = PhoneNumber::new();
    first.set_country_code(64);
    first.set_national_number(33316005);
    let second = first.clone();
    assert_eq!(MatchType::ExactMatch, phone_util.is_number_match(&first, &second));

    // Differing only by extension.
    let mut with_extension = first.clone();
    with_extension.set_extension("3456".to_owned());
    assert_eq!(
        MatchType::ShortNsnMatch,
        phone_util.is_number_match(&first, &with_extension)
    );

    // Conflicting extensions.
    let mut other_extension = first.clone();
    other_extension.set_extension("7890".to_owned());
    assert_eq!(
        MatchType::NoMatch,
        phone_util.is_number_match(&with_extension, &other_extension)
    );

    // One side has no country code.
    let mut nsn_only = PhoneNumber::new();
    nsn_only.set_national_number(6502530000);
    assert_eq!(
        MatchType::NsnMatch,
        phone_util.is_number_match(&nsn_only, &us_number(6502530000))
    );

    // A shorter variant of the same number.
    assert_eq!(
        MatchType::ShortNsnMatch,
        phone_util.is_number_match(&us_number(6502530000), &us_number(2530000))
    );

    assert_eq!(
        MatchType::NoMatch,
        phone_util.is_number_match(&us_number(6502530000), &us_number(6502530001))
    );

    // The parse-driven string form.
    assert_eq!(
        MatchType::ExactMatch,
        phone_util.is_number_match_for_strings("+64 3 331 6005", "+64 03 331 6005")
    );
    assert_eq!(
        MatchType::NotANumber,
        phone_util.is_number_match_for_strings("asdfghjkl", "+64 3 331 6005")
    );
}

#[test]
fn country_code_source_is_preserved_in_equality() {
    let phone_util = get_phone_util();
    let plus_parsed = phone_util
        .parse("+64 3 331 6005", RegionCode::nz())
        .expect("should parse");
    let national_parsed = phone_util
        .parse("03 331 6005", RegionCode::nz())
        .expect("should parse");
    // Same number, different provenance: full equality distinguishes them,
    // the matcher does not.
    assert_ne!(plus_parsed, national_parsed);
    assert_eq!(
        MatchType::ExactMatch,
        phone_util.is_number_match(&plus_parsed, &national_parsed)
    );
}
