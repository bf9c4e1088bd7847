mod generated;
mod interfaces;
mod metadata;
mod phonenumber;
mod phonenumberutil;
mod regexp_cache;
mod regex_based_matcher;
pub mod i18n;
pub(crate) mod regex_util;

/// I decided to create this module because there are many
/// boilerplate places in the code that can be replaced with macros,
/// the name of which will describe what is happening more
/// clearly than a few lines of code.
mod macros;

#[cfg(test)]
mod tests;

pub use metadata::{FileMetadataStore, NumberFormat, PhoneMetadata, PhoneNumberDesc};
pub use phonenumber::{CountryCodeSource, PhoneNumber};
pub use phonenumberutil::{
    MatchType, ParseError, PhoneNumberFormat, PhoneNumberType, PhoneNumberUtil, ValidationError,
};
pub use regexp_cache::InvalidRegexError;
