mod enums;
mod errors;
mod helper_constants;
mod helper_functions;
mod phone_number_regexps_and_mappings;
mod phonenumberutil;

pub use enums::{MatchType, PhoneNumberFormat, PhoneNumberType};
pub use errors::{ParseError, ValidationError};
pub use phonenumberutil::PhoneNumberUtil;
