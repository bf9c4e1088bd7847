mod loader;
mod model;

pub use loader::FileMetadataStore;
pub use model::{NumberFormat, PhoneMetadata, PhoneNumberDesc};
