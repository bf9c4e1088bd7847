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

use std::{fs, path::PathBuf, sync::Arc};

use dashmap::DashMap;
use log::warn;

use super::model::PhoneMetadata;

/// Pattern sentinel meaning "no numbers of this type exist for this region".
const NO_NUMBERS_DATA: &str = "NA";

/// Lazy, memoizing store of materialized per-region metadata records.
///
/// A record with key `K` lives in the file `<file_prefix>_<K>.json`, where
/// `K` is a region code for geographical metadata or a country calling code
/// for non-geographical metadata. The first lookup of a key reads and
/// materializes the record; every later lookup returns the cached instance.
/// A key whose file is missing, unreadable or malformed resolves to absent
/// for the remainder of the process; the surrounding operation degrades
/// instead of failing.
pub struct FileMetadataStore {
    file_prefix: PathBuf,
    cache: DashMap<String, Option<Arc<PhoneMetadata>>>,
}

impl FileMetadataStore {
    pub fn new<P: Into<PathBuf>>(file_prefix: P) -> Self {
        Self {
            file_prefix: file_prefix.into(),
            cache: DashMap::with_capacity(32),
        }
    }

    /// Returns the materialized record for the given key, loading it on
    /// first reference. Concurrent first-touch lookups of the same key are
    /// serialized by the cache entry.
    pub fn metadata_for_key(&self, key: &str) -> Option<Arc<PhoneMetadata>> {
        if let Some(cached) = self.cache.get(key) {
            return cached.value().clone();
        }
        let entry = self
            .cache
            .entry(key.to_string())
            .or_insert_with(|| self.load(key));
        entry.value().clone()
    }

    fn load(&self, key: &str) -> Option<Arc<PhoneMetadata>> {
        let mut file_name = self.file_prefix.as_os_str().to_owned();
        file_name.push("_");
        file_name.push(key);
        file_name.push(".json");
        let path = PathBuf::from(file_name);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(
                    "Could not read metadata record {}: {}",
                    path.display(),
                    err
                );
                return None;
            }
        };
        let mut metadata: PhoneMetadata = match serde_json::from_slice(&bytes) {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!(
                    "Malformed metadata record {}: {}",
                    path.display(),
                    err
                );
                return None;
            }
        };
        Self::materialize(&mut metadata);
        Some(Arc::new(metadata))
    }

    /// Converts file-level conventions into the in-memory form the engine
    /// consumes: the "NA" sentinel becomes an absent pattern, and the
    /// `$NP`/`$FG` placeholders of national prefix formatting rules are
    /// resolved against the region's national prefix.
    fn materialize(metadata: &mut PhoneMetadata) {
        for desc in metadata.descs_mut() {
            if desc.national_number_pattern.as_deref() == Some(NO_NUMBERS_DATA) {
                desc.national_number_pattern = None;
            }
            if desc.possible_number_pattern.as_deref() == Some(NO_NUMBERS_DATA) {
                desc.possible_number_pattern = None;
            }
        }

        let national_prefix = metadata.national_prefix().to_owned();
        for format in metadata
            .number_format
            .iter_mut()
            .chain(metadata.intl_number_format.iter_mut())
        {
            if let Some(rule) = format.national_prefix_formatting_rule.take() {
                let resolved = rule.replace("$NP", &national_prefix).replace("$FG", "$1");
                format.national_prefix_formatting_rule = Some(resolved);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> FileMetadataStore {
        FileMetadataStore::new(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/testdata/PhoneNumberMetadata"
        ))
    }

    #[test]
    fn loads_and_caches_record() {
        let store = test_store();
        let first = store.metadata_for_key("US").expect("US record should load");
        assert_eq!("US", first.id());
        assert_eq!(1, first.country_code());

        let second = store.metadata_for_key("US").expect("US record is cached");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn missing_record_resolves_to_absent() {
        let store = test_store();
        assert!(store.metadata_for_key("FR").is_none());
        // And stays absent on the second lookup.
        assert!(store.metadata_for_key("FR").is_none());
    }

    #[test]
    fn malformed_record_resolves_to_absent() {
        let store = test_store();
        assert!(store.metadata_for_key("JP").is_none());
    }

    #[test]
    fn na_sentinel_becomes_absent_pattern() {
        let store = test_store();
        let metadata = store.metadata_for_key("US").expect("US record should load");
        assert!(!metadata.shared_cost.has_national_number_pattern());
        assert!(!metadata.shared_cost.has_possible_number_pattern());
    }

    #[test]
    fn national_prefix_formatting_rule_is_resolved() {
        let store = test_store();
        let metadata = store.metadata_for_key("GB").expect("GB record should load");
        assert_eq!(
            "(0$1)",
            metadata.number_format[0].national_prefix_formatting_rule()
        );
    }
}
