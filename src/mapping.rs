//! Bidirectional identifier/placeholder mapping.
//!
//! One `MappingTable` is owned by one masking session. It grows append-only
//! during encode, is read-only during decode, and round-trips through a JSON
//! object of `{original: placeholder}` pairs so a session can be resumed
//! across process runs (this is how CSV-wide consistent masking works).

use std::collections::HashMap;
use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::SqlMaskError;

/// Prefix for generated placeholder names. `m<N>` is always a valid bare
/// SQL identifier and never collides with a reserved word.
pub const PLACEHOLDER_PREFIX: &str = "m";

/// Returns the numeric suffix if `text` has the placeholder shape
/// (`m` followed by one or more ASCII digits), else `None`.
pub fn placeholder_suffix(text: &str) -> Option<u64> {
    let digits = text.strip_prefix(PLACEHOLDER_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Whether `text` is shaped like a generated placeholder. Shape alone does
/// not mean the placeholder is known; that is a mapping lookup.
pub fn is_placeholder(text: &str) -> bool {
    placeholder_suffix(text).is_some()
}

/// Session-scoped bidirectional association between original identifier
/// text and placeholder names.
///
/// Keys are the exact identifier text as it appeared in the source,
/// including quote delimiters for quoted identifiers, which is what lets
/// decode restore the original byte-for-byte.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    forward: HashMap<String, String>,
    reverse: HashMap<String, String>,
    counter: u64,
}

impl MappingTable {
    /// Create an empty table; the first placeholder issued will be `m1`.
    pub fn new() -> Self {
        Self {
            forward: HashMap::new(),
            reverse: HashMap::new(),
            counter: 1,
        }
    }

    /// Return the placeholder for `original`, allocating the next one on
    /// first sight. Idempotent: repeated calls with the same text return
    /// the same placeholder and leave the counter untouched.
    pub fn resolve_or_create(&mut self, original: &str) -> String {
        if let Some(existing) = self.forward.get(original) {
            return existing.clone();
        }
        let placeholder = format!("{}{}", PLACEHOLDER_PREFIX, self.counter);
        self.counter += 1;
        self.forward
            .insert(original.to_string(), placeholder.clone());
        self.reverse
            .insert(placeholder.clone(), original.to_string());
        placeholder
    }

    /// Look up the original text for a placeholder. `None` is the
    /// "unknown placeholder" condition; decode leaves such tokens as-is.
    pub fn restore(&self, placeholder: &str) -> Option<&str> {
        self.reverse.get(placeholder).map(String::as_str)
    }

    /// Number of identifier entries.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// The `original -> placeholder` view, e.g. for reporting.
    pub fn forward(&self) -> &HashMap<String, String> {
        &self.forward
    }

    /// Rebuild a table from its interchange form. Validates that no
    /// placeholder is assigned twice and resumes the counter one past the
    /// highest `m<N>` suffix present, so a continued encode session never
    /// re-issues a placeholder.
    pub fn from_forward(forward: HashMap<String, String>) -> Result<Self, SqlMaskError> {
        let mut reverse = HashMap::with_capacity(forward.len());
        let mut max_suffix = 0;
        for (original, placeholder) in &forward {
            if reverse
                .insert(placeholder.clone(), original.clone())
                .is_some()
            {
                return Err(SqlMaskError::DuplicatePlaceholder {
                    placeholder: placeholder.clone(),
                });
            }
            if let Some(suffix) = placeholder_suffix(placeholder) {
                max_suffix = max_suffix.max(suffix);
            }
        }
        Ok(Self {
            forward,
            reverse,
            counter: max_suffix + 1,
        })
    }

    /// Load a mapping from a JSON file. Unreadable files and JSON that is
    /// not a string-to-string object are fatal.
    pub fn load_from_file(path: &Path) -> Result<Self, SqlMaskError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            SqlMaskError::MappingRead {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let forward: HashMap<String, String> =
            serde_json::from_str(&content).map_err(|source| SqlMaskError::MalformedMapping {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_forward(forward)
    }

    /// Write the mapping as pretty-printed JSON.
    pub fn save_to_file(&self, path: &Path) -> Result<(), SqlMaskError> {
        let json = serde_json::to_string_pretty(self).expect("mapping serialization is infallible");
        std::fs::write(path, json).map_err(|source| SqlMaskError::MappingWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Serialize for MappingTable {
    /// Serializes only the forward map; the reverse map and counter are
    /// reconstructed on load.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.forward.len()))?;
        for (original, placeholder) in &self.forward {
            map.serialize_entry(original, placeholder)?;
        }
        map.end()
    }
}
