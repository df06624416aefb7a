//! Row data model
//!
//! A row is one key/value pair inside a list. Both halves are raw bytes;
//! rows within a list are unique by key and ordered by key bytes.

use std::borrow::Cow;

use serde::{Serialize, Serializer};

/// A key/value pair belonging to a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    #[serde(serialize_with = "lossy_utf8")]
    pub key: Vec<u8>,

    #[serde(serialize_with = "lossy_utf8")]
    pub value: Vec<u8>,
}

impl Row {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into(), value: value.into() }
    }

    /// Key length in bytes
    pub fn key_size(&self) -> u64 {
        self.key.len() as u64
    }

    /// Value length in bytes
    pub fn value_size(&self) -> u64 {
        self.value.len() as u64
    }

    /// Key + value size; statistics only, never used for ordering
    pub fn size(&self) -> u64 {
        self.key_size() + self.value_size()
    }

    pub fn key_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.key)
    }

    pub fn value_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.value)
    }
}

fn lossy_utf8<S: Serializer>(bytes: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(bytes))
}
