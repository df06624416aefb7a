//! Display formatting for row values
//!
//! Values that parse as JSON are re-indented with tabs, keeping object key
//! order. Anything else is returned untouched.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

/// Pretty-print `value` if it is valid JSON; otherwise return it unchanged
pub fn auto_format(value: &[u8]) -> Vec<u8> {
    let parsed: Value = match serde_json::from_slice(value) {
        Ok(parsed) => parsed,
        Err(_) => return value.to_vec(),
    };

    let mut out = Vec::with_capacity(value.len() + value.len() / 2);
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"\t"));
    match parsed.serialize(&mut serializer) {
        Ok(()) => out,
        Err(_) => value.to_vec(),
    }
}
