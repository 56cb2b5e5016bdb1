//! Snapshot encoding.
//!
//! Layout:
//!
//! ```text
//! 0..4   magic b"SESH"
//! 4      format version
//! 5..    JSON object of key -> tagged value, keys ascending
//! ```
//!
//! An empty byte slice decodes to an empty map. This is what a freshly
//! acquired session entry holds before its first write.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};
use crate::value::Value;

/// Leading bytes of every snapshot.
pub const MAGIC: &[u8; 4] = b"SESH";

/// Current snapshot format version.
pub const FORMAT_VERSION: u8 = 1;

/// Maximum nesting of lists and maps inside a single value.
///
/// Each level costs two levels of JSON nesting; this keeps decoding well
/// inside serde_json's recursion limit.
pub const MAX_DEPTH: usize = 32;

const HEADER_LEN: usize = MAGIC.len() + 1;

/// Encode a mapping into snapshot bytes.
///
/// The output depends only on the mapping's content, not on insertion order.
pub fn encode(values: &HashMap<String, Value>) -> Result<Vec<u8>> {
    for (key, value) in values {
        check_encodable(key, value)?;
    }

    let sorted: BTreeMap<&str, &Value> = values.iter().map(|(k, v)| (k.as_str(), v)).collect();

    let mut buf = Vec::with_capacity(HEADER_LEN + 16 * values.len());
    buf.extend_from_slice(MAGIC);
    buf.push(FORMAT_VERSION);
    serde_json::to_writer(&mut buf, &sorted).map_err(|e| Error::Encode(e.to_string()))?;
    Ok(buf)
}

/// Decode snapshot bytes into a mapping.
pub fn decode(bytes: &[u8]) -> Result<HashMap<String, Value>> {
    if bytes.is_empty() {
        return Ok(HashMap::new());
    }
    if bytes.len() < HEADER_LEN {
        return Err(Error::Decode(format!(
            "snapshot truncated: {} bytes, header needs {}",
            bytes.len(),
            HEADER_LEN
        )));
    }

    let (header, body) = bytes.split_at(HEADER_LEN);
    if &header[..MAGIC.len()] != MAGIC {
        return Err(Error::Decode("bad snapshot magic".to_string()));
    }
    let version = header[MAGIC.len()];
    if version != FORMAT_VERSION {
        return Err(Error::Decode(format!(
            "unsupported snapshot version {version} (expected {FORMAT_VERSION})"
        )));
    }

    let values: HashMap<String, Value> =
        serde_json::from_slice(body).map_err(|e| Error::Decode(e.to_string()))?;
    for (key, value) in &values {
        let depth = value.depth();
        if depth > MAX_DEPTH {
            return Err(Error::Decode(format!(
                "value for key '{key}' nests {depth} levels deep (max {MAX_DEPTH})"
            )));
        }
    }
    Ok(values)
}

fn check_encodable(key: &str, value: &Value) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::Encode(format!(
            "value for key '{key}' contains a non-finite float"
        )));
    }
    let depth = value.depth();
    if depth > MAX_DEPTH {
        return Err(Error::Encode(format!(
            "value for key '{key}' nests {depth} levels deep (max {MAX_DEPTH})"
        )));
    }
    Ok(())
}
