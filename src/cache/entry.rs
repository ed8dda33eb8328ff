//! Schema-version tagging for cached score payloads.
//!
//! A score entry is the payload's JSON object with one extra member, `_v`,
//! holding the version of the payload shape that wrote it. Readers running a
//! different version treat the entry as absent and leave it to expire.

use super::errors::{CacheError, CacheResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Bump whenever the cached score payload changes shape
pub const KV_SCHEMA_VERSION: u32 = 2;

/// Member carrying the version tag inside a stored entry
pub const VERSION_FIELD: &str = "_v";

/// Outcome of decoding a versioned entry
#[derive(Debug, Clone, PartialEq)]
pub enum CacheRead<T> {
    /// Tag matched; the tag has been stripped from the payload
    Hit(T),
    /// Entry written under another version, or without a tag at all
    Stale { found: Option<u64> },
}

impl<T> CacheRead<T> {
    pub fn into_hit(self) -> Option<T> {
        match self {
            Self::Hit(payload) => Some(payload),
            Self::Stale { .. } => None,
        }
    }
}

/// Serialize `payload` and attach the version tag
///
/// The payload must serialize to a JSON object.
pub fn encode_versioned<T: Serialize>(payload: &T, version: u32) -> CacheResult<String> {
    let Value::Object(mut fields) = serde_json::to_value(payload)? else {
        return Err(CacheError::SerializationError(
            "Versioned payload must serialize to a JSON object".to_string(),
        ));
    };

    fields.insert(VERSION_FIELD.to_string(), Value::from(version));
    Ok(serde_json::to_string(&Value::Object(fields))?)
}

/// Decode a stored entry, checking its tag against `version`
pub fn decode_versioned<T: DeserializeOwned>(raw: &str, version: u32) -> CacheResult<CacheRead<T>> {
    let Value::Object(mut fields) = serde_json::from_str::<Value>(raw)? else {
        return Err(CacheError::SerializationError(
            "Stored entry is not a JSON object".to_string(),
        ));
    };

    let found = fields.remove(VERSION_FIELD).and_then(|tag| tag.as_u64());
    if found != Some(u64::from(version)) {
        return Ok(CacheRead::Stale { found });
    }

    let payload = serde_json::from_value(Value::Object(fields))?;
    Ok(CacheRead::Hit(payload))
}
