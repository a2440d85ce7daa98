//! Versioned JSON document kept in the profile slot.
//!
//! Version 1 wraps the record in an envelope:
//!
//! ```json
//! { "version": 1, "savedAt": "2026-01-01T00:00:00Z", "record": { "businessName": "..." } }
//! ```
//!
//! Version 0 is the bare record object written by earlier builds. Both are
//! filled field-by-field over [`ProfileRecord::default`], so a single
//! mistyped value costs only that value, not the whole record.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::Result;
use crate::profile::{normalize_slug, ProfileRecord};

/// Version written by [`encode`].
pub const DOCUMENT_VERSION: u64 = 1;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    version: u64,
    saved_at: DateTime<Utc>,
    record: &'a ProfileRecord,
}

/// A successfully decoded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// The record, with defaults filled in.
    pub record: ProfileRecord,
    /// Document version found in storage (0 for the bare legacy shape).
    pub from_version: u64,
    /// Stored keys that were dropped because their type did not match.
    pub dropped_keys: Vec<String>,
}

/// Why a stored document could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Not JSON, or not a JSON object.
    Malformed(String),
    /// Written by a newer build.
    UnsupportedVersion(u64),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(reason) => write!(f, "malformed profile document: {reason}"),
            Self::UnsupportedVersion(v) => write!(
                f,
                "profile document version {v} is newer than supported version {DOCUMENT_VERSION}"
            ),
        }
    }
}

/// Serialize a record into the current envelope.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn encode(record: &ProfileRecord, saved_at: DateTime<Utc>) -> Result<String> {
    let envelope = Envelope {
        version: DOCUMENT_VERSION,
        saved_at,
        record,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Decode any supported document version.
///
/// # Errors
///
/// Returns a [`DecodeError`] for unparseable documents and for versions
/// newer than [`DOCUMENT_VERSION`].
pub fn decode(raw: &str) -> std::result::Result<Decoded, DecodeError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    let Value::Object(mut root) = value else {
        return Err(DecodeError::Malformed("expected a JSON object".to_string()));
    };

    match (root.get("version"), root.get("record")) {
        (Some(version), Some(_)) => {
            let version = version
                .as_u64()
                .ok_or_else(|| DecodeError::Malformed("version is not a number".to_string()))?;
            if version > DOCUMENT_VERSION {
                return Err(DecodeError::UnsupportedVersion(version));
            }
            let Some(Value::Object(body)) = root.remove("record") else {
                return Err(DecodeError::Malformed("record is not an object".to_string()));
            };
            let (record, dropped_keys) = fill_defaults(&body)?;
            Ok(Decoded {
                record,
                from_version: version,
                dropped_keys,
            })
        }
        _ => migrate_v0(&root),
    }
}

/// Version 0: the record object itself, with no envelope.
fn migrate_v0(body: &Map<String, Value>) -> std::result::Result<Decoded, DecodeError> {
    let (record, dropped_keys) = fill_defaults(body)?;
    Ok(Decoded {
        record,
        from_version: 0,
        dropped_keys,
    })
}

/// Overlay the stored keys on the default record.
///
/// A stored key is kept only if its JSON type matches the default's type.
/// The avatar defaults to `null` and accepts a string or `null`. Unknown
/// keys are ignored.
fn fill_defaults(
    stored: &Map<String, Value>,
) -> std::result::Result<(ProfileRecord, Vec<String>), DecodeError> {
    let defaults = serde_json::to_value(ProfileRecord::default())
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;
    let Value::Object(mut merged) = defaults else {
        return Err(DecodeError::Malformed(
            "default record is not an object".to_string(),
        ));
    };

    let mut dropped = Vec::new();
    for (key, value) in stored {
        let Some(default) = merged.get(key) else {
            continue;
        };
        let compatible = matches!(
            (default, value),
            (Value::String(_), Value::String(_))
                | (Value::Bool(_), Value::Bool(_))
                | (Value::Null, Value::String(_) | Value::Null)
        );
        if compatible {
            merged.insert(key.clone(), value.clone());
        } else {
            warn!(key = %key, "Dropping stored profile value with unexpected type");
            dropped.push(key.clone());
        }
    }

    let mut record: ProfileRecord = serde_json::from_value(Value::Object(merged))
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;
    // Older builds stored the slug as typed.
    record.slug = normalize_slug(&record.slug);
    Ok((record, dropped))
}
