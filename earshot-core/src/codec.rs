//! Save-game codec for the [`Backlog`].
//!
//! The payload is a length-prefixed UTF-8 JSON document:
//!
//! ```text
//! u32 LE length | length bytes of JSON
//!
//! {
//!   "935223": [
//!     { "speakerQuery": "...", "responseText": "...", "timestamp": 14.25,
//!       "speakerName": "...", "responseName": "..." }
//!   ]
//! }
//! ```
//!
//! Object keys are the decimal character keys. Older saves carry only
//! `speakerQuery`, `responseText` and `timestamp`; the names decode as empty.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backlog::Backlog;
use crate::error::{RelayError, Result};
use crate::types::{CharacterKey, Exchange};

const LENGTH_PREFIX: usize = std::mem::size_of::<u32>();

/// On-disk form of one [`Exchange`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExchangeRecord {
    speaker_query: String,
    response_text: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    timestamp: f32,
    #[serde(default)]
    speaker_name: String,
    #[serde(default)]
    response_name: String,
}

/// Non-finite clocks serialize as `null`; read them back as `0.0`.
fn null_as_zero<'de, D>(deserializer: D) -> std::result::Result<f32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl From<&Exchange> for ExchangeRecord {
    fn from(e: &Exchange) -> Self {
        Self {
            speaker_query: e.speaker_query().to_string(),
            response_text: e.response_text().to_string(),
            timestamp: e.timestamp(),
            speaker_name: e.speaker_name().to_string(),
            response_name: e.response_name().to_string(),
        }
    }
}

impl From<ExchangeRecord> for Exchange {
    fn from(r: ExchangeRecord) -> Self {
        Exchange::new(
            r.speaker_name,
            r.speaker_query,
            r.response_name,
            r.response_text,
            r.timestamp,
        )
    }
}

/// Render the backlog as its JSON document.
///
/// # Errors
/// Returns [`RelayError::Serialization`] if JSON encoding fails.
pub fn to_json(backlog: &Backlog) -> Result<String> {
    let document: BTreeMap<String, Vec<ExchangeRecord>> = backlog
        .iter()
        .map(|(key, exchanges)| {
            (
                key.0.to_string(),
                exchanges.iter().map(ExchangeRecord::from).collect(),
            )
        })
        .collect();
    Ok(serde_json::to_string(&document)?)
}

/// Parse a JSON document into a fresh backlog.
///
/// # Errors
/// Returns [`RelayError::Serialization`] on invalid JSON or a non-numeric key.
pub fn from_json(json: &str) -> Result<Backlog> {
    let document: BTreeMap<String, Vec<ExchangeRecord>> = serde_json::from_str(json)?;
    document
        .into_iter()
        .map(|(key, records)| {
            let key: CharacterKey = key.parse()?;
            Ok((key, records.into_iter().map(Exchange::from).collect()))
        })
        .collect::<Result<Vec<(CharacterKey, Vec<Exchange>)>>>()
        .map(|entries| entries.into_iter().collect())
}

/// Encode the backlog as a length-prefixed payload.
///
/// # Errors
/// Returns [`RelayError::Serialization`] if encoding fails or the document
/// exceeds `u32::MAX` bytes.
pub fn encode(backlog: &Backlog) -> Result<Vec<u8>> {
    let start = Instant::now();
    let json = to_json(backlog)?;
    let length = u32::try_from(json.len())
        .map_err(|_| RelayError::Serialization(format!("backlog too large: {} bytes", json.len())))?;

    let mut bytes = Vec::with_capacity(LENGTH_PREFIX + json.len());
    bytes.extend_from_slice(&length.to_le_bytes());
    bytes.extend_from_slice(json.as_bytes());

    debug!(
        characters = backlog.len(),
        bytes = bytes.len(),
        elapsed_us = start.elapsed().as_micros(),
        "Encoded backlog"
    );
    Ok(bytes)
}

/// Decode a length-prefixed payload into a fresh backlog.
///
/// # Errors
/// Returns [`RelayError::MalformedRecord`] if the prefix disagrees with the
/// payload size, or [`RelayError::Serialization`] on invalid UTF-8 or JSON.
pub fn decode(bytes: &[u8]) -> Result<Backlog> {
    let (prefix, body) = bytes
        .split_first_chunk::<LENGTH_PREFIX>()
        .ok_or_else(|| RelayError::MalformedRecord(format!("payload too short: {} bytes", bytes.len())))?;

    let length = u32::from_le_bytes(*prefix) as usize;
    if body.len() != length {
        return Err(RelayError::MalformedRecord(format!(
            "length prefix says {length} bytes, found {}",
            body.len()
        )));
    }

    let json = std::str::from_utf8(body).map_err(|e| RelayError::Serialization(e.to_string()))?;
    from_json(json)
}
