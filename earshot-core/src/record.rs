//! Save-game side-channel records.
//!
//! The host's co-save holds a sequence of tagged records:
//!
//! ```text
//! tag [u8; 4] | version u32 LE | length u32 LE | length bytes of data
//! ```
//!
//! The backlog travels in a `HIST` record, version 1, whose data is the
//! [`codec`](crate::codec) payload. Records with other tags belong to
//! someone else and are skipped.

use tracing::{info, warn};

use crate::backlog::Backlog;
use crate::codec;
use crate::error::{RelayError, Result};

/// Tag of the backlog record.
pub const HISTORY_TAG: [u8; 4] = *b"HIST";

/// Backlog record format version written by this build.
pub const HISTORY_VERSION: u32 = 1;

const HEADER_LEN: usize = 12;

/// One tagged, versioned record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRecord {
    /// Four-byte record type.
    pub tag: [u8; 4],
    /// Format version of `data`.
    pub version: u32,
    /// Opaque record body.
    pub data: Vec<u8>,
}

impl SaveRecord {
    /// Build the `HIST` record for `backlog`.
    ///
    /// # Errors
    /// Propagates codec failures.
    pub fn history(backlog: &Backlog) -> Result<Self> {
        Ok(Self {
            tag: HISTORY_TAG,
            version: HISTORY_VERSION,
            data: codec::encode(backlog)?,
        })
    }

    /// Printable form of the tag.
    #[must_use]
    pub fn tag_str(&self) -> String {
        String::from_utf8_lossy(&self.tag).into_owned()
    }

    /// Append this record's framed bytes to `out`.
    ///
    /// # Errors
    /// Returns [`RelayError::Serialization`] if the data exceeds `u32::MAX` bytes.
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        let length = u32::try_from(self.data.len())
            .map_err(|_| RelayError::Serialization(format!("record too large: {} bytes", self.data.len())))?;
        out.extend_from_slice(&self.tag);
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&length.to_le_bytes());
        out.extend_from_slice(&self.data);
        Ok(())
    }

    /// Frame several records into one co-save stream.
    ///
    /// # Errors
    /// See [`write_to`](Self::write_to).
    pub fn write_all(records: &[SaveRecord]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for record in records {
            record.write_to(&mut out)?;
        }
        Ok(out)
    }

    /// Split a co-save stream into records.
    ///
    /// # Errors
    /// Returns [`RelayError::MalformedRecord`] on a truncated header or body.
    pub fn read_all(mut bytes: &[u8]) -> Result<Vec<SaveRecord>> {
        let mut records = Vec::new();
        while !bytes.is_empty() {
            let Some((header, rest)) = bytes.split_first_chunk::<HEADER_LEN>() else {
                return Err(RelayError::MalformedRecord(format!(
                    "truncated record header: {} bytes left",
                    bytes.len()
                )));
            };

            let tag = [header[0], header[1], header[2], header[3]];
            let version = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
            let length = u32::from_le_bytes([header[8], header[9], header[10], header[11]]) as usize;

            if rest.len() < length {
                return Err(RelayError::MalformedRecord(format!(
                    "record '{}' wants {length} bytes, {} left",
                    String::from_utf8_lossy(&tag),
                    rest.len()
                )));
            }

            let (data, tail) = rest.split_at(length);
            records.push(SaveRecord {
                tag,
                version,
                data: data.to_vec(),
            });
            bytes = tail;
        }
        Ok(records)
    }
}

/// Find and decode the backlog among `records`.
///
/// When several `HIST` records are present the last one wins. Returns
/// `Ok(None)` when none exists (a fresh game).
///
/// # Errors
/// Returns [`RelayError::UnsupportedVersion`] for a version this build does
/// not know, or the codec's error for a malformed payload.
pub fn restore_history(records: &[SaveRecord]) -> Result<Option<Backlog>> {
    let Some(record) = records.iter().rfind(|r| r.tag == HISTORY_TAG) else {
        info!("No dialogue history record in save");
        return Ok(None);
    };

    if record.version != HISTORY_VERSION {
        warn!(
            found = record.version,
            supported = HISTORY_VERSION,
            "Refusing dialogue history from unknown format version"
        );
        return Err(RelayError::UnsupportedVersion {
            found: record.version,
            supported: HISTORY_VERSION,
        });
    }

    codec::decode(&record.data).map(Some)
}
