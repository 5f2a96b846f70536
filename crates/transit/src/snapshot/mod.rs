//! Binary snapshot of a built database.
//!
//! A snapshot file is an 8-byte header followed by a bitcode payload:
//!
//! ```text
//! [0..4]  magic "TCAT"
//! [4..8]  format version (u32, little-endian)
//! [8..]   bitcode-encoded DatabaseSnapshot
//! ```

pub mod database;
pub mod records;

pub use database::TransitDatabase;
pub use records::{CatalogueSnapshot, DatabaseSnapshot, RouterSnapshot};

use thiserror::Error;

pub const MAGIC: [u8; 4] = *b"TCAT";
pub const FORMAT_VERSION: u32 = 1;
pub const HEADER_SIZE: usize = 8;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decoding error: {0}")]
    Decode(#[from] bitcode::Error),

    #[error("Not a transport catalogue snapshot")]
    BadMagic,

    #[error("Snapshot format version {found} is not supported (expected {expected})")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),
}

pub(crate) fn wrap_with_header(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Check the header and return the payload that follows it.
pub(crate) fn unwrap_header(bytes: &[u8]) -> Result<&[u8], SnapshotError> {
    if bytes.len() < HEADER_SIZE || bytes[..4] != MAGIC {
        return Err(SnapshotError::BadMagic);
    }
    let found = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if found != FORMAT_VERSION {
        return Err(SnapshotError::VersionMismatch {
            expected: FORMAT_VERSION,
            found,
        });
    }
    Ok(&bytes[HEADER_SIZE..])
}
