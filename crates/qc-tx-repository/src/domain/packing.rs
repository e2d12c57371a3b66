//! # Binary Index Codec
//!
//! Fixed layout of the by-ID index value:
//!
//! ```text
//! +----------------+----------------+----------------------+
//! | height (u64 BE)| len (u32 BE)   | serialized tx (len)  |
//! +----------------+----------------+----------------------+
//!     8 bytes          4 bytes          variable
//! ```
//!
//! Decoding checks the header length before touching the payload so that a
//! short value is reported as corruption, never confused with not-found.

use crate::domain::errors::RepositoryError;

/// Width of a packed height.
pub const HEIGHT_LEN: usize = 8;

/// Width of the payload length prefix.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Minimum size of a by-ID record.
pub const RECORD_HEADER_LEN: usize = HEIGHT_LEN + LENGTH_PREFIX_LEN;

/// Pack a height as 8 big-endian bytes. Big-endian keeps key order equal to
/// numeric order.
#[inline]
pub fn pack_height(height: u64) -> [u8; HEIGHT_LEN] {
    height.to_be_bytes()
}

/// Unpack a height from exactly 8 bytes.
pub fn unpack_height(bytes: &[u8]) -> Result<u64, RepositoryError> {
    let raw: [u8; HEIGHT_LEN] = bytes.try_into().map_err(|_| {
        RepositoryError::corruption("height", format!("expected 8 bytes, got {}", bytes.len()))
    })?;
    Ok(u64::from_be_bytes(raw))
}

/// A decoded by-ID record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedTxRecord {
    pub height: u64,
    pub tx_bytes: Vec<u8>,
}

impl IndexedTxRecord {
    pub fn new(height: u64, tx_bytes: Vec<u8>) -> Self {
        Self { height, tx_bytes }
    }

    /// Encode as `height ‖ len ‖ tx_bytes`.
    pub fn encode(&self) -> Result<Vec<u8>, RepositoryError> {
        let len = u32::try_from(self.tx_bytes.len()).map_err(|_| {
            RepositoryError::corruption(
                "by-id record",
                format!("payload of {} bytes exceeds u32 length", self.tx_bytes.len()),
            )
        })?;

        let mut out = Vec::with_capacity(RECORD_HEADER_LEN + self.tx_bytes.len());
        out.extend_from_slice(&pack_height(self.height));
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(&self.tx_bytes);
        Ok(out)
    }

    /// Decode, validating the header and the declared payload length.
    pub fn decode(bytes: &[u8]) -> Result<Self, RepositoryError> {
        if bytes.len() < RECORD_HEADER_LEN {
            return Err(RepositoryError::corruption(
                "by-id record",
                format!(
                    "entry too short: {} bytes (need at least {})",
                    bytes.len(),
                    RECORD_HEADER_LEN
                ),
            ));
        }

        let (height_bytes, rest) = bytes.split_at(HEIGHT_LEN);
        let (len_bytes, payload) = rest.split_at(LENGTH_PREFIX_LEN);
        let height = unpack_height(height_bytes)?;

        let mut len_raw = [0u8; LENGTH_PREFIX_LEN];
        len_raw.copy_from_slice(len_bytes);
        let declared = u32::from_be_bytes(len_raw) as usize;

        if declared != payload.len() {
            return Err(RepositoryError::corruption(
                "by-id record",
                format!(
                    "declared payload length {} but {} bytes follow",
                    declared,
                    payload.len()
                ),
            ));
        }

        Ok(Self {
            height,
            tx_bytes: payload.to_vec(),
        })
    }
}
