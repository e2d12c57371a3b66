//! # Progress Marker
//!
//! A single value under a reserved key recording how far the height index
//! has been built.
//!
//! ## Encoding
//!
//! | Form | Bytes | Meaning |
//! |------|-------|---------|
//! | `0x00 ‖ height` | 9 | Complete through `height` |
//! | `0x01 ‖ tx id` | 33 | Migration in progress, resume at `tx id` |
//! | `height` | 8 | Legacy complete form (read only) |
//! | `tx id` | 32 | Legacy cursor form (read only) |
//!
//! Every other length, and every unknown tag, is corruption.

use crate::domain::entities::{TxId, TX_ID_LEN};
use crate::domain::errors::RepositoryError;
use crate::domain::packing::{pack_height, unpack_height, HEIGHT_LEN};

const TAG_COMPLETE: u8 = 0x00;
const TAG_IN_PROGRESS: u8 = 0x01;

const TAGGED_COMPLETE_LEN: usize = 1 + HEIGHT_LEN;
const TAGGED_IN_PROGRESS_LEN: usize = 1 + TX_ID_LEN;

/// Decoded progress marker. Absence is modelled as `Option::None` by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMarker {
    /// The height index is complete through `height`.
    Complete { height: u64 },
    /// A migration checkpointed after processing `cursor`.
    InProgress { cursor: TxId },
}

impl ProgressMarker {
    pub fn encode(&self) -> Vec<u8> {
        match self {
            ProgressMarker::Complete { height } => {
                let mut out = Vec::with_capacity(TAGGED_COMPLETE_LEN);
                out.push(TAG_COMPLETE);
                out.extend_from_slice(&pack_height(*height));
                out
            }
            ProgressMarker::InProgress { cursor } => {
                let mut out = Vec::with_capacity(TAGGED_IN_PROGRESS_LEN);
                out.push(TAG_IN_PROGRESS);
                out.extend_from_slice(cursor);
                out
            }
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, RepositoryError> {
        match bytes.len() {
            HEIGHT_LEN => Ok(ProgressMarker::Complete {
                height: unpack_height(bytes)?,
            }),
            TX_ID_LEN => Ok(ProgressMarker::InProgress {
                cursor: to_tx_id(bytes)?,
            }),
            TAGGED_COMPLETE_LEN | TAGGED_IN_PROGRESS_LEN => Self::decode_tagged(bytes),
            len => Err(RepositoryError::corruption(
                "progress marker",
                format!("unexpected length {}: {}", len, hex::encode(bytes)),
            )),
        }
    }

    fn decode_tagged(bytes: &[u8]) -> Result<Self, RepositoryError> {
        let (tag, body) = bytes.split_at(1);
        match (tag[0], body.len()) {
            (TAG_COMPLETE, HEIGHT_LEN) => Ok(ProgressMarker::Complete {
                height: unpack_height(body)?,
            }),
            (TAG_IN_PROGRESS, TX_ID_LEN) => Ok(ProgressMarker::InProgress {
                cursor: to_tx_id(body)?,
            }),
            (tag, len) => Err(RepositoryError::corruption(
                "progress marker",
                format!("tag {:#04x} with {} byte body", tag, len),
            )),
        }
    }
}

fn to_tx_id(bytes: &[u8]) -> Result<TxId, RepositoryError> {
    bytes.try_into().map_err(|_| {
        RepositoryError::corruption("tx id", format!("expected 32 bytes, got {}", bytes.len()))
    })
}
