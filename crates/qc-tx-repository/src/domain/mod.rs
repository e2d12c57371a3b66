//! # Domain Layer
//!
//! Pure logic for the transaction repository. No I/O happens here.
//!
//! ## Modules
//!
//! - `entities` - Transaction id type and the reference `AtomicTransaction`
//! - `errors` - Repository, store and codec error types
//! - `packing` - Binary layout of by-ID records and packed heights
//! - `marker` - Progress marker encoding
//! - `value_objects` - Configuration and key layout

pub mod entities;
pub mod errors;
pub mod marker;
pub mod packing;
pub mod value_objects;

pub use entities::{AtomicTransaction, ChainId, TxId, TX_ID_LEN};
pub use errors::{CodecError, RepositoryError, StoreError};
pub use marker::ProgressMarker;
pub use packing::{pack_height, unpack_height, IndexedTxRecord, HEIGHT_LEN, RECORD_HEADER_LEN};
pub use value_objects::{KeyPrefix, RepositoryConfig};
