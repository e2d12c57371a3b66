//! Serializer Adapters
//!
//! Implementations of the `TxCodec` trait.

mod bincode;

pub use self::bincode::BincodeTxCodec;
