//! # Ports Layer
//!
//! - `inbound.rs` - Driving ports (API exposed to the node)
//! - `outbound.rs` - Driven ports (store and codec the repository depends on)

pub mod inbound;
pub mod outbound;
