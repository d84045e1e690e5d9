//! Export functionality
//!
//! Turns drained capture data into formats for external analysis: a
//! `0x%016x` line per captured address, and the buffer status report as
//! JSON.

pub mod hex;
pub mod status_json;

pub use hex::{write_hex_dump, ByteOrder};
pub use status_json::export_status;
