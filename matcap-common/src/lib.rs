//! # Shared Constants (Capture Core ↔ Control Surface)
//!
//! Defines the constants and element type shared between the per-core capture
//! buffers and the code that configures and drains them. The producer writes
//! one [`Sample`] per captured memory address; user space reads the same
//! elements back as a raw byte stream.
//!
//! ## Key Items
//!
//! - [`Sample`] - One captured address (fixed-width element)
//! - [`ELEMENT_SIZE`] - Width of a sample in bytes
//! - [`SEGMENTS_PER_CORE`] - Number of segments in every per-core pool
//! - [`BUFFER_LIMIT`] - Global byte budget across all cores

#![no_std]

// ============================================================================
// Sample Layout
// ============================================================================

/// A captured memory address
///
/// Samples are stored in native byte order. Readers that receive the raw byte
/// stream must decode 8-byte chunks with the byte order of the capturing host.
pub type Sample = u64;

/// Width of one [`Sample`] in bytes
pub const ELEMENT_SIZE: u64 = core::mem::size_of::<Sample>() as u64;

// ============================================================================
// Buffer Geometry
// ============================================================================

/// Number of segments allocated per core
///
/// Identical across all cores. Changing it changes the budget arithmetic of
/// every configuration request.
pub const SEGMENTS_PER_CORE: usize = 8;

/// Global byte budget shared by every core's segments (1 TiB)
///
/// The sum of `capacity * ELEMENT_SIZE` over all segments of all cores must
/// never exceed this value.
pub const BUFFER_LIMIT: u64 = 0x100_0000_0000;

/// Upper bound for a single attribute `show` output, including the newline
pub const PAGE_SIZE: usize = 4096;

/// Bytes per MiB, used for the human-readable status columns
pub const BYTES_PER_MIB: u64 = 1024 * 1024;

// ============================================================================
// Control Surface Names
// ============================================================================

/// Name of the capture device
pub const DEVICE_NAME: &str = "mat";

/// Attribute: capture enabled flag (`0` or `1`)
pub const ATTR_BUFFERS_ENABLED: &str = "buffers_enabled";

/// Attribute: selected core (`-1` for all cores)
pub const ATTR_CPU: &str = "cpu";

/// Attribute: buffer configuration (store) and status report (show)
pub const ATTR_BUFFERS: &str = "buffers";

/// Attribute: filled bytes of the selected core (read-only)
pub const ATTR_BUFFERS_BYTES: &str = "buffers_bytes";

/// Core filter value meaning "all cores"
pub const ALL_CORES: i32 = -1;
