//! # matcap - Per-Core Segmented Capture Buffers
//!
//! matcap stores memory-access samples (captured addresses) in per-core
//! buffer pools and exposes them to user space as one sequential byte stream
//! per core. Each pool is split into a fixed number of segments so that a
//! large capture never needs one huge contiguous allocation.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Producer (one per core)                      │
//! │              sampled address ──▶ record(core, addr)             │
//! └───────────────────────┬─────────────────────────────────────────┘
//!                         │ append into active segment
//!                         ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Capture (this crate)                        │
//! │                                                                 │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐         │
//! │  │  Capacity    │──▶│  BufferPool  │──▶│  Sequential  │         │
//! │  │  Governor    │   │  (per core)  │   │    Reader    │         │
//! │  └──────────────┘   └──────────────┘   └──────────────┘         │
//! │         ▲                  ▲                   │                │
//! │         │                  │                   ▼                │
//! │  ┌─────────────────────────────────┐   ┌──────────────┐         │
//! │  │  ControlSurface (attributes)    │   │  ByteSink    │         │
//! │  └─────────────────────────────────┘   └──────────────┘         │
//! └───────────────────────┬─────────────────────────────────────────┘
//!                         │ show / store / read
//!                         ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │              CaptureDevice + DeviceHandle (user space)          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`capture`]: segments, per-core pools, the global byte budget and the
//!   sequential reader
//! - [`control`]: text attributes, status report and the device front end
//! - [`export`]: hex dumps and JSON status export
//! - [`config`]: capture geometry and limits
//! - [`cli`]: command-line argument parsing
//! - [`preflight`]: input and output checks run before any work
//! - [`domain`]: core domain types (`CoreId`, `CoreFilter`, `ByteCount`) and errors
//!
//! ## Typical Usage
//!
//! ```bash
//! # Allocate 1000-sample segments on every core, fill and drain them
//! matcap simulate --capacity 1000 --samples 12000 --output-dir out
//!
//! # Inspect one core's stream
//! matcap hex out/core0.bin
//! ```
//!
//! ## Key Concepts
//!
//! - **Segment**: fixed-capacity array of 8-byte samples
//! - **Active segment**: the segment the producer currently appends to
//! - **Buffer limit**: global budget on the bytes of all segment capacities
//! - **Core filter**: selected core for status and reads, `-1` for all

pub mod capture;
pub mod cli;
pub mod config;
pub mod control;
pub mod domain;
pub mod export;
pub mod preflight;
