//! # Control Surface
//!
//! User-facing access to the capture state, shaped like a kernel module's
//! sysfs attributes plus a read-only character device:
//!
//! ```text
//! /sys/.../mat/buffers_enabled   rw  0 | 1
//! /sys/.../mat/cpu               rw  -1 | core
//! /sys/.../mat/buffers           rw  store: 0 | N | CPU N, show: status
//! /sys/.../mat/buffers_bytes     ro  filled bytes of the selected core
//! /dev/mat                       ro  sequential stream of the selected core
//! ```

pub mod attributes;
pub mod device;
pub mod page;
pub mod status;
pub mod surface;

pub use attributes::Attribute;
pub use device::{CaptureDevice, DeviceHandle};
pub use page::PageWriter;
pub use status::{CoreStatus, SegmentStatus, StatusReport};
pub use surface::ControlSurface;
