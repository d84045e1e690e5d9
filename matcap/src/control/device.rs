//! Character-device style access to the capture buffers.
//!
//! [`CaptureDevice`] serializes every configuration call and producer write
//! behind one lock and hands out at most one [`DeviceHandle`] at a time.
//! The handle reads the selected core's stream at its own file position.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info};
use matcap_common::{Sample, DEVICE_NAME};

use super::attributes::Attribute;
use super::status::StatusReport;
use super::surface::ControlSurface;
use crate::capture::SliceSink;
use crate::config::CaptureConfig;
use crate::domain::{CaptureError, CoreId};

pub struct CaptureDevice {
    surface: Mutex<ControlSurface>,
    open: AtomicBool,
}

impl CaptureDevice {
    #[must_use]
    pub fn new(config: CaptureConfig) -> Arc<Self> {
        info!("/dev/{DEVICE_NAME}: registered");
        Arc::new(Self { surface: Mutex::new(ControlSurface::new(config)), open: AtomicBool::new(false) })
    }

    fn lock(&self) -> MutexGuard<'_, ControlSurface> {
        self.surface.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open the device for reading
    ///
    /// # Errors
    /// Returns [`CaptureError::Busy`] while another handle is open
    pub fn open(self: &Arc<Self>) -> Result<DeviceHandle, CaptureError> {
        if self.open.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
            debug!("/dev/{DEVICE_NAME}: open rejected, already in use");
            return Err(CaptureError::Busy);
        }
        debug!("/dev/{DEVICE_NAME}: opened");
        Ok(DeviceHandle { device: Arc::clone(self), position: 0 })
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn show(&self, attr: Attribute) -> String {
        self.lock().show(attr)
    }

    /// # Errors
    /// See [`ControlSurface::store`]
    pub fn store(&self, attr: Attribute, input: &str) -> Result<usize, CaptureError> {
        self.lock().store(attr, input)
    }

    #[must_use]
    pub fn status_report(&self) -> StatusReport {
        self.lock().status()
    }

    /// Producer write for one core
    pub fn record(&self, core: CoreId, sample: Sample) -> bool {
        self.lock().state_mut().record(core, sample)
    }

    /// Producer write for a run of samples; returns how many were stored
    pub fn record_batch(&self, core: CoreId, samples: &[Sample]) -> usize {
        let mut surface = self.lock();
        samples.iter().take_while(|&&sample| surface.state_mut().record(core, sample)).count()
    }

    /// Disable capture and release every buffer
    pub fn shutdown(&self) {
        self.lock().teardown();
        info!("/dev/{DEVICE_NAME}: shut down");
    }
}

/// An open device; dropping it releases the device
pub struct DeviceHandle {
    device: Arc<CaptureDevice>,
    position: u64,
}

impl DeviceHandle {
    /// Fill `buf` from the selected core's stream at the current position
    ///
    /// The position advances only when the whole read succeeds.
    ///
    /// # Errors
    /// See [`ControlSurface::read`]
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, CaptureError> {
        let mut sink = SliceSink::new(buf);
        let length = sink.remaining() as u64;
        let copied = self.device.lock().read(self.position, length, &mut sink)?;
        self.position += copied;
        Ok(sink.written())
    }

    pub fn seek(&mut self, position: u64) {
        self.position = position;
    }

    #[must_use]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// # Errors
    /// Always [`CaptureError::ReadOnly`]: the device accepts no writes
    pub fn write(&mut self, _buf: &[u8]) -> Result<usize, CaptureError> {
        Err(CaptureError::ReadOnly(format!("/dev/{DEVICE_NAME}")))
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        self.device.open.store(false, Ordering::Release);
        debug!("/dev/{DEVICE_NAME}: released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::AllocationPolicy;

    fn device() -> Arc<CaptureDevice> {
        CaptureDevice::new(CaptureConfig {
            cpu_count: 2,
            segments_per_core: 8,
            buffer_limit: 1 << 20,
            allocation_policy: AllocationPolicy::Atomic,
        })
    }

    #[test]
    fn test_single_open() {
        let device = device();
        let handle = device.open().unwrap();
        assert!(device.is_open());
        assert!(matches!(device.open(), Err(CaptureError::Busy)));
        drop(handle);
        assert!(!device.is_open());
        assert!(device.open().is_ok());
    }

    #[test]
    fn test_write_is_rejected() {
        let device = device();
        let mut handle = device.open().unwrap();
        assert!(matches!(handle.write(b"x"), Err(CaptureError::ReadOnly(_))));
    }

    #[test]
    fn test_sequential_reads_advance_position() {
        let device = device();
        device.store(Attribute::BuffersEnabled, "1").unwrap();
        device.store(Attribute::Buffers, "2").unwrap();
        device.store(Attribute::Cpu, "1").unwrap();
        let samples: Vec<Sample> = (1..=5).collect();
        assert_eq!(device.record_batch(CoreId(1), &samples), 5);
        assert_eq!(device.show(Attribute::BuffersBytes), "40\n");

        let mut handle = device.open().unwrap();
        let mut buf = [0u8; 16];
        assert_eq!(handle.read(&mut buf).unwrap(), 16);
        assert_eq!(buf[..8], 1u64.to_ne_bytes());
        assert_eq!(handle.position(), 16);

        assert_eq!(handle.read(&mut buf).unwrap(), 16);
        assert_eq!(buf[8..], 4u64.to_ne_bytes());

        // only 8 bytes remain; a 16-byte read is out of range and keeps the position
        assert!(matches!(handle.read(&mut buf), Err(CaptureError::OutOfRange { .. })));
        assert_eq!(handle.position(), 32);

        handle.seek(36);
        let mut tail = [0u8; 4];
        assert_eq!(handle.read(&mut tail).unwrap(), 4);
        assert_eq!(handle.position(), 40);
    }

    #[test]
    fn test_record_batch_stops_when_full() {
        let device = device();
        device.store(Attribute::BuffersEnabled, "1").unwrap();
        device.store(Attribute::Buffers, "1").unwrap();
        let samples = [7u64; 10];
        assert_eq!(device.record_batch(CoreId(0), &samples), 8);
        assert!(!device.record(CoreId(0), 7));
    }

    #[test]
    fn test_shutdown_releases_buffers() {
        let device = device();
        device.store(Attribute::BuffersEnabled, "1").unwrap();
        device.store(Attribute::Buffers, "4").unwrap();
        device.shutdown();
        assert_eq!(device.show(Attribute::BuffersEnabled), "0\n");
        assert_eq!(device.status_report().total_capacity, 0);
    }
}
