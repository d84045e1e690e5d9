//! # Control Surface
//!
//! Text endpoints with sysfs semantics on top of [`CaptureState`]: `show`
//! renders an attribute, `store` parses and applies a write and returns the
//! number of input bytes consumed.
//!
//! ## `buffers` store
//!
//! | Input   | Effect                                                   |
//! |---------|----------------------------------------------------------|
//! | `0`     | free every segment on every core                         |
//! | `N`     | reallocate every core with `N`-sample segments           |
//! | `X N`   | reallocate only core `X` (`1 <= X < cpus`) with `N`      |
//!
//! Anything else is an invalid argument.

use log::{debug, error};

use super::attributes::{scan_integers, scan_one, Attribute};
use super::status::StatusReport;
use crate::capture::{ByteSink, CaptureState};
use crate::config::CaptureConfig;
use crate::domain::{CaptureError, CoreFilter, CoreId};

pub struct ControlSurface {
    state: CaptureState,
}

impl ControlSurface {
    #[must_use]
    pub fn new(config: CaptureConfig) -> Self {
        Self { state: CaptureState::init(config) }
    }

    #[must_use]
    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CaptureState {
        &mut self.state
    }

    /// Render an attribute
    #[must_use]
    pub fn show(&self, attr: Attribute) -> String {
        debug!("show {attr}");
        match attr {
            Attribute::BuffersEnabled => format!("{}\n", u8::from(self.state.enabled())),
            Attribute::Cpu => format!("{}\n", self.state.core_filter()),
            Attribute::Buffers => self.status().render(self.state.core_filter()),
            Attribute::BuffersBytes => format!("{}\n", self.byte_count()),
        }
    }

    /// Apply a write to an attribute
    ///
    /// # Errors
    /// Returns the error of the underlying operation; [`CaptureError::ReadOnly`]
    /// for `buffers_bytes`.
    pub fn store(&mut self, attr: Attribute, input: &str) -> Result<usize, CaptureError> {
        debug!("store {attr} count={} input={:?}", input.len(), input.trim_end());
        let result = match attr {
            Attribute::BuffersEnabled => self.set_enabled_raw(scan_one(input)?),
            Attribute::Cpu => self.set_core_filter(scan_one(input)?),
            Attribute::Buffers => {
                let args = scan_integers(input, 2);
                let Some(&arg1) = args.first() else {
                    return Err(CaptureError::invalid(format!(
                        "expected `0`, `N` or `CPU N`, got {:?}",
                        input.trim()
                    )));
                };
                self.configure(arg1, args.get(1).copied())
            }
            Attribute::BuffersBytes => Err(CaptureError::ReadOnly(attr.name().to_string())),
        };

        match result {
            Ok(()) => Ok(input.len()),
            Err(e) => {
                error!("store {attr} failed: {e}");
                Err(e)
            }
        }
    }

    /// Set the enabled flag from its raw value; only `0` and `1` are valid
    ///
    /// # Errors
    /// Returns [`CaptureError::InvalidArgument`] for any other value
    pub fn set_enabled_raw(&mut self, raw: i64) -> Result<(), CaptureError> {
        match raw {
            0 | 1 => {
                self.state.set_enabled(raw == 1);
                Ok(())
            }
            _ => Err(CaptureError::invalid(format!("enabled must be 0 or 1, got {raw}"))),
        }
    }

    /// Select a core (`-1` for all)
    ///
    /// # Errors
    /// Returns [`CaptureError::InvalidArgument`] outside `[-1, cpus)`
    pub fn set_core_filter(&mut self, raw: i64) -> Result<(), CaptureError> {
        let cpus = self.state.cpu_count();
        let filter = CoreFilter::parse(raw, cpus)
            .ok_or_else(|| CaptureError::invalid(format!("cpu must be in [-1, {cpus}), got {raw}")))?;
        self.state.set_core_filter(filter);
        Ok(())
    }

    /// Deallocate or (re)allocate buffers
    ///
    /// `arg2 == None` and `arg2 == Some(-1)` both mean "absent".
    ///
    /// # Errors
    /// - [`CaptureError::InvalidArgument`] for an unsupported combination
    /// - [`CaptureError::CapacityExceeded`] if the global budget would break
    /// - [`CaptureError::AllocationFailure`] if memory is unavailable
    pub fn configure(&mut self, arg1: i64, arg2: Option<i64>) -> Result<(), CaptureError> {
        let arg2 = arg2.filter(|&v| v != -1);
        let cpus = self.state.cpu_count();

        match (arg1, arg2) {
            (0, _) => {
                self.state.deallocate_all();
                Ok(())
            }
            (capacity, None) if capacity > 0 => self.state.allocate_all_cores(capacity.unsigned_abs()),
            (core, Some(capacity)) if core > 0 && capacity > 0 => {
                let core = usize::try_from(core)
                    .ok()
                    .filter(|&c| c < cpus)
                    .ok_or_else(|| CaptureError::invalid(format!("cpu {core} not in [1, {cpus})")))?;
                self.state.allocate_core(CoreId(core), capacity.unsigned_abs())
            }
            _ => Err(CaptureError::invalid(format!("unsupported buffers request: {arg1} {arg2:?}"))),
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusReport {
        StatusReport::collect(&self.state)
    }

    /// Filled bytes of the selected core, 0 if no single core is selected
    #[must_use]
    pub fn byte_count(&self) -> u64 {
        self.state.core_filter().core().map_or(0, |core| self.state.filled_bytes(core))
    }

    /// Read from the selected core's stream
    ///
    /// # Errors
    /// - [`CaptureError::Disabled`] while capture is off
    /// - [`CaptureError::InvalidArgument`] if no single core is selected
    /// - any error of [`crate::capture::SequentialReader::read`]
    pub fn read<S>(&self, offset: u64, length: u64, sink: &mut S) -> Result<u64, CaptureError>
    where
        S: ByteSink + ?Sized,
    {
        if !self.state.enabled() {
            error!("read while capture disabled");
            return Err(CaptureError::Disabled);
        }
        let core = self
            .state
            .core_filter()
            .core()
            .ok_or_else(|| CaptureError::invalid("read requires a single selected cpu"))?;
        self.state.read(core, offset, length, sink)
    }

    /// Disable capture and free every buffer
    pub fn teardown(&mut self) {
        self.state.teardown();
    }
}
