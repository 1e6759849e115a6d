//! Runtime configuration for [`crate::detector::Detector`].
//!
//! This is the in-memory struct the detector is built from. TOML
//! deserialization and on-disk defaults live in `pinch_config`, which
//! converts into this type.

use crate::error::BuildError;

/// Tunable parameters for one detector instance. Immutable for the lifetime
/// of the detector it constructs.
#[derive(Debug, Clone, PartialEq)]
pub struct PinchConfig {
    /// Sampling rate, Hz.
    pub fs: f32,
    /// Band-pass low cutoff, Hz.
    pub low_hz: f32,
    /// Band-pass high cutoff, Hz.
    pub high_hz: f32,
    /// Accel triad fusion weight.
    pub w_a: f32,
    /// Gyro triad fusion weight.
    pub w_g: f32,
    /// Robust baseline/scale window, seconds.
    pub mad_win_s: f32,
    /// Gate multiplier, sigmas above baseline.
    pub k_gate: f32,
    /// Minimum time between emitted events, milliseconds.
    pub refractory_ms: u32,
    /// Minimum NCC to accept a template match.
    pub ncc_thresh: f32,
    /// Suppress events within this many ms of session start.
    pub ignore_start_ms: u32,
    /// Suppress events within this many ms of session end.
    pub ignore_end_ms: u32,
    /// Gyro motion veto threshold, rad/s.
    pub gyro_veto_rad_s: f32,
    /// Required quiet run length before a peak is admitted, milliseconds.
    pub gyro_hold_ms: u32,
    /// Minimum surplus above gate, in sigmas, to accept a peak.
    pub amp_surplus_sigma: f32,
    /// Minimum inter-spike interval, milliseconds (0 disables the guard).
    pub isi_ms: u32,
    /// Whether template NCC matching runs at all.
    pub template_validation: bool,
    pub min_width_ms: u32,
    pub max_width_ms: u32,
}

impl Default for PinchConfig {
    /// The "balanced" preset.
    fn default() -> Self {
        Self {
            fs: 50.0,
            low_hz: 3.0,
            high_hz: 20.0,
            w_a: 1.0,
            w_g: 1.5,
            mad_win_s: 3.0,
            k_gate: 3.5,
            refractory_ms: 150,
            ncc_thresh: 0.60,
            ignore_start_ms: 200,
            ignore_end_ms: 200,
            gyro_veto_rad_s: 3.0,
            gyro_hold_ms: 50,
            amp_surplus_sigma: 0.0,
            isi_ms: 0,
            template_validation: true,
            min_width_ms: 70,
            max_width_ms: 350,
        }
    }
}

impl PinchConfig {
    /// Sanity-checks the configuration. Called by [`crate::detector::Detector::new`]
    /// before any state is allocated.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.fs <= 0.0 {
            return Err(BuildError::InvalidConfig("fs must be positive"));
        }
        if self.high_hz <= self.low_hz {
            return Err(BuildError::InvalidConfig("high_hz must exceed low_hz"));
        }
        if self.w_a < 0.0 || self.w_g < 0.0 {
            return Err(BuildError::InvalidConfig("fusion weights must be non-negative"));
        }
        if self.mad_win_s <= 0.0 {
            return Err(BuildError::InvalidConfig("mad_win_s must be positive"));
        }
        if self.min_width_ms == 0 || self.max_width_ms == 0 {
            return Err(BuildError::InvalidConfig("width gate bounds must be positive"));
        }
        if self.min_width_ms > self.max_width_ms {
            return Err(BuildError::InvalidConfig("min_width_ms must not exceed max_width_ms"));
        }
        Ok(())
    }

    /// History capacity in samples: `ceil(2*(pre_ms+post_ms)*fs/1000)`.
    pub fn history_capacity(&self, pre_ms: u32, post_ms: u32) -> usize {
        let window_ms = (pre_ms + post_ms) as f32;
        ((2.0 * window_ms * self.fs / 1000.0).ceil() as usize).max(1)
    }
}
