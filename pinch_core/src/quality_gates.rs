//! Post-peak quality gates (C10): every veto a confirmed peak must clear
//! before it becomes a [`crate::types::PinchEvent`].

use crate::config::PinchConfig;
use crate::peak_fsm::PeakCandidate;

/// Tracks the running state the gates need beyond the peak candidate itself:
/// the gyro-quiet run length and the last emitted event's timestamp.
#[derive(Debug, Clone, Copy)]
pub struct GateState {
    gyro_quiet_run: u32,
    t_last_event: f64,
}

impl Default for GateState {
    fn default() -> Self {
        Self::new()
    }
}

impl GateState {
    pub fn new() -> Self {
        Self {
            gyro_quiet_run: 0,
            t_last_event: f64::NEG_INFINITY,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Feed one frame's raw gyro magnitude; call once per `process()`
    /// regardless of whether a peak fired, so the run length tracks the
    /// stream continuously (the spec requires the FSM stay consistent even
    /// on vetoed peaks; the veto run-length is no different).
    pub fn observe_gyro(&mut self, gyro_mag: f32, veto_threshold: f32) {
        if gyro_mag <= veto_threshold {
            self.gyro_quiet_run = self.gyro_quiet_run.saturating_add(1);
        } else {
            self.gyro_quiet_run = 0;
        }
    }

    pub fn commit_event(&mut self, t_peak: f64) {
        self.t_last_event = t_peak;
    }

    pub fn last_event_t(&self) -> f64 {
        self.t_last_event
    }

    pub fn gyro_quiet_run(&self) -> u32 {
        self.gyro_quiet_run
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateVeto {
    Bookend,
    GyroMotion,
    AmplitudeSurplus,
    InterSpikeInterval,
    Width,
}

/// Everything the gates need about the peak besides the candidate itself:
/// the instantaneous gate threshold and estimator sigma at `t_peak`, and the
/// NCC score from the matcher (0 when template validation is disabled).
pub struct GateInputs<'a> {
    pub candidate: &'a PeakCandidate,
    pub gate_at_peak: f32,
    pub sigma_at_peak: f32,
    pub ncc: f32,
}

/// Runs every gate in spec order (§4.8), short-circuiting on the first veto.
pub fn check(
    inputs: &GateInputs<'_>,
    cfg: &PinchConfig,
    state: &GateState,
    t_session_start: f64,
    t_session_end: Option<f64>,
) -> Option<GateVeto> {
    bookend_gate(inputs.candidate, cfg, t_session_start, t_session_end)
        .or_else(|| gyro_motion_gate(cfg, state))
        .or_else(|| amplitude_surplus_gate(inputs, cfg))
        .or_else(|| isi_gate(inputs, cfg, state))
        .or_else(|| width_gate(inputs.candidate, cfg))
}

fn bookend_gate(
    candidate: &PeakCandidate,
    cfg: &PinchConfig,
    t_session_start: f64,
    t_session_end: Option<f64>,
) -> Option<GateVeto> {
    let ignore_start_s = cfg.ignore_start_ms as f64 / 1000.0;
    if candidate.t_peak - t_session_start < ignore_start_s {
        return Some(GateVeto::Bookend);
    }
    if let Some(end) = t_session_end {
        let ignore_end_s = cfg.ignore_end_ms as f64 / 1000.0;
        if end - candidate.t_peak < ignore_end_s {
            return Some(GateVeto::Bookend);
        }
    }
    None
}

fn gyro_motion_gate(cfg: &PinchConfig, state: &GateState) -> Option<GateVeto> {
    let required_run = ((cfg.gyro_hold_ms as f32 * cfg.fs / 1000.0).round() as u32).max(1);
    if state.gyro_quiet_run < required_run {
        return Some(GateVeto::GyroMotion);
    }
    None
}

fn amplitude_surplus_gate(inputs: &GateInputs<'_>, cfg: &PinchConfig) -> Option<GateVeto> {
    let required = cfg.amp_surplus_sigma * inputs.sigma_at_peak.max(1.0e-6);
    let surplus = inputs.candidate.value - inputs.gate_at_peak;
    if surplus < required {
        return Some(GateVeto::AmplitudeSurplus);
    }
    None
}

fn isi_gate(inputs: &GateInputs<'_>, cfg: &PinchConfig, state: &GateState) -> Option<GateVeto> {
    if cfg.isi_ms == 0 {
        return None;
    }
    if inputs.ncc >= 0.90 {
        return None;
    }
    let isi_s = cfg.isi_ms as f64 / 1000.0;
    if inputs.candidate.t_peak - state.t_last_event < isi_s {
        return Some(GateVeto::InterSpikeInterval);
    }
    None
}

fn width_gate(candidate: &PeakCandidate, cfg: &PinchConfig) -> Option<GateVeto> {
    let span_ms = candidate.above_gate_span_ms();
    if span_ms < cfg.min_width_ms as f64 || span_ms > cfg.max_width_ms as f64 {
        return Some(GateVeto::Width);
    }
    None
}
