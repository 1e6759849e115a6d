//! Orchestrator (C11): wires C2→C3→C4→C5→C6→C9→C10 and emits events.
//!
//! The detector exclusively owns every sub-component's state. There are no
//! back-references and no shared mutable state between components; each
//! sub-component mutates only itself, driven by the orchestrator's
//! `process()` call.

use crate::config::PinchConfig;
use crate::error::{BuildError, DetectorError};
use crate::fusion::Fusion;
use crate::history::History;
use crate::ncc;
use crate::peak_fsm::{PeakCandidate, PeakFsm};
use crate::quality_gates::{self, GateInputs, GateState};
use crate::robust::RobustEstimator;
use crate::template_bank::TemplateBank;
use crate::types::{PinchEvent, PinchTemplate, SensorFrame};

/// Read-only telemetry snapshot; does not affect the hot path.
#[derive(Debug, Clone, Copy)]
pub struct DetectorStats {
    pub baseline: f32,
    pub sigma: f32,
    pub gate: f32,
    pub events_emitted: u64,
    pub gyro_quiet_run: u32,
}

pub struct Detector {
    config: PinchConfig,
    templates: Vec<PinchTemplate>,
    bank: TemplateBank,
    fusion: Fusion,
    robust: RobustEstimator,
    peak_fsm: PeakFsm,
    history: History,
    gate_state: GateState,
    t_prev: Option<f64>,
    t_session_start: Option<f64>,
    gate_now: f32,
    sigma_now: f32,
    events_emitted: u64,
}

impl Detector {
    /// Constructs all state and pre-expands the template bank. No hot-path
    /// allocation happens after this call returns.
    pub fn new(config: PinchConfig, templates: Vec<PinchTemplate>) -> Result<Self, BuildError> {
        config.validate()?;
        let bank = TemplateBank::build(&templates)?;

        let (pre_ms, post_ms) = templates
            .first()
            .map(|t| (t.pre_ms, t.post_ms))
            .unwrap_or((0, 0));
        let history = History::new(config.history_capacity(pre_ms, post_ms));

        let fusion = Fusion::new(config.low_hz, config.high_hz, config.fs, config.w_a, config.w_g);
        let robust = RobustEstimator::new(config.mad_win_s, config.fs);

        tracing::debug!(
            templates = templates.len(),
            history_capacity = history.capacity(),
            "detector constructed"
        );

        Ok(Self {
            config,
            templates,
            bank,
            fusion,
            robust,
            peak_fsm: PeakFsm::new(),
            history,
            gate_state: GateState::new(),
            t_prev: None,
            t_session_start: None,
            gate_now: 0.0,
            sigma_now: 0.0,
            events_emitted: 0,
        })
    }

    pub fn config(&self) -> &PinchConfig {
        &self.config
    }

    pub fn templates(&self) -> &[PinchTemplate] {
        &self.templates
    }

    pub fn stats(&self) -> DetectorStats {
        DetectorStats {
            baseline: self.robust.baseline(),
            sigma: self.sigma_now,
            gate: self.gate_now,
            events_emitted: self.events_emitted,
            gyro_quiet_run: self.gate_state.gyro_quiet_run(),
        }
    }

    /// The hot path. Returns at most one event per call.
    pub fn process(&mut self, frame: SensorFrame) -> Result<Option<PinchEvent>, DetectorError> {
        if !frame.t.is_finite()
            || !frame.ax.is_finite()
            || !frame.ay.is_finite()
            || !frame.az.is_finite()
            || !frame.gx.is_finite()
            || !frame.gy.is_finite()
            || !frame.gz.is_finite()
        {
            return Err(DetectorError::InvalidFrame("non-finite field"));
        }
        if let Some(t_prev) = self.t_prev {
            if !(frame.t > t_prev) {
                return Err(DetectorError::InvalidFrame("timestamp not strictly increasing"));
            }
        }
        self.t_prev = Some(frame.t);
        let t_session_start = *self.t_session_start.get_or_insert(frame.t);

        let fused = self
            .fusion
            .process(frame.ax, frame.ay, frame.az, frame.gx, frame.gy, frame.gz);
        let robust_sample = self.robust.update(fused.z);
        let gate = robust_sample.gate(self.config.k_gate);
        self.gate_now = gate;
        self.sigma_now = robust_sample.sigma;

        self.history.push(frame.t, fused.z);

        let gyro_mag = (frame.gx * frame.gx + frame.gy * frame.gy + frame.gz * frame.gz).sqrt();
        self.gate_state.observe_gyro(gyro_mag, self.config.gyro_veto_rad_s);

        let refractory_s = self.config.refractory_ms as f64 / 1000.0;
        let candidate = self.peak_fsm.step(fused.z, gate, frame.t, refractory_s);

        let event = match candidate {
            Some(c) => self.resolve_candidate(c, t_session_start, None),
            None => None,
        };
        if event.is_some() {
            self.events_emitted += 1;
        }
        Ok(event)
    }

    /// Applies end-of-stream bookend masking to any peak the FSM had not yet
    /// confirmed when the stream ended (still `Rising` or `Falling`). A
    /// synthetic, strictly-decreasing sample forces the FSM to conclude;
    /// this never touches the robust estimator or history, so it has no
    /// effect on a subsequent `reset()`-then-replay.
    pub fn finalize(&mut self, session_end_t: f64) -> Option<PinchEvent> {
        let t_session_start = self.t_session_start?;
        if session_end_t <= self.t_prev.unwrap_or(f64::NEG_INFINITY) {
            return None;
        }
        let forced_low = self.gate_now - self.sigma_now.max(1.0) - 1.0;
        let refractory_s = self.config.refractory_ms as f64 / 1000.0;
        let candidate = self
            .peak_fsm
            .step(forced_low, self.gate_now, session_end_t, refractory_s)?;
        let event = self.resolve_candidate(candidate, t_session_start, Some(session_end_t));
        if event.is_some() {
            self.events_emitted += 1;
        }
        event
    }

    /// Re-initializes every sub-state to its start-of-stream value. Config
    /// and templates survive.
    pub fn reset(&mut self) {
        self.fusion.reset();
        self.robust.reset();
        self.peak_fsm.reset();
        self.history.reset();
        self.gate_state.reset();
        self.t_prev = None;
        self.t_session_start = None;
        self.gate_now = 0.0;
        self.sigma_now = 0.0;
        self.events_emitted = 0;
    }

    fn resolve_candidate(
        &mut self,
        candidate: PeakCandidate,
        t_session_start: f64,
        t_session_end: Option<f64>,
    ) -> Option<PinchEvent> {
        let idx = self.history.nearest_index(candidate.t_peak)?;
        let window = self.history.extract_window(idx, self.bank.l);
        let (t_start, t_end) = self
            .history
            .window_time_bounds(idx, self.bank.l)
            .unwrap_or((candidate.t_peak, candidate.t_peak));

        let (ncc_score, matched) = if self.config.template_validation {
            match ncc::best_match(&window, &self.bank) {
                Some(m) if m.ncc >= self.config.ncc_thresh => (m.ncc, true),
                Some(_) => (0.0, false),
                None => (0.0, false),
            }
        } else {
            (0.0, true)
        };
        if !matched {
            tracing::trace!(t_peak = candidate.t_peak, "rejected: ncc below threshold");
            return None;
        }

        let inputs = GateInputs {
            candidate: &candidate,
            gate_at_peak: self.gate_now,
            sigma_at_peak: self.sigma_now,
            ncc: ncc_score,
        };
        if let Some(veto) = quality_gates::check(
            &inputs,
            &self.config,
            &self.gate_state,
            t_session_start,
            t_session_end,
        ) {
            tracing::trace!(t_peak = candidate.t_peak, ?veto, "peak vetoed");
            return None;
        }

        self.gate_state.commit_event(candidate.t_peak);

        let confidence = if self.config.template_validation {
            let surplus = candidate.value - self.gate_now;
            let amp_term = (surplus / (3.0 * self.sigma_now.max(1.0e-6))).clamp(0.0, 1.0);
            (0.6 * ncc_score + 0.4 * amp_term).clamp(0.0, 1.0)
        } else {
            1.0
        };

        Some(PinchEvent {
            t_peak: candidate.t_peak,
            t_start,
            t_end,
            confidence,
            raw_gate_score: candidate.value,
            ncc_score,
        })
    }
}
