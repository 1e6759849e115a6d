//! Gated peak state machine (C6): BelowGate / Rising / Falling with refractory period.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FsmState {
    BelowGate,
    Rising,
    Falling,
}

/// A peak the FSM has decided to emit, before quality gates run.
#[derive(Debug, Clone, Copy)]
pub struct PeakCandidate {
    pub value: f32,
    pub t_peak: f64,
    /// Timestamp the signal first crested the gate for this candidate.
    pub rising_start_t: f64,
    /// Timestamp the signal was last observed climbing (end of the Rising span).
    pub falling_entered_t: f64,
}

impl PeakCandidate {
    /// Duration, in milliseconds, the signal spent above the gate while rising.
    pub fn above_gate_span_ms(&self) -> f64 {
        (self.falling_entered_t - self.rising_start_t) * 1000.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PeakFsm {
    state: FsmState,
    has_prev: bool,
    z_prev: f32,
    g_prev: f32,
    peak_value: f32,
    peak_t: f64,
    rising_start_t: f64,
    falling_entered_t: f64,
    t_last_emit: f64,
}

impl Default for PeakFsm {
    fn default() -> Self {
        Self::new()
    }
}

impl PeakFsm {
    pub fn new() -> Self {
        Self {
            state: FsmState::BelowGate,
            has_prev: false,
            z_prev: 0.0,
            g_prev: 0.0,
            peak_value: 0.0,
            peak_t: 0.0,
            rising_start_t: 0.0,
            falling_entered_t: 0.0,
            t_last_emit: f64::NEG_INFINITY,
        }
    }

    /// Feed one sample. Returns a candidate if the FSM just confirmed a peak
    /// past the refractory window (quality gates may still veto it).
    pub fn step(&mut self, z: f32, g: f32, t: f64, refractory_s: f64) -> Option<PeakCandidate> {
        if !self.has_prev {
            self.has_prev = true;
            self.z_prev = z;
            self.g_prev = g;
            return None;
        }

        let mut emitted = None;
        match self.state {
            FsmState::BelowGate => {
                if self.z_prev <= self.g_prev && z > g {
                    self.state = FsmState::Rising;
                    self.peak_value = z;
                    self.peak_t = t;
                    self.rising_start_t = t;
                }
            }
            FsmState::Rising => {
                if z >= self.z_prev {
                    if z > self.peak_value {
                        self.peak_value = z;
                        self.peak_t = t;
                    }
                } else {
                    self.state = FsmState::Falling;
                    self.falling_entered_t = t;
                }
            }
            FsmState::Falling => {
                if z > g && z > self.z_prev {
                    self.state = FsmState::Rising;
                    self.peak_value = z;
                    self.peak_t = t;
                    self.rising_start_t = t;
                } else {
                    if self.peak_value > g && (self.peak_t - self.t_last_emit) >= refractory_s {
                        emitted = Some(PeakCandidate {
                            value: self.peak_value,
                            t_peak: self.peak_t,
                            rising_start_t: self.rising_start_t,
                            falling_entered_t: self.falling_entered_t,
                        });
                        self.t_last_emit = self.peak_t;
                    }
                    self.state = FsmState::BelowGate;
                }
            }
        }

        self.z_prev = z;
        self.g_prev = g;
        emitted
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
