#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Streaming micro-gesture detection core (hardware-agnostic).
//!
//! Ingests a 50 Hz six-axis inertial stream and emits discrete "pinch"
//! events in real time, sample by sample, with bounded latency.
//!
//! ## Architecture
//!
//! - **Filtering**: causal band-pass (`biquad`, `bandpass`) and per-axis
//!   TKEO (`tkeo`), fused into one activity scalar (`fusion`).
//! - **Baseline**: O(1) robust location/scale tracking (`robust`).
//! - **Peak detection**: gated rising/falling state machine (`peak_fsm`).
//! - **Template matching**: pre-expanded template bank and NCC search
//!   (`template_bank`, `ncc`), backed by a fixed-capacity signal history
//!   (`history`).
//! - **Quality gates**: motion veto, amplitude surplus, ISI, bookend,
//!   width (`quality_gates`).
//! - **Orchestrator**: `detector::Detector` owns every sub-component and
//!   exposes the public `process`/`reset`/`finalize` contract.

mod bandpass;
mod biquad;
mod config;
mod detector;
mod error;
mod fusion;
mod history;
mod ncc;
mod peak_fsm;
mod quality_gates;
mod robust;
mod template_bank;
mod tkeo;
mod types;

#[cfg(test)]
mod test_support;

pub use config::PinchConfig;
pub use detector::{Detector, DetectorStats};
pub use error::{BuildError, DetectorError};
pub use template_bank::SCALES as TEMPLATE_SCALES;
pub use types::{PinchEvent, PinchTemplate, SensorFrame};
