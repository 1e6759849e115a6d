#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Boundary traits external collaborators implement around `pinch_core`.
//!
//! - `FrameSource` pulls `SensorFrame`s from wherever they come from (CSV
//!   replay, a live transport, a synthetic generator).
//! - `EventSink` is where emitted `PinchEvent`s go.
//!
//! `pinch_core` depends on neither: `Detector::process` takes a frame by
//! value and returns `Option<PinchEvent>` directly, so integrators compose
//! these traits themselves instead of the core holding a callback.

use pinch_core::{PinchEvent, SensorFrame};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameSourceError {
    #[error("frame source exhausted or failed: {0}")]
    Read(String),
}

/// Pull-based source of sensor frames.
pub trait FrameSource {
    /// Returns the next frame, or `Ok(None)` once the stream is exhausted.
    fn next(&mut self) -> Result<Option<SensorFrame>, FrameSourceError>;
}

/// Destination for emitted pinch events.
pub trait EventSink {
    fn handle(&mut self, event: PinchEvent);
}

impl<T: ?Sized + FrameSource> FrameSource for Box<T> {
    fn next(&mut self) -> Result<Option<SensorFrame>, FrameSourceError> {
        (**self).next()
    }
}

impl<T: ?Sized + EventSink> EventSink for Box<T> {
    fn handle(&mut self, event: PinchEvent) {
        (**self).handle(event)
    }
}

/// Appends every handled event to a `Vec`; used by tests and simple replay.
#[derive(Debug, Default)]
pub struct VecSink {
    pub events: Vec<PinchEvent>,
}

impl EventSink for VecSink {
    fn handle(&mut self, event: PinchEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_collects_events_in_order() {
        let mut sink = VecSink::default();
        let ev = PinchEvent {
            t_peak: 1.0,
            t_start: 0.9,
            t_end: 1.1,
            confidence: 0.8,
            raw_gate_score: 1.0,
            ncc_score: 0.7,
        };
        sink.handle(ev);
        sink.handle(ev);
        assert_eq!(sink.events.len(), 2);
    }
}
