#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pinch_core::{Detector, PinchConfig, PinchTemplate, SensorFrame};

#[derive(Debug, Arbitrary)]
struct RawFrame {
    t_millis: u32,
    ax: f32,
    ay: f32,
    az: f32,
    gx: f32,
    gy: f32,
    gz: f32,
}

#[derive(Debug, Arbitrary)]
struct Input {
    frames: Vec<RawFrame>,
}

fn template() -> PinchTemplate {
    PinchTemplate {
        fs: 50.0,
        pre_ms: 40,
        post_ms: 60,
        data: vec![0.0, 0.2, 0.6, 1.0, 0.6, 0.2, 0.0],
        channel: "fused".to_string(),
        version: "fuzz".to_string(),
    }
}

// Asserts the "never crashes on pathological input" contract: arbitrary
// (including non-finite, non-monotonic) frame sequences must be rejected
// with `InvalidFrame`, never panic.
fuzz_target!(|input: Input| {
    let Ok(mut detector) = Detector::new(PinchConfig::default(), vec![template()]) else {
        return;
    };
    let mut t_acc_ms: u64 = 0;
    for raw in input.frames {
        t_acc_ms += raw.t_millis as u64;
        let frame = SensorFrame {
            t: t_acc_ms as f64 / 1000.0,
            ax: raw.ax,
            ay: raw.ay,
            az: raw.az,
            gx: raw.gx,
            gy: raw.gy,
            gz: raw.gz,
        };
        let _ = detector.process(frame);
    }
});
