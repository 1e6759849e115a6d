//! Band-pass + TKEO per axis, triad L2 magnitude, and weighted fusion (C2-C4).

use crate::bandpass::BandPass;
use crate::tkeo::Tkeo;

/// Band-pass + TKEO chain for a single axis.
#[derive(Debug, Clone, Copy)]
struct AxisChain {
    bp: BandPass,
    tkeo: Tkeo,
}

impl AxisChain {
    fn new(low_hz: f32, high_hz: f32, fs_hz: f32) -> Self {
        Self {
            bp: BandPass::new(low_hz, high_hz, fs_hz),
            tkeo: Tkeo::default(),
        }
    }

    #[inline]
    fn process(&mut self, x: f32) -> f32 {
        self.tkeo.process(self.bp.process(x))
    }

    fn reset(&mut self) {
        self.bp.reset();
        self.tkeo.reset();
    }
}

/// Three-axis chain plus its L2 fusion.
#[derive(Debug, Clone, Copy)]
struct Triad {
    x: AxisChain,
    y: AxisChain,
    z: AxisChain,
}

impl Triad {
    fn new(low_hz: f32, high_hz: f32, fs_hz: f32) -> Self {
        Self {
            x: AxisChain::new(low_hz, high_hz, fs_hz),
            y: AxisChain::new(low_hz, high_hz, fs_hz),
            z: AxisChain::new(low_hz, high_hz, fs_hz),
        }
    }

    #[inline]
    fn process(&mut self, x: f32, y: f32, z: f32) -> f32 {
        let ex = self.x.process(x);
        let ey = self.y.process(y);
        let ez = self.z.process(z);
        (ex * ex + ey * ey + ez * ez).sqrt()
    }

    fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
        self.z.reset();
    }
}

/// Combines the accel and gyro triads into the scalar activity score `z`.
#[derive(Debug, Clone, Copy)]
pub struct Fusion {
    accel: Triad,
    gyro: Triad,
    w_a: f32,
    w_g: f32,
}

/// Per-triad magnitudes plus the fused scalar, useful for telemetry.
#[derive(Debug, Clone, Copy)]
pub struct FusionSample {
    pub m_a: f32,
    pub m_g: f32,
    pub z: f32,
}

impl Fusion {
    pub fn new(low_hz: f32, high_hz: f32, fs_hz: f32, w_a: f32, w_g: f32) -> Self {
        Self {
            accel: Triad::new(low_hz, high_hz, fs_hz),
            gyro: Triad::new(low_hz, high_hz, fs_hz),
            w_a,
            w_g,
        }
    }

    #[inline]
    pub fn process(&mut self, ax: f32, ay: f32, az: f32, gx: f32, gy: f32, gz: f32) -> FusionSample {
        let m_a = self.accel.process(ax, ay, az);
        let m_g = self.gyro.process(gx, gy, gz);
        FusionSample {
            m_a,
            m_g,
            z: self.w_a * m_a + self.w_g * m_g,
        }
    }

    pub fn reset(&mut self) {
        self.accel.reset();
        self.gyro.reset();
    }
}
