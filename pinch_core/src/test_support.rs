//! Deterministic synthetic-signal helpers shared by unit and integration
//! tests. Not part of the public API.

/// Tiny deterministic PRNG (xorshift32), seeded for reproducible test streams.
#[derive(Clone)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() as f32) / (u32::MAX as f32 + 1.0)
    }
}

/// Box-Muller standard-normal generator built on [`XorShift32`].
#[derive(Clone)]
pub struct Gauss32 {
    rng: XorShift32,
    spare: Option<f32>,
}

impl Gauss32 {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: XorShift32::new(seed),
            spare: None,
        }
    }

    pub fn next_std(&mut self) -> f32 {
        if let Some(z) = self.spare.take() {
            return z;
        }
        let u1 = self.rng.next_f32().clamp(f32::EPSILON, 1.0 - f32::EPSILON);
        let u2 = self.rng.next_f32();
        let r = (-2.0 * u1.ln()).sqrt();
        let th = 2.0 * core::f32::consts::PI * u2;
        let z0 = r * th.cos();
        let z1 = r * th.sin();
        self.spare = Some(z1);
        z0
    }

    pub fn next_with_sigma(&mut self, sigma: f32) -> f32 {
        self.next_std() * sigma
    }
}

/// A unit triangular bump of the given width and peak amplitude, centered on
/// `center_t`, sampled at `fs`, added on top of a zero baseline for `dur_s`
/// seconds starting at t=0. Returns `(t, value)` pairs.
pub fn triangular_bump(dur_s: f64, fs: f32, center_t: f64, width_ms: f64, amp: f32) -> Vec<(f64, f32)> {
    let n = (dur_s * fs as f64).round() as usize;
    let half_width_s = (width_ms / 1000.0) / 2.0;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let t = i as f64 / fs as f64;
        let d = (t - center_t).abs();
        let v = if d < half_width_s {
            amp * (1.0 - (d / half_width_s) as f32)
        } else {
            0.0
        };
        out.push((t, v));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauss_has_roughly_unit_variance_over_many_draws() {
        let mut g = Gauss32::new(7);
        let n = 20_000;
        let vals: Vec<f32> = (0..n).map(|_| g.next_std()).collect();
        let mean = vals.iter().sum::<f32>() / n as f32;
        let var = vals.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n as f32;
        assert!(mean.abs() < 0.05, "mean={mean}");
        assert!((0.9..=1.1).contains(&var), "var={var}");
    }

    #[test]
    fn triangular_bump_peaks_at_center() {
        let bump = triangular_bump(1.0, 50.0, 0.5, 100.0, 0.4);
        let peak = bump.iter().cloned().fold((0.0, f32::MIN), |acc, (t, v)| {
            if v > acc.1 {
                (t, v)
            } else {
                acc
            }
        });
        assert!((peak.0 - 0.5).abs() < 0.02);
        assert!((peak.1 - 0.4).abs() < 0.02);
    }
}
