//! O(1) exponentially-weighted Huber-M baseline with Winsorized MAD-like scale (C5).
//!
//! Huber clipping keeps a pinch from poisoning the baseline; Winsorizing the
//! scale update keeps it stable under the same impulsive excursions. Both
//! updates are single-pass and allocation-free.

const C_HUBER: f32 = 2.5;
const C_WINSOR: f32 = 3.5;
/// Absolute-deviation-to-Gaussian-sigma constant, sqrt(pi/2).
const MAD_TO_SIGMA: f32 = 1.253_314_1;
const MIN_SCALE: f32 = 1.0e-6;

#[derive(Debug, Clone, Copy)]
pub struct RobustEstimator {
    alpha: f32,
    beta: f32,
    baseline: f32,
    scale: f32,
    initialized: bool,
}

/// Baseline, scale (sigma) and gate threshold at a given sample.
#[derive(Debug, Clone, Copy)]
pub struct RobustSample {
    pub baseline: f32,
    pub sigma: f32,
}

impl RobustSample {
    #[inline]
    pub fn gate(&self, k_gate: f32) -> f32 {
        self.baseline + k_gate * self.sigma.max(1.0e-3)
    }
}

impl RobustEstimator {
    pub fn new(mad_win_s: f32, fs_hz: f32) -> Self {
        let n_eff = (mad_win_s * fs_hz).max(1.0);
        let alpha = 2.0 / (n_eff + 1.0);
        Self {
            alpha,
            beta: alpha,
            baseline: 0.0,
            scale: MIN_SCALE,
            initialized: false,
        }
    }

    #[inline]
    pub fn update(&mut self, z: f32) -> RobustSample {
        if !self.initialized {
            self.baseline = z;
            self.scale = (0.1 * z.abs()).max(MIN_SCALE);
            self.initialized = true;
        } else {
            let scale_floor = self.scale.max(MIN_SCALE);
            let r = z - self.baseline;
            let u = (r / scale_floor).clamp(-C_HUBER, C_HUBER);
            self.baseline += self.alpha * scale_floor * u;
            self.scale = (1.0 - self.beta) * self.scale
                + self.beta * r.abs().min(C_WINSOR * scale_floor);
        }
        RobustSample {
            baseline: self.baseline,
            sigma: self.scale * MAD_TO_SIGMA,
        }
    }

    pub fn reset(&mut self) {
        self.baseline = 0.0;
        self.scale = MIN_SCALE;
        self.initialized = false;
    }

    pub fn baseline(&self) -> f32 {
        self.baseline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Gauss32;

    #[test]
    fn first_sample_seeds_baseline_and_scale() {
        let mut r = RobustEstimator::new(3.0, 50.0);
        let s = r.update(4.0);
        assert_eq!(s.baseline, 4.0);
        assert!(s.sigma > 0.0);
    }

    #[test]
    fn tracks_gaussian_noise_baseline_and_sigma() {
        let mut r = RobustEstimator::new(3.0, 50.0);
        let mut g = Gauss32::new(42);
        let n = 10 * (3.0 * 50.0) as usize;
        let mut last = RobustSample { baseline: 0.0, sigma: 0.0 };
        for _ in 0..n {
            last = r.update(g.next_std());
        }
        assert!(last.baseline.abs() < 0.2, "baseline={}", last.baseline);
        assert!(
            (0.8..=1.2).contains(&last.sigma),
            "sigma={}",
            last.sigma
        );
    }

    #[test]
    fn huber_clip_limits_single_spike_influence() {
        let mut r = RobustEstimator::new(3.0, 50.0);
        for _ in 0..100 {
            r.update(0.0);
        }
        let before = r.baseline;
        r.update(1000.0);
        // One giant spike should move the baseline only a tiny, bounded amount.
        assert!((r.baseline - before).abs() < 1.0);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut r = RobustEstimator::new(3.0, 50.0);
        for i in 0..50 {
            r.update(i as f32 * 0.1);
        }
        r.reset();
        let fresh = RobustEstimator::new(3.0, 50.0);
        assert_eq!(r.baseline, fresh.baseline);
        assert_eq!(r.scale, fresh.scale);
        assert_eq!(r.initialized, fresh.initialized);
    }
}
