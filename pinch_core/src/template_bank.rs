//! Pre-expanded template bank (C7): every template warped to three time scales
//! so the hot path only ever does fixed-size dot products.

use crate::error::BuildError;
use crate::types::PinchTemplate;

/// Time-warp scales pre-expanded at construction, per spec.
pub const SCALES: [f32; 3] = [0.95, 1.00, 1.05];

/// One warped, zero-mean-centered variant of an input template.
#[derive(Debug, Clone)]
pub struct ExpandedTemplate {
    pub template_id: usize,
    pub scale: f32,
    pub centered: Vec<f32>,
    pub ss: f32,
}

#[derive(Debug, Clone)]
pub struct TemplateBank {
    pub l: usize,
    pub expanded: Vec<ExpandedTemplate>,
}

impl TemplateBank {
    pub fn build(templates: &[PinchTemplate]) -> Result<Self, BuildError> {
        let Some(first) = templates.first() else {
            return Err(BuildError::EmptyTemplateBundle);
        };
        let l = first.data.len();
        for (idx, t) in templates.iter().enumerate() {
            if t.data.len() != l {
                return Err(BuildError::TemplateLengthMismatch {
                    template_index: idx,
                    expected: l,
                    actual: t.data.len(),
                });
            }
        }

        let mut expanded = Vec::with_capacity(templates.len() * SCALES.len());
        for (template_id, t) in templates.iter().enumerate() {
            for &scale in &SCALES {
                let resampled = resample_linear(&t.data, scale);
                let (centered, ss) = center_and_sum_sq(&resampled);
                expanded.push(ExpandedTemplate {
                    template_id,
                    scale,
                    centered,
                    ss,
                });
            }
        }

        tracing::debug!(
            templates = templates.len(),
            scales = SCALES.len(),
            l,
            "expanded template bank built"
        );

        Ok(Self { l, expanded })
    }
}

pub(crate) fn center_and_sum_sq(data: &[f32]) -> (Vec<f32>, f32) {
    let n = data.len().max(1) as f32;
    let mean = data.iter().sum::<f32>() / n;
    let centered: Vec<f32> = data.iter().map(|v| v - mean).collect();
    let ss = centered.iter().map(|v| v * v).sum();
    (centered, ss)
}

/// Resample `data` (length L) to a warped version still of length L, by
/// mapping target index `i` through a virtual length `round(L*scale)` back
/// into source index space, linearly interpolating with clamped endpoints.
fn resample_linear(data: &[f32], scale: f32) -> Vec<f32> {
    let l = data.len();
    if l < 2 {
        return data.to_vec();
    }
    let vl = ((l as f32 * scale).round() as usize).max(2);
    let mut out = Vec::with_capacity(l);
    for i in 0..l {
        let pos = (i as f32 * (l as f32 - 1.0) / (vl as f32 - 1.0)).clamp(0.0, (l - 1) as f32);
        let lo = pos.floor() as usize;
        let hi = (lo + 1).min(l - 1);
        let frac = pos - lo as f32;
        out.push(data[lo] * (1.0 - frac) + data[hi] * frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmpl(data: Vec<f32>) -> PinchTemplate {
        PinchTemplate {
            fs: 50.0,
            pre_ms: 40,
            post_ms: 60,
            data,
            channel: "fused".to_string(),
            version: "v1".to_string(),
        }
    }

    #[test]
    fn unity_scale_is_identity_up_to_centering() {
        let data = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let resampled = resample_linear(&data, 1.0);
        assert_eq!(resampled, data);
    }

    #[test]
    fn stretched_scale_reveals_only_the_early_part_of_the_window() {
        // l=5, scale=2.0 -> vl=10; pos(i) = i*4/9, so only the first ~44% of
        // the stretched event is visible in the fixed-length output.
        let data = vec![0.0, 10.0, 20.0, 30.0, 40.0];
        let resampled = resample_linear(&data, 2.0);
        let expected = [0.0, 4.444_444, 8.888_889, 13.333_333, 17.777_778];
        for (got, want) in resampled.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1.0e-3, "got={resampled:?}");
        }
    }

    #[test]
    fn empty_bundle_is_rejected() {
        let err = TemplateBank::build(&[]).unwrap_err();
        assert!(matches!(err, BuildError::EmptyTemplateBundle));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let templates = vec![tmpl(vec![0.0; 10]), tmpl(vec![0.0; 12])];
        let err = TemplateBank::build(&templates).unwrap_err();
        assert!(matches!(err, BuildError::TemplateLengthMismatch { .. }));
    }

    #[test]
    fn bank_has_one_expansion_per_template_per_scale() {
        let templates = vec![tmpl(vec![0.0, 1.0, 2.0, 1.0, 0.0]), tmpl(vec![1.0; 5])];
        let bank = TemplateBank::build(&templates).unwrap();
        assert_eq!(bank.expanded.len(), templates.len() * SCALES.len());
        assert!(bank.expanded.iter().all(|e| e.centered.len() == bank.l));
    }

    #[test]
    fn centered_template_is_zero_mean() {
        let templates = vec![tmpl(vec![1.0, 2.0, 3.0, 4.0, 5.0])];
        let bank = TemplateBank::build(&templates).unwrap();
        for e in &bank.expanded {
            let sum: f32 = e.centered.iter().sum();
            assert!(sum.abs() < 1e-4, "sum={sum}");
        }
    }
}
