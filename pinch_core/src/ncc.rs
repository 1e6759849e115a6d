//! Normalized cross-correlation matcher (C9): best-of-bank match with ±1
//! sample shift tolerance, early-exit on a strong hit.

use crate::template_bank::{ExpandedTemplate, TemplateBank};

const EARLY_EXIT_NCC: f32 = 0.95;
const DENOM_GUARD: f32 = 1.0e-6;
const SHIFTS: [i32; 3] = [-1, 0, 1];

#[derive(Debug, Clone, Copy)]
pub struct NccMatch {
    pub template_id: usize,
    pub scale: f32,
    pub shift: i32,
    pub ncc: f32,
}

/// Search the expanded bank for the best NCC match against `window`
/// (already extracted, length equal to `bank.l`).
pub fn best_match(window: &[f32], bank: &TemplateBank) -> Option<NccMatch> {
    if window.is_empty() || bank.expanded.is_empty() {
        return None;
    }
    let n = window.len() as f32;
    let w_mean = window.iter().sum::<f32>() / n;
    let w_centered: Vec<f32> = window.iter().map(|v| v - w_mean).collect();
    let ss_w: f32 = w_centered.iter().map(|v| v * v).sum();

    let mut best: Option<NccMatch> = None;
    'search: for et in &bank.expanded {
        for &shift in &SHIFTS {
            let ncc = ncc_for_shift(&w_centered, ss_w, et, shift);
            let is_better = best.is_none_or(|b| ncc > b.ncc);
            if is_better {
                best = Some(NccMatch {
                    template_id: et.template_id,
                    scale: et.scale,
                    shift,
                    ncc,
                });
            }
            if ncc >= EARLY_EXIT_NCC {
                break 'search;
            }
        }
    }
    best
}

fn ncc_for_shift(w_centered: &[f32], ss_w: f32, et: &ExpandedTemplate, shift: i32) -> f32 {
    if shift == 0 {
        return ncc_value(w_centered, ss_w, &et.centered, et.ss);
    }
    let l = et.centered.len();
    let mut shifted = Vec::with_capacity(l);
    for i in 0..l {
        let src = (i as i32 - shift).clamp(0, l as i32 - 1) as usize;
        shifted.push(et.centered[src]);
    }
    let (centered, ss) = crate::template_bank::center_and_sum_sq(&shifted);
    ncc_value(w_centered, ss_w, &centered, ss)
}

#[inline]
fn ncc_value(w_centered: &[f32], ss_w: f32, t_centered: &[f32], ss_t: f32) -> f32 {
    let denom = (ss_w * ss_t).sqrt();
    if denom < DENOM_GUARD {
        return 0.0;
    }
    let num: f32 = w_centered
        .iter()
        .zip(t_centered)
        .map(|(a, b)| a * b)
        .sum();
    (num / denom).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PinchTemplate;

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
    fn identical_shape_scores_near_one() {
        let shape = vec![0.0, 0.2, 0.6, 1.0, 0.6, 0.2, 0.0];
        let bank = TemplateBank::build(&[tmpl(shape.clone())]).unwrap();
        let m = best_match(&shape, &bank).unwrap();
        assert!(m.ncc > 0.99, "ncc={}", m.ncc);
    }

    #[test]
    fn scaled_and_shifted_shape_still_scores_high() {
        let shape = vec![0.0, 0.2, 0.6, 1.0, 0.6, 0.2, 0.0];
        let bank = TemplateBank::build(&[tmpl(shape.clone())]).unwrap();
        let window: Vec<f32> = shape.iter().map(|v| v * 3.0 + 2.0).collect();
        let m = best_match(&window, &bank).unwrap();
        assert!(m.ncc > 0.99, "ncc={}", m.ncc);
    }

    #[test]
    fn flat_window_yields_zero_score() {
        let shape = vec![0.0, 0.2, 0.6, 1.0, 0.6, 0.2, 0.0];
        let bank = TemplateBank::build(&[tmpl(shape)]).unwrap();
        let window = vec![1.0; 7];
        let m = best_match(&window, &bank).unwrap();
        assert_eq!(m.ncc, 0.0);
    }

    #[test]
    fn dissimilar_shape_scores_low_or_negative() {
        let shape = vec![0.0, 0.2, 0.6, 1.0, 0.6, 0.2, 0.0];
        let bank = TemplateBank::build(&[tmpl(shape)]).unwrap();
        let window = vec![1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0];
        let m = best_match(&window, &bank).unwrap();
        assert!(m.ncc < 0.5, "ncc={}", m.ncc);
    }
}
