//! Fixed-capacity circular history of the fused signal (C8).
//!
//! Append is O(1). Snapshot/window extraction is O(capacity) and is only
//! invoked when a peak is confirmed, never on every sample.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct History {
    buf: VecDeque<(f64, f32)>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    #[inline]
    pub fn push(&mut self, t: f64, z: f32) {
        if self.buf.len() >= self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back((t, z));
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Index of the sample with timestamp nearest `t` (bounded linear scan).
    pub fn nearest_index(&self, t: f64) -> Option<usize> {
        if self.buf.is_empty() {
            return None;
        }
        let mut best_i = 0;
        let mut best_d = f64::INFINITY;
        for (i, &(ti, _)) in self.buf.iter().enumerate() {
            let d = (ti - t).abs();
            if d < best_d {
                best_d = d;
                best_i = i;
            }
        }
        Some(best_i)
    }

    /// Extract a window of `len` fused-signal samples centered on `center_idx`,
    /// edge-padding with the nearest in-range sample when the window runs off
    /// either end of the buffer.
    pub fn extract_window(&self, center_idx: usize, len: usize) -> Vec<f32> {
        let n = self.buf.len();
        if n == 0 || len == 0 {
            return Vec::new();
        }
        let half = (len / 2) as isize;
        let mut out = Vec::with_capacity(len);
        for i in 0..len {
            let rel = i as isize - half;
            let idx = (center_idx as isize + rel).clamp(0, n as isize - 1) as usize;
            out.push(self.buf[idx].1);
        }
        out
    }

    /// Timestamps of the (possibly edge-clamped) first and last samples of the
    /// window that `extract_window` would produce for the same arguments.
    pub fn window_time_bounds(&self, center_idx: usize, len: usize) -> Option<(f64, f64)> {
        let n = self.buf.len();
        if n == 0 || len == 0 {
            return None;
        }
        let half = (len / 2) as isize;
        let start_idx = (center_idx as isize - half).clamp(0, n as isize - 1) as usize;
        let end_idx = (center_idx as isize - half + len as isize - 1).clamp(0, n as isize - 1) as usize;
        Some((self.buf[start_idx].0, self.buf[end_idx].0))
    }
}
