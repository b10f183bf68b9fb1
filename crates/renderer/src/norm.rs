//! Symmetric logarithmic normalization.
//!
//! Maps values to `[0, 1]` with a linear region around zero of half-width
//! `linthresh` and logarithmic growth beyond it in both directions. This
//! keeps sign changes visible on data that spans many decades, such as a
//! heating rate going from strong cooling to strong heating.

/// Maximum decade ticks per sign before thinning
const MAX_TICKS_PER_SIDE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymLogNorm {
    /// Half-width of the linear region around zero
    pub linthresh: f64,
    /// Number of decades the linear region spans on the scale
    pub linscale: f64,
    /// Logarithm base
    pub base: f64,
    pub vmin: f64,
    pub vmax: f64,
}

impl SymLogNorm {
    /// Create a norm with `linscale = 1` and base 10.
    ///
    /// A non-positive or non-finite `linthresh` falls back to 1.
    pub fn new(linthresh: f64, vmin: f64, vmax: f64) -> Self {
        let linthresh = if linthresh.is_finite() && linthresh > 0.0 {
            linthresh
        } else {
            1.0
        };
        Self {
            linthresh,
            linscale: 1.0,
            base: 10.0,
            vmin,
            vmax,
        }
    }

    /// Scale the norm to the finite extremes of `data`.
    ///
    /// Data without finite values gets the range `[-linthresh, linthresh]`.
    pub fn autoscale(linthresh: f64, data: &[f64]) -> Self {
        let (vmin, vmax) = data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .unwrap_or((-linthresh.abs(), linthresh.abs()));
        Self::new(linthresh, vmin, vmax)
    }

    fn linscale_adj(&self) -> f64 {
        self.linscale / (1.0 - 1.0 / self.base)
    }

    /// Forward transform into scale space (before normalization).
    pub fn transform(&self, value: f64) -> f64 {
        let adj = self.linscale_adj();
        let abs = value.abs();
        if abs <= self.linthresh {
            value * adj
        } else {
            value.signum()
                * self.linthresh
                * (adj + (abs / self.linthresh).ln() / self.base.ln())
        }
    }

    /// Normalize a value into `[0, 1]`, clipping out-of-range values.
    ///
    /// Returns `None` for non-finite input. A degenerate range maps every
    /// value to 0.
    pub fn normalize(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        let t_min = self.transform(self.vmin);
        let t_max = self.transform(self.vmax);
        let span = t_max - t_min;
        if span == 0.0 || !span.is_finite() {
            return Some(0.0);
        }
        Some(((self.transform(value) - t_min) / span).clamp(0.0, 1.0))
    }

    /// Tick values for a colour bar: zero plus signed powers of the base
    /// beyond `linthresh`, ascending.
    pub fn ticks(&self) -> Vec<f64> {
        let (lo, hi) = (self.vmin.min(self.vmax), self.vmin.max(self.vmax));
        if lo == hi {
            return vec![lo];
        }

        let mut ticks = Vec::new();
        if hi > 0.0 {
            ticks.extend(self.decades_up_to(hi));
        }
        if lo < 0.0 {
            ticks.extend(self.decades_up_to(-lo).into_iter().map(|v| -v));
        }
        if lo <= 0.0 && hi >= 0.0 {
            ticks.push(0.0);
        }

        if ticks.is_empty() {
            // Range entirely inside the linear region
            ticks = vec![lo, hi];
        }
        ticks.sort_by(f64::total_cmp);
        ticks
    }

    /// Powers of the base in `[linthresh, limit]`, thinned to at most
    /// `MAX_TICKS_PER_SIDE` entries.
    fn decades_up_to(&self, limit: f64) -> Vec<f64> {
        // ln(1e13) / ln(10) is not exactly 13; the slack keeps exact powers
        let log = |v: f64| v.ln() / self.base.ln();
        let first = (log(self.linthresh) - 1e-9).ceil() as i32;
        let last = (log(limit) + 1e-9).floor() as i32;
        if last < first {
            return Vec::new();
        }

        let count = (last - first + 1) as usize;
        let stride = count.div_ceil(MAX_TICKS_PER_SIDE).max(1);
        (first..=last)
            .rev()
            .step_by(stride)
            .map(|k| self.base.powi(k))
            .collect()
    }
}
