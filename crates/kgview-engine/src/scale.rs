//! Linear min–max scaling of numeric measures to pixel sizes.

use kgview_core::SizeRange;

/// Maps values from a comparison domain onto a [`SizeRange`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    /// `None` when the domain is empty or single-valued.
    domain: Option<(f64, f64)>,
    range: SizeRange,
}

impl LinearScale {
    pub fn new(domain: impl IntoIterator<Item = f64>, range: SizeRange) -> Self {
        let bounds = domain.into_iter().fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        });
        let domain = bounds.filter(|(lo, hi)| hi > lo);
        Self { domain, range }
    }

    /// Size for `value`, truncated toward zero. A degenerate domain always
    /// yields the range midpoint.
    pub fn scale(&self, value: f64) -> i64 {
        match self.domain {
            None => self.range.midpoint(),
            Some((lo, hi)) => {
                let normalized = (value - lo) / (hi - lo);
                let span = (self.range.max - self.range.min) as f64;
                (self.range.min as f64 + normalized * span) as i64
            }
        }
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
