//! Value scale
//!
//! Picks the topmost gridline value and the value per gridline step from
//! the data. The step is always a power of ten and the top is always a
//! whole number of steps.

use crate::model::{SeriesData, MAX_DATA_VALUE};

/// Gridline scale for one render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    /// Value of the topmost gridline
    pub max: f64,
    /// Value represented by one gridline step
    pub division: f64,
}

impl Scale {
    /// Derive the scale for `data`
    ///
    /// With `flush` the top gridline sits exactly on the data maximum when
    /// that is already a whole number of steps; otherwise roughly one minor
    /// step of headroom is added before rounding up. The data maximum is
    /// clamped to `[1, MAX_DATA_VALUE]` so the result is always finite.
    pub fn compute(data: &SeriesData, flush: bool) -> Self {
        let data_max = data.max_value().unwrap_or(0.0).clamp(1.0, MAX_DATA_VALUE);
        let division = largest_power_of_ten(data_max);

        let padded = if flush {
            data_max
        } else {
            data_max + (division / 10.0).max(1.0)
        };
        let max = (padded / division).ceil() * division;

        tracing::trace!(data_max, division, max, flush, "Computed scale");

        Self { max, division }
    }

    /// Number of gridline steps between the baseline and the top
    pub fn steps(&self) -> usize {
        let steps = (self.max / self.division).round();
        if steps.is_finite() && steps >= 1.0 {
            (steps as usize).min(MAX_STEPS)
        } else {
            1
        }
    }
}

/// Upper bound on gridline steps for hand-built scales
const MAX_STEPS: usize = 1000;

/// Largest power of ten not above `value`, for finite `value >= 1`
fn largest_power_of_ten(value: f64) -> f64 {
    let power = 10f64.powi(value.log10().floor() as i32);
    // log10 can land one off near exact powers
    if power > value {
        power / 10.0
    } else if power * 10.0 <= value {
        power * 10.0
    } else {
        power
    }
}
