use serde::{Deserialize, Serialize};

/// A `(speed, value)` landmark used for interpolation.
///
/// Each sample is itself an aggregate (such as a median across many
/// vehicles), never a raw per-vehicle reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedStatisticSample {
    /// Speed in km/h.
    pub speed: f64,
    pub value: f64,
}

impl SpeedStatisticSample {
    pub const fn new(speed: f64, value: f64) -> Self {
        Self { speed, value }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.speed.is_finite() && self.value.is_finite() && self.speed >= 0.0
    }
}

impl From<(f64, f64)> for SpeedStatisticSample {
    /// Format is: (Speed, Value)
    fn from((speed, value): (f64, f64)) -> Self {
        Self::new(speed, value)
    }
}
