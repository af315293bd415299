use crate::model::SpeedStatisticSample;
use itertools::Itertools;
use serde::Serialize;

/// How a value was obtained relative to the landmark speed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Evaluation {
    /// The query speed lies within the landmark speeds.
    Interpolated,

    /// The query speed lies outside the landmark speeds.
    Extrapolated,
}

/// A polynomial passing exactly through a set of landmarks.
///
/// With three distinct landmark speeds this is the unique quadratic
/// through them, written in its Lagrange form. The same polynomial
/// is used on both sides of the landmark range, so evaluation is
/// continuous across the switch from interpolation to extrapolation.
///
/// Landmarks sharing a speed are merged (their values averaged), which
/// lowers the degree instead of producing a degenerate polynomial.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolant {
    // Sorted by ascending speed, speeds are distinct.
    points: Vec<(f64, f64)>,
}

impl Interpolant {
    /// Creates the interpolant. Returns `None` if no landmark is valid.
    pub fn new(samples: &[SpeedStatisticSample]) -> Option<Self> {
        let points = samples
            .iter()
            .filter(|sample| sample.is_valid())
            .sorted_by(|a, b| a.speed.total_cmp(&b.speed))
            .chunk_by(|sample| sample.speed)
            .into_iter()
            .map(|(speed, group)| {
                let (sum, count) = group.fold((0.0, 0usize), |(sum, count), sample| {
                    (sum + sample.value, count + 1)
                });

                (speed, sum / count as f64)
            })
            .collect::<Vec<_>>();

        if points.is_empty() {
            return None;
        }

        Some(Interpolant { points })
    }

    /// The `(lowest, highest)` landmark speed.
    pub fn domain(&self) -> (f64, f64) {
        // Points are never empty once constructed.
        let first = self.points.first().map_or(0.0, |(speed, _)| *speed);
        let last = self.points.last().map_or(0.0, |(speed, _)| *speed);

        (first, last)
    }

    pub fn evaluation(&self, speed: f64) -> Evaluation {
        let (low, high) = self.domain();

        if speed >= low && speed <= high {
            Evaluation::Interpolated
        } else {
            Evaluation::Extrapolated
        }
    }

    /// Evaluates the polynomial at `speed`.
    pub fn evaluate(&self, speed: f64) -> f64 {
        self.points
            .iter()
            .enumerate()
            .map(|(i, (xi, yi))| {
                self.points
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .fold(*yi, |term, (_, (xj, _))| term * ((speed - xj) / (xi - xj)))
            })
            .sum()
    }

    /// Evaluates at `speed`, flooring negative values at zero.
    pub fn evaluate_non_negative(&self, speed: f64) -> f64 {
        self.evaluate(speed).max(0.0)
    }
}
