use crate::error::InsufficientDataError;
use crate::model::{
    Evaluation, FuelCalculationResult, FuelType, Interpolant, Phenomenon, SpeedStatisticSample,
    VehicleClassStatistics,
};
use serde::Serialize;

/// Consumption and emission per kilometer, at a single cruise speed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PerKmRate {
    pub liters_per_km: f64,
    pub co2_grams_per_km: f64,
}

impl PerKmRate {
    pub const ZERO: PerKmRate = PerKmRate {
        liters_per_km: 0.0,
        co2_grams_per_km: 0.0,
    };

    pub fn new(liters_per_km: f64, co2_grams_per_km: f64) -> Self {
        Self {
            liters_per_km,
            co2_grams_per_km,
        }
    }

    /// The implied grams of CO2 per liter burned, `None` without consumption.
    pub fn co2_per_liter(&self) -> Option<f64> {
        (self.liters_per_km > 0.0).then(|| self.co2_grams_per_km / self.liters_per_km)
    }

    /// Caps the CO2 intensity at `ceiling` grams per liter.
    ///
    /// Negative quantities are floored at zero, and emission without
    /// any consumption is dropped entirely.
    pub fn clamped(self, ceiling: f64) -> Self {
        let liters_per_km = sanitize(self.liters_per_km);
        let co2_grams_per_km = sanitize(self.co2_grams_per_km);

        if liters_per_km == 0.0 {
            return PerKmRate::ZERO;
        }

        let co2_grams_per_km = co2_grams_per_km.min(liters_per_km * ceiling);
        PerKmRate::new(liters_per_km, co2_grams_per_km)
    }
}

/// Consumption and emission of a vehicle class at a given speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConsumptionRate {
    pub kmh: f64,
    pub liters_per_hour: f64,
    pub co2_grams_per_hour: f64,
    pub per_km: PerKmRate,
    pub evaluation: Evaluation,
}

/// The signed fractional change in consumption and CO2 implied by
/// moving between two cruise speeds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GrowthFactor {
    pub consumption: f64,
    pub co2: f64,
}

impl GrowthFactor {
    pub const IDENTITY: GrowthFactor = GrowthFactor {
        consumption: 0.0,
        co2: 0.0,
    };
}

/// Continuous consumption and CO2 curves over speed, built from the
/// three landmark statistics of one vehicle category.
///
/// ```rust
/// use fuelroute::model::{ConsumptionModel, FuelType, SpeedStatisticSample};
///
/// let consumption = [(5.2, 0.55), (42.7, 2.61), (128.4, 12.9)].map(SpeedStatisticSample::from);
/// let co2 = [(5.2, 1290.0), (42.7, 6130.0), (128.4, 30300.0)].map(SpeedStatisticSample::from);
///
/// let model = ConsumptionModel::new(FuelType::Gasoline, &consumption, &co2, 2392.0).unwrap();
/// let result = model.compute(120.0, 10_000.0);
/// assert_eq!(result.liters_per_100km, 9.623);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionModel {
    fuel_type: FuelType,
    consumption: Interpolant,
    co2: Interpolant,

    /// Grams of CO2 per liter which cannot physically be exceeded.
    ceiling: f64,
}

impl ConsumptionModel {
    /// Builds the model from `(speed, liters per hour)` and
    /// `(speed, grams CO2 per hour)` landmarks.
    ///
    /// Fails if either set has fewer than three valid samples.
    pub fn new(
        fuel_type: FuelType,
        consumption: &[SpeedStatisticSample],
        co2: &[SpeedStatisticSample],
        ceiling: f64,
    ) -> Result<Self, InsufficientDataError> {
        let build = |samples: &[SpeedStatisticSample], phenomenon| {
            if samples.iter().filter(|sample| sample.is_valid()).count() < 3 {
                return Err(InsufficientDataError::NotEnoughSamples(phenomenon));
            }

            Interpolant::new(samples).ok_or(InsufficientDataError::NotEnoughSamples(phenomenon))
        };

        Ok(ConsumptionModel {
            fuel_type,
            consumption: build(consumption, Phenomenon::Consumption)?,
            co2: build(co2, Phenomenon::Co2)?,
            ceiling,
        })
    }

    /// Builds the model of a category. The statistics have already been
    /// validated to share a single fuel type.
    pub fn from_statistics(
        statistics: &VehicleClassStatistics,
        ceiling: f64,
    ) -> Result<Self, InsufficientDataError> {
        ConsumptionModel::new(
            statistics.fuel_type,
            &statistics.landmarks(Phenomenon::Consumption),
            &statistics.landmarks(Phenomenon::Co2),
            ceiling,
        )
    }

    pub fn fuel_type(&self) -> FuelType {
        self.fuel_type
    }

    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    /// Consumption and CO2, per hour and per kilometer, when cruising
    /// at `kmh`. Outside of the landmark speeds the curves are
    /// extrapolated rather than clamped.
    ///
    /// A non-positive (or non-finite) speed yields a zero-valued rate.
    pub fn consumption_at(&self, kmh: f64) -> ConsumptionRate {
        let evaluation = self.consumption.evaluation(kmh);

        if !(kmh > 0.0 && kmh.is_finite()) {
            return ConsumptionRate {
                kmh,
                liters_per_hour: 0.0,
                co2_grams_per_hour: 0.0,
                per_km: PerKmRate::ZERO,
                evaluation,
            };
        }

        let liters_per_hour = self.consumption.evaluate_non_negative(kmh);
        let co2_grams_per_hour = self.co2.evaluate_non_negative(kmh);

        let per_km = PerKmRate::new(liters_per_hour / kmh, co2_grams_per_hour / kmh)
            .clamped(self.ceiling);

        let co2_grams_per_hour = match per_km.liters_per_km > 0.0 {
            true => co2_grams_per_hour.min(liters_per_hour * self.ceiling),
            false => 0.0,
        };

        ConsumptionRate {
            kmh,
            liters_per_hour,
            co2_grams_per_hour,
            per_km,
            evaluation,
        }
    }

    /// Fuel used and CO2 emitted when driving `length` meters at `kmh`.
    pub fn compute(&self, kmh: f64, length: f64) -> FuelCalculationResult {
        if !(length > 0.0 && length.is_finite()) {
            return FuelCalculationResult::zero(self.fuel_type);
        }

        let rate = self.consumption_at(kmh).per_km;
        FuelCalculationResult::from_rate(self.fuel_type, rate, length).rounded()
    }

    /// The fractional change `sqrt(value(to) / value(from)) - 1` of
    /// both curves when moving from `from_speed` to `to_speed`.
    ///
    /// Curve values are floored at zero. A zero value at `from_speed`
    /// leaves that factor at zero.
    pub fn growth_factor(&self, from_speed: f64, to_speed: f64) -> GrowthFactor {
        let factor = |curve: &Interpolant| {
            let from = curve.evaluate_non_negative(from_speed);
            let to = curve.evaluate_non_negative(to_speed);

            if from > 0.0 && from.is_finite() && to.is_finite() {
                (to / from).sqrt() - 1.0
            } else {
                0.0
            }
        };

        GrowthFactor {
            consumption: factor(&self.consumption),
            co2: factor(&self.co2),
        }
    }
}

#[inline]
fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
