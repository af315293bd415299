use crate::model::{ConsumptionModel, FuelType, GrowthFactor, PerKmRate};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Officially measured figures of one vehicle record, taken at the
/// reference speed of the measurement procedure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OfficialFigures {
    pub liters_per_100km: f64,
    pub co2_grams_per_km: f64,

    /// How many cars the record represents.
    #[serde(default = "default_number_of_cars")]
    pub number_of_cars: u32,
}

fn default_number_of_cars() -> u32 {
    1
}

impl OfficialFigures {
    pub fn new(liters_per_100km: f64, co2_grams_per_km: f64, number_of_cars: u32) -> Self {
        Self {
            liters_per_100km,
            co2_grams_per_km,
            number_of_cars,
        }
    }

    pub fn rate(&self) -> PerKmRate {
        PerKmRate::new(self.liters_per_100km / 100.0, self.co2_grams_per_km)
    }

    fn is_valid(&self) -> bool {
        self.liters_per_100km.is_finite()
            && self.co2_grams_per_km.is_finite()
            && self.liters_per_100km >= 0.0
            && self.co2_grams_per_km >= 0.0
    }

    /// Averages the official rates of many records, weighted by the
    /// number of cars each represents. Records representing no cars
    /// (or carrying invalid figures) do not contribute.
    ///
    /// ```rust
    /// use fuelroute::cost::OfficialFigures;
    ///
    /// let records = [
    ///     OfficialFigures::new(5.0, 120.0, 3),
    ///     OfficialFigures::new(7.0, 160.0, 1),
    /// ];
    ///
    /// let average = OfficialFigures::weighted_average(&records).unwrap();
    /// assert_eq!(average.co2_grams_per_km, 130.0);
    /// ```
    pub fn weighted_average<'a>(
        records: impl IntoIterator<Item = &'a OfficialFigures>,
    ) -> Option<PerKmRate> {
        let (liters, co2, cars) = records
            .into_iter()
            .filter(|record| record.number_of_cars > 0 && record.is_valid())
            .fold((0.0, 0.0, 0.0), |(liters, co2, cars), record| {
                let weight = record.number_of_cars as f64;
                let rate = record.rate();

                (
                    liters + rate.liters_per_km * weight,
                    co2 + rate.co2_grams_per_km * weight,
                    cars + weight,
                )
            });

        (cars > 0.0).then(|| PerKmRate::new(liters / cars, co2 / cars))
    }
}

/// How the per-kilometer rate of an estimate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CalculationMode {
    /// One vehicle's official figures, projected to the cruise speed
    /// with its category's growth factor.
    Direct,

    /// The category's car-weighted official figures, projected to the
    /// cruise speed with the category's growth factor.
    CategoryAverage,

    /// The category's speed statistics alone, without official figures.
    Empirical,

    /// Consumption fixed by the request.
    Manual,
}

/// Consumption and emission per kilometer at the cruise speed of
/// a request, which the zone accumulation applies to each zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConsumptionEstimate {
    pub mode: CalculationMode,
    pub fuel_type: FuelType,
    pub cruise_speed: f64,
    pub rate: PerKmRate,
}

/// Fuel used and CO2 emitted within one zone.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ZoneConsumption {
    pub liters: f64,
    pub co2_grams: f64,
}

impl ConsumptionEstimate {
    fn new(mode: CalculationMode, fuel_type: FuelType, cruise_speed: f64, rate: PerKmRate) -> Self {
        // A stationary (or reversing) vehicle covers no distance.
        let rate = match cruise_speed > 0.0 && cruise_speed.is_finite() {
            true => rate,
            false => PerKmRate::ZERO,
        };

        Self {
            mode,
            fuel_type,
            cruise_speed,
            rate,
        }
    }

    /// Projects an official rate measured at `reference_speed` to `cruise_speed`,
    /// i.e. `official × (1 + growth_factor(reference_speed, cruise_speed))`.
    pub fn calibrate(
        model: &ConsumptionModel,
        official: PerKmRate,
        reference_speed: f64,
        cruise_speed: f64,
    ) -> PerKmRate {
        let GrowthFactor { consumption, co2 } = model.growth_factor(reference_speed, cruise_speed);

        PerKmRate::new(
            official.liters_per_km * (1.0 + consumption),
            official.co2_grams_per_km * (1.0 + co2),
        )
        .clamped(model.ceiling())
    }

    /// Estimates one concrete vehicle from its own official figures.
    pub fn direct(
        model: &ConsumptionModel,
        official: &OfficialFigures,
        reference_speed: f64,
        cruise_speed: f64,
    ) -> Self {
        let rate = Self::calibrate(model, official.rate(), reference_speed, cruise_speed);
        Self::new(CalculationMode::Direct, model.fuel_type(), cruise_speed, rate)
    }

    /// Estimates a category from the car-weighted average of its official
    /// figures. Returns `None` if no record contributes to the average.
    pub fn category_average<'a>(
        model: &ConsumptionModel,
        official: impl IntoIterator<Item = &'a OfficialFigures>,
        reference_speed: f64,
        cruise_speed: f64,
    ) -> Option<Self> {
        let baseline = OfficialFigures::weighted_average(official)?;
        let rate = Self::calibrate(model, baseline, reference_speed, cruise_speed);

        Some(Self::new(
            CalculationMode::CategoryAverage,
            model.fuel_type(),
            cruise_speed,
            rate,
        ))
    }

    /// Estimates a category from its speed statistics alone.
    pub fn empirical(model: &ConsumptionModel, cruise_speed: f64) -> Self {
        let rate = model.consumption_at(cruise_speed).per_km;
        Self::new(CalculationMode::Empirical, model.fuel_type(), cruise_speed, rate)
    }

    /// A fixed consumption, emitting `co2_per_liter` grams per liter burned.
    pub fn manual(
        fuel_type: FuelType,
        liters_per_100km: f64,
        co2_per_liter: f64,
        cruise_speed: f64,
    ) -> Self {
        let liters_per_km = liters_per_100km / 100.0;
        let rate = PerKmRate::new(liters_per_km, liters_per_km * co2_per_liter);

        Self::new(CalculationMode::Manual, fuel_type, cruise_speed, rate)
    }

    /// Caps the emission at `ceiling` grams of CO2 per liter burned.
    pub fn capped(self, ceiling: f64) -> Self {
        Self {
            rate: self.rate.clamped(ceiling),
            ..self
        }
    }

    /// Consumption over `length` meters.
    pub fn for_length(&self, length: f64) -> ZoneConsumption {
        if !(length > 0.0 && length.is_finite()) {
            return ZoneConsumption::default();
        }

        let kilometers = length / 1000.0;
        ZoneConsumption {
            liters: self.rate.liters_per_km * kilometers,
            co2_grams: self.rate.co2_grams_per_km * kilometers,
        }
    }
}
