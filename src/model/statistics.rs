use crate::error::{InputError, InsufficientDataError};
use crate::ident::CategoryId;
use crate::model::{FuelType, Phenomenon, SpeedStatisticSample};
use log::debug;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The minimum, mean and maximum of one phenomenon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

impl Aggregate {
    pub const fn new(min: f64, avg: f64, max: f64) -> Self {
        Self { min, avg, max }
    }

    pub fn values(&self) -> [f64; 3] {
        [self.min, self.avg, self.max]
    }
}

impl From<(f64, f64, f64)> for Aggregate {
    fn from((min, avg, max): (f64, f64, f64)) -> Self {
        Aggregate::new(min, avg, max)
    }
}

/// A statistics record as delivered by a statistics provider.
///
/// The phenomenon is kept as its provider name until it is
/// validated by [`VehicleClassStatistics::from_records`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhenomenonRecord {
    pub phenomenon: String,
    pub fuel_type: FuelType,
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

impl PhenomenonRecord {
    pub fn new(phenomenon: impl Into<String>, fuel_type: FuelType, aggregate: Aggregate) -> Self {
        Self {
            phenomenon: phenomenon.into(),
            fuel_type,
            min: Some(aggregate.min),
            avg: Some(aggregate.avg),
            max: Some(aggregate.max),
        }
    }

    fn aggregate(&self, phenomenon: Phenomenon) -> Result<Aggregate, InsufficientDataError> {
        let (Some(min), Some(avg), Some(max)) = (self.min, self.avg, self.max) else {
            return Err(InsufficientDataError::NotEnoughSamples(phenomenon));
        };

        let aggregate = Aggregate::new(min, avg, max);
        let valid = aggregate.values().iter().all(|value| value.is_finite())
            && (phenomenon != Phenomenon::Speed || aggregate.values().iter().all(|v| *v >= 0.0));

        if !valid {
            return Err(InsufficientDataError::InvalidSample(phenomenon));
        }

        Ok(aggregate)
    }
}

/// Speed, consumption and CO2 statistics of one vehicle category
/// for a single fuel type.
///
/// Constructed fresh for each request, immutable thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleClassStatistics {
    pub category: CategoryId,
    pub fuel_type: FuelType,

    speed: Aggregate,
    consumption: Aggregate,
    co2: Aggregate,
}

impl VehicleClassStatistics {
    pub fn new(
        category: CategoryId,
        fuel_type: FuelType,
        speed: Aggregate,
        consumption: Aggregate,
        co2: Aggregate,
    ) -> Self {
        Self {
            category,
            fuel_type,
            speed,
            consumption,
            co2,
        }
    }

    /// Validates provider records into statistics for `fuel_type`.
    ///
    /// Every record must carry `fuel_type`, a mix fails the request
    /// with [`InputError::MixedFuelTypes`], as does a phenomenon name
    /// outside of [`Phenomenon`]. Missing phenomena or samples are
    /// reported as [`InsufficientDataError`]s.
    ///
    /// ```rust
    /// use fuelroute::model::{FuelType, PhenomenonRecord, VehicleClassStatistics};
    /// use fuelroute::{CategoryId, Error};
    ///
    /// let records = vec![
    ///     PhenomenonRecord::new("Speed", FuelType::Gasoline, (5.0, 40.0, 120.0).into()),
    ///     PhenomenonRecord::new("Consumption", FuelType::Diesel, (0.5, 2.5, 12.0).into()),
    ///     PhenomenonRecord::new("CO2", FuelType::Gasoline, (1200.0, 6000.0, 29000.0).into()),
    /// ];
    ///
    /// let category = CategoryId::new("small_car");
    /// let result = VehicleClassStatistics::from_records(&category, FuelType::Gasoline, &records);
    /// assert!(matches!(result, Err(Error::Input(_))));
    /// ```
    pub fn from_records<'a>(
        category: &CategoryId,
        fuel_type: FuelType,
        records: impl IntoIterator<Item = &'a PhenomenonRecord>,
    ) -> crate::Result<Self> {
        let records = records.into_iter().collect::<Vec<_>>();

        if records.is_empty() {
            return Err(InsufficientDataError::MissingStatistics(category.clone(), fuel_type).into());
        }

        // Structural checks come first, so a mixed dataset fails
        // even if it is also incomplete.
        let mut parsed = Vec::with_capacity(records.len());
        for record in &records {
            if record.fuel_type != fuel_type {
                return Err(InputError::MixedFuelTypes {
                    category: category.clone(),
                    first: fuel_type,
                    second: record.fuel_type,
                }
                .into());
            }

            let phenomenon = Phenomenon::from_str(&record.phenomenon)
                .map_err(|_| InputError::UnknownPhenomenon(record.phenomenon.clone()))?;

            parsed.push((phenomenon, *record));
        }

        let find = |target: Phenomenon| -> Result<Aggregate, InsufficientDataError> {
            let mut matching = parsed.iter().filter(|(phenomenon, _)| *phenomenon == target);
            let (_, record) = matching
                .next()
                .ok_or(InsufficientDataError::MissingPhenomenon(target))?;

            if matching.next().is_some() {
                debug!("Duplicate {target} records for {category}, using the first");
            }

            record.aggregate(target)
        };

        Ok(VehicleClassStatistics::new(
            category.clone(),
            fuel_type,
            find(Phenomenon::Speed)?,
            find(Phenomenon::Consumption)?,
            find(Phenomenon::Co2)?,
        ))
    }

    pub fn aggregate(&self, phenomenon: Phenomenon) -> Aggregate {
        match phenomenon {
            Phenomenon::Speed => self.speed,
            Phenomenon::Consumption => self.consumption,
            Phenomenon::Co2 => self.co2,
        }
    }

    /// Pairs the speed statistics with those of `phenomenon`, minimum
    /// with minimum, mean with mean and maximum with maximum.
    pub fn landmarks(&self, phenomenon: Phenomenon) -> [SpeedStatisticSample; 3] {
        let speeds = self.speed.values();
        let values = self.aggregate(phenomenon).values();

        [0, 1, 2].map(|i| SpeedStatisticSample::new(speeds[i], values[i]))
    }

    /// The highest landmark speed, beyond which the model extrapolates.
    pub fn max_speed(&self) -> f64 {
        self.speed.values().into_iter().fold(f64::MIN, f64::max)
    }
}
