use crate::error::InputError;
use crate::model::{FuelType, PerKmRate};
use crate::util::round::{round_to, LITER_DECIMALS};
use serde::{Deserialize, Serialize};

/// Fuel used and CO2 emitted over a distance.
///
/// Results leaving [`ConsumptionModel::compute`](crate::model::ConsumptionModel::compute)
/// are rounded to three decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelCalculationResult {
    pub fuel_type: FuelType,
    pub liters_total: f64,
    pub liters_per_100km: f64,
    pub co2_grams_total: f64,
    pub co2_grams_per_km: f64,
}

impl FuelCalculationResult {
    pub fn zero(fuel_type: FuelType) -> Self {
        Self {
            fuel_type,
            liters_total: 0.0,
            liters_per_100km: 0.0,
            co2_grams_total: 0.0,
            co2_grams_per_km: 0.0,
        }
    }

    /// An unrounded result for driving `length` meters at `rate`.
    pub fn from_rate(fuel_type: FuelType, rate: PerKmRate, length: f64) -> Self {
        let kilometers = length / 1000.0;

        Self {
            fuel_type,
            liters_total: rate.liters_per_km * kilometers,
            liters_per_100km: rate.liters_per_km * 100.0,
            co2_grams_total: rate.co2_grams_per_km * kilometers,
            co2_grams_per_km: rate.co2_grams_per_km,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.liters_total == 0.0
            && self.liters_per_100km == 0.0
            && self.co2_grams_total == 0.0
            && self.co2_grams_per_km == 0.0
    }

    /// Rounds liters to three decimals, and gram quantities to `gram_decimals`.
    pub fn round(&self, gram_decimals: i32) -> Self {
        Self {
            fuel_type: self.fuel_type,
            liters_total: round_to(self.liters_total, LITER_DECIMALS),
            liters_per_100km: round_to(self.liters_per_100km, LITER_DECIMALS),
            co2_grams_total: round_to(self.co2_grams_total, gram_decimals),
            co2_grams_per_km: round_to(self.co2_grams_per_km, gram_decimals),
        }
    }

    /// Rounds every quantity to three decimals.
    pub fn rounded(&self) -> Self {
        self.round(LITER_DECIMALS)
    }

    /// Merges two results of the same fuel type, summing the totals
    /// and averaging the rates.
    pub fn merge(&self, other: &FuelCalculationResult) -> Result<Self, InputError> {
        FuelCalculationResult::combine([self, other])
            .map(|merged| merged.unwrap_or(FuelCalculationResult::zero(self.fuel_type)))
    }

    /// Combines any number of results of one fuel type. Totals are
    /// summed, rates are the simple mean across results.
    ///
    /// Returns `Ok(None)` when given no results.
    pub fn combine<'a>(
        results: impl IntoIterator<Item = &'a FuelCalculationResult>,
    ) -> Result<Option<Self>, InputError> {
        let mut results = results.into_iter();
        let Some(first) = results.next() else {
            return Ok(None);
        };

        let (sum, count) = results.try_fold((*first, 1usize), |(sum, count), next| {
            if next.fuel_type != sum.fuel_type {
                return Err(InputError::MixedFuelTypes {
                    category: "combined".into(),
                    first: sum.fuel_type,
                    second: next.fuel_type,
                });
            }

            let sum = FuelCalculationResult {
                fuel_type: sum.fuel_type,
                liters_total: sum.liters_total + next.liters_total,
                liters_per_100km: sum.liters_per_100km + next.liters_per_100km,
                co2_grams_total: sum.co2_grams_total + next.co2_grams_total,
                co2_grams_per_km: sum.co2_grams_per_km + next.co2_grams_per_km,
            };

            Ok((sum, count + 1))
        })?;

        let count = count as f64;
        Ok(Some(FuelCalculationResult {
            liters_per_100km: sum.liters_per_100km / count,
            co2_grams_per_km: sum.co2_grams_per_km / count,
            ..sum
        }))
    }
}
