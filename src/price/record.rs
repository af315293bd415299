use crate::error::InputError;
use crate::model::FuelType;
use chrono::NaiveDate;
use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The price of one fuel type, quoted per `unit_quantity` liters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelPrice {
    pub euro_per_unit_untaxed: f64,
    pub euro_per_unit_taxed: f64,
    pub unit_quantity: f64,
}

impl FuelPrice {
    pub fn new(euro_per_unit_untaxed: f64, euro_per_unit_taxed: f64, unit_quantity: f64) -> Self {
        Self {
            euro_per_unit_untaxed,
            euro_per_unit_taxed,
            unit_quantity,
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if self.unit_quantity > 0.0 && self.unit_quantity.is_finite() {
            Ok(())
        } else {
            Err(InputError::InvalidUnitQuantity(self.unit_quantity))
        }
    }

    #[inline]
    pub fn untaxed_per_liter(&self) -> f64 {
        self.euro_per_unit_untaxed / self.unit_quantity
    }

    #[inline]
    pub fn taxed_per_liter(&self) -> f64 {
        self.euro_per_unit_taxed / self.unit_quantity
    }
}

/// Gasoline and diesel prices, effective from a date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub effective_date: NaiveDate,
    pub gasoline: FuelPrice,
    pub diesel: FuelPrice,
}

impl PriceRecord {
    pub fn price(&self, fuel_type: FuelType) -> &FuelPrice {
        match fuel_type {
            FuelType::Gasoline => &self.gasoline,
            FuelType::Diesel => &self.diesel,
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        self.gasoline.validate()?;
        self.diesel.validate()
    }
}

/// A price record scoped to the boundary of one country.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryPriceRecord {
    /// ISO 3166 code, or any label naming the country.
    pub country: String,
    pub boundary: MultiPolygon<f64>,
    pub record: PriceRecord,
}

impl CountryPriceRecord {
    pub fn new(country: impl Into<String>, boundary: impl Into<MultiPolygon<f64>>, record: PriceRecord) -> Self {
        Self {
            country: country.into(),
            boundary: boundary.into(),
            record,
        }
    }
}

/// Where the price record of a zone applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceScope {
    Country(String),

    /// The continent-wide fallback, for any length outside of a known country.
    General,
}

impl Display for PriceScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceScope::Country(country) => write!(f, "{country}"),
            PriceScope::General => write!(f, "general"),
        }
    }
}
