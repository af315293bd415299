use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString};

/// Grams of CO2 released by burning one liter of gasoline.
pub const GASOLINE_CO2_PER_LITER: f64 = 2392.0;

/// Grams of CO2 released by burning one liter of diesel.
pub const DIESEL_CO2_PER_LITER: f64 = 2640.0;

/// A measured quantity type tracked per vehicle category.
///
/// Names from data providers are parsed at the boundary, anything
/// outside of this set is rejected.
///
/// ```rust
/// use fuelroute::model::Phenomenon;
/// use std::str::FromStr;
///
/// assert_eq!(Phenomenon::from_str("CO2"), Ok(Phenomenon::Co2));
/// assert!(Phenomenon::from_str("Rpm").is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    EnumCount,
    Serialize,
    Deserialize,
)]
pub enum Phenomenon {
    /// Vehicle speed, in km/h.
    Speed,

    /// Fuel consumption, in liters per hour.
    Consumption,

    /// CO2 emission, in grams per hour.
    #[strum(to_string = "CO2", serialize = "Co2")]
    #[serde(rename = "CO2", alias = "Co2")]
    Co2,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Gasoline,
    Diesel,
}

impl FuelType {
    /// The physical grams-CO2-per-liter of complete combustion.
    pub const fn co2_per_liter(&self) -> f64 {
        match self {
            FuelType::Gasoline => GASOLINE_CO2_PER_LITER,
            FuelType::Diesel => DIESEL_CO2_PER_LITER,
        }
    }
}
