//! Engine-wide tunables.
//!
//! Every value has a default. [`EngineConfig::from_env`] overrides them
//! from `FUELROUTE_*` environment variables, which the binary loads from
//! a `.env` file when present.
use crate::aggregate::DrivingStyle;
use crate::error::InputError;
use crate::model::{FuelType, DIESEL_CO2_PER_LITER, GASOLINE_CO2_PER_LITER};
use log::debug;
use serde::{Deserialize, Serialize};

const PREFIX: &str = "FUELROUTE_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cruise speed (km/h) at which official figures were measured.
    pub reference_speed: f64,

    /// Grams of CO2 per liter which no estimate may exceed.
    pub gasoline_co2_ceiling: f64,
    pub diesel_co2_ceiling: f64,

    /// Grams of CO2 per liter, used for manual consumption overrides.
    pub gasoline_emission_factor: f64,
    pub diesel_emission_factor: f64,

    pub economic_speed: f64,
    pub moderate_speed: f64,
    pub sporty_speed: f64,

    /// Tank capacity (liters) for categories which do not define one.
    pub fallback_tank_capacity: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference_speed: 63.0,
            gasoline_co2_ceiling: GASOLINE_CO2_PER_LITER,
            diesel_co2_ceiling: DIESEL_CO2_PER_LITER,
            gasoline_emission_factor: GASOLINE_CO2_PER_LITER,
            diesel_emission_factor: DIESEL_CO2_PER_LITER,
            economic_speed: 90.0,
            moderate_speed: 110.0,
            sporty_speed: 130.0,
            fallback_tank_capacity: 50.0,
        }
    }
}

impl EngineConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, InputError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which is given the full
    /// variable name (e.g. `FUELROUTE_REFERENCE_SPEED`).
    ///
    /// ```rust
    /// use fuelroute::config::EngineConfig;
    ///
    /// let config = EngineConfig::from_lookup(|key| match key {
    ///     "FUELROUTE_SPORTY_SPEED" => Some("140".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(config.sporty_speed, 140.0);
    /// assert_eq!(config.reference_speed, 63.0);
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, InputError> {
        let defaults = EngineConfig::default();
        let read = |name: &str, default: f64| -> Result<f64, InputError> {
            let key = format!("{PREFIX}{name}");
            let Some(value) = lookup(&key) else {
                return Ok(default);
            };

            debug!("Configuration {key}={value}");
            match value.trim().parse::<f64>() {
                Ok(parsed) if parsed.is_finite() && parsed > 0.0 => Ok(parsed),
                _ => Err(InputError::InvalidConfig { key, value }),
            }
        };

        Ok(Self {
            reference_speed: read("REFERENCE_SPEED", defaults.reference_speed)?,
            gasoline_co2_ceiling: read("GASOLINE_CO2_CEILING", defaults.gasoline_co2_ceiling)?,
            diesel_co2_ceiling: read("DIESEL_CO2_CEILING", defaults.diesel_co2_ceiling)?,
            gasoline_emission_factor: read(
                "GASOLINE_EMISSION_FACTOR",
                defaults.gasoline_emission_factor,
            )?,
            diesel_emission_factor: read("DIESEL_EMISSION_FACTOR", defaults.diesel_emission_factor)?,
            economic_speed: read("ECONOMIC_SPEED", defaults.economic_speed)?,
            moderate_speed: read("MODERATE_SPEED", defaults.moderate_speed)?,
            sporty_speed: read("SPORTY_SPEED", defaults.sporty_speed)?,
            fallback_tank_capacity: read("FALLBACK_TANK_CAPACITY", defaults.fallback_tank_capacity)?,
        })
    }

    pub fn co2_ceiling(&self, fuel_type: FuelType) -> f64 {
        match fuel_type {
            FuelType::Gasoline => self.gasoline_co2_ceiling,
            FuelType::Diesel => self.diesel_co2_ceiling,
        }
    }

    pub fn emission_factor(&self, fuel_type: FuelType) -> f64 {
        match fuel_type {
            FuelType::Gasoline => self.gasoline_emission_factor,
            FuelType::Diesel => self.diesel_emission_factor,
        }
    }

    pub fn style_speed(&self, style: DrivingStyle) -> f64 {
        match style {
            DrivingStyle::Economic => self.economic_speed,
            DrivingStyle::Moderate => self.moderate_speed,
            DrivingStyle::Sporty => self.sporty_speed,
        }
    }
}
