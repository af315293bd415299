use crate::config::EngineConfig;
use crate::ident::{CategoryId, VehicleId};
use crate::model::FuelType;
use geo::LineString;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumString};

/// What the route is estimated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// One result per category, from its statistics and official figures.
    Categories(Vec<CategoryId>),

    /// Concrete vehicles, blended into one result per category.
    Vehicles(Vec<VehicleId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum DrivingStyle {
    Economic,
    Moderate,
    Sporty,
}

/// The cruise speed, given directly or through a driving style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CruiseSpeed {
    Kmh(f64),
    Style(DrivingStyle),
}

impl CruiseSpeed {
    pub fn resolve(&self, config: &EngineConfig) -> f64 {
        match self {
            CruiseSpeed::Kmh(kmh) => *kmh,
            CruiseSpeed::Style(style) => config.style_speed(*style),
        }
    }
}

impl Default for CruiseSpeed {
    fn default() -> Self {
        CruiseSpeed::Style(DrivingStyle::Moderate)
    }
}

/// A route to estimate, and for what.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub route: LineString<f64>,
    pub selection: Selection,
    pub fuel_type: FuelType,
    pub speed: CruiseSpeed,

    /// Tank capacity (liters) replacing a category's default.
    pub tank_capacity_overrides: HashMap<CategoryId, f64>,

    /// Liters per 100km replacing a category's estimate.
    pub manual_consumption_overrides: HashMap<CategoryId, f64>,
}

impl RouteRequest {
    pub fn new(
        route: LineString<f64>,
        selection: Selection,
        fuel_type: FuelType,
        speed: CruiseSpeed,
    ) -> Self {
        Self {
            route,
            selection,
            fuel_type,
            speed,
            tank_capacity_overrides: HashMap::new(),
            manual_consumption_overrides: HashMap::new(),
        }
    }

    pub fn with_tank_capacity(mut self, category: impl Into<CategoryId>, liters: f64) -> Self {
        self.tank_capacity_overrides.insert(category.into(), liters);
        self
    }

    pub fn with_manual_consumption(
        mut self,
        category: impl Into<CategoryId>,
        liters_per_100km: f64,
    ) -> Self {
        self.manual_consumption_overrides
            .insert(category.into(), liters_per_100km);
        self
    }
}
