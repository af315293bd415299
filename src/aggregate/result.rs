use crate::cost::{CalculationMode, RouteCost, ZoneCharge};
use crate::ident::{CategoryId, VehicleId};
use crate::model::{FuelCalculationResult, FuelType};
use crate::util::round::{round_to, GRAM_DECIMALS, LITER_DECIMALS, MONEY_DECIMALS};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Rounded figures of one price zone within a category estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneBreakdown {
    pub zone: String,
    pub length_km: f64,
    pub price_date: NaiveDate,
    pub liters_consumed: f64,
    pub liters_purchased: f64,
    pub liters_charged: f64,
    pub cost_taxed: f64,
    pub cost_untaxed: f64,
}

/// The rounded route estimate of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryEstimate {
    pub category: String,
    pub mode: CalculationMode,

    /// Number of vehicles blended into this estimate, one in category mode.
    pub vehicles: usize,
    pub cruise_speed: f64,
    pub tank_capacity: f64,
    pub route_length_km: f64,

    #[serde(flatten)]
    pub fuel: FuelCalculationResult,
    pub liters_purchased: f64,

    pub cost_taxed: f64,
    pub cost_untaxed: f64,
    pub price_date: Option<NaiveDate>,

    pub zones: Vec<ZoneBreakdown>,
}

impl CategoryEstimate {
    /// Blends the route costs of one or more vehicles.
    ///
    /// Liters and CO2 are summed across vehicles, rates are averaged,
    /// and monetary totals are averaged over the number of vehicles.
    /// Returns `Ok(None)` for no vehicles.
    pub fn blend(
        category: impl Into<String>,
        costs: &[RouteCost],
        tank_capacity: f64,
    ) -> crate::Result<Option<Self>> {
        let Some(first) = costs.first() else {
            return Ok(None);
        };

        let results = costs.iter().map(RouteCost::fuel_result).collect::<Vec<_>>();
        let Some(fuel) = FuelCalculationResult::combine(&results)? else {
            return Ok(None);
        };

        let count = costs.len() as f64;
        let average = |value: fn(&RouteCost) -> f64| costs.iter().map(value).sum::<f64>() / count;
        let total = |value: fn(&RouteCost) -> f64| costs.iter().map(value).sum::<f64>();

        let zones = first
            .zones
            .iter()
            .enumerate()
            .map(|(index, zone)| {
                let charges = costs
                    .iter()
                    .filter_map(|cost| cost.zones.get(index))
                    .collect::<Vec<_>>();

                ZoneBreakdown::blend(zone, &charges)
            })
            .collect();

        Ok(Some(CategoryEstimate {
            category: category.into(),
            mode: first.estimate.mode,
            vehicles: costs.len(),
            cruise_speed: first.estimate.cruise_speed,
            tank_capacity,
            route_length_km: round_to(first.length / 1000.0, LITER_DECIMALS),
            fuel: fuel.round(GRAM_DECIMALS),
            liters_purchased: round_to(total(|cost| cost.liters_purchased), LITER_DECIMALS),
            cost_taxed: round_to(average(|cost| cost.cost_taxed), MONEY_DECIMALS),
            cost_untaxed: round_to(average(|cost| cost.cost_untaxed), MONEY_DECIMALS),
            price_date: costs.iter().filter_map(|cost| cost.price_date).max(),
            zones,
        }))
    }

    pub fn fuel_type(&self) -> FuelType {
        self.fuel.fuel_type
    }
}

impl ZoneBreakdown {
    fn blend(zone: &ZoneCharge, charges: &[&ZoneCharge]) -> Self {
        let count = charges.len().max(1) as f64;
        let total = |value: fn(&ZoneCharge) -> f64| charges.iter().map(|charge| value(charge)).sum::<f64>();

        ZoneBreakdown {
            zone: zone.scope.to_string(),
            length_km: round_to(zone.length / 1000.0, LITER_DECIMALS),
            price_date: zone.price_date,
            liters_consumed: round_to(total(|charge| charge.liters_consumed), LITER_DECIMALS),
            liters_purchased: round_to(total(|charge| charge.liters_purchased), LITER_DECIMALS),
            liters_charged: round_to(total(|charge| charge.liters_charged), LITER_DECIMALS),
            cost_taxed: round_to(total(|charge| charge.cost_taxed) / count, MONEY_DECIMALS),
            cost_untaxed: round_to(total(|charge| charge.cost_untaxed) / count, MONEY_DECIMALS),
        }
    }
}

/// The result of a single category, or why it could not be estimated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CategoryRouteResult {
    Calculated(CategoryEstimate),

    InsufficientData {
        category: String,
        calculation_errors: Vec<String>,
    },
}

impl CategoryRouteResult {
    pub fn insufficient(category: impl Into<String>, errors: &[crate::Error]) -> Self {
        CategoryRouteResult::InsufficientData {
            category: category.into(),
            calculation_errors: errors.iter().map(ToString::to_string).collect(),
        }
    }

    pub fn estimate(&self) -> Option<&CategoryEstimate> {
        match self {
            CategoryRouteResult::Calculated(estimate) => Some(estimate),
            CategoryRouteResult::InsufficientData { .. } => None,
        }
    }

    pub fn is_calculated(&self) -> bool {
        self.estimate().is_some()
    }
}

/// Per-category results of a route request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    pub fuel_type: FuelType,
    pub cruise_speed: f64,
    pub route_length_km: f64,
    pub categories: BTreeMap<CategoryId, CategoryRouteResult>,

    /// Requested vehicles the statistics provider does not know.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<VehicleId>,
}

impl RouteResult {
    pub fn get(&self, category: &CategoryId) -> Option<&CategoryRouteResult> {
        self.categories.get(category)
    }
}
