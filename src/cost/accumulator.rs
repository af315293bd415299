use crate::cost::{ConsumptionEstimate, ZoneConsumption};
use crate::error::InputError;
use crate::model::{FuelCalculationResult, FuelType};
use crate::price::{PriceScope, RoutePriceZone};
use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

/// Quantities (in liters) below this are treated as nothing.
const LITER_EPSILON: f64 = 1e-12;

/// The state carried from one zone to the next.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AccumulatorState<'z> {
    /// Liters purchased in `previous_zone`, not yet consumed.
    pub remaining_fuel: f64,

    /// The zone in which `remaining_fuel` was purchased.
    pub previous_zone: Option<&'z RoutePriceZone>,
}

/// What was consumed, bought and paid within one zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneCharge {
    pub scope: PriceScope,

    /// Ground length of the zone, in meters.
    pub length: f64,
    pub price_date: NaiveDate,

    pub liters_consumed: f64,
    pub co2_grams: f64,

    /// Whole tanks bought in this zone.
    pub liters_purchased: f64,

    /// Liters consumed here, but bought (and paid) in an earlier zone.
    pub liters_from_carryover: f64,

    /// Liters paid for by this charge.
    pub liters_charged: f64,

    pub cost_taxed: f64,
    pub cost_untaxed: f64,
}

/// The cumulative consumption and cost of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteCost {
    pub estimate: ConsumptionEstimate,

    /// Ground length of the route, in meters.
    pub length: f64,

    pub liters: f64,
    pub co2_grams: f64,
    pub liters_purchased: f64,

    /// Fuel left in the tank at the end of the route, which is not charged.
    pub remaining_fuel: f64,

    pub cost_taxed: f64,
    pub cost_untaxed: f64,

    /// The most recent effective date among the traversed zones.
    pub price_date: Option<NaiveDate>,
    pub zones: Vec<ZoneCharge>,
}

impl RouteCost {
    /// The unrounded consumption over the route.
    pub fn fuel_result(&self) -> FuelCalculationResult {
        FuelCalculationResult {
            fuel_type: self.estimate.fuel_type,
            liters_total: self.liters,
            liters_per_100km: self.estimate.rate.liters_per_km * 100.0,
            co2_grams_total: self.co2_grams,
            co2_grams_per_km: self.estimate.rate.co2_grams_per_km,
        }
    }

    pub fn liters_charged(&self) -> f64 {
        self.zones.iter().map(|zone| zone.liters_charged).sum()
    }
}

/// Walks price zones in route order, charging fuel at the price of
/// the zone in which it was purchased.
///
/// Fuel is bought in whole multiples of the tank capacity. Whatever
/// a purchase leaves over is carried into the following zones, and
/// is charged at the price of the zone it was bought in, before the
/// following zone's own purchase.
///
/// ```rust
/// use fuelroute::cost::{ConsumptionEstimate, ZoneCostAccumulator};
/// use fuelroute::model::FuelType;
///
/// let estimate = ConsumptionEstimate::manual(FuelType::Diesel, 6.5, 2640.0, 100.0);
/// let accumulator = ZoneCostAccumulator::new(&estimate, 55.0).unwrap();
///
/// let cost = accumulator.accumulate(&[]);
/// assert_eq!(cost.liters, 0.0);
/// ```
#[derive(Debug)]
pub struct ZoneCostAccumulator<'e> {
    estimate: &'e ConsumptionEstimate,
    tank_capacity: f64,
}

impl<'e> ZoneCostAccumulator<'e> {
    pub fn new(estimate: &'e ConsumptionEstimate, tank_capacity: f64) -> Result<Self, InputError> {
        if !(tank_capacity > 0.0 && tank_capacity.is_finite()) {
            return Err(InputError::InvalidTankCapacity(tank_capacity));
        }

        Ok(Self {
            estimate,
            tank_capacity,
        })
    }

    pub fn fuel_type(&self) -> FuelType {
        self.estimate.fuel_type
    }

    /// Liters bought to cover `needed` liters, in whole tanks.
    pub fn purchase(&self, needed: f64) -> f64 {
        if needed <= LITER_EPSILON {
            return 0.0;
        }

        // Guard against `needed` being an exact multiple up to rounding.
        let tanks = (needed / self.tank_capacity - LITER_EPSILON).ceil().max(1.0);
        tanks * self.tank_capacity
    }

    /// Advances over a single zone.
    pub fn step<'z>(
        &self,
        state: AccumulatorState<'z>,
        zone: &'z RoutePriceZone,
    ) -> (AccumulatorState<'z>, ZoneCharge) {
        let fuel_type = self.fuel_type();
        let ZoneConsumption { liters, co2_grams } = self.estimate.for_length(zone.length());

        // Carried fuel is consumed (and charged) first, at its purchase price.
        let (from_carryover, carry_taxed, carry_untaxed) = match state.previous_zone {
            Some(previous) if state.remaining_fuel > LITER_EPSILON => {
                let used = state.remaining_fuel.min(liters);
                let price = previous.price(fuel_type);

                (
                    used,
                    used * price.taxed_per_liter(),
                    used * price.untaxed_per_liter(),
                )
            }
            _ => (0.0, 0.0, 0.0),
        };

        let net = (liters - from_carryover).max(0.0);
        let purchased = self.purchase(net);

        let price = zone.price(fuel_type);
        let next = match purchased > 0.0 {
            true => AccumulatorState {
                remaining_fuel: purchased - net,
                previous_zone: Some(zone),
            },
            false => AccumulatorState {
                remaining_fuel: (state.remaining_fuel - from_carryover).max(0.0),
                previous_zone: state.previous_zone,
            },
        };

        debug!(
            "Zone {} ({:.1}m): consumed {:.3}L, {:.3}L from carryover, bought {:.3}L, {:.3}L remain",
            zone.scope,
            zone.length(),
            liters,
            from_carryover,
            purchased,
            next.remaining_fuel
        );

        let charge = ZoneCharge {
            scope: zone.scope.clone(),
            length: zone.length(),
            price_date: zone.price_date(),
            liters_consumed: liters,
            co2_grams,
            liters_purchased: purchased,
            liters_from_carryover: from_carryover,
            liters_charged: from_carryover + net,
            cost_taxed: carry_taxed + net * price.taxed_per_liter(),
            cost_untaxed: carry_untaxed + net * price.untaxed_per_liter(),
        };

        (next, charge)
    }

    /// Folds over every zone in order, from an empty tank.
    pub fn accumulate(&self, zones: &[RoutePriceZone]) -> RouteCost {
        let (state, charges) = zones.iter().fold(
            (AccumulatorState::default(), Vec::with_capacity(zones.len())),
            |(state, mut charges), zone| {
                let (state, charge) = self.step(state, zone);
                charges.push(charge);
                (state, charges)
            },
        );

        let cost = charges.iter().fold(
            RouteCost {
                estimate: *self.estimate,
                length: 0.0,
                liters: 0.0,
                co2_grams: 0.0,
                liters_purchased: 0.0,
                remaining_fuel: state.remaining_fuel,
                cost_taxed: 0.0,
                cost_untaxed: 0.0,
                price_date: None,
                zones: vec![],
            },
            |cost, charge| RouteCost {
                length: cost.length + charge.length,
                liters: cost.liters + charge.liters_consumed,
                co2_grams: cost.co2_grams + charge.co2_grams,
                liters_purchased: cost.liters_purchased + charge.liters_purchased,
                cost_taxed: cost.cost_taxed + charge.cost_taxed,
                cost_untaxed: cost.cost_untaxed + charge.cost_untaxed,
                price_date: cost.price_date.max(Some(charge.price_date)),
                ..cost
            },
        );

        RouteCost {
            zones: charges,
            ..cost
        }
    }
}
