use crate::aggregate::{
    CategoryEstimate, CategoryInfo, CategoryProvider, CategoryRouteResult, PriceProvider,
    RouteRequest, RouteResult, Selection, StatisticsProvider, VehicleRecord,
};
use crate::config::EngineConfig;
use crate::cost::{ConsumptionEstimate, RouteCost, ZoneCostAccumulator};
use crate::error::{InputError, InsufficientDataError};
use crate::ident::CategoryId;
use crate::model::{ConsumptionModel, FuelType, VehicleClassStatistics};
use crate::price::{line_length, PriceZoneSegmenter, RoutePriceZone};
use crate::util::round::{round_to, LITER_DECIMALS};
use itertools::Itertools;
use log::{debug, info, warn};
use measure_time::info_time;
use rayon::prelude::*;
use std::collections::BTreeMap;
#[cfg(feature = "tracing")]
use tracing::Level;

/// Everything the engine consumes from its data sources.
pub trait Providers: StatisticsProvider + PriceProvider + CategoryProvider {}
impl<T> Providers for T where T: StatisticsProvider + PriceProvider + CategoryProvider {}

/// Estimates the fuel, emission and cost of driving `request.route`, for
/// each requested category (or each category of the requested vehicles).
///
/// Structural problems with the request fail it with an [`InputError`].
/// A category which lacks the data to be estimated is reported as
/// [`CategoryRouteResult::InsufficientData`] instead.
#[cfg_attr(feature = "tracing", tracing::instrument(level = Level::INFO, skip_all, fields(fuel_type = %request.fuel_type)))]
pub fn compute_route<P: Providers>(
    request: &RouteRequest,
    providers: &P,
    config: &EngineConfig,
) -> crate::Result<RouteResult> {
    validate(request)?;
    info_time!("Computing route for {:?}", request.selection);

    let cruise_speed = request.speed.resolve(config);
    let general = providers
        .general_price()
        .ok_or(InputError::MissingGeneralPrice)?;

    let zones = PriceZoneSegmenter::new(providers.country_prices(&request.route), general)?
        .segment(&request.route)?;

    let route_length = line_length(&request.route);
    info!(
        "Route of {:.3}km crosses {} price zones, driven at {cruise_speed}km/h",
        route_length / 1000.0,
        zones.len()
    );

    let context = RouteContext {
        request,
        providers,
        config,
        zones,
        cruise_speed,
    };

    let mut unresolved = vec![];
    let categories = match &request.selection {
        Selection::Categories(categories) => categories
            .par_iter()
            .map(|category| -> crate::Result<_> {
                Ok((category.clone(), context.category(category)?))
            })
            .collect::<crate::Result<Vec<_>>>()?,
        Selection::Vehicles(vehicles) => {
            let (known, unknown): (Vec<_>, Vec<_>) = vehicles
                .iter()
                .map(|id| providers.vehicle(id).ok_or(id))
                .partition_result();

            for id in &unknown {
                warn!("{}", InsufficientDataError::UnknownVehicle((*id).clone()));
            }
            unresolved.extend(unknown.into_iter().cloned());

            known
                .into_iter()
                .into_group_map_by(|vehicle| vehicle.category.clone())
                .into_par_iter()
                .map(|(category, vehicles)| -> crate::Result<_> {
                    let result = context.vehicles(&category, &vehicles)?;
                    Ok((category, result))
                })
                .collect::<crate::Result<Vec<_>>>()?
        }
    };

    Ok(RouteResult {
        fuel_type: request.fuel_type,
        cruise_speed,
        route_length_km: round_to(route_length / 1000.0, LITER_DECIMALS),
        categories: categories.into_iter().collect::<BTreeMap<_, _>>(),
        unresolved,
    })
}

fn validate(request: &RouteRequest) -> Result<(), InputError> {
    if request.route.0.len() < 2 {
        return Err(InputError::EmptyRoute);
    }

    if let Some(capacity) = request
        .tank_capacity_overrides
        .values()
        .find(|capacity| !(**capacity > 0.0 && capacity.is_finite()))
    {
        return Err(InputError::InvalidTankCapacity(*capacity));
    }

    if let Some(consumption) = request
        .manual_consumption_overrides
        .values()
        .find(|consumption| !(**consumption >= 0.0 && consumption.is_finite()))
    {
        return Err(InputError::InvalidManualConsumption(*consumption));
    }

    Ok(())
}

struct RouteContext<'r, P> {
    request: &'r RouteRequest,
    providers: &'r P,
    config: &'r EngineConfig,
    zones: Vec<RoutePriceZone>,
    cruise_speed: f64,
}

impl<P: Providers> RouteContext<'_, P> {
    fn fuel_type(&self) -> FuelType {
        self.request.fuel_type
    }

    /// Recovers insufficient data into a placeholder, and propagates
    /// anything else.
    fn recover(
        display_name: &str,
        result: crate::Result<CategoryRouteResult>,
    ) -> crate::Result<CategoryRouteResult> {
        match result {
            Err(error) if error.is_recoverable() => {
                warn!("Cannot estimate {display_name}: {error}");
                Ok(CategoryRouteResult::insufficient(display_name, &[error]))
            }
            other => other,
        }
    }

    fn info(&self, category: &CategoryId) -> Result<&CategoryInfo, InsufficientDataError> {
        self.providers
            .category(category)
            .ok_or_else(|| InsufficientDataError::UnknownCategory(category.clone()))
    }

    fn tank_capacity(&self, info: &CategoryInfo) -> f64 {
        self.request
            .tank_capacity_overrides
            .get(&info.id)
            .copied()
            .or(info.default_tank_capacity)
            .unwrap_or(self.config.fallback_tank_capacity)
    }

    fn manual(&self, category: &CategoryId) -> Option<ConsumptionEstimate> {
        let fuel_type = self.fuel_type();

        self.request
            .manual_consumption_overrides
            .get(category)
            .map(|liters_per_100km| {
                debug!("Using manual consumption of {liters_per_100km}L/100km for {category}");
                ConsumptionEstimate::manual(
                    fuel_type,
                    *liters_per_100km,
                    self.config.emission_factor(fuel_type),
                    self.cruise_speed,
                )
                .capped(self.config.co2_ceiling(fuel_type))
            })
    }

    fn model(&self, category: &CategoryId) -> crate::Result<ConsumptionModel> {
        let fuel_type = self.fuel_type();
        let records = self.providers.phenomenon_records(category, fuel_type);
        let statistics = VehicleClassStatistics::from_records(category, fuel_type, records)?;

        Ok(ConsumptionModel::from_statistics(
            &statistics,
            self.config.co2_ceiling(fuel_type),
        )?)
    }

    fn accumulate(&self, estimate: &ConsumptionEstimate, tank_capacity: f64) -> crate::Result<RouteCost> {
        let accumulator = ZoneCostAccumulator::new(estimate, tank_capacity)?;
        Ok(accumulator.accumulate(&self.zones))
    }

    /// The category estimate, preferring a manual override, then the
    /// official figures and finally the speed statistics alone.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = Level::DEBUG, skip(self)))]
    fn category(&self, category: &CategoryId) -> crate::Result<CategoryRouteResult> {
        let info = match self.info(category) {
            Ok(info) => info,
            Err(error) => return Self::recover(category.as_str(), Err(error.into())),
        };

        let result = self.estimate_category(category, info);
        Self::recover(&info.display_name, result)
    }

    fn estimate_category(
        &self,
        category: &CategoryId,
        info: &CategoryInfo,
    ) -> crate::Result<CategoryRouteResult> {
        let estimate = match self.manual(category) {
            Some(estimate) => estimate,
            None => {
                let model = self.model(category)?;
                let official = self.providers.official_figures(category, self.fuel_type());

                ConsumptionEstimate::category_average(
                    &model,
                    official,
                    self.config.reference_speed,
                    self.cruise_speed,
                )
                .unwrap_or_else(|| {
                    debug!("No official figures for {category}, using its statistics alone");
                    ConsumptionEstimate::empirical(&model, self.cruise_speed)
                })
            }
        };

        let tank_capacity = self.tank_capacity(info);
        let cost = self.accumulate(&estimate, tank_capacity)?;

        debug!(
            "Category {category} ({}) consumes {:.3}L at {:.2}EUR",
            estimate.mode, cost.liters, cost.cost_taxed
        );

        CategoryEstimate::blend(&info.display_name, &[cost], tank_capacity)?
            .map(CategoryRouteResult::Calculated)
            .ok_or_else(|| InsufficientDataError::NoUsableVehicle(category.clone()).into())
    }

    /// Estimates each vehicle of one category, blended into a single result.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = Level::DEBUG, skip(self, vehicles)))]
    fn vehicles(
        &self,
        category: &CategoryId,
        vehicles: &[&VehicleRecord],
    ) -> crate::Result<CategoryRouteResult> {
        let info = match self.info(category) {
            Ok(info) => info,
            Err(error) => return Self::recover(category.as_str(), Err(error.into())),
        };

        let tank_capacity = self.tank_capacity(info);
        let manual = self.manual(category);
        let model = match manual {
            Some(_) => None,
            None => Some(self.model(category)),
        };

        let mut errors = vec![];
        let mut costs = vec![];

        for vehicle in vehicles {
            let estimate = match self.vehicle(vehicle, manual, model.as_ref()) {
                Ok(estimate) => estimate,
                Err(error) if error.is_recoverable() => {
                    debug!("Skipping vehicle {}: {error}", vehicle.id);
                    errors.push(error);
                    continue;
                }
                Err(error) => return Err(error),
            };

            costs.push(self.accumulate(&estimate, tank_capacity)?);
        }

        match CategoryEstimate::blend(&info.display_name, &costs, tank_capacity)? {
            Some(estimate) => {
                debug!(
                    "Blended {} of {} vehicles for {category}",
                    costs.len(),
                    vehicles.len()
                );
                Ok(CategoryRouteResult::Calculated(estimate))
            }
            None => {
                errors.push(InsufficientDataError::NoUsableVehicle(category.clone()).into());
                warn!("No vehicle of {} could be estimated", info.display_name);
                Ok(CategoryRouteResult::insufficient(&info.display_name, &errors))
            }
        }
    }

    fn vehicle(
        &self,
        vehicle: &VehicleRecord,
        manual: Option<ConsumptionEstimate>,
        model: Option<&crate::Result<ConsumptionModel>>,
    ) -> crate::Result<ConsumptionEstimate> {
        if vehicle.fuel_type != self.fuel_type() {
            return Err(
                InsufficientDataError::FuelTypeMismatch(vehicle.id.clone(), vehicle.fuel_type).into(),
            );
        }

        if let Some(estimate) = manual {
            return Ok(estimate);
        }

        let model = match model {
            Some(Ok(model)) => model,
            Some(Err(error)) => return Err(error.clone()),
            None => {
                return Err(InsufficientDataError::MissingStatistics(
                    vehicle.category.clone(),
                    vehicle.fuel_type,
                )
                .into())
            }
        };

        Ok(match &vehicle.official {
            Some(official) => ConsumptionEstimate::direct(
                model,
                official,
                self.config.reference_speed,
                self.cruise_speed,
            ),
            None => ConsumptionEstimate::empirical(model, self.cruise_speed),
        })
    }
}
