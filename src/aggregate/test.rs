use crate::aggregate::*;
use crate::config::EngineConfig;
use crate::cost::{CalculationMode, OfficialFigures};
use crate::error::{Error, InputError};
use crate::ident::{CategoryId, VehicleId};
use crate::model::{Aggregate, FuelType, PhenomenonRecord, GASOLINE_CO2_PER_LITER};
use crate::price::{CountryPriceRecord, FuelPrice, PriceRecord};
use approx::assert_relative_eq;
use chrono::NaiveDate;
use fuelroute_fixtures::*;
use geo::{wkt, LineString, Polygon};
use wkt::TryFromWkt;

fn record(year: i32, month: u32, gasoline: f64, diesel: f64) -> PriceRecord {
    PriceRecord {
        effective_date: NaiveDate::from_ymd_opt(year, month, 1).expect("valid date"),
        gasoline: FuelPrice::new(gasoline * 0.45, gasoline, 1000.0),
        diesel: FuelPrice::new(diesel * 0.5, diesel, 1000.0),
    }
}

fn country(code: &str, boundary: &str, record: PriceRecord) -> CountryPriceRecord {
    let boundary = Polygon::<f64>::try_from_wkt_str(boundary).expect("boundary must parse");
    CountryPriceRecord::new(code, boundary, record)
}

fn records(
    fuel_type: FuelType,
    speed: (f64, f64, f64),
    consumption: (f64, f64, f64),
    co2: (f64, f64, f64),
) -> Vec<PhenomenonRecord> {
    vec![
        PhenomenonRecord::new("Speed", fuel_type, Aggregate::from(speed)),
        PhenomenonRecord::new("Consumption", fuel_type, Aggregate::from(consumption)),
        PhenomenonRecord::new("CO2", fuel_type, Aggregate::from(co2)),
    ]
}

fn category(id: &str, name: &str, tank: Option<f64>) -> CategoryInfo {
    CategoryInfo {
        id: CategoryId::new(id),
        display_name: name.into(),
        default_tank_capacity: tank,
    }
}

fn vehicle(id: &str, category: &str, fuel_type: FuelType, official: Option<(f64, f64)>) -> VehicleRecord {
    VehicleRecord {
        id: VehicleId::new(id),
        category: CategoryId::new(category),
        display_name: id.to_uppercase(),
        fuel_type,
        official: official.map(|(liters, co2)| OfficialFigures::new(liters, co2, 1)),
    }
}

fn dataset() -> Dataset {
    let small_car = records(
        FuelType::Gasoline,
        SMALL_CAR_GASOLINE_SPEED,
        SMALL_CAR_GASOLINE_CONSUMPTION,
        SMALL_CAR_GASOLINE_CO2,
    );

    let van = records(
        FuelType::Diesel,
        VAN_DIESEL_SPEED,
        VAN_DIESEL_CONSUMPTION,
        VAN_DIESEL_CO2,
    );

    let dataset = Dataset::new()
        .with_category(category("small_car", "Small car", Some(45.0)))
        .with_category(category("van", "Van", Some(80.0)))
        .with_category(category("suv", "SUV", None))
        .with_statistics("small_car", FuelType::Gasoline, small_car)
        .with_statistics("van", FuelType::Diesel, van)
        .with_country(country("FR", FRANCE_BOUNDARY, record(2024, 3, 1850.0, 1720.0)))
        .with_country(country("DE", GERMANY_BOUNDARY, record(2024, 2, 1790.0, 1680.0)))
        .with_general(record(2024, 1, 1700.0, 1600.0))
        .with_vehicle(vehicle("clio", "small_car", FuelType::Gasoline, Some((5.4, 125.0))))
        .with_vehicle(vehicle("polo", "small_car", FuelType::Gasoline, Some((6.1, 141.0))))
        .with_vehicle(vehicle("golf_tdi", "small_car", FuelType::Diesel, Some((4.6, 121.0))))
        .with_vehicle(vehicle("twingo", "small_car", FuelType::Gasoline, None));

    SMALL_CAR_GASOLINE_OFFICIAL
        .iter()
        .fold(dataset, |dataset, (liters, co2, cars)| {
            dataset.with_official(
                "small_car",
                FuelType::Gasoline,
                OfficialFigures::new(*liters, *co2, *cars),
            )
        })
}

fn route() -> LineString<f64> {
    LineString::try_from_wkt_str(PARIS_PRAGUE_ROUTE).expect("route must parse")
}

fn categories(ids: &[&str]) -> Selection {
    Selection::Categories(ids.iter().map(|id| CategoryId::new(*id)).collect())
}

fn vehicles(ids: &[&str]) -> Selection {
    Selection::Vehicles(ids.iter().map(|id| VehicleId::new(*id)).collect())
}

fn estimate<'a>(result: &'a RouteResult, category: &str) -> &'a CategoryEstimate {
    result
        .get(&CategoryId::new(category))
        .and_then(CategoryRouteResult::estimate)
        .unwrap_or_else(|| panic!("{category} must be calculated"))
}

#[test_log::test]
fn categories_are_estimated_across_price_zones() {
    let request = RouteRequest::new(
        route(),
        categories(&["small_car"]),
        FuelType::Gasoline,
        CruiseSpeed::Kmh(120.0),
    );

    let result = compute_route(&request, &dataset(), &EngineConfig::default())
        .expect("route must compute");

    let small_car = estimate(&result, "small_car");
    assert_eq!(small_car.category, "Small car");
    assert_eq!(small_car.mode, CalculationMode::CategoryAverage);
    assert_eq!(small_car.fuel_type(), FuelType::Gasoline);
    assert_eq!(small_car.vehicles, 1);
    assert_eq!(small_car.tank_capacity, 45.0);
    assert_eq!(small_car.route_length_km, result.route_length_km);

    let zones = small_car
        .zones
        .iter()
        .map(|zone| zone.zone.as_str())
        .collect::<Vec<_>>();
    assert_eq!(zones, vec!["FR", "DE", "general"]);

    let consumed = small_car.zones.iter().map(|zone| zone.liters_consumed).sum::<f64>();
    let charged = small_car.zones.iter().map(|zone| zone.liters_charged).sum::<f64>();
    assert_relative_eq!(consumed, small_car.fuel.liters_total, epsilon = 1e-2);
    assert_relative_eq!(charged, small_car.fuel.liters_total, epsilon = 1e-2);

    // Purchases are whole tanks, covering consumption.
    let tanks = small_car.liters_purchased / 45.0;
    assert_relative_eq!(tanks, tanks.round(), epsilon = 1e-9);
    assert!(small_car.liters_purchased >= small_car.fuel.liters_total);

    let cost = small_car.zones.iter().map(|zone| zone.cost_taxed).sum::<f64>();
    assert_relative_eq!(cost, small_car.cost_taxed, epsilon = 0.05);
    assert!(small_car.cost_untaxed < small_car.cost_taxed);

    assert_eq!(small_car.price_date, NaiveDate::from_ymd_opt(2024, 3, 1));

    let per_liter = small_car.fuel.co2_grams_per_km / (small_car.fuel.liters_per_100km / 100.0);
    assert!(per_liter <= GASOLINE_CO2_PER_LITER + 1.0);
}

#[test]
fn categories_without_data_yield_placeholders() {
    let request = RouteRequest::new(
        route(),
        categories(&["small_car", "suv", "limousine"]),
        FuelType::Gasoline,
        CruiseSpeed::Kmh(100.0),
    );

    let result = compute_route(&request, &dataset(), &EngineConfig::default())
        .expect("route must compute");

    assert_eq!(result.categories.len(), 3);
    assert!(estimate(&result, "small_car").cost_taxed > 0.0);

    let Some(CategoryRouteResult::InsufficientData {
        category,
        calculation_errors,
    }) = result.get(&CategoryId::new("suv"))
    else {
        panic!("suv has no statistics");
    };

    assert_eq!(category, "SUV");
    assert_eq!(calculation_errors.len(), 1);

    let Some(CategoryRouteResult::InsufficientData { category, .. }) =
        result.get(&CategoryId::new("limousine"))
    else {
        panic!("limousine is not a known category");
    };

    assert_eq!(category, "limousine");
}

#[test]
fn statistics_alone_are_used_without_official_figures() {
    let request = RouteRequest::new(
        route(),
        categories(&["van"]),
        FuelType::Diesel,
        CruiseSpeed::Kmh(90.0),
    );

    let result = compute_route(&request, &dataset(), &EngineConfig::default())
        .expect("route must compute");

    let van = estimate(&result, "van");
    assert_eq!(van.mode, CalculationMode::Empirical);
    assert_eq!(van.tank_capacity, 80.0);

    // The van's statistics exceed the physical limit of diesel.
    let per_liter = van.fuel.co2_grams_per_km / (van.fuel.liters_per_100km / 100.0);
    assert_relative_eq!(per_liter, 2640.0, max_relative = 1e-3);
}

#[test]
fn manual_consumption_overrides_statistics() {
    let request = RouteRequest::new(
        route(),
        categories(&["suv"]),
        FuelType::Gasoline,
        CruiseSpeed::Style(DrivingStyle::Sporty),
    )
    .with_manual_consumption("suv", 9.5)
    .with_tank_capacity("suv", 70.0);

    let result = compute_route(&request, &dataset(), &EngineConfig::default())
        .expect("route must compute");

    let suv = estimate(&result, "suv");
    assert_eq!(suv.mode, CalculationMode::Manual);
    assert_eq!(suv.cruise_speed, 130.0);
    assert_eq!(suv.tank_capacity, 70.0);
    assert_eq!(suv.fuel.liters_per_100km, 9.5);
    assert_relative_eq!(suv.fuel.co2_grams_per_km, 0.095 * 2392.0, epsilon = 1e-6);
    assert_relative_eq!(
        suv.fuel.liters_total,
        result.route_length_km * 0.095,
        epsilon = 1e-2
    );
}

#[test]
fn manual_consumption_respects_emission_ceiling() {
    let config = EngineConfig {
        gasoline_emission_factor: 3000.0,
        ..EngineConfig::default()
    };

    let request = RouteRequest::new(
        route(),
        categories(&["suv"]),
        FuelType::Gasoline,
        CruiseSpeed::Kmh(110.0),
    )
    .with_manual_consumption("suv", 10.0);

    let result = compute_route(&request, &dataset(), &config).expect("route must compute");

    let suv = estimate(&result, "suv");
    assert_eq!(suv.fuel.liters_per_100km, 10.0);
    assert_relative_eq!(suv.fuel.co2_grams_per_km, 0.1 * 2392.0, epsilon = 1e-6);
    assert!(suv.fuel.co2_grams_total <= suv.fuel.liters_total * 2392.0 + 1e-3);
}

#[test]
fn fallback_tank_capacity_applies() {
    let config = EngineConfig {
        fallback_tank_capacity: 33.0,
        ..EngineConfig::default()
    };

    let request = RouteRequest::new(
        route(),
        categories(&["suv"]),
        FuelType::Gasoline,
        CruiseSpeed::Kmh(110.0),
    )
    .with_manual_consumption("suv", 8.0);

    let result = compute_route(&request, &dataset(), &config).expect("route must compute");
    assert_eq!(estimate(&result, "suv").tank_capacity, 33.0);
}

#[test]
fn vehicles_are_blended_per_category() {
    let config = EngineConfig::default();
    let dataset = dataset();

    let single = |id: &str| {
        let request = RouteRequest::new(
            route(),
            vehicles(&[id]),
            FuelType::Gasoline,
            CruiseSpeed::Kmh(120.0),
        );

        let result = compute_route(&request, &dataset, &config).expect("route must compute");
        estimate(&result, "small_car").clone()
    };

    let (clio, polo) = (single("clio"), single("polo"));
    assert_eq!(clio.mode, CalculationMode::Direct);

    let request = RouteRequest::new(
        route(),
        vehicles(&["clio", "polo", "golf_tdi"]),
        FuelType::Gasoline,
        CruiseSpeed::Kmh(120.0),
    );

    let result = compute_route(&request, &dataset, &config).expect("route must compute");
    let blended = estimate(&result, "small_car");

    assert_eq!(blended.vehicles, 2);
    assert_relative_eq!(
        blended.fuel.liters_total,
        clio.fuel.liters_total + polo.fuel.liters_total,
        epsilon = 2e-3
    );
    assert_relative_eq!(
        blended.fuel.liters_per_100km,
        (clio.fuel.liters_per_100km + polo.fuel.liters_per_100km) / 2.0,
        epsilon = 2e-3
    );
    assert_relative_eq!(
        blended.cost_taxed,
        (clio.cost_taxed + polo.cost_taxed) / 2.0,
        epsilon = 2e-2
    );
}

#[test]
fn vehicles_without_official_figures_use_statistics() {
    let request = RouteRequest::new(
        route(),
        vehicles(&["twingo"]),
        FuelType::Gasoline,
        CruiseSpeed::Kmh(120.0),
    );

    let result = compute_route(&request, &dataset(), &EngineConfig::default())
        .expect("route must compute");

    assert_eq!(estimate(&result, "small_car").mode, CalculationMode::Empirical);
}

#[test]
fn mismatched_vehicles_are_insufficient() {
    let request = RouteRequest::new(
        route(),
        vehicles(&["golf_tdi", "beetle"]),
        FuelType::Gasoline,
        CruiseSpeed::Kmh(120.0),
    );

    let result = compute_route(&request, &dataset(), &EngineConfig::default())
        .expect("route must compute");

    // Unknown vehicles cannot be attributed to any category.
    assert_eq!(result.categories.len(), 1);

    let Some(CategoryRouteResult::InsufficientData {
        calculation_errors, ..
    }) = result.get(&CategoryId::new("small_car"))
    else {
        panic!("no vehicle matches the fuel type");
    };

    assert_eq!(calculation_errors.len(), 2);
    assert_eq!(result.unresolved, vec![VehicleId::new("beetle")]);
}

#[test]
fn unknown_vehicles_are_reported() {
    let request = RouteRequest::new(
        route(),
        vehicles(&["beetle", "clio", "2cv"]),
        FuelType::Gasoline,
        CruiseSpeed::Kmh(100.0),
    );

    let result = compute_route(&request, &dataset(), &EngineConfig::default())
        .expect("route must compute");

    assert!(estimate(&result, "small_car").vehicles > 0);
    assert_eq!(
        result.unresolved,
        vec![VehicleId::new("beetle"), VehicleId::new("2cv")]
    );

    let request = RouteRequest::new(
        route(),
        vehicles(&["beetle"]),
        FuelType::Gasoline,
        CruiseSpeed::Kmh(100.0),
    );

    let result = compute_route(&request, &dataset(), &EngineConfig::default())
        .expect("route must compute");

    assert!(result.categories.is_empty());
    assert_eq!(result.unresolved, vec![VehicleId::new("beetle")]);

    let json = serde_json::to_value(&result).expect("result must serialize");
    assert_eq!(json["unresolved"], serde_json::json!(["beetle"]));
}

#[test]
fn stationary_request_is_zero() {
    let request = RouteRequest::new(
        route(),
        categories(&["small_car"]),
        FuelType::Gasoline,
        CruiseSpeed::Kmh(0.0),
    );

    let result = compute_route(&request, &dataset(), &EngineConfig::default())
        .expect("route must compute");

    let small_car = estimate(&result, "small_car");
    assert!(small_car.fuel.is_zero());
    assert_eq!(small_car.cost_taxed, 0.0);
    assert_eq!(small_car.liters_purchased, 0.0);
}

#[test]
fn structural_errors_fail_the_request() {
    let dataset = dataset();
    let config = EngineConfig::default();
    let request = |route: LineString<f64>| {
        RouteRequest::new(
            route,
            categories(&["small_car"]),
            FuelType::Gasoline,
            CruiseSpeed::Kmh(90.0),
        )
    };

    assert_eq!(
        compute_route(&request(LineString::new(vec![])), &dataset, &config),
        Err(Error::Input(InputError::EmptyRoute))
    );

    assert_eq!(
        compute_route(&request(route()).with_tank_capacity("small_car", 0.0), &dataset, &config),
        Err(Error::Input(InputError::InvalidTankCapacity(0.0)))
    );

    assert_eq!(
        compute_route(
            &request(route()).with_manual_consumption("small_car", -2.0),
            &dataset,
            &config
        ),
        Err(Error::Input(InputError::InvalidManualConsumption(-2.0)))
    );

    let without_prices = Dataset {
        general: None,
        ..dataset.clone()
    };
    assert_eq!(
        compute_route(&request(route()), &without_prices, &config),
        Err(Error::Input(InputError::MissingGeneralPrice))
    );

    let mut mixed = dataset.clone();
    mixed.statistics[0].records[1].fuel_type = FuelType::Diesel;
    assert!(matches!(
        compute_route(&request(route()), &mixed, &config),
        Err(Error::Input(InputError::MixedFuelTypes { .. }))
    ));
}

#[test]
fn route_outside_every_country_uses_general_prices() {
    let request = RouteRequest::new(
        wkt! { LINESTRING (20.0 40.0, 21.0 40.5, 22.0 40.7) },
        categories(&["small_car"]),
        FuelType::Gasoline,
        CruiseSpeed::Kmh(90.0),
    );

    let result = compute_route(&request, &dataset(), &EngineConfig::default())
        .expect("route must compute");

    let small_car = estimate(&result, "small_car");
    assert_eq!(small_car.zones.len(), 1);
    assert_eq!(small_car.zones[0].zone, "general");
    assert_eq!(small_car.price_date, NaiveDate::from_ymd_opt(2024, 1, 1));
}
