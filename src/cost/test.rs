use crate::cost::*;
use crate::error::InputError;
use crate::model::{
    ConsumptionModel, FuelType, PerKmRate, SpeedStatisticSample, GASOLINE_CO2_PER_LITER,
};
use crate::price::{FuelPrice, PriceRecord, PriceScope, RoutePriceZone};
use approx::assert_relative_eq;
use chrono::NaiveDate;
use fuelroute_fixtures::{
    SMALL_CAR_GASOLINE_CO2, SMALL_CAR_GASOLINE_CONSUMPTION, SMALL_CAR_GASOLINE_OFFICIAL,
    SMALL_CAR_GASOLINE_SPEED,
};
use geo::{coord, LineString};

const REFERENCE_SPEED: f64 = 63.0;

fn record(month: u32, euro_per_liter: f64) -> PriceRecord {
    let price = FuelPrice::new(euro_per_liter * 0.5, euro_per_liter, 1.0);

    PriceRecord {
        effective_date: NaiveDate::from_ymd_opt(2024, month, 1).expect("valid date"),
        gasoline: price,
        diesel: price,
    }
}

/// A zone along the equator, from longitude `from` to `to`.
fn zone(from: f64, to: f64, scope: &str, record: PriceRecord) -> RoutePriceZone {
    let segment = LineString::new(vec![coord! { x: from, y: 0.0 }, coord! { x: to, y: 0.0 }]);
    RoutePriceZone::new(segment, PriceScope::Country(scope.into()), record)
}

fn small_car() -> ConsumptionModel {
    let (speed, consumption, co2) = (
        SMALL_CAR_GASOLINE_SPEED,
        SMALL_CAR_GASOLINE_CONSUMPTION,
        SMALL_CAR_GASOLINE_CO2,
    );

    let pairs = |values: (f64, f64, f64)| {
        [
            SpeedStatisticSample::from((speed.0, values.0)),
            SpeedStatisticSample::from((speed.1, values.1)),
            SpeedStatisticSample::from((speed.2, values.2)),
        ]
    };

    ConsumptionModel::new(
        FuelType::Gasoline,
        &pairs(consumption),
        &pairs(co2),
        GASOLINE_CO2_PER_LITER,
    )
    .expect("model must build")
}

fn official() -> Vec<OfficialFigures> {
    SMALL_CAR_GASOLINE_OFFICIAL
        .iter()
        .map(|(liters, co2, cars)| OfficialFigures::new(*liters, *co2, *cars))
        .collect()
}

/// Ten liters per 100km, at 2000g per liter.
fn ten_per_hundred() -> ConsumptionEstimate {
    ConsumptionEstimate::manual(FuelType::Gasoline, 10.0, 2000.0, 90.0)
}

#[test_log::test]
fn carried_fuel_is_charged_where_it_was_bought() {
    let estimate = ten_per_hundred();
    let accumulator = ZoneCostAccumulator::new(&estimate, 50.0).expect("valid tank");

    let zones = [
        zone(0.0, 1.0, "A", record(1, 1.0)),
        zone(1.0, 2.0, "B", record(2, 2.0)),
    ];

    let cost = accumulator.accumulate(&zones);
    let liters = zones[0].length() / 10_000.0;

    // One tank in A covers both zones.
    assert_relative_eq!(cost.zones[0].liters_purchased, 50.0);
    assert_relative_eq!(cost.zones[1].liters_purchased, 0.0);
    assert_relative_eq!(cost.zones[1].liters_from_carryover, liters, max_relative = 1e-9);

    // Both zones are charged at A's price.
    assert_relative_eq!(cost.cost_taxed, 2.0 * liters, max_relative = 1e-9);
    assert_relative_eq!(cost.cost_untaxed, liters, max_relative = 1e-9);
    assert_relative_eq!(cost.remaining_fuel, 50.0 - 2.0 * liters, max_relative = 1e-9);
}

#[test]
fn small_tanks_refill_at_the_local_price() {
    let estimate = ten_per_hundred();
    let accumulator = ZoneCostAccumulator::new(&estimate, 5.0).expect("valid tank");

    let zones = [
        zone(0.0, 1.0, "A", record(1, 1.0)),
        zone(1.0, 2.0, "B", record(2, 2.0)),
    ];

    let cost = accumulator.accumulate(&zones);
    let liters = zones[0].length() / 10_000.0;

    // 11.12L needs three 5L tanks, leaving 3.88L for B.
    let carried = 15.0 - liters;
    assert_relative_eq!(cost.zones[0].liters_purchased, 15.0);
    assert_relative_eq!(cost.zones[1].liters_from_carryover, carried, max_relative = 1e-9);

    let net = liters - carried;
    assert_relative_eq!(cost.zones[1].liters_purchased, 10.0);
    assert_relative_eq!(cost.zones[1].cost_taxed, carried + 2.0 * net, max_relative = 1e-9);
    assert_relative_eq!(cost.remaining_fuel, 10.0 - net, max_relative = 1e-9);
}

#[test]
fn charged_fuel_equals_consumed_fuel() {
    let estimate = ten_per_hundred();

    let zones = [
        zone(0.0, 0.3, "A", record(1, 1.7)),
        zone(0.3, 1.9, "B", record(3, 1.9)),
        zone(1.9, 2.0, "C", record(2, 1.5)),
        zone(2.0, 4.5, "A", record(1, 1.7)),
        zone(4.5, 4.6, "D", record(4, 1.6)),
    ];

    for tank in [1.0, 7.5, 40.0, 60.0, 500.0] {
        let accumulator = ZoneCostAccumulator::new(&estimate, tank).expect("valid tank");
        let cost = accumulator.accumulate(&zones);

        assert_relative_eq!(cost.liters_charged(), cost.liters, max_relative = 1e-9);
        assert_relative_eq!(
            cost.liters_purchased,
            cost.liters + cost.remaining_fuel,
            max_relative = 1e-9
        );

        for charge in &cost.zones {
            assert!(charge.liters_from_carryover <= charge.liters_consumed + 1e-9);
        }
    }
}

#[test]
fn purchases_round_up_to_whole_tanks() {
    let estimate = ten_per_hundred();
    let accumulator = ZoneCostAccumulator::new(&estimate, 50.0).expect("valid tank");

    assert_eq!(accumulator.purchase(0.0), 0.0);
    assert_eq!(accumulator.purchase(0.2), 50.0);
    assert_eq!(accumulator.purchase(50.0), 50.0);
    assert_eq!(accumulator.purchase(100.0), 100.0);
    assert_eq!(accumulator.purchase(100.5), 150.0);
}

#[test]
fn tank_capacity_must_be_positive() {
    let estimate = ten_per_hundred();

    for tank in [0.0, -40.0] {
        assert_eq!(
            ZoneCostAccumulator::new(&estimate, tank).map(|_| ()),
            Err(InputError::InvalidTankCapacity(tank))
        );
    }

    assert!(ZoneCostAccumulator::new(&estimate, f64::NAN).is_err());
    assert!(ZoneCostAccumulator::new(&estimate, f64::INFINITY).is_err());
}

#[test]
fn most_recent_price_date_is_reported() {
    let estimate = ten_per_hundred();
    let accumulator = ZoneCostAccumulator::new(&estimate, 50.0).expect("valid tank");

    let zones = [
        zone(0.0, 1.0, "A", record(2, 1.0)),
        zone(1.0, 2.0, "B", record(5, 1.0)),
        zone(2.0, 3.0, "C", record(3, 1.0)),
    ];

    let cost = accumulator.accumulate(&zones);
    assert_eq!(cost.price_date, NaiveDate::from_ymd_opt(2024, 5, 1));

    let empty = accumulator.accumulate(&[]);
    assert_eq!(empty.price_date, None);
    assert!(empty.zones.is_empty());
}

#[test]
fn stationary_vehicle_costs_nothing() {
    let estimate = ConsumptionEstimate::manual(FuelType::Gasoline, 10.0, 2000.0, 0.0);
    assert_eq!(estimate.rate, PerKmRate::ZERO);

    let accumulator = ZoneCostAccumulator::new(&estimate, 50.0).expect("valid tank");
    let cost = accumulator.accumulate(&[zone(0.0, 1.0, "A", record(1, 1.0))]);

    assert_eq!(cost.liters, 0.0);
    assert_eq!(cost.liters_purchased, 0.0);
    assert_eq!(cost.cost_taxed, 0.0);
    assert_eq!(cost.price_date, NaiveDate::from_ymd_opt(2024, 1, 1));
}

#[test]
fn official_figures_are_weighted_by_cars() {
    let average = OfficialFigures::weighted_average(&official()).expect("records contribute");

    assert_relative_eq!(average.liters_per_km, 0.0538, epsilon = 1e-12);
    assert_relative_eq!(average.co2_grams_per_km, 124.4, epsilon = 1e-9);

    let ignored = [
        OfficialFigures::new(5.0, 120.0, 0),
        OfficialFigures::new(f64::NAN, 120.0, 10),
    ];

    assert_eq!(OfficialFigures::weighted_average(&ignored), None);
}

#[test]
fn official_figures_follow_the_growth_factor() {
    let model = small_car();
    let official = official();

    // At the reference speed, the official figures stand.
    let at_reference =
        ConsumptionEstimate::category_average(&model, &official, REFERENCE_SPEED, REFERENCE_SPEED)
            .expect("records contribute");

    assert_eq!(at_reference.mode, CalculationMode::CategoryAverage);
    assert_relative_eq!(at_reference.rate.liters_per_km, 0.0538, epsilon = 1e-12);
    assert_relative_eq!(at_reference.rate.co2_grams_per_km, 124.4, epsilon = 1e-9);

    let faster = ConsumptionEstimate::category_average(&model, &official, REFERENCE_SPEED, 120.0)
        .expect("records contribute");

    let growth = model.growth_factor(REFERENCE_SPEED, 120.0);
    assert!(growth.consumption > 0.0);
    assert_relative_eq!(
        faster.rate.liters_per_km,
        0.0538 * (1.0 + growth.consumption),
        epsilon = 1e-12
    );
    assert_relative_eq!(
        faster.rate.co2_grams_per_km,
        124.4 * (1.0 + growth.co2),
        epsilon = 1e-9
    );

    let direct = ConsumptionEstimate::direct(&model, &official[0], REFERENCE_SPEED, 120.0);
    assert_eq!(direct.mode, CalculationMode::Direct);
    assert_relative_eq!(
        direct.rate.liters_per_km,
        0.054 * (1.0 + growth.consumption),
        epsilon = 1e-12
    );

    assert_eq!(
        ConsumptionEstimate::category_average(
            &model,
            &Vec::<OfficialFigures>::new(),
            REFERENCE_SPEED,
            120.0
        ),
        None
    );
}

#[test]
fn calibrated_figures_respect_the_ceiling() {
    let model = small_car();

    // 3000g per liter is implausible for gasoline.
    let implausible = OfficialFigures::new(5.0, 150.0, 1);
    let estimate = ConsumptionEstimate::direct(&model, &implausible, REFERENCE_SPEED, 90.0);

    let per_liter = estimate.rate.co2_per_liter().expect("consumes fuel");
    assert!(per_liter <= GASOLINE_CO2_PER_LITER + 1e-9);
}

#[test]
fn empirical_and_manual_estimates() {
    let model = small_car();

    let empirical = ConsumptionEstimate::empirical(&model, 120.0);
    assert_eq!(empirical.mode, CalculationMode::Empirical);
    assert_eq!(empirical.rate, model.consumption_at(120.0).per_km);

    let manual = ConsumptionEstimate::manual(FuelType::Gasoline, 6.0, GASOLINE_CO2_PER_LITER, 90.0);
    assert_eq!(manual.mode, CalculationMode::Manual);
    assert_relative_eq!(manual.rate.liters_per_km, 0.06);
    assert_relative_eq!(manual.rate.co2_grams_per_km, 0.06 * GASOLINE_CO2_PER_LITER);

    let consumption = manual.for_length(25_000.0);
    assert_relative_eq!(consumption.liters, 1.5);
    assert_eq!(manual.for_length(0.0), ZoneConsumption::default());
}
