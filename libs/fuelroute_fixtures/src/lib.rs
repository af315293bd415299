//! Reference data shared by the tests and benchmarks of `fuelroute`.
//!
//! Geometries are given as WKT in `EPSG:4326` (longitude, latitude) and
//! statistics are given as `(minimum, mean, maximum)` triples.

/// A simplified bounding polygon standing in for France.
pub const FRANCE_BOUNDARY: &str = "POLYGON ((-5 42, 6 42, 6 51, -5 51, -5 42))";

/// A simplified bounding polygon standing in for Germany. Shares its
/// western edge with [`FRANCE_BOUNDARY`].
pub const GERMANY_BOUNDARY: &str = "POLYGON ((6 47, 15 47, 15 55, 6 55, 6 47))";

/// A route leaving France, crossing Germany and ending east of every
/// known boundary.
pub const PARIS_PRAGUE_ROUTE: &str = "LINESTRING (2 48.5, 5 48.8, 8 49, 12 49.5, 17 49.8)";

/// A route which leaves France, crosses into Germany and returns.
pub const BORDER_ZIGZAG_ROUTE: &str = "LINESTRING (4 48, 8 48, 8 48.5, 4 48.5)";

/// A route which does not touch any known boundary.
pub const BALKAN_ROUTE: &str = "LINESTRING (20 40, 21 40.5, 22 40.7)";

/// A short (roughly 10 meter) route.
pub const TEN_METER_ROUTE: &str = "LINESTRING (8 49, 8.000137 49)";

/// Speed (km/h) landmarks of the small gasoline car category.
pub const SMALL_CAR_GASOLINE_SPEED: (f64, f64, f64) = (5.2, 42.7, 128.4);

/// Consumption (liters per hour) landmarks of the small gasoline car category.
pub const SMALL_CAR_GASOLINE_CONSUMPTION: (f64, f64, f64) = (0.55, 2.61, 12.9);

/// CO2 (grams per hour) landmarks of the small gasoline car category.
pub const SMALL_CAR_GASOLINE_CO2: (f64, f64, f64) = (1290.0, 6130.0, 30300.0);

/// Speed (km/h) landmarks of the diesel van category.
pub const VAN_DIESEL_SPEED: (f64, f64, f64) = (4.8, 38.5, 112.0);

/// Consumption (liters per hour) landmarks of the diesel van category.
pub const VAN_DIESEL_CONSUMPTION: (f64, f64, f64) = (0.8, 3.1, 14.0);

/// CO2 (grams per hour) landmarks of the diesel van category.
///
/// Implies well over 2640 g/L, as observed in sparsely sampled categories.
pub const VAN_DIESEL_CO2: (f64, f64, f64) = (2300.0, 9000.0, 40000.0);

/// Official figures as `(liters per 100km, grams CO2 per km, number of cars)`.
pub const SMALL_CAR_GASOLINE_OFFICIAL: [(f64, f64, u32); 3] = [
    (5.4, 125.0, 1200),
    (6.1, 141.0, 300),
    (4.9, 113.0, 500),
];
