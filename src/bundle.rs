//! The JSON request bundle read by the binary.
//!
//! A bundle carries a route request, and every record the engine needs
//! to answer it. Geometries are WKT strings in `EPSG:4326`.
//!
//! ```json
//! {
//!   "request": {
//!     "route": "LINESTRING (2 48.5, 5 48.8, 8 49)",
//!     "selection": { "categories": ["small_car"] },
//!     "fuel_type": "gasoline",
//!     "speed": { "style": "moderate" }
//!   },
//!   "data": {
//!     "categories": [{ "id": "small_car", "display_name": "Small car" }],
//!     "statistics": [],
//!     "countries": [],
//!     "general": { "effective_date": "2024-01-01", "gasoline": { .. }, "diesel": { .. } }
//!   }
//! }
//! ```
use crate::aggregate::{
    CategoryInfo, CruiseSpeed, Dataset, OfficialRecord, RouteRequest, Selection, StatisticsSet,
    VehicleRecord,
};
use crate::error::InputError;
use crate::ident::CategoryId;
use crate::model::FuelType;
use crate::price::{CountryPriceRecord, PriceRecord};
use geo::{Geometry, LineString, MultiPolygon};
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use wkt::TryFromWkt;

#[derive(Debug, Clone, Deserialize)]
pub struct RequestBundle {
    pub request: RequestSection,
    pub data: DataSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestSection {
    pub route: String,
    pub selection: Selection,
    pub fuel_type: FuelType,

    #[serde(default)]
    pub speed: CruiseSpeed,

    #[serde(default)]
    pub tank_capacity_overrides: HashMap<CategoryId, f64>,

    #[serde(default)]
    pub manual_consumption_overrides: HashMap<CategoryId, f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountrySection {
    pub country: String,
    pub boundary: String,
    pub record: PriceRecord,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataSection {
    pub categories: Vec<CategoryInfo>,
    pub statistics: Vec<StatisticsSet>,
    pub official: Vec<OfficialRecord>,
    pub vehicles: Vec<VehicleRecord>,
    pub countries: Vec<CountrySection>,
    pub general: Option<PriceRecord>,
}

impl RequestBundle {
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        serde_json::from_str(json).map_err(|error| InputError::InvalidBundle(error.to_string()))
    }

    /// Parses the geometries of the bundle.
    pub fn into_parts(self) -> Result<(RouteRequest, Dataset), InputError> {
        let RequestSection {
            route,
            selection,
            fuel_type,
            speed,
            tank_capacity_overrides,
            manual_consumption_overrides,
        } = self.request;

        let request = RouteRequest {
            route: parse_route(&route)?,
            selection,
            fuel_type,
            speed,
            tank_capacity_overrides,
            manual_consumption_overrides,
        };

        let countries = self
            .data
            .countries
            .into_iter()
            .map(|section| {
                let boundary = parse_boundary(&section.boundary)?;
                Ok(CountryPriceRecord::new(section.country, boundary, section.record))
            })
            .collect::<Result<Vec<_>, InputError>>()?;

        debug!(
            "Read bundle of {} categories, {} vehicles and {} countries",
            self.data.categories.len(),
            self.data.vehicles.len(),
            countries.len()
        );

        let dataset = Dataset {
            categories: self.data.categories,
            statistics: self.data.statistics,
            official: self.data.official,
            vehicles: self.data.vehicles,
            countries,
            general: self.data.general,
        };

        Ok((request, dataset))
    }
}

pub fn parse_route(wkt: &str) -> Result<LineString<f64>, InputError> {
    LineString::try_from_wkt_str(wkt).map_err(|error| InputError::InvalidGeometry(error.to_string()))
}

/// Parses a `POLYGON` or `MULTIPOLYGON`.
pub fn parse_boundary(wkt: &str) -> Result<MultiPolygon<f64>, InputError> {
    let geometry = Geometry::<f64>::try_from_wkt_str(wkt)
        .map_err(|error| InputError::InvalidGeometry(error.to_string()))?;

    match geometry {
        Geometry::Polygon(polygon) => Ok(polygon.into()),
        Geometry::MultiPolygon(polygons) => Ok(polygons),
        _ => Err(InputError::InvalidGeometry(format!(
            "expected a polygon boundary, found {wkt}"
        ))),
    }
}
