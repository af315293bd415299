use crate::cost::OfficialFigures;
use crate::ident::{CategoryId, VehicleId};
use crate::model::{FuelType, PhenomenonRecord};
use crate::price::{CountryPriceRecord, PriceRecord};
use geo::{Intersects, LineString};
use serde::{Deserialize, Serialize};

/// A concrete vehicle, and the official figures measured for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub id: VehicleId,
    pub category: CategoryId,
    pub display_name: String,
    pub fuel_type: FuelType,

    #[serde(default)]
    pub official: Option<OfficialFigures>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub id: CategoryId,
    pub display_name: String,

    /// Tank capacity in liters, if known for the category.
    #[serde(default)]
    pub default_tank_capacity: Option<f64>,
}

/// Speed statistics and official figures, per category.
pub trait StatisticsProvider: Sync {
    /// The statistics records stored for the category and fuel type.
    fn phenomenon_records(&self, category: &CategoryId, fuel_type: FuelType) -> &[PhenomenonRecord];

    fn official_figures(&self, category: &CategoryId, fuel_type: FuelType) -> Vec<&OfficialFigures>;

    fn vehicle(&self, id: &VehicleId) -> Option<&VehicleRecord>;
}

/// Fuel prices, by country and in general.
pub trait PriceProvider: Sync {
    /// The country records whose boundary intersects the route.
    fn country_prices(&self, route: &LineString<f64>) -> Vec<&CountryPriceRecord>;

    fn general_price(&self) -> Option<&PriceRecord>;
}

pub trait CategoryProvider: Sync {
    fn category(&self, id: &CategoryId) -> Option<&CategoryInfo>;
}

/// The statistics records of a category, as stored for one fuel type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSet {
    pub category: CategoryId,
    pub fuel_type: FuelType,
    pub records: Vec<PhenomenonRecord>,
}

/// Official figures of a category, for one fuel type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficialRecord {
    pub category: CategoryId,
    pub fuel_type: FuelType,

    #[serde(flatten)]
    pub figures: OfficialFigures,
}

/// An in-memory provider of every input the engine consumes.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub categories: Vec<CategoryInfo>,
    pub statistics: Vec<StatisticsSet>,
    pub official: Vec<OfficialRecord>,
    pub vehicles: Vec<VehicleRecord>,
    pub countries: Vec<CountryPriceRecord>,
    pub general: Option<PriceRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: CategoryInfo) -> Self {
        self.categories.push(category);
        self
    }

    pub fn with_statistics(
        mut self,
        category: impl Into<CategoryId>,
        fuel_type: FuelType,
        records: Vec<PhenomenonRecord>,
    ) -> Self {
        self.statistics.push(StatisticsSet {
            category: category.into(),
            fuel_type,
            records,
        });
        self
    }

    pub fn with_official(
        mut self,
        category: impl Into<CategoryId>,
        fuel_type: FuelType,
        figures: OfficialFigures,
    ) -> Self {
        self.official.push(OfficialRecord {
            category: category.into(),
            fuel_type,
            figures,
        });
        self
    }

    pub fn with_vehicle(mut self, vehicle: VehicleRecord) -> Self {
        self.vehicles.push(vehicle);
        self
    }

    pub fn with_country(mut self, country: CountryPriceRecord) -> Self {
        self.countries.push(country);
        self
    }

    pub fn with_general(mut self, general: PriceRecord) -> Self {
        self.general = Some(general);
        self
    }
}

impl StatisticsProvider for Dataset {
    fn phenomenon_records(&self, category: &CategoryId, fuel_type: FuelType) -> &[PhenomenonRecord] {
        self.statistics
            .iter()
            .find(|set| &set.category == category && set.fuel_type == fuel_type)
            .map(|set| set.records.as_slice())
            .unwrap_or_default()
    }

    fn official_figures(&self, category: &CategoryId, fuel_type: FuelType) -> Vec<&OfficialFigures> {
        self.official
            .iter()
            .filter(|record| &record.category == category && record.fuel_type == fuel_type)
            .map(|record| &record.figures)
            .collect()
    }

    fn vehicle(&self, id: &VehicleId) -> Option<&VehicleRecord> {
        self.vehicles.iter().find(|vehicle| &vehicle.id == id)
    }
}

impl PriceProvider for Dataset {
    fn country_prices(&self, route: &LineString<f64>) -> Vec<&CountryPriceRecord> {
        self.countries
            .iter()
            .filter(|country| country.boundary.intersects(route))
            .collect()
    }

    fn general_price(&self) -> Option<&PriceRecord> {
        self.general.as_ref()
    }
}

impl CategoryProvider for Dataset {
    fn category(&self, id: &CategoryId) -> Option<&CategoryInfo> {
        self.categories.iter().find(|category| &category.id == id)
    }
}
