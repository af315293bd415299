use crate::model::FuelType;
use crate::price::{FuelPrice, PriceRecord, PriceScope};
use chrono::NaiveDate;
use geo::{Distance, Haversine, LineString};

/// Returns the length of the line in meters, calculated by the
/// cumulative haversine distance between each coordinate.
pub fn line_length(line: &LineString<f64>) -> f64 {
    line.lines().fold(0.0, |length, segment| {
        length + Haversine.distance(segment.start_point(), segment.end_point())
    })
}

/// A contiguous part of a route priced under one fuel-price record.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePriceZone {
    pub segment: LineString<f64>,
    pub scope: PriceScope,
    pub record: PriceRecord,

    /// Ground length, in meters.
    length: f64,

    /// Where the zone begins and ends along the segmented route, as the
    /// index of a route segment plus the fraction within that segment.
    position: f64,
    end: f64,
}

impl RoutePriceZone {
    pub fn new(segment: LineString<f64>, scope: PriceScope, record: PriceRecord) -> Self {
        let length = line_length(&segment);

        Self {
            segment,
            scope,
            record,
            length,
            position: 0.0,
            end: 0.0,
        }
    }

    /// A zone whose length was measured along the route it was cut from.
    pub(crate) fn spanning(
        segment: LineString<f64>,
        scope: PriceScope,
        record: PriceRecord,
        length: f64,
        (position, end): (f64, f64),
    ) -> Self {
        Self {
            segment,
            scope,
            record,
            length,
            position,
            end,
        }
    }

    /// Ground length of the zone, in meters.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    pub fn end(&self) -> f64 {
        self.end
    }

    #[inline]
    pub fn price(&self, fuel_type: FuelType) -> &FuelPrice {
        self.record.price(fuel_type)
    }

    #[inline]
    pub fn price_date(&self) -> NaiveDate {
        self.record.effective_date
    }
}
