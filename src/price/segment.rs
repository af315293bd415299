use crate::error::InputError;
use crate::price::{CountryPriceRecord, PriceRecord, PriceScope, RoutePriceZone};
use geo::{BooleanOps, Coord, Distance, Haversine, Line, LineString, MultiLineString};
use log::debug;
use measure_time::debug_time;
#[cfg(feature = "tracing")]
use tracing::Level;

/// Pieces shorter than this (in meters) are artefacts of clipping
/// along a boundary, and are dropped.
const MIN_ZONE_LENGTH: f64 = 1e-6;

/// Route positions closer than this are considered joined.
const JOIN_TOLERANCE: f64 = 1e-9;

/// Splits a route into ordered [`RoutePriceZone`]s.
///
/// Countries are applied most recent price first (ties keep the order
/// in which they were matched). Each country claims the part of the
/// remaining route inside its boundary, and whatever no country claims
/// falls to the general price record.
///
/// ```rust
/// use chrono::NaiveDate;
/// use fuelroute::price::{FuelPrice, PriceRecord, PriceScope, PriceZoneSegmenter};
/// use geo::wkt;
///
/// let general = PriceRecord {
///     effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     gasoline: FuelPrice::new(800.0, 1750.0, 1000.0),
///     diesel: FuelPrice::new(850.0, 1650.0, 1000.0),
/// };
///
/// let segmenter = PriceZoneSegmenter::new(std::iter::empty(), &general).unwrap();
/// let zones = segmenter.segment(&wkt! { LINESTRING (20.0 40.0, 21.0 40.5) }).unwrap();
///
/// assert_eq!(zones.len(), 1);
/// assert_eq!(zones[0].scope, PriceScope::General);
/// ```
#[derive(Debug)]
pub struct PriceZoneSegmenter<'a> {
    countries: Vec<&'a CountryPriceRecord>,
    general: &'a PriceRecord,
}

impl<'a> PriceZoneSegmenter<'a> {
    pub fn new(
        countries: impl IntoIterator<Item = &'a CountryPriceRecord>,
        general: &'a PriceRecord,
    ) -> Result<Self, InputError> {
        general.validate()?;

        let mut countries = countries.into_iter().collect::<Vec<_>>();
        for country in &countries {
            country.record.validate()?;
        }

        // Stable, so equal dates keep their matching order.
        countries.sort_by(|a, b| b.record.effective_date.cmp(&a.record.effective_date));

        Ok(Self { countries, general })
    }

    /// Decomposes `route` into zones following the route's own
    /// coordinate order. The zone lengths sum to the route length.
    ///
    /// Each segment of the route is clipped on its own, and every piece
    /// is placed by its fraction along that segment. A route which
    /// doubles back over a border therefore keeps its order of travel.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = Level::DEBUG, skip_all))]
    pub fn segment(&self, route: &LineString<f64>) -> Result<Vec<RoutePriceZone>, InputError> {
        if route.0.len() < 2 {
            return Err(InputError::EmptyRoute);
        }

        debug_time!("Segmenting route of {} coordinates", route.0.len());

        let lines = route
            .lines()
            .map(|line| (line, Haversine.distance(line.start_point(), line.end_point())))
            .filter(|(_, length)| *length > 0.0)
            .collect::<Vec<_>>();

        if lines.is_empty() {
            return Ok(vec![RoutePriceZone::new(
                route.clone(),
                PriceScope::General,
                *self.general,
            )]);
        }

        let zones = lines
            .into_iter()
            .enumerate()
            .flat_map(|(index, (line, length))| self.split(index, line, length))
            .collect::<Vec<_>>();

        Ok(join(zones))
    }

    /// Splits one segment of the route into zones ordered along it.
    fn split(&self, index: usize, line: Line<f64>, length: f64) -> Vec<RoutePriceZone> {
        let whole = MultiLineString::new(vec![LineString::from(line)]);
        let (mut pieces, remaining) =
            self.countries
                .iter()
                .fold((vec![], whole), |(mut pieces, remaining), country| {
                    if remaining.0.is_empty() {
                        return (pieces, remaining);
                    }

                    let covered = country.boundary.clip(&remaining, false);
                    let rest = country.boundary.clip(&remaining, true);

                    debug!(
                        "Country {} covers {} pieces of segment {index}",
                        country.country,
                        covered.0.len()
                    );

                    pieces.extend(covered.iter().map(|piece| Piece {
                        span: span(&line, piece),
                        scope: PriceScope::Country(country.country.clone()),
                        record: country.record,
                    }));

                    (pieces, rest)
                });

        pieces.extend(remaining.iter().map(|piece| Piece {
            span: span(&line, piece),
            scope: PriceScope::General,
            record: *self.general,
        }));

        pieces.sort_by(|a, b| a.span.0.total_cmp(&b.span.0));

        let extent = |piece: &Piece| piece.span.1 - piece.span.0;
        let mut kept = pieces
            .iter()
            .filter(|piece| extent(piece) * length > MIN_ZONE_LENGTH)
            .cloned()
            .collect::<Vec<_>>();

        if kept.is_empty() {
            kept = pieces
                .into_iter()
                .max_by(|a, b| extent(a).total_cmp(&extent(b)))
                .into_iter()
                .collect();
        }

        if kept.is_empty() {
            kept.push(Piece {
                span: (0.0, 1.0),
                scope: PriceScope::General,
                record: *self.general,
            });
        }

        // Pieces tile the segment end to end.
        let count = kept.len();
        kept.into_iter()
            .enumerate()
            .scan(0.0, |cursor, (i, piece)| {
                let from = *cursor;
                let to = match i + 1 == count {
                    true => 1.0,
                    false => piece.span.1.clamp(from, 1.0),
                };
                *cursor = to;

                Some(RoutePriceZone::spanning(
                    LineString::new(vec![along(&line, from), along(&line, to)]),
                    piece.scope,
                    piece.record,
                    (to - from) * length,
                    (index as f64 + from, index as f64 + to),
                ))
            })
            .collect()
    }
}

/// A clipped piece of one route segment, spanning the given fractions.
#[derive(Debug, Clone)]
struct Piece {
    span: (f64, f64),
    scope: PriceScope,
    record: PriceRecord,
}

/// Fraction along `line` of the projection of `coord`, within `[0, 1]`.
fn fraction(line: &Line<f64>, coord: &Coord<f64>) -> f64 {
    let delta = line.delta();
    let squared = delta.x * delta.x + delta.y * delta.y;
    if squared <= 0.0 {
        return 0.0;
    }

    let offset = *coord - line.start;
    ((offset.x * delta.x + offset.y * delta.y) / squared).clamp(0.0, 1.0)
}

fn span(line: &Line<f64>, piece: &LineString<f64>) -> (f64, f64) {
    piece
        .coords()
        .map(|coord| fraction(line, coord))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), t| {
            (low.min(t), high.max(t))
        })
}

fn along(line: &Line<f64>, fraction: f64) -> Coord<f64> {
    match fraction {
        f if f <= 0.0 => line.start,
        f if f >= 1.0 => line.end,
        f => line.start + line.delta() * f,
    }
}

/// Joins consecutive zones of the same price record which meet along
/// the route.
fn join(zones: Vec<RoutePriceZone>) -> Vec<RoutePriceZone> {
    zones.into_iter().fold(vec![], |mut joined, zone| {
        let touches = |previous: &RoutePriceZone| {
            previous.scope == zone.scope
                && previous.record == zone.record
                && (zone.position() - previous.end()).abs() < JOIN_TOLERANCE
        };

        match joined.pop() {
            Some(previous) if touches(&previous) => {
                let position = (previous.position(), zone.end());
                let length = previous.length() + zone.length();
                let mut coords = previous.segment.0;
                coords.extend(zone.segment.0.into_iter().skip(1));

                joined.push(RoutePriceZone::spanning(
                    LineString::new(coords),
                    zone.scope,
                    zone.record,
                    length,
                    position,
                ));
            }
            Some(previous) => {
                joined.push(previous);
                joined.push(zone);
            }
            None => joined.push(zone),
        }

        joined
    })
}
