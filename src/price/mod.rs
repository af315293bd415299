//! Partitions a route into price zones by political boundary.
//!
//! A [`PriceZoneSegmenter`] is given the country price records whose
//! boundaries intersect the route, and a general (continent-wide)
//! fallback record. Its output is an ordered list of [`RoutePriceZone`]s
//! which together cover the route exactly once.
#[doc(hidden)]
pub mod record;
#[doc(hidden)]
pub mod segment;
#[doc(hidden)]
pub mod zone;


#[doc(inline)]
pub use record::*;
#[doc(inline)]
pub use segment::*;
#[doc(inline)]
pub use zone::*;
