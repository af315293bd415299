//! The per-vehicle-class consumption and emission model.
//!
//! Statistics arrive as three aggregate landmarks (minimum, mean and
//! maximum) per [`Phenomenon`]. A [`ConsumptionModel`] pairs the speed
//! landmarks with the consumption and CO2 landmarks, and fits a
//! quadratic [`Interpolant`] through each, which then answers:
//!
//! - What is consumed, per hour and per kilometer, at a cruise speed?
//!   See [`ConsumptionModel::consumption_at`].
//! - By which fraction does consumption change between two speeds?
//!   See [`ConsumptionModel::growth_factor`].
//!
//! The implied grams of CO2 per liter are capped at the physical limit
//! of the fuel type, see [`GASOLINE_CO2_PER_LITER`] and [`DIESEL_CO2_PER_LITER`].
#[doc(hidden)]
pub mod consumption;
#[doc(hidden)]
pub mod interpolate;
#[doc(hidden)]
pub mod phenomenon;
#[doc(hidden)]
pub mod result;
#[doc(hidden)]
pub mod sample;
#[doc(hidden)]
pub mod statistics;


#[doc(inline)]
pub use consumption::*;
#[doc(inline)]
pub use interpolate::*;
#[doc(inline)]
pub use phenomenon::*;
#[doc(inline)]
pub use result::*;
#[doc(inline)]
pub use sample::*;
#[doc(inline)]
pub use statistics::*;
