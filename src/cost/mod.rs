//! Zone-by-zone consumption and cost accrual.
//!
//! A [`ConsumptionEstimate`] fixes the per-kilometer consumption of a
//! vehicle (or category) at the requested cruise speed, in one of the
//! [`CalculationMode`]s. The [`ZoneCostAccumulator`] then walks the
//! route's price zones in order, buying fuel in whole tanks and
//! charging it at the price of the zone it was bought in.
#[doc(hidden)]
pub mod accumulator;
#[doc(hidden)]
pub mod estimate;

#[doc(hidden)]
#[cfg(test)]
mod test;

#[doc(inline)]
pub use accumulator::*;
#[doc(inline)]
pub use estimate::*;
