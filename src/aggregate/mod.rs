//! Per-category route estimation.
//!
//! [`compute_route`] segments the route into price zones once, then
//! estimates every requested category independently (in parallel),
//! each from the first of:
//!
//! 1. A manual consumption override of the request.
//! 2. The category's official figures, projected to the cruise speed
//!    through its speed statistics.
//! 3. The category's speed statistics alone.
//!
//! In vehicle mode, each vehicle is estimated from its own official
//! figures, and the vehicles of a category are blended into a single
//! [`CategoryEstimate`]. A category which cannot be estimated yields a
//! [`CategoryRouteResult::InsufficientData`] placeholder rather than
//! failing the request.
#[doc(hidden)]
pub mod compute;
#[doc(hidden)]
pub mod provider;
#[doc(hidden)]
pub mod request;
#[doc(hidden)]
pub mod result;

#[doc(hidden)]
#[cfg(test)]
mod test;

#[doc(inline)]
pub use compute::*;
#[doc(inline)]
pub use provider::*;
#[doc(inline)]
pub use request::*;
#[doc(inline)]
pub use result::*;
