#![doc = include_str!("../README.md")]

pub mod aggregate;
pub mod bundle;
pub mod config;
pub mod cost;
pub mod error;
pub mod ident;
pub mod model;
pub mod price;
pub mod util;

pub use aggregate::{compute_route, RouteRequest, RouteResult};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use ident::{CategoryId, VehicleId};
