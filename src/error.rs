use crate::ident::{CategoryId, VehicleId};
use crate::impl_err;
use crate::model::{FuelType, Phenomenon};
use thiserror::Error;

/// Structural problems with a request or its inputs.
///
/// These fail the whole request and are surfaced to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("statistics for {category} mix fuel types {first} and {second}")]
    MixedFuelTypes {
        category: CategoryId,
        first: FuelType,
        second: FuelType,
    },

    #[error("unknown phenomenon {0:?}")]
    UnknownPhenomenon(String),

    #[error("tank capacity must be positive, given {0}")]
    InvalidTankCapacity(f64),

    #[error("manual consumption must be a non-negative number of liters per 100km, given {0}")]
    InvalidManualConsumption(f64),

    #[error("price record unit quantity must be positive, given {0}")]
    InvalidUnitQuantity(f64),

    #[error("route geometry is empty")]
    EmptyRoute,

    #[error("no general price record is available")]
    MissingGeneralPrice,

    #[error("could not parse geometry: {0}")]
    InvalidGeometry(String),

    #[error("could not read request bundle: {0}")]
    InvalidBundle(String),

    #[error("invalid configuration value for {key}: {value:?}")]
    InvalidConfig { key: String, value: String },
}

/// A single category or vehicle lacks the data required to build
/// an estimate. Recovered locally by the aggregator, which replaces
/// the category's result with a placeholder.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InsufficientDataError {
    #[error("no statistics recorded for {0} ({1})")]
    MissingStatistics(CategoryId, FuelType),

    #[error("phenomenon {0} was not recorded")]
    MissingPhenomenon(Phenomenon),

    #[error("phenomenon {0} has fewer than three samples")]
    NotEnoughSamples(Phenomenon),

    #[error("phenomenon {0} carries a non-finite or negative sample")]
    InvalidSample(Phenomenon),

    #[error("unknown category {0}")]
    UnknownCategory(CategoryId),

    #[error("unknown vehicle {0}")]
    UnknownVehicle(VehicleId),

    #[error("vehicle {0} runs on {1}, not the requested fuel type")]
    FuelTypeMismatch(VehicleId, FuelType),

    #[error("no vehicle of {0} could be estimated")]
    NoUsableVehicle(CategoryId),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Input(InputError),

    #[error(transparent)]
    InsufficientData(InsufficientDataError),
}

impl Error {
    /// Insufficient data is recovered per category, everything
    /// else fails the request.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::InsufficientData(_))
    }
}

impl_err!(InputError, Input);
impl_err!(InsufficientDataError, InsufficientData);

pub type Result<T> = std::result::Result<T, Error>;
