#[doc(hidden)]
pub mod err;
pub mod round;
#[cfg(feature = "tracing")]
pub mod trace;
