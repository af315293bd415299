/// Converts errors from their error type (of the error class) to that of
/// a fuelroute::Error variant.
///
/// ```rust,ignore
/// use fuelroute::error::InputError;
/// fuelroute::impl_err!(InputError, Input);
/// ```
pub mod err_macro {
    #[macro_export]
    macro_rules! impl_err {
        ($from:ty, $variant:ident) => {
            impl From<$from> for $crate::Error {
                fn from(value: $from) -> Self {
                    $crate::Error::$variant(value)
                }
            }
        };
    }

    pub use impl_err;
}
