/// Rounds a value to a fixed number of decimal places, rounding half
/// away from zero. Non-finite values collapse to zero.
///
/// ```rust
/// use fuelroute::util::round::round_to;
///
/// assert_eq!(round_to(5.88235, 3), 5.882);
/// assert_eq!(round_to(f64::NAN, 3), 0.0);
/// ```
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }

    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Liters are reported to the milliliter.
pub const LITER_DECIMALS: i32 = 3;

/// Gram quantities on aggregated results.
pub const GRAM_DECIMALS: i32 = 6;

/// Monetary values are reported to the cent.
pub const MONEY_DECIMALS: i32 = 2;
