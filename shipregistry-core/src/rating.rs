//! Derived ship rating.

use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};

use crate::validation::MAX_PROD_YEAR;

/// Decimal places kept in a rating.
pub const RATING_SCALE: i64 = 2;

/// Compute the rating for a ship.
///
/// `round((80 * speed * k) / (3019 - year + 1), 2)` with half-up rounding,
/// where `k` is 0.5 for used ships and 1.0 otherwise. The year must already be
/// validated; a year past 3019 would divide by zero or flip the sign.
pub fn compute_rating(speed: f64, is_used: bool, production_year: i32) -> f64 {
    let k = if is_used { 0.5 } else { 1.0 };
    let age = f64::from(MAX_PROD_YEAR - production_year + 1);
    round_half_up((80.0 * speed * k) / age, RATING_SCALE)
}

/// Round to `scale` decimal places, ties away from zero.
///
/// Rounds the shortest decimal representation of `value` rather than its
/// binary expansion, so `1.005` becomes `1.01`. Non-finite values pass through.
pub fn round_half_up(value: f64, scale: i64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let Ok(decimal) = BigDecimal::from_str(&value.to_string()) else {
        return value;
    };
    decimal
        .with_scale_round(scale, RoundingMode::HalfUp)
        .to_string()
        .parse()
        .unwrap_or(value)
}
