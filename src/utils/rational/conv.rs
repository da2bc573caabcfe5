//! Conversions between rationals and binary64.

use malachite::num::conversion::traits::RoundingFrom;
use malachite::rounding_modes::RoundingMode;
use malachite::Rational;

/// Rounds `x` to the nearest binary64 value.
pub fn to_f64(x: &Rational) -> f64 {
    f64::rounding_from(x, RoundingMode::Nearest).0
}

/// The exact value of `x`, or `None` if `x` is not finite.
pub fn from_f64(x: f64) -> Option<Rational> {
    Rational::try_from(x).ok()
}

/// The exact value of `x`.
///
/// # Panics
///
/// Panics if `x` is not finite.
pub fn from_finite(x: f64) -> Rational {
    match from_f64(x) {
        Some(value) => value,
        None => panic!("expected a finite value, found {x}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary64_round_trip() {
        let x = from_f64(0.1).unwrap();

        assert_ne!(x, Rational::from_unsigneds(1u32, 10u32));
        assert_eq!(to_f64(&x), 0.1);
        assert_eq!(from_f64(f64::NAN), None);
    }
}
