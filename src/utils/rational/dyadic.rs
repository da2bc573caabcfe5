//! Dyadic decomposition.

use std::cmp::Ordering;

use malachite::num::arithmetic::traits::{IsPowerOf2, PowerOf2, Sign};
use malachite::num::basic::traits::Zero;
use malachite::num::conversion::traits::ExactFrom;
use malachite::num::logic::traits::SignificantBits;
use malachite::{Integer, Rational};

use super::Precision;

/// A dyadic rational `significand * 2^exponent`.
///
/// Nonzero values are normalized to an odd significand. Zero is represented
/// with a zero significand and exponent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dyadic {
    pub significand: Integer,
    pub exponent: i64,
}

impl Dyadic {
    pub const ZERO: Dyadic = Dyadic {
        significand: Integer::ZERO,
        exponent: 0,
    };

    /// Decomposes `x`, returning `None` if its denominator is not a power of
    /// two.
    pub fn decompose(x: &Rational) -> Option<Dyadic> {
        if x.denominator_ref().is_power_of_2() {
            Some(Dyadic::from_dyadic(x))
        } else {
            None
        }
    }

    /// Rounds `x` to `prec` significant bits and decomposes the result.
    pub fn round(x: &Rational, prec: Precision) -> Dyadic {
        Dyadic::from_dyadic(&prec.round_ref(x))
    }

    fn from_dyadic(x: &Rational) -> Dyadic {
        let numerator = x.numerator_ref();
        let denominator = x.denominator_ref();

        debug_assert!(denominator.is_power_of_2());

        let Some(zeros) = numerator.trailing_zeros() else {
            return Dyadic::ZERO;
        };

        let magnitude = Integer::from(numerator >> zeros);
        let exponent = i64::exact_from(zeros)
            - i64::exact_from(denominator.significant_bits() - 1);

        let significand = if x.sign() == Ordering::Less {
            -magnitude
        } else {
            magnitude
        };

        Dyadic {
            significand,
            exponent,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.significand == Integer::ZERO
    }

    /// The integer `self * 2^-base`, given `base <= self.exponent`.
    pub fn scaled(&self, base: i64) -> Integer {
        debug_assert!(self.is_zero() || base <= self.exponent);

        &self.significand << u64::exact_from(self.exponent - base)
    }

    pub fn to_rational(&self) -> Rational {
        Rational::from(&self.significand) * Rational::power_of_2(self.exponent)
    }
}
