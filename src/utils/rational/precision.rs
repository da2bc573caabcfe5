//! Working precision.

use std::fmt;

use malachite::num::basic::traits::Zero;
use malachite::rounding_modes::RoundingMode;
use malachite::Rational;

use super::RoundBinary;

/// A number of significant bits to which intermediate results are rounded.
///
/// Precision is passed explicitly to every operation that rounds; nothing in
/// the crate keeps a global working precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Precision {
    bits: u64,
}

impl Precision {
    pub const fn new(bits: u64) -> Precision {
        assert!(bits > 0, "precision must be positive");

        Precision { bits }
    }

    pub const fn bits(self) -> u64 {
        self.bits
    }

    /// Returns this precision extended by `guard` bits.
    pub const fn guarded(self, guard: u64) -> Precision {
        Precision {
            bits: self.bits + guard,
        }
    }

    /// Rounds `x` to the nearest value with at most `self.bits()` significant
    /// bits.
    pub fn round(self, x: Rational) -> Rational {
        if x == Rational::ZERO {
            return x;
        }

        let position = x.floor_log_base_2_abs() + 1 - self.exponent();

        x.round(position, RoundingMode::Nearest)
    }

    /// Rounds a borrowed value, see [`Precision::round`].
    pub fn round_ref(self, x: &Rational) -> Rational {
        if *x == Rational::ZERO {
            return Rational::ZERO;
        }

        let position = x.floor_log_base_2_abs() + 1 - self.exponent();

        x.round(position, RoundingMode::Nearest)
    }

    fn exponent(self) -> i64 {
        i64::try_from(self.bits).unwrap_or(i64::MAX)
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} bits", self.bits)
    }
}

#[cfg(test)]
mod tests {
    use malachite::num::conversion::traits::FromSciString;

    use super::*;

    #[test]
    fn rounds_to_significant_bits() {
        let p = Precision::new(4);

        // 0.1 = 0.000110011..b, so four significant bits give 0.1101b * 2^-3
        assert_eq!(
            p.round(Rational::from_sci_string("0.1").unwrap()),
            Rational::from_unsigneds(13u32, 128u32)
        );
        assert_eq!(
            p.round(Rational::from_signeds(-101i32, 1i32)),
            Rational::from_signeds(-104i32, 1i32)
        );
        assert_eq!(p.round(Rational::ZERO), Rational::ZERO);
    }

    #[test]
    fn exact_values_unchanged() {
        let p = Precision::new(53);
        let x = Rational::from_signeds(-3i32, 1024i32);

        assert_eq!(p.round_ref(&x), x);
    }

    #[test]
    fn guard_bits() {
        let p = Precision::new(64).guarded(16);

        assert_eq!(p.bits(), 80);
        assert_eq!(p.to_string(), "80 bits");
    }
}
