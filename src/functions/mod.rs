//! Real functions evaluated at arbitrary precision.

mod builtins;
mod elementary;

use malachite::Rational;

use crate::utils::rational::{from_f64, to_f64};
use crate::utils::Precision;

pub use builtins::Builtin;
pub use elementary::{cos, exp, expm1, log1p, sin, sqrt};

/// A real function that can be evaluated on exact rationals.
pub trait Function {
    /// Evaluates the function at `x`, rounding the result to `prec`.
    fn eval(&self, x: &Rational, prec: Precision) -> Rational;
}

impl<F> Function for F
where
    F: Fn(&Rational) -> Rational,
{
    fn eval(&self, x: &Rational, prec: Precision) -> Rational {
        prec.round(self(x))
    }
}

/// A binary64 function lifted to rationals.
///
/// The argument is rounded to the nearest binary64 value before evaluation,
/// so the result is at best accurate to binary64 precision.
///
/// # Panics
///
/// Evaluation panics if the wrapped function returns a non-finite value.
#[derive(Clone, Copy, Debug)]
pub struct Binary64<F>(pub F);

impl<F> Function for Binary64<F>
where
    F: Fn(f64) -> f64,
{
    fn eval(&self, x: &Rational, prec: Precision) -> Rational {
        let y = (self.0)(to_f64(x));

        let Some(y) = from_f64(y) else {
            panic!("non-finite function value {y} at {}", to_f64(x));
        };

        prec.round(y)
    }
}

#[cfg(test)]
mod tests {
    use malachite::num::basic::traits::One;

    use super::*;

    #[test]
    fn closures_are_rounded() {
        let third = |x: &Rational| x / Rational::from(3u32);
        let y = third.eval(&Rational::ONE, Precision::new(8));

        assert_eq!(y, Rational::from_unsigneds(171u32, 512u32));
    }

    #[test]
    fn binary64_adaptor() {
        let f = Binary64(f64::sqrt);
        let y = f.eval(&Rational::from(2u32), Precision::new(200));

        assert_eq!(to_f64(&y), std::f64::consts::SQRT_2);
    }
}
