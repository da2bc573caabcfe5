//! Elementary functions on rationals.
//!
//! Arguments are rounded to binary floating-point values with guard bits and
//! evaluated with the correctly rounded operations of `astro_float`. Results
//! are converted back exactly and then rounded to the requested precision.
//!
//! # Panics
//!
//! Every function panics if an argument or result does not fit the exponent
//! range of `astro_float`, or if its constant cache cannot be allocated.

use astro_float::{BigFloat, Consts, Exponent, RoundingMode, Sign, Word};
use malachite::num::arithmetic::traits::{PowerOf2, UnsignedAbs};
use malachite::num::basic::traits::{One, Zero};
use malachite::num::logic::traits::SignificantBits;
use malachite::{Integer, Natural, Rational};

use crate::utils::rational::{to_f64, Dyadic};
use crate::utils::Precision;

const GUARD: u64 = 32;

const RM: RoundingMode = RoundingMode::ToEven;

/// Computes `e^x`.
pub fn exp(x: &Rational, prec: Precision) -> Rational {
    let work = prec.guarded(GUARD + magnitude(x));
    let y = to_big(x, work).exp(bits(work), RM, &mut consts());

    prec.round(to_rational(&y))
}

/// Computes `e^x - 1` without cancellation near zero.
pub fn expm1(x: &Rational, prec: Precision) -> Rational {
    if *x == Rational::ZERO {
        return Rational::ZERO;
    }

    let work = prec.guarded(GUARD + magnitude(x) + cancellation(x));
    let y = to_big(x, work).exp(bits(work), RM, &mut consts());

    prec.round(to_rational(&y) - Rational::ONE)
}

/// Computes `sin(x)`.
pub fn sin(x: &Rational, prec: Precision) -> Rational {
    let work = prec.guarded(GUARD + magnitude(x));
    let y = to_big(x, work).sin(bits(work), RM, &mut consts());

    prec.round(to_rational(&y))
}

/// Computes `cos(x)`.
pub fn cos(x: &Rational, prec: Precision) -> Rational {
    let work = prec.guarded(GUARD + magnitude(x));
    let y = to_big(x, work).cos(bits(work), RM, &mut consts());

    prec.round(to_rational(&y))
}

/// Computes `ln(1 + x)`.
///
/// # Panics
///
/// Panics if `x <= -1`.
pub fn log1p(x: &Rational, prec: Precision) -> Rational {
    assert!(*x > Rational::from(-1), "log1p is undefined at {}", to_f64(x));

    if *x == Rational::ZERO {
        return Rational::ZERO;
    }

    // ln(u) is close to x for u = 1 + x near one, so u must carry the bits
    // of x below the unit.
    let work = prec.guarded(GUARD + cancellation(x));
    let u = to_big(&(Rational::ONE + x), work);

    prec.round(to_rational(&u.ln(bits(work), RM, &mut consts())))
}

/// Computes `sqrt(x)`.
///
/// # Panics
///
/// Panics if `x` is negative.
pub fn sqrt(x: &Rational, prec: Precision) -> Rational {
    assert!(*x >= Rational::ZERO, "sqrt is undefined at {}", to_f64(x));

    let work = prec.guarded(GUARD);
    let y = to_big(x, work).sqrt(bits(work), RM);

    prec.round(to_rational(&y))
}

/// Bits lost when a result close to zero is obtained from a value close to
/// one.
fn cancellation(x: &Rational) -> u64 {
    if *x == Rational::ZERO {
        return 0;
    }

    u64::try_from(-x.floor_log_base_2_abs()).unwrap_or(0)
}

/// Bits of the integer part of `x`, which rounding the argument costs.
fn magnitude(x: &Rational) -> u64 {
    if *x == Rational::ZERO {
        return 0;
    }

    u64::try_from(x.floor_log_base_2_abs() + 1).unwrap_or(0)
}

fn bits(prec: Precision) -> usize {
    usize::try_from(prec.bits()).unwrap_or(usize::MAX)
}

fn consts() -> Consts {
    match Consts::new() {
        Ok(cc) => cc,
        Err(err) => panic!("cannot allocate constant cache: {err:?}"),
    }
}

/// Rounds `x` to `prec` significant bits as a `BigFloat`.
fn to_big(x: &Rational, prec: Precision) -> BigFloat {
    let Dyadic {
        significand,
        exponent,
    } = Dyadic::round(x, prec);

    if significand == Integer::ZERO {
        return BigFloat::from_word(0, bits(prec));
    }

    let word = u64::from(Word::BITS);

    // Mantissas are normalized with the top bit of the top word set and
    // represent values in [1/2, 1).
    let mantissa = (&significand).unsigned_abs();
    let len = mantissa.significant_bits();
    let width = len.div_ceil(word) * word;

    let words: Vec<Word> = (mantissa << (width - len))
        .to_limbs_asc()
        .into_iter()
        .map(Word::from)
        .collect();

    let sign = if significand < Integer::ZERO {
        Sign::Neg
    } else {
        Sign::Pos
    };
    let e = match Exponent::try_from(exponent + signed(len)) {
        Ok(e) => e,
        Err(_) => panic!("{} is out of range", to_f64(x)),
    };

    BigFloat::from_raw_parts(&words, bits_of(width), sign, e, false)
}

/// The exact value of a finite `BigFloat`.
fn to_rational(y: &BigFloat) -> Rational {
    if y.is_zero() {
        return Rational::ZERO;
    }

    let Some((words, _, sign, e, _)) = y.as_raw_parts() else {
        panic!("expected a finite result, found {y}");
    };

    let width = signed(words.len() as u64) * i64::from(Word::BITS);
    let value = Rational::from(Natural::from_limbs_asc(words))
        * Rational::power_of_2(i64::from(e) - width);

    match sign {
        Sign::Neg => -value,
        Sign::Pos => value,
    }
}

fn bits_of(width: u64) -> usize {
    usize::try_from(width).unwrap_or(usize::MAX)
}

fn signed(bits: u64) -> i64 {
    i64::try_from(bits).unwrap_or(i64::MAX)
}
