//! Fixed-point decimal text.

use std::cmp::Ordering;

use malachite::num::arithmetic::traits::{Pow, Sign};
use malachite::{Natural, Rational};

/// Formats `x` rounded to nearest with exactly `digits` fractional digits.
pub fn to_decimal(x: &Rational, digits: u64) -> String {
    let scale = Natural::from(10u32).pow(digits);

    let numerator = x.numerator_ref() * scale;
    let denominator = x.denominator_ref();

    let twice = denominator << 1u64;
    let rounded = ((numerator << 1u64) + denominator) / twice;

    let mut text = rounded.to_string();
    let width = usize::try_from(digits).unwrap_or(usize::MAX);

    if text.len() <= width {
        text.insert_str(0, &"0".repeat(width + 1 - text.len()));
    }

    if width > 0 {
        text.insert(text.len() - width, '.');
    }

    if x.sign() == Ordering::Less && rounded != 0u32 {
        text.insert(0, '-');
    }

    text
}
