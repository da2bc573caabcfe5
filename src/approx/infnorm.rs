//! Global maximum of |f| over an interval.
//!
//! The interval is split into equal pieces. On each piece `f` is interpolated
//! at Chebyshev nodes and the real roots of the interpolant's derivative are
//! taken as candidate extrema, which are then evaluated exactly.

use malachite::num::arithmetic::traits::{Abs, PowerOf2};
use malachite::num::basic::traits::Zero;
use malachite::Rational;
use smallvec::SmallVec;

use super::Domain;
use crate::cheby::{self, RootFinder};
use crate::functions::Function;
use crate::utils::rational::{from_finite, to_f64};
use crate::utils::Precision;

const SUBINTERVALS: usize = 256;
const DEGREE: usize = 8;

// Candidate locations come from binary64 interpolants and are accurate to
// about 1e-15 of the piece width. Values at the candidates are computed at
// the working precision, so a misplaced location only costs the second-order
// change of |f| near its maximum.

/// Derivative coefficients this small relative to the largest one are
/// dropped before root finding.
const NEGLIGIBLE: f64 = 1e-13;

/// Roots are accepted slightly outside [-1, 1] so that extrema on piece
/// boundaries are not lost.
const MARGIN: f64 = 1e-9;

/// A point where |f| attains its maximum, and that maximum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extremum {
    pub location: Rational,
    pub value: Rational,
}

impl Extremum {
    fn at<F>(f: &F, location: Rational, prec: Precision) -> Extremum
    where
        F: Function + ?Sized,
    {
        let value = f.eval(&location, prec).abs();

        Extremum { location, value }
    }

    /// Moves to `location` if |f| is strictly larger there.
    fn update<F>(&mut self, f: &F, location: Rational, prec: Precision)
    where
        F: Function + ?Sized,
    {
        let candidate = Extremum::at(f, location, prec);

        if candidate.value > self.value {
            *self = candidate;
        }
    }
}

/// Locates the maximum of |f| over `domain`.
pub fn infnorm<F>(f: &F, domain: &Domain, prec: Precision) -> Extremum
where
    F: Function + ?Sized,
{
    let mut best = Extremum::at(f, domain.lo().clone(), prec);
    best.update(f, domain.hi().clone(), prec);

    let finder = RootFinder {
        lo: -1.0 - MARGIN,
        hi: 1.0 + MARGIN,
        ..RootFinder::default()
    };

    let nodes: Vec<Rational> = cheby::nodes(DEGREE + 1)
        .into_iter()
        .map(from_finite)
        .collect();

    for piece in domain.subdivide(SUBINTERVALS) {
        let samples: Vec<Rational> = nodes
            .iter()
            .map(|t| f.eval(&piece.from_unit(t), prec))
            .collect();

        for t in critical_points(&samples, &finder) {
            let t = from_finite(t.clamp(-1.0, 1.0));

            best.update(f, piece.from_unit(&t), prec);
        }
    }

    best
}

/// Finds the stationary points in [-1, 1] of the interpolant through
/// `samples`, given at the Chebyshev nodes.
fn critical_points(
    samples: &[Rational],
    finder: &RootFinder,
) -> SmallVec<[f64; DEGREE]> {
    let Some(largest) = samples.iter().map(|s| s.abs()).max() else {
        return SmallVec::new();
    };

    if largest == Rational::ZERO {
        return SmallVec::new();
    }

    // Normalize so that binary64 neither overflows nor underflows.
    let scale = Rational::power_of_2(-largest.floor_log_base_2_abs());

    let values: Vec<f64> =
        samples.iter().map(|s| to_f64(&(s * &scale))).collect();

    let mut slope = cheby::derivative(&cheby::coefficients(&values));

    let magnitude = slope.iter().fold(0.0, |acc: f64, c| acc.max(c.abs()));

    if magnitude == 0.0 {
        return SmallVec::new();
    }

    while slope.last().is_some_and(|c| c.abs() <= NEGLIGIBLE * magnitude) {
        slope.pop();
    }

    finder.roots(&slope).into()
}

#[cfg(test)]
mod tests {
    use malachite::num::conversion::traits::FromSciString;

    use super::*;
    use crate::functions::{Binary64, Builtin};

    const PREC: Precision = Precision::new(128);

    fn q(s: &str) -> Rational {
        Rational::from_sci_string(s).unwrap()
    }

    #[test]
    fn sine_peaks() {
        let f = Binary64(|x: f64| (std::f64::consts::PI * x).sin());
        let domain = Domain::new(q("-1"), q("1")).unwrap();

        let extremum = infnorm(&f, &domain, PREC);
        let location = to_f64(&extremum.location);

        assert!((location.abs() - 0.5).abs() < 1e-6, "location {location}");
        assert!((to_f64(&extremum.value) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn endpoint_maximum() {
        let domain = Domain::new(q("0"), q("2")).unwrap();

        let extremum = infnorm(&Builtin::Exp, &domain, PREC);

        assert_eq!(extremum.location, q("2"));
        assert!((to_f64(&extremum.value) - 2f64.exp()).abs() < 1e-12);
    }

    #[test]
    fn interior_extremum_of_rational_error() {
        // |x (1 - x)| peaks at 1/2 with value 1/4.
        let f = |x: &Rational| x * (Rational::from(1) - x);
        let domain = Domain::new(q("0"), q("1")).unwrap();

        let extremum = infnorm(&f, &domain, PREC);

        assert!((to_f64(&extremum.location) - 0.5).abs() < 1e-9);
        assert!((to_f64(&extremum.value) - 0.25).abs() < 1e-15);
    }

    #[test]
    fn zero_function() {
        let f = |_: &Rational| Rational::ZERO;
        let domain = Domain::new(q("-2"), q("3")).unwrap();

        let extremum = infnorm(&f, &domain, PREC);

        assert_eq!(extremum.location, q("-2"));
        assert_eq!(extremum.value, Rational::ZERO);
    }
}
