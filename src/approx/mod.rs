//! Minimax rational approximation and fixed-point coefficient synthesis.

pub mod diffcorr;
pub mod infnorm;
pub mod record;
pub mod remez;
pub mod synthesis;

use std::{error, fmt};

use malachite::num::arithmetic::traits::{Abs, Pow};
use malachite::num::basic::traits::{NegativeOne, One, Zero};
use malachite::Rational;

use crate::cheby;
use crate::functions::Function;
use crate::lattice::LatticeError;
use crate::lp::LpStatus;
use crate::utils::rational::from_finite;
use crate::utils::Precision;

pub use diffcorr::DifferentialCorrection;
pub use infnorm::{infnorm, Extremum};
pub use record::{CoefficientRecord, ParseRecordError};
pub use remez::{remez, Minimax};
pub use synthesis::{synthesize, DenominatorTerm, Problem, Synthesis};

/// Numerator and denominator degrees of a rational function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RationalType {
    pub n: usize,
    pub m: usize,
}

impl RationalType {
    pub fn new(n: usize, m: usize) -> RationalType {
        RationalType { n, m }
    }
}

impl fmt::Display for RationalType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.n, self.m)
    }
}

/// A closed interval `[lo, hi]` with `lo < hi`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Domain {
    lo: Rational,
    hi: Rational,
}

impl Domain {
    /// Returns `None` unless `lo < hi`.
    pub fn new(lo: Rational, hi: Rational) -> Option<Domain> {
        (lo < hi).then_some(Domain { lo, hi })
    }

    pub fn lo(&self) -> &Rational {
        &self.lo
    }

    pub fn hi(&self) -> &Rational {
        &self.hi
    }

    pub fn contains(&self, x: &Rational) -> bool {
        self.lo <= *x && *x <= self.hi
    }

    /// The largest magnitude of any point in the interval.
    pub fn magnitude(&self) -> Rational {
        (&self.lo).abs().max((&self.hi).abs())
    }

    /// Maps `t` in [-1, 1] affinely onto the interval.
    pub fn from_unit(&self, t: &Rational) -> Rational {
        (&self.lo + &self.hi + t * (&self.hi - &self.lo)) / Rational::from(2)
    }

    /// Maps `x` in the interval affinely onto [-1, 1].
    pub fn to_unit(&self, x: &Rational) -> Rational {
        (Rational::from(2) * x - &self.lo - &self.hi) / (&self.hi - &self.lo)
    }

    pub fn map_from_unit(&self, ts: &[Rational]) -> Vec<Rational> {
        ts.iter().map(|t| self.from_unit(t)).collect()
    }

    /// The `n` Chebyshev extrema mapped onto the interval, in ascending
    /// order.
    pub fn chebyshev_nodes(&self, n: usize) -> Vec<Rational> {
        let ts: Vec<Rational> =
            cheby::nodes(n).into_iter().rev().map(from_finite).collect();

        self.map_from_unit(&ts)
    }

    /// Splits the interval into `pieces` subintervals of equal width.
    pub fn subdivide(
        &self,
        pieces: usize,
    ) -> impl Iterator<Item = Domain> + '_ {
        let step = (&self.hi - &self.lo) / Rational::from(pieces);

        (0..pieces).map(move |i| {
            let lo = &self.lo + &step * Rational::from(i);
            let hi = if i + 1 == pieces {
                self.hi.clone()
            } else {
                &lo + &step
            };

            Domain { lo, hi }
        })
    }
}

/// Box constraints on the non-leading denominator coefficients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub lower: Rational,
    pub upper: Rational,
}

impl Bounds {
    /// The symmetric box `[-magnitude, magnitude]`.
    pub fn symmetric(magnitude: Rational) -> Bounds {
        Bounds {
            lower: -&magnitude,
            upper: magnitude,
        }
    }

    pub fn contains(&self, x: &Rational) -> bool {
        self.lower <= *x && *x <= self.upper
    }

    /// Whether `x` lies exactly on either bound.
    pub fn saturates(&self, x: &Rational) -> bool {
        *x == self.lower || *x == self.upper
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds {
            lower: Rational::NEGATIVE_ONE,
            upper: Rational::ONE,
        }
    }
}

/// A rational function `p(x) / q(x)` with its weighted error.
///
/// The leading denominator coefficient is 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RationalApprox {
    pub num: Vec<Rational>,
    pub den: Vec<Rational>,
    pub error: Rational,
}

impl RationalApprox {
    /// The approximation `0 / 1` of the given type.
    pub fn zero(kind: RationalType) -> RationalApprox {
        let mut den = vec![Rational::ZERO; kind.m + 1];
        den[0] = Rational::ONE;

        RationalApprox {
            num: vec![Rational::ZERO; kind.n + 1],
            den,
            error: Rational::ZERO,
        }
    }

    pub fn kind(&self) -> RationalType {
        RationalType::new(self.num.len() - 1, self.den.len() - 1)
    }

    pub fn eval(&self, x: &Rational, prec: Precision) -> Rational {
        let p = horner(&self.num, x, prec);
        let q = horner(&self.den, x, prec);

        prec.round(p / q)
    }
}

/// Evaluates a polynomial with coefficients in ascending order.
pub fn horner(coeffs: &[Rational], x: &Rational, prec: Precision) -> Rational {
    coeffs.iter().rev().fold(Rational::ZERO, |acc, c| {
        prec.round(acc * x + c)
    })
}

/// Computes `x^k` rounded to `prec`.
pub fn power(x: &Rational, k: usize, prec: Precision) -> Rational {
    prec.round(x.pow(k as u64))
}

/// The weighted error `w(x) (f(x) - r(x) / scale)` of an approximation `r`.
pub struct WeightedError<'a, F: ?Sized, W: ?Sized> {
    pub function: &'a F,
    pub weight: &'a W,
    pub approx: &'a RationalApprox,
    pub scale: Rational,
}

impl<'a, F, W> WeightedError<'a, F, W>
where
    F: Function + ?Sized,
    W: Function + ?Sized,
{
    pub fn new(
        function: &'a F,
        weight: &'a W,
        approx: &'a RationalApprox,
    ) -> Self {
        WeightedError {
            function,
            weight,
            approx,
            scale: Rational::ONE,
        }
    }

    /// The error of an approximation to `scale * f`.
    pub fn scaled(self, scale: Rational) -> Self {
        WeightedError { scale, ..self }
    }
}

impl<F, W> Function for WeightedError<'_, F, W>
where
    F: Function + ?Sized,
    W: Function + ?Sized,
{
    fn eval(&self, x: &Rational, prec: Precision) -> Rational {
        let f = self.function.eval(x, prec);
        let w = self.weight.eval(x, prec);
        let r = self.approx.eval(x, prec) / &self.scale;

        prec.round(w * (f - r))
    }
}

/// Limits and precisions for the approximation pipeline.
#[derive(Clone, Debug)]
pub struct Config {
    /// Working precision of all function evaluations.
    pub precision: Precision,
    /// Precision of the values entering the quantization lattice.
    pub lattice_precision: Precision,
    /// Relative change in error below which an iteration has converged.
    pub tolerance: Rational,
    /// Maximum number of linear programs per differential correction solve.
    pub max_corrections: usize,
    /// Maximum number of reference points added by the exchange loop.
    pub max_iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            precision: Precision::new(256),
            lattice_precision: Precision::new(165),
            tolerance: Rational::from_unsigneds(1u32, 100_000u32),
            max_corrections: 64,
            max_iterations: 100,
        }
    }
}

/// Whether `previous` is within `tolerance` of `current`, relative to
/// `current`. A zero `current` always converges.
fn within_tolerance(
    previous: &Rational,
    current: &Rational,
    tolerance: &Rational,
) -> bool {
    if *current == Rational::ZERO {
        return true;
    }

    (previous - current).abs() <= tolerance * current.abs()
}

/// The iterative stage that failed to converge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Correction,
    Exchange,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let description = match self {
            Stage::Correction => "differential correction",
            Stage::Exchange => "exchange loop",
        };

        write!(f, "{}", description)
    }
}

/// A failure of the approximation pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApproxError {
    Solver(LpStatus),
    NotConverged { stage: Stage, iterations: usize },
    Stalled { location: Rational },
    /// The denominator vanishes or is negative at a reference point.
    NonPositiveDenominator { location: Rational },
    /// The bound on the scaled numerator coefficients is not positive.
    NumeratorBound(Rational),
    Lattice(LatticeError),
}

impl fmt::Display for ApproxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApproxError::Solver(status) => {
                write!(f, "linear program is {status}")
            }
            ApproxError::NotConverged { stage, iterations } => {
                write!(f, "{stage} did not converge in {iterations} iterations")
            }
            ApproxError::Stalled { location } => {
                write!(f, "exchange loop stalled at existing point {location}")
            }
            ApproxError::NonPositiveDenominator { location } => {
                write!(f, "denominator is not positive at {location}")
            }
            ApproxError::NumeratorBound(xi) => {
                write!(f, "numerator bound {xi} is not positive")
            }
            ApproxError::Lattice(err) => {
                write!(f, "quantization failed: {err}")
            }
        }
    }
}

impl error::Error for ApproxError {}

impl From<LpStatus> for ApproxError {
    fn from(status: LpStatus) -> Self {
        ApproxError::Solver(status)
    }
}

impl From<LatticeError> for ApproxError {
    fn from(err: LatticeError) -> Self {
        ApproxError::Lattice(err)
    }
}
