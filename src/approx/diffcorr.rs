//! Discrete minimax rational approximation by differential correction.
//!
//! Each correction step solves the linear program
//!
//! ```text
//! minimize    d
//! subject to  |w(x) (f(x) q(x) - p(x))| - e q(x) <= d q'(x)
//! ```
//!
//! over the reference points, where `q'` is the previous denominator and `e`
//! the previous maximum error. The error decreases monotonically towards the
//! discrete minimax error.

use malachite::num::arithmetic::traits::Abs;
use malachite::num::basic::traits::{NegativeOne, One, Zero};
use malachite::Rational;

use super::{
    power, within_tolerance, ApproxError, Bounds, Config, RationalApprox,
    RationalType, Stage,
};
use crate::functions::Function;
use crate::lp::LinearProgram;
use crate::utils::rational::to_f64;

/// A reference point with the values every correction step needs.
struct Sample {
    location: Rational,
    /// `x^0, x^1, ..., x^max(n, m)`.
    powers: Vec<Rational>,
    weight: Rational,
    /// `f(x) w(x)`.
    target: Rational,
}

impl Sample {
    fn new<F, W>(
        x: &Rational,
        f: &F,
        w: &W,
        degree: usize,
        config: &Config,
    ) -> Sample
    where
        F: Function + ?Sized,
        W: Function + ?Sized,
    {
        let prec = config.precision;

        let powers = (0..=degree).map(|k| power(x, k, prec)).collect();
        let weight = w.eval(x, prec);
        let target = prec.round(f.eval(x, prec) * &weight);

        Sample {
            location: x.clone(),
            powers,
            weight,
            target,
        }
    }

    fn polynomial(&self, coeffs: &[Rational]) -> Rational {
        coeffs
            .iter()
            .zip(&self.powers)
            .fold(Rational::ZERO, |acc, (c, x)| acc + c * x)
    }

    /// `|w(x) (f(x) - p(x) / q(x))|`, defined only where `q(x) > 0`.
    fn error(
        &self,
        approx: &RationalApprox,
    ) -> Result<Rational, ApproxError> {
        let q = self.denominator(approx)?;
        let p = self.polynomial(&approx.num);

        Ok((&self.target - &self.weight * p / q).abs())
    }

    fn denominator(
        &self,
        approx: &RationalApprox,
    ) -> Result<Rational, ApproxError> {
        let q = self.polynomial(&approx.den);

        if q > Rational::ZERO {
            Ok(q)
        } else {
            Err(ApproxError::NonPositiveDenominator {
                location: self.location.clone(),
            })
        }
    }
}

/// Solver for the discrete minimax problem on a set of reference points.
///
/// The constraint storage is kept between solves.
pub struct DifferentialCorrection<'a> {
    kind: RationalType,
    bounds: Bounds,
    config: &'a Config,
    program: LinearProgram,
}

impl<'a> DifferentialCorrection<'a> {
    /// Denominator coefficients other than the leading 1 are constrained to
    /// `bounds`, or to [-1, 1] when none are given.
    pub fn new(
        kind: RationalType,
        bounds: Option<&Bounds>,
        config: &'a Config,
    ) -> DifferentialCorrection<'a> {
        DifferentialCorrection {
            kind,
            bounds: bounds.cloned().unwrap_or_default(),
            config,
            program: LinearProgram::default(),
        }
    }

    /// Computes the best approximation to `f` with weight `w` on `points`.
    ///
    /// Iteration starts from `start`, which must have the solver's type and
    /// a denominator that is positive on every point. The returned error is
    /// the maximum weighted error on `points`. A correction whose denominator
    /// is not positive on some point ends the solve with
    /// [`ApproxError::NonPositiveDenominator`].
    pub fn solve<F, W>(
        &mut self,
        points: &[Rational],
        f: &F,
        w: &W,
        start: &RationalApprox,
    ) -> Result<RationalApprox, ApproxError>
    where
        F: Function + ?Sized,
        W: Function + ?Sized,
    {
        debug_assert_eq!(start.kind(), self.kind, "start has wrong type");

        let RationalType { n, m } = self.kind;

        let samples: Vec<Sample> = points
            .iter()
            .map(|x| Sample::new(x, f, w, n.max(m), self.config))
            .collect();

        let mut current = start.clone();
        let mut error = max_error(&samples, &current)?;

        for _ in 0..self.config.max_corrections {
            let mut next = self.correct(&samples, &current, &error)?;
            let next_error = max_error(&samples, &next)?;

            log::debug!("correction delta = {:e}", to_f64(&next_error));

            let converged =
                within_tolerance(&error, &next_error, &self.config.tolerance);

            next.error = next_error.clone();
            current = next;
            error = next_error;

            if converged {
                return Ok(current);
            }
        }

        Err(ApproxError::NotConverged {
            stage: Stage::Correction,
            iterations: self.config.max_corrections,
        })
    }

    /// Solves one linear program. Variables are `a_0..a_n`, `b_1..b_m` and
    /// the objective `d`, in that order.
    fn correct(
        &mut self,
        samples: &[Sample],
        previous: &RationalApprox,
        error: &Rational,
    ) -> Result<RationalApprox, ApproxError> {
        let prec = self.config.precision;
        let RationalType { n, m } = self.kind;

        let vars = n + m + 2;
        let delta = vars - 1;
        let rows = 2 * samples.len() + 2 * m;

        self.program.reset(rows, vars);

        let LinearProgram { constraints, rhs } = &mut self.program;

        for (k, sample) in samples.iter().enumerate() {
            let (lower, upper) = (2 * k, 2 * k + 1);

            for i in 0..=n {
                let c = prec.round(&sample.weight * &sample.powers[i]);

                constraints[(lower, i)] = -&c;
                constraints[(upper, i)] = c;
            }

            for j in 1..=m {
                let x = &sample.powers[j];

                constraints[(lower, n + j)] =
                    prec.round((&sample.target - error) * x);
                constraints[(upper, n + j)] =
                    prec.round((-&sample.target - error) * x);
            }

            let q = prec.round(sample.polynomial(&previous.den));

            constraints[(lower, delta)] = -&q;
            constraints[(upper, delta)] = -q;

            rhs[lower] = error - &sample.target;
            rhs[upper] = error + &sample.target;
        }

        let base = 2 * samples.len();

        for j in 1..=m {
            let row = base + 2 * (j - 1);

            constraints[(row, n + j)] = Rational::ONE;
            rhs[row] = self.bounds.upper.clone();

            constraints[(row + 1, n + j)] = Rational::NEGATIVE_ONE;
            rhs[row + 1] = -&self.bounds.lower;
        }

        let mut objective = vec![Rational::ZERO; vars];
        objective[delta] = Rational::ONE;

        let solution = self.program.minimize(&objective)?;
        let mut values = solution.values;

        values.truncate(delta);

        let den: Vec<Rational> = std::iter::once(Rational::ONE)
            .chain(values.drain(n + 1..))
            .collect();

        Ok(RationalApprox {
            num: values,
            den,
            error: Rational::ZERO,
        })
    }
}

fn max_error(
    samples: &[Sample],
    approx: &RationalApprox,
) -> Result<Rational, ApproxError> {
    itertools::process_results(
        samples.iter().map(|sample| sample.error(approx)),
        |errors| errors.max().unwrap_or(Rational::ZERO),
    )
}
