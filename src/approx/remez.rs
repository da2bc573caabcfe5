//! Minimax rational approximation over an interval.
//!
//! The continuous problem is reduced to a sequence of discrete ones. After
//! each discrete solve the point of largest error over the whole interval is
//! added to the reference set, until the discrete error predicts the
//! continuous one.

use malachite::num::arithmetic::traits::Abs;
use malachite::num::basic::traits::Zero;
use malachite::Rational;

use super::{
    infnorm, ApproxError, Bounds, Config, DifferentialCorrection, Domain,
    RationalApprox, RationalType, Stage, WeightedError,
};
use crate::functions::Function;
use crate::utils::rational::to_f64;

/// A converged approximation and the reference points that determined it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Minimax {
    /// The approximation, with its maximum weighted error over the domain.
    pub approx: RationalApprox,
    /// Reference points in insertion order.
    pub references: Vec<Rational>,
    /// Number of points added after the initial set.
    pub iterations: usize,
}

/// Computes the best approximation of type `kind` to `f` with weight `w`
/// over `domain`.
///
/// The non-leading denominator coefficients are restricted to `bounds`,
/// or to [-1, 1] when none are given.
pub fn remez<F, W>(
    kind: RationalType,
    domain: &Domain,
    f: &F,
    w: &W,
    bounds: Option<&Bounds>,
    config: &Config,
) -> Result<Minimax, ApproxError>
where
    F: Function + ?Sized,
    W: Function + ?Sized,
{
    let prec = config.precision;

    let mut solver = DifferentialCorrection::new(kind, bounds, config);
    let mut references = domain.chebyshev_nodes(kind.n + kind.m + 2);
    let mut approx = RationalApprox::zero(kind);

    for iteration in 0..=config.max_iterations {
        approx = solver.solve(&references, f, w, &approx)?;

        let predicted = approx.error.clone();
        let err = WeightedError::new(f, w, &approx);
        let extremum = infnorm(&err, domain, prec);

        log::info!(
            "outer iteration {iteration}: location {:e}, max error {:e}",
            to_f64(&extremum.location),
            to_f64(&extremum.value),
        );

        approx.error = extremum.value.clone();

        if converged(&predicted, &extremum.value, &config.tolerance) {
            return Ok(Minimax {
                approx,
                references,
                iterations: iteration,
            });
        }

        if references.contains(&extremum.location) {
            return Err(ApproxError::Stalled {
                location: extremum.location,
            });
        }

        references.push(extremum.location);
    }

    Err(ApproxError::NotConverged {
        stage: Stage::Exchange,
        iterations: config.max_iterations,
    })
}

/// Whether the discrete error predicts the achieved one. Unlike the inner
/// loop the comparison is strict.
fn converged(
    predicted: &Rational,
    achieved: &Rational,
    tolerance: &Rational,
) -> bool {
    if *achieved == Rational::ZERO {
        return true;
    }

    (achieved - predicted).abs() < tolerance * achieved
}

#[cfg(test)]
mod tests {
    use malachite::num::basic::traits::One;
    use malachite::num::conversion::traits::FromSciString;

    use super::*;
    use crate::functions::{Binary64, Builtin};
    use crate::utils::Precision;

    fn q(s: &str) -> Rational {
        Rational::from_sci_string(s).unwrap()
    }

    fn config() -> Config {
        Config {
            precision: Precision::new(128),
            ..Config::default()
        }
    }

    /// Groups of consecutive near-extremal points with the same sign.
    fn alternations<F>(err: &F, domain: &Domain, prec: Precision) -> usize
    where
        F: Function,
    {
        let peak = to_f64(&infnorm(err, domain, prec).value);
        let samples = 4000;

        let mut groups = 0;
        let mut last = 0.0;

        for i in 0..=samples {
            let x = domain.from_unit(&Rational::from_signeds(
                2 * i as i64 - samples as i64,
                samples as i64,
            ));
            let e = to_f64(&err.eval(&x, prec));

            if e.abs() >= peak * (1.0 - 1e-3) && e.signum() != last {
                groups += 1;
                last = e.signum();
            }
        }

        groups
    }

    #[test]
    fn polynomial_is_exact() {
        let config = Config::default();
        let domain = Domain::new(q("-1"), q("1")).unwrap();
        let f = |x: &Rational| x * x - x / q("4");
        let w = |_: &Rational| Rational::ONE;

        let minimax =
            remez(RationalType::new(2, 0), &domain, &f, &w, None, &config)
                .unwrap();

        assert_eq!(minimax.approx.error, Rational::ZERO);
        assert_eq!(minimax.approx.num, vec![q("0"), q("-0.25"), q("1")]);
    }

    #[test]
    fn identity_converges_immediately() {
        let domain = Domain::new(q("-1"), q("1")).unwrap();
        let f = |x: &Rational| x.clone();
        let w = |_: &Rational| Rational::ONE;

        let minimax = remez(
            RationalType::new(1, 0),
            &domain,
            &f,
            &w,
            None,
            &config(),
        )
        .unwrap();

        assert_eq!(minimax.iterations, 0);
        assert_eq!(minimax.references.len(), 3);
        assert_eq!(minimax.approx.num, vec![q("0"), q("1")]);
        assert_eq!(minimax.approx.error, Rational::ZERO);
    }

    #[test]
    fn repeated_location_stalls() {
        // The best constant for x on [0, 1] is 1/2, with the error peaking at
        // both reference points. A zero tolerance rejects the exact
        // prediction, so the exchange returns to the point x = 0.
        let config = Config {
            tolerance: Rational::ZERO,
            ..config()
        };
        let domain = Domain::new(q("0"), q("1")).unwrap();
        let f = |x: &Rational| x.clone();
        let w = |_: &Rational| Rational::ONE;

        let result =
            remez(RationalType::new(0, 0), &domain, &f, &w, None, &config);

        assert_eq!(result, Err(ApproxError::Stalled { location: q("0") }));
    }

    #[test]
    fn equioscillation() {
        let config = config();
        let domain = Domain::new(q("0"), q("1")).unwrap();
        let f = Binary64(f64::exp);
        let w = |_: &Rational| Rational::ONE;

        let minimax =
            remez(RationalType::new(2, 2), &domain, &f, &w, None, &config)
                .unwrap();

        let approx = &minimax.approx;
        let err = WeightedError::new(&f, &w, approx);

        assert!(approx.error > Rational::ZERO);
        assert!(alternations(&err, &domain, config.precision) >= 6);

        // The discrete error on the references predicts the global one.
        let discrete = minimax
            .references
            .iter()
            .map(|x| err.eval(x, config.precision).abs())
            .max()
            .unwrap();

        assert!(to_f64(&discrete) >= to_f64(&approx.error) * (1.0 - 1e-4));
    }

    #[test]
    fn builtin_with_weight() {
        let config = config();
        let domain = Domain::new(q("0"), q("0.5")).unwrap();
        let w = |x: &Rational| Rational::ONE / (Rational::ONE + x);

        let minimax = remez(
            RationalType::new(1, 1),
            &domain,
            &Builtin::Log1p,
            &w,
            None,
            &config,
        )
        .unwrap();

        let error = to_f64(&minimax.approx.error);

        assert!(error > 0.0 && error < 1e-2, "error {error}");
        assert!(minimax.references.len() >= 4);
    }

    #[test]
    fn iteration_cap() {
        let config = Config {
            max_iterations: 0,
            ..config()
        };
        let domain = Domain::new(q("0"), q("1")).unwrap();
        let w = |_: &Rational| Rational::ONE;

        let result = remez(
            RationalType::new(1, 1),
            &domain,
            &Builtin::Exp,
            &w,
            None,
            &config,
        );

        assert!(matches!(
            result,
            Err(ApproxError::NotConverged {
                stage: Stage::Exchange,
                ..
            })
        ));
    }
}
