//! Rational approximations with fixed-point coefficients.
//!
//! The continuous minimax approximation is scaled so that the numerator
//! coefficients stay below a bound, and then every coefficient is snapped to
//! the grid `2^-k` jointly, by lattice reduction, rather than one at a time.

use malachite::num::arithmetic::traits::{Abs, PowerOf2};
use malachite::num::basic::traits::{One, Zero};
use malachite::{Integer, Rational};

use super::{
    infnorm, power, remez, ApproxError, Bounds, Config, CoefficientRecord,
    Domain, Minimax, RationalApprox, RationalType, WeightedError,
};
use crate::functions::Function;
use crate::lattice;
use crate::utils::rational::{to_f64, RoundBinary};

/// An approximation problem.
pub struct Problem<'a> {
    pub function: &'a dyn Function,
    pub weight: &'a dyn Function,
    pub kind: RationalType,
    pub domain: Domain,
    /// Bounds on the non-leading denominator coefficients, [-1, 1] if absent.
    pub bounds: Option<Bounds>,
    /// Upper bound on the magnitude of the scaled numerator coefficients.
    pub xi: Rational,
    /// Coefficients are multiples of `2^-frac_bits`.
    pub frac_bits: u32,
}

impl Problem<'_> {
    fn effective_bounds(&self) -> Bounds {
        self.bounds.clone().unwrap_or_default()
    }

    fn grid(&self) -> i64 {
        -i64::from(self.frac_bits)
    }
}

/// A non-leading denominator coefficient of the continuous approximation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DenominatorTerm {
    /// Lies exactly on a bound and is kept as is.
    Saturated { index: usize, value: Rational },
    /// Strictly inside the bounds and quantized with the numerator.
    Free { index: usize },
}

impl DenominatorTerm {
    /// Classifies `den[1..]` against `bounds`.
    pub fn partition(
        den: &[Rational],
        bounds: &Bounds,
    ) -> Vec<DenominatorTerm> {
        den.iter()
            .enumerate()
            .skip(1)
            .map(|(index, value)| {
                if bounds.saturates(value) {
                    DenominatorTerm::Saturated {
                        index,
                        value: value.clone(),
                    }
                } else {
                    DenominatorTerm::Free { index }
                }
            })
            .collect()
    }

    pub fn index(&self) -> usize {
        match self {
            DenominatorTerm::Saturated { index, .. }
            | DenominatorTerm::Free { index } => *index,
        }
    }
}

/// Result of a synthesis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Synthesis {
    /// The continuous minimax approximation.
    pub minimax: Minimax,
    /// Power of two applied to the numerator.
    pub scale: Rational,
    /// Error after rounding each scaled coefficient independently.
    pub naive_error: Rational,
    /// Quantized coefficients of the scaled approximation, with the error
    /// `w (f - r / scale)` of the result.
    pub quantized: RationalApprox,
    /// Integer multipliers of the basis functions: numerator first, then the
    /// free denominator terms.
    pub multipliers: Vec<Integer>,
    /// Denominator indices whose quantized coefficient is out of bounds.
    pub violations: Vec<usize>,
}

impl Synthesis {
    /// Whether every denominator coefficient is within the bounds.
    pub fn valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn record(&self) -> CoefficientRecord {
        CoefficientRecord {
            kind: self.quantized.kind(),
            error: self.quantized.error.clone(),
            num: self.quantized.num.clone(),
            den: self.quantized.den[1..].to_vec(),
        }
    }
}

/// Computes a rational approximation with coefficients on the `2^-k` grid.
///
/// Bound violations of the quantized denominator are reported in the result
/// rather than as an error.
pub fn synthesize(
    problem: &Problem,
    config: &Config,
) -> Result<Synthesis, ApproxError> {
    if problem.xi <= Rational::ZERO {
        return Err(ApproxError::NumeratorBound(problem.xi.clone()));
    }

    let prec = config.precision;
    let bounds = problem.effective_bounds();
    let (f, w) = (problem.function, problem.weight);

    let minimax = remez(
        problem.kind,
        &problem.domain,
        f,
        w,
        Some(&bounds),
        config,
    )?;

    let approx = &minimax.approx;
    let scale = numerator_scale(&approx.num, &problem.xi);

    log::info!("numerator scale factor 2^{}", scale.floor_log_base_2_abs());

    let naive = round_naive(approx, &scale, problem.grid());
    let naive_error = infnorm(
        &WeightedError::new(f, w, &naive).scaled(scale.clone()),
        &problem.domain,
        prec,
    )
    .value;

    log::info!("naive rounding error {:e}", to_f64(&naive_error));

    let terms = DenominatorTerm::partition(&approx.den, &bounds);
    let ulp = Rational::power_of_2(problem.grid());

    let multipliers = quantize(problem, approx, &scale, &terms, &ulp, config)?;

    let kind = problem.kind;
    let mut quantized = rebuild(kind, &terms, &multipliers, &ulp);

    let violations = violations(&quantized.den, &bounds);

    for &j in &violations {
        log::warn!(
            "denominator coefficient {j} = {:e} is outside [{:e}, {:e}]",
            to_f64(&quantized.den[j]),
            to_f64(&bounds.lower),
            to_f64(&bounds.upper),
        );
    }

    quantized.error = infnorm(
        &WeightedError::new(f, w, &quantized).scaled(scale.clone()),
        &problem.domain,
        prec,
    )
    .value;

    log::info!("lattice rounding error {:e}", to_f64(&quantized.error));

    Ok(Synthesis {
        minimax,
        scale,
        naive_error,
        quantized,
        multipliers,
        violations,
    })
}

/// Finds integer multipliers for the scaled numerator and the free
/// denominator terms so that `p / q` matches `scale * approx`.
fn quantize(
    problem: &Problem,
    approx: &RationalApprox,
    scale: &Rational,
    terms: &[DenominatorTerm],
    ulp: &Rational,
    config: &Config,
) -> Result<Vec<Integer>, ApproxError> {
    let prec = config.precision;
    let w = problem.weight;

    let scaled = |x: &Rational| scale * approx.eval(x, prec);

    let mut basis: Vec<Box<dyn Function + '_>> = Vec::new();

    for i in 0..=problem.kind.n {
        basis.push(Box::new(move |x: &Rational| {
            w.eval(x, prec) * power(x, i, prec) * ulp
        }));
    }

    for term in terms {
        if let DenominatorTerm::Free { index } = *term {
            let scaled = &scaled;

            basis.push(Box::new(move |x: &Rational| {
                -(scaled(x) * w.eval(x, prec) * power(x, index, prec) * ulp)
            }));
        }
    }

    let target = |x: &Rational| {
        let fixed = terms.iter().fold(Rational::ONE, |acc, term| match term {
            DenominatorTerm::Saturated { index, value } => {
                acc + value * power(x, *index, prec)
            }
            DenominatorTerm::Free { .. } => acc,
        });

        w.eval(x, prec) * scaled(x) * fixed
    };

    let kind = problem.kind;
    let points = problem.domain.chebyshev_nodes(kind.n + kind.m + 1);
    let refs: Vec<&dyn Function> = basis.iter().map(|b| b.as_ref()).collect();

    let multipliers =
        lattice::quantize(&points, &target, &refs, config.lattice_precision)?;

    Ok(multipliers)
}

/// The largest power of two that keeps the numerator coefficients at most
/// `xi` in magnitude, or 1 for a zero numerator.
fn numerator_scale(num: &[Rational], xi: &Rational) -> Rational {
    let largest = num.iter().map(|a| a.abs()).max();

    match largest {
        Some(largest) if largest != Rational::ZERO => {
            Rational::power_of_2((xi / largest).floor_log_base_2_abs())
        }
        _ => Rational::ONE,
    }
}

/// Rounds the scaled numerator and the denominator to the nearest multiple of
/// `2^grid`, one coefficient at a time.
fn round_naive(
    approx: &RationalApprox,
    scale: &Rational,
    grid: i64,
) -> RationalApprox {
    let num = approx
        .num
        .iter()
        .map(|a| (a * scale).round_nearest(grid))
        .collect();

    let mut den: Vec<Rational> = approx
        .den
        .iter()
        .map(|b| b.round_nearest(grid))
        .collect();

    den[0] = Rational::ONE;

    RationalApprox {
        num,
        den,
        error: Rational::ZERO,
    }
}

/// Indices of the non-leading denominator coefficients outside `bounds`.
fn violations(den: &[Rational], bounds: &Bounds) -> Vec<usize> {
    (1..den.len()).filter(|&j| !bounds.contains(&den[j])).collect()
}

/// Reassembles the quantized coefficients from the lattice multipliers.
fn rebuild(
    kind: RationalType,
    terms: &[DenominatorTerm],
    multipliers: &[Integer],
    ulp: &Rational,
) -> RationalApprox {
    let (num, free) = multipliers.split_at(kind.n + 1);

    debug_assert_eq!(
        free.len(),
        terms
            .iter()
            .filter(|t| matches!(t, DenominatorTerm::Free { .. }))
            .count()
    );

    let num = num.iter().map(|c| Rational::from(c) * ulp).collect();
    let mut free = free.iter().map(|c| Rational::from(c) * ulp);

    let den = std::iter::once(Rational::ONE)
        .chain(terms.iter().map(|term| match term {
            DenominatorTerm::Saturated { value, .. } => value.clone(),
            DenominatorTerm::Free { .. } => {
                free.next().unwrap_or(Rational::ZERO)
            }
        }))
        .collect();

    RationalApprox {
        num,
        den,
        error: Rational::ZERO,
    }
}
