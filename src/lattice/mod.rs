//! Coefficient quantization by lattice reduction.
//!
//! Finding integer multipliers `c` that make `sum c_i b_i(x)` close to a target
//! at a set of points is a closest-vector problem. It is embedded as a
//! shortest-vector problem by appending the target as an extra row with a
//! weighted extra column, and solved approximately with LLL.

pub mod lll;

use std::fmt;

use malachite::num::arithmetic::traits::{CeilingSqrt, UnsignedAbs};
use malachite::num::basic::traits::{NegativeOne, One, Zero};
use malachite::num::logic::traits::SignificantBits;
use malachite::{Integer, Natural, Rational};

use crate::functions::Function;
use crate::utils::rational::Dyadic;
use crate::utils::{Matrix, Precision};

/// A failure to recover coefficients from the reduced lattice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LatticeError {
    /// The last reduced vector uses the target row with a multiplier other
    /// than one in magnitude.
    DegenerateEmbedding(Integer),
    /// The basis functions are linearly dependent on the points.
    DependentBasis,
}

impl fmt::Display for LatticeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LatticeError::DegenerateEmbedding(multiplier) => write!(
                f,
                "degenerate embedding: target multiplier is {multiplier}"
            ),
            LatticeError::DependentBasis => {
                write!(f, "basis functions are linearly dependent")
            }
        }
    }
}

impl From<lll::DependentRows> for LatticeError {
    fn from(_: lll::DependentRows) -> Self {
        LatticeError::DependentBasis
    }
}

/// Computes integer multipliers, one per basis function, such that the
/// combination approximates `target` at `points`.
///
/// Function values are rounded to `prec` significant bits and scaled to a
/// common integer lattice.
pub fn quantize<T>(
    points: &[Rational],
    target: &T,
    basis: &[&dyn Function],
    prec: Precision,
) -> Result<Vec<Integer>, LatticeError>
where
    T: Function + ?Sized,
{
    let n = basis.len();
    let m = points.len();

    let samples = Matrix::from_fn(n, m, |i, j| {
        Dyadic::round(&basis[i].eval(&points[j], prec), prec)
    });

    let goal: Vec<Dyadic> = points
        .iter()
        .map(|x| Dyadic::round(&target.eval(x, prec), prec))
        .collect();

    let base = samples
        .iter()
        .chain(&goal)
        .filter(|v| !v.is_zero())
        .map(|v| v.exponent)
        .fold(0, i64::min);

    let mut lattice = Matrix::new(n + 1, m + 1, Integer::ZERO);

    for i in 0..n {
        for j in 0..m {
            lattice[(i, j)] = samples[(i, j)].scaled(base);
        }
    }

    for (j, v) in goal.iter().enumerate() {
        lattice[(n, j)] = v.scaled(base);
    }

    let weight = embedding_weight(&lattice, n);

    log::debug!(
        "lattice of {n} vectors at {m} points, scale 2^{base}, weight of {} bits",
        weight.significant_bits()
    );

    lattice[(n, m)] = weight;

    let reduction = lll::reduce(lattice)?;

    log::debug!(
        "closest vector residual of {} bits",
        reduction.basis.row(n)[..m]
            .iter()
            .map(|r| r.significant_bits())
            .max()
            .unwrap_or(0)
    );

    multipliers(reduction.transform.row(n))
}

/// Reads the basis multipliers off a transform row `(u_0, ..., u_n)`, where
/// `u_n` multiplies the target row. The row encodes `target - sum c_i b_i`
/// up to sign, so `u_n` must be one in magnitude.
fn multipliers(row: &[Integer]) -> Result<Vec<Integer>, LatticeError> {
    let Some((target, basis)) = row.split_last() else {
        return Err(LatticeError::DegenerateEmbedding(Integer::ZERO));
    };

    match target {
        c if *c == Integer::ONE => Ok(basis.iter().map(|u| -u).collect()),
        c if *c == Integer::NEGATIVE_ONE => Ok(basis.to_vec()),
        c => Err(LatticeError::DegenerateEmbedding(c.clone())),
    }
}

/// The ceiling of the largest Euclidean norm among the first `rows` rows, and
/// at least one.
fn embedding_weight(lattice: &Matrix<Integer>, rows: usize) -> Integer {
    let largest = (0..rows)
        .map(|i| {
            lattice
                .row(i)
                .iter()
                .map(|v| v.unsigned_abs())
                .fold(Natural::ZERO, |acc, v| acc + &v * &v)
        })
        .max()
        .unwrap_or(Natural::ZERO);

    let weight = Integer::from(largest.ceiling_sqrt());

    if weight == Integer::ZERO {
        Integer::ONE
    } else {
        weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREC: Precision = Precision::new(165);

    fn points(values: &[(i64, i64)]) -> Vec<Rational> {
        values
            .iter()
            .map(|&(n, d)| Rational::from_signeds(n, d))
            .collect()
    }

    #[test]
    fn exact_combination() {
        let one = |_: &Rational| Rational::ONE;
        let x = |x: &Rational| x.clone();
        let target = |x: &Rational| Rational::from(3) + Rational::from(5) * x;

        let xs = points(&[(1, 1), (0, 1)]);
        let c = quantize(&xs, &target, &[&one, &x], PREC).unwrap();

        assert_eq!(c, vec![Integer::from(3), Integer::from(5)]);
    }

    #[test]
    fn exact_combination_with_fractional_values() {
        let one = |_: &Rational| Rational::ONE;
        let x = |x: &Rational| x.clone();
        let target = |x: &Rational| Rational::from(-2) + Rational::from(9) * x;

        let xs = points(&[(1, 8), (3, 4)]);
        let c = quantize(&xs, &target, &[&one, &x], PREC).unwrap();

        assert_eq!(c, vec![Integer::from(-2), Integer::from(9)]);

        for x in &xs {
            let fitted = Rational::from(&c[0]) + Rational::from(&c[1]) * x;

            assert_eq!(fitted, target(x));
        }
    }

    #[test]
    fn dependent_basis() {
        let one = |_: &Rational| Rational::ONE;
        let two = |_: &Rational| Rational::from(2);
        let target = |x: &Rational| x.clone();

        let xs = points(&[(1, 4), (1, 2)]);

        assert_eq!(
            quantize(&xs, &target, &[&one, &two], PREC),
            Err(LatticeError::DependentBasis)
        );
    }

    #[test]
    fn target_multiplier_must_be_unit() {
        let row = |values: &[i64]| -> Vec<Integer> {
            values.iter().map(|&v| Integer::from(v)).collect()
        };

        assert_eq!(multipliers(&row(&[3, -2, 1])), Ok(row(&[-3, 2])));
        assert_eq!(multipliers(&row(&[3, -2, -1])), Ok(row(&[3, -2])));
        assert_eq!(
            multipliers(&row(&[3, -2, 2])),
            Err(LatticeError::DegenerateEmbedding(Integer::from(2)))
        );
        assert_eq!(
            multipliers(&row(&[5, 0])),
            Err(LatticeError::DegenerateEmbedding(Integer::ZERO))
        );
    }

    #[test]
    fn weight_is_ceiling_of_norm() {
        let entries = [[3, 4], [1, 1], [9, 9]];
        let lattice = Matrix::from_fn(3, 2, |i, j| Integer::from(entries[i][j]));

        assert_eq!(embedding_weight(&lattice, 2), Integer::from(5));
        assert_eq!(embedding_weight(&lattice, 0), Integer::ONE);

        let lattice = Matrix::from_fn(1, 2, |_, _| Integer::from(2));

        assert_eq!(embedding_weight(&lattice, 1), Integer::from(3));
    }
}
