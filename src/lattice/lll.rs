//! Integral LLL reduction.
//!
//! Gram-Schmidt data is kept as integers: `d[i]` is the Gram determinant of
//! the first `i` rows and `lambda[(k, j)] = d[j + 1] * mu[k][j]`, so every
//! division is exact.

use malachite::num::arithmetic::traits::{Abs, DivMod};
use malachite::num::basic::traits::{One, Zero};
use malachite::Integer;

use crate::utils::Matrix;

/// Lovasz parameter, as a fraction of 100.
const DELTA: i64 = 99;
/// Size-reduction parameter, as a fraction of 100.
const ETA: i64 = 51;

/// A reduced basis together with the unimodular transform producing it from
/// the input rows.
#[derive(Clone, Debug)]
pub struct Reduction {
    pub basis: Matrix<Integer>,
    pub transform: Matrix<Integer>,
}

/// The input rows are linearly dependent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DependentRows;

/// LLL-reduces the rows of `basis`.
pub fn reduce(basis: Matrix<Integer>) -> Result<Reduction, DependentRows> {
    let n = basis.rows();

    let mut state = State {
        transform: Matrix::from_fn(n, n, |i, j| {
            if i == j {
                Integer::ONE
            } else {
                Integer::ZERO
            }
        }),
        basis,
        lambda: Matrix::new(n, n, Integer::ZERO),
        d: vec![Integer::ZERO; n + 1],
    };

    if n == 0 {
        return Ok(state.finish());
    }

    state.d[0] = Integer::ONE;
    state.d[1] = dot(state.basis.row(0), state.basis.row(0));

    if state.d[1] == Integer::ZERO {
        return Err(DependentRows);
    }

    let hundred = Integer::from(100);

    let mut k = 1;
    let mut kmax = 0;

    while k < n {
        if k > kmax {
            kmax = k;
            state.orthogonalize(k)?;
        }

        state.size_reduce(k, k - 1);

        let lambda = &state.lambda[(k, k - 1)];
        let left = &hundred * &state.d[k + 1] * &state.d[k - 1];
        let right = Integer::from(DELTA) * &state.d[k] * &state.d[k]
            - &hundred * lambda * lambda;

        if left < right {
            state.swap(k, kmax);
            k = (k - 1).max(1);
        } else {
            for l in (0..k - 1).rev() {
                state.size_reduce(k, l);
            }

            k += 1;
        }
    }

    Ok(state.finish())
}

struct State {
    basis: Matrix<Integer>,
    transform: Matrix<Integer>,
    lambda: Matrix<Integer>,
    d: Vec<Integer>,
}

impl State {
    fn finish(self) -> Reduction {
        Reduction {
            basis: self.basis,
            transform: self.transform,
        }
    }

    /// Computes row `k` of `lambda` and `d[k + 1]`.
    fn orthogonalize(&mut self, k: usize) -> Result<(), DependentRows> {
        for j in 0..=k {
            let mut u = dot(self.basis.row(k), self.basis.row(j));

            for i in 0..j {
                u = (&self.d[i + 1] * u
                    - &self.lambda[(k, i)] * &self.lambda[(j, i)])
                    / &self.d[i];
            }

            if j < k {
                self.lambda[(k, j)] = u;
            } else if u == Integer::ZERO {
                return Err(DependentRows);
            } else {
                self.d[k + 1] = u;
            }
        }

        Ok(())
    }

    fn size_reduce(&mut self, k: usize, l: usize) {
        let lambda = self.lambda[(k, l)].clone();
        let d = &self.d[l + 1];

        if Integer::from(100) * (&lambda).abs() <= Integer::from(ETA) * d {
            return;
        }

        let q = nearest_quotient(&lambda, d);

        subtract_row(&mut self.basis, k, l, &q);
        subtract_row(&mut self.transform, k, l, &q);

        self.lambda[(k, l)] = lambda - &q * d;

        for i in 0..l {
            let delta = &q * &self.lambda[(l, i)];

            self.lambda[(k, i)] -= delta;
        }
    }

    fn swap(&mut self, k: usize, kmax: usize) {
        self.basis.swap_rows(k, k - 1);
        self.transform.swap_rows(k, k - 1);

        for j in 0..k - 1 {
            let upper = self.lambda[(k, j)].clone();
            let lower = std::mem::replace(&mut self.lambda[(k - 1, j)], upper);

            self.lambda[(k, j)] = lower;
        }

        let lambda = self.lambda[(k, k - 1)].clone();

        let b = (&self.d[k - 1] * &self.d[k + 1] + &lambda * &lambda)
            / &self.d[k];

        for i in k + 1..=kmax {
            let t = self.lambda[(i, k)].clone();

            self.lambda[(i, k)] = (&self.d[k + 1] * &self.lambda[(i, k - 1)]
                - &lambda * &t)
                / &self.d[k];

            self.lambda[(i, k - 1)] =
                (&b * t + &lambda * &self.lambda[(i, k)]) / &self.d[k + 1];
        }

        self.d[k] = b;
    }
}

fn dot(a: &[Integer], b: &[Integer]) -> Integer {
    a.iter()
        .zip(b)
        .fold(Integer::ZERO, |acc, (x, y)| acc + x * y)
}

/// Computes `a / b` rounded to nearest for positive `b`.
fn nearest_quotient(a: &Integer, b: &Integer) -> Integer {
    let twice = b << 1u64;

    ((a << 1u64) + b).div_mod(twice).0
}

fn subtract_row(m: &mut Matrix<Integer>, k: usize, l: usize, q: &Integer) {
    let (dst, src) = m.row_pair_mut(k, l);

    for (x, y) in dst.iter_mut().zip(src) {
        *x -= q * y;
    }
}

#[cfg(test)]
mod tests {
    use malachite::Rational;

    use super::*;

    fn matrix(rows: &[&[i64]]) -> Matrix<Integer> {
        Matrix::from_fn(rows.len(), rows[0].len(), |i, j| {
            Integer::from(rows[i][j])
        })
    }

    fn gram_schmidt(
        m: &Matrix<Integer>,
    ) -> (Vec<Rational>, Matrix<Rational>) {
        let n = m.rows();

        let mut norms = Vec::new();
        let mut ortho: Vec<Vec<Rational>> = Vec::new();
        let mut mu = Matrix::new(n, n, Rational::ZERO);

        for i in 0..n {
            let mut v: Vec<Rational> =
                m.row(i).iter().map(Rational::from).collect();

            for j in 0..i {
                let num = m.row(i).iter().zip(&ortho[j]).fold(
                    Rational::ZERO,
                    |acc, (a, b)| acc + Rational::from(a) * b,
                );

                mu[(i, j)] = num / &norms[j];

                for (x, y) in v.iter_mut().zip(&ortho[j]) {
                    *x -= &mu[(i, j)] * y;
                }
            }

            norms.push(v.iter().fold(Rational::ZERO, |acc, x| acc + x * x));
            ortho.push(v);
        }

        (norms, mu)
    }

    fn assert_reduced(original: &Matrix<Integer>, result: &Reduction) {
        let n = original.rows();
        let (norms, mu) = gram_schmidt(&result.basis);

        for i in 0..n {
            for j in 0..i {
                let bound = Rational::from_signeds(ETA, 100);

                assert!(
                    Rational::from_signeds(-ETA, 100) <= mu[(i, j)]
                        && mu[(i, j)] <= bound,
                    "mu[{i}][{j}] not size reduced"
                );
            }

            if i > 0 {
                let mu = &mu[(i, i - 1)];
                let lhs = &norms[i] + mu * mu * &norms[i - 1];
                let delta = Rational::from_signeds(DELTA, 100);

                assert!(lhs >= delta * &norms[i - 1], "row {i} fails Lovasz");
            }
        }

        // transform * original == reduced
        for i in 0..n {
            for j in 0..original.cols() {
                let product = (0..n).fold(Integer::ZERO, |acc, k| {
                    acc + &result.transform[(i, k)] * &original[(k, j)]
                });

                assert_eq!(product, result.basis[(i, j)]);
            }
        }
    }

    #[test]
    fn reduces_small_basis() {
        let basis = matrix(&[&[1, 1, 1], &[-1, 0, 2], &[3, 5, 6]]);
        let result = reduce(basis.clone()).unwrap();

        assert_reduced(&basis, &result);

        let first = result.basis.row(0);

        assert_eq!(dot(first, first), Integer::ONE);
    }

    #[test]
    fn reduces_knapsack_style_basis() {
        let basis = matrix(&[
            &[1, 0, 0, 0, 1_000_003],
            &[0, 1, 0, 0, 1_999_993],
            &[0, 0, 1, 0, 2_999_999],
            &[0, 0, 0, 1, -4_000_037],
        ]);

        let result = reduce(basis.clone()).unwrap();

        assert_reduced(&basis, &result);
    }

    #[test]
    fn dependent_rows() {
        let basis = matrix(&[&[1, 2], &[2, 4]]);

        assert_eq!(reduce(basis).unwrap_err(), DependentRows);
    }

    #[test]
    fn quotient_rounding() {
        let q = |a: i64, b: i64| {
            nearest_quotient(&Integer::from(a), &Integer::from(b))
        };

        assert_eq!(q(7, 2), Integer::from(4));
        assert_eq!(q(-7, 2), Integer::from(-3));
        assert_eq!(q(-8, 3), Integer::from(-3));
        assert_eq!(q(5, 3), Integer::from(2));
    }
}
