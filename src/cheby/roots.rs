//! Real roots of Chebyshev series.
//!
//! Roots are the eigenvalues of the colleague matrix, the Chebyshev analogue
//! of the companion matrix.

use nalgebra::DMatrix;

/// Eigenvalues with a larger imaginary part are not real roots.
const IMAGINARY_THRESHOLD: f64 = 1e-20;

/// Balancing stops once no rescaling reduces a norm sum below this ratio.
const BALANCE_RATIO: f64 = 0.95;

/// The Chebyshev polynomials in which coefficients are expressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Kind {
    #[default]
    First,
    Second,
}

/// Finds the real roots of a Chebyshev series inside an interval.
#[derive(Clone, Copy, Debug)]
pub struct RootFinder {
    pub kind: Kind,
    pub balance: bool,
    pub lo: f64,
    pub hi: f64,
}

impl Default for RootFinder {
    fn default() -> Self {
        RootFinder {
            kind: Kind::First,
            balance: true,
            lo: -1.0,
            hi: 1.0,
        }
    }
}

impl RootFinder {
    /// Returns the real roots of `sum coeffs[k] P_k` in `[lo, hi]`, sorted
    /// ascending.
    ///
    /// The leading coefficient must be nonzero. Constant series have no
    /// roots.
    pub fn roots(&self, coeffs: &[f64]) -> Vec<f64> {
        match coeffs {
            [] | [_] => return Vec::new(),
            [a, b] => return self.linear_root(*a, *b).into_iter().collect(),
            _ => {}
        }

        let mut matrix = colleague(coeffs, self.kind);

        if self.balance {
            balance(&mut matrix);
        }

        let mut roots: Vec<f64> = matrix
            .complex_eigenvalues()
            .iter()
            .filter(|z| z.im.abs() < IMAGINARY_THRESHOLD)
            .map(|z| z.re)
            .filter(|&x| self.lo <= x && x <= self.hi)
            .collect();

        roots.sort_by(f64::total_cmp);

        roots
    }

    /// The root of `a P_0 + b P_1` if it lies in `[lo, hi]`.
    fn linear_root(&self, a: f64, b: f64) -> Option<f64> {
        // T_1 = x and U_1 = 2x.
        let t = match self.kind {
            Kind::First => -a / b,
            Kind::Second => -a / (2.0 * b),
        };

        (self.lo <= t && t <= self.hi).then_some(t)
    }
}

/// Builds the colleague matrix of a series of degree `n >= 2`.
///
/// # Panics
///
/// Panics if the series has fewer than three coefficients.
pub fn colleague(coeffs: &[f64], kind: Kind) -> DMatrix<f64> {
    assert!(coeffs.len() >= 3, "colleague matrix needs degree at least 2");

    let n = coeffs.len() - 1;
    let scale = -0.5 / coeffs[n];

    let mut c: Vec<f64> = coeffs[..n].iter().map(|a| a * scale).collect();
    c[n - 2] += 0.5;

    let mut matrix = DMatrix::zeros(n, n);

    for i in 0..n - 1 {
        matrix[(i, i + 1)] = 0.5;
        matrix[(i + 1, i)] = 0.5;
    }

    if kind == Kind::First {
        matrix[(n - 2, n - 1)] = 1.0;
    }

    for i in 0..n {
        matrix[(i, 0)] = c[n - i - 1];
    }

    matrix
}

/// Applies radix-2 diagonal similarity scaling to equalize row and column
/// norms.
pub fn balance(matrix: &mut DMatrix<f64>) {
    let n = matrix.nrows();

    let mut converged = false;

    while !converged {
        converged = true;

        for i in 0..n {
            let mut row = 0.0;
            let mut col = 0.0;

            for j in (0..n).filter(|&j| j != i) {
                col += matrix[(j, i)].abs();
                row += matrix[(i, j)].abs();
            }

            if col == 0.0 || row == 0.0 {
                continue;
            }

            let sum = col + row;
            let mut f = 1.0;

            while col.is_finite() && col < row / 2.0 {
                f *= 2.0;
                col *= 4.0;
            }

            while col.is_finite() && col > row * 2.0 {
                f /= 2.0;
                col /= 4.0;
            }

            if (row + col) / f < BALANCE_RATIO * sum {
                converged = false;

                for j in 0..n {
                    matrix[(i, j)] /= f;
                    matrix[(j, i)] *= f;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_roots(found: &[f64], expected: &[f64]) {
        assert_eq!(found.len(), expected.len(), "roots {found:?}");

        for (a, b) in found.iter().zip(expected) {
            assert!((a - b).abs() < 1e-12, "root {a} vs {b}");
        }
    }

    #[test]
    fn quadratic_first_kind() {
        // (x - 0.3)(x - 0.7) = 0.5 T_2 - T_1 + 0.71 T_0
        let roots = RootFinder::default().roots(&[0.71, -1.0, 0.5]);

        assert_roots(&roots, &[0.3, 0.7]);
    }

    #[test]
    fn quadratic_second_kind() {
        // (x - 0.3)(x - 0.7) = 0.25 U_2 - 0.5 U_1 + 0.46 U_0
        let finder = RootFinder {
            kind: Kind::Second,
            ..RootFinder::default()
        };

        assert_roots(&finder.roots(&[0.46, -0.5, 0.25]), &[0.3, 0.7]);
    }

    #[test]
    fn low_degrees() {
        let second = RootFinder {
            kind: Kind::Second,
            ..RootFinder::default()
        };

        assert!(RootFinder::default().roots(&[]).is_empty());
        assert!(RootFinder::default().roots(&[2.0]).is_empty());
        assert_eq!(RootFinder::default().roots(&[0.5, -1.0]), vec![0.5]);
        assert_eq!(second.roots(&[0.5, -1.0]), vec![0.25]);
        assert!(RootFinder::default().roots(&[3.0, 1.0]).is_empty());
    }

    #[test]
    fn complex_and_outside_roots_dropped() {
        // x^2 + 1 = 0.5 T_2 + 1.5 T_0
        assert!(RootFinder::default().roots(&[1.5, 0.0, 0.5]).is_empty());

        // (x - 0.5)(x - 3) = 0.5 T_2 - 3.5 T_1 + 2 T_0
        let roots = RootFinder::default().roots(&[2.0, -3.5, 0.5]);

        assert_roots(&roots, &[0.5]);
    }

    #[test]
    fn balancing_preserves_spectrum() {
        let expected = [-0.8, -0.1, 0.25, 0.9];

        let samples: Vec<f64> = crate::cheby::nodes(5)
            .into_iter()
            .map(|x| 1e-3 * expected.iter().map(|r| x - r).product::<f64>())
            .collect();

        let coeffs = crate::cheby::coefficients(&samples);

        for balance in [false, true] {
            let finder = RootFinder {
                balance,
                ..RootFinder::default()
            };

            assert_roots(&finder.roots(&coeffs), &expected);
        }
    }
}
