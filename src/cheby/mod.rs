//! Chebyshev interpolation on [-1, 1].
//!
//! Interpolants are built and differentiated in binary64; callers map
//! abscissas to and from their own domains in exact arithmetic.

pub mod roots;

use std::f64::consts::PI;

pub use roots::{Kind, RootFinder};

/// The `n` Chebyshev extrema on [-1, 1], ordered from 1 down to -1.
///
/// Nodes are computed as `sin(pi (n - 1 - 2i) / (2 (n - 1)))`, which is
/// symmetric about the origin and exact at the centre.
pub fn nodes(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let m = (n - 1) as f64;

            (0..n)
                .map(|i| (PI * (m - 2.0 * i as f64) / (2.0 * m)).sin())
                .collect()
        }
    }
}

/// Computes the first-kind coefficients of the interpolant through `values`,
/// sampled at `nodes(values.len())`.
pub fn coefficients(values: &[f64]) -> Vec<f64> {
    let n = values.len().saturating_sub(1);

    if n == 0 {
        return values.to_vec();
    }

    let scale = 2.0 / n as f64;

    (0..=n)
        .map(|k| {
            let sum: f64 = values
                .iter()
                .enumerate()
                .map(|(j, v)| {
                    let weight = if j == 0 || j == n { 0.5 } else { 1.0 };
                    let angle = PI * ((j * k) % (2 * n)) as f64 / n as f64;

                    weight * v * angle.cos()
                })
                .sum();

            if k == 0 || k == n {
                scale * sum / 2.0
            } else {
                scale * sum
            }
        })
        .collect()
}

/// Evaluates a first-kind series at `nodes(coeffs.len())`.
pub fn values(coeffs: &[f64]) -> Vec<f64> {
    nodes(coeffs.len())
        .into_iter()
        .map(|x| clenshaw(coeffs, x))
        .collect()
}

/// Evaluates `sum c_k T_k(x)`.
pub fn clenshaw(coeffs: &[f64], x: f64) -> f64 {
    let Some((&first, rest)) = coeffs.split_first() else {
        return 0.0;
    };

    let (b1, b2) = recurrence(rest, x);

    first + x * b1 - b2
}

/// Evaluates `sum c_k U_k(x)`.
pub fn clenshaw_second_kind(coeffs: &[f64], x: f64) -> f64 {
    let Some((&first, rest)) = coeffs.split_first() else {
        return 0.0;
    };

    let (b1, b2) = recurrence(rest, x);

    first + 2.0 * x * b1 - b2
}

fn recurrence(coeffs: &[f64], x: f64) -> (f64, f64) {
    coeffs.iter().rev().fold((0.0, 0.0), |(b1, b2), &c| {
        (c + 2.0 * x * b1 - b2, b1)
    })
}

/// Computes the first-kind coefficients of the derivative of a first-kind
/// series.
pub fn derivative(coeffs: &[f64]) -> Vec<f64> {
    let n = coeffs.len();

    if n < 2 {
        return Vec::new();
    }

    let mut result = vec![0.0; n - 1];

    for k in (1..n).rev() {
        let next = if k + 1 < n - 1 { result[k + 1] } else { 0.0 };

        result[k - 1] = next + 2.0 * k as f64 * coeffs[k];
    }

    result[0] /= 2.0;

    result
}

/// Computes the second-kind coefficients of the derivative of a first-kind
/// series, using `T_k' = k U_{k-1}`.
pub fn derivative_second_kind(coeffs: &[f64]) -> Vec<f64> {
    coeffs
        .iter()
        .enumerate()
        .skip(1)
        .map(|(k, c)| k as f64 * c)
        .collect()
}
