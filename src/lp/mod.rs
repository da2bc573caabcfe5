//! Exact linear programming.
//!
//! Programs have the form: minimize `c . v` subject to `A v <= r`, with all
//! variables free. Bounds on a variable are expressed as constraint rows.
//!
//! The solver runs a two-phase tableau simplex with Bland's rule on the dual
//! program, minimize `r . y` subject to `A^T y = -c`, `y >= 0`, and reads the
//! primal solution off the simplex multipliers of the artificial columns. All
//! arithmetic is exact.

use std::fmt;

use malachite::num::basic::traits::{One, Zero};
use malachite::Rational;

use crate::utils::Matrix;

/// Outcome of a solve that has no optimal solution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LpStatus {
    /// The constraints admit no solution.
    Infeasible,
    /// The dual program is infeasible, so the program is unbounded below if it
    /// has any feasible point.
    InfeasibleOrUnbounded,
}

impl fmt::Display for LpStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let description = match self {
            LpStatus::Infeasible => "infeasible",
            LpStatus::InfeasibleOrUnbounded => "infeasible or unbounded",
        };

        write!(f, "{}", description)
    }
}

/// An optimal point and the objective value there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    pub values: Vec<Rational>,
    pub objective: Rational,
}

/// Inequality constraints `A v <= r`.
#[derive(Clone, Debug, Default)]
pub struct LinearProgram {
    pub constraints: Matrix<Rational>,
    pub rhs: Vec<Rational>,
}

impl LinearProgram {
    /// Clears all constraints, keeping the allocated storage.
    pub fn reset(&mut self, rows: usize, vars: usize) {
        self.constraints.reset(rows, vars, Rational::ZERO);
        self.rhs.clear();
        self.rhs.resize(rows, Rational::ZERO);
    }

    pub fn vars(&self) -> usize {
        self.constraints.cols()
    }

    /// Minimizes `objective . v` over the feasible region.
    pub fn minimize(
        &self,
        objective: &[Rational],
    ) -> Result<Solution, LpStatus> {
        assert_eq!(objective.len(), self.vars(), "objective length mismatch");

        let rows = self.constraints.rows();
        let vars = self.vars();

        let mut tableau = Matrix::new(vars, rows + vars + 1, Rational::ZERO);
        let mut flipped = Vec::with_capacity(vars);

        // Row i of the dual is column i of A, negated when needed to keep the
        // right-hand side nonnegative.
        for (i, c) in objective.iter().enumerate() {
            let flip = *c > Rational::ZERO;
            let row = tableau.row_mut(i);

            for (j, entry) in row.iter_mut().take(rows).enumerate() {
                let a = &self.constraints[(j, i)];

                *entry = if flip { -a } else { a.clone() };
            }

            row[rows + i] = Rational::ONE;
            row[rows + vars] = if flip { c.clone() } else { -c };

            flipped.push(flip);
        }

        let mut simplex = Simplex {
            basis: (rows..rows + vars).collect(),
            costs: vec![Rational::ZERO; rows + vars + 1],
            tableau,
            artificial: rows,
        };

        simplex.price(|j| if j < rows { Rational::ZERO } else { Rational::ONE });

        if simplex.optimize(rows + vars).is_err()
            || simplex.value() != Rational::ZERO
        {
            return Err(LpStatus::InfeasibleOrUnbounded);
        }

        simplex.drive_out_artificials();
        simplex.price(|j| {
            if j < rows {
                self.rhs[j].clone()
            } else {
                Rational::ZERO
            }
        });

        if simplex.optimize(rows).is_err() {
            return Err(LpStatus::Infeasible);
        }

        let values: Vec<Rational> = flipped
            .iter()
            .enumerate()
            .map(|(i, &flip)| {
                let multiplier = &simplex.costs[rows + i];

                if flip {
                    multiplier.clone()
                } else {
                    -multiplier
                }
            })
            .collect();

        let objective = objective
            .iter()
            .zip(&values)
            .fold(Rational::ZERO, |acc, (c, v)| acc + c * v);

        Ok(Solution { values, objective })
    }
}

struct Unbounded;

/// A simplex tableau in equality form with the right-hand side stored in the
/// last column.
struct Simplex {
    tableau: Matrix<Rational>,
    basis: Vec<usize>,
    /// Reduced costs, followed by the negated objective value.
    costs: Vec<Rational>,
    /// Index of the first artificial column.
    artificial: usize,
}

impl Simplex {
    fn width(&self) -> usize {
        self.tableau.cols() - 1
    }

    fn value(&self) -> Rational {
        -&self.costs[self.width()]
    }

    /// Recomputes reduced costs for the cost vector `cost` and the current
    /// basis.
    fn price<F>(&mut self, cost: F)
    where
        F: Fn(usize) -> Rational,
    {
        let width = self.width();

        for (j, d) in self.costs.iter_mut().enumerate().take(width) {
            *d = cost(j);
        }

        self.costs[width] = Rational::ZERO;

        for (r, &b) in self.basis.iter().enumerate() {
            let weight = cost(b);

            if weight == Rational::ZERO {
                continue;
            }

            for (d, t) in self.costs.iter_mut().zip(self.tableau.row(r)) {
                if *t != Rational::ZERO {
                    *d -= &weight * t;
                }
            }
        }
    }

    /// Pivots until no column below `limit` has a negative reduced cost.
    fn optimize(&mut self, limit: usize) -> Result<(), Unbounded> {
        let last = self.width();

        loop {
            let Some(j) = (0..limit).find(|&j| self.costs[j] < Rational::ZERO)
            else {
                return Ok(());
            };

            let mut leaving: Option<(usize, Rational)> = None;

            for r in 0..self.tableau.rows() {
                let a = &self.tableau[(r, j)];

                if *a <= Rational::ZERO {
                    continue;
                }

                let ratio = &self.tableau[(r, last)] / a;

                let better = match &leaving {
                    None => true,
                    Some((s, best)) => {
                        ratio < *best
                            || (ratio == *best && self.basis[r] < self.basis[*s])
                    }
                };

                if better {
                    leaving = Some((r, ratio));
                }
            }

            let Some((r, _)) = leaving else {
                return Err(Unbounded);
            };

            self.pivot(r, j);
        }
    }

    /// Replaces artificial basic variables at zero level with structural ones
    /// where the row allows it.
    fn drive_out_artificials(&mut self) {
        for r in 0..self.tableau.rows() {
            if self.basis[r] < self.artificial {
                continue;
            }

            let column = (0..self.artificial)
                .find(|&j| self.tableau[(r, j)] != Rational::ZERO);

            if let Some(j) = column {
                self.pivot(r, j);
            }
        }
    }

    fn pivot(&mut self, r: usize, j: usize) {
        let pivot = self.tableau[(r, j)].clone();

        for x in self.tableau.row_mut(r) {
            if *x != Rational::ZERO {
                *x /= &pivot;
            }
        }

        for i in 0..self.tableau.rows() {
            if i == r {
                continue;
            }

            let factor = self.tableau[(i, j)].clone();

            if factor == Rational::ZERO {
                continue;
            }

            let (dst, src) = self.tableau.row_pair_mut(i, r);

            for (d, s) in dst.iter_mut().zip(src) {
                if *s != Rational::ZERO {
                    *d -= &factor * s;
                }
            }
        }

        let factor = self.costs[j].clone();

        if factor != Rational::ZERO {
            for (d, s) in self.costs.iter_mut().zip(self.tableau.row(r)) {
                if *s != Rational::ZERO {
                    *d -= &factor * s;
                }
            }
        }

        self.basis[r] = j;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: i64, d: i64) -> Rational {
        Rational::from_signeds(n, d)
    }

    fn program(rows: &[(&[i64], i64)]) -> LinearProgram {
        let vars = rows[0].0.len();
        let mut lp = LinearProgram::default();

        lp.reset(rows.len(), vars);

        for (i, (coeffs, rhs)) in rows.iter().enumerate() {
            for (j, &a) in coeffs.iter().enumerate() {
                lp.constraints[(i, j)] = Rational::from(a);
            }

            lp.rhs[i] = Rational::from(*rhs);
        }

        lp
    }

    #[test]
    fn bounded_vertex() {
        let lp = program(&[
            (&[1, 2], 4),
            (&[3, 1], 6),
            (&[-1, 0], 0),
            (&[0, -1], 0),
        ]);

        let solution = lp.minimize(&[q(-1, 1), q(-1, 1)]).unwrap();

        assert_eq!(solution.values, vec![q(8, 5), q(6, 5)]);
        assert_eq!(solution.objective, q(-14, 5));
    }

    #[test]
    fn free_variables() {
        // minimize t subject to |v - 2| <= t + 1
        let lp = program(&[(&[1, -1], 3), (&[-1, -1], -1)]);

        let solution = lp.minimize(&[q(0, 1), q(1, 1)]).unwrap();

        assert_eq!(solution.values, vec![q(2, 1), q(-1, 1)]);
        assert_eq!(solution.objective, q(-1, 1));
    }

    #[test]
    fn infeasible() {
        let lp = program(&[(&[1], 1), (&[-1], -2)]);

        assert_eq!(lp.minimize(&[q(1, 1)]), Err(LpStatus::Infeasible));
    }

    #[test]
    fn unbounded() {
        let lp = program(&[(&[-1], 0)]);

        assert_eq!(
            lp.minimize(&[q(-1, 1)]),
            Err(LpStatus::InfeasibleOrUnbounded)
        );
    }

    #[test]
    fn reset_reuses_storage() {
        let mut lp = program(&[(&[1, 2], 4)]);

        lp.reset(2, 1);
        lp.constraints[(0, 0)] = q(1, 1);
        lp.rhs[0] = q(5, 1);
        lp.constraints[(1, 0)] = q(-1, 1);
        lp.rhs[1] = q(-3, 1);

        let solution = lp.minimize(&[q(1, 1)]).unwrap();

        assert_eq!(solution.values, vec![q(3, 1)]);
    }
}
