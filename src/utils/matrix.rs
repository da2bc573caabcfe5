//! Dense row-major matrices.

use std::ops::{Index, IndexMut};

/// A dense matrix stored in row-major order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Clone> Matrix<T> {
    /// Constructs a `rows` by `cols` matrix with every entry set to `value`.
    pub fn new(rows: usize, cols: usize, value: T) -> Matrix<T> {
        Matrix {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Reshapes the matrix in place, reusing its allocation, and sets every
    /// entry to `value`.
    pub fn reset(&mut self, rows: usize, cols: usize, value: T) {
        self.rows = rows;
        self.cols = cols;
        self.data.clear();
        self.data.resize(rows * cols, value);
    }
}

impl<T> Matrix<T> {
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Matrix<T>
    where
        F: FnMut(usize, usize) -> T,
    {
        let data = (0..rows)
            .flat_map(|i| (0..cols).map(move |j| (i, j)))
            .map(|(i, j)| f(i, j))
            .collect();

        Matrix { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Iterates over all entries in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn row(&self, i: usize) -> &[T] {
        debug_assert!(i < self.rows, "row {i} out of bounds");

        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        debug_assert!(i < self.rows, "row {i} out of bounds");

        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Returns row `i` mutably together with row `j` immutably.
    pub fn row_pair_mut(&mut self, i: usize, j: usize) -> (&mut [T], &[T]) {
        assert_ne!(i, j);
        debug_assert!(i < self.rows && j < self.rows);

        let cols = self.cols;

        if i < j {
            let (head, tail) = self.data.split_at_mut(j * cols);

            (&mut head[i * cols..(i + 1) * cols], &tail[..cols])
        } else {
            let (head, tail) = self.data.split_at_mut(i * cols);

            (&mut tail[..cols], &head[j * cols..(j + 1) * cols])
        }
    }

    pub fn swap_rows(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }

        for k in 0..self.cols {
            self.data.swap(i * self.cols + k, j * self.cols + k);
        }
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        assert!(
            i < self.rows && j < self.cols,
            "index ({i}, {j}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols,
        );

        &self.data[i * self.cols + j]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        assert!(
            i < self.rows && j < self.cols,
            "index ({i}, {j}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols,
        );

        &mut self.data[i * self.cols + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_layout() {
        let m = Matrix::from_fn(2, 3, |i, j| 10 * i + j);

        assert_eq!(m.row(0), &[0, 1, 2]);
        assert_eq!(m.row(1), &[10, 11, 12]);
        assert_eq!(m[(1, 2)], 12);
    }

    #[test]
    fn reset_reshapes() {
        let mut m = Matrix::new(4, 4, 1);

        m.reset(2, 5, 0);

        assert_eq!((m.rows(), m.cols()), (2, 5));
        assert!(m.row(1).iter().all(|&x| x == 0));
    }

    #[test]
    fn row_pairs() {
        let mut m = Matrix::from_fn(3, 2, |i, j| i * 2 + j);

        let (dst, src) = m.row_pair_mut(2, 0);
        dst[0] += src[1];

        assert_eq!(m[(2, 0)], 5);

        m.swap_rows(0, 2);

        assert_eq!(m.row(0), &[5, 5]);
        assert_eq!(m.row(2), &[0, 1]);
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_column() {
        let m = Matrix::new(2, 2, 0);

        let _ = m[(0, 2)];
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_column_mut() {
        let mut m = Matrix::new(2, 2, 0);

        m[(0, 3)] = 1;
    }
}
