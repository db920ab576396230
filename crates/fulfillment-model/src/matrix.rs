//! 訂單 × 工人類型的稠密矩陣

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// 以 (訂單索引, 工人類型索引) 定址的稠密矩陣，列優先存放
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableMatrix<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Clone> VariableMatrix<T> {
    /// 以相同初值創建矩陣
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            cells: vec![value; rows * cols],
        }
    }
}

impl<T> VariableMatrix<T> {
    /// 逐格計算創建矩陣
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(f(row, col));
            }
        }
        Self { rows, cols, cells }
    }

    /// 平行計算每一列
    pub fn from_fn_par<F>(rows: usize, cols: usize, f: F) -> Self
    where
        T: Send,
        F: Fn(usize, usize) -> T + Sync,
    {
        let cells = (0..rows * cols)
            .into_par_iter()
            .map(|idx| f(idx / cols.max(1), idx % cols.max(1)))
            .collect();
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        (row < self.rows && col < self.cols).then(|| &self.cells[row * self.cols + col])
    }

    /// 某張訂單在所有工人類型上的值
    pub fn row(&self, row: usize) -> &[T] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// 某個工人類型在所有訂單上的值
    pub fn column(&self, col: usize) -> impl Iterator<Item = &T> + '_ {
        self.cells.iter().skip(col).step_by(self.cols.max(1))
    }

    /// 所有列
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |row| self.row(row))
    }

    /// 攤平成列優先順序的切片
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// 逐格轉換
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> VariableMatrix<U> {
        VariableMatrix {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    /// 檢查維度是否與另一個矩陣相同
    pub fn same_shape<U>(&self, other: &VariableMatrix<U>) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }
}

impl<T> Index<(usize, usize)> for VariableMatrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(col < self.cols, "column {} out of bounds ({})", col, self.cols);
        &self.cells[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for VariableMatrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(col < self.cols, "column {} out of bounds ({})", col, self.cols);
        &mut self.cells[row * self.cols + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_layout() {
        let m = VariableMatrix::from_fn(2, 3, |r, c| r * 10 + c);

        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.row(1), &[10, 11, 12]);
        assert_eq!(m.column(2).copied().collect::<Vec<_>>(), vec![2, 12]);
        assert_eq!(m[(1, 0)], 10);
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(0, 3), None);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let seq = VariableMatrix::from_fn(50, 4, |r, c| (r * c) as f64 / 3.0);
        let par = VariableMatrix::from_fn_par(50, 4, |r, c| (r * c) as f64 / 3.0);

        assert_eq!(seq, par);
    }

    #[test]
    fn test_index_mut_and_map() {
        let mut m = VariableMatrix::filled(2, 2, 0.0);
        m[(0, 1)] = 1.0;
        m[(1, 0)] = 1.0;

        let selected = m.map(|v| *v > 0.5);
        assert_eq!(selected.row(0), &[false, true]);
        assert_eq!(selected.row(1), &[true, false]);
        assert!(selected.same_shape(&m));
    }

    #[test]
    fn test_empty_matrix() {
        let m: VariableMatrix<f64> = VariableMatrix::from_fn_par(0, 3, |_, _| 1.0);
        assert!(m.is_empty());
        assert_eq!(m.iter_rows().count(), 0);
        assert_eq!(m.column(0).count(), 0);
    }
}
