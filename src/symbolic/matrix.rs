use crate::ast::{output, Node};
use crate::diagnostics::Result;
use crate::yovec_err;

use super::number::{register_name, SimpleNumber};
use super::ops::{BinaryOp, UnaryOp};
use super::vector::SimpleVector;

/// A row-major matrix of deferred scalar expressions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimpleMatrix {
    rows: Vec<SimpleVector>,
    cols: usize,
}

impl SimpleMatrix {
    /// Builds a matrix from rows; every row must have the same length.
    pub fn new(rows: Vec<SimpleVector>) -> Result<Self> {
        let cols = rows.first().map(SimpleVector::len).unwrap_or(0);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(yovec_err!(
                ShapeMismatch,
                "matrix row {} has length {}, expected {}",
                i,
                row.len(),
                cols
            ));
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row_vectors(&self) -> &[SimpleVector] {
        &self.rows
    }

    pub fn map(&self, op: UnaryOp) -> Self {
        self.each_row(|row| row.map(op))
    }

    pub fn matunary(&self, op: UnaryOp) -> Self {
        self.map(op)
    }

    /// Element-wise binary op over matrices of identical dimensions.
    pub fn matbinary(&self, op: BinaryOp, rhs: &SimpleMatrix) -> Result<Self> {
        if self.rows() != rhs.rows() || self.cols != rhs.cols {
            return Err(yovec_err!(
                ShapeMismatch,
                "cannot apply '{}' to matrices of {}x{} and {}x{}",
                op,
                self.rows(),
                self.cols,
                rhs.rows(),
                rhs.cols
            ));
        }
        let rows = self
            .rows
            .iter()
            .zip(&rhs.rows)
            .map(|(l, r)| l.vecbinary(op, r))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            rows,
            cols: self.cols,
        })
    }

    pub fn premap(&self, op: BinaryOp, scalar: &SimpleNumber) -> Self {
        self.each_row(|row| row.premap(op, scalar))
    }

    pub fn postmap(&self, scalar: &SimpleNumber, op: BinaryOp) -> Self {
        self.each_row(|row| row.postmap(scalar, op))
    }

    pub fn transpose(&self) -> Self {
        let rows = (0..self.cols)
            .map(|c| {
                SimpleVector::new(
                    self.rows
                        .iter()
                        .map(|row| row.elements()[c].clone())
                        .collect(),
                )
            })
            .collect();
        Self {
            rows,
            cols: self.rows(),
        }
    }

    /// Matrix product; each element is the dot product of a row and a column.
    pub fn matmul(&self, rhs: &SimpleMatrix) -> Result<Self> {
        if self.cols != rhs.rows() {
            return Err(yovec_err!(
                ShapeMismatch,
                "cannot multiply {}x{} matrix by {}x{} matrix",
                self.rows(),
                self.cols,
                rhs.rows(),
                rhs.cols
            ));
        }
        let columns = rhs.transpose();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                columns
                    .rows
                    .iter()
                    .map(|col| row.dot(col))
                    .collect::<Result<Vec<_>>>()
                    .map(SimpleVector::new)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            rows,
            cols: rhs.cols,
        })
    }

    /// Materializes every element into register `index`, flattened row-major.
    pub fn assign(&self, index: usize) -> (Vec<Node>, SimpleMatrix) {
        let mut statements = Vec::with_capacity(self.rows() * self.cols);
        let mut rows = Vec::with_capacity(self.rows());
        for (r, row) in self.rows.iter().enumerate() {
            let mut residual = Vec::with_capacity(self.cols);
            for (c, element) in row.elements().iter().enumerate() {
                let name = register_name(index, Some(r * self.cols + c));
                statements.push(output::assign(&name, element.expr().to_node()));
                residual.push(SimpleNumber::variable(name));
            }
            rows.push(SimpleVector::new(residual));
        }
        (
            statements,
            SimpleMatrix {
                rows,
                cols: self.cols,
            },
        )
    }

    fn each_row<F>(&self, f: F) -> Self
    where
        F: Fn(&SimpleVector) -> SimpleVector,
    {
        Self {
            rows: self.rows.iter().map(f).collect(),
            cols: self.cols,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::output::render_assignment;
    use crate::diagnostics::ErrorKind;
    use crate::symbolic::Number;

    fn matrix(rows: &[&[i64]]) -> SimpleMatrix {
        SimpleMatrix::new(
            rows.iter()
                .map(|r| {
                    SimpleVector::new(
                        r.iter()
                            .map(|&i| SimpleNumber::number(Number::Int(i)))
                            .collect(),
                    )
                })
                .collect(),
        )
        .unwrap()
    }

    fn rendered(m: &SimpleMatrix, index: usize) -> Vec<String> {
        m.assign(index).0.iter().map(render_assignment).collect()
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = vec![
            SimpleVector::new(vec![SimpleNumber::number(Number::Int(1))]),
            SimpleVector::default(),
        ];
        assert_eq!(
            SimpleMatrix::new(rows).unwrap_err().kind(),
            ErrorKind::ShapeMismatch
        );
    }

    #[test]
    fn test_assign_flattens_row_major() {
        assert_eq!(
            rendered(&matrix(&[&[1, 2], &[3, 4]]), 0),
            vec!["v0e0=1", "v0e1=2", "v0e2=3", "v0e3=4"]
        );
    }

    #[test]
    fn test_transpose_swaps_dimensions() {
        let t = matrix(&[&[1, 2, 3], &[4, 5, 6]]).transpose();
        assert_eq!((t.rows(), t.cols()), (3, 2));
        assert!(t.row_vectors().iter().all(|r| r.len() == 2));
        assert_eq!(
            rendered(&t, 1),
            vec!["v1e0=1", "v1e1=4", "v1e2=2", "v1e3=5", "v1e4=3", "v1e5=6"]
        );
    }

    #[test]
    fn test_matmul_dot_products() {
        let product = matrix(&[&[1, 2]])
            .matmul(&matrix(&[&[3], &[4]]))
            .unwrap();
        assert_eq!(rendered(&product, 0), vec!["v0e0=(1*3)+(2*4)"]);
        let err = matrix(&[&[1, 2]]).matmul(&matrix(&[&[1, 2]])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    }

    #[test]
    fn test_matbinary_requires_same_dimensions() {
        let sum = matrix(&[&[1], &[2]])
            .matbinary(BinaryOp::Add, &matrix(&[&[3], &[4]]))
            .unwrap();
        assert_eq!(rendered(&sum, 2), vec!["v2e0=1+3", "v2e1=2+4"]);
        let err = matrix(&[&[1, 2]])
            .matbinary(BinaryOp::Add, &matrix(&[&[1], &[2]]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    }
}
