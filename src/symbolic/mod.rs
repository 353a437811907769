//! Symbolic value model.
//!
//! Numbers, vectors and matrices are deferred element-wise expression trees.
//! Nothing is emitted until `assign(index)` flattens a value into concrete
//! assignment statements and hands back a read-back residual of the same shape.

pub mod matrix;
pub mod number;
pub mod ops;
pub mod vector;

pub use matrix::SimpleMatrix;
pub use number::{is_reserved_name, register_name, register_prefix, Number, Scalar, SimpleNumber};
pub use ops::{BinaryOp, UnaryOp};
pub use vector::SimpleVector;

use crate::ast::Node;
use crate::diagnostics::Result;
use crate::yovec_err;

/// Result of lowering an expression, tagged by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(SimpleNumber),
    Vector(SimpleVector),
    Matrix(SimpleMatrix),
}

impl Value {
    pub fn shape_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Vector(_) => "vector",
            Value::Matrix(_) => "matrix",
        }
    }

    /// Number of scalar slots this value occupies once assigned.
    pub fn width(&self) -> usize {
        match self {
            Value::Number(_) => 1,
            Value::Vector(v) => v.len(),
            Value::Matrix(m) => m.rows() * m.cols(),
        }
    }

    pub fn expect_number(self, context: &str) -> Result<SimpleNumber> {
        match self {
            Value::Number(n) => Ok(n),
            other => Err(other.mismatch("number", context)),
        }
    }

    pub fn expect_vector(self, context: &str) -> Result<SimpleVector> {
        match self {
            Value::Vector(v) => Ok(v),
            other => Err(other.mismatch("vector", context)),
        }
    }

    pub fn expect_matrix(self, context: &str) -> Result<SimpleMatrix> {
        match self {
            Value::Matrix(m) => Ok(m),
            other => Err(other.mismatch("matrix", context)),
        }
    }

    pub fn assign(&self, index: usize) -> (Vec<Node>, Value) {
        match self {
            Value::Number(n) => {
                let (stmts, residual) = n.assign(index);
                (stmts, Value::Number(residual))
            }
            Value::Vector(v) => {
                let (stmts, residual) = v.assign(index);
                (stmts, Value::Vector(residual))
            }
            Value::Matrix(m) => {
                let (stmts, residual) = m.assign(index);
                (stmts, Value::Matrix(residual))
            }
        }
    }

    fn mismatch(&self, expected: &str, context: &str) -> crate::diagnostics::YovecError {
        yovec_err!(
            TypeMismatch,
            "{} expected a {}, but got a {}",
            context,
            expected,
            self.shape_name()
        )
    }
}
