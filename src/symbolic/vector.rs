use crate::ast::{output, Node};
use crate::diagnostics::Result;
use crate::yovec_err;

use super::number::{register_name, Number, SimpleNumber};
use super::ops::{BinaryOp, UnaryOp};

/// An ordered sequence of deferred scalar expressions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimpleVector {
    elements: Vec<SimpleNumber>,
}

impl SimpleVector {
    pub fn new(elements: Vec<SimpleNumber>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[SimpleNumber] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Applies a unary op to every element.
    pub fn map(&self, op: UnaryOp) -> Self {
        self.each(|e| e.unary(op))
    }

    /// Vector-level unary op; element-wise, same as [`map`](Self::map).
    pub fn vecunary(&self, op: UnaryOp) -> Self {
        self.map(op)
    }

    /// Pairs elements positionally under `op`.
    pub fn vecbinary(&self, op: BinaryOp, rhs: &SimpleVector) -> Result<Self> {
        if self.len() != rhs.len() {
            return Err(yovec_err!(
                ShapeMismatch,
                "cannot apply '{}' to vectors of length {} and {}",
                op,
                self.len(),
                rhs.len()
            ));
        }
        let elements = self
            .elements
            .iter()
            .zip(&rhs.elements)
            .map(|(l, r)| l.binary(op, r))
            .collect();
        Ok(Self { elements })
    }

    /// Broadcasts `scalar` as the left operand: `scalar op e` for every element.
    pub fn premap(&self, op: BinaryOp, scalar: &SimpleNumber) -> Self {
        self.each(|e| scalar.binary(op, e))
    }

    /// Broadcasts `scalar` as the right operand: `e op scalar` for every element.
    pub fn postmap(&self, scalar: &SimpleNumber, op: BinaryOp) -> Self {
        self.each(|e| e.binary(op, scalar))
    }

    pub fn concat(&self, other: &SimpleVector) -> Self {
        let mut elements = self.elements.clone();
        elements.extend(other.elements.iter().cloned());
        Self { elements }
    }

    /// Left-folds `op` across the elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yovec::ast::output::render_expr;
    /// use yovec::symbolic::{BinaryOp, Number, SimpleNumber, SimpleVector};
    /// let v = SimpleVector::new((1..=3).map(|i| SimpleNumber::number(Number::Int(i))).collect());
    /// let sum = v.reduce(BinaryOp::Add).unwrap();
    /// assert_eq!(render_expr(&sum.expr().to_node()), "(1+2)+3");
    /// assert!(SimpleVector::default().reduce(BinaryOp::Add).is_err());
    /// ```
    pub fn reduce(&self, op: BinaryOp) -> Result<SimpleNumber> {
        let (first, rest) = self.elements.split_first().ok_or_else(|| {
            yovec_err!(EmptyReduce, "cannot reduce '{}' over an empty vector", op)
        })?;
        Ok(rest.iter().fold(first.clone(), |acc, e| acc.binary(op, e)))
    }

    pub fn dot(&self, other: &SimpleVector) -> Result<SimpleNumber> {
        self.vecbinary(BinaryOp::Mul, other)?.reduce(BinaryOp::Add)
    }

    /// Three-component cross product.
    pub fn cross(&self, other: &SimpleVector) -> Result<SimpleVector> {
        let (a, b) = match (self.elements.as_slice(), other.elements.as_slice()) {
            ([_, _, _], [_, _, _]) => (&self.elements, &other.elements),
            _ => {
                return Err(yovec_err!(
                    ShapeMismatch,
                    "cross product requires two vectors of length 3, got {} and {}",
                    self.len(),
                    other.len()
                ))
            }
        };
        let component = |i: usize, j: usize| {
            a[i].binary(BinaryOp::Mul, &b[j])
                .binary(BinaryOp::Sub, &a[j].binary(BinaryOp::Mul, &b[i]))
        };
        Ok(Self {
            elements: vec![component(1, 2), component(2, 0), component(0, 1)],
        })
    }

    /// Element count as a compile-time literal.
    pub fn len_number(&self) -> SimpleNumber {
        SimpleNumber::number(Number::Int(self.len() as i64))
    }

    /// Materializes every element into register `index`, ascending.
    pub fn assign(&self, index: usize) -> (Vec<Node>, SimpleVector) {
        let mut statements = Vec::with_capacity(self.len());
        let mut residual = Vec::with_capacity(self.len());
        for (i, element) in self.elements.iter().enumerate() {
            let name = register_name(index, Some(i));
            statements.push(output::assign(&name, element.expr().to_node()));
            residual.push(SimpleNumber::variable(name));
        }
        (statements, SimpleVector::new(residual))
    }

    fn each<F>(&self, f: F) -> Self
    where
        F: Fn(&SimpleNumber) -> SimpleNumber,
    {
        Self {
            elements: self.elements.iter().map(f).collect(),
        }
    }
}
