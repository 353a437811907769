use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{output, Node};

use super::ops::{BinaryOp, UnaryOp};

/// A numeric literal as written in the source program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Parses literal text, preferring integers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yovec::symbolic::Number;
    /// assert_eq!(Number::parse("3"), Some(Number::Int(3)));
    /// assert_eq!(Number::parse("2.5"), Some(Number::Float(2.5)));
    /// assert_eq!(Number::parse("x"), None);
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(i) = text.parse::<i64>() {
            return Some(Self::Int(i));
        }
        text.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Self::Float)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{:?}", x),
        }
    }
}

/// Element-level expression tree. Subtrees are shared, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(Number),
    /// A field supplied by the host, emitted verbatim and never renamed.
    External(String),
    /// A named scalar slot: an import or a materialized register element.
    Variable(String),
    Unary(UnaryOp, Arc<Scalar>),
    Binary(BinaryOp, Arc<Scalar>, Arc<Scalar>),
}

impl Scalar {
    pub fn to_node(&self) -> Node {
        match self {
            Scalar::Number(n) => output::number(&n.to_string()),
            Scalar::External(name) => output::external(name),
            Scalar::Variable(name) => output::variable(name),
            Scalar::Unary(op, operand) => output::unary(op.symbol(), operand.to_node()),
            Scalar::Binary(op, lhs, rhs) => {
                output::binary(op.symbol(), lhs.to_node(), rhs.to_node())
            }
        }
    }
}

/// Name of the scalar slot holding `element` of the register `index`.
///
/// Numbers occupy a single slot with an empty element suffix.
pub fn register_name(index: usize, element: Option<usize>) -> String {
    match element {
        Some(element) => format!("{}{}", register_prefix(index), element),
        None => register_prefix(index),
    }
}

/// Common prefix of every slot of register `index`.
pub fn register_prefix(index: usize) -> String {
    format!("v{}e", index)
}

static RESERVED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^v[0-9]+e").unwrap());

/// True for names inside the register namespace `v{n}e…`.
///
/// Export rename matches on register prefixes, so user-visible names in this
/// namespace would be rewritten along with the registers.
pub fn is_reserved_name(name: &str) -> bool {
    RESERVED.is_match(name)
}

/// A deferred scalar expression.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleNumber {
    expr: Arc<Scalar>,
}

impl SimpleNumber {
    pub fn number(n: Number) -> Self {
        Self::from_scalar(Scalar::Number(n))
    }

    pub fn external(name: impl Into<String>) -> Self {
        Self::from_scalar(Scalar::External(name.into()))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::from_scalar(Scalar::Variable(name.into()))
    }

    pub fn from_scalar(scalar: Scalar) -> Self {
        Self {
            expr: Arc::new(scalar),
        }
    }

    pub fn expr(&self) -> &Scalar {
        &self.expr
    }

    pub fn unary(&self, op: UnaryOp) -> Self {
        Self::from_scalar(Scalar::Unary(op, Arc::clone(&self.expr)))
    }

    pub fn binary(&self, op: BinaryOp, rhs: &SimpleNumber) -> Self {
        Self::from_scalar(Scalar::Binary(
            op,
            Arc::clone(&self.expr),
            Arc::clone(&rhs.expr),
        ))
    }

    /// Materializes the expression into register `index`.
    ///
    /// Returns the single assignment statement and a residual that reads the
    /// register back.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yovec::ast::output::render_assignment;
    /// use yovec::symbolic::{BinaryOp, Number, SimpleNumber};
    /// let n = SimpleNumber::number(Number::Int(1)).binary(BinaryOp::Add, &SimpleNumber::number(Number::Int(2)));
    /// let (stmts, residual) = n.assign(4);
    /// assert_eq!(render_assignment(&stmts[0]), "v4e=1+2");
    /// assert_eq!(residual, SimpleNumber::variable("v4e"));
    /// ```
    pub fn assign(&self, index: usize) -> (Vec<Node>, SimpleNumber) {
        let name = register_name(index, None);
        let statement = output::assign(&name, self.expr.to_node());
        (vec![statement], SimpleNumber::variable(name))
    }
}
