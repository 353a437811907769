//! Scalar operators of the target language.

use std::fmt;

/// Unary numeric operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
    Abs,
    Sqrt,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
}

/// Binary numeric operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl UnaryOp {
    /// Resolves an operator node kind, accepting both symbols and names.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yovec::symbolic::UnaryOp;
    /// assert_eq!(UnaryOp::from_kind("-"), Some(UnaryOp::Neg));
    /// assert_eq!(UnaryOp::from_kind("arcsin"), Some(UnaryOp::Asin));
    /// assert_eq!(UnaryOp::from_kind("+"), None);
    /// ```
    pub fn from_kind(kind: &str) -> Option<Self> {
        let op = match kind {
            "-" | "neg" => Self::Neg,
            "not" | "!" => Self::Not,
            "abs" => Self::Abs,
            "sqrt" => Self::Sqrt,
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" | "arcsin" => Self::Asin,
            "acos" | "arccos" => Self::Acos,
            "atan" | "arctan" => Self::Atan,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "not",
            Self::Abs => "abs",
            Self::Sqrt => "sqrt",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
        }
    }
}

impl BinaryOp {
    /// Resolves an operator node kind, accepting both symbols and names.
    pub fn from_kind(kind: &str) -> Option<Self> {
        let op = match kind {
            "+" | "add" => Self::Add,
            "-" | "sub" => Self::Sub,
            "*" | "mul" => Self::Mul,
            "/" | "div" => Self::Div,
            "%" | "mod" => Self::Mod,
            "^" | "pow" | "exp" => Self::Pow,
            "==" | "eq" => Self::Eq,
            "!=" | "ne" => Self::Ne,
            "<" | "lt" => Self::Lt,
            "<=" | "le" => Self::Le,
            ">" | "gt" => Self::Gt,
            ">=" | "ge" => Self::Ge,
            "and" => Self::And,
            "or" => Self::Or,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "^",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
