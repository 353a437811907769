//! Typed view of the input program.
//!
//! The external parser hands over a generic [`Node`] tree. Before lowering, the
//! tree is converted into the closed [`Statement`] and [`Expr`] enums so the
//! lowering engine matches exhaustively. Anything the grammar does not describe
//! (unknown kinds, wrong arity, malformed literals) is reported as an
//! `InternalInvariantViolation`: it means the parser and this grammar disagree.
//!
//! ## Tree shapes
//!
//! ```text
//! program   := line*
//! line      := statement
//! import    := ident
//! export    := ident ident                 (before, after)
//! let       := ident expr                  (also vec_let, num_let, mat_let)
//! comment   := anything
//!
//! unary     := op+ expr                    (op nearest the operand applies first)
//! binary    := expr (op expr)+             (left fold)
//! premap    := op nexpr vexpr
//! postmap   := nexpr op vexpr
//! map       := op vexpr
//! reduce    := op vexpr
//! dot|cross := vexpr vexpr
//! len       := vexpr
//! concat    := vexpr+
//! vector    := nexpr*
//! matrix    := vexpr*                      (rows)
//! ```
//!
//! Identifiers resolve through nested single-child nodes to the first node
//! carrying a value.

use super::Node;
use crate::diagnostics::Result;
use crate::symbolic::{BinaryOp, Number, UnaryOp};
use crate::yovec_err;

/// A top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Import(String),
    Export { before: String, after: String },
    Let { ident: String, expr: Expr },
    Comment,
}

/// An input expression. Shapes are checked during lowering, not here.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(Number),
    External(String),
    Variable(String),
    Vector(Vec<Expr>),
    Matrix(Vec<Expr>),
    Unary {
        ops: Vec<UnaryOp>,
        operand: Box<Expr>,
    },
    Binary {
        first: Box<Expr>,
        rest: Vec<(BinaryOp, Expr)>,
    },
    Map {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    VecUnary {
        ops: Vec<UnaryOp>,
        operand: Box<Expr>,
    },
    VecBinary {
        first: Box<Expr>,
        rest: Vec<(BinaryOp, Expr)>,
    },
    Premap {
        op: BinaryOp,
        scalar: Box<Expr>,
        operand: Box<Expr>,
    },
    Postmap {
        scalar: Box<Expr>,
        op: BinaryOp,
        operand: Box<Expr>,
    },
    Concat(Vec<Expr>),
    Reduce {
        op: BinaryOp,
        operand: Box<Expr>,
    },
    Dot(Box<Expr>, Box<Expr>),
    Cross(Box<Expr>, Box<Expr>),
    Len(Box<Expr>),
    MatMap {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    MatUnary {
        ops: Vec<UnaryOp>,
        operand: Box<Expr>,
    },
    MatBinary {
        first: Box<Expr>,
        rest: Vec<(BinaryOp, Expr)>,
    },
    MatPremap {
        op: BinaryOp,
        scalar: Box<Expr>,
        operand: Box<Expr>,
    },
    MatPostmap {
        scalar: Box<Expr>,
        op: BinaryOp,
        operand: Box<Expr>,
    },
    Transpose(Box<Expr>),
    MatMul(Box<Expr>, Box<Expr>),
}

// ============================================================================
// STATEMENTS
// ============================================================================

/// Converts every `line` of a `program` node into a statement.
pub fn statements(program: &Node) -> Result<Vec<Statement>> {
    if program.kind != "program" {
        return Err(yovec_err!(
            InternalInvariantViolation,
            "expected a program node, got '{}'",
            program.kind
        ));
    }
    program
        .children()
        .iter()
        .map(|line| {
            if line.kind != "line" {
                return Err(yovec_err!(
                    InternalInvariantViolation,
                    "expected a line node, got '{}'",
                    line.kind
                ));
            }
            statement(child(line, 0)?)
        })
        .collect()
}

pub fn statement(node: &Node) -> Result<Statement> {
    match node.kind.as_str() {
        "import" => {
            arity(node, 1)?;
            Ok(Statement::Import(ident(child(node, 0)?)?))
        }
        "export" => {
            arity(node, 2)?;
            Ok(Statement::Export {
                before: ident(child(node, 0)?)?,
                after: ident(child(node, 1)?)?,
            })
        }
        "let" | "vec_let" | "num_let" | "mat_let" => {
            arity(node, 2)?;
            Ok(Statement::Let {
                ident: ident(child(node, 0)?)?,
                expr: expr(child(node, 1)?)?,
            })
        }
        "comment" => Ok(Statement::Comment),
        other => Err(yovec_err!(
            InternalInvariantViolation,
            "unknown kind for statement: {}",
            other
        )),
    }
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

pub fn expr(node: &Node) -> Result<Expr> {
    let e = match node.kind.as_str() {
        "number" => {
            let text = ident(node)?;
            let n = Number::parse(&text).ok_or_else(|| {
                yovec_err!(InternalInvariantViolation, "malformed number literal: {}", text)
            })?;
            Expr::Number(n)
        }
        "external" => Expr::External(ident(node)?),
        "variable" => Expr::Variable(ident(node)?),
        "vector" => Expr::Vector(exprs(node.children())?),
        "matrix" => Expr::Matrix(exprs(node.children())?),
        "unary" | "num_unary" => {
            let (ops, operand) = unary_chain(node)?;
            Expr::Unary { ops, operand }
        }
        "binary" | "num_binary" => {
            let (first, rest) = binary_chain(node)?;
            Expr::Binary { first, rest }
        }
        "map" | "vec_map" => {
            arity(node, 2)?;
            Expr::Map {
                op: unary_op(child(node, 0)?)?,
                operand: boxed(child(node, 1)?)?,
            }
        }
        "vecunary" | "vec_unary" => {
            let (ops, operand) = unary_chain(node)?;
            Expr::VecUnary { ops, operand }
        }
        "vecbinary" | "vec_binary" => {
            let (first, rest) = binary_chain(node)?;
            Expr::VecBinary { first, rest }
        }
        "premap" | "vec_premap" => {
            arity(node, 3)?;
            Expr::Premap {
                op: binary_op(child(node, 0)?)?,
                scalar: boxed(child(node, 1)?)?,
                operand: boxed(child(node, 2)?)?,
            }
        }
        "postmap" | "vec_postmap" => {
            arity(node, 3)?;
            Expr::Postmap {
                scalar: boxed(child(node, 0)?)?,
                op: binary_op(child(node, 1)?)?,
                operand: boxed(child(node, 2)?)?,
            }
        }
        "concat" => {
            if node.children().is_empty() {
                return Err(arity_error(node, "at least 1"));
            }
            Expr::Concat(exprs(node.children())?)
        }
        "reduce" => {
            arity(node, 2)?;
            Expr::Reduce {
                op: binary_op(child(node, 0)?)?,
                operand: boxed(child(node, 1)?)?,
            }
        }
        "dot" => {
            arity(node, 2)?;
            Expr::Dot(boxed(child(node, 0)?)?, boxed(child(node, 1)?)?)
        }
        "cross" => {
            arity(node, 2)?;
            Expr::Cross(boxed(child(node, 0)?)?, boxed(child(node, 1)?)?)
        }
        "len" => {
            arity(node, 1)?;
            Expr::Len(boxed(child(node, 0)?)?)
        }
        "mat_map" => {
            arity(node, 2)?;
            Expr::MatMap {
                op: unary_op(child(node, 0)?)?,
                operand: boxed(child(node, 1)?)?,
            }
        }
        "mat_unary" => {
            let (ops, operand) = unary_chain(node)?;
            Expr::MatUnary { ops, operand }
        }
        "mat_binary" => {
            let (first, rest) = binary_chain(node)?;
            Expr::MatBinary { first, rest }
        }
        "mat_premap" => {
            arity(node, 3)?;
            Expr::MatPremap {
                op: binary_op(child(node, 0)?)?,
                scalar: boxed(child(node, 1)?)?,
                operand: boxed(child(node, 2)?)?,
            }
        }
        "mat_postmap" => {
            arity(node, 3)?;
            Expr::MatPostmap {
                scalar: boxed(child(node, 0)?)?,
                op: binary_op(child(node, 1)?)?,
                operand: boxed(child(node, 2)?)?,
            }
        }
        "transpose" => {
            arity(node, 1)?;
            Expr::Transpose(boxed(child(node, 0)?)?)
        }
        "matmul" => {
            arity(node, 2)?;
            Expr::MatMul(boxed(child(node, 0)?)?, boxed(child(node, 1)?)?)
        }
        other => {
            return Err(yovec_err!(
                InternalInvariantViolation,
                "unknown kind for expression: {}",
                other
            ))
        }
    };
    Ok(e)
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

/// Resolves an identifier through nested single-child wrappers.
fn ident(node: &Node) -> Result<String> {
    let mut current = node;
    loop {
        if let Some(value) = &current.value {
            return Ok(value.clone());
        }
        match current.children() {
            [only] => current = only,
            _ => {
                return Err(yovec_err!(
                    InternalInvariantViolation,
                    "expected an identifier under '{}'",
                    node.kind
                ))
            }
        }
    }
}

fn child(node: &Node, index: usize) -> Result<&Node> {
    node.child(index).ok_or_else(|| {
        yovec_err!(
            InternalInvariantViolation,
            "'{}' node is missing child {}",
            node.kind,
            index
        )
    })
}

fn arity(node: &Node, expected: usize) -> Result<()> {
    if node.children().len() == expected {
        Ok(())
    } else {
        Err(arity_error(node, &expected.to_string()))
    }
}

fn arity_error(node: &Node, expected: &str) -> crate::diagnostics::YovecError {
    yovec_err!(
        InternalInvariantViolation,
        "'{}' node expects {} children, got {}",
        node.kind,
        expected,
        node.children().len()
    )
}

fn boxed(node: &Node) -> Result<Box<Expr>> {
    expr(node).map(Box::new)
}

fn exprs(nodes: &[Node]) -> Result<Vec<Expr>> {
    nodes.iter().map(expr).collect()
}

fn unary_op(node: &Node) -> Result<UnaryOp> {
    UnaryOp::from_kind(&node.kind).ok_or_else(|| {
        yovec_err!(InternalInvariantViolation, "unknown unary operator: {}", node.kind)
    })
}

fn binary_op(node: &Node) -> Result<BinaryOp> {
    BinaryOp::from_kind(&node.kind).ok_or_else(|| {
        yovec_err!(InternalInvariantViolation, "unknown binary operator: {}", node.kind)
    })
}

/// `[op1, op2, ..., operand]`; returned ops are ordered innermost first.
fn unary_chain(node: &Node) -> Result<(Vec<UnaryOp>, Box<Expr>)> {
    let (operand, ops) = node
        .children()
        .split_last()
        .filter(|(_, ops)| !ops.is_empty())
        .ok_or_else(|| arity_error(node, "at least 2"))?;
    let ops = ops.iter().rev().map(unary_op).collect::<Result<Vec<_>>>()?;
    Ok((ops, boxed(operand)?))
}

/// `[e0, op1, e1, op2, e2, ...]`.
fn binary_chain(node: &Node) -> Result<(Box<Expr>, Vec<(BinaryOp, Expr)>)> {
    let children = node.children();
    if children.len() < 3 || children.len() % 2 == 0 {
        return Err(arity_error(node, "an odd number (>= 3) of"));
    }
    let first = boxed(&children[0])?;
    let rest = children[1..]
        .chunks(2)
        .map(|pair| -> Result<(BinaryOp, Expr)> { Ok((binary_op(&pair[0])?, expr(&pair[1])?)) })
        .collect::<Result<Vec<_>>>()?;
    Ok((first, rest))
}
