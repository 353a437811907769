//! # Input Tree Builders
//!
//! ## Purpose
//! Builds input-language trees in exactly the shape the external parser
//! produces, so programs can be written down in tests, docs and tools without
//! a textual parser.
//!
//! ## Invariants
//! - Every statement is wrapped in its own `line` by [`program`]
//! - Identifiers are nested one level deep (`ident -> name leaf`)
//!
//! ```rust
//! use yovec::ast::builder::*;
//! let p = program(vec![
//!     import("A"),
//!     let_("v", vector(vec![external("A"), number("2")])),
//! ]);
//! assert_eq!(p.children().len(), 2);
//! ```

use super::Node;

pub fn program(statements: Vec<Node>) -> Node {
    Node::branch(
        "program",
        statements
            .into_iter()
            .map(|s| Node::branch("line", vec![s]))
            .collect(),
    )
}

pub fn identifier(name: &str) -> Node {
    Node::branch("ident", vec![Node::leaf("name", name)])
}

pub fn import(name: &str) -> Node {
    Node::branch("import", vec![identifier(name)])
}

pub fn export(before: &str, after: &str) -> Node {
    Node::branch("export", vec![identifier(before), identifier(after)])
}

pub fn let_(name: &str, expr: Node) -> Node {
    Node::branch("let", vec![identifier(name), expr])
}

pub fn vec_let(name: &str, expr: Node) -> Node {
    Node::branch("vec_let", vec![identifier(name), expr])
}

pub fn comment(text: &str) -> Node {
    Node::leaf("comment", text)
}

pub fn number(text: &str) -> Node {
    Node::branch("number", vec![Node::leaf("literal", text)])
}

pub fn external(name: &str) -> Node {
    Node::branch("external", vec![Node::leaf("name", name)])
}

pub fn variable(name: &str) -> Node {
    Node::branch("variable", vec![Node::leaf("name", name)])
}

pub fn vector(elements: Vec<Node>) -> Node {
    Node::branch("vector", elements)
}

pub fn matrix(rows: Vec<Node>) -> Node {
    Node::branch("matrix", rows)
}

/// An operator node; its kind is the operator symbol or name.
pub fn op(kind: &str) -> Node {
    Node::empty(kind)
}

pub fn unary(op_kind: &str, operand: Node) -> Node {
    Node::branch("unary", vec![op(op_kind), operand])
}

pub fn binary(lhs: Node, op_kind: &str, rhs: Node) -> Node {
    Node::branch("binary", vec![lhs, op(op_kind), rhs])
}

pub fn vecunary(op_kind: &str, operand: Node) -> Node {
    Node::branch("vecunary", vec![op(op_kind), operand])
}

/// Unary chain `[op1, op2, ..., operand]`; the last op applies first.
pub fn vec_unary(op_kinds: &[&str], operand: Node) -> Node {
    Node::branch("vec_unary", unary_chain(op_kinds, operand))
}

pub fn vecbinary(lhs: Node, op_kind: &str, rhs: Node) -> Node {
    Node::branch("vecbinary", vec![lhs, op(op_kind), rhs])
}

pub fn map(op_kind: &str, operand: Node) -> Node {
    Node::branch("map", vec![op(op_kind), operand])
}

pub fn premap(op_kind: &str, scalar: Node, operand: Node) -> Node {
    Node::branch("premap", vec![op(op_kind), scalar, operand])
}

pub fn postmap(scalar: Node, op_kind: &str, operand: Node) -> Node {
    Node::branch("postmap", vec![scalar, op(op_kind), operand])
}

pub fn concat(parts: Vec<Node>) -> Node {
    Node::branch("concat", parts)
}

pub fn reduce(op_kind: &str, operand: Node) -> Node {
    Node::branch("reduce", vec![op(op_kind), operand])
}

pub fn dot(lhs: Node, rhs: Node) -> Node {
    Node::branch("dot", vec![lhs, rhs])
}

pub fn cross(lhs: Node, rhs: Node) -> Node {
    Node::branch("cross", vec![lhs, rhs])
}

pub fn len(operand: Node) -> Node {
    Node::branch("len", vec![operand])
}

pub fn transpose(operand: Node) -> Node {
    Node::branch("transpose", vec![operand])
}

pub fn matmul(lhs: Node, rhs: Node) -> Node {
    Node::branch("matmul", vec![lhs, rhs])
}

pub fn mat_binary(lhs: Node, op_kind: &str, rhs: Node) -> Node {
    Node::branch("mat_binary", vec![lhs, op(op_kind), rhs])
}

pub fn mat_map(op_kind: &str, operand: Node) -> Node {
    Node::branch("mat_map", vec![op(op_kind), operand])
}

pub fn mat_unary(op_kinds: &[&str], operand: Node) -> Node {
    Node::branch("mat_unary", unary_chain(op_kinds, operand))
}

pub fn mat_premap(op_kind: &str, scalar: Node, operand: Node) -> Node {
    Node::branch("mat_premap", vec![op(op_kind), scalar, operand])
}

pub fn mat_postmap(scalar: Node, op_kind: &str, operand: Node) -> Node {
    Node::branch("mat_postmap", vec![scalar, op(op_kind), operand])
}

fn unary_chain(op_kinds: &[&str], operand: Node) -> Vec<Node> {
    op_kinds
        .iter()
        .map(|kind| op(kind))
        .chain(std::iter::once(operand))
        .collect()
}
