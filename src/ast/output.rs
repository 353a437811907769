//! Output-language tree construction.
//!
//! The lowering engine emits `program -> line -> multi -> assign` trees. Each
//! `assign` has a `variable` target and a scalar expression built from
//! `number`, `variable`, `external`, `unary` and `binary` nodes. Operator nodes
//! carry the operator symbol as their value.
//!
//! [`listing`] renders a program as one infix string per line. It exists for
//! logs, the CLI and tests; it does not enforce any target line budget.

use super::Node;

pub const PROGRAM: &str = "program";
pub const LINE: &str = "line";
pub const MULTI: &str = "multi";
pub const ASSIGN: &str = "assign";
pub const VARIABLE: &str = "variable";
pub const EXTERNAL: &str = "external";
pub const NUMBER: &str = "number";
pub const UNARY: &str = "unary";
pub const BINARY: &str = "binary";

pub fn program(lines: Vec<Node>) -> Node {
    Node::branch(PROGRAM, lines)
}

/// One output line holding one `multi` block of independent assignments.
pub fn line(assignments: Vec<Node>) -> Node {
    Node::branch(LINE, vec![Node::branch(MULTI, assignments)])
}

pub fn assign(target: &str, expr: Node) -> Node {
    Node::branch(ASSIGN, vec![variable(target), expr])
}

pub fn variable(name: &str) -> Node {
    Node::leaf(VARIABLE, name)
}

pub fn external(name: &str) -> Node {
    Node::leaf(EXTERNAL, name)
}

pub fn number(text: &str) -> Node {
    Node::leaf(NUMBER, text)
}

pub fn unary(op: &str, operand: Node) -> Node {
    Node {
        kind: UNARY.into(),
        value: Some(op.into()),
        children: Some(vec![operand]),
    }
}

pub fn binary(op: &str, lhs: Node, rhs: Node) -> Node {
    Node {
        kind: BINARY.into(),
        value: Some(op.into()),
        children: Some(vec![lhs, rhs]),
    }
}

/// Renders every line of an output program, assignments separated by spaces.
///
/// # Examples
///
/// ```rust
/// use yovec::ast::output::{assign, binary, line, listing, number, program, variable};
/// let p = program(vec![line(vec![
///     assign("v0e0", number("1")),
///     assign("v0e1", binary("+", variable("a"), number("2"))),
/// ])]);
/// assert_eq!(listing(&p), vec!["v0e0=1 v0e1=a+2"]);
/// ```
pub fn listing(program: &Node) -> Vec<String> {
    program
        .children()
        .iter()
        .map(|line| {
            line.find(|n| n.kind == ASSIGN)
                .into_iter()
                .map(render_assignment)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

pub fn render_assignment(node: &Node) -> String {
    let target = node
        .child(0)
        .and_then(|t| t.value.as_deref())
        .unwrap_or("?");
    let expr = node.child(1).map(render_expr).unwrap_or_default();
    format!("{}={}", target, expr)
}

/// Infix rendering of a scalar expression; compound operands are parenthesized.
pub fn render_expr(node: &Node) -> String {
    let op = node.value.as_deref().unwrap_or("?");
    match node.kind.as_str() {
        UNARY => {
            let operand = node.child(0).map(render_operand).unwrap_or_default();
            if op == "-" {
                format!("-{}", operand)
            } else {
                format!("{} {}", op, operand)
            }
        }
        BINARY => {
            let lhs = node.child(0).map(render_operand).unwrap_or_default();
            let rhs = node.child(1).map(render_operand).unwrap_or_default();
            if op.chars().all(char::is_alphabetic) {
                format!("{} {} {}", lhs, op, rhs)
            } else {
                format!("{}{}{}", lhs, op, rhs)
            }
        }
        _ => op.to_string(),
    }
}

fn render_operand(node: &Node) -> String {
    match node.kind.as_str() {
        UNARY | BINARY => format!("({})", render_expr(node)),
        _ => render_expr(node),
    }
}
