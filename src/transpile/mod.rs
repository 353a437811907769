//! Lowering engine.
//!
//! Walks the statements of an input program in order, threading the symbol
//! environment and the next register index. Each `let` becomes exactly one
//! output line holding one `multi` block; `import` and `export` only extend
//! the environment. After the walk, exported registers are renamed
//! (see [`exports`]).
//!
//! Register indices start at 0 and grow by one per `let`, whatever the width of
//! the bound value. Later references to a binding read its registers back
//! instead of re-expanding the original expression.

pub mod env;
pub mod exports;

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::ast::grammar::{self, Expr, Statement};
use crate::ast::{output, Node};
use crate::config::Options;
use crate::diagnostics::Result;
use crate::symbolic::{is_reserved_name, SimpleMatrix, SimpleNumber, SimpleVector, UnaryOp, Value};
use crate::yovec_err;

use self::env::{Binding, Env};

/// Output of the lowering engine, before mangling.
#[derive(Debug, Clone)]
pub struct Transpiled {
    /// Output program with exports already renamed.
    pub program: Node,
    /// Imported identifiers, in declaration order.
    pub imported: Vec<String>,
    /// `(before, after)` export pairs, in declaration order.
    pub exports: Vec<(String, String)>,
    /// Identifiers produced by export rename, in first-occurrence order.
    pub exported: Vec<String>,
    /// Final environment.
    pub env: Env,
}

/// Lowers an input `program` tree.
///
/// # Examples
///
/// ```rust
/// use yovec::ast::builder::*;
/// use yovec::ast::output::listing;
/// use yovec::config::Options;
/// use yovec::transpile::transpile;
///
/// let p = program(vec![
///     let_("v", vector(vec![number("1"), number("2")])),
///     let_("w", vecbinary(variable("v"), "*", variable("v"))),
/// ]);
/// let out = transpile(&p, &Options::default()).unwrap();
/// assert_eq!(listing(&out.program), vec![
///     "v0e0=1 v0e1=2",
///     "v1e0=v0e0*v0e0 v1e1=v0e1*v0e1",
/// ]);
/// ```
pub fn transpile(program: &Node, options: &Options) -> Result<Transpiled> {
    let statements = grammar::statements(program)?;

    let mut env = Env::with_policy(options.alias_policy);
    let mut index = 0;
    let mut lines = Vec::new();
    let mut imported = Vec::new();
    let mut exports = Vec::new();
    // Imported identifiers plus every name an export will produce.
    let mut claimed = HashSet::new();

    for statement in &statements {
        match statement {
            Statement::Import(ident) => {
                env = env.bind_import(ident)?;
                if !claimed.insert(ident.clone()) {
                    return Err(yovec_err!(
                        ConflictingAliasTarget,
                        "failed to import variable: {} is already an export target",
                        ident
                    ));
                }
                imported.push(ident.clone());
                debug!(ident = %ident, "import");
            }
            Statement::Export { before, after } => {
                env = transpile_export(&env, before, after, &mut claimed)?;
                exports.push((before.clone(), after.clone()));
                debug!(before = %before, after = %after, "export");
            }
            Statement::Let { ident, expr } => {
                let (next, line) = transpile_let(&env, index, ident, expr)?;
                env = next;
                lines.push(line);
                index += 1;
            }
            Statement::Comment => {}
        }
    }

    let (program, exported) = exports::rename_exports(&output::program(lines), &env, &exports)?;
    Ok(Transpiled {
        program,
        imported,
        exports,
        exported,
        env,
    })
}

// ============================================================================
// STATEMENTS
// ============================================================================

fn transpile_export(
    env: &Env,
    before: &str,
    after: &str,
    claimed: &mut HashSet<String>,
) -> Result<Env> {
    let binding = env.lookup(before, None).map_err(|_| {
        yovec_err!(
            ExportOfUndefinedVariable,
            "failed to export variable: variable not found: {}",
            before
        )
    })?;
    if binding.register_index().is_none() {
        return Err(yovec_err!(
            TypeMismatch,
            "failed to export variable: {} is imported and has no computed value",
            before
        )
        .with_help(format!("bind it first, e.g. `let {0}_out = {0}`", before)));
    }
    let env = env.bind_export_marker(before)?.bind_alias(before, after)?;
    for name in exports::export_targets(binding, after) {
        if is_reserved_name(&name) || !claimed.insert(name.clone()) {
            return Err(yovec_err!(
                ConflictingAliasTarget,
                "failed to export variable: {} as {} would write {}, which is already taken",
                before,
                after,
                name
            )
            .with_help("pick an export name whose element names do not overlap imports, registers or other exports"));
        }
    }
    Ok(env)
}

fn transpile_let(env: &Env, index: usize, ident: &str, expr: &Expr) -> Result<(Env, Node)> {
    let value = lower_expr(env, expr)?;
    let (assignments, residual) = value.assign(index);
    debug!(
        ident = %ident,
        index,
        shape = value.shape_name(),
        width = value.width(),
        "let"
    );
    let env = match residual {
        Value::Number(n) => env.bind_number(ident, index, n)?,
        Value::Vector(v) => env.bind_vector(ident, index, v)?,
        Value::Matrix(m) => env.bind_matrix(ident, index, m)?,
    };
    Ok((env, output::line(assignments)))
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

fn lower_expr(env: &Env, expr: &Expr) -> Result<Value> {
    let value = match expr {
        Expr::Number(n) => Value::Number(SimpleNumber::number(*n)),
        Expr::External(name) => Value::Number(SimpleNumber::external(name.as_str())),
        Expr::Variable(ident) => resolve(env, ident)?,
        Expr::Vector(elements) => Value::Vector(SimpleVector::new(
            elements
                .iter()
                .map(|e| number(env, e, "vector element"))
                .collect::<Result<_>>()?,
        )),
        Expr::Matrix(rows) => Value::Matrix(SimpleMatrix::new(
            rows.iter()
                .map(|r| vector(env, r, "matrix row"))
                .collect::<Result<_>>()?,
        )?),
        Expr::Unary { ops, operand } => {
            let n = number(env, operand, "unary")?;
            Value::Number(ops.iter().fold(n, |acc, op| acc.unary(*op)))
        }
        Expr::Binary { first, rest } => {
            let mut acc = number(env, first, "binary")?;
            for (op, rhs) in rest {
                acc = acc.binary(*op, &number(env, rhs, "binary")?);
            }
            Value::Number(acc)
        }
        Expr::Map { op, operand } => Value::Vector(vector(env, operand, "map")?.map(*op)),
        Expr::VecUnary { ops, operand } => {
            let v = vector(env, operand, "vecunary")?;
            Value::Vector(apply_unary(v, ops, SimpleVector::vecunary))
        }
        Expr::VecBinary { first, rest } => {
            let mut acc = vector(env, first, "vecbinary")?;
            for (op, rhs) in rest {
                acc = acc.vecbinary(*op, &vector(env, rhs, "vecbinary")?)?;
            }
            Value::Vector(acc)
        }
        Expr::Premap {
            op,
            scalar,
            operand,
        } => {
            let s = number(env, scalar, "premap")?;
            Value::Vector(vector(env, operand, "premap")?.premap(*op, &s))
        }
        Expr::Postmap {
            scalar,
            op,
            operand,
        } => {
            let s = number(env, scalar, "postmap")?;
            Value::Vector(vector(env, operand, "postmap")?.postmap(&s, *op))
        }
        Expr::Concat(parts) => {
            let (first, rest) = parts
                .split_first()
                .ok_or_else(|| yovec_err!(InternalInvariantViolation, "empty concat"))?;
            let mut acc = vector(env, first, "concat")?;
            for part in rest {
                acc = acc.concat(&vector(env, part, "concat")?);
            }
            Value::Vector(acc)
        }
        Expr::Reduce { op, operand } => {
            Value::Number(vector(env, operand, "reduce")?.reduce(*op)?)
        }
        Expr::Dot(lhs, rhs) => {
            let l = vector(env, lhs, "dot")?;
            Value::Number(l.dot(&vector(env, rhs, "dot")?)?)
        }
        Expr::Cross(lhs, rhs) => {
            let l = vector(env, lhs, "cross")?;
            Value::Vector(l.cross(&vector(env, rhs, "cross")?)?)
        }
        Expr::Len(operand) => Value::Number(vector(env, operand, "len")?.len_number()),
        Expr::MatMap { op, operand } => Value::Matrix(matrix(env, operand, "mat_map")?.map(*op)),
        Expr::MatUnary { ops, operand } => {
            let m = matrix(env, operand, "mat_unary")?;
            Value::Matrix(apply_unary(m, ops, SimpleMatrix::matunary))
        }
        Expr::MatBinary { first, rest } => {
            let mut acc = matrix(env, first, "mat_binary")?;
            for (op, rhs) in rest {
                acc = acc.matbinary(*op, &matrix(env, rhs, "mat_binary")?)?;
            }
            Value::Matrix(acc)
        }
        Expr::MatPremap {
            op,
            scalar,
            operand,
        } => {
            let s = number(env, scalar, "mat_premap")?;
            Value::Matrix(matrix(env, operand, "mat_premap")?.premap(*op, &s))
        }
        Expr::MatPostmap {
            scalar,
            op,
            operand,
        } => {
            let s = number(env, scalar, "mat_postmap")?;
            Value::Matrix(matrix(env, operand, "mat_postmap")?.postmap(&s, *op))
        }
        Expr::Transpose(operand) => {
            Value::Matrix(matrix(env, operand, "transpose")?.transpose())
        }
        Expr::MatMul(lhs, rhs) => {
            let l = matrix(env, lhs, "matmul")?;
            Value::Matrix(l.matmul(&matrix(env, rhs, "matmul")?)?)
        }
    };
    Ok(value)
}

/// Reads a binding back: registers for computed values, the bare name for imports.
fn resolve(env: &Env, ident: &str) -> Result<Value> {
    trace!(ident = %ident, "resolve");
    let value = match env.lookup(ident, None)? {
        Binding::Imported => Value::Number(SimpleNumber::variable(ident)),
        Binding::Number { value, .. } => Value::Number(value.clone()),
        Binding::Vector { value, .. } => Value::Vector(value.clone()),
        Binding::Matrix { value, .. } => Value::Matrix(value.clone()),
        Binding::Exported => {
            return Err(yovec_err!(
                InternalInvariantViolation,
                "export marker reached through ordinary lookup: {}",
                ident
            ))
        }
    };
    Ok(value)
}

fn apply_unary<T, F>(value: T, ops: &[UnaryOp], f: F) -> T
where
    F: Fn(&T, UnaryOp) -> T,
{
    ops.iter().fold(value, |acc, op| f(&acc, *op))
}

fn number(env: &Env, expr: &Expr, context: &str) -> Result<SimpleNumber> {
    lower_expr(env, expr)?.expect_number(context)
}

fn vector(env: &Env, expr: &Expr, context: &str) -> Result<SimpleVector> {
    lower_expr(env, expr)?.expect_vector(context)
}

fn matrix(env: &Env, expr: &Expr, context: &str) -> Result<SimpleMatrix> {
    lower_expr(env, expr)?.expect_matrix(context)
}
