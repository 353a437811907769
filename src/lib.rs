//! # yovec
//!
//! Lowers vector/matrix algebra programs into flat scalar assignment programs.
//!
//! The pipeline is:
//!
//! 1. [`ast::grammar`] converts the parser's generic tree into typed statements.
//! 2. [`transpile`] threads the persistent symbol environment through the
//!    statements, expands every `let` into one line of scalar assignments and
//!    renames exported registers.
//! 3. [`optimize::mangle`] shortens every remaining identifier.
//!
//! Any error aborts the whole compilation; no partial output is returned.
//!
//! ```rust
//! use yovec::ast::builder::*;
//! use yovec::ast::output::listing;
//! use yovec::{compile, Options};
//!
//! let p = program(vec![
//!     import("A"),
//!     let_("v", vector(vec![variable("A"), number("2"), number("3")])),
//!     let_("s", dot(variable("v"), variable("v"))),
//!     export("s", "OUT"),
//! ]);
//! let out = compile(&p, &Options::default().without_mangling()).unwrap();
//! assert_eq!(listing(&out.program), vec![
//!     "v0e0=A v0e1=2 v0e2=3",
//!     "OUT=((v0e0*v0e0)+(v0e1*v0e1))+(v0e2*v0e2)",
//! ]);
//! ```

pub use crate::config::Options;
pub use crate::diagnostics::{ErrorKind, Result, YovecError};

pub mod ast;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod optimize;
pub mod symbolic;
pub mod test_harness;
pub mod transpile;

use tracing::info;

use crate::ast::Node;

/// Final output of [`compile`].
#[derive(Debug, Clone)]
pub struct Compiled {
    /// Output program, ready for the printer.
    pub program: Node,
    /// Identifiers that kept their names because the host binds them.
    pub imported: Vec<String>,
    /// Identifiers produced by export rename; never mangled.
    pub exported: Vec<String>,
}

/// Runs the full pipeline: lowering, export rename and, if enabled, mangling.
pub fn compile(program: &Node, options: &Options) -> Result<Compiled> {
    let transpiled = transpile::transpile(program, options)?;
    let output = if options.mangle {
        optimize::mangle::mangle_names(
            &transpiled.program,
            &transpiled.imported,
            &transpiled.exported,
        )
    } else {
        transpiled.program
    };
    info!(
        lines = output.children().len(),
        mangled = options.mangle,
        "compiled"
    );
    Ok(Compiled {
        program: output,
        imported: transpiled.imported,
        exported: transpiled.exported,
    })
}
