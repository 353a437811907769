//! Shared helpers for yovec integration tests.

#![allow(dead_code)]

use yovec::ast::output::listing;
use yovec::ast::Node;
use yovec::{compile, ErrorKind, Options};

/// Compiles without mangling and returns the listing.
pub fn lower(program: &Node) -> Vec<String> {
    let compiled = compile(program, &Options::default().without_mangling())
        .unwrap_or_else(|e| panic!("compile failed: {e}"));
    listing(&compiled.program)
}

/// Compiles with mangling and returns the listing.
pub fn lower_mangled(program: &Node) -> Vec<String> {
    let compiled =
        compile(program, &Options::default()).unwrap_or_else(|e| panic!("compile failed: {e}"));
    listing(&compiled.program)
}

/// Compiles and returns the error kind, panicking on success.
pub fn lower_err(program: &Node) -> ErrorKind {
    match compile(program, &Options::default()) {
        Ok(out) => panic!("expected error, got {:?}", listing(&out.program)),
        Err(e) => e.kind(),
    }
}

/// Assignment targets of one listing line, in order.
pub fn targets(line: &str) -> Vec<&str> {
    line.split(' ')
        .filter_map(|assignment| assignment.split('=').next())
        .collect()
}
