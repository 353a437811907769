//! Unified error type for the yovec lowering pipeline.
//!
//! Every failure produced by any stage (grammar conversion, environment
//! threading, symbolic expansion, export rename) is a [`YovecError`]. The error
//! carries a [`ErrorKind`] tag, a human-readable message and an optional help
//! line, and renders through `miette` with a stable diagnostic code.
//!
//! # Error Construction
//!
//! - **Use `yovec_err!` for every error.**
//!   - `yovec_err!(UndefinedVariable, "undefined variable: {}", ident)`
//!
//! - **Attach help with [`YovecError::with_help`].**
//!
//! Internal invariant violations mean the upstream parser produced a tree the
//! grammar does not describe. They abort compilation like every other error but
//! are reported under the `internal` category so callers can tell them apart.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, YovecError>;

/// Classification of every failure the pipeline can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Lookup of an identifier with no binding.
    UndefinedVariable,
    /// Lookup of an alias that was never declared.
    UndefinedAlias,
    /// Second binding of a variable, import, export or alias, or an import in
    /// the reserved register namespace.
    Redefinition,
    /// An export would write a name already owned by an import, a register
    /// or another export.
    ConflictingAliasTarget,
    /// Export or alias of a name with no prior binding.
    ExportOfUndefinedVariable,
    /// A binding or value had a different shape than required.
    TypeMismatch,
    /// Binary vector/matrix operation on operands of unequal dimensions.
    ShapeMismatch,
    /// Reduction over a zero-length vector.
    EmptyReduce,
    /// The input tree violates the grammar contract (upstream bug).
    InternalInvariantViolation,
}

impl ErrorKind {
    /// Stable snake_case name, used in diagnostic codes and test fixtures.
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::UndefinedVariable => "undefined_variable",
            Self::UndefinedAlias => "undefined_alias",
            Self::Redefinition => "redefinition",
            Self::ConflictingAliasTarget => "conflicting_alias_target",
            Self::ExportOfUndefinedVariable => "export_of_undefined_variable",
            Self::TypeMismatch => "type_mismatch",
            Self::ShapeMismatch => "shape_mismatch",
            Self::EmptyReduce => "empty_reduce",
            Self::InternalInvariantViolation => "internal_invariant_violation",
        }
    }

    /// Coarse category shown in the diagnostic code.
    pub const fn category(&self) -> &'static str {
        match self {
            Self::UndefinedVariable
            | Self::UndefinedAlias
            | Self::Redefinition
            | Self::ConflictingAliasTarget
            | Self::ExportOfUndefinedVariable => "env",
            Self::TypeMismatch | Self::ShapeMismatch | Self::EmptyReduce => "value",
            Self::InternalInvariantViolation => "internal",
        }
    }

    /// True for failures caused by the tool chain rather than the user program.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::InternalInvariantViolation)
    }

    /// Every kind, in declaration order.
    pub const ALL: [ErrorKind; 9] = [
        ErrorKind::UndefinedVariable,
        ErrorKind::UndefinedAlias,
        ErrorKind::Redefinition,
        ErrorKind::ConflictingAliasTarget,
        ErrorKind::ExportOfUndefinedVariable,
        ErrorKind::TypeMismatch,
        ErrorKind::ShapeMismatch,
        ErrorKind::EmptyReduce,
        ErrorKind::InternalInvariantViolation,
    ];

    /// Parses a kind from its [`code_suffix`](Self::code_suffix).
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code_suffix() == code)
    }

    fn label(&self) -> &'static str {
        match self {
            Self::UndefinedVariable => "Undefined variable",
            Self::UndefinedAlias => "Undefined alias",
            Self::Redefinition => "Redefinition",
            Self::ConflictingAliasTarget => "Conflicting alias target",
            Self::ExportOfUndefinedVariable => "Export of undefined variable",
            Self::TypeMismatch => "Type mismatch",
            Self::ShapeMismatch => "Shape mismatch",
            Self::EmptyReduce => "Empty reduce",
            Self::InternalInvariantViolation => "Internal error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The single error type of the crate.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct YovecError {
    pub kind: ErrorKind,
    pub message: String,
    pub help: Option<String>,
}

impl YovecError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let help = kind
            .is_internal()
            .then(|| "parser bug: the input tree does not match the grammar".to_string());
        Self {
            kind,
            message: message.into(),
            help,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Diagnostic code, e.g. `yovec::env::redefinition`.
    pub fn code(&self) -> String {
        format!("yovec::{}::{}", self.kind.category(), self.kind.code_suffix())
    }
}

impl Diagnostic for YovecError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(YovecError::code(self)))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }
}

/// Constructs a [`YovecError`] of the given kind with a formatted message.
#[macro_export]
macro_rules! yovec_err {
    ($kind:ident, $($arg:tt)+) => {
        $crate::diagnostics::YovecError::new(
            $crate::diagnostics::ErrorKind::$kind,
            format!($($arg)+),
        )
    };
}

#[cfg(test)]
mod diagnostics_tests {
    use miette::Report;

    use super::*;

    #[test]
    fn test_code_includes_category_and_kind() {
        let err = yovec_err!(Redefinition, "cannot redefine existing variable: {}", "x");
        assert_eq!(err.code(), "yovec::env::redefinition");
        assert_eq!(
            err.to_string(),
            "Redefinition: cannot redefine existing variable: x"
        );
    }

    #[test]
    fn test_internal_errors_carry_help() {
        let err = yovec_err!(InternalInvariantViolation, "unknown statement kind: {}", "loop");
        assert!(err.kind().is_internal());
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("parser bug"));
        assert!(output.contains("yovec::internal::internal_invariant_violation"));
    }

    #[test]
    fn test_from_code_roundtrips_every_kind() {
        for kind in ErrorKind::ALL {
            assert_eq!(ErrorKind::from_code(kind.code_suffix()), Some(kind));
        }
        let suffixes: std::collections::HashSet<_> =
            ErrorKind::ALL.iter().map(|k| k.code_suffix()).collect();
        assert_eq!(suffixes.len(), ErrorKind::ALL.len());
        assert_eq!(ErrorKind::from_code("nope"), None);
    }
}
