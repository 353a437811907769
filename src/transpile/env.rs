use im::HashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::diagnostics::Result;
use crate::symbolic::{is_reserved_name, SimpleMatrix, SimpleNumber, SimpleVector};
use crate::yovec_err;

/// Reserved key prefix for export markers; user identifiers cannot contain `#`.
pub const EXPORT_PREFIX: &str = "#exported:";

static EXPORT_STYLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z_]+$").unwrap());

// ============================================================================
// BINDINGS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Imported,
    Exported,
    Number { index: usize, value: SimpleNumber },
    Vector { index: usize, value: SimpleVector },
    Matrix { index: usize, value: SimpleMatrix },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Imported,
    Exported,
    Number,
    Vector,
    Matrix,
}

impl Binding {
    pub fn kind(&self) -> BindingKind {
        match self {
            Binding::Imported => BindingKind::Imported,
            Binding::Exported => BindingKind::Exported,
            Binding::Number { .. } => BindingKind::Number,
            Binding::Vector { .. } => BindingKind::Vector,
            Binding::Matrix { .. } => BindingKind::Matrix,
        }
    }

    /// Register index of a materialized binding; markers have none.
    pub fn register_index(&self) -> Option<usize> {
        match self {
            Binding::Number { index, .. }
            | Binding::Vector { index, .. }
            | Binding::Matrix { index, .. } => Some(*index),
            Binding::Imported | Binding::Exported => None,
        }
    }
}

impl BindingKind {
    pub fn name(&self) -> &'static str {
        match self {
            BindingKind::Imported => "import",
            BindingKind::Exported => "export",
            BindingKind::Number => "number",
            BindingKind::Vector => "vector",
            BindingKind::Matrix => "matrix",
        }
    }
}

/// How `bind_alias` decides whether an alias name is export-style.
///
/// Export-style aliases must name an already declared variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasPolicy {
    /// Names made only of uppercase letters and underscores are export-style.
    #[default]
    ExportStyle,
    /// No alias name is treated as export-style.
    Unchecked,
}

impl AliasPolicy {
    pub fn is_export_style(&self, name: &str) -> bool {
        match self {
            AliasPolicy::ExportStyle => EXPORT_STYLE.is_match(name),
            AliasPolicy::Unchecked => false,
        }
    }
}

// ============================================================================
// ENV: persistent symbol environment
// ============================================================================

/// Immutable symbol environment.
///
/// Every `bind_*` returns a new environment; the receiver keeps observing the
/// state it had before. Maps are `im` maps, so a new environment shares
/// structure with its parent.
///
/// # Examples
///
/// ```rust
/// use yovec::transpile::env::{BindingKind, Env};
/// let base = Env::new();
/// let next = base.bind_import("A").unwrap();
/// assert!(base.lookup("A", None).is_err());
/// assert_eq!(next.lookup("A", None).unwrap().kind(), BindingKind::Imported);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Env {
    variables: HashMap<String, Binding>,
    aliases: HashMap<String, String>,
    policy: AliasPolicy,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: AliasPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> AliasPolicy {
        self.policy
    }

    /// Looks up `ident`, optionally requiring a binding kind.
    pub fn lookup(&self, ident: &str, expected: Option<BindingKind>) -> Result<&Binding> {
        let binding = self
            .variables
            .get(ident)
            .ok_or_else(|| yovec_err!(UndefinedVariable, "undefined variable: {}", ident))?;
        match expected {
            Some(kind) if binding.kind() != kind => Err(yovec_err!(
                TypeMismatch,
                "expected variable '{}' to have type {}, but got {}",
                ident,
                kind.name(),
                binding.kind().name()
            )),
            _ => Ok(binding),
        }
    }

    pub fn contains(&self, ident: &str) -> bool {
        self.variables.contains_key(ident)
    }

    pub fn is_exported(&self, ident: &str) -> bool {
        self.variables.contains_key(&export_key(ident))
    }

    /// Declares an external input.
    ///
    /// Names in the register namespace `v{n}e…` are refused: export rename
    /// would rewrite them together with the registers.
    pub fn bind_import(&self, ident: &str) -> Result<Env> {
        if is_reserved_name(ident) {
            return Err(yovec_err!(
                Redefinition,
                "failed to import variable: {} is a reserved register name",
                ident
            )
            .with_help("register names have the form v<index>e<element>; rename the input"));
        }
        if self.contains(ident) {
            return Err(yovec_err!(
                Redefinition,
                "failed to import variable: {} is already defined",
                ident
            ));
        }
        Ok(self.insert(ident.to_string(), Binding::Imported))
    }

    /// Records that `before` is exported, under the reserved marker key.
    pub fn bind_export_marker(&self, before: &str) -> Result<Env> {
        let key = export_key(before);
        if self.variables.contains_key(&key) {
            return Err(yovec_err!(
                Redefinition,
                "failed to export variable: {} is already exported",
                before
            ));
        }
        Ok(self.insert(key, Binding::Exported))
    }

    pub fn bind_number(&self, ident: &str, index: usize, value: SimpleNumber) -> Result<Env> {
        self.bind_value(ident, Binding::Number { index, value })
    }

    pub fn bind_vector(&self, ident: &str, index: usize, value: SimpleVector) -> Result<Env> {
        self.bind_value(ident, Binding::Vector { index, value })
    }

    pub fn bind_matrix(&self, ident: &str, index: usize, value: SimpleMatrix) -> Result<Env> {
        self.bind_value(ident, Binding::Matrix { index, value })
    }

    pub fn lookup_alias(&self, ident: &str) -> Result<&str> {
        self.aliases
            .get(ident)
            .map(String::as_str)
            .ok_or_else(|| yovec_err!(UndefinedAlias, "undefined alias: {}", ident))
    }

    pub fn bind_alias(&self, alias: &str, target: &str) -> Result<Env> {
        if self.aliases.contains_key(alias) {
            return Err(yovec_err!(
                Redefinition,
                "cannot redefine existing alias: {}",
                alias
            ));
        }
        if self.aliases.values().any(|t| t == target) {
            return Err(yovec_err!(
                ConflictingAliasTarget,
                "conflicting alias target: {}",
                target
            ));
        }
        if self.policy.is_export_style(alias) && !self.contains(alias) {
            return Err(yovec_err!(
                ExportOfUndefinedVariable,
                "cannot export undefined variable: {}",
                alias
            ));
        }
        let mut aliases = self.aliases.clone();
        aliases.insert(alias.to_string(), target.to_string());
        Ok(Env {
            aliases,
            ..self.clone()
        })
    }

    /// Snapshot of user-visible bindings (export markers excluded).
    pub fn vars(&self) -> HashMap<String, Binding> {
        self.variables
            .iter()
            .filter(|(k, _)| !k.starts_with(EXPORT_PREFIX))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn aliases(&self) -> HashMap<String, String> {
        self.aliases.clone()
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn bind_value(&self, ident: &str, binding: Binding) -> Result<Env> {
        if self.contains(ident) {
            return Err(yovec_err!(
                Redefinition,
                "cannot redefine existing variable: {}",
                ident
            ));
        }
        Ok(self.insert(ident.to_string(), binding))
    }

    fn insert(&self, key: String, binding: Binding) -> Env {
        Env {
            variables: self.variables.update(key, binding),
            ..self.clone()
        }
    }
}

fn export_key(ident: &str) -> String {
    format!("{}{}", EXPORT_PREFIX, ident)
}
