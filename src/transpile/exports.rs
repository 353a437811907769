//! Export rename.
//!
//! Rewrites every emitted `variable` whose name starts with the register prefix
//! of an exported binding (`v{index}e`) to the export's after-name, keeping the
//! element suffix. Exports are checked in declaration order and the first match
//! wins.
//!
//! Names starting with `v{n}e` belong to registers. Imports in that namespace
//! are refused by [`Env::bind_import`], and [`export_targets`] lists the names
//! an export will produce so collisions are caught before the rename runs.

use std::collections::HashSet;

use tracing::trace;

use crate::ast::{output, Node};
use crate::diagnostics::Result;
use crate::symbolic::register_prefix;
use crate::yovec_err;

use super::env::{Binding, Env};

/// Names the rename will write for an export of `binding` as `after`.
///
/// A number yields `after` itself; vectors and matrices yield one name per
/// element, suffixed with the row-major element index.
pub fn export_targets(binding: &Binding, after: &str) -> Vec<String> {
    let width = match binding {
        Binding::Number { .. } => return vec![after.to_string()],
        Binding::Vector { value, .. } => value.len(),
        Binding::Matrix { value, .. } => value.rows() * value.cols(),
        Binding::Imported | Binding::Exported => return Vec::new(),
    };
    (0..width).map(|j| format!("{}{}", after, j)).collect()
}

/// Returns the renamed clone of `program` and the identifiers the rename
/// produced, in first-occurrence order.
pub fn rename_exports(
    program: &Node,
    env: &Env,
    exports: &[(String, String)],
) -> Result<(Node, Vec<String>)> {
    let prefixes = exports
        .iter()
        .map(|(before, after)| -> Result<(String, String)> {
            let index = env.lookup(before, None)?.register_index().ok_or_else(|| {
                yovec_err!(TypeMismatch, "exported variable {} has no register", before)
            })?;
            Ok((register_prefix(index), after.clone()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut renamed = program.clone();
    let mut produced = Vec::new();
    let mut seen = HashSet::new();
    renamed.walk_mut(&mut |node| {
        if node.kind != output::VARIABLE {
            return;
        }
        let Some(name) = node.value.as_deref() else {
            return;
        };
        let Some(new_name) = prefixes.iter().find_map(|(prefix, after)| {
            name.strip_prefix(prefix.as_str())
                .map(|suffix| format!("{}{}", after, suffix))
        }) else {
            return;
        };
        trace!(from = %name, to = %new_name, "export rename");
        if seen.insert(new_name.clone()) {
            produced.push(new_name.clone());
        }
        node.value = Some(new_name);
    });
    Ok((renamed, produced))
}
