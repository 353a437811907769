//! Identifier mangling.
//!
//! Replaces every emitted `variable` name with the shortest free name from
//! [`NamePool`], except names in the excluded set (imports and export targets),
//! which pass through untouched and are never handed out as replacements.
//! `external` leaves are not variables and are never renamed.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::ast::{output, Node};

// ============================================================================
// NAME POOL
// ============================================================================

/// Infinite, restartable sequence `a..z, aa..zz, aaa..`.
///
/// Shorter names come first; within a length class names ascend
/// lexicographically.
///
/// # Examples
///
/// ```rust
/// use yovec::optimize::mangle::NamePool;
/// let names: Vec<String> = NamePool::new().skip(24).take(4).collect();
/// assert_eq!(names, vec!["y", "z", "aa", "ab"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NamePool {
    digits: Vec<u8>,
}

impl NamePool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Iterator for NamePool {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let carried = self
            .digits
            .iter_mut()
            .rev()
            .all(|d| {
                if *d < 25 {
                    *d += 1;
                    false
                } else {
                    *d = 0;
                    true
                }
            });
        if carried {
            self.digits.push(0);
        }
        Some(self.digits.iter().map(|d| (b'a' + d) as char).collect())
    }
}

// ============================================================================
// MANGLER
// ============================================================================

/// Memoizing replacement table; a name's replacement is fixed at first sight.
#[derive(Debug, Clone)]
pub struct Mangler {
    excluded: HashSet<String>,
    replaced: HashMap<String, String>,
    pool: NamePool,
}

impl Mangler {
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
            replaced: HashMap::new(),
            pool: NamePool::new(),
        }
    }

    pub fn replace(&mut self, name: &str) -> String {
        if self.excluded.contains(name) {
            return name.to_string();
        }
        if let Some(existing) = self.replaced.get(name) {
            return existing.clone();
        }
        let excluded = &self.excluded;
        let replacement = self
            .pool
            .find(|candidate| !excluded.contains(candidate))
            .unwrap_or_default();
        trace!(from = %name, to = %replacement, "mangle");
        self.replaced.insert(name.to_string(), replacement.clone());
        replacement
    }

    /// Replacements chosen so far.
    pub fn replacements(&self) -> &HashMap<String, String> {
        &self.replaced
    }
}

/// Returns a clone of `program` with every non-excluded variable renamed.
///
/// # Examples
///
/// ```rust
/// use yovec::ast::output::{assign, binary, line, listing, program, variable};
/// use yovec::optimize::mangle::mangle_names;
/// let p = program(vec![line(vec![
///     assign("v0e0", binary("+", variable("a"), variable("v1e"))),
///     assign("OUT", variable("v0e0")),
/// ])]);
/// let mangled = mangle_names(&p, &["a".to_string()], &["OUT".to_string()]);
/// assert_eq!(listing(&mangled), vec!["b=a+c OUT=b"]);
/// ```
pub fn mangle_names(program: &Node, imported: &[String], exported: &[String]) -> Node {
    let mut mangler = Mangler::new(imported.iter().chain(exported).cloned());
    let mut clone = program.clone();
    clone.walk_mut(&mut |node| {
        if node.kind != output::VARIABLE {
            return;
        }
        if let Some(name) = node.value.as_deref() {
            let replacement = mangler.replace(name);
            node.value = Some(replacement);
        }
    });
    clone
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::output::{assign, external, line, listing, program, variable};

    #[test]
    fn test_pool_rolls_over_length_classes() {
        let names: Vec<String> = NamePool::new().take(26 + 26 * 26 + 1).collect();
        assert_eq!(names[0], "a");
        assert_eq!(names[25], "z");
        assert_eq!(names[26], "aa");
        assert_eq!(names[27], "ab");
        assert_eq!(names[26 + 26 * 26 - 1], "zz");
        assert_eq!(names[26 + 26 * 26], "aaa");
    }

    #[test]
    fn test_replacements_are_consistent_and_skip_excluded() {
        let mut mangler = Mangler::new(["a", "c"]);
        assert_eq!(mangler.replace("x"), "b");
        assert_eq!(mangler.replace("y"), "d");
        assert_eq!(mangler.replace("x"), "b");
        assert_eq!(mangler.replace("a"), "a");
        assert_eq!(mangler.replacements().len(), 2);
    }

    #[test]
    fn test_externals_untouched() {
        let p = program(vec![line(vec![assign("v0e", external(":door"))])]);
        assert_eq!(listing(&mangle_names(&p, &[], &[])), vec!["a=:door"]);
    }

    #[test]
    fn test_injective_over_many_names() {
        let assignments = (0..100)
            .map(|i| assign(&format!("v{}e", i), variable("seed")))
            .collect();
        let mangled = mangle_names(&program(vec![line(assignments)]), &["seed".into()], &[]);
        let names: HashSet<_> = mangled
            .find(|n| n.kind == output::VARIABLE)
            .into_iter()
            .filter_map(|n| n.value.clone())
            .collect();
        assert_eq!(names.len(), 101);
        assert!(names.contains("seed"));
    }
}
