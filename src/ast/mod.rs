//! Syntax tree module for yovec
//!
//! This module provides the generic, kind-tagged [`Node`] shared by the input
//! program (produced by the external parser) and the output program (consumed
//! by the external printer), plus typed views over both populations.

// ============================================================================
// IMPORTS
// ============================================================================

use serde::{Deserialize, Serialize};

pub mod builder;
pub mod grammar;
pub mod output;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// A node of either the input or the output syntax tree.
///
/// Leaves carry an optional literal `value`; internal nodes carry a complete,
/// ordered `children` list. A node's children are never partially populated.
///
/// # Examples
///
/// ```rust
/// use yovec::ast::Node;
/// let n = Node::branch("number", vec![Node::leaf("literal", "42")]);
/// assert_eq!(n.children().len(), 1);
/// assert_eq!(n.child(0).and_then(|c| c.value.as_deref()), Some("42"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl Node {
    /// Creates a leaf node carrying a literal value.
    pub fn leaf(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: Some(value.into()),
            children: None,
        }
    }

    /// Creates a leaf node with neither value nor children (e.g. an operator).
    pub fn empty(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
            children: None,
        }
    }

    /// Creates an internal node with a complete list of children.
    pub fn branch(kind: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
            children: Some(children),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Returns the children, or an empty slice for a leaf.
    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children().get(index)
    }

    /// Collects this node and every descendant matching `pred`, in pre-order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yovec::ast::Node;
    /// let tree = Node::branch("multi", vec![
    ///     Node::leaf("variable", "a"),
    ///     Node::branch("binary", vec![Node::leaf("variable", "b"), Node::leaf("number", "1")]),
    /// ]);
    /// let names: Vec<_> = tree
    ///     .find(|n| n.kind == "variable")
    ///     .into_iter()
    ///     .filter_map(|n| n.value.as_deref())
    ///     .collect();
    /// assert_eq!(names, vec!["a", "b"]);
    /// ```
    pub fn find<F>(&self, pred: F) -> Vec<&Node>
    where
        F: Fn(&Node) -> bool,
    {
        let mut found = Vec::new();
        self.find_into(&pred, &mut found);
        found
    }

    /// Visits this node and every descendant mutably, in pre-order.
    ///
    /// Rewriting passes call this on a clone so the original tree is preserved.
    pub fn walk_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Node),
    {
        f(self);
        if let Some(children) = self.children.as_mut() {
            for child in children {
                child.walk_mut(f);
            }
        }
    }

    /// Pretty-prints the node as an s-expression.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yovec::ast::Node;
    /// let n = Node::branch("assign", vec![Node::leaf("variable", "v0e0"), Node::leaf("number", "1")]);
    /// assert_eq!(n.pretty(), "(assign (variable v0e0) (number 1))");
    /// ```
    pub fn pretty(&self) -> String {
        match (&self.value, &self.children) {
            (None, None) => self.kind.clone(),
            (Some(value), None) => format!("({} {})", self.kind, value),
            (value, Some(children)) => {
                let mut parts = vec![self.kind.clone()];
                if let Some(value) = value {
                    parts.push(value.clone());
                }
                parts.extend(children.iter().map(Node::pretty));
                format!("({})", parts.join(" "))
            }
        }
    }

    // ------------------------------------------------------------------------
    // Traversal helpers
    // ------------------------------------------------------------------------

    fn find_into<'a, F>(&'a self, pred: &F, found: &mut Vec<&'a Node>)
    where
        F: Fn(&Node) -> bool,
    {
        if pred(self) {
            found.push(self);
        }
        for child in self.children() {
            child.find_into(pred, found);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_serializes_without_children() {
        let json = serde_json::to_string(&Node::leaf("variable", "x")).unwrap();
        assert_eq!(json, r#"{"kind":"variable","value":"x"}"#);
        let back: Node = serde_json::from_str(&json).unwrap();
        assert!(back.is_leaf());
    }

    #[test]
    fn test_walk_mut_on_clone_preserves_original() {
        let original = Node::branch("line", vec![Node::leaf("variable", "a")]);
        let mut clone = original.clone();
        clone.walk_mut(&mut |n| {
            if n.kind == "variable" {
                n.value = Some("z".into());
            }
        });
        assert_eq!(original.pretty(), "(line (variable a))");
        assert_eq!(clone.pretty(), "(line (variable z))");
    }
}
