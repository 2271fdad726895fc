//! The pattern language used to author rewrite rules.
//!
//! A [`Pattern`] is a list of alternative [`DetectionNode`]s. Each detection node constrains the
//! shape of a candidate [`Expr`]: its variant, its name, its literal value, its arguments (each of
//! which is itself a [`Pattern`]), and any number of [`Predicate`]s. A detection node can also
//! carry a capture name, which binds the matched node so that a rule's replacement can refer to
//! it.
//!
//! Patterns are declarative, and cannot be matched against a tree directly. The [`Expander`]
//! first turns a pattern into the finite set of concrete [`Instance`]s it implies, resolving slot
//! alternation and enumerating every argument order of commutative nodes. The [`Matcher`] then
//! compares each instance against a tree positionally.
//!
//! Patterns are usually built with the free functions in the [`builder`] module:
//!
//! ```
//! use cas_rewrite::pattern::builder::{add, cap, zero};
//!
//! // matches `x + 0`, `0 + x`, and any sum containing a zero term
//! let pattern = add([cap("P"), zero()]);
//! ```
//!
//! [`Expander`]: expand::Expander
//! [`Matcher`]: matcher::Matcher

pub mod builder;
pub mod cache;
pub mod expand;
pub mod matcher;

use crate::{expr::{Expr, ExprKind}, number::Number};
use serde::{ser::Error as _, Serialize, Serializer};
use std::{collections::HashMap, fmt, ops::Index, sync::Arc};

/// An arbitrary side constraint over a candidate node.
///
/// Named predicates serialize as their name paired with the address of their closure, which
/// together serve as their identity in the expansion cache. Clones of a predicate share the
/// closure and so share a cache entry; predicates built separately never do, even with the same
/// name. Anonymous predicates cannot be serialized, so a pattern containing one can only be
/// expanded with the cache disabled.
#[derive(Clone)]
pub struct Predicate {
    name: Option<&'static str>,
    test: Arc<dyn Fn(&Expr) -> bool + Send + Sync>,
}

impl Predicate {
    /// Creates a named predicate.
    pub fn named(name: &'static str, test: impl Fn(&Expr) -> bool + Send + Sync + 'static) -> Self {
        Self { name: Some(name), test: Arc::new(test) }
    }

    /// Creates an anonymous predicate.
    pub fn anonymous(test: impl Fn(&Expr) -> bool + Send + Sync + 'static) -> Self {
        Self { name: None, test: Arc::new(test) }
    }

    /// Returns the name of the predicate, if it has one.
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// Returns the address of the closure, which identifies the predicate along with its name.
    ///
    /// A cached expansion holds clones of its predicates, so an address cannot be reused by a
    /// different closure while the entry keyed by it exists.
    fn address(&self) -> usize {
        Arc::as_ptr(&self.test) as *const () as usize
    }

    /// Returns true if the predicate accepts the given node.
    pub fn test(&self, expr: &Expr) -> bool {
        (self.test)(expr)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "Predicate({})", name),
            None => write!(f, "Predicate(<anonymous>)"),
        }
    }
}

/// Predicates are equal only if they are the same closure.
impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.test, &other.test)
    }
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.name {
            Some(name) => (name, self.address()).serialize(serializer),
            None => Err(S::Error::custom("anonymous predicates cannot be serialized")),
        }
    }
}

/// A single declarative constraint on a candidate node. Constraints that are [`None`] (or empty)
/// always hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetectionNode {
    /// The variant the candidate must be.
    pub kind: Option<ExprKind>,

    /// The name the candidate must carry.
    pub name: Option<String>,

    /// The literal value the candidate must hold, compared exactly.
    pub value: Option<Number>,

    /// The arguments of the candidate, one pattern per argument.
    pub args: Option<Vec<Pattern>>,

    /// Side constraints the candidate must satisfy.
    pub predicates: Vec<Predicate>,

    /// The name to bind the candidate to.
    pub capture: Option<String>,

    /// Whether the arguments may be matched in any order. Only meaningful when `args` is
    /// constrained.
    pub commutative: bool,
}

impl DetectionNode {
    /// Adds a predicate to the node.
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }
}

/// An ordered list of alternative [`DetectionNode`]s for one logical slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Pattern(pub Vec<DetectionNode>);

impl Pattern {
    /// Adds the alternatives of `other` after the alternatives of this pattern.
    pub fn or(mut self, other: impl Into<Pattern>) -> Self {
        self.0.extend(other.into().0);
        self
    }

    /// Adds a predicate to every alternative of the pattern.
    pub fn with_predicate(self, predicate: Predicate) -> Self {
        Self(self.0.into_iter().map(|node| node.with_predicate(predicate.clone())).collect())
    }

    /// Returns the alternatives of the pattern.
    pub fn alternatives(&self) -> &[DetectionNode] {
        &self.0
    }
}

impl From<DetectionNode> for Pattern {
    fn from(node: DetectionNode) -> Self {
        Self(vec![node])
    }
}

/// A fully resolved detection node: every argument slot holds exactly one instance, and the
/// order of the arguments is fixed.
///
/// Instances are produced by the [`Expander`](expand::Expander).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Instance {
    pub kind: Option<ExprKind>,
    pub name: Option<String>,
    pub value: Option<Number>,
    pub args: Option<Vec<Instance>>,
    pub predicates: Vec<Predicate>,
    pub capture: Option<String>,
}

impl Instance {
    /// Creates an instance from the constraints of the given node, with the given resolved
    /// arguments.
    pub(crate) fn resolve(node: &DetectionNode, args: Option<Vec<Instance>>) -> Self {
        Self {
            kind: node.kind,
            name: node.name.clone(),
            value: node.value.clone(),
            args,
            predicates: node.predicates.clone(),
            capture: node.capture.clone(),
        }
    }
}

/// The nodes bound to each capture name during a match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Captures(HashMap<String, Expr>);

impl Captures {
    /// Returns the node bound to the given name.
    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.0.get(name)
    }

    /// Returns true if a node is bound to the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Binds `expr` to `name`. If the name is already bound, the existing binding must be
    /// structurally equal to `expr`; returns false otherwise.
    pub fn bind(&mut self, name: &str, expr: &Expr) -> bool {
        match self.0.get(name) {
            Some(existing) => existing == expr,
            None => {
                self.0.insert(name.to_string(), expr.clone());
                true
            },
        }
    }

    /// Returns the number of bound names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the bindings, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expr)> {
        self.0.iter().map(|(name, expr)| (name.as_str(), expr))
    }
}

/// Returns the node bound to `name`.
///
/// # Panics
///
/// Panics if nothing is bound to `name`. The simplifier only invokes a replacement after checking
/// that every capture its rule requires is bound.
impl Index<&str> for Captures {
    type Output = Expr;

    fn index(&self, name: &str) -> &Expr {
        &self.0[name]
    }
}

impl<S: Into<String>> FromIterator<(S, Expr)> for Captures {
    fn from_iter<I: IntoIterator<Item = (S, Expr)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(name, expr)| (name.into(), expr)).collect())
    }
}
