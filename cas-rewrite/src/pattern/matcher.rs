//! Matching of concrete pattern [`Instance`]s against expressions.
//!
//! A **full match** compares an instance against a node positionally: the node must satisfy every
//! constraint of the instance, and its arguments must match the instance's argument slots one by
//! one, in order.
//!
//! A **partial match** applies only to sums and products. It compares the instance's `m` argument
//! slots against every combination of `m` of the node's `n` arguments, in index-ascending order,
//! and succeeds with the first combination that matches. The matched indices are reported so that
//! a rule can replace exactly those arguments and leave the rest untouched. The slots themselves
//! are never reordered here; the [`Expander`] has already enumerated every order of a commutative
//! pattern.

use cas_error::Error;
use crate::{expr::Expr, simplify::rules::{Replacement, Rule}};
use itertools::Itertools;
use super::{expand::{Expander, ExpanderConfig}, Captures, Instance, Pattern};

/// A successful match.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// The nodes bound to each capture name.
    pub captures: Captures,

    /// The indices of the arguments consumed by the match, in ascending order. A full match on a
    /// node with arguments consumes all of them. [`None`] if the matched node is a leaf.
    pub indices: Option<Vec<usize>>,
}

/// Matches patterns against expressions, expanding them first with its own [`Expander`].
#[derive(Debug, Default)]
pub struct Matcher {
    expander: Expander,
}

impl Matcher {
    /// Creates a matcher whose expander uses the given settings.
    pub fn new(config: ExpanderConfig) -> Self {
        Self { expander: Expander::new(config) }
    }

    /// Returns the expander used by this matcher.
    pub fn expander(&self) -> &Expander {
        &self.expander
    }

    /// Returns the expander used by this matcher, for reconfiguration.
    pub fn expander_mut(&mut self) -> &mut Expander {
        &mut self.expander
    }

    /// Matches `expr` against `pattern`, returning the first successful match.
    ///
    /// Every instance of the pattern is tried in expansion order: first as a full match, then, for
    /// sums and products, as a partial match. A non-match is `Ok(None)`; the only errors are those
    /// of the expander.
    pub fn matches(&mut self, expr: &Expr, pattern: &Pattern) -> Result<Option<Match>, Error> {
        let instances = self.expander.expand(pattern)?;
        Ok(instances.iter().find_map(|instance| match_any(expr, instance)))
    }

    /// Tries to apply the rule to `expr`, returning the rewritten expression if it fires.
    ///
    /// The rule fires for the first instance of its pattern that matches `expr` and binds every
    /// capture the rule requires. If a match lacks a required capture, or a children replacement
    /// is matched against a node whose arguments cannot be replaced, the next instance is tried.
    pub fn apply(&mut self, expr: &Expr, rule: &Rule) -> Result<Option<Expr>, Error> {
        let instances = self.expander.expand(&rule.pattern)?;

        for instance in instances.iter() {
            let Some(found) = match_any(expr, instance) else {
                continue;
            };

            if !rule.required.iter().all(|name| found.captures.contains(name)) {
                continue;
            }

            match rule.replacement {
                Replacement::Node(replace) => return Ok(Some(replace(&found.captures))),
                Replacement::Children(replace) if expr.is_variadic() => {
                    let Some(indices) = found.indices else {
                        continue;
                    };
                    let replaced = expr.clone().replace_args(&indices, replace(&found.captures));
                    if replaced.is_some() {
                        return Ok(replaced);
                    }
                },
                Replacement::Children(_) => (),
            }
        }

        Ok(None)
    }
}

/// Matches `expr` against `pattern` with a fresh [`Matcher`], using the default settings.
pub fn matches(expr: &Expr, pattern: &Pattern) -> Result<Option<Match>, Error> {
    Matcher::default().matches(expr, pattern)
}

/// Tries a full match of `expr` against `instance`, then a partial match if `expr` is a sum or
/// product.
fn match_any(expr: &Expr, instance: &Instance) -> Option<Match> {
    match_full(expr, instance).or_else(|| {
        if expr.kind().is_commutative() {
            match_partial(expr, instance)
        } else {
            None
        }
    })
}

/// Matches `expr` against `instance` positionally.
fn match_full(expr: &Expr, instance: &Instance) -> Option<Match> {
    let mut captures = Captures::default();
    match_node(expr, instance, &mut captures).then(|| Match {
        captures,
        indices: expr.args().map(|args| (0..args.len()).collect()),
    })
}

/// Matches the argument slots of `instance` against every index-ascending combination of the
/// arguments of `expr`, returning the first combination that matches.
fn match_partial(expr: &Expr, instance: &Instance) -> Option<Match> {
    let slots = instance.args.as_ref()?;
    if instance.kind != Some(expr.kind()) {
        return None;
    }

    let args = expr.args()?;
    index_combinations(args.len(), slots.len()).find_map(|indices| {
        let mut captures = Captures::default();
        indices.iter()
            .zip(slots)
            .all(|(&idx, slot)| match_node(args[idx], slot, &mut captures))
            .then_some(Match { captures, indices: Some(indices) })
    })
}

/// Checks every constraint of `instance` against `expr`, recording captures as it goes.
fn match_node(expr: &Expr, instance: &Instance, captures: &mut Captures) -> bool {
    if let Some(name) = &instance.capture {
        if !captures.bind(name, expr) {
            return false;
        }
    }

    if instance.kind.is_some_and(|kind| kind != expr.kind()) {
        return false;
    }

    if let Some(name) = &instance.name {
        if expr.name() != Some(name.as_str()) {
            return false;
        }
    }

    if let Some(value) = &instance.value {
        if expr.as_number() != Some(value) {
            return false;
        }
    }

    if !instance.predicates.iter().all(|predicate| predicate.test(expr)) {
        return false;
    }

    match (&instance.args, expr.args()) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(slots), Some(args)) => {
            slots.len() == args.len()
                && args.into_iter().zip(slots).all(|(arg, slot)| match_node(arg, slot, captures))
        },
    }
}

/// Returns every combination of `k` indices out of `0..n`, each in ascending order, with the
/// combinations themselves in lexicographic order.
fn index_combinations(n: usize, k: usize) -> impl Iterator<Item = Vec<usize>> {
    (0..n).combinations(k)
}
