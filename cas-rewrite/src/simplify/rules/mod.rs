//! Rewrite rules, and the rule sets shipped with the engine.
//!
//! A [`Rule`] pairs a [`Pattern`] with a replacement function. The simplifier treats a rule set as
//! an opaque, ordered list; rules are tried in order, and the first one that fires wins. Any slice
//! of rules can be passed to the simplifier, so the sets below can be combined or replaced freely.
//!
//! Each replacement function receives the captures bound by the match. It is only called once
//! every capture listed in [`Rule::required`] is bound, so it may index those captures directly.

pub mod absolute;
pub mod add;
pub mod factorial;
pub mod multiply;
pub mod power;

use crate::{expr::Expr, number::Number, pattern::{Captures, Pattern}};
use once_cell::sync::Lazy;
use std::fmt;

/// How a rule rewrites the node it matched.
#[derive(Clone, Copy)]
pub enum Replacement {
    /// The whole node is replaced with the returned node.
    Node(fn(&Captures) -> Expr),

    /// The matched arguments are removed from the node, and the returned node is appended after
    /// the remaining arguments. Only applicable to nodes with a variable number of arguments
    /// (sums, products, lists and function calls); on other nodes the rule does not fire.
    Children(fn(&Captures) -> Expr),
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(_) => write!(f, "Node(..)"),
            Self::Children(_) => write!(f, "Children(..)"),
        }
    }
}

/// A rewrite rule.
#[derive(Debug, Clone)]
pub struct Rule {
    /// A short name for the rule, used in logs and collected steps.
    pub name: &'static str,

    /// The pattern the node must match.
    pub pattern: Pattern,

    /// The captures that must be bound for the rule to fire.
    pub required: Vec<&'static str>,

    /// The replacement to apply when the rule fires.
    pub replacement: Replacement,
}

impl Rule {
    /// Creates a rule that replaces the whole matched node.
    pub fn node(
        name: &'static str,
        pattern: Pattern,
        required: &[&'static str],
        replace: fn(&Captures) -> Expr,
    ) -> Self {
        Self { name, pattern, required: required.to_vec(), replacement: Replacement::Node(replace) }
    }

    /// Creates a rule that replaces only the matched arguments of the node.
    pub fn children(
        name: &'static str,
        pattern: Pattern,
        required: &[&'static str],
        replace: fn(&Captures) -> Expr,
    ) -> Self {
        Self { name, pattern, required: required.to_vec(), replacement: Replacement::Children(replace) }
    }
}

/// Returns the number held by the literal bound to `name`.
///
/// # Panics
///
/// Panics if `name` is unbound or not bound to a literal. Rules only call this for required
/// captures that their pattern constrains to literals.
fn number<'a>(captures: &'a Captures, name: &str) -> &'a Number {
    match &captures[name] {
        Expr::Literal(n) => n,
        other => panic!("capture `{}` is not a literal: {}", name, other),
    }
}

/// Rules for sums.
pub static ADDITION: Lazy<Vec<Rule>> = Lazy::new(add::rules);

/// Rules for products.
pub static MULTIPLICATION: Lazy<Vec<Rule>> = Lazy::new(multiply::rules);

/// Rules for powers.
pub static POWER: Lazy<Vec<Rule>> = Lazy::new(power::rules);

/// Rules for absolute values.
pub static ABSOLUTE: Lazy<Vec<Rule>> = Lazy::new(absolute::rules);

/// Rules for factorials.
pub static FACTORIAL: Lazy<Vec<Rule>> = Lazy::new(factorial::rules);

/// A minimal rule set: `p+0 = p`, `p*0 = 0`, `p*1 = p`, and the product of two literals.
pub static BASIC: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        add::add_zero(),
        multiply::multiply_zero(),
        multiply::multiply_one(),
        multiply::multiply_literals(),
    ]
});

/// Every rule, in the order: addition, multiplication, power, absolute value, factorial.
pub static ALL: Lazy<Vec<Rule>> = Lazy::new(|| {
    [&ADDITION, &MULTIPLICATION, &POWER, &ABSOLUTE, &FACTORIAL]
        .into_iter()
        .flat_map(|rules| rules.iter().cloned())
        .collect()
});
