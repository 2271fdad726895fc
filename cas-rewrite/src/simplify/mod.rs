//! Module to simplify expressions.
//!
//! This module provides the [`simplify`] function, which rewrites an expression with a set of
//! [`Rule`]s until no more rules apply.
//!
//! Simplification is bottom-up: the arguments of a node are always simplified before any rule is
//! tried on the node itself, so rules may assume that their captures are already simplified. Rules
//! are then tried in order; as soon as one fires, the rewritten node is simplified again from
//! scratch, since any rule (including an earlier one) may apply to the result. When no rule
//! applies, a sum or product left with a single argument is collapsed into that argument.
//!
//! Termination is the responsibility of the rule author: a rule whose replacement reproduces the
//! shape it matched will rewrite forever.

pub mod rules;
pub mod step;

use cas_error::Error;
use crate::{expr::Expr, pattern::{expand::ExpanderConfig, matcher::Matcher}};
use rules::Rule;
use step::{Step, StepCollector};

/// Drives rule-based simplification, keeping the pattern expansion cache between calls.
#[derive(Debug, Default)]
pub struct Simplifier {
    matcher: Matcher,
}

impl Simplifier {
    /// Creates a simplifier whose pattern expander uses the given settings.
    pub fn new(config: ExpanderConfig) -> Self {
        Self { matcher: Matcher::new(config) }
    }

    /// Returns the matcher used by this simplifier.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Returns the matcher used by this simplifier, for reconfiguration.
    pub fn matcher_mut(&mut self) -> &mut Matcher {
        &mut self.matcher
    }

    /// Simplifies the given expression with the given rules.
    pub fn simplify(&mut self, expr: &Expr, rules: &[Rule]) -> Result<Expr, Error> {
        self.simplify_node(expr.clone(), rules, &mut ())
    }

    /// Simplifies the given expression with the given rules. The rewrites applied along the way
    /// are also returned, in the order they were applied.
    pub fn simplify_with_steps(
        &mut self,
        expr: &Expr,
        rules: &[Rule],
    ) -> Result<(Expr, Vec<Step>), Error> {
        let mut steps = Vec::new();
        let expr = self.simplify_node(expr.clone(), rules, &mut steps)?;
        Ok((expr, steps))
    }

    /// Base implementation of the simplification algorithm.
    fn simplify_node(
        &mut self,
        mut expr: Expr,
        rules: &[Rule],
        step_collector: &mut dyn StepCollector<Step>,
    ) -> Result<Expr, Error> {
        'simplify: loop {
            // simplify the children first
            expr = expr.try_map_args(|arg| self.simplify_node(arg, rules, &mut *step_collector))?;

            for rule in rules {
                if let Some(result) = self.matcher.apply(&expr, rule)? {
                    log::debug!("applied `{}`: {} => {}", rule.name, expr, result);
                    step_collector.push(Step { rule: rule.name, result: result.clone() });
                    expr = result;
                    continue 'simplify;
                }
            }

            return Ok(match expr {
                Expr::Add(mut args) | Expr::Mul(mut args) if args.len() == 1 => args.remove(0),
                expr => expr,
            });
        }
    }
}

/// Simplifies the given expression with the given rules, using a fresh [`Simplifier`] with the
/// default settings.
pub fn simplify(expr: &Expr, rules: &[Rule]) -> Result<Expr, Error> {
    Simplifier::default().simplify(expr, rules)
}

/// Simplifies the given expression with the given rules, using a fresh [`Simplifier`] with the
/// default settings. The rewrites applied along the way are also returned.
pub fn simplify_with_steps(expr: &Expr, rules: &[Rule]) -> Result<(Expr, Vec<Step>), Error> {
    Simplifier::default().simplify_with_steps(expr, rules)
}
