//! Simplification rules for absolute values.

use crate::{expr::Expr, pattern::{builder::*, Captures}};
use super::{number, Rule};

/// `|-3| = 3`
pub fn absolute_literal() -> Rule {
    fn replace(captures: &Captures) -> Expr {
        let value = number(captures, "P")
            .abs()
            .unwrap_or_else(|| unreachable!("literal is constrained to be real"));
        Expr::Literal(value)
    }

    Rule::node("absolute_literal", abs(capture("P", real())), &["P"], replace)
}

/// `||a|| = |a|`
pub fn absolute_absolute() -> Rule {
    fn replace(captures: &Captures) -> Expr {
        captures["P"].clone().abs()
    }

    Rule::node("absolute_absolute", abs(abs(cap("P"))), &["P"], replace)
}

/// Returns all absolute value rules.
pub fn rules() -> Vec<Rule> {
    vec![
        absolute_literal(),
        absolute_absolute(),
    ]
}
