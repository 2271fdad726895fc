//! Simplification rules for expressions involving addition, including combining like terms.

use crate::{expr::Expr, pattern::{builder::*, Captures}};
use super::Rule;

/// `0+a = a`
/// `a+0 = a`
pub fn add_zero() -> Rule {
    fn replace(captures: &Captures) -> Expr {
        captures["P"].clone()
    }

    Rule::children("add_zero", add([cap("P"), zero()]), &["P"], replace)
}

/// `2+3 = 5`
pub fn add_literals() -> Rule {
    fn replace(captures: &Captures) -> Expr {
        Expr::sum([captures["P"].clone(), captures["Q"].clone()])
    }

    Rule::children(
        "add_literals",
        add([capture("P", literal()), capture("Q", literal())]),
        &["P", "Q"],
        replace,
    )
}

/// `a+a = 2a`
pub fn add_same() -> Rule {
    fn replace(captures: &Captures) -> Expr {
        Expr::product([captures["P"].clone(), Expr::int(2)])
    }

    Rule::children("add_same", add([cap("P"), cap("P")]), &["P"], replace)
}

/// `a+qa = (q+1)a`
pub fn add_coefficient() -> Rule {
    fn replace(captures: &Captures) -> Expr {
        let coefficient = Expr::sum([captures["Q"].clone(), Expr::one()]);
        Expr::product([captures["P"].clone(), coefficient])
    }

    Rule::children(
        "add_coefficient",
        add([cap("P"), mul([cap("Q"), cap("P")])]),
        &["P", "Q"],
        replace,
    )
}

/// `qa+ra = (q+r)a`
pub fn add_coefficients() -> Rule {
    fn replace(captures: &Captures) -> Expr {
        let coefficient = Expr::sum([captures["Q"].clone(), captures["R"].clone()]);
        Expr::product([captures["P"].clone(), coefficient])
    }

    Rule::children(
        "add_coefficients",
        add([mul([cap("Q"), cap("P")]), mul([cap("R"), cap("P")])]),
        &["P", "Q", "R"],
        replace,
    )
}

/// Returns all addition rules.
pub fn rules() -> Vec<Rule> {
    vec![
        add_zero(),
        add_literals(),
        add_same(),
        add_coefficient(),
        add_coefficients(),
    ]
}
