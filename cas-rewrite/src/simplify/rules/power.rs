//! Simplification rules for powers.

use crate::{expr::Expr, number::Number, pattern::{builder::*, Captures, Predicate}};
use std::cmp::Ordering;
use super::{number, Rule};

/// The largest exponent magnitude for which a literal power is computed exactly.
const MAX_LITERAL_EXPONENT: u64 = 64;

/// Returns the integer exponent held by `expr`, if it is small enough to compute exactly.
fn small_exponent(expr: &Expr) -> Option<i64> {
    expr.as_number()
        .and_then(Number::to_i64)
        .filter(|n| n.unsigned_abs() <= MAX_LITERAL_EXPONENT)
}

/// `a^0 = 1`
pub fn power_zero() -> Rule {
    fn replace(_: &Captures) -> Expr {
        Expr::one()
    }

    Rule::node("power_zero", pow(wildcard(), zero()), &[], replace)
}

/// `a^1 = a`
pub fn power_one() -> Rule {
    fn replace(captures: &Captures) -> Expr {
        captures["P"].clone()
    }

    Rule::node("power_one", pow(cap("P"), one()), &["P"], replace)
}

/// `1^a = 1`
pub fn power_one_left() -> Rule {
    fn replace(_: &Captures) -> Expr {
        Expr::one()
    }

    Rule::node("power_one_left", pow(one(), wildcard()), &[], replace)
}

/// `2^3 = 8`
/// `2^(-2) = 1/4`
/// `0^3 = 0`
///
/// Only applies to real bases and integer exponents no larger than 64 in magnitude. A zero base
/// requires a positive exponent.
pub fn power_literals() -> Rule {
    fn replace(captures: &Captures) -> Expr {
        let base = number(captures, "P");
        let exp = small_exponent(&captures["N"])
            .unwrap_or_else(|| unreachable!("exponent is constrained to a small integer"));
        let value = base.pow(exp)
            .unwrap_or_else(|| unreachable!("zero base is constrained to a positive exponent"));
        Expr::Literal(value)
    }

    let small_integer = Predicate::named("small_integer", |expr| small_exponent(expr).is_some());
    let positive_small_integer = Predicate::named("positive_small_integer", |expr| {
        small_exponent(expr).is_some_and(|n| n > 0)
    });
    let non_zero_real = Predicate::named("non_zero_real", |expr| {
        expr.as_number()
            .and_then(Number::real_sign)
            .is_some_and(|sign| sign != Ordering::Equal)
    });

    let pattern = pow(
        capture("P", literal().with_predicate(non_zero_real)),
        capture("N", literal().with_predicate(small_integer)),
    ).or(pow(
        capture("P", zero()),
        capture("N", literal().with_predicate(positive_small_integer)),
    ));

    Rule::node("power_literals", pattern, &["P", "N"], replace)
}

/// Returns all power rules.
pub fn rules() -> Vec<Rule> {
    vec![
        power_zero(),
        power_one(),
        power_one_left(),
        power_literals(),
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
    fn trivial_exponents() {
        assert_eq!(simplify(x().pow(Expr::zero())), Expr::one());
        assert_eq!(simplify(x().pow(Expr::one())), x());
        assert_eq!(simplify(Expr::one().pow(x())), Expr::one());
    }

    #[test]
    fn literal_powers() {
        assert_eq!(simplify(Expr::int(2).pow(Expr::int(10))), Expr::int(1024));
        assert_eq!(simplify(Expr::int(2).pow(Expr::int(-2))), Expr::fraction(1, 4).unwrap());
        assert_eq!(
            simplify(Expr::fraction(-2, 3).unwrap().pow(Expr::int(3))),
            Expr::fraction(-8, 27).unwrap(),
        );
        assert_eq!(simplify(Expr::zero().pow(Expr::int(5))), Expr::zero());
    }

    #[test]
    fn literal_powers_left_alone() {
        let zero_negative = Expr::zero().pow(Expr::int(-1));
        assert_eq!(simplify(zero_negative.clone()), zero_negative);

        let large = Expr::int(2).pow(Expr::int(65));
        assert_eq!(simplify(large.clone()), large);

        let fractional = Expr::int(2).pow(Expr::fraction(1, 2).unwrap());
        assert_eq!(simplify(fractional.clone()), fractional);
    }

    #[test]
    fn zero_to_zero() {
        assert_eq!(simplify(Expr::zero().pow(Expr::zero())), Expr::one());
    }
}
