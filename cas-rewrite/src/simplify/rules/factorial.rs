//! Simplification rules for factorials.

use crate::{expr::Expr, number::Number, pattern::{builder::*, Captures, Predicate}};
use rug::Integer;
use super::{number, Rule};

/// The largest argument for which a factorial is computed exactly.
const MAX_FACTORIAL: u32 = 100;

/// `5! = 120`
///
/// Only applies to integer literals from 0 to 100 inclusive.
pub fn factorial_literal() -> Rule {
    fn replace(captures: &Captures) -> Expr {
        let n = number(captures, "N")
            .to_u32()
            .unwrap_or_else(|| unreachable!("argument is constrained to a small integer"));
        Expr::Literal(Number::from_int(Integer::from(Integer::factorial(n))))
    }

    let small = Predicate::named("small_factorial_argument", |expr| {
        expr.as_number()
            .and_then(Number::to_u32)
            .is_some_and(|n| n <= MAX_FACTORIAL)
    });

    Rule::node(
        "factorial_literal",
        factorial(capture("N", literal().with_predicate(small))),
        &["N"],
        replace,
    )
}

/// Returns all factorial rules.
pub fn rules() -> Vec<Rule> {
    vec![factorial_literal()]
}

#[cfg(test)]
mod tests {
    use crate::simplify::Simplifier;
    use pretty_assertions::assert_eq;
    use super::*;

    fn simplify(expr: Expr) -> Expr {
        Simplifier::default().simplify(&expr, &rules()).unwrap()
    }

    #[test]
    fn small_factorials() {
        assert_eq!(simplify(Expr::zero().factorial()), Expr::one());
        assert_eq!(simplify(Expr::int(5).factorial()), Expr::int(120));
        assert_eq!(simplify(Expr::int(3).factorial().factorial()), Expr::int(720));
    }

    #[test]
    fn large_factorial_exact() {
        let expected = Number::from_int(Integer::from(Integer::factorial(30)));
        assert_eq!(simplify(Expr::int(30).factorial()), Expr::Literal(expected));
    }

    #[test]
    fn left_alone() {
        for expr in [
            Expr::int(-1).factorial(),
            Expr::fraction(1, 2).unwrap().factorial(),
            Expr::int(101).factorial(),
            Expr::var("n").factorial(),
        ] {
            assert_eq!(simplify(expr.clone()), expr);
        }
    }
}
