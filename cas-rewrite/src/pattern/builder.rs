//! Free functions for authoring [`Pattern`]s.
//!
//! Every function returns a [`Pattern`] with a single alternative; use [`Pattern::or`] to add
//! more. Sums and products are always commutative, so `add([cap("P"), zero()])` matches both
//! `x + 0` and `0 + x`.

use crate::{expr::ExprKind, number::Number};
use std::cmp::Ordering;
use super::{DetectionNode, Pattern, Predicate};

/// Builds a pattern matching a node of the given kind, with the given argument slots.
fn node(kind: ExprKind, args: Vec<Pattern>, commutative: bool) -> Pattern {
    Pattern::from(DetectionNode {
        kind: Some(kind),
        args: Some(args),
        commutative,
        ..Default::default()
    })
}

/// Builds a pattern matching a literal that satisfies the given named predicate.
fn literal_class(name: &'static str, test: fn(&Number) -> bool) -> Pattern {
    literal().with_predicate(Predicate::named(name, move |expr| {
        expr.as_number().is_some_and(test)
    }))
}

/// Matches a sum of the given terms, in any order.
pub fn add(terms: impl IntoIterator<Item = Pattern>) -> Pattern {
    node(ExprKind::Add, terms.into_iter().collect(), true)
}

/// Matches a product of the given factors, in any order.
pub fn mul(factors: impl IntoIterator<Item = Pattern>) -> Pattern {
    node(ExprKind::Mul, factors.into_iter().collect(), true)
}

/// Matches `a - b`, which is represented as `a + b * -1`.
pub fn sub(a: Pattern, b: Pattern) -> Pattern {
    add([a, neg(b)])
}

/// Matches `a / b`, which is represented as `a * b^-1`.
pub fn div(a: Pattern, b: Pattern) -> Pattern {
    mul([a, pow(b, neg_one())])
}

/// Matches `a^b`.
pub fn pow(base: Pattern, exp: Pattern) -> Pattern {
    node(ExprKind::Exp, vec![base, exp], false)
}

/// Matches `-p`, which is represented as `p * -1`.
pub fn neg(pattern: Pattern) -> Pattern {
    mul([pattern, neg_one()])
}

/// Matches `|p|`.
pub fn abs(pattern: Pattern) -> Pattern {
    node(ExprKind::Abs, vec![pattern], false)
}

/// Matches `p!`.
pub fn factorial(pattern: Pattern) -> Pattern {
    node(ExprKind::Factorial, vec![pattern], false)
}

/// Matches a call to the function with the given name, with the given arguments in order.
pub fn func(name: impl Into<String>, args: impl IntoIterator<Item = Pattern>) -> Pattern {
    Pattern::from(DetectionNode {
        kind: Some(ExprKind::Call),
        name: Some(name.into()),
        args: Some(args.into_iter().collect()),
        ..Default::default()
    })
}

/// Binds whatever `pattern` matches to the given capture name.
pub fn capture(name: impl Into<String>, pattern: Pattern) -> Pattern {
    let name = name.into();
    Pattern(pattern.0.into_iter()
        .map(|node| DetectionNode { capture: Some(name.clone()), ..node })
        .collect())
}

/// Matches anything, binding it to the given capture name.
pub fn cap(name: impl Into<String>) -> Pattern {
    capture(name, wildcard())
}

/// Matches anything.
pub fn wildcard() -> Pattern {
    Pattern::from(DetectionNode::default())
}

/// Matches any variable.
pub fn variable() -> Pattern {
    Pattern::from(DetectionNode { kind: Some(ExprKind::Variable), ..Default::default() })
}

/// Matches the variable with the given name.
pub fn var(name: impl Into<String>) -> Pattern {
    Pattern::from(DetectionNode {
        kind: Some(ExprKind::Variable),
        name: Some(name.into()),
        ..Default::default()
    })
}

/// Matches any named constant.
pub fn constant() -> Pattern {
    Pattern::from(DetectionNode { kind: Some(ExprKind::Constant), ..Default::default() })
}

/// Matches any literal.
pub fn literal() -> Pattern {
    Pattern::from(DetectionNode { kind: Some(ExprKind::Literal), ..Default::default() })
}

/// Matches the literal with exactly the given value.
pub fn value(value: Number) -> Pattern {
    Pattern::from(DetectionNode {
        kind: Some(ExprKind::Literal),
        value: Some(value),
        ..Default::default()
    })
}

/// Matches the literal `0`.
pub fn zero() -> Pattern {
    value(Number::from_int(0))
}

/// Matches the literal `1`.
pub fn one() -> Pattern {
    value(Number::from_int(1))
}

/// Matches the literal `-1`.
pub fn neg_one() -> Pattern {
    value(Number::from_int(-1))
}

/// Matches any real integer literal.
pub fn integer() -> Pattern {
    literal_class("integer", Number::is_integer)
}

/// Matches any real integer literal greater than zero.
pub fn positive_integer() -> Pattern {
    literal_class("positive_integer", |n| {
        n.is_integer() && n.real_sign() == Some(Ordering::Greater)
    })
}

/// Matches any real integer literal less than zero.
pub fn negative_integer() -> Pattern {
    literal_class("negative_integer", |n| {
        n.is_integer() && n.real_sign() == Some(Ordering::Less)
    })
}

/// Matches any real integer literal greater than or equal to zero.
pub fn non_negative_integer() -> Pattern {
    literal_class("non_negative_integer", |n| {
        n.is_integer() && n.real_sign() != Some(Ordering::Less)
    })
}

/// Matches any rational literal, that is, any literal with no imaginary part.
///
/// Every literal is an exact fraction, so this accepts the same literals as [`real`]. It is a
/// separate predicate so that rules can state which of the two they mean.
pub fn rational() -> Pattern {
    literal_class("rational", Number::is_real)
}

/// Matches any real literal.
pub fn real() -> Pattern {
    literal_class("real", Number::is_real)
}

/// Matches any real literal greater than or equal to zero.
pub fn positive_real() -> Pattern {
    literal_class("positive_real", |n| n.real_sign().is_some_and(|s| s != Ordering::Less))
}

/// Matches any real literal less than zero.
pub fn negative_real() -> Pattern {
    literal_class("negative_real", |n| n.real_sign() == Some(Ordering::Less))
}

/// Matches any purely imaginary, non-zero literal.
pub fn imaginary() -> Pattern {
    literal_class("imaginary", Number::is_imaginary)
}

/// Matches any purely imaginary literal with a positive imaginary part.
pub fn positive_imaginary() -> Pattern {
    literal_class("positive_imaginary", |n| {
        n.is_imaginary() && n.imag.cmp0() == Ordering::Greater
    })
}

/// Matches any purely imaginary literal with a negative imaginary part.
pub fn negative_imaginary() -> Pattern {
    literal_class("negative_imaginary", |n| {
        n.is_imaginary() && n.imag.cmp0() == Ordering::Less
    })
}

/// Matches any literal with both a non-zero real part and a non-zero imaginary part.
pub fn complex() -> Pattern {
    literal_class("complex", |n| {
        n.real.cmp0() != Ordering::Equal && n.imag.cmp0() != Ordering::Equal
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::expr::Expr;
    use super::*;

    /// Checks the predicates of the pattern's first alternative against `expr`.
    fn is_in_class(pattern: &Pattern, expr: &Expr) -> bool {
        pattern.alternatives()
            .first()
            .is_some_and(|node| node.predicates.iter().all(|p| p.test(expr)))
    }

    #[test]
    fn sum_is_commutative() {
        let pattern = add([cap("P"), zero()]);
        let node = &pattern.alternatives()[0];
        assert_eq!(node.kind, Some(ExprKind::Add));
        assert!(node.commutative);
        assert_eq!(node.args.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn negation_shape() {
        let pattern = neg(cap("P"));
        let node = &pattern.alternatives()[0];
        assert_eq!(node.kind, Some(ExprKind::Mul));
        let args = node.args.as_ref().unwrap();
        assert_eq!(args[0].alternatives()[0].capture.as_deref(), Some("P"));
        assert_eq!(args[1], neg_one());
    }

    #[test]
    fn capture_applies_to_every_alternative() {
        let pattern = capture("P", variable().or(constant()));
        assert!(pattern.alternatives().iter().all(|node| node.capture.as_deref() == Some("P")));
    }

    #[test]
    fn literal_classes() {
        let half = Expr::fraction(1, 2).unwrap();
        let three = Expr::int(3);
        let minus_two = Expr::int(-2);
        let i = Expr::Literal(Number::i());

        assert!(is_in_class(&integer(), &three));
        assert!(is_in_class(&positive_integer(), &three));
        assert!(!is_in_class(&positive_integer(), &Expr::zero()));
        assert!(is_in_class(&non_negative_integer(), &Expr::zero()));
        assert!(!is_in_class(&integer(), &half));
        assert!(is_in_class(&negative_integer(), &minus_two));
        assert!(!is_in_class(&non_negative_integer(), &minus_two));
        assert!(is_in_class(&positive_real(), &half));
        assert!(!is_in_class(&real(), &i));
        assert!(is_in_class(&imaginary(), &i));
        assert!(!is_in_class(&complex(), &i));
        assert!(!is_in_class(&integer(), &Expr::var("x")));
    }

    #[test]
    fn rational_and_signed_imaginary_classes() {
        let half = Expr::fraction(-1, 2).unwrap();
        let i = Expr::Literal(Number::i());
        let minus_i = Expr::Literal(-&Number::i());
        let one_plus_i = Expr::Literal(&Number::from_int(1) + &Number::i());

        assert!(is_in_class(&rational(), &half));
        assert!(!is_in_class(&rational(), &i));
        assert!(is_in_class(&positive_imaginary(), &i));
        assert!(!is_in_class(&positive_imaginary(), &minus_i));
        assert!(is_in_class(&negative_imaginary(), &minus_i));
        assert!(!is_in_class(&negative_imaginary(), &i));
        assert!(!is_in_class(&positive_imaginary(), &one_plus_i));
        assert!(!is_in_class(&negative_imaginary(), &half));
    }
}
