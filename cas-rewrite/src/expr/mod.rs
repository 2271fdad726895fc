//! The expression tree shared by every part of the engine.
//!
//! An [`Expr`] is an immutable, closed tagged tree. Parsers produce it, the simplifier rewrites it
//! and renderers consume it; the rewrite engine never mutates a tree in place, but always builds a
//! new one.
//!
//! # Structural equality
//!
//! The [`PartialEq`] and [`Eq`] implementations for [`Expr`] implement **structural equality**:
//! two expressions are equal if they are the same variant, carry the same name and / or the same
//! literal value (compared as exact fractions), and have pairwise equal arguments **in the same
//! order**. Tensors additionally compare their shape.
//!
//! Structural equality is not aware of commutativity, so `x + y` and `y + x` are **not** equal.
//! This is intentional; it is the primitive used to check that a repeated capture binds the same
//! node twice, and order-insensitive comparisons are the job of the pattern matcher.
//!
//! # Canonical form
//!
//! A simplified tree never holds an [`Expr::Add`] or [`Expr::Mul`] with a single argument, and
//! never holds an [`Expr::Mul`] whose arguments are all zero. The constructors [`Expr::sum`] and
//! [`Expr::product`] (as well as the [`Add`], [`Mul`] and [`Neg`] operators) uphold these
//! invariants on the nodes they build.

mod iter;

use crate::number::Number;
use iter::ExprIter;
use serde::Serialize;
use std::{cmp::Ordering, fmt, ops::{Add, Mul, Neg}};

/// The variant tag of an [`Expr`], without any of its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExprKind {
    Literal,
    Variable,
    Constant,
    Add,
    Mul,
    Exp,
    Abs,
    Factorial,
    Call,
    Equals,
    List,
    Tensor,
}

impl ExprKind {
    /// Returns true for the commutative n-ary operators, [`ExprKind::Add`] and [`ExprKind::Mul`].
    pub fn is_commutative(self) -> bool {
        matches!(self, Self::Add | Self::Mul)
    }
}

/// A mathematical expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// An exact complex-rational number, such as `2`, `-3/4` or `1 + 2i`.
    Literal(Number),

    /// A variable, such as `x` or `y`.
    Variable(String),

    /// A named constant, such as `pi` or `e`.
    Constant(String),

    /// Multiple terms added together.
    Add(Vec<Expr>),

    /// Multiple factors multiplied together.
    Mul(Vec<Expr>),

    /// An expression raised to a power.
    Exp(Box<Expr>, Box<Expr>),

    /// The absolute value of an expression.
    Abs(Box<Expr>),

    /// The factorial of an expression.
    Factorial(Box<Expr>),

    /// A function call, such as `sin(x)` or `f(x, y)`. Functions are matched by shape only.
    Call(String, Vec<Expr>),

    /// An equation between two expressions.
    Equals(Box<Expr>, Box<Expr>),

    /// A list of expressions.
    List(Vec<Expr>),

    /// A tensor with the given shape, and its elements stored in row-major order. The number of
    /// elements must equal the product of the shape; use [`Expr::tensor`] to construct one.
    Tensor(Vec<usize>, Vec<Expr>),
}

impl Expr {
    /// Creates a literal holding the given integer.
    pub fn int(n: i64) -> Self {
        Self::Literal(Number::from_int(n))
    }

    /// Creates a literal holding the fraction `numerator / denominator`. Returns [`None`] if the
    /// denominator is zero.
    pub fn fraction(numerator: i64, denominator: i64) -> Option<Self> {
        Number::from_fraction(numerator, denominator).map(Self::Literal)
    }

    /// The literal `0`.
    pub fn zero() -> Self {
        Self::int(0)
    }

    /// The literal `1`.
    pub fn one() -> Self {
        Self::int(1)
    }

    /// The literal `-1`.
    pub fn neg_one() -> Self {
        Self::int(-1)
    }

    /// Creates a variable with the given name.
    pub fn var(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// Creates a named constant.
    pub fn constant(name: impl Into<String>) -> Self {
        Self::Constant(name.into())
    }

    /// Creates a function call.
    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Call(name.into(), args)
    }

    /// Raises this expression to the given power. No simplification is done.
    pub fn pow(self, exp: Expr) -> Self {
        Self::Exp(Box::new(self), Box::new(exp))
    }

    /// Wraps this expression in an absolute value. No simplification is done.
    pub fn abs(self) -> Self {
        Self::Abs(Box::new(self))
    }

    /// Takes the factorial of this expression. No simplification is done.
    pub fn factorial(self) -> Self {
        Self::Factorial(Box::new(self))
    }

    /// Creates an equation. No simplification is done.
    pub fn equals(lhs: Expr, rhs: Expr) -> Self {
        Self::Equals(Box::new(lhs), Box::new(rhs))
    }

    /// Creates a tensor, checking that the number of elements matches the shape.
    pub fn tensor(shape: Vec<usize>, args: Vec<Expr>) -> Option<Self> {
        (shape.iter().product::<usize>() == args.len()).then_some(Self::Tensor(shape, args))
    }

    /// Returns the variant tag of the expression.
    pub fn kind(&self) -> ExprKind {
        match self {
            Self::Literal(_) => ExprKind::Literal,
            Self::Variable(_) => ExprKind::Variable,
            Self::Constant(_) => ExprKind::Constant,
            Self::Add(_) => ExprKind::Add,
            Self::Mul(_) => ExprKind::Mul,
            Self::Exp(_, _) => ExprKind::Exp,
            Self::Abs(_) => ExprKind::Abs,
            Self::Factorial(_) => ExprKind::Factorial,
            Self::Call(_, _) => ExprKind::Call,
            Self::Equals(_, _) => ExprKind::Equals,
            Self::List(_) => ExprKind::List,
            Self::Tensor(_, _) => ExprKind::Tensor,
        }
    }

    /// Returns the name carried by the expression, if it has one (variables, constants and
    /// function calls).
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Variable(name) | Self::Constant(name) | Self::Call(name, _) => Some(name),
            _ => None,
        }
    }

    /// If the expression is a [`Expr::Literal`], returns a reference to the contained number.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Literal(number) => Some(number),
            _ => None,
        }
    }

    /// Returns true if the expression is the literal `0`.
    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(Number::is_zero)
    }

    /// Returns true if the expression is the literal `1`.
    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(Number::is_one)
    }

    /// Returns the arguments of the expression, in storage order, or [`None`] if the expression
    /// is a leaf.
    pub fn args(&self) -> Option<Vec<&Expr>> {
        match self {
            Self::Literal(_) | Self::Variable(_) | Self::Constant(_) => None,
            Self::Add(args) | Self::Mul(args) | Self::Call(_, args) | Self::List(args)
                | Self::Tensor(_, args) => Some(args.iter().collect()),
            Self::Exp(lhs, rhs) | Self::Equals(lhs, rhs) => Some(vec![&**lhs, &**rhs]),
            Self::Abs(arg) | Self::Factorial(arg) => Some(vec![&**arg]),
        }
    }

    /// Returns true if the expression takes an arbitrary number of arguments, and its arguments
    /// can therefore be removed or appended to freely.
    pub fn is_variadic(&self) -> bool {
        matches!(self, Self::Add(_) | Self::Mul(_) | Self::Call(_, _) | Self::List(_))
    }

    /// Builds an expression of the same variant (and name, or shape) as this one, with the given
    /// arguments.
    ///
    /// Returns [`None`] if the expression is a leaf, if the variant has a fixed arity that
    /// `args` does not satisfy, or if the tensor shape does not fit `args`.
    pub fn with_args(&self, mut args: Vec<Expr>) -> Option<Self> {
        fn take_one(mut args: Vec<Expr>) -> Option<Box<Expr>> {
            (args.len() == 1).then(|| Box::new(args.remove(0)))
        }

        match self {
            Self::Literal(_) | Self::Variable(_) | Self::Constant(_) => None,
            Self::Abs(_) => take_one(args).map(Self::Abs),
            Self::Factorial(_) => take_one(args).map(Self::Factorial),
            Self::Add(_) => Some(Self::Add(args)),
            Self::Mul(_) => Some(Self::Mul(args)),
            Self::Call(name, _) => Some(Self::Call(name.clone(), args)),
            Self::List(_) => Some(Self::List(args)),
            Self::Tensor(shape, _) => Self::tensor(shape.clone(), args),
            Self::Exp(_, _) | Self::Equals(_, _) => {
                if args.len() != 2 {
                    return None;
                }
                let rhs = Box::new(args.remove(1));
                let lhs = Box::new(args.remove(0));
                Some(match self {
                    Self::Exp(_, _) => Self::Exp(lhs, rhs),
                    _ => Self::Equals(lhs, rhs),
                })
            },
        }
    }

    /// Applies the given fallible function to every argument of the expression, rebuilding an
    /// expression of the same variant with the results. Leaves are returned as-is.
    pub fn try_map_args<E>(self, mut f: impl FnMut(Expr) -> Result<Expr, E>) -> Result<Self, E> {
        fn map_all<E>(
            args: Vec<Expr>,
            f: &mut impl FnMut(Expr) -> Result<Expr, E>,
        ) -> Result<Vec<Expr>, E> {
            args.into_iter().map(f).collect()
        }

        Ok(match self {
            Self::Literal(_) | Self::Variable(_) | Self::Constant(_) => self,
            Self::Add(args) => Self::Add(map_all(args, &mut f)?),
            Self::Mul(args) => Self::Mul(map_all(args, &mut f)?),
            Self::Call(name, args) => Self::Call(name, map_all(args, &mut f)?),
            Self::List(args) => Self::List(map_all(args, &mut f)?),
            Self::Tensor(shape, args) => Self::Tensor(shape, map_all(args, &mut f)?),
            Self::Exp(lhs, rhs) => {
                let lhs = f(*lhs)?;
                Self::Exp(Box::new(lhs), Box::new(f(*rhs)?))
            },
            Self::Equals(lhs, rhs) => {
                let lhs = f(*lhs)?;
                Self::Equals(Box::new(lhs), Box::new(f(*rhs)?))
            },
            Self::Abs(arg) => Self::Abs(Box::new(f(*arg)?)),
            Self::Factorial(arg) => Self::Factorial(Box::new(f(*arg)?)),
        })
    }

    /// Removes the arguments at the given indices, then appends `replacement` after the
    /// remaining arguments, whose relative order is preserved.
    ///
    /// Returns [`None`] if the expression is not [variadic](Self::is_variadic), or if any index
    /// is out of bounds.
    pub fn replace_args(self, indices: &[usize], replacement: Expr) -> Option<Self> {
        /// Keeps the arguments whose index is not in `indices`.
        fn retain(args: Vec<Expr>, indices: &[usize], replacement: Expr) -> Option<Vec<Expr>> {
            if indices.iter().any(|&idx| idx >= args.len()) {
                return None;
            }

            let mut kept = args.into_iter()
                .enumerate()
                .filter(|(idx, _)| !indices.contains(idx))
                .map(|(_, arg)| arg)
                .collect::<Vec<_>>();
            kept.push(replacement);
            Some(kept)
        }

        match self {
            Self::Add(args) => retain(args, indices, replacement).map(Self::Add),
            Self::Mul(args) => retain(args, indices, replacement).map(Self::Mul),
            Self::Call(name, args) => retain(args, indices, replacement).map(|args| Self::Call(name, args)),
            Self::List(args) => retain(args, indices, replacement).map(Self::List),
            _ => None,
        }
    }

    /// Builds the sum of the given terms.
    ///
    /// Nested sums are flattened into the result, and all literal terms are folded into a single
    /// literal, placed after the other terms. A folded `0` is dropped when other terms remain. A
    /// sum with no terms is `0`, and a sum with one term is that term.
    pub fn sum(terms: impl IntoIterator<Item = Expr>) -> Self {
        let mut flat = Vec::new();
        let mut constant: Option<Number> = None;
        let mut stack = terms.into_iter().collect::<Vec<_>>();
        stack.reverse();

        while let Some(term) = stack.pop() {
            match term {
                Self::Add(inner) => stack.extend(inner.into_iter().rev()),
                Self::Literal(n) => {
                    constant = Some(match constant {
                        Some(c) => &c + &n,
                        None => n,
                    });
                },
                other => flat.push(other),
            }
        }

        match constant {
            Some(c) if !c.is_zero() || flat.is_empty() => flat.push(Self::Literal(c)),
            _ => (),
        }

        Self::Add(flat).downgrade()
    }

    /// Builds the product of the given factors.
    ///
    /// Nested products are flattened into the result, and all literal factors are folded into a
    /// single literal, placed after the other factors. A folded `1` is dropped when other factors
    /// remain, and a folded `0` absorbs the whole product. A product with no factors is `1`, and a
    /// product with one factor is that factor.
    pub fn product(factors: impl IntoIterator<Item = Expr>) -> Self {
        let mut flat = Vec::new();
        let mut coefficient: Option<Number> = None;
        let mut stack = factors.into_iter().collect::<Vec<_>>();
        stack.reverse();

        while let Some(factor) = stack.pop() {
            match factor {
                Self::Mul(inner) => stack.extend(inner.into_iter().rev()),
                Self::Literal(n) => {
                    coefficient = Some(match coefficient {
                        Some(c) => &c * &n,
                        None => n,
                    });
                },
                other => flat.push(other),
            }
        }

        match coefficient {
            Some(c) if c.is_zero() => return Self::zero(),
            Some(c) if !c.is_one() || flat.is_empty() => flat.push(Self::Literal(c)),
            _ => (),
        }

        Self::Mul(flat).downgrade()
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// Some operations may result in an [`Expr::Add`] with zero / one term, or an [`Expr::Mul`]
    /// with zero / one factor. This function checks for these cases and simplifies the expression
    /// into the single term / factor, or a literal `0` or `1`.
    pub(crate) fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => {
                if terms.is_empty() {
                    Self::zero()
                } else if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    Self::Add(terms)
                }
            },
            Self::Mul(mut factors) => {
                if factors.is_empty() {
                    Self::one()
                } else if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                }
            },
            _ => self,
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Returns the precedence of the expression, used to decide where parentheses are needed
    /// when printing. Higher binds tighter.
    fn precedence(&self) -> u8 {
        match self {
            Self::Equals(_, _) => 0,
            Self::Add(_) => 1,
            Self::Mul(_) => 2,
            Self::Exp(_, _) => 3,
            Self::Factorial(_) => 4,
            Self::Literal(n) => {
                // anything that prints with a sign, a slash or two parts is not atomic
                if n.is_integer() && n.real_sign() != Some(Ordering::Less) {
                    5
                } else {
                    1
                }
            },
            Self::Variable(_) | Self::Constant(_) | Self::Abs(_) | Self::Call(_, _)
                | Self::List(_) | Self::Tensor(_, _) => 5,
        }
    }

    /// Writes `child`, wrapped in parentheses if it binds less tightly than `min`.
    fn fmt_child(f: &mut fmt::Formatter<'_>, child: &Expr, min: u8) -> fmt::Result {
        if child.precedence() < min {
            write!(f, "({})", child)
        } else {
            write!(f, "{}", child)
        }
    }
}

/// Writes the items separated by `sep`.
fn join(f: &mut fmt::Formatter<'_>, items: &[Expr], sep: &str) -> fmt::Result {
    let mut iter = items.iter();
    if let Some(item) = iter.next() {
        write!(f, "{}", item)?;
        for item in iter {
            write!(f, "{}{}", sep, item)?;
        }
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(n) => write!(f, "{}", n),
            Self::Variable(name) | Self::Constant(name) => write!(f, "{}", name),
            Self::Add(terms) => {
                let mut iter = terms.iter();
                if let Some(term) = iter.next() {
                    Self::fmt_child(f, term, 1)?;
                    for term in iter {
                        write!(f, " + ")?;
                        Self::fmt_child(f, term, 2)?;
                    }
                }
                Ok(())
            },
            Self::Mul(factors) => {
                let mut iter = factors.iter();
                if let Some(factor) = iter.next() {
                    Self::fmt_child(f, factor, 2)?;
                    for factor in iter {
                        write!(f, " * ")?;
                        Self::fmt_child(f, factor, 3)?;
                    }
                }
                Ok(())
            },
            Self::Exp(base, exp) => {
                Self::fmt_child(f, base, 4)?;
                write!(f, "^")?;
                Self::fmt_child(f, exp, 4)
            },
            Self::Abs(arg) => write!(f, "|{}|", arg),
            Self::Factorial(arg) => {
                Self::fmt_child(f, arg, 5)?;
                write!(f, "!")
            },
            Self::Call(name, args) => {
                write!(f, "{}(", name)?;
                join(f, args, ", ")?;
                write!(f, ")")
            },
            Self::Equals(lhs, rhs) => write!(f, "{} = {}", lhs, rhs),
            Self::List(args) => {
                write!(f, "[")?;
                join(f, args, ", ")?;
                write!(f, "]")
            },
            Self::Tensor(shape, args) => {
                write!(f, "tensor<")?;
                let mut iter = shape.iter();
                if let Some(dim) = iter.next() {
                    write!(f, "{}", dim)?;
                    for dim in iter {
                        write!(f, "x{}", dim)?;
                    }
                }
                write!(f, ">[")?;
                join(f, args, ", ")?;
                write!(f, "]")
            },
        }
    }
}

/// Adds two [`Expr`]s together with [`Expr::sum`], which flattens nested sums and folds literals.
impl Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::sum([self, rhs])
    }
}

/// Multiplies two [`Expr`]s together with [`Expr::product`], which flattens nested products and
/// folds literals.
impl Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::product([self, rhs])
    }
}

/// Multiplies this expression by -1. No simplification is done, except for the case where the
/// expression is a literal, in which case the number is negated.
impl Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Literal(n) => Self::Literal(-&n),
            expr => Self::Mul(vec![expr, Self::neg_one()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> Expr {
        Expr::var("x")
    }

    fn y() -> Expr {
        Expr::var("y")
    }

    #[test]
    fn structural_equality_is_positional() {
        assert_eq!(Expr::Add(vec![x(), y()]), Expr::Add(vec![x(), y()]));
        assert_ne!(Expr::Add(vec![x(), y()]), Expr::Add(vec![y(), x()]));
        assert_ne!(Expr::Add(vec![x(), y()]), Expr::Mul(vec![x(), y()]));
        assert_ne!(Expr::var("x"), Expr::constant("x"));
    }

    #[test]
    fn structural_equality_exact_literals() {
        assert_eq!(Expr::fraction(2, 6), Expr::fraction(1, 3));
        assert_ne!(Expr::fraction(1, 3), Expr::fraction(1, 4));
    }

    #[test]
    fn tensor_shape_checked() {
        assert!(Expr::tensor(vec![2, 2], vec![x(), y(), x(), y()]).is_some());
        assert!(Expr::tensor(vec![2, 3], vec![x(), y()]).is_none());
    }

    #[test]
    fn sum_flattens_and_folds() {
        let expr = Expr::sum([
            Expr::int(2),
            Expr::Add(vec![x(), Expr::int(3)]),
            y(),
        ]);
        assert_eq!(expr, Expr::Add(vec![x(), y(), Expr::int(5)]));
    }

    #[test]
    fn sum_drops_zero() {
        assert_eq!(Expr::sum([x(), Expr::int(2), Expr::int(-2)]), x());
        assert_eq!(Expr::sum([Expr::int(2), Expr::int(-2)]), Expr::zero());
        assert_eq!(Expr::sum([]), Expr::zero());
    }

    #[test]
    fn product_folds_exactly() {
        let third = Expr::fraction(1, 3).unwrap();
        assert_eq!(Expr::product([third, Expr::int(3)]), Expr::one());
        assert_eq!(x() * Expr::int(2) * Expr::int(3), Expr::Mul(vec![x(), Expr::int(6)]));
        assert_eq!(Expr::product([x(), Expr::zero()]), Expr::zero());
        assert_eq!(Expr::product([]), Expr::one());
    }

    #[test]
    fn negation() {
        assert_eq!(-Expr::int(3), Expr::int(-3));
        assert_eq!(-x(), Expr::Mul(vec![x(), Expr::neg_one()]));
    }

    #[test]
    fn args_of_each_variant() {
        assert_eq!(x().args(), None);
        assert_eq!(x().pow(y()).args(), Some(vec![&x(), &y()]));
        assert_eq!(x().abs().args(), Some(vec![&x()]));
        assert_eq!(Expr::call("f", vec![x(), y(), x()]).args().map(|a| a.len()), Some(3));
    }

    #[test]
    fn replace_args_appends() {
        let expr = Expr::Add(vec![Expr::var("a"), x(), y(), Expr::var("b")]);
        let replaced = expr.replace_args(&[1, 2], Expr::zero()).unwrap();
        assert_eq!(replaced, Expr::Add(vec![Expr::var("a"), Expr::var("b"), Expr::zero()]));
    }

    #[test]
    fn replace_args_fixed_arity() {
        assert!(!x().pow(y()).is_variadic());
        assert!(Expr::call("f", vec![]).is_variadic());
        assert_eq!(x().pow(y()).replace_args(&[0], Expr::zero()), None);
        assert_eq!(Expr::Add(vec![x()]).replace_args(&[3], Expr::zero()), None);
    }

    #[test]
    fn with_args_checks_arity() {
        let exp = x().pow(y());
        assert_eq!(exp.with_args(vec![y(), x()]), Some(y().pow(x())));
        assert_eq!(exp.with_args(vec![y()]), None);
        assert_eq!(x().abs().with_args(vec![y()]), Some(y().abs()));
        assert_eq!(x().with_args(vec![]), None);

        let tensor = Expr::tensor(vec![2], vec![x(), y()]).unwrap();
        assert_eq!(tensor.with_args(vec![x()]), None);
    }

    #[test]
    fn map_args_preserves_variant() {
        let expr = Expr::call("f", vec![x(), y()]);
        let mapped = expr.try_map_args(|arg| Ok::<_, ()>(arg.abs())).unwrap();
        assert_eq!(mapped, Expr::call("f", vec![x().abs(), y().abs()]));
    }

    #[test]
    fn fmt_expr() {
        let expr = Expr::Mul(vec![
            Expr::Add(vec![x(), Expr::int(1)]),
            y().pow(Expr::int(-2)),
            Expr::fraction(1, 2).unwrap(),
        ]);
        assert_eq!(expr.to_string(), "(x + 1) * y^(-2) * (1/2)");
    }

    #[test]
    fn fmt_containers() {
        let expr = Expr::equals(
            Expr::List(vec![x(), x().factorial()]),
            Expr::tensor(vec![1, 2], vec![x().abs(), Expr::call("sin", vec![y()])]).unwrap(),
        );
        assert_eq!(expr.to_string(), "[x, x!] = tensor<1x2>[|x|, sin(y)]");
    }
}
