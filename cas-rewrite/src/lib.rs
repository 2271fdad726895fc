//! A term-rewriting simplifier for symbolic algebraic expressions.
//!
//! This crate provides the core of a computer algebra system: an [`Expr`] tree with exact
//! complex-rational literals, a small [`pattern`] language for describing expression shapes, and
//! a [`simplify`](mod@simplify) module that rewrites trees with sets of [`Rule`]s until no more
//! rules apply.
//!
//! The pattern matcher understands commutativity: a pattern for `P + 0` matches `x + 0` and
//! `0 + x` alike, and can also match just some of the terms of a longer sum, such as the `x` and
//! `0` in `y + x + 0`. A rule can then replace only the terms it matched, leaving the others in
//! place.
//!
//! ```
//! use cas_rewrite::{simplify, Expr, rules::BASIC};
//!
//! // (x + 0) * 1
//! let expr = Expr::Mul(vec![
//!     Expr::Add(vec![Expr::var("x"), Expr::zero()]),
//!     Expr::one(),
//! ]);
//! assert_eq!(simplify(&expr, &BASIC).unwrap(), Expr::var("x"));
//! ```
//!
//! Parsing text into an [`Expr`], rendering it as LaTeX, and evaluating it numerically are left
//! to other crates; they all share the same tree type.

pub mod error;
pub mod expr;
pub mod number;
pub mod pattern;
pub mod primitive;
pub mod simplify;

pub use expr::{Expr, ExprKind};
pub use number::Number;
pub use pattern::{
    builder,
    expand::{Expander, ExpanderConfig},
    matcher::{matches, Match, Matcher},
    Captures,
    Pattern,
};
pub use simplify::{rules::{self, Rule}, simplify, simplify_with_steps, Simplifier};
