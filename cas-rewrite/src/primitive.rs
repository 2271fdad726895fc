//! Functions to construct [`Integer`]s and [`Rational`]s from various types.

use rug::{Integer, Rational};

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates a [`Rational`] with the given integer value.
pub fn rational<T>(n: T) -> Rational
where
    Integer: From<T>,
{
    Rational::from(int(n))
}

/// Creates a [`Rational`] from a numerator and denominator. The result is always stored in lowest
/// terms, with a positive denominator.
///
/// Returns [`None`] if the denominator is zero.
pub fn fraction<N, D>(numerator: N, denominator: D) -> Option<Rational>
where
    Integer: From<N> + From<D>,
{
    let denominator = int(denominator);
    if denominator == 0 {
        return None;
    }
    Some(Rational::from((int(numerator), denominator)))
}
