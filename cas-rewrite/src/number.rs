//! Exact complex-rational numbers.
//!
//! Every literal in an expression tree holds a [`Number`], a complex number whose real and
//! imaginary parts are both exact fractions. Fractions are backed by [`rug::Rational`], which
//! always keeps its value in lowest terms with a positive denominator; this makes the derived
//! [`PartialEq`] implementation an exact, fraction-level comparison.

use crate::primitive::{fraction, rational};
use rug::{Integer, Rational};
use serde::{Serialize, Serializer};
use std::{cmp::Ordering, fmt, ops::{Add, Mul, Neg, Sub}};

/// An exact complex number with rational real and imaginary parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Number {
    /// The real part.
    pub real: Rational,

    /// The imaginary part.
    pub imag: Rational,
}

impl Number {
    /// Creates a number from its real and imaginary parts.
    pub fn new(real: Rational, imag: Rational) -> Self {
        Self { real, imag }
    }

    /// Creates a real number from an integer.
    pub fn from_int<T>(n: T) -> Self
    where
        Integer: From<T>,
    {
        Self::new(rational(n), Rational::new())
    }

    /// Creates a real number from a fraction. Returns [`None`] if the denominator is zero.
    pub fn from_fraction<N, D>(numerator: N, denominator: D) -> Option<Self>
    where
        Integer: From<N> + From<D>,
    {
        Some(Self::new(fraction(numerator, denominator)?, Rational::new()))
    }

    /// Creates a real number from a [`Rational`].
    pub fn from_rational(real: Rational) -> Self {
        Self::new(real, Rational::new())
    }

    /// The imaginary unit, `i`.
    pub fn i() -> Self {
        Self::new(Rational::new(), rational(1))
    }

    /// Returns true if this number is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.real.cmp0() == Ordering::Equal && self.imag.cmp0() == Ordering::Equal
    }

    /// Returns true if this number is exactly one.
    pub fn is_one(&self) -> bool {
        self.real == 1 && self.imag.cmp0() == Ordering::Equal
    }

    /// Returns true if the imaginary part is zero.
    pub fn is_real(&self) -> bool {
        self.imag.cmp0() == Ordering::Equal
    }

    /// Returns true if the number is real and its real part is an integer.
    pub fn is_integer(&self) -> bool {
        self.is_real() && *self.real.denom() == 1
    }

    /// Returns true if the real part is zero and the imaginary part is not.
    pub fn is_imaginary(&self) -> bool {
        self.real.cmp0() == Ordering::Equal && self.imag.cmp0() != Ordering::Equal
    }

    /// Returns the sign of the real part if the number is real.
    pub fn real_sign(&self) -> Option<Ordering> {
        self.is_real().then(|| self.real.cmp0())
    }

    /// If the number is an integer that fits in an [`i64`], returns it.
    pub fn to_i64(&self) -> Option<i64> {
        if self.is_integer() {
            self.real.numer().to_i64()
        } else {
            None
        }
    }

    /// If the number is a non-negative integer that fits in a [`u32`], returns it.
    pub fn to_u32(&self) -> Option<u32> {
        if self.is_integer() {
            self.real.numer().to_u32()
        } else {
            None
        }
    }

    /// Divides this number by `rhs`. Returns [`None`] if `rhs` is zero.
    ///
    /// `(a + bi)/(c + di) = ((ac + bd) + (bc - ad)i) / (c^2 + d^2)`
    pub fn checked_div(&self, rhs: &Self) -> Option<Self> {
        if rhs.is_zero() {
            return None;
        }

        let denominator = Rational::from(&rhs.real * &rhs.real)
            + Rational::from(&rhs.imag * &rhs.imag);
        let real = Rational::from(&self.real * &rhs.real) + Rational::from(&self.imag * &rhs.imag);
        let imag = Rational::from(&self.imag * &rhs.real) - Rational::from(&self.real * &rhs.imag);
        Some(Self::new(real / &denominator, imag / &denominator))
    }

    /// Returns the absolute value of a real number, or [`None`] if the number is not real.
    pub fn abs(&self) -> Option<Self> {
        self.is_real().then(|| Self::from_rational(self.real.clone().abs()))
    }

    /// Raises this number to an integer power by repeated squaring.
    ///
    /// Returns [`None`] when raising zero to a non-positive power.
    pub fn pow(&self, exp: i64) -> Option<Self> {
        if self.is_zero() && exp <= 0 {
            return None;
        }

        let mut result = Self::from_int(1);
        let mut base = self.clone();
        let mut remaining = exp.unsigned_abs();
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = &result * &base;
            }
            base = &base * &base;
            remaining >>= 1;
        }

        if exp < 0 {
            Self::from_int(1).checked_div(&result)
        } else {
            Some(result)
        }
    }
}

impl Add for &Number {
    type Output = Number;

    fn add(self, rhs: Self) -> Number {
        Number::new(
            Rational::from(&self.real + &rhs.real),
            Rational::from(&self.imag + &rhs.imag),
        )
    }
}

impl Sub for &Number {
    type Output = Number;

    fn sub(self, rhs: Self) -> Number {
        Number::new(
            Rational::from(&self.real - &rhs.real),
            Rational::from(&self.imag - &rhs.imag),
        )
    }
}

/// `(a + bi)(c + di) = (ac - bd) + (ad + bc)i`
impl Mul for &Number {
    type Output = Number;

    fn mul(self, rhs: Self) -> Number {
        let ac = Rational::from(&self.real * &rhs.real);
        let bd = Rational::from(&self.imag * &rhs.imag);
        let ad = Rational::from(&self.real * &rhs.imag);
        let bc = Rational::from(&self.imag * &rhs.real);
        Number::new(ac - bd, ad + bc)
    }
}

impl Neg for &Number {
    type Output = Number;

    fn neg(self) -> Number {
        Number::new(Rational::from(-&self.real), Rational::from(-&self.imag))
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::from_int(n)
    }
}

impl From<Rational> for Number {
    fn from(real: Rational) -> Self {
        Self::from_rational(real)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        /// Writes the imaginary part with its unit, omitting a coefficient of one.
        fn write_imag(f: &mut fmt::Formatter<'_>, imag: &Rational) -> fmt::Result {
            if *imag == 1 {
                write!(f, "i")
            } else if *imag == -1 {
                write!(f, "-i")
            } else {
                write!(f, "{}i", imag)
            }
        }

        match (self.real.cmp0(), self.imag.cmp0()) {
            (_, Ordering::Equal) => write!(f, "{}", self.real),
            (Ordering::Equal, _) => write_imag(f, &self.imag),
            (_, Ordering::Less) => {
                write!(f, "{} - ", self.real)?;
                write_imag(f, &Rational::from(-&self.imag))
            },
            (_, Ordering::Greater) => {
                write!(f, "{} + ", self.real)?;
                write_imag(f, &self.imag)
            },
        }
    }
}

/// Numbers serialize to a canonical `real|imag` string, which is enough to key the pattern
/// expansion cache.
impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{}|{}", self.real, self.imag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: i64, d: i64) -> Number {
        Number::from_fraction(n, d).unwrap()
    }

    #[test]
    fn exact_multiplication() {
        assert_eq!(&frac(1, 3) * &Number::from_int(3), Number::from_int(1));
        assert!((&frac(1, 3) * &Number::from_int(3)).is_one());
        assert_eq!(&frac(1, 3) + &frac(1, 6), frac(1, 2));
        assert_eq!(&frac(1, 3) - &frac(1, 3), Number::default());
        assert_eq!(-&frac(1, 3), frac(-1, 3));
    }

    #[test]
    fn complex_multiplication() {
        // (1 + 2i)(3 - i) = 5 + 5i
        let a = Number::new(rational(1), rational(2));
        let b = Number::new(rational(3), rational(-1));
        assert_eq!(&a * &b, Number::new(rational(5), rational(5)));
    }

    #[test]
    fn complex_division() {
        // (5 + 5i) / (3 - i) = 1 + 2i
        let a = Number::new(rational(5), rational(5));
        let b = Number::new(rational(3), rational(-1));
        assert_eq!(a.checked_div(&b), Some(Number::new(rational(1), rational(2))));
        assert_eq!(a.checked_div(&Number::default()), None);
    }

    #[test]
    fn powers() {
        assert_eq!(Number::from_int(2).pow(10), Some(Number::from_int(1024)));
        assert_eq!(Number::from_int(2).pow(-2), Some(frac(1, 4)));
        assert_eq!(Number::i().pow(2), Some(Number::from_int(-1)));
        assert_eq!(Number::default().pow(0), None);
        assert_eq!(Number::default().pow(3), Some(Number::default()));
    }

    #[test]
    fn classification() {
        assert!(Number::from_int(4).is_integer());
        assert!(!frac(1, 2).is_integer());
        assert!(Number::i().is_imaginary());
        assert!(!Number::i().is_real());
        assert_eq!(frac(-7, 2).abs(), Some(frac(7, 2)));
        assert_eq!(Number::i().abs(), None);
        assert_eq!(Number::from_int(-3).to_u32(), None);
        assert_eq!(Number::from_int(12).to_u32(), Some(12));
    }

    #[test]
    fn display() {
        assert_eq!(frac(-3, 4).to_string(), "-3/4");
        assert_eq!(Number::i().to_string(), "i");
        assert_eq!(Number::new(rational(2), rational(-3)).to_string(), "2 - 3i");
        assert_eq!(Number::new(rational(0), rational(5)).to_string(), "5i");
    }
}
