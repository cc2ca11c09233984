// ─────────────────────────────────────────────────────────────────────
// Tension Kernel — Raw Rational Arithmetic
// ─────────────────────────────────────────────────────────────────────
//! Unreduced rationals over arbitrary-precision integers.
//!
//! All propagation stays strictly within ℚ, tracked as raw
//! numerator/denominator components:
//!
//!   a/b + c/d = (ad + bc)/(bd)
//!   a/b · c/d = (ac)/(bd)
//!   a/b ÷ c/d = (ad)/(bc)
//!
//! Nothing here ever computes a GCD. (2/4) and (1/2) are distinct
//! states and must remain so. The denominator is non-zero and positive;
//! the sign lives in the numerator. The one sign-handling rule — a
//! division whose divisor numerator is negative transfers that sign to
//! the result numerator — moves the sign without touching |num| or
//! |den|, so it is not a reduction.
//!
//! Floating point is confined to [`Rational::to_f64_snapshot`], which
//! is for transient comparison only and must never feed back into
//! state.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};
use thiserror::Error;

/// Error from parsing a `"num/den"` rational literal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseRationalError {
    #[error("rational literal must be of the form num/den, got {0:?}")]
    Malformed(String),
    #[error("rational numerator is not an integer: {0:?}")]
    BadNumerator(String),
    #[error("rational denominator is not a positive integer: {0:?}")]
    BadDenominator(String),
}

/// An unreduced rational number.
///
/// `PartialEq`/`Eq` compare components, not values: 2/4 ≠ 1/2. Use
/// [`Rational::cmp_value`] for value-level ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rational {
    num: BigInt,
    den: BigInt,
}

impl Rational {
    /// 0/1.
    pub fn zero() -> Self {
        Self {
            num: BigInt::zero(),
            den: BigInt::from(1),
        }
    }

    /// Build from machine integers.
    ///
    /// # Panics
    ///
    /// A zero denominator is a programming fault and aborts.
    pub fn new(num: i64, den: u64) -> Self {
        assert!(den != 0, "rational denominator must be non-zero");
        Self {
            num: BigInt::from(num),
            den: BigInt::from(den),
        }
    }

    /// Build from big-integer components, transferring a negative
    /// denominator's sign into the numerator.
    ///
    /// # Panics
    ///
    /// A zero denominator is a programming fault and aborts.
    pub fn from_parts(num: BigInt, den: BigInt) -> Self {
        assert!(!den.is_zero(), "rational denominator must be non-zero");
        if den.is_negative() {
            Self {
                num: -num,
                den: -den,
            }
        } else {
            Self { num, den }
        }
    }

    pub fn num(&self) -> &BigInt {
        &self.num
    }

    pub fn den(&self) -> &BigInt {
        &self.den
    }

    /// Zero test on the numerator.
    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// Sign of the value: -1, 0, or 1 (the denominator is positive).
    pub fn signum(&self) -> i32 {
        match self.num.sign() {
            num_bigint::Sign::Minus => -1,
            num_bigint::Sign::NoSign => 0,
            num_bigint::Sign::Plus => 1,
        }
    }

    /// |numerator|.
    pub fn abs_num(&self) -> BigInt {
        self.num.abs()
    }

    /// a/b + c/d = (ad + bc)/(bd).
    pub fn add(&self, other: &Self) -> Self {
        Self::from_parts(
            &self.num * &other.den + &other.num * &self.den,
            &self.den * &other.den,
        )
    }

    /// a/b − c/d = (ad − bc)/(bd).
    pub fn sub(&self, other: &Self) -> Self {
        Self::from_parts(
            &self.num * &other.den - &other.num * &self.den,
            &self.den * &other.den,
        )
    }

    /// a/b · c/d = (ac)/(bd).
    pub fn mul(&self, other: &Self) -> Self {
        Self::from_parts(&self.num * &other.num, &self.den * &other.den)
    }

    /// a/b ÷ c/d = (ad)/(bc). `None` when the divisor numerator is
    /// zero — a modeled condition, not a fault.
    pub fn div(&self, other: &Self) -> Option<Self> {
        if other.num.is_zero() {
            return None;
        }
        Some(Self::from_parts(
            &self.num * &other.den,
            &self.den * &other.num,
        ))
    }

    /// −(a/b), on the numerator.
    pub fn negate(&self) -> Self {
        Self {
            num: -&self.num,
            den: self.den.clone(),
        }
    }

    /// current − previous.
    pub fn delta(&self, previous: &Self) -> Self {
        self.sub(previous)
    }

    /// Value-level comparison via cross-multiplication (both
    /// denominators are positive, so no sign flip is needed).
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        (&self.num * &other.den).cmp(&(&other.num * &self.den))
    }

    /// ⌊a/b⌋ as an integer, on the non-canonical components.
    pub fn floor_int(&self) -> BigInt {
        self.num.div_floor(&self.den)
    }

    /// ⌈a/b⌉ as an integer, on the non-canonical components.
    pub fn ceil_int(&self) -> BigInt {
        self.num.div_ceil(&self.den)
    }

    /// a mod m = a − ⌊a/m⌋·m. `None` when the modulus is zero.
    pub fn modulo(&self, modulus: &Self) -> Option<Self> {
        let quotient = self.div(modulus)?;
        let whole = quotient.floor_int();
        let scaled = Self::from_parts(whole * &modulus.num, modulus.den.clone());
        Some(self.sub(&scaled))
    }

    /// Transient double snapshot for band comparisons.
    ///
    /// The returned value must never be written back into simulation
    /// state; the rational components are the source of truth.
    pub fn to_f64_snapshot(&self) -> f64 {
        let num = self.num.to_f64().unwrap_or(f64::NAN);
        let den = self.den.to_f64().unwrap_or(f64::NAN);
        num / den
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl FromStr for Rational {
    type Err = ParseRationalError;

    /// Parse a `"num/den"` literal. The numerator may be negative; the
    /// denominator must be a positive integer.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (num_text, den_text) = text
            .split_once('/')
            .ok_or_else(|| ParseRationalError::Malformed(text.to_string()))?;
        let num: BigInt = num_text
            .trim()
            .parse()
            .map_err(|_| ParseRationalError::BadNumerator(num_text.to_string()))?;
        let den: BigInt = den_text
            .trim()
            .parse()
            .map_err(|_| ParseRationalError::BadDenominator(den_text.to_string()))?;
        if den.is_zero() || den.is_negative() {
            return Err(ParseRationalError::BadDenominator(den_text.to_string()));
        }
        Ok(Self { num, den })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(num: i64, den: u64) -> Rational {
        Rational::new(num, den)
    }

    #[test]
    fn test_add_keeps_raw_components() {
        // 2/4 + 5/7 = (2·7 + 5·4)/(4·7) = 34/28, never 17/14.
        let sum = q(2, 4).add(&q(5, 7));
        assert_eq!(sum.num(), &BigInt::from(34));
        assert_eq!(sum.den(), &BigInt::from(28));
    }

    #[test]
    fn test_mul_keeps_raw_components() {
        let product = q(2, 4).mul(&q(6, 8));
        assert_eq!(product, Rational::new(12, 32));
    }

    #[test]
    fn test_sub_on_numerator() {
        let diff = q(1, 2).sub(&q(1, 2));
        assert!(diff.is_zero());
        assert_eq!(diff.den(), &BigInt::from(4), "raw denominator survives");
    }

    #[test]
    fn test_div_cross_multiplies() {
        let quotient = q(3, 5).div(&q(5, 7)).unwrap();
        assert_eq!(quotient, Rational::new(21, 25));
    }

    #[test]
    fn test_div_by_zero_numerator_is_none() {
        assert!(q(3, 5).div(&q(0, 7)).is_none());
    }

    #[test]
    fn test_div_negative_divisor_moves_sign_to_numerator() {
        let quotient = q(3, 5).div(&q(-2, 7)).unwrap();
        assert_eq!(quotient, Rational::new(-21, 10));
        assert!(quotient.den() > &BigInt::from(0));
    }

    #[test]
    #[should_panic(expected = "denominator must be non-zero")]
    fn test_zero_denominator_aborts() {
        let _ = Rational::new(1, 0);
    }

    #[test]
    fn test_value_comparison_ignores_representation() {
        assert_eq!(q(2, 4).cmp_value(&q(1, 2)), Ordering::Equal);
        assert_eq!(q(3, 2).cmp_value(&q(17, 10)), Ordering::Less);
        assert_eq!(q(-1, 3).cmp_value(&q(0, 1)), Ordering::Less);
    }

    #[test]
    fn test_component_equality_distinguishes_representation() {
        assert_ne!(q(2, 4), q(1, 2));
    }

    #[test]
    fn test_floor_ceil_non_canonical() {
        assert_eq!(q(34, 28).floor_int(), BigInt::from(1));
        assert_eq!(q(34, 28).ceil_int(), BigInt::from(2));
        assert_eq!(q(-34, 28).floor_int(), BigInt::from(-2));
        assert_eq!(q(-34, 28).ceil_int(), BigInt::from(-1));
    }

    #[test]
    fn test_modulo_definition() {
        // 7/2 mod 3/2: ⌊(7/2)/(3/2)⌋ = ⌊14/6⌋ = 2, 7/2 − 2·(3/2) = 7/2 − 6/2.
        let m = q(7, 2).modulo(&q(3, 2)).unwrap();
        assert_eq!(m.cmp_value(&Rational::new(1, 2)), Ordering::Equal);
    }

    #[test]
    fn test_modulo_zero_modulus_is_none() {
        assert!(q(7, 2).modulo(&q(0, 1)).is_none());
    }

    #[test]
    fn test_delta() {
        let d = q(81, 35).delta(&q(3, 5));
        // (81·5 − 3·35)/(35·5) = 300/175
        assert_eq!(d, Rational::new(300, 175));
    }

    #[test]
    fn test_parse_and_display_round_trip() {
        let value: Rational = "-34/28".parse().unwrap();
        assert_eq!(value, Rational::new(-34, 28));
        assert_eq!(value.to_string(), "-34/28");
    }

    #[test]
    fn test_parse_rejects_bad_denominator() {
        assert!("3/0".parse::<Rational>().is_err());
        assert!("3/-5".parse::<Rational>().is_err());
        assert!("35".parse::<Rational>().is_err());
    }

    #[test]
    fn test_snapshot_does_not_touch_components() {
        let value = q(8, 5);
        let snap = value.to_f64_snapshot();
        assert!((snap - 1.6).abs() < 1e-12);
        assert_eq!(value, q(8, 5));
    }
}
