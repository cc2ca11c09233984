// ─────────────────────────────────────────────────────────────────────
// Tension Kernel — Number-Theoretic Predicates
// ─────────────────────────────────────────────────────────────────────
//! Primality and pattern tests over big-integer components.
//!
//! Primality is Miller-Rabin over |n| with a fixed witness set, so a
//! run is bit-for-bit reproducible. The composite
//! [`has_pattern_component`] is the ρ-detection predicate: a rational
//! is "notable" when a component is prime, or when one of the enabled
//! auxiliary patterns (twin prime, Fibonacci, perfect power) holds.

use num_bigint::{BigInt, BigUint};
use num_integer::Roots;
use num_traits::{One, Signed, Zero};

use crate::rational::Rational;

/// Fixed Miller-Rabin witness bases (12 witnesses).
const WITNESSES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Auxiliary pattern toggles for [`has_pattern_component`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternFlags {
    pub twin_prime: bool,
    pub fibonacci: bool,
    pub perfect_power: bool,
}

/// Miller-Rabin primality over |value|. False for |value| < 2.
pub fn is_prime(value: &BigInt) -> bool {
    let n = value.magnitude();
    if n < &BigUint::from(2u32) {
        return false;
    }
    for &p in &WITNESSES {
        let p = BigUint::from(p);
        if *n == p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    // n is odd and > 37 here. Write n − 1 = d · 2^s.
    let one = BigUint::one();
    let n_minus_1 = n - &one;
    let s = n_minus_1.trailing_zeros().unwrap_or(0);
    let d = &n_minus_1 >> s;

    'witness: for &a in &WITNESSES {
        let mut x = BigUint::from(a).modpow(&d, n);
        if x == one || x == n_minus_1 {
            continue;
        }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Twin-prime test on a rational: numerator and denominator are both
/// prime and |num − den| = 2.
pub fn is_twin_prime(value: &Rational) -> bool {
    is_prime(value.num())
        && is_prime(value.den())
        && (value.num() - value.den()).abs() == BigInt::from(2)
}

/// Fibonacci test on |value|: n is Fibonacci iff 5n² + 4 or 5n² − 4 is
/// a perfect square.
pub fn is_fibonacci(value: &BigInt) -> bool {
    let n = value.magnitude();
    let five_sq = BigUint::from(5u32) * n * n;
    let four = BigUint::from(4u32);
    if is_square(&(&five_sq + &four)) {
        return true;
    }
    five_sq >= four && is_square(&(five_sq - four))
}

/// Perfect-power test on |value|: a k-th power for some k in [2, 64].
pub fn is_perfect_power(value: &BigInt) -> bool {
    let n = value.magnitude();
    if n.is_zero() {
        return false;
    }
    for k in 2u32..=64 {
        let root = n.nth_root(k);
        if root.pow(k) == *n {
            return true;
        }
    }
    false
}

/// ρ-detection predicate over a rational's components.
pub fn has_pattern_component(value: &Rational, flags: PatternFlags) -> bool {
    if is_prime(value.num()) || is_prime(value.den()) {
        return true;
    }
    if flags.twin_prime && is_twin_prime(value) {
        return true;
    }
    if flags.fibonacci && (is_fibonacci(value.num()) || is_fibonacci(value.den())) {
        return true;
    }
    if flags.perfect_power && (is_perfect_power(value.num()) || is_perfect_power(value.den())) {
        return true;
    }
    false
}

fn is_square(n: &BigUint) -> bool {
    let root = n.sqrt();
    &root * &root == *n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(n: i64) -> BigInt {
        BigInt::from(n)
    }

    #[test]
    fn test_small_primes() {
        for p in [2i64, 3, 5, 7, 11, 13, 37, 41, 97] {
            assert!(is_prime(&big(p)), "{p} should be prime");
        }
    }

    #[test]
    fn test_small_composites_and_edges() {
        for n in [-1i64, 0, 1] {
            assert!(!is_prime(&big(n)), "{n} should not be prime");
        }
        for n in [4i64, 9, 15, 25, 91, 561, 1105] {
            assert!(!is_prime(&big(n)), "{n} should be composite");
        }
    }

    #[test]
    fn test_prime_on_absolute_value() {
        assert!(is_prime(&big(-7)));
        assert!(!is_prime(&big(-8)));
    }

    #[test]
    fn test_large_prime_and_carmichael() {
        // 2^61 − 1 is a Mersenne prime.
        let mersenne = (BigInt::from(1u8) << 61) - 1;
        assert!(is_prime(&mersenne));
        // 341550071728321 is a strong pseudoprime to small base sets
        // but composite.
        assert!(!is_prime(&BigInt::from(341_550_071_728_321u64)));
    }

    #[test]
    fn test_twin_prime_rational() {
        assert!(is_twin_prime(&Rational::new(5, 3)));
        assert!(is_twin_prime(&Rational::new(13, 11)));
        assert!(!is_twin_prime(&Rational::new(7, 3)));
        assert!(!is_twin_prime(&Rational::new(9, 7)));
    }

    #[test]
    fn test_fibonacci_members() {
        for n in [0i64, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144] {
            assert!(is_fibonacci(&big(n)), "{n} should be Fibonacci");
        }
        for n in [4i64, 6, 7, 9, 10, 22, 100] {
            assert!(!is_fibonacci(&big(n)), "{n} should not be Fibonacci");
        }
    }

    #[test]
    fn test_perfect_powers() {
        for n in [4i64, 8, 9, 16, 27, 32, 64, 81, 125, 1024] {
            assert!(is_perfect_power(&big(n)), "{n} should be a perfect power");
        }
        for n in [2i64, 3, 5, 6, 7, 10, 12, 99] {
            assert!(!is_perfect_power(&big(n)), "{n} should not be a perfect power");
        }
    }

    #[test]
    fn test_pattern_base_primality() {
        // 2/4: numerator is prime.
        assert!(has_pattern_component(
            &Rational::new(2, 4),
            PatternFlags::default()
        ));
        // 4/9: no prime component.
        assert!(!has_pattern_component(
            &Rational::new(4, 9),
            PatternFlags::default()
        ));
    }

    #[test]
    fn test_pattern_perfect_power_extension() {
        let flags = PatternFlags {
            perfect_power: true,
            ..PatternFlags::default()
        };
        assert!(has_pattern_component(&Rational::new(4, 9), flags));
    }

    #[test]
    fn test_pattern_fibonacci_extension() {
        let flags = PatternFlags {
            fibonacci: true,
            ..PatternFlags::default()
        };
        // 21/10: 21 is Fibonacci, neither component prime.
        assert!(has_pattern_component(&Rational::new(21, 10), flags));
        assert!(!has_pattern_component(
            &Rational::new(21, 10),
            PatternFlags::default()
        ));
    }
}
