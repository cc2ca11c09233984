// ─────────────────────────────────────────────────────────────────────
// Tension Kernel — Rational Field Layer
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Strict rational arithmetic and number-theoretic predicates.
//!
//! Every value is a raw (numerator, denominator) pair of big integers.
//! No operation simplifies, reduces, or applies GCD to a value: the
//! component-level "tension" of a rational is an observable of the
//! dynamics and must survive every arithmetic path untouched.

pub mod predicates;
pub mod rational;

pub use predicates::{
    has_pattern_component, is_fibonacci, is_perfect_power, is_prime, is_twin_prime, PatternFlags,
};
pub use rational::{ParseRationalError, Rational};
