// ─────────────────────────────────────────────────────────────────────
// Tension Kernel — Core Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Configuration, JSON loader, and error hierarchy for the Tension
//! Kernel — the deterministic symbolic-dynamics simulator over
//! unreduced rationals.

pub mod config;
pub mod error;
pub mod loader;

pub use config::{
    Config, EngineMode, KoppaMode, KoppaTrigger, Mt10Behavior, PrimeTarget, PsiMode,
    RatioTriggerMode, SignFlipMode, TrackMode,
};
pub use error::{TensionError, TensionResult};
pub use loader::{load_config, load_config_file};
