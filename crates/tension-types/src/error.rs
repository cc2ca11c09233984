// ─────────────────────────────────────────────────────────────────────
// Tension Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all Tension Kernel failures.
///
/// Modeled conditions inside the dynamics (a SLIDE step or ψ meeting a
/// zero numerator) are deliberately *not* errors: they surface in the
/// observation stream as a no-op microtick. Zero denominators are
/// programming faults and abort instead of arriving here.
#[derive(Error, Debug)]
pub enum TensionError {
    /// Configuration could not be parsed or failed validation.
    #[error("config error: {0}")]
    Config(String),

    /// CSV entry point could not open or write its output files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TensionResult<T> = Result<T, TensionError>;
