// ─────────────────────────────────────────────────────────────────────
// Tension Kernel — Simulation Configuration
// ─────────────────────────────────────────────────────────────────────
//! Runtime configuration for one simulation.
//!
//! Every recognized option of the simulator is carried here; the JSON
//! loader in [`crate::loader`] populates a `Config` over the defaults.
//! Enum-valued options are encoded as small integers on disk (the
//! format the configuration tooling writes), so each enum exposes a
//! `from_code` constructor.

use num_bigint::BigInt;

use tension_num::Rational;

use crate::error::{TensionError, TensionResult};

/// When the ψ transform may fire on a Memory microtick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PsiMode {
    /// Fire on every M step.
    Mstep,
    /// Fire only when a ρ event is pending.
    RhoOnly,
    /// Fire on every M step (ρ latches are still tracked).
    MstepRho,
    /// Fire only when no ρ event is pending.
    InhibitRho,
}

impl PsiMode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Mstep),
            1 => Some(Self::RhoOnly),
            2 => Some(Self::MstepRho),
            3 => Some(Self::InhibitRho),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Mstep => "mstep",
            Self::RhoOnly => "rho_only",
            Self::MstepRho => "mstep_rho",
            Self::InhibitRho => "inhibit_rho",
        }
    }
}

/// What happens to ϙ when an accrual trigger fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KoppaMode {
    /// ϙ ← 0/1 before accrual.
    Dump,
    /// ϙ ← ε (the E-phase snapshot of υ) before accrual.
    Pop,
    /// ϙ ← ϙ + ε before accrual.
    Accumulate,
}

impl KoppaMode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Dump),
            1 => Some(Self::Pop),
            2 => Some(Self::Accumulate),
            _ => None,
        }
    }
}

/// Engine arithmetic for the single-track pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    Add,
    Multi,
    Slide,
    /// υ and β each advance by their own last delta.
    DeltaAdd,
}

impl EngineMode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Add),
            1 => Some(Self::Multi),
            2 => Some(Self::Slide),
            3 => Some(Self::DeltaAdd),
            _ => None,
        }
    }
}

/// Per-component arithmetic applied by the engine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackMode {
    /// current + counterpart + ϙ.
    Add,
    /// current · (counterpart + ϙ).
    Multi,
    /// (current + counterpart) / ϙ.
    Slide,
}

impl TrackMode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Add),
            1 => Some(Self::Multi),
            2 => Some(Self::Slide),
            _ => None,
        }
    }
}

/// When the ϙ accumulator accrues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KoppaTrigger {
    OnPsi,
    OnMuAfterPsi,
    OnAllMu,
}

impl KoppaTrigger {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::OnPsi),
            1 => Some(Self::OnMuAfterPsi),
            2 => Some(Self::OnAllMu),
            _ => None,
        }
    }
}

/// Which rational the E-phase ρ detector inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimeTarget {
    /// The pre-engine snapshot ε.
    OnMemory,
    /// The freshly computed υ.
    OnNewUpsilon,
}

impl PrimeTarget {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::OnMemory),
            1 => Some(Self::OnNewUpsilon),
            _ => None,
        }
    }
}

/// Behavior of the microtick-10 Emission step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mt10Behavior {
    /// Surface `forced_emission` only.
    ForcedEmissionOnly,
    /// Additionally latch ρ so the following M microtick fires ψ.
    ForcedPsi,
}

impl Mt10Behavior {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::ForcedEmissionOnly),
            1 => Some(Self::ForcedPsi),
            _ => None,
        }
    }
}

/// Ratio window that force-fires ψ when υ/β falls inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioTriggerMode {
    None,
    /// (3/2, 17/10).
    Golden,
    /// (13/10, 3/2).
    Sqrt2,
    /// (6/5, 7/5).
    Plastic,
    /// Config-provided lower/upper rationals.
    Custom,
}

impl RatioTriggerMode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Golden),
            2 => Some(Self::Sqrt2),
            3 => Some(Self::Plastic),
            4 => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Engine-step sign flip applied to the freshly computed (υ, β).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignFlipMode {
    None,
    Always,
    Alternate,
}

impl SignFlipMode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Always),
            2 => Some(Self::Alternate),
            _ => None,
        }
    }
}

/// Full simulation configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub psi_mode: PsiMode,
    pub koppa_mode: KoppaMode,
    pub engine_mode: EngineMode,
    pub engine_upsilon: TrackMode,
    pub engine_beta: TrackMode,
    pub koppa_trigger: KoppaTrigger,
    pub prime_target: PrimeTarget,
    pub mt10_behavior: Mt10Behavior,
    pub ratio_trigger_mode: RatioTriggerMode,
    pub sign_flip_mode: SignFlipMode,

    /// Run υ and β through independent track modes.
    pub dual_track: bool,
    /// Every ψ uses the 3-way (υ, β, ϙ) inversion.
    pub triple_psi: bool,
    /// Maintain the 4-slot ϙ stack and sampling schedule.
    pub multi_level_koppa: bool,
    /// Override track modes per microtick (mt1/4/7/10 rotation).
    pub asymmetric_cascade: bool,
    /// Upgrade ψ to the 3-way inversion when all three numerators are prime.
    pub conditional_triple_psi: bool,
    /// Override track modes from |num(ϙ)| magnitude bands.
    pub koppa_gated_engine: bool,
    /// Cross-feed δβ into υ and δυ into β after the engine step.
    pub delta_cross_propagation: bool,
    /// With delta-cross: additionally add ϙ into both components.
    pub delta_koppa_offset: bool,
    /// Force-fire ψ when |υ/β| leaves the [0.5, 2] band.
    pub ratio_threshold_psi: bool,
    /// Permit ψ only at ϙ-stack depths 2 and 4.
    pub stack_depth_modes: bool,
    /// Maintain the ε–φ triangle ratios in the engine step.
    pub epsilon_phi_triangle: bool,
    /// Wrap ϙ modulo β once |num(ϙ)| exceeds `koppa_wrap_threshold`.
    pub modular_wrap: bool,
    /// Repeat ψ once per prime numerator among (υ, β, ϙ).
    pub psi_strength_parameter: bool,
    /// Debug-log the transient υ/β double snapshot on M steps.
    pub ratio_snapshot_logging: bool,
    /// Recognized for config compatibility; not wired into the loop.
    pub feedback_oscillator: bool,
    /// Gate ρ-driven ψ to the fixed Fibonacci tick set.
    pub fibonacci_gate: bool,
    /// The custom ratio band is populated and usable.
    pub ratio_custom_range: bool,
    /// ρ detection: twin-prime component pattern.
    pub twin_prime_trigger: bool,
    /// ρ detection: Fibonacci component pattern.
    pub fibonacci_trigger: bool,
    /// ρ detection: perfect-power component pattern.
    pub perfect_power_trigger: bool,

    pub ticks: u64,
    pub initial_upsilon: Rational,
    pub initial_beta: Rational,
    pub initial_koppa: Rational,
    pub ratio_custom_lower: Rational,
    pub ratio_custom_upper: Rational,
    pub koppa_wrap_threshold: u64,
    /// Reserved bound for modular experiments; 0 means unused.
    pub modulus_bound: BigInt,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            psi_mode: PsiMode::Mstep,
            koppa_mode: KoppaMode::Dump,
            engine_mode: EngineMode::Add,
            engine_upsilon: TrackMode::Multi,
            engine_beta: TrackMode::Add,
            koppa_trigger: KoppaTrigger::OnPsi,
            prime_target: PrimeTarget::OnNewUpsilon,
            mt10_behavior: Mt10Behavior::ForcedEmissionOnly,
            ratio_trigger_mode: RatioTriggerMode::None,
            sign_flip_mode: SignFlipMode::None,
            dual_track: false,
            triple_psi: false,
            multi_level_koppa: false,
            asymmetric_cascade: false,
            conditional_triple_psi: false,
            koppa_gated_engine: false,
            delta_cross_propagation: false,
            delta_koppa_offset: false,
            ratio_threshold_psi: false,
            stack_depth_modes: false,
            epsilon_phi_triangle: false,
            modular_wrap: false,
            psi_strength_parameter: false,
            ratio_snapshot_logging: false,
            feedback_oscillator: false,
            fibonacci_gate: false,
            ratio_custom_range: false,
            twin_prime_trigger: false,
            fibonacci_trigger: false,
            perfect_power_trigger: false,
            ticks: 10,
            initial_upsilon: Rational::zero(),
            initial_beta: Rational::zero(),
            initial_koppa: Rational::zero(),
            ratio_custom_lower: Rational::zero(),
            ratio_custom_upper: Rational::zero(),
            koppa_wrap_threshold: 0,
            modulus_bound: BigInt::from(0),
        }
    }
}

impl Config {
    /// Sign flipping is active whenever a non-`None` mode is selected.
    pub fn sign_flip_enabled(&self) -> bool {
        self.sign_flip_mode != SignFlipMode::None
    }

    /// Validate cross-field constraints.
    pub fn validate(&self) -> TensionResult<()> {
        if self.ratio_trigger_mode == RatioTriggerMode::Custom {
            if self
                .ratio_custom_lower
                .cmp_value(&self.ratio_custom_upper)
                .is_ge()
            {
                return Err(TensionError::Config(format!(
                    "custom ratio band must satisfy lower < upper, got {} and {}",
                    self.ratio_custom_lower, self.ratio_custom_upper
                )));
            }
        }
        if self.delta_koppa_offset && !self.delta_cross_propagation {
            log::warn!("delta_koppa_offset has no effect without delta_cross_propagation");
        }
        Ok(())
    }
}
