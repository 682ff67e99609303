//! Motion curves and their easing semantics.
//!
//! Every curve maps normalized time `t ∈ [0,1]` to progress with
//! `f(0) = 0` and `f(1) = 1`. `Anticipation` dips below 0 early and
//! `Overshoot` exceeds 1 mid-curve, but both still honor the boundary
//! property.

fn default_tension() -> f64 {
    100.0
}

fn default_damping() -> f64 {
    10.0
}

fn default_overshoot() -> f64 {
    0.2
}

fn default_anticipation() -> f64 {
    0.15
}

/// Pure motion-curve configuration; no lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MotionCurve {
    /// Identity.
    Linear,
    /// Cubic ease-in.
    EaseIn,
    /// Cubic ease-out.
    EaseOut,
    /// Cubic ease-in-out.
    EaseInOut,
    /// Closed-form damped spring response.
    Spring {
        /// Spring stiffness; `ω0 = sqrt(tension)`.
        #[serde(default = "default_tension")]
        tension: f64,
        /// Damping; `ζ = damping / (2·sqrt(tension))`.
        #[serde(default = "default_damping")]
        damping: f64,
    },
    /// Four-segment piecewise-quadratic bounce-out.
    Bounce,
    /// Exponentially decaying sinusoid settling on 1.
    Elastic,
    /// Backward pull before easing forward.
    Anticipation {
        /// Depth of the backward pull.
        #[serde(default = "default_anticipation")]
        amount: f64,
    },
    /// Ease past 1 before settling back.
    Overshoot {
        /// Peak excess over 1.
        #[serde(default = "default_overshoot")]
        amount: f64,
    },
    /// Cubic in-out positioning with velocity-derived squash/stretch
    /// factors attached to each inbetween sample.
    SquashStretch,
}

impl MotionCurve {
    /// Spring with default tension/damping.
    pub fn spring() -> Self {
        Self::Spring {
            tension: default_tension(),
            damping: default_damping(),
        }
    }

    /// Anticipation with the default pull depth.
    pub fn anticipation() -> Self {
        Self::Anticipation {
            amount: default_anticipation(),
        }
    }

    /// Overshoot with the default excess.
    pub fn overshoot() -> Self {
        Self::Overshoot {
            amount: default_overshoot(),
        }
    }

    /// Apply the curve to normalized time.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => ease_in_cubic(t),
            Self::EaseOut => ease_out_cubic(t),
            Self::EaseInOut | Self::SquashStretch => ease_in_out_cubic(t),
            Self::Spring { tension, damping } => spring(t, tension, damping),
            Self::Bounce => bounce_out(t),
            Self::Elastic => elastic_out(t),
            Self::Anticipation { amount } => anticipation(t, amount),
            Self::Overshoot { amount } => overshoot(t, amount),
        }
    }
}

/// Identity easing.
pub fn ease_linear(t: f64) -> f64 {
    t
}

/// Standard cubic ease-in.
pub fn ease_in_cubic(t: f64) -> f64 {
    t * t * t
}

/// Standard cubic ease-out.
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Standard cubic ease-in-out.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
    }
}

/// Closed-form spring response normalized to `[0,1]` time.
///
/// `ζ = damping / (2·sqrt(tension))`. Underdamped springs (`ζ < 1`) ring
/// with a decaying cosine+sine; critically and overdamped springs approach
/// 1 exponentially. `f(0) = 0`, and the window ends settled (`f(1) = 1`).
pub fn spring(t: f64, tension: f64, damping: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let omega0 = tension.max(1e-6).sqrt();
    let zeta = damping / (2.0 * omega0);
    if zeta < 1.0 {
        let omega_d = omega0 * (1.0 - zeta * zeta).sqrt();
        let decay = (-zeta * omega0 * t).exp();
        1.0 - decay * ((omega_d * t).cos() + (zeta * omega0 / omega_d) * (omega_d * t).sin())
    } else {
        let decay = (-omega0 * t).exp();
        1.0 - decay * (1.0 + omega0 * t)
    }
}

/// Standard four-segment bounce-out (n1 = 7.5625, d1 = 2.75).
pub fn bounce_out(t: f64) -> f64 {
    const N1: f64 = 7.5625;
    const D1: f64 = 2.75;
    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

/// `2^(-10t)·sin((10t−0.75)·2π/3)+1` with explicit boundaries.
pub fn elastic_out(t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    const C4: f64 = std::f64::consts::TAU / 3.0;
    2.0f64.powf(-10.0 * t) * ((10.0 * t - 0.75) * C4).sin() + 1.0
}

/// Pull backward for the first 20 % of the window, then ease forward from
/// the pulled-back position to 1. Continuous at t = 0.2.
pub fn anticipation(t: f64, amount: f64) -> f64 {
    if t < 0.2 {
        -amount * (t / 0.2)
    } else {
        let u = (t - 0.2) / 0.8;
        -amount + (1.0 + amount) * ease_out_cubic(u)
    }
}

/// Ease past 1 (up to `1 + amount`) over the first 70 % of the window,
/// then settle back down to 1. Continuous at t = 0.7.
pub fn overshoot(t: f64, amount: f64) -> f64 {
    if t < 0.7 {
        (1.0 + amount) * ease_out_cubic(t / 0.7)
    } else {
        let u = (t - 0.7) / 0.3;
        1.0 + amount * (1.0 - ease_in_out_cubic(u))
    }
}

/// Squash-in over the first 30 % of the window, recovery over the rest.
///
/// Returns the deformation magnitude (0 when fully recovered); used for
/// landing impacts.
pub fn impact_squash(t: f64, intensity: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.3 {
        intensity * (t / 0.3)
    } else {
        intensity * (1.0 - (t - 0.3) / 0.7)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
