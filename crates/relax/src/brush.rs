//! Relax brush settings and falloff.
//!
//! The brush decides how far a vertex is from "full effect". The relax step
//! only ever sees the resulting falloff distance `d` in [0, 1].

use retopo_config::{BrushDefaults, RelaxConfig};
use serde::{Deserialize, Serialize};

/// Falloff curve for brush influence.
///
/// Determines how brush strength decreases from center to edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum FalloffCurve {
    /// Linear falloff: strength = 1 - distance/radius
    #[default]
    Linear = 0,
    /// Smooth falloff: hermite interpolation
    Smooth = 1,
    /// Sharp falloff: quadratic decay
    Sharp = 2,
    /// Constant: full strength within radius
    Constant = 3,
    /// Sphere: spherical falloff (sqrt-based)
    Sphere = 4,
}

impl FalloffCurve {
    /// Calculate falloff strength at a given normalized distance (0.0 = center, 1.0 = edge).
    pub fn evaluate(&self, normalized_distance: f32) -> f32 {
        let d = normalized_distance.clamp(0.0, 1.0);
        match self {
            FalloffCurve::Linear => 1.0 - d,
            FalloffCurve::Smooth => {
                // Hermite smoothstep: 3t² - 2t³
                let t = 1.0 - d;
                t * t * (3.0 - 2.0 * t)
            }
            FalloffCurve::Sharp => {
                let t = 1.0 - d;
                t * t
            }
            FalloffCurve::Constant => 1.0,
            FalloffCurve::Sphere => (1.0 - d * d).max(0.0).sqrt(),
        }
    }

    /// Falloff distance for the relax step: 0 = full effect, 1 = none.
    ///
    /// For [`FalloffCurve::Linear`] this is exactly `distance / radius`.
    pub fn falloff_distance(&self, distance: f32, radius: f32) -> f32 {
        if radius <= 0.0 {
            return 1.0;
        }
        (1.0 - self.evaluate(distance / radius)).clamp(0.0, 1.0)
    }
}

/// Source of brush radius, strength and falloff policy.
pub trait BrushProvider {
    /// Brush radius in world units
    fn radius(&self) -> f32;

    /// Unitless strength multiplier
    fn strength(&self) -> f32;

    fn falloff(&self) -> FalloffCurve {
        FalloffCurve::Linear
    }
}

/// Concrete brush used by hosts without their own brush widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushSettings {
    /// Radius in world units
    pub radius: f32,
    /// Strength multiplier (0.0 to 1.0)
    pub strength: f32,
    pub falloff: FalloffCurve,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self::from_defaults(&BrushDefaults::default())
    }
}

impl BrushSettings {
    pub fn from_defaults(defaults: &BrushDefaults) -> Self {
        Self {
            radius: defaults.radius,
            strength: defaults.strength,
            falloff: FalloffCurve::Linear,
        }
    }

    /// Brush initialized from `config.brush`
    pub fn from_config(config: &RelaxConfig) -> Self {
        Self::from_defaults(&config.brush)
    }

    /// Set the radius, clamped to be non-negative
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    /// Set the strength, clamped to 0.0..=1.0
    pub fn set_strength(&mut self, strength: f32) {
        self.strength = strength.clamp(0.0, 1.0);
    }
}

impl BrushProvider for BrushSettings {
    fn radius(&self) -> f32 {
        self.radius
    }

    fn strength(&self) -> f32 {
        self.strength
    }

    fn falloff(&self) -> FalloffCurve {
        self.falloff
    }
}
