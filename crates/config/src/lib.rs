//! Shared configuration for the relax tool
//!
//! This crate provides the single source of truth for the relaxation
//! tunables, action bindings and brush defaults shared by the mesh engine
//! and whatever host drives it.

use serde::{Deserialize, Serialize};

/// Default multiplier applied to brush strength and elapsed time
pub const DEFAULT_BASE_STRENGTH: f32 = 100.0;

/// Default scale of the edge-length equalization term
pub const DEFAULT_EDGE_FACTOR: f32 = 0.1;

/// Default number of undo checkpoints kept
pub const DEFAULT_MAX_UNDO_LEVELS: usize = 20;

/// Default brush radius in world units
pub const DEFAULT_BRUSH_RADIUS: f32 = 0.5;

/// Default brush strength (unitless multiplier)
pub const DEFAULT_BRUSH_STRENGTH: f32 = 0.5;

/// Errors produced while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value {name} = {value}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl ConfigError {
    fn invalid(name: &'static str, value: impl ToString, reason: &'static str) -> Self {
        ConfigError::InvalidValue {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

/// Names of the host actions the relax tool reacts to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionBindings {
    /// Held to relax under the brush
    pub relax: String,
    /// Held to relax the current selection
    pub relax_selected: String,
    /// Pressed to abort the active relax and roll back
    pub cancel: String,
}

impl Default for ActionBindings {
    fn default() -> Self {
        Self {
            relax: "action".to_string(),
            relax_selected: "relax selected".to_string(),
            cancel: "cancel".to_string(),
        }
    }
}

/// Initial brush settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushDefaults {
    /// Brush radius in world units
    pub radius: f32,
    /// Brush strength multiplier
    pub strength: f32,
}

impl Default for BrushDefaults {
    fn default() -> Self {
        Self {
            radius: DEFAULT_BRUSH_RADIUS,
            strength: DEFAULT_BRUSH_STRENGTH,
        }
    }
}

/// Configuration for the relax tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaxConfig {
    /// Multiplier turning brush strength × elapsed seconds into step strength
    pub base_strength: f32,
    /// Scale of the edge-length equalization term
    pub edge_factor: f32,
    /// Maximum undo checkpoints retained
    pub max_undo_levels: usize,
    /// Action names
    pub bindings: ActionBindings,
    /// Brush defaults
    pub brush: BrushDefaults,
}

impl Default for RelaxConfig {
    fn default() -> Self {
        Self {
            base_strength: DEFAULT_BASE_STRENGTH,
            edge_factor: DEFAULT_EDGE_FACTOR,
            max_undo_levels: DEFAULT_MAX_UNDO_LEVELS,
            bindings: ActionBindings::default(),
            brush: BrushDefaults::default(),
        }
    }
}

impl RelaxConfig {
    /// Parse and validate a config from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RelaxConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every value is usable by the relax engine
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_strength.is_finite() && self.base_strength > 0.0) {
            return Err(ConfigError::invalid(
                "base_strength",
                self.base_strength,
                "must be a positive finite number",
            ));
        }
        if !(self.edge_factor > 0.0 && self.edge_factor <= 1.0) {
            return Err(ConfigError::invalid(
                "edge_factor",
                self.edge_factor,
                "must be in (0, 1]",
            ));
        }
        if self.max_undo_levels == 0 {
            return Err(ConfigError::invalid(
                "max_undo_levels",
                self.max_undo_levels,
                "must be at least 1",
            ));
        }
        if !(self.brush.radius.is_finite() && self.brush.radius >= 0.0) {
            return Err(ConfigError::invalid(
                "brush.radius",
                self.brush.radius,
                "must be a non-negative finite number",
            ));
        }
        if !(self.brush.strength.is_finite() && self.brush.strength >= 0.0) {
            return Err(ConfigError::invalid(
                "brush.strength",
                self.brush.strength,
                "must be a non-negative finite number",
            ));
        }

        let b = &self.bindings;
        for (name, value) in [
            ("bindings.relax", &b.relax),
            ("bindings.relax_selected", &b.relax_selected),
            ("bindings.cancel", &b.cancel),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid(name, value, "must not be empty"));
            }
        }
        if b.relax == b.relax_selected || b.relax == b.cancel || b.relax_selected == b.cancel {
            return Err(ConfigError::invalid(
                "bindings",
                format!("{}/{}/{}", b.relax, b.relax_selected, b.cancel),
                "action names must be distinct",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RelaxConfig::default();
        assert_eq!(config.base_strength, DEFAULT_BASE_STRENGTH);
        assert_eq!(config.edge_factor, DEFAULT_EDGE_FACTOR);
        assert_eq!(config.bindings.relax, "action");
        assert_eq!(config.bindings.relax_selected, "relax selected");
        assert_eq!(config.bindings.cancel, "cancel");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RelaxConfig::from_json(r#"{ "base_strength": 50.0, "brush": { "radius": 2.0 } }"#)
            .unwrap();
        assert_eq!(config.base_strength, 50.0);
        assert_eq!(config.brush.radius, 2.0);
        assert_eq!(config.brush.strength, DEFAULT_BRUSH_STRENGTH);
        assert_eq!(config.max_undo_levels, DEFAULT_MAX_UNDO_LEVELS);
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = RelaxConfig::default();
        config.bindings.cancel = "escape".to_string();
        let json = config.to_json().unwrap();
        assert_eq!(RelaxConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            RelaxConfig::from_json(r#"{ "edge_factor": 0.0 }"#),
            Err(ConfigError::InvalidValue { name: "edge_factor", .. })
        ));
        assert!(matches!(
            RelaxConfig::from_json(r#"{ "max_undo_levels": 0 }"#),
            Err(ConfigError::InvalidValue { name: "max_undo_levels", .. })
        ));
        assert!(matches!(
            RelaxConfig::from_json(r#"{ "bindings": { "cancel": "action" } }"#),
            Err(ConfigError::InvalidValue { name: "bindings", .. })
        ));
        assert!(matches!(
            RelaxConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
