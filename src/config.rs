//! Engine configuration. Every field has a default, so a partial JSON
//! object (or none at all) is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::notation::Duration;

/// Layout constants, in unscaled canvas units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Nominal measure width before glyph widening
    pub measure_width: f64,
    /// Gap after every measure
    pub measure_padding: f64,
    /// Display scale applied by the host; used for centering
    pub scale_factor: f64,
    /// Canvas height
    pub stave_height: f64,
    /// Top of every stave
    pub stave_y: f64,
    pub clef_width: f64,
    /// Width of one sharp or flat in a key signature
    pub key_accidental_width: f64,
    /// Extra space after a non-empty key signature
    pub key_signature_padding: f64,
    pub time_signature_width: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            measure_width: 150.0,
            measure_padding: 2.0,
            scale_factor: 2.0,
            stave_height: 250.0,
            stave_y: 0.0,
            clef_width: 32.0,
            key_accidental_width: 10.0,
            key_signature_padding: 4.0,
            time_signature_width: 24.0,
        }
    }
}

/// How the live overlay chord is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Fill and stroke color of the overlay chord
    pub color: String,
    /// Note value the overlay chord is drawn with
    pub duration: Duration,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            color: "red".to_string(),
            duration: Duration::Quarter,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub layout: LayoutConfig,
    pub overlay: OverlayConfig,
}

impl EngineConfig {
    /// Load a configuration from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid engine config: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{"layout": {"measure_width": 200}}"#).unwrap();
        assert_eq!(config.layout.measure_width, 200.0);
        assert_eq!(config.layout.measure_padding, 2.0);
        assert_eq!(config.overlay, OverlayConfig::default());
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
        assert!(EngineConfig::from_json("[").is_err());
    }
}
