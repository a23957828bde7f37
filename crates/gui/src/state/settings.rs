//! Viewer settings

use serde::{Deserialize, Serialize};
use shared::AlignmentMode;

use crate::dimension::constraint::EdgeStrategy;
use crate::dimension::snap::DEFAULT_SNAP_THRESHOLD;

/// Unit system for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Units {
    Millimeters,
    Centimeters,
    #[default]
    Meters,
    Inches,
}

impl Units {
    /// Get the abbreviation for this unit
    pub fn abbrev(&self) -> &'static str {
        match self {
            Units::Millimeters => "mm",
            Units::Centimeters => "cm",
            Units::Meters => "m",
            Units::Inches => "in",
        }
    }

    /// Get the display name for this unit
    pub fn display_name(&self) -> &'static str {
        match self {
            Units::Millimeters => "Millimeters",
            Units::Centimeters => "Centimeters",
            Units::Meters => "Meters",
            Units::Inches => "Inches",
        }
    }

    /// All available units
    pub fn all() -> &'static [Units] {
        &[Units::Millimeters, Units::Centimeters, Units::Meters, Units::Inches]
    }
}

/// Snap settings for dimensioning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapSettings {
    /// Enable snapping
    pub enabled: bool,
    /// Snap radius in world units
    pub threshold: f32,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_SNAP_THRESHOLD,
        }
    }
}

/// Constraint settings for the second measurement point
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstraintSettings {
    /// Lock measurements to world axes
    pub orthogonal: bool,
    /// Align measurements to a picked reference edge
    pub alignment: AlignmentMode,
    /// How the reference edge is derived from a click
    #[serde(default)]
    pub edge_strategy: EdgeStrategy,
}

/// Dimension display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionSettings {
    /// Number of decimal places for dimension values
    pub precision: usize,
}

impl Default for DimensionSettings {
    fn default() -> Self {
        Self { precision: 2 }
    }
}

/// History and input timing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Maximum number of action records kept
    pub capacity: usize,
    /// Quiet period before a camera move is recorded (ms)
    pub camera_debounce_ms: u64,
    /// Window in which a second Shift-click selects instead of measuring (ms)
    pub double_click_ms: u64,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            capacity: 50,
            camera_debounce_ms: 300,
            double_click_ms: 300,
        }
    }
}

/// All viewer settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewerSettings {
    /// Display units
    pub units: Units,
    /// Snap settings
    pub snap: SnapSettings,
    /// Constraint settings
    #[serde(default)]
    pub constraints: ConstraintSettings,
    /// Dimension display settings
    #[serde(default)]
    pub dimensions: DimensionSettings,
    /// History settings
    #[serde(default)]
    pub history: HistorySettings,
}

impl ViewerSettings {
    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(dirs) = directories::ProjectDirs::from("com", "dimviewer", "dimviewer") {
            let config_path = dirs.config_dir().join("settings.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                match serde_json::from_str(&json) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("Ignoring {}: {e}", config_path.display()),
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(dirs) = directories::ProjectDirs::from("com", "dimviewer", "dimviewer") {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("settings.json");
                if let Ok(json) = serde_json::to_string_pretty(self) {
                    if let Err(e) = std::fs::write(&config_path, json) {
                        tracing::error!("Failed to write {}: {e}", config_path.display());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_json_roundtrip() {
        let mut s = ViewerSettings::default();
        s.units = Units::Millimeters;
        s.constraints.alignment = AlignmentMode::Perpendicular;
        let json = serde_json::to_string(&s).unwrap();
        let back: ViewerSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.units, Units::Millimeters);
        assert_eq!(back.constraints.alignment, AlignmentMode::Perpendicular);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let json = r#"{"units": "Inches", "snap": {"enabled": false, "threshold": 0.1}}"#;
        let s: ViewerSettings = serde_json::from_str(json).unwrap();
        assert_eq!(s.units, Units::Inches);
        assert!(!s.snap.enabled);
        assert_eq!(s.history.capacity, 50);
        assert_eq!(s.dimensions.precision, 2);
    }
}
