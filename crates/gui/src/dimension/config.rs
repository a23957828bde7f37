//! Validated runtime configuration of the dimension tool

use shared::AlignmentMode;
use thiserror::Error;

use super::constraint::EdgeStrategy;
use super::snap::DEFAULT_SNAP_THRESHOLD;
use crate::state::settings::{Units, ViewerSettings};

/// Largest supported label precision
pub const MAX_PRECISION: usize = 6;

/// Errors raised by configuration setters.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Snap radius must be a finite, positive number of world units.
    #[error("invalid snap threshold: {0}")]
    InvalidSnapThreshold(f32),

    /// Label precision is out of range.
    #[error("precision {0} exceeds the maximum of {MAX_PRECISION}")]
    InvalidPrecision(usize),

    /// History must hold at least one record.
    #[error("history capacity must be at least 1")]
    ZeroHistoryCapacity,
}

/// Tool options. At most one of orthogonal lock and edge alignment is
/// active; the setters keep it that way.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionConfig {
    snap_enabled: bool,
    snap_threshold: f32,
    orthogonal: bool,
    alignment: AlignmentMode,
    edge_strategy: EdgeStrategy,
    units: Units,
    precision: usize,
}

impl Default for DimensionConfig {
    fn default() -> Self {
        Self {
            snap_enabled: true,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            orthogonal: false,
            alignment: AlignmentMode::None,
            edge_strategy: EdgeStrategy::default(),
            units: Units::Meters,
            precision: 2,
        }
    }
}

impl DimensionConfig {
    pub fn from_settings(settings: &ViewerSettings) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.set_snap_enabled(settings.snap.enabled);
        config.set_snap_threshold(settings.snap.threshold)?;
        config.set_edge_strategy(settings.constraints.edge_strategy);
        config.set_units(settings.units);
        config.set_precision(settings.dimensions.precision)?;
        // Alignment wins over orthogonal when both are stored
        config.set_orthogonal(settings.constraints.orthogonal);
        config.set_alignment(settings.constraints.alignment);
        Ok(config)
    }

    pub fn snap_enabled(&self) -> bool {
        self.snap_enabled
    }

    pub fn snap_threshold(&self) -> f32 {
        self.snap_threshold
    }

    pub fn orthogonal(&self) -> bool {
        self.orthogonal
    }

    pub fn alignment(&self) -> AlignmentMode {
        self.alignment
    }

    pub fn edge_strategy(&self) -> EdgeStrategy {
        self.edge_strategy
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.snap_enabled = enabled;
    }

    pub fn set_snap_threshold(&mut self, threshold: f32) -> Result<(), ConfigError> {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ConfigError::InvalidSnapThreshold(threshold));
        }
        self.snap_threshold = threshold;
        Ok(())
    }

    /// Turning the orthogonal lock on switches edge alignment off
    pub fn set_orthogonal(&mut self, enabled: bool) {
        self.orthogonal = enabled;
        if enabled {
            self.alignment = AlignmentMode::None;
        }
    }

    /// Turning edge alignment on switches the orthogonal lock off
    pub fn set_alignment(&mut self, mode: AlignmentMode) {
        self.alignment = mode;
        if mode.is_active() {
            self.orthogonal = false;
        }
    }

    pub fn set_edge_strategy(&mut self, strategy: EdgeStrategy) {
        self.edge_strategy = strategy;
    }

    pub fn set_units(&mut self, units: Units) {
        self.units = units;
    }

    pub fn set_precision(&mut self, precision: usize) -> Result<(), ConfigError> {
        if precision > MAX_PRECISION {
            return Err(ConfigError::InvalidPrecision(precision));
        }
        self.precision = precision;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_are_exclusive() {
        let mut c = DimensionConfig::default();
        c.set_orthogonal(true);
        c.set_alignment(AlignmentMode::Parallel);
        assert!(!c.orthogonal());
        assert_eq!(c.alignment(), AlignmentMode::Parallel);

        c.set_orthogonal(true);
        assert_eq!(c.alignment(), AlignmentMode::None);
        assert!(c.orthogonal());

        // Switching alignment off leaves orthogonal untouched
        c.set_alignment(AlignmentMode::None);
        assert!(c.orthogonal());
    }

    #[test]
    fn test_threshold_validation() {
        let mut c = DimensionConfig::default();
        assert_eq!(c.set_snap_threshold(-1.0), Err(ConfigError::InvalidSnapThreshold(-1.0)));
        assert!(c.set_snap_threshold(f32::NAN).is_err());
        assert!(c.set_snap_threshold(0.5).is_ok());
        assert_eq!(c.snap_threshold(), 0.5);
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::InvalidPrecision(9);
        assert!(format!("{err}").contains('9'));
        assert!(format!("{}", ConfigError::ZeroHistoryCapacity).contains("capacity"));
    }

    #[test]
    fn test_from_default_settings() {
        let c = DimensionConfig::from_settings(&ViewerSettings::default()).unwrap();
        assert_eq!(c, DimensionConfig::default());
    }
}
