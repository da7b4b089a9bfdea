//! # Volume Configuration
//!
//! Dimensions, spacing, and world placement for one voxel model.
//! Loaded once at startup, usually from a TOML table:
//!
//! ```toml
//! dimensions = [32, 16, 32]
//! spacing = [0.5, 0.5, 0.5]
//! offset = [10.0, 0.0, -4.0]
//! ```

use serde::{Deserialize, Serialize};
use voxcarve_shared::Vec3;

use crate::error::{VoxError, VoxResult};

const AXES: [char; 3] = ['x', 'y', 'z'];

/// Construction parameters for a voxel volume.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeConfig {
    /// Cell counts along x, y, z.
    pub dimensions: [u32; 3],
    /// World-space size of one cell along x, y, z.
    #[serde(default = "unit_spacing")]
    pub spacing: [f32; 3],
    /// World-space translation of the volume origin.
    #[serde(default)]
    pub offset: [f32; 3],
}

fn unit_spacing() -> [f32; 3] {
    [1.0; 3]
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self::cube(16)
    }
}

impl VolumeConfig {
    /// A cube of `n` unit cells per side at the origin.
    #[must_use]
    pub const fn cube(n: u32) -> Self {
        Self {
            dimensions: [n, n, n],
            spacing: [1.0; 3],
            offset: [0.0; 3],
        }
    }

    /// Sets the cell spacing.
    #[must_use]
    pub fn with_spacing(mut self, spacing: [f32; 3]) -> Self {
        self.spacing = spacing;
        self
    }

    /// Sets the world offset.
    #[must_use]
    pub fn with_offset(mut self, offset: [f32; 3]) -> Self {
        self.offset = offset;
        self
    }

    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`VoxError::InvalidConfig`] on malformed TOML, or the
    /// validation error for degenerate dimensions/spacing.
    pub fn from_toml_str(text: &str) -> VoxResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| VoxError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks dimensions and spacing.
    ///
    /// # Errors
    ///
    /// Zero or oversized dimensions, non-positive or non-finite spacing,
    /// and non-finite offsets are rejected.
    pub fn validate(&self) -> VoxResult<()> {
        for (axis, &size) in AXES.iter().zip(&self.dimensions) {
            if size == 0 {
                return Err(VoxError::ZeroDimension { axis: *axis });
            }
            if i32::try_from(size).is_err() {
                return Err(VoxError::DimensionTooLarge { axis: *axis, size });
            }
        }
        for (axis, &value) in AXES.iter().zip(&self.spacing) {
            if !(value.is_finite() && value > 0.0) {
                return Err(VoxError::InvalidSpacing { axis: *axis, value });
            }
        }
        if !self.offset_vec().is_finite() {
            return Err(VoxError::InvalidConfig(format!(
                "offset must be finite, got {:?}",
                self.offset
            )));
        }
        Ok(())
    }

    /// Spacing as a vector.
    #[must_use]
    pub fn spacing_vec(&self) -> Vec3 {
        Vec3::from_array(self.spacing)
    }

    /// Offset as a vector.
    #[must_use]
    pub fn offset_vec(&self) -> Vec3 {
        Vec3::from_array(self.offset)
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.dimensions.iter().map(|&d| d as usize).product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_table() {
        let config = VolumeConfig::from_toml_str(
            "dimensions = [4, 2, 3]\nspacing = [0.5, 1.0, 2.0]\noffset = [1.0, 0.0, -1.0]\n",
        )
        .unwrap();
        assert_eq!(config.dimensions, [4, 2, 3]);
        assert_eq!(config.spacing, [0.5, 1.0, 2.0]);
        assert_eq!(config.offset_vec(), Vec3::new(1.0, 0.0, -1.0));
        assert_eq!(config.cell_count(), 24);
    }

    #[test]
    fn test_defaults_fill_in() {
        let config = VolumeConfig::from_toml_str("dimensions = [2, 2, 2]").unwrap();
        assert_eq!(config.spacing, [1.0; 3]);
        assert_eq!(config.offset, [0.0; 3]);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let err = VolumeConfig::from_toml_str("dimensions = [2, 0, 2]").unwrap_err();
        assert_eq!(err, VoxError::ZeroDimension { axis: 'y' });
    }

    #[test]
    fn test_bad_spacing_rejected() {
        let config = VolumeConfig::cube(2).with_spacing([1.0, 1.0, -0.5]);
        assert_eq!(
            config.validate(),
            Err(VoxError::InvalidSpacing { axis: 'z', value: -0.5 })
        );
    }

    #[test]
    fn test_malformed_toml() {
        let err = VolumeConfig::from_toml_str("dimensions = \"big\"").unwrap_err();
        assert!(matches!(err, VoxError::InvalidConfig(_)));
    }
}
