//! # Error Types
//!
//! Contract violations and degenerate configurations. Empty results
//! (absent bounding nodes, cells with no faces) are never errors.

use thiserror::Error;

/// Errors that can occur while building or mutating a voxel model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VoxError {
    /// A volume axis has zero cells.
    #[error("volume dimension on axis {axis} is zero")]
    ZeroDimension {
        /// Offending axis ('x', 'y' or 'z').
        axis: char,
    },

    /// A volume axis is too large to address with signed cell coordinates.
    #[error("volume dimension on axis {axis} is too large: {size}")]
    DimensionTooLarge {
        /// Offending axis.
        axis: char,
        /// Requested size.
        size: u32,
    },

    /// Cell spacing must be positive and finite.
    #[error("invalid cell spacing on axis {axis}: {value}")]
    InvalidSpacing {
        /// Offending axis.
        axis: char,
        /// Requested spacing.
        value: f32,
    },

    /// A cell coordinate outside the volume was used.
    #[error("cell ({x}, {y}, {z}) is outside volume of size {dims:?}")]
    OutOfBounds {
        /// X coordinate.
        x: i32,
        /// Y coordinate.
        y: i32,
        /// Z coordinate.
        z: i32,
        /// Volume dimensions.
        dims: [i32; 3],
    },

    /// A bounding tree was requested before the volume held any content.
    #[error("volume has not been populated; fill it before building a bounding tree")]
    Unpopulated,

    /// An overlap query was made on a model whose bounding tree is missing.
    #[error("bounding tree not built; call rebuild() first")]
    TreeNotBuilt,

    /// The run table does not belong to this volume (never meshed, or meshed
    /// from a different volume).
    #[error("run table has {actual} records, volume has {expected} cells")]
    RunTableMismatch {
        /// Cell count of the volume.
        expected: usize,
        /// Record count of the run table.
        actual: usize,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for voxel operations.
pub type VoxResult<T> = Result<T, VoxError>;
