//! # VOXCARVE Procedural Generation
//!
//! Deterministic content for voxel volumes.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: same seed and parameters always produce the same cells
//! 2. **Callback-shaped**: every generator is a closure for `Volume::fill`
//! 3. **Composable**: wrappers such as [`grounded`] take another generator
//!
//! ## Example
//!
//! ```rust,ignore
//! use voxcarve_core::{VolumeConfig, VoxelModel};
//! use voxcarve_procedural::{heightfield, NoiseSeed};
//!
//! let mut terrain = VoxelModel::new(&VolumeConfig::cube(64), 0u8)?;
//! terrain.fill(heightfield(NoiseSeed::new(12345), 0.05, 24.0, 8.0, 1));
//! terrain.rebuild()?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod noise;
pub mod shapes;

pub use noise::{NoiseSeed, SimplexNoise};
pub use shapes::{grounded, heightfield, scatter, shell, solid, sphere, HEIGHTFIELD_OCTAVES};
