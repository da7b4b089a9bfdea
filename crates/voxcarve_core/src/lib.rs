//! # VOXCARVE Core
//!
//! Destructible voxel volumes for real-time rendering.
//!
//! ## Design Principles
//!
//! 1. **One quad per exposed face** - no greedy merging, so every triangle belongs to one cell
//! 2. **Append-only meshes** - removal blanks triangles and appends new ones; indices never move
//! 3. **Flat arenas** - bounding nodes live in a `Vec` and refer to each other by id
//! 4. **No rendering dependencies** - triangles are `Pod` and ready to upload
//!
//! ## Thread Safety
//!
//! Everything is single-threaded. A model is mutated through `&mut self`;
//! overlap queries borrow both models immutably.
//!
//! ## Example
//!
//! ```rust,ignore
//! use voxcarve_core::{VolumeConfig, VoxelModel};
//!
//! let mut rock = VoxelModel::new(&VolumeConfig::cube(16), 0u8)?;
//! rock.fill(|_, y, _, _| u8::from(y < 8));
//! rock.rebuild()?;
//!
//! let report = rock.remove_voxel(3, 7, 3)?;
//! upload_partial(rock.mesh(), &report);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod bounds;
pub mod config;
pub mod error;
pub mod face;
pub mod mesh;
pub mod mesher;
pub mod model;
pub mod removal;
pub mod run;
pub mod volume;

pub use bounds::{
    find_overlap_pairs, find_overlaps, BoundingNode, BoundingTree, CellBox, NodeId, Sphere,
};
pub use config::VolumeConfig;
pub use error::{VoxError, VoxResult};
pub use face::Face;
pub use mesh::{Triangle, TriangleMesh, TriangleRange};
pub use mesher::{mesh_full, should_emit_face, MeshedVolume};
pub use model::{ModelStats, VoxelModel};
pub use removal::{remove_voxel, RemovalOutcome, RemovalReport};
pub use run::{RunRecord, RunTable};
pub use volume::{CellCoord, Material, Volume};
