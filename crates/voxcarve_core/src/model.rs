//! # Voxel Model
//!
//! One placed volume with everything derived from it: the mesh, the run
//! table, and the bounding tree.
//!
//! ## Lifecycle
//!
//! ```text
//! new → fill → rebuild → { remove_voxel | overlaps_with | carve_overlaps }*
//! ```
//!
//! `fill` invalidates the mesh and tree; call `rebuild` before removing or
//! querying. Removals patch the mesh in place but leave the tree alone, so
//! the tree can still hold cells that are already empty. Removing those
//! again is a no-op.

use voxcarve_shared::Vec3;

use crate::bounds::{find_overlaps, BoundingTree};
use crate::config::VolumeConfig;
use crate::error::{VoxError, VoxResult};
use crate::mesh::TriangleMesh;
use crate::mesher::mesh_full;
use crate::removal::{remove_voxel, RemovalReport};
use crate::run::RunTable;
use crate::volume::{CellCoord, Material, Volume};

/// Counters describing a model's current state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelStats {
    /// Triangle slots in the mesh, blanked ones included.
    pub triangles: usize,
    /// Triangles still visible.
    pub visible_triangles: usize,
    /// Occupied cells.
    pub solid_cells: usize,
    /// Nodes in the bounding tree (0 if not built).
    pub tree_nodes: usize,
}

/// A volume placed in the world, with its mesh and bounding tree.
#[derive(Debug, Clone)]
pub struct VoxelModel<T: Material> {
    volume: Volume<T>,
    mesh: TriangleMesh,
    runs: RunTable,
    tree: Option<BoundingTree>,
    /// World translation of cell (0, 0, 0)'s center.
    offset: Vec3,
}

impl<T: Material> VoxelModel<T> {
    /// Creates an unfilled model from a config.
    ///
    /// # Errors
    ///
    /// Returns an error if the config fails validation.
    pub fn new(config: &VolumeConfig, empty: T) -> VoxResult<Self> {
        let volume = Volume::from_config(config, empty)?;
        Ok(Self::from_volume(volume, config.offset_vec()))
    }

    /// Wraps an existing volume. Nothing is meshed yet.
    #[must_use]
    pub fn from_volume(volume: Volume<T>, offset: Vec3) -> Self {
        Self {
            volume,
            mesh: TriangleMesh::new(),
            runs: RunTable::default(),
            tree: None,
            offset,
        }
    }

    /// Fills every cell from `generator` and drops the derived state.
    pub fn fill<F>(&mut self, generator: F)
    where
        F: FnMut(i32, i32, i32, &Volume<T>) -> T,
    {
        self.volume.fill(generator);
        self.mesh = TriangleMesh::new();
        self.runs = RunTable::default();
        self.tree = None;
    }

    /// Re-meshes from scratch and rebuilds the bounding tree.
    ///
    /// # Errors
    ///
    /// [`VoxError::Unpopulated`] if the volume was never filled.
    pub fn rebuild(&mut self) -> VoxResult<()> {
        let empty = self.volume.empty();
        let tree = BoundingTree::build(&self.volume, empty)?;
        let meshed = mesh_full(&self.volume, empty);

        self.mesh = meshed.mesh;
        self.runs = meshed.runs;
        self.tree = Some(tree);

        tracing::info!(
            "Rebuilt model {:?}: {} solid cells, {} triangles, {} tree nodes",
            self.volume.dims(),
            self.volume.solid_count(),
            self.mesh.len(),
            self.tree.as_ref().map_or(0, BoundingTree::len)
        );
        Ok(())
    }

    /// Empties one cell and patches the mesh.
    ///
    /// # Errors
    ///
    /// - [`VoxError::OutOfBounds`] for coordinates outside the volume
    /// - [`VoxError::RunTableMismatch`] if the model was never rebuilt
    pub fn remove_voxel(&mut self, x: i32, y: i32, z: i32) -> VoxResult<RemovalReport> {
        let empty = self.volume.empty();
        remove_voxel(
            &mut self.volume,
            &mut self.mesh,
            &mut self.runs,
            CellCoord::new(x, y, z),
            empty,
        )
    }

    /// Cells of this model that touch cells of `other`, each model at its
    /// own offset. Each cell appears at most once.
    ///
    /// # Errors
    ///
    /// [`VoxError::TreeNotBuilt`] if either model has no bounding tree.
    pub fn overlaps_with<U: Material>(&self, other: &VoxelModel<U>) -> VoxResult<Vec<CellCoord>> {
        let (Some(mine), Some(theirs)) = (self.tree.as_ref(), other.tree.as_ref()) else {
            tracing::warn!("Overlap query on a model without a bounding tree");
            return Err(VoxError::TreeNotBuilt);
        };
        Ok(find_overlaps(mine, self.offset, theirs, other.offset))
    }

    /// Removes every cell of this model that touches `other`.
    ///
    /// Returns one report per removed cell. Cells that were already empty
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Same as [`VoxelModel::overlaps_with`] and [`VoxelModel::remove_voxel`].
    pub fn carve_overlaps<U: Material>(
        &mut self,
        other: &VoxelModel<U>,
    ) -> VoxResult<Vec<RemovalReport>> {
        let hits = self.overlaps_with(other)?;
        let mut reports = Vec::with_capacity(hits.len());
        for cell in hits {
            let report = self.remove_voxel(cell.x, cell.y, cell.z)?;
            if !report.is_noop() {
                reports.push(report);
            }
        }

        if !reports.is_empty() {
            tracing::info!(
                "Carved {} cells from model {:?}, {} visible triangles remain",
                reports.len(),
                self.volume.dims(),
                self.mesh.visible_count()
            );
        }
        Ok(reports)
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> ModelStats {
        ModelStats {
            triangles: self.mesh.len(),
            visible_triangles: self.mesh.visible_count(),
            solid_cells: self.volume.solid_count(),
            tree_nodes: self.tree.as_ref().map_or(0, BoundingTree::len),
        }
    }

    // =========================================================================
    // Placement
    // =========================================================================

    /// World offset.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Moves the model to `offset`.
    #[inline]
    pub fn set_offset(&mut self, offset: Vec3) {
        self.offset = offset;
    }

    /// Moves the model by `delta`.
    #[inline]
    pub fn translate(&mut self, delta: Vec3) {
        self.offset += delta;
    }

    /// World-space center of a cell.
    #[must_use]
    pub fn world_center(&self, cell: CellCoord) -> Vec3 {
        self.volume.cell_center(cell.x, cell.y, cell.z) + self.offset
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The voxel data.
    #[inline]
    #[must_use]
    pub const fn volume(&self) -> &Volume<T> {
        &self.volume
    }

    /// The mesh, in volume-local space.
    #[inline]
    #[must_use]
    pub const fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    /// Per-cell run records.
    #[inline]
    #[must_use]
    pub const fn runs(&self) -> &RunTable {
        &self.runs
    }

    /// Bounding tree from the last rebuild.
    #[inline]
    #[must_use]
    pub const fn tree(&self) -> Option<&BoundingTree> {
        self.tree.as_ref()
    }
}
