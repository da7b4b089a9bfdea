//! Incremental voxel removal.
//!
//! Removing a cell never re-meshes. The cell's own triangles are blanked in
//! place, and each occupied neighbor gets one new quad for the face that
//! used to be hidden behind it. New quads always go to the end of the mesh,
//! so every index a renderer already holds stays valid.

use crate::error::{VoxError, VoxResult};
use crate::face::Face;
use crate::mesh::{TriangleMesh, TriangleRange};
use crate::mesher::{emit_face, should_emit_face};
use crate::run::RunTable;
use crate::volume::{CellCoord, Material, Volume};

/// What a removal call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// The cell was occupied and is now empty.
    Removed,
    /// The cell was already empty; nothing changed.
    AlreadyEmpty,
}

/// Mesh changes caused by one removal, for patching a GPU-side copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalReport {
    /// The cell that was targeted.
    pub cell: CellCoord,
    /// Whether anything happened.
    pub outcome: RemovalOutcome,
    /// Ranges whose triangles were blanked.
    pub blanked: Vec<TriangleRange>,
    /// Contiguous range of newly appended triangles, if any.
    pub appended: Option<TriangleRange>,
    /// Neighbor faces that became visible, in [`Face::ALL`] order of the
    /// direction from the removed cell.
    pub exposed: Vec<(CellCoord, Face)>,
}

impl RemovalReport {
    fn unchanged(cell: CellCoord) -> Self {
        Self {
            cell,
            outcome: RemovalOutcome::AlreadyEmpty,
            blanked: Vec::new(),
            appended: None,
            exposed: Vec::new(),
        }
    }

    /// Number of triangles covered by the blanked ranges.
    #[must_use]
    pub fn blanked_count(&self) -> usize {
        self.blanked.iter().map(|r| r.count()).sum()
    }

    /// Number of triangles appended.
    #[must_use]
    pub fn appended_count(&self) -> usize {
        self.appended.map_or(0, TriangleRange::count)
    }

    /// True if the call changed nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.outcome == RemovalOutcome::AlreadyEmpty
    }
}

/// Empties one cell and patches the mesh and run table.
///
/// 1. Blank every range in the cell's run record
/// 2. Write `empty` into the cell
/// 3. For each occupied neighbor whose facing side is now exposed, append
///    that face and record the range on the neighbor's run
///
/// Removing an already-empty cell is a no-op that reports
/// [`RemovalOutcome::AlreadyEmpty`].
///
/// # Errors
///
/// - [`VoxError::OutOfBounds`] if `cell` is outside the volume
/// - [`VoxError::RunTableMismatch`] if `runs` was not built from `volume`
pub fn remove_voxel<T: Material>(
    volume: &mut Volume<T>,
    mesh: &mut TriangleMesh,
    runs: &mut RunTable,
    cell: CellCoord,
    empty: T,
) -> VoxResult<RemovalReport> {
    let CellCoord { x, y, z } = cell;
    if !volume.in_bounds(x, y, z) {
        return Err(volume.out_of_bounds(cell));
    }
    if runs.len() != volume.len() {
        return Err(VoxError::RunTableMismatch {
            expected: volume.len(),
            actual: runs.len(),
        });
    }
    if volume.get(x, y, z) == empty {
        tracing::debug!("Cell ({}, {}, {}) already empty, nothing to remove", x, y, z);
        return Ok(RemovalReport::unchanged(cell));
    }

    let index = volume.index(x, y, z);
    let blanked = runs
        .get_mut(index)
        .map(crate::run::RunRecord::take_ranges)
        .unwrap_or_default();
    for &range in &blanked {
        mesh.blank(range);
    }

    volume.set(x, y, z, empty);

    let first_new = mesh.len();
    let mut exposed = Vec::new();
    for face in Face::ALL {
        let neighbor = cell.offset(face.offset());
        if !volume.in_bounds(neighbor.x, neighbor.y, neighbor.z) {
            continue;
        }
        if volume.get(neighbor.x, neighbor.y, neighbor.z) == empty {
            continue;
        }
        let facing = face.opposite();
        if !should_emit_face(volume, neighbor.x, neighbor.y, neighbor.z, facing, empty) {
            continue;
        }

        let range = emit_face(volume, mesh, neighbor, facing);
        let neighbor_index = volume.index(neighbor.x, neighbor.y, neighbor.z);
        if let Some(record) = runs.get_mut(neighbor_index) {
            record.push_extra(range);
        }
        exposed.push((neighbor, facing));
    }

    let appended = (mesh.len() > first_new).then(|| TriangleRange::new(first_new, mesh.len() - 1));

    let report = RemovalReport {
        cell,
        outcome: RemovalOutcome::Removed,
        blanked,
        appended,
        exposed,
    };
    tracing::debug!(
        "Removed cell ({}, {}, {}): blanked {} triangles, appended {}",
        x,
        y,
        z,
        report.blanked_count(),
        report.appended_count()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesher::mesh_full;
    use voxcarve_shared::Vec3;

    fn solid_model(n: u32) -> (Volume<u8>, TriangleMesh, RunTable) {
        let mut v = Volume::new([n, n, n], Vec3::ONE, 0).unwrap();
        v.fill(|_, _, _, _| 1);
        let out = mesh_full(&v, 0);
        (v, out.mesh, out.runs)
    }

    #[test]
    fn test_remove_center_exposes_six_faces() {
        let (mut v, mut mesh, mut runs) = solid_model(3);
        let before = mesh.len();
        let report = remove_voxel(&mut v, &mut mesh, &mut runs, CellCoord::new(1, 1, 1), 0).unwrap();

        assert_eq!(report.outcome, RemovalOutcome::Removed);
        // Enclosed cell had no triangles of its own
        assert!(report.blanked.is_empty());
        assert_eq!(report.appended_count(), 12);
        assert_eq!(report.appended, Some(TriangleRange::new(before, before + 11)));
        assert_eq!(report.exposed.len(), 6);
        assert_eq!(report.exposed[0], (CellCoord::new(1, 0, 1), Face::Top));
    }

    #[test]
    fn test_neighbor_runs_gain_extra_ranges() {
        let (mut v, mut mesh, mut runs) = solid_model(3);
        remove_voxel(&mut v, &mut mesh, &mut runs, CellCoord::new(1, 1, 1), 0).unwrap();

        let below = runs.get(v.index(1, 0, 1)).unwrap();
        assert_eq!(below.extra().len(), 1);
        // Removing the neighbor blanks its primary and the new extra range
        let report = remove_voxel(&mut v, &mut mesh, &mut runs, CellCoord::new(1, 0, 1), 0).unwrap();
        assert_eq!(report.blanked.len(), 2);
        for range in &report.blanked {
            for i in range.iter() {
                assert!(!mesh.is_visible(i));
            }
        }
    }

    #[test]
    fn test_corner_removal_blanks_own_faces() {
        let (mut v, mut mesh, mut runs) = solid_model(2);
        let report = remove_voxel(&mut v, &mut mesh, &mut runs, CellCoord::new(0, 0, 0), 0).unwrap();
        // Corner cell showed 3 faces; 3 neighbors gain one face each
        assert_eq!(report.blanked_count(), 6);
        assert_eq!(report.appended_count(), 6);
        assert_eq!(mesh.visible_count(), 24 * 2 - 6 + 6);
    }

    #[test]
    fn test_double_removal_is_noop() {
        let (mut v, mut mesh, mut runs) = solid_model(3);
        let cell = CellCoord::new(1, 1, 1);
        remove_voxel(&mut v, &mut mesh, &mut runs, cell, 0).unwrap();
        let len = mesh.len();
        let visible = mesh.visible_count();

        let again = remove_voxel(&mut v, &mut mesh, &mut runs, cell, 0).unwrap();
        assert!(again.is_noop());
        assert_eq!(mesh.len(), len);
        assert_eq!(mesh.visible_count(), visible);
    }

    #[test]
    fn test_out_of_bounds_is_error() {
        let (mut v, mut mesh, mut runs) = solid_model(2);
        let err = remove_voxel(&mut v, &mut mesh, &mut runs, CellCoord::new(2, 0, 0), 0).unwrap_err();
        assert!(matches!(err, VoxError::OutOfBounds { x: 2, .. }));
    }

    #[test]
    fn test_unmeshed_volume_is_error() {
        let (mut v, mut mesh, _) = solid_model(2);
        let mut runs = RunTable::default();
        let err = remove_voxel(&mut v, &mut mesh, &mut runs, CellCoord::new(0, 0, 0), 0).unwrap_err();
        assert_eq!(err, VoxError::RunTableMismatch { expected: 8, actual: 0 });
    }
}
