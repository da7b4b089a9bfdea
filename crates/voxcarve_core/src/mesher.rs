//! Face-culled mesher.
//!
//! Every exposed face of every occupied cell becomes exactly one quad (two
//! triangles). Faces are never merged with their neighbors, so each
//! triangle belongs to exactly one cell and can be blanked on its own.
//!
//! ## Algorithm
//!
//! 1. Walk cells z outer, y middle, x inner
//! 2. For each occupied cell, test the six faces in [`Face::ALL`] order
//! 3. Emit a quad for each face whose neighbor is outside the volume or empty
//! 4. Record the cell's contiguous triangle range in its [`RunRecord`]

use voxcarve_shared::Vec3;

use crate::face::{Face, CUBE_CORNERS};
use crate::mesh::{TriangleMesh, TriangleRange};
use crate::run::{RunRecord, RunTable};
use crate::volume::{CellCoord, Material, Volume};

/// Output of a full meshing pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshedVolume {
    /// Every emitted triangle, in emission order.
    pub mesh: TriangleMesh,
    /// One record per cell, in linear index order.
    pub runs: RunTable,
}

/// Returns true if `face` of the cell at (x, y, z) should be drawn: its
/// neighbor is outside the volume or holds `empty`.
///
/// This is the only visibility test; meshing and incremental removal both
/// go through it.
#[inline]
#[must_use]
pub fn should_emit_face<T: Material>(
    volume: &Volume<T>,
    x: i32,
    y: i32,
    z: i32,
    face: Face,
    empty: T,
) -> bool {
    let [dx, dy, dz] = face.offset();
    let (nx, ny, nz) = (x + dx, y + dy, z + dz);
    !volume.in_bounds(nx, ny, nz) || volume.get(nx, ny, nz) == empty
}

/// Corner positions of one face of a cell, in volume-local space.
#[must_use]
pub fn face_corners<T: Material>(volume: &Volume<T>, cell: CellCoord, face: Face) -> [Vec3; 4] {
    let center = volume.cell_center(cell.x, cell.y, cell.z);
    let spacing = volume.spacing();
    face.corner_indices()
        .map(|i| center + Vec3::from_array(CUBE_CORNERS[i]).mul_elem(spacing))
}

/// Appends the two triangles of one face and returns their range.
pub fn emit_face<T: Material>(
    volume: &Volume<T>,
    mesh: &mut TriangleMesh,
    cell: CellCoord,
    face: Face,
) -> TriangleRange {
    mesh.push_quad(face_corners(volume, cell, face))
}

/// Meshes the whole volume from scratch.
///
/// Cells equal to `empty` emit nothing; cells that are completely
/// enclosed keep an empty run record. Running this twice on an unchanged
/// volume produces identical output.
#[must_use]
pub fn mesh_full<T: Material>(volume: &Volume<T>, empty: T) -> MeshedVolume {
    let mut mesh = TriangleMesh::new();
    let mut runs = RunTable::with_cells(volume.len());
    let [nx, ny, nz] = volume.dims();
    let mut faces = 0usize;

    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                if volume.get(x, y, z) == empty {
                    continue;
                }

                let start = mesh.len();
                let cell = CellCoord::new(x, y, z);
                for face in Face::ALL {
                    if should_emit_face(volume, x, y, z, face, empty) {
                        emit_face(volume, &mut mesh, cell, face);
                        faces += 1;
                    }
                }

                if mesh.len() > start {
                    let primary = TriangleRange::new(start, mesh.len() - 1);
                    runs.set(volume.index(x, y, z), RunRecord::with_primary(Some(primary)));
                }
            }
        }
    }

    tracing::debug!(
        "Meshed volume {:?}: {} solid cells, {} faces, {} triangles",
        volume.dims(),
        volume.solid_count(),
        faces,
        mesh.len()
    );

    MeshedVolume { mesh, runs }
}
