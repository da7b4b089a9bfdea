//! # Carving Integration Tests
//!
//! End-to-end checks of meshing, removal, and overlap queries through the
//! public API.

use voxcarve_core::{
    find_overlaps, mesh_full, BoundingTree, CellCoord, Face, Volume, VolumeConfig, VoxelModel,
};
use voxcarve_shared::Vec3;

fn solid_model(n: u32) -> VoxelModel<u8> {
    let mut model = VoxelModel::new(&VolumeConfig::cube(n), 0).unwrap();
    model.fill(|_, _, _, _| 1);
    model.rebuild().unwrap();
    model
}

fn single_cell_tree() -> (Volume<u8>, BoundingTree) {
    let mut volume = Volume::new([1, 1, 1], Vec3::ONE, 0).unwrap();
    volume.set(0, 0, 0, 7);
    let tree = BoundingTree::build(&volume, 0).unwrap();
    (volume, tree)
}

/// Test: A lone cell draws all six faces.
#[test]
fn test_single_cell_boundary() {
    let model = solid_model(1);
    assert_eq!(model.mesh().len(), 12);
    assert_eq!(model.mesh().visible_count(), 12);
}

/// Test: Only the outer shell of a solid block is meshed.
#[test]
fn test_enclosed_cells_emit_nothing() {
    let model = solid_model(4);
    let volume = model.volume();
    for z in 1..3 {
        for y in 1..3 {
            for x in 1..3 {
                let record = model.runs().get(volume.index(x, y, z)).unwrap();
                assert!(record.is_empty(), "interior cell ({x}, {y}, {z}) has triangles");
            }
        }
    }
    // 6 sides of 4x4 faces, 2 triangles each
    assert_eq!(model.mesh().len(), 6 * 16 * 2);
}

/// Test: Interior removal exposes exactly the six neighbor faces.
#[test]
fn test_interior_removal_bookkeeping() {
    let mut model = solid_model(5);
    let before = model.mesh().len();

    let report = model.remove_voxel(2, 2, 2).unwrap();
    assert_eq!(report.appended_count(), 12);
    assert_eq!(model.mesh().len(), before + 12);

    // Removing a neighbor next: five new faces, one of its own blanked
    let report = model.remove_voxel(2, 3, 2).unwrap();
    assert_eq!(report.blanked_count(), 2);
    assert_eq!(report.appended_count(), 10);
    for range in &report.blanked {
        for i in range.iter() {
            assert!(!model.mesh().is_visible(i));
        }
    }
}

/// Test: Removal at the surface only appends faces for newly exposed
/// neighbors.
#[test]
fn test_surface_removal_skips_exposed_neighbors() {
    let mut model = solid_model(3);
    // Corner cell: neighbors at (0, 1, 0), (1, 0, 0) and (0, 0, 1)
    let report = model.remove_voxel(0, 0, 0).unwrap();
    assert_eq!(report.blanked_count(), 6);
    assert_eq!(report.exposed.len(), 3);
    assert!(report
        .exposed
        .iter()
        .all(|&(cell, face)| model.volume().get(cell.x, cell.y, cell.z) == 1
            && matches!(face, Face::Bottom | Face::Left | Face::Front)));
}

/// Test: Second removal of the same cell changes nothing.
#[test]
fn test_double_removal_idempotent() {
    let mut model = solid_model(3);
    model.remove_voxel(1, 2, 1).unwrap();
    let stats = model.stats();

    let again = model.remove_voxel(1, 2, 1).unwrap();
    assert!(again.is_noop());
    assert_eq!(model.stats(), stats);
}

/// Test: Removal never moves existing triangles.
#[test]
fn test_removal_preserves_existing_triangles() {
    let mut model = solid_model(4);
    let snapshot = model.mesh().triangles().to_vec();

    model.remove_voxel(1, 1, 1).unwrap();
    model.remove_voxel(0, 1, 1).unwrap();
    assert_eq!(&model.mesh().triangles()[..snapshot.len()], &snapshot[..]);
}

/// Test: One leaf per occupied cell, and every node contains its children.
#[test]
fn test_tree_containment() {
    let mut volume: Volume<u8> = Volume::new([7, 5, 6], Vec3::new(1.0, 0.5, 2.0), 0).unwrap();
    volume.fill(|x, y, z, _| u8::from((x * 3 + y * 5 + z * 7) % 4 != 0));
    let tree = BoundingTree::build(&volume, 0).unwrap();

    assert_eq!(tree.leaves().count(), volume.solid_count());
    assert_eq!(tree.voxel_count() as usize, volume.solid_count());

    for node in tree.nodes() {
        for &child in &node.children {
            let child = tree.node(child);
            assert!(node.sphere.contains(&child.sphere, 1e-4));
        }
    }
}

/// Test: Two single cells overlap at 1.5 radii apart and not at 2.5.
#[test]
fn test_cross_volume_overlap_distance() {
    let (volume, a) = single_cell_tree();
    let (_, b) = single_cell_tree();
    let r = volume.voxel_radius();

    let near = find_overlaps(&a, Vec3::ZERO, &b, Vec3::new(1.5 * r, 0.0, 0.0));
    assert_eq!(near, vec![CellCoord::new(0, 0, 0)]);

    let far = find_overlaps(&a, Vec3::ZERO, &b, Vec3::new(2.5 * r, 0.0, 0.0));
    assert!(far.is_empty());
}

/// Test: Meshing an unchanged volume twice is identical.
#[test]
fn test_mesh_determinism() {
    let mut volume: Volume<u16> = Volume::new([6, 6, 6], Vec3::ONE, 0).unwrap();
    volume.fill(|x, y, z, _| if x + y > z { 3 } else { 0 });

    let first = mesh_full(&volume, 0);
    let second = mesh_full(&volume, 0);
    assert_eq!(first, second);
}

/// Test: Every triangle faces away from the cell that emitted it.
#[test]
fn test_outward_winding() {
    let model = solid_model(2);
    let volume = model.volume();
    for (index, record) in model.runs().records().iter().enumerate() {
        let cell = volume.coord_of(index);
        let center = volume.cell_center(cell.x, cell.y, cell.z);
        for range in record.ranges() {
            for i in range.iter() {
                let tri = model.mesh().triangle(i).unwrap();
                let outward = tri.centroid() - center;
                assert!(tri.normal().dot(outward) > 0.0);
            }
        }
    }
}

/// Test: Config round trip from TOML through to a meshed model.
#[test]
fn test_model_from_toml() {
    let config = VolumeConfig::from_toml_str(
        r"
        dimensions = [2, 3, 4]
        spacing = [0.5, 0.5, 0.5]
        offset = [10.0, 0.0, 0.0]
        ",
    )
    .unwrap();
    let mut model = VoxelModel::new(&config, 0u8).unwrap();
    model.fill(|_, _, _, _| 1);
    model.rebuild().unwrap();

    assert_eq!(model.volume().dims(), [2, 3, 4]);
    assert_eq!(model.offset(), Vec3::new(10.0, 0.0, 0.0));
    assert_eq!(model.stats().solid_cells, 24);
    assert_eq!(
        model.world_center(CellCoord::new(1, 0, 0)),
        Vec3::new(10.5, 0.0, 0.0)
    );
}
