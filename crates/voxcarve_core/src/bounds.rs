//! Bounding-sphere octree and cross-volume overlap queries.
//!
//! The tree covers the occupied cells of one volume. Each node spans an
//! index box; boxes split at their midpoint on every axis and only octants
//! containing occupied cells become children. Leaves are single cells.
//!
//! Nodes live in one flat `Vec` and refer to their children by [`NodeId`].
//! The tree is built once after meshing and is not updated by removals;
//! rebuild it to pick up removed cells.
//!
//! ## Overlap query
//!
//! ```text
//!   (A, B) spheres apart?        → prune
//!   A internal                   → each child of A vs B
//!   A leaf, B internal           → A vs each child of B, stop at first hit
//!   A leaf, B leaf               → report A's cell
//! ```

use voxcarve_shared::Vec3;

use crate::error::{VoxError, VoxResult};
use crate::volume::{CellCoord, Material, Volume};

/// Bounding sphere in volume-local space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sphere {
    /// Center.
    pub center: Vec3,
    /// Radius.
    pub radius: f32,
}

impl Sphere {
    /// Creates a sphere.
    #[inline]
    #[must_use]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// True if the two spheres, each translated by its offset, touch or
    /// intersect.
    #[inline]
    #[must_use]
    pub fn overlaps(&self, offset: Vec3, other: &Self, other_offset: Vec3) -> bool {
        let reach = self.radius + other.radius;
        (self.center + offset).distance_squared(other.center + other_offset) <= reach * reach
    }

    /// True if `other` lies inside this sphere, allowing `tolerance` slack.
    #[inline]
    #[must_use]
    pub fn contains(&self, other: &Self, tolerance: f32) -> bool {
        self.center.distance(other.center) + other.radius <= self.radius + tolerance
    }
}

/// Inclusive box of cell indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellBox {
    /// Lowest corner.
    pub min: CellCoord,
    /// Highest corner (inclusive).
    pub max: CellCoord,
}

impl CellBox {
    /// Creates a box.
    #[must_use]
    pub const fn new(min: CellCoord, max: CellCoord) -> Self {
        Self { min, max }
    }

    /// The box covering every cell of a volume.
    #[must_use]
    pub fn of_volume<T: Material>(volume: &Volume<T>) -> Self {
        let [nx, ny, nz] = volume.dims();
        Self::new(CellCoord::new(0, 0, 0), CellCoord::new(nx - 1, ny - 1, nz - 1))
    }

    /// True if `min` exceeds `max` on any axis, so the box holds no cells.
    #[inline]
    #[must_use]
    pub const fn is_inverted(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// True if the box is exactly one cell.
    #[inline]
    #[must_use]
    pub fn is_single_cell(&self) -> bool {
        self.min == self.max
    }

    /// Splits the box at the midpoint of every axis. Axes one cell wide
    /// are not split, so this yields between 1 and 8 boxes, z outer,
    /// y middle, x inner.
    #[must_use]
    pub fn octants(&self) -> Vec<Self> {
        fn halves(lo: i32, hi: i32) -> Vec<(i32, i32)> {
            if lo == hi {
                vec![(lo, hi)]
            } else {
                let mid = lo + (hi - lo) / 2;
                vec![(lo, mid), (mid + 1, hi)]
            }
        }

        let xs = halves(self.min.x, self.max.x);
        let ys = halves(self.min.y, self.max.y);
        let zs = halves(self.min.z, self.max.z);

        let mut out = Vec::with_capacity(xs.len() * ys.len() * zs.len());
        for &(z0, z1) in &zs {
            for &(y0, y1) in &ys {
                for &(x0, x1) in &xs {
                    out.push(Self::new(CellCoord::new(x0, y0, z0), CellCoord::new(x1, y1, z1)));
                }
            }
        }
        out
    }
}

/// Index of a node inside its [`BoundingTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position in the node array.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node of the sphere tree.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingNode {
    /// Index box covered.
    pub bounds: CellBox,
    /// Sphere enclosing every occupied cell in the box.
    pub sphere: Sphere,
    /// Occupied cells under this node.
    pub voxel_count: u32,
    /// Retained children; empty for leaves.
    pub children: Vec<NodeId>,
}

impl BoundingNode {
    /// True for single-cell nodes.
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The cell a leaf stands for.
    #[inline]
    #[must_use]
    pub fn cell(&self) -> Option<CellCoord> {
        self.is_leaf().then_some(self.bounds.min)
    }
}

/// Sphere hierarchy over the occupied cells of one volume.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundingTree {
    /// Node arena; children are always stored before their parent.
    nodes: Vec<BoundingNode>,
    /// Root, or None if the volume had no occupied cells.
    root: Option<NodeId>,
}

impl BoundingTree {
    /// Builds the tree over the whole volume.
    ///
    /// # Errors
    ///
    /// [`VoxError::Unpopulated`] if nothing was ever written to the volume;
    /// a tree built then would describe placeholder content.
    pub fn build<T: Material>(volume: &Volume<T>, empty: T) -> VoxResult<Self> {
        Self::build_region(volume, CellBox::of_volume(volume), empty)
    }

    /// Builds the tree over the cells inside `bounds` only.
    ///
    /// # Errors
    ///
    /// - [`VoxError::Unpopulated`] as for [`BoundingTree::build`]
    /// - [`VoxError::OutOfBounds`] if either corner of `bounds` lies outside
    ///   the volume
    pub fn build_region<T: Material>(
        volume: &Volume<T>,
        bounds: CellBox,
        empty: T,
    ) -> VoxResult<Self> {
        if !volume.is_populated() {
            return Err(VoxError::Unpopulated);
        }
        for corner in [bounds.min, bounds.max] {
            if !volume.in_bounds(corner.x, corner.y, corner.z) {
                return Err(volume.out_of_bounds(corner));
            }
        }

        let mut tree = Self::default();
        if !bounds.is_inverted() {
            tree.root = tree.build_node(volume, bounds, empty);
        }

        tracing::debug!(
            "Built bounding tree for {:?}: {} nodes, {} voxels",
            volume.dims(),
            tree.nodes.len(),
            tree.voxel_count()
        );
        Ok(tree)
    }

    /// Builds the subtree for `bounds`. Returns None (and stores nothing)
    /// if the box holds no occupied cell.
    fn build_node<T: Material>(
        &mut self,
        volume: &Volume<T>,
        bounds: CellBox,
        empty: T,
    ) -> Option<NodeId> {
        if bounds.is_single_cell() {
            let cell = bounds.min;
            if volume.get(cell.x, cell.y, cell.z) == empty {
                return None;
            }
            let sphere = Sphere::new(
                volume.cell_center(cell.x, cell.y, cell.z),
                volume.voxel_radius(),
            );
            return Some(self.push(BoundingNode {
                bounds,
                sphere,
                voxel_count: 1,
                children: Vec::new(),
            }));
        }

        let children: Vec<NodeId> = bounds
            .octants()
            .into_iter()
            .filter_map(|octant| self.build_node(volume, octant, empty))
            .collect();
        if children.is_empty() {
            return None;
        }

        // Plain mean of child centers, not weighted by voxel count.
        let mut center = Vec3::ZERO;
        for &child in &children {
            center += self.nodes[child.index()].sphere.center;
        }
        center = center / children.len() as f32;

        let mut radius = 0.0f32;
        let mut voxel_count = 0u32;
        for &child in &children {
            let node = &self.nodes[child.index()];
            radius = radius.max(center.distance(node.sphere.center) + node.sphere.radius);
            voxel_count += node.voxel_count;
        }

        Some(self.push(BoundingNode {
            bounds,
            sphere: Sphere::new(center, radius),
            voxel_count,
            children,
        }))
    }

    fn push(&mut self, node: BoundingNode) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(node);
        id
    }

    /// Root node id.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Node by id.
    ///
    /// # Panics
    /// Panics if the id came from a different tree.
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &BoundingNode {
        &self.nodes[id.index()]
    }

    /// All nodes, children before parents.
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[BoundingNode] {
        &self.nodes
    }

    /// Number of nodes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the volume had no occupied cells.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Occupied cells covered by the tree.
    #[must_use]
    pub fn voxel_count(&self) -> u32 {
        self.root.map_or(0, |id| self.node(id).voxel_count)
    }

    /// Iterates every leaf.
    pub fn leaves(&self) -> impl Iterator<Item = &BoundingNode> + '_ {
        self.nodes.iter().filter(|n| n.is_leaf())
    }
}

/// Finds cells of `a` whose leaf spheres touch a leaf sphere of `b`, with
/// each tree placed at its world offset.
///
/// Each leaf of `a` is reported at most once: as soon as it hits one leaf
/// of `b`, the rest of `b` is not searched for it. Use
/// [`find_overlap_pairs`] for every colliding pair.
#[must_use]
pub fn find_overlaps(
    a: &BoundingTree,
    offset_a: Vec3,
    b: &BoundingTree,
    offset_b: Vec3,
) -> Vec<CellCoord> {
    let mut hits = Vec::new();
    if let (Some(ra), Some(rb)) = (a.root(), b.root()) {
        overlap_first(a, ra, offset_a, b, rb, offset_b, &mut hits);
    }
    hits
}

/// Returns true once a leaf of `a` has been reported under this pair.
fn overlap_first(
    a: &BoundingTree,
    na: NodeId,
    offset_a: Vec3,
    b: &BoundingTree,
    nb: NodeId,
    offset_b: Vec3,
    hits: &mut Vec<CellCoord>,
) -> bool {
    let node_a = a.node(na);
    let node_b = b.node(nb);
    if !node_a.sphere.overlaps(offset_a, &node_b.sphere, offset_b) {
        return false;
    }

    if !node_a.is_leaf() {
        for &child in &node_a.children {
            overlap_first(a, child, offset_a, b, nb, offset_b, hits);
        }
        return false;
    }

    if node_b.is_leaf() {
        hits.push(node_a.bounds.min);
        return true;
    }

    node_b
        .children
        .iter()
        .any(|&child| overlap_first(a, na, offset_a, b, child, offset_b, hits))
}

/// Every pair of touching leaves, as (cell of `a`, cell of `b`).
#[must_use]
pub fn find_overlap_pairs(
    a: &BoundingTree,
    offset_a: Vec3,
    b: &BoundingTree,
    offset_b: Vec3,
) -> Vec<(CellCoord, CellCoord)> {
    let mut pairs = Vec::new();
    let Some(ra) = a.root() else { return pairs };
    let Some(rb) = b.root() else { return pairs };

    let mut stack = vec![(ra, rb)];
    while let Some((na, nb)) = stack.pop() {
        let node_a = a.node(na);
        let node_b = b.node(nb);
        if !node_a.sphere.overlaps(offset_a, &node_b.sphere, offset_b) {
            continue;
        }
        match (node_a.is_leaf(), node_b.is_leaf()) {
            (true, true) => pairs.push((node_a.bounds.min, node_b.bounds.min)),
            (true, false) => stack.extend(node_b.children.iter().map(|&c| (na, c))),
            _ => stack.extend(node_a.children.iter().map(|&c| (c, nb))),
        }
    }
    pairs.sort_unstable();
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume_with(dims: [u32; 3], cells: &[(i32, i32, i32)]) -> Volume<u8> {
        let mut v = Volume::new(dims, Vec3::ONE, 0).unwrap();
        for &(x, y, z) in cells {
            v.set(x, y, z, 1);
        }
        v
    }

    #[test]
    fn test_octants_split_at_midpoint() {
        let b = CellBox::new(CellCoord::new(0, 0, 0), CellCoord::new(3, 0, 4));
        let octants = b.octants();
        assert_eq!(octants.len(), 4);
        assert_eq!(octants[0], CellBox::new(CellCoord::new(0, 0, 0), CellCoord::new(1, 0, 2)));
        assert_eq!(octants[3], CellBox::new(CellCoord::new(2, 0, 3), CellCoord::new(3, 0, 4)));
    }

    #[test]
    fn test_empty_volume_has_no_root() {
        let mut v: Volume<u8> = Volume::new([4, 4, 4], Vec3::ONE, 0).unwrap();
        v.fill(|_, _, _, _| 0);
        let tree = BoundingTree::build(&v, 0).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn test_build_before_content_fails() {
        let v: Volume<u8> = Volume::new([2, 2, 2], Vec3::ONE, 0).unwrap();
        assert_eq!(BoundingTree::build(&v, 0), Err(VoxError::Unpopulated));
    }

    #[test]
    fn test_unweighted_center() {
        // One cell on the left, three on the right: the mean of the two
        // octant centers, not of the four cells.
        let v = volume_with([4, 1, 1], &[(0, 0, 0), (2, 0, 0), (3, 0, 0)]);
        let tree = BoundingTree::build(&v, 0).unwrap();
        let root = tree.node(tree.root().unwrap());
        assert_eq!(root.voxel_count, 3);
        assert_eq!(root.children.len(), 2);
        // Left octant center 0.0, right octant center 2.5
        assert!((root.sphere.center.x - 1.25).abs() < 1e-6);
    }

    #[test]
    fn test_pruned_octants_not_stored() {
        let v = volume_with([8, 8, 8], &[(7, 7, 7)]);
        let tree = BoundingTree::build(&v, 0).unwrap();
        // One chain from root to the single leaf: boxes 8 -> 4 -> 2 -> 1
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.leaves().count(), 1);
        assert_eq!(tree.leaves().next().unwrap().cell(), Some(CellCoord::new(7, 7, 7)));
    }

    #[test]
    fn test_region_covers_only_its_box() {
        let v = volume_with([4, 4, 4], &[(0, 0, 0), (3, 3, 3), (1, 1, 1)]);
        let region = CellBox::new(CellCoord::new(0, 0, 0), CellCoord::new(1, 1, 1));
        let tree = BoundingTree::build_region(&v, region, 0).unwrap();
        assert_eq!(tree.voxel_count(), 2);

        let inverted = CellBox::new(CellCoord::new(2, 0, 0), CellCoord::new(1, 0, 0));
        assert!(BoundingTree::build_region(&v, inverted, 0).unwrap().is_empty());

        let outside = CellBox::new(CellCoord::new(0, 0, 0), CellCoord::new(4, 0, 0));
        assert!(matches!(
            BoundingTree::build_region(&v, outside, 0),
            Err(VoxError::OutOfBounds { x: 4, .. })
        ));
    }

    #[test]
    fn test_first_hit_reports_each_cell_once() {
        let a = volume_with([1, 1, 1], &[(0, 0, 0)]);
        let b = volume_with([2, 1, 1], &[(0, 0, 0), (1, 0, 0)]);
        let ta = BoundingTree::build(&a, 0).unwrap();
        let tb = BoundingTree::build(&b, 0).unwrap();

        // A's only cell sits between both of B's cells
        let offset_a = Vec3::new(0.5, 0.0, 0.0);
        let hits = find_overlaps(&ta, offset_a, &tb, Vec3::ZERO);
        assert_eq!(hits, vec![CellCoord::new(0, 0, 0)]);

        let pairs = find_overlap_pairs(&ta, offset_a, &tb, Vec3::ZERO);
        assert_eq!(pairs.len(), 2);
    }
}
