//! Append-only triangle buffer.
//!
//! Triangles are never removed or reordered once pushed, so an index handed
//! out by [`TriangleMesh::push_quad`] stays valid for the life of the mesh.
//! Removing geometry means flipping a triangle's visibility bit.

use bytemuck::{Pod, Zeroable};
use voxcarve_shared::Vec3;

/// One triangle in volume-local space - 36 bytes, tightly packed for upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Triangle {
    /// Vertex positions, counter-clockwise seen from the front.
    pub positions: [[f32; 3]; 3],
}

impl Triangle {
    /// Creates a triangle from three points.
    #[inline]
    #[must_use]
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            positions: [a.to_array(), b.to_array(), c.to_array()],
        }
    }

    /// Un-normalized face normal (right-hand rule).
    #[must_use]
    pub fn normal(&self) -> Vec3 {
        let [a, b, c] = self.positions.map(Vec3::from_array);
        (b - a).cross(c - a)
    }

    /// Mean of the three vertices.
    #[must_use]
    pub fn centroid(&self) -> Vec3 {
        let [a, b, c] = self.positions.map(Vec3::from_array);
        (a + b + c) / 3.0
    }
}

/// Inclusive range of triangle indices `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriangleRange {
    start: usize,
    end: usize,
}

impl TriangleRange {
    /// Creates an inclusive range.
    ///
    /// # Panics
    /// Panics if `end < start`.
    #[inline]
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "inverted triangle range {start}..={end}");
        Self { start, end }
    }

    /// First triangle index.
    #[inline]
    #[must_use]
    pub const fn start(self) -> usize {
        self.start
    }

    /// Last triangle index (inclusive).
    #[inline]
    #[must_use]
    pub const fn end(self) -> usize {
        self.end
    }

    /// Number of triangles covered. Never zero.
    #[inline]
    #[must_use]
    pub const fn count(self) -> usize {
        self.end - self.start + 1
    }

    /// Returns true if `index` falls inside the range.
    #[inline]
    #[must_use]
    pub const fn contains(self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }

    /// Iterates the covered indices.
    #[inline]
    pub fn iter(self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Growth-only triangle list with a visibility bit per triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Triangle geometry.
    triangles: Vec<Triangle>,
    /// Parallel visibility mask.
    visible: Vec<bool>,
    /// Number of `true` entries in `visible`.
    visible_count: usize,
}

impl TriangleMesh {
    /// Creates an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty mesh with room for `triangles` entries.
    #[must_use]
    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(triangles),
            visible: Vec::with_capacity(triangles),
            visible_count: 0,
        }
    }

    /// Number of triangle slots ever pushed (visible or not).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Check if mesh has no triangle slots.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Number of triangles still visible.
    #[inline]
    #[must_use]
    pub const fn visible_count(&self) -> usize {
        self.visible_count
    }

    /// All triangle slots, blanked ones included.
    #[inline]
    #[must_use]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Triangle at `index`, if the slot exists.
    #[inline]
    #[must_use]
    pub fn triangle(&self, index: usize) -> Option<&Triangle> {
        self.triangles.get(index)
    }

    /// Visibility mask parallel to [`TriangleMesh::triangles`].
    #[inline]
    #[must_use]
    pub fn visibility(&self) -> &[bool] {
        &self.visible
    }

    /// True if the slot exists and has not been blanked.
    #[inline]
    #[must_use]
    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.get(index).copied().unwrap_or(false)
    }

    /// Raw triangle bytes for GPU upload.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }

    /// Byte span of a range inside [`TriangleMesh::as_bytes`], for partial
    /// buffer writes.
    #[must_use]
    pub fn byte_span(range: TriangleRange) -> std::ops::Range<usize> {
        let size = std::mem::size_of::<Triangle>();
        range.start() * size..(range.end() + 1) * size
    }

    /// Iterates `(index, triangle)` for visible triangles only.
    pub fn iter_visible(&self) -> impl Iterator<Item = (usize, &Triangle)> + '_ {
        self.triangles
            .iter()
            .enumerate()
            .filter(|(i, _)| self.visible[*i])
    }

    /// Appends one visible triangle and returns its index.
    pub fn push(&mut self, triangle: Triangle) -> usize {
        let index = self.triangles.len();
        self.triangles.push(triangle);
        self.visible.push(true);
        self.visible_count += 1;
        index
    }

    /// Appends a quad as triangles (0, 1, 2) and (3, 0, 2).
    pub fn push_quad(&mut self, corners: [Vec3; 4]) -> TriangleRange {
        let [a, b, c, d] = corners;
        let first = self.push(Triangle::new(a, b, c));
        let second = self.push(Triangle::new(d, a, c));
        TriangleRange::new(first, second)
    }

    /// Marks every triangle in `range` invisible. Returns how many were
    /// visible before the call.
    ///
    /// # Panics
    /// Panics if the range reaches past the end of the mesh.
    pub fn blank(&mut self, range: TriangleRange) -> usize {
        assert!(
            range.end() < self.triangles.len(),
            "range {range:?} past end of mesh ({} triangles)",
            self.triangles.len()
        );
        let mut blanked = 0;
        for flag in &mut self.visible[range.start()..=range.end()] {
            if *flag {
                *flag = false;
                blanked += 1;
            }
        }
        self.visible_count -= blanked;
        blanked
    }
}
