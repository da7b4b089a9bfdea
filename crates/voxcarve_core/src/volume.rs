//! Dense voxel volume.
//!
//! Cells are stored in one contiguous array, x fastest and z slowest:
//! `index = x + y * nx + z * ny * nx`. Every cell starts out holding the
//! volume's empty sentinel.

use voxcarve_shared::Vec3;

use crate::config::VolumeConfig;
use crate::error::{VoxError, VoxResult};

/// Scale applied to the circumscribed cube radius to get the leaf sphere
/// radius. Deliberately smaller than the exact bound.
pub const VOXEL_RADIUS_FUDGE: f32 = 0.75;

/// Material values a volume can store.
///
/// Occlusion only ever compares a value against the empty sentinel, so
/// equality is all that is needed.
pub trait Material: Copy + PartialEq + std::fmt::Debug {}

impl<T: Copy + PartialEq + std::fmt::Debug> Material for T {}

/// Integer cell address inside a volume.
///
/// Signed so that neighbor lookups one step outside the grid can be
/// represented and rejected by [`Volume::in_bounds`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns this coordinate moved by `delta`.
    #[inline]
    #[must_use]
    pub const fn offset(self, delta: [i32; 3]) -> Self {
        Self::new(self.x + delta[0], self.y + delta[1], self.z + delta[2])
    }

    /// Converts to array.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[i32; 3]> for CellCoord {
    fn from(arr: [i32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }
}

/// A fixed-size dense grid of material values.
#[derive(Debug, Clone)]
pub struct Volume<T> {
    /// Cell counts along x, y, z.
    dims: [i32; 3],
    /// World-space cell size.
    spacing: Vec3,
    /// Value meaning "no material here".
    empty: T,
    /// Leaf bounding-sphere radius, fixed at construction.
    voxel_radius: f32,
    /// Cell storage.
    cells: Vec<T>,
    /// Number of cells not equal to `empty`.
    solid_count: usize,
    /// Set once any content has been written.
    populated: bool,
}

impl<T: Material> Volume<T> {
    /// Creates a volume with every cell set to `empty`.
    ///
    /// # Errors
    ///
    /// Fails on zero or oversized dimensions and on non-positive spacing.
    pub fn new(dimensions: [u32; 3], spacing: Vec3, empty: T) -> VoxResult<Self> {
        let config = VolumeConfig {
            dimensions,
            spacing: spacing.to_array(),
            offset: [0.0; 3],
        };
        Self::from_config(&config, empty)
    }

    /// Creates a volume from a validated config. The config offset is not
    /// part of the volume; models carry it.
    ///
    /// # Errors
    ///
    /// Same as [`VolumeConfig::validate`].
    pub fn from_config(config: &VolumeConfig, empty: T) -> VoxResult<Self> {
        config.validate()?;

        let mut dims = [0i32; 3];
        for (dst, &src) in dims.iter_mut().zip(&config.dimensions) {
            // validate() guarantees the conversion
            *dst = i32::try_from(src).unwrap_or(i32::MAX);
        }
        let spacing = config.spacing_vec();
        let voxel_radius = 3.0f32.sqrt() * (spacing.max_element() / 2.0) * VOXEL_RADIUS_FUDGE;

        Ok(Self {
            dims,
            spacing,
            empty,
            voxel_radius,
            cells: vec![empty; config.cell_count()],
            solid_count: 0,
            populated: false,
        })
    }

    /// Cell counts along x, y, z.
    #[inline]
    #[must_use]
    pub const fn dims(&self) -> [i32; 3] {
        self.dims
    }

    /// World-space cell size.
    #[inline]
    #[must_use]
    pub const fn spacing(&self) -> Vec3 {
        self.spacing
    }

    /// The empty sentinel.
    #[inline]
    #[must_use]
    pub const fn empty(&self) -> T {
        self.empty
    }

    /// Radius used for single-cell bounding spheres.
    #[inline]
    #[must_use]
    pub const fn voxel_radius(&self) -> f32 {
        self.voxel_radius
    }

    /// Total number of cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: construction rejects zero dimensions.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells holding something other than the empty sentinel.
    #[inline]
    #[must_use]
    pub const fn solid_count(&self) -> usize {
        self.solid_count
    }

    /// True once `fill` or any `set` has run.
    #[inline]
    #[must_use]
    pub const fn is_populated(&self) -> bool {
        self.populated
    }

    /// Raw cell storage in linear index order.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Returns true if the coordinate addresses a cell of this volume.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0 && y >= 0 && z >= 0 && x < self.dims[0] && y < self.dims[1] && z < self.dims[2]
    }

    /// Linear index of an in-bounds cell.
    ///
    /// # Panics
    /// Panics if the coordinate is out of bounds.
    #[inline]
    #[must_use]
    pub fn index(&self, x: i32, y: i32, z: i32) -> usize {
        assert!(
            self.in_bounds(x, y, z),
            "cell ({x}, {y}, {z}) outside volume {:?}",
            self.dims
        );
        let (nx, ny) = (self.dims[0] as usize, self.dims[1] as usize);
        x as usize + y as usize * nx + z as usize * ny * nx
    }

    /// Inverse of [`Volume::index`].
    #[inline]
    #[must_use]
    pub fn coord_of(&self, index: usize) -> CellCoord {
        let (nx, ny) = (self.dims[0] as usize, self.dims[1] as usize);
        let x = index % nx;
        let y = (index / nx) % ny;
        let z = index / (nx * ny);
        CellCoord::new(x as i32, y as i32, z as i32)
    }

    /// Gets the value of a cell.
    ///
    /// # Panics
    /// Panics if the coordinate is out of bounds; check [`Volume::in_bounds`]
    /// first or use [`Volume::try_get`].
    #[inline]
    #[must_use]
    pub fn get(&self, x: i32, y: i32, z: i32) -> T {
        self.cells[self.index(x, y, z)]
    }

    /// Gets the value of a cell, or None if out of bounds.
    #[inline]
    #[must_use]
    pub fn try_get(&self, x: i32, y: i32, z: i32) -> Option<T> {
        self.in_bounds(x, y, z)
            .then(|| self.cells[self.index(x, y, z)])
    }

    /// True if the cell holds the empty sentinel. Panics out of bounds.
    #[inline]
    #[must_use]
    pub fn is_empty_at(&self, x: i32, y: i32, z: i32) -> bool {
        self.get(x, y, z) == self.empty
    }

    /// Sets the value of a cell.
    ///
    /// # Panics
    /// Panics if the coordinate is out of bounds.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, value: T) {
        let idx = self.index(x, y, z);
        self.write(idx, value);
    }

    /// Sets the value of a cell, reporting out-of-bounds as an error.
    ///
    /// # Errors
    /// [`VoxError::OutOfBounds`] if the coordinate is outside the volume.
    pub fn checked_set(&mut self, x: i32, y: i32, z: i32, value: T) -> VoxResult<()> {
        if !self.in_bounds(x, y, z) {
            return Err(self.out_of_bounds(CellCoord::new(x, y, z)));
        }
        self.set(x, y, z, value);
        Ok(())
    }

    /// Runs `generator` once per cell, z outer, y middle, x inner.
    ///
    /// The generator sees the volume as it is at that moment: cells already
    /// visited this pass hold their new values, later cells hold whatever
    /// they held before.
    pub fn fill<F>(&mut self, mut generator: F)
    where
        F: FnMut(i32, i32, i32, &Self) -> T,
    {
        let [nx, ny, nz] = self.dims;
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    let value = generator(x, y, z, self);
                    let idx = self.index(x, y, z);
                    self.write(idx, value);
                }
            }
        }
        self.populated = true;
        tracing::debug!(
            "Filled volume {:?}: {} of {} cells solid",
            self.dims,
            self.solid_count,
            self.cells.len()
        );
    }

    /// World-space center of a cell, relative to the volume origin.
    #[inline]
    #[must_use]
    pub fn cell_center(&self, x: i32, y: i32, z: i32) -> Vec3 {
        Vec3::new(x as f32, y as f32, z as f32).mul_elem(self.spacing)
    }

    /// Builds the out-of-bounds error for a coordinate.
    #[must_use]
    pub fn out_of_bounds(&self, cell: CellCoord) -> VoxError {
        VoxError::OutOfBounds {
            x: cell.x,
            y: cell.y,
            z: cell.z,
            dims: self.dims,
        }
    }

    /// Stores a value and keeps the solid count current.
    #[inline]
    fn write(&mut self, idx: usize, value: T) {
        let old = self.cells[idx];
        let was_solid = old != self.empty;
        let is_solid = value != self.empty;
        if was_solid && !is_solid {
            self.solid_count -= 1;
        } else if !was_solid && is_solid {
            self.solid_count += 1;
        }
        self.cells[idx] = value;
        self.populated = true;
    }
}
