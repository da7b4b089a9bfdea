//! Fill generators.
//!
//! Each function returns a closure for [`Volume::fill`]. Shapes are
//! described in cell coordinates, so `sphere(Vec3::splat(8.0), 6.0, ..)`
//! means the same cells whatever the volume spacing.
//!
//! Calling a constructor twice with the same arguments gives generators
//! that fill identical volumes.

use rand::Rng;
use voxcarve_core::{Material, Volume};
use voxcarve_shared::Vec3;

use crate::noise::{NoiseSeed, SimplexNoise};

/// Octaves summed by [`heightfield`].
pub const HEIGHTFIELD_OCTAVES: u32 = 4;

#[inline]
fn cell_position(x: i32, y: i32, z: i32) -> Vec3 {
    Vec3::new(x as f32, y as f32, z as f32)
}

/// Every cell set to `material`.
pub fn solid<T: Material>(material: T) -> impl FnMut(i32, i32, i32, &Volume<T>) -> T {
    move |_, _, _, _: &Volume<T>| material
}

/// Cells whose centers are within `radius` of `center`.
pub fn sphere<T: Material>(
    center: Vec3,
    radius: f32,
    material: T,
) -> impl FnMut(i32, i32, i32, &Volume<T>) -> T {
    let r2 = radius * radius;
    move |x, y, z, volume: &Volume<T>| {
        if cell_position(x, y, z).distance_squared(center) <= r2 {
            material
        } else {
            volume.empty()
        }
    }
}

/// Cells whose centers lie between `inner` and `outer` from `center`.
/// The inside of the shell stays empty.
pub fn shell<T: Material>(
    center: Vec3,
    inner: f32,
    outer: f32,
    material: T,
) -> impl FnMut(i32, i32, i32, &Volume<T>) -> T {
    let (lo, hi) = (inner * inner, outer * outer);
    move |x, y, z, volume: &Volume<T>| {
        let d2 = cell_position(x, y, z).distance_squared(center);
        if d2 >= lo && d2 <= hi {
            material
        } else {
            volume.empty()
        }
    }
}

/// Terrain: a column is filled up to `base + amplitude * noise(x, z)`.
///
/// `scale` is the noise frequency in cycles per cell.
pub fn heightfield<T: Material>(
    seed: NoiseSeed,
    scale: f32,
    base: f32,
    amplitude: f32,
    material: T,
) -> impl FnMut(i32, i32, i32, &Volume<T>) -> T {
    let noise = SimplexNoise::new(seed);
    tracing::debug!(
        "Heightfield generator: seed {}, scale {}, height {} +/- {}",
        seed.value(),
        scale,
        base,
        amplitude
    );
    move |x, y, z, volume: &Volume<T>| {
        let height = base
            + amplitude * noise.fractal(x as f32 * scale, z as f32 * scale, HEIGHTFIELD_OCTAVES);
        if (y as f32) <= height {
            material
        } else {
            volume.empty()
        }
    }
}

/// Each cell is independently `material` with probability `density`.
///
/// Draws one number per cell in fill order, so the result depends on the
/// volume's dimensions as well as the seed.
pub fn scatter<T: Material>(
    seed: NoiseSeed,
    density: f64,
    material: T,
) -> impl FnMut(i32, i32, i32, &Volume<T>) -> T {
    let mut rng = seed.rng();
    let density = density.clamp(0.0, 1.0);
    move |_, _, _, volume: &Volume<T>| {
        if rng.gen::<f64>() < density {
            material
        } else {
            volume.empty()
        }
    }
}

/// Wraps a generator so nothing floats: a cell keeps its value only if it
/// is on the bottom layer or the cell below it is occupied.
///
/// Relies on fill order visiting (x, y - 1, z) before (x, y, z).
pub fn grounded<T, F>(mut inner: F) -> impl FnMut(i32, i32, i32, &Volume<T>) -> T
where
    T: Material,
    F: FnMut(i32, i32, i32, &Volume<T>) -> T,
{
    move |x, y, z, volume: &Volume<T>| {
        let value = inner(x, y, z, volume);
        if y == 0 || !volume.is_empty_at(x, y - 1, z) {
            value
        } else {
            volume.empty()
        }
    }
}
