//! # VOXCARVE Shared
//!
//! Math types shared by every VOXCARVE crate.
//!
//! All positions are in a right-handed, Y-up space. Volumes only ever
//! translate relative to each other, so there is no rotation type here.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod math;

pub use math::Vec3;
