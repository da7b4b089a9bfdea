//! Cube faces and corner layout.
//!
//! The unit cube's corners are centered on the origin. Corners 0-3 form
//! the bottom ring, counter-clockwise seen from above; corners 4-7 are the
//! same ring lifted to the top:
//!
//! ```text
//!        7-------6           +y
//!       /|      /|            |
//!      4-------5 |            +-- +x
//!      | 3-----|-2           /
//!      |/      |/          +z
//!      0-------1
//! ```

/// Corner offsets of a unit cube centered on the origin.
pub const CUBE_CORNERS: [[f32; 3]; 8] = [
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
    [0.5, -0.5, 0.5],
    [-0.5, -0.5, 0.5],
    [-0.5, 0.5, -0.5],
    [0.5, 0.5, -0.5],
    [0.5, 0.5, 0.5],
    [-0.5, 0.5, 0.5],
];

/// One of the six axis-aligned sides of a cell.
///
/// Discriminants follow the canonical emission order used by the mesher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Face {
    /// -Y
    Bottom = 0,
    /// +Y
    Top = 1,
    /// -X
    Left = 2,
    /// +Z
    Back = 3,
    /// +X
    Right = 4,
    /// -Z
    Front = 5,
}

impl Face {
    /// All faces in emission order.
    pub const ALL: [Self; 6] = [
        Self::Bottom,
        Self::Top,
        Self::Left,
        Self::Back,
        Self::Right,
        Self::Front,
    ];

    /// Cell offset to the neighbor sharing this face.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> [i32; 3] {
        match self {
            Self::Bottom => [0, -1, 0],
            Self::Top => [0, 1, 0],
            Self::Left => [-1, 0, 0],
            Self::Back => [0, 0, 1],
            Self::Right => [1, 0, 0],
            Self::Front => [0, 0, -1],
        }
    }

    /// The face on the neighbor that touches this one.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Bottom => Self::Top,
            Self::Top => Self::Bottom,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Back => Self::Front,
            Self::Front => Self::Back,
        }
    }

    /// Position in [`Face::ALL`].
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Position of a side face's bottom edge on the bottom ring.
    const fn ring_slot(self) -> usize {
        match self {
            Self::Front => 0,
            Self::Right => 1,
            Self::Back => 2,
            // Bottom/Top never reach here
            _ => 3,
        }
    }

    /// The four cube corners of this face, ordered so that triangles
    /// (0, 1, 2) and (3, 0, 2) are counter-clockwise seen from outside.
    #[must_use]
    pub const fn corner_indices(self) -> [usize; 4] {
        match self {
            Self::Bottom => [0, 1, 2, 3],
            // Same ring one level up, walked the other way round.
            Self::Top => [7, 6, 5, 4],
            _ => {
                let i = self.ring_slot();
                let j = (i + 1) % 4;
                [j, i, i + 4, j + 4]
            }
        }
    }
}
