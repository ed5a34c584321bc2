//! Cuboid geometry for a single extruded pixel.
//!
//! ```text
//!        7--------6
//!       /|       /|        +Y
//!      4--------5 |        |
//!      | 3------|-2        o--- +X
//!      |/       |/        /
//!      0--------1       +Z
//! ```
//!
//! Corners `0..4` form the bottom quad at `y`, corners `4..8` the top quad at
//! `y + size`. Even corners of each quad sit on the `+Z` side, following the
//! pattern `(x, +e) (x + s, +e) (x + s, -e) (x, -e)`.
//!
//! Faces never share vertices, so every cuboid expands to 24 vertices and
//! each face carries its own flat normal.

/// Vertices emitted per cuboid (6 faces x 4 corners).
pub const CUBOID_VERTEX_COUNT: usize = 24;

/// Triangle indices emitted per cuboid (6 faces x 2 triangles x 3 indices).
pub const CUBOID_INDEX_COUNT: usize = 36;

/// The six faces of a cuboid, in emission order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CuboidFace {
    Bottom,
    Left,
    Front,
    Back,
    Right,
    Top,
}

impl CuboidFace {
    /// All faces in the order their vertices are emitted.
    pub const ALL: [CuboidFace; 6] = [
        CuboidFace::Bottom,
        CuboidFace::Left,
        CuboidFace::Front,
        CuboidFace::Back,
        CuboidFace::Right,
        CuboidFace::Top,
    ];

    /// Indices into [`Cuboid::corners`] for this face's four vertices.
    pub const fn corners(self) -> [usize; 4] {
        match self {
            CuboidFace::Bottom => [0, 1, 2, 3],
            CuboidFace::Left => [7, 4, 0, 3],
            CuboidFace::Front => [4, 5, 1, 0],
            CuboidFace::Back => [6, 7, 3, 2],
            CuboidFace::Right => [5, 6, 2, 1],
            CuboidFace::Top => [7, 6, 5, 4],
        }
    }

    /// Axis-aligned outward unit normal.
    pub const fn normal(self) -> [f32; 3] {
        match self {
            CuboidFace::Bottom => [0.0, -1.0, 0.0],
            CuboidFace::Left => [-1.0, 0.0, 0.0],
            CuboidFace::Front => [0.0, 0.0, 1.0],
            CuboidFace::Back => [0.0, 0.0, -1.0],
            CuboidFace::Right => [1.0, 0.0, 0.0],
            CuboidFace::Top => [0.0, 1.0, 0.0],
        }
    }

    /// Two triangles over this face's four vertices, relative to the face's
    /// first vertex.
    pub const fn triangles() -> [u32; 6] {
        [3, 1, 0, 3, 2, 1]
    }
}

/// One extruded pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cuboid {
    pub corners: [[f32; 3]; 8],
}

impl Cuboid {
    /// Builds the cuboid whose bottom-left corner sits at `(x, y)`, `size`
    /// wide and tall, spanning `[-depth, +depth]` on Z.
    pub fn new(x: f32, y: f32, size: f32, depth: f32) -> Self {
        let (x1, y1) = (x + size, y + size);
        Self {
            corners: [
                [x, y, depth],
                [x1, y, depth],
                [x1, y, -depth],
                [x, y, -depth],
                [x, y1, depth],
                [x1, y1, depth],
                [x1, y1, -depth],
                [x, y1, -depth],
            ],
        }
    }

    /// Expands the corners into 24 face vertices in [`CuboidFace::ALL`] order.
    pub fn positions(&self) -> [[f32; 3]; CUBOID_VERTEX_COUNT] {
        let mut positions = [[0.0; 3]; CUBOID_VERTEX_COUNT];
        for (f, face) in CuboidFace::ALL.iter().enumerate() {
            for (i, corner) in face.corners().iter().enumerate() {
                positions[f * 4 + i] = self.corners[*corner];
            }
        }
        positions
    }

    /// Per-vertex normals matching [`positions`](Self::positions).
    pub fn normals() -> [[f32; 3]; CUBOID_VERTEX_COUNT] {
        let mut normals = [[0.0; 3]; CUBOID_VERTEX_COUNT];
        for (f, face) in CuboidFace::ALL.iter().enumerate() {
            normals[f * 4..f * 4 + 4].fill(face.normal());
        }
        normals
    }

    /// Triangle indices for a cuboid whose first vertex is `base`.
    pub fn indices(base: u32) -> [u32; CUBOID_INDEX_COUNT] {
        let mut indices = [0; CUBOID_INDEX_COUNT];
        for f in 0..CuboidFace::ALL.len() {
            let face_base = base + f as u32 * 4;
            for (i, offset) in CuboidFace::triangles().iter().enumerate() {
                indices[f * 6 + i] = face_base + offset;
            }
        }
        indices
    }
}
