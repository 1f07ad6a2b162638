//! Tetromino kinds, shape matrices and in-place rotation.

/// Tetromino kinds (I, O, T, S, Z, J, L).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TetrominoKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl TetrominoKind {
    pub const ALL: [Self; 7] = [Self::I, Self::L, Self::J, Self::O, Self::Z, Self::S, Self::T];

    /// Fill ID written into the playfield when this kind locks (1..=7).
    pub fn id(&self) -> u8 {
        match self {
            Self::I => 1,
            Self::L => 2,
            Self::J => 3,
            Self::O => 4,
            Self::Z => 5,
            Self::S => 6,
            Self::T => 7,
        }
    }

    /// Spawn orientation as a fresh matrix. Every call builds a new `Shape`,
    /// so rotating a piece never touches another piece's cells.
    pub fn shape(&self) -> Shape {
        let v = self.id();
        let rows: Vec<Vec<u8>> = match self {
            Self::I => vec![
                vec![0, v, 0, 0],
                vec![0, v, 0, 0],
                vec![0, v, 0, 0],
                vec![0, v, 0, 0],
            ],
            Self::L => vec![vec![0, v, 0], vec![0, v, 0], vec![0, v, v]],
            Self::J => vec![vec![0, v, 0], vec![0, v, 0], vec![v, v, 0]],
            Self::O => vec![vec![v, v], vec![v, v]],
            Self::Z => vec![vec![v, v, 0], vec![0, v, v], vec![0, 0, 0]],
            Self::S => vec![vec![0, v, v], vec![v, v, 0], vec![0, 0, 0]],
            Self::T => vec![vec![0, v, 0], vec![v, v, v], vec![0, 0, 0]],
        };
        Shape::from_rows(rows)
    }
}

/// Rotation direction for a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    pub fn opposite(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }
}

/// Square matrix of cell IDs; 0 is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    rows: Vec<Vec<u8>>,
}

impl Shape {
    /// Build a shape from rows. Rows must form a square matrix.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Self {
        debug_assert!(
            rows.iter().all(|r| r.len() == rows.len()),
            "shape matrix must be square"
        );
        Self { rows }
    }

    /// Side length of the matrix (shapes are square, so width == height).
    #[inline]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Raw matrix, row-major. Only inspected by tests for now.
    #[allow(dead_code)]
    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    /// Non-zero cells as (dx, dy, id) relative to the top-left corner.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.rows.iter().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, v)| **v != 0)
                .map(move |(dx, v)| (dx, dy, *v))
        })
    }

    /// Quarter turn in place: transpose, then flip rows (CW) or row order (CCW).
    pub fn rotate(&mut self, dir: Rotation) {
        let n = self.size();
        debug_assert!(self.rows.iter().all(|r| r.len() == n));
        for y in 0..n {
            for x in 0..y {
                let tmp = self.rows[x][y];
                self.rows[x][y] = self.rows[y][x];
                self.rows[y][x] = tmp;
            }
        }
        match dir {
            Rotation::Clockwise => self.rows.iter_mut().for_each(|row| row.reverse()),
            Rotation::CounterClockwise => self.rows.reverse(),
        }
    }
}

/// The falling piece: its own shape plus the playfield position of the shape's top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePiece {
    pub kind: TetrominoKind,
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
}

impl ActivePiece {
    /// Fresh piece of `kind`, centred over a playfield `field_width` columns wide, at row 0.
    pub fn spawn(kind: TetrominoKind, field_width: usize) -> Self {
        let shape = kind.shape();
        let x = (field_width / 2) as i32 - (shape.width() / 2) as i32;
        Self { kind, shape, x, y: 0 }
    }

    /// Occupied cells in playfield coordinates: (x, y, id).
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        self.shape
            .cells()
            .map(move |(dx, dy, v)| (self.x + dx as i32, self.y + dy as i32, v))
    }
}
