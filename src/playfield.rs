//! Playfield grid: collision, merge and line sweep.

use crate::piece::ActivePiece;
use std::collections::VecDeque;

/// Grid of cell IDs. y=0 is top; 0 is empty, 1..=7 is the kind that locked there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playfield {
    width: usize,
    height: usize,
    /// rows[y][x] = cell. rows[0] is top.
    rows: VecDeque<Vec<u8>>,
}

impl Playfield {
    pub fn new(width: usize, height: usize) -> Self {
        let rows = (0..height).map(|_| vec![0; width]).collect();
        Self {
            width,
            height,
            rows,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, cell: u8) {
        debug_assert!(cell <= 7, "cell id out of range: {cell}");
        if let Some(row) = self.rows.get_mut(y) {
            if let Some(c) = row.get_mut(x) {
                *c = cell;
            }
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(0);
        }
    }

    /// True if any occupied cell of `piece` is left/right of the field, below the bottom row,
    /// or on an occupied cell. Rows above the top never collide.
    pub fn collides(&self, piece: &ActivePiece) -> bool {
        let (w, h) = (self.width as i32, self.height as i32);
        piece.cells().any(|(x, y, _)| {
            if x < 0 || x >= w || y >= h {
                return true;
            }
            if y < 0 {
                return false;
            }
            self.rows[y as usize][x as usize] != 0
        })
    }

    /// Write the piece's cells into the grid. Cells above the top row are dropped.
    pub fn merge(&mut self, piece: &ActivePiece) {
        for (x, y, v) in piece.cells() {
            if x >= 0 && y >= 0 {
                self.set(x as usize, y as usize, v);
            }
        }
    }

    /// Remove full rows bottom-up, inserting an empty row on top for each. Returns rows removed.
    ///
    /// Row 0 is never tested on its own; it only clears after shifting down into a tested row.
    pub fn sweep(&mut self) -> u32 {
        let mut removed = 0;
        let mut y = self.height.saturating_sub(1);
        while y > 0 {
            if self.rows[y].iter().all(|&c| c != 0) {
                if let Some(mut row) = self.rows.remove(y) {
                    row.fill(0);
                    self.rows.push_front(row);
                    removed += 1;
                }
                // Same y now holds the row that was above; test it again.
            } else {
                y -= 1;
            }
        }
        removed
    }
}
