//! Game state: playfield, active piece, score, spawn and game over.

use crate::piece::{ActivePiece, Rotation, TetrominoKind};
use crate::playfield::Playfield;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Points per cleared row.
pub const LINE_BONUS: u32 = 10;

/// Where the game is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Constructed, waiting for the first `reset`.
    Ready,
    Playing,
    GameOver,
}

/// Result of a one-row drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Not playing; nothing happened.
    Ignored,
    /// Piece moved one row down.
    Moved,
    /// Piece could not move, was merged and the next piece spawned.
    Locked { lines: u32 },
}

/// Game state: playfield, current piece, score, lines, game over.
#[derive(Debug, Clone)]
pub struct GameState {
    playfield: Playfield,
    piece: Option<ActivePiece>,
    score: u32,
    lines_cleared: u32,
    game_over: bool,
    rng: StdRng,
}

impl GameState {
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        Self {
            playfield: Playfield::new(width, height),
            piece: None,
            score: 0,
            lines_cleared: 0,
            game_over: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    pub fn piece(&self) -> Option<&ActivePiece> {
        self.piece.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn status(&self) -> Status {
        if self.is_game_over() {
            Status::GameOver
        } else if self.piece.is_some() {
            Status::Playing
        } else {
            Status::Ready
        }
    }

    /// Clear everything and spawn the first piece. The only way out of game over.
    pub fn reset(&mut self) {
        self.playfield.clear();
        self.score = 0;
        self.lines_cleared = 0;
        self.game_over = false;
        self.spawn();
    }

    /// Shift the piece by `offset` columns; reverted if the new position collides.
    pub fn move_horizontal(&mut self, offset: i32) {
        if self.game_over {
            return;
        }
        if let Some(ref mut piece) = self.piece {
            piece.x += offset;
            if self.playfield.collides(piece) {
                piece.x -= offset;
            }
        }
    }

    pub fn move_left(&mut self) {
        self.move_horizontal(-1);
    }

    pub fn move_right(&mut self) {
        self.move_horizontal(1);
    }

    /// Rotate with wall kick. Returns false (and leaves the piece untouched) if no kick fits.
    pub fn rotate(&mut self, dir: Rotation) -> bool {
        if self.game_over {
            return false;
        }
        let Some(ref mut piece) = self.piece else {
            return false;
        };
        let start_x = piece.x;
        let limit = piece.shape.width() as i32;
        let mut offset = 1i32;
        piece.shape.rotate(dir);
        // Offsets +1, -2, +3, ... accumulate to columns +1, -1, +2, ... from the start; the
        // bound is checked before the newest column is tested.
        while self.playfield.collides(piece) {
            piece.x += offset;
            offset = -(offset + offset.signum());
            if offset > limit {
                piece.shape.rotate(dir.opposite());
                piece.x = start_x;
                return false;
            }
        }
        true
    }

    /// Move down one row; on contact merge, sweep, score and spawn the next piece.
    pub fn soft_drop(&mut self) -> DropOutcome {
        if self.game_over {
            return DropOutcome::Ignored;
        }
        let Some(ref mut piece) = self.piece else {
            return DropOutcome::Ignored;
        };
        piece.y += 1;
        if !self.playfield.collides(piece) {
            return DropOutcome::Moved;
        }
        piece.y -= 1;
        let lines = self.lock_piece();
        DropOutcome::Locked { lines }
    }

    /// Gravity step; identical to a manual soft drop.
    pub fn tick(&mut self) -> DropOutcome {
        self.soft_drop()
    }

    fn lock_piece(&mut self) -> u32 {
        let piece = match self.piece.take() {
            Some(p) => p,
            None => return 0,
        };
        self.playfield.merge(&piece);
        let lines = self.playfield.sweep();
        self.lines_cleared += lines;
        self.score += lines * LINE_BONUS;
        self.spawn();
        lines
    }

    fn spawn(&mut self) {
        let idx = self.rng.random_range(0..TetrominoKind::ALL.len());
        self.spawn_kind(TetrominoKind::ALL[idx]);
    }

    fn spawn_kind(&mut self, kind: TetrominoKind) {
        let piece = ActivePiece::spawn(kind, self.playfield.width());
        if self.playfield.collides(&piece) {
            self.game_over = true;
        }
        self.piece = Some(piece);
    }
}
