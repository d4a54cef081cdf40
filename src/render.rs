//! Immediate-mode drawing onto a fixed-size raster.
//!
//! The raster keeps pixel coordinates (same units as the simulations) but
//! stores one colour per terminal cell.  `fill_rect` marks every cell the
//! rectangle overlaps, so thin sprites like projectiles never vanish.

use crossterm::style::Color;

use crate::entities::{InvadersState, SnakeState};
use crate::geometry::{Playfield, Rect};
use crate::session::{GameState, Session};
use crate::{invaders, snake};

/// Pixels covered by one terminal column.
pub const CELL_WIDTH_PX: i32 = 10;
/// Pixels covered by one terminal row (cells are about twice as tall as wide).
pub const CELL_HEIGHT_PX: i32 = 20;

// ── Colour palette ────────────────────────────────────────────────────────────

pub const C_SNAKE: Color = Color::Green;
pub const C_FOOD: Color = Color::Red;
pub const C_PLAYER: Color = Color::Green;
pub const C_PROJECTILE: Color = Color::Yellow;
pub const C_ENEMY: Color = Color::Magenta;

#[derive(Clone, Debug)]
pub struct Canvas {
    playfield: Playfield,
    columns: usize,
    rows: usize,
    cells: Vec<Option<Color>>,
}

impl Canvas {
    pub fn new(playfield: Playfield) -> Self {
        let columns = (playfield.width.max(0) as usize).div_ceil(CELL_WIDTH_PX as usize);
        let rows = (playfield.height.max(0) as usize).div_ceil(CELL_HEIGHT_PX as usize);
        Canvas {
            playfield,
            columns,
            rows,
            cells: vec![None; columns * rows],
        }
    }

    pub fn playfield(&self) -> Playfield {
        self.playfield
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Back to the (black) background.
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<Color> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.cells[row * self.columns + column]
    }

    /// Paint every cell overlapping `rect`, clipped to the playfield.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(clipped) = clip(rect, self.playfield.as_rect()) else {
            return;
        };
        let first_col = (clipped.left() / CELL_WIDTH_PX) as usize;
        let last_col = ((clipped.right() - 1) / CELL_WIDTH_PX) as usize;
        let first_row = (clipped.top() / CELL_HEIGHT_PX) as usize;
        let last_row = ((clipped.bottom() - 1) / CELL_HEIGHT_PX) as usize;

        for row in first_row..=last_row.min(self.rows.saturating_sub(1)) {
            for col in first_col..=last_col.min(self.columns.saturating_sub(1)) {
                self.cells[row * self.columns + col] = Some(color);
            }
        }
    }

    /// Number of painted cells; handy for tests.
    pub fn painted(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

fn clip(rect: Rect, bounds: Rect) -> Option<Rect> {
    if !rect.overlaps(&bounds) {
        return None;
    }
    let left = rect.left().max(bounds.left());
    let top = rect.top().max(bounds.top());
    let right = rect.right().min(bounds.right());
    let bottom = rect.bottom().min(bounds.bottom());
    Some(Rect::new(left, top, right - left, bottom - top))
}

// ── Game drawing ──────────────────────────────────────────────────────────────

pub fn draw_snake(canvas: &mut Canvas, state: &SnakeState) {
    canvas.clear();
    for segment in &state.segments {
        canvas.fill_rect(
            Rect::new(segment.x, segment.y, snake::SEGMENT_SIZE, snake::SEGMENT_SIZE),
            C_SNAKE,
        );
    }
    canvas.fill_rect(
        Rect::new(state.food.x, state.food.y, snake::SEGMENT_SIZE, snake::SEGMENT_SIZE),
        C_FOOD,
    );
}

pub fn draw_invaders(canvas: &mut Canvas, state: &InvadersState) {
    canvas.clear();
    canvas.fill_rect(state.player, C_PLAYER);
    for projectile in &state.projectiles {
        canvas.fill_rect(*projectile, C_PROJECTILE);
    }
    for enemy in &state.enemies {
        canvas.fill_rect(*enemy, C_ENEMY);
    }
}

pub fn draw_session(canvas: &mut Canvas, session: &Session) {
    match session.state() {
        GameState::Snake(state) => draw_snake(canvas, state),
        GameState::Invaders(state) => draw_invaders(canvas, state),
    }
}

/// Canvas sized for `session`'s playfield.
pub fn canvas_for(session: &Session) -> Canvas {
    let playfield = match session.state() {
        GameState::Snake(state) => state.playfield,
        GameState::Invaders(state) => state.playfield,
    };
    Canvas::new(playfield)
}
