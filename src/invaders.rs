//! Space Invaders stepping: pure functions over `InvadersState`.

use crate::entities::{GameStatus, InvadersState, Terminal, TerminalReason};
use crate::geometry::{Playfield, Rect};

pub const DEFAULT_PLAYFIELD: Playfield = Playfield::new(400, 300);

pub const PLAYER_WIDTH: i32 = 30;
pub const PLAYER_HEIGHT: i32 = 20;
/// Distance from the player's top edge to the bottom of the playfield.
pub const PLAYER_BOTTOM_OFFSET: i32 = 30;
pub const PLAYER_STEP: i32 = 10;

pub const PROJECTILE_WIDTH: i32 = 3;
pub const PROJECTILE_HEIGHT: i32 = 10;
pub const PROJECTILE_SPEED: i32 = 5;

pub const ENEMY_WIDTH: i32 = 25;
pub const ENEMY_HEIGHT: i32 = 20;
pub const ENEMY_COLUMNS: i32 = 8;
pub const ENEMY_ROWS: i32 = 3;
pub const ENEMY_ORIGIN_X: i32 = 50;
pub const ENEMY_ORIGIN_Y: i32 = 50;
pub const ENEMY_SPACING_X: i32 = 40;
pub const ENEMY_SPACING_Y: i32 = 30;

pub const ENEMY_REWARD: u32 = 100;

// ── Constructors ─────────────────────────────────────────────────────────────

/// The fixed 8×3 enemy formation, column-major.
pub fn enemy_formation() -> Vec<Rect> {
    (0..ENEMY_COLUMNS)
        .flat_map(|i| {
            (0..ENEMY_ROWS).map(move |j| {
                Rect::new(
                    ENEMY_ORIGIN_X + i * ENEMY_SPACING_X,
                    ENEMY_ORIGIN_Y + j * ENEMY_SPACING_Y,
                    ENEMY_WIDTH,
                    ENEMY_HEIGHT,
                )
            })
        })
        .collect()
}

pub fn init_state(playfield: Playfield) -> InvadersState {
    InvadersState {
        player: Rect::new(
            playfield.width / 2,
            playfield.height - PLAYER_BOTTOM_OFFSET,
            PLAYER_WIDTH,
            PLAYER_HEIGHT,
        ),
        projectiles: Vec::new(),
        enemies: enemy_formation(),
        score: 0,
        status: GameStatus::Playing,
        playfield,
        frame: 0,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn move_player_left(state: &InvadersState) -> InvadersState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    let x = (state.player.x - PLAYER_STEP).max(0);
    InvadersState {
        player: Rect { x, ..state.player },
        ..state.clone()
    }
}

pub fn move_player_right(state: &InvadersState) -> InvadersState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    let max_x = (state.playfield.width - state.player.width).max(0);
    let x = (state.player.x + PLAYER_STEP).min(max_x);
    InvadersState {
        player: Rect { x, ..state.player },
        ..state.clone()
    }
}

/// Launch a projectile from the player's horizontal centre.
pub fn fire(state: &InvadersState) -> InvadersState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    let mut projectiles = state.projectiles.clone();
    projectiles.push(Rect::new(
        state.player.x + state.player.width / 2,
        state.player.y,
        PROJECTILE_WIDTH,
        PROJECTILE_HEIGHT,
    ));
    InvadersState {
        projectiles,
        ..state.clone()
    }
}

// ── Collision ────────────────────────────────────────────────────────────────

/// Read-only pass pairing each enemy (ascending index) with the first
/// projectile that overlaps it and is not already spent.
///
/// Returns `(projectile_index, enemy_index)` pairs; nothing is removed here.
pub fn find_hits(projectiles: &[Rect], enemies: &[Rect]) -> Vec<(usize, usize)> {
    let mut spent = vec![false; projectiles.len()];
    let mut hits = Vec::new();

    for (ei, enemy) in enemies.iter().enumerate() {
        let hit = projectiles
            .iter()
            .enumerate()
            .find(|(pi, p)| !spent[*pi] && p.overlaps(enemy));
        if let Some((pi, _)) = hit {
            spent[pi] = true;
            hits.push((pi, ei));
        }
    }

    hits
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

pub fn tick(state: &InvadersState) -> InvadersState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    let frame = state.frame + 1;

    // ── 1. Move projectiles up, dropping those past the top ──────────────────
    let projectiles: Vec<Rect> = state
        .projectiles
        .iter()
        .map(|p| Rect {
            y: p.y - PROJECTILE_SPEED,
            ..*p
        })
        .filter(|p| p.y > 0)
        .collect();

    // ── 2. Collide, then apply removals ──────────────────────────────────────
    let hits = find_hits(&projectiles, &state.enemies);
    let used_projectiles: Vec<usize> = hits.iter().map(|&(pi, _)| pi).collect();
    let killed_enemies: Vec<usize> = hits.iter().map(|&(_, ei)| ei).collect();

    let projectiles: Vec<Rect> = projectiles
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !used_projectiles.contains(i))
        .map(|(_, p)| p)
        .collect();

    let enemies: Vec<Rect> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(i, _)| !killed_enemies.contains(i))
        .map(|(_, e)| *e)
        .collect();

    let score = state.score + ENEMY_REWARD * hits.len() as u32;

    // ── 3. Win once the formation is gone ────────────────────────────────────
    let status = if enemies.is_empty() {
        GameStatus::Over(Terminal {
            reason: TerminalReason::Win,
            final_score: score,
        })
    } else {
        GameStatus::Playing
    };

    InvadersState {
        projectiles,
        enemies,
        score,
        status,
        frame,
        ..state.clone()
    }
}
