//! Rendering layer: all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of what to
//! show.  No game logic is performed; this module only translates state into
//! terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::driver::FrameSink;
use crate::entities::{GameKind, Terminal, TerminalReason};
use crate::error::ArcadeError;
use crate::render::{self, Canvas};
use crate::scores::GameScore;
use crate::session::Session;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_TITLE: Color = Color::Cyan;
const C_HUD_PLAYER: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

/// Rows above the playfield: HUD and top border.
const TOP_ROWS: u16 = 2;

// ── Game frame ────────────────────────────────────────────────────────────────

/// Frame sink drawing the session onto the terminal through a `Canvas`.
pub struct TerminalSurface<'a, W: Write> {
    out: &'a mut W,
    canvas: Canvas,
}

impl<'a, W: Write> TerminalSurface<'a, W> {
    pub fn new(out: &'a mut W, session: &Session) -> Self {
        TerminalSurface {
            out,
            canvas: render::canvas_for(session),
        }
    }
}

impl<W: Write> FrameSink for TerminalSurface<'_, W> {
    fn present(&mut self, session: &Session) -> Result<(), ArcadeError> {
        render::draw_session(&mut self.canvas, session);
        render_frame(&mut *self.out, &self.canvas, session)?;
        Ok(())
    }
}

/// Render one complete frame.
pub fn render_frame<W: Write>(
    out: &mut W,
    canvas: &Canvas,
    session: &Session,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let width = canvas.columns() as u16 + 2;
    draw_hud(out, session, width)?;
    draw_border(out, canvas)?;
    draw_canvas(out, canvas)?;
    draw_controls_hint(out, session.game(), TOP_ROWS + canvas.rows() as u16 + 1)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, TOP_ROWS + canvas.rows() as u16 + 2))?;
    out.flush()?;
    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, session: &Session, width: u16) -> std::io::Result<()> {
    // Game, left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_TITLE))?;
    out.queue(Print(session.game().title()))?;

    // Score, centre
    let score = format!("SCORE: {}", session.score());
    out.queue(cursor::MoveTo(
        (width / 2).saturating_sub(score.len() as u16 / 2),
        0,
    ))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(&score))?;

    // Player, right
    let name = session.player_name().trim();
    let player = if name.is_empty() {
        "NO NAME".to_string()
    } else {
        name.to_uppercase()
    };
    out.queue(cursor::MoveTo(
        width.saturating_sub(player.chars().count() as u16 + 1),
        0,
    ))?;
    out.queue(style::SetForegroundColor(C_HUD_PLAYER))?;
    out.queue(Print(&player))?;
    Ok(())
}

fn draw_border<W: Write>(out: &mut W, canvas: &Canvas) -> std::io::Result<()> {
    let w = canvas.columns();
    let bottom = TOP_ROWS + canvas.rows() as u16;

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, TOP_ROWS - 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w))))?;
    out.queue(cursor::MoveTo(0, bottom))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w))))?;

    for row in TOP_ROWS..bottom {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(w as u16 + 1, row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

fn draw_canvas<W: Write>(out: &mut W, canvas: &Canvas) -> std::io::Result<()> {
    for row in 0..canvas.rows() {
        for col in 0..canvas.columns() {
            if let Some(color) = canvas.cell(col, row) {
                out.queue(cursor::MoveTo(col as u16 + 1, row as u16 + TOP_ROWS))?;
                out.queue(style::SetForegroundColor(color))?;
                out.queue(Print("█"))?;
            }
        }
    }
    Ok(())
}

fn controls_hint(game: GameKind) -> &'static str {
    match game {
        GameKind::Snake => "← ↑ → ↓ / WASD : Steer   ESC : Stop   Q : Quit",
        GameKind::SpaceInvaders => "← → / A D : Move   SPACE : Shoot   ESC : Stop   Q : Quit",
    }
}

fn draw_controls_hint<W: Write>(out: &mut W, game: GameKind, row: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, row))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(controls_hint(game)))?;
    Ok(())
}

// ── Menu ──────────────────────────────────────────────────────────────────────

pub fn render_menu<W: Write>(out: &mut W, player_name: &str) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  RETRO  ARCADE '95  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let player = if player_name.trim().is_empty() {
        "Player: (none, scores will not be saved)".to_string()
    } else {
        format!("Player: {}", player_name.trim())
    };
    out.queue(cursor::MoveTo(
        cx.saturating_sub(player.chars().count() as u16 / 2),
        cy.saturating_sub(4),
    ))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&player))?;

    let options: &[(&str, &str, Color, &str)] = &[
        ("1", "Snake         ", Color::Green, "Eat, grow, avoid the walls"),
        ("2", "Space Invaders", Color::Magenta, "Clear all 24 invaders"),
        ("N", "Name          ", Color::White, "Change player name"),
    ];

    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(2) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(20), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*label))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("  {}", desc)))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(20), cy + 3))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Q : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

pub fn render_name_prompt<W: Write>(out: &mut W, buffer: &str) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let label = "PLAYER NAME:";
    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(label))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(format!("> {}_", buffer)))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy + 2))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("ENTER : Confirm   ESC : Cancel"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

/// What happened to the score after the session ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScoreNotice {
    Saved,
    /// Zero score or no player name.
    Discarded,
    Failed,
}

pub fn render_game_over<W: Write>(
    out: &mut W,
    game: GameKind,
    ending: &Terminal,
    notice: &ScoreNotice,
    leaderboard: &[GameScore],
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let headline_color = match ending.reason {
        TerminalReason::Win => Color::Green,
        TerminalReason::WallCollision | TerminalReason::SelfCollision => Color::Red,
    };
    let headline = format!("║  {:^16}  ║", ending.reason.headline());
    let score_line = format!("Final Score: {}", ending.final_score);
    let notice_line = match notice {
        ScoreNotice::Saved => "Score saved!",
        ScoreNotice::Discarded => "Score not saved (no name or zero score)",
        ScoreNotice::Failed => "Could not save score, try again later",
    };
    let mut lines: Vec<(String, Color)> = vec![
        ("╔════════════════════╗".to_string(), headline_color),
        (headline, headline_color),
        ("╚════════════════════╝".to_string(), headline_color),
        (score_line, Color::Yellow),
        (notice_line.to_string(), C_HINT),
        (String::new(), Color::White),
        (format!("🏆 HIGH SCORES: {}", game.title()), Color::Cyan),
    ];
    if leaderboard.is_empty() {
        lines.push(("No high scores yet!".to_string(), C_HINT));
    }
    for (i, entry) in leaderboard.iter().enumerate() {
        let color = if i == 0 { Color::Yellow } else { Color::White };
        lines.push((
            format!("#{:<2} {:<16} {:>6}", i + 1, entry.player_name, entry.score),
            color,
        ));
    }
    lines.push((String::new(), Color::White));
    lines.push(("R - Back to Menu  Q - Quit".to_string(), Color::White));

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}
