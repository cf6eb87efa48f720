//! Rendering layer.  All terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! session.  No game logic is performed; this module only translates
//! state into terminal commands, scaling field units down to cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::entities::{Actor, ActorKind, GameState, GameStatus, Rect};
use crate::session::{Screen, Session};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_WAVE: Color = Color::Cyan;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Red;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_OBSTACLE: Color = Color::Green;
const C_TITLE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

// ── Field → terminal mapping ──────────────────────────────────────────────────

/// Terminal area the field is drawn into: row 0 is the HUD, row 1 and
/// row `rows - 2` the border, the last row the key hints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub field_width: i32,
    pub field_height: i32,
}

/// A rectangle in terminal cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRect {
    pub col: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, state: &GameState) -> Viewport {
        Viewport {
            cols,
            rows,
            field_width: state.config.field_width,
            field_height: state.config.field_height,
        }
    }

    fn inner_width(&self) -> i32 {
        self.cols.saturating_sub(2) as i32
    }

    fn inner_height(&self) -> i32 {
        self.rows.saturating_sub(4) as i32
    }

    /// Scale a field rectangle into cells, at least one cell in each
    /// direction, clipped to the play area.  `None` if nothing is visible.
    pub fn to_cells(&self, rect: &Rect) -> Option<CellRect> {
        let (iw, ih) = (self.inner_width(), self.inner_height());
        if iw <= 0 || ih <= 0 {
            return None;
        }
        let left = rect.x.max(0) * iw / self.field_width;
        let top = rect.y.max(0) * ih / self.field_height;
        let right = (rect.right().min(self.field_width) * iw + self.field_width - 1)
            / self.field_width;
        let bottom = (rect.bottom().min(self.field_height) * ih + self.field_height - 1)
            / self.field_height;
        if rect.right() <= 0 || rect.bottom() <= 0 || left >= iw || top >= ih {
            return None;
        }
        Some(CellRect {
            col: 1 + left as u16,
            row: 2 + top as u16,
            width: (right - left).clamp(1, iw - left) as u16,
            height: (bottom - top).clamp(1, ih - top) as u16,
        })
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame for whatever screen the session is on.
pub fn render<W: Write>(out: &mut W, session: &Session) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    match session.screen {
        Screen::Start => draw_start(out, session, cols, rows)?,
        Screen::HighScores => draw_high_scores(out, session, cols, rows)?,
        Screen::Round => {
            let state = &session.game;
            let view = Viewport::new(cols, rows, state);
            draw_border(out, cols, rows)?;
            draw_hud(out, state, cols)?;
            for actor in state.actors() {
                draw_actor(out, &view, actor)?;
            }
            draw_controls_hint(out, rows)?;
            match state.status {
                GameStatus::Playing => {}
                GameStatus::WaveClear => draw_wave_clear(out, state, cols, rows)?,
                GameStatus::GameOver => draw_game_over(out, session, cols, rows)?,
            }
        }
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Menus ─────────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    lines: &[(&str, Color)],
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let cx = cols / 2;
    let start_row = (rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}

fn draw_start<W: Write>(
    out: &mut W,
    session: &Session,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let best = format!("Best Score: {}", session.scores.best());
    let lines: &[(&str, Color)] = &[
        ("★  SPACE  INVADERS  ★", C_TITLE),
        ("", C_HINT),
        (best.as_str(), C_HUD_SCORE),
        ("", C_HINT),
        ("Enter : Start", Color::White),
        ("H : High Scores", Color::White),
        ("Q : Quit", Color::White),
        ("", C_HINT),
        ("← → / A D : Move   SPACE : Shoot", C_HINT),
    ];
    draw_centered(out, lines, cols, rows)
}

fn draw_high_scores<W: Write>(
    out: &mut W,
    session: &Session,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let rows_text: Vec<String> = if session.scores.entries().is_empty() {
        vec!["No scores yet".to_string()]
    } else {
        session
            .scores
            .entries()
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{:>2}. {:<12} {:>6}", i + 1, e.name, e.score))
            .collect()
    };

    let mut lines: Vec<(&str, Color)> = vec![("High Scores", C_TITLE), ("", C_HINT)];
    lines.extend(rows_text.iter().map(|s| (s.as_str(), Color::White)));
    lines.push(("", C_HINT));
    lines.push(("B : Back", C_HINT));
    draw_centered(out, &lines, cols, rows)
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let w = cols as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row rows-2 — bottom bar
    out.queue(cursor::MoveTo(0, rows.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, cols: u16) -> std::io::Result<()> {
    // Score — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>4}  Best: {:>4}", state.score, state.high_score)))?;

    // Wave — centre
    let wave_str = format!("[ WAVE {} ]", state.wave);
    let wx = (cols / 2).saturating_sub(wave_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(wx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_WAVE))?;
    out.queue(Print(&wave_str))?;

    // Lives — right
    let lives_text = format!("Lives: {}", state.lives);
    let rx = cols.saturating_sub(lives_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_text))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_actor<W: Write>(out: &mut W, view: &Viewport, actor: &dyn Actor) -> std::io::Result<()> {
    let Some(cells) = view.to_cells(&actor.bounds()) else {
        return Ok(());
    };
    let (glyph, color) = match actor.kind() {
        ActorKind::Player => ("▲", C_PLAYER),
        ActorKind::Enemy => ("▓", C_ENEMY),
        ActorKind::PlayerBullet => ("║", C_BULLET_PLAYER),
        ActorKind::EnemyBullet => ("↓", C_BULLET_ENEMY),
        ActorKind::Obstacle => ("▒", C_OBSTACLE),
    };
    out.queue(style::SetForegroundColor(color))?;
    let line = glyph.repeat(cells.width as usize);
    for dy in 0..cells.height {
        out.queue(cursor::MoveTo(cells.col, cells.row + dy))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, rows: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_wave_clear<W: Write>(
    out: &mut W,
    state: &GameState,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let title = format!("Wave {} cleared!", state.wave);
    let lines: &[(&str, Color)] = &[
        (title.as_str(), Color::Green),
        ("Next wave incoming - Enter to skip", Color::White),
    ];
    draw_centered(out, lines, cols, rows)
}

fn draw_game_over<W: Write>(
    out: &mut W,
    session: &Session,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", session.game.score);
    let mut lines: Vec<(&str, Color)> = vec![
        ("╔══════════════════╗", Color::Red),
        ("║    GAME  OVER    ║", Color::Red),
        ("╚══════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
    ];
    if session.last_rank == Some(1) {
        lines.push(("New High Score!", Color::Magenta));
    }
    lines.push(("Enter - Play Again  B - Menu  Q - Quit", Color::White));
    draw_centered(out, &lines, cols, rows)
}
