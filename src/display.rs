/// Rendering layer. All terminal I/O for a running level lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state. No game logic is performed; this module only translates
/// state into terminal commands. One terminal column spans half a tile,
/// one terminal row spans a full tile.
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use animal_platformer::config::TILE_SIZE;
use animal_platformer::controls::layout;
use animal_platformer::entities::{Cell, Enemy, EnemyKind, GameState, GameStatus, Player};
use animal_platformer::level::enemies_left;
use animal_platformer::sprites::SpriteBank;
use animal_platformer::tilemap::Tilemap;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_LEVEL: Color = Color::Yellow;
const C_HUD_ENEMIES: Color = Color::White;
const C_ABILITY_READY: Color = Color::Green;
const C_ABILITY_WAIT: Color = Color::DarkGrey;
const C_SOLID: Color = Color::Green;
const C_HAZARD: Color = Color::Red;
const C_GOAL: Color = Color::Yellow;
const C_PLAYER: Color = Color::White;
const C_PLACEHOLDER: Color = Color::Magenta;
const C_ENEMY: Color = Color::DarkYellow;
const C_BOSS: Color = Color::DarkRed;
const C_ENEMY_HEALTH: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;
const C_TOUCH: Color = Color::Cyan;

const COL_PX: f32 = TILE_SIZE / 2.0;
const ROW_PX: f32 = TILE_SIZE;
/// First terminal row of the play area (HUD on row 0, border on row 1).
const TOP: i32 = 2;
const LEFT: i32 = 1;
/// First column of the clickable control strip.
pub const TOUCH_LEFT: u16 = 1;

pub const CONTROLS_HINT: &str =
    "← → / A D : Move   ↑ / W : Jump   SPACE : Attack   E : Ability   Q : Quit";

/// Maps level pixels to terminal cells with a horizontal camera.
struct Viewport {
    camera_x: f32,
    cols: i32,
}

impl Viewport {
    fn follow(state: &GameState, width: u16) -> Viewport {
        let cols = width.saturating_sub(2) as i32;
        let view_px = cols as f32 * COL_PX;
        let level_px = state.tilemap.width_px();
        let body = &state.player.body;
        let wanted = body.x + body.w / 2.0 - view_px / 2.0;
        Viewport {
            camera_x: wanted.clamp(0.0, (level_px - view_px).max(0.0)),
            cols,
        }
    }

    fn column(&self, x: f32) -> i32 {
        LEFT + ((x - self.camera_x) / COL_PX).floor() as i32
    }

    fn row(&self, y: f32) -> i32 {
        TOP + (y / ROW_PX).floor() as i32
    }

    /// Prints `text` at (col,row), dropping characters outside the play area.
    fn print<W: Write>(&self, out: &mut W, col: i32, row: i32, text: &str) -> std::io::Result<()> {
        if row < TOP {
            return Ok(());
        }
        for (i, ch) in text.chars().enumerate() {
            let c = col + i as i32;
            if c >= LEFT && c < LEFT + self.cols {
                out.queue(cursor::MoveTo(c as u16, row as u16))?;
                out.queue(Print(ch))?;
            }
        }
        Ok(())
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Terminal row of the bottom border.
fn bottom_row(state: &GameState) -> u16 {
    (TOP + (state.tilemap.height_px() / ROW_PX).floor() as i32) as u16
}

/// Terminal row holding the clickable control strip.
pub fn touch_row(state: &GameState) -> u16 {
    bottom_row(state) + 2
}

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    sprites: &SpriteBank,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let view = Viewport::follow(state, width);
    let bottom = bottom_row(state) as i32;

    draw_border(out, width, bottom as u16)?;
    draw_hud(out, state, width)?;
    draw_tiles(out, state, &view)?;

    for enemy in &state.enemies {
        draw_enemy(out, enemy, &view)?;
    }
    draw_player(out, &state.player, sprites, &view)?;
    draw_controls_hint(out, state, bottom as u16 + 1)?;
    draw_touch_strip(out, touch_row(state))?;

    match state.status {
        GameStatus::LevelComplete => draw_message(
            out,
            width,
            bottom as u16,
            ("Level complete!", Color::Yellow),
            "Click or press Enter for the next level",
        )?,
        GameStatus::AllCleared => draw_message(
            out,
            width,
            bottom as u16,
            ("You beat the game!", Color::Green),
            "Click or press Enter to restart",
        )?,
        GameStatus::GameOver => draw_message(
            out,
            width,
            bottom as u16,
            ("Game Over", Color::Red),
            "Click or press Enter to try again",
        )?,
        GameStatus::Menu | GameStatus::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, bottom: u16) -> std::io::Result<()> {
    let w = width as usize;
    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, TOP as u16 - 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, bottom))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in TOP as u16..bottom {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(format!("Health:{:>4}", state.player.health)))?;

    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(format!(
        "   Level {}/{}: {}",
        state.level_index + 1,
        state.levels.len(),
        state.level_name
    )))?;

    out.queue(style::SetForegroundColor(C_HUD_ENEMIES))?;
    out.queue(Print(format!("   Enemies left: {}", enemies_left(state))))?;

    // Ability status, right side
    let player = &state.player;
    let (ability_str, color) = if player.ability_ready {
        (format!("[{} READY]", player.kind.name()), C_ABILITY_READY)
    } else {
        let cooldown = state.roster.stats(player.kind).ability_cooldown;
        let used = player.last_ability_ms.unwrap_or(state.clock_ms);
        let remaining = cooldown.saturating_sub(state.clock_ms.saturating_sub(used));
        (
            format!("[{} {:>3.1}s]", player.kind.name(), remaining as f32 / 1000.0),
            C_ABILITY_WAIT,
        )
    };
    let rx = width.saturating_sub(ability_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(&ability_str))?;
    Ok(())
}

// ── Tiles ─────────────────────────────────────────────────────────────────────

fn draw_tiles<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let map = &state.tilemap;
    for row in 0..map.rows() as i64 {
        for col in 0..map.cols() as i64 {
            let (glyph, color) = match map.cell_at(col, row) {
                Cell::Empty => continue,
                Cell::Solid => ("██", C_SOLID),
                Cell::Hazard => ("▲▲", C_HAZARD),
                Cell::Goal => ("[]", C_GOAL),
            };
            let rect = Tilemap::cell_rect(col, row);
            out.queue(style::SetForegroundColor(color))?;
            view.print(out, view.column(rect.x), view.row(rect.y), glyph)?;
        }
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(
    out: &mut W,
    player: &Player,
    sprites: &SpriteBank,
    view: &Viewport,
) -> std::io::Result<()> {
    let body = &player.body;
    let col = view.column(body.x);
    let row = view.row(body.y);

    match sprites.frame(player.kind, player.frame) {
        Some(frame) => {
            // Art is centred over the body.
            let col = view.column(body.x + body.w / 2.0) - frame.width() as i32 / 2;
            out.queue(style::SetForegroundColor(C_PLAYER))?;
            for (i, line) in frame.lines.iter().enumerate() {
                view.print(out, col, row + i as i32, line)?;
            }
        }
        None => {
            // Placeholder box covering the player's cells
            let cols = (body.w / COL_PX).ceil() as usize;
            let rows = (body.h / ROW_PX).ceil() as i32;
            out.queue(style::SetForegroundColor(C_PLACEHOLDER))?;
            for i in 0..rows {
                view.print(out, col, row + i, &"▒".repeat(cols))?;
            }
        }
    }
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, enemy: &Enemy, view: &Viewport) -> std::io::Result<()> {
    let body = &enemy.body;
    let col = view.column(body.x);
    let first_row = view.row(body.y);
    let last_row = view.row(body.y + body.h - 1.0);
    let cols = (body.w / COL_PX).ceil() as usize;

    let color = match enemy.kind {
        EnemyKind::TigerBoss => C_BOSS,
        EnemyKind::TigerMinion | EnemyKind::SnakeMinion => C_ENEMY,
    };
    out.queue(style::SetForegroundColor(color))?;
    for row in first_row..=last_row {
        view.print(out, col, row, &"█".repeat(cols))?;
    }

    // Health bar above
    let filled = ((cols as u32 * enemy.health).div_ceil(enemy.max_health.max(1))) as usize;
    out.queue(style::SetForegroundColor(C_ENEMY_HEALTH))?;
    view.print(out, col, first_row - 1, &"▬".repeat(filled.min(cols)))?;
    Ok(())
}

// ── Controls hint (under the play area) ───────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, state: &GameState, row: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, row))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    if state.status == GameStatus::Playing && enemies_left(state) == 0 {
        out.queue(style::SetForegroundColor(C_GOAL))?;
        out.queue(Print("All clear! Head for the door [].   "))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
    }
    out.queue(Print(CONTROLS_HINT))?;
    Ok(())
}

// ── Touch strip (two rows under the play area) ───────────────────────────────

fn draw_touch_strip<W: Write>(out: &mut W, row: u16) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_TOUCH))?;
    for (button, col, _) in layout(TOUCH_LEFT) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print(button.label()))?;
    }
    Ok(())
}

// ── Message overlay ───────────────────────────────────────────────────────────

fn draw_message<W: Write>(
    out: &mut W,
    width: u16,
    bottom: u16,
    (title, color): (&str, Color),
    hint: &str,
) -> std::io::Result<()> {
    let inner = hint.chars().count().max(title.chars().count()) + 4;
    let lines = [
        format!("╔{}╗", "═".repeat(inner)),
        format!("║{:^inner$}║", title),
        format!("╚{}╝", "═".repeat(inner)),
    ];

    let cx = width / 2;
    let start_row = (bottom / 2).saturating_sub(2);

    for (i, msg) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(msg))?;
    }

    let hint_row = start_row + lines.len() as u16;
    let col = cx.saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, hint_row))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(hint))?;
    Ok(())
}
