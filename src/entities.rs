/// All game entity types and the owned game context.
///
/// Nothing here advances the simulation; `compute` and `level` do that.
use std::rc::Rc;

use serde::Deserialize;

use crate::config::{LevelDef, Roster};
use crate::tilemap::Tilemap;

// ── Cells ─────────────────────────────────────────────────────────────────────

/// Collision behaviour of one tilemap square.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cell {
    #[default]
    Empty,
    Solid,
    /// Damages anything overlapping it.
    Hazard,
    /// Level exit; triggers on the player's center point only.
    Goal,
}

impl Cell {
    /// Unknown codes read as empty.
    pub fn from_code(code: u8) -> Cell {
        match code {
            1 => Cell::Solid,
            2 => Cell::Hazard,
            3 => Cell::Goal,
            _ => Cell::Empty,
        }
    }
}

// ── Kinds ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnimalKind {
    Macaco,
    Tigre,
    Papagaio,
    Cobra,
    Elefante,
}

impl AnimalKind {
    /// Menu order.
    pub const ALL: [AnimalKind; 5] = [
        AnimalKind::Macaco,
        AnimalKind::Tigre,
        AnimalKind::Papagaio,
        AnimalKind::Cobra,
        AnimalKind::Elefante,
    ];

    /// Name used by the roster file and the sprite directory layout.
    pub fn name(self) -> &'static str {
        match self {
            AnimalKind::Macaco => "macaco",
            AnimalKind::Tigre => "tigre",
            AnimalKind::Papagaio => "papagaio",
            AnimalKind::Cobra => "cobra",
            AnimalKind::Elefante => "elefante",
        }
    }

    pub fn from_name(name: &str) -> Option<AnimalKind> {
        AnimalKind::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum EnemyKind {
    #[serde(rename = "tigre_inimigo")]
    TigerMinion,
    #[serde(rename = "cobra_inimigo")]
    SnakeMinion,
    #[serde(rename = "boss_tigre")]
    TigerBoss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Menu,
    Playing,
    /// Goal touched; waiting for the player to acknowledge.
    LevelComplete,
    GameOver,
    /// Last level finished.
    AllCleared,
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in level pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap: touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Strict containment: a point on the border is outside.
    pub fn contains_point(&self, (px, py): (f32, f32)) -> bool {
        px > self.x && px < self.right() && py > self.y && py < self.bottom()
    }
}

/// Position, size and velocity shared by the player and enemies.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub vx: f32,
    pub vy: f32,
    /// Set only by an upward push out of a solid cell.
    pub grounded: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Body {
        Body {
            x,
            y,
            w,
            h,
            vx: 0.0,
            vy: 0.0,
            grounded: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    pub kind: AnimalKind,
    /// Never negative; reaching 0 ends the run.
    pub health: u32,
    pub facing: Facing,
    pub frame: usize,
    pub frame_timer_ms: u64,
    pub ability_ready: bool,
    /// Game-clock timestamps; `None` until first use.
    pub last_ability_ms: Option<u64>,
    pub last_attack_ms: Option<u64>,
    pub last_contact_ms: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub body: Body,
    pub kind: EnemyKind,
    pub health: u32,
    pub max_health: u32,
    /// Pixel range `(min, max)` paced between; `None` jitters instead.
    pub patrol: Option<(f32, f32)>,
    pub facing: Facing,
    pub frame: usize,
    pub frame_timer_ms: u64,
    /// Culled from the active set on the next tick.
    pub dead: bool,
}

/// Horizontal input held during a tick. Right wins when both are held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Input {
    pub left: bool,
    pub right: bool,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game context: current level, active entities and clock.
/// Cloneable so update functions can return a new copy.
#[derive(Clone, Debug)]
pub struct GameState {
    pub status: GameStatus,
    pub levels: Rc<[LevelDef]>,
    pub level_index: usize,
    pub level_name: String,
    pub tilemap: Tilemap,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub roster: Roster,
    /// Simulated milliseconds since the context was created.
    pub clock_ms: u64,
}
