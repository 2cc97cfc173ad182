/// Tuning constants, the built-in level set and the character roster.
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::entities::{AnimalKind, EnemyKind};
use crate::tilemap::{Tilemap, TilemapError};

// ── World ─────────────────────────────────────────────────────────────────────

pub const TILE_SIZE: f32 = 48.0;
/// Solid rows at the bottom of a generated level.
pub const FLOOR_ROWS: usize = 3;

pub const GRAVITY: f32 = 0.7;
pub const MOVE_SPEED: f32 = 4.0;
pub const JUMP_POWER: f32 = 14.0;

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_WIDTH: f32 = 72.0;
pub const PLAYER_HEIGHT: f32 = 96.0;
pub const PLAYER_START: (f32, f32) = (80.0, 16.0);
pub const PLAYER_HEALTH: u32 = 100;
pub const PLAYER_FRAME_INTERVAL_MS: u64 = 120;
/// Gap kept between the player and the right edge of the level.
pub const RIGHT_EDGE_MARGIN: f32 = 4.0;

pub const ATTACK_COOLDOWN_MS: u64 = 300;
pub const ATTACK_REACH: f32 = 40.0;
pub const ATTACK_HEIGHT: f32 = 30.0;
pub const ATTACK_DAMAGE: u32 = 15;

pub const HAZARD_DAMAGE: u32 = 1;
pub const CONTACT_DAMAGE: u32 = 1;
pub const CONTACT_DAMAGE_INTERVAL_MS: u64 = 32;

// ── Enemies ───────────────────────────────────────────────────────────────────

pub const ENEMY_SIZE: f32 = 64.0;
pub const ENEMY_SPEED: f32 = 1.2;
pub const ENEMY_HEALTH: u32 = 50;
pub const BOSS_HEALTH: u32 = 200;
pub const ENEMY_FRAMES: usize = 4;
pub const ENEMY_FRAME_INTERVAL_MS: u64 = 150;
/// Odds (1 in N) that a non-patrolling enemy steps backwards on a tick.
pub const ENEMY_JITTER_ODDS: u32 = 100;

// ── Assets ────────────────────────────────────────────────────────────────────

pub const ROOT_ENV_VAR: &str = "ANIMAL_PLATFORMER_ROOT";
pub const SPRITE_EXT: &str = "txt";
pub const LOG_FILE_NAME: &str = "animal_platformer.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON at {at}: {source}")]
    Parse {
        at: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("level {index} ({name}) is malformed: {source}")]
    InvalidLevel {
        index: usize,
        name: String,
        #[source]
        source: TilemapError,
    },
    #[error("level list is empty")]
    NoLevels,
}

/// Where the game looks for its data files.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub root: PathBuf,
    pub characters: PathBuf,
    pub levels: PathBuf,
    pub sprites: PathBuf,
}

impl AssetPaths {
    pub fn under(root: impl Into<PathBuf>) -> AssetPaths {
        let root = root.into();
        let assets = root.join("assets");
        AssetPaths {
            characters: assets.join("characters.json"),
            levels: assets.join("levels.json"),
            sprites: assets.join("sprites"),
            root,
        }
    }
}

/// `$ANIMAL_PLATFORMER_ROOT` if set, otherwise the working directory.
pub fn resolve_asset_paths() -> AssetPaths {
    match env::var_os(ROOT_ENV_VAR) {
        Some(root) => AssetPaths::under(root),
        None => AssetPaths::under("."),
    }
}

// ── Characters ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterStats {
    /// Animation frames available for the kind.
    pub frames: usize,
    pub ability_cooldown: u64,
}

fn builtin_stats(kind: AnimalKind) -> CharacterStats {
    let (frames, ability_cooldown) = match kind {
        AnimalKind::Macaco => (4, 3000),
        AnimalKind::Tigre => (3, 3500),
        AnimalKind::Papagaio => (4, 4000),
        AnimalKind::Cobra => (4, 2500),
        AnimalKind::Elefante => (5, 7000),
    };
    CharacterStats {
        frames,
        ability_cooldown,
    }
}

/// Per-kind frame counts and ability cooldowns.
#[derive(Clone, Debug, PartialEq)]
pub struct Roster {
    stats: BTreeMap<AnimalKind, CharacterStats>,
}

impl Default for Roster {
    fn default() -> Self {
        Roster {
            stats: AnimalKind::ALL
                .into_iter()
                .map(|kind| (kind, builtin_stats(kind)))
                .collect(),
        }
    }
}

impl Roster {
    pub fn stats(&self, kind: AnimalKind) -> CharacterStats {
        self.stats
            .get(&kind)
            .copied()
            .unwrap_or_else(|| builtin_stats(kind))
    }

    /// Parses `{"<kind>": {"frames": N, "abilityCooldown": MS}, ...}`.
    /// Unknown kinds are skipped; kinds absent from the file keep built-in stats.
    pub fn from_json_str(raw: &str) -> Result<Roster, ConfigError> {
        let entries: BTreeMap<String, CharacterStats> = parse_json(raw)?;
        let mut roster = Roster::default();
        for (name, stats) in entries {
            match AnimalKind::from_name(&name) {
                Some(kind) => {
                    roster.stats.insert(kind, stats);
                }
                None => warn!(kind = %name, "roster_unknown_kind_skipped"),
            }
        }
        Ok(roster)
    }

    pub fn load(path: &Path) -> Result<Roster, ConfigError> {
        Roster::from_json_str(&read_file(path)?)
    }
}

// ── Levels ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct EnemySpawn {
    #[serde(rename = "type")]
    pub kind: EnemyKind,
    /// Tile column.
    pub x: i32,
    /// Tile row.
    pub y: i32,
    /// Tile columns paced between.
    #[serde(default)]
    pub patrol: Option<[i32; 2]>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LevelDef {
    pub name: String,
    pub cols: usize,
    pub rows: usize,
    /// Row-major cell codes; empty means generate.
    #[serde(default)]
    pub data: Vec<Vec<u8>>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
}

pub fn default_levels() -> Vec<LevelDef> {
    let spawn = |kind, x, y, patrol| EnemySpawn { kind, x, y, patrol };
    vec![
        LevelDef {
            name: "Fase 1 - Clareira".to_string(),
            cols: 30,
            rows: 12,
            data: Vec::new(),
            enemies: vec![spawn(EnemyKind::TigerMinion, 12, 9, Some([10, 14]))],
        },
        LevelDef {
            name: "Fase 2 - Lama e Troncos".to_string(),
            cols: 40,
            rows: 12,
            data: Vec::new(),
            enemies: vec![
                spawn(EnemyKind::SnakeMinion, 15, 9, Some([12, 18])),
                spawn(EnemyKind::TigerMinion, 28, 9, Some([26, 30])),
            ],
        },
        LevelDef {
            name: "Fase 3 - Covil do Tigre".to_string(),
            cols: 36,
            rows: 12,
            data: Vec::new(),
            enemies: vec![spawn(EnemyKind::TigerBoss, 30, 8, None)],
        },
    ]
}

/// Parses and validates a JSON array of levels.
pub fn parse_levels(raw: &str) -> Result<Vec<LevelDef>, ConfigError> {
    let levels: Vec<LevelDef> = parse_json(raw)?;
    if levels.is_empty() {
        return Err(ConfigError::NoLevels);
    }
    for (index, level) in levels.iter().enumerate() {
        Tilemap::from_def(level).map_err(|source| ConfigError::InvalidLevel {
            index,
            name: level.name.clone(),
            source,
        })?;
    }
    Ok(levels)
}

pub fn load_levels(path: &Path) -> Result<Vec<LevelDef>, ConfigError> {
    parse_levels(&read_file(path)?)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
        let at = error.path().to_string();
        ConfigError::Parse {
            at,
            source: error.into_inner(),
        }
    })
}
