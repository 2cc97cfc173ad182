/// Level controller: owns level progression and the coarse game status.
///
/// ```text
/// Menu ──start──▶ Playing ──goal──▶ LevelComplete ──ack──▶ Playing (next level)
///                    │                    └─────────ack──▶ AllCleared ──ack──▶ Menu
///                    └──health 0──▶ GameOver ──ack──▶ Menu
/// ```
use std::rc::Rc;

use tracing::{info, warn};

use crate::compute::{new_player, spawn_enemy};
use crate::config::{default_levels, LevelDef, Roster};
use crate::entities::{AnimalKind, GameState, GameStatus};
use crate::tilemap::Tilemap;

/// Fresh context sitting on the menu with the first level loaded behind it.
/// An empty level list falls back to the built-in levels.
pub fn new_game(levels: Vec<LevelDef>, roster: Roster) -> GameState {
    let levels: Rc<[LevelDef]> = if levels.is_empty() {
        default_levels().into()
    } else {
        levels.into()
    };
    let mut state = GameState {
        status: GameStatus::Menu,
        levels,
        level_index: 0,
        level_name: String::new(),
        tilemap: Tilemap::generate(0, 0),
        player: new_player(AnimalKind::Macaco),
        enemies: Vec::new(),
        roster,
        clock_ms: 0,
    };
    spawn_level(&mut state, 0, AnimalKind::Macaco);
    state
}

/// Menu → Playing on level 0 with the chosen animal.
pub fn start_game(state: &GameState, kind: AnimalKind) -> GameState {
    let mut next = state.clone();
    if next.status != GameStatus::Menu {
        return next;
    }
    spawn_level(&mut next, 0, kind);
    next.status = GameStatus::Playing;
    info!(kind = kind.name(), "game_started");
    next
}

/// The click/tap on a message screen.
pub fn acknowledge(state: &GameState) -> GameState {
    let mut next = state.clone();
    let kind = next.player.kind;
    match next.status {
        GameStatus::LevelComplete => {
            let upcoming = next.level_index + 1;
            if upcoming < next.levels.len() {
                spawn_level(&mut next, upcoming, kind);
                next.status = GameStatus::Playing;
            } else {
                next.status = GameStatus::AllCleared;
                info!(levels = next.levels.len(), "all_levels_cleared");
            }
        }
        GameStatus::GameOver | GameStatus::AllCleared => {
            spawn_level(&mut next, 0, kind);
            next.status = GameStatus::Menu;
        }
        GameStatus::Menu | GameStatus::Playing => {}
    }
    next
}

/// Playing → LevelComplete. Returns `false` (and changes nothing) when the
/// game is not in play, so repeated goal contact fires once.
pub fn mark_level_complete(state: &mut GameState) -> bool {
    if state.status != GameStatus::Playing {
        return false;
    }
    state.status = GameStatus::LevelComplete;
    info!(
        level = state.level_index + 1,
        name = %state.level_name,
        clock_ms = state.clock_ms,
        "level_complete"
    );
    true
}

/// Playing → GameOver. Same one-shot guard as `mark_level_complete`.
pub fn mark_player_defeated(state: &mut GameState) -> bool {
    if state.status != GameStatus::Playing {
        return false;
    }
    state.status = GameStatus::GameOver;
    info!(level = state.level_index + 1, "player_defeated");
    true
}

pub fn enemies_left(state: &GameState) -> usize {
    state.enemies.iter().filter(|e| !e.dead).count()
}

/// Replaces the tilemap and every entity with a fresh copy of level `index`.
fn spawn_level(state: &mut GameState, index: usize, kind: AnimalKind) {
    let Some(def) = state.levels.get(index).cloned() else {
        warn!(index, "level_index_out_of_range");
        return;
    };
    state.tilemap = Tilemap::from_def(&def).unwrap_or_else(|error| {
        warn!(level = index + 1, %error, "level_grid_invalid_generating");
        Tilemap::generate(def.cols.max(1), def.rows.max(1))
    });
    state.level_index = index;
    state.level_name = def.name.clone();
    state.player = new_player(kind);
    state.enemies = def.enemies.iter().map(spawn_enemy).collect();
    info!(
        level = index + 1,
        name = %def.name,
        enemies = state.enemies.len(),
        "level_spawned"
    );
}
