use animal_platformer::compute::damage_player;
use animal_platformer::config::*;
use animal_platformer::entities::*;
use animal_platformer::level::*;

fn menu() -> GameState {
    new_game(default_levels(), Roster::default())
}

fn complete(state: &GameState) -> GameState {
    let mut next = state.clone();
    assert!(mark_level_complete(&mut next));
    next
}

// ── new_game / start_game ─────────────────────────────────────────────────────

#[test]
fn new_game_waits_on_menu_with_first_level_loaded() {
    let s = menu();
    assert_eq!(s.status, GameStatus::Menu);
    assert_eq!(s.level_index, 0);
    assert_eq!(s.level_name, "Fase 1 - Clareira");
    assert_eq!((s.tilemap.cols(), s.tilemap.rows()), (30, 12));
    assert_eq!(enemies_left(&s), 1);
    assert_eq!(s.clock_ms, 0);
}

#[test]
fn empty_level_list_falls_back_to_builtin_levels() {
    let s = new_game(Vec::new(), Roster::default());
    assert_eq!(s.levels.len(), 3);
    assert_eq!(s.level_name, default_levels()[0].name);
}

#[test]
fn start_game_spawns_chosen_animal() {
    let s = start_game(&menu(), AnimalKind::Elefante);
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.player.kind, AnimalKind::Elefante);
    assert_eq!((s.player.body.x, s.player.body.y), PLAYER_START);
    assert_eq!(s.player.health, PLAYER_HEALTH);
    assert!(s.player.ability_ready);
}

#[test]
fn start_game_is_ignored_outside_menu() {
    let s = start_game(&menu(), AnimalKind::Cobra);
    let again = start_game(&s, AnimalKind::Tigre);
    assert_eq!(again.player.kind, AnimalKind::Cobra);
}

// ── Transitions ───────────────────────────────────────────────────────────────

#[test]
fn completion_and_defeat_only_fire_while_playing() {
    let mut s = menu();
    assert!(!mark_level_complete(&mut s));
    assert!(!mark_player_defeated(&mut s));
    assert_eq!(s.status, GameStatus::Menu);

    let mut s = start_game(&s, AnimalKind::Macaco);
    assert!(mark_player_defeated(&mut s));
    assert!(!mark_player_defeated(&mut s));
    assert!(!mark_level_complete(&mut s));
    assert_eq!(s.status, GameStatus::GameOver);
}

#[test]
fn acknowledging_completion_loads_next_level() {
    let s = start_game(&menu(), AnimalKind::Papagaio);
    let s = acknowledge(&complete(&s));
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.level_index, 1);
    assert_eq!(s.level_name, "Fase 2 - Lama e Troncos");
    assert_eq!(s.tilemap.cols(), 40);
    assert_eq!(enemies_left(&s), 2);
    assert_eq!(s.player.kind, AnimalKind::Papagaio);
}

#[test]
fn new_level_resets_player() {
    let mut s = start_game(&menu(), AnimalKind::Macaco);
    damage_player(&mut s.player, 40);
    s.player.body.x = 900.0;
    let s = acknowledge(&complete(&s));
    assert_eq!(s.player.health, PLAYER_HEALTH);
    assert_eq!(s.player.body.x, PLAYER_START.0);
}

#[test]
fn finishing_last_level_shows_all_cleared_then_menu() {
    let mut s = start_game(&menu(), AnimalKind::Tigre);
    for expected in 1..3 {
        s = acknowledge(&complete(&s));
        assert_eq!(s.level_index, expected);
    }
    assert_eq!(s.enemies[0].kind, EnemyKind::TigerBoss);
    assert_eq!(s.enemies[0].health, BOSS_HEALTH);

    let s = acknowledge(&complete(&s));
    assert_eq!(s.status, GameStatus::AllCleared);
    assert_eq!(s.level_index, 2);

    let s = acknowledge(&s);
    assert_eq!(s.status, GameStatus::Menu);
    assert_eq!(s.level_index, 0);
}

#[test]
fn acknowledging_game_over_returns_to_menu_on_first_level() {
    let mut s = start_game(&menu(), AnimalKind::Macaco);
    s = acknowledge(&complete(&s));
    assert!(mark_player_defeated(&mut s));

    let s = acknowledge(&s);
    assert_eq!(s.status, GameStatus::Menu);
    assert_eq!(s.level_index, 0);
    assert_eq!(s.player.health, PLAYER_HEALTH);
    assert_eq!(enemies_left(&s), 1);
}

#[test]
fn acknowledge_does_nothing_while_playing_or_on_menu() {
    let s = start_game(&menu(), AnimalKind::Macaco);
    assert_eq!(acknowledge(&s).status, GameStatus::Playing);
    assert_eq!(acknowledge(&menu()).status, GameStatus::Menu);
}

#[test]
fn enemies_left_ignores_dead_enemies() {
    let mut s = start_game(&menu(), AnimalKind::Macaco);
    assert_eq!(enemies_left(&s), 1);
    s.enemies[0].dead = true;
    assert_eq!(enemies_left(&s), 0);
}
