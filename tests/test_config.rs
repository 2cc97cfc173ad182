use std::fs;

use animal_platformer::config::*;
use animal_platformer::entities::{AnimalKind, EnemyKind};
use animal_platformer::tilemap::TilemapError;

// ── Roster ────────────────────────────────────────────────────────────────────

#[test]
fn builtin_roster_matches_character_table() {
    let roster = Roster::default();
    let expected = [
        (AnimalKind::Macaco, 4, 3000),
        (AnimalKind::Tigre, 3, 3500),
        (AnimalKind::Papagaio, 4, 4000),
        (AnimalKind::Cobra, 4, 2500),
        (AnimalKind::Elefante, 5, 7000),
    ];
    for (kind, frames, ability_cooldown) in expected {
        assert_eq!(
            roster.stats(kind),
            CharacterStats {
                frames,
                ability_cooldown
            }
        );
    }
}

#[test]
fn roster_file_overrides_listed_kinds_only() {
    let roster = Roster::from_json_str(
        r#"{
            "tigre": { "frames": 6, "abilityCooldown": 1000 },
            "capivara": { "frames": 2, "abilityCooldown": 10 }
        }"#,
    )
    .unwrap();
    assert_eq!(
        roster.stats(AnimalKind::Tigre),
        CharacterStats {
            frames: 6,
            ability_cooldown: 1000
        }
    );
    assert_eq!(
        roster.stats(AnimalKind::Macaco),
        Roster::default().stats(AnimalKind::Macaco)
    );
}

#[test]
fn roster_parse_error_names_the_field() {
    let err = Roster::from_json_str(r#"{"macaco": {"frames": "four", "abilityCooldown": 3000}}"#)
        .unwrap_err();
    match err {
        ConfigError::Parse { at, .. } => {
            assert!(at.contains("macaco"), "{at}");
            assert!(at.contains("frames"), "{at}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn shipped_roster_file_parses() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/characters.json");
    assert_eq!(Roster::load(&path).unwrap(), Roster::default());
}

#[test]
fn missing_roster_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.json");
    match Roster::load(&path) {
        Err(ConfigError::Read { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("unexpected result: {other:?}"),
    }
}

// ── Levels ────────────────────────────────────────────────────────────────────

#[test]
fn builtin_levels_match_level_table() {
    let levels = default_levels();
    assert_eq!(levels.len(), 3);
    assert_eq!(
        levels.iter().map(|l| (l.cols, l.rows)).collect::<Vec<_>>(),
        vec![(30, 12), (40, 12), (36, 12)]
    );
    assert!(levels.iter().all(|l| l.data.is_empty()));
    assert_eq!(levels[1].enemies.len(), 2);
    assert_eq!(levels[1].enemies[1].patrol, Some([26, 30]));
    assert_eq!(levels[2].enemies[0].kind, EnemyKind::TigerBoss);
    assert_eq!(levels[2].enemies[0].patrol, None);
}

#[test]
fn levels_json_parses_authored_and_generated_levels() {
    let levels = parse_levels(
        r#"[
            {
                "name": "tiny",
                "cols": 3,
                "rows": 2,
                "data": [[0, 0, 3], [1, 1, 1]],
                "enemies": [{ "type": "cobra_inimigo", "x": 1, "y": 0 }]
            },
            { "name": "generated", "cols": 20, "rows": 10 }
        ]"#,
    )
    .unwrap();
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0].enemies[0].kind, EnemyKind::SnakeMinion);
    assert_eq!(levels[0].enemies[0].patrol, None);
    assert!(levels[1].data.is_empty());
    assert!(levels[1].enemies.is_empty());
}

#[test]
fn malformed_grid_is_rejected_with_level_index() {
    let err = parse_levels(
        r#"[
            { "name": "ok", "cols": 20, "rows": 10 },
            { "name": "bad", "cols": 3, "rows": 2, "data": [[0, 0, 0]] }
        ]"#,
    )
    .unwrap_err();
    match err {
        ConfigError::InvalidLevel {
            index,
            name,
            source,
        } => {
            assert_eq!(index, 1);
            assert_eq!(name, "bad");
            assert_eq!(
                source,
                TilemapError::RowCountMismatch {
                    expected: 2,
                    actual: 1
                }
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_enemy_type_is_a_parse_error() {
    let err = parse_levels(
        r#"[{ "name": "x", "cols": 20, "rows": 10,
              "enemies": [{ "type": "dragao", "x": 1, "y": 1 }] }]"#,
    )
    .unwrap_err();
    match err {
        ConfigError::Parse { at, .. } => assert!(at.contains("type"), "{at}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_level_list_is_rejected() {
    assert!(matches!(parse_levels("[]"), Err(ConfigError::NoLevels)));
}

#[test]
fn levels_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("levels.json");
    fs::write(&path, r#"[{ "name": "file", "cols": 12, "rows": 8 }]"#).unwrap();
    let levels = load_levels(&path).unwrap();
    assert_eq!(levels[0].name, "file");
}

// ── Paths ─────────────────────────────────────────────────────────────────────

#[test]
fn asset_paths_live_under_root() {
    let paths = AssetPaths::under("/games/zoo");
    assert_eq!(paths.root, std::path::PathBuf::from("/games/zoo"));
    assert_eq!(
        paths.characters,
        std::path::PathBuf::from("/games/zoo/assets/characters.json")
    );
    assert_eq!(
        paths.levels,
        std::path::PathBuf::from("/games/zoo/assets/levels.json")
    );
    assert_eq!(
        paths.sprites,
        std::path::PathBuf::from("/games/zoo/assets/sprites")
    );
}
