use animal_platformer::config::{default_levels, Roster};
use animal_platformer::entities::*;
use animal_platformer::level::new_game;

#[test]
fn cell_codes_decode() {
    let decoded: Vec<Cell> = (0..4).map(Cell::from_code).collect();
    assert_eq!(
        decoded,
        vec![Cell::Empty, Cell::Solid, Cell::Hazard, Cell::Goal]
    );
    assert_eq!(Cell::from_code(42), Cell::Empty);
}

#[test]
fn animal_names_round_trip_and_reject_unknown() {
    for kind in AnimalKind::ALL {
        assert_eq!(AnimalKind::from_name(kind.name()), Some(kind));
    }
    assert_eq!(AnimalKind::from_name("capivara"), None);
}

#[test]
fn rect_overlap_is_strict() {
    let a = Rect { x: 0.0, y: 0.0, w: 10.0, h: 10.0 };
    let touching = Rect { x: 10.0, y: 0.0, w: 5.0, h: 5.0 };
    let overlapping = Rect { x: 9.0, y: 9.0, w: 5.0, h: 5.0 };
    assert!(!a.intersects(&touching));
    assert!(a.intersects(&overlapping));
    assert!(a.contains_point((5.0, 5.0)));
    assert!(!a.contains_point((10.0, 5.0)));
    assert_eq!(a.center(), (5.0, 5.0));
}

#[test]
fn facing_sign() {
    assert_eq!(Facing::Left.sign(), -1.0);
    assert_eq!(Facing::Right.sign(), 1.0);
}

#[test]
fn game_state_clone_is_independent() {
    let original = new_game(default_levels(), Roster::default());
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.player.body.x = 999.0;
    cloned.player.health = 1;
    cloned.enemies.clear();

    assert_eq!(original.player.body.x, 80.0);
    assert_eq!(original.player.health, 100);
    assert_eq!(original.enemies.len(), 1);
}
