use std::fs;
use std::path::{Path, PathBuf};

use animal_platformer::config::{Roster, SPRITE_EXT};
use animal_platformer::entities::AnimalKind;
use animal_platformer::sprites::{sprite_path, SpriteBank};

fn write_frame(root: &Path, kind: &str, index: usize, art: &str) {
    let path = sprite_path(root, kind, index, SPRITE_EXT);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, art).unwrap();
}

#[test]
fn sprite_path_follows_kind_index_pattern() {
    assert_eq!(
        sprite_path(Path::new("sprites_animais"), "macaco", 2, "png"),
        PathBuf::from("sprites_animais/macaco/macaco_2.png")
    );
}

#[test]
fn missing_frames_become_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    write_frame(dir.path(), "macaco", 1, "@o@\n/|\\\n");
    write_frame(dir.path(), "macaco", 3, "@O@\n/|\\\n");

    let bank = SpriteBank::load(dir.path(), &Roster::default());

    let first = bank.frame(AnimalKind::Macaco, 0).unwrap();
    assert_eq!(first.lines, vec!["@o@".to_string(), "/|\\".to_string()]);
    assert_eq!(first.width(), 3);
    assert!(bank.frame(AnimalKind::Macaco, 1).is_none());
    assert!(bank.frame(AnimalKind::Macaco, 2).is_some());
    assert!(bank.frame(AnimalKind::Macaco, 3).is_none());
    // Indices wrap around the frame count.
    assert!(bank.frame(AnimalKind::Macaco, 4).is_some());
}

#[test]
fn blank_frame_counts_as_missing() {
    let dir = tempfile::tempdir().unwrap();
    write_frame(dir.path(), "cobra", 1, "  \n\n");
    let bank = SpriteBank::load(dir.path(), &Roster::default());
    assert!(bank.frame(AnimalKind::Cobra, 0).is_none());
}

#[test]
fn absent_sprite_root_loads_all_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let bank = SpriteBank::load(&dir.path().join("nowhere"), &Roster::default());
    for kind in AnimalKind::ALL {
        let frames = Roster::default().stats(kind).frames;
        assert!((0..frames).all(|index| bank.frame(kind, index).is_none()));
    }
}

#[test]
fn shipped_sprites_are_complete() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/sprites");
    let roster = Roster::default();
    let bank = SpriteBank::load(&root, &roster);
    for kind in AnimalKind::ALL {
        for index in 0..roster.stats(kind).frames {
            assert!(bank.frame(kind, index).is_some(), "{kind:?} frame {index}");
        }
    }
}
