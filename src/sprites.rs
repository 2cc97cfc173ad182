/// Per-kind animation frames.
///
/// Frames live at `<root>/<kind>/<kind>_<index>.<ext>` (index starts at 1).
/// Each is a small block of text art. A frame that is missing, unreadable or
/// blank is kept as `None` and drawn as a placeholder box.
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::{Roster, SPRITE_EXT};
use crate::entities::AnimalKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteFrame {
    pub lines: Vec<String>,
}

impl SpriteFrame {
    pub fn width(&self) -> usize {
        self.lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
    }
}

#[derive(Clone, Debug, Default)]
pub struct SpriteBank {
    frames: HashMap<AnimalKind, Vec<Option<SpriteFrame>>>,
}

pub fn sprite_path(root: &Path, kind: &str, index: usize, ext: &str) -> PathBuf {
    root.join(kind).join(format!("{kind}_{index}.{ext}"))
}

impl SpriteBank {
    /// Attempts every frame the roster lists for every kind.
    pub fn load(root: &Path, roster: &Roster) -> SpriteBank {
        let mut frames = HashMap::new();
        let mut missing = 0usize;
        for kind in AnimalKind::ALL {
            let count = roster.stats(kind).frames;
            let slots: Vec<Option<SpriteFrame>> = (1..=count)
                .map(|index| load_frame(&sprite_path(root, kind.name(), index, SPRITE_EXT)))
                .collect();
            missing += slots.iter().filter(|slot| slot.is_none()).count();
            frames.insert(kind, slots);
        }
        info!(root = %root.display(), missing, "sprites_loaded");
        SpriteBank { frames }
    }

    /// `None` means "draw a placeholder".
    pub fn frame(&self, kind: AnimalKind, index: usize) -> Option<&SpriteFrame> {
        let slots = self.frames.get(&kind)?;
        if slots.is_empty() {
            return None;
        }
        slots[index % slots.len()].as_ref()
    }
}

fn load_frame(path: &Path) -> Option<SpriteFrame> {
    match fs::read_to_string(path) {
        Ok(raw) => {
            let lines: Vec<String> = raw.lines().map(str::to_string).collect();
            if lines.iter().all(|line| line.trim().is_empty()) {
                warn!(path = %path.display(), "sprite_frame_blank");
                None
            } else {
                Some(SpriteFrame { lines })
            }
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "sprite_frame_missing");
            None
        }
    }
}
