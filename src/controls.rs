/// Clickable control strip drawn under the play area.
///
/// Left and right stay held while the mouse button is down. Jump, attack and
/// ability fire once per press.
use crate::compute::{attack, jump, use_ability};
use crate::entities::{GameState, Input};

/// Blank cells between two buttons.
pub const BUTTON_GAP: u16 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchButton {
    Left,
    Right,
    Jump,
    Attack,
    Ability,
}

impl TouchButton {
    pub const ALL: [TouchButton; 5] = [
        TouchButton::Left,
        TouchButton::Right,
        TouchButton::Jump,
        TouchButton::Attack,
        TouchButton::Ability,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TouchButton::Left => "[ < ]",
            TouchButton::Right => "[ > ]",
            TouchButton::Jump => "[ JUMP ]",
            TouchButton::Attack => "[ ATTACK ]",
            TouchButton::Ability => "[ ABILITY ]",
        }
    }
}

/// `(button, start column, width)` for every button, laid out from `left`.
pub fn layout(left: u16) -> Vec<(TouchButton, u16, u16)> {
    let mut col = left;
    TouchButton::ALL
        .iter()
        .map(|&button| {
            let width = button.label().chars().count() as u16;
            let slot = (button, col, width);
            col += width + BUTTON_GAP;
            slot
        })
        .collect()
}

/// Button under terminal column `col`, if any.
pub fn button_at(left: u16, col: u16) -> Option<TouchButton> {
    layout(left)
        .into_iter()
        .find(|&(_, start, width)| col >= start && col < start + width)
        .map(|(button, _, _)| button)
}

/// Directions held down through the strip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchState {
    pub left: bool,
    pub right: bool,
}

impl TouchState {
    pub fn press(&mut self, button: TouchButton) {
        match button {
            TouchButton::Left => self.left = true,
            TouchButton::Right => self.right = true,
            TouchButton::Jump | TouchButton::Attack | TouchButton::Ability => {}
        }
    }

    /// Any mouse-up lets go of both directions.
    pub fn release(&mut self) {
        *self = TouchState::default();
    }

    /// Keyboard and strip input combined.
    pub fn merge(self, input: Input) -> Input {
        Input {
            left: input.left || self.left,
            right: input.right || self.right,
        }
    }
}

/// One-shot effect of pressing `button`. Direction buttons change nothing
/// here; they act through `TouchState`.
pub fn press(state: &GameState, button: TouchButton) -> GameState {
    match button {
        TouchButton::Jump => jump(state),
        TouchButton::Attack => attack(state),
        TouchButton::Ability => use_ability(state),
        TouchButton::Left | TouchButton::Right => state.clone(),
    }
}
