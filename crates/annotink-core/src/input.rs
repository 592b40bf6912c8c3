//! Gesture and keyboard input types.
//!
//! Pointer gestures arrive from the rendering collaborator already phased
//! and in shape-space coordinates. Key identifiers are a configuration
//! contract with the host: the [`Keymap`] translates them into engine
//! commands and can be rebound without changing engine semantics.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A phased pointer gesture in shape-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Gesture {
    Begin { pos: Point },
    Move { pos: Point },
    End { pos: Point },
}

impl Gesture {
    pub fn pos(self) -> Point {
        match self {
            Gesture::Begin { pos } | Gesture::Move { pos } | Gesture::End { pos } => pos,
        }
    }
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };
}

/// Direction of cyclic keyboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Forward,
    Backward,
}

/// High-level commands the keyboard surface can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    NavigateForward,
    NavigateBackward,
    DeleteSelection,
    ClearSelection,
    SelectAll,
}

/// A key identifier plus the modifiers that must be held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub key: String,
    pub shift: bool,
    pub ctrl: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>, shift: bool, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            shift,
            ctrl,
        }
    }

    fn matches(&self, key: &str, modifiers: Modifiers) -> bool {
        self.key == key && self.shift == modifiers.shift && self.ctrl == modifiers.ctrl
    }
}

/// Host-configurable key-to-command table.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<(KeyChord, EngineCommand)>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            bindings: vec![
                (KeyChord::new("Tab", false, false), EngineCommand::NavigateForward),
                (KeyChord::new("Tab", true, false), EngineCommand::NavigateBackward),
                (KeyChord::new("Delete", false, false), EngineCommand::DeleteSelection),
                (KeyChord::new("Backspace", false, false), EngineCommand::DeleteSelection),
                (KeyChord::new("Escape", false, false), EngineCommand::ClearSelection),
                (KeyChord::new("A", false, true), EngineCommand::SelectAll),
            ],
        }
    }
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an empty table, for hosts that define every binding.
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Bind a chord to a command, replacing any existing binding for the
    /// same chord.
    pub fn bind(&mut self, chord: KeyChord, command: EngineCommand) {
        self.bindings.retain(|(existing, _)| *existing != chord);
        self.bindings.push((chord, command));
    }

    /// Resolve a key press to a command, if bound.
    pub fn resolve(&self, key: &str, modifiers: Modifiers) -> Option<EngineCommand> {
        self.bindings
            .iter()
            .find(|(chord, _)| chord.matches(key, modifiers))
            .map(|(_, command)| *command)
    }
}
