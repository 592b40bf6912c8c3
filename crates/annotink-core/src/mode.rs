//! Interaction mode state machine.

use serde::{Deserialize, Serialize};

/// Which gesture classes the engine currently accepts.
///
/// Exactly one mode is active at any time and transitions complete
/// synchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Select, move and resize existing shapes.
    #[default]
    Edit,
    /// Construct new shapes from pointer gestures.
    Create,
    /// All interaction disabled.
    None,
}

impl InteractionMode {
    pub fn accepts_creation(self) -> bool {
        matches!(self, InteractionMode::Create)
    }

    pub fn accepts_selection(self) -> bool {
        matches!(self, InteractionMode::Edit)
    }
}

/// Holds the current [`InteractionMode`].
///
/// Side effects of a transition (draft discard, selection clearing) are
/// applied by the engine around the call, so they happen in a well-defined
/// order relative to event emission.
#[derive(Debug, Clone, Default)]
pub struct ModeController {
    current: InteractionMode,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> InteractionMode {
        self.current
    }

    /// Transition to `mode`. Returns the new mode on a real transition,
    /// `None` when the mode is unchanged (no event should fire).
    pub fn set(&mut self, mode: InteractionMode) -> Option<InteractionMode> {
        if mode == self.current {
            return None;
        }
        log::debug!("mode: {:?} -> {:?}", self.current, mode);
        self.current = mode;
        Some(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_reports_new_mode() {
        let mut controller = ModeController::new();
        assert_eq!(controller.current(), InteractionMode::Edit);
        assert_eq!(
            controller.set(InteractionMode::Create),
            Some(InteractionMode::Create)
        );
        assert_eq!(controller.current(), InteractionMode::Create);
    }

    #[test]
    fn test_same_mode_is_a_no_op() {
        let mut controller = ModeController::new();
        assert_eq!(controller.set(InteractionMode::Edit), None);
    }

    #[test]
    fn test_gating() {
        assert!(InteractionMode::Create.accepts_creation());
        assert!(!InteractionMode::Create.accepts_selection());
        assert!(InteractionMode::Edit.accepts_selection());
        assert!(!InteractionMode::None.accepts_creation());
        assert!(!InteractionMode::None.accepts_selection());
    }
}
