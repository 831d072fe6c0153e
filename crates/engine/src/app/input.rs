use crate::world::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    StepUp,
    StepDown,
    StepLeft,
    StepRight,
    ToggleEditMode,
    ToggleOverlay,
    Quit,
}

const ACTION_COUNT: usize = 7;

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::StepUp => 0,
            InputAction::StepDown => 1,
            InputAction::StepLeft => 2,
            InputAction::StepRight => 3,
            InputAction::ToggleEditMode => 4,
            InputAction::ToggleOverlay => 5,
            InputAction::Quit => 6,
        }
    }

    /// Grid delta for the four step actions.
    pub fn step_delta(self) -> Option<(i32, i32)> {
        match self {
            InputAction::StepUp => Some((0, -1)),
            InputAction::StepDown => Some((0, 1)),
            InputAction::StepLeft => Some((-1, 0)),
            InputAction::StepRight => Some((1, 0)),
            _ => None,
        }
    }
}

pub(crate) const STEP_ACTIONS: [InputAction; 4] = [
    InputAction::StepUp,
    InputAction::StepDown,
    InputAction::StepLeft,
    InputAction::StepRight,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    pub(crate) fn clear(&mut self) {
        self.down = [false; ACTION_COUNT];
    }
}

/// Input gathered between two simulation ticks. Press edges fire on exactly
/// one snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    pub(crate) held: ActionStates,
    pub(crate) pressed: ActionStates,
    pub(crate) cursor_position_px: Option<Vec2>,
    pub(crate) cursor_moved: bool,
    pub(crate) left_click_pressed: bool,
    pub(crate) zoom_delta_steps: i32,
}

impl InputSnapshot {
    pub fn is_down(&self, action: InputAction) -> bool {
        self.held.is_down(action)
    }

    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.pressed.is_down(action)
    }

    pub fn cursor_position_px(&self) -> Option<Vec2> {
        self.cursor_position_px
    }

    pub fn cursor_moved(&self) -> bool {
        self.cursor_moved
    }

    pub fn left_click_pressed(&self) -> bool {
        self.left_click_pressed
    }

    pub fn zoom_delta_steps(&self) -> i32 {
        self.zoom_delta_steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_deltas_cover_the_four_directions() {
        let deltas: Vec<(i32, i32)> = STEP_ACTIONS
            .iter()
            .filter_map(|action| action.step_delta())
            .collect();
        assert_eq!(deltas, vec![(0, -1), (0, 1), (-1, 0), (1, 0)]);
        assert_eq!(InputAction::Quit.step_delta(), None);
    }

    #[test]
    fn action_states_clear_resets_everything() {
        let mut states = ActionStates::default();
        states.set(InputAction::StepLeft, true);
        states.set(InputAction::Quit, true);
        assert!(states.is_down(InputAction::StepLeft));
        states.clear();
        assert_eq!(states, ActionStates::default());
    }
}
