// Logical action definitions and signal mapping

/// Logical in-game actions, independent of the physical key/touch/mouse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Move,
    Jump,
    Attack,
}

/// Press or release of a logical action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEdge {
    Pressed,
    Released,
}

/// Discrete signal fed to a character's action state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionSignal {
    MoveStart,
    MoveStop,
    JumpStart,
    AttackStart,
}

impl ActionSignal {
    /// Translate an action edge into a state machine signal
    ///
    /// Releasing jump or attack carries no meaning for the simulation.
    pub fn from_edge(action: Action, edge: InputEdge) -> Option<Self> {
        match (action, edge) {
            (Action::Move, InputEdge::Pressed) => Some(Self::MoveStart),
            (Action::Move, InputEdge::Released) => Some(Self::MoveStop),
            (Action::Jump, InputEdge::Pressed) => Some(Self::JumpStart),
            (Action::Attack, InputEdge::Pressed) => Some(Self::AttackStart),
            (Action::Jump | Action::Attack, InputEdge::Released) => None,
        }
    }

    /// Signals that cancel each other out when both are pending
    pub fn opposite(&self) -> Option<Self> {
        match self {
            Self::MoveStart => Some(Self::MoveStop),
            Self::MoveStop => Some(Self::MoveStart),
            Self::JumpStart | Self::AttackStart => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_edges() {
        assert_eq!(
            ActionSignal::from_edge(Action::Move, InputEdge::Pressed),
            Some(ActionSignal::MoveStart)
        );
        assert_eq!(
            ActionSignal::from_edge(Action::Move, InputEdge::Released),
            Some(ActionSignal::MoveStop)
        );
    }

    #[test]
    fn test_release_of_one_shot_actions_is_ignored() {
        assert_eq!(ActionSignal::from_edge(Action::Jump, InputEdge::Released), None);
        assert_eq!(ActionSignal::from_edge(Action::Attack, InputEdge::Released), None);
    }

    #[test]
    fn test_opposites() {
        assert_eq!(ActionSignal::MoveStart.opposite(), Some(ActionSignal::MoveStop));
        assert_eq!(ActionSignal::JumpStart.opposite(), None);
    }
}
