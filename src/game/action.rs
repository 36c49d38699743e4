/// Action that can be taken in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Action {
    /// Let gravity act
    #[default]
    Idle,
    /// Flap upwards
    Jump,
}

impl Action {
    /// Number of discrete actions
    pub const COUNT: usize = 2;

    /// All actions, ordered by index
    pub const ALL: [Action; Action::COUNT] = [Action::Idle, Action::Jump];

    /// Convert a discrete index to an action
    ///
    /// - 1 → Jump
    /// - anything else → Idle
    pub fn from_index(idx: usize) -> Self {
        match idx {
            1 => Action::Jump,
            _ => Action::Idle,
        }
    }

    /// Index of this action in the value table
    pub fn index(self) -> usize {
        match self {
            Action::Idle => 0,
            Action::Jump => 1,
        }
    }

    pub fn is_jump(self) -> bool {
        self == Action::Jump
    }
}

impl From<bool> for Action {
    fn from(jump: bool) -> Self {
        if jump {
            Action::Jump
        } else {
            Action::Idle
        }
    }
}
