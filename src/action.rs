use serde::{Deserialize, Serialize};
use strum::Display;

use crate::game::Input;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display, Deserialize)]
pub enum Action {
    Tick,
    Resize(u16, u16),
    Quit,
    Jump,
    Error(String),
}

impl Action {
    /// The gameplay input this action feeds into the next tick, if any.
    pub fn as_input(&self) -> Option<Input> {
        match self {
            Action::Jump => Some(Input::Jump),
            Action::Quit => Some(Input::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_as_input() {
        assert_eq!(Action::Jump.as_input(), Some(Input::Jump));
        assert_eq!(Action::Quit.as_input(), Some(Input::Quit));
        assert_eq!(Action::Tick.as_input(), None);
        assert_eq!(Action::Resize(80, 24).as_input(), None);
    }

    #[test]
    fn test_deserialize_from_binding_value() {
        let action: Action = serde_yaml::from_str("Jump").unwrap();
        assert_eq!(action, Action::Jump);
        assert_eq!(Action::Quit.to_string(), "Quit");
    }
}
