use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Moves available to creatures that fight without cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedAction {
    Attack,
    Defend,
    Status,
}

impl FixedAction {
    pub const ALL: [FixedAction; 3] = [FixedAction::Attack, FixedAction::Defend, FixedAction::Status];

    /// Share of the move that goes into hurting the opponent.
    pub const fn aggression(self) -> f32 {
        match self {
            FixedAction::Attack => 1.0,
            FixedAction::Status => 0.5,
            FixedAction::Defend => 0.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            FixedAction::Attack => "attack",
            FixedAction::Defend => "defend",
            FixedAction::Status => "status",
        }
    }
}

impl fmt::Display for FixedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FixedAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attack" => Ok(FixedAction::Attack),
            "defend" => Ok(FixedAction::Defend),
            "status" => Ok(FixedAction::Status),
            other => Err(format!("unknown action '{other}'")),
        }
    }
}
