use crate::eval::MAX_HAND_CARDS;
use crate::model::card::Card;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Ai,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => f.write_str("player"),
            Side::Ai => f.write_str("ai"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombatError {
    #[error("{side} {field} must not be negative (got {value})")]
    NegativeValue {
        side: Side,
        field: &'static str,
        value: i32,
    },
    #[error("{side} max health must be positive")]
    ZeroMaxHealth { side: Side },
    #[error("{side} health {health} exceeds max health {max_health}")]
    HealthExceedsMax {
        side: Side,
        health: i32,
        max_health: i32,
    },
    #[error("turn numbers start at 1")]
    ZeroTurn,
    #[error("card pool holds {len} cards, at most {max} allowed")]
    PoolTooLarge { len: usize, max: usize },
    #[error("card {0} appears more than once in the pool")]
    DuplicateCard(Card),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantState {
    pub health: i32,
    pub max_health: i32,
    pub block: i32,
}

impl CombatantState {
    pub const fn new(health: i32, max_health: i32) -> Self {
        Self {
            health,
            max_health,
            block: 0,
        }
    }

    pub const fn full(max_health: i32) -> Self {
        Self::new(max_health, max_health)
    }

    pub const fn with_block(mut self, block: i32) -> Self {
        self.block = block;
        self
    }

    /// Remaining health in [0, 1]; zero when max health is not positive.
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }

    pub const fn is_defeated(&self) -> bool {
        self.health <= 0
    }

    fn validate(&self, side: Side) -> Result<(), CombatError> {
        for (field, value) in [("health", self.health), ("block", self.block)] {
            if value < 0 {
                return Err(CombatError::NegativeValue { side, field, value });
            }
        }
        if self.max_health <= 0 {
            return Err(CombatError::ZeroMaxHealth { side });
        }
        if self.health > self.max_health {
            return Err(CombatError::HealthExceedsMax {
                side,
                health: self.health,
                max_health: self.max_health,
            });
        }
        Ok(())
    }
}

/// Snapshot of one turn. The AI reads it and never writes back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatState {
    pub player: CombatantState,
    pub ai: CombatantState,
    pub turn: u32,
    /// Cards the AI may play this turn; empty for action-based creatures.
    #[serde(default)]
    pub ai_hand: Vec<Card>,
}

impl CombatState {
    pub fn new(player: CombatantState, ai: CombatantState, turn: u32) -> Self {
        Self {
            player,
            ai,
            turn,
            ai_hand: Vec::new(),
        }
    }

    pub fn with_hand(mut self, cards: Vec<Card>) -> Self {
        self.ai_hand = cards;
        self
    }

    pub fn validate(&self) -> Result<(), CombatError> {
        self.player.validate(Side::Player)?;
        self.ai.validate(Side::Ai)?;
        if self.turn == 0 {
            return Err(CombatError::ZeroTurn);
        }
        if self.ai_hand.len() > MAX_HAND_CARDS {
            return Err(CombatError::PoolTooLarge {
                len: self.ai_hand.len(),
                max: MAX_HAND_CARDS,
            });
        }
        let mut seen = HashSet::with_capacity(self.ai_hand.len());
        for card in &self.ai_hand {
            if !seen.insert((card.rank, card.suit)) {
                return Err(CombatError::DuplicateCard(*card));
            }
        }
        Ok(())
    }
}
