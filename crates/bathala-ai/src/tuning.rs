use crate::difficulty::{DifficultyScaler, interpolate};
use crate::error::Result;
use serde::Serialize;
use std::collections::VecDeque;

pub const RESULT_WINDOW: usize = 10;
pub const MIN_RESULTS: usize = 5;
pub const WIN_RATE_TOLERANCE: f32 = 0.15;
pub const MAX_LEVEL: u32 = 15;
pub const MIN_LEVEL: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelChange {
    pub from: u32,
    pub to: u32,
    pub win_rate: f32,
    pub target: f32,
}

/// Nudges the level so the AI's recent win rate tracks the level's target.
///
/// The window keeps rolling across level changes.
#[derive(Debug, Clone)]
pub struct DifficultyTuner {
    level: u32,
    window: VecDeque<bool>,
}

impl DifficultyTuner {
    pub fn new(level: u32) -> Result<Self> {
        DifficultyScaler::profile(level)?;
        Ok(Self {
            level: level.min(MAX_LEVEL),
            window: VecDeque::with_capacity(RESULT_WINDOW),
        })
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn results(&self) -> usize {
        self.window.len()
    }

    pub fn win_rate(&self) -> Option<f32> {
        if self.window.is_empty() {
            return None;
        }
        let wins = self.window.iter().filter(|won| **won).count();
        Some(wins as f32 / self.window.len() as f32)
    }

    /// Records one finished combat and returns the level change, if any.
    pub fn report_result(&mut self, ai_won: bool) -> Option<LevelChange> {
        self.window.push_back(ai_won);
        while self.window.len() > RESULT_WINDOW {
            self.window.pop_front();
        }
        if self.window.len() < MIN_RESULTS {
            return None;
        }

        let win_rate = self.win_rate()?;
        let target = interpolate(self.level).target_win_rate;
        let to = if win_rate > target + WIN_RATE_TOLERANCE {
            (self.level + 1).min(MAX_LEVEL)
        } else if win_rate < target - WIN_RATE_TOLERANCE {
            self.level.saturating_sub(1).max(MIN_LEVEL)
        } else {
            self.level
        };
        if to == self.level {
            return None;
        }

        let change = LevelChange {
            from: self.level,
            to,
            win_rate,
            target,
        };
        self.level = to;
        Some(change)
    }
}
