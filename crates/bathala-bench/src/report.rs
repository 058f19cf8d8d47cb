use std::collections::HashMap;
use std::fs;
use std::path::Path;

use bathala_ai::{Archetype, CandidateMode};
use bathala_core::combat::Side;
use serde::Serialize;
use thiserror::Error;

use crate::config::DuelBenchConfig;
use crate::duel::CombatLogRow;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Folds combat rows into per-creature aggregates.
pub struct SummaryCollector {
    run_id: String,
    creatures: HashMap<String, CreatureAccumulator>,
    order: Vec<String>,
}

#[derive(Default)]
struct CreatureAccumulator {
    archetype: Option<Archetype>,
    mode: Option<CandidateMode>,
    combats: usize,
    wins: usize,
    timeouts: usize,
    turns: u64,
    ai_damage: u64,
    player_damage: u64,
    decisions: u64,
    bluffs: u64,
    passes: u64,
    final_level: u32,
    adaptation_level: f32,
}

impl SummaryCollector {
    pub fn new(config: &DuelBenchConfig) -> Self {
        let mut creatures = HashMap::new();
        let mut order = Vec::new();
        for creature in &config.creatures {
            creatures.insert(
                creature.name.clone(),
                CreatureAccumulator {
                    archetype: Some(creature.archetype()),
                    mode: Some(creature.mode),
                    final_level: creature.level,
                    ..CreatureAccumulator::default()
                },
            );
            order.push(creature.name.clone());
        }
        Self {
            run_id: config.run_id.clone(),
            creatures,
            order,
        }
    }

    pub fn record(&mut self, row: &CombatLogRow) {
        if !self.creatures.contains_key(&row.creature) {
            self.order.push(row.creature.clone());
        }
        let acc = self.creatures.entry(row.creature.clone()).or_default();
        acc.archetype = Some(row.archetype);
        acc.mode = Some(row.mode);
        acc.combats += 1;
        acc.wins += usize::from(row.winner == Side::Ai);
        acc.timeouts += usize::from(row.timed_out);
        acc.turns += u64::from(row.turns);
        acc.ai_damage += u64::from(row.ai_damage);
        acc.player_damage += u64::from(row.player_damage);
        acc.decisions += u64::from(row.decisions);
        acc.bluffs += u64::from(row.bluffs);
        acc.passes += u64::from(row.passes);
        acc.final_level = row.level_after;
        acc.adaptation_level = row.adaptation_level;
    }

    pub fn finish(self) -> DuelSummary {
        let mut creatures = self.creatures;
        let rows = self
            .order
            .iter()
            .filter_map(|name| creatures.remove(name).map(|acc| acc.finish(name)))
            .collect();
        DuelSummary {
            run_id: self.run_id,
            creatures: rows,
        }
    }
}

impl CreatureAccumulator {
    fn finish(self, name: &str) -> CreatureSummary {
        let per_combat = |total: u64| {
            if self.combats == 0 {
                0.0
            } else {
                total as f64 / self.combats as f64
            }
        };
        CreatureSummary {
            name: name.to_string(),
            archetype: self.archetype.unwrap_or(Archetype::Calculating),
            mode: self.mode.unwrap_or(CandidateMode::FixedActions),
            combats: self.combats,
            win_rate: if self.combats == 0 {
                0.0
            } else {
                self.wins as f64 / self.combats as f64
            },
            timeouts: self.timeouts,
            avg_turns: per_combat(self.turns),
            avg_ai_damage: per_combat(self.ai_damage),
            avg_player_damage: per_combat(self.player_damage),
            bluff_rate: if self.decisions == 0 {
                0.0
            } else {
                self.bluffs as f64 / self.decisions as f64
            },
            passes: self.passes,
            final_level: self.final_level,
            adaptation_level: self.adaptation_level,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DuelSummary {
    pub run_id: String,
    pub creatures: Vec<CreatureSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatureSummary {
    pub name: String,
    pub archetype: Archetype,
    pub mode: CandidateMode,
    pub combats: usize,
    pub win_rate: f64,
    pub timeouts: usize,
    pub avg_turns: f64,
    pub avg_ai_damage: f64,
    pub avg_player_damage: f64,
    pub bluff_rate: f64,
    pub passes: u64,
    pub final_level: u32,
    pub adaptation_level: f32,
}

impl DuelSummary {
    pub fn render_markdown(&self) -> String {
        let mut rows = String::new();
        rows.push_str("# Duel Summary\n\n");
        rows.push_str(&format!("Run: `{}`\n\n", self.run_id));
        rows.push_str("| Creature | Archetype | Mode | Combats | AI Win % | Timeouts | Avg Turns | Avg AI Dmg | Avg Player Dmg | Bluff % | Passes | Final Level | Adaptation |\n");
        rows.push_str("|----------|-----------|------|---------|----------|----------|-----------|------------|----------------|---------|--------|-------------|------------|\n");

        for creature in &self.creatures {
            rows.push_str(&format!(
                "| {name} | {archetype} | {mode} | {combats} | {win:.1}% | {timeouts} | {turns:.2} | {ai_dmg:.2} | {player_dmg:.2} | {bluff:.1}% | {passes} | {level} | {adaptation:.1} |\n",
                name = creature.name,
                archetype = creature.archetype,
                mode = creature.mode,
                combats = creature.combats,
                win = creature.win_rate * 100.0,
                timeouts = creature.timeouts,
                turns = creature.avg_turns,
                ai_dmg = creature.avg_ai_damage,
                player_dmg = creature.avg_player_damage,
                bluff = creature.bluff_rate * 100.0,
                passes = creature.passes,
                level = creature.final_level,
                adaptation = creature.adaptation_level,
            ));
        }
        rows
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        fs::write(path.as_ref(), self.render_markdown()).map_err(|source| ReportError::Io {
            context: "writing summary markdown",
            source,
        })
    }
}
