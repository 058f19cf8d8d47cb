mod combat;

pub use combat::CombatOutcome;

use crate::config::{CreatureConfig, DuelBenchConfig, ResolvedOutputs};
use crate::report::{ReportError, SummaryCollector};
use bathala_ai::{AiError, Archetype, CandidateMode, CreatureAi, DifficultyTuner};
use bathala_core::combat::Side;
use bathala_core::eval::EvalError;
use combat::CombatSetup;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{Level, event};

const CREATURE_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Orchestrates seeded duels between the scripted player and every creature.
pub struct DuelRunner {
    config: DuelBenchConfig,
    outputs: ResolvedOutputs,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub combats_played: usize,
    pub creatures: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
}

/// One creature's persistent AI across the run.
struct Entrant<'a> {
    config: &'a CreatureConfig,
    ai: CreatureAi<StdRng>,
    tuner: Option<DifficultyTuner>,
}

impl<'a> Entrant<'a> {
    fn new(config: &'a CreatureConfig, seed: u64, tuning: bool) -> Result<Self, RunnerError> {
        let ai = CreatureAi::with_seed(config.profile(), config.ai_config(), config.level, seed)?
            .with_profile(config.archetype().template());
        let tuner = if tuning {
            Some(DifficultyTuner::new(config.level)?)
        } else {
            None
        };
        Ok(Self { config, ai, tuner })
    }
}

/// One JSONL row per creature per combat.
#[derive(Debug, Clone, Serialize)]
pub struct CombatLogRow {
    pub run_id: String,
    pub combat_id: String,
    pub combat_index: usize,
    pub creature: String,
    pub archetype: Archetype,
    pub mode: CandidateMode,
    pub level: u32,
    pub seed: u64,
    pub winner: Side,
    pub timed_out: bool,
    pub turns: u32,
    pub player_health: i32,
    pub ai_health: i32,
    pub ai_damage: u32,
    pub player_damage: u32,
    pub decisions: u32,
    pub bluffs: u32,
    pub passes: u32,
    pub adaptation_level: f32,
    pub aggression: f32,
    pub level_after: u32,
}

impl DuelRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: DuelBenchConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        // Surface bad levels before any output is touched.
        for creature in &config.creatures {
            Entrant::new(creature, 0, config.duels.tuning)?;
        }
        Ok(Self { config, outputs })
    }

    /// Play every combat, streaming JSONL rows and writing the Markdown summary.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let run_seed = self.config.duels.seed.unwrap_or(0);
        let mut rng = StdRng::seed_from_u64(run_seed);
        let mut entrants = self
            .config
            .creatures
            .iter()
            .enumerate()
            .map(|(index, creature)| {
                let seed = run_seed.wrapping_add(CREATURE_SEED_STRIDE.wrapping_mul(index as u64 + 1));
                Entrant::new(creature, seed, self.config.duels.tuning)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut summary = SummaryCollector::new(&self.config);
        let mut rows_written = 0usize;

        for combat_index in 0..self.config.duels.combats {
            let base_seed = rng.next_u64();

            for entrant in &mut entrants {
                let row = self.play_combat(combat_index, base_seed, entrant)?;
                summary.record(&row);
                serde_json::to_writer(&mut writer, &row)?;
                writer.write_all(b"\n")?;
                rows_written += 1;
            }
        }

        writer.flush()?;
        summary.finish().write_markdown(&self.outputs.summary_md)?;

        Ok(RunSummary {
            combats_played: self.config.duels.combats,
            creatures: entrants.len(),
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
        })
    }

    fn play_combat(
        &self,
        combat_index: usize,
        seed: u64,
        entrant: &mut Entrant<'_>,
    ) -> Result<CombatLogRow, RunnerError> {
        let creature = entrant.config;
        let setup = CombatSetup {
            player: &self.config.player,
            creature,
            max_turns: self.config.duels.max_turns,
            hand_size: self.config.duels.hand_size,
            seed,
        };

        entrant.ai.begin_combat();
        let level = entrant.ai.difficulty().level;
        let outcome = combat::play_combat(&mut entrant.ai, &setup)?;

        if let Some(tuner) = entrant.tuner.as_mut() {
            if let Some(change) = tuner.report_result(outcome.winner == Side::Ai) {
                entrant.ai.set_difficulty_level(change.to)?;
                event!(
                    target: "bathala_bench::tuning",
                    Level::INFO,
                    creature = %creature.name,
                    from = change.from,
                    to = change.to,
                    win_rate = change.win_rate,
                    target_win_rate = change.target,
                );
            }
        }

        let stats = entrant.ai.statistics();
        event!(
            target: "bathala_bench::combat",
            Level::INFO,
            creature = %creature.name,
            combat = combat_index,
            winner = %outcome.winner,
            turns = outcome.turns,
            bluffs = outcome.bluffs,
        );

        Ok(CombatLogRow {
            run_id: self.config.run_id.clone(),
            combat_id: format!("C{combat_index:05}"),
            combat_index,
            creature: creature.name.clone(),
            archetype: stats.archetype,
            mode: creature.mode,
            level,
            seed,
            winner: outcome.winner,
            timed_out: outcome.timed_out,
            turns: outcome.turns,
            player_health: outcome.player_health,
            ai_health: outcome.ai_health,
            ai_damage: outcome.ai_damage_dealt,
            player_damage: outcome.player_damage_dealt,
            decisions: outcome.decisions,
            bluffs: outcome.bluffs,
            passes: outcome.passes,
            adaptation_level: stats.adaptation_level,
            aggression: stats.aggression,
            level_after: stats.level,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Ai(#[from] AiError),
    #[error("player hand evaluation failed: {0}")]
    Eval(#[from] EvalError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Report(#[from] ReportError),
}
