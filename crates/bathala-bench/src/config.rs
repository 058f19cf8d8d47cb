use bathala_ai::{AiConfig, Archetype, CandidateMode, CreatureProfile};
use bathala_core::eval::MAX_HAND_CARDS;
use bathala_core::model::deck::DeckTheme;
use bathala_core::model::element::Element;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_MAX_TURNS: u32 = 30;
const DEFAULT_PLAYER_HEALTH: i32 = 60;
const DEFAULT_MIN_OBSERVATIONS: u32 = 3;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root duel configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DuelBenchConfig {
    pub run_id: String,
    pub duels: DuelConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    pub creatures: Vec<CreatureConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DuelBenchConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: DuelBenchConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.duels.validate()?;
        self.player.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        validate_creatures(&self.creatures)?;
        Ok(())
    }

    /// Resolve `{run_id}` placeholders into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }
}

/// Combat scheduling block.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DuelConfig {
    pub seed: Option<u64>,
    pub combats: usize,
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
    #[serde(default = "default_hand_size")]
    pub hand_size: usize,
    /// Let a win-rate tuner move each creature's level between combats.
    #[serde(default)]
    pub tuning: bool,
}

impl DuelConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.combats == 0 {
            return Err(invalid("duels.combats", "number of combats must be greater than zero"));
        }
        if self.max_turns == 0 {
            return Err(invalid("duels.max_turns", "turn limit must be at least 1"));
        }
        if self.hand_size == 0 || self.hand_size > MAX_HAND_CARDS {
            return Err(invalid(
                "duels.hand_size",
                format!("hand size must be between 1 and {MAX_HAND_CARDS}"),
            ));
        }
        Ok(())
    }
}

fn default_max_turns() -> u32 {
    DEFAULT_MAX_TURNS
}

fn default_hand_size() -> usize {
    MAX_HAND_CARDS
}

/// The scripted player: greedy best-subset play from a themed deck.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlayerConfig {
    #[serde(default = "default_player_health")]
    pub health: i32,
    #[serde(default)]
    pub theme: DeckTheme,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            health: DEFAULT_PLAYER_HEALTH,
            theme: DeckTheme::default(),
        }
    }
}

impl PlayerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.health <= 0 {
            return Err(invalid("player.health", "health must be positive"));
        }
        Ok(())
    }
}

fn default_player_health() -> i32 {
    DEFAULT_PLAYER_HEALTH
}

/// One AI-driven creature taking part in the run.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CreatureConfig {
    pub name: String,
    /// Overrides the roster archetype for `name`.
    #[serde(default)]
    pub archetype: Option<Archetype>,
    #[serde(default = "default_level")]
    pub level: u32,
    pub mode: CandidateMode,
    pub health: i32,
    pub base_damage: u32,
    pub base_block: u32,
    #[serde(default = "default_element")]
    pub element: Element,
    #[serde(default)]
    pub abilities: Vec<String>,
    /// Deck theme for card-holding creatures; defaults to the creature's element.
    #[serde(default)]
    pub theme: Option<DeckTheme>,
    #[serde(default = "default_bluffing")]
    pub bluffing: bool,
    #[serde(default = "default_min_observations")]
    pub min_observations: u32,
}

impl CreatureConfig {
    pub fn profile(&self) -> CreatureProfile {
        CreatureProfile::new(
            self.name.clone(),
            self.base_damage,
            self.base_block,
            self.element,
        )
        .with_abilities(self.abilities.iter().cloned())
    }

    pub fn ai_config(&self) -> AiConfig {
        AiConfig::new(self.mode)
            .with_bluffing(self.bluffing)
            .with_min_observations(self.min_observations)
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
            .unwrap_or_else(|| Archetype::for_creature(&self.name))
    }

    pub fn deck_theme(&self) -> DeckTheme {
        self.theme
            .unwrap_or_else(|| DeckTheme::for_element(self.element))
    }
}

fn default_level() -> u32 {
    1
}

fn default_element() -> Element {
    Element::Neutral
}

fn default_bluffing() -> bool {
    true
}

fn default_min_observations() -> u32 {
    DEFAULT_MIN_OBSERVATIONS
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(label, "path must not be empty"));
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(invalid(label, "resolved path is invalid"));
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(invalid("run_id", "run_id must not be empty"));
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(invalid(
            "run_id",
            "run_id may only contain alphanumeric characters, '.', '_' or '-'",
        ));
    }

    Ok(())
}

fn validate_creatures(creatures: &[CreatureConfig]) -> Result<(), ValidationError> {
    if creatures.is_empty() {
        return Err(invalid("creatures", "at least one creature must be specified"));
    }

    let mut seen = HashSet::new();
    for creature in creatures {
        if creature.name.trim().is_empty() {
            return Err(invalid("creatures.name", "creature name must not be empty"));
        }
        if !seen.insert(creature.name.clone()) {
            return Err(invalid(
                "creatures",
                format!("creature '{}' defined more than once", creature.name),
            ));
        }

        let field = |suffix: &str| format!("creatures[{}].{suffix}", creature.name);
        if creature.level == 0 {
            return Err(invalid(field("level"), "difficulty level starts at 1"));
        }
        if creature.health <= 0 {
            return Err(invalid(field("health"), "health must be positive"));
        }
        if creature.mode == CandidateMode::FixedActions
            && creature.base_damage == 0
            && creature.base_block == 0
        {
            return Err(invalid(
                field("base_damage"),
                "action-based creatures need damage or block",
            ));
        }
    }

    Ok(())
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidField {
        field: field.into(),
        message: message.into(),
    }
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
