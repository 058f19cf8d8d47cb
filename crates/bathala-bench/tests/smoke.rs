use std::fs;
use std::path::Path;

use bathala_bench::config::{ConfigError, DuelBenchConfig};
use bathala_bench::duel::{DuelRunner, RunnerError};
use tempfile::tempdir;

fn yaml(output_dir: &Path, tuning: bool) -> String {
    format!(
        r#"
run_id: "test_smoke"
duels:
  seed: 4242
  combats: 3
  max_turns: 12
  tuning: {tuning}
player:
  health: 45
  theme: balanced
creatures:
  - name: "Dwende"
    mode: fixed_actions
    health: 40
    base_damage: 8
    base_block: 6
    element: earth
    abilities: ["trickster_curse"]
  - name: "Kapre"
    archetype: elemental
    level: 4
    mode: card_subsets
    health: 50
    base_damage: 0
    base_block: 0
    element: fire
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
logging:
  enable_structured: false
"#,
        jsonl = output_dir.join("{run_id}/combats.jsonl").display(),
        summary = output_dir.join("{run_id}/summary.md").display(),
    )
}

fn load_config(output_dir: &Path, tuning: bool) -> DuelBenchConfig {
    let mut cfg: DuelBenchConfig =
        serde_yaml::from_str(&yaml(output_dir, tuning)).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

fn run_once(output_dir: &Path, tuning: bool) -> (String, String) {
    let config = load_config(output_dir, tuning);
    let outputs = config.resolved_outputs();
    let runner = DuelRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("duels complete");

    assert_eq!(summary.combats_played, 3);
    assert_eq!(summary.creatures, 2);
    assert_eq!(summary.rows_written, 6);
    assert!(summary.jsonl_path.ends_with("test_smoke/combats.jsonl"));

    let jsonl = fs::read_to_string(&summary.jsonl_path).expect("jsonl readable");
    let markdown = fs::read_to_string(&summary.summary_path).expect("summary readable");
    (jsonl, markdown)
}

#[test]
fn duel_smoke_test_is_reproducible() {
    let first = tempdir().expect("temp dir");
    let second = tempdir().expect("temp dir");
    let (jsonl_a, markdown_a) = run_once(first.path(), false);
    let (jsonl_b, markdown_b) = run_once(second.path(), false);

    assert_eq!(jsonl_a, jsonl_b, "seeded runs must replay identically");
    assert_eq!(markdown_a, markdown_b);

    let rows: Vec<serde_json::Value> = jsonl_a
        .lines()
        .map(|line| serde_json::from_str(line).expect("row decodes to JSON"))
        .collect();
    assert_eq!(rows.len(), 6);
    for (index, row) in rows.iter().enumerate() {
        assert_eq!(row["run_id"], "test_smoke");
        assert_eq!(row["combat_index"], index / 2);
        let winner = row["winner"].as_str().expect("winner label");
        assert!(winner == "player" || winner == "ai");
        let turns = row["turns"].as_u64().expect("turn count");
        assert!((1..=12).contains(&turns));
        assert_eq!(row["level"], row["level_after"], "levels stay put without tuning");
    }
    assert_eq!(rows[0]["creature"], "Dwende");
    assert_eq!(rows[0]["archetype"], "cautious");
    assert_eq!(rows[1]["creature"], "Kapre");
    assert_eq!(rows[1]["mode"], "card_subsets");
    assert_eq!(rows[1]["level"], 4);

    assert!(markdown_a.contains("| Dwende | cautious | fixed_actions | 3 |"));
    assert!(markdown_a.contains("| Kapre | elemental | card_subsets | 3 |"));
}

#[test]
fn tuning_keeps_levels_in_range() {
    let dir = tempdir().expect("temp dir");
    let (jsonl, _) = run_once(dir.path(), true);
    for line in jsonl.lines() {
        let row: serde_json::Value = serde_json::from_str(line).expect("row decodes");
        let level = row["level_after"].as_u64().expect("level");
        assert!((1..=15).contains(&level));
    }
}

#[test]
fn missing_config_file_reports_path() {
    let dir = tempdir().expect("temp dir");
    let missing = dir.path().join("absent.yaml");
    let err = DuelBenchConfig::from_path(&missing).expect_err("file does not exist");
    assert!(matches!(err, ConfigError::Read { .. }));
    assert_eq!(err.path(), missing.as_path());
}

#[test]
fn runner_rejects_unwritable_output() {
    let dir = tempdir().expect("temp dir");
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"not a directory").expect("write blocker");

    let mut config = load_config(dir.path(), false);
    config.outputs.jsonl = blocker.join("combats.jsonl").display().to_string();
    let outputs = config.resolved_outputs();
    let runner = DuelRunner::new(config, outputs).expect("runner created");
    assert!(matches!(runner.run(), Err(RunnerError::Io { .. })));
}
