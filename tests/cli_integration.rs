//! Testes de integração para a CLI do metalca.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const EXAMPLE_PROJECT: &str = r#"{
    "projectName": "Foundry A",
    "stages": [
        {"name": "Mining", "energyUsage": 25, "waterUsage": 2.5, "wasteGenerated": 8.0},
        {"name": "Smelting", "energyUsage": 35, "waterUsage": 4.2, "wasteGenerated": 1.5}
    ],
    "overallData": {"recyclePercentage": 25, "reusePercentage": 10, "landfillPercentage": 65}
}"#;

/// Binário com uma configuração isolada no diretório temporário.
fn metalca(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("metalca").expect("binary is built");
    cmd.current_dir(dir.path())
        .arg("-c")
        .arg(dir.path().join("metalca.toml"));
    cmd
}

fn write_input(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn test_version_command() {
    let dir = TempDir::new().unwrap();
    metalca(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("metalca"));
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    metalca(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("serve"))
                .and(predicate::str::contains("score"))
                .and(predicate::str::contains("simulate")),
        );
}

#[test]
fn test_init_writes_config() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("project");

    metalca(&dir)
        .arg("init")
        .arg("--path")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("metalca.toml"));

    let content = std::fs::read_to_string(target.join("metalca.toml")).unwrap();
    assert!(content.contains("[cache]"));
    assert!(content.contains("max_size = 100"));
}

#[test]
fn test_score_command() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "project.json", EXAMPLE_PROJECT);

    let output = metalca(&dir)
        .arg("score")
        .arg("--input")
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());
    let scores = stdout_json(&output);
    assert_eq!(scores["sustainabilityScore"], 72);
    assert_eq!(scores["circularScore"], 87);
    assert_eq!(scores["linearScore"], 66);
    assert_eq!(scores["optimizationGains"]["circularGain"], 15);
}

#[test]
fn test_score_from_stdin() {
    let dir = TempDir::new().unwrap();

    let output = metalca(&dir)
        .args(["score", "--input", "-"])
        .write_stdin(EXAMPLE_PROJECT)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["sustainabilityScore"], 72);
}

#[test]
fn test_stages_command() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "project.json", EXAMPLE_PROJECT);

    let output = metalca(&dir)
        .arg("stages")
        .arg("--input")
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stages = stdout_json(&output);
    let stages = stages.as_array().unwrap();
    assert_eq!(stages.len(), 2);
    assert_eq!(stages[1]["name"], "Smelting");
    assert!(stages[0]["optimizationPotential"]["priority"].is_string());
}

#[test]
fn test_analyze_command_with_prediction() {
    let dir = TempDir::new().unwrap();
    let project = EXAMPLE_PROJECT.replace(
        r#""recyclePercentage": 25,"#,
        r#""metalType": "Copper", "productionRoute": "Secondary", "region": "Chile", "recyclePercentage": 25,"#,
    );
    let input = write_input(&dir, "project.json", &project);

    let output = metalca(&dir)
        .arg("analyze")
        .arg("--input")
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());
    let analysis = stdout_json(&output);
    assert_eq!(analysis["projectName"], "Foundry A");
    assert_eq!(analysis["scores"]["sustainabilityScore"], 72);
    assert!(analysis["prediction"]["predictions"]["sustainability_score"].is_number());
}

#[test]
fn test_predict_command() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "input.json",
        r#"{"metal_type": "Aluminum", "production_route": "Primary", "region": "Europe",
            "total_energy": 40, "total_water": 10, "recycling_rate": 30, "process_efficiency": 80}"#,
    );

    let output = metalca(&dir)
        .arg("predict")
        .arg("--input")
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());
    let prediction = stdout_json(&output);
    assert_eq!(prediction["predictions"]["sustainability_score"], 85.0);
    assert_eq!(prediction["model_info"]["version"], "1.0-fallback");
}

#[test]
fn test_predict_rejects_invalid_metal() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "input.json",
        r#"{"metal_type": "Gold", "production_route": "Primary", "region": "Europe"}"#,
    );

    metalca(&dir)
        .arg("predict")
        .arg("--input")
        .arg(&input)
        .assert()
        .failure();
}

#[test]
fn test_simulate_command() {
    let dir = TempDir::new().unwrap();
    let request = EXAMPLE_PROJECT.trim_end().trim_end_matches('}').to_string()
        + r#", "adjustments": {"energyReduction": 50}}"#;
    let input = write_input(&dir, "scenario.json", &request);

    let output = metalca(&dir)
        .arg("simulate")
        .arg("--input")
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());
    let outcome = stdout_json(&output);
    assert_eq!(outcome["baseline"]["sustainabilityScore"], 72);
    assert_eq!(outcome["scenario"]["sustainabilityScore"], 84);
    assert_eq!(outcome["deltas"]["sustainability"], 12);
}

#[test]
fn test_missing_input_file_fails() {
    let dir = TempDir::new().unwrap();
    metalca(&dir)
        .args(["score", "--input", "does-not-exist.json"])
        .assert()
        .failure();
}

#[test]
fn test_serve_over_stdio() {
    let dir = TempDir::new().unwrap();
    let session = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"initialized"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        "\n"
    );

    let output = metalca(&dir)
        .arg("serve")
        .write_stdin(session)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let responses: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "metalca");
    assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 8);
}
