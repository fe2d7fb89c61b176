//! Integration tests for the bodymap CLI.
//!
//! Every test runs the binary in its own temporary directory with the data
//! directory and config file redirected there.
//!
//! Run with: `cargo test --package bodymap-cli --test cli_integration`

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

/// Build a bodymap command isolated inside `dir`.
fn bodymap_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bodymap"));
    cmd.current_dir(dir)
        .env("BODYMAP_DATA_DIR", dir.join("data"))
        .env("BODYMAP_CONFIG", dir.join("config.json"))
        .env_remove("BODYMAP_DIAGRAM")
        .env_remove("BODYMAP_SESSION")
        .env_remove("BODYMAP_INTENSITY");
    cmd
}

/// Helper to run bodymap with given arguments.
fn run_bodymap(dir: &Path, args: &[&str]) -> Output {
    bodymap_cmd(dir)
        .args(args)
        .output()
        .expect("Failed to execute bodymap command")
}

/// Helper to run bodymap with text piped to stdin.
fn run_bodymap_with_input(dir: &Path, args: &[&str], input: &str) -> Output {
    let mut child = bodymap_cmd(dir)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn bodymap command");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_help() {
    let temp = TempDir::new().unwrap();
    let output = run_bodymap(temp.path(), &["--help"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("voice"));
    assert!(out.contains("render"));
    assert!(out.contains("repl"));
}

#[test]
fn test_regions_lists_front_view() {
    let temp = TempDir::new().unwrap();
    let output = run_bodymap(temp.path(), &["regions"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("bone_spine"));
    assert!(out.contains("muscle_brachialis_r"));
    assert!(out.contains("367,366"));
}

#[test]
fn test_verbose_logs_stay_off_stdout() {
    let temp = TempDir::new().unwrap();
    let output = run_bodymap(temp.path(), &["-v", "list", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let rows: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(rows, serde_json::json!([]));
    assert!(stderr(&output).contains("DEBUG"));
}

// ============================================================================
// Annotation Tests
// ============================================================================

#[test]
fn test_voice_save_then_list() {
    let temp = TempDir::new().unwrap();
    let output = run_bodymap(
        temp.path(),
        &["voice", "Brachialis rechts Schmerz 6/10", "--save"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Voice: Brachialis (rechts) • Intensität 6/10"));
    assert!(out.contains("Gespeichert: Brachialis (rechts) (Session 1)"));
    assert!(temp.path().join("data/bodymap_front_marks_v1.json").exists());

    let output = run_bodymap(temp.path(), &["list", "--json"]);
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["regionId"], "muscle_brachialis_r");
    assert_eq!(rows[0]["intensity"], 6);
    assert_eq!(rows[0]["note"], "Brachialis rechts Schmerz 6/10");
}

#[test]
fn test_voice_without_structure_fails() {
    let temp = TempDir::new().unwrap();
    let output = run_bodymap(temp.path(), &["voice", "irgendwas links 5/10"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Keine Struktur erkannt"));
}

#[test]
fn test_sessions_are_isolated() {
    let temp = TempDir::new().unwrap();
    let output = run_bodymap(
        temp.path(),
        &[
            "select", "bone_spine", "--session", "2", "--intensity", "3", "--note", "LWS",
            "--save",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = run_bodymap(temp.path(), &["list"]);
    assert!(stdout(&output).contains("Keine Markierungen in Session 1."));

    let output = run_bodymap(temp.path(), &["list", "--session", "2"]);
    let out = stdout(&output);
    assert!(out.contains("Wirbelsäule [bone_spine] BONE • Intensität 3/10 • LWS"));
}

#[test]
fn test_select_unknown_region_fails() {
    let temp = TempDir::new().unwrap();
    let output = run_bodymap(temp.path(), &["select", "bone_tibia"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unbekannte Region: bone_tibia"));
}

#[test]
fn test_find_and_delete() {
    let temp = TempDir::new().unwrap();
    let output = run_bodymap(temp.path(), &["find", "sciatic", "--save"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Auswahl: N. ischiadicus (rechts)"));

    let output = run_bodymap(temp.path(), &["delete", "nerve_sciatic_r"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Markierung gelöscht."));

    let output = run_bodymap(temp.path(), &["delete", "nerve_sciatic_r"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Keine Markierung vorhanden."));
}

#[test]
fn test_find_nothing_fails() {
    let temp = TempDir::new().unwrap();
    let output = run_bodymap(temp.path(), &["find", "Knie"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Keine Struktur gefunden für: knie"));
}

// ============================================================================
// Render Tests
// ============================================================================

#[test]
fn test_render_svg_to_file() {
    let temp = TempDir::new().unwrap();
    let output = run_bodymap(
        temp.path(),
        &[
            "render", "--select", "muscle_quad_l", "--intensity", "10", "--hide", "bones",
            "-o", "out/map.svg",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Output written to:"));

    let svg = std::fs::read_to_string(temp.path().join("out/map.svg")).unwrap();
    assert!(svg.contains(r#"id="muscle_quad_l" class="region muscle active""#));
    assert!(svg.contains("fill: rgba(230,193,90,0.800)"));
    assert!(svg.contains(r#"id="layer-bones" class="layer" display="none""#));
}

#[test]
fn test_render_json() {
    let temp = TempDir::new().unwrap();
    let output = run_bodymap(
        temp.path(),
        &["render", "--format", "json", "--isolate", "nerves"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let layers = value["projection"]["layers"].as_array().unwrap();
    let muscles = layers.iter().find(|l| l["layer"] == "muscles").unwrap();
    assert_eq!(muscles["dimmed"], true);
}

#[test]
fn test_render_rejects_unknown_format() {
    let temp = TempDir::new().unwrap();
    let output = run_bodymap(temp.path(), &["render", "--format", "png"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown format"));
}

// ============================================================================
// REPL Tests
// ============================================================================

#[test]
fn test_repl_script_persists() {
    let temp = TempDir::new().unwrap();
    let output = run_bodymap_with_input(
        temp.path(),
        &["repl"],
        "click muscle_trapezius\nnote Verspannung\nintensity 4\nsave\nlist\nquit\n",
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Auswahl: Trapezius (muscle)"));
    assert!(out.contains("Trapezius [muscle_trapezius] MUSCLE • Intensität 4/10 • Verspannung"));

    let output = run_bodymap(temp.path(), &["list"]);
    assert!(stdout(&output).contains("Verspannung"));
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_path_and_set() {
    let temp = TempDir::new().unwrap();
    let output = run_bodymap(temp.path(), &["config", "path"]);
    assert!(stdout(&output).contains("config.json"));

    let output = run_bodymap(temp.path(), &["config", "set", "session", "9"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = run_bodymap(temp.path(), &["config", "get", "session"]);
    assert_eq!(stdout(&output).trim(), "6");

    let output = run_bodymap(temp.path(), &["config", "get", "colour"]);
    assert!(!output.status.success());
}

#[test]
fn test_config_set_does_not_persist_env_overrides() {
    let temp = TempDir::new().unwrap();
    let output = bodymap_cmd(temp.path())
        .env("BODYMAP_INTENSITY", "9")
        .args(["config", "set", "session", "2"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let contents = std::fs::read_to_string(temp.path().join("config.json")).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(stored["default_session"], 2);
    assert_eq!(stored["default_intensity"], 6);
    let data_dir = temp.path().join("data");
    assert_ne!(stored["data_dir"], data_dir.display().to_string());
}

#[test]
fn test_env_overrides_default_session() {
    let temp = TempDir::new().unwrap();
    let output = bodymap_cmd(temp.path())
        .env("BODYMAP_SESSION", "3")
        .args(["list"])
        .output()
        .unwrap();
    assert!(stdout(&output).contains("Keine Markierungen in Session 3."));
}
