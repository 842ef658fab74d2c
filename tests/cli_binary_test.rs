//! Binary integration tests for CLI commands
//!
//! These tests run the actual karte binary to exercise the CLI code paths.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn karte_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_karte"))
}

fn config_in(temp_dir: &TempDir) -> Result<std::path::PathBuf, std::io::Error> {
    let path = temp_dir.path().join("config.json");
    let export_dir = temp_dir.path().join("exports");
    fs::write(
        &path,
        format!(
            r#"{{"export_dir": {}, "export_prefix": "test"}}"#,
            serde_json::Value::from(export_dir.display().to_string())
        ),
    )?;
    Ok(path)
}

#[test]
fn test_cli_help() -> TestResult {
    let output = karte_bin().arg("--help").output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Keyboard-driven geographic annotation"));
    Ok(())
}

#[test]
fn test_cli_version() -> TestResult {
    let output = karte_bin().arg("--version").output()?;
    assert!(output.status.success());
    Ok(())
}

#[test]
fn test_cli_invalid_argument_shows_help() -> TestResult {
    let output = karte_bin().arg("--invalid-flag").output()?;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    Ok(())
}

#[test]
fn test_cli_menu_prints_help() -> TestResult {
    let temp_dir = TempDir::new()?;
    let config = config_in(&temp_dir)?;
    let output = karte_bin().arg("menu").arg("--config").arg(&config).output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Keyboard-based menu:"));
    assert!(stdout.contains("  Enter: stop the started action"));
    assert!(stdout.contains("l: LayerSelect"));
    Ok(())
}

#[test]
fn test_cli_replay_adds_layer_and_features() -> TestResult {
    let temp_dir = TempDir::new()?;
    let config = config_in(&temp_dir)?;
    let output = karte_bin()
        .args(["replay", "i l 'geoText(wkt,POINT(1 1) POINT(2 2))' bogus"])
        .arg("--config")
        .arg(&config)
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Replayed 3 token(s), skipped 1."));
    assert!(stdout.contains("  1: 0 feature(s)"));
    assert!(stdout.contains("* 2: 2 feature(s)"));
    Ok(())
}

#[test]
fn test_cli_replay_exports_geojson() -> TestResult {
    let temp_dir = TempDir::new()?;
    let config = config_in(&temp_dir)?;
    let script = r#"'geoText(geojson,{"type":"Point","coordinates":[1,2]})' e c g"#;
    let output = karte_bin()
        .args(["replay", script])
        .arg("--config")
        .arg(&config)
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Last export:"));

    let exported: Vec<_> = fs::read_dir(temp_dir.path().join("exports"))?
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(exported.len(), 1);
    assert!(exported[0].starts_with("test-"));
    assert!(
        std::path::Path::new(&exported[0])
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("geojson"))
    );
    Ok(())
}

#[test]
fn test_cli_missing_config_fails() -> TestResult {
    let temp_dir = TempDir::new()?;
    let output = karte_bin()
        .arg("menu")
        .arg("--config")
        .arg(temp_dir.path().join("missing.json"))
        .output()?;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read config"));
    Ok(())
}
