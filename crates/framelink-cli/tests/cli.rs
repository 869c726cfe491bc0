use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("framelink"))
}

fn repo_root() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .and_then(|p| p.parent())
        .expect("repo root")
        .to_path_buf()
}

fn sample_capture() -> std::path::PathBuf {
    repo_root()
        .join("tests")
        .join("golden")
        .join("status")
        .join("input.jsonl")
}

fn decode_stdout(args: &[&str]) -> Value {
    let assert = cmd()
        .arg("capture")
        .arg("decode")
        .arg(sample_capture())
        .args(args)
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    serde_json::from_str(&stdout).expect("valid json")
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("capture").and(contains("config")));
    cmd()
        .arg("capture")
        .arg("decode")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--direction"));
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.jsonl");

    cmd()
        .arg("capture")
        .arg("decode")
        .arg(missing)
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn unsupported_extension_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("capture.csv");
    std::fs::write(&input, "").expect("write input");

    cmd()
        .arg("capture")
        .arg("decode")
        .arg(input)
        .assert()
        .failure()
        .stderr(contains("unsupported input format"));
}

#[test]
fn decode_outputs_status_events() {
    let report = decode_stdout(&[]);
    let events = report["events"].as_array().expect("events");
    assert_eq!(events.len(), 7);
    assert_eq!(events[0]["label"], "Header");
    assert_eq!(events[1]["label"], "Status (TX)");
    assert_eq!(report["config"]["mode"], "status");
}

#[test]
fn packet_mode_flag_aggregates() {
    let report = decode_stdout(&["--mode", "packet"]);
    let events = report["events"].as_array().expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["label"], "Packet");
    assert_eq!(events[0]["end_time"], 5.0);
}

#[test]
fn host_direction_sees_no_delimiters_in_fixture() {
    let report = decode_stdout(&["--direction", "host"]);
    assert!(report["events"].as_array().expect("events").is_empty());
}

#[test]
fn config_file_is_applied() {
    let temp = TempDir::new().expect("tempdir");
    let config = temp.path().join("decoder.json");
    std::fs::write(&config, r#"{"mode": "packet"}"#).expect("write config");

    let report = decode_stdout(&["--config", config.to_str().expect("utf8 path")]);
    assert_eq!(report["config"]["mode"], "packet");
    assert_eq!(report["event_counts"][0]["label"], "Packet");
}

#[test]
fn pretty_and_compact_conflict() {
    cmd()
        .arg("capture")
        .arg("decode")
        .arg(sample_capture())
        .arg("--pretty")
        .arg("--compact")
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn quiet_suppresses_summary() {
    cmd()
        .arg("capture")
        .arg("decode")
        .arg(sample_capture())
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("OK:").not());
}

#[test]
fn summary_lists_labels() {
    cmd()
        .arg("capture")
        .arg("decode")
        .arg(sample_capture())
        .assert()
        .success()
        .stderr(contains("OK: 7 events from 13 frames").and(contains("Status (NoAct) (1)")));
}

#[test]
fn strict_fails_on_out_of_order_frames() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("unordered.jsonl");
    std::fs::write(
        &input,
        "{\"type\":\"result\",\"data\":{\"miso\":\"3302\"},\"start_time\":2,\"end_time\":3}\n\
         {\"type\":\"result\",\"data\":{\"miso\":\"3301\"},\"start_time\":1,\"end_time\":2}\n",
    )
    .expect("write input");

    cmd()
        .arg("capture")
        .arg("decode")
        .arg(&input)
        .assert()
        .success();
    cmd()
        .arg("capture")
        .arg("decode")
        .arg(&input)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(contains("out of time order"));
}

#[test]
fn invalid_magic_override_is_reported() {
    cmd()
        .arg("capture")
        .arg("decode")
        .arg(sample_capture())
        .arg("--short-magic")
        .arg("--header-magic")
        .arg("0xCA11AB1E")
        .assert()
        .failure()
        .stderr(contains("invalid decoder configuration").and(contains("16 bits")));
}

#[test]
fn config_show_prints_effective_config() {
    let assert = cmd()
        .arg("config")
        .arg("show")
        .arg("--short-magic")
        .arg("--status-marker")
        .arg("0x44")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let config: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(config["magic_width"], "word16");
    assert_eq!(config["header_magic"], "0xCA11");
    assert_eq!(config["status_marker"], "0x44");
}

#[test]
fn config_check_accepts_golden_configs() {
    let config = repo_root()
        .join("tests")
        .join("golden")
        .join("short_form")
        .join("config.json");
    cmd()
        .arg("config")
        .arg("check")
        .arg(config)
        .assert()
        .success()
        .stderr(contains("OK:"));
}

#[test]
fn config_check_rejects_wide_marker() {
    let temp = TempDir::new().expect("tempdir");
    let config = temp.path().join("decoder.json");
    std::fs::write(&config, r#"{"status_marker": "0x1FF"}"#).expect("write config");

    cmd()
        .arg("config")
        .arg("check")
        .arg(config)
        .assert()
        .failure()
        .stderr(contains("status marker").and(contains("hint:")));
}

#[test]
fn short_magic_keeps_word16_magics_from_config() {
    let temp = TempDir::new().expect("tempdir");
    let config = temp.path().join("decoder.json");
    std::fs::write(
        &config,
        r#"{"magic_width": "word16", "header_magic": "0xAA55", "footer_magic": "0xBB66"}"#,
    )
    .expect("write config");

    let assert = cmd()
        .arg("config")
        .arg("show")
        .arg("--config")
        .arg(&config)
        .arg("--short-magic")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let shown: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(shown["magic_width"], "word16");
    assert_eq!(shown["header_magic"], "0xAA55");
    assert_eq!(shown["footer_magic"], "0xBB66");
}

#[test]
fn short_magic_replaces_word32_magics_from_config() {
    let temp = TempDir::new().expect("tempdir");
    let config = temp.path().join("decoder.json");
    std::fs::write(&config, r#"{"header_magic": "0xAA55AA55"}"#).expect("write config");

    let assert = cmd()
        .arg("config")
        .arg("show")
        .arg("--config")
        .arg(&config)
        .arg("--short-magic")
        .arg("--footer-magic")
        .arg("0xBB66")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let shown: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(shown["header_magic"], "0xCA11");
    assert_eq!(shown["footer_magic"], "0xBB66");
}
