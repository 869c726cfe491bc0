use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use framelink_core::{DecoderConfig, decode_capture_file};

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let root = PathBuf::from("tests").join("golden");
    let entries =
        fs::read_dir(&root).map_err(|err| format!("failed to read {}: {}", root.display(), err))?;

    for entry in entries {
        let entry = entry.map_err(|err| format!("failed to read entry: {}", err))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let input = path.join("input.jsonl");
        if !input.exists() {
            continue;
        }
        let config = load_config(&path.join("config.json"))?;
        let output = path.join("expected_report.json");
        regenerate_one(&input, &config, &output)?;
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<DecoderConfig, String> {
    if !path.exists() {
        return Ok(DecoderConfig::default());
    }
    DecoderConfig::load(path).map_err(|err| format!("invalid config {}: {}", path.display(), err))
}

fn regenerate_one(input: &Path, config: &DecoderConfig, output: &Path) -> Result<(), String> {
    let mut report = decode_capture_file(input, config)
        .map_err(|err| format!("decoding failed for {}: {}", input.display(), err))?;
    report.input = None;
    let json = serde_json::to_string_pretty(&report)
        .map_err(|err| format!("JSON serialization failed: {}", err))?;
    fs::write(output, json)
        .map_err(|err| format!("failed to write {}: {}", output.display(), err))?;
    Ok(())
}
