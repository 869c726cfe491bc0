use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use framelink_core::{BusDirection, DecoderConfig, MagicWidth, OutputMode, Report, parse_numeric};
use glob::glob;
use tracing::info;

mod logging;

use logging::{LogFormat, LogLevel, init_logging};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("FRAMELINK_BUILD_COMMIT"),
    " ",
    env!("FRAMELINK_BUILD_DATE"),
    ")"
);

const DECODE_EXAMPLES: &str = "Examples:\n  framelink capture decode capture.jsonl\n  framelink capture decode capture.jsonl --mode packet --pretty\n  framelink capture decode 'exports/*.jsonl' --config decoder.json --direction host";

#[derive(Parser, Debug)]
#[command(name = "framelink")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for link-layer framing in bus capture exports (header/footer/status).",
    long_about = None,
    after_help = DECODE_EXAMPLES
)]
struct Cli {
    /// Log verbosity (logs go to stderr)
    #[arg(long, value_enum, global = true, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Log line format
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on capture exports (JSON lines).
    Capture {
        #[command(subcommand)]
        command: CaptureCommands,
    },
    /// Inspect and validate decoder configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum CaptureCommands {
    /// Decode a capture export and print the JSON report to stdout.
    #[command(after_help = DECODE_EXAMPLES)]
    Decode {
        /// Path (or glob matching one file) to a .jsonl or .ndjson export
        input: PathBuf,

        #[command(flatten)]
        decoder: DecoderArgs,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress the summary line on stderr
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if frames arrived out of time order
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective decoder configuration as JSON.
    Show {
        #[command(flatten)]
        decoder: DecoderArgs,
    },
    /// Validate a JSON decoder configuration file.
    Check {
        /// Path to the config file
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct DecoderArgs {
    /// JSON decoder config file (fields default when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Which payload feeds the decoder
    #[arg(long, value_enum)]
    direction: Option<DirectionArg>,

    /// Emit individual events or whole packets
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Match 16-bit short-form magics. Magics from a word16 --config file are
    /// kept; otherwise 0xCA11/0xBA11 are used. --header-magic and
    /// --footer-magic still take precedence
    #[arg(long)]
    short_magic: bool,

    /// Header magic (decimal, 0x hex or 0b binary)
    #[arg(long, value_parser = parse_u64_arg)]
    header_magic: Option<u64>,

    /// Footer magic (decimal, 0x hex or 0b binary)
    #[arg(long, value_parser = parse_u64_arg)]
    footer_magic: Option<u64>,

    /// Status marker byte
    #[arg(long, value_parser = parse_u32_arg)]
    status_marker: Option<u32>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DirectionArg {
    Peripheral,
    Host,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ModeArg {
    Status,
    Packet,
}

impl From<DirectionArg> for BusDirection {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Peripheral => BusDirection::Peripheral,
            DirectionArg::Host => BusDirection::Host,
        }
    }
}

impl From<ModeArg> for OutputMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Status => OutputMode::Status,
            ModeArg::Packet => OutputMode::Packet,
        }
    }
}

fn parse_u64_arg(value: &str) -> Result<u64, String> {
    parse_numeric(value)
}

fn parse_u32_arg(value: &str) -> Result<u32, String> {
    let parsed = parse_numeric(value)?;
    u32::try_from(parsed).map_err(|_| format!("value '{value}' is out of range"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let result = match cli.command {
        Commands::Capture { command } => match command {
            CaptureCommands::Decode {
                input,
                decoder,
                pretty,
                compact,
                quiet,
                strict,
            } => cmd_capture_decode(input, decoder, pretty, compact, quiet, strict),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show { decoder } => cmd_config_show(decoder),
            ConfigCommands::Check { file } => cmd_config_check(file),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

impl DecoderArgs {
    fn resolve(&self) -> Result<DecoderConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => DecoderConfig::load(path).map_err(|err| {
                CliError::new(
                    format!("cannot use config {}: {}", path.display(), err),
                    Some("run `framelink config check <FILE>` for details".to_string()),
                )
            })?,
            None => DecoderConfig::default(),
        };

        if self.short_magic && config.magic_width != MagicWidth::Word16 {
            let short = DecoderConfig::short_form();
            config.magic_width = MagicWidth::Word16;
            config.header_magic = short.header_magic;
            config.footer_magic = short.footer_magic;
        }
        if let Some(value) = self.header_magic {
            config.header_magic = value;
        }
        if let Some(value) = self.footer_magic {
            config.footer_magic = value;
        }
        if let Some(value) = self.status_marker {
            config.status_marker = value;
        }
        if let Some(direction) = self.direction {
            config.direction = direction.into();
        }
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }

        config.validate().map_err(|err| {
            CliError::new(
                format!("invalid decoder configuration: {}", err),
                Some("magics must fit their width; marker and flag masks one byte".to_string()),
            )
        })?;
        Ok(config)
    }
}

fn cmd_capture_decode(
    input: PathBuf,
    decoder: DecoderArgs,
    pretty: bool,
    compact: bool,
    quiet: bool,
    strict: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let config = decoder.resolve()?;
    info!(input = %resolved_input.display(), mode = ?config.mode, "decoding capture");

    let rep = framelink_core::decode_capture_file(&resolved_input, &config)
        .context("capture decoding failed")?;
    let json = serialize_json(&rep, pretty, compact)?;
    println!("{}", json);

    if !quiet {
        print_summary(&rep);
    }
    if strict && out_of_order_frames(&rep) > 0 {
        return Err(CliError::new(
            format!(
                "{} frames arrived out of time order",
                out_of_order_frames(&rep)
            ),
            Some("sort the capture export by start_time".to_string()),
        ));
    }
    Ok(())
}

fn cmd_config_show(decoder: DecoderArgs) -> Result<(), CliError> {
    let config = decoder.resolve()?;
    let json = serialize_json(&config, true, false)?;
    println!("{}", json);
    Ok(())
}

fn cmd_config_check(file: PathBuf) -> Result<(), CliError> {
    if !file.is_file() {
        return Err(CliError::new(
            format!("config file not found: {}", file.display()),
            Some("pass a JSON decoder config file".to_string()),
        ));
    }
    DecoderConfig::load(&file).map_err(|err| {
        CliError::new(
            format!("{}: {}", file.display(), err),
            Some("see `framelink config show` for the expected fields".to_string()),
        )
    })?;
    eprintln!("OK: {} is a valid decoder config", file.display());
    Ok(())
}

fn serialize_json<T: serde::Serialize>(
    value: &T,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn out_of_order_frames(rep: &Report) -> u64 {
    rep.capture_summary
        .as_ref()
        .map(|summary| summary.out_of_order_frames)
        .unwrap_or(0)
}

fn print_summary(rep: &Report) {
    let frames = rep
        .capture_summary
        .as_ref()
        .map(|summary| summary.frames_total)
        .unwrap_or(0);
    eprintln!("OK: {} events from {} frames", rep.events.len(), frames);
    for count in &rep.event_counts {
        eprintln!("  {} ({})", count.label, count.count);
    }
    if let Some(start) = rep
        .capture_summary
        .as_ref()
        .and_then(|summary| summary.open_packet_start)
    {
        eprintln!("  packet opened at {} was not closed", start);
    }
}

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .jsonl or .ndjson capture export".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .jsonl or .ndjson capture export".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "jsonl" && ext != "ndjson" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .jsonl or .ndjson file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .jsonl or .ndjson".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single capture export, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
