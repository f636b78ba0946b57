//! evmatch CLI — driving adapter for the evmatch pattern matcher.
//!
//! Subcommands:
//! - `eval <pattern> <document> [--trace]` — match one document against one pattern
//! - `envelope <request>` or `envelope --event <file> --pattern <file>` — envelope match
//! - `check <pattern>` — validate that a pattern compiles
//!
//! Exit status: 0 on match (or a valid pattern), 1 on no match, 2 on error.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use evmatch::{Document, EnvelopeRequest, EnvelopeSchema, Pattern, Value};
use log::{debug, LevelFilter};

#[derive(Debug, Parser)]
#[command(name = "evmatch", version, about = "Match events against EventBridge-style patterns")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Match a document against a pattern
    Eval {
        /// Pattern file (JSON or YAML)
        pattern: PathBuf,
        /// Document file (JSON or YAML)
        document: PathBuf,
        /// Print the evaluation trace instead of the verdict
        #[arg(long)]
        trace: bool,
    },
    /// Match a serialized event against a serialized pattern with envelope validation
    Envelope {
        /// Request file with `Event` and `EventPattern` strings
        #[arg(required_unless_present = "event")]
        request: Option<PathBuf>,
        /// Event file, instead of a request
        #[arg(long, conflicts_with = "request", requires = "pattern")]
        event: Option<PathBuf>,
        /// Pattern file, instead of a request
        #[arg(long, conflicts_with = "request", requires = "event")]
        pattern: Option<PathBuf>,
        /// Envelope schema overriding the EventBridge defaults
        #[arg(long)]
        schema: Option<PathBuf>,
    },
    /// Validate that a pattern compiles
    Check {
        /// Pattern file (JSON or YAML)
        pattern: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .init();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn run(command: Command) -> Result<bool> {
    match command {
        Command::Eval {
            pattern,
            document,
            trace,
        } => cmd_eval(&pattern, &document, trace),
        Command::Envelope {
            request,
            event,
            pattern,
            schema,
        } => {
            let request = match (request, event, pattern) {
                (Some(path), _, _) => load_request(&path)?,
                (None, Some(event), Some(pattern)) => {
                    EnvelopeRequest::new(load_json_text(&event)?, load_json_text(&pattern)?)
                }
                _ => bail!("envelope requires a request file or both --event and --pattern"),
            };
            let schema = schema.as_deref().map(load_schema).transpose()?;
            cmd_envelope(&request, &schema.unwrap_or_default())
        }
        Command::Check { pattern } => cmd_check(&pattern),
    }
}

fn cmd_eval(pattern_path: &Path, document_path: &Path, trace: bool) -> Result<bool> {
    let pattern = load_pattern(pattern_path)?;
    let document = load_document(document_path)?;

    if trace {
        let trace = pattern.evaluate_with_trace(&document);
        print!("{trace}");
        return Ok(trace.matched());
    }

    let matched = evmatch::matches(&document, &pattern);
    println!("{}", verdict(matched));
    Ok(matched)
}

fn cmd_envelope(request: &EnvelopeRequest, schema: &EnvelopeSchema) -> Result<bool> {
    let matched = schema
        .match_envelope(request)
        .context("envelope match failed")?;
    println!("{}", verdict(matched));
    Ok(matched)
}

fn cmd_check(pattern_path: &Path) -> Result<bool> {
    let pattern = load_pattern(pattern_path)?;
    println!(
        "Pattern valid: {} entries, depth {}",
        pattern.len(),
        pattern.depth()
    );
    Ok(true)
}

fn verdict(matched: bool) -> &'static str {
    if matched {
        "match"
    } else {
        "no match"
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// File loading
// ═══════════════════════════════════════════════════════════════════════════════

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read \"{}\"", path.display()))
}

/// Load a JSON or YAML file (chosen by extension) as a JSON value.
fn load_value(path: &Path) -> Result<serde_json::Value> {
    let content = read(path)?;
    debug!("loading {}", path.display());

    if is_json(path) {
        serde_json::from_str(&content).context("JSON parse error")
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(&content).context("YAML parse error")
    }
}

/// Load a file as JSON text. JSON files pass through verbatim so the envelope
/// reports its own parse errors; YAML files are converted.
fn load_json_text(path: &Path) -> Result<String> {
    if is_json(path) {
        return read(path);
    }
    let value = load_value(path)?;
    serde_json::to_string(&value).context("failed to serialize as JSON")
}

fn load_pattern(path: &Path) -> Result<Pattern> {
    let value = load_value(path)?;
    Pattern::from_json(&value).with_context(|| format!("invalid pattern \"{}\"", path.display()))
}

fn load_document(path: &Path) -> Result<Document> {
    match Value::from(load_value(path)?) {
        Value::Object(doc) => Ok(doc),
        other => bail!(
            "document \"{}\" must be an object, found {}",
            path.display(),
            other.type_name()
        ),
    }
}

fn load_request(path: &Path) -> Result<EnvelopeRequest> {
    let value = load_value(path)?;
    serde_json::from_value(value)
        .with_context(|| format!("\"{}\" is not an envelope request", path.display()))
}

fn load_schema(path: &Path) -> Result<EnvelopeSchema> {
    let value = load_value(path)?;
    serde_json::from_value(value)
        .with_context(|| format!("\"{}\" is not an envelope schema", path.display()))
}
