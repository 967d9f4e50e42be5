//! Implementation of the `titlefmt eval` command.

use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use clap::Args;
use miette::{IntoDiagnostic, Report, Result, miette};
use serde::Serialize;
use titlefmt::interpreter::MAX_BRANCHES;
use titlefmt::{EvalConfig, ScriptEngine, ScriptError, Track};
use tracing::debug;

use crate::commands::source::ScriptSource;
use crate::output::ScriptDiagnostic;

/// Arguments for the eval command.
#[derive(Debug, Args)]
pub struct EvalArgs {
    #[command(flatten)]
    pub source: ScriptSource,

    /// JSON file with the track's fields (strings or arrays of strings)
    #[arg(long, value_name = "FILE")]
    pub track: Option<PathBuf>,

    /// Field in name=value format; repeat a name for a multi-valued field
    #[arg(short = 'f', long = "field", value_parser = parse_key_val)]
    pub fields: Vec<(String, String)>,

    /// Join fan-out results with this separator instead of printing one per line
    #[arg(long, env = "TITLEFMT_SEPARATOR")]
    pub separator: Option<String>,

    /// Maximum number of fan-out results
    #[arg(long, default_value_t = MAX_BRANCHES)]
    pub max_branches: usize,

    /// Drop repeated results, keeping the first occurrence
    #[arg(long)]
    pub dedup: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for eval results.
#[derive(Serialize)]
struct EvalJson<'a> {
    results: Vec<String>,
    errors: &'a [ScriptError],
}

/// Parse a name=value field string.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid field format '{s}': expected name=value"))?;
    Ok((name.to_string(), value.to_string()))
}

/// Run the eval command.
pub fn run_eval(args: EvalArgs) -> Result<i32> {
    let (name, text) = args.source.load()?;
    let track = load_track(args.track.as_deref(), &args.fields)?;
    debug!(fields = track.field_names().count(), "track loaded");

    let mut config = EvalConfig::builder()
        .max_branches(args.max_branches)
        .dedup_results(args.dedup)
        .build();
    if let Some(separator) = &args.separator {
        config.result_separator.clone_from(separator);
    }

    let mut engine = ScriptEngine::builder().config(config).build();
    let script = engine.parse(&text);

    if args.json {
        let output = EvalJson {
            results: engine.evaluate_all(&script, &track),
            errors: &script.errors,
        };
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| miette!("Failed to serialize output: {}", e))?;
        println!("{json}");
        return Ok(exitcode::OK);
    }

    for error in &script.errors {
        let diagnostic = ScriptDiagnostic::from_script_error(&name, &text, error);
        eprintln!("{:?}", Report::new(diagnostic));
    }

    if args.separator.is_some() {
        engine.set_metadata(track);
        println!("{}", engine.evaluate());
    } else {
        for line in engine.evaluate_all(&script, &track) {
            println!("{line}");
        }
    }
    Ok(exitcode::OK)
}

/// Build the track from an optional JSON file plus `-f` fields. A field given
/// with `-f` replaces the file's values for that name.
fn load_track(path: Option<&Path>, fields: &[(String, String)]) -> Result<Track> {
    let mut track = match path {
        Some(path) => {
            let content = read_to_string(path)
                .into_diagnostic()
                .map_err(|e| miette!("Failed to read track file {}: {}", path.display(), e))?;
            serde_json::from_str(&content)
                .map_err(|e| miette!("Invalid track file {}: {}", path.display(), e))?
        }
        None => Track::new(),
    };

    let mut overrides: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (name, value) in fields {
        overrides.entry(name.as_str()).or_default().push(value.as_str());
    }
    for (name, values) in overrides {
        track.set_values(name, values);
    }
    Ok(track)
}
