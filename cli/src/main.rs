//! `shapeshift learn`: observe a batch of JSON files and emit a Python type
//! declaration module.
//!
//! Grounded on `original_source/src/slow_learner/cli.py`'s `learn` command
//! (its output-file / input-paths / already-exists short-circuits), with
//! the teacher's `cli/src/main.rs` contributing the clap-derive-plus-
//! `anyhow::Result` main-function shape and `indicatif` as this command's
//! progress bar, the Rust analogue of the Python CLI's `tqdm`.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use shapeshift_core::{Learner, LearnerConfig};
use shapeshift_emit::{write_type_definitions, PythonTarget};
use tracing::warn;

/// Learn a Python type declaration from a stream of JSON values.
#[derive(Parser, Debug)]
#[command(name = "shapeshift", version, about)]
struct Cli {
    /// JSON input files to observe, one value per file.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file; defaults to `<type-name>.py`.
    #[arg(long)]
    output_file: Option<PathBuf>,

    /// Name of the root type to generate.
    #[arg(long, default_value = "LearntType")]
    type_name: String,

    /// Union-wide literal cap; 0 disables literal inference.
    #[arg(long, default_value_t = LearnerConfig::default().max_literal_fan)]
    max_literal_fan: usize,

    /// Strings longer than this are never turned into literals.
    #[arg(long, default_value_t = LearnerConfig::default().max_literal_string_length)]
    max_literal_string_length: usize,

    /// Disable inferring `TypedDict`-shaped records for string-keyed objects.
    #[arg(long)]
    no_records: bool,

    /// Record-to-mapping demotion threshold.
    #[arg(long, default_value_t = LearnerConfig::default().max_record_fields)]
    max_record_fields: usize,

    /// Observer recursion cutoff.
    #[arg(long, default_value_t = LearnerConfig::default().max_depth)]
    max_depth: usize,

    /// Regex matched against an observed value's JSON path; a match
    /// suppresses literal inference at that site. May be repeated.
    #[arg(long = "no-literal-pattern")]
    no_literal_patterns: Vec<String>,

    /// Target Python version for the generated module.
    #[arg(long, value_enum, default_value = "py38")]
    python_target: PythonTargetArg,

    /// Treat each input file as a homogeneous sequence: a top-level JSON
    /// array is iterated element-by-element (one `observe` call per
    /// element) instead of observed as a single array value.
    #[arg(long)]
    spread: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum PythonTargetArg {
    Py38,
    Py39,
    Py310,
    Py311,
}

impl From<PythonTargetArg> for PythonTarget {
    fn from(value: PythonTargetArg) -> Self {
        match value {
            PythonTargetArg::Py38 => PythonTarget::Py38,
            PythonTargetArg::Py39 => PythonTarget::Py39,
            PythonTargetArg::Py310 => PythonTarget::Py310,
            PythonTargetArg::Py311 => PythonTarget::Py311,
        }
    }
}

const PATHS_IN_DOC: usize = 10;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let output_path = cli
        .output_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.py", cli.type_name)));
    if output_path.exists() {
        anyhow::bail!("output file already exists: {}", output_path.display());
    }

    let missing: Vec<&PathBuf> = cli.inputs.iter().filter(|p| !p.exists()).collect();
    if !missing.is_empty() {
        anyhow::bail!("some input paths are missing: {missing:?}");
    }

    let config = LearnerConfig::default()
        .with_no_literal_patterns(cli.no_literal_patterns.clone())
        .context("invalid --no-literal-pattern")?;
    let config = LearnerConfig {
        max_literal_fan: cli.max_literal_fan,
        max_literal_string_length: cli.max_literal_string_length,
        learn_records: !cli.no_records,
        max_record_fields: cli.max_record_fields,
        max_depth: cli.max_depth,
        ..config
    };

    let mut learner = Learner::new(config);

    let progress = ProgressBar::new(cli.inputs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    for input_path in &cli.inputs {
        let text = fs::read_to_string(input_path)
            .with_context(|| format!("reading {}", input_path.display()))?;
        match serde_json::from_str(&text) {
            Ok(value) => observe_value(&mut learner, value, cli.spread, input_path),
            Err(err) => warn!("failed to parse {}, ignoring: {err}", input_path.display()),
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    let doc = build_doc(&cli.inputs);
    write_type_definitions(
        &learner,
        &output_path,
        &cli.type_name,
        &doc,
        cli.python_target.into(),
    )
    .with_context(|| format!("writing {}", output_path.display()))?;

    Ok(())
}

/// Under `--spread`, a top-level JSON array is walked element-by-element
/// instead of observed as a single value; a non-array value falls back to
/// being observed whole, logged the same way a per-item parse failure is.
fn observe_value(learner: &mut Learner, value: serde_json::Value, spread: bool, input_path: &std::path::Path) {
    if !spread {
        learner.observe(&value);
        return;
    }
    match value.as_array() {
        Some(items) => {
            for item in items {
                learner.observe(item);
            }
        }
        None => {
            warn!(
                "--spread given but {} is not a JSON array, observing it whole",
                input_path.display()
            );
            learner.observe(&value);
        }
    }
}

fn build_doc(inputs: &[PathBuf]) -> String {
    let mut doc = String::from("Source JSON files:\n");
    for input_path in inputs.iter().take(PATHS_IN_DOC) {
        doc.push_str("- ");
        doc.push_str(&input_path.display().to_string());
        doc.push('\n');
    }
    if inputs.len() > PATHS_IN_DOC {
        doc.push_str(&format!("- {} more...\n", inputs.len() - PATHS_IN_DOC));
    }
    doc.trim_end().to_string()
}
