//! Output for analysis results (JSON, CSV, run directories, console summary).

use crate::config::AnalysisConfig;
use crate::models::{CorpusSummary, LexicalMetrics, TextFeatures};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Descriptive record stored next to the results of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub experiment_name: String,
    pub description: Option<String>,
    pub timestamp: String,
    pub version: String,
    pub text_count: usize,
    pub summary: CorpusSummary,
}

/// Write the metrics container as pretty JSON.
pub fn write_json<W: Write>(metrics: &LexicalMetrics, writer: &mut W) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(metrics)?;
    writer.write_all(json.as_bytes())?;
    Ok(())
}

/// Write the metrics container as JSON to a file.
pub fn write_json_file(metrics: &LexicalMetrics, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_json(metrics, &mut file)
}

/// Write one row per text and one column per populated scalar metric.
///
/// Part-of-speech distributions are maps and are left to the JSON output.
pub fn write_csv<W: Write>(metrics: &LexicalMetrics, writer: &mut W) -> Result<(), OutputError> {
    let columns: Vec<(&str, &[f64])> = metrics
        .scalar_columns()
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .collect();

    let mut header = vec!["text_index"];
    header.extend(columns.iter().map(|(name, _)| *name));
    writeln!(writer, "{}", header.join(","))?;

    let rows = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
    for i in 0..rows {
        let mut fields = vec![i.to_string()];
        for (_, values) in &columns {
            fields.push(values.get(i).map(|v| v.to_string()).unwrap_or_default());
        }
        writeln!(writer, "{}", fields.join(","))?;
    }

    Ok(())
}

/// Write the per-text CSV to a file.
pub fn write_csv_file(metrics: &LexicalMetrics, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_csv(metrics, &mut file)
}

/// Directory name for a run: lowercase experiment name with spaces as
/// underscores, followed by the local timestamp.
pub fn run_directory_name(experiment_name: &str, timestamp: &DateTime<Local>) -> String {
    format!(
        "{}_{}",
        experiment_name.replace(' ', "_").to_lowercase(),
        timestamp.format("%Y-%m-%d_%H-%M-%S")
    )
}

/// Persist a finished run under `config.data.output_path`.
///
/// Writes `metadata.json`, `config.toml`, `texts.json`, `results.json` and
/// `results.csv` into a fresh timestamped directory and returns its path.
pub fn save_run<S: AsRef<str> + Serialize>(
    config: &AnalysisConfig,
    metrics: &LexicalMetrics,
    texts: &[S],
) -> Result<PathBuf, OutputError> {
    let now = Local::now();
    let run_dir = config
        .data
        .output_path
        .join(run_directory_name(&config.experiment_name, &now));
    std::fs::create_dir_all(&run_dir)?;

    let metadata = RunMetadata {
        experiment_name: config.experiment_name.clone(),
        description: config.description.clone(),
        timestamp: now.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        text_count: texts.len(),
        summary: CorpusSummary::from_metrics(metrics),
    };
    std::fs::write(
        run_dir.join("metadata.json"),
        serde_json::to_string_pretty(&metadata)?,
    )?;
    std::fs::write(run_dir.join("config.toml"), config.to_toml_string()?)?;
    std::fs::write(
        run_dir.join("texts.json"),
        serde_json::to_string_pretty(texts)?,
    )?;
    write_json_file(metrics, &run_dir.join("results.json"))?;
    write_csv_file(metrics, &run_dir.join("results.csv"))?;

    log::info!("Saved results to {}", run_dir.display());
    Ok(run_dir)
}

/// Format a corpus summary as a table.
pub fn format_summary(config: &AnalysisConfig, summary: &CorpusSummary) -> String {
    let mut out = String::new();
    out.push_str("=== Analysis Summary ===\n");
    out.push_str(&format!("Experiment: {}\n", config.experiment_name));
    if let Some(description) = &config.description {
        out.push_str(&format!("Description: {}\n", description));
    }
    out.push_str(&format!("Texts analyzed: {}\n", summary.text_count));
    if config.lexical.richness.mattr {
        out.push_str(&format!("MATTR window: {}\n", config.lexical.richness.window));
    }
    out.push('\n');
    out.push_str(&format!(
        "{:<36} {:>10} {:>10} {:>10} {:>10}\n",
        "Metric", "Mean", "Std", "Min", "Max"
    ));
    for m in &summary.metrics {
        out.push_str(&format!(
            "{:<36} {:>10.4} {:>10.4} {:>10.4} {:>10.4}\n",
            m.metric, m.mean, m.std, m.min, m.max
        ));
    }
    out
}

/// Print a corpus summary to stdout.
pub fn print_summary(config: &AnalysisConfig, summary: &CorpusSummary) {
    println!("\n{}", format_summary(config, summary));
}

/// Print the features of a single text as pretty JSON.
pub fn print_features(features: &TextFeatures) -> Result<(), OutputError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, features)?;
    writeln!(handle)?;
    Ok(())
}
