//! The `imgexport run` command: execute invocation records.
//!
//! Input is a single JSON record, a JSON array of records, or JSONL. Records
//! run one after another; a failing record is logged and counted, and the
//! remaining records still run.

use anyhow::Context;
use clap::{Args, ValueEnum};
use imgexport_core::output::OutputFormat as CoreOutputFormat;
use imgexport_core::{AnyInvocation, Exporter, OutputWriter, PathOutput};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Record file, or `-` for stdin
    #[arg(default_value = "-")]
    pub input: PathBuf,

    /// Output format (defaults to `output.format` from the config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Execute the run command.
pub async fn execute(args: RunArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let format = match args.format {
        Some(format) => format.into(),
        None => CoreOutputFormat::parse(&config.output.format).unwrap_or(CoreOutputFormat::Json),
    };
    let pretty = config.output.pretty;

    let content = read_input(&args.input).await?;
    let records = parse_records(&content)?;
    if records.is_empty() {
        tracing::warn!("No invocation records found in {:?}", args.input);
        return Ok(());
    }
    tracing::info!("Running {} invocation record(s)", records.len());

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = OutputWriter::new(sink, format, pretty);

    let exporter = Arc::new(Exporter::from_config(config));
    let progress = (records.len() > 1)
        .then(|| create_progress_bar(records.len() as u64))
        .transpose()?;

    let start_time = std::time::Instant::now();
    let mut succeeded: u64 = 0;
    let mut failed: u64 = 0;
    let mut collected: Vec<PathOutput> = Vec::new();

    for (index, record) in records.into_iter().enumerate() {
        let id = record.spec().id;
        let exporter = Arc::clone(&exporter);
        match tokio::task::spawn_blocking(move || exporter.run(&record)).await? {
            Ok(output) => {
                succeeded += 1;
                // JSONL streams; JSON needs every record for the array wrapper
                match format {
                    CoreOutputFormat::JsonLines => writer.write(&output)?,
                    CoreOutputFormat::Json => collected.push(output),
                }
            }
            Err(e) => {
                failed += 1;
                tracing::error!("Failed: record #{} ({}) - {}", index + 1, id, e);
            }
        }

        if let Some(progress) = &progress {
            progress.inc(1);
            progress.set_message(format!("{failed} failed"));
        }
    }

    if let [single] = collected.as_slice() {
        writer.write(single)?;
    } else if !collected.is_empty() {
        writer.write_all(&collected)?;
    }
    writer.flush()?;

    if let Some(progress) = progress {
        progress.finish_and_clear();
    }
    if let Some(path) = &args.output {
        tracing::info!("Output written to {:?}", path);
    }
    tracing::info!(
        "Completed: {} succeeded, {} failed in {:.1}s",
        succeeded,
        failed,
        start_time.elapsed().as_secs_f64()
    );

    if failed > 0 {
        anyhow::bail!("{failed} of {} record(s) failed", succeeded + failed);
    }
    Ok(())
}

/// Read all input from a file or, for `-`, from stdin.
async fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut content = String::new();
        tokio::io::stdin().read_to_string(&mut content).await?;
        Ok(content)
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("Cannot read invocation records from {:?}", input))
    }
}

/// Parse a JSON array of records, or a stream of JSON records (one or many,
/// whitespace separated, which covers JSONL).
fn parse_records(content: &str) -> anyhow::Result<Vec<AnyInvocation>> {
    if content.trim_start().starts_with('[') {
        return serde_json::from_str(content).context("Invalid JSON array of invocation records");
    }

    serde_json::Deserializer::from_str(content)
        .into_iter::<AnyInvocation>()
        .enumerate()
        .map(|(index, record)| {
            record.with_context(|| format!("Invalid invocation record #{}", index + 1))
        })
        .collect()
}

/// Create a progress bar for multi-record runs.
fn create_progress_bar(total: u64) -> anyhow::Result<indicatif::ProgressBar> {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )?
            .progress_chars("##-"),
    );
    pb.set_message("starting...");
    Ok(pb)
}
