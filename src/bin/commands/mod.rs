use std::fs::File;
use std::io::{self as stdio, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use log::debug;
use serde::Serialize;

use cell_forge::Structure;

pub mod info;
pub mod perceive;
pub mod replicate;
pub mod transform;
pub mod validate;
pub mod wrap;

/// Aggregated IO parameters shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct IoParameters {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub compact: bool,
}

/// Loads a JSON structure document from the configured input source.
pub fn load_input(params: &IoParameters) -> Result<Structure> {
    if let Some(path) = &params.input {
        let file = File::open(path)
            .with_context(|| format!("Failed to open input file {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse structure document {}", path.display()))
    } else {
        let stdin = stdio::stdin();
        if stdin.is_terminal() {
            bail!(
                "No --input provided and stdin is a TTY. Provide -i/--input or pipe a structure document into cellforge."
            );
        }
        serde_json::from_reader(BufReader::new(stdin.lock()))
            .context("Failed to parse structure document from stdin")
    }
}

/// Serializes a value as JSON to the configured output destination.
pub fn save_output<T: Serialize>(value: &T, params: &IoParameters) -> Result<()> {
    match params.output.as_deref() {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            write_json(BufWriter::new(file), value, params.compact)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            debug!("Wrote output to {}", path.display());
        }
        None => {
            write_json(BufWriter::new(stdio::stdout().lock()), value, params.compact)
                .context("Failed to write output to stdout")?;
        }
    }
    Ok(())
}

fn write_json<W: Write, T: Serialize>(mut writer: W, value: &T, compact: bool) -> Result<()> {
    if compact {
        serde_json::to_writer(&mut writer, value)?;
    } else {
        serde_json::to_writer_pretty(&mut writer, value)?;
    }
    writeln!(writer)?;
    writer.flush().context("Failed to flush output writer")
}

/// Wraps long-running operations with a spinner rendered to stderr.
pub fn run_with_spinner<T, F>(message: &str, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());

    let result = work();

    match &result {
        Ok(_) => spinner.finish_with_message(format!("{} ✓", message)),
        Err(_) => spinner.abandon_with_message(format!("{} ✗", message)),
    }

    result
}

/// Returns true when stdout is a TTY and no explicit output file was supplied.
pub fn interactive_stdout_requested(params: &IoParameters) -> bool {
    params.output.is_none() && stdio::stdout().is_terminal()
}

/// Ensures commands do not dump structure documents directly into an interactive terminal.
pub fn ensure_noninteractive_stdout(command: &str, params: &IoParameters) -> Result<()> {
    if interactive_stdout_requested(params) {
        bail!(
            "Refusing to stream {command} results to an interactive terminal. Use -o/--output or pipe the command into a file."
        );
    }
    Ok(())
}
