use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use crossbeam_channel::Receiver;
use sample_jobs::{
    find_samples, normalize_extension, JobConfig, JobEvent, JobOutcome, JobPhase, JobUpdate,
    SampleJobs, DEFAULT_EXTENSION,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "sample-organizer")]
#[command(about = "Sample Organizer - copy audio samples into a mirrored folder tree")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy every sample under SOURCE into DEST, keeping the folder layout
    Copy {
        /// Folder to search for samples
        source: PathBuf,

        /// Folder to copy samples into
        dest: PathBuf,

        /// Sample file extension, matched case-insensitively
        #[arg(short, long, default_value = DEFAULT_EXTENSION)]
        extension: String,

        /// Cancel on Ctrl-C without asking for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Print every job event as a JSON line instead of log text
        #[arg(long)]
        json: bool,
    },

    /// List the samples a copy would pick up, without copying anything
    Scan {
        /// Folder to search for samples
        source: PathBuf,

        /// Sample file extension, matched case-insensitively
        #[arg(short, long, default_value = DEFAULT_EXTENSION)]
        extension: String,

        /// Write the report to a JSON file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Copy {
            source,
            dest,
            extension,
            yes,
            json,
        } => copy_command(source, dest, extension, yes, json).await,
        Commands::Scan {
            source,
            extension,
            output,
        } => scan_command(source, extension, output).await,
    }
}

async fn copy_command(
    source: PathBuf,
    dest: PathBuf,
    extension: String,
    assume_yes: bool,
    json: bool,
) -> Result<()> {
    let jobs = Arc::new(SampleJobs::new());
    let rx = jobs.events();
    let config = JobConfig::new(source, dest).with_extension(&extension);
    let id = jobs.start(config).context("could not start copy job")?;
    debug!("started job {id}");

    // Ctrl-C is the cancel trigger; the copy itself keeps running on the
    // worker thread while we ask.
    let cancel_jobs = jobs.clone();
    let cancel_task = tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if !cancel_jobs.is_running() {
                break;
            }
            let confirmed = assume_yes || confirm_cancel().await.unwrap_or(false);
            if confirmed {
                cancel_jobs.request_cancel();
            } else {
                info!("Continuing");
            }
        }
    });

    let outcome = tokio::task::spawn_blocking(move || render_events(&rx, json))
        .await
        .context("event renderer stopped")??;
    cancel_task.abort();

    let waiter = jobs.clone();
    tokio::task::spawn_blocking(move || waiter.wait()).await?;

    match outcome {
        JobOutcome::Completed(summary) => {
            info!(
                "Copied {} of {} sample file(s), {} failed",
                summary.copied, summary.found, summary.failed
            );
            Ok(())
        }
        JobOutcome::Canceled(summary) => {
            warn!(
                "Canceled after {} of {} sample file(s)",
                summary.attempted(),
                summary.found
            );
            Ok(())
        }
        JobOutcome::Failed(reason) => Err(anyhow!(reason)),
    }
}

/// Asks on stdin from a plain thread so a pending prompt never holds up
/// runtime shutdown.
fn confirm_cancel() -> oneshot::Receiver<bool> {
    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        eprint!("Are you sure you want to cancel the operation? [y/N] ");
        let _ = io::stderr().flush();
        let mut answer = String::new();
        let confirmed = io::stdin().lock().read_line(&mut answer).is_ok() && is_yes(&answer);
        let _ = tx.send(confirmed);
    });
    rx
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Drains job events until the run finishes. Log lines are prefixed with the
/// latest progress, or with dots while the total is still unknown.
fn render_events(rx: &Receiver<JobEvent>, json: bool) -> Result<JobOutcome> {
    let stdout = io::stdout();
    let mut phase = JobPhase::Idle;
    let mut progress = 0u8;

    for event in rx.iter() {
        if json {
            let mut out = stdout.lock();
            writeln!(out, "{}", serde_json::to_string(&event)?)?;
        }
        match event.update {
            JobUpdate::Phase(next) => {
                debug!("phase {phase:?} -> {next:?}");
                phase = next;
            }
            JobUpdate::Progress(p) => progress = p,
            JobUpdate::Log(line) => {
                if !json {
                    let mut out = stdout.lock();
                    writeln!(out, "[{}] {line}", progress_label(phase, progress))?;
                }
            }
            JobUpdate::Finished(outcome) => return Ok(outcome),
        }
    }

    Err(anyhow!("copy worker exited without reporting a result"))
}

fn progress_label(phase: JobPhase, progress: u8) -> String {
    match phase {
        JobPhase::Idle | JobPhase::Searching => " ...".to_string(),
        _ => format!("{progress:>3}%"),
    }
}

async fn scan_command(source: PathBuf, extension: String, output: Option<PathBuf>) -> Result<()> {
    let extension = normalize_extension(&extension);
    info!("Scanning {:?} for .{} files", source, extension);

    let manifest = find_samples(&source, &extension)
        .with_context(|| format!("failed to scan {}", source.display()))?;

    let files: Vec<_> = manifest
        .iter()
        .map(|path| {
            serde_json::json!({
                "path": path,
                "relative": relative_to(path, manifest.root()),
            })
        })
        .collect();

    let report = serde_json::json!({
        "source": manifest.root(),
        "extension": extension,
        "files": files,
        "total_files": manifest.len(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if let Some(output_path) = output {
        std::fs::write(&output_path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        info!("Scan report written to: {:?}", output_path);
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

fn relative_to<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}
