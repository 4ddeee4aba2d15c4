use crossbeam_channel::Sender;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    copy_preserving, find_samples, mirror_dir, progress_percent, CancelFlag, JobConfig, JobError,
    JobEvent, JobOutcome, JobPhase, JobSnapshot, JobSummary, JobUpdate,
};

struct Reporter<'a> {
    id: &'a str,
    tx: &'a Sender<JobEvent>,
    snapshot: Option<&'a RwLock<JobSnapshot>>,
}

impl Reporter<'_> {
    fn send(&self, update: JobUpdate) {
        if let Some(snapshot) = self.snapshot {
            let mut s = snapshot.write();
            match &update {
                JobUpdate::Phase(phase) => s.phase = *phase,
                JobUpdate::Progress(p) => s.progress = *p,
                // Back to idle before anyone can see the final event.
                JobUpdate::Finished(_) => *s = JobSnapshot::default(),
                JobUpdate::Log(_) => {}
            }
        }
        // A dropped receiver only means nobody is watching.
        let _ = self.tx.send(JobEvent {
            id: self.id.to_string(),
            update,
        });
    }

    fn log(&self, line: String) {
        self.send(JobUpdate::Log(line));
    }
}

/// Runs one copy job to a terminal state on the calling thread.
///
/// Events go out strictly in the order the work happens. Only enumeration
/// failure is returned as an error; per-file failures are logged, counted
/// in the summary and skipped. `cancel` is checked before each file.
pub fn run_job(
    id: &str,
    config: &JobConfig,
    cancel: &CancelFlag,
    events: &Sender<JobEvent>,
) -> Result<JobSummary, JobError> {
    run(
        &Reporter {
            id,
            tx: events,
            snapshot: None,
        },
        config,
        cancel,
    )
}

pub(crate) fn run_with_snapshot(
    id: &str,
    config: &JobConfig,
    cancel: &CancelFlag,
    events: &Sender<JobEvent>,
    snapshot: &Arc<RwLock<JobSnapshot>>,
) -> Result<JobSummary, JobError> {
    run(
        &Reporter {
            id,
            tx: events,
            snapshot: Some(snapshot.as_ref()),
        },
        config,
        cancel,
    )
}

fn run(
    reporter: &Reporter<'_>,
    config: &JobConfig,
    cancel: &CancelFlag,
) -> Result<JobSummary, JobError> {
    config.validate()?;

    reporter.send(JobUpdate::Phase(JobPhase::Searching));
    info!(
        "[{}] searching {:?} for .{} files",
        reporter.id, config.source_root, config.extension
    );
    reporter.log(format!("Searching for .{} files...", config.extension));

    let manifest = match find_samples(&config.source_root, &config.extension) {
        Ok(manifest) => manifest,
        Err(e) => {
            warn!("[{}] enumeration failed: {e}", reporter.id);
            reporter.log(format!("Error: {e}"));
            reporter.send(JobUpdate::Progress(0));
            reporter.send(JobUpdate::Phase(JobPhase::Failed));
            reporter.send(JobUpdate::Finished(JobOutcome::Failed(e.to_string())));
            return Err(e);
        }
    };

    let total = manifest.len();
    let mut summary = JobSummary {
        found: total,
        ..JobSummary::default()
    };
    info!("[{}] found {total} sample file(s)", reporter.id);
    reporter.log(format!("Found {total} sample file(s)."));
    reporter.send(JobUpdate::Phase(JobPhase::Copying));

    let mut canceled = false;
    for file in &manifest {
        if cancel.is_requested() {
            canceled = true;
            break;
        }

        let result = mirror_dir(file, manifest.root(), &config.dest_root)
            .and_then(|dest_dir| copy_preserving(file, &dest_dir).map(|_| dest_dir));
        match &result {
            Ok(_) => summary.copied += 1,
            Err(_) => summary.failed += 1,
        }

        reporter.send(JobUpdate::Progress(progress_percent(summary.attempted(), total)));
        match result {
            Ok(dest_dir) => {
                debug!("[{}] copied {:?} -> {:?}", reporter.id, file, dest_dir);
                reporter.log(format!("Copied: {} → {}", file.display(), dest_dir.display()));
            }
            Err(e) => {
                warn!("[{}] failed to copy {:?}: {e}", reporter.id, file);
                reporter.log(format!("Error copying {}: {e}", file.display()));
            }
        }
    }

    // A request that lands while the last file copies still cancels the run.
    let canceled = canceled || cancel.is_requested();
    let (line, phase, outcome) = if canceled {
        (
            "Operation canceled by user.",
            JobPhase::Canceled,
            JobOutcome::Canceled(summary),
        )
    } else {
        (
            "All sample files copied successfully.",
            JobPhase::Completed,
            JobOutcome::Completed(summary),
        )
    };
    info!(
        "[{}] {:?}: {} copied, {} failed of {}",
        reporter.id, phase, summary.copied, summary.failed, summary.found
    );
    reporter.log(line.to_string());
    reporter.send(JobUpdate::Progress(0));
    reporter.send(JobUpdate::Phase(phase));
    reporter.send(JobUpdate::Finished(outcome));
    Ok(summary)
}
