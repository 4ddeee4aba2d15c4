use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::Arc, thread};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{runner, CancelFlag, JobConfig, JobError, JobEvent, JobPhase, JobUpdate};

/// What the control side can read without draining the event queue.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobSnapshot {
    /// Set while a job is in flight.
    pub job_id: Option<String>,
    pub phase: JobPhase,
    pub progress: u8,
}

/// Control surface for copy jobs: starts at most one worker at a time,
/// forwards cancel requests and hands out the event stream.
pub struct SampleJobs {
    tx_events: Sender<JobEvent>,
    rx_events: Receiver<JobEvent>,
    cancel: CancelFlag,
    snapshot: Arc<RwLock<JobSnapshot>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl Default for SampleJobs {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleJobs {
    pub fn new() -> Self {
        Self::with_channel(unbounded())
    }

    /// Event queue holding at most `capacity` undrained events; the worker
    /// blocks once it is full.
    pub fn bounded(capacity: usize) -> Self {
        Self::with_channel(bounded(capacity))
    }

    fn with_channel((tx_events, rx_events): (Sender<JobEvent>, Receiver<JobEvent>)) -> Self {
        Self {
            tx_events,
            rx_events,
            cancel: CancelFlag::new(),
            snapshot: Arc::new(RwLock::new(JobSnapshot::default())),
            worker: Mutex::new(None),
        }
    }

    pub fn start_job(
        &self,
        source: impl Into<PathBuf>,
        dest: impl Into<PathBuf>,
    ) -> Result<String, JobError> {
        self.start(JobConfig::new(source, dest))
    }

    /// Validates `config` and runs it on a fresh worker thread. Returns the
    /// job id that tags every event of the run.
    pub fn start(&self, config: JobConfig) -> Result<String, JobError> {
        config.validate()?;

        let id = Uuid::new_v4().to_string();
        {
            let mut s = self.snapshot.write();
            if s.job_id.is_some() {
                return Err(JobError::AlreadyRunning);
            }
            *s = JobSnapshot {
                job_id: Some(id.clone()),
                phase: JobPhase::Idle,
                progress: 0,
            };
        }
        self.cancel.reset();

        info!("[{id}] starting copy {:?} -> {:?}", config.source_root, config.dest_root);
        let handle = {
            let id = id.clone();
            let tx = self.tx_events.clone();
            let cancel = self.cancel.clone();
            let snapshot = self.snapshot.clone();
            thread::spawn(move || {
                if let Err(e) = runner::run_with_snapshot(&id, &config, &cancel, &tx, &snapshot) {
                    warn!("[{id}] job ended early: {e}");
                }
                let mut s = snapshot.write();
                if s.job_id.as_deref() == Some(id.as_str()) {
                    *s = JobSnapshot::default();
                }
            })
        };
        *self.worker.lock() = Some(handle);
        Ok(id)
    }

    /// Asks the running job to stop before its next file. Returns `false`
    /// when there is nothing to cancel.
    pub fn request_cancel(&self) -> bool {
        let Some(id) = self.snapshot.read().job_id.clone() else {
            return false;
        };
        self.cancel.request();
        info!("[{id}] cancel requested");
        let _ = self.tx_events.send(JobEvent {
            id,
            update: JobUpdate::Log("Canceling operation...".to_string()),
        });
        true
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn events(&self) -> Receiver<JobEvent> {
        self.rx_events.clone()
    }

    pub fn snapshot(&self) -> JobSnapshot {
        self.snapshot.read().clone()
    }

    pub fn is_running(&self) -> bool {
        self.snapshot.read().job_id.is_some()
    }

    /// Blocks until the most recently started worker has exited. The event
    /// queue must be drained elsewhere if it is bounded.
    pub fn wait(&self) {
        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("copy worker panicked");
            }
        }
    }
}
