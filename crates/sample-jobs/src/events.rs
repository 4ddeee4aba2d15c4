use serde::{Deserialize, Serialize};

/// Where a job currently is. `Idle` is the rest state between runs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    #[default]
    Idle,
    /// Enumerating the source tree; the total is not known yet.
    Searching,
    Copying,
    Completed,
    Canceled,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobSummary {
    pub found: usize,
    pub copied: usize,
    pub failed: usize,
}

impl JobSummary {
    pub fn attempted(&self) -> usize {
        self.copied + self.failed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobOutcome {
    Completed(JobSummary),
    Canceled(JobSummary),
    Failed(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobUpdate {
    Phase(JobPhase),
    Progress(u8),
    Log(String),
    Finished(JobOutcome),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobEvent {
    pub id: String,
    pub update: JobUpdate,
}

impl JobEvent {
    pub fn is_finished(&self) -> bool {
        matches!(self.update, JobUpdate::Finished(_))
    }
}

/// `round(done / total * 100)`, clamped to 100. An empty run has nothing
/// left to do, so it counts as complete.
pub fn progress_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let done = done.min(total) as u64;
    let total = total as u64;
    ((done * 100 + total / 2) / total) as u8
}
