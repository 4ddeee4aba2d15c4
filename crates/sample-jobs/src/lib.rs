//! Recursive sample-file copy jobs with progress events and cooperative cancellation.
//!
//! A job walks a source tree for files with a target extension (`.wav` by
//! default), mirrors each file's relative directory under a destination root
//! and copies it there. The worker thread reports back over a channel of
//! [`JobEvent`]s; the control side owns a [`SampleJobs`] handle to start jobs
//! and request cancellation.

mod cancel;
pub use cancel::CancelFlag;

mod config;
pub use config::{normalize_extension, JobConfig, DEFAULT_EXTENSION};

mod copy;
pub use copy::copy_preserving;

mod enumerate;
pub use enumerate::{find_samples, has_extension, Manifest};

mod error;
pub use error::JobError;

mod events;
pub use events::{progress_percent, JobEvent, JobOutcome, JobPhase, JobSummary, JobUpdate};

mod mirror;
pub use mirror::mirror_dir;

mod runner;
pub use runner::run_job;

mod runtime;
pub use runtime::{JobSnapshot, SampleJobs};
