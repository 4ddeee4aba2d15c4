use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("{0}")]
    Validation(String),

    #[error("cannot read source directory {path:?}: {source}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("a copy job is already running")]
    AlreadyRunning,

    #[error("{path:?} is not inside source root {root:?}")]
    OutsideSourceRoot { path: PathBuf, root: PathBuf },

    #[error("{source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
