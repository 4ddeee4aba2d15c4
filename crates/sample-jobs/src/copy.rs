use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};

use crate::JobError;

/// Copies `file` into `dest_dir` under the same file name, creating
/// `dest_dir` and its ancestors as needed. An existing file at the target is
/// overwritten. Permissions and access/modification times follow the source.
pub fn copy_preserving(file: &Path, dest_dir: &Path) -> Result<PathBuf, JobError> {
    let copy_err = |source: std::io::Error| JobError::Copy {
        path: file.to_path_buf(),
        source,
    };

    let name = file.file_name().ok_or_else(|| {
        copy_err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "source has no file name",
        ))
    })?;
    fs::create_dir_all(dest_dir).map_err(copy_err)?;

    let target = dest_dir.join(name);
    // fs::copy carries the permission bits over.
    fs::copy(file, &target).map_err(copy_err)?;

    let metadata = fs::metadata(file).map_err(copy_err)?;
    let mtime = FileTime::from_last_modification_time(&metadata);
    let atime = FileTime::from_last_access_time(&metadata);
    filetime::set_file_times(&target, atime, mtime).map_err(copy_err)?;

    Ok(target)
}
