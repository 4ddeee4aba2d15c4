use std::path::{Path, PathBuf};

use crate::JobError;

/// Destination directory for `file` that keeps its position relative to
/// `source_root`. A file sitting directly in the source root maps to
/// `dest_root` itself.
pub fn mirror_dir(file: &Path, source_root: &Path, dest_root: &Path) -> Result<PathBuf, JobError> {
    let outside = || JobError::OutsideSourceRoot {
        path: file.to_path_buf(),
        root: source_root.to_path_buf(),
    };
    let relative = file.strip_prefix(source_root).map_err(|_| outside())?;
    // `strip_prefix` accepts the root itself; that is not a file under it.
    if relative.as_os_str().is_empty() {
        return Err(outside());
    }
    let parent = relative.parent().unwrap_or_else(|| Path::new(""));
    Ok(dest_root.join(parent))
}
