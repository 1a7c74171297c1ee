//! Atomic replacement of the output file

use std::io::Write;
use std::path::Path;

use tempfile::Builder;
use tracing::debug;

use crate::error::{Result, SnapshotError};

/// Replace `path` with `bytes`. Readers see either the old file or the
/// complete new one; a failed write leaves the old file untouched.
pub fn write_snapshot(path: &Path, bytes: &[u8]) -> Result<u64> {
    let write_err = |source| SnapshotError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Unique per writer, so overlapping runs never share a staging file
    let mut staged = Builder::new()
        .prefix(".snapshot-")
        .suffix(".partial")
        .tempfile_in(dir)
        .map_err(write_err)?;
    debug!("Writing {} bytes via {}", bytes.len(), staged.path().display());

    staged.write_all(bytes).map_err(write_err)?;
    staged.as_file().sync_all().map_err(write_err)?;

    // On failure the staging file is removed when the returned handle drops
    staged.persist(path).map_err(|e| write_err(e.error))?;

    Ok(bytes.len() as u64)
}
