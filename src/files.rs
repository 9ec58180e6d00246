//! The file boundary: the core never opens files, this module does.
//!
//! Writes go through a temp file in the target directory followed by an
//! atomic rename, with an optional `.bak` copy of the previous contents.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Read an export file as UTF-8 text.
pub fn read_export(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read export file: {:?}", path))
}

/// Path of the backup written next to `path`: the same name with `.bak`
/// appended (so `list.csv` backs up to `list.csv.bak`).
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

/// Write export text to `path`, atomically replacing any existing file.
pub fn write_export(path: &Path, text: &str, backup: bool) -> Result<()> {
    if backup && path.exists() {
        let backup = backup_path(path);
        std::fs::copy(path, &backup)
            .with_context(|| format!("Failed to write backup: {:?}", backup))?;
        tracing::debug!(backup = %backup.display(), "wrote backup");
    }

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))
        .context("Failed to create temp file")?;
    tmp.write_all(text.as_bytes())
        .context("Failed to write export text")?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace export file: {:?}", path))?;
    Ok(())
}
