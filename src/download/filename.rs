//! Destination filename computation for downloaded archives.
//!
//! Destination names follow `<basename>-<timestamp>` with a
//! second-resolution capture-time stamp. Repository archives additionally
//! get a `.zip` extension. Collisions within the same second are resolved
//! with a numeric suffix. Reservation of a name is atomic: the `.part`
//! temp file is opened with `create_new`, so two in-flight downloads of
//! the same basename always claim distinct paths even when neither has
//! finished streaming yet. Collisions across processes started within the
//! same second are a known, accepted limitation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::fs::{File, OpenOptions};

use crate::resolver::DownloadTarget;

use super::constants::PARTIAL_SUFFIX;
use super::error::DownloadError;

/// Second-resolution capture-time stamp for destination names.
#[must_use]
pub fn capture_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/// Builds the destination filename for a resolved target.
///
/// Repository archives are named `<repo>-<timestamp>.zip`; direct links
/// are named `<last-path-segment>-<timestamp>`.
#[must_use]
pub fn destination_filename(target: &DownloadTarget, timestamp: u64) -> String {
    if target.repo_archive {
        format!("{}-{timestamp}.zip", target.basename)
    } else {
        format!("{}-{timestamp}", target.basename)
    }
}

/// A reserved, collision-free destination: the final path, the `.part`
/// path the bytes stream into, and the already-open temp file handle.
#[derive(Debug)]
pub struct ReservedPath {
    /// Path the finished download is renamed to.
    pub final_path: PathBuf,
    /// In-progress temp path, exclusively claimed via `create_new`.
    pub partial_path: PathBuf,
    /// Open handle on the temp file.
    pub file: File,
}

/// Reserves a collision-free path for `filename` inside `dir`.
///
/// The `.part` temp file is created with `create_new`, which makes the
/// claim atomic: a concurrent download racing for the same name loses the
/// create and moves on to the next numeric suffix (`name-2.zip`,
/// `name-3.zip`, ...). A pre-existing final path also advances the suffix.
///
/// # Errors
///
/// Returns [`DownloadError::Io`] if the temp file cannot be created for
/// any reason other than already existing.
pub async fn reserve_unique_path(dir: &Path, filename: &str) -> Result<ReservedPath, DownloadError> {
    let (stem, extension) = split_extension(filename);
    let mut counter: u32 = 1;
    loop {
        let candidate = if counter == 1 {
            filename.to_string()
        } else {
            format!("{stem}-{counter}{extension}")
        };
        let final_path = dir.join(&candidate);
        let partial_path = partial_path_for(&final_path);

        if final_path.exists() {
            counter += 1;
            continue;
        }

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&partial_path)
            .await
        {
            Ok(file) => {
                return Ok(ReservedPath {
                    final_path,
                    partial_path,
                    file,
                });
            }
            Err(error) if error.kind() == ErrorKind::AlreadyExists => {
                counter += 1;
            }
            Err(error) => return Err(DownloadError::io(partial_path, error)),
        }
    }
}

/// Temp name used while streaming; renamed to the final path on success.
fn partial_path_for(final_path: &Path) -> PathBuf {
    let mut name = final_path.as_os_str().to_os_string();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

/// Splits `name.ext` into (`name`, `.ext`); names without a dot keep an
/// empty extension.
fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(position) if position > 0 => filename.split_at(position),
        _ => (filename, ""),
    }
}
