//! Output file naming shared by every save node.
//!
//! Files are named `{YYYY-MM-DD-HHMM}-{8 hex}.{ext}`: the local minute the
//! export ran plus the first eight hex digits of a random UUID.

use chrono::{DateTime, Local, TimeZone};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Attempts at finding an unused name before giving up.
const MAX_NAME_ATTEMPTS: usize = 8;

/// A freshly created, empty output file.
#[derive(Debug)]
pub struct OutputFile {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Handle opened for writing
    pub file: File,
}

/// Build the file name for an export made at `now`.
pub fn file_name<Tz: TimeZone>(now: &DateTime<Tz>, id: &Uuid, extension: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let simple = id.simple().to_string();
    format!(
        "{}-{}.{}",
        now.format("%Y-%m-%d-%H%M"),
        &simple[..8],
        extension
    )
}

/// Create `dir` if needed and open a new uniquely named file inside it.
///
/// The file is opened with `create_new`, so an existing export is never
/// overwritten; on a name collision a new suffix is drawn.
pub fn create_output_file(dir: &Path, extension: &str) -> io::Result<OutputFile> {
    std::fs::create_dir_all(dir)?;
    let dir = std::path::absolute(dir)?;

    for _ in 0..MAX_NAME_ATTEMPTS {
        let path = dir.join(file_name(&Local::now(), &Uuid::new_v4(), extension));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok(OutputFile { path, file }),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                tracing::debug!("Output name {:?} taken, drawing a new suffix", path);
            }
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!(
            "no free output name in {} after {} attempts",
            dir.display(),
            MAX_NAME_ATTEMPTS
        ),
    ))
}
