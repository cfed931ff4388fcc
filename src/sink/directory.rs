//! Directory-backed file sink.

use super::FileSink;
use crate::download::Payload;
use crate::error::Result;

use futures::future::BoxFuture;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::{fs, fs::OpenOptions, io::AsyncWriteExt};
use tracing::{debug, info};

/// Suffix of files still being written.
const PART_SUFFIX: &str = ".part";

/// Writes payloads into a directory.
///
/// Each save writes to its own `<name>.<pid>-<seq>.part` and renames it into
/// place once complete, so an interrupted save never leaves a truncated file
/// under the final name. Unless `overwrite` is set, a taken name gets a
/// ` (n)` suffix; with `overwrite` the last save to finish wins.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
    overwrite: bool,
}

impl DirectorySink {
    /// Create a sink writing into `directory` without overwriting.
    pub fn new(directory: PathBuf) -> Self {
        Self {
            directory,
            overwrite: false,
        }
    }

    /// Replace existing files instead of picking a free name.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Gets the target directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    async fn write(&self, payload: &Payload, file_name: &str) -> Result<PathBuf> {
        debug!("Creating destination directory {:?}", self.directory);
        fs::create_dir_all(&self.directory).await?;

        let part = self.write_part(payload, file_name).await?;
        match self.place(&part, file_name).await {
            Ok(target) => {
                info!("Saved {} ({} bytes)", target.display(), payload.len());
                Ok(target)
            }
            Err(e) => {
                let _ = fs::remove_file(&part).await;
                Err(e)
            }
        }
    }

    /// Write the payload to a temp file owned by this save alone.
    async fn write_part(&self, payload: &Payload, file_name: &str) -> Result<PathBuf> {
        let (part, mut file) = loop {
            let part = part_path(&self.directory.join(file_name));
            match OpenOptions::new().write(true).create_new(true).open(&part).await {
                Ok(file) => break (part, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        };

        debug!("Writing {} bytes to {:?}", payload.len(), part);
        let written = async {
            file.write_all(&payload.bytes).await?;
            file.flush().await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            let _ = fs::remove_file(&part).await;
            return Err(e.into());
        }
        Ok(part)
    }

    /// Move a finished part file to its final name.
    ///
    /// Without `overwrite` the final name is reserved with `create_new`
    /// before the rename, so concurrent saves never land on the same path.
    async fn place(&self, part: &Path, file_name: &str) -> Result<PathBuf> {
        if self.overwrite {
            let target = self.directory.join(file_name);
            fs::rename(part, &target).await?;
            return Ok(target);
        }

        let mut attempt = 0;
        loop {
            let target = self.directory.join(candidate_name(file_name, attempt));
            attempt += 1;

            match OpenOptions::new().write(true).create_new(true).open(&target).await {
                Ok(placeholder) => drop(placeholder),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }

            if let Err(e) = fs::rename(part, &target).await {
                let _ = fs::remove_file(&target).await;
                return Err(e.into());
            }
            return Ok(target);
        }
    }
}

impl FileSink for DirectorySink {
    fn save<'a>(&'a self, payload: Payload, file_name: &'a str) -> BoxFuture<'a, Result<PathBuf>> {
        Box::pin(async move { self.write(&payload, file_name).await })
    }
}

/// `name.ext` for the first attempt, then `name (n).ext`.
fn candidate_name(file_name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return file_name.to_string();
    }
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{} ({}).{}", stem, attempt, ext),
        _ => format!("{} ({})", file_name, attempt),
    }
}

/// `<target>.<pid>-<seq>.part`, unique per save within the directory.
fn part_path(target: &Path) -> PathBuf {
    static NEXT_PART: AtomicU64 = AtomicU64::new(0);
    let seq = NEXT_PART.fetch_add(1, Ordering::Relaxed);

    let mut name = target.as_os_str().to_os_string();
    name.push(format!(".{}-{}{}", std::process::id(), seq, PART_SUFFIX));
    PathBuf::from(name)
}
