//! Per-request working directories and the files the toolchain leaves in them.

use log::{debug, warn};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

pub const WORKDIR_PREFIX: &str = "texpreview-";

pub const SOURCE_FILE: &str = "input.tex";
pub const LOG_FILE: &str = "input.log";
pub const PDF_FILE: &str = "input.pdf";
pub const SVG_FILE: &str = "output.svg";

/// A uniquely named directory owned by exactly one compile.
///
/// The directory is removed recursively when the guard is dropped, on every
/// exit path of the compile including early returns, errors and unwinding.
/// Removal errors are logged and otherwise ignored.
#[derive(Debug)]
pub struct WorkDir {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl WorkDir {
    /// Creates `<root>/texpreview-<uuid>`, creating `root` first if needed.
    pub async fn create(root: &Path) -> io::Result<Self> {
        tokio::fs::create_dir_all(root).await?;
        let dir = tempfile::Builder::new()
            .prefix(&format!("{}{}", WORKDIR_PREFIX, Uuid::new_v4()))
            .rand_bytes(0)
            .tempdir_in(root)?;
        let path = dir.path().to_path_buf();
        debug!("created work directory {}", path.display());
        Ok(Self { path, dir: Some(dir) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Writes the generated document to [`SOURCE_FILE`].
    pub async fn write_source(&self, source: &str) -> io::Result<PathBuf> {
        let path = self.file(SOURCE_FILE);
        tokio::fs::write(&path, source).await?;
        Ok(path)
    }

    /// Reads a text artifact, treating a missing or unreadable file as empty.
    ///
    /// TeX logs are not guaranteed to be valid UTF-8, so invalid sequences are
    /// replaced rather than rejected.
    pub async fn read_text_lossy(&self, name: &str) -> String {
        match tokio::fs::read(self.file(name)).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                debug!("{} unavailable: {}", name, e);
                String::new()
            }
        }
    }

    pub async fn read_bytes(&self, name: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.file(name)).await
    }

    /// Removes the directory now and reports the outcome.
    ///
    /// An already-removed directory counts as success.
    pub fn close(mut self) -> io::Result<()> {
        self.remove()
    }

    fn remove(&mut self) -> io::Result<()> {
        let Some(dir) = self.dir.take() else {
            return Ok(());
        };
        match dir.close() {
            Ok(()) => {
                debug!("removed work directory {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        if let Err(e) = self.remove() {
            warn!("failed to remove work directory {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_workdir_is_removed_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let workdir = WorkDir::create(root.path()).await.unwrap();
        let path = workdir.path().to_path_buf();

        workdir.write_source("hello").await.unwrap();
        assert!(path.join(SOURCE_FILE).exists());

        drop(workdir);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_workdir_names_are_unique() {
        let root = tempfile::tempdir().unwrap();
        let a = WorkDir::create(root.path()).await.unwrap();
        let b = WorkDir::create(root.path()).await.unwrap();

        assert_ne!(a.path(), b.path());
        let name = a.path().file_name().unwrap().to_string_lossy().to_string();
        let uuid = name.strip_prefix(WORKDIR_PREFIX).unwrap();
        assert!(Uuid::parse_str(uuid).is_ok(), "unexpected work directory name {}", name);
        assert_eq!(a.path().parent(), Some(root.path()));
    }

    #[tokio::test]
    async fn test_create_makes_missing_root() {
        let base = tempfile::tempdir().unwrap();
        let root = base.path().join("nested").join("previews");
        let workdir = WorkDir::create(&root).await.unwrap();

        assert!(workdir.path().starts_with(&root));
        assert!(workdir.path().is_dir());
    }

    #[tokio::test]
    async fn test_close_removes_directory_with_contents() {
        let root = tempfile::tempdir().unwrap();
        let workdir = WorkDir::create(root.path()).await.unwrap();
        let path = workdir.path().to_path_buf();
        std::fs::write(workdir.file(PDF_FILE), b"%PDF").unwrap();
        std::fs::create_dir(workdir.file("_minted")).unwrap();

        workdir.close().unwrap();
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_text_file_reads_empty() {
        let root = tempfile::tempdir().unwrap();
        let workdir = WorkDir::create(root.path()).await.unwrap();
        assert_eq!(workdir.read_text_lossy(LOG_FILE).await, "");
        assert!(workdir.read_bytes(PDF_FILE).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let root = tempfile::tempdir().unwrap();
        let workdir = WorkDir::create(root.path()).await.unwrap();
        std::fs::write(workdir.file(LOG_FILE), b"ok \xff done").unwrap();

        assert_eq!(workdir.read_text_lossy(LOG_FILE).await, "ok \u{fffd} done");
    }

    #[tokio::test]
    async fn test_drop_tolerates_already_removed_directory() {
        let root = tempfile::tempdir().unwrap();
        let workdir = WorkDir::create(root.path()).await.unwrap();
        std::fs::remove_dir_all(workdir.path()).unwrap();
        workdir.close().unwrap();
    }
}
