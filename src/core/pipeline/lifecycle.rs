//! Input file discovery and lifecycle directories
//!
//! Every input file ends in exactly one of two terminal locations under the
//! input directory: `processed/` or `failed/`. Moves are renames and overwrite
//! whatever is already at the destination.

use crate::domain::{BridgeError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const PROCESSED_DIR: &str = "processed";
const FAILED_DIR: &str = "failed";

/// Input, output and terminal directories for one run
#[derive(Debug, Clone)]
pub struct LifecycleDirs {
    input: PathBuf,
    output: PathBuf,
    processed: PathBuf,
    failed: PathBuf,
}

impl LifecycleDirs {
    /// Lay out the directories for `input` and `output`
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        let input = input.into();
        Self {
            processed: input.join(PROCESSED_DIR),
            failed: input.join(FAILED_DIR),
            output: output.into(),
            input,
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn processed(&self) -> &Path {
        &self.processed
    }

    pub fn failed(&self) -> &Path {
        &self.failed
    }

    /// Create the terminal directories and the output directory
    ///
    /// # Errors
    ///
    /// Returns an I/O error if any of them cannot be created.
    pub fn ensure(&self) -> Result<()> {
        for dir in [&self.processed, &self.failed, &self.output] {
            fs::create_dir_all(dir).map_err(|e| {
                BridgeError::Io(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    /// List regular files directly in the input directory whose name ends
    /// with `extension`, sorted by name
    ///
    /// Symlinks count when their target is a regular file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be listed.
    pub fn discover(&self, extension: &str) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.input).map_err(|e| {
            BridgeError::Io(format!("Failed to list {}: {}", self.input.display(), e))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let matches = path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().ends_with(extension));
            if matches {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Output path for `input`: same file name, inside the output directory
    pub fn output_path(&self, input: &Path) -> PathBuf {
        match input.file_name() {
            Some(name) => self.output.join(name),
            None => self.output.join(input),
        }
    }

    /// Move `input` into `processed/`, returning the new path
    pub async fn move_to_processed(&self, input: &Path) -> Result<PathBuf> {
        move_into(input, &self.processed).await
    }

    /// Move `input` into `failed/`, returning the new path
    pub async fn move_to_failed(&self, input: &Path) -> Result<PathBuf> {
        move_into(input, &self.failed).await
    }
}

async fn move_into(input: &Path, dir: &Path) -> Result<PathBuf> {
    let name = input.file_name().ok_or_else(|| {
        BridgeError::Io(format!("{} has no file name", input.display()))
    })?;
    let target = dir.join(name);

    tokio::fs::rename(input, &target).await.map_err(|e| {
        BridgeError::Io(format!(
            "Failed to move {} to {}: {}",
            input.display(),
            target.display(),
            e
        ))
    })?;

    tracing::debug!(from = %input.display(), to = %target.display(), "Moved file");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layout() -> (TempDir, LifecycleDirs) {
        let temp_dir = TempDir::new().unwrap();
        let dirs = LifecycleDirs::new(temp_dir.path().join("in"), temp_dir.path().join("out"));
        fs::create_dir_all(dirs.input()).unwrap();
        (temp_dir, dirs)
    }

    #[test]
    fn test_ensure_creates_directories() {
        let (_temp_dir, dirs) = layout();
        dirs.ensure().unwrap();

        assert!(dirs.processed().is_dir());
        assert!(dirs.failed().is_dir());
        assert!(dirs.output().is_dir());
        assert!(dirs.processed().ends_with("in/processed"));

        // idempotent
        dirs.ensure().unwrap();
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let (_temp_dir, dirs) = layout();
        dirs.ensure().unwrap();
        fs::write(dirs.input().join("b.json"), "{}").unwrap();
        fs::write(dirs.input().join("a.json"), "{}").unwrap();
        fs::write(dirs.input().join("notes.txt"), "x").unwrap();
        fs::create_dir(dirs.input().join("nested.json")).unwrap();
        fs::write(dirs.processed().join("old.json"), "{}").unwrap();

        let files = dirs.discover(".json").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_follows_symlinks_to_files() {
        use std::os::unix::fs::symlink;

        let (temp_dir, dirs) = layout();
        dirs.ensure().unwrap();
        let elsewhere = temp_dir.path().join("elsewhere");
        fs::create_dir_all(elsewhere.join("dir.json")).unwrap();
        fs::write(elsewhere.join("target.json"), "{}").unwrap();

        fs::write(dirs.input().join("a.json"), "{}").unwrap();
        symlink(elsewhere.join("target.json"), dirs.input().join("linked.json")).unwrap();
        symlink(elsewhere.join("dir.json"), dirs.input().join("linked_dir.json")).unwrap();
        symlink(elsewhere.join("gone.json"), dirs.input().join("dangling.json")).unwrap();

        let files = dirs.discover(".json").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.json", "linked.json"]);
    }

    #[test]
    fn test_discover_missing_input_is_error() {
        let dirs = LifecycleDirs::new("/definitely/not/here", "/tmp/out");
        assert!(matches!(dirs.discover(".json"), Err(BridgeError::Io(_))));
    }

    #[test]
    fn test_output_path_keeps_file_name() {
        let dirs = LifecycleDirs::new("/in", "/out");
        assert_eq!(
            dirs.output_path(Path::new("/in/users.json")),
            PathBuf::from("/out/users.json")
        );
    }

    #[tokio::test]
    async fn test_move_overwrites_destination() {
        let (_temp_dir, dirs) = layout();
        dirs.ensure().unwrap();
        let input = dirs.input().join("users.json");
        fs::write(&input, "new").unwrap();
        fs::write(dirs.failed().join("users.json"), "old").unwrap();

        let target = dirs.move_to_failed(&input).await.unwrap();

        assert!(!input.exists());
        assert_eq!(fs::read_to_string(target).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_move_missing_file_is_io_error() {
        let (_temp_dir, dirs) = layout();
        dirs.ensure().unwrap();

        let result = dirs
            .move_to_processed(&dirs.input().join("missing.json"))
            .await;
        assert!(matches!(result, Err(BridgeError::Io(_))));
    }
}
