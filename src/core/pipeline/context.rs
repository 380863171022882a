//! Per-file diagnostic context

use std::path::{Path, PathBuf};
use tracing::Span;

/// Identity of the file a task is working on, and which attempt it is on
///
/// A fresh context is created for every file and passed down the call chain
/// by value; [`FileContext::span`] carries the same data into log output.
#[derive(Debug, Clone)]
pub struct FileContext {
    /// File name without directory, as used for the output and lifecycle paths
    pub filename: String,

    /// Full path of the input file
    pub input: PathBuf,

    /// 1-based attempt number, 0 before the first attempt starts
    pub attempt: usize,
}

impl FileContext {
    /// Create a context for `input`
    pub fn new(input: &Path) -> Self {
        let filename = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.display().to_string());

        Self {
            filename,
            input: input.to_path_buf(),
            attempt: 0,
        }
    }

    /// Span for everything logged while this file is being handled
    ///
    /// The `attempt` field starts empty and is recorded by the retry loop.
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "file",
            filename = %self.filename,
            attempt = tracing::field::Empty
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_extracts_filename() {
        let ctx = FileContext::new(Path::new("/data/in/users-01.json"));
        assert_eq!(ctx.filename, "users-01.json");
        assert_eq!(ctx.input, PathBuf::from("/data/in/users-01.json"));
        assert_eq!(ctx.attempt, 0);
    }

    #[test]
    fn test_new_without_file_name_falls_back_to_path() {
        let ctx = FileContext::new(Path::new("/"));
        assert_eq!(ctx.filename, "/");
    }
}
