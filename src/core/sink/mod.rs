//! Newline-delimited JSON file sink
//!
//! Each item becomes one compact JSON object followed by `\n`. The output file
//! is created or truncated up front and written through a buffered writer; an
//! I/O error stops the write and may leave a partial file behind.

use crate::core::traits::Sink;
use crate::domain::{BridgeError, Result, TargetUser};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::path::Path;

const WRITE_BUFFER_BYTES: usize = 64 * 1024;

/// Writes items as JSON lines
#[derive(Debug, Clone)]
pub struct JsonLinesSink<T> {
    _item: PhantomData<fn(T)>,
}

/// Sink for target users
pub type UserSink = JsonLinesSink<TargetUser>;

impl<T> JsonLinesSink<T> {
    /// Create a new sink
    pub fn new() -> Self {
        Self { _item: PhantomData }
    }
}

impl<T> Default for JsonLinesSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize> Sink for JsonLinesSink<T> {
    type Item = T;

    fn write(&self, items: &mut dyn Iterator<Item = T>, output: &Path) -> Result<usize> {
        let file = File::create(output).map_err(|e| {
            BridgeError::Io(format!("Failed to create {}: {}", output.display(), e))
        })?;
        let mut writer = BufWriter::with_capacity(WRITE_BUFFER_BYTES, file);

        let mut written = 0;
        for item in items {
            serde_json::to_writer(&mut writer, &item)?;
            writer.write_all(b"\n")?;
            written += 1;
        }

        writer.flush().map_err(|e| {
            BridgeError::Io(format!("Failed to flush {}: {}", output.display(), e))
        })?;

        tracing::debug!(output = %output.display(), lines = written, "Wrote output file");
        Ok(written)
    }
}
