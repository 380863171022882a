//! Pipeline stage traits
//!
//! These are the seams between the orchestrator and the three record stages.
//! The orchestrator only ever sees trait objects, so tests can substitute any
//! stage with a stub.

use crate::domain::Result;
use std::path::Path;

/// Lazy, forward-only sequence of decoded items
///
/// Dropping the sequence releases whatever resource backs it.
pub type RecordStream<T> = Box<dyn Iterator<Item = Result<T>> + Send>;

/// Reads a sequence of items out of one input file
pub trait Source: Send + Sync {
    /// Item type produced by this source
    type Item;

    /// Open `input` and return a lazy stream over its items
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened. Errors found while
    /// streaming are yielded as `Err` items instead.
    fn read(&self, input: &Path) -> Result<RecordStream<Self::Item>>;
}

/// Maps one item into another without side effects
pub trait Transformer: Send + Sync {
    /// Input item type
    type Input;
    /// Output item type
    type Output;

    /// Transform a single item
    fn transform(&self, input: Self::Input) -> Self::Output;
}

/// Writes a finite sequence of items to one output file
pub trait Sink: Send + Sync {
    /// Item type consumed by this sink
    type Item;

    /// Write every item to `output`, replacing any existing file
    ///
    /// Returns the number of items written.
    ///
    /// # Errors
    ///
    /// Returns an error on the first failed write; remaining items are not
    /// written and a partial file may be left behind.
    fn write(&self, items: &mut dyn Iterator<Item = Self::Item>, output: &Path) -> Result<usize>;
}
