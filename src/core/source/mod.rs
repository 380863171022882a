//! Streaming JSON document source
//!
//! Reads identity-provider export documents of the shape
//!
//! ```json
//! {"@odata.context": "...", "value": [{"id": "1", ...}, {"id": "2", ...}]}
//! ```
//!
//! one record at a time. The top-level object is walked structurally until the
//! array field (`value` by default) is reached; every entry of that array is
//! then copied out and decoded on demand, so peak memory is one record rather
//! than one document. A leading UTF-8 byte order mark is ignored.

mod scanner;

use crate::core::traits::{RecordStream, Source};
use crate::domain::{BridgeError, RawUser, Result};
use scanner::{ScanError, Scanner};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::marker::PhantomData;
use std::path::Path;

const DEFAULT_ARRAY_FIELD: &str = "value";
const READ_BUFFER_BYTES: usize = 64 * 1024;

/// Source for JSON documents holding records in one top-level array field
#[derive(Debug, Clone)]
pub struct JsonFileSource<T> {
    array_field: String,
    _item: PhantomData<fn() -> T>,
}

/// Source for identity-provider user exports
pub type UserSource = JsonFileSource<RawUser>;

impl<T> JsonFileSource<T> {
    /// Create a source reading the `value` array
    pub fn new() -> Self {
        Self {
            array_field: DEFAULT_ARRAY_FIELD.to_string(),
            _item: PhantomData,
        }
    }

    /// Read records from a differently named top-level field
    pub fn with_array_field(mut self, field: impl Into<String>) -> Self {
        self.array_field = field.into();
        self
    }
}

impl<T> Default for JsonFileSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Source for JsonFileSource<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Item = T;

    fn read(&self, input: &Path) -> Result<RecordStream<T>> {
        let file = File::open(input).map_err(|e| {
            BridgeError::Io(format!("Failed to open {}: {}", input.display(), e))
        })?;
        let reader = BufReader::with_capacity(READ_BUFFER_BYTES, file);
        let stream = open_array(reader, &self.array_field)?;
        Ok(Box::new(stream))
    }
}

/// Walk the document header up to the first entry of `field`
///
/// Returns an exhausted stream when the field is absent.
pub(crate) fn open_array<R, T>(reader: R, field: &str) -> Result<ArrayStream<R, T>>
where
    R: BufRead,
    T: DeserializeOwned,
{
    let mut scanner = Scanner::new(reader);

    let header = (|| -> std::result::Result<bool, ScanError> {
        scanner.skip_bom()?;
        scanner.expect(b'{', "content to be an object")?;
        let mut first = true;
        loop {
            if scanner.eat(b'}')? {
                return Ok(false);
            }
            if !first {
                scanner.expect(b',', "',' between fields")?;
            }
            first = false;

            let key = scanner.read_key()?;
            scanner.expect(b':', "':' after field name")?;
            if key == field {
                scanner.expect(b'[', &format!("'{field}' to be an array"))?;
                return Ok(true);
            }
            scanner.skip_value()?;
        }
    })();

    match header {
        Ok(found) => Ok(ArrayStream {
            scanner,
            buffer: Vec::new(),
            index: 0,
            done: !found,
            _item: PhantomData,
        }),
        Err(e) => Err(format_error(e)),
    }
}

fn format_error(err: ScanError) -> BridgeError {
    match err {
        ScanError::Io(e) => BridgeError::Io(e.to_string()),
        ScanError::Syntax { .. } => BridgeError::Format(err.to_string()),
    }
}

/// Lazy iterator over the entries of one JSON array
///
/// Owns the underlying reader; dropping the stream closes the file no matter
/// how far it was consumed. After the first error the stream is fused.
pub struct ArrayStream<R, T> {
    scanner: Scanner<R>,
    buffer: Vec<u8>,
    index: usize,
    done: bool,
    _item: PhantomData<fn() -> T>,
}

impl<R: BufRead, T: DeserializeOwned> ArrayStream<R, T> {
    /// Number of records yielded so far
    pub fn position(&self) -> usize {
        self.index
    }

    fn advance(&mut self) -> Result<Option<T>> {
        if self.scanner.eat(b']').map_err(format_error)? {
            return Ok(None);
        }
        if self.index > 0 {
            self.scanner
                .expect(b',', "',' or ']' after record")
                .map_err(format_error)?;
        }

        let index = self.index;
        self.scanner
            .capture_value(&mut self.buffer)
            .map_err(|e| match e {
                ScanError::Io(e) => BridgeError::Io(e.to_string()),
                ScanError::Syntax { .. } => BridgeError::decode(index, e.to_string()),
            })?;

        let record = serde_json::from_slice(&self.buffer)
            .map_err(|e| BridgeError::decode(index, e.to_string()))?;
        self.index += 1;
        Ok(Some(record))
    }
}

impl<R: BufRead, T: DeserializeOwned> Iterator for ArrayStream<R, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead, T: DeserializeOwned> std::iter::FusedIterator for ArrayStream<R, T> {}
