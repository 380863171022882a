//! Structural JSON scanner
//!
//! A forward-only reader that understands just enough JSON to walk the top
//! level of a document: punctuation, object keys, and the extent of a value.
//! Values are either skipped (tracking brackets and strings only) or copied
//! out verbatim so that serde_json can decode them one at a time.

use std::fmt;
use std::io::{self, BufRead};

/// Failure while scanning
#[derive(Debug)]
pub(crate) enum ScanError {
    /// Underlying read failed
    Io(io::Error),
    /// Document structure is broken at `offset`
    Syntax { offset: u64, message: String },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Io(e) => write!(f, "{e}"),
            ScanError::Syntax { offset, message } => write!(f, "{message} at byte {offset}"),
        }
    }
}

impl From<io::Error> for ScanError {
    fn from(err: io::Error) -> Self {
        ScanError::Io(err)
    }
}

pub(crate) type ScanResult<T> = std::result::Result<T, ScanError>;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Byte-level cursor over a buffered reader
pub(crate) struct Scanner<R> {
    reader: R,
    offset: u64,
}

impl<R: BufRead> Scanner<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self { reader, offset: 0 }
    }

    fn syntax<T>(&self, message: impl Into<String>) -> ScanResult<T> {
        Err(ScanError::Syntax {
            offset: self.offset,
            message: message.into(),
        })
    }

    /// Buffered bytes at the current position; empty at end of input
    fn fill(&mut self) -> ScanResult<&[u8]> {
        loop {
            match self.reader.fill_buf() {
                Ok(_) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(self.reader.fill_buf()?)
    }

    fn advance(&mut self, amount: usize) {
        self.reader.consume(amount);
        self.offset += amount as u64;
    }

    /// Look at the next byte without consuming it
    pub(crate) fn peek(&mut self) -> ScanResult<Option<u8>> {
        Ok(self.fill()?.first().copied())
    }

    fn bump(&mut self) {
        self.advance(1);
    }

    fn next_byte(&mut self) -> ScanResult<Option<u8>> {
        let byte = self.peek()?;
        if byte.is_some() {
            self.bump();
        }
        Ok(byte)
    }

    /// Skip whitespace and return the next significant byte, unconsumed
    pub(crate) fn peek_significant(&mut self) -> ScanResult<Option<u8>> {
        loop {
            let buf = self.fill()?;
            if buf.is_empty() {
                return Ok(None);
            }
            let blanks = buf.iter().take_while(|b| b.is_ascii_whitespace()).count();
            let next = buf.get(blanks).copied();
            self.advance(blanks);
            if next.is_some() {
                return Ok(next);
            }
        }
    }

    /// Consume a leading UTF-8 byte order mark, if there is one
    pub(crate) fn skip_bom(&mut self) -> ScanResult<()> {
        for (i, &expected) in UTF8_BOM.iter().enumerate() {
            match self.peek()? {
                Some(byte) if byte == expected => self.bump(),
                _ if i == 0 => return Ok(()),
                _ => return self.syntax("Incomplete byte order mark"),
            }
        }
        Ok(())
    }

    /// Consume `expected` after optional whitespace
    pub(crate) fn expect(&mut self, expected: u8, what: &str) -> ScanResult<()> {
        match self.peek_significant()? {
            Some(byte) if byte == expected => {
                self.bump();
                Ok(())
            }
            Some(byte) => self.syntax(format!(
                "Expected {what} but found '{}'",
                char::from(byte).escape_default()
            )),
            None => self.syntax(format!("Expected {what} but reached end of document")),
        }
    }

    /// Consume the next significant byte if it equals `byte`
    pub(crate) fn eat(&mut self, byte: u8) -> ScanResult<bool> {
        if self.peek_significant()? == Some(byte) {
            self.bump();
            return Ok(true);
        }
        Ok(false)
    }

    /// Read an object key, unescaped
    pub(crate) fn read_key(&mut self) -> ScanResult<String> {
        if self.peek_significant()? != Some(b'"') {
            return self.syntax("Expected a quoted field name");
        }
        let start = self.offset;
        let mut raw = Vec::new();
        self.copy_string(&mut raw)?;
        serde_json::from_slice(&raw).map_err(|e| ScanError::Syntax {
            offset: start,
            message: format!("Invalid field name: {e}"),
        })
    }

    /// Skip one value without interpreting it
    pub(crate) fn skip_value(&mut self) -> ScanResult<()> {
        self.walk_value(None)
    }

    /// Copy one value verbatim into `out`
    pub(crate) fn capture_value(&mut self, out: &mut Vec<u8>) -> ScanResult<()> {
        out.clear();
        self.walk_value(Some(out))
    }

    fn walk_value(&mut self, mut out: Option<&mut Vec<u8>>) -> ScanResult<()> {
        match self.peek_significant()? {
            None => self.syntax("Expected a value but reached end of document"),
            Some(b'{') | Some(b'[') => self.walk_container(out),
            Some(b'"') => {
                let mut scratch = Vec::new();
                self.copy_string(out.as_deref_mut().unwrap_or(&mut scratch))
            }
            Some(b',') | Some(b'}') | Some(b']') | Some(b':') => {
                self.syntax("Expected a value")
            }
            Some(_) => {
                // number, literal, or garbage; serde_json judges it later
                loop {
                    let buf = self.fill()?;
                    let end = buf.iter().position(|&byte| {
                        matches!(byte, b',' | b'}' | b']') || byte.is_ascii_whitespace()
                    });
                    let run = end.unwrap_or(buf.len());
                    let done = end.is_some() || buf.is_empty();
                    if let Some(out) = out.as_deref_mut() {
                        out.extend_from_slice(&buf[..run]);
                    }
                    self.advance(run);
                    if done {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn walk_container(&mut self, mut out: Option<&mut Vec<u8>>) -> ScanResult<()> {
        let mut closers: Vec<u8> = Vec::new();
        loop {
            let buf = self.fill()?;
            if buf.is_empty() {
                return self.syntax("Unterminated object or array");
            }

            let mut run = 0;
            let mut stop = None;
            for &byte in buf {
                match byte {
                    b'"' => {
                        stop = Some(Stop::String);
                        break;
                    }
                    b'{' => closers.push(b'}'),
                    b'[' => closers.push(b']'),
                    b'}' | b']' => {
                        if closers.pop() != Some(byte) {
                            stop = Some(Stop::Unbalanced(byte));
                            break;
                        }
                    }
                    _ => {}
                }
                run += 1;
                if closers.is_empty() {
                    stop = Some(Stop::Closed);
                    break;
                }
            }

            if let Some(out) = out.as_deref_mut() {
                out.extend_from_slice(&buf[..run]);
            }
            self.advance(run);

            match stop {
                None => {}
                Some(Stop::String) => {
                    let mut scratch = Vec::new();
                    self.copy_string(out.as_deref_mut().unwrap_or(&mut scratch))?;
                }
                Some(Stop::Unbalanced(byte)) => {
                    return self.syntax(format!("Unbalanced '{}'", char::from(byte)));
                }
                Some(Stop::Closed) => return Ok(()),
            }
        }
    }

    /// Copy a string literal, quotes and escapes included, into `out`
    fn copy_string(&mut self, out: &mut Vec<u8>) -> ScanResult<()> {
        // opening quote
        if let Some(byte) = self.next_byte()? {
            out.push(byte);
        }
        let mut escaped = false;
        loop {
            let buf = self.fill()?;
            if buf.is_empty() {
                return self.syntax("Unterminated string");
            }

            let mut end = None;
            for (i, &byte) in buf.iter().enumerate() {
                if escaped {
                    escaped = false;
                } else if byte == b'\\' {
                    escaped = true;
                } else if byte == b'"' {
                    end = Some(i + 1);
                    break;
                }
            }

            let run = end.unwrap_or(buf.len());
            out.extend_from_slice(&buf[..run]);
            self.advance(run);
            if end.is_some() {
                return Ok(());
            }
        }
    }
}

/// Why `walk_container` stopped copying a run
enum Stop {
    String,
    Unbalanced(u8),
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    fn scanner(input: &str) -> Scanner<Cursor<Vec<u8>>> {
        Scanner::new(Cursor::new(input.as_bytes().to_vec()))
    }

    fn tiny_buffered(input: &str, capacity: usize) -> Scanner<BufReader<Cursor<Vec<u8>>>> {
        Scanner::new(BufReader::with_capacity(
            capacity,
            Cursor::new(input.as_bytes().to_vec()),
        ))
    }

    #[test]
    fn test_read_key_unescapes() {
        let mut s = scanner(r#"  "value" : 1"#);
        assert_eq!(s.read_key().unwrap(), "value");
        s.expect(b':', "':'").unwrap();
    }

    #[test]
    fn test_skip_nested_value_with_brackets_in_strings() {
        let mut s = scanner(r#"{"a": ["]", "}", {"b": "\"}"}]} , next"#);
        s.skip_value().unwrap();
        assert!(s.eat(b',').unwrap());
    }

    #[test]
    fn test_capture_object_verbatim() {
        let mut s = scanner(r#" {"id": "1", "n": [1, 2]} ]"#);
        let mut buf = Vec::new();
        s.capture_value(&mut buf).unwrap();
        assert_eq!(buf, br#"{"id": "1", "n": [1, 2]}"#);
        assert_eq!(s.peek_significant().unwrap(), Some(b']'));
    }

    #[test]
    fn test_capture_scalar_stops_at_delimiter() {
        let mut s = scanner("12.5e3,true");
        let mut buf = Vec::new();
        s.capture_value(&mut buf).unwrap();
        assert_eq!(buf, b"12.5e3");
        assert!(s.eat(b',').unwrap());
    }

    #[test]
    fn test_unterminated_container_is_syntax_error() {
        let mut s = scanner(r#"{"a": [1, 2"#);
        assert!(matches!(s.skip_value(), Err(ScanError::Syntax { .. })));
    }

    #[test]
    fn test_unbalanced_closer_is_syntax_error() {
        let mut s = scanner(r#"{"a": 1]"#);
        let err = s.skip_value().unwrap_err();
        assert!(err.to_string().contains("Unbalanced"));
    }

    #[test]
    fn test_expect_reports_offset() {
        let mut s = scanner("   x");
        let err = s.expect(b'{', "'{'").unwrap_err();
        assert_eq!(err.to_string(), "Expected '{' but found 'x' at byte 3");
    }

    #[test]
    fn test_capture_across_buffer_boundaries() {
        let doc = r#"  {"id": "a\"b\\", "tags": ["]", "{"], "n": -12.5e3, "deep": [[{}]]} , 7"#;
        let expected = doc.trim_start().split(" , ").next().unwrap().as_bytes();

        for capacity in 1..=7 {
            let mut s = tiny_buffered(doc, capacity);
            let mut buf = Vec::new();
            s.capture_value(&mut buf).unwrap();
            assert_eq!(buf, expected, "capacity {capacity}");
            assert!(s.eat(b',').unwrap());

            s.capture_value(&mut buf).unwrap();
            assert_eq!(buf, b"7", "capacity {capacity}");
            assert_eq!(s.peek_significant().unwrap(), None);
        }
    }

    #[test]
    fn test_unbalanced_offset_across_buffer_boundaries() {
        let mut s = tiny_buffered(r#"{"a": [1, 2}"#, 3);
        let err = s.skip_value().unwrap_err();
        assert_eq!(err.to_string(), "Unbalanced '}' at byte 11");
    }

    #[test]
    fn test_skip_bom() {
        let mut s = scanner("\u{feff} {}");
        s.skip_bom().unwrap();
        s.expect(b'{', "'{'").unwrap();

        let mut s = scanner("{}");
        s.skip_bom().unwrap();
        s.expect(b'{', "'{'").unwrap();

        let mut s = Scanner::new(Cursor::new(vec![0xEF, 0xBB, b'{']));
        assert!(matches!(s.skip_bom(), Err(ScanError::Syntax { offset: 2, .. })));
    }
}
