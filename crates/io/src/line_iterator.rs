use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;

use streaming_iterator::StreamingIterator;

/// A lending iterator over the trimmed lines of a type implementing Read,
/// which keeps track of the current line number for error reporting.
///
/// Iteration stops at the end of the input or at the first IO error, the
/// latter is available through [LineIterator::error].
pub struct LineIterator<T: Read> {
    reader: BufReader<T>,
    buffer: String,
    line_number: usize,
    error: Option<std::io::Error>,
    end: bool,
}

impl<T: Read> LineIterator<T> {
    pub fn new(reader: T) -> LineIterator<T> {
        LineIterator {
            reader: BufReader::new(reader),
            buffer: String::new(),
            line_number: 0,
            error: None,
            end: false,
        }
    }

    /// The one based number of the current line.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Takes the IO error that ended the iteration, if any.
    pub fn error(&mut self) -> Option<std::io::Error> {
        self.error.take()
    }
}

impl<T: Read> StreamingIterator for LineIterator<T> {
    type Item = str;

    fn advance(&mut self) {
        self.buffer.clear();
        match self.reader.read_line(&mut self.buffer) {
            Ok(n) if n > 0 => self.line_number += 1,
            Ok(_) => self.end = true,
            Err(error) => {
                self.error = Some(error);
                self.end = true;
            }
        }
    }

    fn get(&self) -> Option<&Self::Item> {
        if self.end {
            None
        } else {
            Some(self.buffer.trim())
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_trimmed_lines() {
        let mut lines = LineIterator::new("  first\r\n\tsecond\nthird".as_bytes());

        assert_eq!(lines.next(), Some("first"));
        assert_eq!(lines.next(), Some("second"));
        assert_eq!(lines.line_number(), 2);
        assert_eq!(lines.next(), Some("third"));
        assert_eq!(lines.next(), None);
        assert!(lines.error().is_none());
    }

    #[test]
    fn test_invalid_utf8() {
        let input: &[u8] = &[b'o', b'k', b'\n', 0xff, 0xfe, b'\n'];
        let mut lines = LineIterator::new(input);

        assert_eq!(lines.next(), Some("ok"));
        assert_eq!(lines.next(), None);
        assert!(lines.error().is_some());
    }
}
