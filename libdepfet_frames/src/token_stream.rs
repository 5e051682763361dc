use std::io::BufRead;

/// TokenStream is a forward-only, whitespace-delimited view of a readout text stream.
///
/// Sample blocks may wrap across any number of lines, while headers are line oriented, so
/// the stream buffers one line at a time and tracks both the current line number and the
/// number of bytes pulled from the underlying reader (used for progress reporting).
#[derive(Debug)]
pub struct TokenStream<R: BufRead> {
    reader: R,
    line: String,
    cursor: usize,
    line_number: usize,
    bytes_read: u64,
    is_ended: bool,
}

impl<R: BufRead> TokenStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            cursor: 0,
            line_number: 0,
            bytes_read: 0,
            is_ended: false,
        }
    }

    /// Get the next whitespace separated token, crossing line boundaries as needed.
    ///
    /// Returns `Ok(None)` once the stream is exhausted.
    pub fn next_token(&mut self) -> std::io::Result<Option<&str>> {
        let (start, stop) = loop {
            if let Some(span) = self.find_token() {
                break span;
            }
            if !self.fill_line()? {
                return Ok(None);
            }
        };
        self.cursor = stop;
        Ok(Some(&self.line[start..stop]))
    }

    /// Get all tokens of the next non-blank line.
    ///
    /// Any tokens left unread on the current line are returned as the error value of the
    /// inner result, so callers can report them as trailing data. Returns `Ok(None)` once
    /// the stream is exhausted.
    pub fn next_line(&mut self) -> std::io::Result<Option<Result<Vec<String>, String>>> {
        if let Some((start, stop)) = self.find_token() {
            return Ok(Some(Err(self.line[start..stop].to_string())));
        }
        loop {
            if !self.fill_line()? {
                return Ok(None);
            }
            let fields: Vec<String> = self.line.split_whitespace().map(String::from).collect();
            if !fields.is_empty() {
                self.cursor = self.line.len();
                return Ok(Some(Ok(fields)));
            }
        }
    }

    /// The 1-based number of the line currently buffered (0 before anything is read)
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Locate the next token on the buffered line without consuming it
    fn find_token(&self) -> Option<(usize, usize)> {
        let rest = &self.line[self.cursor..];
        let offset = rest.find(|c: char| !c.is_whitespace())?;
        let start = self.cursor + offset;
        let stop = self.line[start..]
            .find(char::is_whitespace)
            .map_or(self.line.len(), |len| start + len);
        Some((start, stop))
    }

    /// Buffer the next line. Returns false at end of stream.
    fn fill_line(&mut self) -> std::io::Result<bool> {
        if self.is_ended {
            return Ok(false);
        }
        self.line.clear();
        self.cursor = 0;
        let n_bytes = self.reader.read_line(&mut self.line)?;
        if n_bytes == 0 {
            self.is_ended = true;
            return Ok(false);
        }
        self.bytes_read += n_bytes as u64;
        self.line_number += 1;
        Ok(true)
    }
}
