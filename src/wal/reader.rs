//! Log Reader
//!
//! Reads the log file line by line, decoding each line on the way.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

use super::Entry;

/// One line of the log, decoded or not
#[derive(Debug)]
pub struct LogLine {
    /// 1-based line number in the file
    pub number: u64,

    /// The decoded entry, or why the line could not be decoded
    pub entry: Result<Entry>,
}

/// Reads lines from the log file sequentially
pub struct LogReader {
    path: PathBuf,
    reader: BufReader<File>,
    line_number: u64,
    buf: Vec<u8>,
}

impl LogReader {
    /// Open a log file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(StoreError::io(path))?;
        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            line_number: 0,
            buf: Vec::new(),
        })
    }

    /// Read the next line.
    ///
    /// `Ok(None)` at end of file. A line that fails to decode is still
    /// returned (with its error inside); only I/O failures end the read.
    pub fn next_line(&mut self) -> Result<Option<LogLine>> {
        self.buf.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .map_err(StoreError::io(&self.path))?;
        if read == 0 {
            return Ok(None);
        }

        self.line_number += 1;
        Ok(Some(LogLine {
            number: self.line_number,
            entry: Entry::decode(&self.buf),
        }))
    }

    /// Path of the file being read
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for LogReader {
    type Item = Result<LogLine>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}
