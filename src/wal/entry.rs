//! Log entry definitions
//!
//! Defines a single log record and its one-line text encoding:
//!
//! ```text
//! <ACTION>,<base64(key)>,<base64(value)>\n
//! ```
//!
//! Key and value are standard padded base64, so neither can contain the
//! `,` delimiter or a newline no matter what bytes they hold.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;

use crate::error::{Result, StoreError};

/// Separator between the three fields of a line
const DELIMITER: u8 = b',';

/// Number of fields every well-formed line carries
const FIELD_COUNT: usize = 3;

/// What a log entry does to its key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// Set the key to the value
    Put,

    /// Remove the key (a tombstone)
    Delete,

    /// A token this version does not recognize.
    /// Kept as data; replay ignores it.
    Other(String),
}

impl Action {
    /// Token written for [`Action::Put`]
    pub const PUT_TOKEN: &'static str = "SET";

    /// Token written for [`Action::Delete`]
    pub const DELETE_TOKEN: &'static str = "DEL";

    /// Parse an action token verbatim
    pub fn from_token(token: &str) -> Self {
        match token {
            Self::PUT_TOKEN => Action::Put,
            Self::DELETE_TOKEN => Action::Delete,
            other => Action::Other(other.to_string()),
        }
    }

    /// The on-disk token for this action
    pub fn token(&self) -> &str {
        match self {
            Action::Put => Self::PUT_TOKEN,
            Action::Delete => Self::DELETE_TOKEN,
            Action::Other(token) => token.as_str(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A single record in the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub action: Action,
    pub key: Bytes,
    /// Empty for deletes
    pub value: Bytes,
}

impl Entry {
    /// Create a put record
    pub fn put(key: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        Self {
            action: Action::Put,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a delete record
    pub fn delete(key: impl Into<Bytes>) -> Self {
        Self {
            action: Action::Delete,
            key: key.into(),
            value: Bytes::new(),
        }
    }

    /// Create one put record per pair, in iteration order
    pub fn puts<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Vec<Self>
    where
        K: Into<Bytes>,
        V: Into<Bytes>,
    {
        pairs.into_iter().map(|(k, v)| Self::put(k, v)).collect()
    }

    /// Encode as one newline-terminated line. Never fails.
    pub fn encode(&self) -> String {
        let token = self.action.token();
        // base64 grows input by 4/3, plus delimiters and newline
        let mut line = String::with_capacity(
            token.len() + (self.key.len() + self.value.len()) * 4 / 3 + 10,
        );

        line.push_str(token);
        line.push(DELIMITER as char);
        STANDARD.encode_string(&self.key, &mut line);
        line.push(DELIMITER as char);
        STANDARD.encode_string(&self.value, &mut line);
        line.push('\n');
        line
    }

    /// Decode one line, with or without its trailing `\n` / `\r\n`.
    ///
    /// Fails with `BadLine` unless the line has exactly three fields, and
    /// with `CannotDecodeElement` if the key or value is not valid base64.
    pub fn decode(line: &[u8]) -> Result<Self> {
        let line = line.strip_suffix(b"\n").unwrap_or(line);
        let line = line.strip_suffix(b"\r").unwrap_or(line);

        let fields: Vec<&[u8]> = line.split(|&b| b == DELIMITER).collect();
        if fields.len() != FIELD_COUNT {
            return Err(StoreError::BadLine {
                fields: fields.len(),
            });
        }

        let key = STANDARD.decode(fields[1])?;
        let value = STANDARD.decode(fields[2])?;

        Ok(Self {
            action: Action::from_token(&String::from_utf8_lossy(fields[0])),
            key: Bytes::from(key),
            value: Bytes::from(value),
        })
    }
}
