//! Memory trace parsing.
//!
//! A trace is a text file with one access per line:
//!
//! ```text
//! r ffe04540
//! w 0x0000_1f80
//! ```
//!
//! The operation is `r` or `w` (either case) and the address is hexadecimal,
//! optionally prefixed with `0x` and grouped with underscores. Blank lines and
//! lines starting with `#` are ignored.

use std::io::{BufRead, Lines};

use crate::common::{AccessType, TraceError};

/// One trace record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Read or write.
    pub op: AccessType,
    /// Byte address.
    pub address: u32,
}

/// Parses one trace line.
///
/// # Arguments
///
/// * `line_no` - 1-based line number, used in error messages.
/// * `line` - The raw line.
///
/// # Returns
///
/// `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns [`TraceError`] if the line is not a valid record.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<TraceRecord>, TraceError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut fields = line.split_whitespace();
    let (Some(op), Some(addr), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(TraceError::Malformed {
            line: line_no,
            text: line.to_owned(),
        });
    };

    let op = match op {
        "r" | "R" => AccessType::Read,
        "w" | "W" => AccessType::Write,
        other => {
            return Err(TraceError::UnknownOperation {
                line: line_no,
                op: other.to_owned(),
            });
        }
    };

    let digits = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr)
        .replace('_', "");
    let address =
        u32::from_str_radix(&digits, 16).map_err(|source| TraceError::InvalidAddress {
            line: line_no,
            text: addr.to_owned(),
            source,
        })?;

    Ok(Some(TraceRecord { op, address }))
}

/// Streams records out of a buffered reader.
#[derive(Debug)]
pub struct TraceReader<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;
            match parse_line(self.line_no, &line) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
