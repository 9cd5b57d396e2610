//! Console input: prompting and number parsing.

use std::io::{self, BufRead, Write};

use thiserror::Error;

/// Text that could not be turned into the number a prompt asked for.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("'{0}' is not a valid whole number")]
    Integer(String),
    #[error("'{0}' is not a valid number")]
    Decimal(String),
}

/// Parse a base-10 integer. Wide enough that any out-of-range value still
/// reaches domain validation instead of failing here.
pub fn parse_integer(raw: &str) -> Result<i128, ParseError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i128>()
        .map_err(|_| ParseError::Integer(trimmed.to_string()))
}

/// Parse a decimal number; a comma is accepted as the decimal separator.
pub fn parse_decimal(raw: &str) -> Result<f64, ParseError> {
    let trimmed = raw.trim();
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| ParseError::Decimal(trimmed.to_string()))
}

/// Line-oriented prompt over any reader/writer pair.
pub struct Prompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Print `message` and read one line. `Ok(None)` means end of input.
    pub fn ask(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.writer, "{message}")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim_end_matches(['\n', '\r']).to_string();
        Ok(Some(line))
    }

    pub fn say(&mut self, message: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.writer, "{message}")
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}
