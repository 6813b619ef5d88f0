//! Human-readable reporting channel.

use raclient_types::{RaError, Result};
use std::fmt::Display;
use std::io::{self, Write};

/// Marks every line the console writes.
pub const OUTPUT_PREFIX: &str = "Output> ";

/// Writes `Output> `-prefixed lines to `W`.
#[derive(Debug)]
pub struct Console<W> {
    out: W,
}

impl Console<io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Writes one prefixed line.
    ///
    /// # Errors
    ///
    /// Returns [`RaError::Console`] if the underlying writer fails.
    pub fn line(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.out, "{OUTPUT_PREFIX}{text}").map_err(RaError::Console)
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
