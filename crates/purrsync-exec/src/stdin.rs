//! One-shot list producers over a reader

use std::io::{self, IsTerminal, Read};
use std::sync::Mutex;

use purrsync_core::{Error, ListProducer, Production};

use crate::lines::split_lines;

/// Produces one element per line of a reader, once.
///
/// The first production run drains the reader; later runs yield nothing.
pub struct ReaderProducer<R> {
    label: String,
    reader: Mutex<Option<R>>,
}

/// Paths piped in on standard input.
pub type StdinProducer = ReaderProducer<io::Stdin>;

impl<R: Read> ReaderProducer<R> {
    pub fn new(label: impl Into<String>, reader: R) -> Self {
        Self {
            label: label.into(),
            reader: Mutex::new(Some(reader)),
        }
    }

    /// A producer that never yields anything.
    pub fn exhausted(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            reader: Mutex::new(None),
        }
    }
}

impl StdinProducer {
    /// Standard input, unless it is a terminal.
    pub fn stdin() -> Self {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            tracing::debug!("stdin is a terminal, not reading paths from it");
            Self::exhausted("stdin")
        } else {
            Self::new("stdin", stdin)
        }
    }
}

impl<R> std::fmt::Debug for ReaderProducer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderProducer")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl<R: Read> ListProducer for ReaderProducer<R> {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn produce(&self) -> purrsync_core::Result<Production<'_>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| Error::Producer {
                message: format!("{} reader lock poisoned", self.label),
            })?
            .take();

        let Some(mut reader) = reader else {
            return Ok(Box::new(std::iter::empty()));
        };

        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer).map_err(|e| Error::Producer {
            message: format!("failed to read {}: {}", self.label, e),
        })?;
        Ok(Box::new(split_lines(&buffer).into_iter().map(Ok)))
    }
}
