use std::{io, time::Duration};
use thiserror::Error;

/// Error type for the library.
#[derive(Debug, Error)]
pub enum Error {
    /// The child program could not be started.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        /// Program that was asked for.
        program: String,
        /// Underlying reason.
        #[source]
        source: io::Error,
    },
    /// Error in pattern parsing.
    #[error("failed to parse pattern '{0}'")]
    RegexParsing(String),
    /// A timeout was reached while waiting for a pattern.
    #[error(
        "reached the timeout ({timeout:?}) waiting for {patterns:?}, last output: {tail:?}"
    )]
    ExpectTimeout {
        /// Timeout that elapsed.
        timeout: Duration,
        /// Patterns that were not seen.
        patterns: Vec<String>,
        /// Tail of the unconsumed output.
        tail: String,
    },
    /// The output stream closed while waiting for a pattern.
    #[error("output closed waiting for {patterns:?}, last output: {tail:?}")]
    Eof {
        /// Patterns that were not seen.
        patterns: Vec<String>,
        /// Tail of the unconsumed output.
        tail: String,
    },
    /// A write was attempted after the child program exited.
    #[error("the child program has already exited")]
    BrokenSession,
    /// Error in IO operation.
    #[error(transparent)]
    Io(#[from] io::Error),
}
