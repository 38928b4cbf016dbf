use std::{fmt, io};

use thiserror::Error;

/// Source operation that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceOp {
    /// `peek`
    Peek,
    /// `advance`
    Advance,
    /// `seek_row`
    Seek,
    /// `close`
    Close,
}

impl fmt::Display for SourceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            SourceOp::Peek => "peek",
            SourceOp::Advance => "advance",
            SourceOp::Seek => "seek",
            SourceOp::Close => "close",
        };
        f.write_str(op)
    }
}

/// Error surfaced by [`InternalScanner`](super::InternalScanner) calls.
#[derive(Debug, Error)]
pub enum ScanError {
    /// An underlying source failed; the call in progress was aborted.
    #[error("source {source_index} failed to {op}: {source}")]
    Io {
        /// Position of the failing source in the scanner's source list.
        source_index: usize,
        /// Operation that failed.
        op: SourceOp,
        /// Error reported by the source.
        #[source]
        source: io::Error,
    },
    /// The scanner was used after `close` or after an earlier failure.
    #[error("illegal scanner state: {0}")]
    IllegalState(&'static str),
}

impl ScanError {
    pub(crate) fn io(source_index: usize, op: SourceOp, source: io::Error) -> Self {
        ScanError::Io {
            source_index,
            op,
            source,
        }
    }

    /// Whether this error came from an underlying source.
    pub fn is_io(&self) -> bool {
        matches!(self, ScanError::Io { .. })
    }
}
