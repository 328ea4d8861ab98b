//! Structural error taxonomy
//!
//! Every variant is a malformed-source condition. None of them are
//! recoverable: the converter aborts before any output is written.

use thiserror::Error;

/// A structural defect in the source document.
///
/// Line numbers are 1-indexed positions in the input file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    /// The first line of the document must start with `#`.
    #[error("line 1 must be a top-level '#' heading")]
    MissingTitle,

    /// A line carries an odd number of backticks, so inline code spans
    /// cannot be paired up.
    #[error("line {line}: unbalanced inline code span (odd number of '`')")]
    UnbalancedCodeSpans { line: usize },

    /// A math start delimiter has no matching end delimiter on the same
    /// line.
    #[error("line {line}: math delimiter is never closed")]
    UnclosedMath { line: usize },

    /// A ```` ```math ```` fence is still open at end of input.
    #[error("line {line}: '```math' block is never closed")]
    UnclosedMathBlock { line: usize },
}
