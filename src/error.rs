//! Error types for the `untelecine` crate.
//!
//! This module defines [`UntelecineError`], the unified error type returned by
//! all fallible operations in the crate, and [`ErrorKind`], the coarse
//! category each error belongs to. Errors carry the offending values (cycle,
//! offsets, counts, line numbers) so callers can report them without extra
//! logging.

use std::{io::Error as IoError, path::PathBuf};

use thiserror::Error;

use crate::rational::FrameRate;

/// Coarse classification of an [`UntelecineError`].
///
/// Every failure in this crate means the input violated a precondition; none
/// of them are transient, so none are worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A malformed cycle, offset list, or misaligned sequence was passed in.
    InvalidArgument,
    /// An external collaborator (e.g. a deinterlace kernel) produced output
    /// the engine cannot work with.
    InvalidConfiguration,
    /// A D2V index file could not be parsed.
    Parse,
    /// An I/O error occurred while reading an index file.
    Io,
}

/// The unified error type for all `untelecine` operations.
///
/// Every public function that can fail returns `Result<T, UntelecineError>`.
/// Conversions validate their arguments before touching any state, so an
/// error never leaves flags and frames out of step.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UntelecineError {
    /// The selection cycle was zero.
    #[error("Cycle must be greater than or equal to 1 (got {0})")]
    InvalidCycle(usize),

    /// A decimation cycle longer than the stream it was applied to.
    #[error("Cycle of {cycle} is longer than the {frames} frames being decimated")]
    CycleTooLong {
        /// The requested cycle.
        cycle: usize,
        /// Number of frames in the stream.
        frames: usize,
    },

    /// An empty offset list was given to a cyclic selection.
    #[error("Offsets must not be empty")]
    EmptyOffsets,

    /// An offset does not fit inside the cycle.
    #[error("Offset {offset} is out of range for a cycle of {cycle}")]
    OffsetOutOfRange {
        /// The offending offset.
        offset: usize,
        /// The cycle length it was checked against.
        cycle: usize,
    },

    /// Decimation was asked to keep as many (or more) offsets as the cycle
    /// has frames, which would not drop anything.
    #[error("Invalid offsets: {count} offsets cannot be used with a cycle of {cycle}")]
    TooManyOffsets {
        /// Number of offsets supplied.
        count: usize,
        /// The decimation cycle.
        cycle: usize,
    },

    /// Two sequences that must be index-aligned have different lengths.
    #[error("Length mismatch for {what}: expected {expected} entries, got {actual}")]
    LengthMismatch {
        /// Which sequence was checked (e.g. `"frames"`, `"combing reports"`).
        what: &'static str,
        /// The length it had to match.
        expected: usize,
        /// The length it actually had.
        actual: usize,
    },

    /// A frame rate with a zero numerator or denominator, or unparsable text.
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(String),

    /// A deinterlace kernel changed the frame rate by something other than
    /// exactly 1x or 2x.
    #[error(
        "The kernel returned an unsupported frame rate ({output}) for input {input}. \
         Only single-rate and double-rate deinterlacing is supported"
    )]
    UnsupportedRateMultiplier {
        /// Frame rate of the clip fed to the kernel.
        input: FrameRate,
        /// Frame rate declared by the kernel output.
        output: FrameRate,
    },

    /// The top-field-first and bottom-field-first kernel outputs disagree on
    /// their frame rate.
    #[error("Kernel outputs disagree on frame rate: top-first {top_first}, bottom-first {bottom_first}")]
    KernelRateMismatch {
        /// Rate of the top-field-first output.
        top_first: FrameRate,
        /// Rate of the bottom-field-first output.
        bottom_first: FrameRate,
    },

    /// The deinterlace kernel itself failed.
    #[error("Deinterlace kernel error: {0}")]
    KernelError(String),

    /// The index file could not be opened.
    #[error("Failed to open index file at {path}: {reason}")]
    IndexOpen {
        /// Path that was passed to [`D2vIndex::open`](crate::D2vIndex::open).
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The index file is malformed.
    #[error("Failed to parse D2V index at line {line}: {reason}")]
    IndexParse {
        /// 1-based line number of the offending line.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),
}

impl UntelecineError {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCycle(_)
            | Self::CycleTooLong { .. }
            | Self::EmptyOffsets
            | Self::OffsetOutOfRange { .. }
            | Self::TooManyOffsets { .. }
            | Self::LengthMismatch { .. }
            | Self::InvalidFrameRate(_) => ErrorKind::InvalidArgument,
            Self::UnsupportedRateMultiplier { .. }
            | Self::KernelRateMismatch { .. }
            | Self::KernelError(_) => ErrorKind::InvalidConfiguration,
            Self::IndexParse { .. } => ErrorKind::Parse,
            Self::IndexOpen { .. } | Self::IoError(_) => ErrorKind::Io,
        }
    }

    /// Returns `true` for malformed caller input.
    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    pub(crate) fn length_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            what,
            expected,
            actual,
        }
    }
}
