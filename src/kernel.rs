//! Interfaces to the pixel-processing collaborators.
//!
//! The engine does not match fields or deinterlace by itself. Field matching
//! results are handed to [`Clip::recover`](crate::Clip::recover) as
//! [`FieldMatches`]; deinterlacing goes through a [`DeinterlaceKernel`],
//! which any closure of the right shape implements.
//!
//! # Example
//!
//! ```
//! use untelecine::{FieldOrder, FrameRate, KernelOutput, UntelecineError};
//!
//! // A double-rate "kernel" over frame indices: every frame becomes two.
//! let kernel = |frames: &[usize], _order: FieldOrder| -> Result<KernelOutput<usize>, UntelecineError> {
//!     Ok(KernelOutput {
//!         frames: frames.iter().flat_map(|&f| [f, f]).collect(),
//!         frame_rate: FrameRate::NTSC_FIELDS,
//!     })
//! };
//! # let _ = kernel;
//! ```

use crate::error::UntelecineError;
use crate::flags::{CombingReport, FieldOrder};
use crate::rational::FrameRate;

/// A full processed sequence plus the rate it is declared at.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelOutput<F> {
    /// Processed frames; one or two per input frame.
    pub frames: Vec<F>,
    /// Declared output frame rate.
    pub frame_rate: FrameRate,
}

/// Something that deinterlaces a whole sequence for a given field order.
///
/// Called twice per [`Clip::deinterlace`](crate::Clip::deinterlace), once
/// with [`FieldOrder::TopFirst`] and once with [`FieldOrder::BottomFirst`].
/// The output rate must be exactly one or two times `frame_rate`.
pub trait DeinterlaceKernel<F> {
    /// Deinterlace `frames` (declared at `frame_rate`) assuming `order`.
    fn deinterlace(
        &self,
        frames: &[F],
        frame_rate: FrameRate,
        order: FieldOrder,
    ) -> Result<KernelOutput<F>, UntelecineError>;
}

impl<F, K> DeinterlaceKernel<F> for K
where
    K: Fn(&[F], FieldOrder) -> Result<KernelOutput<F>, UntelecineError>,
{
    fn deinterlace(
        &self,
        frames: &[F],
        _frame_rate: FrameRate,
        order: FieldOrder,
    ) -> Result<KernelOutput<F>, UntelecineError> {
        self(frames, order)
    }
}

/// Results of running a field matcher over a clip in both field orders.
///
/// All three sequences must be index-aligned with the clip's frames.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatches<F> {
    /// Frames matched assuming top-field-first.
    pub top_first: Vec<F>,
    /// Frames matched assuming bottom-field-first.
    pub bottom_first: Vec<F>,
    /// The matcher's per-frame verdict.
    pub reports: Vec<CombingReport>,
}

impl<F> FieldMatches<F> {
    pub(crate) fn ensure_len(&self, expected: usize) -> Result<(), UntelecineError> {
        for (what, actual) in [
            ("top-first matches", self.top_first.len()),
            ("bottom-first matches", self.bottom_first.len()),
            ("combing reports", self.reports.len()),
        ] {
            if actual != expected {
                return Err(UntelecineError::length_mismatch(what, expected, actual));
            }
        }
        Ok(())
    }
}
