//! Parallel per-frame decisions.
//!
//! This module provides [`decide_all_parallel`], which evaluates candidate
//! decisions across rayon threads. Each decision reads only its own frame's
//! flags and report, so there is no shared mutable state.
//!
//! The public API is exposed through [`Clip::recover`](crate::Clip::recover)
//! and [`Clip::deinterlace`](crate::Clip::deinterlace) when the `rayon`
//! feature is enabled; this module contains only the implementation.

use ::rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};

use crate::candidate::{Decision, SelectionMode, decide};
use crate::error::UntelecineError;
use crate::flags::{CombingReport, FrameFlags};

/// Decide every frame in parallel. Results are in frame order.
pub(crate) fn decide_all_parallel(
    flags: &[FrameFlags],
    reports: &[CombingReport],
    mode: SelectionMode,
) -> Result<Vec<Decision>, UntelecineError> {
    if reports.len() != flags.len() {
        return Err(UntelecineError::length_mismatch(
            "combing reports",
            flags.len(),
            reports.len(),
        ));
    }
    log::debug!("Deciding {} frames across rayon threads", flags.len());
    Ok(flags
        .par_iter()
        .zip(reports.par_iter())
        .map(|(flag, report)| decide(flag, report, mode))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::decide_all;
    use crate::flags::FieldOrder;

    #[test]
    fn matches_sequential_decisions() {
        let flags: Vec<FrameFlags> = (0..64)
            .map(|i| match i % 3 {
                0 => FrameFlags::progressive(false, false),
                1 => FrameFlags::interlaced(true),
                _ => FrameFlags::interlaced(false),
            })
            .collect();
        let reports: Vec<CombingReport> = (0..64)
            .map(|i| CombingReport::new((i % 2 == 0).then_some(true), FieldOrder::from_code(i % 3)))
            .collect();
        let mode = SelectionMode::Recovery;
        assert_eq!(
            decide_all_parallel(&flags, &reports, mode).unwrap(),
            decide_all(&flags, &reports, mode).unwrap()
        );
    }
}
