//! Per-frame choice between the original frame and two processed candidates.
//!
//! Field recovery and conditional deinterlacing both produce two full
//! alternative sequences, one processed assuming top-field-first (the
//! *forward* candidate) and one assuming bottom-field-first (the *reverse*
//! candidate). For every frame, [`decide`] looks only at that frame's flags
//! and combing report and picks one of the three sources:
//!
//! | Condition | Recovery | Deinterlace |
//! |---|---|---|
//! | progressive flag, or report says clean | original | original × rate factor |
//! | report says combed | by reported order | forward (top-first assumed) |
//! | bottom-first | reverse | reverse |
//! | top-first | forward | forward |
//! | unknown order | original | original, flagged anomalous |
//!
//! Decisions never depend on neighbouring frames, so they can be evaluated
//! in any order or in parallel.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::error::UntelecineError;
use crate::flags::{CombingReport, FieldOrder, FrameFlags};
use crate::frame::VideoFrame;
use crate::rational::FrameRate;

/// How many output frames a deinterlace kernel produces per input frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RateFactor {
    /// One frame per input frame (single-rate).
    #[default]
    Single,
    /// One frame per field (double-rate).
    Double,
}

impl RateFactor {
    /// Output frames per input frame.
    pub fn copies(&self) -> usize {
        match self {
            RateFactor::Single => 1,
            RateFactor::Double => 2,
        }
    }

    /// The factor taking `input` to `output`.
    ///
    /// # Errors
    ///
    /// Returns [`UntelecineError::UnsupportedRateMultiplier`] unless `output`
    /// is exactly one or two times `input`.
    pub fn between(input: FrameRate, output: FrameRate) -> Result<Self, UntelecineError> {
        match output.multiple_of(input) {
            Some(1) => Ok(RateFactor::Single),
            Some(2) => Ok(RateFactor::Double),
            _ => Err(UntelecineError::UnsupportedRateMultiplier { input, output }),
        }
    }
}

/// Which stage is selecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Field recovery (matching). Never changes the frame count.
    Recovery,
    /// Conditional deinterlacing at the given rate factor.
    Deinterlace(RateFactor),
}

impl SelectionMode {
    /// Output frames per input frame.
    pub fn copies(&self) -> usize {
        match self {
            SelectionMode::Recovery => 1,
            SelectionMode::Deinterlace(factor) => factor.copies(),
        }
    }
}

/// The source a frame is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Candidate {
    /// The unprocessed frame.
    Original,
    /// Processed assuming top-field-first.
    Forward,
    /// Processed assuming bottom-field-first.
    Reverse,
}

/// The outcome for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Progressive by flag, or checked and clean: passed through.
    Progressive,
    /// Top-field-first candidate taken.
    Forward,
    /// Bottom-field-first candidate taken.
    Reverse,
    /// Interlaced but no field order known: passed through untouched.
    FieldOrderUnknown,
}

impl Decision {
    /// Which source this decision reads from.
    pub fn candidate(&self) -> Candidate {
        match self {
            Decision::Progressive | Decision::FieldOrderUnknown => Candidate::Original,
            Decision::Forward => Candidate::Forward,
            Decision::Reverse => Candidate::Reverse,
        }
    }

    /// An interlaced frame left as-is because its order was unknown.
    pub fn is_anomalous(&self) -> bool {
        matches!(self, Decision::FieldOrderUnknown)
    }

    fn from_order(order: FieldOrder) -> Self {
        match order {
            FieldOrder::BottomFirst => Decision::Reverse,
            FieldOrder::TopFirst => Decision::Forward,
            FieldOrder::Unknown => Decision::FieldOrderUnknown,
        }
    }
}

impl Display for Decision {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Decision::Progressive => write!(f, "Progressive"),
            Decision::Forward => write!(f, "Processed (TFF)"),
            Decision::Reverse => write!(f, "Processed (BFF)"),
            Decision::FieldOrderUnknown => write!(f, "Untouched <!>"),
        }
    }
}

/// Decide which source frame `flags`/`report` call for.
pub fn decide(flags: &FrameFlags, report: &CombingReport, mode: SelectionMode) -> Decision {
    if flags.progressive || report.is_clean() {
        return Decision::Progressive;
    }
    let order = match mode {
        // TODO: infer the true order once recovery reports disagreements.
        SelectionMode::Deinterlace(_) if report.is_combed() => FieldOrder::TopFirst,
        _ => report.field_order,
    };
    Decision::from_order(order)
}

/// Decide every frame of a sequence.
///
/// # Errors
///
/// Returns [`UntelecineError::LengthMismatch`] if `reports` is not the same
/// length as `flags`.
pub fn decide_all(
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
    Ok(flags
        .iter()
        .zip(reports)
        .map(|(flag, report)| decide(flag, report, mode))
        .collect())
}

/// Materialize a decision.
///
/// `forward` and `reverse` hold this frame's output from each candidate
/// sequence (one frame, or two for a double-rate kernel) and are returned
/// as given. The original is converted to the forward candidate's pixel
/// format if needed and repeated to the mode's rate factor.
pub fn materialize<F: VideoFrame>(
    decision: Decision,
    original: &F,
    forward: &[F],
    reverse: &[F],
    mode: SelectionMode,
) -> Vec<F> {
    match decision.candidate() {
        Candidate::Forward => forward.to_vec(),
        Candidate::Reverse => reverse.to_vec(),
        Candidate::Original => {
            let passed = match forward.first() {
                Some(reference) => original.normalized_to(reference),
                None => original.clone(),
            };
            vec![passed; mode.copies()]
        }
    }
}

/// Decide and materialize one frame.
///
/// See [`decide`] and [`materialize`].
pub fn select_candidate<F: VideoFrame>(
    flags: &FrameFlags,
    report: &CombingReport,
    original: &F,
    forward: &[F],
    reverse: &[F],
    mode: SelectionMode,
) -> Vec<F> {
    let decision = decide(flags, report, mode);
    log::trace!("{mode:?}: {decision}");
    materialize(decision, original, forward, reverse, mode)
}

/// Tally of decisions over a sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecisionCounts {
    /// Frames passed through as progressive.
    pub progressive: usize,
    /// Frames taken from the forward candidate.
    pub forward: usize,
    /// Frames taken from the reverse candidate.
    pub reverse: usize,
    /// Interlaced frames left untouched for lack of a field order.
    pub unknown: usize,
}

impl DecisionCounts {
    /// Count a batch of decisions.
    pub fn tally<'a, I: IntoIterator<Item = &'a Decision>>(decisions: I) -> Self {
        let mut counts = Self::default();
        for decision in decisions {
            match decision {
                Decision::Progressive => counts.progressive += 1,
                Decision::Forward => counts.forward += 1,
                Decision::Reverse => counts.reverse += 1,
                Decision::FieldOrderUnknown => counts.unknown += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEINTERLACE: SelectionMode = SelectionMode::Deinterlace(RateFactor::Single);

    #[test]
    fn clean_report_passes_through() {
        let report = CombingReport::new(Some(false), FieldOrder::TopFirst);
        let decision = decide(&FrameFlags::interlaced(true), &report, SelectionMode::Recovery);
        assert_eq!(decision, Decision::Progressive);
    }

    #[test]
    fn recovery_follows_reported_order() {
        let flags = FrameFlags::interlaced(true);
        let bottom = CombingReport::new(Some(true), FieldOrder::BottomFirst);
        assert_eq!(decide(&flags, &bottom, SelectionMode::Recovery), Decision::Reverse);
        let unknown = CombingReport::new(None, FieldOrder::Unknown);
        assert_eq!(
            decide(&flags, &unknown, SelectionMode::Recovery),
            Decision::FieldOrderUnknown
        );
    }

    #[test]
    fn deinterlace_forces_top_first_on_combing() {
        let flags = FrameFlags::interlaced(false);
        let combed = CombingReport::new(Some(true), FieldOrder::BottomFirst);
        assert_eq!(decide(&flags, &combed, DEINTERLACE), Decision::Forward);
        let unchecked = CombingReport::new(None, FieldOrder::BottomFirst);
        assert_eq!(decide(&flags, &unchecked, DEINTERLACE), Decision::Reverse);
        let unknown = CombingReport::new(None, FieldOrder::Unknown);
        assert!(decide(&flags, &unknown, DEINTERLACE).is_anomalous());
    }

    #[test]
    fn rate_factor_between() {
        assert_eq!(
            RateFactor::between(FrameRate::NTSC, FrameRate::NTSC).unwrap(),
            RateFactor::Single
        );
        assert_eq!(
            RateFactor::between(FrameRate::NTSC, FrameRate::NTSC_FIELDS).unwrap(),
            RateFactor::Double
        );
        assert!(RateFactor::between(FrameRate::NTSC, FrameRate::NTSC_FILM).is_err());
        assert!(RateFactor::between(FrameRate::PAL, FrameRate::new(100, 1).unwrap()).is_err());
    }

    #[test]
    fn decide_all_checks_lengths() {
        let flags = vec![FrameFlags::interlaced(true); 3];
        let reports = vec![CombingReport::default(); 2];
        assert!(decide_all(&flags, &reports, SelectionMode::Recovery).is_err());
    }

    #[test]
    fn tally() {
        let counts = DecisionCounts::tally(&[
            Decision::Progressive,
            Decision::Forward,
            Decision::Forward,
            Decision::FieldOrderUnknown,
        ]);
        assert_eq!(counts.forward, 2);
        assert_eq!(counts.unknown, 1);
        assert_eq!(counts.reverse, 0);
    }
}
