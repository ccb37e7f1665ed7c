//! VFR to CFR conversion over flag and frame sequences.
//!
//! Two strategies are provided:
//!
//! - [`convert_duplication`] ("ceil") materializes soft pulldown by showing
//!   every RFF+TFF progressive frame twice. Nothing is interlaced, so the
//!   output is a mixed-scan stream at the higher rate with no spatial loss.
//! - [`convert_decimation`] ("floor") removes the repeated frames from
//!   interlaced sections with a cyclic selection and retimes progressive
//!   sections, giving a stream at the lower rate.
//!
//! Both functions validate everything before building their output and
//! apply the same insertions or removals to flags and frames, so the two
//! sequences always stay index-aligned.
//!
//! `floor` assumes a single, regular, stream-wide cycle. Irregular duplicate
//! patterns (including ones introduced by field matching) give a result of
//! the wrong duration, and nothing here can detect that.

use crate::error::UntelecineError;
use crate::flags::{FrameFlags, ScanType, is_variable_frame_rate};
use crate::pulldown::detect_pulldown;
use crate::rational::FrameRate;
use crate::sections::scan_sections;
use crate::select::{select_every, select_every_indices};

/// Output of a conversion.
///
/// When `applied` is `false` the input was returned unchanged because the
/// conversion did not apply (stream already constant rate, or no cycle).
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Conversion<F> {
    /// Adjusted flag sequence.
    pub flags: Vec<FrameFlags>,
    /// Adjusted frame sequence, index-aligned with `flags`.
    pub frames: Vec<F>,
    /// Declared rate of the output. `None` means unchanged.
    pub frame_rate: Option<FrameRate>,
    /// Source indices that were duplicated (ceil) or dropped (floor).
    pub affected: Vec<usize>,
    /// Whether the conversion did anything.
    pub applied: bool,
}

impl<F: Clone> Conversion<F> {
    fn unchanged(flags: &[FrameFlags], frames: &[F]) -> Self {
        Self {
            flags: flags.to_vec(),
            frames: frames.to_vec(),
            frame_rate: None,
            affected: Vec::new(),
            applied: false,
        }
    }
}

pub(crate) fn ensure_aligned<F>(flags: &[FrameFlags], frames: &[F]) -> Result<(), UntelecineError> {
    if flags.len() != frames.len() {
        return Err(UntelecineError::length_mismatch("frames", flags.len(), frames.len()));
    }
    Ok(())
}

/// VFR to CFR by duplicating each progressive RFF+TFF frame once.
///
/// Each duplicated frame's flag entry is duplicated too, with `rff` cleared
/// on both copies since the repeat is now real. Every other entry is carried
/// over unchanged. A stream that is not VFR is returned unchanged.
///
/// # Errors
///
/// Returns [`UntelecineError::LengthMismatch`] if `flags` and `frames`
/// differ in length.
pub fn convert_duplication<F: Clone>(
    flags: &[FrameFlags],
    frames: &[F],
) -> Result<Conversion<F>, UntelecineError> {
    ensure_aligned(flags, frames)?;
    if !is_variable_frame_rate(flags) {
        log::debug!("Duplication skipped: stream is not variable frame rate");
        return Ok(Conversion::unchanged(flags, frames));
    }

    let duplicated: Vec<usize> = flags
        .iter()
        .enumerate()
        .filter(|(_, flag)| flag.is_pulled_down())
        .map(|(index, _)| index)
        .collect();

    let mut out_flags = Vec::with_capacity(flags.len() + duplicated.len());
    let mut out_frames = Vec::with_capacity(frames.len() + duplicated.len());
    for (flag, frame) in flags.iter().zip(frames) {
        if flag.is_pulled_down() {
            let consumed = FrameFlags { rff: false, ..*flag };
            out_flags.extend([consumed, consumed]);
            out_frames.extend([frame.clone(), frame.clone()]);
        } else {
            out_flags.push(*flag);
            out_frames.push(frame.clone());
        }
    }

    log::info!(
        "Duplicated {} pulldown frames ({} -> {} frames)",
        duplicated.len(),
        frames.len(),
        out_frames.len()
    );

    Ok(Conversion {
        flags: out_flags,
        frames: out_frames,
        frame_rate: None,
        affected: duplicated,
        applied: true,
    })
}

/// Check decimation offsets against a cycle.
///
/// # Errors
///
/// [`UntelecineError::EmptyOffsets`] or [`UntelecineError::TooManyOffsets`]
/// when the offsets would keep nothing or everything, plus anything
/// [`validate_offsets`](crate::select::validate_offsets) rejects.
pub fn validate_decimation(cycle: usize, offsets: &[usize]) -> Result<(), UntelecineError> {
    if offsets.is_empty() {
        return Err(UntelecineError::EmptyOffsets);
    }
    if offsets.len() >= cycle {
        return Err(UntelecineError::TooManyOffsets {
            count: offsets.len(),
            cycle,
        });
    }
    crate::select::validate_offsets(cycle, offsets).map(|_| ())
}

/// Default decimation offsets: every position in the cycle except the last.
pub fn default_offsets(cycle: usize) -> Vec<usize> {
    (0..cycle.saturating_sub(1)).collect()
}

/// VFR to CFR by decimating interlaced sections down to the progressive rate.
///
/// `cycle` defaults to the detected pulldown cycle and `offsets` to
/// [`default_offsets`]. With no cycle (none given, none detected) the input
/// is returned unchanged.
///
/// Progressive sections keep all their frames and are retimed to
/// `frame_rate - frame_rate / cycle`. Interlaced sections keep only the
/// frames at the selected offsets, counted from each section's own start.
/// Sections are spliced back in order of their first frame.
///
/// # Errors
///
/// - [`UntelecineError::LengthMismatch`] if `flags` and `frames` differ.
/// - [`UntelecineError::CycleTooLong`] if `cycle` exceeds the frame count.
/// - [`UntelecineError::InvalidFrameRate`] if the retimed rate overflows.
/// - [`UntelecineError::EmptyOffsets`] / [`UntelecineError::TooManyOffsets`]
///   / [`UntelecineError::OffsetOutOfRange`] for bad offsets.
pub fn convert_decimation<F: Clone>(
    flags: &[FrameFlags],
    frames: &[F],
    frame_rate: FrameRate,
    cycle: Option<usize>,
    offsets: Option<&[usize]>,
) -> Result<Conversion<F>, UntelecineError> {
    ensure_aligned(flags, frames)?;

    let cycle = match cycle.filter(|&cycle| cycle > 0) {
        Some(cycle) => cycle,
        None => match detect_pulldown(flags) {
            Some(pattern) => pattern.cycle(),
            None => {
                log::debug!("Decimation skipped: no cycle given or detected");
                return Ok(Conversion::unchanged(flags, frames));
            }
        },
    };
    if cycle > frames.len().max(1) {
        return Err(UntelecineError::CycleTooLong {
            cycle,
            frames: frames.len(),
        });
    }
    let offsets = offsets.map_or_else(|| default_offsets(cycle), <[usize]>::to_vec);
    validate_decimation(cycle, &offsets)?;
    let new_rate = frame_rate.decimated(cycle)?;

    log::debug!(
        "Decimating with cycle {} offsets {:?} ({} -> {})",
        cycle,
        offsets,
        frame_rate,
        new_rate
    );
    if offsets.len() + 1 != cycle {
        log::warn!(
            "Keeping {} of every {} interlaced frames; interlaced sections will not match the {} progressive rate",
            offsets.len(),
            cycle,
            new_rate
        );
    }

    let sections = scan_sections(flags);
    let mut out_frames = Vec::with_capacity(frames.len());
    let mut dropped = Vec::new();
    for section in &sections {
        let section_frames = &frames[section.frames.clone()];
        match section.scan_type {
            ScanType::Progressive => out_frames.extend_from_slice(section_frames),
            ScanType::Interlaced => {
                out_frames.extend(select_every(section_frames, cycle, &offsets, false)?);
                dropped.extend(
                    select_every_indices(section.len(), cycle, &offsets, true)?
                        .into_iter()
                        .map(|position| section.start() + position),
                );
            }
        }
    }

    // `dropped` is ascending because sections are visited in frame order.
    let mut next_drop = dropped.iter().peekable();
    let out_flags: Vec<FrameFlags> = flags
        .iter()
        .enumerate()
        .filter(|(index, _)| {
            if next_drop.peek() == Some(&index) {
                next_drop.next();
                false
            } else {
                true
            }
        })
        .map(|(_, flag)| *flag)
        .collect();
    debug_assert_eq!(out_flags.len(), out_frames.len());

    log::info!(
        "Decimated {} interlaced frames across {} sections ({} -> {} frames, {} fps)",
        dropped.len(),
        sections.len(),
        frames.len(),
        out_frames.len(),
        new_rate
    );

    Ok(Conversion {
        flags: out_flags,
        frames: out_frames,
        frame_rate: Some(new_rate),
        affected: dropped,
        applied: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed() -> Vec<FrameFlags> {
        let mut flags: Vec<FrameFlags> = (0..8)
            .map(|i| FrameFlags::progressive(i % 4 == 0, i % 4 == 0))
            .collect();
        flags.extend(std::iter::repeat_n(FrameFlags::interlaced(true), 10));
        flags
    }

    #[test]
    fn duplication_counts() {
        let flags = mixed();
        let frames: Vec<usize> = (0..flags.len()).collect();
        let conversion = convert_duplication(&flags, &frames).unwrap();
        assert!(conversion.applied);
        assert_eq!(conversion.affected, vec![0, 4]);
        assert_eq!(conversion.frames.len(), frames.len() + 2);
        assert_eq!(&conversion.frames[..3], &[0, 0, 1]);
        assert!(!conversion.flags[0].rff && !conversion.flags[1].rff);
    }

    #[test]
    fn decimation_drops_one_per_cycle() {
        let flags = mixed();
        let frames: Vec<usize> = (0..flags.len()).collect();
        let conversion =
            convert_decimation(&flags, &frames, FrameRate::NTSC, Some(5), None).unwrap();
        assert_eq!(conversion.affected, vec![12, 17]);
        assert_eq!(conversion.frames.len(), frames.len() - 2);
        assert_eq!(conversion.frame_rate, Some(FrameRate::NTSC_FILM));
        assert!(!conversion.frames.contains(&12));
        assert!(!conversion.frames.contains(&17));
    }

    #[test]
    fn decimation_rejects_bad_offsets_before_work() {
        let flags = mixed();
        let frames: Vec<usize> = (0..flags.len()).collect();
        let error = convert_decimation(&flags, &frames, FrameRate::NTSC, Some(5), Some(&[]))
            .unwrap_err();
        assert!(matches!(error, UntelecineError::EmptyOffsets));
        let error = convert_decimation(
            &flags,
            &frames,
            FrameRate::NTSC,
            Some(5),
            Some(&[0, 1, 2, 3, 4]),
        )
        .unwrap_err();
        assert!(matches!(error, UntelecineError::TooManyOffsets { count: 5, cycle: 5 }));
    }

    #[test]
    fn decimation_rejects_cycles_longer_than_the_input() {
        let flags = mixed();
        let frames: Vec<usize> = (0..flags.len()).collect();
        let error = convert_decimation(&flags, &frames, FrameRate::NTSC, Some(usize::MAX), None)
            .unwrap_err();
        assert!(matches!(error, UntelecineError::CycleTooLong { frames: 18, .. }));
    }

    #[test]
    fn misaligned_input() {
        let flags = mixed();
        let frames = vec![0usize; 3];
        assert!(convert_duplication(&flags, &frames).is_err());
        assert!(convert_decimation(&flags, &frames, FrameRate::NTSC, Some(5), None).is_err());
    }
}
