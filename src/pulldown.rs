//! Pulldown cycle detection from frame flags.
//!
//! Soft pulldown marks one frame out of every cycle with both RFF and TFF
//! set. [`detect_pulldown`] measures the spacing of those markers inside each
//! progressive run and turns the most common spacing into a cycle length,
//! e.g. markers four frames apart mean a 5-frame cycle, classic 2:3 pulldown.
//!
//! The detector is statistical. Ties between equally common gaps are broken
//! by encounter order, and one cycle is reported for the whole stream even if
//! sections differ. Both are known limitations, not errors.
//!
//! # Example
//!
//! ```
//! use untelecine::{FrameFlags, detect_pulldown};
//!
//! // 24p soft-telecined to 30i: every fourth frame carries RFF+TFF.
//! let flags: Vec<FrameFlags> = (0..40)
//!     .map(|i| FrameFlags::progressive(i % 4 == 0, i % 4 == 0))
//!     .collect();
//!
//! let pattern = detect_pulldown(&flags).expect("pulldown");
//! assert_eq!(pattern.cycle(), 5);
//! assert_eq!(pattern.to_string(), "2:3");
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::flags::{FrameFlags, ScanType};
use crate::sections::scan_sections;
use crate::utilities::most_common;

/// A detected pulldown cadence.
///
/// `symbols` are field counts per displayed frame in the usual pulldown
/// notation; they always sum to `cycle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulldownPattern {
    cycle: usize,
    symbols: Vec<u8>,
}

impl PulldownPattern {
    /// Build the pattern label for a cycle.
    ///
    /// `cycle / 2` twos, with the last one turned into a three when the cycle
    /// is odd. Returns `None` for cycles shorter than two, which no marker
    /// spacing can produce.
    pub fn from_cycle(cycle: usize) -> Option<Self> {
        if cycle < 2 {
            return None;
        }
        let mut symbols = vec![2u8; cycle / 2];
        if cycle % 2 == 1 {
            if let Some(last) = symbols.last_mut() {
                *last = 3;
            }
        }
        Some(Self { cycle, symbols })
    }

    /// Cycle length in frames.
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Field counts per displayed frame.
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }
}

impl Display for PulldownPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (position, symbol) in self.symbols.iter().enumerate() {
            if position > 0 {
                write!(f, ":")?;
            }
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

/// Marker positions inside each progressive run that has at least two of
/// them. Interlaced frames end a run and never belong to one.
pub(crate) fn marker_runs(flags: &[FrameFlags]) -> Vec<Vec<usize>> {
    scan_sections(flags)
        .into_iter()
        .filter(|section| section.scan_type == ScanType::Progressive)
        .map(|section| {
            section
                .frames
                .filter(|&index| flags[index].is_duplication_marker())
                .collect::<Vec<usize>>()
        })
        .filter(|markers| markers.len() > 1)
        .collect()
}

/// Most common gap between markers, taken pairwise in non-overlapping steps
/// (first with second, third with fourth, ...). A trailing odd marker is
/// ignored.
pub(crate) fn typical_gap(markers: &[usize]) -> Option<usize> {
    most_common(markers.chunks_exact(2).map(|pair| pair[1] - pair[0]))
}

/// Detect the stream-wide pulldown cycle.
///
/// Returns `None` when no progressive run carries two or more RFF+TFF
/// markers.
pub fn detect_pulldown(flags: &[FrameFlags]) -> Option<PulldownPattern> {
    let runs = marker_runs(flags);
    let gap = most_common(runs.iter().filter_map(|markers| typical_gap(markers)))?;
    let pattern = PulldownPattern::from_cycle(gap + 1);
    log::debug!(
        "Pulldown detection: {} qualifying runs, typical gap {} -> {:?}",
        runs.len(),
        gap,
        pattern.as_ref().map(ToString::to_string)
    );
    pattern
}

/// Detect the pulldown cycle as a `(cycle, pattern)` pair, `(0, None)`
/// meaning no pulldown.
pub fn detect_pulldown_cycle(flags: &[FrameFlags]) -> (usize, Option<String>) {
    match detect_pulldown(flags) {
        Some(pattern) => (pattern.cycle(), Some(pattern.to_string())),
        None => (0, None),
    }
}
