//! Stream summary types.
//!
//! [`StreamSummary`] is what [`Clip::summary`](crate::Clip::summary) and the
//! `analyze` command report: how much of the stream is progressive, which
//! pulldown cadence it carries, and the aspect-ratio and broadcast-standard
//! details a DVD remuxer usually wants to know.
//!
//! # Example
//!
//! ```
//! use untelecine::{FrameFlags, FrameRate, StreamSummary};
//!
//! let flags = vec![FrameFlags::progressive(false, false), FrameFlags::interlaced(true)];
//! let summary = StreamSummary::from_flags(&flags, FrameRate::NTSC);
//! assert_eq!(summary.progressive_frames, 1);
//! assert_eq!(summary.standard, "NTSC");
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::Range;

use crate::flags::{FrameFlags, is_variable_frame_rate};
use crate::pulldown::{PulldownPattern, detect_pulldown};
use crate::rational::FrameRate;
use crate::utilities::{aspect_ratio, broadcast_standard, parse_ratio, pixel_aspect_ratio};

/// A run of consecutive frames read from one VOB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VobRange {
    /// VOB identifier.
    pub vob: u32,
    /// Frame indices covered, end-exclusive.
    pub frames: Range<usize>,
}

impl Display for VobRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}-{}",
            self.frames.start,
            self.frames.end.saturating_sub(1)
        )
    }
}

/// Scan and cadence summary of a flag sequence.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct StreamSummary {
    /// Total number of frames.
    pub total_frames: usize,
    /// Frames flagged progressive.
    pub progressive_frames: usize,
    /// Frames flagged interlaced.
    pub interlaced_frames: usize,
    /// Whether soft-pulldown and interlaced frames are mixed.
    pub vfr: bool,
    /// Detected pulldown pattern, if any.
    pub pulldown: Option<PulldownPattern>,
    /// Declared frame rate.
    pub frame_rate: FrameRate,
    /// Broadcast standard name, `"?"` if the rate is not a usual one.
    pub standard: &'static str,
    /// Display aspect ratio, e.g. `"4:3"`.
    pub dar: Option<String>,
    /// Storage aspect ratio of the picture size.
    pub sar: Option<String>,
    /// Pixel aspect ratio implied by DAR and picture size.
    pub par: Option<String>,
    /// Contiguous frame ranges per VOB, in stream order.
    pub vob_ranges: Vec<VobRange>,
}

impl StreamSummary {
    /// Summarize `flags` declared at `frame_rate`.
    ///
    /// Pulldown and VFR state are detected from the flags; aspect fields are
    /// left empty until [`with_aspect`](StreamSummary::with_aspect).
    pub fn from_flags(flags: &[FrameFlags], frame_rate: FrameRate) -> Self {
        let progressive_frames = flags.iter().filter(|flag| flag.progressive).count();
        Self {
            total_frames: flags.len(),
            progressive_frames,
            interlaced_frames: flags.len() - progressive_frames,
            vfr: is_variable_frame_rate(flags),
            pulldown: detect_pulldown(flags),
            frame_rate,
            standard: broadcast_standard(frame_rate),
            dar: None,
            sar: None,
            par: None,
            vob_ranges: vob_ranges(flags),
        }
    }

    /// Fill in DAR, SAR and PAR for a `width`×`height` picture shown at
    /// `dar`.
    pub fn with_aspect(mut self, dar: &str, width: u32, height: u32) -> Self {
        self.sar = aspect_ratio(width, height);
        self.par = parse_ratio(dar)
            .and_then(|(dar_width, dar_height)| pixel_aspect_ratio(width, height, dar_width, dar_height));
        self.dar = Some(dar.to_string());
        self
    }

    /// Share of progressive frames in percent.
    pub fn progressive_percent(&self) -> f64 {
        if self.total_frames == 0 {
            return 0.0;
        }
        self.progressive_frames as f64 / self.total_frames as f64 * 100.0
    }

    /// Share of interlaced frames in percent.
    pub fn interlaced_percent(&self) -> f64 {
        if self.total_frames == 0 {
            return 0.0;
        }
        100.0 - self.progressive_percent()
    }
}

fn vob_ranges(flags: &[FrameFlags]) -> Vec<VobRange> {
    let mut ranges: Vec<VobRange> = Vec::new();
    for (index, flag) in flags.iter().enumerate() {
        match ranges.last_mut() {
            Some(range) if range.vob == flag.vob => range.frames.end = index + 1,
            _ => ranges.push(VobRange {
                vob: flag.vob,
                frames: index..index + 1,
            }),
        }
    }
    ranges
}

impl Display for StreamSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let unknown = || "?".to_string();
        write!(
            f,
            "Progressive: {:05.2}% ({})",
            self.progressive_percent(),
            self.progressive_frames
        )?;
        match &self.pulldown {
            Some(pattern) => writeln!(f, " w/ Pulldown {pattern} (Cycle: {})", pattern.cycle())?,
            None => writeln!(f, " - No Pulldown")?,
        }
        writeln!(
            f,
            "Interlaced:  {:05.2}% ({})",
            self.interlaced_percent(),
            self.interlaced_frames
        )?;
        writeln!(
            f,
            "VFR? {}  DAR: {}  SAR: {}  PAR: {}",
            self.vfr,
            self.dar.clone().unwrap_or_else(unknown),
            self.sar.clone().unwrap_or_else(unknown),
            self.par.clone().unwrap_or_else(unknown)
        )?;
        write!(f, "{} @ {}", self.standard, self.frame_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_percentages() {
        let mut flags = vec![FrameFlags::progressive(false, false); 3];
        flags.push(FrameFlags::interlaced(true));
        let summary = StreamSummary::from_flags(&flags, FrameRate::PAL);
        assert_eq!(summary.total_frames, 4);
        assert_eq!(summary.interlaced_frames, 1);
        assert!((summary.progressive_percent() - 75.0).abs() < 1e-9);
        assert_eq!(summary.standard, "PAL");
    }

    #[test]
    fn empty_stream_has_zero_percent() {
        let summary = StreamSummary::from_flags(&[], FrameRate::NTSC);
        assert_eq!(summary.progressive_percent(), 0.0);
        assert_eq!(summary.interlaced_percent(), 0.0);
        assert!(summary.vob_ranges.is_empty());
    }

    #[test]
    fn aspect_fields() {
        let summary = StreamSummary::from_flags(&[], FrameRate::NTSC).with_aspect("4:3", 720, 480);
        assert_eq!(summary.sar.as_deref(), Some("3:2"));
        assert_eq!(summary.par.as_deref(), Some("8:9"));
        assert_eq!(summary.dar.as_deref(), Some("4:3"));
    }

    #[test]
    fn vob_ranges_are_contiguous_runs() {
        let flags: Vec<FrameFlags> = [1, 1, 1, 2, 2, 1]
            .iter()
            .map(|&vob| FrameFlags::interlaced(true).with_location(vob, 0))
            .collect();
        let ranges = StreamSummary::from_flags(&flags, FrameRate::NTSC).vob_ranges;
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[1], VobRange { vob: 2, frames: 3..5 });
        assert_eq!(ranges[0].to_string(), "0-2");
    }

    #[test]
    fn display_mentions_pulldown() {
        let flags: Vec<FrameFlags> = (0..10)
            .map(|i| FrameFlags::progressive(i % 4 == 0, i % 4 == 0))
            .collect();
        let text = StreamSummary::from_flags(&flags, FrameRate::NTSC).to_string();
        assert!(text.contains("w/ Pulldown 2:3 (Cycle: 5)"));
        assert!(text.ends_with("NTSC @ 30000/1001"));
    }
}
