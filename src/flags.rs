//! Per-frame scan metadata.
//!
//! [`FrameFlags`] mirrors the MPEG-2 picture header bits an indexer records
//! for every decoded frame. The flag sequence is kept as its own vector,
//! index-aligned with the frame sequence, rather than attached to the frames
//! themselves.
//!
//! [`CombingReport`] is what an external field matcher says about a frame:
//! whether it looks combed and which field order it found.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Scan metadata for one decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameFlags {
    /// The frame is progressive-scan.
    pub progressive: bool,
    /// Repeat-first-field: the decoder is asked to show the first field
    /// again, which is how soft pulldown is encoded.
    pub rff: bool,
    /// Top-field-first.
    pub tff: bool,
    /// VOB identifier the frame was read from.
    pub vob: u32,
    /// Cell identifier the frame was read from.
    pub cell: u32,
}

impl FrameFlags {
    /// A progressive frame with the given RFF/TFF bits.
    pub fn progressive(rff: bool, tff: bool) -> Self {
        Self {
            progressive: true,
            rff,
            tff,
            ..Self::default()
        }
    }

    /// An interlaced frame with the given field order.
    pub fn interlaced(tff: bool) -> Self {
        Self {
            progressive: false,
            rff: false,
            tff,
            ..Self::default()
        }
    }

    /// Attach VOB and cell identifiers.
    #[must_use]
    pub fn with_location(mut self, vob: u32, cell: u32) -> Self {
        self.vob = vob;
        self.cell = cell;
        self
    }

    /// `rff && tff`: the marker the cycle detector counts.
    pub fn is_duplication_marker(&self) -> bool {
        self.rff && self.tff
    }

    /// `progressive && rff && tff`: a frame the duplication converter
    /// materializes as two frames.
    pub fn is_pulled_down(&self) -> bool {
        self.progressive && self.is_duplication_marker()
    }

    /// The scan type of this frame.
    pub fn scan_type(&self) -> ScanType {
        if self.progressive {
            ScanType::Progressive
        } else {
            ScanType::Interlaced
        }
    }

    /// Field order implied by the TFF bit.
    pub fn field_order(&self) -> FieldOrder {
        if self.tff {
            FieldOrder::TopFirst
        } else {
            FieldOrder::BottomFirst
        }
    }
}

/// Whether a frame (or section) is progressive or interlaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanType {
    /// Progressive-scan frames.
    Progressive,
    /// Interlaced frames.
    Interlaced,
}

impl Display for ScanType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ScanType::Progressive => write!(f, "progressive"),
            ScanType::Interlaced => write!(f, "interlaced"),
        }
    }
}

/// Field order reported for a frame.
///
/// The numeric codes match the `_FieldBased` convention used by frame
/// servers: 0 = unknown/progressive, 1 = bottom first, 2 = top first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum FieldOrder {
    /// No field order could be determined.
    #[default]
    Unknown,
    /// Bottom field first.
    BottomFirst,
    /// Top field first.
    TopFirst,
}

impl FieldOrder {
    /// Decode a `_FieldBased` style code. Out-of-range codes map to
    /// [`FieldOrder::Unknown`].
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => FieldOrder::BottomFirst,
            2 => FieldOrder::TopFirst,
            _ => FieldOrder::Unknown,
        }
    }

    /// The `_FieldBased` style code for this order.
    pub fn code(&self) -> i64 {
        match self {
            FieldOrder::Unknown => 0,
            FieldOrder::BottomFirst => 1,
            FieldOrder::TopFirst => 2,
        }
    }

    /// Short label: `TFF`, `BFF` or `?`.
    pub fn label(&self) -> &'static str {
        match self {
            FieldOrder::Unknown => "?",
            FieldOrder::BottomFirst => "BFF",
            FieldOrder::TopFirst => "TFF",
        }
    }
}

/// A field matcher's verdict on one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CombingReport {
    /// `Some(true)` if combing was detected, `Some(false)` if the frame was
    /// checked and is clean, `None` if it was never checked.
    pub combed: Option<bool>,
    /// Field order reported for the frame.
    pub field_order: FieldOrder,
}

impl CombingReport {
    /// A report with an explicit verdict.
    pub fn new(combed: Option<bool>, field_order: FieldOrder) -> Self {
        Self {
            combed,
            field_order,
        }
    }

    /// The report implied by the frame's own flags when no matcher ran:
    /// unchecked, field order taken from the TFF bit.
    pub fn from_flags(flags: &FrameFlags) -> Self {
        Self {
            combed: None,
            field_order: flags.field_order(),
        }
    }

    /// `true` only when the matcher checked the frame and found it clean.
    pub fn is_clean(&self) -> bool {
        self.combed == Some(false)
    }

    /// `true` only when the matcher found combing.
    pub fn is_combed(&self) -> bool {
        self.combed == Some(true)
    }
}

/// A stream counts as variable frame rate when it holds both soft-pulldown
/// progressive frames and interlaced frames.
///
/// A DVD-compliant MPEG-2 stream with only one of the two is always at one
/// constant rate.
pub fn is_variable_frame_rate(flags: &[FrameFlags]) -> bool {
    flags.iter().any(FrameFlags::is_pulled_down) && flags.iter().any(|f| !f.progressive)
}
