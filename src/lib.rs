//! # untelecine
//!
//! Convert soft-telecined MPEG-2 video (a mix of pulldown-flagged
//! progressive frames and interlaced frames) into a constant frame rate
//! stream, and pick per frame between an original, a field-matched, and a
//! deinterlaced candidate.
//!
//! `untelecine` works on two index-aligned sequences: the frames (any type
//! implementing [`VideoFrame`], e.g. [`image::DynamicImage`] or plain frame
//! indices) and the per-frame [`FrameFlags`] an MPEG-2 indexer such as
//! DGIndex records. Decoding, field matching, and deinterlacing stay with
//! external tools; this crate decides what to keep, drop, or duplicate.
//!
//! ## Quick Start
//!
//! ### Detect the Pulldown Cadence
//!
//! ```
//! use untelecine::{FrameFlags, detect_pulldown};
//!
//! // RFF+TFF on every fourth progressive frame: classic 2:3 pulldown.
//! let flags: Vec<FrameFlags> = (0..12)
//!     .map(|i| FrameFlags::progressive(i % 4 == 0, i % 4 == 0))
//!     .collect();
//! let pattern = detect_pulldown(&flags).unwrap();
//! assert_eq!(pattern.cycle(), 5);
//! assert_eq!(pattern.to_string(), "2:3");
//! ```
//!
//! ### Convert a D2V-Indexed Stream
//!
//! ```no_run
//! use untelecine::{Clip, D2vIndex, DecimationOptions};
//!
//! let index = D2vIndex::open("VTS_01_1.d2v")?;
//! let frames: Vec<usize> = (0..index.frame_count()).collect();
//! let mut clip = Clip::from_d2v(&index, frames)?;
//!
//! // Drop the pulled-down duplicates and retime to the film rate.
//! clip.floor(&DecimationOptions::default())?;
//! println!("{} frames @ {}", clip.len(), clip.frame_rate());
//! # Ok::<(), untelecine::UntelecineError>(())
//! ```
//!
//! ### Cyclic Selection
//!
//! ```
//! use untelecine::select_every;
//!
//! let kept = select_every(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9], 5, &[0, 1, 2, 3], false)?;
//! assert_eq!(kept, vec![0, 1, 2, 3, 5, 6, 7, 8]);
//! # Ok::<(), untelecine::UntelecineError>(())
//! ```
//!
//! ## Features
//!
//! - **Pulldown detection**: stream-wide cycle and `2:3` style pattern label
//! - **ceil**: materialize soft pulldown by duplicating RFF frames
//! - **floor**: decimate interlaced sections and retime to the film rate
//! - **Field recovery** and **conditional deinterlacing** via pluggable
//!   collaborators ([`FieldMatches`], [`DeinterlaceKernel`])
//! - **D2V parsing**: DGIndex project files to [`FrameFlags`]
//! - **Validation**: cadence checks before decimating
//! - **Summaries**: scan percentages, DAR/SAR/PAR, broadcast standard
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `rayon` | Per-frame decisions are evaluated across rayon threads |
//! | `full` | Enables all of the above |

pub mod candidate;
pub mod clip;
pub mod config;
pub mod convert;
pub mod d2v;
pub mod error;
pub mod flags;
pub mod frame;
pub mod kernel;
pub mod metadata;
pub mod pulldown;
pub mod rational;
#[cfg(feature = "rayon")]
mod rayon;
pub mod sections;
pub mod select;
pub mod utilities;
pub mod validation;

pub use candidate::{
    Candidate, Decision, DecisionCounts, RateFactor, SelectionMode, decide, decide_all,
    materialize, select_candidate,
};
pub use clip::Clip;
pub use config::{ClipOptions, DecimationOptions};
pub use convert::{
    Conversion, convert_decimation, convert_duplication, default_offsets, validate_decimation,
};
pub use d2v::{D2vEntry, D2vIndex, PictureType};
pub use error::{ErrorKind, UntelecineError};
pub use flags::{CombingReport, FieldOrder, FrameFlags, ScanType, is_variable_frame_rate};
pub use frame::VideoFrame;
pub use kernel::{DeinterlaceKernel, FieldMatches, KernelOutput};
pub use metadata::{StreamSummary, VobRange};
pub use pulldown::{PulldownPattern, detect_pulldown, detect_pulldown_cycle};
pub use rational::FrameRate;
pub use sections::{Consecutive, ConsecutiveGroups, Section, group_consecutive, scan_sections};
pub use select::{select_every, select_every_indices, validate_offsets};
pub use validation::{ValidationReport, validate_flags};
