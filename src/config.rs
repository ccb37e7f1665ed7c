//! Conversion configuration.
//!
//! [`DecimationOptions`] carries the optional cycle and offsets for
//! [`Clip::floor`](crate::Clip::floor); [`ClipOptions`] controls what
//! [`Clip`](crate::Clip) does when it is built.
//!
//! # Example
//!
//! ```
//! use untelecine::DecimationOptions;
//!
//! // Drop the first frame of every five instead of the last.
//! let options = DecimationOptions::new()
//!     .with_cycle(5)
//!     .with_offsets(vec![1, 2, 3, 4]);
//! assert_eq!(options.cycle(), Some(5));
//! ```

/// Settings for decimation ("floor").
///
/// Defaults: the detected pulldown cycle and offsets `0..cycle - 1`, i.e.
/// drop the last frame of every cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecimationOptions {
    pub(crate) cycle: Option<usize>,
    pub(crate) offsets: Option<Vec<usize>>,
}

impl DecimationOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this cycle instead of the detected one. Zero means "use the
    /// detected cycle".
    #[must_use]
    pub fn with_cycle(mut self, cycle: usize) -> Self {
        self.cycle = (cycle > 0).then_some(cycle);
        self
    }

    /// Offsets to keep within each cycle.
    #[must_use]
    pub fn with_offsets(mut self, offsets: Vec<usize>) -> Self {
        self.offsets = Some(offsets);
        self
    }

    /// The explicit cycle, if any.
    pub fn cycle(&self) -> Option<usize> {
        self.cycle
    }

    /// The explicit offsets, if any.
    pub fn offsets(&self) -> Option<&[usize]> {
        self.offsets.as_deref()
    }
}

/// Settings applied when a [`Clip`](crate::Clip) is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipOptions {
    pub(crate) retime_progressive_pulldown: bool,
}

impl Default for ClipOptions {
    fn default() -> Self {
        Self {
            retime_progressive_pulldown: true,
        }
    }
}

impl ClipOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a fully progressive, soft-telecined stream is retimed to its
    /// film rate right away. Indexers report such streams at the pulled-up
    /// rate (e.g. 30000/1001 instead of 24000/1001). Defaults to `true`.
    #[must_use]
    pub fn with_retime_progressive_pulldown(mut self, retime: bool) -> Self {
        self.retime_progressive_pulldown = retime;
        self
    }
}
