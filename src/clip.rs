//! Core [`Clip`] implementation.
//!
//! `Clip` is the conversion session: it owns a frame sequence, the
//! index-aligned [`FrameFlags`] sequence describing it, and the declared
//! frame rate. The two converters ([`ceil`](Clip::ceil) and
//! [`floor`](Clip::floor)) are the only operations that insert or remove
//! frames, and they always do so on flags and frames together.
//!
//! # Example
//!
//! ```
//! use untelecine::{Clip, FrameFlags, FrameRate};
//!
//! // 8 soft-telecined progressive frames followed by 10 hard-telecined ones.
//! let mut flags: Vec<FrameFlags> = (0..8)
//!     .map(|i| FrameFlags::progressive(i % 4 == 0, i % 4 == 0))
//!     .collect();
//! flags.extend(std::iter::repeat_n(FrameFlags::interlaced(true), 10));
//! let frames: Vec<usize> = (0..flags.len()).collect();
//!
//! let mut clip = Clip::new(frames, flags, FrameRate::NTSC)?;
//! assert!(clip.is_variable_frame_rate());
//! assert_eq!(clip.pulldown().map(|p| p.cycle()), Some(5));
//!
//! clip.floor(&Default::default())?;
//! assert_eq!(clip.len(), 16);
//! assert_eq!(clip.frame_rate(), FrameRate::NTSC_FILM);
//! # Ok::<(), untelecine::UntelecineError>(())
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::candidate::{Decision, DecisionCounts, RateFactor, SelectionMode, materialize};
use crate::config::{ClipOptions, DecimationOptions};
use crate::convert::{Conversion, convert_decimation, convert_duplication, ensure_aligned};
use crate::d2v::D2vIndex;
use crate::error::UntelecineError;
use crate::flags::{CombingReport, FieldOrder, FrameFlags, is_variable_frame_rate};
use crate::frame::VideoFrame;
use crate::kernel::{DeinterlaceKernel, FieldMatches, KernelOutput};
use crate::metadata::StreamSummary;
use crate::pulldown::{PulldownPattern, detect_pulldown};
use crate::rational::FrameRate;
use crate::validation::{ValidationReport, validate_flags};

/// A telecined frame sequence with its scan flags.
///
/// Created via [`Clip::new`] or [`Clip::from_d2v`].
pub struct Clip<F> {
    frames: Vec<F>,
    flags: Vec<FrameFlags>,
    frame_rate: FrameRate,
    /// Detected at construction; not kept in sync with later conversions.
    pulldown: Option<PulldownPattern>,
    vfr: bool,
    converted: bool,
    recovered: bool,
    /// Combing reports from the last `recover`, aligned with `frames`.
    reports: Option<Vec<CombingReport>>,
    display_aspect_ratio: Option<String>,
    picture_size: Option<(u32, u32)>,
}

impl<F> Debug for Clip<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Clip")
            .field("frames", &self.frames.len())
            .field("frame_rate", &self.frame_rate)
            .field("pulldown", &self.pulldown)
            .field("vfr", &self.vfr)
            .field("converted", &self.converted)
            .field("recovered", &self.recovered)
            .finish_non_exhaustive()
    }
}

impl<F: VideoFrame> Clip<F> {
    /// Build a session with default [`ClipOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`UntelecineError::LengthMismatch`] if `frames` and `flags`
    /// differ in length.
    pub fn new(
        frames: Vec<F>,
        flags: Vec<FrameFlags>,
        frame_rate: FrameRate,
    ) -> Result<Self, UntelecineError> {
        Self::with_options(frames, flags, frame_rate, &ClipOptions::default())
    }

    /// Build a session.
    ///
    /// Detects the pulldown pattern and VFR state. A stream that is entirely
    /// progressive with pulldown markers is retimed to its film rate right
    /// away unless disabled in `options`; its pattern is then cleared.
    pub fn with_options(
        frames: Vec<F>,
        flags: Vec<FrameFlags>,
        frame_rate: FrameRate,
        options: &ClipOptions,
    ) -> Result<Self, UntelecineError> {
        ensure_aligned(&flags, &frames)?;
        let pulldown = detect_pulldown(&flags);
        let vfr = is_variable_frame_rate(&flags);
        log::debug!(
            "Creating clip: {} frames @ {}, pulldown {:?}, vfr {}",
            frames.len(),
            frame_rate,
            pulldown.as_ref().map(ToString::to_string),
            vfr
        );

        let mut clip = Self {
            frames,
            flags,
            frame_rate,
            pulldown,
            vfr,
            converted: false,
            recovered: false,
            reports: None,
            display_aspect_ratio: None,
            picture_size: None,
        };

        let fully_progressive = clip.flags.iter().all(|flag| flag.progressive);
        if options.retime_progressive_pulldown
            && !clip.vfr
            && fully_progressive
            && clip.pulldown.is_some()
        {
            clip.floor(&DecimationOptions::default())?;
            clip.pulldown = None;
        }
        Ok(clip)
    }

    /// Build a session from a parsed D2V index and the frames it describes.
    ///
    /// # Errors
    ///
    /// Returns [`UntelecineError::InvalidFrameRate`] if the index has no
    /// usable `Frame_Rate`, plus anything [`Clip::new`] returns.
    pub fn from_d2v(index: &D2vIndex, frames: Vec<F>) -> Result<Self, UntelecineError> {
        let frame_rate = index.frame_rate()?;
        let mut clip = Self::new(frames, index.flags(), frame_rate)?;
        clip.display_aspect_ratio = index.aspect_ratio().map(str::to_string);
        clip.picture_size = index.picture_size();
        Ok(clip)
    }

    /// The frame sequence.
    pub fn frames(&self) -> &[F] {
        &self.frames
    }

    /// The flag sequence, index-aligned with [`frames`](Clip::frames).
    pub fn flags(&self) -> &[FrameFlags] {
        &self.flags
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if the clip has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Declared frame rate.
    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    /// The pattern detected when the clip was built.
    ///
    /// It is not updated by conversions; call
    /// [`redetect_pulldown`](Clip::redetect_pulldown) for a fresh one.
    pub fn pulldown(&self) -> Option<&PulldownPattern> {
        self.pulldown.as_ref()
    }

    /// Run detection again over the current flags and store the result.
    pub fn redetect_pulldown(&mut self) -> Option<&PulldownPattern> {
        self.pulldown = detect_pulldown(&self.flags);
        self.pulldown.as_ref()
    }

    /// Whether the clip still mixes soft-pulldown and interlaced frames.
    pub fn is_variable_frame_rate(&self) -> bool {
        self.vfr
    }

    /// Combing reports stored by the last [`recover`](Clip::recover).
    pub fn reports(&self) -> Option<&[CombingReport]> {
        self.reports.as_deref()
    }

    /// Set the display aspect ratio used in [`summary`](Clip::summary).
    #[must_use]
    pub fn with_display_aspect_ratio(mut self, dar: impl Into<String>, width: u32, height: u32) -> Self {
        self.display_aspect_ratio = Some(dar.into());
        self.picture_size = Some((width, height));
        self
    }

    /// Split into frames, flags and frame rate.
    pub fn into_parts(self) -> (Vec<F>, Vec<FrameFlags>, FrameRate) {
        (self.frames, self.flags, self.frame_rate)
    }

    fn apply(&mut self, conversion: Conversion<F>) {
        if !conversion.applied {
            return;
        }
        self.flags = conversion.flags;
        self.frames = conversion.frames;
        if let Some(rate) = conversion.frame_rate {
            self.frame_rate = rate;
        }
        if self.reports.take().is_some() {
            log::warn!("Conversion changed the frame count; stored combing reports were discarded");
        }
        self.vfr = false;
        self.converted = true;
    }

    /// VFR to CFR by duplicating every progressive RFF+TFF frame.
    ///
    /// No-op unless the clip is VFR and has not been converted yet.
    ///
    /// # Errors
    ///
    /// Propagates [`convert_duplication`] errors; the clip is left unchanged.
    pub fn ceil(&mut self) -> Result<&mut Self, UntelecineError> {
        if !self.vfr || self.converted {
            log::debug!("ceil: clip is already constant frame rate");
            return Ok(self);
        }
        let conversion = convert_duplication(&self.flags, &self.frames)?;
        self.apply(conversion);
        Ok(self)
    }

    /// VFR to CFR by decimating interlaced sections.
    ///
    /// Uses the detected cycle unless `options` names one; with no cycle this
    /// is a no-op, as is calling it after a previous conversion. Do not use
    /// after [`recover`](Clip::recover): field matching breaks the regular
    /// duplicate pattern this relies on.
    ///
    /// # Errors
    ///
    /// Invalid offsets are rejected before anything is changed.
    pub fn floor(&mut self, options: &DecimationOptions) -> Result<&mut Self, UntelecineError> {
        if self.converted {
            log::debug!("floor: clip was already converted");
            return Ok(self);
        }
        if self.recovered {
            log::warn!("floor after recover: irregular duplicates will give a wrong duration");
        }
        let cycle = options
            .cycle
            .or_else(|| self.pulldown.as_ref().map(PulldownPattern::cycle));
        let Some(cycle) = cycle else {
            log::debug!("floor: no pulldown cycle");
            return Ok(self);
        };
        let conversion = convert_decimation(
            &self.flags,
            &self.frames,
            self.frame_rate,
            Some(cycle),
            options.offsets(),
        )?;
        self.apply(conversion);
        Ok(self)
    }

    fn reports_or_flags(&self) -> Vec<CombingReport> {
        match &self.reports {
            Some(reports) => reports.clone(),
            None => self.flags.iter().map(CombingReport::from_flags).collect(),
        }
    }

    fn decide(&self, reports: &[CombingReport], mode: SelectionMode) -> Result<Vec<Decision>, UntelecineError> {
        #[cfg(feature = "rayon")]
        let decisions = crate::rayon::decide_all_parallel(&self.flags, reports, mode)?;
        #[cfg(not(feature = "rayon"))]
        let decisions = crate::candidate::decide_all(&self.flags, reports, mode)?;
        Ok(decisions)
    }

    /// Replace interlaced frames with their field-matched version.
    ///
    /// Frames flagged progressive or reported clean keep the original;
    /// others take the top- or bottom-first match per the report, or the
    /// original when the order is unknown. The frame count does not change.
    /// The reports are kept for a later [`deinterlace`](Clip::deinterlace).
    ///
    /// # Errors
    ///
    /// Returns [`UntelecineError::LengthMismatch`] if any part of `matches`
    /// is not aligned with the clip.
    pub fn recover(&mut self, matches: FieldMatches<F>) -> Result<&mut Self, UntelecineError> {
        matches.ensure_len(self.frames.len())?;
        let decisions = self.decide(&matches.reports, SelectionMode::Recovery)?;

        let frames: Vec<F> = decisions
            .iter()
            .enumerate()
            .flat_map(|(index, &decision)| {
                materialize(
                    decision,
                    &self.frames[index],
                    std::slice::from_ref(&matches.top_first[index]),
                    std::slice::from_ref(&matches.bottom_first[index]),
                    SelectionMode::Recovery,
                )
            })
            .collect();

        let counts = DecisionCounts::tally(&decisions);
        log::info!(
            "Recovered {} frames ({} TFF, {} BFF, {} progressive, {} unknown order)",
            counts.forward + counts.reverse,
            counts.forward,
            counts.reverse,
            counts.progressive,
            counts.unknown
        );

        self.frames = frames;
        self.reports = Some(matches.reports);
        self.recovered = true;
        Ok(self)
    }

    /// Deinterlace only the frames that need it.
    ///
    /// The kernel is run once per field order. Its output rate must be
    /// exactly 1x or 2x the clip rate for both orders, and this is checked
    /// before any frame is selected. With a double-rate kernel every
    /// passed-through frame is shown twice and each flag entry (and stored
    /// report) is repeated so flags and frames stay aligned.
    ///
    /// Combing reports from a previous [`recover`](Clip::recover) are used if
    /// present; otherwise each frame's order comes from its TFF bit.
    ///
    /// # Errors
    ///
    /// - [`UntelecineError::UnsupportedRateMultiplier`] or
    ///   [`UntelecineError::KernelRateMismatch`] for unusable kernel rates.
    /// - [`UntelecineError::LengthMismatch`] if a kernel output does not hold
    ///   exactly one or two frames per input frame.
    /// - Any error the kernel itself returns.
    pub fn deinterlace<K>(&mut self, kernel: &K) -> Result<&mut Self, UntelecineError>
    where
        K: DeinterlaceKernel<F> + ?Sized,
    {
        let top_first = kernel.deinterlace(&self.frames, self.frame_rate, FieldOrder::TopFirst)?;
        let bottom_first =
            kernel.deinterlace(&self.frames, self.frame_rate, FieldOrder::BottomFirst)?;
        let factor = self.rate_factor(&top_first, &bottom_first)?;
        let copies = factor.copies();
        let mode = SelectionMode::Deinterlace(factor);

        let reports = self.reports_or_flags();
        let decisions = self.decide(&reports, mode)?;

        let frames: Vec<F> = decisions
            .iter()
            .enumerate()
            .flat_map(|(index, &decision)| {
                let span = index * copies..(index + 1) * copies;
                materialize(
                    decision,
                    &self.frames[index],
                    &top_first.frames[span.clone()],
                    &bottom_first.frames[span],
                    mode,
                )
            })
            .collect();

        let counts = DecisionCounts::tally(&decisions);
        log::info!(
            "Deinterlaced {} frames at {}x ({} TFF, {} BFF, {} progressive, {} unknown order)",
            counts.forward + counts.reverse,
            copies,
            counts.forward,
            counts.reverse,
            counts.progressive,
            counts.unknown
        );
        if counts.unknown > 0 {
            log::warn!(
                "{} interlaced frames had no field order and were left untouched",
                counts.unknown
            );
        }

        if copies > 1 {
            self.flags = repeat_each(&self.flags, copies);
            if let Some(stored) = self.reports.take() {
                self.reports = Some(repeat_each(&stored, copies));
            }
        }
        self.frames = frames;
        self.frame_rate = top_first.frame_rate;
        Ok(self)
    }

    fn rate_factor(
        &self,
        top_first: &KernelOutput<F>,
        bottom_first: &KernelOutput<F>,
    ) -> Result<RateFactor, UntelecineError> {
        if top_first.frame_rate != bottom_first.frame_rate {
            return Err(UntelecineError::KernelRateMismatch {
                top_first: top_first.frame_rate,
                bottom_first: bottom_first.frame_rate,
            });
        }
        let factor = RateFactor::between(self.frame_rate, top_first.frame_rate)?;
        let expected = self.frames.len() * factor.copies();
        for (what, output) in [
            ("top-first kernel output", top_first),
            ("bottom-first kernel output", bottom_first),
        ] {
            if output.frames.len() != expected {
                return Err(UntelecineError::length_mismatch(what, expected, output.frames.len()));
            }
        }
        Ok(factor)
    }

    /// Frame counts, cadence, and aspect information for the current state.
    pub fn summary(&self) -> StreamSummary {
        let mut summary = StreamSummary::from_flags(&self.flags, self.frame_rate);
        summary.vfr = self.vfr;
        summary.pulldown = self.pulldown.clone();
        if let (Some(dar), Some((width, height))) = (&self.display_aspect_ratio, self.picture_size) {
            summary = summary.with_aspect(dar, width, height);
        }
        summary
    }

    /// Check the current flags for patterns that make conversion unreliable.
    pub fn validate(&self) -> ValidationReport {
        validate_flags(&self.flags)
    }
}

fn repeat_each<T: Clone>(items: &[T], copies: usize) -> Vec<T> {
    items
        .iter()
        .flat_map(|item| std::iter::repeat_n(item.clone(), copies))
        .collect()
}
