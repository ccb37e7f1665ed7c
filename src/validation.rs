//! Flag sequence validation.
//!
//! Provides [`validate_flags`], which inspects a flag sequence and returns a
//! [`ValidationReport`] describing its cadence and anything that would make
//! [`Clip::floor`](crate::Clip::floor) give a result of the wrong duration.
//!
//! # Example
//!
//! ```
//! use untelecine::{FrameFlags, validate_flags};
//!
//! let flags = vec![FrameFlags::interlaced(true); 10];
//! let report = validate_flags(&flags);
//! if report.is_valid() {
//!     println!("Flags are usable");
//! } else {
//!     for error in &report.errors {
//!         println!("Error: {error}");
//!     }
//! }
//! ```

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::flags::{FrameFlags, ScanType, is_variable_frame_rate};
use crate::pulldown::{detect_pulldown, marker_runs, typical_gap};
use crate::sections::scan_sections;

/// Summary of flag validation.
///
/// Produced by [`validate_flags`] and [`Clip::validate`](crate::Clip::validate).
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Informational notices (not problems).
    pub info: Vec<String>,
    /// Non-fatal issues that may affect conversion.
    pub warnings: Vec<String>,
    /// Fatal issues that prevent conversion.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Returns `true` if no errors were found. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of issues (info + warnings + errors).
    pub fn issue_count(&self) -> usize {
        self.info.len() + self.warnings.len() + self.errors.len()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for item in &self.info {
            writeln!(f, "[INFO] {item}")?;
        }
        for item in &self.warnings {
            writeln!(f, "[WARN] {item}")?;
        }
        for item in &self.errors {
            writeln!(f, "[ERROR] {item}")?;
        }
        if self.issue_count() == 0 {
            writeln!(f, "No issues found.")?;
        }
        Ok(())
    }
}

/// Run cadence checks over a flag sequence.
pub fn validate_flags(flags: &[FrameFlags]) -> ValidationReport {
    let mut report = ValidationReport::default();

    // ── Stream presence ────────────────────────────────────────────
    if flags.is_empty() {
        report.errors.push("Stream contains no frames".to_string());
        return report;
    }

    let progressive = flags.iter().filter(|flag| flag.progressive).count();
    report.info.push(format!(
        "{} frames: {} progressive, {} interlaced",
        flags.len(),
        progressive,
        flags.len() - progressive
    ));

    let pulldown = detect_pulldown(flags);
    match &pulldown {
        Some(pattern) => report.info.push(format!(
            "Pulldown {pattern} (cycle {}){}",
            pattern.cycle(),
            if is_variable_frame_rate(flags) { ", variable frame rate" } else { "" }
        )),
        None => report.info.push("No pulldown detected".to_string()),
    }

    // ── Cadence regularity ─────────────────────────────────────────
    let gaps: BTreeSet<usize> = marker_runs(flags)
        .iter()
        .filter_map(|markers| typical_gap(markers))
        .collect();
    if gaps.len() > 1 {
        let listed: Vec<String> = gaps.iter().map(ToString::to_string).collect();
        report.warnings.push(format!(
            "Progressive runs disagree on the pulldown gap ({}); decimation assumes one cycle",
            listed.join(", ")
        ));
    }

    // ── Interlaced sections ────────────────────────────────────────
    for section in scan_sections(flags)
        .into_iter()
        .filter(|section| section.scan_type == ScanType::Interlaced)
    {
        let section_flags = &flags[section.frames.clone()];
        let top_first = section_flags.iter().filter(|flag| flag.tff).count();
        if top_first != 0 && top_first != section_flags.len() {
            report.warnings.push(format!(
                "Interlaced frames {}..{} mix field orders ({} TFF, {} BFF)",
                section.frames.start,
                section.frames.end,
                top_first,
                section_flags.len() - top_first
            ));
        }
        if let Some(pattern) = &pulldown {
            let remainder = section.len() % pattern.cycle();
            if remainder != 0 {
                report.warnings.push(format!(
                    "Interlaced frames {}..{} end with a partial cycle of {} frames",
                    section.frames.start, section.frames.end, remainder
                ));
            }
        }
    }

    let stray = flags
        .iter()
        .filter(|flag| !flag.progressive && flag.is_duplication_marker())
        .count();
    if stray > 0 {
        report.warnings.push(format!(
            "{stray} interlaced frames carry RFF+TFF; they are not treated as pulldown"
        ));
    }

    report
}
