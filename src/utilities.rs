//! Utility functions.
//!
//! Aspect-ratio arithmetic, broadcast standard naming, and the
//! encounter-ordered "most common value" count shared by the pulldown
//! detector and the validator.

use crate::rational::{FrameRate, gcd};

/// The most frequent value, ties going to whichever value was seen first.
///
/// Returns `None` for an empty input.
pub fn most_common<I>(values: I) -> Option<usize>
where
    I: IntoIterator<Item = usize>,
{
    let mut counts: Vec<(usize, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(usize, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Reduced `width:height` string for a resolution.
///
/// Returns `None` for a zero dimension.
pub fn aspect_ratio(width: u32, height: u32) -> Option<String> {
    if width == 0 || height == 0 {
        return None;
    }
    let divisor = gcd(width as u64, height as u64);
    Some(format!("{}:{}", width as u64 / divisor, height as u64 / divisor))
}

/// Reduced pixel aspect ratio for a storage resolution shown at the display
/// aspect ratio `dar_width:dar_height`.
pub fn pixel_aspect_ratio(width: u32, height: u32, dar_width: u32, dar_height: u32) -> Option<String> {
    let par_width = height as u64 * dar_width as u64;
    let par_height = width as u64 * dar_height as u64;
    if par_width == 0 || par_height == 0 {
        return None;
    }
    let divisor = gcd(par_width, par_height);
    Some(format!("{}:{}", par_width / divisor, par_height / divisor))
}

/// Parse a `"W:H"` ratio string.
pub fn parse_ratio(value: &str) -> Option<(u32, u32)> {
    let (width, height) = value.trim().split_once(':')?;
    Some((width.trim().parse().ok()?, height.trim().parse().ok()?))
}

/// Broadcast standard name for a frame rate, `"?"` when it is not one of
/// the usual DVD rates.
pub fn broadcast_standard(rate: FrameRate) -> &'static str {
    match rate {
        FrameRate::FILM => "FILM",
        FrameRate::PAL => "PAL",
        FrameRate::PAL_FIELDS => "PALi",
        FrameRate::NTSC => "NTSC",
        FrameRate::NTSC_FIELDS => "NTSCi",
        FrameRate::NTSC_FILM => "NTSC (FILM)",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_common_prefers_first_seen_on_ties() {
        assert_eq!(most_common([4, 3, 3, 4]), Some(4));
        assert_eq!(most_common([1, 2, 2]), Some(2));
        assert_eq!(most_common(Vec::new()), None);
    }

    #[test]
    fn dvd_ratios() {
        assert_eq!(aspect_ratio(720, 480).as_deref(), Some("3:2"));
        assert_eq!(pixel_aspect_ratio(720, 480, 4, 3).as_deref(), Some("8:9"));
        assert_eq!(pixel_aspect_ratio(720, 576, 16, 9).as_deref(), Some("64:45"));
        assert_eq!(aspect_ratio(0, 480), None);
    }

    #[test]
    fn ratio_parsing() {
        assert_eq!(parse_ratio("16:9"), Some((16, 9)));
        assert_eq!(parse_ratio("wide"), None);
    }

    #[test]
    fn standards() {
        assert_eq!(broadcast_standard(FrameRate::NTSC), "NTSC");
        assert_eq!(broadcast_standard(FrameRate::NTSC_FILM), "NTSC (FILM)");
        assert_eq!(broadcast_standard(FrameRate::new(15, 1).unwrap()), "?");
    }
}
