//! Exact frame rates.
//!
//! [`FrameRate`] keeps a reduced numerator/denominator pair so that rate
//! arithmetic during decimation (`30000/1001 → 24000/1001`) and rate
//! multiplier checks for deinterlace kernels stay exact.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::UntelecineError;

/// A positive, reduced frame rate in frames per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRate {
    numerator: u64,
    denominator: u64,
}

impl FrameRate {
    /// 24 fps film.
    pub const FILM: FrameRate = FrameRate::from_reduced(24, 1);
    /// 24000/1001 fps, film slowed for NTSC.
    pub const NTSC_FILM: FrameRate = FrameRate::from_reduced(24000, 1001);
    /// 25 fps PAL.
    pub const PAL: FrameRate = FrameRate::from_reduced(25, 1);
    /// 50 fps, PAL field rate.
    pub const PAL_FIELDS: FrameRate = FrameRate::from_reduced(50, 1);
    /// 30000/1001 fps NTSC.
    pub const NTSC: FrameRate = FrameRate::from_reduced(30000, 1001);
    /// 60000/1001 fps, NTSC field rate.
    pub const NTSC_FIELDS: FrameRate = FrameRate::from_reduced(60000, 1001);

    const fn from_reduced(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Create a frame rate, reducing it to lowest terms.
    ///
    /// # Errors
    ///
    /// Returns [`UntelecineError::InvalidFrameRate`] if either part is zero.
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, UntelecineError> {
        if numerator == 0 || denominator == 0 {
            return Err(UntelecineError::InvalidFrameRate(format!(
                "{numerator}/{denominator}"
            )));
        }
        let divisor = gcd(numerator, denominator);
        Ok(Self {
            numerator: numerator / divisor,
            denominator: denominator / divisor,
        })
    }

    /// Reduced numerator.
    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    /// Reduced denominator.
    pub fn denominator(&self) -> u64 {
        self.denominator
    }

    /// Frames per second as a float (for display only).
    pub fn as_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// The rate left after dropping one frame out of every `cycle`.
    ///
    /// `rate - rate / cycle`, computed exactly.
    ///
    /// # Errors
    ///
    /// Returns [`UntelecineError::InvalidCycle`] for a zero cycle and
    /// [`UntelecineError::InvalidFrameRate`] for a cycle of one (nothing
    /// would remain) or a result too large to represent.
    pub fn decimated(&self, cycle: usize) -> Result<Self, UntelecineError> {
        if cycle == 0 {
            return Err(UntelecineError::InvalidCycle(cycle));
        }
        let cycle = cycle as u128;
        Self::from_wide(
            self.numerator as u128 * (cycle - 1),
            self.denominator as u128 * cycle,
        )
    }

    /// Multiply the rate by a whole factor.
    ///
    /// # Errors
    ///
    /// Returns [`UntelecineError::InvalidFrameRate`] for a zero factor or a
    /// product that does not fit in `u64` once reduced.
    pub fn multiplied(&self, factor: u64) -> Result<Self, UntelecineError> {
        Self::from_wide(
            self.numerator as u128 * factor as u128,
            self.denominator as u128,
        )
    }

    // u64 * u64 always fits in u128; reduce there and narrow afterwards.
    fn from_wide(numerator: u128, denominator: u128) -> Result<Self, UntelecineError> {
        if numerator == 0 || denominator == 0 {
            return Err(UntelecineError::InvalidFrameRate(format!(
                "{numerator}/{denominator}"
            )));
        }
        let divisor = gcd_wide(numerator, denominator);
        let (numerator, denominator) = (numerator / divisor, denominator / divisor);
        match (u64::try_from(numerator), u64::try_from(denominator)) {
            (Ok(numerator), Ok(denominator)) => Ok(Self::from_reduced(numerator, denominator)),
            _ => Err(UntelecineError::InvalidFrameRate(format!(
                "{numerator}/{denominator} does not fit in 64 bits"
            ))),
        }
    }

    /// If `self` is a whole multiple of `base`, return that multiple.
    ///
    /// ```
    /// use untelecine::FrameRate;
    ///
    /// assert_eq!(FrameRate::NTSC_FIELDS.multiple_of(FrameRate::NTSC), Some(2));
    /// assert_eq!(FrameRate::NTSC_FILM.multiple_of(FrameRate::NTSC), None);
    /// ```
    pub fn multiple_of(&self, base: FrameRate) -> Option<u64> {
        let numerator = self.numerator as u128 * base.denominator as u128;
        let denominator = self.denominator as u128 * base.numerator as u128;
        if numerator % denominator == 0 {
            u64::try_from(numerator / denominator).ok()
        } else {
            None
        }
    }
}

impl Display for FrameRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl PartialOrd for FrameRate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrameRate {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.numerator as u128 * other.denominator as u128;
        let rhs = other.numerator as u128 * self.denominator as u128;
        lhs.cmp(&rhs)
    }
}

impl FromStr for FrameRate {
    type Err = UntelecineError;

    /// Parse `"30000/1001"` or a whole number such as `"25"`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || UntelecineError::InvalidFrameRate(value.to_string());
        match value.trim().split_once('/') {
            Some((numerator, denominator)) => Self::new(
                numerator.trim().parse().map_err(|_| invalid())?,
                denominator.trim().parse().map_err(|_| invalid())?,
            ),
            None => Self::new(value.trim().parse().map_err(|_| invalid())?, 1),
        }
    }
}

pub(crate) fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn gcd_wide(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduces_on_construction() {
        let rate = FrameRate::new(60000, 2002).unwrap();
        assert_eq!(rate, FrameRate::NTSC);
        assert_eq!(rate.to_string(), "30000/1001");
    }

    #[test]
    fn rejects_zero() {
        assert!(FrameRate::new(0, 1).is_err());
        assert!(FrameRate::new(25, 0).is_err());
    }

    #[test]
    fn decimates_ntsc_to_film() {
        assert_eq!(FrameRate::NTSC.decimated(5).unwrap(), FrameRate::NTSC_FILM);
        assert_eq!(FrameRate::PAL_FIELDS.decimated(2).unwrap(), FrameRate::PAL);
        assert!(FrameRate::NTSC.decimated(0).is_err());
        assert!(FrameRate::NTSC.decimated(1).is_err());
    }

    #[test]
    fn oversized_results_are_errors() {
        let huge = FrameRate::new(u64::MAX, 1).unwrap();
        assert!(matches!(
            huge.multiplied(2),
            Err(UntelecineError::InvalidFrameRate(_))
        ));
        assert!(matches!(
            huge.decimated(7),
            Err(UntelecineError::InvalidFrameRate(_))
        ));
        // Reduction can bring a wide product back into range.
        let rate = FrameRate::new(u64::MAX, 3).unwrap();
        assert_eq!(rate.decimated(4).unwrap(), FrameRate::new(u64::MAX, 4).unwrap());
    }

    #[test]
    fn parses_text() {
        assert_eq!("30000/1001".parse::<FrameRate>().unwrap(), FrameRate::NTSC);
        assert_eq!(" 25 ".parse::<FrameRate>().unwrap(), FrameRate::PAL);
        assert!("abc".parse::<FrameRate>().is_err());
        assert!("1/x".parse::<FrameRate>().is_err());
    }

    #[test]
    fn orders_by_value() {
        assert!(FrameRate::NTSC_FILM < FrameRate::FILM);
        assert!(FrameRate::NTSC < FrameRate::NTSC_FIELDS);
    }
}
