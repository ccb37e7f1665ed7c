//! Cyclic selection over plain slices.
//!
//! [`select_every`] keeps the elements whose position modulo a cycle falls on
//! one of a set of offsets, or, inverted, the elements that do not. The
//! decimation converter uses the normal form to thin interlaced frames and the
//! inverted form to find which flag entries to drop.
//!
//! # Example
//!
//! ```
//! use untelecine::select_every;
//!
//! let frames: Vec<u32> = (0..10).collect();
//! let kept = select_every(&frames, 5, &[0, 1, 2, 3], false)?;
//! assert_eq!(kept, vec![0, 1, 2, 3, 5, 6, 7, 8]);
//!
//! let dropped = select_every(&frames, 5, &[0, 1, 2, 3], true)?;
//! assert_eq!(dropped, vec![4, 9]);
//! # Ok::<(), untelecine::UntelecineError>(())
//! ```

use std::collections::BTreeSet;

use crate::error::UntelecineError;

/// Check a cycle/offsets pair and return the de-duplicated offsets.
///
/// # Errors
///
/// - [`UntelecineError::InvalidCycle`] if `cycle` is zero.
/// - [`UntelecineError::EmptyOffsets`] if `offsets` is empty.
/// - [`UntelecineError::OffsetOutOfRange`] if any offset is `>= cycle`.
pub fn validate_offsets(cycle: usize, offsets: &[usize]) -> Result<BTreeSet<usize>, UntelecineError> {
    if cycle < 1 {
        return Err(UntelecineError::InvalidCycle(cycle));
    }
    if offsets.is_empty() {
        return Err(UntelecineError::EmptyOffsets);
    }
    if let Some(&offset) = offsets.iter().find(|&&offset| offset >= cycle) {
        return Err(UntelecineError::OffsetOutOfRange { offset, cycle });
    }
    Ok(offsets.iter().copied().collect())
}

/// Positions in `0..len` picked by a cyclic selection.
///
/// Same rules as [`select_every`], but yields positions instead of cloning
/// elements.
pub fn select_every_indices(
    len: usize,
    cycle: usize,
    offsets: &[usize],
    inverse: bool,
) -> Result<Vec<usize>, UntelecineError> {
    let offsets = validate_offsets(cycle, offsets)?;
    Ok((0..len)
        .filter(|position| offsets.contains(&(position % cycle)) ^ inverse)
        .collect())
}

/// Keep every element at `position % cycle ∈ offsets`, or, when `inverse`
/// is set, every element that is not.
///
/// Duplicate offsets are ignored. Relative order of kept elements is
/// preserved.
///
/// # Errors
///
/// See [`validate_offsets`].
pub fn select_every<T: Clone>(
    data: &[T],
    cycle: usize,
    offsets: &[usize],
    inverse: bool,
) -> Result<Vec<T>, UntelecineError> {
    let offsets = validate_offsets(cycle, offsets)?;
    Ok(data
        .iter()
        .enumerate()
        .filter(|(position, _)| offsets.contains(&(position % cycle)) ^ inverse)
        .map(|(_, element)| element.clone())
        .collect())
}
