//! Grouping frame indices into sections.
//!
//! A section is a maximal run of consecutive frames sharing a scan type.
//! Sections are never stored; they are recomputed from the flag sequence by
//! [`scan_sections`] whenever they are needed.

use std::iter::Peekable;
use std::ops::Range;

use crate::flags::{FrameFlags, ScanType};

/// Integer types [`group_consecutive`] can group.
///
/// Implemented for every primitive integer type.
pub trait Consecutive: Copy + PartialEq + std::fmt::Debug {
    /// The value one greater than `self`, or `None` at the type's maximum.
    fn successor(self) -> Option<Self>;
}

macro_rules! impl_consecutive {
    ($($ty:ty),*) => {
        $(
            impl Consecutive for $ty {
                fn successor(self) -> Option<Self> {
                    self.checked_add(1)
                }
            }
        )*
    };
}

impl_consecutive!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// Lazy iterator over runs of consecutive integers.
///
/// Created by [`group_consecutive`].
#[derive(Debug, Clone)]
pub struct ConsecutiveGroups<I: Iterator>
where
    I::Item: Consecutive,
{
    numbers: Peekable<I>,
}

impl<I: Iterator> Iterator for ConsecutiveGroups<I>
where
    I::Item: Consecutive,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.numbers.next()?;
        let mut group = vec![first];
        let mut last = first;
        while let Some(&number) = self.numbers.peek() {
            if last.successor() != Some(number) {
                break;
            }
            group.push(number);
            last = number;
            self.numbers.next();
        }
        Some(group)
    }
}

/// Split a sequence of integers into runs where each value is exactly one
/// more than the value before it.
///
/// Works for any primitive integer type, signed or unsigned. The input is
/// taken in the given order and is not sorted first, so `[3, 4, 1, 2]`
/// yields two groups.
///
/// ```
/// use untelecine::group_consecutive;
///
/// let groups: Vec<Vec<usize>> = group_consecutive([1, 2, 3, 5, 6, 7, 9]).collect();
/// assert_eq!(groups, vec![vec![1, 2, 3], vec![5, 6, 7], vec![9]]);
///
/// let groups: Vec<Vec<i64>> = group_consecutive([-2, -1, 0, 4]).collect();
/// assert_eq!(groups, vec![vec![-2, -1, 0], vec![4]]);
/// ```
pub fn group_consecutive<I>(numbers: I) -> ConsecutiveGroups<I::IntoIter>
where
    I: IntoIterator,
    I::Item: Consecutive,
{
    ConsecutiveGroups {
        numbers: numbers.into_iter().peekable(),
    }
}

/// A maximal run of frames with the same scan type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Scan type shared by every frame in the section.
    pub scan_type: ScanType,
    /// Frame indices covered, end-exclusive.
    pub frames: Range<usize>,
}

impl Section {
    /// Index of the section's first frame.
    pub fn start(&self) -> usize {
        self.frames.start
    }

    /// Number of frames in the section.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if the section covers no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Progressive sections and interlaced sections, grouped independently and
/// then ordered by their first frame.
pub fn scan_sections(flags: &[FrameFlags]) -> Vec<Section> {
    let indices_of = |scan_type: ScanType| {
        flags
            .iter()
            .enumerate()
            .filter(move |(_, flag)| flag.scan_type() == scan_type)
            .map(|(index, _)| index)
    };

    let mut sections: Vec<Section> = [ScanType::Progressive, ScanType::Interlaced]
        .into_iter()
        .flat_map(|scan_type| {
            group_consecutive(indices_of(scan_type)).map(move |group| Section {
                scan_type,
                frames: group[0]..group[group.len() - 1] + 1,
            })
        })
        .collect();
    sections.sort_by_key(Section::start);
    sections
}
