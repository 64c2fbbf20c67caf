//! Repeat/spacer boundary encoding for a single read
//!
//! A [`RepeatArray`] stores the boundaries of every repeat found in a read as
//! one flat, even-length sequence of positions:
//!
//! ```text
//! positions:  [ s0, e0, s1, e1, s2, e2 ]
//! repeats:      (s0,e0) (s1,e1) (s2,e2)      pairs at (2i, 2i+1)
//! spacers:          (e0,s1) (e1,s2)          pairs at (2i+1, 2i+2)
//! ```
//!
//! Positioned access goes through [`RepeatCursor`] and [`SpacerCursor`], which
//! are plain offsets into the backing sequence. Two cursors at the same logical
//! index compare equal and resolve to the same storage, so a write through one
//! is visible through the other. Looking up an index past the last pair yields
//! the end sentinel rather than an error.
//!
//! # Example
//! ```
//! use crass_lib::repeat_array::{RepeatArray, Span};
//!
//! let mut array = RepeatArray::new();
//! array.add(1, 3);
//! array.add(7, 12);
//!
//! assert_eq!(array.number_of_repeats(), 2);
//! assert_eq!(array.number_of_spacers(), 1);
//! assert_eq!(array.repeat(array.repeat_at(1)), Some(Span::new(7, 12)));
//! assert_eq!(array.repeat_at(2), array.repeat_end());
//! assert_eq!(array.to_string(), "(1,3), (7,12)");
//! ```

use std::fmt;
use std::ops::{Add, AddAssign, Range, Sub, SubAssign};

/// A `(start, end)` boundary pair read out of a [`RepeatArray`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// First position of the span
    pub start: usize,
    /// Second position of the span
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// `end - start`, or 0 when the pair is inverted
    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the span covers no positions
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the half-open interval `[start, end)` fully contains `range`
    #[inline]
    pub fn contains_range(&self, range: &Range<usize>) -> bool {
        self.start <= range.start && range.end <= self.end
    }

    /// Whether the half-open interval `[start, end)` shares a position with `range`
    #[inline]
    pub fn overlaps_range(&self, range: &Range<usize>) -> bool {
        self.start < range.end && range.start < self.end
    }
}

impl From<Span> for (usize, usize) {
    fn from(span: Span) -> Self {
        (span.start, span.end)
    }
}

/// Mutable view of one boundary pair, borrowed from the backing sequence
#[derive(Debug)]
pub struct SpanMut<'a> {
    /// First position of the pair
    pub start: &'a mut usize,
    /// Second position of the pair
    pub end: &'a mut usize,
}

/// Position of a repeat pair inside a [`RepeatArray`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RepeatCursor {
    offset: usize,
}

/// Position of a spacer pair inside a [`RepeatArray`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpacerCursor {
    offset: usize,
}

/// Cursor arithmetic moves by whole pairs (two positions per step)
macro_rules! impl_cursor_arith {
    ($($cursor:ident),* $(,)?) => {
        $(
            impl $cursor {
                /// Offset of the pair's first position in the backing sequence
                #[inline]
                pub fn offset(&self) -> usize {
                    self.offset
                }
            }

            impl Add<usize> for $cursor {
                type Output = $cursor;

                #[inline]
                fn add(self, steps: usize) -> Self::Output {
                    $cursor { offset: self.offset + 2 * steps }
                }
            }

            impl AddAssign<usize> for $cursor {
                #[inline]
                fn add_assign(&mut self, steps: usize) {
                    self.offset += 2 * steps;
                }
            }

            impl Sub<usize> for $cursor {
                type Output = $cursor;

                #[inline]
                fn sub(self, steps: usize) -> Self::Output {
                    assert!(
                        self.offset >= 2 * steps,
                        "cursor at offset {} cannot move back {} pairs",
                        self.offset,
                        steps
                    );
                    $cursor { offset: self.offset - 2 * steps }
                }
            }

            impl SubAssign<usize> for $cursor {
                #[inline]
                fn sub_assign(&mut self, steps: usize) {
                    *self = *self - steps;
                }
            }
        )*
    };
}

impl_cursor_arith!(RepeatCursor, SpacerCursor);

/// Alternating repeat/spacer boundaries of one read
///
/// The positions are expected to be non-decreasing in sequence order, but
/// [`RepeatArray::add`] does not enforce it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepeatArray {
    positions: Vec<usize>,
}

impl RepeatArray {
    /// Create an empty array
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a repeat spanning `start..end`
    ///
    /// No ordering or overlap checks are made against earlier repeats.
    pub fn add(&mut self, start: usize, end: usize) {
        self.positions.push(start);
        self.positions.push(end);
    }

    /// Remove every repeat
    pub fn clear(&mut self) {
        self.positions.clear();
    }

    /// Raw boundary positions
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Returns `true` if no repeat has been added
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of repeats stored
    pub fn number_of_repeats(&self) -> usize {
        self.positions.len() / 2
    }

    /// Number of spacers between the stored repeats
    ///
    /// This is one less than the number of repeats and is `-1` for an empty
    /// array, so callers must check the sign before using it as a count.
    pub fn number_of_spacers(&self) -> isize {
        (self.positions.len() / 2) as isize - 1
    }

    /// Cursor at the first repeat
    pub fn repeat_begin(&self) -> RepeatCursor {
        RepeatCursor { offset: 0 }
    }

    /// One-past-the-last repeat sentinel
    pub fn repeat_end(&self) -> RepeatCursor {
        RepeatCursor {
            offset: self.number_of_repeats() * 2,
        }
    }

    /// Cursor at the `i`-th repeat
    ///
    /// Indices up to and including the number of repeats map to a positioned
    /// cursor, where index `number_of_repeats()` lands exactly on the end
    /// sentinel. Anything further out returns [`RepeatArray::repeat_end`].
    pub fn repeat_at(&self, i: usize) -> RepeatCursor {
        if i <= self.positions.len() / 2 {
            RepeatCursor { offset: i * 2 }
        } else {
            self.repeat_end()
        }
    }

    /// Cursor at the first spacer
    pub fn spacer_begin(&self) -> SpacerCursor {
        self.spacer_at(0)
    }

    /// One-past-the-last spacer sentinel
    pub fn spacer_end(&self) -> SpacerCursor {
        SpacerCursor {
            offset: (self.number_of_repeats() * 2).saturating_sub(1),
        }
    }

    /// Cursor at the `i`-th spacer, or [`RepeatArray::spacer_end`]
    ///
    /// Index `number_of_spacers()` lands exactly on the end sentinel.
    pub fn spacer_at(&self, i: usize) -> SpacerCursor {
        if i < self.number_of_repeats() {
            SpacerCursor { offset: 1 + i * 2 }
        } else {
            self.spacer_end()
        }
    }

    /// Read the repeat under `cursor`; `None` for the end sentinel
    pub fn repeat(&self, cursor: RepeatCursor) -> Option<Span> {
        self.pair(cursor.offset)
    }

    /// Read the spacer under `cursor`; `None` for the end sentinel
    pub fn spacer(&self, cursor: SpacerCursor) -> Option<Span> {
        self.pair(cursor.offset)
    }

    /// Mutable view of the repeat under `cursor`
    pub fn repeat_mut(&mut self, cursor: RepeatCursor) -> Option<SpanMut<'_>> {
        self.pair_mut(cursor.offset)
    }

    /// Mutable view of the spacer under `cursor`
    ///
    /// A spacer shares its positions with the neighbouring repeats, so writes
    /// here move the end of repeat `i` and the start of repeat `i + 1`.
    pub fn spacer_mut(&mut self, cursor: SpacerCursor) -> Option<SpanMut<'_>> {
        self.pair_mut(cursor.offset)
    }

    /// Length of the `i`-th repeat, `None` if `i` is out of range
    pub fn repeat_length_at(&self, i: usize) -> Option<usize> {
        self.repeat(self.repeat_at(i)).map(|span| span.len())
    }

    /// Length of the `i`-th spacer, `None` if `i` is out of range
    pub fn spacer_length_at(&self, i: usize) -> Option<usize> {
        self.spacer(self.spacer_at(i)).map(|span| span.len())
    }

    /// Iterate over all repeats in order
    pub fn repeats(&self) -> impl Iterator<Item = Span> + '_ {
        self.positions
            .chunks_exact(2)
            .map(|pair| Span::new(pair[0], pair[1]))
    }

    /// Iterate over all spacers in order
    pub fn spacers(&self) -> impl Iterator<Item = Span> + '_ {
        let inner = match self.positions.len() {
            0..=2 => &[][..],
            len => &self.positions[1..len - 1],
        };
        inner
            .chunks_exact(2)
            .map(|pair| Span::new(pair[0], pair[1]))
    }

    /// Flip the array to the opposite strand of a sequence
    ///
    /// The position sequence is reversed end-to-end, so the last repeat
    /// becomes the first, and every position `v` is then re-anchored to
    /// `final_index - v + 1`. For a read of length `len` with half-open spans,
    /// `final_index = len - 1` maps each span onto its reverse-complement
    /// coordinates.
    ///
    /// # Panics
    /// Panics if a stored position exceeds `final_index + 1`.
    pub fn reverse_repeat_positions(&mut self, final_index: usize) {
        self.reverse_positions();
        self.remap_positions(final_index);
    }

    /// Reverse the order of the position sequence
    pub(crate) fn reverse_positions(&mut self) {
        self.positions.reverse();
    }

    /// Re-anchor every position to the opposite end: `v -> final_index - v + 1`
    pub(crate) fn remap_positions(&mut self, final_index: usize) {
        let anchor = final_index + 1;
        for position in &mut self.positions {
            assert!(
                *position <= anchor,
                "position {} lies beyond final index {}",
                position,
                final_index
            );
            *position = anchor - *position;
        }
    }

    /// Log every repeat and spacer at debug level
    pub fn dump(&self) {
        for (i, span) in self.repeats().enumerate() {
            tracing::debug!("  repeat {}: {},{}", i, span.start, span.end);
        }
        for (i, span) in self.spacers().enumerate() {
            tracing::debug!("  spacer {}: {},{}", i, span.start, span.end);
        }
    }

    fn pair(&self, offset: usize) -> Option<Span> {
        match self.positions.get(offset..offset + 2)? {
            [start, end] => Some(Span::new(*start, *end)),
            _ => None,
        }
    }

    fn pair_mut(&mut self, offset: usize) -> Option<SpanMut<'_>> {
        match self.positions.get_mut(offset..offset + 2)? {
            [start, end] => Some(SpanMut { start, end }),
            _ => None,
        }
    }
}

impl fmt::Display for RepeatArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, span) in self.repeats().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "({},{})", span.start, span.end)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_repeats() -> RepeatArray {
        let mut array = RepeatArray::new();
        array.add(1, 3);
        array.add(7, 12);
        array
    }

    #[test]
    fn test_counts() {
        let array = two_repeats();
        assert_eq!(array.number_of_repeats(), 2);
        assert_eq!(array.number_of_spacers(), 1);
        assert_eq!(array.positions(), &[1, 3, 7, 12]);
    }

    #[test]
    fn test_counts_with_fewer_than_two_repeats() {
        let mut array = RepeatArray::new();
        assert_eq!(array.number_of_repeats(), 0);
        assert_eq!(array.number_of_spacers(), -1);

        array.add(4, 9);
        assert_eq!(array.number_of_repeats(), 1);
        assert_eq!(array.number_of_spacers(), 0);
    }

    #[test]
    fn test_repeat_at() {
        let array = two_repeats();
        assert_eq!(array.repeat(array.repeat_at(0)), Some(Span::new(1, 3)));
        assert_eq!(array.repeat(array.repeat_at(1)), Some(Span::new(7, 12)));
        assert_eq!(array.repeat_at(2), array.repeat_end());
        assert_eq!(array.repeat(array.repeat_at(2)), None);
    }

    #[test]
    fn test_repeat_at_beyond_one_past_end() {
        let array = two_repeats();
        // one past the end lands on the sentinel through the bounds check,
        // anything further is clamped to it
        assert_eq!(array.repeat_at(2).offset(), 4);
        assert_eq!(array.repeat_at(3), array.repeat_end());
        assert_eq!(array.repeat_at(100), array.repeat_end());
    }

    #[test]
    fn test_spacer_at() {
        let array = two_repeats();
        assert_eq!(array.spacer(array.spacer_at(0)), Some(Span::new(3, 7)));
        assert_eq!(array.spacer_at(1), array.spacer_end());
        assert_eq!(array.spacer(array.spacer_at(1)), None);
        assert_eq!(array.spacer_at(5), array.spacer_end());
    }

    #[test]
    fn test_spacer_at_huge_index_is_end() {
        let array = two_repeats();
        assert_eq!(array.spacer_at(usize::MAX), array.spacer_end());
        assert_eq!(array.spacer_at(usize::MAX / 2 + 1), array.spacer_end());
        assert_eq!(array.spacer_length_at(usize::MAX), None);
        assert_eq!(array.repeat_at(usize::MAX), array.repeat_end());
        assert_eq!(array.repeat_length_at(usize::MAX), None);
    }

    #[test]
    fn test_spacer_at_without_spacers() {
        let empty = RepeatArray::new();
        assert_eq!(empty.spacer_begin(), empty.spacer_end());
        assert_eq!(empty.spacer(empty.spacer_at(0)), None);

        let mut single = RepeatArray::new();
        single.add(2, 5);
        assert_eq!(single.spacer_begin(), single.spacer_end());
        assert_eq!(single.spacer(single.spacer_begin()), None);
    }

    #[test]
    fn test_lengths() {
        let array = two_repeats();
        assert_eq!(array.repeat_length_at(0), Some(2));
        assert_eq!(array.repeat_length_at(1), Some(5));
        assert_eq!(array.repeat_length_at(2), None);
        assert_eq!(array.spacer_length_at(0), Some(4));
        assert_eq!(array.spacer_length_at(1), None);
    }

    #[test]
    fn test_cursors_alias_storage() {
        let mut array = two_repeats();
        let first = array.repeat_at(0);
        let second = array.repeat_at(0);

        if let Some(span) = array.repeat_mut(first) {
            *span.start = 0;
        }

        assert_eq!(first, second);
        assert_eq!(array.repeat(second).unwrap().start, 0);
        assert_eq!(array.repeat(first), array.repeat(second));
    }

    #[test]
    fn test_spacer_write_moves_neighbouring_repeats() {
        let mut array = two_repeats();
        let spacer = array.spacer_at(0);
        {
            let span = array.spacer_mut(spacer).unwrap();
            *span.start = 4;
            *span.end = 6;
        }
        assert_eq!(array.repeat(array.repeat_at(0)), Some(Span::new(1, 4)));
        assert_eq!(array.repeat(array.repeat_at(1)), Some(Span::new(6, 12)));
    }

    #[test]
    fn test_cursor_arithmetic() {
        let mut array = two_repeats();
        let mut it = array.repeat_begin();
        let it2 = array.repeat_begin();
        *array.repeat_mut(it).unwrap().start = 0;

        assert_eq!(array.repeat(it + 1).unwrap().start, 7);

        it += 1;
        assert_eq!(it, it2 + 1);
        assert_eq!(array.repeat(it).unwrap().start, 7);

        assert_eq!(array.repeat(it - 1).unwrap().start, 0);

        it -= 1;
        assert_eq!(it, it2);
        assert_eq!(array.repeat(it).unwrap().start, 0);
    }

    #[test]
    fn test_cursor_walk_matches_iterators() {
        let mut array = two_repeats();
        array.add(20, 25);

        let mut walked = Vec::new();
        let mut cursor = array.repeat_begin();
        while cursor != array.repeat_end() {
            walked.push(array.repeat(cursor).unwrap());
            cursor += 1;
        }
        assert_eq!(walked, array.repeats().collect::<Vec<_>>());

        let mut walked = Vec::new();
        let mut cursor = array.spacer_begin();
        while cursor != array.spacer_end() {
            walked.push(array.spacer(cursor).unwrap());
            cursor += 1;
        }
        assert_eq!(walked, vec![Span::new(3, 7), Span::new(12, 20)]);
        assert_eq!(walked, array.spacers().collect::<Vec<_>>());
    }

    #[test]
    #[should_panic(expected = "cannot move back")]
    fn test_cursor_before_begin_panics() {
        let array = two_repeats();
        let _ = array.repeat_begin() - 1;
    }

    #[test]
    fn test_reverse_even_pair_count() {
        let mut array = RepeatArray::new();
        array.add(0, 3);
        array.add(7, 12);

        array.reverse_repeat_positions(14);
        // v -> 15 - v gives [15, 12, 8, 3]; reversed end-to-end: [3, 8, 12, 15]
        assert_eq!(array.positions(), &[3, 8, 12, 15]);
        assert_eq!(array.repeat(array.repeat_at(0)), Some(Span::new(3, 8)));
        assert_eq!(array.spacer(array.spacer_at(0)), Some(Span::new(8, 12)));
    }

    #[test]
    fn test_reverse_odd_pair_count() {
        let mut array = RepeatArray::new();
        array.add(1, 3);
        array.add(7, 12);
        array.add(20, 25);

        array.reverse_repeat_positions(30);
        let expected: Vec<usize> = [25, 20, 12, 7, 3, 1].iter().map(|v| 31 - v).collect();
        assert_eq!(array.positions(), expected.as_slice());
        assert_eq!(array.positions(), &[6, 11, 19, 24, 28, 30]);
        // middle repeat stays in the middle
        assert_eq!(array.repeat(array.repeat_at(1)), Some(Span::new(19, 24)));
    }

    #[test]
    fn test_reverse_steps_separately() {
        let mut array = two_repeats();
        array.reverse_positions();
        assert_eq!(array.positions(), &[12, 7, 3, 1]);

        array.remap_positions(14);
        assert_eq!(array.positions(), &[3, 8, 12, 14]);
    }

    #[test]
    fn test_reverse_twice_restores() {
        let original = two_repeats();
        let mut array = original.clone();
        array.reverse_repeat_positions(20);
        array.reverse_repeat_positions(20);
        assert_eq!(array, original);
    }

    #[test]
    fn test_reverse_empty() {
        let mut array = RepeatArray::new();
        array.reverse_repeat_positions(10);
        assert!(array.is_empty());
    }

    #[test]
    #[should_panic(expected = "beyond final index")]
    fn test_remap_past_final_index_panics() {
        let mut array = two_repeats();
        array.reverse_repeat_positions(5);
    }

    #[test]
    fn test_display() {
        assert_eq!(RepeatArray::new().to_string(), "");
        assert_eq!(two_repeats().to_string(), "(1,3), (7,12)");

        let mut single = RepeatArray::new();
        single.add(4, 9);
        assert_eq!(single.to_string(), "(4,9)");
    }

    #[test]
    fn test_add_is_permissive() {
        let mut array = RepeatArray::new();
        array.add(10, 4);
        array.add(2, 3);
        assert_eq!(array.number_of_repeats(), 2);
        assert_eq!(array.repeat(array.repeat_at(0)), Some(Span::new(10, 4)));
        assert_eq!(array.repeat_length_at(0), Some(0));
    }

    #[test]
    fn test_span_ranges() {
        let span = Span::new(5, 10);
        assert!(span.contains_range(&(5..10)));
        assert!(span.contains_range(&(6..8)));
        assert!(!span.contains_range(&(4..8)));
        assert!(span.overlaps_range(&(9..12)));
        assert!(!span.overlaps_range(&(10..12)));
        assert_eq!(<(usize, usize)>::from(span), (5, 10));
    }
}
