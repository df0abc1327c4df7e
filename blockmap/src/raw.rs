use std::iter::FusedIterator;
use std::ops::RangeInclusive;

use crate::block::{bit_of, block_of, position, value_at, Block, BlockBits, MAX_BLOCK};
use crate::error::{FormatError, Result};
use crate::ops::{intersect, overlap, subtract, union};

/// A contiguous window of blocks `[start, end]` with one byte per block.
///
/// Bytes are ordered from the highest block down: `data[0]` holds block
/// `end` and the last byte holds block `start`. Bit `j` of the byte for
/// block `b` represents value `b * 8 + j`.
///
/// A window is never zero-length, but it may contain zero bytes, including
/// being entirely zero (for example when decoded from such a buffer).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "allocative", derive(allocative::Allocative))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawParts")
)]
pub struct RawIndex {
    pub(crate) start: u32,
    pub(crate) end: u32,
    pub(crate) data: Vec<u8>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawParts {
    start: u32,
    end: u32,
    data: Vec<u8>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawParts> for RawIndex {
    type Error = crate::Error;

    fn try_from(parts: RawParts) -> Result<Self> {
        Self::from_parts(parts.start, parts.end, parts.data)
    }
}

impl RawIndex {
    /// Build from an ascending iterator of values.
    ///
    /// Returns `None` when the iterator is empty. Duplicates are tolerated.
    ///
    /// Panics if a value is smaller than its predecessor.
    pub fn from_sorted_iter(iter: impl IntoIterator<Item = u32>) -> Option<Self> {
        let mut iter = iter.into_iter();
        let first = iter.next()?;
        let start = block_of(first);

        // Built lowest block first and reversed once at the end.
        let mut data = vec![1u8 << bit_of(first)];
        let mut prev = first;

        for v in iter {
            assert!(v >= prev, "values must be sorted: {v} follows {prev}");
            prev = v;

            let pos = (block_of(v) - start) as usize;
            if pos >= data.len() {
                data.resize(pos + 1, 0);
            }
            data[pos] |= 1u8 << bit_of(v);
        }

        let end = start + (data.len() as u32 - 1);
        data.reverse();

        Some(Self { start, end, data })
    }

    /// Build from values in any order.
    ///
    /// Returns `None` when there are no values. The bounds follow the
    /// smallest and largest value, so the byte for block `end` is never zero.
    pub fn from_values(values: impl IntoIterator<Item = u32>) -> Option<Self> {
        let values: Vec<u32> = values.into_iter().collect();
        let min = values.iter().copied().min()?;
        let max = values.iter().copied().max()?;

        let start = block_of(min);
        let end = block_of(max);
        let mut data = vec![0u8; (end - start) as usize + 1];

        for v in values {
            data[position(end, block_of(v))] |= 1u8 << bit_of(v);
        }

        Some(Self { start, end, data })
    }

    /// Assemble a window from its parts, validating the layout.
    pub fn from_parts(start: u32, end: u32, data: Vec<u8>) -> Result<Self> {
        if end < start {
            return Err(FormatError::InvertedRange { start, end }.into());
        }
        if end > MAX_BLOCK {
            return Err(FormatError::BlockOutOfRange { block: end }.into());
        }

        let expected = (end - start) as usize + 1;
        if data.len() != expected {
            return Err(FormatError::LengthMismatch {
                expected,
                len: data.len(),
            }
            .into());
        }

        Ok(Self { start, end, data })
    }

    /// Split into `(start, end, data)`.
    pub fn into_parts(self) -> (u32, u32, Vec<u8>) {
        (self.start, self.end, self.data)
    }

    /// The lowest block in the window.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// The highest block in the window.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// The packed bytes, highest block first.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The number of blocks in the window.
    pub fn block_count(&self) -> u32 {
        self.end - self.start + 1
    }

    /// The range of values the window can represent.
    pub fn value_range(&self) -> RangeInclusive<u32> {
        value_at(self.start, 0)..=value_at(self.end, 7)
    }

    /// The byte for block `block`; blocks outside the window are empty.
    pub fn block(&self, block: u32) -> Block {
        block_in(&self.data, self.start, self.end, block)
    }

    /// Iterate over `(block, byte)` pairs from `start` to `end`.
    pub fn blocks(&self) -> impl DoubleEndedIterator<Item = (u32, Block)> + '_ {
        let start = self.start;
        self.data
            .iter()
            .rev()
            .enumerate()
            .map(move |(i, &b)| (start + i as u32, Block::new(b)))
    }

    /// Test whether `value` is in the window.
    pub fn contains(&self, value: u32) -> bool {
        self.block(block_of(value)).has_bit(bit_of(value))
    }

    /// Count the number of set bits.
    pub fn len(&self) -> u64 {
        count_bits(&self.data)
    }

    /// Returns `true` if no bits are set.
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// The smallest set value, or `None` if no bits are set.
    pub fn min(&self) -> Option<u32> {
        self.blocks()
            .find_map(|(block, byte)| byte.min_bit().map(|bit| value_at(block, bit)))
    }

    /// The largest set value, or `None` if no bits are set.
    pub fn max(&self) -> Option<u32> {
        self.blocks()
            .rev()
            .find_map(|(block, byte)| byte.max_bit().map(|bit| value_at(block, bit)))
    }

    /// Iterate over set values in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.data, self.start)
    }

    /// The overlapping block range of two windows, if any.
    pub fn overlap(&self, other: &RawIndex) -> Option<RangeInclusive<u32>> {
        overlap(self, other).map(|(lo, hi)| lo..=hi)
    }

    /// Intersection over the overlapping blocks.
    ///
    /// Returns `None` when the windows do not overlap or share no bit.
    pub fn intersection(&self, other: &RawIndex) -> Option<RawIndex> {
        intersect(self, other)
    }

    /// Union spanning both windows.
    pub fn union(&self, other: &RawIndex) -> RawIndex {
        union(self, other)
    }

    /// Clear every bit of `other` from `self`, in place.
    ///
    /// Only the overlapping blocks change; the bounds stay the same.
    /// Returns `false` if the windows do not overlap.
    pub fn subtract(&mut self, other: &RawIndex) -> bool {
        subtract(self, other)
    }

    /// The number of heap-allocated bytes used by this window.
    pub fn heap_bytes(&self) -> usize {
        self.data.capacity()
    }
}

impl<'a> IntoIterator for &'a RawIndex {
    type Item = u32;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// The byte for `block` in a window `[start, end]` laid out highest first.
#[inline]
pub(crate) fn block_in(data: &[u8], start: u32, end: u32, block: u32) -> Block {
    if block < start || block > end {
        return Block::default();
    }
    Block::new(data[position(end, block)])
}

#[inline]
pub(crate) fn count_bits(data: &[u8]) -> u64 {
    data.iter().map(|b| b.count_ones() as u64).sum()
}

/// Iterator over set values of a block window, in ascending order.
///
/// Blocks are visited from `start` to `end` (the data from its last byte to
/// its first) and bits within a block from 0 to 7.
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    /// Bytes not yet visited; consumed from the back.
    data: &'a [u8],
    /// Block of the next byte taken from `data`.
    next_block: u32,
    /// Block whose bits are in `bits`.
    block: u32,
    bits: BlockBits,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(data: &'a [u8], start: u32) -> Self {
        Self {
            data,
            next_block: start,
            block: start,
            bits: Block::default().iter(),
        }
    }

    /// An iterator that yields nothing.
    pub(crate) fn empty() -> Self {
        Self::new(&[], 0)
    }
}

impl Iterator for Iter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            if let Some(bit) = self.bits.next() {
                return Some(value_at(self.block, bit));
            }

            let (&byte, rest) = self.data.split_last()?;
            self.data = rest;
            self.block = self.next_block;
            self.next_block += 1;
            self.bits = Block::new(byte).iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pending = self.bits.len();
        let remaining = count_bits(self.data) as usize;
        (pending + remaining, Some(pending + remaining))
    }
}

impl FusedIterator for Iter<'_> {}
