/// Number of values covered by one block (one byte of bitmap data).
pub const BLOCK_BITS: u32 = 8;

/// The highest block index an index can address.
///
/// Headers store `block * 8` in 32 bits, so every block up to and including
/// this one has a representable bit position.
pub const MAX_BLOCK: u32 = u32::MAX / BLOCK_BITS;

/// The block that holds `value`.
#[inline]
pub fn block_of(value: u32) -> u32 {
    value / BLOCK_BITS
}

/// The bit offset (0..8) of `value` inside its block.
#[inline]
pub fn bit_of(value: u32) -> u8 {
    (value % BLOCK_BITS) as u8
}

/// The value represented by bit `bit` of block `block`.
#[inline]
pub fn value_at(block: u32, bit: u8) -> u32 {
    block * BLOCK_BITS + bit as u32
}

/// A single byte of bitmap data.
///
/// Bit `j` is set when value `block * 8 + j` is a member.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Block(u8);

impl Block {
    /// Wrap a raw data byte.
    #[inline]
    pub fn new(bits: u8) -> Self {
        Self(bits)
    }

    /// Test whether bit `bit` is set.
    #[inline]
    pub fn has_bit(self, bit: u8) -> bool {
        self.0 & (1u8 << bit) != 0
    }

    /// The number of set bits.
    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns `true` if no bit is set.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The lowest set bit, or `None` for an empty block.
    #[inline]
    pub fn min_bit(self) -> Option<u8> {
        (self.0 != 0).then(|| self.0.trailing_zeros() as u8)
    }

    /// The highest set bit, or `None` for an empty block.
    #[inline]
    pub fn max_bit(self) -> Option<u8> {
        (self.0 != 0).then(|| 7 - self.0.leading_zeros() as u8)
    }

    /// The raw bits of this block.
    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Iterate over the set bit offsets in ascending order.
    #[inline]
    pub fn iter(self) -> BlockBits {
        BlockBits(self.0)
    }
}

impl From<u8> for Block {
    fn from(bits: u8) -> Self {
        Self(bits)
    }
}

/// Ascending iterator over the set bits of a [`Block`].
#[derive(Clone, Debug)]
pub struct BlockBits(u8);

impl Iterator for BlockBits {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        if self.0 == 0 {
            return None;
        }

        let bit = self.0.trailing_zeros() as u8;
        // Clear the lowest set bit.
        self.0 &= self.0 - 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BlockBits {}

/// Byte position of `block` within a window whose highest block is `end`.
///
/// Data is stored from the highest block down, so block `end` sits at
/// position 0 and block `start` at the last position.
#[inline]
pub(crate) fn position(end: u32, block: u32) -> usize {
    (end - block) as usize
}

/// The slice of `data` (a window `[start, end]`) covering blocks `[lo, hi]`.
///
/// `[lo, hi]` must lie within `[start, end]`.
#[inline]
pub(crate) fn window(data: &[u8], end: u32, lo: u32, hi: u32) -> &[u8] {
    &data[position(end, hi)..=position(end, lo)]
}

#[inline]
pub(crate) fn window_mut(data: &mut [u8], end: u32, lo: u32, hi: u32) -> &mut [u8] {
    &mut data[position(end, hi)..=position(end, lo)]
}
