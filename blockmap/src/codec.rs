//! Flat byte encoding of an index.
//!
//! ```text
//! offset  0..4     start * 8, big-endian u32
//! offset  4..8     end * 8,   big-endian u32
//! offset  8..8+dl  data, dl = end - start + 1 bytes, highest block first
//! offset  8+dl..   ext, opaque
//! ```
//!
//! [`BitmapIndex::to_bytes`] writes the header and data only, so `ext` does
//! not survive a `to_bytes` / `decode` round trip. Use
//! [`BitmapIndex::to_bytes_with_ext`] to append it.

use std::io;

use tracing::debug;

use crate::bitmap::BitmapIndex;
use crate::block::{block_of, bit_of, value_at, Block, BLOCK_BITS};
use crate::error::{Error, FormatError, Result};
use crate::raw::{block_in, count_bits, Iter, RawIndex};

/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 8;

/// Read a big-endian unsigned integer of up to 8 bytes.
///
/// An empty slice reads as 0. Bytes beyond the last 8 are discarded.
pub fn read_be_uint(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// Parse the header of `bytes`, returning `(start, end)` blocks and the
/// offset where `ext` begins.
fn parse_header(bytes: &[u8]) -> Result<(u32, u32, usize)> {
    let len = bytes.len();
    if len <= HEADER_LEN {
        debug!(len, "index buffer too short");
        return Err(FormatError::TooShort { len }.into());
    }

    // Bit positions, not block numbers.
    let start = block_of(read_be_uint(&bytes[0..4]) as u32);
    let end = block_of(read_be_uint(&bytes[4..8]) as u32);

    if end < start {
        debug!(start, end, "index header has an inverted range");
        return Err(FormatError::InvertedRange { start, end }.into());
    }

    let needed = HEADER_LEN + (end - start) as usize + 1;
    if needed > len {
        debug!(start, end, needed, len, "index buffer truncated");
        return Err(FormatError::Truncated { needed, len }.into());
    }

    Ok((start, end, needed))
}

fn write_header(out: &mut Vec<u8>, raw: &RawIndex) {
    out.extend_from_slice(&(raw.start * BLOCK_BITS).to_be_bytes());
    out.extend_from_slice(&(raw.end * BLOCK_BITS).to_be_bytes());
}

impl BitmapIndex {
    /// Parse an index from `bytes`, copying data and `ext`.
    ///
    /// Fails with [`Error::Format`] if the buffer is 8 bytes or shorter, the
    /// header range is inverted, or the header implies more data than the
    /// buffer holds. Bytes past the data become `ext`.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        IndexView::parse(bytes).map(|view| view.to_index())
    }

    /// Encode header and data.
    ///
    /// `ext` is not written. Fails with [`Error::EmptyData`] if the index has
    /// no members.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let raw = self.encodable()?;

        let mut out = Vec::with_capacity(HEADER_LEN + raw.data.len());
        write_header(&mut out, raw);
        out.extend_from_slice(&raw.data);
        Ok(out)
    }

    /// Encode header, data and `ext`, so that [`decode`](Self::decode)
    /// restores the index exactly.
    pub fn to_bytes_with_ext(&self) -> Result<Vec<u8>> {
        let raw = self.encodable()?;

        let mut out = Vec::with_capacity(HEADER_LEN + raw.data.len() + self.ext().len());
        write_header(&mut out, raw);
        out.extend_from_slice(&raw.data);
        out.extend_from_slice(self.ext());
        Ok(out)
    }

    /// Stream the [`to_bytes`](Self::to_bytes) encoding into `writer`.
    pub fn write_to<W: io::Write>(&self, mut writer: W) -> Result<()> {
        let raw = self.encodable()?;

        writer.write_all(&(raw.start * BLOCK_BITS).to_be_bytes())?;
        writer.write_all(&(raw.end * BLOCK_BITS).to_be_bytes())?;
        writer.write_all(&raw.data)?;
        Ok(())
    }

    /// The length of the [`to_bytes`](Self::to_bytes) encoding, or 0 for an
    /// index that cannot be encoded.
    pub fn encoded_len(&self) -> usize {
        self.encodable()
            .map_or(0, |raw| HEADER_LEN + raw.data.len())
    }

    fn encodable(&self) -> Result<&RawIndex> {
        match self.raw() {
            Some(raw) if !raw.is_empty() => Ok(raw),
            _ => Err(Error::EmptyData),
        }
    }
}

/// A decoded index borrowing its data and `ext` from the source buffer.
///
/// The view cannot outlive the buffer, and the buffer cannot change while
/// the view exists. Convert with [`to_index`](IndexView::to_index) to keep
/// the index beyond the buffer's lifetime.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IndexView<'a> {
    start: u32,
    end: u32,
    data: &'a [u8],
    ext: &'a [u8],
}

impl<'a> IndexView<'a> {
    /// Parse `bytes` without copying.
    ///
    /// Fails under the same conditions as [`BitmapIndex::decode`].
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        let (start, end, data_end) = parse_header(bytes)?;

        Ok(Self {
            start,
            end,
            data: &bytes[HEADER_LEN..data_end],
            ext: &bytes[data_end..],
        })
    }

    /// The lowest block.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// The highest block.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// The packed bytes, highest block first.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The bytes following the data.
    pub fn ext(&self) -> &'a [u8] {
        self.ext
    }

    /// The byte for block `block`; blocks outside the window are empty.
    pub fn block(&self, block: u32) -> Block {
        block_in(self.data, self.start, self.end, block)
    }

    /// Test whether `value` is in the view.
    pub fn contains(&self, value: u32) -> bool {
        self.block(block_of(value)).has_bit(bit_of(value))
    }

    /// Count the number of set bits.
    pub fn len(&self) -> u64 {
        count_bits(self.data)
    }

    /// Returns `true` if no bits are set.
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// The range of values the view can represent.
    pub fn value_range(&self) -> std::ops::RangeInclusive<u32> {
        value_at(self.start, 0)..=value_at(self.end, 7)
    }

    /// Iterate over set values in ascending order.
    pub fn iter(&self) -> Iter<'a> {
        Iter::new(self.data, self.start)
    }

    /// All set values in ascending order.
    ///
    /// Fails with [`Error::NotFound`] if no bit is set.
    pub fn values(&self) -> Result<Vec<u32>> {
        if self.is_empty() {
            return Err(Error::NotFound);
        }

        Ok(self.iter().collect())
    }

    /// Copy into an owned index, `ext` included.
    pub fn to_index(&self) -> BitmapIndex {
        let raw = RawIndex {
            start: self.start,
            end: self.end,
            data: self.data.to_vec(),
        };

        BitmapIndex::from(raw).with_ext(self.ext)
    }
}

impl<'a> IntoIterator for &IndexView<'a> {
    type Item = u32;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl<'a> TryFrom<&'a [u8]> for IndexView<'a> {
    type Error = Error;

    fn try_from(bytes: &'a [u8]) -> Result<Self> {
        Self::parse(bytes)
    }
}
