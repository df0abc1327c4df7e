use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Sub, SubAssign};

use tracing::trace;

use crate::error::{Error, Result};
use crate::raw::{Iter, RawIndex};

/// A set of `u32` values packed into a contiguous run of 8-bit blocks.
///
/// An index is either *empty*, the distinguished value returned by
/// [`BitmapIndex::empty`] when there is nothing to represent, or wraps a
/// [`RawIndex`] window. Set operations never fail: a result without members
/// is the empty index.
///
/// `ext` is an opaque payload carried alongside the bits. It is filled by
/// decoding and ignored by the set algebra.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "allocative", derive(allocative::Allocative))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitmapIndex {
    raw: Option<RawIndex>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    ext: Vec<u8>,
}

impl BitmapIndex {
    /// The empty index.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from values in any order.
    ///
    /// An empty input yields the empty index. Duplicates are tolerated.
    pub fn from_values(values: impl IntoIterator<Item = u32>) -> Self {
        Self::from(RawIndex::from_values(values))
    }

    /// Build from an ascending iterator of values, without sorting.
    ///
    /// Panics if a value is smaller than its predecessor.
    pub fn from_sorted_iter(iter: impl IntoIterator<Item = u32>) -> Self {
        Self::from(RawIndex::from_sorted_iter(iter))
    }

    /// Attach an opaque trailing payload.
    pub fn with_ext(mut self, ext: impl Into<Vec<u8>>) -> Self {
        self.ext = ext.into();
        self
    }

    /// The opaque trailing payload.
    pub fn ext(&self) -> &[u8] {
        &self.ext
    }

    /// Replace the opaque trailing payload.
    pub fn set_ext(&mut self, ext: impl Into<Vec<u8>>) {
        self.ext = ext.into();
    }

    /// Remove and return the opaque trailing payload.
    pub fn take_ext(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.ext)
    }

    /// The underlying block window, or `None` for the empty index.
    pub fn raw(&self) -> Option<&RawIndex> {
        self.raw.as_ref()
    }

    /// Consume the index, returning its block window.
    pub fn into_raw(self) -> Option<RawIndex> {
        self.raw
    }

    /// The lowest block, or `None` for the empty index.
    pub fn start(&self) -> Option<u32> {
        self.raw.as_ref().map(RawIndex::start)
    }

    /// The highest block, or `None` for the empty index.
    pub fn end(&self) -> Option<u32> {
        self.raw.as_ref().map(RawIndex::end)
    }

    /// Test whether `value` is in the index.
    pub fn contains(&self, value: u32) -> bool {
        self.raw.as_ref().is_some_and(|raw| raw.contains(value))
    }

    /// Count the number of members.
    pub fn len(&self) -> u64 {
        self.raw.as_ref().map_or(0, RawIndex::len)
    }

    /// Returns `true` if the index has no members.
    ///
    /// This holds for the empty index and for a decoded window without any
    /// set bit.
    pub fn is_empty(&self) -> bool {
        self.raw.as_ref().is_none_or(RawIndex::is_empty)
    }

    /// The smallest member.
    pub fn min(&self) -> Option<u32> {
        self.raw.as_ref().and_then(RawIndex::min)
    }

    /// The largest member.
    pub fn max(&self) -> Option<u32> {
        self.raw.as_ref().and_then(RawIndex::max)
    }

    /// Iterate over members in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        self.raw.as_ref().map_or_else(Iter::empty, RawIndex::iter)
    }

    /// All members in ascending order.
    ///
    /// Fails with [`Error::NotFound`] if the index has no members.
    pub fn values(&self) -> Result<Vec<u32>> {
        if self.is_empty() {
            return Err(Error::NotFound);
        }

        Ok(self.iter().collect())
    }

    /// The number of heap-allocated bytes used by this index.
    pub fn heap_bytes(&self) -> usize {
        self.raw.as_ref().map_or(0, RawIndex::heap_bytes) + self.ext.capacity()
    }

    /// Intersection.
    ///
    /// The result covers only the blocks both operands share, and is the
    /// empty index when either operand is empty or no bit is common.
    pub fn and(&self, other: &BitmapIndex) -> BitmapIndex {
        let (Some(a), Some(b)) = (&self.raw, &other.raw) else {
            trace!("and: empty operand");
            return Self::empty();
        };

        Self::from(a.intersection(b))
    }

    /// The first non-empty intersection with a candidate, scanning in order.
    ///
    /// Returns the empty index if no candidate intersects.
    pub fn and_first<'a>(
        &self,
        candidates: impl IntoIterator<Item = &'a BitmapIndex>,
    ) -> BitmapIndex {
        if self.raw.is_none() {
            return Self::empty();
        }

        candidates
            .into_iter()
            .map(|candidate| self.and(candidate))
            .find(|result| !result.is_empty())
            .unwrap_or_default()
    }

    /// Difference, `self` minus `other`, as a new index.
    ///
    /// Bits of `other` are cleared from the blocks both operands share; all
    /// other blocks of `self` are kept. When either operand is empty or the
    /// ranges do not meet, the result equals `self`. When the last member is
    /// cleared the result is [`BitmapIndex::empty`], with no `ext`;
    /// otherwise `ext` is taken from `self`.
    pub fn difference(&self, other: &BitmapIndex) -> BitmapIndex {
        let mut result = self.clone();
        result.difference_in_place(other);
        result
    }

    /// Difference, `self` minus `other`, mutating `self`.
    ///
    /// Same result as [`difference`](Self::difference) without allocating.
    pub fn difference_in_place(&mut self, other: &BitmapIndex) {
        let (Some(a), Some(b)) = (&mut self.raw, &other.raw) else {
            trace!("difference: empty operand");
            return;
        };

        // Without overlap `self` is returned as is, even a window without bits.
        if a.subtract(b) && a.is_empty() {
            *self = Self::empty();
        }
    }

    /// Union.
    ///
    /// The empty index is the identity: if either operand is empty the other
    /// is returned unchanged. Otherwise the result spans both ranges.
    pub fn or(&self, other: &BitmapIndex) -> BitmapIndex {
        match (&self.raw, &other.raw) {
            (None, _) => other.clone(),
            (_, None) => self.clone(),
            (Some(a), Some(b)) => Self::from(a.union(b)),
        }
    }

    /// Union of every index in `indexes`, folded from the empty index.
    pub fn union_all<'a>(indexes: impl IntoIterator<Item = &'a BitmapIndex>) -> BitmapIndex {
        indexes
            .into_iter()
            .fold(Self::empty(), |acc, index| acc.or(index))
    }
}

impl From<RawIndex> for BitmapIndex {
    fn from(raw: RawIndex) -> Self {
        Self {
            raw: Some(raw),
            ext: Vec::new(),
        }
    }
}

impl From<Option<RawIndex>> for BitmapIndex {
    fn from(raw: Option<RawIndex>) -> Self {
        Self {
            raw,
            ext: Vec::new(),
        }
    }
}

impl FromIterator<u32> for BitmapIndex {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}

impl<'a> IntoIterator for &'a BitmapIndex {
    type Item = u32;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl BitAnd for &BitmapIndex {
    type Output = BitmapIndex;

    fn bitand(self, rhs: Self) -> BitmapIndex {
        self.and(rhs)
    }
}

impl BitOr for &BitmapIndex {
    type Output = BitmapIndex;

    fn bitor(self, rhs: Self) -> BitmapIndex {
        self.or(rhs)
    }
}

impl Sub for &BitmapIndex {
    type Output = BitmapIndex;

    fn sub(self, rhs: Self) -> BitmapIndex {
        self.difference(rhs)
    }
}

impl BitAndAssign<&BitmapIndex> for BitmapIndex {
    fn bitand_assign(&mut self, rhs: &BitmapIndex) {
        *self = self.and(rhs);
    }
}

impl BitOrAssign<&BitmapIndex> for BitmapIndex {
    fn bitor_assign(&mut self, rhs: &BitmapIndex) {
        *self = self.or(rhs);
    }
}

impl SubAssign<&BitmapIndex> for BitmapIndex {
    fn sub_assign(&mut self, rhs: &BitmapIndex) {
        self.difference_in_place(rhs);
    }
}
