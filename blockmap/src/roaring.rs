use crate::bitmap::BitmapIndex;
use roaring::RoaringBitmap;

impl BitmapIndex {
    /// Build from a `RoaringBitmap`.
    pub fn from_roaring(rb: &RoaringBitmap) -> Self {
        Self::from_sorted_iter(rb.iter())
    }

    /// Convert this index to a `RoaringBitmap`.
    pub fn to_roaring(&self) -> RoaringBitmap {
        self.iter().collect()
    }
}
