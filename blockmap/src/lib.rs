//! Sparse sets of `u32` values packed into a contiguous run of 8-bit blocks.
//!
//! Value `v` lives in block `v / 8` at bit `v % 8`. An index stores one byte
//! for every block between its lowest and highest member, which keeps
//! intersection, union and difference to a single pass over the blocks two
//! operands share.
//!
//! ```
//! use blockmap::BitmapIndex;
//!
//! let a = BitmapIndex::from_values([3, 10, 18]);
//! let b = BitmapIndex::from_values([10, 20]);
//!
//! assert_eq!((&a & &b).values().unwrap(), vec![10]);
//! assert_eq!((&a | &b).values().unwrap(), vec![3, 10, 18, 20]);
//! assert_eq!((&a - &b).values().unwrap(), vec![3, 18]);
//!
//! let bytes = a.to_bytes().unwrap();
//! assert_eq!(BitmapIndex::decode(&bytes).unwrap(), a);
//! ```

mod bitmap;
mod block;
mod codec;
mod error;
mod ops;
mod raw;
#[cfg(feature = "roaring")]
mod roaring;

#[cfg(test)]
mod tests_raw;
#[cfg(all(test, feature = "roaring"))]
mod tests_roaring;

pub use bitmap::BitmapIndex;
pub use block::{bit_of, block_of, value_at, Block, BlockBits, BLOCK_BITS, MAX_BLOCK};
pub use codec::{read_be_uint, IndexView, HEADER_LEN};
pub use error::{Error, FormatError, Result};
pub use raw::{Iter, RawIndex};

/// Compute the encoded size of an index over `values` without building it.
///
/// Values may come in any order. Returns 0 for an empty input, which has no
/// encoding. The result equals `BitmapIndex::from_values(values).to_bytes()`
/// length.
pub fn encoded_len(values: impl IntoIterator<Item = u32>) -> usize {
    let mut bounds: Option<(u32, u32)> = None;

    for v in values {
        bounds = Some(match bounds {
            None => (v, v),
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
        });
    }

    match bounds {
        Some((lo, hi)) => HEADER_LEN + (block_of(hi) - block_of(lo)) as usize + 1,
        None => 0,
    }
}
