//! Byte-window kernels behind the set algebra.
//!
//! Every kernel works on the blocks two windows share. Because data is laid
//! out highest block first, the shared blocks `[lo, hi]` are the contiguous
//! byte range `end - hi ..= end - lo` in each operand.

use crate::block::{window, window_mut};
use crate::raw::RawIndex;

/// The block range `[lo, hi]` covered by both windows, or `None`.
#[inline]
pub(crate) fn overlap(a: &RawIndex, b: &RawIndex) -> Option<(u32, u32)> {
    if a.end < b.start || b.end < a.start {
        return None;
    }

    Some((a.start.max(b.start), a.end.min(b.end)))
}

/// Byte-wise AND over the shared blocks.
///
/// The result spans exactly the shared range. Returns `None` when the
/// windows are disjoint or have no common bit.
pub(crate) fn intersect(a: &RawIndex, b: &RawIndex) -> Option<RawIndex> {
    let (lo, hi) = overlap(a, b)?;

    let wa = window(&a.data, a.end, lo, hi);
    let wb = window(&b.data, b.end, lo, hi);

    let mut any = false;
    let data: Vec<u8> = wa
        .iter()
        .zip(wb)
        .map(|(&x, &y)| {
            let z = x & y;
            any |= z != 0;
            z
        })
        .collect();

    if !any {
        return None;
    }

    Some(RawIndex {
        start: lo,
        end: hi,
        data,
    })
}

/// Union spanning `[min start, max end]`.
///
/// Each operand is OR-ed into a zeroed buffer at its own offset, so blocks
/// covered by one side are copied and shared blocks are combined.
pub(crate) fn union(a: &RawIndex, b: &RawIndex) -> RawIndex {
    let start = a.start.min(b.start);
    let end = a.end.max(b.end);
    let mut data = vec![0u8; (end - start) as usize + 1];

    for src in [a, b] {
        let dst = window_mut(&mut data, end, src.start, src.end);
        for (d, &s) in dst.iter_mut().zip(&src.data) {
            *d |= s;
        }
    }

    RawIndex { start, end, data }
}

/// Clear the bits of `b` from the shared blocks of `a`.
///
/// Blocks of `a` outside the shared range are left untouched. Returns
/// `false` when the windows do not overlap and `a` was not visited.
pub(crate) fn subtract(a: &mut RawIndex, b: &RawIndex) -> bool {
    let Some((lo, hi)) = overlap(a, b) else {
        return false;
    };

    let wa = window_mut(&mut a.data, a.end, lo, hi);
    let wb = window(&b.data, b.end, lo, hi);

    for (x, &y) in wa.iter_mut().zip(wb) {
        *x &= !y;
    }

    true
}
