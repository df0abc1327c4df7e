use crate::*;
use ::roaring::RoaringBitmap;
use proptest::prelude::*;

/// Strategy: sorted-deduped values within a window that keeps the dense
/// byte layout small.
fn arb_values() -> impl Strategy<Value = Vec<u32>> {
    (0u32..1 << 20).prop_flat_map(|base| {
        proptest::collection::vec(base..base + 4096, 0..256).prop_map(|mut vals| {
            vals.sort_unstable();
            vals.dedup();
            vals
        })
    })
}

/// Build both an index and a RoaringBitmap from the same values.
fn make_pair(vals: &[u32]) -> (BitmapIndex, RoaringBitmap) {
    let index = BitmapIndex::from_sorted_iter(vals.iter().copied());
    let roaring = RoaringBitmap::from_sorted_iter(vals.iter().copied()).unwrap();
    (index, roaring)
}

#[test]
fn test_roaring_conversions() {
    let rb: RoaringBitmap = [3, 10, 18].into_iter().collect();
    let index = BitmapIndex::from_roaring(&rb);
    assert_eq!(index, BitmapIndex::from_values([3, 10, 18]));
    assert_eq!(index.to_roaring(), rb);

    assert!(BitmapIndex::from_roaring(&RoaringBitmap::new()).raw().is_none());
    assert!(BitmapIndex::empty().to_roaring().is_empty());
}

proptest! {
    #[test]
    fn iter_matches_roaring(vals in arb_values()) {
        let (index, roaring) = make_pair(&vals);
        let index_vals: Vec<u32> = index.iter().collect();
        let roaring_vals: Vec<u32> = roaring.iter().collect();
        prop_assert_eq!(index_vals, roaring_vals);
        prop_assert_eq!(index.len(), roaring.len());
        prop_assert_eq!(index.min(), roaring.min());
        prop_assert_eq!(index.max(), roaring.max());
    }

    #[test]
    fn and_matches_roaring(a in arb_values(), b in arb_values()) {
        let (ia, ra) = make_pair(&a);
        let (ib, rb) = make_pair(&b);
        prop_assert_eq!((&ia & &ib).to_roaring(), &ra & &rb);
    }

    #[test]
    fn or_matches_roaring(a in arb_values(), b in arb_values()) {
        let (ia, ra) = make_pair(&a);
        let (ib, rb) = make_pair(&b);
        prop_assert_eq!((&ia | &ib).to_roaring(), &ra | &rb);
    }

    #[test]
    fn sub_matches_roaring(a in arb_values(), b in arb_values()) {
        let (ia, ra) = make_pair(&a);
        let (ib, rb) = make_pair(&b);
        prop_assert_eq!((&ia - &ib).to_roaring(), &ra - &rb);
    }

    #[test]
    fn roaring_round_trip(vals in arb_values()) {
        let (index, roaring) = make_pair(&vals);
        prop_assert_eq!(BitmapIndex::from_roaring(&roaring), index.clone());
        prop_assert_eq!(index.to_roaring(), roaring);
    }
}
