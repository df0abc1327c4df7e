#![no_main]

use blockmap::{BitmapIndex, IndexView};
use libfuzzer_sys::arbitrary::{self, Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use roaring::RoaringBitmap;
use std::mem;

// Window widths in values: a single block up to a few thousand blocks.
const SPANS: [u32; 8] = [1, 8, 9, 64, 65, 512, 4_096, 32_768];

// Where the window sits, including the lowest and the highest block.
const BASES: [u32; 4] = [0, 1_000, 1 << 24, u32::MAX - 32_767];

#[derive(Debug, Copy, Clone)]
struct Num(u32);

impl<'a> Arbitrary<'a> for Num {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self(u.arbitrary()?))
    }
}

#[derive(Arbitrary, Debug)]
enum Operation {
    Insert(Num),
    Remove(Num),
    Clear,
    Contains(Num),
    CheckLen,
    CheckMinMax,
    CheckIter,
    And,
    Or,
    Sub,
    SubInPlace,
    AndFirst,
    UnionAll,
    SwapSides,
    SerializeRoundtrip,
    ViewRoundtrip,
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    span_idx: u8,
    base_idx: u8,
    initial_lhs: Vec<Num>,
    initial_rhs: Vec<Num>,
    ops: Vec<Operation>,
}

/// Assert that an index and a RoaringBitmap contain the same elements.
fn check_equal(index: &BitmapIndex, r: &RoaringBitmap) {
    assert_eq!(index.len(), r.len(), "len mismatch: blockmap={} roaring={}", index.len(), r.len());
    assert_eq!(index.min(), r.min(), "min mismatch");
    assert_eq!(index.max(), r.max(), "max mismatch");
    assert_eq!(index.is_empty(), r.is_empty(), "is_empty mismatch");

    // Set algebra and the builder never leave a window without members.
    assert_eq!(index.raw().is_none(), r.is_empty(), "empty result is not the sentinel");

    let index_vals: Vec<u32> = index.iter().collect();
    let r_vals: Vec<u32> = r.iter().collect();
    assert_eq!(index_vals, r_vals, "iter mismatch");
}

fn make_pair(nums: &[Num], base: u32, span: u32) -> (BitmapIndex, RoaringBitmap) {
    let vals: Vec<u32> = nums.iter().map(|n| base + n.0 % span).collect();
    (BitmapIndex::from_values(vals.iter().copied()), vals.into_iter().collect())
}

fuzz_target!(|input: FuzzInput| {
    let span = SPANS[input.span_idx as usize % SPANS.len()];
    let base = BASES[input.base_idx as usize % BASES.len()];
    let value = |n: u32| base + n % span;

    let (mut lhs, mut lhs_r) = make_pair(&input.initial_lhs, base, span);
    let (mut rhs, mut rhs_r) = make_pair(&input.initial_rhs, base, span);

    check_equal(&lhs, &lhs_r);
    check_equal(&rhs, &rhs_r);

    for op in &input.ops {
        match *op {
            Operation::Insert(Num(n)) => {
                let v = value(n);
                lhs |= &BitmapIndex::from_values([v]);
                lhs_r.insert(v);
            }
            Operation::Remove(Num(n)) => {
                let v = value(n);
                lhs -= &BitmapIndex::from_values([v]);
                lhs_r.remove(v);
            }
            Operation::Clear => {
                lhs = BitmapIndex::empty();
                lhs_r.clear();
            }
            Operation::Contains(Num(n)) => {
                let v = value(n);
                assert_eq!(lhs.contains(v), lhs_r.contains(v), "contains({}) mismatch", v);
            }
            Operation::CheckLen => {
                assert_eq!(lhs.len(), lhs_r.len(), "len mismatch");
            }
            Operation::CheckMinMax => {
                assert_eq!(lhs.min(), lhs_r.min(), "min mismatch");
                assert_eq!(lhs.max(), lhs_r.max(), "max mismatch");
            }
            Operation::CheckIter => {
                let vals: Vec<u32> = lhs.iter().collect();
                let r_vals: Vec<u32> = lhs_r.iter().collect();
                assert_eq!(vals, r_vals, "iter mismatch");
            }
            Operation::And => {
                lhs = lhs.and(&rhs);
                lhs_r &= &rhs_r;
            }
            Operation::Or => {
                lhs = lhs.or(&rhs);
                lhs_r |= &rhs_r;
            }
            Operation::Sub => {
                lhs = lhs.difference(&rhs);
                lhs_r -= &rhs_r;
            }
            Operation::SubInPlace => {
                lhs.difference_in_place(&rhs);
                lhs_r -= &rhs_r;
            }
            Operation::AndFirst => {
                let expected = &lhs_r & &rhs_r;
                let got = lhs.and_first([&BitmapIndex::empty(), &rhs]);
                assert_eq!(got.to_roaring(), expected, "and_first mismatch");
            }
            Operation::UnionAll => {
                let got = BitmapIndex::union_all([&lhs, &BitmapIndex::empty(), &rhs]);
                assert_eq!(got.to_roaring(), &lhs_r | &rhs_r, "union_all mismatch");
            }
            Operation::SwapSides => {
                mem::swap(&mut lhs, &mut rhs);
                mem::swap(&mut lhs_r, &mut rhs_r);
            }
            Operation::SerializeRoundtrip => match lhs.to_bytes() {
                Ok(buf) => {
                    assert_eq!(buf.len(), lhs.encoded_len(), "encoded_len mismatch");
                    let restored = BitmapIndex::decode(&buf).unwrap();
                    assert_eq!(restored, lhs, "serialize roundtrip mismatch");
                }
                Err(_) => assert!(lhs_r.is_empty(), "encode failed on a non-empty index"),
            },
            Operation::ViewRoundtrip => {
                if let Ok(buf) = lhs.to_bytes() {
                    let view = IndexView::parse(&buf).unwrap();
                    assert!(view.iter().eq(lhs_r.iter()), "view iter mismatch");
                }
            }
        }
    }

    check_equal(&lhs, &lhs_r);
    check_equal(&rhs, &rhs_r);
    assert!(BitmapIndex::from_roaring(&lhs_r).iter().eq(lhs.iter()), "from_roaring mismatch");
});
