use crate::*;

fn make_raw(values: &[u32]) -> RawIndex {
    RawIndex::from_values(values.iter().copied()).unwrap()
}

#[test]
fn test_addressing() {
    assert_eq!(block_of(0), 0);
    assert_eq!(bit_of(0), 0);
    assert_eq!(block_of(7), 0);
    assert_eq!(bit_of(7), 7);
    assert_eq!(block_of(8), 1);
    assert_eq!(bit_of(8), 0);
    assert_eq!(block_of(18), 2);
    assert_eq!(bit_of(18), 2);
    assert_eq!(block_of(u32::MAX), MAX_BLOCK);
    assert_eq!(bit_of(u32::MAX), 7);

    for v in [0, 1, 7, 8, 63, 64, 1000, u32::MAX] {
        assert_eq!(value_at(block_of(v), bit_of(v)), v);
    }
}

#[test]
fn test_block_bits() {
    let b = Block::new(0b1010_0110);
    assert!(b.has_bit(1));
    assert!(b.has_bit(2));
    assert!(!b.has_bit(0));
    assert!(b.has_bit(7));
    assert_eq!(b.count(), 4);
    assert_eq!(b.min_bit(), Some(1));
    assert_eq!(b.max_bit(), Some(7));
    assert_eq!(b.iter().collect::<Vec<_>>(), vec![1, 2, 5, 7]);
    assert_eq!(b.iter().len(), 4);

    let empty = Block::default();
    assert!(empty.is_empty());
    assert_eq!(empty.min_bit(), None);
    assert_eq!(empty.max_bit(), None);
    assert_eq!(empty.iter().next(), None);

    assert_eq!(Block::new(0xFF).iter().collect::<Vec<_>>(), (0..8u8).collect::<Vec<_>>());
}

#[test]
fn test_build_empty() {
    assert!(RawIndex::from_values([]).is_none());
    assert!(RawIndex::from_sorted_iter([]).is_none());
}

#[test]
fn test_build_single_block() {
    let raw = make_raw(&[0]);
    assert_eq!((raw.start(), raw.end()), (0, 0));
    assert_eq!(raw.data(), &[0x01]);

    let raw = make_raw(&[7]);
    assert_eq!(raw.data(), &[0x80]);

    let raw = make_raw(&[0, 1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(raw.data(), &[0xFF]);
}

#[test]
fn test_build_highest_block_first() {
    // Block 2 (value 18) comes first, block 0 (value 3) last.
    let raw = make_raw(&[3, 10, 18]);
    assert_eq!((raw.start(), raw.end()), (0, 2));
    assert_eq!(raw.data(), &[0x04, 0x04, 0x08]);

    let raw = make_raw(&[10, 20]);
    assert_eq!((raw.start(), raw.end()), (1, 2));
    assert_eq!(raw.data(), &[0x10, 0x04]);
}

#[test]
fn test_build_offset_window() {
    let raw = make_raw(&[100]);
    assert_eq!((raw.start(), raw.end()), (12, 12));
    assert_eq!(raw.data(), &[0x10]);

    // Gap blocks are zero, the leading byte is not.
    let raw = make_raw(&[64, 95]);
    assert_eq!((raw.start(), raw.end()), (8, 11));
    assert_eq!(raw.data(), &[0x80, 0x00, 0x00, 0x01]);
}

#[test]
fn test_build_unordered_and_duplicates() {
    let a = make_raw(&[18, 3, 10, 3, 18]);
    let b = make_raw(&[3, 10, 18]);
    assert_eq!(a, b);

    let c = RawIndex::from_sorted_iter([3, 3, 10, 18, 18]).unwrap();
    assert_eq!(c, b);
}

#[test]
fn test_build_extremes() {
    let raw = make_raw(&[u32::MAX]);
    assert_eq!((raw.start(), raw.end()), (MAX_BLOCK, MAX_BLOCK));
    assert_eq!(raw.data(), &[0x80]);
    assert_eq!(raw.iter().collect::<Vec<_>>(), vec![u32::MAX]);

    let raw = make_raw(&[u32::MAX - 9, u32::MAX]);
    assert_eq!(raw.block_count(), 2);
    assert_eq!(raw.min(), Some(u32::MAX - 9));
    assert_eq!(raw.max(), Some(u32::MAX));
}

#[test]
#[should_panic(expected = "values must be sorted")]
fn test_sorted_iter_rejects_unsorted() {
    RawIndex::from_sorted_iter([10, 3]);
}

#[test]
fn test_from_parts() {
    let raw = RawIndex::from_parts(1, 2, vec![0x10, 0x04]).unwrap();
    assert_eq!(raw, make_raw(&[10, 20]));

    assert!(matches!(
        RawIndex::from_parts(2, 1, vec![0]),
        Err(Error::Format(FormatError::InvertedRange { start: 2, end: 1 }))
    ));
    assert!(matches!(
        RawIndex::from_parts(0, 2, vec![0, 1]),
        Err(Error::Format(FormatError::LengthMismatch {
            expected: 3,
            len: 2
        }))
    ));
    assert!(matches!(
        RawIndex::from_parts(MAX_BLOCK, MAX_BLOCK + 1, vec![0, 1]),
        Err(Error::Format(FormatError::BlockOutOfRange { .. }))
    ));

    let (start, end, data) = raw.into_parts();
    assert_eq!((start, end, data), (1, 2, vec![0x10, 0x04]));
}

#[test]
fn test_block_accessor() {
    let raw = make_raw(&[3, 10, 18]);
    assert_eq!(raw.block(0).bits(), 0x08);
    assert_eq!(raw.block(1).bits(), 0x04);
    assert_eq!(raw.block(2).bits(), 0x04);
    assert!(raw.block(3).is_empty());
    assert!(raw.block(u32::MAX).is_empty());

    let blocks: Vec<(u32, u8)> = raw.blocks().map(|(b, byte)| (b, byte.bits())).collect();
    assert_eq!(blocks, vec![(0, 0x08), (1, 0x04), (2, 0x04)]);

    let rev: Vec<u32> = raw.blocks().rev().map(|(b, _)| b).collect();
    assert_eq!(rev, vec![2, 1, 0]);
}

#[test]
fn test_contains() {
    let raw = make_raw(&[3, 10, 18]);
    for v in 0..64 {
        assert_eq!(raw.contains(v), [3, 10, 18].contains(&v), "value {v}");
    }
    assert!(!raw.contains(u32::MAX));
}

#[test]
fn test_len_min_max() {
    let raw = make_raw(&[3, 10, 18]);
    assert_eq!(raw.len(), 3);
    assert!(!raw.is_empty());
    assert_eq!(raw.min(), Some(3));
    assert_eq!(raw.max(), Some(18));
    assert_eq!(raw.value_range(), 0..=23);

    let zero = RawIndex::from_parts(4, 6, vec![0, 0, 0]).unwrap();
    assert_eq!(zero.len(), 0);
    assert!(zero.is_empty());
    assert_eq!(zero.min(), None);
    assert_eq!(zero.max(), None);
    assert_eq!(zero.iter().next(), None);
}

#[test]
fn test_iter_ascending() {
    let values = [0, 1, 7, 8, 9, 15, 16, 40, 63, 64, 100, 1023];
    let raw = make_raw(&values);
    assert_eq!(raw.iter().collect::<Vec<_>>(), values.to_vec());
    assert_eq!(raw.iter().size_hint(), (values.len(), Some(values.len())));
    assert_eq!((&raw).into_iter().count(), values.len());
}

#[test]
fn test_iter_skips_zero_blocks() {
    let raw = make_raw(&[5, 5000]);
    assert_eq!(raw.iter().collect::<Vec<_>>(), vec![5, 5000]);
    assert_eq!(raw.block_count(), 626);
}

#[test]
fn test_raw_overlap() {
    let a = make_raw(&[3, 10, 18]);
    let b = make_raw(&[10, 20]);
    let c = make_raw(&[100]);

    assert_eq!(a.overlap(&b), Some(1..=2));
    assert_eq!(b.overlap(&a), Some(1..=2));
    assert_eq!(a.overlap(&c), None);

    // Touching at a single block.
    let d = make_raw(&[16, 40]);
    assert_eq!(a.overlap(&d), Some(2..=2));
}

#[test]
fn test_raw_intersection() {
    let a = make_raw(&[3, 10, 18]);
    let b = make_raw(&[10, 20]);

    let c = a.intersection(&b).unwrap();
    assert_eq!((c.start(), c.end()), (1, 2));
    assert_eq!(c.data(), &[0x00, 0x04]);

    // Shared blocks but no shared bits.
    let d = make_raw(&[11, 21]);
    assert!(a.intersection(&d).is_none());

    // Disjoint ranges.
    assert!(a.intersection(&make_raw(&[1000])).is_none());
}

#[test]
fn test_raw_union() {
    let a = make_raw(&[1]);
    let b = make_raw(&[16]);

    let c = a.union(&b);
    assert_eq!((c.start(), c.end()), (0, 2));
    assert_eq!(c.data(), &[0x01, 0x00, 0x02]);

    let d = make_raw(&[3, 10, 18]).union(&make_raw(&[10, 20]));
    assert_eq!((d.start(), d.end()), (0, 2));
    assert_eq!(d.data(), &[0x14, 0x04, 0x08]);
}

#[test]
fn test_raw_subtract() {
    let mut a = make_raw(&[3, 10, 18, 19]);
    assert!(a.subtract(&make_raw(&[10, 19, 30])));
    assert_eq!((a.start(), a.end()), (0, 2));
    assert_eq!(a.data(), &[0x04, 0x00, 0x08]);

    // Blocks outside the shared range are untouched.
    let mut b = make_raw(&[0, 64]);
    assert!(b.subtract(&make_raw(&[24, 25])));
    assert_eq!(b, make_raw(&[0, 64]));

    // Disjoint windows are not visited.
    let mut c = make_raw(&[0, 1]);
    assert!(!c.subtract(&make_raw(&[500])));
    assert_eq!(c, make_raw(&[0, 1]));
}

#[test]
fn test_encoded_len() {
    assert_eq!(encoded_len([]), 0);
    assert_eq!(encoded_len([3]), 9);
    assert_eq!(encoded_len([18, 3, 10]), 11);
    assert_eq!(encoded_len([64, 95]), 12);

    let values = [5, 5000, 17];
    assert_eq!(
        encoded_len(values),
        BitmapIndex::from_values(values).to_bytes().unwrap().len()
    );
}
