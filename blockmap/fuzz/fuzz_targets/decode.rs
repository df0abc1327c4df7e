#![no_main]

use blockmap::{BitmapIndex, IndexView, HEADER_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|bytes: &[u8]| {
    let owned = BitmapIndex::decode(bytes);
    let view = IndexView::parse(bytes);
    assert_eq!(owned.is_ok(), view.is_ok(), "owned and borrowed decode disagree");

    let (Ok(index), Ok(view)) = (owned, view) else {
        return;
    };

    assert_eq!(view.to_index(), index);
    let raw = index.raw().expect("decoded index has a window");
    assert_eq!(HEADER_LEN + raw.data().len() + index.ext().len(), bytes.len());

    let values: Vec<u32> = index.iter().collect();
    assert!(values.windows(2).all(|w| w[0] < w[1]), "values not ascending");
    assert_eq!(values.len() as u64, index.len());

    if let Ok(encoded) = index.to_bytes_with_ext() {
        assert_eq!(BitmapIndex::decode(&encoded).unwrap(), index);
    }
});
