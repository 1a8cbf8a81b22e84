use std::collections::HashSet;

use proptest::prelude::*;
use tempfile::TempDir;

use invfile::index::{TermFrequency, TermLength};
use invfile::segment::{read_frame_at, SegmentReader};
use invfile::{
    build_index, encode_index, load, load_into, save, scan_keys, Document, FrameLayout,
    InvFileError, InvertedIndex, TermDictionary,
};

fn create_doc(id: u128, words: &[&str]) -> Document {
    Document::with_id(id, words.iter().map(|w| w.to_string()).collect())
}

fn docs_from(words: &[Vec<String>]) -> Vec<Document> {
    words
        .iter()
        .enumerate()
        .map(|(i, text)| Document::with_id(i as u128, text.clone()))
        .collect()
}

fn fixture() -> Vec<Document> {
    vec![
        create_doc(1, &["black", "hound"]),
        create_doc(2, &["black", "bear"]),
    ]
}

#[test]
fn golden_segment_bytes() {
    let index = build_index(&fixture(), TermLength);
    let bytes = encode_index(&index, FrameLayout::new(1).unwrap()).unwrap();

    #[rustfmt::skip]
    let expected: Vec<u8> = [
        &[4u8][..], &b"bear"[..], &[0, 0, 0, 5][..], &[2, 0, 0, 0, 4][..],
        &[5u8][..], &b"black"[..], &[0, 0, 0, 10][..], &[1, 0, 0, 0, 5][..], &[2, 0, 0, 0, 5][..],
        &[5u8][..], &b"hound"[..], &[0, 0, 0, 5][..], &[1, 0, 0, 0, 5][..],
    ]
    .concat();
    assert_eq!(bytes, expected);
}

#[test]
fn load_after_save_with_every_id_width() {
    let tmp = TempDir::new().unwrap();
    let index = build_index(&fixture(), TermFrequency);

    for id_width in 1..=16 {
        let layout = FrameLayout::new(id_width).unwrap();
        let path = tmp.path().join(format!("w{}.if", id_width));
        save(&index, &path, layout).unwrap();
        assert_eq!(load(&path, None, layout).unwrap(), index, "id_width {}", id_width);
    }
}

#[test]
fn reading_with_wrong_layout_is_detected() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("seg.if");
    let index = build_index(&fixture(), TermLength);
    save(&index, &path, FrameLayout::new(4).unwrap()).unwrap();

    // 8-byte payloads do not split into 7-byte entries
    let err = load(&path, None, FrameLayout::new(3).unwrap()).unwrap_err();
    assert!(matches!(err, InvFileError::MalformedPayload { len: 8, entry_size: 7 }));
}

#[test]
fn generated_ids_need_full_width() {
    let tmp = TempDir::new().unwrap();
    let docs = vec![Document::new(vec!["x".to_string()])];
    let index = build_index(&docs, TermLength);

    let err = save(&index, tmp.path().join("narrow.if"), FrameLayout::new(8).unwrap()).unwrap_err();
    assert!(matches!(err, InvFileError::Overflow { field: "document id", .. }));

    let path = tmp.path().join("wide.if");
    save(&index, &path, FrameLayout::default()).unwrap();
    assert_eq!(load(&path, None, FrameLayout::default()).unwrap(), index);
}

#[test]
fn score_overflow_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let huge = |_: &str, _: &Document| -> u64 { u64::from(u32::MAX) + 1 };
    let index = build_index(&fixture(), huge);

    let err = save(&index, tmp.path().join("seg.if"), FrameLayout::default()).unwrap_err();
    assert!(matches!(err, InvFileError::Overflow { field: "score", .. }));
}

#[test]
fn term_dictionary_matches_load() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("seg.if");
    let index = build_index(&fixture(), TermLength);
    save(&index, &path, FrameLayout::default()).unwrap();

    let dict = TermDictionary::from_segment(&path, FrameLayout::default()).unwrap();
    assert_eq!(dict.len(), index.len());
    assert_eq!(dict.iter_terms(), scan_keys(&path, FrameLayout::default()).unwrap());

    for (term, postings) in &index {
        let frame = dict.fetch(&path, term, FrameLayout::default()).unwrap().unwrap();
        assert_eq!(&frame.postings, postings);
    }
    assert!(dict.fetch(&path, "cat", FrameLayout::default()).unwrap().is_none());
}

#[test]
fn every_cut_is_clean_end_or_truncation() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("seg.if");
    let index = build_index(&fixture(), TermLength);
    save(&index, &path, FrameLayout::default()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let boundaries: Vec<u64> = scan_keys(&path, FrameLayout::default())
        .unwrap()
        .into_iter()
        .map(|(_, offset)| offset)
        .collect();

    for cut in 0..bytes.len() {
        let cut_path = tmp.path().join("cut.if");
        std::fs::write(&cut_path, &bytes[..cut]).unwrap();

        match load(&cut_path, None, FrameLayout::default()) {
            Ok(loaded) => {
                assert!(boundaries.contains(&(cut as u64)), "cut at {} loaded", cut);
                let complete = boundaries.iter().filter(|&&b| b < cut as u64).count();
                assert_eq!(loaded.len(), complete);
            }
            Err(err) => {
                assert!(!boundaries.contains(&(cut as u64)), "cut at {} failed", cut);
                assert!(err.is_corruption(), "cut at {} gave {:?}", cut, err);
            }
        }
    }
}

#[test]
fn reader_streams_frames_in_order() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("seg.if");
    let index = build_index(&fixture(), TermLength);
    save(&index, &path, FrameLayout::default()).unwrap();

    let reader = SegmentReader::open(&path, FrameLayout::default()).unwrap();
    let terms: Vec<String> = reader.map(|frame| frame.unwrap().term).collect();
    assert_eq!(terms, vec!["bear", "black", "hound"]);
}

fn corpus_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec("[a-z]{1,8}", 0..12), 0..25)
}

proptest! {
    #[test]
    fn round_trip_preserves_index(words in corpus_strategy()) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seg.if");
        let index = build_index(&docs_from(&words), TermLength);

        save(&index, &path, FrameLayout::default()).unwrap();
        prop_assert_eq!(load(&path, None, FrameLayout::default()).unwrap(), index);
    }

    #[test]
    fn selective_load_is_subset(
        words in corpus_strategy(),
        wanted in prop::collection::hash_set("[a-z]{1,3}", 0..10),
    ) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seg.if");
        let index = build_index(&docs_from(&words), TermFrequency);
        save(&index, &path, FrameLayout::default()).unwrap();

        let loaded = load(&path, Some(&wanted), FrameLayout::default()).unwrap();
        let expected: HashSet<&str> = index.terms().filter(|t| wanted.contains(*t)).collect();
        prop_assert_eq!(loaded.terms().collect::<HashSet<_>>(), expected);
        for (term, postings) in &loaded {
            prop_assert_eq!(Some(postings), index.get(term));
        }
    }

    #[test]
    fn scanned_offsets_address_frames(words in corpus_strategy()) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seg.if");
        let index = build_index(&docs_from(&words), TermLength);
        save(&index, &path, FrameLayout::new(2).unwrap()).unwrap();

        let keys = scan_keys(&path, FrameLayout::new(2).unwrap()).unwrap();
        prop_assert_eq!(keys.len(), index.len());
        for (term, offset) in keys {
            let frame = read_frame_at(&path, offset, FrameLayout::new(2).unwrap()).unwrap();
            prop_assert_eq!(&frame.term, &term);
            prop_assert_eq!(Some(&frame.postings), index.get(&term));
        }
    }

    #[test]
    fn load_into_merges_by_overwrite(
        first in corpus_strategy(),
        second in corpus_strategy(),
    ) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seg.if");
        let base = build_index(&docs_from(&first), TermLength);
        let incoming = build_index(&docs_from(&second), TermFrequency);
        save(&incoming, &path, FrameLayout::default()).unwrap();

        let mut combined = base.clone();
        load_into(&mut combined, None, &path, FrameLayout::default()).unwrap();

        let mut expected: InvertedIndex = base.iter().map(|(t, p)| (t.clone(), p.clone())).collect();
        for (term, postings) in &incoming {
            expected.insert(term.clone(), postings.clone());
        }
        prop_assert_eq!(combined, expected);
    }
}
