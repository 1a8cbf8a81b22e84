//! Fixed-width big-endian codec for segment frames
//!
//! Frame layout, every integer unsigned big-endian:
//!
//! ```text
//! [key_len: 1][key: key_len bytes, UTF-8][list_len: 4][(doc_id: id_width)(score: 4)]*N
//! ```
//!
//! `list_len` is the byte length of the entry section, not the entry count, so
//! a reader can hop over a posting list it does not care about. Every value is
//! range-checked against its field width before it is written.

use crate::config::{FrameLayout, KEY_LEN_WIDTH, LIST_LEN_WIDTH, MAX_KEY_LEN, SCORE_WIDTH};
use crate::error::{InvFileError, Result};
use crate::models::{PostingEntry, PostingList, Score};

const U128_BYTES: usize = std::mem::size_of::<u128>();

fn fits(value: u128, width: usize) -> bool {
    width >= U128_BYTES || value >> (8 * width) == 0
}

/// Append `value` as exactly `width` big-endian bytes
pub fn write_number(out: &mut Vec<u8>, field: &'static str, value: u128, width: usize) -> Result<()> {
    if !fits(value, width) {
        return Err(InvFileError::Overflow {
            field,
            value,
            width,
        });
    }

    let bytes = value.to_be_bytes();
    if width > U128_BYTES {
        out.resize(out.len() + (width - U128_BYTES), 0);
        out.extend_from_slice(&bytes);
    } else {
        out.extend_from_slice(&bytes[U128_BYTES - width..]);
    }
    Ok(())
}

/// Encode `value` as exactly `width` big-endian bytes
pub fn encode_number(value: u128, width: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(width);
    write_number(&mut out, "number", value, width)?;
    Ok(out)
}

/// Decode an unsigned big-endian integer of any length
///
/// Leading zero bytes are ignored; anything that does not fit in 128 bits is
/// an overflow.
pub fn decode_number(bytes: &[u8]) -> Result<u128> {
    let mut value: u128 = 0;
    for &byte in bytes {
        if value >> (128 - 8) != 0 {
            return Err(InvFileError::Overflow {
                field: "number",
                value,
                width: bytes.len(),
            });
        }
        value = (value << 8) | byte as u128;
    }
    Ok(value)
}

/// Append the length-prefixed UTF-8 key
pub fn encode_key(out: &mut Vec<u8>, term: &str) -> Result<()> {
    let bytes = term.as_bytes();
    if bytes.len() > MAX_KEY_LEN {
        return Err(InvFileError::KeyTooLong { len: bytes.len() });
    }
    write_number(out, "key length", bytes.len() as u128, KEY_LEN_WIDTH)?;
    out.extend_from_slice(bytes);
    Ok(())
}

/// Decode stored key bytes
pub fn decode_key(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| InvFileError::InvalidKey(e.utf8_error()))
}

/// Byte length of the entry section for `count` postings
pub fn payload_len(count: usize, layout: &FrameLayout) -> u128 {
    count as u128 * layout.entry_size() as u128
}

/// Append `list_len` followed by every `(doc_id, score)` entry
pub fn encode_postings(out: &mut Vec<u8>, postings: &PostingList, layout: &FrameLayout) -> Result<()> {
    write_number(
        out,
        "posting list length",
        payload_len(postings.len(), layout),
        LIST_LEN_WIDTH,
    )?;
    for entry in postings {
        write_number(out, "document id", entry.doc_id.as_u128(), layout.id_width)?;
        write_number(out, "score", entry.score as u128, SCORE_WIDTH)?;
    }
    Ok(())
}

/// Append one complete frame
///
/// On error `out` may hold a partial frame; callers encode into a scratch
/// buffer and discard it.
pub fn encode_frame(
    out: &mut Vec<u8>,
    term: &str,
    postings: &PostingList,
    layout: &FrameLayout,
) -> Result<()> {
    encode_key(out, term)?;
    encode_postings(out, postings, layout)
}

/// Total encoded size of a frame
pub fn frame_len(term: &str, postings: &PostingList, layout: &FrameLayout) -> u128 {
    (KEY_LEN_WIDTH + term.len() + LIST_LEN_WIDTH) as u128 + payload_len(postings.len(), layout)
}

/// Decode a whole entry section into a posting list, preserving stored order
pub fn decode_postings(payload: &[u8], layout: &FrameLayout) -> Result<PostingList> {
    let entry_size = layout.entry_size();
    if payload.len() % entry_size != 0 {
        return Err(InvFileError::MalformedPayload {
            len: payload.len(),
            entry_size,
        });
    }

    payload
        .chunks_exact(entry_size)
        .map(|chunk| -> Result<PostingEntry> {
            let (id, score) = chunk.split_at(layout.id_width);
            Ok(PostingEntry::new(
                decode_number(id)?,
                decode_number(score)? as Score,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_ID_WIDTH;
    use proptest::prelude::*;

    fn layout(id_width: usize) -> FrameLayout {
        FrameLayout::new(id_width).unwrap()
    }

    #[test]
    fn test_encode_number_big_endian() {
        assert_eq!(encode_number(0x0102, 4).unwrap(), vec![0, 0, 1, 2]);
        assert_eq!(encode_number(255, 1).unwrap(), vec![255]);
        assert_eq!(encode_number(0, 0).unwrap(), Vec::<u8>::new());
        assert_eq!(encode_number(1, 18).unwrap().len(), 18);
    }

    #[test]
    fn test_encode_number_overflow_boundary() {
        assert!(encode_number(255, 1).is_ok());
        assert!(matches!(
            encode_number(256, 1),
            Err(InvFileError::Overflow { value: 256, width: 1, .. })
        ));
        assert!(encode_number(u32::MAX as u128, 4).is_ok());
        assert!(encode_number(u32::MAX as u128 + 1, 4).is_err());
        assert!(encode_number(u128::MAX, 16).is_ok());
        assert!(encode_number(1, 0).is_err());
    }

    #[test]
    fn test_decode_number() {
        assert_eq!(decode_number(&[]).unwrap(), 0);
        assert_eq!(decode_number(&[0, 0, 1, 2]).unwrap(), 0x0102);
        assert_eq!(decode_number(&[0; 20]).unwrap(), 0);

        let mut wide = vec![0u8; 4];
        wide.extend_from_slice(&u128::MAX.to_be_bytes());
        assert_eq!(decode_number(&wide).unwrap(), u128::MAX);

        let mut too_wide = vec![1u8];
        too_wide.extend_from_slice(&[0; 16]);
        assert!(decode_number(&too_wide).is_err());
    }

    #[test]
    fn test_frame_bytes_are_exact() {
        let postings = PostingList::from_entries(vec![
            PostingEntry::new(1u128, 5),
            PostingEntry::new(2u128, 5),
        ]);
        let mut out = Vec::new();
        encode_frame(&mut out, "black", &postings, &layout(6)).unwrap();

        let expected: Vec<u8> = [
            &[5u8][..],
            &b"black"[..],
            &[0u8, 0, 0, 20][..],
            &[0u8, 0, 0, 0, 0, 1][..],
            &[0u8, 0, 0, 5][..],
            &[0u8, 0, 0, 0, 0, 2][..],
            &[0u8, 0, 0, 5][..],
        ]
        .concat();
        assert_eq!(out, expected);
        assert_eq!(frame_len("black", &postings, &layout(6)), expected.len() as u128);
    }

    #[test]
    fn test_empty_posting_list_frame() {
        let mut out = Vec::new();
        encode_frame(&mut out, "", &PostingList::new(), &layout(16)).unwrap();
        assert_eq!(out, vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_key_too_long() {
        let mut out = Vec::new();
        let term = "x".repeat(256);
        assert!(matches!(
            encode_key(&mut out, &term),
            Err(InvFileError::KeyTooLong { len: 256 })
        ));
        assert!(encode_key(&mut out, &"x".repeat(255)).is_ok());

        // multi-byte characters count in bytes, not chars
        let wide = "é".repeat(128);
        assert!(encode_key(&mut Vec::new(), &wide).is_err());
    }

    #[test]
    fn test_invalid_key_bytes() {
        let err = decode_key(vec![0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, InvFileError::InvalidKey(_)));
        assert_eq!(decode_key(b"hound".to_vec()).unwrap(), "hound");
    }

    #[test]
    fn test_doc_id_wider_than_layout() {
        let postings = PostingList::from_entries(vec![PostingEntry::new(1u128 << 48, 1)]);
        let err = encode_postings(&mut Vec::new(), &postings, &layout(6)).unwrap_err();
        assert!(matches!(
            err,
            InvFileError::Overflow {
                field: "document id",
                width: 6,
                ..
            }
        ));
        assert!(encode_postings(&mut Vec::new(), &postings, &layout(7)).is_ok());
    }

    #[test]
    fn test_score_overflow() {
        let postings = PostingList::from_entries(vec![PostingEntry::new(1u128, 1 << 32)]);
        let err = encode_postings(&mut Vec::new(), &postings, &layout(16)).unwrap_err();
        assert!(matches!(err, InvFileError::Overflow { field: "score", .. }));
    }

    #[test]
    fn test_decode_postings() {
        let layout = layout(16);
        let postings = PostingList::from_entries(vec![
            PostingEntry::new(u128::MAX, 7),
            PostingEntry::new(3u128, u32::MAX as Score),
        ]);
        let mut out = Vec::new();
        encode_postings(&mut out, &postings, &layout).unwrap();

        let decoded = decode_postings(&out[LIST_LEN_WIDTH..], &layout).unwrap();
        assert_eq!(decoded, postings);
    }

    #[test]
    fn test_decode_postings_rejects_partial_entry() {
        let err = decode_postings(&[0u8; 21], &layout(16)).unwrap_err();
        assert!(matches!(
            err,
            InvFileError::MalformedPayload {
                len: 21,
                entry_size: 20
            }
        ));
    }

    fn max_for_width(width: usize) -> u128 {
        match width {
            MAX_ID_WIDTH => u128::MAX,
            w => (1u128 << (8 * w)) - 1,
        }
    }

    proptest! {
        #[test]
        fn number_in_range_decodes_back(width in 1..=MAX_ID_WIDTH, raw in any::<u128>()) {
            let value = raw & max_for_width(width);
            let bytes = encode_number(value, width).unwrap();

            prop_assert_eq!(bytes.len(), width);
            prop_assert_eq!(decode_number(&bytes).unwrap(), value);
        }

        #[test]
        fn number_out_of_range_overflows(width in 1..MAX_ID_WIDTH, raw in any::<u128>()) {
            let value = raw | (1u128 << (8 * width));
            let err = encode_number(value, width).unwrap_err();

            let overflowed = matches!(err, InvFileError::Overflow { value: v, width: w, .. } if v == value && w == width);
            prop_assert!(overflowed);
        }
    }
}
