//! Solidity contract ABI encoding.
//!
//! Implements the standard head/tail layout: every argument occupies one
//! 32-byte word in the head; dynamic arguments (`string`, `bytes`, arrays)
//! store an offset into the tail region instead of their value, and their
//! actual content is appended, in order, after the head.

use crate::bignumber::BigNumber;
use crate::encodable::{BoolHandle, EncodableItem};
use crate::error::EthError;

const WORD_SIZE: usize = 32;

/// Encodes a complete function call: 4-byte selector followed by the
/// head/tail encoding of `items`.
pub fn encode_function_call(selector: [u8; 4], items: &[EncodableItem]) -> Result<Vec<u8>, EthError> {
    let mut data = Vec::with_capacity(4 + items.len() * WORD_SIZE);
    data.extend_from_slice(&selector);
    data.extend(encode_items(items)?);
    Ok(data)
}

/// Encodes a sequence of items using the head/tail layout, with no leading
/// selector.
pub fn encode_items(items: &[EncodableItem]) -> Result<Vec<u8>, EthError> {
    let head_size = items.len() * WORD_SIZE;

    let mut heads = Vec::with_capacity(items.len());
    let mut tails = Vec::new();
    let mut tail_cursor = 0usize;

    for item in items {
        if item.is_dynamic() {
            let tail = encode_dynamic_payload(item)?;
            heads.push(encode_uint256(&BigNumber::from_u64((head_size + tail_cursor) as u64)));
            tail_cursor += tail.len();
            tails.push(tail);
        } else {
            heads.push(encode_static(item)?);
        }
    }

    let mut out = Vec::with_capacity(head_size + tail_cursor);
    for head in heads {
        out.extend_from_slice(&head);
    }
    for tail in tails {
        out.extend(tail);
    }
    Ok(out)
}

/// Encodes a single top-level item (no surrounding head/tail table): for a
/// static item this is just its 32-byte word; for a dynamic item this is
/// its standalone tail encoding (length word plus padded content).
pub fn encode_item(item: &EncodableItem) -> Result<Vec<u8>, EthError> {
    if item.is_dynamic() {
        encode_dynamic_payload(item)
    } else {
        encode_static(item).map(|w| w.to_vec())
    }
}

fn encode_static(item: &EncodableItem) -> Result<[u8; 32], EthError> {
    match item {
        EncodableItem::UInt(value) => Ok(encode_uint256(value)),
        EncodableItem::Bool(value, handle) => {
            let numeric = match handle {
                BoolHandle::Bool | BoolHandle::Uint8 => {
                    if *value {
                        1
                    } else {
                        0
                    }
                }
            };
            Ok(encode_uint256(&BigNumber::from_u32(numeric)))
        }
        EncodableItem::Address(addr) => {
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(addr);
            Ok(word)
        }
        EncodableItem::FixedBytes(bytes) => {
            if bytes.len() > WORD_SIZE {
                return Err(EthError::EncodingError(format!(
                    "fixed-size byte value of {} bytes does not fit in one word",
                    bytes.len()
                )));
            }
            let mut word = [0u8; 32];
            word[..bytes.len()].copy_from_slice(bytes);
            Ok(word)
        }
        EncodableItem::String(_) | EncodableItem::Bytes(_) | EncodableItem::Array(_) => {
            Err(EthError::EncodingError(
                "dynamic item cannot be encoded as a static word".into(),
            ))
        }
    }
}

fn encode_dynamic_payload(item: &EncodableItem) -> Result<Vec<u8>, EthError> {
    match item {
        EncodableItem::String(s) => Ok(encode_length_prefixed_bytes(s.as_bytes())),
        EncodableItem::Bytes(bytes) => Ok(encode_length_prefixed_bytes(bytes)),
        EncodableItem::Array(elements) => {
            let mut out = encode_uint256(&BigNumber::from_u64(elements.len() as u64)).to_vec();
            out.extend(encode_items(elements)?);
            Ok(out)
        }
        _ => Err(EthError::EncodingError(
            "static item has no dynamic payload".into(),
        )),
    }
}

fn encode_length_prefixed_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = encode_uint256(&BigNumber::from_u64(bytes.len() as u64)).to_vec();
    out.extend(pad_right_to_word(bytes));
    out
}

fn pad_right_to_word(bytes: &[u8]) -> Vec<u8> {
    let remainder = bytes.len() % WORD_SIZE;
    let padding = if remainder == 0 { 0 } else { WORD_SIZE - remainder };
    let mut out = bytes.to_vec();
    out.resize(bytes.len() + padding, 0);
    out
}

fn encode_uint256(value: &BigNumber) -> [u8; 32] {
    let mut word = [0u8; 32];
    let bytes = value.bytes();
    word[32 - bytes.len()..].copy_from_slice(bytes);
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last_byte: u8) -> EncodableItem {
        let mut bytes = [0u8; 20];
        bytes[19] = last_byte;
        EncodableItem::Address(bytes)
    }

    #[test]
    fn encode_address_item() {
        let word = encode_static(&addr(0xad)).unwrap();
        assert_eq!(&word[..12], &[0u8; 12]);
        assert_eq!(word[31], 0xad);
    }

    #[test]
    fn encode_uint_item() {
        let word = encode_static(&EncodableItem::UInt(BigNumber::from_u32(42))).unwrap();
        assert_eq!(word[31], 42);
        assert_eq!(&word[..31], &[0u8; 31]);
    }

    #[test]
    fn encode_bool_true_and_false() {
        let t = encode_static(&EncodableItem::bool_value(true)).unwrap();
        let f = encode_static(&EncodableItem::bool_value(false)).unwrap();
        assert_eq!(t[31], 1);
        assert_eq!(f[31], 0);
    }

    #[test]
    fn encode_function_call_with_selector_only() {
        let selector = [0xa9, 0x05, 0x9c, 0xbb];
        let data = encode_function_call(selector, &[]).unwrap();
        assert_eq!(data, selector.to_vec());
    }

    #[test]
    fn encode_function_call_static_only() {
        let selector = [0xa9, 0x05, 0x9c, 0xbb];
        let params = [addr(0x01), EncodableItem::UInt(BigNumber::from_u32(100))];
        let data = encode_function_call(selector, &params).unwrap();

        assert_eq!(data.len(), 4 + 64);
        assert_eq!(&data[..4], &selector);
        assert_eq!(data[4..16], [0u8; 12]);
        assert_eq!(data[35], 0x01);
        assert_eq!(data[67], 100);
    }

    #[test]
    fn encode_dynamic_string_has_length_prefix_and_padding() {
        let item = EncodableItem::String("dave".into());
        let payload = encode_dynamic_payload(&item).unwrap();

        // 32-byte length word + one 32-byte padded word for "dave".
        assert_eq!(payload.len(), 64);
        assert_eq!(payload[31], 4);
        assert_eq!(&payload[32..36], b"dave");
        assert_eq!(&payload[36..], &[0u8; 28]);
    }

    #[test]
    fn encode_dynamic_bytes_exact_word_multiple_has_no_extra_padding() {
        let bytes = vec![0x41u8; 32];
        let item = EncodableItem::Bytes(bytes.clone());
        let payload = encode_dynamic_payload(&item).unwrap();

        assert_eq!(payload.len(), 64);
        assert_eq!(&payload[32..], &bytes[..]);
    }

    #[test]
    fn encode_items_with_dynamic_tail_matches_known_layout() {
        // transfer-like call: (address, string) where string = "dave".
        let items = [addr(0x01), EncodableItem::String("dave".into())];
        let data = encode_items(&items).unwrap();

        // head: 2 words (64 bytes); tail: 2 words (length + "dave" padded).
        assert_eq!(data.len(), 128);

        // first head word: address.
        assert_eq!(data[31], 0x01);
        // second head word: offset to tail, which starts right after the head (64).
        assert_eq!(data[32..64], encode_uint256(&BigNumber::from_u32(64)));
        // tail: length word then data.
        assert_eq!(data[64 + 31], 4);
        assert_eq!(&data[96..100], b"dave");
    }

    #[test]
    fn encode_array_of_uints() {
        let array = EncodableItem::Array(vec![
            EncodableItem::UInt(BigNumber::from_u32(1)),
            EncodableItem::UInt(BigNumber::from_u32(2)),
            EncodableItem::UInt(BigNumber::from_u32(3)),
        ]);
        let payload = encode_dynamic_payload(&array).unwrap();

        // length word + 3 element words.
        assert_eq!(payload.len(), 128);
        assert_eq!(payload[31], 3);
        assert_eq!(payload[32 + 31], 1);
        assert_eq!(payload[64 + 31], 2);
        assert_eq!(payload[96 + 31], 3);
    }

    #[test]
    fn encode_fixed_bytes_right_pads_within_word() {
        let item = EncodableItem::FixedBytes(vec![0xCA, 0xFE]);
        let word = encode_static(&item).unwrap();
        assert_eq!(word[0], 0xCA);
        assert_eq!(word[1], 0xFE);
        assert_eq!(&word[2..], &[0u8; 30]);
    }

    #[test]
    fn encode_empty_bytes_dynamic_payload_is_just_zero_length() {
        let item = EncodableItem::Bytes(vec![]);
        let payload = encode_dynamic_payload(&item).unwrap();
        assert_eq!(payload, encode_uint256(&BigNumber::zero()).to_vec());
    }

    #[test]
    fn encode_static_rejects_dynamic_item() {
        assert!(encode_static(&EncodableItem::String("x".into())).is_err());
    }
}
