//! RLP decoding helpers on top of `alloy-rlp`.
//!
//! Every failure maps to [`TransactionError::ParseTransaction`] so parsers
//! can propagate with `?`.

use alloy_primitives::{Address, U256};
use alloy_rlp::{Decodable, Header, PayloadView};
use txforge_core::error::{Result, TransactionError};

fn invalid_rlp(context: impl std::fmt::Display) -> TransactionError {
    TransactionError::parse(format!("invalid RLP: {context}"))
}

/// Returns `true` if `data` starts with an RLP list prefix.
#[must_use]
pub fn is_list(data: &[u8]) -> bool {
    data.first().is_some_and(|&b| b >= 0xc0)
}

/// Decode a top-level RLP list into its raw (still encoded) items.
///
/// Trailing bytes after the list are rejected.
///
/// # Errors
///
/// Returns a parse error if `data` is not exactly one RLP list.
pub fn decode_list(data: &[u8]) -> Result<Vec<&[u8]>> {
    let mut buf = data;
    let payload = Header::decode_raw(&mut buf).map_err(|e| invalid_rlp(e))?;

    if !buf.is_empty() {
        return Err(invalid_rlp(format!("{} trailing bytes", buf.len())));
    }

    match payload {
        PayloadView::List(items) => Ok(items),
        PayloadView::String(_) => Err(invalid_rlp("expected list, found string")),
    }
}

/// Decode an RLP byte string.
///
/// # Errors
///
/// Returns a parse error if the item is not a byte string.
pub fn decode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut buf = data;
    let bytes = Header::decode_bytes(&mut buf, false).map_err(|e| invalid_rlp(e))?;
    Ok(bytes.to_vec())
}

/// Decode an RLP-encoded `u64`.
///
/// # Errors
///
/// Returns a parse error for non-canonical or oversized integers.
pub fn decode_u64(data: &[u8]) -> Result<u64> {
    let mut buf = data;
    u64::decode(&mut buf).map_err(|e| invalid_rlp(format!("u64: {e}")))
}

/// Decode an RLP-encoded `u128`.
///
/// # Errors
///
/// Returns a parse error for non-canonical or oversized integers.
pub fn decode_u128(data: &[u8]) -> Result<u128> {
    let mut buf = data;
    u128::decode(&mut buf).map_err(|e| invalid_rlp(format!("u128: {e}")))
}

/// Decode an RLP-encoded `U256`.
///
/// # Errors
///
/// Returns a parse error for non-canonical or oversized integers.
pub fn decode_u256(data: &[u8]) -> Result<U256> {
    let mut buf = data;
    U256::decode(&mut buf).map_err(|e| invalid_rlp(format!("U256: {e}")))
}

/// Decode a 20-byte address, treating the empty string as `None`
/// (contract creation).
///
/// # Errors
///
/// Returns a parse error if the item is neither empty nor 20 bytes.
pub fn decode_optional_address(data: &[u8]) -> Result<Option<Address>> {
    if data == [alloy_rlp::EMPTY_STRING_CODE] {
        return Ok(None);
    }
    let mut buf = data;
    Address::decode(&mut buf)
        .map(Some)
        .map_err(|e| invalid_rlp(format!("address: {e}")))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use super::*;
    use alloy_primitives::address;
    use alloy_rlp::Encodable;
    use txforge_core::ErrorKind;

    fn encode<T: Encodable>(value: &T) -> Vec<u8> {
        let mut out = Vec::new();
        value.encode(&mut out);
        out
    }

    #[test]
    fn test_is_list() {
        assert!(is_list(&[0xc0]));
        assert!(is_list(&[0xf8, 0x6c]));
        assert!(!is_list(&[0x80]));
        assert!(!is_list(&[]));
    }

    #[test]
    fn test_decode_list_items() {
        let encoded = encode(&vec![1u64, 2, 3]);
        let items = decode_list(&encoded).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(decode_u64(items[2]).unwrap(), 3);
    }

    #[test]
    fn test_decode_list_rejects_trailing_bytes() {
        let mut encoded = encode(&vec![1u64]);
        encoded.push(0x01);
        let err = decode_list(&encoded).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseTransaction);
        assert!(err.message().contains("trailing"));
    }

    #[test]
    fn test_decode_list_rejects_string() {
        let encoded = encode(&b"abc".as_slice());
        assert!(decode_list(&encoded).is_err());
        assert!(decode_list(&[]).is_err());
    }

    #[test]
    fn test_decode_scalars() {
        assert_eq!(decode_u64(&encode(&0u64)).unwrap(), 0);
        assert_eq!(decode_u128(&encode(&(u128::from(u64::MAX) + 1))).unwrap(), u128::from(u64::MAX) + 1);
        let big = U256::from(10u64).pow(U256::from(30u64));
        assert_eq!(decode_u256(&encode(&big)).unwrap(), big);
        assert_eq!(decode_bytes(&encode(&b"hello".as_slice())).unwrap(), b"hello");
    }

    #[test]
    fn test_decode_optional_address() {
        let addr = address!("96216849c49358b10257cb55b28ea603c874b05e");
        assert_eq!(decode_optional_address(&encode(&addr)).unwrap(), Some(addr));
        assert_eq!(decode_optional_address(&[0x80]).unwrap(), None);
        assert!(decode_optional_address(&encode(&b"short".as_slice())).is_err());
    }
}
