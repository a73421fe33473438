//! Chain-agnostic validators and address/format predicates.
//!
//! Builders report validation failures as typed errors; the `is_valid_*`
//! predicates are the building blocks the chain families use to decide.

use alloy_primitives::Address;
use txforge_core::error::{Result, TransactionError};
use txforge_core::Amount;
use txforge_crypto::{Ed25519PublicKey, KeyPair};

/// Reject negative values.
///
/// # Errors
///
/// Returns [`TransactionError::BuildTransaction`] if `value` is below zero.
pub fn validate_value(value: &Amount) -> Result<()> {
    if value.is_negative() {
        return Err(TransactionError::build("Value cannot be less than zero"));
    }
    Ok(())
}

/// Construct a key pair from a hex private key, or fail.
///
/// # Errors
///
/// Returns [`TransactionError::BuildTransaction`] with `Invalid key` if the
/// key material does not form a valid private key for `K`.
pub fn validate_key<K: KeyPair>(private_key: &str) -> Result<K> {
    K::from_private_hex(private_key).map_err(|_| TransactionError::build("Invalid key"))
}

/// `0x` followed by 40 hex characters. Mixed-case input must carry a valid
/// EIP-55 checksum.
#[must_use]
pub fn is_valid_eth_address(address: &str) -> bool {
    let Some(digits) = address.strip_prefix("0x") else {
        return false;
    };
    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return false;
    }

    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Address::parse_checksummed(address, None).is_ok();
    }
    true
}

/// Non-empty, even-length hex with an optional `0x` prefix.
#[must_use]
pub fn is_valid_raw_hex(raw: &str) -> bool {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    !digits.is_empty() && digits.len() % 2 == 0 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// A stake account: the `01` tag and a valid ed25519 public key, hex encoded.
#[must_use]
pub fn is_valid_stake_account(account: &str) -> bool {
    Ed25519PublicKey::from_account_hex(account).is_ok()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use txforge_core::ErrorKind;
    use txforge_crypto::{Ed25519KeyPair, Secp256k1KeyPair};

    #[test]
    fn test_validate_value() {
        assert!(validate_value(&Amount::ZERO).is_ok());
        assert!(validate_value(&Amount::from(100u64)).is_ok());

        let err = validate_value(&Amount::from(-1i64)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BuildTransaction);
        assert_eq!(err.message(), "Value cannot be less than zero");
    }

    #[test]
    fn test_validate_key() {
        let good = "fad9c8855b740a0b7ed4c221dbad0f33a83a49cad6b3fe8d5817ac83d38b6a19";
        assert!(validate_key::<Secp256k1KeyPair>(good).is_ok());
        assert!(validate_key::<Ed25519KeyPair>(good).is_ok());

        let zero = "00".repeat(32);
        for bad in ["", "xyz", zero.as_str()] {
            let err = validate_key::<Secp256k1KeyPair>(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::BuildTransaction);
            assert_eq!(err.message(), "Invalid key");
        }
    }

    #[test]
    fn test_eth_address() {
        assert!(is_valid_eth_address("0x96216849c49358b10257cb55b28ea603c874b05e"));
        assert!(is_valid_eth_address("0x96216849C49358B10257CB55B28EA603C874B05E"));
        // EIP-55 reference vector
        assert!(is_valid_eth_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
        assert!(!is_valid_eth_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD"));

        assert!(!is_valid_eth_address("96216849c49358b10257cb55b28ea603c874b05e"));
        assert!(!is_valid_eth_address("0x96216849c49358b10257cb55b28ea603c874b05"));
        assert!(!is_valid_eth_address("0xg6216849c49358b10257cb55b28ea603c874b05e"));
        assert!(!is_valid_eth_address(""));
    }

    #[test]
    fn test_raw_hex() {
        assert!(is_valid_raw_hex("0xf86c"));
        assert!(is_valid_raw_hex("ABcd"));
        assert!(!is_valid_raw_hex("0x"));
        assert!(!is_valid_raw_hex("abc"));
        assert!(!is_valid_raw_hex("0xzz"));
    }

    #[test]
    fn test_stake_account() {
        let keypair = Ed25519KeyPair::from_seed([3u8; 32]);
        let account = keypair.public_key().account_hex();
        assert!(is_valid_stake_account(&account));
        assert!(!is_valid_stake_account(&account[2..]));
        assert!(!is_valid_stake_account("0x96216849c49358b10257cb55b28ea603c874b05e"));
    }
}
