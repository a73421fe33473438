//! Legacy and EIP-155 Ethereum transactions.
//!
//! # Wire format
//!
//! `0x`-prefixed hex of an RLP list:
//!
//! - unsigned, no chain id: `[nonce, gasPrice, gasLimit, to, value, data]`
//! - unsigned, EIP-155: `[nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0]`
//! - signed: `[nonce, gasPrice, gasLimit, to, value, data, v, r, s]` with
//!   `v = chainId * 2 + 35 + parity`, or `27 + parity` without a chain id
//!
//! The signature components are stored as they were decoded, so a
//! transaction re-encodes to exactly the bytes it was parsed from even when
//! its signature does not verify.

use alloy_consensus::{SignableTransaction, TxLegacy};
use alloy_primitives::{keccak256, Address, Bytes, TxKind, B256, U256};
use alloy_rlp::{Encodable, Header};
use serde::{Deserialize, Serialize};
use txforge_core::error::{Result, TransactionError};
use txforge_core::Amount;
use txforge_crypto::{KeyPair, Secp256k1KeyPair, Secp256k1Signature};

use crate::erc20::Erc20Call;
use crate::rlp::{
    decode_bytes, decode_list, decode_optional_address, decode_u128, decode_u256, decode_u64,
};
use crate::transaction::TransactionData;
use crate::validators::is_valid_eth_address;

/// `v` offset for EIP-155 signatures.
const EIP155_V_OFFSET: u64 = 35;

/// `v` for pre-EIP-155 signatures with parity 0.
const LEGACY_V_BASE: u64 = 27;

/// Raw `(v, r, s)` signature components as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacySignature {
    /// Recovery value, including any EIP-155 chain id offset.
    pub v: u64,
    /// ECDSA `r`.
    pub r: U256,
    /// ECDSA `s`.
    pub s: U256,
}

/// Canonical JSON view of an [`EthTransaction`].
///
/// Numeric fields are decimal strings on output. On input they may also be
/// `0x` hex; `id` and `from` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthTxFields {
    /// Sender nonce.
    pub nonce: u64,
    /// Gas price in wei.
    pub gas_price: String,
    /// Gas limit.
    pub gas_limit: String,
    /// Transferred value in wei.
    pub value: String,
    /// Call data, `0x` hex.
    pub data: String,
    /// `0x` Keccak-256 of the serialized transaction.
    #[serde(default)]
    pub id: String,
    /// Recipient; absent for contract creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Recovered sender, present only for a verified signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Signature `v`, hex. Like `r` and `s`, present only for a verified
    /// signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<String>,
    /// Signature `r`, hex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<String>,
    /// Signature `s`, hex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,
    /// EIP-155 chain id, hex (e.g. `0x1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
}

/// A legacy Ethereum transaction with an optional signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthTransaction {
    tx: TxLegacy,
    signature: Option<LegacySignature>,
}

impl EthTransaction {
    /// Wrap an unsigned transaction.
    #[must_use]
    pub const fn new(tx: TxLegacy) -> Self {
        Self { tx, signature: None }
    }

    /// The transaction body.
    #[must_use]
    pub const fn tx(&self) -> &TxLegacy {
        &self.tx
    }

    /// The raw signature, if any.
    #[must_use]
    pub const fn signature(&self) -> Option<&LegacySignature> {
        self.signature.as_ref()
    }

    /// Whether a signature is attached (verified or not).
    #[must_use]
    pub const fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// The EIP-155 chain id.
    #[must_use]
    pub const fn chain_id(&self) -> Option<u64> {
        self.tx.chain_id
    }

    /// The recipient, or `None` for contract creation.
    #[must_use]
    pub fn to(&self) -> Option<Address> {
        self.tx.to.to().copied()
    }

    /// Keccak-256 of the signing payload.
    #[must_use]
    pub fn signing_hash(&self) -> B256 {
        keccak256(self.tx.encoded_for_signing())
    }

    /// The ERC-20 call carried in the data field, if it decodes as one.
    #[must_use]
    pub fn erc20_call(&self) -> Option<Erc20Call> {
        self.to().and_then(|_| Erc20Call::decode(&self.tx.input))
    }

    /// The RLP encoding, signed or unsigned.
    #[must_use]
    pub fn encoded(&self) -> Vec<u8> {
        match &self.signature {
            Some(signature) => self.encode_signed(signature),
            None => self.tx.encoded_for_signing(),
        }
    }

    fn encode_signed(&self, signature: &LegacySignature) -> Vec<u8> {
        let tx = &self.tx;
        let payload_length = tx.nonce.length()
            + tx.gas_price.length()
            + tx.gas_limit.length()
            + tx.to.length()
            + tx.value.length()
            + tx.input.length()
            + signature.v.length()
            + signature.r.length()
            + signature.s.length();

        let mut out = Vec::with_capacity(payload_length + 9);
        Header {
            list: true,
            payload_length,
        }
        .encode(&mut out);
        tx.nonce.encode(&mut out);
        tx.gas_price.encode(&mut out);
        tx.gas_limit.encode(&mut out);
        tx.to.encode(&mut out);
        tx.value.encode(&mut out);
        tx.input.encode(&mut out);
        signature.v.encode(&mut out);
        signature.r.encode(&mut out);
        signature.s.encode(&mut out);
        out
    }

    /// The signature parity implied by `v` for this transaction's chain id,
    /// or `None` if `v` does not belong to it.
    fn parity(&self, v: u64) -> Option<u8> {
        let base = match self.tx.chain_id {
            Some(chain_id) => chain_id
                .checked_mul(2)?
                .checked_add(EIP155_V_OFFSET)?,
            None => LEGACY_V_BASE,
        };
        match v.checked_sub(base)? {
            0 => Some(0),
            1 => Some(1),
            _ => None,
        }
    }

    /// The sender, if the signature verifies: `r` and `s` non-zero, `s` in
    /// the lower half order, `v` consistent with the chain id, and public
    /// key recovery succeeds.
    #[must_use]
    pub fn sender(&self) -> Option<Address> {
        let signature = self.signature.as_ref()?;
        if signature.r.is_zero() || signature.s.is_zero() {
            return None;
        }
        let parity = self.parity(signature.v)?;

        let ecdsa = Secp256k1Signature::from_parts(
            signature.r.to_be_bytes::<32>(),
            signature.s.to_be_bytes::<32>(),
            parity,
        );
        if !ecdsa.is_low_s() {
            return None;
        }

        let public_key = ecdsa.recover_public_key(&self.signing_hash().0).ok()?;
        Some(Address::from(public_key.ethereum_address()))
    }
}

/// Split decoded `(v, r, s)` into a chain id and an optional signature.
/// `r = s = 0` marks the unsigned EIP-155 form, where `v` is the chain id.
fn classify_signature(
    v: u64,
    r: U256,
    s: U256,
    chain_id: Option<u64>,
) -> (Option<u64>, Option<LegacySignature>) {
    if r.is_zero() && s.is_zero() {
        return (chain_id.or(Some(v)), None);
    }
    let derived = v
        .checked_sub(EIP155_V_OFFSET)
        .map(|offset| offset / 2);
    (chain_id.or(derived), Some(LegacySignature { v, r, s }))
}

fn parse_quantity(field: &str, value: &str) -> Result<U256> {
    let amount: Amount = value
        .parse()
        .map_err(|e| TransactionError::parse(format!("invalid {field}: {e}")))?;
    amount
        .to_u256()
        .ok_or_else(|| TransactionError::parse(format!("{field} cannot be negative: {value}")))
}

fn parse_narrow<T: TryFrom<U256>>(field: &str, value: &str) -> Result<T> {
    T::try_from(parse_quantity(field, value)?)
        .map_err(|_| TransactionError::parse(format!("{field} out of range: {value}")))
}

fn parse_data(data: &str) -> Result<Vec<u8>> {
    let digits = data.strip_prefix("0x").unwrap_or(data);
    hex::decode(digits).map_err(|e| TransactionError::parse(format!("invalid data: {e}")))
}

fn lower_hex_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

impl TransactionData for EthTransaction {
    type Fields = EthTxFields;
    type KeyPair = Secp256k1KeyPair;

    fn from_native_fields(fields: &EthTxFields) -> Result<Self> {
        let to = match fields.to.as_deref() {
            None | Some("") => None,
            Some(to) if is_valid_eth_address(to) => Some(
                to.parse::<Address>()
                    .map_err(|e| TransactionError::parse(format!("invalid to {to}: {e}")))?,
            ),
            Some(to) => return Err(TransactionError::parse(format!("invalid to: {to}"))),
        };

        let chain_id = fields
            .chain_id
            .as_deref()
            .map(|id| parse_narrow::<u64>("chainId", id))
            .transpose()?;

        let (chain_id, signature) = match (&fields.v, &fields.r, &fields.s) {
            (None, None, None) => (chain_id, None),
            (Some(v), Some(r), Some(s)) => classify_signature(
                parse_narrow("v", v)?,
                parse_quantity("r", r)?,
                parse_quantity("s", s)?,
                chain_id,
            ),
            _ => {
                return Err(TransactionError::parse(
                    "signature requires all of v, r and s",
                ))
            }
        };

        let tx = TxLegacy {
            chain_id,
            nonce: fields.nonce,
            gas_price: parse_narrow("gasPrice", &fields.gas_price)?,
            gas_limit: parse_narrow("gasLimit", &fields.gas_limit)?,
            to: to.map_or(TxKind::Create, TxKind::Call),
            value: parse_quantity("value", &fields.value)?,
            input: Bytes::from(parse_data(&fields.data)?),
        };
        Ok(Self { tx, signature })
    }

    fn from_serialized(serialized: &str) -> Result<Self> {
        let trimmed = serialized.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(digits)
            .map_err(|e| TransactionError::parse(format!("invalid transaction hex: {e}")))?;

        let items = decode_list(&bytes)?;
        let (body, signature_items) = match items.as_slice() {
            [nonce, gas_price, gas_limit, to, value, data] => {
                ([*nonce, *gas_price, *gas_limit, *to, *value, *data], None)
            }
            [nonce, gas_price, gas_limit, to, value, data, v, r, s] => (
                [*nonce, *gas_price, *gas_limit, *to, *value, *data],
                Some([*v, *r, *s]),
            ),
            _ => {
                return Err(TransactionError::parse(format!(
                    "legacy transaction expected 6 or 9 items, got {}",
                    items.len()
                )))
            }
        };
        let [nonce, gas_price, gas_limit, to, value, data] = body;

        let (chain_id, signature) = match signature_items {
            None => (None, None),
            Some([v, r, s]) => {
                classify_signature(decode_u64(v)?, decode_u256(r)?, decode_u256(s)?, None)
            }
        };

        let tx = TxLegacy {
            chain_id,
            nonce: decode_u64(nonce)?,
            gas_price: decode_u128(gas_price)?,
            gas_limit: decode_u64(gas_limit)?,
            to: decode_optional_address(to)?.map_or(TxKind::Create, TxKind::Call),
            value: decode_u256(value)?,
            input: Bytes::from(decode_bytes(data)?),
        };
        Ok(Self { tx, signature })
    }

    fn sign(&mut self, key_pair: &Secp256k1KeyPair) -> Result<()> {
        let signature = key_pair.sign(&self.signing_hash().0)?;
        let parity = u64::from(signature.recovery_id());

        let v = match self.tx.chain_id {
            Some(chain_id) => chain_id
                .checked_mul(2)
                .and_then(|v| v.checked_add(EIP155_V_OFFSET + parity)),
            None => Some(LEGACY_V_BASE + parity),
        }
        .ok_or_else(|| TransactionError::signing("chain id too large for EIP-155"))?;

        self.signature = Some(LegacySignature {
            v,
            r: U256::from_be_bytes(*signature.r()),
            s: U256::from_be_bytes(*signature.s()),
        });
        Ok(())
    }

    fn to_canonical_fields(&self) -> EthTxFields {
        let sender = self.sender();
        // v, r and s are shown only next to a verified sender
        let verified = sender.and(self.signature);
        EthTxFields {
            nonce: self.tx.nonce,
            gas_price: self.tx.gas_price.to_string(),
            gas_limit: self.tx.gas_limit.to_string(),
            value: self.tx.value.to_string(),
            data: format!("0x{}", hex::encode(&self.tx.input)),
            id: self.id(),
            to: self.to().as_ref().map(lower_hex_address),
            from: sender.as_ref().map(lower_hex_address),
            v: verified.map(|sig| format!("0x{:x}", sig.v)),
            r: verified.map(|sig| format!("0x{:x}", sig.r)),
            s: verified.map(|sig| format!("0x{:x}", sig.s)),
            chain_id: self.tx.chain_id.map(|id| format!("0x{id:x}")),
        }
    }

    fn to_serialized(&self) -> String {
        format!("0x{}", hex::encode(self.encoded()))
    }

    fn id(&self) -> String {
        format!("0x{}", hex::encode(keccak256(self.encoded())))
    }
}
