//! Stake account chain transfers.
//!
//! # Wire format
//!
//! Hex (no prefix) of the body followed by the approvals. All integers are
//! little-endian.
//!
//! | Field | Encoding |
//! |-------|----------|
//! | source, target | 33-byte account (`01` tag + ed25519 key) |
//! | amount, fee | `u8` length + minimal LE magnitude (at most 32 bytes) |
//! | timestamp, ttl | `u64` milliseconds |
//! | chain name | `u32` length + UTF-8 |
//! | transfer id | `u8` tag (0 = none, 1 = some) + `u64` |
//! | threshold | `u32` |
//! | approvals | `u32` count, then per approval a 33-byte signer and a 64-byte signature |
//!
//! The identifier is the SHA-256 of the body; approvals sign that hash.

use std::collections::HashSet;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use txforge_core::error::{Result, TransactionError};
use txforge_core::Amount;
use txforge_crypto::{
    Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, KeyPair, ED25519_ACCOUNT_TAG,
};

use crate::transaction::TransactionData;

const ACCOUNT_LEN: usize = 33;
const SIGNATURE_LEN: usize = 64;
const MAX_AMOUNT_LEN: usize = 32;

/// A signer's approval of a transaction body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Approval {
    /// The approving account.
    pub signer: Ed25519PublicKey,
    /// ed25519 signature over the body hash.
    pub signature: Ed25519Signature,
}

impl Approval {
    /// Whether the signature verifies against `body_hash`.
    #[must_use]
    pub fn verifies(&self, body_hash: &[u8; 32]) -> bool {
        self.signer.verify(body_hash, &self.signature)
    }
}

/// JSON view of an [`Approval`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalFields {
    /// Signer account hex.
    pub signer: String,
    /// Signature hex.
    pub signature: String,
}

/// Canonical JSON view of a [`StakeTransaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeTxFields {
    /// Paying account hex.
    pub source: String,
    /// Receiving account hex.
    pub target: String,
    /// Transferred amount in motes, decimal.
    pub amount: String,
    /// Payment for execution in motes, decimal.
    pub fee: String,
    /// Network the transaction is valid on.
    pub chain_name: String,
    /// Creation time, milliseconds since the epoch.
    pub timestamp: u64,
    /// Time to live in milliseconds.
    pub ttl: u64,
    /// Optional user-supplied transfer id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_id: Option<u64>,
    /// Approvals required.
    pub threshold: u32,
    /// Verified approvals, at most one per signer.
    #[serde(default)]
    pub approvals: Vec<ApprovalFields>,
    /// SHA-256 of the body, hex.
    #[serde(default)]
    pub id: String,
    /// Whether the verified approvals reach the threshold.
    #[serde(default)]
    pub fully_signed: bool,
}

/// A transfer on a stake account chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeTransaction {
    /// Paying account.
    pub source: Ed25519PublicKey,
    /// Receiving account.
    pub target: Ed25519PublicKey,
    /// Transferred amount.
    pub amount: U256,
    /// Payment for execution.
    pub fee: U256,
    /// Creation time in milliseconds.
    pub timestamp: u64,
    /// Time to live in milliseconds.
    pub ttl: u64,
    /// Network name.
    pub chain_name: String,
    /// Optional transfer id.
    pub transfer_id: Option<u64>,
    /// Approvals required.
    pub threshold: u32,
    approvals: Vec<Approval>,
}

impl StakeTransaction {
    /// Create an unsigned transfer requiring one approval.
    #[must_use]
    pub fn new(
        source: Ed25519PublicKey,
        target: Ed25519PublicKey,
        amount: U256,
        fee: U256,
        timestamp: u64,
        ttl: u64,
        chain_name: impl Into<String>,
    ) -> Self {
        Self {
            source,
            target,
            amount,
            fee,
            timestamp,
            ttl,
            chain_name: chain_name.into(),
            transfer_id: None,
            threshold: 1,
            approvals: Vec::new(),
        }
    }

    /// Every attached approval, valid or not, in wire order.
    #[must_use]
    pub fn approvals(&self) -> &[Approval] {
        &self.approvals
    }

    /// Attach a detached approval, replacing any earlier one from the same
    /// signer. The signature is not checked here; invalid approvals stay on
    /// the wire but never count.
    pub fn add_approval(&mut self, approval: Approval) {
        self.approvals.retain(|existing| existing.signer != approval.signer);
        self.approvals.push(approval);
    }

    /// The encoded body (everything but the approvals).
    #[must_use]
    pub fn body(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(2 * ACCOUNT_LEN + 128 + self.chain_name.len());
        push_account(&mut out, &self.source);
        push_account(&mut out, &self.target);
        push_amount(&mut out, self.amount);
        push_amount(&mut out, self.fee);
        out.extend_from_slice(&self.timestamp.to_le_bytes());
        out.extend_from_slice(&self.ttl.to_le_bytes());
        push_len(&mut out, self.chain_name.len());
        out.extend_from_slice(self.chain_name.as_bytes());
        match self.transfer_id {
            Some(id) => {
                out.push(1);
                out.extend_from_slice(&id.to_le_bytes());
            }
            None => out.push(0),
        }
        out.extend_from_slice(&self.threshold.to_le_bytes());
        out
    }

    /// SHA-256 of the body.
    #[must_use]
    pub fn body_hash(&self) -> [u8; 32] {
        Sha256::digest(self.body()).into()
    }

    /// The full wire encoding.
    #[must_use]
    pub fn encoded(&self) -> Vec<u8> {
        let mut out = self.body();
        push_len(&mut out, self.approvals.len());
        for approval in &self.approvals {
            push_account(&mut out, &approval.signer);
            out.extend_from_slice(&approval.signature.to_bytes());
        }
        out
    }

    /// Approvals whose signatures verify, first one per signer.
    #[must_use]
    pub fn valid_approvals(&self) -> Vec<&Approval> {
        let hash = self.body_hash();
        let mut seen = HashSet::new();
        self.approvals
            .iter()
            .filter(|approval| approval.verifies(&hash))
            .filter(|approval| seen.insert(approval.signer))
            .collect()
    }

    /// Whether the verified approvals reach the threshold.
    #[must_use]
    pub fn is_fully_signed(&self) -> bool {
        u32::try_from(self.valid_approvals().len()).is_ok_and(|count| count >= self.threshold)
    }
}

fn push_account(out: &mut Vec<u8>, key: &Ed25519PublicKey) {
    out.push(ED25519_ACCOUNT_TAG);
    out.extend_from_slice(key.as_bytes());
}

fn push_amount(out: &mut Vec<u8>, value: U256) {
    let bytes = value.to_le_bytes::<MAX_AMOUNT_LEN>();
    let len = MAX_AMOUNT_LEN - bytes.iter().rev().take_while(|&&b| b == 0).count();
    let (minimal, _) = bytes.split_at(len);
    out.push(u8::try_from(len).unwrap_or(u8::MAX));
    out.extend_from_slice(minimal);
}

fn push_len(out: &mut Vec<u8>, len: usize) {
    // lengths beyond u32 are not representable on the wire
    let len = u32::try_from(len).unwrap_or(u32::MAX);
    out.extend_from_slice(&len.to_le_bytes());
}

/// Cursor over wire bytes. Every read fails with a parse error when the
/// input runs short.
struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    const fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        let (head, rest) = self
            .data
            .split_at_checked(len)
            .ok_or_else(|| TransactionError::parse(format!("truncated {what}")))?;
        self.data = rest;
        Ok(head)
    }

    fn array<const N: usize>(&mut self, what: &str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    fn u8(&mut self, what: &str) -> Result<u8> {
        Ok(u8::from_le_bytes(self.array(what)?))
    }

    fn u32(&mut self, what: &str) -> Result<u32> {
        Ok(u32::from_le_bytes(self.array(what)?))
    }

    fn u64(&mut self, what: &str) -> Result<u64> {
        Ok(u64::from_le_bytes(self.array(what)?))
    }

    fn account(&mut self, what: &str) -> Result<Ed25519PublicKey> {
        let [tag, key @ ..] = self.array::<ACCOUNT_LEN>(what)?;
        if tag != ED25519_ACCOUNT_TAG {
            return Err(TransactionError::parse(format!("invalid {what} account tag {tag:#04x}")));
        }
        Ed25519PublicKey::from_bytes(key)
            .map_err(|_| TransactionError::parse(format!("invalid {what} account key")))
    }

    fn amount(&mut self, what: &str) -> Result<U256> {
        let len = usize::from(self.u8(what)?);
        if len > MAX_AMOUNT_LEN {
            return Err(TransactionError::parse(format!("{what} longer than 32 bytes")));
        }
        let bytes = self.take(len, what)?;
        if bytes.last() == Some(&0) {
            return Err(TransactionError::parse(format!("{what} is not minimally encoded")));
        }
        Ok(U256::from_le_slice(bytes))
    }

    fn finish(&self) -> Result<()> {
        if !self.data.is_empty() {
            return Err(TransactionError::parse(format!(
                "{} trailing bytes",
                self.data.len()
            )));
        }
        Ok(())
    }
}

fn parse_account(field: &str, value: &str) -> Result<Ed25519PublicKey> {
    Ed25519PublicKey::from_account_hex(value)
        .map_err(|_| TransactionError::parse(format!("invalid {field} account: {value}")))
}

fn parse_motes(field: &str, value: &str) -> Result<U256> {
    let amount: Amount = value
        .parse()
        .map_err(|e| TransactionError::parse(format!("invalid {field}: {e}")))?;
    amount
        .to_u256()
        .ok_or_else(|| TransactionError::parse(format!("{field} cannot be negative: {value}")))
}

impl TransactionData for StakeTransaction {
    type Fields = StakeTxFields;
    type KeyPair = Ed25519KeyPair;

    fn from_native_fields(fields: &StakeTxFields) -> Result<Self> {
        let approvals = fields
            .approvals
            .iter()
            .map(|approval| {
                Ok(Approval {
                    signer: parse_account("approval signer", &approval.signer)?,
                    signature: Ed25519Signature::from_hex(&approval.signature)
                        .map_err(|e| TransactionError::parse(e.to_string()))?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            source: parse_account("source", &fields.source)?,
            target: parse_account("target", &fields.target)?,
            amount: parse_motes("amount", &fields.amount)?,
            fee: parse_motes("fee", &fields.fee)?,
            timestamp: fields.timestamp,
            ttl: fields.ttl,
            chain_name: fields.chain_name.clone(),
            transfer_id: fields.transfer_id,
            threshold: fields.threshold,
            approvals,
        })
    }

    fn from_serialized(serialized: &str) -> Result<Self> {
        let bytes = hex::decode(serialized.trim())
            .map_err(|e| TransactionError::parse(format!("invalid transaction hex: {e}")))?;
        let mut reader = Reader::new(&bytes);

        let source = reader.account("source")?;
        let target = reader.account("target")?;
        let amount = reader.amount("amount")?;
        let fee = reader.amount("fee")?;
        let timestamp = reader.u64("timestamp")?;
        let ttl = reader.u64("ttl")?;

        let name_len = usize::try_from(reader.u32("chain name length")?)
            .map_err(|_| TransactionError::parse("chain name too long"))?;
        let chain_name = std::str::from_utf8(reader.take(name_len, "chain name")?)
            .map_err(|e| TransactionError::parse(format!("chain name is not utf-8: {e}")))?
            .to_string();

        let transfer_id = match reader.u8("transfer id tag")? {
            0 => None,
            1 => Some(reader.u64("transfer id")?),
            tag => {
                return Err(TransactionError::parse(format!(
                    "invalid transfer id tag {tag}"
                )))
            }
        };
        let threshold = reader.u32("threshold")?;

        let count = reader.u32("approval count")?;
        let mut approvals = Vec::new();
        for _ in 0..count {
            let signer = reader.account("approval signer")?;
            let signature =
                Ed25519Signature::from_bytes(reader.array::<SIGNATURE_LEN>("approval signature")?);
            approvals.push(Approval { signer, signature });
        }
        reader.finish()?;

        Ok(Self {
            source,
            target,
            amount,
            fee,
            timestamp,
            ttl,
            chain_name,
            transfer_id,
            threshold,
            approvals,
        })
    }

    fn sign(&mut self, key_pair: &Ed25519KeyPair) -> Result<()> {
        let signature = key_pair.sign(&self.body_hash())?;
        self.add_approval(Approval {
            signer: *key_pair.public_key(),
            signature,
        });
        Ok(())
    }

    fn to_canonical_fields(&self) -> StakeTxFields {
        let approvals: Vec<ApprovalFields> = self
            .valid_approvals()
            .into_iter()
            .map(|approval| ApprovalFields {
                signer: approval.signer.account_hex(),
                signature: hex::encode(approval.signature.to_bytes()),
            })
            .collect();
        let fully_signed =
            u32::try_from(approvals.len()).is_ok_and(|count| count >= self.threshold);

        StakeTxFields {
            source: self.source.account_hex(),
            target: self.target.account_hex(),
            amount: self.amount.to_string(),
            fee: self.fee.to_string(),
            chain_name: self.chain_name.clone(),
            timestamp: self.timestamp,
            ttl: self.ttl,
            transfer_id: self.transfer_id,
            threshold: self.threshold,
            approvals,
            id: self.id(),
            fully_signed,
        }
    }

    fn to_serialized(&self) -> String {
        hex::encode(self.encoded())
    }

    fn id(&self) -> String {
        hex::encode(self.body_hash())
    }
}
