//! ERC-20 calldata encoding and decoding.
//!
//! | Function | Selector |
//! |----------|----------|
//! | `transfer(address,uint256)` | `0xa9059cbb` |
//! | `approve(address,uint256)` | `0x095ea7b3` |
//! | `transferFrom(address,address,uint256)` | `0x23b872dd` |
//!
//! Arguments are ABI encoded: one 32-byte word each, addresses left-padded
//! with zeros, amounts big-endian.
//!
//! ```rust
//! use alloy_primitives::{address, U256};
//! use txforge_chain::erc20::Erc20Call;
//!
//! let call = Erc20Call::Transfer {
//!     to: address!("1234567890123456789012345678901234567890"),
//!     amount: U256::from(1_000_000u64),
//! };
//! let calldata = call.encode();
//! assert_eq!(calldata.len(), 68);
//! assert_eq!(Erc20Call::decode(&calldata), Some(call));
//! ```

use alloy_primitives::{Address, U256};
use txforge_core::error::{Result, TransactionError};

use crate::validators::is_valid_eth_address;

/// `transfer(address,uint256)`
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// `approve(address,uint256)`
pub const APPROVE_SELECTOR: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];

/// `transferFrom(address,address,uint256)`
pub const TRANSFER_FROM_SELECTOR: [u8; 4] = [0x23, 0xb8, 0x72, 0xdd];

const WORD: usize = 32;

/// A decoded ERC-20 call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Erc20Call {
    /// `transfer(to, amount)`
    Transfer {
        /// Recipient.
        to: Address,
        /// Token amount in base units.
        amount: U256,
    },

    /// `approve(spender, amount)`
    Approve {
        /// Approved spender.
        spender: Address,
        /// Allowance in base units.
        amount: U256,
    },

    /// `transferFrom(from, to, amount)`
    TransferFrom {
        /// Token owner.
        from: Address,
        /// Recipient.
        to: Address,
        /// Token amount in base units.
        amount: U256,
    },
}

impl Erc20Call {
    /// The four-byte selector of this call.
    #[must_use]
    pub const fn selector(&self) -> [u8; 4] {
        match self {
            Self::Transfer { .. } => TRANSFER_SELECTOR,
            Self::Approve { .. } => APPROVE_SELECTOR,
            Self::TransferFrom { .. } => TRANSFER_FROM_SELECTOR,
        }
    }

    /// The address receiving tokens or allowance.
    #[must_use]
    pub const fn recipient(&self) -> &Address {
        match self {
            Self::Transfer { to, .. } | Self::TransferFrom { to, .. } => to,
            Self::Approve { spender, .. } => spender,
        }
    }

    /// The token amount.
    #[must_use]
    pub const fn amount(&self) -> &U256 {
        match self {
            Self::Transfer { amount, .. }
            | Self::Approve { amount, .. }
            | Self::TransferFrom { amount, .. } => amount,
        }
    }

    /// ABI-encode this call.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + 3 * WORD);
        out.extend_from_slice(&self.selector());
        match self {
            Self::Transfer { to, amount } => {
                push_address(&mut out, to);
                out.extend_from_slice(&amount.to_be_bytes::<WORD>());
            }
            Self::Approve { spender, amount } => {
                push_address(&mut out, spender);
                out.extend_from_slice(&amount.to_be_bytes::<WORD>());
            }
            Self::TransferFrom { from, to, amount } => {
                push_address(&mut out, from);
                push_address(&mut out, to);
                out.extend_from_slice(&amount.to_be_bytes::<WORD>());
            }
        }
        out
    }

    /// Decode calldata. Returns `None` for unknown selectors, wrong lengths
    /// and address words with non-zero padding.
    #[must_use]
    pub fn decode(data: &[u8]) -> Option<Self> {
        let (selector, args) = data.split_first_chunk::<4>()?;
        match *selector {
            TRANSFER_SELECTOR if args.len() == 2 * WORD => Some(Self::Transfer {
                to: read_address(args, 0)?,
                amount: read_u256(args, 1)?,
            }),
            APPROVE_SELECTOR if args.len() == 2 * WORD => Some(Self::Approve {
                spender: read_address(args, 0)?,
                amount: read_u256(args, 1)?,
            }),
            TRANSFER_FROM_SELECTOR if args.len() == 3 * WORD => Some(Self::TransferFrom {
                from: read_address(args, 0)?,
                to: read_address(args, 1)?,
                amount: read_u256(args, 2)?,
            }),
            _ => None,
        }
    }
}

/// Calldata for `transfer(recipient, amount)`.
///
/// # Errors
///
/// Returns [`TransactionError::InvalidParameterValue`] if `recipient` is not
/// a valid hex address.
pub fn transfer_calldata(recipient: &str, amount: U256) -> Result<Vec<u8>> {
    let to = parse_parameter_address(recipient)?;
    Ok(Erc20Call::Transfer { to, amount }.encode())
}

fn parse_parameter_address(value: &str) -> Result<Address> {
    if !is_valid_eth_address(value) {
        return Err(TransactionError::invalid_parameter(format!(
            "invalid recipient address: {value}"
        )));
    }
    value.parse::<Address>().map_err(|e| {
        TransactionError::invalid_parameter(format!("invalid recipient address {value}: {e}"))
    })
}

fn push_address(out: &mut Vec<u8>, address: &Address) {
    out.extend_from_slice(&[0u8; 12]);
    out.extend_from_slice(address.as_slice());
}

fn read_word(args: &[u8], index: usize) -> Option<&[u8; WORD]> {
    let start = index.checked_mul(WORD)?;
    args.get(start..start.checked_add(WORD)?)?.try_into().ok()
}

fn read_address(args: &[u8], index: usize) -> Option<Address> {
    let (padding, address) = read_word(args, index)?.split_at(12);
    if padding.iter().any(|&b| b != 0) {
        return None;
    }
    Some(Address::from_slice(address))
}

fn read_u256(args: &[u8], index: usize) -> Option<U256> {
    read_word(args, index).map(|word| U256::from_be_bytes(*word))
}
