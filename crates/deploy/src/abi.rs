//! Minimal ABI encoding for static constructor arguments and function
//! selectors.
//!
//! The contracts deployed here only take statically-sized constructor
//! arguments (addresses and unsigned integers), so the encoding is a plain
//! sequence of 32-byte words.

use std::fmt::{self, Display};

use alloy_core::primitives::{Address, B256, Bytes, keccak256};

/// Size of an ABI word in bytes.
pub const WORD_BYTES: usize = 32;

/// A constructor argument after reference resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedArg {
    /// An address (literal or resolved from an earlier step).
    Address(Address),
    /// An unsigned integer.
    Uint(u64),
    /// An opaque 32-byte word resolved from an auxiliary output.
    Word(B256),
}

impl Display for ResolvedArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedArg::Address(address) => write!(f, "{}", address),
            ResolvedArg::Uint(value) => write!(f, "{}", value),
            ResolvedArg::Word(word) => write!(f, "{}", word),
        }
    }
}

/// Encode an address as a left-padded 32-byte word.
pub fn encode_address(address: &Address) -> [u8; WORD_BYTES] {
    let mut word = [0u8; WORD_BYTES];
    word[12..].copy_from_slice(address.as_slice());
    word
}

/// Encode an unsigned integer as a big-endian 32-byte word.
pub fn encode_uint(value: u64) -> [u8; WORD_BYTES] {
    let mut word = [0u8; WORD_BYTES];
    word[WORD_BYTES - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Encode a sequence of resolved constructor arguments.
///
/// The result is appended verbatim to the contract creation bytecode.
pub fn encode_args(args: &[ResolvedArg]) -> Bytes {
    let mut encoded = Vec::with_capacity(args.len() * WORD_BYTES);
    for arg in args {
        match arg {
            ResolvedArg::Address(address) => encoded.extend_from_slice(&encode_address(address)),
            ResolvedArg::Uint(value) => encoded.extend_from_slice(&encode_uint(*value)),
            ResolvedArg::Word(word) => encoded.extend_from_slice(word.as_slice()),
        }
    }
    Bytes::from(encoded)
}

/// Compute the 4-byte selector for a function signature, e.g. `pairCodeHash()`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_encode_address_left_padded() {
        let address = Address::from_str("0x70997970C51812dc3A010C7d01b50e0d17dc79C8").unwrap();
        let word = encode_address(&address);

        assert_eq!(
            hex::encode(word),
            "00000000000000000000000070997970c51812dc3a010c7d01b50e0d17dc79c8"
        );
    }

    #[test]
    fn test_encode_uint_big_endian() {
        // 1 ETH in wei
        let word = encode_uint(1_000_000_000_000_000_000);
        assert_eq!(
            hex::encode(word),
            "0000000000000000000000000000000000000000000000000de0b6b3a7640000"
        );

        let word = encode_uint(10);
        assert_eq!(
            hex::encode(word),
            "000000000000000000000000000000000000000000000000000000000000000a"
        );
    }

    #[test]
    fn test_encode_args_concatenates_words() {
        let address = Address::from_str("0x0000000000000000000000000000000000000001").unwrap();
        let encoded = encode_args(&[
            ResolvedArg::Address(address),
            ResolvedArg::Uint(10),
            ResolvedArg::Uint(5),
        ]);

        assert_eq!(encoded.len(), 3 * WORD_BYTES);
        assert_eq!(encoded[WORD_BYTES - 1], 0x01);
        assert_eq!(encoded[2 * WORD_BYTES - 1], 0x0a);
        assert_eq!(encoded[3 * WORD_BYTES - 1], 0x05);
    }

    #[test]
    fn test_selector_is_deterministic_and_distinct() {
        let a = selector("pairCodeHash()");
        let b = selector("pairCodeHash()");
        let c = selector("feeTo()");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
