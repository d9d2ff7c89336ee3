// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use serde::de::{Deserializer, Error};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::AddressError;

pub const SUI_ADDRESS_LENGTH: usize = 20;

pub type SequenceNumber = u64;
/// Base58/base64 digests are passed through exactly as the node renders them.
pub type TransactionDigest = String;
pub type ObjectDigest = String;

/// Decode a hex string into a fixed-width, left-padded byte array.
///
/// The `0x`/`0X` prefix is optional and an odd number of digits is padded with a leading zero,
/// so `0x2`, `2` and `0x0000..02` all decode to the same value.
fn decode_padded_hex(input: &str) -> Result<[u8; SUI_ADDRESS_LENGTH], AddressError> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    let digits = if digits.len() % 2 != 0 {
        format!("0{digits}")
    } else {
        digits.to_owned()
    };
    let bytes = hex::decode(&digits).map_err(|e| AddressError::InvalidHex {
        input: input.to_owned(),
        reason: e.to_string(),
    })?;
    if bytes.len() > SUI_ADDRESS_LENGTH {
        return Err(AddressError::TooLong {
            max: SUI_ADDRESS_LENGTH,
            actual: bytes.len(),
        });
    }
    let mut result = [0u8; SUI_ADDRESS_LENGTH];
    result[SUI_ADDRESS_LENGTH - bytes.len()..].copy_from_slice(&bytes);
    Ok(result)
}

macro_rules! fixed_hex_type {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Eq, Default, PartialEq, Ord, PartialOrd, Copy, Clone, Hash)]
        pub struct $name([u8; SUI_ADDRESS_LENGTH]);

        impl $name {
            pub const ZERO: Self = Self([0u8; SUI_ADDRESS_LENGTH]);

            pub const fn new(bytes: [u8; SUI_ADDRESS_LENGTH]) -> Self {
                Self(bytes)
            }

            pub fn from_hex_literal(literal: &str) -> Result<Self, AddressError> {
                decode_padded_hex(literal).map(Self)
            }

            pub fn to_vec(&self) -> Vec<u8> {
                self.0.to_vec()
            }

            /// Hex rendering with leading zeros trimmed, e.g. `0x2`.
            pub fn short_str(&self) -> String {
                let full = hex::encode(self.0);
                let trimmed = full.trim_start_matches('0');
                if trimmed.is_empty() {
                    "0x0".to_owned()
                } else {
                    format!("0x{trimmed}")
                }
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0[..]
            }
        }

        impl From<[u8; SUI_ADDRESS_LENGTH]> for $name {
            fn from(bytes: [u8; SUI_ADDRESS_LENGTH]) -> Self {
                Self(bytes)
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = AddressError;

            fn try_from(bytes: &[u8]) -> Result<Self, AddressError> {
                let arr: [u8; SUI_ADDRESS_LENGTH] =
                    bytes.try_into().map_err(|_| AddressError::InvalidLength {
                        expected: SUI_ADDRESS_LENGTH,
                        actual: bytes.len(),
                    })?;
                Ok(Self(arr))
            }
        }

        impl FromStr for $name {
            type Err = AddressError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex_literal(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::from_hex_literal(&s).map_err(D::Error::custom)
            }
        }
    };
}

fixed_hex_type!(
    /// An account address on the ledger.
    SuiAddress
);

fixed_hex_type!(
    /// Identifier of an on-chain object. Shares the address encoding.
    ObjectID
);

impl From<ObjectID> for SuiAddress {
    fn from(id: ObjectID) -> Self {
        SuiAddress(id.0)
    }
}

impl From<SuiAddress> for ObjectID {
    fn from(address: SuiAddress) -> Self {
        ObjectID(address.0)
    }
}

#[cfg(test)]
#[path = "unit_tests/base_types_tests.rs"]
mod base_types_tests;
