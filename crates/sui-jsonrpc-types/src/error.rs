// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid hex string {input:?}: {reason}")]
    InvalidHex { input: String, reason: String },
    #[error("Hex string is too long, address length is {max} bytes but got {actual}")]
    TooLong { max: usize, actual: usize },
    #[error("Invalid address length {actual}, expected {expected} bytes")]
    InvalidLength { expected: usize, actual: usize },
}

/// Raised when an ownership value is neither a tag string nor an object with exactly one
/// recognised owner key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed owner {value}: {reason}")]
pub struct OwnerError {
    pub value: String,
    pub reason: String,
}

impl OwnerError {
    pub(crate) fn new(value: &serde_json::Value, reason: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Invalid private key length {0}, expected a 32 byte seed or 64 byte keypair")]
    InvalidLength(usize),
    #[error("Public half of the keypair does not match its private seed")]
    PublicKeyMismatch,
    #[error("Unsupported key scheme flag {0}")]
    UnsupportedScheme(u8),
    #[error("Invalid base64 key encoding: {0}")]
    Encoding(String),
}
