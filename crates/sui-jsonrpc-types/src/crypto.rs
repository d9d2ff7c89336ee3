// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use ed25519_consensus::{Signature, SigningKey, VerificationKey};
use rand::{CryptoRng, RngCore};

use crate::encoding::Base64;
use crate::error::KeyError;
use crate::intent::TRANSACTION_INTENT;
use crate::transaction::{SignatureScheme, SignedTransaction, TransactionBytes};

pub const ED25519_SEED_LENGTH: usize = 32;
pub const ED25519_KEYPAIR_LENGTH: usize = 64;

/// Something that can sign transaction messages for one signature scheme.
pub trait TransactionSigner {
    fn scheme(&self) -> SignatureScheme;

    fn public_key_bytes(&self) -> Vec<u8>;

    /// Sign `message` as is; intent framing is the caller's job.
    fn sign_message(&self, message: &[u8]) -> Vec<u8>;
}

/// Ed25519 signing key. Not `Clone`; use [`Ed25519KeyPair::copy`] when a second handle is needed.
pub struct Ed25519KeyPair {
    secret: SigningKey,
}

impl Ed25519KeyPair {
    /// Accepts a 32 byte seed, or the 64 byte `seed || public key` form. In the latter case the
    /// public half has to match the key derived from the seed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        match bytes.len() {
            ED25519_SEED_LENGTH => {
                let secret = SigningKey::try_from(bytes)
                    .map_err(|_| KeyError::InvalidLength(bytes.len()))?;
                Ok(Self { secret })
            }
            ED25519_KEYPAIR_LENGTH => {
                let (seed, public) = bytes.split_at(ED25519_SEED_LENGTH);
                let keypair = Self::from_bytes(seed)?;
                if keypair.public().as_slice() != public {
                    return Err(KeyError::PublicKeyMismatch);
                }
                Ok(keypair)
            }
            len => Err(KeyError::InvalidLength(len)),
        }
    }

    /// Decode a base64 private key, either raw or in the keystore form `flag || seed`.
    pub fn decode_base64(encoded: &str) -> Result<Self, KeyError> {
        let bytes = Base64::decode(encoded)
            .map_err(|e| KeyError::Encoding(e.to_string()))?
            .into_bytes();
        if bytes.len() == ED25519_SEED_LENGTH + 1 {
            let flag = bytes[0];
            return match SignatureScheme::from_flag_byte(flag) {
                Some(SignatureScheme::ED25519) => Self::from_bytes(&bytes[1..]),
                _ => Err(KeyError::UnsupportedScheme(flag)),
            };
        }
        Self::from_bytes(&bytes)
    }

    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self {
            secret: SigningKey::new(rng),
        }
    }

    pub fn public(&self) -> [u8; 32] {
        self.secret.verification_key().to_bytes()
    }

    pub fn seed(&self) -> [u8; 32] {
        self.secret.to_bytes()
    }

    /// Avoid implementing `clone` on secret keys to prevent mistakes.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self {
            secret: SigningKey::from(self.secret.to_bytes()),
        }
    }
}

impl fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519KeyPair(k#{})", hex::encode(self.public()))
    }
}

impl TransactionSigner for Ed25519KeyPair {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::ED25519
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        self.public().to_vec()
    }

    fn sign_message(&self, message: &[u8]) -> Vec<u8> {
        self.secret.sign(message).to_bytes().to_vec()
    }
}

/// Sign `intent || tx_bytes` and package the result for `sui_executeTransaction`.
pub fn sign_transaction<S>(tx: &TransactionBytes, signer: &S) -> SignedTransaction
where
    S: TransactionSigner + ?Sized,
{
    let message = TRANSACTION_INTENT.message(tx.tx_bytes.as_bytes());
    SignedTransaction {
        tx_bytes: tx.tx_bytes.clone(),
        sig_scheme: signer.scheme(),
        signature: Base64::from(signer.sign_message(&message)),
        pub_key: Base64::from(signer.public_key_bytes()),
    }
}

impl TransactionBytes {
    pub fn sign_with<S>(&self, signer: &S) -> SignedTransaction
    where
        S: TransactionSigner + ?Sized,
    {
        sign_transaction(self, signer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureVerificationError {
    #[error("Unsupported signature scheme {0}")]
    UnsupportedScheme(SignatureScheme),
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
}

impl SignedTransaction {
    /// Check the envelope the way the node does: the signature must cover
    /// `intent || tx_bytes` under `pub_key`.
    pub fn verify(&self) -> Result<(), SignatureVerificationError> {
        if self.sig_scheme != SignatureScheme::ED25519 {
            return Err(SignatureVerificationError::UnsupportedScheme(
                self.sig_scheme,
            ));
        }
        let public_key_bytes: [u8; 32] = self.pub_key.as_bytes().try_into().map_err(|_| {
            SignatureVerificationError::InvalidPublicKey(format!(
                "expected 32 bytes, got {}",
                self.pub_key.as_bytes().len()
            ))
        })?;
        let public_key = VerificationKey::try_from(public_key_bytes)
            .map_err(|e| SignatureVerificationError::InvalidPublicKey(e.to_string()))?;
        let signature_bytes: [u8; 64] = self.signature.as_bytes().try_into().map_err(|_| {
            SignatureVerificationError::InvalidSignature(format!(
                "expected 64 bytes, got {}",
                self.signature.as_bytes().len()
            ))
        })?;
        let message = TRANSACTION_INTENT.message(self.tx_bytes.as_bytes());
        public_key
            .verify(&Signature::from(signature_bytes), &message)
            .map_err(|e| SignatureVerificationError::InvalidSignature(e.to_string()))
    }
}

#[cfg(test)]
#[path = "unit_tests/crypto_tests.rs"]
mod crypto_tests;
