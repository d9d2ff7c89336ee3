// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

/// `IntentScope` is required to guarantee two different intents will never collide.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum IntentScope {
    TransactionData,
    TransactionEffects,
    CheckpointSummary,
    PersonalMessage,
}

impl IntentScope {
    /// Specifically assign a byte per enum element, to avoid accidental issues (i.e., field
    /// swapping, adding in the middle or deletion) which would affect the signed bytes.
    ///
    /// IMPORTANT NOTE: if a value has been used in the past, then it should NEVER be reassigned
    /// to a different scope.
    pub const fn value(&self) -> u8 {
        match *self {
            IntentScope::TransactionData => 0,
            IntentScope::TransactionEffects => 1,
            IntentScope::CheckpointSummary => 2,
            IntentScope::PersonalMessage => 3,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum IntentVersion {
    V0,
}

impl IntentVersion {
    pub const fn value(&self) -> u8 {
        match *self {
            IntentVersion::V0 => 0,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum AppId {
    Sui,
}

impl AppId {
    pub const fn value(&self) -> u8 {
        match *self {
            AppId::Sui => 0,
        }
    }
}

/// The 3-byte domain separator prepended to every message before it is signed.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Intent {
    pub scope: IntentScope,
    pub version: IntentVersion,
    pub app_id: AppId,
}

impl Intent {
    pub const fn sui_transaction() -> Self {
        Self {
            scope: IntentScope::TransactionData,
            version: IntentVersion::V0,
            app_id: AppId::Sui,
        }
    }

    pub const fn to_bytes(&self) -> [u8; 3] {
        [self.scope.value(), self.version.value(), self.app_id.value()]
    }

    /// `intent || message`, the exact byte string the remote verifier checks.
    pub fn message(&self, payload: &[u8]) -> Vec<u8> {
        let mut message = Vec::with_capacity(3 + payload.len());
        message.extend_from_slice(&self.to_bytes());
        message.extend_from_slice(payload);
        message
    }
}

pub const TRANSACTION_INTENT: Intent = Intent::sui_transaction();
pub const TRANSACTION_INTENT_BYTES: [u8; 3] = TRANSACTION_INTENT.to_bytes();
