// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::base_types::{ObjectID, SuiAddress};
use crate::encoding::Base64;
use crate::object::ObjectRef;

/// Effects, certificates and full transaction responses have open-ended schemas that evolve
/// with the node; they are handed to callers as raw JSON.
pub type TransactionEffects = Value;
pub type TransactionResponse = Value;
pub type ExecuteTransactionResponse = Value;

/// One entry of `inputObjects`, e.g. `{"ImmOrOwnedMoveObject": {...}}`.
pub type InputObjectKind = Map<String, Value>;

/// An unsigned transaction as assembled by the node's transaction builder methods.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBytes {
    /// the gas object to be used
    pub gas: ObjectRef,
    /// objects to be used in this transaction
    pub input_objects: Vec<InputObjectKind>,
    /// transaction data bytes
    pub tx_bytes: Base64,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum SignatureScheme {
    #[serde(rename = "ED25519")]
    ED25519,
    Secp256k1,
}

impl SignatureScheme {
    pub fn flag(&self) -> u8 {
        match self {
            SignatureScheme::ED25519 => 0x00,
            SignatureScheme::Secp256k1 => 0x01,
        }
    }

    pub fn from_flag_byte(flag: u8) -> Option<Self> {
        match flag {
            0x00 => Some(SignatureScheme::ED25519),
            0x01 => Some(SignatureScheme::Secp256k1),
            _ => None,
        }
    }
}

impl Display for SignatureScheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SignatureScheme::ED25519 => f.write_str("ED25519"),
            SignatureScheme::Secp256k1 => f.write_str("Secp256k1"),
        }
    }
}

/// Wire-ready signed transaction envelope.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// transaction data bytes
    pub tx_bytes: Base64,
    /// Flag of the signature scheme that is used.
    pub sig_scheme: SignatureScheme,
    /// transaction signature
    pub signature: Base64,
    /// signer's public key
    pub pub_key: Base64,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum ExecuteTransactionRequestType {
    ImmediateReturn,
    WaitForTxCert,
    WaitForEffectsCert,
    WaitForLocalExecution,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferObjectParams {
    pub recipient: SuiAddress,
    pub object_id: ObjectID,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCallParams {
    pub package_object_id: ObjectID,
    pub module: String,
    pub function: String,
    #[serde(default)]
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Value>,
}

/// One step of a `sui_batchTransaction` request.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename = "RPCTransactionRequestParams")]
pub enum RPCTransactionRequestParams {
    TransferObjectRequestParams(TransferObjectParams),
    MoveCallRequestParams(MoveCallParams),
}
