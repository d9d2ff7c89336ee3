// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Value types exchanged with a Sui full node over JSON-RPC, plus the pieces needed to turn an
//! unsigned transaction into a signed envelope.

pub mod base_types;
pub mod coin;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod intent;
pub mod object;
pub mod owner;
pub mod transaction;

pub use base_types::{ObjectID, SuiAddress};
pub use coin::Coin;
pub use crypto::{Ed25519KeyPair, TransactionSigner};
pub use encoding::Base64;
pub use object::{ObjectRead, ObjectRef, ObjectStatus, SuiObject, SuiObjectInfo};
pub use owner::Owner;
pub use transaction::{SignatureScheme, SignedTransaction, TransactionBytes};
