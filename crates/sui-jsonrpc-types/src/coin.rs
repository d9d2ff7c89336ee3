// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::base_types::TransactionDigest;
use crate::object::ObjectRef;
use crate::owner::Owner;

pub const COIN_STRUCT_TAG_PREFIX: &str = "0x2::coin::Coin";
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// Full generic coin type for an inner coin type, e.g. `0x2::coin::Coin<0x2::sui::SUI>`.
pub fn coin_type_tag(inner: &str) -> String {
    format!("{COIN_STRUCT_TAG_PREFIX}<{inner}>")
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    pub balance: u64,
    /// The full `0x2::coin::Coin<T>` type of the object.
    #[serde(rename = "type")]
    pub coin_type: String,
    pub owner: Owner,
    pub previous_transaction: TransactionDigest,
    pub reference: ObjectRef,
}

impl Coin {
    pub fn object_ref(&self) -> &ObjectRef {
        &self.reference
    }
}

pub fn total_balance<'a>(coins: impl IntoIterator<Item = &'a Coin>) -> u128 {
    coins.into_iter().map(|coin| coin.balance as u128).sum()
}
