// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::base_types::{ObjectDigest, ObjectID, SequenceNumber, TransactionDigest};
use crate::owner::Owner;

#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub digest: ObjectDigest,
    pub object_id: ObjectID,
    pub version: SequenceNumber,
}

/// Summary entry returned by the owned-object listing calls.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiObjectInfo {
    pub object_id: ObjectID,
    pub version: SequenceNumber,
    pub digest: ObjectDigest,
    #[serde(rename = "type")]
    pub type_: String,
    pub owner: Owner,
    pub previous_transaction: TransactionDigest,
}

impl SuiObjectInfo {
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef {
            digest: self.digest.clone(),
            object_id: self.object_id,
            version: self.version,
        }
    }
}

/// Body of an object that exists. `data` is schema-less: its shape depends on the Move type.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiObject {
    pub data: Map<String, Value>,
    pub owner: Owner,
    pub previous_transaction: TransactionDigest,
    pub storage_rebate: u64,
    pub reference: ObjectRef,
}

impl SuiObject {
    pub fn id(&self) -> ObjectID {
        self.reference.object_id
    }

    pub fn version(&self) -> SequenceNumber {
        self.reference.version
    }

    /// The Move type of the object, when the node renders one.
    pub fn type_(&self) -> Option<&str> {
        self.data.get("type").and_then(Value::as_str)
    }

    /// The `data.fields` mapping of a Move object, if present and shaped as a mapping.
    pub fn fields(&self) -> Option<&Map<String, Value>> {
        self.data.get("fields").and_then(Value::as_object)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum ObjectStatus {
    Exists,
    NotExists,
    Deleted,
}

impl Display for ObjectStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            ObjectStatus::Exists => "Exists",
            ObjectStatus::NotExists => "NotExists",
            ObjectStatus::Deleted => "Deleted",
        };
        f.write_str(status)
    }
}

/// Result of a single-object fetch, tagged by `status` with the payload under `details`.
#[allow(clippy::large_enum_variant)]
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", content = "details")]
pub enum ObjectRead {
    Exists(SuiObject),
    NotExists(ObjectID),
    Deleted(ObjectRef),
}

impl ObjectRead {
    pub fn status(&self) -> ObjectStatus {
        match self {
            Self::Exists(_) => ObjectStatus::Exists,
            Self::NotExists(_) => ObjectStatus::NotExists,
            Self::Deleted(_) => ObjectStatus::Deleted,
        }
    }

    pub fn object(&self) -> Option<&SuiObject> {
        match self {
            Self::Exists(object) => Some(object),
            Self::NotExists(_) | Self::Deleted(_) => None,
        }
    }

    pub fn into_object(self) -> Option<SuiObject> {
        match self {
            Self::Exists(object) => Some(object),
            Self::NotExists(_) | Self::Deleted(_) => None,
        }
    }

    pub fn object_id(&self) -> ObjectID {
        match self {
            Self::Exists(object) => object.id(),
            Self::NotExists(id) => *id,
            Self::Deleted(oref) => oref.object_id,
        }
    }
}

#[cfg(test)]
#[path = "unit_tests/object_tests.rs"]
mod object_tests;
