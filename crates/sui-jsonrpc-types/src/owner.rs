// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::base_types::{ObjectID, SequenceNumber, SuiAddress};
use crate::error::OwnerError;

const ADDRESS_OWNER: &str = "AddressOwner";
const OBJECT_OWNER: &str = "ObjectOwner";
const SINGLE_OWNER: &str = "SingleOwner";
const SHARED: &str = "Shared";
const INITIAL_SHARED_VERSION: &str = "initial_shared_version";

/// Who or what controls an object.
///
/// On the wire this is either a bare string (the older form, e.g. `"Immutable"`) or an object
/// carrying exactly one of the `AddressOwner`, `ObjectOwner`, `SingleOwner` or `Shared` keys.
/// Both eras decode into this one type and re-encode to the shape they came from.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Owner {
    /// Object is exclusively owned by a single address, and is mutable.
    AddressOwner(SuiAddress),
    /// Object is exclusively owned by a single object, and is mutable.
    /// The object ID is converted to SuiAddress as SuiAddress is universal.
    ObjectOwner(SuiAddress),
    SingleOwner(SuiAddress),
    /// Object is shared, can be used by any address, and is mutable.
    Shared {
        initial_shared_version: i64,
    },
    /// Plain string forms, kept verbatim.
    RawTag(String),
}

impl Owner {
    pub fn decode(value: &Value) -> Result<Self, OwnerError> {
        match value {
            Value::String(tag) => Ok(Owner::RawTag(tag.clone())),
            Value::Object(map) => Self::decode_object(value, map),
            _ => Err(OwnerError::new(value, "expected a string or an object")),
        }
    }

    fn decode_object(value: &Value, map: &Map<String, Value>) -> Result<Self, OwnerError> {
        let mut entries = map.iter();
        let (key, inner) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            (None, _) => return Err(OwnerError::new(value, "object has no owner key")),
            (Some(_), Some(_)) => {
                return Err(OwnerError::new(value, "object has more than one key"))
            }
        };

        // Only the canonical `0x` + 40 lowercase hex form is accepted so that `encode` gives
        // back the received text.
        let address = |inner: &Value| -> Result<SuiAddress, OwnerError> {
            let text = inner
                .as_str()
                .ok_or_else(|| OwnerError::new(value, format!("`{key}` must be an address string")))?;
            let address: SuiAddress = text
                .parse()
                .map_err(|e| OwnerError::new(value, format!("`{key}`: {e}")))?;
            if address.to_string() != text {
                return Err(OwnerError::new(
                    value,
                    format!("`{key}` is not a canonical address: {text}"),
                ));
            }
            Ok(address)
        };

        match key.as_str() {
            ADDRESS_OWNER => Ok(Owner::AddressOwner(address(inner)?)),
            OBJECT_OWNER => Ok(Owner::ObjectOwner(address(inner)?)),
            SINGLE_OWNER => Ok(Owner::SingleOwner(address(inner)?)),
            SHARED => {
                let initial_shared_version = inner
                    .as_object()
                    .filter(|shared| shared.len() == 1)
                    .and_then(|shared| shared.get(INITIAL_SHARED_VERSION))
                    .and_then(Value::as_i64)
                    .ok_or_else(|| {
                        OwnerError::new(
                            value,
                            format!("`{SHARED}` must hold only an integer `{INITIAL_SHARED_VERSION}`"),
                        )
                    })?;
                Ok(Owner::Shared {
                    initial_shared_version,
                })
            }
            other => Err(OwnerError::new(value, format!("unknown owner key `{other}`"))),
        }
    }

    /// Exact inverse of [`Owner::decode`].
    pub fn encode(&self) -> Value {
        let single = |key: &str, inner: Value| {
            let mut map = Map::with_capacity(1);
            map.insert(key.to_owned(), inner);
            Value::Object(map)
        };
        match self {
            Owner::AddressOwner(a) => single(ADDRESS_OWNER, Value::String(a.to_string())),
            Owner::ObjectOwner(a) => single(OBJECT_OWNER, Value::String(a.to_string())),
            Owner::SingleOwner(a) => single(SINGLE_OWNER, Value::String(a.to_string())),
            Owner::Shared {
                initial_shared_version,
            } => single(
                SHARED,
                single(INITIAL_SHARED_VERSION, Value::from(*initial_shared_version)),
            ),
            Owner::RawTag(tag) => Value::String(tag.clone()),
        }
    }

    pub fn get_owner_address(&self) -> Option<SuiAddress> {
        match self {
            Self::AddressOwner(address) | Self::ObjectOwner(address) | Self::SingleOwner(address) => {
                Some(*address)
            }
            Self::Shared { .. } | Self::RawTag(_) => None,
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, Owner::Shared { .. })
    }

    pub fn initial_shared_version(&self) -> Option<SequenceNumber> {
        match self {
            Owner::Shared {
                initial_shared_version,
            } => u64::try_from(*initial_shared_version).ok(),
            _ => None,
        }
    }
}

impl std::cmp::PartialEq<SuiAddress> for Owner {
    fn eq(&self, other: &SuiAddress) -> bool {
        match self {
            Self::AddressOwner(address) | Self::SingleOwner(address) => address == other,
            Self::ObjectOwner(_) | Self::Shared { .. } | Self::RawTag(_) => false,
        }
    }
}

impl std::cmp::PartialEq<ObjectID> for Owner {
    fn eq(&self, other: &ObjectID) -> bool {
        let other_id: SuiAddress = (*other).into();
        match self {
            Self::ObjectOwner(id) => id == &other_id,
            Self::AddressOwner(_) | Self::SingleOwner(_) | Self::Shared { .. } | Self::RawTag(_) => {
                false
            }
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddressOwner(address) => write!(f, "Account Address ( {} )", address),
            Self::ObjectOwner(address) => write!(f, "Object ID: ( {} )", address),
            Self::SingleOwner(address) => write!(f, "Single Owner ( {} )", address),
            Self::Shared {
                initial_shared_version,
            } => write!(
                f,
                "Shared( initial_shared_version: {} )",
                initial_shared_version
            ),
            Self::RawTag(tag) => f.write_str(tag),
        }
    }
}

impl Serialize for Owner {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Owner::RawTag(tag) => serializer.serialize_str(tag),
            Owner::AddressOwner(a) => single_entry(serializer, ADDRESS_OWNER, a),
            Owner::ObjectOwner(a) => single_entry(serializer, OBJECT_OWNER, a),
            Owner::SingleOwner(a) => single_entry(serializer, SINGLE_OWNER, a),
            Owner::Shared {
                initial_shared_version,
            } => {
                #[derive(Serialize)]
                struct SharedInner {
                    initial_shared_version: i64,
                }
                single_entry(
                    serializer,
                    SHARED,
                    &SharedInner {
                        initial_shared_version: *initial_shared_version,
                    },
                )
            }
        }
    }
}

fn single_entry<S, V>(serializer: S, key: &str, value: &V) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize + ?Sized,
{
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(key, value)?;
    map.end()
}

impl<'de> Deserialize<'de> for Owner {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Owner::decode(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "unit_tests/owner_tests.rs"]
mod owner_tests;
