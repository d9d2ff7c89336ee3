// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! JSON-RPC 2.0 envelopes as they travel over the transport.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// Build a positional parameter list, serializing every argument with serde.
///
/// Expands to an expression that uses `?`, so it can only be used in functions returning a
/// `Result` whose error converts from `serde_json::Error`.
#[macro_export]
macro_rules! rpc_params {
    ($($param:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut params: Vec<serde_json::Value> = Vec::new();
        $(params.push(serde_json::to_value(&$param)?);)*
        params
    }};
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: Vec<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            id,
            method: method.into(),
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub jsonrpc: String,
    /// `null` when the server could not determine the request id.
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcErrorObject>,
}

impl JsonRpcResponse {
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            id: Some(id),
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<u64>, error: JsonRpcErrorObject) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// A reply carrying neither `result` nor `error` is read as a `null` result.
    pub fn into_result(self) -> Result<Value, JsonRpcErrorObject> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// Hands out request identifiers. Shared by single and batched calls of one client, so ids are
/// unique across both.
#[derive(Debug, Default)]
pub struct RequestIdManager {
    next: AtomicU64,
}

impl RequestIdManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    pub fn request(&self, method: impl Into<String>, params: Vec<Value>) -> JsonRpcRequest {
        JsonRpcRequest::new(self.next_id(), method, params)
    }
}
