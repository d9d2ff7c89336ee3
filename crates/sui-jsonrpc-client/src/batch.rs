// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::jsonrpc::{JsonRpcErrorObject, JsonRpcResponse, RequestIdManager};
use crate::transport::{RpcTransport, TransportError};

/// Outcome of one call that did not produce a usable result. Never aborts sibling calls.
#[derive(Error, Debug)]
pub enum ElementError {
    #[error("RPC error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<Value>,
    },
    #[error("Failed to decode result: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("No reply received for this call")]
    MissingReply,
    #[error("Call has not been executed")]
    NotExecuted,
}

impl From<JsonRpcErrorObject> for ElementError {
    fn from(error: JsonRpcErrorObject) -> Self {
        ElementError::Rpc {
            code: error.code,
            message: error.message,
            data: error.data,
        }
    }
}

impl ElementError {
    pub(crate) fn from_reply<T: DeserializeOwned>(reply: JsonRpcResponse) -> Result<T, Self> {
        let value = reply.into_result()?;
        Ok(serde_json::from_value(value)?)
    }
}

/// One logical call inside a batch, together with the slot its outcome lands in.
///
/// After a successful [`BatchCorrelator::execute`] exactly one of [`BatchElement::result`] and
/// [`BatchElement::error`] is set.
#[derive(Debug)]
pub struct BatchElement<T> {
    method: String,
    params: Vec<Value>,
    outcome: Option<Result<T, ElementError>>,
}

impl<T> BatchElement<T> {
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            params,
            outcome: None,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn result(&self) -> Option<&T> {
        self.outcome.as_ref().and_then(|outcome| outcome.as_ref().ok())
    }

    pub fn error(&self) -> Option<&ElementError> {
        self.outcome.as_ref().and_then(|outcome| outcome.as_ref().err())
    }

    pub fn is_executed(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn into_result(self) -> Result<T, ElementError> {
        self.outcome.unwrap_or(Err(ElementError::NotExecuted))
    }
}

/// Packs many independent calls into one round trip and routes every reply back to the element
/// that asked for it, by request id.
#[derive(Clone)]
pub struct BatchCorrelator {
    transport: Arc<dyn RpcTransport>,
    ids: Arc<RequestIdManager>,
}

impl BatchCorrelator {
    pub fn new(transport: Arc<dyn RpcTransport>, ids: Arc<RequestIdManager>) -> Self {
        Self { transport, ids }
    }

    /// Execute `batch` as a single transport operation.
    ///
    /// An empty batch is a no-op. A transport failure (including cancellation) is returned as is
    /// and leaves every element untouched; otherwise every element ends up holding either its
    /// decoded result or its own error.
    pub async fn execute<T>(
        &self,
        batch: &mut [BatchElement<T>],
        cancel: &CancellationToken,
    ) -> Result<(), TransportError>
    where
        T: DeserializeOwned + Send,
    {
        if batch.is_empty() {
            return Ok(());
        }

        let requests: Vec<_> = batch
            .iter()
            .map(|element| self.ids.request(&element.method, element.params.clone()))
            .collect();
        let positions: HashMap<u64, usize> = requests
            .iter()
            .enumerate()
            .map(|(position, request)| (request.id, position))
            .collect();

        debug!(calls = requests.len(), "Dispatching JSON-RPC batch");
        let replies = self.transport.batch_call(requests, cancel).await?;

        // Stage everything first so slots are only written once the whole batch is in.
        let mut staged: Vec<Option<Result<T, ElementError>>> =
            std::iter::repeat_with(|| None).take(batch.len()).collect();
        for reply in replies {
            let Some(position) = reply.id.and_then(|id| positions.get(&id).copied()) else {
                warn!(id = ?reply.id, "Ignoring batch reply that matches no request");
                continue;
            };
            if staged[position].is_some() {
                warn!(id = ?reply.id, "Ignoring duplicate batch reply");
                continue;
            }
            staged[position] = Some(ElementError::from_reply(reply));
        }

        let mut failed = 0usize;
        for (element, outcome) in batch.iter_mut().zip(staged) {
            let outcome = outcome.unwrap_or(Err(ElementError::MissingReply));
            if outcome.is_err() {
                failed += 1;
            }
            element.outcome = Some(outcome);
        }
        debug!(calls = batch.len(), failed, "JSON-RPC batch completed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "unit_tests/batch_tests.rs"]
mod batch_tests;
