// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! In-memory node double for exercising the client without a network.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use reqwest::StatusCode;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::jsonrpc::{JsonRpcErrorObject, JsonRpcRequest, JsonRpcResponse};
use crate::transport::{RpcTransport, TransportError};

type Responder = dyn Fn(&JsonRpcRequest) -> Option<JsonRpcResponse> + Send + Sync;

pub(crate) struct MockTransport {
    responder: Box<Responder>,
    reversed: bool,
    shuffle_seed: Option<u64>,
    failing: bool,
    extra_replies: Vec<JsonRpcResponse>,
    round_trips: Mutex<Vec<Vec<JsonRpcRequest>>>,
}

impl MockTransport {
    /// `responder` returns `None` to drop the reply for a request.
    pub fn new(
        responder: impl Fn(&JsonRpcRequest) -> Option<JsonRpcResponse> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            reversed: false,
            shuffle_seed: None,
            failing: false,
            extra_replies: vec![],
            round_trips: Mutex::new(vec![]),
        }
    }

    /// Every round trip fails with an HTTP 502.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new(|_| None)
        }
    }

    /// Batch replies come back in reverse order.
    pub fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }

    /// Batch replies come back in a permutation fixed by `seed`.
    pub fn shuffled(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    /// Replies appended to every batch response.
    pub fn with_extra_replies(mut self, replies: Vec<JsonRpcResponse>) -> Self {
        self.extra_replies = replies;
        self
    }

    pub fn round_trips(&self) -> Vec<Vec<JsonRpcRequest>> {
        self.round_trips.lock().unwrap().clone()
    }

    fn record(
        &self,
        requests: Vec<JsonRpcRequest>,
        cancel: &CancellationToken,
    ) -> Result<Vec<JsonRpcRequest>, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        self.round_trips.lock().unwrap().push(requests.clone());
        if self.failing {
            return Err(TransportError::Status(StatusCode::BAD_GATEWAY));
        }
        Ok(requests)
    }
}

#[async_trait::async_trait]
impl RpcTransport for MockTransport {
    async fn call(
        &self,
        request: JsonRpcRequest,
        cancel: &CancellationToken,
    ) -> Result<JsonRpcResponse, TransportError> {
        let requests = self.record(vec![request], cancel)?;
        (self.responder)(&requests[0])
            .ok_or_else(|| TransportError::InvalidResponse("no reply".to_owned()))
    }

    async fn batch_call(
        &self,
        requests: Vec<JsonRpcRequest>,
        cancel: &CancellationToken,
    ) -> Result<Vec<JsonRpcResponse>, TransportError> {
        let requests = self.record(requests, cancel)?;
        let mut replies: Vec<_> = requests.iter().filter_map(|r| (self.responder)(r)).collect();
        if self.reversed {
            replies.reverse();
        }
        if let Some(seed) = self.shuffle_seed {
            replies.shuffle(&mut StdRng::seed_from_u64(seed));
        }
        replies.extend(self.extra_replies.iter().cloned());
        Ok(replies)
    }
}

pub(crate) fn ok(request: &JsonRpcRequest, result: Value) -> Option<JsonRpcResponse> {
    Some(JsonRpcResponse::success(request.id, result))
}

pub(crate) fn rpc_error(
    request: &JsonRpcRequest,
    code: i64,
    message: &str,
) -> Option<JsonRpcResponse> {
    Some(JsonRpcResponse::failure(
        Some(request.id),
        JsonRpcErrorObject {
            code,
            message: message.to_owned(),
            data: None,
        },
    ))
}
