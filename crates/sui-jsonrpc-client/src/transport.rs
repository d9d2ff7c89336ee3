// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse};

/// Failure of the round trip itself. Fatal for every call carried by it.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Server responded with HTTP {0}")]
    Status(StatusCode),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Request cancelled")]
    Cancelled,
    #[error("Invalid JSON-RPC response: {0}")]
    InvalidResponse(String),
    #[error("Invalid transport configuration: {0}")]
    Config(String),
}

/// The connection to a node. Owns request framing on the wire, nothing else: identifiers are
/// assigned by the caller and replies are returned exactly as received.
#[async_trait::async_trait]
pub trait RpcTransport: Send + Sync {
    async fn call(
        &self,
        request: JsonRpcRequest,
        cancel: &CancellationToken,
    ) -> Result<JsonRpcResponse, TransportError>;

    /// Send every request in one round trip. Replies are correlated by id; their order is
    /// unspecified.
    async fn batch_call(
        &self,
        requests: Vec<JsonRpcRequest>,
        cancel: &CancellationToken,
    ) -> Result<Vec<JsonRpcResponse>, TransportError>;
}

/// JSON-RPC over HTTP POST.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    url: Url,
    client: Client,
    request_timeout: Duration,
}

impl HttpTransport {
    pub fn new(
        url: Url,
        request_timeout: Duration,
        headers: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, TransportError> {
        let mut header_map = HeaderMap::new();
        header_map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in headers {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| TransportError::Config(format!("header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|e| TransportError::Config(format!("header {name}: {e}")))?;
            header_map.insert(name, value);
        }

        let client = Client::builder()
            .default_headers(header_map)
            .timeout(request_timeout)
            .build()
            .map_err(|e| TransportError::Config(e.to_string()))?;

        Ok(Self {
            url,
            client,
            request_timeout,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn post<B, R>(&self, body: &B, cancel: &CancellationToken) -> Result<R, TransportError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let send = async {
            let response = self
                .client
                .post(self.url.clone())
                .json(body)
                .send()
                .await
                .map_err(|e| self.request_error(e))?;

            match response.status() {
                code if code.is_success() => {
                    response.bytes().await.map_err(|e| self.request_error(e))
                }
                code => {
                    debug!(url = %self.url, %code, "JSON-RPC request rejected");
                    Err(TransportError::Status(code))
                }
            }
        };

        let bytes = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TransportError::Cancelled),
            bytes = send => bytes?,
        };

        serde_json::from_slice(&bytes).map_err(|e| TransportError::InvalidResponse(e.to_string()))
    }

    fn request_error(&self, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout(self.request_timeout)
        } else {
            TransportError::Http {
                url: self.url.to_string(),
                source: error,
            }
        }
    }
}

#[async_trait::async_trait]
impl RpcTransport for HttpTransport {
    async fn call(
        &self,
        request: JsonRpcRequest,
        cancel: &CancellationToken,
    ) -> Result<JsonRpcResponse, TransportError> {
        let response: JsonRpcResponse = self.post(&request, cancel).await?;
        // Servers answer with a null id when they could not parse the request at all.
        if response.id.is_some() && response.id != Some(request.id) {
            return Err(TransportError::InvalidResponse(format!(
                "expected reply to request {}, got {:?}",
                request.id, response.id
            )));
        }
        Ok(response)
    }

    async fn batch_call(
        &self,
        requests: Vec<JsonRpcRequest>,
        cancel: &CancellationToken,
    ) -> Result<Vec<JsonRpcResponse>, TransportError> {
        let reply: Value = self.post(&requests, cancel).await?;
        match reply {
            Value::Array(_) => serde_json::from_value(reply)
                .map_err(|e| TransportError::InvalidResponse(e.to_string())),
            // A batch answered by a single object means the server refused the batch as a whole.
            Value::Object(_) => {
                let response: JsonRpcResponse = serde_json::from_value(reply)
                    .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;
                let reason = match response.error {
                    Some(error) => format!("batch rejected ({}): {}", error.code, error.message),
                    None => "expected an array of replies to a batch".to_owned(),
                };
                Err(TransportError::InvalidResponse(reason))
            }
            other => Err(TransportError::InvalidResponse(format!(
                "unexpected batch reply {other}"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "unit_tests/transport_tests.rs"]
mod transport_tests;
