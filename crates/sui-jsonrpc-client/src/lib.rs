// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Client for the Sui full node JSON-RPC API.
//!
//! ```no_run
//! use sui_jsonrpc_client::SuiClientBuilder;
//! use sui_jsonrpc_client::types::SuiAddress;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = SuiClientBuilder::default().build_devnet().await?;
//! let owner: SuiAddress = "0x7d20dcdb2bca4f508ea9613994683eb4e76e9c4e".parse()?;
//! let listing = client.coin_read_api().get_sui_coins_owned_by_address(owner).await?;
//! println!("{} coins, total {}", listing.coins.len(), listing.total_balance());
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

use crate::apis::{CoinReadApi, QuorumDriverApi, ReadApi, TransactionBuilder};
use crate::batch::{BatchCorrelator, BatchElement, ElementError};
use crate::config::ClientConfig;
use crate::error::{Error, SuiRpcResult};
use crate::jsonrpc::RequestIdManager;
use crate::transport::{HttpTransport, RpcTransport, TransportError};

pub mod apis;
pub mod batch;
pub mod config;
pub mod error;
pub mod jsonrpc;
pub mod transport;

#[cfg(test)]
#[path = "unit_tests/mock_transport.rs"]
pub(crate) mod mock_transport;

pub use sui_jsonrpc_types as types;

pub const DEVNET_URL: &str = "https://fullnode.devnet.sui.io";
pub const TESTNET_URL: &str = "https://fullnode.testnet.sui.io";

/// Shared by every API group of one client.
pub(crate) struct RpcClient {
    transport: Arc<dyn RpcTransport>,
    ids: Arc<RequestIdManager>,
    correlator: BatchCorrelator,
    cancel: CancellationToken,
}

impl RpcClient {
    fn new(
        transport: Arc<dyn RpcTransport>,
        ids: Arc<RequestIdManager>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            correlator: BatchCorrelator::new(transport.clone(), ids.clone()),
            transport,
            ids,
            cancel,
        }
    }

    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> SuiRpcResult<T> {
        let request = self.ids.request(method, params);
        debug!(method, id = request.id, "Sending JSON-RPC request");
        let reply = self.transport.call(request, &self.cancel).await?;
        ElementError::from_reply(reply).map_err(|source| Error::Element {
            method: method.to_owned(),
            source,
        })
    }

    pub(crate) async fn batch<T>(&self, batch: &mut [BatchElement<T>]) -> SuiRpcResult
    where
        T: DeserializeOwned + Send,
    {
        Ok(self.correlator.execute(batch, &self.cancel).await?)
    }
}

impl Debug for RpcClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct SuiClient {
    api: Arc<RpcClient>,
    read_api: ReadApi,
    coin_read_api: CoinReadApi,
    transaction_builder: TransactionBuilder,
    quorum_driver_api: QuorumDriverApi,
}

impl SuiClient {
    /// Client over an arbitrary transport.
    pub fn with_transport(transport: Arc<dyn RpcTransport>) -> Self {
        Self::from_rpc_client(RpcClient::new(
            transport,
            Arc::new(RequestIdManager::new()),
            CancellationToken::new(),
        ))
    }

    fn from_rpc_client(api: RpcClient) -> Self {
        let api = Arc::new(api);
        Self {
            read_api: ReadApi::new(api.clone()),
            coin_read_api: CoinReadApi::new(api.clone()),
            transaction_builder: TransactionBuilder::new(api.clone()),
            quorum_driver_api: QuorumDriverApi::new(api.clone()),
            api,
        }
    }

    /// A handle on the same connection whose calls stop with [`TransportError::Cancelled`] once
    /// `cancel` fires. Request ids stay unique across both handles.
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self::from_rpc_client(RpcClient::new(
            self.api.transport.clone(),
            self.api.ids.clone(),
            cancel,
        ))
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.api.cancel
    }

    pub fn read_api(&self) -> &ReadApi {
        &self.read_api
    }

    pub fn coin_read_api(&self) -> &CoinReadApi {
        &self.coin_read_api
    }

    pub fn transaction_builder(&self) -> &TransactionBuilder {
        &self.transaction_builder
    }

    pub fn quorum_driver_api(&self) -> &QuorumDriverApi {
        &self.quorum_driver_api
    }

    /// Run caller-assembled calls in one round trip. Use `T = serde_json::Value` to mix methods.
    pub async fn batch_call<T>(&self, batch: &mut [BatchElement<T>]) -> SuiRpcResult
    where
        T: DeserializeOwned + Send,
    {
        self.api.batch(batch).await
    }
}

impl Debug for SuiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiClient").field("api", &self.api).finish()
    }
}

pub struct SuiClientBuilder {
    request_timeout: Duration,
    headers: BTreeMap<String, String>,
}

impl Default for SuiClientBuilder {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_millis(config::DEFAULT_REQUEST_TIMEOUT_MS),
            headers: BTreeMap::new(),
        }
    }
}

impl SuiClientBuilder {
    pub fn request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub async fn build(self, http: impl AsRef<str>) -> SuiRpcResult<SuiClient> {
        let http = http.as_ref();
        let url = Url::parse(http)
            .map_err(|e| TransportError::Config(format!("invalid url {http:?}: {e}")))?;
        info!(%url, timeout = ?self.request_timeout, "Connecting to Sui full node");
        let transport = HttpTransport::new(url, self.request_timeout, self.headers)?;
        Ok(SuiClient::with_transport(Arc::new(transport)))
    }

    pub async fn build_devnet(self) -> SuiRpcResult<SuiClient> {
        self.build(DEVNET_URL).await
    }

    pub async fn build_testnet(self) -> SuiRpcResult<SuiClient> {
        self.build(TESTNET_URL).await
    }

    pub async fn build_from_config(config: &ClientConfig) -> SuiRpcResult<SuiClient> {
        let builder = config
            .headers
            .iter()
            .fold(
                Self::default().request_timeout(config.request_timeout()),
                |builder, (name, value)| builder.header(name, value),
            );
        builder.build(&config.rpc_url).await
    }
}

#[cfg(test)]
#[path = "unit_tests/client_tests.rs"]
mod client_tests;
