// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 60_000;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfig {
    /// Full node JSON-RPC endpoint.
    pub rpc_url: String,

    /// Upper bound on one round trip, batches included.
    ///
    /// Defaults to 60 seconds if not specified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,

    /// Extra HTTP headers sent with every request.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl ClientConfig {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            ..Default::default()
        }
    }

    pub fn rpc_url(&self) -> anyhow::Result<Url> {
        Url::parse(&self.rpc_url).with_context(|| format!("invalid rpc-url {:?}", self.rpc_url))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(
            self.request_timeout_ms
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
        )
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        debug!("Reading client config from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read client config {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("unable to parse client config {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        debug!("Writing client config to {:?}", path);
        let contents = serde_yaml::to_string(self)?;
        fs::write(path, contents)
            .with_context(|| format!("unable to write client config {}", path.display()))
    }
}

#[cfg(test)]
#[path = "unit_tests/config_tests.rs"]
mod config_tests;
