// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use sui_jsonrpc_client::config::ClientConfig;
use sui_jsonrpc_client::types::coin::SUI_COIN_TYPE;
use sui_jsonrpc_client::types::SuiAddress;
use sui_jsonrpc_client::{SuiClientBuilder, DEVNET_URL};
use tracing::{info, warn};
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    FmtSubscriber,
};

/// List the coins of one type owned by an address.
#[derive(Parser, Debug)]
#[command(author = "build@mystenlabs.com", version, about, long_about = None)]
struct Args {
    /// Full node JSON-RPC endpoint.
    #[clap(long, default_value = DEVNET_URL)]
    rpc_url: String,

    /// YAML client config. Takes precedence over `--rpc-url`.
    #[clap(long)]
    config: Option<PathBuf>,

    #[clap(long)]
    address: SuiAddress,

    /// Inner coin type, e.g. `0x2::sui::SUI`.
    #[clap(long, default_value = SUI_COIN_TYPE)]
    coin_type: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let client = match &args.config {
        Some(path) => SuiClientBuilder::build_from_config(&ClientConfig::load(path)?).await?,
        None => SuiClientBuilder::default().build(&args.rpc_url).await?,
    };

    let listing = client
        .coin_read_api()
        .get_coins_owned_by_address(args.address, &args.coin_type)
        .await?;
    for coin in &listing.coins {
        println!(
            "{} v{} balance {}",
            coin.reference.object_id, coin.reference.version, coin.balance
        );
    }
    for failure in &listing.failures {
        warn!("{failure}");
    }
    info!(
        address = %args.address,
        coins = listing.coins.len(),
        failed = listing.failures.len(),
        total = listing.total_balance(),
        "Listed coins"
    );
    Ok(())
}
