// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use sui_jsonrpc_types::base_types::{ObjectID, SuiAddress, TransactionDigest};
use sui_jsonrpc_types::coin::{coin_type_tag, total_balance, Coin, SUI_COIN_TYPE};
use sui_jsonrpc_types::object::{ObjectRead, SuiObject, SuiObjectInfo};
use sui_jsonrpc_types::transaction::{
    ExecuteTransactionRequestType, ExecuteTransactionResponse, RPCTransactionRequestParams,
    SignedTransaction, TransactionBytes, TransactionEffects, TransactionResponse,
};
use tracing::{debug, warn};

use crate::batch::{BatchElement, ElementError};
use crate::error::{Error, FetchPhase, SuiRpcResult};
use crate::{rpc_params, RpcClient};

#[derive(Debug, Clone)]
pub struct ReadApi {
    api: Arc<RpcClient>,
}

impl ReadApi {
    pub(crate) fn new(api: Arc<RpcClient>) -> Self {
        Self { api }
    }

    pub async fn get_object(&self, object_id: ObjectID) -> SuiRpcResult<ObjectRead> {
        self.api.request("sui_getObject", rpc_params![object_id]).await
    }

    pub async fn get_raw_object(&self, object_id: ObjectID) -> SuiRpcResult<ObjectRead> {
        self.api
            .request("sui_getRawObject", rpc_params![object_id])
            .await
    }

    pub async fn get_objects_owned_by_address(
        &self,
        address: SuiAddress,
    ) -> SuiRpcResult<Vec<SuiObjectInfo>> {
        self.api
            .request("sui_getObjectsOwnedByAddress", rpc_params![address])
            .await
    }

    pub async fn get_objects_owned_by_object(
        &self,
        object_id: ObjectID,
    ) -> SuiRpcResult<Vec<SuiObjectInfo>> {
        self.api
            .request("sui_getObjectsOwnedByObject", rpc_params![object_id])
            .await
    }

    pub async fn get_total_transaction_number(&self) -> SuiRpcResult<u64> {
        self.api
            .request("sui_getTotalTransactionNumber", rpc_params![])
            .await
    }

    /// Digests of the transactions with sequence numbers in `[start, end)`.
    pub async fn get_transactions_in_range(
        &self,
        start: u64,
        end: u64,
    ) -> SuiRpcResult<Vec<TransactionDigest>> {
        self.api
            .request("sui_getTransactionsInRange", rpc_params![start, end])
            .await
    }

    pub async fn get_transaction(
        &self,
        digest: TransactionDigest,
    ) -> SuiRpcResult<TransactionResponse> {
        self.api
            .request("sui_getTransaction", rpc_params![digest])
            .await
    }

    pub async fn dry_run_transaction(
        &self,
        tx: &TransactionBytes,
    ) -> SuiRpcResult<TransactionEffects> {
        self.api
            .request("sui_dryRunTransaction", rpc_params![tx.tx_bytes])
            .await
    }

    /// Object summaries owned by `address` that pass `filter`, in listing order.
    pub async fn list_filtered_objects<F>(
        &self,
        address: SuiAddress,
        filter: F,
    ) -> SuiRpcResult<Vec<SuiObjectInfo>>
    where
        F: Fn(&SuiObjectInfo) -> bool,
    {
        let summaries = self
            .get_objects_owned_by_address(address)
            .await
            .map_err(|e| e.in_phase(FetchPhase::Listing))?;
        let listed = summaries.len();
        let selected: Vec<_> = summaries.into_iter().filter(|info| filter(info)).collect();
        debug!(
            %address,
            listed,
            selected = selected.len(),
            "Listed owned objects"
        );
        Ok(selected)
    }

    /// List the objects owned by `address`, keep those accepted by `filter` and fetch their
    /// bodies in a single batch. Bodies come back in listing order.
    pub async fn batch_get_filtered_objects_owned_by_address<F>(
        &self,
        address: SuiAddress,
        filter: F,
    ) -> SuiRpcResult<Vec<ObjectRead>>
    where
        F: Fn(&SuiObjectInfo) -> bool,
    {
        let selected = self.list_filtered_objects(address, filter).await?;
        self.batch_fetch_objects(selected.iter().map(|info| info.object_id))
            .await
    }

    /// Same as [`ReadApi::batch_get_filtered_objects_owned_by_address`] with an exact match on the
    /// object type. Surrounding whitespace is ignored and an empty filter accepts every object.
    pub async fn get_objects_owned_by_address_with_type(
        &self,
        address: SuiAddress,
        type_filter: &str,
    ) -> SuiRpcResult<Vec<ObjectRead>> {
        let type_filter = type_filter.trim();
        self.batch_get_filtered_objects_owned_by_address(address, |info| {
            type_filter.is_empty() || info.type_ == type_filter
        })
        .await
    }

    /// Fetch object bodies in one round trip, positionally aligned with `object_ids`.
    ///
    /// Any failed element fails the whole fetch with that element's error.
    pub async fn batch_fetch_objects(
        &self,
        object_ids: impl IntoIterator<Item = ObjectID>,
    ) -> SuiRpcResult<Vec<ObjectRead>> {
        let mut batch: Vec<BatchElement<ObjectRead>> = batch_of("sui_getObject", object_ids)?;
        if batch.is_empty() {
            return Ok(vec![]);
        }

        self.api
            .batch(&mut batch)
            .await
            .map_err(|e| e.in_phase(FetchPhase::Fetch))?;

        batch
            .into_iter()
            .map(|element| {
                let method = element.method().to_owned();
                element.into_result().map_err(|source| {
                    Error::Element { method, source }.in_phase(FetchPhase::Fetch)
                })
            })
            .collect()
    }

    /// Fetch many objects in one round trip. Each id keeps its own outcome.
    pub async fn multi_get_objects(
        &self,
        object_ids: &[ObjectID],
    ) -> SuiRpcResult<HashMap<ObjectID, Result<ObjectRead, ElementError>>> {
        let mut ids = object_ids.to_vec();
        ids.sort();
        ids.dedup();
        let mut batch: Vec<BatchElement<ObjectRead>> = batch_of("sui_getObject", &ids)?;
        self.api.batch(&mut batch).await?;
        Ok(ids
            .into_iter()
            .zip(batch.into_iter().map(BatchElement::into_result))
            .collect())
    }

    /// Fetch many transactions in one round trip. Each digest keeps its own outcome.
    pub async fn multi_get_transactions(
        &self,
        digests: &[TransactionDigest],
    ) -> SuiRpcResult<HashMap<TransactionDigest, Result<TransactionResponse, ElementError>>> {
        let mut digests = digests.to_vec();
        digests.sort();
        digests.dedup();
        let mut batch: Vec<BatchElement<TransactionResponse>> =
            batch_of("sui_getTransaction", &digests)?;
        self.api.batch(&mut batch).await?;
        Ok(digests
            .into_iter()
            .zip(batch.into_iter().map(BatchElement::into_result))
            .collect())
    }
}

/// One call to `method` per argument.
fn batch_of<T, A>(
    method: &str,
    args: impl IntoIterator<Item = A>,
) -> SuiRpcResult<Vec<BatchElement<T>>>
where
    A: Serialize,
{
    let mut batch = vec![];
    for arg in args {
        batch.push(BatchElement::new(method, rpc_params![arg]));
    }
    Ok(batch)
}

#[derive(Debug, Clone)]
pub struct CoinReadApi {
    read_api: ReadApi,
}

impl CoinReadApi {
    pub(crate) fn new(api: Arc<RpcClient>) -> Self {
        Self {
            read_api: ReadApi::new(api),
        }
    }

    /// Coins of `0x2::coin::Coin<coin_type>` owned by `owner`.
    ///
    /// Objects that no longer exist are skipped. A coin whose balance cannot be read is recorded
    /// in [`CoinListing::failures`] and does not affect its siblings; the call only fails when
    /// every existing object failed extraction.
    pub async fn get_coins_owned_by_address(
        &self,
        owner: SuiAddress,
        coin_type: &str,
    ) -> SuiRpcResult<CoinListing> {
        let coin_type = coin_type_tag(coin_type);
        let objects = self
            .read_api
            .get_objects_owned_by_address_with_type(owner, &coin_type)
            .await?;

        let mut listing = CoinListing::default();
        let mut skipped = 0usize;
        for object in objects {
            match object {
                ObjectRead::Exists(object) => match extract_coin(object, &coin_type) {
                    Ok(coin) => listing.coins.push(coin),
                    Err(e) => {
                        warn!(%owner, %coin_type, error = %e, "Unable to extract coin");
                        listing.failures.push(e);
                    }
                },
                ObjectRead::NotExists(_) | ObjectRead::Deleted(_) => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!(%owner, %coin_type, skipped, "Skipped coin objects that no longer exist");
        }

        if listing.coins.is_empty() && !listing.failures.is_empty() {
            let first = listing.failures.swap_remove(0);
            return Err(first.in_phase(FetchPhase::Extraction));
        }
        Ok(listing)
    }

    pub async fn get_sui_coins_owned_by_address(
        &self,
        owner: SuiAddress,
    ) -> SuiRpcResult<CoinListing> {
        self.get_coins_owned_by_address(owner, SUI_COIN_TYPE).await
    }
}

/// Coins read from an owner's objects, plus the objects whose balance could not be read.
#[derive(Debug, Default)]
pub struct CoinListing {
    pub coins: Vec<Coin>,
    /// One entry per object, in listing order.
    pub failures: Vec<Error>,
}

impl CoinListing {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total_balance(&self) -> u128 {
        total_balance(&self.coins)
    }

    pub fn into_coins(self) -> Vec<Coin> {
        self.coins
    }
}

/// Reads the balance at `data.fields.balance`, a base-10 string.
pub(crate) fn extract_coin(object: SuiObject, coin_type: &str) -> SuiRpcResult<Coin> {
    let object_id = object.id();
    let fields = match object.data.get("fields") {
        Some(Value::Object(fields)) => fields,
        Some(other) => {
            return Err(Error::UnexpectedFieldShape {
                object_id,
                reason: format!("`fields` is not an object: {other}"),
            })
        }
        None => {
            return Err(Error::UnexpectedFieldShape {
                object_id,
                reason: "missing `fields`".to_owned(),
            })
        }
    };

    let balance = match fields.get("balance") {
        Some(Value::String(balance)) => balance,
        Some(other) => {
            return Err(Error::InvalidBalanceEncoding {
                object_id,
                value: other.to_string(),
                reason: "expected a decimal string".to_owned(),
            })
        }
        None => return Err(Error::MissingBalanceField { object_id }),
    };
    let invalid = |reason: String| Error::InvalidBalanceEncoding {
        object_id,
        value: balance.clone(),
        reason,
    };
    if !balance.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("not a base-10 unsigned integer".to_owned()));
    }
    let balance = balance.parse::<u64>().map_err(|e| invalid(e.to_string()))?;

    Ok(Coin {
        balance,
        coin_type: coin_type.to_owned(),
        owner: object.owner,
        previous_transaction: object.previous_transaction,
        reference: object.reference,
    })
}

/// Asks the node to build unsigned transactions.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    api: Arc<RpcClient>,
}

impl TransactionBuilder {
    pub(crate) fn new(api: Arc<RpcClient>) -> Self {
        Self { api }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn move_call(
        &self,
        signer: SuiAddress,
        package_object_id: ObjectID,
        module: &str,
        function: &str,
        type_arguments: Vec<String>,
        arguments: Vec<Value>,
        gas: Option<ObjectID>,
        gas_budget: u64,
    ) -> SuiRpcResult<TransactionBytes> {
        self.api
            .request(
                "sui_moveCall",
                rpc_params![
                    signer,
                    package_object_id,
                    module,
                    function,
                    type_arguments,
                    arguments,
                    gas,
                    gas_budget
                ],
            )
            .await
    }

    pub async fn split_coin(
        &self,
        signer: SuiAddress,
        coin_object_id: ObjectID,
        split_amounts: Vec<u64>,
        gas: Option<ObjectID>,
        gas_budget: u64,
    ) -> SuiRpcResult<TransactionBytes> {
        self.api
            .request(
                "sui_splitCoin",
                rpc_params![signer, coin_object_id, split_amounts, gas, gas_budget],
            )
            .await
    }

    pub async fn split_coin_equal(
        &self,
        signer: SuiAddress,
        coin_object_id: ObjectID,
        split_count: u64,
        gas: Option<ObjectID>,
        gas_budget: u64,
    ) -> SuiRpcResult<TransactionBytes> {
        self.api
            .request(
                "sui_splitCoinEqual",
                rpc_params![signer, coin_object_id, split_count, gas, gas_budget],
            )
            .await
    }

    pub async fn merge_coins(
        &self,
        signer: SuiAddress,
        primary_coin: ObjectID,
        coin_to_merge: ObjectID,
        gas: Option<ObjectID>,
        gas_budget: u64,
    ) -> SuiRpcResult<TransactionBytes> {
        self.api
            .request(
                "sui_mergeCoins",
                rpc_params![signer, primary_coin, coin_to_merge, gas, gas_budget],
            )
            .await
    }

    pub async fn transfer_object(
        &self,
        signer: SuiAddress,
        object_id: ObjectID,
        gas: Option<ObjectID>,
        gas_budget: u64,
        recipient: SuiAddress,
    ) -> SuiRpcResult<TransactionBytes> {
        self.api
            .request(
                "sui_transferObject",
                rpc_params![signer, object_id, gas, gas_budget, recipient],
            )
            .await
    }

    /// The SUI object also pays for gas. Without `amount` the whole coin is sent.
    pub async fn transfer_sui(
        &self,
        signer: SuiAddress,
        sui_object_id: ObjectID,
        gas_budget: u64,
        recipient: SuiAddress,
        amount: Option<u64>,
    ) -> SuiRpcResult<TransactionBytes> {
        self.api
            .request(
                "sui_transferSui",
                rpc_params![signer, sui_object_id, gas_budget, recipient, amount],
            )
            .await
    }

    pub async fn pay_all_sui(
        &self,
        signer: SuiAddress,
        input_coins: Vec<ObjectID>,
        recipient: SuiAddress,
        gas_budget: u64,
    ) -> SuiRpcResult<TransactionBytes> {
        self.api
            .request(
                "sui_payAllSui",
                rpc_params![signer, input_coins, recipient, gas_budget],
            )
            .await
    }

    pub async fn batch_transaction(
        &self,
        signer: SuiAddress,
        single_transaction_params: Vec<RPCTransactionRequestParams>,
        gas: Option<ObjectID>,
        gas_budget: u64,
    ) -> SuiRpcResult<TransactionBytes> {
        self.api
            .request(
                "sui_batchTransaction",
                rpc_params![signer, single_transaction_params, gas, gas_budget],
            )
            .await
    }
}

#[derive(Debug, Clone)]
pub struct QuorumDriverApi {
    api: Arc<RpcClient>,
}

impl QuorumDriverApi {
    pub(crate) fn new(api: Arc<RpcClient>) -> Self {
        Self { api }
    }

    pub async fn execute_transaction(
        &self,
        tx: SignedTransaction,
        request_type: ExecuteTransactionRequestType,
    ) -> SuiRpcResult<ExecuteTransactionResponse> {
        debug!(?request_type, scheme = %tx.sig_scheme, "Executing signed transaction");
        self.api
            .request(
                "sui_executeTransaction",
                rpc_params![
                    tx.tx_bytes,
                    tx.sig_scheme,
                    tx.signature,
                    tx.pub_key,
                    request_type
                ],
            )
            .await
    }
}

#[cfg(test)]
#[path = "unit_tests/apis_tests.rs"]
mod apis_tests;
