// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use sui_jsonrpc_types::crypto::Ed25519KeyPair;
use sui_jsonrpc_types::object::ObjectStatus;
use sui_jsonrpc_types::owner::Owner;

use super::*;
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use crate::mock_transport::{ok, rpc_error, MockTransport};
use crate::SuiClient;

const OWNER: &str = "0x00000000000000000000000000000000000abcde";
const SUI_COIN: &str = "0x2::coin::Coin<0x2::sui::SUI>";
const OTHER_COIN: &str = "0x2::coin::Coin<0xabc::usdc::USDC>";

fn owner() -> SuiAddress {
    OWNER.parse().unwrap()
}

fn object_id(n: u8) -> ObjectID {
    let mut bytes = [0u8; 20];
    bytes[19] = n;
    ObjectID::new(bytes)
}

fn summary(id: ObjectID, type_: &str) -> Value {
    json!({
        "objectId": id,
        "version": 1,
        "digest": format!("digest-{id}"),
        "type": type_,
        "owner": { "AddressOwner": OWNER },
        "previousTransaction": "prev-tx"
    })
}

fn object_with_fields(id: ObjectID, fields: Value) -> Value {
    json!({
        "status": "Exists",
        "details": {
            "data": { "dataType": "moveObject", "type": SUI_COIN, "fields": fields },
            "owner": { "AddressOwner": OWNER },
            "previousTransaction": "prev-tx",
            "storageRebate": 0,
            "reference": { "digest": format!("digest-{id}"), "objectId": id, "version": 1 }
        }
    })
}

fn coin_object(id: ObjectID, balance: Value) -> Value {
    object_with_fields(id, json!({ "balance": balance, "id": { "id": id } }))
}

fn deleted_object(id: ObjectID) -> Value {
    json!({
        "status": "Deleted",
        "details": { "digest": "gone", "objectId": id, "version": 2 }
    })
}

/// A node owning `summaries` whose object bodies are `objects`, keyed by id.
fn fake_node(summaries: Vec<Value>, objects: Vec<(ObjectID, Value)>) -> Arc<MockTransport> {
    let objects: HashMap<String, Value> = objects
        .into_iter()
        .map(|(id, body)| (id.to_string(), body))
        .collect();
    Arc::new(MockTransport::new(move |request: &JsonRpcRequest| {
        match request.method.as_str() {
            "sui_getObjectsOwnedByAddress" => ok(request, Value::Array(summaries.clone())),
            "sui_getObject" => match request.params[0].as_str().and_then(|id| objects.get(id)) {
                Some(body) => ok(request, body.clone()),
                None => rpc_error(request, -32000, "object not found"),
            },
            _ => rpc_error(request, -32601, "method not found"),
        }
    }))
}

fn client(transport: &Arc<MockTransport>) -> SuiClient {
    SuiClient::with_transport(transport.clone())
}

#[tokio::test]
async fn test_sui_coins_end_to_end() {
    let transport = fake_node(
        vec![summary(object_id(1), SUI_COIN), summary(object_id(2), OTHER_COIN)],
        vec![
            (object_id(1), coin_object(object_id(1), json!("12345"))),
            (object_id(2), coin_object(object_id(2), json!("1"))),
        ],
    );

    let coins = client(&transport)
        .coin_read_api()
        .get_sui_coins_owned_by_address(owner())
        .await
        .unwrap()
        .into_coins();

    assert_eq!(coins.len(), 1);
    let coin = &coins[0];
    assert_eq!(coin.balance, 12345);
    assert_eq!(coin.coin_type, SUI_COIN);
    assert_eq!(coin.owner, Owner::AddressOwner(owner()));
    assert_eq!(coin.previous_transaction, "prev-tx");
    assert_eq!(coin.object_ref().object_id, object_id(1));

    // One listing call, then one batch carrying only the SUI coin.
    let round_trips = transport.round_trips();
    assert_eq!(round_trips.len(), 2);
    assert_eq!(round_trips[0][0].method, "sui_getObjectsOwnedByAddress");
    assert_eq!(round_trips[1].len(), 1);
    assert_eq!(round_trips[1][0].params, vec![json!(object_id(1))]);
}

#[tokio::test]
async fn test_custom_coin_type() {
    let transport = fake_node(
        vec![summary(object_id(1), SUI_COIN), summary(object_id(2), OTHER_COIN)],
        vec![
            (object_id(1), coin_object(object_id(1), json!("5"))),
            (object_id(2), coin_object(object_id(2), json!("18446744073709551615"))),
        ],
    );

    let coins = client(&transport)
        .coin_read_api()
        .get_coins_owned_by_address(owner(), "0xabc::usdc::USDC")
        .await
        .unwrap()
        .into_coins();

    assert_eq!(coins.len(), 1);
    assert_eq!(coins[0].balance, u64::MAX);
    assert_eq!(coins[0].coin_type, OTHER_COIN);
}

#[tokio::test]
async fn test_objects_that_no_longer_exist_are_skipped() {
    let transport = fake_node(
        vec![
            summary(object_id(1), SUI_COIN),
            summary(object_id(2), SUI_COIN),
            summary(object_id(3), SUI_COIN),
        ],
        vec![
            (object_id(1), deleted_object(object_id(1))),
            (object_id(2), coin_object(object_id(2), json!("7"))),
            (
                object_id(3),
                json!({ "status": "NotExists", "details": object_id(3) }),
            ),
        ],
    );

    let coins = client(&transport)
        .coin_read_api()
        .get_sui_coins_owned_by_address(owner())
        .await
        .unwrap()
        .into_coins();

    assert_eq!(coins.len(), 1);
    assert_eq!(coins[0].balance, 7);
}

#[tokio::test]
async fn test_no_matching_objects_skips_the_fetch() {
    let transport = fake_node(vec![summary(object_id(2), OTHER_COIN)], vec![]);

    let coins = client(&transport)
        .coin_read_api()
        .get_sui_coins_owned_by_address(owner())
        .await
        .unwrap()
        .into_coins();

    assert!(coins.is_empty());
    assert_eq!(transport.round_trips().len(), 1);
}

#[tokio::test]
async fn fail_on_missing_balance_field() {
    let transport = fake_node(
        vec![summary(object_id(1), SUI_COIN)],
        vec![(
            object_id(1),
            object_with_fields(object_id(1), json!({ "value": "3" })),
        )],
    );

    let error = client(&transport)
        .coin_read_api()
        .get_sui_coins_owned_by_address(owner())
        .await
        .unwrap_err();

    assert_eq!(error.phase(), Some(FetchPhase::Extraction));
    match error.root_cause() {
        Error::MissingBalanceField { object_id: id } => assert_eq!(*id, object_id(1)),
        other => panic!("unexpected error {other}"),
    }
}

#[tokio::test]
async fn fail_on_invalid_balance_encoding() {
    for balance in [
        json!("12a"),
        json!("-1"),
        json!("+5"),
        json!(""),
        json!("18446744073709551616"),
        json!(12345),
    ] {
        let transport = fake_node(
            vec![summary(object_id(1), SUI_COIN)],
            vec![(object_id(1), coin_object(object_id(1), balance.clone()))],
        );

        let error = client(&transport)
            .coin_read_api()
            .get_sui_coins_owned_by_address(owner())
            .await
            .unwrap_err();

        assert_eq!(error.phase(), Some(FetchPhase::Extraction));
        assert!(
            matches!(error.root_cause(), Error::InvalidBalanceEncoding { .. }),
            "{balance}: {error}"
        );
    }
}

#[tokio::test]
async fn fail_on_unexpected_field_shape() {
    let transport = fake_node(
        vec![summary(object_id(1), SUI_COIN)],
        vec![(object_id(1), object_with_fields(object_id(1), json!("opaque")))],
    );

    let error = client(&transport)
        .coin_read_api()
        .get_sui_coins_owned_by_address(owner())
        .await
        .unwrap_err();

    assert!(
        matches!(error.root_cause(), Error::UnexpectedFieldShape { .. }),
        "{error}"
    );
}

#[tokio::test]
async fn test_bad_coin_does_not_drop_its_siblings() {
    let transport = fake_node(
        vec![
            summary(object_id(1), SUI_COIN),
            summary(object_id(2), SUI_COIN),
            summary(object_id(3), SUI_COIN),
        ],
        vec![
            (object_id(1), coin_object(object_id(1), json!("500"))),
            (
                object_id(2),
                object_with_fields(object_id(2), json!({ "value": "3" })),
            ),
            (object_id(3), coin_object(object_id(3), json!("0x10"))),
        ],
    );

    let listing = client(&transport)
        .coin_read_api()
        .get_sui_coins_owned_by_address(owner())
        .await
        .unwrap();

    assert!(!listing.is_complete());
    assert_eq!(listing.coins.len(), 1);
    assert_eq!(listing.coins[0].balance, 500);
    assert_eq!(listing.total_balance(), 500);
    assert_eq!(listing.failures.len(), 2);
    match &listing.failures[0] {
        Error::MissingBalanceField { object_id: id } => assert_eq!(*id, object_id(2)),
        other => panic!("unexpected error {other}"),
    }
    match &listing.failures[1] {
        Error::InvalidBalanceEncoding { object_id: id, .. } => assert_eq!(*id, object_id(3)),
        other => panic!("unexpected error {other}"),
    }
}

#[tokio::test]
async fn fail_when_every_coin_is_malformed() {
    let transport = fake_node(
        vec![
            summary(object_id(1), SUI_COIN),
            summary(object_id(2), SUI_COIN),
            summary(object_id(3), SUI_COIN),
        ],
        vec![
            (object_id(1), deleted_object(object_id(1))),
            (object_id(2), coin_object(object_id(2), json!("-2"))),
            (
                object_id(3),
                object_with_fields(object_id(3), json!({ "value": "3" })),
            ),
        ],
    );

    let error = client(&transport)
        .coin_read_api()
        .get_sui_coins_owned_by_address(owner())
        .await
        .unwrap_err();

    assert_eq!(error.phase(), Some(FetchPhase::Extraction));
    match error.root_cause() {
        Error::InvalidBalanceEncoding { object_id: id, .. } => assert_eq!(*id, object_id(2)),
        other => panic!("unexpected error {other}"),
    }
}

#[tokio::test]
async fn fail_on_listing_error() {
    let transport = Arc::new(MockTransport::new(|request| {
        rpc_error(request, -32602, "invalid address")
    }));

    let error = client(&transport)
        .coin_read_api()
        .get_sui_coins_owned_by_address(owner())
        .await
        .unwrap_err();

    assert_eq!(error.phase(), Some(FetchPhase::Listing));
    assert!(matches!(
        error.root_cause(),
        Error::Element {
            source: ElementError::Rpc { code: -32602, .. },
            ..
        }
    ));
}

#[tokio::test]
async fn fail_on_fetch_element_error() {
    // The second summary has no body on the node.
    let transport = fake_node(
        vec![summary(object_id(1), SUI_COIN), summary(object_id(2), SUI_COIN)],
        vec![(object_id(1), coin_object(object_id(1), json!("1")))],
    );

    let error = client(&transport)
        .read_api()
        .get_objects_owned_by_address_with_type(owner(), SUI_COIN)
        .await
        .unwrap_err();

    assert_eq!(error.phase(), Some(FetchPhase::Fetch));
    match error.root_cause() {
        Error::Element { method, source } => {
            assert_eq!(method, "sui_getObject");
            assert!(matches!(source, ElementError::Rpc { code: -32000, .. }));
        }
        other => panic!("unexpected error {other}"),
    }
}

#[tokio::test]
async fn test_type_filter_is_trimmed_and_empty_accepts_all() {
    let transport = fake_node(
        vec![summary(object_id(1), SUI_COIN), summary(object_id(2), OTHER_COIN)],
        vec![
            (object_id(1), coin_object(object_id(1), json!("1"))),
            (object_id(2), coin_object(object_id(2), json!("2"))),
        ],
    );
    let read_api = client(&transport).read_api().clone();

    let filtered = read_api
        .get_objects_owned_by_address_with_type(owner(), &format!("  {SUI_COIN}\n"))
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].object_id(), object_id(1));

    let all = read_api
        .get_objects_owned_by_address_with_type(owner(), "   ")
        .await
        .unwrap();
    let ids: Vec<_> = all.iter().map(ObjectRead::object_id).collect();
    assert_eq!(ids, vec![object_id(1), object_id(2)]);
}

#[tokio::test]
async fn test_custom_filter_predicate() {
    let transport = fake_node(
        vec![summary(object_id(1), SUI_COIN), summary(object_id(2), OTHER_COIN)],
        vec![(object_id(2), coin_object(object_id(2), json!("2")))],
    );

    let objects = client(&transport)
        .read_api()
        .batch_get_filtered_objects_owned_by_address(owner(), |info| info.type_.contains("usdc"))
        .await
        .unwrap();

    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].object_id(), object_id(2));
}

#[tokio::test]
async fn test_multi_get_objects_keeps_per_object_outcomes() {
    let transport = fake_node(
        vec![],
        vec![(object_id(1), coin_object(object_id(1), json!("1")))],
    );
    let read_api = client(&transport).read_api().clone();

    let objects = read_api
        .multi_get_objects(&[object_id(1), object_id(9), object_id(1)])
        .await
        .unwrap();

    assert_eq!(objects.len(), 2);
    assert_eq!(
        objects[&object_id(1)].as_ref().unwrap().status(),
        ObjectStatus::Exists
    );
    assert!(matches!(
        objects[&object_id(9)],
        Err(ElementError::Rpc { code: -32000, .. })
    ));
    assert_eq!(transport.round_trips()[0].len(), 2);

    assert!(read_api.multi_get_objects(&[]).await.unwrap().is_empty());
    assert_eq!(transport.round_trips().len(), 1);
}

#[tokio::test]
async fn test_multi_get_transactions() {
    let transport = Arc::new(MockTransport::new(|request| {
        let digest = request.params[0].as_str().unwrap_or_default();
        ok(request, json!({ "certificate": { "transactionDigest": digest } }))
    }));
    let read_api = client(&transport).read_api().clone();

    let transactions = read_api
        .multi_get_transactions(&["tx-a".to_owned(), "tx-b".to_owned()])
        .await
        .unwrap();

    assert_eq!(transactions.len(), 2);
    assert_eq!(
        transactions["tx-b"].as_ref().unwrap()["certificate"]["transactionDigest"],
        "tx-b"
    );
    assert!(read_api.multi_get_transactions(&[]).await.unwrap().is_empty());
    assert_eq!(transport.round_trips().len(), 1);
}

fn unsigned_tx() -> Value {
    json!({
        "gas": { "digest": "gas-digest", "objectId": object_id(7), "version": 4 },
        "inputObjects": [],
        "txBytes": "VHJhbnNhY3Rpb25EYXRh"
    })
}

fn recording_node() -> Arc<MockTransport> {
    Arc::new(MockTransport::new(|request| ok(request, unsigned_tx())))
}

fn last_call(transport: &MockTransport) -> JsonRpcRequest {
    transport.round_trips().pop().unwrap().pop().unwrap()
}

#[tokio::test]
async fn test_transfer_wrappers_marshal_positional_params() {
    let transport = recording_node();
    let builder = client(&transport).transaction_builder().clone();
    let recipient = SuiAddress::from(object_id(8));

    let tx = builder
        .transfer_sui(owner(), object_id(1), 1000, recipient, Some(5))
        .await
        .unwrap();
    assert_eq!(tx.gas.object_id, object_id(7));
    assert_eq!(tx.tx_bytes.as_bytes(), b"TransactionData");
    let call = last_call(&transport);
    assert_eq!(call.method, "sui_transferSui");
    assert_eq!(
        call.params,
        vec![
            json!(OWNER),
            json!(object_id(1)),
            json!(1000),
            json!(recipient),
            json!(5)
        ]
    );

    builder
        .transfer_object(owner(), object_id(1), None, 500, recipient)
        .await
        .unwrap();
    let call = last_call(&transport);
    assert_eq!(call.method, "sui_transferObject");
    assert_eq!(
        call.params,
        vec![
            json!(OWNER),
            json!(object_id(1)),
            Value::Null,
            json!(500),
            json!(recipient)
        ]
    );

    builder
        .pay_all_sui(owner(), vec![object_id(1), object_id(2)], recipient, 300)
        .await
        .unwrap();
    let call = last_call(&transport);
    assert_eq!(call.method, "sui_payAllSui");
    assert_eq!(call.params[1], json!([object_id(1), object_id(2)]));
    assert_eq!(call.params[2], json!(recipient));
}

#[tokio::test]
async fn test_coin_and_move_call_wrappers() {
    let transport = recording_node();
    let builder = client(&transport).transaction_builder().clone();

    builder
        .split_coin(owner(), object_id(1), vec![10, 20], Some(object_id(3)), 100)
        .await
        .unwrap();
    let call = last_call(&transport);
    assert_eq!(call.method, "sui_splitCoin");
    assert_eq!(call.params[2], json!([10, 20]));
    assert_eq!(call.params[3], json!(object_id(3)));

    builder
        .split_coin_equal(owner(), object_id(1), 4, None, 100)
        .await
        .unwrap();
    assert_eq!(last_call(&transport).method, "sui_splitCoinEqual");

    builder
        .merge_coins(owner(), object_id(1), object_id(2), None, 100)
        .await
        .unwrap();
    let call = last_call(&transport);
    assert_eq!(call.method, "sui_mergeCoins");
    assert_eq!(call.params[1..3], [json!(object_id(1)), json!(object_id(2))]);

    builder
        .move_call(
            owner(),
            object_id(2),
            "devnet_nft",
            "mint",
            vec![],
            vec![json!("name"), json!("description")],
            None,
            1000,
        )
        .await
        .unwrap();
    let call = last_call(&transport);
    assert_eq!(call.method, "sui_moveCall");
    assert_eq!(call.params.len(), 8);
    assert_eq!(call.params[2], json!("devnet_nft"));
    assert_eq!(call.params[5], json!(["name", "description"]));

    builder
        .batch_transaction(
            owner(),
            vec![RPCTransactionRequestParams::TransferObjectRequestParams(
                sui_jsonrpc_types::transaction::TransferObjectParams {
                    recipient: owner(),
                    object_id: object_id(1),
                },
            )],
            None,
            1000,
        )
        .await
        .unwrap();
    let call = last_call(&transport);
    assert_eq!(call.method, "sui_batchTransaction");
    assert_eq!(
        call.params[1][0]["transferObjectRequestParams"]["objectId"],
        json!(object_id(1))
    );
}

#[tokio::test]
async fn test_execute_signed_transaction() {
    let transport = Arc::new(MockTransport::new(|request| {
        ok(request, json!({ "EffectsCert": { "effects": {} } }))
    }));
    let client = client(&transport);
    let key = Ed25519KeyPair::generate(&mut StdRng::seed_from_u64(3));
    let tx: TransactionBytes = serde_json::from_value(unsigned_tx()).unwrap();
    let signed = tx.sign_with(&key);

    let response = client
        .quorum_driver_api()
        .execute_transaction(
            signed.clone(),
            ExecuteTransactionRequestType::WaitForLocalExecution,
        )
        .await
        .unwrap();
    assert!(response.get("EffectsCert").is_some());

    let call = last_call(&transport);
    assert_eq!(call.method, "sui_executeTransaction");
    assert_eq!(
        call.params,
        vec![
            json!(signed.tx_bytes),
            json!("ED25519"),
            json!(signed.signature),
            json!(signed.pub_key),
            json!("WaitForLocalExecution"),
        ]
    );
}

#[tokio::test]
async fn test_read_wrappers() {
    let transport = Arc::new(MockTransport::new(|request| {
        match request.method.as_str() {
            "sui_getTotalTransactionNumber" => ok(request, json!(42)),
            "sui_getTransactionsInRange" => ok(request, json!(["tx-0", "tx-1"])),
            "sui_getObjectsOwnedByObject" => ok(request, json!([])),
            "sui_dryRunTransaction" => ok(request, json!({ "status": { "status": "success" } })),
            _ => rpc_error(request, -32601, "method not found"),
        }
    }));
    let read_api = client(&transport).read_api().clone();

    assert_eq!(read_api.get_total_transaction_number().await.unwrap(), 42);
    assert_eq!(
        read_api.get_transactions_in_range(0, 2).await.unwrap(),
        vec!["tx-0".to_owned(), "tx-1".to_owned()]
    );
    assert_eq!(last_call(&transport).params, vec![json!(0), json!(2)]);
    assert!(read_api
        .get_objects_owned_by_object(object_id(1))
        .await
        .unwrap()
        .is_empty());

    let tx: TransactionBytes = serde_json::from_value(unsigned_tx()).unwrap();
    let effects = read_api.dry_run_transaction(&tx).await.unwrap();
    assert_eq!(effects["status"]["status"], "success");
    assert_eq!(
        last_call(&transport).params,
        vec![json!("VHJhbnNhY3Rpb25EYXRh")]
    );

    let error = read_api.get_raw_object(object_id(1)).await.unwrap_err();
    assert!(matches!(
        error,
        Error::Element {
            source: ElementError::Rpc { code: -32601, .. },
            ..
        }
    ));
}

#[test]
fn test_extract_coin_reads_decimal_balance() {
    let read: ObjectRead =
        serde_json::from_value(coin_object(object_id(1), json!("0012"))).unwrap();
    let coin = extract_coin(read.into_object().unwrap(), SUI_COIN).unwrap();
    assert_eq!(coin.balance, 12);
    assert_eq!(coin.reference.version, 1);
}

#[tokio::test]
async fn test_response_without_result_decodes_as_null() {
    let transport = Arc::new(MockTransport::new(|request| {
        Some(JsonRpcResponse {
            jsonrpc: "2.0".to_owned(),
            id: Some(request.id),
            result: None,
            error: None,
        })
    }));

    let error = client(&transport)
        .read_api()
        .get_total_transaction_number()
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        Error::Element {
            source: ElementError::Decode(_),
            ..
        }
    ));
}
