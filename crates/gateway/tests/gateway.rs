//! End-to-end behaviour of `ModelGateway` over `MemoryStore` and scripted
//! collaborators.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::sync::Arc;

use modelgate::{
    AcceptAll, GatewayConfig, GatewayError, IdStrategy, Identifier, Model, ModelGateway,
    RequiredFields, ValidationError,
    testutil::{
        CountingIdGenerator, CountingValidator, FailingIdGenerator, FailingStore, MultiGetProbe,
        RejectAll, StampingValidator, TEST_NAMESPACE, memory_gateway, model,
    },
};
use modelgate_storage::{MemoryStore, MultiGetFailure, MultiGetOptions, StorageError, Store};
use serde_json::json;

fn not_found_message(err: &GatewayError) -> String {
    match err {
        GatewayError::Store(StorageError::NotFound { key }) => format!("{key} not in db"),
        other => panic!("expected a store not-found error, got {other:?}"),
    }
}

// ============================================================================
// set / get
// ============================================================================

#[tokio::test]
async fn set_returns_model() {
    let gateway = memory_gateway();
    let data = model(json!({"a": 1}));

    let stored = gateway.set("abc", data.clone()).await.unwrap();

    assert_eq!(stored, data);
    assert_eq!(gateway.store().keys(), vec!["thing:abc".to_owned()]);
}

#[tokio::test]
async fn set_twice_overwrites() {
    let gateway = memory_gateway();
    let data = Model::new();

    assert_eq!(gateway.set("abc", data.clone()).await.unwrap(), data);
    assert_eq!(gateway.set("abc", data.clone()).await.unwrap(), data);
    assert_eq!(gateway.store().len(), 1);
}

#[tokio::test]
async fn get_returns_value_without_envelope() {
    let gateway = memory_gateway();
    let data = model(json!({"name": "Alice"}));
    gateway.set("abc", data.clone()).await.unwrap();

    assert_eq!(gateway.get("abc").await.unwrap(), data);
}

#[tokio::test]
async fn get_missing_fails_with_namespaced_key() {
    let gateway = memory_gateway();

    let err = gateway.get("abc").await.unwrap_err();

    assert_eq!(err.to_string(), "thing:abc not in db");
    assert_eq!(not_found_message(&err), "thing:abc not in db");
}

#[tokio::test]
async fn numeric_ids_form_keys() {
    let gateway = memory_gateway();
    gateway.set(42u64, Model::new()).await.unwrap();

    assert_eq!(gateway.store().keys(), vec!["thing:42".to_owned()]);
    assert!(gateway.get(Identifier::Text("42".into())).await.is_ok());
}

#[tokio::test]
async fn set_validation_failure_stores_nothing() {
    let gateway = ModelGateway::new("thing", MemoryStore::new(), RejectAll::new("bad model"))
        .unwrap();

    let err = gateway.set("abc", Model::new()).await.unwrap_err();

    assert!(matches!(err, GatewayError::Validation(ValidationError::Rejected { .. })));
    assert_eq!(err.to_string(), "bad model");
    assert!(gateway.store().is_empty());
}

#[tokio::test]
async fn set_store_failure_surfaces_unchanged() {
    let gateway = ModelGateway::new("thing", FailingStore::new(StorageError::timeout()), AcceptAll)
        .unwrap();

    let err = gateway.set("abc", Model::new()).await.unwrap_err();

    assert!(matches!(err, GatewayError::Store(StorageError::Timeout)));
}

// ============================================================================
// add
// ============================================================================

#[tokio::test]
async fn add_assigns_id() {
    let gateway = memory_gateway();

    let stored = gateway.add(model(json!({"a": 1}))).await.unwrap();

    assert_eq!(stored, model(json!({"a": 1, "id": "0"})));
    assert_eq!(gateway.get("0").await.unwrap(), stored);
}

#[tokio::test]
async fn add_with_numeric_generator() {
    let gateway = memory_gateway().with_id_generator(IdStrategy::Sequence { start: 1 }.generator());

    let stored = gateway.add(model(json!({"foo": "bar"}))).await.unwrap();

    assert_eq!(stored, model(json!({"foo": "bar", "id": 1})));
    assert_eq!(gateway.store().keys(), vec!["thing:1".to_owned()]);
}

#[tokio::test]
async fn add_twice_on_same_model_fails() {
    let gateway = memory_gateway();

    let stored = gateway.add(Model::new()).await.unwrap();
    let err = gateway.add(stored).await.unwrap_err();

    assert!(matches!(err, GatewayError::AlreadyHasId));
    assert_eq!(err.to_string(), "object already has an id");
    assert_eq!(gateway.store().len(), 1);
}

#[tokio::test]
async fn add_with_falsy_id_generates_one() {
    let gateway = memory_gateway();

    let stored = gateway.add(model(json!({"id": null, "x": 1}))).await.unwrap();

    assert_eq!(stored["id"], "0");
}

#[tokio::test]
async fn add_generator_failure_skips_validation_and_store() {
    let validator = Arc::new(CountingValidator::default());
    let gateway = ModelGateway::new("thing", MemoryStore::new(), validator.clone())
        .unwrap()
        .with_id_generator(Arc::new(FailingIdGenerator::new("BOOM!!")));

    let err = gateway.add(model(json!({"foo": "bar"}))).await.unwrap_err();

    assert!(matches!(err, GatewayError::IdGeneration(_)));
    assert_eq!(err.to_string(), "identifier generation failed: BOOM!!");
    assert_eq!(validator.calls(), 0);
    assert!(gateway.store().is_empty());
}

#[tokio::test]
async fn add_rejects_existing_key() {
    let ids = Arc::new(CountingIdGenerator::new(Identifier::from("dup")));
    let gateway = memory_gateway().with_id_generator(ids.clone());

    gateway.add(Model::new()).await.unwrap();
    let err = gateway.add(Model::new()).await.unwrap_err();

    assert!(matches!(err, GatewayError::Store(StorageError::KeyExists { .. })));
    assert_eq!(err.to_string(), "thing:dup already in db");
    assert_eq!(ids.calls(), 2);
}

#[tokio::test]
async fn add_validates_model_with_id() {
    let gateway = ModelGateway::new("thing", MemoryStore::new(), RequiredFields::new(["id"]))
        .unwrap();

    let stored = gateway.add(Model::new()).await.unwrap();

    assert!(stored.contains_key("id"));
}

// ============================================================================
// remove
// ============================================================================

#[tokio::test]
async fn remove_added_model() {
    let gateway = memory_gateway();
    let stored = gateway.add(Model::new()).await.unwrap();
    let id = stored["id"].as_str().unwrap();

    gateway.remove(id).await.unwrap();

    assert!(gateway.store().is_empty());
}

#[tokio::test]
async fn remove_missing_fails() {
    let gateway = memory_gateway();

    let err = gateway.remove("abc").await.unwrap_err();

    assert_eq!(err.to_string(), "thing:abc not in db");
}

// ============================================================================
// replace
// ============================================================================

#[tokio::test]
async fn replace_overwrites_whole_model() {
    let gateway = memory_gateway();
    let stored = gateway.add(model(json!({"a": 1}))).await.unwrap();
    let id = stored["id"].as_str().unwrap();

    let replaced = gateway.replace(id, model(json!({"b": 2}))).await.unwrap();

    assert_eq!(replaced, model(json!({"b": 2})));
    assert_eq!(gateway.get(id).await.unwrap(), replaced);
}

#[tokio::test]
async fn replace_missing_fails() {
    let gateway = memory_gateway();

    let err = gateway.replace("abc", model(json!({"b": 2}))).await.unwrap_err();

    assert_eq!(err.to_string(), "thing:abc not in db");
    assert!(gateway.store().is_empty());
}

// ============================================================================
// update
// ============================================================================

#[tokio::test]
async fn update_merges_and_keeps_id() {
    let gateway = memory_gateway();
    let stored = gateway.add(model(json!({"a": 1}))).await.unwrap();
    let original_id = stored["id"].clone();
    let id = original_id.as_str().unwrap();

    let mut updated = gateway.update(id, model(json!({"id": 123, "b": 2}))).await.unwrap();

    assert_eq!(updated["id"], original_id);
    updated.remove("id");
    assert_eq!(updated, model(json!({"a": 1, "b": 2})));
}

#[tokio::test]
async fn update_overlapping_fields_take_partial_value() {
    let gateway = memory_gateway();
    gateway.set("x", model(json!({"a": 1, "b": 1}))).await.unwrap();

    let updated = gateway.update("x", model(json!({"b": 2, "c": 3}))).await.unwrap();

    assert_eq!(updated, model(json!({"a": 1, "b": 2, "c": 3})));
}

#[tokio::test]
async fn update_missing_fails() {
    let gateway = memory_gateway();

    let err = gateway.update("abc", model(json!({"b": 2}))).await.unwrap_err();

    assert_eq!(err.to_string(), "thing:abc not in db");
}

#[tokio::test]
async fn update_validation_failure_keeps_stored_model() {
    let store = MemoryStore::new();
    let writer = ModelGateway::new("thing", store.clone(), AcceptAll).unwrap();
    writer.set("x", model(json!({"a": 1}))).await.unwrap();

    let strict =
        ModelGateway::new("thing", store, RequiredFields::new(["name"])).unwrap();
    let err = strict.update("x", model(json!({"b": 2}))).await.unwrap_err();

    assert!(matches!(err, GatewayError::Validation(ValidationError::MissingField { .. })));
    assert_eq!(writer.get("x").await.unwrap(), model(json!({"a": 1})));
}

// ============================================================================
// get_multi
// ============================================================================

#[tokio::test]
async fn get_multi_preserves_request_order() {
    let gateway = memory_gateway();
    let first = model(json!({"foo": "bar"}));
    let second = model(json!({"stuff": "meh"}));
    gateway.set("testData1", first.clone()).await.unwrap();
    gateway.set("testData2", second.clone()).await.unwrap();

    let forward = gateway.get_multi(["testData1", "testData2"]).await.unwrap();
    let backward = gateway.get_multi(["testData2", "testData1"]).await.unwrap();

    assert_eq!(forward, vec![Some(first.clone()), Some(second.clone())]);
    assert_eq!(backward, vec![Some(second), Some(first)]);
}

#[tokio::test]
async fn get_multi_missing_keys_are_none() {
    let gateway = memory_gateway();
    gateway.set("present", Model::new()).await.unwrap();

    let results = gateway.get_multi(["absent", "present"]).await.unwrap();

    assert_eq!(results, vec![None, Some(Model::new())]);
}

#[tokio::test]
async fn get_multi_empty_request() {
    let gateway = memory_gateway();

    let results = gateway.get_multi(Vec::<Identifier>::new()).await.unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn get_multi_raw_failure_is_normalized() {
    let probe = MultiGetProbe::failing(MultiGetFailure::raw(123));
    let gateway = ModelGateway::new("thing", probe, AcceptAll).unwrap();

    let err = gateway.get_multi(["foo", "bar"]).await.unwrap_err();

    assert!(matches!(err, GatewayError::NoSuchKey { .. }));
    assert_eq!(err.to_string(), "No such key (123)");
}

#[tokio::test]
async fn get_multi_raw_text_failure_passes_through() {
    let probe = MultiGetProbe::failing(MultiGetFailure::raw("BANG!!!!"));
    let gateway = ModelGateway::new("thing", probe, AcceptAll).unwrap();

    let err = gateway.get_multi(["foo", "bar"]).await.unwrap_err();

    assert!(matches!(err, GatewayError::Raw { .. }));
    assert_eq!(err.to_string(), "BANG!!!!");
}

#[tokio::test]
async fn get_multi_store_error_passes_through() {
    let failure = MultiGetFailure::Store(StorageError::connection("BANG!!!!"));
    let probe = MultiGetProbe::failing(failure);
    let gateway = ModelGateway::new("thing", probe, AcceptAll).unwrap();

    let err = gateway.get_multi(["foo", "bar"]).await.unwrap_err();

    assert!(matches!(err, GatewayError::Store(StorageError::Connection { .. })));
    assert_eq!(err.to_string(), "Connection error: BANG!!!!");
}

#[tokio::test]
async fn get_multi_forwards_keys_and_options() {
    let probe = Arc::new(MultiGetProbe::new(MemoryStore::new()));
    let gateway = ModelGateway::new("thing", probe.clone(), AcceptAll).unwrap();
    let options = MultiGetOptions::batched(1);

    gateway.get_multi_with_options(["a", "b"], Some(&options)).await.unwrap();
    gateway.get_multi(["c"]).await.unwrap();

    assert_eq!(probe.seen_options(), vec![Some(options), None]);
    assert_eq!(
        probe.seen_keys(),
        vec![vec!["thing:a".to_owned(), "thing:b".to_owned()], vec!["thing:c".to_owned()]]
    );
}

// ============================================================================
// validator output
// ============================================================================

fn stamping_gateway() -> ModelGateway<MemoryStore> {
    ModelGateway::new(TEST_NAMESPACE, MemoryStore::new(), StampingValidator::new("checked", true))
        .unwrap()
        .with_id_generator(Arc::new(CountingIdGenerator::new(Identifier::from("gen"))))
}

async fn stored(gateway: &ModelGateway<MemoryStore>, key: &str) -> Model {
    gateway.store().get(key).await.unwrap().into_value()
}

#[tokio::test]
async fn set_stores_and_returns_validated_model() {
    let gateway = stamping_gateway();

    let returned = gateway.set("abc", model(json!({"a": 1}))).await.unwrap();

    let expected = model(json!({"a": 1, "checked": true}));
    assert_eq!(returned, expected);
    assert_eq!(stored(&gateway, "thing:abc").await, expected);
}

#[tokio::test]
async fn add_stores_and_returns_validated_model() {
    let gateway = stamping_gateway();

    let returned = gateway.add(model(json!({"a": 1}))).await.unwrap();

    let expected = model(json!({"a": 1, "id": "gen", "checked": true}));
    assert_eq!(returned, expected);
    assert_eq!(stored(&gateway, "thing:gen").await, expected);
}

#[tokio::test]
async fn replace_stores_and_returns_validated_model() {
    let gateway = stamping_gateway();
    gateway.store().insert("thing:abc", model(json!({"old": true}))).await.unwrap();

    let returned = gateway.replace("abc", model(json!({"new": true}))).await.unwrap();

    let expected = model(json!({"new": true, "checked": true}));
    assert_eq!(returned, expected);
    assert_eq!(stored(&gateway, "thing:abc").await, expected);
}

// ============================================================================
// configuration
// ============================================================================

#[tokio::test]
async fn from_config_applies_strategy_and_size_limit() {
    let config = GatewayConfig::builder()
        .namespace("order")
        .id_strategy(IdStrategy::Sequence { start: 7 })
        .max_model_size(16)
        .build()
        .unwrap();
    let gateway = ModelGateway::from_config(&config, MemoryStore::new(), AcceptAll);

    let stored = gateway.add(model(json!({"a": 1}))).await.unwrap();
    assert_eq!(stored["id"], 7);
    assert!(gateway.store().get("order:7").await.is_ok());

    let err = gateway.set("big", model(json!({"payload": "x".repeat(64)}))).await.unwrap_err();
    assert!(matches!(err, GatewayError::Validation(ValidationError::TooLarge { .. })));
}

#[tokio::test]
async fn from_config_runs_size_check_before_caller_validator() {
    let validator = Arc::new(CountingValidator::default());
    let config =
        GatewayConfig::builder().namespace("order").max_model_size(4).build().unwrap();
    let gateway = ModelGateway::from_config(&config, MemoryStore::new(), validator.clone());

    let err = gateway.set("k", model(json!({"a": 1}))).await.unwrap_err();

    assert!(matches!(err, GatewayError::Validation(ValidationError::TooLarge { .. })));
    assert_eq!(validator.calls(), 0);
}

#[tokio::test]
async fn default_generator_produces_uuid_ids() {
    let gateway = ModelGateway::new("user", MemoryStore::new(), AcceptAll).unwrap();

    let stored = gateway.add(Model::new()).await.unwrap();
    let id = stored["id"].as_str().expect("uuid ids are text");

    assert_eq!(id.len(), 36);
    assert_eq!(gateway.store().keys(), vec![format!("user:{id}")]);
}
