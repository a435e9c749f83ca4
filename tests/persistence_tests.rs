//! Integration tests for the scenario save/load lifecycle
//!
//! These tests verify that loading is all-or-nothing and that older
//! tokens merge cleanly over newer defaults.

use scenario_codec::compressor::{to_url_safe, Compressor};
use scenario_codec::{
    CodecError, LoadOutcome, LzStringCompressor, PersistenceConfig, Scenario, ScenarioCodec,
    ScenarioStore,
};
use serde_json::{json, Value};
use std::cell::RefCell;
use url::Url;

fn scenario(value: Value) -> Scenario {
    Scenario::try_from(value).expect("scenario must be an object")
}

fn store_with(defaults: Value) -> ScenarioStore {
    ScenarioStore::new(
        ScenarioCodec::new().unwrap(),
        scenario(defaults),
        PersistenceConfig::default(),
    )
    .unwrap()
}

fn ignore_variant(_: &str) {}

#[test]
fn test_bad_token_keeps_live_state() {
    let mut store = store_with(json!({"x": 5}));
    let token = to_url_safe(&LzStringCompressor.compress("abc"));

    let outcome = store.load(&token, &ignore_variant);

    assert_eq!(
        outcome,
        LoadOutcome {
            applied: false,
            error: true
        }
    );
    assert_eq!(Value::from(store.live().clone()), json!({"x": 5}));
    assert!(store.scenario_loading_error());
}

#[test]
fn test_bad_token_after_user_edits() {
    let mut store = store_with(json!({"users": 10, "tier": "basic"}));
    store.live_mut().set("users", 75);
    store.live_mut().set("extra", json!({"nested": [1, 2]}));
    let before = store.live().clone();

    for token in ["", "garbage", "$$$", "N4Ig"] {
        let outcome = store.load(token, &ignore_variant);
        assert!(outcome.error);
        assert!(!outcome.applied);
        assert_eq!(store.live(), &before);
    }
}

#[test]
fn test_save_then_load_in_fresh_session() {
    let mut first = store_with(json!({"users": 10, "storage": {"size": 100}}));
    first.live_mut().set("users", 420);
    first.live_mut().set("storage", json!({"size": 2048, "tier": "premium"}));
    let token = first.save("advanced");

    let mut second = store_with(json!({"users": 10, "storage": {"size": 100}}));
    let outcome = second.load(&token, &ignore_variant);

    assert!(outcome.applied);
    assert!(!outcome.error);
    assert!(second.scenario_loaded());
    assert_eq!(second.live(), first.live());
}

#[test]
fn test_older_token_keeps_new_defaults() {
    let old_release = store_with(json!({"users": 300}));
    let token = old_release.export_token();

    let mut new_release = store_with(json!({"users": 10, "currency": "usd", "growth": {"rate": 0.05}}));
    let outcome = new_release.load(&token, &ignore_variant);

    assert!(outcome.applied);
    assert_eq!(
        Value::from(new_release.live().clone()),
        json!({"users": 300, "currency": "usd", "growth": {"rate": 0.05}})
    );
}

#[test]
fn test_newer_token_adds_fields() {
    let newer = store_with(json!({"users": 1, "gpuHours": 12}));
    let token = newer.export_token();

    let mut older = store_with(json!({"users": 5}));
    older.load(&token, &ignore_variant);
    assert_eq!(older.live().get("gpuHours"), Some(&json!(12)));
}

#[test]
fn test_error_flag_clears_on_next_good_load() {
    let mut store = store_with(json!({"users": 1}));
    let good = store.export_token();

    store.load("garbage", &ignore_variant);
    assert!(store.scenario_loading_error());

    store.load(&good, &ignore_variant);
    assert!(!store.scenario_loading_error());
    assert!(store.scenario_loaded());
}

#[test]
fn test_variant_requested_before_apply() {
    let mut source = store_with(json!({"configVariant": "highMemory", "memory": 512}));
    source.live_mut().set("memory", 1024);
    let token = source.export_token();

    let mut target = store_with(json!({"configVariant": "default", "memory": 16}));
    let requests = RefCell::new(Vec::new());
    let selector = |variant: &str| requests.borrow_mut().push(variant.to_string());
    let outcome = target.load(&token, &selector);

    assert!(outcome.applied);
    assert_eq!(requests.into_inner(), vec!["highMemory".to_string()]);
    assert_eq!(target.live().get("memory"), Some(&json!(1024)));
}

#[test]
fn test_share_link_cycle() {
    let mut store = store_with(json!({"users": 10}));
    store.live_mut().set("users", 99);
    store.record_save_context("simple");

    let base = Url::parse("https://calc.example.com/estimate").unwrap();
    let link = store.share_url(&base);
    assert!(link.as_str().starts_with("https://calc.example.com/estimate?scenario="));

    let mut visitor = store_with(json!({"users": 10}));
    let outcome = visitor.load_from_url(&link, &ignore_variant).unwrap();
    assert!(outcome.applied);
    assert_eq!(visitor.live().get("users"), Some(&json!(99)));
    assert_eq!(visitor.live().get_str("uiMode"), Some("simple"));
}

#[test]
fn test_custom_query_param() {
    let config = PersistenceConfig {
        query_param: "s".to_string(),
        ..Default::default()
    };
    let store = ScenarioStore::new(
        ScenarioCodec::new().unwrap(),
        scenario(json!({"users": 3})),
        config,
    )
    .unwrap();
    let link = store.share_url(&Url::parse("https://calc.example.com/").unwrap());
    assert!(link.query().unwrap().starts_with("s="));
}

#[test]
fn test_query_param_needing_encoding_rejected() {
    let config = PersistenceConfig {
        query_param: "s&x".to_string(),
        ..Default::default()
    };
    let result = ScenarioStore::new(
        ScenarioCodec::new().unwrap(),
        scenario(json!({"users": 3})),
        config,
    );
    assert!(matches!(result, Err(CodecError::InvalidConfig(_))));
}

#[test]
fn test_reset_to_defaults() {
    let mut store = store_with(json!({"users": 10}));
    store.live_mut().set("users", 11);
    store.load("garbage", &ignore_variant);
    store.reset_to_defaults();

    assert_eq!(store.live(), store.defaults());
    assert!(!store.scenario_loading_error());
    assert!(!store.scenario_loaded());
}

#[test]
fn test_handwritten_payload_loads() {
    // A token built by hand from the documented payload layout
    let payload = "{users:42,~12:~00}\u{1f}";
    let token = to_url_safe(&LzStringCompressor.compress(payload));

    let mut store = store_with(json!({"users": 1}));
    let outcome = store.load(&token, &ignore_variant);
    assert!(outcome.applied);
    assert_eq!(store.live().get("users"), Some(&json!(42)));
    assert_eq!(store.live().get_str("region"), Some("value"));
}
