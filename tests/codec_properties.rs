//! Property tests for the scenario codec
//!
//! Arbitrary scenario trees must survive encode/decode unchanged, and the
//! produced tokens must stay URL-safe and deterministic.

use proptest::prelude::*;
use scenario_codec::dictionary::adaptive::MAX_CUSTOM_WORDS;
use scenario_codec::{Scenario, ScenarioCodec};
use serde_json::{Map, Value};

const COMMON: &[&str] = &[
    "value", "enabled", "region", "westeurope", "premium", "standard", "true", "false",
    "null", "T", "F", "~01", "<00", ">02", "(0", ")A", "!Z", "{}", "a:b", "x/y",
];

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(COMMON).prop_map(String::from),
        "[a-z][a-zA-Z0-9]{1,10}",
        any::<String>(),
    ]
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1_000_000i32..1_000_000).prop_map(|n| Value::from(n as f64 / 100.0)),
        any::<f64>()
            .prop_filter("JSON numbers are finite", |f| f.is_finite())
            .prop_map(Value::from),
        arb_text().prop_map(Value::from),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::btree_map(arb_text(), inner, 0..8)
                .prop_map(|fields| Value::Object(fields.into_iter().collect())),
        ]
    })
}

fn arb_scenario() -> impl Strategy<Value = Scenario> {
    prop::collection::btree_map(arb_text(), arb_value(), 0..10)
        .prop_map(|fields| Scenario::from(fields.into_iter().collect::<Map<String, Value>>()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn roundtrip_preserves_scenario(s in arb_scenario()) {
        let codec = ScenarioCodec::new().unwrap();
        let token = codec.encode(&s);
        prop_assert_eq!(codec.decode(&token).unwrap(), s);
    }

    #[test]
    fn token_never_contains_dash(s in arb_scenario()) {
        let codec = ScenarioCodec::new().unwrap();
        prop_assert!(!codec.encode(&s).contains('-'));
    }

    #[test]
    fn encode_is_deterministic(s in arb_scenario()) {
        let codec = ScenarioCodec::new().unwrap();
        prop_assert_eq!(codec.encode(&s), codec.encode(&s.clone()));
    }

    #[test]
    fn custom_words_are_capped(words in prop::collection::vec("[a-z]{3,8}", 0..200)) {
        let codec = ScenarioCodec::new().unwrap();
        let repeated: Vec<Value> = words
            .iter()
            .flat_map(|w| std::iter::repeat(Value::from(w.as_str())).take(3))
            .collect();
        let mut s = Scenario::new();
        s.set("parts", Value::Array(repeated));

        let (token, report) = codec.encode_with_report(&s);
        prop_assert!(report.custom_words.len() <= MAX_CUSTOM_WORDS);
        prop_assert!(report.custom_words.iter().all(|entry| entry.savings > 0));
        prop_assert_eq!(codec.decode(&token).unwrap(), s);
    }

    #[test]
    fn builtin_only_roundtrip(s in arb_scenario()) {
        let codec = ScenarioCodec::with_config(scenario_codec::CodecConfig::builtin_only()).unwrap();
        let (token, report) = codec.encode_with_report(&s);
        prop_assert!(report.custom_words.is_empty());
        prop_assert_eq!(codec.decode(&token).unwrap(), s);
    }
}
