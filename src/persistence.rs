//! Scenario persistence
//!
//! [`ScenarioStore`] owns the live scenario of a session. It exports the
//! scenario as a shareable token and replaces it from a token, all or
//! nothing: a token that fails to decode leaves the live scenario exactly
//! as it was and only raises the `scenario_loading_error` flag.
//!
//! # Example
//!
//! ```rust
//! use scenario_codec::{Scenario, ScenarioCodec, ScenarioStore, PersistenceConfig};
//!
//! let mut defaults = Scenario::new();
//! defaults.set("users", 10);
//!
//! let codec = ScenarioCodec::new().unwrap();
//! let mut store = ScenarioStore::new(codec, defaults, PersistenceConfig::default()).unwrap();
//! store.live_mut().set("users", 250);
//! let token = store.save("advanced");
//!
//! store.reset_to_defaults();
//! let outcome = store.load(&token, &|_variant: &str| {});
//! assert!(outcome.applied);
//! assert_eq!(store.live().get("users"), Some(&250.into()));
//! ```

use crate::codec::ScenarioCodec;
use crate::compressor::{Compressor, LzStringCompressor};
use crate::config::PersistenceConfig;
use crate::error::Result;
use crate::scenario::Scenario;
use url::Url;

/// Receives requests to switch the calculator to another configuration
/// variant.
///
/// Activation is fire-and-forget: it may complete asynchronously, after
/// [`ScenarioStore::load`] has returned.
pub trait VariantSelector {
    /// Request activation of `variant`
    fn activate(&self, variant: &str);
}

impl<F: Fn(&str)> VariantSelector for F {
    fn activate(&self, variant: &str) {
        self(variant)
    }
}

/// Result of [`ScenarioStore::load`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOutcome {
    /// Decoded fields were merged into the live scenario
    pub applied: bool,
    /// The token could not be decoded; the live scenario was restored
    pub error: bool,
}

/// Live scenario plus its save/load lifecycle
#[derive(Debug, Clone)]
pub struct ScenarioStore<C = LzStringCompressor> {
    codec: ScenarioCodec<C>,
    config: PersistenceConfig,
    defaults: Scenario,
    live: Scenario,
    scenario_loaded: bool,
    scenario_loading_error: bool,
}

impl<C: Compressor> ScenarioStore<C> {
    /// Create a store whose live scenario starts from `defaults`.
    ///
    /// Fails with [`CodecError::InvalidConfig`](crate::CodecError::InvalidConfig)
    /// when a field name is empty or the query parameter needs
    /// percent-encoding.
    pub fn new(
        codec: ScenarioCodec<C>,
        defaults: Scenario,
        config: PersistenceConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            codec,
            config,
            live: defaults.clone(),
            defaults,
            scenario_loaded: false,
            scenario_loading_error: false,
        })
    }

    /// Codec used for tokens
    pub fn codec(&self) -> &ScenarioCodec<C> {
        &self.codec
    }

    /// Store settings
    pub fn config(&self) -> &PersistenceConfig {
        &self.config
    }

    /// Current live scenario
    pub fn live(&self) -> &Scenario {
        &self.live
    }

    /// Mutable access for user input
    pub fn live_mut(&mut self) -> &mut Scenario {
        &mut self.live
    }

    /// Defaults the store was created with
    pub fn defaults(&self) -> &Scenario {
        &self.defaults
    }

    /// Whether the last load applied a token
    pub fn scenario_loaded(&self) -> bool {
        self.scenario_loaded
    }

    /// Whether the last load rejected its token
    pub fn scenario_loading_error(&self) -> bool {
        self.scenario_loading_error
    }

    /// Replace the live scenario with the defaults and clear both flags
    pub fn reset_to_defaults(&mut self) {
        self.live = self.defaults.clone();
        self.scenario_loaded = false;
        self.scenario_loading_error = false;
    }

    /// Stamp the UI mode active at save time into the live scenario
    pub fn record_save_context(&mut self, mode: &str) {
        self.live.set(self.config.mode_field.clone(), mode);
    }

    /// Token for the live scenario, without modifying it
    pub fn export_token(&self) -> String {
        self.codec.encode(&self.live)
    }

    /// Stamp `mode` into the live scenario, then export it.
    ///
    /// The stamp stays in the live scenario after the call.
    pub fn save(&mut self, mode: &str) -> String {
        self.record_save_context(mode);
        self.export_token()
    }

    /// Replace the live scenario from a token.
    ///
    /// Decoded top-level fields overwrite live ones; fields the token does
    /// not carry keep their live values. When the decoded scenario names a
    /// non-default configuration variant, `selector` is asked to activate
    /// it before the fields are applied. On any decode failure the live
    /// scenario is restored from a snapshot and the error flag is set.
    pub fn load(&mut self, raw_token: &str, selector: &dyn VariantSelector) -> LoadOutcome {
        let snapshot = self.live.clone();

        match self.codec.decode(raw_token) {
            Ok(decoded) => {
                if let Some(variant) = decoded.get_str(&self.config.variant_field) {
                    if variant != self.config.default_variant {
                        log::info!("scenario requests configuration variant '{}'", variant);
                        selector.activate(variant);
                    }
                }
                self.live.merge_shallow(decoded);
                self.scenario_loaded = true;
                self.scenario_loading_error = false;
                LoadOutcome {
                    applied: true,
                    error: false,
                }
            }
            Err(err) => {
                log::warn!("rejected scenario token: {}", err);
                self.live = snapshot;
                self.scenario_loaded = false;
                self.scenario_loading_error = true;
                LoadOutcome {
                    applied: false,
                    error: true,
                }
            }
        }
    }

    /// Load from the token in a page URL, if the URL carries one
    pub fn load_from_url(&mut self, url: &Url, selector: &dyn VariantSelector) -> Option<LoadOutcome> {
        let token = token_from_url(url, &self.config.query_param)?;
        Some(self.load(&token, selector))
    }

    /// Share link for the live scenario: `base` with `?<param>=<token>`
    pub fn share_url(&self, base: &Url) -> Url {
        share_url(base, &self.config.query_param, &self.export_token())
    }
}

/// Append `param=token` to `base`, replacing an earlier value of `param`.
///
/// The token alphabet needs no percent-encoding, so it is written as is.
pub fn share_url(base: &Url, param: &str, token: &str) -> Url {
    let mut url = base.clone();
    let mut pairs: Vec<String> = url
        .query()
        .unwrap_or("")
        .split('&')
        .filter(|pair| !pair.is_empty() && query_key(pair) != param)
        .map(str::to_string)
        .collect();
    pairs.push(format!("{}={}", param, token));
    url.set_query(Some(&pairs.join("&")));
    url
}

/// Raw value of `param` in the URL query.
///
/// Read without form-decoding: `+` is part of the token alphabet and must
/// not turn into a space.
pub fn token_from_url(url: &Url, param: &str) -> Option<String> {
    url.query()?
        .split('&')
        .find(|pair| query_key(pair) == param)
        .and_then(|pair| pair.split_once('='))
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

fn query_key(pair: &str) -> &str {
    pair.split_once('=').map_or(pair, |(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    fn store() -> ScenarioStore {
        let defaults = Scenario::try_from(json!({"x": 5})).unwrap();
        ScenarioStore::new(
            ScenarioCodec::new().unwrap(),
            defaults,
            PersistenceConfig::default(),
        )
        .unwrap()
    }

    fn no_variant(_: &str) {}

    #[test]
    fn test_save_stamps_mode() {
        let mut store = store();
        let token = store.save("advanced");
        assert_eq!(store.live().get_str("uiMode"), Some("advanced"));

        let decoded = store.codec().decode(&token).unwrap();
        assert_eq!(decoded.get_str("uiMode"), Some("advanced"));
    }

    #[test]
    fn test_export_is_pure() {
        let store = store();
        let before = store.live().clone();
        let _ = store.export_token();
        assert_eq!(store.live(), &before);
    }

    #[test]
    fn test_corrupt_token_restores_snapshot() {
        let mut store = store();
        let token = crate::compressor::to_url_safe(&LzStringCompressor.compress("abc"));
        let outcome = store.load(&token, &no_variant);

        assert_eq!(
            outcome,
            LoadOutcome {
                applied: false,
                error: true
            }
        );
        assert_eq!(store.live().get("x"), Some(&json!(5)));
        assert_eq!(store.live().len(), 1);
        assert!(store.scenario_loading_error());
        assert!(!store.scenario_loaded());
    }

    #[test]
    fn test_variant_activation() {
        let mut store = store();
        store.live_mut().set("configVariant", "gpu");
        let token = store.export_token();
        store.reset_to_defaults();

        let requested = RefCell::new(Vec::new());
        let selector = |variant: &str| requested.borrow_mut().push(variant.to_string());
        let outcome = store.load(&token, &selector);

        assert!(outcome.applied);
        assert_eq!(requested.into_inner(), vec!["gpu".to_string()]);
        assert_eq!(store.live().get_str("configVariant"), Some("gpu"));
    }

    #[test]
    fn test_default_variant_not_activated() {
        let mut store = store();
        store.live_mut().set("configVariant", "default");
        let token = store.export_token();

        let requested = RefCell::new(0);
        let selector = |_: &str| *requested.borrow_mut() += 1;
        store.load(&token, &selector);
        assert_eq!(requested.into_inner(), 0);
    }

    #[test]
    fn test_share_url_roundtrip() {
        let mut store = store();
        store.live_mut().set("users", 1200);
        let base = Url::parse("https://calc.example.com/tool?lang=en&scenario=old").unwrap();
        let url = store.share_url(&base);

        let query = url.query().unwrap();
        assert!(query.starts_with("lang=en&scenario="));
        assert_eq!(query.matches("scenario=").count(), 1);
        assert!(!query.contains('%'));

        store.reset_to_defaults();
        let outcome = store.load_from_url(&url, &no_variant).unwrap();
        assert!(outcome.applied);
        assert_eq!(store.live().get("users"), Some(&json!(1200)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad_configs = [
            PersistenceConfig {
                mode_field: String::new(),
                ..Default::default()
            },
            PersistenceConfig {
                query_param: "my scenario".to_string(),
                ..Default::default()
            },
        ];
        for config in bad_configs {
            let result =
                ScenarioStore::new(ScenarioCodec::new().unwrap(), Scenario::new(), config);
            assert!(matches!(result, Err(crate::CodecError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_url_without_token() {
        let mut store = store();
        let url = Url::parse("https://calc.example.com/tool?lang=en&scenario=").unwrap();
        assert_eq!(store.load_from_url(&url, &no_variant), None);
        assert_eq!(token_from_url(&url, "lang").as_deref(), Some("en"));
    }
}
