//! # Scenario Codec
//!
//! Reversible, dictionary-based compression of calculator inputs into a
//! compact, URL-safe token, so a scenario can be bookmarked or shared as
//! `?scenario=<token>` without any server-side storage.
//!
//! ## Key Features
//!
//! - **Fixed abbreviations**: `true`/`false`/`null`/`{}` shrink to one letter
//! - **Built-in dictionary**: release-pinned table of common words
//! - **Adaptive dictionary**: per-scenario words chosen by estimated savings
//! - **URL safety**: LZ-string output with `-` replaced by `_`
//! - **All-or-nothing loading**: a bad token never corrupts the live scenario
//!
//! ## Quick Start
//!
//! ```rust
//! use scenario_codec::{Scenario, ScenarioCodec};
//!
//! let codec = ScenarioCodec::new().unwrap();
//!
//! let mut scenario = Scenario::new();
//! scenario.set("users", 250);
//! scenario.set("region", "westeurope");
//! scenario.set("backup", true);
//!
//! let token = codec.encode(&scenario);
//! assert!(!token.contains('-'));
//!
//! let decoded = codec.decode(&token).unwrap();
//! assert_eq!(decoded, scenario);
//! ```
//!
//! ## Modules
//!
//! - [`codec`]: Encode/decode orchestration
//! - [`token`]: Token list and compact text format
//! - [`abbreviate`]: Fixed abbreviations
//! - [`dictionary`]: Built-in and adaptive dictionaries
//! - [`compressor`]: Generic compressor stage
//! - [`persistence`]: Live scenario save/load lifecycle
//! - [`metrics`]: Encode reports and statistics

// Modules
pub mod abbreviate;
pub mod codec;
pub mod compressor;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod metrics;
pub mod persistence;
pub mod scenario;
pub mod token;

// Re-exports for convenient access
pub use codec::ScenarioCodec;
pub use compressor::{Compressor, LzStringCompressor};
pub use config::{CodecConfig, PersistenceConfig};
pub use dictionary::adaptive::{AdaptiveDictionary, AdaptiveEntry};
pub use dictionary::{BuiltinDictionary, Placement};
pub use error::{CodecError, DecodeError, DictionaryError, Result};
pub use metrics::{CodecMetrics, EncodeReport};
pub use persistence::{LoadOutcome, ScenarioStore, VariantSelector};
pub use scenario::Scenario;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default query parameter carrying a token
pub const QUERY_PARAM: &str = "scenario";
