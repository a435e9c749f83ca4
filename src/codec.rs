//! Scenario codec
//!
//! Turns a [`Scenario`] into a compact, URL-safe token and back.
//!
//! Encode:
//!
//! ```text
//! scenario -> tokens -> fixed abbreviations -> built-in dictionary
//!          -> adaptive dictionary -> bare keys -> payload + word list
//!          -> compressor -> `-` to `_`
//! ```
//!
//! Decode runs the same stages in reverse order.

use crate::abbreviate;
use crate::compressor::{from_url_safe, to_url_safe, Compressor, LzStringCompressor};
use crate::config::CodecConfig;
use crate::dictionary::adaptive::AdaptiveDictionary;
use crate::dictionary::{self, BuiltinDictionary};
use crate::error::{DecodeError, Result};
use crate::metrics::EncodeReport;
use crate::scenario::Scenario;
use crate::token::{self, Token, PAYLOAD_DELIMITER};
use serde_json::Value;

/// Tokenized payload before compression
#[derive(Debug, Clone)]
struct Payload {
    text: String,
    custom: AdaptiveDictionary,
    builtin_substitutions: usize,
    custom_substitutions: usize,
}

/// Encoder and decoder for scenario tokens.
///
/// Holds only immutable tables; every call is independent of the others.
#[derive(Debug, Clone)]
pub struct ScenarioCodec<C = LzStringCompressor> {
    dictionary: BuiltinDictionary,
    compressor: C,
    config: CodecConfig,
}

impl ScenarioCodec<LzStringCompressor> {
    /// Codec with the standard dictionary and default settings
    pub fn new() -> Result<Self> {
        Self::with_config(CodecConfig::default())
    }

    /// Codec with the standard dictionary and custom settings
    pub fn with_config(config: CodecConfig) -> Result<Self> {
        Self::with_parts(BuiltinDictionary::standard()?, LzStringCompressor, config)
    }
}

impl<C: Compressor> ScenarioCodec<C> {
    /// Codec from explicit parts
    pub fn with_parts(
        dictionary: BuiltinDictionary,
        compressor: C,
        config: CodecConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            dictionary,
            compressor,
            config,
        })
    }

    /// Built-in dictionary in use
    pub fn dictionary(&self) -> &BuiltinDictionary {
        &self.dictionary
    }

    /// Encoder settings
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Compressor in use
    pub fn compressor(&self) -> &C {
        &self.compressor
    }

    /// Encode a scenario into a URL-safe token
    pub fn encode(&self, scenario: &Scenario) -> String {
        let payload = self.build_payload(scenario);
        to_url_safe(&self.compressor.compress(&payload.text))
    }

    /// Encode and report what each stage did
    pub fn encode_with_report(&self, scenario: &Scenario) -> (String, EncodeReport) {
        let payload = self.build_payload(scenario);
        let token = to_url_safe(&self.compressor.compress(&payload.text));

        let report = EncodeReport {
            json_bytes: scenario.to_json().len(),
            payload_bytes: payload.text.len(),
            token_bytes: token.len(),
            builtin_substitutions: payload.builtin_substitutions,
            custom_substitutions: payload.custom_substitutions,
            custom_words: payload.custom.entries().to_vec(),
        };
        log::debug!(
            "encoded scenario: {} JSON bytes -> {} payload bytes -> {} token bytes",
            report.json_bytes,
            report.payload_bytes,
            report.token_bytes
        );

        (token, report)
    }

    /// Tokenized payload text (`<tokens><delimiter><word list>`), before
    /// compression
    pub fn payload(&self, scenario: &Scenario) -> String {
        self.build_payload(scenario).text
    }

    fn build_payload(&self, scenario: &Scenario) -> Payload {
        let tokens = token::tokenize(scenario);
        let tokens = abbreviate::encode(tokens);
        let tokens = dictionary::substitute(&self.dictionary, tokens);

        let custom = AdaptiveDictionary::analyze(&tokens, self.config.custom_word_limit());
        let tokens = dictionary::substitute(&custom, tokens);
        let tokens = token::strip_key_quotes(tokens);

        let builtin_substitutions = count(&tokens, |t| matches!(t, Token::Builtin(..)));
        let custom_substitutions = count(&tokens, |t| matches!(t, Token::Custom(..)));

        let mut text = token::render(&tokens);
        text.push(PAYLOAD_DELIMITER);
        text.push_str(&custom.word_list());

        Payload {
            text,
            custom,
            builtin_substitutions,
            custom_substitutions,
        }
    }

    /// Decode a token back into the scenario it was made from.
    ///
    /// Leading and trailing whitespace is trimmed first; the token
    /// alphabet contains none.
    pub fn decode(&self, token: &str) -> std::result::Result<Scenario, DecodeError> {
        let compressed = from_url_safe(token.trim());
        let payload = self
            .compressor
            .decompress(&compressed)
            .filter(|text| !text.is_empty())
            .ok_or(DecodeError::Compression)?;

        let scenario = self.decode_payload(&payload)?;
        log::debug!(
            "decoded scenario with {} fields from {} token bytes",
            scenario.len(),
            token.len()
        );
        Ok(scenario)
    }

    /// Decode an uncompressed payload
    pub fn decode_payload(&self, payload: &str) -> std::result::Result<Scenario, DecodeError> {
        let parts: Vec<&str> = payload.split(PAYLOAD_DELIMITER).collect();
        if parts.len() != 2 {
            return Err(DecodeError::MalformedPayload {
                delimiters: parts.len() - 1,
            });
        }

        let custom = AdaptiveDictionary::from_word_list(parts[1])?;
        let tokens = token::lex(parts[0])?;
        let tokens = dictionary::expand(&custom, tokens)?;
        let tokens = dictionary::expand(&self.dictionary, tokens)?;
        let tokens = abbreviate::decode(tokens);
        let tokens = token::quote_bare_keys(tokens);

        let json = token::render(&tokens);
        let value: Value = serde_json::from_str(&json)?;
        Scenario::try_from(value)
    }
}

fn count(tokens: &[Token], predicate: impl Fn(&Token) -> bool) -> usize {
    tokens.iter().filter(|t| predicate(t)).count()
}
