//! Metrics for codec efficiency analysis
//!
//! This module provides per-encode reports and aggregate statistics
//! about how much each stage shrinks a scenario.

use crate::dictionary::adaptive::AdaptiveEntry;

/// Sizes and substitutions of one encode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodeReport {
    /// Plain JSON length in bytes
    pub json_bytes: usize,
    /// Tokenized payload length (before compression)
    pub payload_bytes: usize,
    /// Final token length
    pub token_bytes: usize,
    /// Built-in dictionary tokens written
    pub builtin_substitutions: usize,
    /// Custom dictionary tokens written
    pub custom_substitutions: usize,
    /// Custom words selected, in symbol order
    pub custom_words: Vec<AdaptiveEntry>,
}

impl EncodeReport {
    /// JSON size over token size (higher = better)
    pub fn compression_ratio(&self) -> f64 {
        if self.token_bytes == 0 {
            return 1.0;
        }
        self.json_bytes as f64 / self.token_bytes as f64
    }

    /// Share of the JSON removed by the dictionary stages alone
    pub fn dictionary_savings_percent(&self) -> f64 {
        if self.json_bytes == 0 {
            return 0.0;
        }
        (1.0 - (self.payload_bytes as f64 / self.json_bytes as f64)) * 100.0
    }
}

/// Aggregate statistics over many encodes and decodes
#[derive(Debug, Clone, Default)]
pub struct CodecMetrics {
    /// Total JSON bytes encoded
    pub json_bytes: u64,
    /// Total token bytes produced
    pub token_bytes: u64,
    /// Number of encodes
    pub encode_count: u64,
    /// Successful decodes
    pub decode_successes: u64,
    /// Failed decodes
    pub decode_failures: u64,
    /// Custom words selected over all encodes
    pub custom_words: u64,
}

impl CodecMetrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an encode
    pub fn record_encode(&mut self, report: &EncodeReport) {
        self.json_bytes += report.json_bytes as u64;
        self.token_bytes += report.token_bytes as u64;
        self.custom_words += report.custom_words.len() as u64;
        self.encode_count += 1;
    }

    /// Record a decode result
    pub fn record_decode(&mut self, success: bool) {
        if success {
            self.decode_successes += 1;
        } else {
            self.decode_failures += 1;
        }
    }

    /// Calculate compression ratio (higher = better)
    pub fn compression_ratio(&self) -> f64 {
        if self.token_bytes == 0 {
            return 1.0;
        }
        self.json_bytes as f64 / self.token_bytes as f64
    }

    /// Calculate space savings percentage
    pub fn space_savings_percent(&self) -> f64 {
        if self.json_bytes == 0 {
            return 0.0;
        }
        (1.0 - (self.token_bytes as f64 / self.json_bytes as f64)) * 100.0
    }

    /// Share of decodes that failed (0.0 - 1.0)
    pub fn decode_failure_rate(&self) -> f64 {
        let total = self.decode_successes + self.decode_failures;
        if total == 0 {
            return 0.0;
        }
        self.decode_failures as f64 / total as f64
    }

    /// Get average token length
    pub fn average_token_size(&self) -> f64 {
        if self.encode_count == 0 {
            return 0.0;
        }
        self.token_bytes as f64 / self.encode_count as f64
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a human-readable report
    pub fn report(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Scenario Codec Metrics ===\n\n");
        report.push_str(&format!("Scenarios encoded: {}\n", self.encode_count));
        report.push_str(&format!("JSON bytes: {} bytes\n", self.json_bytes));
        report.push_str(&format!("Token bytes: {} bytes\n", self.token_bytes));
        report.push_str(&format!(
            "Compression ratio: {:.2}x\n",
            self.compression_ratio()
        ));
        report.push_str(&format!(
            "Space savings: {:.1}%\n",
            self.space_savings_percent()
        ));
        report.push_str(&format!(
            "Average token size: {:.1} bytes\n",
            self.average_token_size()
        ));
        report.push_str(&format!("Custom words selected: {}\n\n", self.custom_words));
        report.push_str(&format!(
            "Decodes: {} ok, {} failed ({:.1}% failure rate)\n",
            self.decode_successes,
            self.decode_failures,
            self.decode_failure_rate() * 100.0
        ));

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(json: usize, payload: usize, token: usize) -> EncodeReport {
        EncodeReport {
            json_bytes: json,
            payload_bytes: payload,
            token_bytes: token,
            ..Default::default()
        }
    }

    #[test]
    fn test_report_ratios() {
        let r = report(400, 200, 100);
        assert!((r.compression_ratio() - 4.0).abs() < 0.001);
        assert!((r.dictionary_savings_percent() - 50.0).abs() < 0.001);
        assert_eq!(EncodeReport::default().compression_ratio(), 1.0);
    }

    #[test]
    fn test_aggregate() {
        let mut metrics = CodecMetrics::new();
        metrics.record_encode(&report(300, 150, 100));
        metrics.record_encode(&report(100, 60, 50));
        metrics.record_decode(true);
        metrics.record_decode(false);

        assert_eq!(metrics.encode_count, 2);
        assert!((metrics.compression_ratio() - 400.0 / 150.0).abs() < 0.001);
        assert!((metrics.average_token_size() - 75.0).abs() < 0.001);
        assert!((metrics.decode_failure_rate() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_report_text() {
        let mut metrics = CodecMetrics::new();
        metrics.record_encode(&report(200, 100, 50));
        let text = metrics.report();
        assert!(text.contains("Scenarios encoded: 1"));
        assert!(text.contains("4.00x"));

        metrics.reset();
        assert_eq!(metrics.encode_count, 0);
    }
}
