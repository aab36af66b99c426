//! Configuration for corpus preparation and the LSTM model.

use serde::{Deserialize, Serialize};

use crate::encoding::Event;
use crate::{Error, Result};

/// Corpus preparation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Minimal duration unit in quarter lengths (default: 0.25 = sixteenth note).
    #[serde(default = "default_time_step")]
    pub time_step: f64,

    /// Model context window in tokens; also the length of the delimiter run
    /// separating pieces in the assembled corpus (default: 64).
    #[serde(default = "default_sequence_length")]
    pub sequence_length: usize,

    /// Durations (quarter lengths) a piece may contain. Pieces with any other
    /// duration are dropped wholesale.
    #[serde(default = "default_acceptable_durations")]
    pub acceptable_durations: Vec<f64>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            time_step: default_time_step(),
            sequence_length: default_sequence_length(),
            acceptable_durations: default_acceptable_durations(),
        }
    }
}

impl CorpusConfig {
    /// Check every event's duration against the accepted set.
    ///
    /// The error names the first offending event so rejected pieces can be
    /// diagnosed from the logs.
    pub fn check_durations(&self, events: &[Event]) -> Result<()> {
        for (i, event) in events.iter().enumerate() {
            let quarter_length = event.quarter_length();
            let accepted = self
                .acceptable_durations
                .iter()
                .any(|&d| (d - quarter_length).abs() < 1e-9);
            if !accepted {
                return Err(Error::Encoding(format!(
                    "event {i}: duration {quarter_length} not in the accepted set"
                )));
            }
        }
        Ok(())
    }
}

/// LSTM sequence model hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LstmConfig {
    /// Hidden state width (default: 256).
    #[serde(default = "default_hidden_size")]
    pub hidden_size: usize,
}

impl Default for LstmConfig {
    fn default() -> Self {
        Self {
            hidden_size: default_hidden_size(),
        }
    }
}

fn default_time_step() -> f64 {
    0.25
}

fn default_sequence_length() -> usize {
    64
}

fn default_acceptable_durations() -> Vec<f64> {
    vec![
        0.25, // 16th note
        0.5,  // 8th note
        0.75,
        1.0, // quarter note
        1.5,
        2.0, // half note
        3.0,
        4.0, // whole note
    ]
}

fn default_hidden_size() -> usize {
    256
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = CorpusConfig::default();
        assert_eq!(cfg.time_step, 0.25);
        assert_eq!(cfg.sequence_length, 64);
        assert_eq!(cfg.acceptable_durations.len(), 8);
        assert_eq!(LstmConfig::default().hidden_size, 256);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let cfg: CorpusConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.time_step, 0.25);
        let cfg: CorpusConfig = serde_json::from_str(r#"{"sequence_length": 32}"#).unwrap();
        assert_eq!(cfg.sequence_length, 32);
        assert_eq!(cfg.time_step, 0.25);
    }

    #[test]
    fn test_check_durations_accepts_valid_piece() {
        let cfg = CorpusConfig::default();
        let events = [
            Event::Note {
                pitch: 60,
                quarter_length: 1.0,
            },
            Event::Rest { quarter_length: 0.5 },
        ];
        assert!(cfg.check_durations(&events).is_ok());
    }

    #[test]
    fn test_check_durations_rejects_any_bad_event() {
        let cfg = CorpusConfig::default();
        // first event fine, second outside the set — still rejected
        let events = [
            Event::Note {
                pitch: 60,
                quarter_length: 1.0,
            },
            Event::Note {
                pitch: 62,
                quarter_length: 1.25,
            },
        ];
        assert!(cfg.check_durations(&events).is_err());
    }
}
