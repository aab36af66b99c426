//! Training-corpus assembly and persistence.
//!
//! Encoded pieces are concatenated into one token stream with a full context
//! window of delimiters after each piece, so no training window can span two
//! unrelated pieces. The blob is persisted as a single space-separated line
//! (`corpus.txt`) and consumed as sliding (input-window, target) pairs.

use candle_core::{Device, Tensor};
use std::path::Path;

use crate::config::CorpusConfig;
use crate::encoding::{self, Event};
use crate::model::one_hot;
use crate::token::Token;
use crate::{Error, Result};

/// Screen a piece's durations and encode it.
///
/// A piece with any unacceptable duration is rejected wholesale — callers
/// skip it and move on; no partial encoding reaches the corpus.
pub fn encode_piece(events: &[Event], config: &CorpusConfig) -> Result<Vec<Token>> {
    config.check_durations(events)?;
    encoding::encode(events, config.time_step)
}

/// Concatenate encoded pieces, each followed by a `sequence_length`-long
/// delimiter run.
pub fn assemble(pieces: &[Vec<Token>], sequence_length: usize) -> Vec<Token> {
    let total: usize = pieces.iter().map(|p| p.len() + sequence_length).sum();
    let mut corpus = Vec::with_capacity(total);
    for piece in pieces {
        corpus.extend_from_slice(piece);
        corpus.extend(std::iter::repeat(Token::Delimiter).take(sequence_length));
    }
    tracing::info!(
        "assembled corpus: {} pieces, {} tokens",
        pieces.len(),
        corpus.len()
    );
    corpus
}

/// Write the corpus as one space-separated line.
pub fn save_corpus(path: &Path, corpus: &[Token]) -> Result<()> {
    std::fs::write(path, Token::join(corpus))?;
    tracing::info!("saved {} corpus tokens to {:?}", corpus.len(), path);
    Ok(())
}

/// Load a corpus written by [`save_corpus`].
pub fn load_corpus(path: &Path) -> Result<Vec<Token>> {
    let text = std::fs::read_to_string(path)?;
    Token::parse_sequence(&text)
}

/// Extract sliding-window training pairs from an integer-coded corpus.
///
/// Returns `(inputs, targets)`: a `(N, sequence_length, vocab_size)` one-hot
/// f32 tensor and the `(N,)` u32 codes that follow each window, with
/// `N = corpus_len - sequence_length`.
pub fn training_sequences(
    codes: &[u32],
    sequence_length: usize,
    vocab_size: usize,
    device: &Device,
) -> Result<(Tensor, Tensor)> {
    if sequence_length == 0 {
        return Err(Error::Config("sequence length must be > 0".into()));
    }
    if codes.len() <= sequence_length {
        return Err(Error::Config(format!(
            "corpus of {} tokens is too short for sequence length {sequence_length}",
            codes.len()
        )));
    }

    let num_sequences = codes.len() - sequence_length;
    let mut windows = Vec::with_capacity(num_sequences);
    for i in 0..num_sequences {
        windows.push(one_hot(&codes[i..i + sequence_length], vocab_size, device)?);
    }
    let inputs = Tensor::stack(&windows, 0)?;
    let targets = Tensor::from_vec(
        codes[sequence_length..].to_vec(),
        num_sequences,
        device,
    )?;
    Ok((inputs, targets))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> Vec<Token> {
        Token::parse_sequence(s).unwrap()
    }

    #[test]
    fn test_encode_piece_screens_durations() {
        let config = CorpusConfig::default();
        let good = [
            Event::Note {
                pitch: 60,
                quarter_length: 1.0,
            },
            Event::Rest { quarter_length: 0.5 },
        ];
        assert_eq!(
            Token::join(&encode_piece(&good, &config).unwrap()),
            "60 _ _ _ r _"
        );

        let bad = [Event::Note {
            pitch: 60,
            quarter_length: 1.25,
        }];
        assert!(encode_piece(&bad, &config).is_err());
    }

    #[test]
    fn test_assemble_separates_pieces_with_full_window() {
        let pieces = vec![tokens("60 _"), tokens("62 _ _")];
        let corpus = assemble(&pieces, 4);
        assert_eq!(Token::join(&corpus), "60 _ / / / / 62 _ _ / / / /");
        // a window of 4 starting anywhere inside piece one never reaches piece two
        assert_eq!(corpus.len(), 2 + 4 + 3 + 4);
    }

    #[test]
    fn test_corpus_save_load_round_trip() {
        let corpus = tokens("60 _ _ _ r _ / / 62 _");
        let path = std::env::temp_dir().join(format!("corpus_test_{}.txt", std::process::id()));
        save_corpus(&path, &corpus).unwrap();
        let loaded = load_corpus(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, corpus);
    }

    #[test]
    fn test_training_sequences_shapes() {
        // 7 codes, window 3 → 4 pairs
        let codes = [0u32, 1, 2, 0, 1, 2, 1];
        let (inputs, targets) = training_sequences(&codes, 3, 3, &Device::Cpu).unwrap();
        assert_eq!(inputs.dims(), &[4, 3, 3]);
        assert_eq!(targets.dims(), &[4]);
        assert_eq!(targets.to_vec1::<u32>().unwrap(), vec![0, 1, 2, 1]);
    }

    #[test]
    fn test_training_sequences_one_hot_content() {
        let codes = [1u32, 0, 2, 1];
        let (inputs, _) = training_sequences(&codes, 3, 3, &Device::Cpu).unwrap();
        let first = inputs.get(0).unwrap().to_vec2::<f32>().unwrap();
        assert_eq!(
            first,
            vec![
                vec![0.0, 1.0, 0.0],
                vec![1.0, 0.0, 0.0],
                vec![0.0, 0.0, 1.0],
            ]
        );
    }

    #[test]
    fn test_training_sequences_rejects_short_corpus() {
        let codes = [0u32, 1, 2];
        assert!(training_sequences(&codes, 3, 3, &Device::Cpu).is_err());
        assert!(training_sequences(&codes, 0, 3, &Device::Cpu).is_err());
    }
}
