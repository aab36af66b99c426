//! Token ↔ integer-code vocabulary.
//!
//! Built once per corpus version by enumerating unique tokens in first-seen
//! order, then persisted as a JSON mapping (`mapping.json`) and reused
//! unchanged at generation time. The forward and inverse maps are built
//! together so decoding a code is a plain lookup.
//!
//! A code or token absent from the mapping is always an error — it signals a
//! corpus/model mismatch, never something to paper over with a default.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::token::Token;
use crate::{Error, Result};

/// Bijective mapping between [`Token`]s and dense integer codes.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    forward: HashMap<Token, u32>,
    inverse: HashMap<u32, Token>,
}

impl Vocabulary {
    /// Build a vocabulary from a token stream.
    ///
    /// Codes are assigned sequentially from 0 in first-seen order; repeated
    /// tokens keep their original code.
    pub fn build<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = Token>,
    {
        let mut vocab = Vocabulary::default();
        for token in tokens {
            if !vocab.forward.contains_key(&token) {
                let code = vocab.forward.len() as u32;
                vocab.forward.insert(token, code);
                vocab.inverse.insert(code, token);
            }
        }
        vocab
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Integer code for a token.
    pub fn code(&self, token: Token) -> Result<u32> {
        self.forward
            .get(&token)
            .copied()
            .ok_or_else(|| Error::Vocab(format!("token '{token}' not in vocabulary")))
    }

    /// Token for an integer code.
    pub fn token(&self, code: u32) -> Result<Token> {
        self.inverse
            .get(&code)
            .copied()
            .ok_or_else(|| Error::Vocab(format!("code {code} not in vocabulary")))
    }

    /// Map a token sequence to its codes.
    pub fn encode(&self, tokens: &[Token]) -> Result<Vec<u32>> {
        tokens.iter().map(|&t| self.code(t)).collect()
    }

    /// Write the mapping as a JSON object of token string → code.
    ///
    /// Keys are sorted so the file is stable and diffable.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mappings: BTreeMap<String, u32> = self
            .forward
            .iter()
            .map(|(token, &code)| (token.to_string(), code))
            .collect();
        std::fs::write(path, serde_json::to_string_pretty(&mappings)?)?;
        tracing::info!("saved {} token mappings to {:?}", mappings.len(), path);
        Ok(())
    }

    /// Load a mapping written by [`Vocabulary::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mappings: HashMap<String, u32> = serde_json::from_str(&text)?;

        let mut vocab = Vocabulary::default();
        for (symbol, code) in mappings {
            let token: Token = symbol.parse()?;
            if vocab.inverse.insert(code, token).is_some() {
                return Err(Error::Vocab(format!(
                    "duplicate code {code} in mapping {path:?}"
                )));
            }
            vocab.forward.insert(token, code);
        }
        tracing::info!("loaded {} token mappings from {:?}", vocab.len(), path);
        Ok(vocab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_order_codes() {
        let tokens = Token::parse_sequence("60 _ r /").unwrap();
        let vocab = Vocabulary::build(tokens);
        assert_eq!(vocab.len(), 4);
        assert_eq!(vocab.code(Token::Pitch(60)).unwrap(), 0);
        assert_eq!(vocab.code(Token::Hold).unwrap(), 1);
        assert_eq!(vocab.code(Token::Rest).unwrap(), 2);
        assert_eq!(vocab.code(Token::Delimiter).unwrap(), 3);
        // decoding code 2 must yield the rest marker
        assert_eq!(vocab.token(2).unwrap(), Token::Rest);
    }

    #[test]
    fn test_repeated_tokens_keep_codes() {
        let tokens = Token::parse_sequence("60 _ 60 _ 62 _").unwrap();
        let vocab = Vocabulary::build(tokens);
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.code(Token::Pitch(60)).unwrap(), 0);
        assert_eq!(vocab.code(Token::Pitch(62)).unwrap(), 2);
    }

    #[test]
    fn test_bijection() {
        let tokens = Token::parse_sequence("55 57 59 60 r _ /").unwrap();
        let vocab = Vocabulary::build(tokens.clone());
        for token in tokens {
            let code = vocab.code(token).unwrap();
            assert_eq!(vocab.token(code).unwrap(), token);
        }
    }

    #[test]
    fn test_unknown_entries_are_errors() {
        let vocab = Vocabulary::build(Token::parse_sequence("60 _").unwrap());
        assert!(vocab.code(Token::Pitch(61)).is_err());
        assert!(vocab.token(99).is_err());
    }

    #[test]
    fn test_encode_sequence() {
        let vocab = Vocabulary::build(Token::parse_sequence("60 _ r").unwrap());
        let codes = vocab
            .encode(&Token::parse_sequence("r _ 60").unwrap())
            .unwrap();
        assert_eq!(codes, vec![2, 1, 0]);
    }

    #[test]
    fn test_save_load_round_trip() {
        let vocab = Vocabulary::build(Token::parse_sequence("60 62 64 r _ /").unwrap());
        let path = std::env::temp_dir().join(format!("mapping_test_{}.json", std::process::id()));
        vocab.save(&path).unwrap();
        let loaded = Vocabulary::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.len(), vocab.len());
        for token in Token::parse_sequence("60 62 64 r _ /").unwrap() {
            assert_eq!(loaded.code(token).unwrap(), vocab.code(token).unwrap());
        }
    }
}
