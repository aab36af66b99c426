//! Symbolic tokens of the time-series melody encoding.
//!
//! The encoding's alphabet has four kinds of symbols:
//!
//! - a pitch onset, written as the decimal MIDI number (`"60"` = middle C)
//! - a rest onset, written `"r"`
//! - a hold marker, written `"_"` — extends the previous onset by one time step
//! - a delimiter, written `"/"` — piece boundary in the corpus, end-of-melody
//!   during generation
//!
//! The string forms are the interchange representation (corpus files, seed
//! strings, the vocabulary mapping); in-crate everything is a [`Token`].

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// One symbol of the melody encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// Note onset with a MIDI pitch number (0–127).
    Pitch(u8),
    /// Rest onset.
    Rest,
    /// Extends the previous note/rest by one more time step.
    Hold,
    /// Piece boundary / end-of-melody marker.
    Delimiter,
}

impl Token {
    /// Whether this token prolongs the previous event rather than starting one.
    pub fn is_hold(&self) -> bool {
        matches!(self, Token::Hold)
    }

    /// Whether this token marks a piece boundary.
    pub fn is_delimiter(&self) -> bool {
        matches!(self, Token::Delimiter)
    }

    /// Parse a whitespace-separated token string (seed melodies, corpus blobs).
    pub fn parse_sequence(s: &str) -> Result<Vec<Token>> {
        s.split_whitespace().map(str::parse).collect()
    }

    /// Join tokens into the space-separated interchange form.
    pub fn join(tokens: &[Token]) -> String {
        tokens
            .iter()
            .map(Token::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Pitch(p) => write!(f, "{p}"),
            Token::Rest => write!(f, "r"),
            Token::Hold => write!(f, "_"),
            Token::Delimiter => write!(f, "/"),
        }
    }
}

impl FromStr for Token {
    type Err = Error;

    fn from_str(s: &str) -> Result<Token> {
        match s {
            "r" => Ok(Token::Rest),
            "_" => Ok(Token::Hold),
            "/" => Ok(Token::Delimiter),
            _ => {
                let pitch: u8 = s
                    .parse()
                    .map_err(|_| Error::Vocab(format!("unrecognized token '{s}'")))?;
                if pitch > 127 {
                    return Err(Error::Vocab(format!("pitch {pitch} outside MIDI range 0-127")));
                }
                Ok(Token::Pitch(pitch))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_round_trip() {
        for s in ["60", "0", "127", "r", "_", "/"] {
            let token: Token = s.parse().unwrap();
            assert_eq!(token.to_string(), s);
        }
    }

    #[test]
    fn test_rejects_invalid_tokens() {
        assert!("x".parse::<Token>().is_err());
        assert!("128".parse::<Token>().is_err());
        assert!("-1".parse::<Token>().is_err());
        assert!("60.5".parse::<Token>().is_err());
        assert!("".parse::<Token>().is_err());
    }

    #[test]
    fn test_parse_sequence() {
        let tokens = Token::parse_sequence("60 _ r _ /").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Pitch(60),
                Token::Hold,
                Token::Rest,
                Token::Hold,
                Token::Delimiter
            ]
        );
        assert_eq!(Token::join(&tokens), "60 _ r _ /");
    }

    #[test]
    fn test_parse_sequence_surfaces_bad_token() {
        assert!(Token::parse_sequence("60 _ bogus").is_err());
    }
}
