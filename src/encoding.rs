//! Time-step run-length codec between musical events and token sequences.
//!
//! A note or rest lasting `D` time steps encodes as its onset token followed
//! by `D - 1` hold markers. With the default 0.25-quarter-length step, a
//! quarter note on middle C becomes `60 _ _ _`.
//!
//! [`decode`] is the exact inverse of [`encode`] for every event sequence
//! whose durations are integer multiples of the time step.

use crate::token::Token;
use crate::{Error, Result};

/// Tolerance for deciding that a duration is an exact multiple of the step.
const STEP_EPSILON: f64 = 1e-6;

/// One monophonic musical event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// A sounded note.
    Note {
        /// MIDI pitch number (0–127).
        pitch: u8,
        /// Duration in quarter lengths.
        quarter_length: f64,
    },
    /// Silence.
    Rest {
        /// Duration in quarter lengths.
        quarter_length: f64,
    },
}

impl Event {
    /// Duration in quarter lengths.
    pub fn quarter_length(&self) -> f64 {
        match self {
            Event::Note { quarter_length, .. } | Event::Rest { quarter_length } => *quarter_length,
        }
    }

    /// The token that starts this event's run.
    fn onset_token(&self) -> Token {
        match self {
            Event::Note { pitch, .. } => Token::Pitch(*pitch),
            Event::Rest { .. } => Token::Rest,
        }
    }
}

/// Encode an event sequence into time-step tokens.
///
/// Every duration must be a positive integer multiple of `time_step`; a
/// violation rejects the whole sequence so no partially encoded piece can
/// reach the corpus.
pub fn encode(events: &[Event], time_step: f64) -> Result<Vec<Token>> {
    if !(time_step > 0.0) {
        return Err(Error::Config(format!(
            "time step must be > 0, got {time_step}"
        )));
    }

    let mut tokens = Vec::new();
    for (i, event) in events.iter().enumerate() {
        let quarter_length = event.quarter_length();
        let ratio = quarter_length / time_step;
        let steps = ratio.round();
        if steps < 1.0 || (ratio - steps).abs() > STEP_EPSILON {
            return Err(Error::Encoding(format!(
                "event {i}: duration {quarter_length} is not a positive multiple of time step {time_step}"
            )));
        }

        tokens.push(event.onset_token());
        for _ in 1..steps as usize {
            tokens.push(Token::Hold);
        }
    }
    Ok(tokens)
}

/// Decode a time-step token sequence back into events.
///
/// Scans the tokens keeping the current onset and its elapsed run length; a
/// non-hold token closes the previous run, and the final run is flushed at
/// end of input. Delimiters never appear in event streams (the encoder does
/// not emit them and generation strips them), so one here means the input is
/// corrupt.
pub fn decode(tokens: &[Token], time_step: f64) -> Result<Vec<Event>> {
    if !(time_step > 0.0) {
        return Err(Error::Config(format!(
            "time step must be > 0, got {time_step}"
        )));
    }

    let mut events = Vec::new();
    let mut current: Option<Token> = None;
    let mut run_length = 0usize;

    for (i, &token) in tokens.iter().enumerate() {
        match token {
            Token::Hold => run_length += 1,
            Token::Delimiter => {
                return Err(Error::Encoding(format!(
                    "token {i}: delimiter marker inside an event stream"
                )));
            }
            onset => {
                if let Some(previous) = current {
                    events.push(close_run(previous, run_length, time_step));
                }
                current = Some(onset);
                run_length = 1;
            }
        }
    }
    if let Some(previous) = current {
        events.push(close_run(previous, run_length, time_step));
    }
    Ok(events)
}

fn close_run(onset: Token, run_length: usize, time_step: f64) -> Event {
    let quarter_length = run_length as f64 * time_step;
    match onset {
        Token::Pitch(pitch) => Event::Note {
            pitch,
            quarter_length,
        },
        // decode only feeds pitch/rest onsets here
        _ => Event::Rest { quarter_length },
    }
}
