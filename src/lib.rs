//! LSTM melody generation in pure Rust.
//!
//! A candle-based pipeline that turns monophonic melodies into a
//! fixed-vocabulary time-series token representation for sequence-model
//! training, and generates new melodies autoregressively from a trained
//! model with temperature-controlled sampling.
//!
//! ## Architecture
//!
//! ```text
//! parsed pieces → time-step encoder → corpus assembler → corpus.txt
//!       (events)        (tokens)            │                │
//!                                      vocabulary ──── mapping.json
//!                                           │
//!                                           ▼
//! seed melody → melody generator ⇄ LSTM sequence model (safetensors)
//!                      │
//!                      ▼
//!               event reconstructor → notes/rests for rendering
//! ```
//!
//! Notation parsing (kern/MusicXML/MIDI), model training, and rendering the
//! generated events to a playable file are external to this crate.
//!
//! ## Modules
//!
//! - [`token`] — the four-symbol encoding alphabet
//! - [`encoding`] — reversible event ↔ token time-step codec
//! - [`vocab`] — token ↔ integer-code mapping with JSON persistence
//! - [`corpus`] — corpus assembly and training-pair extraction
//! - [`model`] — [`model::SequenceModel`] seam and the candle LSTM
//! - [`sampling`] — temperature-controlled categorical sampling
//! - [`generator`] — the autoregressive generation loop

pub mod config;
pub mod corpus;
pub mod encoding;
pub mod generator;
pub mod model;
pub mod sampling;
pub mod token;
pub mod vocab;

mod error;

pub use error::{Error, Result};
