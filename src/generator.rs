//! Autoregressive melody generation.
//!
//! The generator owns an immutable [`Vocabulary`] and a [`SequenceModel`]
//! and drives the model one token at a time:
//!
//! 1. seed the context with a full window of delimiter codes plus the seed
//!    melody's codes
//! 2. truncate the context to the last `sequence_length` codes
//! 3. one-hot encode the window and ask the model for a distribution
//! 4. draw the next code with temperature sampling
//! 5. append it to the context; stop if it decodes to the delimiter
//!
//! The loop runs until the delimiter is drawn or the step budget is spent,
//! whichever comes first. The returned melody is the seed plus everything
//! generated, never containing a delimiter; the delimiter padding is never
//! part of the visible output.

use candle_core::Device;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::encoding::{self, Event};
use crate::model::{one_hot, SequenceModel};
use crate::sampling::sample_with_temperature;
use crate::token::Token;
use crate::vocab::Vocabulary;
use crate::{Error, Result};

/// Parameters for one generation call.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    /// Seed melody as a space-separated token string, e.g. `"60 _ 62 _"`.
    pub seed: String,

    /// Upper bound on generated tokens (excluding the seed).
    pub num_steps: usize,

    /// Sampling temperature; must be strictly positive.
    pub temperature: f32,

    /// RNG seed for reproducible generation. Omit for a random melody each run.
    pub rng_seed: Option<u64>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: "60 _ 67 _ 67 _ 67 _ 69 _ 67 _ 65 _".to_string(),
            num_steps: 500,
            temperature: 0.7,
            rng_seed: None,
        }
    }
}

/// Autoregressive melody generator.
pub struct MelodyGenerator<M: SequenceModel> {
    model: M,
    vocab: Vocabulary,
    sequence_length: usize,
    device: Device,
}

impl<M: SequenceModel> MelodyGenerator<M> {
    /// Wrap a loaded model and its vocabulary.
    ///
    /// The vocabulary must be the one the model was trained with — a size
    /// mismatch is a correctness bug and is rejected here rather than
    /// discovered mid-generation.
    pub fn new(
        model: M,
        vocab: Vocabulary,
        sequence_length: usize,
        device: Device,
    ) -> Result<Self> {
        if sequence_length == 0 {
            return Err(Error::Config("sequence length must be > 0".into()));
        }
        if model.vocab_size() != vocab.len() {
            return Err(Error::Config(format!(
                "model vocabulary size {} does not match mapping size {}",
                model.vocab_size(),
                vocab.len()
            )));
        }
        // generation cannot start or stop without a delimiter code
        vocab.code(Token::Delimiter)?;
        Ok(Self {
            model,
            vocab,
            sequence_length,
            device,
        })
    }

    /// Generate a melody from a seed.
    ///
    /// Returns the seed tokens followed by up to `num_steps` generated
    /// tokens. Generation stops early when the model emits the delimiter;
    /// the delimiter itself is never returned.
    pub fn generate(&mut self, params: &GenerationParams) -> Result<Vec<Token>> {
        let seed_tokens = Token::parse_sequence(&params.seed)?;
        if seed_tokens.is_empty() {
            return Err(Error::Config("seed melody is empty".into()));
        }
        if params.num_steps == 0 {
            return Err(Error::Config("num_steps must be > 0".into()));
        }
        if !(params.temperature > 0.0) {
            return Err(Error::Config(format!(
                "temperature must be > 0, got {}",
                params.temperature
            )));
        }

        let delimiter = self.vocab.code(Token::Delimiter)?;
        let mut context = vec![delimiter; self.sequence_length];
        context.extend(self.vocab.encode(&seed_tokens)?);
        let mut melody = seed_tokens;

        let mut rng = match params.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };

        for step in 0..params.num_steps {
            let window = &context[context.len() - self.sequence_length..];
            let context_tensor = one_hot(window, self.vocab.len(), &self.device)?.unsqueeze(0)?;

            let probabilities = self.model.predict(&context_tensor)?;
            validate_distribution(&probabilities, self.vocab.len())?;

            let code = sample_with_temperature(&probabilities, params.temperature, &mut rng)? as u32;
            context.push(code);

            let token = self.vocab.token(code)?;
            if token.is_delimiter() {
                tracing::debug!("delimiter sampled after {} steps", step + 1);
                break;
            }
            melody.push(token);
        }

        tracing::debug!(
            "generated {} tokens from a {}-token seed",
            melody.len(),
            params.seed.split_whitespace().count()
        );
        Ok(melody)
    }

    /// Generate and reconstruct the melody as musical events.
    pub fn generate_events(
        &mut self,
        params: &GenerationParams,
        time_step: f64,
    ) -> Result<Vec<Event>> {
        let melody = self.generate(params)?;
        encoding::decode(&melody, time_step)
    }
}

/// Reject malformed model output instead of renormalizing it.
fn validate_distribution(probabilities: &[f32], vocab_size: usize) -> Result<()> {
    if probabilities.len() != vocab_size {
        return Err(Error::Model(format!(
            "distribution has {} entries, expected {vocab_size}",
            probabilities.len()
        )));
    }
    if probabilities.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(Error::Model(
            "distribution contains non-finite or negative entries".into(),
        ));
    }
    let sum: f32 = probabilities.iter().sum();
    if (sum - 1.0).abs() > 1e-3 {
        return Err(Error::Model(format!("distribution sums to {sum}, not 1")));
    }
    Ok(())
}
