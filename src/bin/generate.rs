//! Melody generation CLI.
//!
//! Loads the vocabulary mapping and trained LSTM weights, generates a melody
//! from a seed token string, and prints both the token sequence and the
//! reconstructed note/rest events. Rendering the events to MIDI or a score
//! is left to external tooling.

use std::path::PathBuf;

use clap::Parser;
use melody_rnn_rs::config::LstmConfig;
use melody_rnn_rs::encoding::{self, Event};
use melody_rnn_rs::generator::{GenerationParams, MelodyGenerator};
use melody_rnn_rs::model::MelodyLstm;
use melody_rnn_rs::token::Token;
use melody_rnn_rs::vocab::Vocabulary;

#[derive(Parser, Debug)]
#[command(name = "generate", about = "Generate a melody from a trained LSTM")]
struct Args {
    /// Vocabulary mapping written during preprocessing.
    #[arg(long, default_value = "mapping.json")]
    mapping: PathBuf,

    /// Trained model weights (safetensors).
    #[arg(long, short = 'w')]
    weights: PathBuf,

    /// Seed melody as space-separated tokens.
    #[arg(long, short = 's', default_value = "60 _ 67 _ 67 _ 67 _ 69 _ 67 _ 65 _")]
    seed: String,

    /// Upper bound on generated tokens.
    #[arg(long, default_value_t = 500)]
    num_steps: usize,

    /// Sampling temperature (low = conservative, high = adventurous).
    #[arg(long, short = 't', default_value_t = 0.7)]
    temperature: f32,

    /// RNG seed. Omit for a different melody each run.
    #[arg(long)]
    rng_seed: Option<u64>,

    /// Model context window used during training.
    #[arg(long, default_value_t = 64)]
    sequence_length: usize,

    /// LSTM hidden state width used during training.
    #[arg(long, default_value_t = 256)]
    hidden_size: usize,

    /// Time step in quarter lengths for event reconstruction.
    #[arg(long, default_value_t = 0.25)]
    time_step: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let device = candle_core::Device::cuda_if_available(0)?;
    tracing::info!("using device: {:?}", device);

    let vocab = Vocabulary::load(&args.mapping)?;
    let model = MelodyLstm::load(
        &args.weights,
        &LstmConfig {
            hidden_size: args.hidden_size,
        },
        vocab.len(),
        &device,
    )?;
    let mut generator = MelodyGenerator::new(model, vocab, args.sequence_length, device)?;

    let melody = generator.generate(&GenerationParams {
        seed: args.seed,
        num_steps: args.num_steps,
        temperature: args.temperature,
        rng_seed: args.rng_seed,
    })?;

    println!("{}", Token::join(&melody));
    for event in encoding::decode(&melody, args.time_step)? {
        match event {
            Event::Note {
                pitch,
                quarter_length,
            } => println!("note {pitch:>3}  {quarter_length} ql"),
            Event::Rest { quarter_length } => println!("rest      {quarter_length} ql"),
        }
    }

    Ok(())
}
