//! Corpus preprocessing CLI.
//!
//! Stands in at the notation-loader boundary: consumes a directory of
//! already-parsed piece files (one event per line, `<midi-pitch|r>
//! <quarter-length>`), screens durations, encodes each piece into time-step
//! tokens, assembles the training corpus, and writes `corpus.txt` plus
//! `mapping.json`. Pieces with unacceptable durations are skipped wholesale.
//!
//! Prints the training tensor shapes so a training run can be sanity-checked
//! before leaving Rust.

use std::path::PathBuf;

use clap::Parser;
use melody_rnn_rs::config::CorpusConfig;
use melody_rnn_rs::corpus;
use melody_rnn_rs::encoding::Event;
use melody_rnn_rs::vocab::Vocabulary;

#[derive(Parser, Debug)]
#[command(
    name = "preprocess",
    about = "Encode parsed melody files into a training corpus"
)]
struct Args {
    /// Directory of piece files (one event per line: `<midi-pitch|r> <quarter-length>`).
    #[arg(long, short = 'i')]
    input_dir: PathBuf,

    /// Output path for the concatenated corpus.
    #[arg(long, default_value = "corpus.txt")]
    corpus: PathBuf,

    /// Output path for the vocabulary mapping.
    #[arg(long, default_value = "mapping.json")]
    mapping: PathBuf,

    /// Minimal duration unit in quarter lengths.
    #[arg(long, default_value_t = 0.25)]
    time_step: f64,

    /// Model context window (and delimiter-run length).
    #[arg(long, default_value_t = 64)]
    sequence_length: usize,
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
    let config = CorpusConfig {
        time_step: args.time_step,
        sequence_length: args.sequence_length,
        ..CorpusConfig::default()
    };

    let mut paths: Vec<PathBuf> = std::fs::read_dir(&args.input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();
    tracing::info!("found {} piece files in {:?}", paths.len(), args.input_dir);

    let mut pieces = Vec::new();
    for path in &paths {
        let events = match parse_piece(&std::fs::read_to_string(path)?) {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!("skipping {path:?}: {e}");
                continue;
            }
        };
        match corpus::encode_piece(&events, &config) {
            Ok(tokens) => pieces.push(tokens),
            Err(e) => tracing::warn!("skipping {path:?}: {e}"),
        }
    }
    if pieces.is_empty() {
        anyhow::bail!("no usable pieces in {:?}", args.input_dir);
    }

    let assembled = corpus::assemble(&pieces, config.sequence_length);
    corpus::save_corpus(&args.corpus, &assembled)?;

    let vocab = Vocabulary::build(assembled.iter().copied());
    vocab.save(&args.mapping)?;

    let codes = vocab.encode(&assembled)?;
    let (inputs, targets) = corpus::training_sequences(
        &codes,
        config.sequence_length,
        vocab.len(),
        &candle_core::Device::Cpu,
    )?;
    println!(
        "{} pieces, {} tokens, vocabulary {} — training inputs {:?}, targets {:?}",
        pieces.len(),
        assembled.len(),
        vocab.len(),
        inputs.dims(),
        targets.dims()
    );

    Ok(())
}

/// Parse one piece file: an event per line, blank lines ignored.
fn parse_piece(text: &str) -> anyhow::Result<Vec<Event>> {
    let mut events = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (symbol, duration) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| anyhow::anyhow!("line {}: expected `<pitch|r> <ql>`", lineno + 1))?;
        let quarter_length: f64 = duration.trim().parse()?;
        if symbol == "r" {
            events.push(Event::Rest { quarter_length });
        } else {
            events.push(Event::Note {
                pitch: symbol.parse()?,
                quarter_length,
            });
        }
    }
    Ok(events)
}
