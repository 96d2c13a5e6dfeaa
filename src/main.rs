// wfst-decoder - CLI entry point
//
// Peripheral glue around the decoder core: load a graph file and a
// config, run one decode against a scripted mock scorer, and print the
// resulting output-label sequence. A real acoustic-model binding is out
// of scope for this crate (see the library docs); the `--script` file is
// how the CLI exercises the decoder end-to-end without one.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use wfst_decoder::fst::text;
use wfst_decoder::scorer::MockScorer;
use wfst_decoder::{Decoder, DecoderConfig, FstView, Result};

#[derive(Parser)]
#[command(name = "wfst-decode")]
#[command(about = "WFST token-passing beam search decoder", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode one utterance against a scripted scorer.
    Decode {
        /// Path to the text-format WFST graph.
        #[arg(long)]
        fst: PathBuf,

        /// Optional TOML config overlay; CLI flags take precedence.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Start-of-sequence symbol id.
        #[arg(long)]
        sos: Option<i32>,

        /// End-of-sequence symbol id.
        #[arg(long)]
        eos: Option<i32>,

        /// JSON file of per-step log-probability vectors for `MockScorer`.
        #[arg(long)]
        script: PathBuf,
    },

    /// Load a graph and report basic structural facts without decoding.
    Validate {
        /// Path to the text-format WFST graph.
        #[arg(long)]
        fst: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decode {
            fst,
            config,
            sos,
            eos,
            script,
        } => run_decode(&fst, config.as_deref(), sos, eos, &script),
        Commands::Validate { fst } => run_validate(&fst),
    }
}

fn run_decode(
    fst_path: &std::path::Path,
    config_path: Option<&std::path::Path>,
    sos: Option<i32>,
    eos: Option<i32>,
    script_path: &std::path::Path,
) -> Result<()> {
    let fst = text::load(fst_path)?;

    let mut config = match config_path {
        Some(path) => DecoderConfig::load(path)?,
        None => DecoderConfig::default(),
    };
    if let Some(sos) = sos {
        config.sos = sos;
    }
    if let Some(eos) = eos {
        config.eos = eos;
    }

    let script_text = std::fs::read_to_string(script_path)?;
    let steps: Vec<Vec<f32>> = serde_json::from_str(&script_text)
        .map_err(|e| wfst_decoder::Error::ScorerFailure(format!("invalid script file: {e}")))?;
    let scorer = MockScorer::new(steps);

    let mut decoder = Decoder::new(&fst, scorer, config);
    let labels = decoder.decode(&(), 0, || false)?;

    for label in labels {
        println!("{label}");
    }
    Ok(())
}

fn run_validate(fst_path: &std::path::Path) -> Result<()> {
    let fst = text::load(fst_path)?;
    let num_states = fst.num_states();
    let num_arcs: usize = (0..num_states).map(|s| fst.arcs(s).len()).sum();
    let num_final = (0..num_states).filter(|&s| fst.is_final(s)).count();

    println!("start state: {:?}", fst.start());
    println!("states: {num_states}");
    println!("arcs: {num_arcs}");
    println!("final states: {num_final}");
    Ok(())
}
