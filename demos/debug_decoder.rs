//! Debug Decoder - step through a WFST decode and report frontier state
//!
//! Builds a small fan-out graph, attaches a scripted scorer, and runs the
//! decode loop, printing the graph shape, the scorer's script, and the
//! final completion/backtrace result. Useful for sanity-checking a new
//! graph or scorer script before wiring it into the CLI. Run with
//! `RUST_LOG=debug` for per-step cutoff and closure tracing.

use wfst_decoder::fst::Arc as FstArc;
use wfst_decoder::fst::memory::VectorFst;
use wfst_decoder::scorer::MockScorer;
use wfst_decoder::{Decoder, DecoderConfig, Result};

fn build_demo_graph() -> VectorFst {
    let mut fst = VectorFst::new();
    let start = fst.add_state();
    let mid = fst.add_state();
    let end_a = fst.add_state();
    let end_b = fst.add_state();
    fst.set_start(start);
    fst.set_final(end_a, 0.0);
    fst.set_final(end_b, 0.2);

    // start -> mid is a non-emitting arc, exercised by the closure before
    // the first emitting step even runs.
    fst.add_arc(start, FstArc::new(0, 0, 0.0, mid));
    fst.add_arc(mid, FstArc::new(1, 10, 0.0, end_a));
    fst.add_arc(mid, FstArc::new(2, 20, 0.1, end_b));
    fst
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("WFST decoder debugger");
    println!("{}", "=".repeat(60));

    println!("\nStep 1: building demo graph");
    let fst = build_demo_graph();
    println!("  states: 4, start -> (eps) -> mid -> {{end_a, end_b}}");

    println!("\nStep 2: scripting the mock scorer");
    // vocab = [label_1, label_2, eos]; favor label_2 (cheaper acoustically
    // despite the slightly higher graph cost) on step 0, then eos.
    let scorer = MockScorer::new(vec![vec![-1.0, 0.0, -10.0], vec![-10.0, -10.0, 0.0]]);
    println!("  step 0 favors vocab index 1, step 1 favors eos");

    println!("\nStep 3: running decode");
    let config = DecoderConfig {
        sos: 0,
        eos: 2,
        ..Default::default()
    };
    let mut decoder = Decoder::new(&fst, scorer, config);
    let labels = decoder.decode(&(), 0, || false)?;

    println!("\nStep 4: result");
    println!("  completions recorded: {}", decoder.completion_count());
    println!("  output labels: {labels:?}");

    Ok(())
}
