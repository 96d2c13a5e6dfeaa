//! End-to-end decode tests driven through the public API only: a
//! text-format graph loaded from disk, a scripted `MockScorer`, and the
//! `Decoder` entry point. Complements the unit tests living alongside
//! each component in `src/`.

use std::io::Write;

use tempfile::NamedTempFile;
use wfst_decoder::fst::text;
use wfst_decoder::scorer::MockScorer;
use wfst_decoder::{Decoder, DecoderConfig, Error};

fn graph_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn decodes_a_text_format_graph_end_to_end() {
    let file = graph_file("0 1 1 7 0.0\n1 0.0\n");
    let fst = text::load(file.path()).unwrap();

    let config = DecoderConfig {
        sos: 0,
        eos: 1,
        ..Default::default()
    };
    let scorer = MockScorer::new(vec![vec![0.0, -10.0], vec![-10.0, 0.0]]);
    let mut decoder = Decoder::new(&fst, scorer, config);

    let labels = decoder.decode(&(), 0, || false).unwrap();
    assert_eq!(labels, vec![7]);
}

#[test]
fn reusing_a_decoder_across_utterances_reinitializes_cleanly() {
    let file = graph_file("0 1 1 7 0.0\n1 0.0\n");
    let fst = text::load(file.path()).unwrap();

    let config = DecoderConfig {
        sos: 0,
        eos: 1,
        ..Default::default()
    };
    let scorer = MockScorer::new(vec![vec![0.0, -10.0], vec![-10.0, 0.0]]);
    let mut decoder = Decoder::new(&fst, scorer, config);

    let first = decoder.decode(&(), 0, || false).unwrap();
    let second = decoder.decode(&(), 0, || false).unwrap();
    assert_eq!(first, second);
}

#[test]
fn malformed_graph_file_surfaces_as_invalid_graph() {
    let file = graph_file("not a valid fst line at all\n");
    let err = text::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::InvalidGraph(_)));
}

#[test]
fn missing_graph_file_surfaces_as_io_error() {
    let err = text::load(std::path::Path::new("/nonexistent/graph.fst")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
