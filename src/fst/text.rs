//! Text-format WFST loader
//!
//! Parses the common AT&T FSM transducer convention: one arc per line as
//! `src dst ilabel olabel weight`, and final states as a bare `state` or
//! `state weight` line. The first line's source state is taken as the
//! start state, matching the convention OpenFST's own text format uses.
//! This loader only reads that plain-text shape; it does not decode
//! OpenFST's compiled binary container.

use std::path::Path;

use super::{Arc, FstView, StateId, memory::VectorFst};

/// Parses AT&T FSM text into a [`VectorFst`].
pub fn parse(text: &str) -> crate::Result<VectorFst> {
    let mut fst = VectorFst::new();
    let mut start: Option<StateId> = None;

    for (lineno, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();

        let ensure_state = |fst: &mut VectorFst, id: StateId| {
            while fst.num_states() <= id {
                fst.add_state();
            }
        };

        match fields.as_slice() {
            [src, dst, ilabel, olabel, weight] => {
                let src = parse_state(src, lineno)?;
                let dst = parse_state(dst, lineno)?;
                ensure_state(&mut fst, src.max(dst));
                if start.is_none() {
                    start = Some(src);
                }
                let ilabel = parse_label(ilabel, lineno)?;
                let olabel = parse_label(olabel, lineno)?;
                let weight = parse_weight(weight, lineno)?;
                fst.add_arc(src, Arc::new(ilabel, olabel, weight, dst));
            }
            [src, dst, ilabel, olabel] => {
                let src = parse_state(src, lineno)?;
                let dst = parse_state(dst, lineno)?;
                ensure_state(&mut fst, src.max(dst));
                if start.is_none() {
                    start = Some(src);
                }
                let ilabel = parse_label(ilabel, lineno)?;
                let olabel = parse_label(olabel, lineno)?;
                fst.add_arc(src, Arc::new(ilabel, olabel, 0.0, dst));
            }
            [state, weight] => {
                let state = parse_state(state, lineno)?;
                ensure_state(&mut fst, state);
                let weight = parse_weight(weight, lineno)?;
                fst.set_final(state, weight);
            }
            [state] => {
                let state = parse_state(state, lineno)?;
                ensure_state(&mut fst, state);
                fst.set_final(state, 0.0);
            }
            _ => {
                return Err(crate::Error::InvalidGraph(format!(
                    "line {}: expected 1, 2, 4 or 5 fields, got {}",
                    lineno + 1,
                    fields.len()
                )));
            }
        }
    }

    let start =
        start.ok_or_else(|| crate::Error::InvalidGraph("graph has no start state".to_string()))?;
    fst.set_start(start);

    if fst.arcs(start).is_empty() && !fst.is_final(start) {
        return Err(crate::Error::InvalidGraph(
            "start state is unreachable (no outgoing arcs and not final)".to_string(),
        ));
    }

    Ok(fst)
}

/// Loads and parses a graph file from disk.
pub fn load(path: &Path) -> crate::Result<VectorFst> {
    let text = std::fs::read_to_string(path)?;
    parse(&text)
}

fn parse_state(field: &str, lineno: usize) -> crate::Result<StateId> {
    field
        .parse()
        .map_err(|_| crate::Error::InvalidGraph(format!("line {}: bad state id {field:?}", lineno + 1)))
}

fn parse_label(field: &str, lineno: usize) -> crate::Result<i32> {
    field
        .parse()
        .map_err(|_| crate::Error::InvalidGraph(format!("line {}: bad label {field:?}", lineno + 1)))
}

fn parse_weight(field: &str, lineno: usize) -> crate::Result<f32> {
    field
        .parse()
        .map_err(|_| crate::Error::InvalidGraph(format!("line {}: bad weight {field:?}", lineno + 1)))
}
