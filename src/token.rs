//! Token & lattice arc records
//!
//! A [`Token`] is one surviving hypothesis in the beam: a WFST state plus
//! the back-pointer chain of arcs taken to reach it. Tokens are
//! reference-counted so sibling expansions can share a parent without
//! copying the path behind it; the back-pointer graph is acyclic by
//! construction (a child is always created after its parent).

use std::rc::Rc;

use crate::fst::{Arc, StateId};

/// The arc a token was reached by, with the acoustic cost incurred
/// traversing it folded in alongside the graph cost. Non-emitting arcs
/// always carry `acoustic_cost = 0.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeArc {
    pub ilabel: i32,
    pub olabel: i32,
    pub graph_cost: f32,
    pub acoustic_cost: f32,
    pub nextstate: StateId,
}

impl LatticeArc {
    pub fn new(ilabel: i32, olabel: i32, graph_cost: f32, acoustic_cost: f32, nextstate: StateId) -> Self {
        Self {
            ilabel,
            olabel,
            graph_cost,
            acoustic_cost,
            nextstate,
        }
    }

    /// Lift a read-only WFST arc into a lattice arc, attaching the
    /// scorer-derived acoustic cost (0 for non-emitting expansion).
    pub fn from_fst_arc(arc: &Arc, acoustic_cost: f32) -> Self {
        Self {
            ilabel: arc.ilabel,
            olabel: arc.olabel,
            graph_cost: arc.weight,
            acoustic_cost,
            nextstate: arc.nextstate,
        }
    }

    /// A placeholder arc used to seed the initial token; carries no cost
    /// and is discarded (not emitted) during backtrace.
    pub fn seed(start: StateId) -> Self {
        Self::new(0, 0, 0.0, 0.0, start)
    }

    /// Total tropical cost contributed by this single arc traversal.
    pub fn weight(&self) -> f32 {
        self.graph_cost + self.acoustic_cost
    }

    pub fn is_emitting(&self) -> bool {
        self.ilabel != 0
    }
}

/// One hypothesis in the beam. `S` is the scorer's opaque per-path state,
/// threaded through so the acoustic model can amortize its computation
/// across steps.
#[derive(Debug)]
pub struct Token<S> {
    pub prev: Option<Rc<Token<S>>>,
    pub arc: LatticeArc,
    pub cost: f32,
    pub label_sequence: Vec<i32>,
    pub scorer_state: S,
}

impl<S> Token<S> {
    /// Builds a new token following `arc` out of `prev` (or seeding the
    /// search when `prev` is `None`). `cost` is computed as
    /// `prev.cost + arc.graph_cost + arc.acoustic_cost`.
    pub fn new(
        arc: LatticeArc,
        prev: Option<Rc<Token<S>>>,
        label_sequence: Vec<i32>,
        scorer_state: S,
    ) -> Self {
        let base_cost = prev.as_ref().map(|p| p.cost).unwrap_or(0.0);
        let cost = base_cost + arc.weight();
        Self {
            prev,
            arc,
            cost,
            label_sequence,
            scorer_state,
        }
    }
}

/// A token that has reached an end-of-sequence condition, annotated with
/// its length-normalized cost so completions of different lengths can be
/// compared fairly.
#[derive(Debug, Clone)]
pub struct Completed<S> {
    pub token: Rc<Token<S>>,
    pub rescaled_cost: f32,
}

/// Walks `token`'s back-pointer chain to the seed and collects the
/// non-epsilon output labels along the way, in traversal order.
pub fn backtrace<S>(token: &Rc<Token<S>>) -> Vec<i32> {
    let mut arcs = Vec::new();
    let mut cur = Some(Rc::clone(token));
    while let Some(t) = cur {
        arcs.push(t.arc);
        cur = t.prev.clone();
    }
    arcs.reverse();
    arcs.into_iter()
        .filter(|a| a.olabel != 0)
        .map(|a| a.olabel)
        .collect()
}
