//! In-memory WFST, built programmatically.
//!
//! Used by tests and any embedder that constructs a graph without going
//! through the text-format loader.

use super::{Arc, FstView, StateId};

/// A simple vector-backed WFST: states are dense indices `0..num_states`,
/// each with an arc list and an optional final weight.
#[derive(Debug, Clone, Default)]
pub struct VectorFst {
    states: Vec<StateEntry>,
    start: Option<StateId>,
}

#[derive(Debug, Clone, Default)]
struct StateEntry {
    arcs: Vec<Arc>,
    final_weight: Option<f32>,
}

impl VectorFst {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new state, returning its id.
    pub fn add_state(&mut self) -> StateId {
        self.states.push(StateEntry::default());
        self.states.len() - 1
    }

    /// Mark `state` as the start state.
    pub fn set_start(&mut self, state: StateId) {
        self.start = Some(state);
    }

    /// Mark `state` as final with the given weight (0.0 for an
    /// unweighted final state).
    pub fn set_final(&mut self, state: StateId, weight: f32) {
        self.states[state].final_weight = Some(weight);
    }

    /// Add an arc from `src` to `arc.nextstate`.
    pub fn add_arc(&mut self, src: StateId, arc: Arc) {
        self.states[src].arcs.push(arc);
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }
}

impl FstView for VectorFst {
    fn start(&self) -> Option<StateId> {
        self.start
    }

    fn final_weight(&self, state: StateId) -> Option<f32> {
        self.states.get(state).and_then(|s| s.final_weight)
    }

    fn arcs(&self, state: StateId) -> &[Arc] {
        self.states
            .get(state)
            .map(|s| s.arcs.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_arc_graph_round_trips() {
        let mut fst = VectorFst::new();
        let start = fst.add_state();
        let final_state = fst.add_state();
        fst.set_start(start);
        fst.set_final(final_state, 0.0);
        fst.add_arc(start, Arc::new(1, 7, 0.0, final_state));

        assert_eq!(fst.start(), Some(start));
        assert_eq!(fst.arcs(start).len(), 1);
        assert_eq!(fst.arcs(start)[0].olabel, 7);
        assert!(fst.is_final(final_state));
        assert!(!fst.is_final(start));
    }

    #[test]
    fn unknown_state_has_no_arcs_and_is_non_final() {
        let fst = VectorFst::new();
        assert!(fst.arcs(42).is_empty());
        assert_eq!(fst.final_weight(42), None);
    }
}
