//! Read-only WFST view
//!
//! The decoder never mutates or compiles a graph; it only reads states,
//! arcs, the start state, and final weights through this trait. Loading
//! the graph from disk or building it programmatically is external to
//! the search itself.

pub mod memory;
pub mod text;

pub use memory::VectorFst;

/// State identifier, an index into the WFST's state table.
pub type StateId = usize;

/// A single WFST arc. `ilabel = 0` denotes epsilon (non-emitting);
/// `olabel = 0` denotes no output symbol on this arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub ilabel: i32,
    pub olabel: i32,
    pub weight: f32,
    pub nextstate: StateId,
}

impl Arc {
    pub fn new(ilabel: i32, olabel: i32, weight: f32, nextstate: StateId) -> Self {
        Self {
            ilabel,
            olabel,
            weight,
            nextstate,
        }
    }

    /// An arc is emitting when it consumes an input frame, i.e. `ilabel != 0`.
    pub fn is_emitting(&self) -> bool {
        self.ilabel != 0
    }
}

/// Read-only access to a compiled WFST: states, arcs, start state, and
/// final weights in the tropical semiring (`None` = non-final / infinite
/// cost).
pub trait FstView {
    /// The designated start state, or `None` if the graph has none.
    fn start(&self) -> Option<StateId>;

    /// Final weight of `state`, or `None` if `state` is non-final.
    fn final_weight(&self, state: StateId) -> Option<f32>;

    /// Outgoing arcs of `state`, in arbitrary but stable order.
    fn arcs(&self, state: StateId) -> &[Arc];

    /// Whether `state` is final.
    fn is_final(&self, state: StateId) -> bool {
        self.final_weight(state).is_some()
    }
}
