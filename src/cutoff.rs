//! Cutoff engine
//!
//! Translates `{beam, min_active, max_active, beam_delta}` into a concrete
//! cost cutoff and adaptive beam width for one step, given the current
//! frontier. See the design notes on min/max-active pruning: the beam
//! alone can admit too many or too few tokens, so the cutoff tightens or
//! loosens to compensate before falling back to the plain beam.

use std::collections::HashMap;
use std::rc::Rc;

use crate::fst::StateId;
use crate::token::Token;

/// Result of one cutoff computation.
pub struct Cutoff<S> {
    pub cutoff: f32,
    pub adaptive_beam: f32,
    pub best_state: StateId,
    pub best_token: Rc<Token<S>>,
}

/// Computes the cutoff for expanding out of `prev_toks`. Returns `None`
/// when `prev_toks` is empty (nothing to expand).
pub fn compute_cutoff<S>(
    prev_toks: &HashMap<StateId, Rc<Token<S>>>,
    beam: f32,
    min_active: usize,
    max_active: usize,
    beam_delta: f32,
) -> Option<Cutoff<S>> {
    let (&best_state, best_token) = prev_toks
        .iter()
        .min_by(|(_, a), (_, b)| a.cost.partial_cmp(&b.cost).expect("token cost is never NaN"))?;
    let best_token = Rc::clone(best_token);
    let best_cost = best_token.cost;

    let mut cutoff = best_cost + beam;
    let mut adaptive_beam = beam;

    if max_active == usize::MAX && min_active == 0 {
        return Some(Cutoff {
            cutoff,
            adaptive_beam,
            best_state,
            best_token,
        });
    }

    let mut costs: Vec<f32> = prev_toks.values().map(|t| t.cost).collect();
    costs.sort_by(|a, b| a.partial_cmp(b).expect("token cost is never NaN"));

    if prev_toks.len() > max_active {
        let max_cut = costs[max_active - 1];
        if max_cut < cutoff {
            cutoff = max_cut;
            adaptive_beam = max_cut - best_cost + beam_delta;
        }
    } else if prev_toks.len() > min_active {
        let min_cut = if min_active == 0 {
            best_cost
        } else {
            costs[min_active - 1]
        };
        if min_cut > cutoff {
            cutoff = min_cut;
            adaptive_beam = min_cut - best_cost + beam_delta;
        }
    }

    Some(Cutoff {
        cutoff,
        adaptive_beam,
        best_state,
        best_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::LatticeArc;

    // Token cost is always derived from an arc traversal, so tests build
    // tokens with a single arc out of a zero-cost seed rather than
    // poking a cost field directly.
    fn seeded(cost: f32) -> Rc<Token<()>> {
        let seed = Rc::new(Token::new(LatticeArc::seed(0), None, vec![], ()));
        Rc::new(Token::new(
            LatticeArc::new(1, 0, cost, 0.0, 1),
            Some(seed),
            vec![],
            (),
        ))
    }

    #[test]
    fn defaults_when_unbounded() {
        let mut toks = HashMap::new();
        toks.insert(0usize, seeded(1.0));
        toks.insert(1usize, seeded(2.0));

        let c = compute_cutoff(&toks, 5.0, 0, usize::MAX, 0.5).unwrap();
        assert_eq!(c.cutoff, 6.0);
        assert_eq!(c.adaptive_beam, 5.0);
    }

    #[test]
    fn tightens_for_max_active() {
        let mut toks = HashMap::new();
        for i in 0..10 {
            toks.insert(i, seeded(i as f32));
        }
        // beam is huge so the plain cutoff would admit everything; max_active=3
        // should tighten it to the cost of the 3rd cheapest token.
        let c = compute_cutoff(&toks, 100.0, 0, 3, 0.5).unwrap();
        assert_eq!(c.cutoff, 2.0);
        assert_eq!(c.adaptive_beam, 2.0 - 0.0 + 0.5);
    }

    #[test]
    fn loosens_for_min_active() {
        let mut toks = HashMap::new();
        for i in 0..10 {
            toks.insert(i, seeded(i as f32));
        }
        // Tiny beam would admit only the best token; min_active=5 loosens it.
        let c = compute_cutoff(&toks, 0.1, 5, usize::MAX, 0.5).unwrap();
        assert_eq!(c.cutoff, 4.0);
        assert_eq!(c.adaptive_beam, 4.0 - 0.0 + 0.5);
    }

    #[test]
    fn empty_frontier_returns_none() {
        let toks: HashMap<usize, Rc<Token<()>>> = HashMap::new();
        assert!(compute_cutoff(&toks, 5.0, 0, usize::MAX, 0.5).is_none());
    }
}
