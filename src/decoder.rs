//! Decode loop
//!
//! Orchestrates token-passing beam search over a [`FstView`]: init →
//! (emitting step; non-emitting closure)* → terminate, maintaining the
//! `prev_toks`/`cur_toks` active-state maps and a completion pool, then
//! backtracing the best completed hypothesis into an output-label
//! sequence.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use tracing::{debug, info, instrument, warn};

use crate::config::DecoderConfig;
use crate::cutoff::compute_cutoff;
use crate::fst::{FstView, StateId};
use crate::scorer::{Scorer, argmax};
use crate::token::{Completed, LatticeArc, Token, backtrace};
use crate::{Error, Result};

type TokMap<S> = HashMap<StateId, Rc<Token<S>>>;

/// A token-passing WFST decoder bound to one graph and one scorer.
///
/// `fst` is borrowed for the lifetime of a single [`Decoder`] instance;
/// the graph is treated as immutable and may be shared read-only across
/// decoders for concurrent utterances.
pub struct Decoder<'f, F, Sc>
where
    F: FstView,
    Sc: Scorer,
{
    fst: &'f F,
    scorer: Sc,
    config: DecoderConfig,
    prev_toks: TokMap<Sc::State>,
    cur_toks: TokMap<Sc::State>,
    completions: Vec<Completed<Sc::State>>,
    steps: usize,
}

impl<'f, F, Sc> Decoder<'f, F, Sc>
where
    F: FstView,
    Sc: Scorer,
{
    pub fn new(fst: &'f F, scorer: Sc, config: DecoderConfig) -> Self {
        Self {
            fst,
            scorer,
            config,
            prev_toks: HashMap::new(),
            cur_toks: HashMap::new(),
            completions: Vec::new(),
            steps: 0,
        }
    }

    /// Resets all decoder state and seeds the frontier at the graph's
    /// start state so the decoder can be reused for a new utterance.
    pub fn init_decoding(&mut self, initial_scorer_state: Sc::State) -> Result<()> {
        let start = self
            .fst
            .start()
            .ok_or_else(|| Error::InvalidGraph("graph has no start state".to_string()))?;

        self.prev_toks.clear();
        self.cur_toks.clear();
        self.completions.clear();
        self.steps = 0;

        let seed = Rc::new(Token::new(
            LatticeArc::seed(start),
            None,
            vec![self.config.sos],
            initial_scorer_state,
        ));
        self.cur_toks.insert(start, seed);
        self.non_emitting_closure(f32::INFINITY);
        Ok(())
    }

    /// Runs one full decode for an utterance: init, then alternating
    /// emitting/non-emitting steps until the beam empties or
    /// `max_seq_len` is reached. `should_cancel` is polled once per loop
    /// iteration so a host can abort a long decode between steps.
    #[instrument(skip_all)]
    pub fn decode(
        &mut self,
        encoder_outputs: &Sc::Input,
        initial_scorer_state: Sc::State,
        mut should_cancel: impl FnMut() -> bool,
    ) -> Result<Vec<i32>> {
        self.init_decoding(initial_scorer_state)?;

        while !self.cur_toks.is_empty() && self.steps < self.config.max_seq_len {
            if should_cancel() {
                self.prev_toks.clear();
                self.cur_toks.clear();
                return Err(Error::CancelRequested);
            }

            std::mem::swap(&mut self.prev_toks, &mut self.cur_toks);
            self.cur_toks.clear();

            let next_cutoff = self.emitting_step(encoder_outputs)?;
            self.non_emitting_closure(next_cutoff);
        }

        if self.cur_toks.is_empty() && self.completions.is_empty() {
            warn!(steps = self.steps, "beam emptied with no completions");
        }

        self.best_path()
    }

    /// Propagates tokens currently in `cur_toks` through ε (non-emitting)
    /// arcs to a fixed point, dropping anything past `cutoff`.
    fn non_emitting_closure(&mut self, cutoff: f32) {
        let mut queue: VecDeque<StateId> = self.cur_toks.keys().copied().collect();

        while let Some(state) = queue.pop_front() {
            let Some(token) = self.cur_toks.get(&state).cloned() else {
                continue;
            };
            for arc in self.fst.arcs(state) {
                if arc.is_emitting() {
                    continue;
                }
                let lattice_arc = LatticeArc::from_fst_arc(arc, 0.0);
                let new_cost = token.cost + lattice_arc.weight();
                if new_cost > cutoff {
                    continue;
                }

                let improves = match self.cur_toks.get(&arc.nextstate) {
                    Some(existing) => new_cost < existing.cost,
                    None => true,
                };
                if !improves {
                    continue;
                }

                let child = Rc::new(Token::new(
                    lattice_arc,
                    Some(Rc::clone(&token)),
                    token.label_sequence.clone(),
                    token.scorer_state.clone(),
                ));
                self.cur_toks.insert(arc.nextstate, child);
                queue.push_back(arc.nextstate);
            }
        }
    }

    /// Queries the scorer once for every surviving prefix, expands
    /// emitting arcs into a fresh `cur_toks`, and routes EOS-triggered
    /// tokens into the completion pool. Returns the projected cutoff for
    /// the following non-emitting closure.
    #[instrument(skip_all, fields(step = self.steps))]
    fn emitting_step(&mut self, encoder_outputs: &Sc::Input) -> Result<f32> {
        if self.prev_toks.is_empty() {
            return Ok(f32::INFINITY);
        }

        let mut states = Vec::with_capacity(self.prev_toks.len());
        let mut prefixes = Vec::with_capacity(self.prev_toks.len());
        let mut scorer_states = Vec::with_capacity(self.prev_toks.len());
        for (&state, token) in self.prev_toks.iter() {
            states.push(state);
            prefixes.push(token.label_sequence.clone());
            scorer_states.push(token.scorer_state.clone());
        }

        let (log_scores, new_states) = self.scorer.score(encoder_outputs, &prefixes, &scorer_states)?;
        if log_scores.len() != states.len() || new_states.len() != states.len() {
            return Err(Error::ScorerFailure(format!(
                "scorer returned {} score rows / {} states for {} prefixes",
                log_scores.len(),
                new_states.len(),
                states.len()
            )));
        }

        let cutoff = compute_cutoff(
            &self.prev_toks,
            self.config.beam,
            self.config.min_active,
            self.config.max_active,
            self.config.beam_delta,
        )
        .expect("prev_toks is non-empty");

        let best_idx = states
            .iter()
            .position(|&s| s == cutoff.best_state)
            .expect("cutoff.best_state is always a key of prev_toks");
        let best_row = &log_scores[best_idx];

        let mut next_cutoff = f32::INFINITY;
        for arc in self.fst.arcs(cutoff.best_state) {
            if !arc.is_emitting() {
                continue;
            }
            let vocab_index = (arc.ilabel - 1) as usize;
            if let Some(&log_p) = best_row.get(vocab_index) {
                let ac_cost = -log_p * self.config.acoustic_scale;
                let candidate = cutoff.best_token.cost + arc.weight + ac_cost + cutoff.adaptive_beam;
                next_cutoff = next_cutoff.min(candidate);
            }
        }

        for (i, &state) in states.iter().enumerate() {
            let token = Rc::clone(&self.prev_toks[&state]);
            if token.cost >= cutoff.cutoff {
                continue;
            }

            let row = &log_scores[i];
            let top = argmax(row);
            if top == self.config.eos as usize {
                self.complete(&token, state, row[self.config.eos as usize]);
                continue;
            }

            for arc in self.fst.arcs(state) {
                if !arc.is_emitting() {
                    continue;
                }
                let vocab_index = (arc.ilabel - 1) as usize;
                let Some(&log_p) = row.get(vocab_index) else {
                    continue;
                };
                let ac_cost = -log_p * self.config.acoustic_scale;
                let candidate_cost = token.cost + arc.weight + ac_cost;
                if candidate_cost > next_cutoff {
                    continue;
                }

                let lattice_arc = LatticeArc::from_fst_arc(arc, ac_cost);
                let improves = match self.cur_toks.get(&arc.nextstate) {
                    Some(existing) => candidate_cost < existing.cost,
                    None => true,
                };
                if improves {
                    let mut label_sequence = token.label_sequence.clone();
                    label_sequence.push(vocab_index as i32);
                    let child = Rc::new(Token::new(
                        lattice_arc,
                        Some(Rc::clone(&token)),
                        label_sequence,
                        new_states[i].clone(),
                    ));
                    self.cur_toks.insert(arc.nextstate, child);
                }

                if candidate_cost + cutoff.adaptive_beam < next_cutoff {
                    next_cutoff = candidate_cost + cutoff.adaptive_beam;
                }
            }
        }

        self.steps += 1;
        debug!(step = self.steps, active = self.cur_toks.len(), next_cutoff, "emitting step complete");
        Ok(next_cutoff)
    }

    /// Handles a token whose scorer argmax is EOS: records a completion
    /// if its state is final, then walks the ε-closure from that state
    /// (no further scorer calls) looking for final states reachable
    /// without consuming another frame.
    fn complete(&mut self, token: &Rc<Token<Sc::State>>, state: StateId, eos_log_prob: f32) {
        let eos_acoustic = -eos_log_prob * self.config.acoustic_scale;
        let steps = (self.steps + 1) as f32;

        if let Some(final_weight) = self.fst.final_weight(state) {
            let total = token.cost + eos_acoustic + final_weight;
            self.completions.push(Completed {
                token: Rc::clone(token),
                rescaled_cost: total / steps,
            });
            debug!(rescaled_cost = total / steps, "completion recorded at EOS state");
        }

        let mut queue: VecDeque<(StateId, Rc<Token<Sc::State>>, f32)> = VecDeque::new();
        queue.push_back((state, Rc::clone(token), token.cost));

        while let Some((s, parent, cost)) = queue.pop_front() {
            for arc in self.fst.arcs(s) {
                if arc.is_emitting() {
                    continue;
                }
                let lattice_arc = LatticeArc::from_fst_arc(arc, 0.0);
                let extended_cost = cost + lattice_arc.weight();
                let extended = Rc::new(Token::new(
                    lattice_arc,
                    Some(Rc::clone(&parent)),
                    parent.label_sequence.clone(),
                    parent.scorer_state.clone(),
                ));

                if let Some(final_weight) = self.fst.final_weight(arc.nextstate) {
                    let total = extended_cost + final_weight;
                    self.completions.push(Completed {
                        token: Rc::clone(&extended),
                        rescaled_cost: total / steps,
                    });
                    debug!(state = arc.nextstate, rescaled_cost = total / steps, "completion recorded after epsilon tail");
                } else {
                    queue.push_back((arc.nextstate, extended, extended_cost));
                }
            }
        }
    }

    /// Selects the completion with minimum `rescaled_cost` and
    /// backtraces it into an output-label sequence.
    fn best_path(&self) -> Result<Vec<i32>> {
        let best = self
            .completions
            .iter()
            .min_by(|a, b| {
                a.rescaled_cost
                    .partial_cmp(&b.rescaled_cost)
                    .expect("rescaled cost is never NaN")
            })
            .ok_or(Error::NoCompletion)?;

        info!(rescaled_cost = best.rescaled_cost, "selected best completion");
        Ok(backtrace(&best.token))
    }
}

impl<'f, F, Sc> Decoder<'f, F, Sc>
where
    F: FstView,
    Sc: Scorer,
{
    /// Number of completed tokens this decode produced (0 before
    /// `decode` is called or after a failed run).
    pub fn completion_count(&self) -> usize {
        self.completions.len()
    }
}
