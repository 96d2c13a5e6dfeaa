//! Scorer interface
//!
//! The decoder never evaluates an acoustic model itself; it calls out to
//! a [`Scorer`] once per emitting step with the surviving prefixes and
//! gets back per-label log-probabilities. A production binding (ONNX,
//! whisper.cpp, candle, ...) is out of scope for this crate — see the
//! non-goals in the crate-level docs — so [`MockScorer`] is the only
//! implementation shipped, driving every decoder test without a model
//! in the loop.

/// Contract with an external acoustic model.
///
/// `State` is the scorer's opaque per-path state (e.g. an attention
/// cache); the decoder treats it as value-semantic and clones it across
/// sibling expansions, so a real implementation should keep clones cheap
/// or wrap expensive state in something like `Rc<RefCell<_>>`.
pub trait Scorer {
    /// Per-utterance context passed to every `score` call unchanged
    /// (e.g. encoder hidden states).
    type Input;
    /// Per-path state threaded between steps.
    type State: Clone;

    /// Scores every surviving prefix in one batched call. Returns one
    /// log-probability vector per prefix (aligned by index) and the
    /// updated per-path state.
    fn score(
        &self,
        encoder_outputs: &Self::Input,
        prefixes: &[Vec<i32>],
        scorer_states: &[Self::State],
    ) -> crate::Result<(Vec<Vec<f32>>, Vec<Self::State>)>;

    /// Size of the scorer's output vocabulary (the `vocab_index = ilabel
    /// - 1` range the decoder maps emitting arcs into).
    fn vocab_size(&self) -> usize;
}

/// A deterministic, scripted scorer for tests and the CLI's `--script`
/// mode. Constructed from a fixed sequence of per-step log-probability
/// vectors; state is simply the step counter, so every prefix sharing a
/// step number gets the same scripted row.
#[derive(Debug, Clone)]
pub struct MockScorer {
    steps: Vec<Vec<f32>>,
    vocab_size: usize,
}

impl MockScorer {
    /// `steps[n]` is the log-probability row returned for any prefix
    /// whose scorer state is `n`. All rows must share the same length.
    pub fn new(steps: Vec<Vec<f32>>) -> Self {
        let vocab_size = steps.first().map(|row| row.len()).unwrap_or(0);
        Self { steps, vocab_size }
    }
}

impl Scorer for MockScorer {
    type Input = ();
    type State = usize;

    fn score(
        &self,
        _encoder_outputs: &(),
        prefixes: &[Vec<i32>],
        scorer_states: &[usize],
    ) -> crate::Result<(Vec<Vec<f32>>, Vec<usize>)> {
        if prefixes.len() != scorer_states.len() {
            return Err(crate::Error::ScorerFailure(format!(
                "prefix count {} does not match scorer state count {}",
                prefixes.len(),
                scorer_states.len()
            )));
        }

        let mut log_scores = Vec::with_capacity(scorer_states.len());
        let mut new_states = Vec::with_capacity(scorer_states.len());
        for &step in scorer_states {
            let row = self.steps.get(step).ok_or_else(|| {
                crate::Error::ScorerFailure(format!("no scripted row for step {step}"))
            })?;
            if row.len() != self.vocab_size {
                return Err(crate::Error::ScorerFailure(format!(
                    "row at step {step} has {} entries, expected vocab size {}",
                    row.len(),
                    self.vocab_size
                )));
            }
            log_scores.push(row.clone());
            new_states.push(step + 1);
        }
        Ok((log_scores, new_states))
    }

    fn vocab_size(&self) -> usize {
        self.vocab_size
    }
}

/// Index of the highest-scoring vocabulary entry in a log-probability row.
///
/// Ties keep the first (lowest-index) maximum, matching `np.argmax`.
pub fn argmax(row: &[f32]) -> usize {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in row.iter().enumerate() {
        match best {
            Some((_, best_score)) if score > best_score => best = Some((i, score)),
            None => best = Some((i, score)),
            _ => {}
        }
    }
    best.map(|(i, _)| i).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_rows_advance_step_by_step() {
        let scorer = MockScorer::new(vec![vec![0.0, -1.0], vec![-1.0, 0.0]]);
        let (scores, states) = scorer.score(&(), &[vec![1], vec![1]], &[0, 1]).unwrap();
        assert_eq!(scores[0], vec![0.0, -1.0]);
        assert_eq!(scores[1], vec![-1.0, 0.0]);
        assert_eq!(states, vec![1, 2]);
    }

    #[test]
    fn mismatched_lengths_are_scorer_failure() {
        let scorer = MockScorer::new(vec![vec![0.0]]);
        let err = scorer.score(&(), &[vec![1], vec![2]], &[0]).unwrap_err();
        assert!(matches!(err, crate::Error::ScorerFailure(_)));
    }

    #[test]
    fn missing_step_is_scorer_failure() {
        let scorer = MockScorer::new(vec![vec![0.0]]);
        let err = scorer.score(&(), &[vec![1]], &[5]).unwrap_err();
        assert!(matches!(err, crate::Error::ScorerFailure(_)));
    }

    #[test]
    fn argmax_picks_highest_log_prob() {
        assert_eq!(argmax(&[0.1, 0.9, -1.0]), 1);
        assert_eq!(argmax(&[]), 0);
    }

    #[test]
    fn argmax_breaks_ties_toward_first_index() {
        assert_eq!(argmax(&[0.5, 0.5, -1.0]), 0);
    }
}
