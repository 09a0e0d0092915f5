// Guesses what you'll do next from what usually followed your last task
//
// Like when "Buy groceries" is almost always followed by "Cook dinner".
// First-order only: we look at the most recent task and nothing before it.

use crate::intelligence::scorer::Scorer;
use std::collections::{BTreeMap, HashMap};

// Don't suggest anything unless it followed at least half the time
pub const MIN_PROBABILITY: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub text: String,
    pub probability: f64,
}

// Counts of state -> next state, built in one pass over the history.
// States are numbered in order of first appearance, which is also the
// tie-break order when two successors are equally likely.
pub struct TransitionTable {
    states: Vec<String>,
    index: HashMap<String, usize>,
    counts: Vec<BTreeMap<usize, usize>>,
}

impl TransitionTable {
    pub fn from_sequence<S: AsRef<str>>(sequence: &[S]) -> Self {
        let mut table = Self {
            states: Vec::new(),
            index: HashMap::new(),
            counts: Vec::new(),
        };

        let ids: Vec<usize> = sequence.iter().map(|s| table.intern(s.as_ref())).collect();

        // The last task has no successor so it adds no edge
        for pair in ids.windows(2) {
            *table.counts[pair[0]].entry(pair[1]).or_insert(0) += 1;
        }

        table
    }

    fn intern(&mut self, text: &str) -> usize {
        if let Some(&id) = self.index.get(text) {
            return id;
        }

        let id = self.states.len();
        self.states.push(text.to_string());
        self.index.insert(text.to_string(), id);
        self.counts.push(BTreeMap::new());
        id
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn count(&self, from: &str, to: &str) -> usize {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&f), Some(&t)) => self.counts[f].get(&t).copied().unwrap_or(0),
            _ => 0,
        }
    }

    // Row-normalized probability; an all-zero row gives 0 everywhere
    pub fn probability(&self, from: &str, to: &str) -> f64 {
        let Some(&f) = self.index.get(from) else {
            return 0.0;
        };
        Scorer::transition_probability(self.count(from, to), self.row_total(f))
    }

    // Outgoing distribution of a state, successors in first-appearance order
    pub fn distribution(&self, from: &str) -> Vec<(&str, f64)> {
        let Some(&f) = self.index.get(from) else {
            return Vec::new();
        };
        let total = self.row_total(f);

        self.counts[f]
            .iter()
            .map(|(&to, &count)| {
                (
                    self.states[to].as_str(),
                    Scorer::transition_probability(count, total),
                )
            })
            .collect()
    }

    // Highest-probability successor. Strict comparison keeps the earliest
    // state on ties, so the answer never depends on hash order.
    pub fn most_likely_successor(&self, from: &str) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;

        for (text, probability) in self.distribution(from) {
            match best {
                Some((_, p)) if probability <= p => {}
                _ => best = Some((text, probability)),
            }
        }

        best
    }

    fn row_total(&self, from: usize) -> usize {
        self.counts[from].values().sum()
    }
}

pub struct SequencePredictor;

impl SequencePredictor {
    // Predict what comes after the last entry of the history.
    // None for an empty or one-task history, a last task that never led
    // anywhere, or a best guess below MIN_PROBABILITY.
    pub fn predict_next<S: AsRef<str>>(history: &[S]) -> Option<Prediction> {
        let last = history.last()?.as_ref();
        if history.len() < 2 {
            return None;
        }

        let table = TransitionTable::from_sequence(history);
        let (text, probability) = table.most_likely_successor(last)?;

        if probability < MIN_PROBABILITY {
            tracing::debug!(probability, "sequence prediction below threshold");
            return None;
        }

        tracing::debug!(probability, "sequence prediction accepted");
        Some(Prediction {
            text: text.to_string(),
            probability,
        })
    }
}
