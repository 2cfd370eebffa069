//! The Learner façade (`SPEC_FULL.md` §4.5): folds observed values into a
//! single accumulator `Term` via union-then-simplify.
//!
//! Grounded on `original_source/src/slow_learner/type_learner.py`'s
//! `TypeLearner.observe`/`observed_values` bookkeeping. Single-threaded and
//! synchronous (§5): `observe` runs every pass to a fixed point before
//! returning, and the accumulator has a single writer.

use serde_json::Value;

use crate::config::LearnerConfig;
use crate::observe::observe;
use crate::simplify::simplify;
use crate::term::Term;

/// Accumulates a type lattice from a stream of observed JSON values.
///
/// Sharding discipline: because `Term` owns all its data, a `Learner` is
/// `Send`/`Sync` whenever `Term` is, so running independent `Learner`s per
/// shard and folding their [`Learner::snapshot`]s with [`Term::Union`] +
/// [`simplify`] is a safe way to parallelize ingestion; no special API is
/// needed for it.
#[derive(Debug, Clone)]
pub struct Learner {
    config: LearnerConfig,
    accumulator: Option<Term>,
    observed_values: usize,
}

impl Learner {
    pub fn new(config: LearnerConfig) -> Self {
        Self {
            config,
            accumulator: None,
            observed_values: 0,
        }
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    /// Number of values observed so far; surfaced in the emitter's
    /// generated doc comment.
    pub fn observed_values(&self) -> usize {
        self.observed_values
    }

    /// Observes one JSON value, merging it into the accumulator.
    pub fn observe(&mut self, value: &Value) {
        let observed = observe(value, &self.config);
        self.accumulator = Some(match self.accumulator.take() {
            None => simplify(observed, &self.config),
            Some(existing) => simplify(Term::Union(vec![existing, observed]), &self.config),
        });
        self.observed_values += 1;
    }

    /// The current accumulated type, or the empty-union sentinel if nothing
    /// has been observed yet.
    pub fn snapshot(&self) -> Term {
        self.accumulator.clone().unwrap_or(Term::Union(Vec::new()))
    }

    /// Whether at least one value has been observed (used by the emitter to
    /// decide `NotReady`).
    pub fn is_ready(&self) -> bool {
        self.accumulator.is_some()
    }
}

impl Default for Learner {
    fn default() -> Self {
        Self::new(LearnerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Scalar;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn fresh_learner_is_not_ready() {
        let learner = Learner::default();
        assert!(!learner.is_ready());
        assert_eq!(learner.snapshot(), Term::Union(Vec::new()));
    }

    #[test]
    fn observing_a_stream_of_ints_yields_literal_union_under_cap() {
        let mut learner = Learner::default();
        for n in [1, 2, 3] {
            learner.observe(&json!(n));
        }
        assert!(learner.is_ready());
        let snapshot = learner.snapshot();
        match snapshot {
            Term::Union(members) => {
                assert_eq!(members.len(), 3);
                for n in [1, 2, 3] {
                    assert!(members.contains(&Term::Literal(Scalar::Int(n))));
                }
            }
            other => panic!("expected a union of literals, got {other:?}"),
        }
    }

    #[test]
    fn observing_beyond_the_literal_fan_generalizes_to_opaque() {
        let mut config = LearnerConfig::default();
        config.max_literal_fan = 3;
        let mut learner = Learner::new(config);
        for n in 0..10 {
            learner.observe(&json!(n));
        }
        assert_eq!(learner.snapshot(), Term::opaque("int"));
    }

    #[test]
    fn observed_values_counts_every_call() {
        let mut learner = Learner::default();
        learner.observe(&json!(1));
        learner.observe(&json!("x"));
        assert_eq!(learner.observed_values(), 2);
    }

    #[test]
    fn sharded_learners_merge_via_union_and_simplify() {
        let mut shard_a = Learner::default();
        let mut shard_b = Learner::default();
        for n in [1, 2] {
            shard_a.observe(&json!(n));
        }
        for n in [3, 4] {
            shard_b.observe(&json!(n));
        }
        let merged = simplify(
            Term::Union(vec![shard_a.snapshot(), shard_b.snapshot()]),
            shard_a.config(),
        );
        match merged {
            Term::Union(members) => assert_eq!(members.len(), 4),
            other => panic!("expected a union of four literals, got {other:?}"),
        }
    }
}
