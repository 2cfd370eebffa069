//! Configuration surface (`SPEC_FULL.md` §6).
//!
//! One struct with a `Default` impl matching the spec's documented
//! defaults, grounded on `type_learner.py`'s `TypeLearner.__init__` keyword
//! defaults and on the `Config`-struct-with-`Default` shape used elsewhere
//! in the retrieval pack for schema-inference options
//! (`SchemaInferenceConfig` in the `polars-genson` sibling source).

use regex::Regex;

/// Tunable limits and feature switches for observation and simplification.
///
/// `no_literal_patterns` are compiled once here (at construction time) per
/// the spec's own design note that implementers should compile patterns
/// once rather than per observation.
#[derive(Debug, Clone)]
pub struct LearnerConfig {
    /// Union-wide literal cap. `0` disables literal inference entirely.
    pub max_literal_fan: usize,
    /// Strings longer than this are never turned into literals.
    pub max_literal_string_length: usize,
    /// Enable Record inference for string-keyed mappings.
    pub learn_records: bool,
    /// Record-to-Mapping demotion threshold.
    pub max_record_fields: usize,
    /// Observer recursion cutoff.
    pub max_depth: usize,
    /// Patterns matched against the observer's JSON-path string; a match
    /// suppresses Literal creation at that site.
    pub no_literal_patterns: Vec<Regex>,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            max_literal_fan: 10,
            max_literal_string_length: 512,
            learn_records: true,
            max_record_fields: 100,
            max_depth: 10,
            no_literal_patterns: Vec::new(),
        }
    }
}

impl LearnerConfig {
    /// Compiles `patterns` and installs them as `no_literal_patterns`,
    /// keeping the rest of the config at its defaults.
    ///
    /// Each pattern is anchored to the start of the path, matching Python's
    /// `re.match` semantics (`type_learner.py`'s `no_literal_pattern.match`)
    /// rather than `re.search`'s unanchored substring scan — otherwise a
    /// pattern meant for `.items` would also suppress literals under an
    /// unrelated path like `.line_items`.
    pub fn with_no_literal_patterns(
        mut self,
        patterns: impl IntoIterator<Item = String>,
    ) -> Result<Self, regex::Error> {
        self.no_literal_patterns = patterns
            .into_iter()
            .map(|p| Regex::new(&format!("^(?:{p})")))
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    pub(crate) fn suppresses_literal_at(&self, json_path: &str) -> bool {
        self.no_literal_patterns
            .iter()
            .any(|pattern| pattern.is_match(json_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = LearnerConfig::default();
        assert_eq!(cfg.max_literal_fan, 10);
        assert_eq!(cfg.max_literal_string_length, 512);
        assert_eq!(cfg.learn_records, true);
        assert_eq!(cfg.max_record_fields, 100);
        assert_eq!(cfg.max_depth, 10);
        assert!(cfg.no_literal_patterns.is_empty());
    }

    #[test]
    fn no_literal_pattern_suppresses_matching_path() {
        let cfg = LearnerConfig::default()
            .with_no_literal_patterns([r"^\.id$".to_string()])
            .unwrap();
        assert!(cfg.suppresses_literal_at(".id"));
        assert!(!cfg.suppresses_literal_at(".name"));
    }

    #[test]
    fn no_literal_pattern_is_anchored_to_path_start() {
        let cfg = LearnerConfig::default()
            .with_no_literal_patterns([r"\.items".to_string()])
            .unwrap();
        assert!(cfg.suppresses_literal_at(".items"));
        assert!(!cfg.suppresses_literal_at(".line_items"));
        assert!(!cfg.suppresses_literal_at(".foo.items_list"));
    }
}
