//! The Observer (`SPEC_FULL.md` §4.1): converts a concrete value into a
//! [`Term`].
//!
//! Grounded on `original_source/src/slow_learner/type_learner.py`'s
//! `_learn_variable_type` for rule ordering (null, scalar literal-vs-opaque
//! decision, depth cutoff, tuple, mapping, collection, fallback) and on
//! `core/src/schema.rs`'s `field_type`/`array` for the JSON-specific
//! number-kind dispatch (`is_i64`/`is_u64` vs float).
//!
//! The JSON data model collapses two of the term model's shape
//! distinctions: `serde_json::Value` has no tuple/array distinction (so
//! `Value::Array` is always observed as a `Collection`, never a `Tuple`),
//! and JSON object keys are always strings (so the Record-vs-Mapping
//! decision of rule 5 always resolves to Record when `learn_records` is
//! enabled). `Term::Tuple` and the non-string-keyed `Mapping` path remain
//! fully implemented and unit-tested directly against the `Term` API for a
//! future non-JSON host binding.

use serde_json::{Map, Value};

use crate::config::LearnerConfig;
use crate::simplify::reduce_union;
use crate::term::{Field, Scalar, Term};

/// One segment of the path used to build the JSON-path string that
/// `no_literal_patterns` match against.
#[derive(Debug, Clone)]
enum PathSegment {
    Field(String),
    Index(usize),
}

/// `.key`/`[idx]` path encoding, ported from
/// `original_source/src/slow_learner/utils.py`'s `to_json_path`.
fn to_json_path(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            PathSegment::Field(name) => {
                out.push('.');
                out.push_str(name);
            }
            PathSegment::Index(idx) => {
                out.push('[');
                out.push_str(&idx.to_string());
                out.push(']');
            }
        }
    }
    out
}

/// Observes a `serde_json::Value`, producing the [`Term`] that describes it
/// under `cfg`'s literal-fan, string-length, record, and depth rules.
pub fn observe(value: &Value, cfg: &LearnerConfig) -> Term {
    observe_at(value, &[], cfg)
}

fn observe_at(value: &Value, path: &[PathSegment], cfg: &LearnerConfig) -> Term {
    match value {
        Value::Null => Term::None,
        Value::Bool(b) => observe_scalar(Scalar::Bool(*b), path, cfg),
        Value::String(s) => observe_scalar(Scalar::Str(s.clone()), path, cfg),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                let as_i64 = n.as_i64().unwrap_or_else(|| n.as_u64().unwrap_or(0) as i64);
                observe_scalar(Scalar::Int(as_i64), path, cfg)
            } else {
                // Floats are never literal candidates: see DESIGN.md.
                Term::opaque("float")
            }
        }
        Value::Array(items) => observe_collection(items, path, cfg),
        Value::Object(map) => observe_mapping(map, path, cfg),
    }
}

fn observe_scalar(scalar: Scalar, path: &[PathSegment], cfg: &LearnerConfig) -> Term {
    let json_path = to_json_path(path);
    let string_too_long = matches!(&scalar, Scalar::Str(s) if s.len() > cfg.max_literal_string_length);
    if cfg.max_literal_fan > 0 && !string_too_long && !cfg.suppresses_literal_at(&json_path) {
        Term::Literal(scalar)
    } else {
        Term::opaque(scalar.runtime_tag())
    }
}

fn observe_collection(items: &[Value], path: &[PathSegment], cfg: &LearnerConfig) -> Term {
    if path.len() > cfg.max_depth {
        return Term::opaque("list");
    }
    let item_terms = items.iter().enumerate().map(|(index, item)| {
        let mut child_path = path.to_vec();
        child_path.push(PathSegment::Index(index));
        observe_at(item, &child_path, cfg)
    });
    Term::collection("list", reduce_union(item_terms, cfg))
}

fn observe_mapping(map: &Map<String, Value>, path: &[PathSegment], cfg: &LearnerConfig) -> Term {
    if path.len() > cfg.max_depth {
        return Term::opaque("dict");
    }
    if cfg.learn_records {
        let fields = map
            .iter()
            .map(|(key, value)| {
                let mut child_path = path.to_vec();
                child_path.push(PathSegment::Field(key.clone()));
                Field {
                    name: key.clone(),
                    ty: observe_at(value, &child_path, cfg),
                }
            })
            .collect();
        Term::Record(fields)
    } else {
        let key_terms = map.keys().map(|_| Term::opaque("str"));
        let value_terms = map.iter().map(|(key, value)| {
            let mut child_path = path.to_vec();
            child_path.push(PathSegment::Field(key.clone()));
            observe_at(value, &child_path, cfg)
        });
        Term::mapping(
            "dict",
            reduce_union(key_terms, cfg),
            reduce_union(value_terms, cfg),
        )
    }
}
