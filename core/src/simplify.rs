//! The Simplifier (`SPEC_FULL.md` §4.4): twelve ordered rewrite passes
//! iterated to a fixed point.
//!
//! Pass order and the `lt == lt_prev` stop condition are ported from
//! `original_source/src/slow_learner/type_learner.py`'s
//! `_simplify_learnt_type`; the owned-value, `mem::replace`-free merge
//! style of each pass mirrors `core/src/schema.rs`'s
//! `FieldTypeAggregator::merge`. `group_and_process`'s group-by-tag-then-
//! merge shape (from `original_source/src/slow_learner/utils.py`) grounds
//! the tuple/collection/mapping merge-by-tag passes, implemented here as
//! direct grouping rather than a generic helper since each tag domain
//! (arity, container tag, mapping tag) is small and distinct.

use std::collections::HashMap;

use crate::config::LearnerConfig;
use crate::subtype::is_subtype;
use crate::term::{Field, Scalar, Term};

/// Iterates the twelve rewrite passes to a fixed point.
pub fn simplify(term: Term, cfg: &LearnerConfig) -> Term {
    let mut current = term;
    loop {
        let next = simplify_once(current.clone(), cfg);
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Left-folds `terms` by pairwise union-then-simplify, matching
/// `type_learner.py`'s `_reduce_simplifying`. An empty input yields the
/// empty-union sentinel (only the emitter materializes this as `Any`).
pub fn reduce_union(terms: impl IntoIterator<Item = Term>, cfg: &LearnerConfig) -> Term {
    let mut iter = terms.into_iter();
    let Some(first) = iter.next() else {
        return Term::Union(vec![]);
    };
    iter.fold(first, |acc, next| simplify(Term::Union(vec![acc, next]), cfg))
}

fn simplify_once(term: Term, cfg: &LearnerConfig) -> Term {
    let term = pass_flatten(term);
    let term = pass_dedup(term);
    let term = pass_boolean_fold(term);
    let term = pass_literal_cap(term, cfg);
    let term = pass_tuple_merge(term, cfg);
    let term = pass_collection_merge(term, cfg);
    let term = pass_record_merge(term, cfg);
    let term = pass_record_demotion(term, cfg);
    let term = pass_mapping_merge(term, cfg);
    let term = pass_absorb_subtypes(term);
    let term = pass_trivial_union(term);
    pass_empty_record_demotion(term)
}

/// 1. `Union[Union[a, b], c] -> Union[a, b, c]`.
fn pass_flatten(term: Term) -> Term {
    let Term::Union(members) = term else {
        return term;
    };
    let mut flat = Vec::with_capacity(members.len());
    for member in members {
        match member {
            Term::Union(nested) => flat.extend(nested),
            other => flat.push(other),
        }
    }
    Term::Union(flat)
}

/// 2. `Union[a, a, b] -> Union[a, b]`, preserving first-seen order.
fn pass_dedup(term: Term) -> Term {
    let Term::Union(members) = term else {
        return term;
    };
    let mut deduped: Vec<Term> = Vec::with_capacity(members.len());
    for member in members {
        if !deduped.contains(&member) {
            deduped.push(member);
        }
    }
    Term::Union(deduped)
}

/// 3. `Union[Literal[true], Literal[false], ...] -> Union[bool, ...]`.
fn pass_boolean_fold(term: Term) -> Term {
    let Term::Union(members) = term else {
        return term;
    };
    let true_lit = Term::Literal(Scalar::Bool(true));
    let false_lit = Term::Literal(Scalar::Bool(false));
    if members.contains(&true_lit) && members.contains(&false_lit) {
        let mut folded: Vec<Term> = members
            .into_iter()
            .filter(|m| *m != true_lit && *m != false_lit)
            .collect();
        folded.push(Term::opaque("bool"));
        Term::Union(folded)
    } else {
        Term::Union(members)
    }
}

/// 4. Generalizes too-large literal fans: `Literal[1, 2, 3, ...] -> int`
/// once the Union's literal count exceeds `max_literal_fan`.
fn pass_literal_cap(term: Term, cfg: &LearnerConfig) -> Term {
    let Term::Union(members) = term else {
        return term;
    };
    let (literals, others): (Vec<Term>, Vec<Term>) =
        members.into_iter().partition(|m| matches!(m, Term::Literal(_)));
    if literals.len() <= cfg.max_literal_fan {
        let mut members = others;
        members.extend(literals);
        return Term::Union(members);
    }
    let mut generalized: Vec<Term> = others;
    for literal in literals {
        let Term::Literal(scalar) = literal else {
            unreachable!()
        };
        let opaque = Term::opaque(scalar.runtime_tag());
        if !generalized.contains(&opaque) {
            generalized.push(opaque);
        }
    }
    Term::Union(generalized)
}

/// 5. Merges same-arity tuples: `tuple[str, int] | tuple[float, bool] ->
/// tuple[str | float, int | bool]`.
fn pass_tuple_merge(term: Term, cfg: &LearnerConfig) -> Term {
    let Term::Union(members) = term else {
        return term;
    };
    let mut by_arity: HashMap<usize, Vec<Vec<Term>>> = HashMap::new();
    let mut others = Vec::new();
    for member in members {
        match member {
            Term::Tuple(items) => by_arity.entry(items.len()).or_default().push(items),
            other => others.push(other),
        }
    }
    for (arity, tuples) in by_arity {
        let mut merged_items = Vec::with_capacity(arity);
        for slot in 0..arity {
            let slot_types = tuples.iter().map(|items| items[slot].clone());
            merged_items.push(simplify(Term::Union(slot_types.collect()), cfg));
        }
        others.push(Term::Tuple(merged_items));
    }
    Term::Union(others)
}

/// 6. Merges same-tag collections: `list[int] | list[str] -> list[int |
/// str]`.
fn pass_collection_merge(term: Term, cfg: &LearnerConfig) -> Term {
    let Term::Union(members) = term else {
        return term;
    };
    let mut by_tag: HashMap<String, Vec<Term>> = HashMap::new();
    let mut others = Vec::new();
    for member in members {
        match member {
            Term::Collection { tag, item } => by_tag.entry(tag).or_default().push(*item),
            other => others.push(other),
        }
    }
    for (tag, items) in by_tag {
        others.push(Term::collection(tag, simplify(Term::Union(items), cfg)));
    }
    Term::Union(others)
}

/// 7. Merges every Record present in a Union into a single Record, using
/// [`Term::Missing`] for keys absent from a given member (width/depth
/// merge); grounded on `type_learner.py`'s `merge_typed_dicts`.
fn pass_record_merge(term: Term, cfg: &LearnerConfig) -> Term {
    let Term::Union(members) = term else {
        return term;
    };
    let mut records: Vec<Vec<Field>> = Vec::new();
    let mut others = Vec::new();
    for member in members {
        match member {
            Term::Record(fields) => records.push(fields),
            other => others.push(other),
        }
    }
    if records.is_empty() {
        return Term::Union(others);
    }
    let mut names: Vec<String> = Vec::new();
    for record in &records {
        for field in record {
            if !names.contains(&field.name) {
                names.push(field.name.clone());
            }
        }
    }
    let merged_fields = names
        .into_iter()
        .map(|name| {
            let member_types: Vec<Term> = records
                .iter()
                .map(|record| {
                    record
                        .iter()
                        .find(|field| field.name == name)
                        .map(|field| field.ty.clone())
                        .unwrap_or(Term::Missing)
                })
                .collect();
            Field {
                name,
                ty: simplify(Term::Union(member_types), cfg),
            }
        })
        .collect();
    others.push(Term::Record(merged_fields));
    Term::Union(others)
}

/// 8. Demotes a Record to a `Mapping("dict", str, ⋁ fields)` if it exceeds
/// `max_record_fields`, or if a Union containing it already contains a
/// Mapping (a Record and a Mapping cannot coexist per invariant 6).
fn pass_record_demotion(term: Term, cfg: &LearnerConfig) -> Term {
    match term {
        Term::Union(members) => {
            let should_demote = members.iter().any(|m| {
                matches!(m, Term::Mapping { .. })
                    || matches!(m, Term::Record(fields) if fields.len() > cfg.max_record_fields)
            });
            if !should_demote {
                return Term::Union(members);
            }
            let demoted = members
                .into_iter()
                .map(|m| match m {
                    Term::Record(fields) => demote_record(fields, cfg),
                    other => other,
                })
                .collect();
            Term::Union(demoted)
        }
        Term::Record(fields) if fields.len() > cfg.max_record_fields => demote_record(fields, cfg),
        other => other,
    }
}

fn demote_record(fields: Vec<Field>, cfg: &LearnerConfig) -> Term {
    let field_types: Vec<Term> = fields.into_iter().map(|f| f.ty).collect();
    let value_union = simplify(Term::Union(field_types), cfg);
    Term::mapping("dict", Term::opaque("str"), strip_missing(value_union))
}

/// `Missing` marks "key may be absent" only inside a Record field's own
/// union; once demoted to a Mapping there is no such field, so it is
/// filtered out rather than leaking to the value type (invariant 8).
fn strip_missing(term: Term) -> Term {
    match term {
        Term::Union(members) => {
            let mut filtered: Vec<Term> = members.into_iter().filter(|m| *m != Term::Missing).collect();
            match filtered.len() {
                0 => Term::Union(Vec::new()),
                1 => filtered.pop().unwrap(),
                _ => Term::Union(filtered),
            }
        }
        Term::Missing => Term::Union(Vec::new()),
        other => other,
    }
}

/// 9. Merges same-tag mappings: key and value unions merge independently.
fn pass_mapping_merge(term: Term, cfg: &LearnerConfig) -> Term {
    let Term::Union(members) = term else {
        return term;
    };
    let mut by_tag: HashMap<String, Vec<(Term, Term)>> = HashMap::new();
    let mut others = Vec::new();
    for member in members {
        match member {
            Term::Mapping { tag, key, value } => {
                by_tag.entry(tag).or_default().push((*key, *value))
            }
            other => others.push(other),
        }
    }
    for (tag, pairs) in by_tag {
        let (keys, values): (Vec<Term>, Vec<Term>) = pairs.into_iter().unzip();
        let key = simplify(Term::Union(keys), cfg);
        let value = simplify(Term::Union(values), cfg);
        others.push(Term::mapping(tag, key, value));
    }
    Term::Union(others)
}

/// 10. `Union[str, int, bool] -> Union[str, int]` when a member is a strict
/// subtype of another member (absorption, invariant 3).
fn pass_absorb_subtypes(term: Term) -> Term {
    let Term::Union(members) = term else {
        return term;
    };
    let kept: Vec<Term> = members
        .iter()
        .filter(|member| !members.iter().any(|other| is_subtype(member, other)))
        .cloned()
        .collect();
    Term::Union(kept)
}

/// 11. `Union[T] -> T` (invariant 4).
fn pass_trivial_union(term: Term) -> Term {
    match term {
        Term::Union(mut members) if members.len() == 1 => members.pop().unwrap(),
        other => other,
    }
}

/// 12. An empty Record carries no structural information, so it demotes to
/// an empty `Mapping("dict", ⊥, ⊥)`; grounded on
/// `typedef_generation.py`'s empty-TypedDict-to-`dict[Any, Any]` demotion,
/// moved here because `SPEC_FULL.md` places it in the core.
///
/// Invariant 12 holds regardless of nesting depth, so this walks every
/// composite position (`Union` members, `Record` field values, `Mapping`
/// key/value, `Collection` item, `Tuple` slots) rather than only the term's
/// own top level: an object observed as `{"a": {}}` must demote the inner
/// empty Record too, even though it never itself reaches `simplify_once`'s
/// top-level match as a standalone `Union` member.
fn pass_empty_record_demotion(term: Term) -> Term {
    match term {
        Term::Record(fields) if fields.is_empty() => empty_mapping(),
        Term::Record(fields) => Term::Record(
            fields
                .into_iter()
                .map(|field| Field {
                    name: field.name,
                    ty: pass_empty_record_demotion(field.ty),
                })
                .collect(),
        ),
        Term::Union(members) => {
            Term::Union(members.into_iter().map(pass_empty_record_demotion).collect())
        }
        Term::Tuple(items) => {
            Term::Tuple(items.into_iter().map(pass_empty_record_demotion).collect())
        }
        Term::Collection { tag, item } => {
            Term::collection(tag, pass_empty_record_demotion(*item))
        }
        Term::Mapping { tag, key, value } => Term::mapping(
            tag,
            pass_empty_record_demotion(*key),
            pass_empty_record_demotion(*value),
        ),
        other => other,
    }
}

fn empty_mapping() -> Term {
    Term::mapping("dict", Term::Union(Vec::new()), Term::Union(Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lit_int(n: i64) -> Term {
        Term::Literal(Scalar::Int(n))
    }

    #[test]
    fn idempotence_of_simplify() {
        let cfg = LearnerConfig::default();
        let t = Term::Union(vec![lit_int(1), lit_int(2), Term::opaque("str")]);
        let once = simplify(t, &cfg);
        let twice = simplify(once.clone(), &cfg);
        assert_eq!(once, twice);
    }

    #[test]
    fn literal_fan_under_cap_stays_literal_union() {
        let cfg = LearnerConfig::default();
        let members: Vec<Term> = (0..5).map(lit_int).collect();
        let result = simplify(Term::Union(members.clone()), &cfg);
        match result {
            Term::Union(got) => {
                for m in &members {
                    assert!(got.contains(m));
                }
            }
            other => panic!("expected a union, got {other:?}"),
        }
    }

    #[test]
    fn literal_fan_exceeded_generalizes_to_opaque() {
        let mut cfg = LearnerConfig::default();
        cfg.max_literal_fan = 3;
        let members: Vec<Term> = (0..5).map(lit_int).collect();
        let result = simplify(Term::Union(members), &cfg);
        assert_eq!(result, Term::opaque("int"));
    }

    #[test]
    fn optional_int_after_nulls_is_union_of_none_and_int() {
        let cfg = LearnerConfig::default();
        let result = simplify(Term::Union(vec![Term::None, lit_int(5)]), &cfg);
        match result {
            Term::Union(members) => {
                assert_eq!(members.len(), 2);
                assert!(members.contains(&Term::None));
                assert!(members.contains(&lit_int(5)));
            }
            other => panic!("expected a union, got {other:?}"),
        }
    }

    #[test]
    fn heterogeneous_tuple_union_merges_per_slot() {
        let cfg = LearnerConfig::default();
        let t1 = Term::Tuple(vec![Term::opaque("str"), lit_int(1)]);
        let t2 = Term::Tuple(vec![Term::opaque("float"), lit_int(2)]);
        let result = simplify(Term::Union(vec![t1, t2]), &cfg);
        match result {
            Term::Tuple(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0], Term::opaque("str"));
                match &items[1] {
                    Term::Union(members) => {
                        assert!(members.contains(&lit_int(1)));
                        assert!(members.contains(&lit_int(2)));
                    }
                    other => panic!("expected a union for slot 1, got {other:?}"),
                }
            }
            other => panic!("expected a merged tuple, got {other:?}"),
        }
    }

    #[test]
    fn record_with_uniform_fields_merges_without_missing() {
        let cfg = LearnerConfig::default();
        let a = Term::Record(vec![Field {
            name: "x".into(),
            ty: lit_int(1),
        }]);
        let b = Term::Record(vec![Field {
            name: "x".into(),
            ty: lit_int(2),
        }]);
        let result = simplify(Term::Union(vec![a, b]), &cfg);
        match result {
            Term::Record(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].name, "x");
            }
            other => panic!("expected a record, got {other:?}"),
        }
    }

    #[test]
    fn record_with_partial_fields_uses_missing_then_optional() {
        let cfg = LearnerConfig::default();
        let a = Term::Record(vec![Field {
            name: "x".into(),
            ty: lit_int(1),
        }]);
        let b = Term::Record(vec![Field {
            name: "y".into(),
            ty: Term::opaque("str"),
        }]);
        let result = simplify(Term::Union(vec![a, b]), &cfg);
        let Term::Record(fields) = result else {
            panic!("expected a record");
        };
        assert_eq!(fields.len(), 2);
        for field in &fields {
            match &field.ty {
                Term::Union(members) => assert!(members.contains(&Term::Missing)),
                other => panic!("expected field {} to be optional, got {other:?}", field.name),
            }
        }
    }

    #[test]
    fn record_and_mapping_demote_to_single_mapping() {
        let cfg = LearnerConfig::default();
        let record = Term::Record(vec![Field {
            name: "x".into(),
            ty: lit_int(1),
        }]);
        let mapping = Term::mapping("dict", Term::opaque("str"), Term::opaque("int"));
        let result = simplify(Term::Union(vec![record, mapping]), &cfg);
        match result {
            Term::Mapping { tag, .. } => assert_eq!(tag, "dict"),
            other => panic!("expected a single mapping, got {other:?}"),
        }
    }

    #[test]
    fn empty_record_demotes_to_empty_mapping() {
        let cfg = LearnerConfig::default();
        let result = simplify(Term::Record(Vec::new()), &cfg);
        match result {
            Term::Mapping { tag, key, value } => {
                assert_eq!(tag, "dict");
                assert_eq!(*key, Term::Union(Vec::new()));
                assert_eq!(*value, Term::Union(Vec::new()));
            }
            other => panic!("expected an empty mapping, got {other:?}"),
        }
    }

    #[test]
    fn nested_empty_record_demotes_even_inside_a_record_field() {
        let cfg = LearnerConfig::default();
        let outer = Term::Record(vec![Field {
            name: "a".into(),
            ty: Term::Record(Vec::new()),
        }]);
        let result = simplify(outer, &cfg);
        let Term::Record(fields) = result else {
            panic!("expected a record at the top level");
        };
        let a = &fields.iter().find(|f| f.name == "a").unwrap().ty;
        match a {
            Term::Mapping { tag, key, value } => {
                assert_eq!(tag, "dict");
                assert_eq!(**key, Term::Union(Vec::new()));
                assert_eq!(**value, Term::Union(Vec::new()));
            }
            other => panic!("expected field `a` to demote to an empty mapping, got {other:?}"),
        }
    }

    #[test]
    fn order_independence_of_permuted_streams() {
        let cfg = LearnerConfig::default();
        let values = vec![Term::None, lit_int(1), Term::opaque("str")];
        let forward = simplify(Term::Union(values.clone()), &cfg);
        let mut reversed = values;
        reversed.reverse();
        let backward = simplify(Term::Union(reversed), &cfg);
        assert_eq!(forward, backward);
    }
}
