//! The Subtype Oracle (`SPEC_FULL.md` §4.2).
//!
//! Grounded on `original_source/src/slow_learner/subtyping.py`'s
//! `is_subtype`/`is_subtype_or_equal`: strict, non-reflexive, and total —
//! any clause that doesn't match falls through to `false` rather than
//! raising, which is this port's realization of the original's
//! try/except-swallow-to-`false` wrapper (see `crate::error` for why no
//! `Result` is involved).

use super::term::Term;

/// Numeric tower, narrowest first. Extends the original's
/// `(int, float, complex)` chain with `bool` at the bottom, per this
/// project's resolution of the bool-absorption open question (DESIGN.md).
const NUMERIC_TOWER: &[&str] = &["bool", "int", "float", "complex"];

fn tower_rank(tag: &str) -> Option<usize> {
    NUMERIC_TOWER.iter().position(|t| *t == tag)
}

/// `true` if `sub` is a strict subtype of `sup`. Never panics; unmatched
/// shape combinations return `false`.
pub fn is_subtype(sub: &Term, sup: &Term) -> bool {
    match (sub, sup) {
        (Term::Opaque(a), Term::Opaque(b)) => match (tower_rank(a), tower_rank(b)) {
            (Some(ra), Some(rb)) => ra < rb,
            _ => false,
        },

        (Term::Literal(scalar), Term::Opaque(tag)) => {
            scalar.runtime_tag() == tag || is_subtype(&Term::Opaque(scalar.runtime_tag().into()), sup)
        }

        (Term::Tuple(a), Term::Tuple(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| is_subtype_or_equal(x, y))
        }

        // Invariant generics: neither Collection/Collection nor
        // Mapping/Mapping ever subtype, per the spec's Open Question
        // resolution (DESIGN.md).
        (Term::Collection { .. }, Term::Collection { .. }) => false,
        (Term::Mapping { .. }, Term::Mapping { .. }) => false,

        (Term::Record(a), Term::Record(b)) => b.iter().all(|sup_field| {
            a.iter()
                .find(|sub_field| sub_field.name == sup_field.name)
                .is_some_and(|sub_field| is_subtype_or_equal(&sub_field.ty, &sup_field.ty))
        }),

        (Term::Union(members), _) => members.iter().all(|m| is_subtype(m, sup)),

        (_, Term::Union(members)) => members.iter().any(|m| is_subtype_or_equal(sub, m)),

        _ => false,
    }
}

/// `is_subtype(a, b) || a == b`.
pub fn is_subtype_or_equal(sub: &Term, sup: &Term) -> bool {
    is_subtype(sub, sup) || sub == sup
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Scalar;
    use pretty_assertions::assert_eq;

    #[test]
    fn subtype_is_not_reflexive() {
        let t = Term::opaque("int");
        assert_eq!(is_subtype(&t, &t), false);
        assert_eq!(is_subtype_or_equal(&t, &t), true);
    }

    #[test]
    fn numeric_tower_orders_bool_below_int_below_float() {
        assert!(is_subtype(&Term::opaque("bool"), &Term::opaque("int")));
        assert!(is_subtype(&Term::opaque("int"), &Term::opaque("float")));
        assert!(!is_subtype(&Term::opaque("float"), &Term::opaque("int")));
        // int is not a subtype of float's sibling bool, nor vice versa beyond the chain
        assert!(!is_subtype(&Term::opaque("int"), &Term::opaque("bool")));
    }

    #[test]
    fn int_is_not_subtype_of_float_literal_or_unrelated_tags() {
        assert!(!is_subtype(
            &Term::opaque("int"),
            &Term::Literal(Scalar::Int(1312))
        ));
        assert!(!is_subtype(&Term::opaque("str"), &Term::opaque("int")));
    }

    #[test]
    fn literal_is_subtype_of_its_runtime_opaque() {
        assert!(is_subtype(
            &Term::Literal(Scalar::Str("hello".into())),
            &Term::opaque("str")
        ));
    }

    #[test]
    fn opaque_is_subtype_of_union_containing_it() {
        let union = Term::Union(vec![Term::opaque("str"), Term::opaque("int")]);
        assert!(is_subtype(&Term::opaque("str"), &union));
    }

    #[test]
    fn mapping_and_collection_are_never_subtypes_of_each_other() {
        let a = Term::mapping("dict", Term::opaque("str"), Term::opaque("int"));
        let b = Term::mapping("dict", Term::opaque("str"), Term::opaque("int"));
        assert!(!is_subtype(&a, &b));

        let c = Term::collection("list", Term::opaque("int"));
        let d = Term::collection("list", Term::opaque("int"));
        assert!(!is_subtype(&c, &d));
    }
}
