//! Hand-written structural equality for [`Term`], overriding the derive for
//! two cases (`SPEC_FULL.md` §4.3):
//!
//! - `Union` compares members as a set: `U1 == U2` iff each side's members
//!   are all found, by this same equality, in the other side. Grounded on
//!   `LUnion.__eq__`'s double membership-subset check in
//!   `original_source/src/slow_learner/learnt_types.py`.
//! - `Record` compares fields by name, not by position, mirroring
//!   `merge_obj_fields`'s name-keyed (not index-keyed) field comparison in
//!   the teacher's `core/src/schema.rs`.

use super::term::{Field, Term};

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Term::None, Term::None) => true,
            (Term::Missing, Term::Missing) => true,
            (Term::Literal(a), Term::Literal(b)) => a == b,
            (Term::Opaque(a), Term::Opaque(b)) => a == b,
            (Term::Tuple(a), Term::Tuple(b)) => a == b,
            (
                Term::Collection { tag: t1, item: i1 },
                Term::Collection { tag: t2, item: i2 },
            ) => t1 == t2 && i1 == i2,
            (
                Term::Mapping {
                    tag: t1,
                    key: k1,
                    value: v1,
                },
                Term::Mapping {
                    tag: t2,
                    key: k2,
                    value: v2,
                },
            ) => t1 == t2 && k1 == k2 && v1 == v2,
            (Term::Record(a), Term::Record(b)) => fields_eq(a, b),
            (Term::Union(a), Term::Union(b)) => members_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Term {}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.ty == other.ty
    }
}

impl Eq for Field {}

fn fields_eq(a: &[Field], b: &[Field]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().all(|fa| {
        b.iter()
            .any(|fb| fa.name == fb.name && fa.ty == fb.ty)
    })
}

/// Set-semantic membership comparison: every element of `a` is found
/// (structurally) in `b` and vice versa. Duplicate members are tolerated on
/// both sides since the simplifier guarantees dedup before this is observed
/// in practice, but equality itself does not assume dedup.
fn members_eq(a: &[Term], b: &[Term]) -> bool {
    a.len() == b.len()
        && a.iter().all(|x| b.contains(x))
        && b.iter().all(|x| a.contains(x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn union_equality_is_order_independent() {
        let a = Term::Union(vec![Term::opaque("int"), Term::opaque("str")]);
        let b = Term::Union(vec![Term::opaque("str"), Term::opaque("int")]);
        assert_eq!(a, b);
    }

    #[test]
    fn union_equality_distinguishes_different_membership() {
        let a = Term::Union(vec![Term::opaque("int"), Term::opaque("str")]);
        let b = Term::Union(vec![Term::opaque("int"), Term::opaque("bool")]);
        assert!(a != b);
    }

    #[test]
    fn record_equality_ignores_field_order() {
        let a = Term::Record(vec![
            Field {
                name: "a".into(),
                ty: Term::opaque("int"),
            },
            Field {
                name: "b".into(),
                ty: Term::opaque("str"),
            },
        ]);
        let b = Term::Record(vec![
            Field {
                name: "b".into(),
                ty: Term::opaque("str"),
            },
            Field {
                name: "a".into(),
                ty: Term::opaque("int"),
            },
        ]);
        assert_eq!(a, b);
    }
}
