//! The type lattice's recursive value: [`Term`].
//!
//! Mirrors the variant set of `SPEC_FULL.md` §3: `None`-term, `Literal`,
//! `Opaque`, `Tuple`, `Collection`, `Mapping`, `Record`, the `Missing`
//! sentinel, and `Union`. Structural equality for most variants is derived;
//! `Union` and `Record` have hand-written rules (see [`crate::equality`]).

use std::fmt;

/// A single scalar value captured verbatim by a [`Term::Literal`].
///
/// Floats are deliberately absent: sample-to-sample bit-identity is not a
/// meaningful inference signal for floating point data, so float scalars
/// always become `Opaque("float")` in the observer rather than a literal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Scalar {
    Int(i64),
    Str(String),
    Bytes(Vec<u8>),
    Bool(bool),
    Enum(String),
}

impl Scalar {
    /// The nominal runtime type tag this scalar would generalize to as an
    /// [`Term::Opaque`].
    pub fn runtime_tag(&self) -> &'static str {
        match self {
            Scalar::Int(_) => "int",
            Scalar::Str(_) => "str",
            Scalar::Bytes(_) => "bytes",
            Scalar::Bool(_) => "bool",
            Scalar::Enum(_) => "enum",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::Str(s) => write!(f, "{s:?}"),
            Scalar::Bytes(b) => write!(f, "{b:?}"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Enum(e) => write!(f, "{e}"),
        }
    }
}

/// One field of a [`Term::Record`].
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: Term,
}

/// A node of the inferred type lattice.
///
/// See module docs and `SPEC_FULL.md` §3 for the full semantics of each
/// variant. Recursive positions are boxed so the enum stays a fixed size.
///
/// `PartialEq`/`Eq` are hand-written in [`crate::equality`]: `Union` compares
/// its members as a set, and `Record` compares fields by name rather than by
/// position, so neither can be derived.
#[derive(Debug, Clone)]
pub enum Term {
    /// The singleton type of the null/absent value.
    None,
    /// An inhabited-by-exactly-one-value type.
    Literal(Scalar),
    /// A nominal runtime type tag carrying no further structure.
    Opaque(String),
    /// A heterogeneous fixed-arity product; arity is part of identity.
    Tuple(Vec<Term>),
    /// A homogeneous container of nominal tag `tag` with element type.
    Collection { tag: String, item: Box<Term> },
    /// A homogeneous key-value container of nominal tag `tag`.
    Mapping {
        tag: String,
        key: Box<Term>,
        value: Box<Term>,
    },
    /// A structural record with string field names and per-field types.
    Record(Vec<Field>),
    /// Sentinel usable only as a member of a union inside a Record field's
    /// type; marks "key may be absent."
    Missing,
    /// Set-semantics union of member terms. See [`crate::equality`] for its
    /// equality rule.
    Union(Vec<Term>),
}

impl Term {
    pub fn opaque(tag: impl Into<String>) -> Term {
        Term::Opaque(tag.into())
    }

    pub fn collection(tag: impl Into<String>, item: Term) -> Term {
        Term::Collection {
            tag: tag.into(),
            item: Box::new(item),
        }
    }

    pub fn mapping(tag: impl Into<String>, key: Term, value: Term) -> Term {
        Term::Mapping {
            tag: tag.into(),
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn is_union(&self) -> bool {
        matches!(self, Term::Union(_))
    }

    pub fn as_union_members(&self) -> Option<&[Term]> {
        match self {
            Term::Union(members) => Some(members),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::None => write!(f, "None"),
            Term::Literal(scalar) => write!(f, "Literal[{scalar}]"),
            Term::Opaque(tag) => write!(f, "{tag}"),
            Term::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Term::Collection { tag, item } => write!(f, "{tag}[{item}]"),
            Term::Mapping { tag, key, value } => write!(f, "{tag}[{key}, {value}]"),
            Term::Record(fields) => {
                write!(f, "{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.ty)?;
                }
                write!(f, "}}")
            }
            Term::Missing => write!(f, "<missing>"),
            Term::Union(members) => {
                write!(f, "|")?;
                for member in members {
                    write!(f, "{member}|")?;
                }
                Ok(())
            }
        }
    }
}
