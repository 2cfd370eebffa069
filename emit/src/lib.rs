//! # Shapeshift Emit
//!
//! Lowers a [`shapeshift_core::Term`] snapshot to a Python type-hint module
//! (`SPEC_FULL.md` §6's emitter interface): one external collaborator's
//! view of a [`shapeshift_core::Learner`], kept in its own crate so the
//! core inference engine never depends on any particular target notation.
//!
//! Grounded on `original_source/src/slow_learner/typedef_generation.py` and
//! `type_learner.py`'s `generate_type_definitions`.

pub mod error;
pub mod naming;
pub mod pyhint;

pub use error::EmitError;
pub use pyhint::{render_type_definitions, write_type_definitions, PythonTarget};
