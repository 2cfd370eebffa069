//! # Type Lattice Inference
//!
//! A type lattice and its simplification engine for heterogeneous
//! JSON-like values: the algebraic representation of an inferred type
//! ([`Term`]), the subtype relation over it ([`subtype`]), and the
//! incremental union-and-normalize fixed point that merges newly observed
//! samples into an accumulated type while keeping the description small,
//! stable, and sound ([`simplify`], [`Learner`]).
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use shapeshift_core::{Learner, LearnerConfig};
//!
//! let mut learner = Learner::new(LearnerConfig::default());
//! learner.observe(&json!({"id": 1, "name": "Alice"}));
//! learner.observe(&json!({"id": 2, "name": "Bob", "verified": true}));
//!
//! let snapshot = learner.snapshot();
//! println!("{snapshot}");
//! ```
//!
//! This crate only infers and simplifies the type; lowering a snapshot to a
//! textual declaration is the job of an external emitter (not part of this
//! crate).

pub mod config;
pub mod equality;
pub mod error;
pub mod learner;
pub mod observe;
pub mod simplify;
pub mod subtype;
pub mod term;

pub use config::LearnerConfig;
pub use error::CoreError;
pub use learner::Learner;
pub use term::{Field, Scalar, Term};
