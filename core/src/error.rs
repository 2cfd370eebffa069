//! Core-level error taxonomy (`SPEC_FULL.md` §7).
//!
//! `observe`/`simplify` are total over well-formed `Term`s and the
//! `Learner` never fails on ingestion, so this enum currently has no
//! constructors reachable from this crate's own code. It exists as a home
//! for the core-relevant error kinds named by the spec that a future
//! fallible `ObservableValue` implementation (a host binding other than
//! `serde_json::Value`) would need to surface, and so that `shapeshift-emit`
//! and `shapeshift-cli` have one shared place to point to when they discuss
//! where `InputDecodeFailure`/`SubtypeProbeFailure` are actually handled.
//!
//! `SubtypeProbeFailure` itself has no variant here: `is_subtype` is a
//! total, panic-free function (see `crate::subtype`), so the
//! "swallow-to-`false`" behavior the spec describes is simply the
//! unconditional behavior of its catch-all match arm, not a caught
//! exception.

use thiserror::Error;

/// Reserved for a future fallible `ObservableValue` host binding. Empty
/// because every binding and pass this crate ships today is total: the
/// Observer's depth cutoff and the Simplifier's rewrite passes never fail,
/// they just produce a coarser `Term`.
#[derive(Debug, Error)]
pub enum CoreError {}
