//! Emitter error kinds (`SPEC_FULL.md` §7): `AlreadyExists`/`NotReady` are
//! surfaced to the caller; `Io` is this Rust port's necessary addition for
//! the actual filesystem write an abstract emitter interface doesn't name.
//! Grounded on `type_learner.py`'s `generate_type_definitions`, which
//! raises `RuntimeError`/`FileExistsError` for the same two cases.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("output file already exists: {0}")]
    AlreadyExists(PathBuf),
    #[error("no value has been observed yet; nothing to emit")]
    NotReady,
    #[error("failed to write type definitions: {0}")]
    Io(#[from] std::io::Error),
}
