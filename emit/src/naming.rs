//! Deterministic auxiliary-type naming.
//!
//! Grounded on `original_source/src/slow_learner/typedef_generation.py`'s
//! `new_type_name`: alnum-run PascalCase mangling, `_` prefix when the
//! mangled name isn't a valid identifier, `GeneratedType` as the last-resort
//! fallback. Collision disambiguation is swapped from the original's
//! `random.choice(string.ascii_uppercase)` for a deterministic numeric
//! suffix, since the target notation requires collision-free *deterministic*
//! mangling.

use convert_case::{Case, Casing};

/// Names already assigned to auxiliary typedefs, in insertion order (the
/// order they appear in the final emitted source). A `Vec` rather than a
/// map: the teacher and this emitter both favor small, linearly-scanned
/// insertion-ordered collections over hashing when N is small and order
/// matters for output determinism.
pub type DependencyTypedefs = Vec<(String, String)>;

pub fn contains_key(deps: &DependencyTypedefs, key: &str) -> bool {
    deps.iter().any(|(k, _)| k == key)
}

/// Mangles `hint` into a valid Python identifier, disambiguating against
/// names already present in `dependency_typedefs` with a deterministic
/// numeric suffix.
pub fn new_type_name(hint: &str, dependency_typedefs: &DependencyTypedefs) -> String {
    let base = mangle(hint);
    if !contains_key(dependency_typedefs, &base) {
        return base;
    }
    let mut suffix = 2usize;
    loop {
        let candidate = format!("{base}{suffix}");
        if !contains_key(dependency_typedefs, &candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

fn mangle(hint: &str) -> String {
    let mut name = String::new();
    for run in alnum_runs(hint) {
        name.push_str(&run.to_case(Case::Pascal));
    }
    if !is_identifier(&name) {
        name = format!("_{name}");
    }
    if !is_identifier(&name) {
        name = "GeneratedType".to_string();
    }
    name
}

fn alnum_runs(s: &str) -> Vec<String> {
    let mut runs = Vec::new();
    let mut current = String::new();
    for c in s.chars() {
        if c.is_alphanumeric() {
            current.push(c);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Approximates Python identifier validity via Rust's identifier grammar
/// (ASCII-identifier-shaped names only). Python's own grammar is a unicode
/// superset of this, and Rust additionally rejects its own keywords (`fn`,
/// `match`, ...) that are perfectly valid Python identifiers; both are
/// accepted approximations here since `mangle`'s alnum-run PascalCasing
/// essentially never produces such names in practice.
fn is_identifier(s: &str) -> bool {
    !s.is_empty() && syn::parse_str::<syn::Ident>(s).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mangles_snake_case_hint_to_pascal_case() {
        assert_eq!(new_type_name("user_profile", &Vec::new()), "UserProfile");
    }

    #[test]
    fn falls_back_to_generated_type_for_unidentifiable_hints() {
        assert_eq!(new_type_name("123", &Vec::new()), "_123");
    }

    #[test]
    fn disambiguates_collisions_deterministically() {
        let deps = vec![("Thing".to_string(), String::new())];
        assert_eq!(new_type_name("thing", &deps), "Thing2");
    }
}
