//! Python type-hint pretty-printer (`SPEC_FULL.md` §6's emitter interface).
//!
//! Grounded directly on `original_source/src/slow_learner/
//! typedef_generation.py`'s `PythonVersion` gating and
//! `generate_typedef_rhs`: the Optional/Union/Literal/tuple/list/dict/
//! TypedDict/`NotRequired`/`total=False` emission rules, and the
//! empty-Union-to-`Any` special case ("only the emitter materializes the
//! empty-union sentinel"). Top-level orchestration (doc-string header,
//! import collection, final text assembly) is grounded on `type_learner.
//! py`'s `generate_type_definitions`.

use std::collections::BTreeSet;
use std::path::Path;

use shapeshift_core::{Field, Learner, Scalar, Term};

use crate::error::EmitError;
use crate::naming::{new_type_name, DependencyTypedefs};

/// Target Python version, gating which stdlib generic-alias and `typing`
/// constructs are emitted. Mirrors `typedef_generation.py`'s `PythonVersion`
/// `IntEnum` exactly (member names and the `>=` gating it's used for).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PythonTarget {
    Py38,
    Py39,
    Py310,
    Py311,
}

impl Default for PythonTarget {
    fn default() -> Self {
        PythonTarget::Py38
    }
}

const PY_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

fn is_python_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

fn is_python_keyword(s: &str) -> bool {
    PY_KEYWORDS.contains(&s)
}

fn python_capitalize(s: &str) -> String {
    if s.is_empty() {
        return "EmptyKey".to_string();
    }
    let mut chars = s.chars();
    let first = chars.next().unwrap().to_uppercase().to_string();
    let rest: String = chars.as_str().to_lowercase();
    format!("{first}{rest}")
}

fn python_repr(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Int(n) => n.to_string(),
        Scalar::Str(s) => format!("{s:?}"),
        Scalar::Bytes(bytes) => format!("b{:?}", String::from_utf8_lossy(bytes)),
        Scalar::Bool(b) => if *b { "True" } else { "False" }.to_string(),
        Scalar::Enum(e) => e.clone(),
    }
}

/// `Missing` marks an optional Record key; this strips it from a field's
/// union before rendering, mirroring `typedef_generation.py`'s
/// `non_missing_members` filter.
fn without_missing(term: &Term) -> Term {
    match term {
        Term::Union(members) => {
            Term::Union(members.iter().filter(|m| **m != Term::Missing).cloned().collect())
        }
        other => other.clone(),
    }
}

fn collection_pyname(tag: &str, target: PythonTarget, imports: &mut BTreeSet<(String, String)>) -> String {
    if target >= PythonTarget::Py39 {
        tag.to_string()
    } else {
        let name = match tag {
            "list" => "List",
            "set" => "Set",
            "frozenset" => "FrozenSet",
            _ => "Collection",
        };
        imports.insert(("typing".to_string(), name.to_string()));
        name.to_string()
    }
}

fn mapping_pyname(tag: &str, target: PythonTarget, imports: &mut BTreeSet<(String, String)>) -> String {
    if target >= PythonTarget::Py39 {
        tag.to_string()
    } else {
        let name = match tag {
            "dict" => "Dict",
            _ => "Mapping",
        };
        imports.insert(("typing".to_string(), name.to_string()));
        name.to_string()
    }
}

/// Recursively lowers `term` to a Python type-hint expression, accumulating
/// `imports` and any auxiliary `dependency_typedefs` (Record/Union-variant
/// types) it needed along the way. Returns the expression text to splice in
/// at `term`'s call site.
fn generate_typedef_rhs(
    term: &Term,
    type_name: &str,
    target: PythonTarget,
    imports: &mut BTreeSet<(String, String)>,
    dependency_typedefs: &mut DependencyTypedefs,
) -> String {
    match term {
        Term::None => "None".to_string(),
        Term::Missing => "None".to_string(),
        Term::Opaque(tag) => tag.clone(),
        Term::Literal(scalar) => {
            imports.insert(("typing".to_string(), "Literal".to_string()));
            format!("Literal[{}]", python_repr(scalar))
        }
        Term::Union(members) => {
            generate_union_rhs(members, type_name, target, imports, dependency_typedefs)
        }
        Term::Tuple(items) => {
            let tuple_type = if target >= PythonTarget::Py39 {
                "tuple".to_string()
            } else {
                imports.insert(("typing".to_string(), "Tuple".to_string()));
                "Tuple".to_string()
            };
            let item_typedefs: Vec<String> = items
                .iter()
                .enumerate()
                .map(|(idx, item)| {
                    let hint = format!("{type_name}Item{idx}");
                    let name = new_type_name(&hint, dependency_typedefs);
                    generate_typedef_rhs(item, &name, target, imports, dependency_typedefs)
                })
                .collect();
            format!("{tuple_type}[{}]", item_typedefs.join(", "))
        }
        Term::Collection { tag, item } => {
            let collection_typedef = collection_pyname(tag, target, imports);
            let hint = format!("{type_name}Item");
            let name = new_type_name(&hint, dependency_typedefs);
            let item_typedef = generate_typedef_rhs(item, &name, target, imports, dependency_typedefs);
            format!("{collection_typedef}[{item_typedef}]")
        }
        Term::Mapping { tag, key, value } => {
            let mapping_typedef = mapping_pyname(tag, target, imports);
            let key_name = new_type_name(&format!("{type_name}Key"), dependency_typedefs);
            let key_typedef = generate_typedef_rhs(key, &key_name, target, imports, dependency_typedefs);
            let value_name = new_type_name(&format!("{type_name}Value"), dependency_typedefs);
            let value_typedef =
                generate_typedef_rhs(value, &value_name, target, imports, dependency_typedefs);
            format!("{mapping_typedef}[{key_typedef}, {value_typedef}]")
        }
        Term::Record(fields) => {
            generate_record_rhs(fields, type_name, target, imports, dependency_typedefs)
        }
    }
}

fn generate_union_rhs(
    members: &[Term],
    type_name: &str,
    target: PythonTarget,
    imports: &mut BTreeSet<(String, String)>,
    dependency_typedefs: &mut DependencyTypedefs,
) -> String {
    if members.is_empty() {
        // Only the emitter materializes the empty-union sentinel, as `Any`.
        imports.insert(("typing".to_string(), "Any".to_string()));
        return "Any".to_string();
    }
    let non_none: Vec<&Term> = members.iter().filter(|m| **m != Term::None).collect();
    if non_none.is_empty() {
        return "None".to_string();
    }
    let body_members: Vec<&Term> = if target >= PythonTarget::Py310 {
        members.iter().collect()
    } else {
        non_none.clone()
    };
    let member_typedefs: Vec<String> = if body_members.len() > 1 {
        body_members
            .iter()
            .enumerate()
            .map(|(idx, member)| {
                let hint = format!("{type_name}Variant{}", idx + 1);
                let name = new_type_name(&hint, dependency_typedefs);
                generate_typedef_rhs(member, &name, target, imports, dependency_typedefs)
            })
            .collect()
    } else {
        let name = new_type_name(type_name, dependency_typedefs);
        vec![generate_typedef_rhs(
            body_members[0],
            &name,
            target,
            imports,
            dependency_typedefs,
        )]
    };
    if target >= PythonTarget::Py310 {
        member_typedefs.join(" | ")
    } else {
        imports.insert(("typing".to_string(), "Union".to_string()));
        let union_body = if member_typedefs.len() > 1 {
            format!("Union[{}]", member_typedefs.join(", "))
        } else {
            member_typedefs[0].clone()
        };
        if non_none.len() != members.len() {
            imports.insert(("typing".to_string(), "Optional".to_string()));
            format!("Optional[{union_body}]")
        } else {
            union_body
        }
    }
}

fn generate_record_rhs(
    fields: &[Field],
    type_name: &str,
    target: PythonTarget,
    imports: &mut BTreeSet<(String, String)>,
    dependency_typedefs: &mut DependencyTypedefs,
) -> String {
    imports.insert(("typing".to_string(), "TypedDict".to_string()));

    let mut not_required: BTreeSet<String> = BTreeSet::new();
    let mut field_types_to_generate: Vec<(String, Term)> = Vec::new();
    for field in fields {
        match &field.ty {
            Term::Union(members) if members.iter().any(|m| *m == Term::Missing) => {
                not_required.insert(field.name.clone());
                field_types_to_generate.push((field.name.clone(), without_missing(&field.ty)));
            }
            other => field_types_to_generate.push((field.name.clone(), other.clone())),
        }
    }

    let use_class_notation = field_types_to_generate
        .iter()
        .all(|(name, _)| is_python_identifier(name) && !is_python_keyword(name));
    let use_total_false =
        !not_required.is_empty() && not_required.len() == field_types_to_generate.len();
    if !not_required.is_empty() && !use_total_false {
        let module = if target >= PythonTarget::Py311 {
            "typing"
        } else {
            "typing_extensions"
        };
        imports.insert((module.to_string(), "NotRequired".to_string()));
    }

    let mut field_typedefs: Vec<(String, String)> = Vec::new();
    for (key, value_term) in &field_types_to_generate {
        let hint = format!("{type_name}{}", python_capitalize(key));
        let name = new_type_name(&hint, dependency_typedefs);
        let mut value_typedef =
            generate_typedef_rhs(value_term, &name, target, imports, dependency_typedefs);
        if not_required.contains(key) && !use_total_false {
            value_typedef = format!("NotRequired[{value_typedef}]");
        }
        field_typedefs.push((key.clone(), value_typedef));
    }

    let body = if use_class_notation {
        let inheritance = if use_total_false {
            "TypedDict, total=False"
        } else {
            "TypedDict"
        };
        let mut lines = vec![format!("class {type_name}({inheritance}):")];
        if field_typedefs.is_empty() {
            lines.push("    pass".to_string());
        }
        for (key, value_typedef) in &field_typedefs {
            lines.push(format!("    {key}: {value_typedef}"));
        }
        lines.join("\n")
    } else {
        let mut fields_arg = String::from("{");
        for (key, value_typedef) in &field_typedefs {
            fields_arg.push_str(&format!("{key:?}: {value_typedef}, "));
        }
        fields_arg.push('}');
        let mut args = vec![format!("{type_name:?}"), fields_arg];
        if use_total_false {
            args.push("total=False".to_string());
        }
        format!("{type_name} = TypedDict({})", args.join(", "))
    };
    dependency_typedefs.push((type_name.to_string(), body));
    type_name.to_string()
}

/// Renders a full module body: a triple-quoted doc-string header naming
/// the target version and how many values were observed, sorted `from ...
/// import ...` lines, every auxiliary typedef in the order it was
/// introduced, and finally the root alias (omitted if the root type itself
/// was the thing named, e.g. a bare `TypedDict` class already bound to
/// `type_name`). Grounded on `type_learner.py`'s
/// `generate_type_definitions`.
pub fn render_type_definitions(
    term: &Term,
    type_name: &str,
    doc: &str,
    observed_values: usize,
    target: PythonTarget,
) -> String {
    let root_name = new_type_name(type_name, &Vec::new());
    let mut imports: BTreeSet<(String, String)> = BTreeSet::new();
    let mut dependency_typedefs: DependencyTypedefs = Vec::new();
    let typedef_rhs =
        generate_typedef_rhs(term, &root_name, target, &mut imports, &mut dependency_typedefs);

    let mut blocks: Vec<String> = Vec::new();
    blocks.push(format!(
        "\"\"\"\nThis file contains Python 3.{}+ type definitions generated from {} observed values\n> {}\n\"\"\"",
        python_minor(target),
        observed_values,
        doc,
    ));

    let mut import_lines: Vec<String> = imports
        .into_iter()
        .map(|(module, value)| format!("from {module} import {value}"))
        .collect();
    import_lines.sort();
    blocks.push(import_lines.join("\n"));

    for (_, body) in &dependency_typedefs {
        blocks.push(body.clone());
    }

    if typedef_rhs != root_name {
        blocks.push(format!("{root_name} = {typedef_rhs}"));
    }

    blocks.join("\n\n")
}

fn python_minor(target: PythonTarget) -> u8 {
    match target {
        PythonTarget::Py38 => 8,
        PythonTarget::Py39 => 9,
        PythonTarget::Py310 => 10,
        PythonTarget::Py311 => 11,
    }
}

/// Writes a full module to `path`, failing with [`EmitError::NotReady`] if
/// `learner` has not observed any value yet, or [`EmitError::AlreadyExists`]
/// if `path` is already present (§7: the emitter never overwrites).
pub fn write_type_definitions(
    learner: &Learner,
    path: &Path,
    type_name: &str,
    doc: &str,
    target: PythonTarget,
) -> Result<(), EmitError> {
    if !learner.is_ready() {
        return Err(EmitError::NotReady);
    }
    if path.exists() {
        return Err(EmitError::AlreadyExists(path.to_path_buf()));
    }
    let text = render_type_definitions(
        &learner.snapshot(),
        type_name,
        doc,
        learner.observed_values(),
        target,
    );
    std::fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shapeshift_core::LearnerConfig;
    use serde_json::json;

    fn rendered(values: &[serde_json::Value]) -> String {
        let mut learner = Learner::new(LearnerConfig::default());
        for v in values {
            learner.observe(v);
        }
        render_type_definitions(
            &learner.snapshot(),
            "Root",
            "a test fixture",
            learner.observed_values(),
            PythonTarget::Py38,
        )
    }

    #[test]
    fn optional_int_renders_as_optional() {
        let text = rendered(&[json!(null), json!(5)]);
        assert!(text.contains("from typing import Optional"));
        assert!(text.contains("Root = Optional[int]"));
    }

    #[test]
    fn record_renders_as_typed_dict_class() {
        let text = rendered(&[json!({"a": 1, "b": "x"})]);
        assert!(text.contains("from typing import TypedDict"));
        assert!(text.contains("class Root(TypedDict):"));
        assert!(text.contains("    a: "));
        assert!(text.contains("    b: "));
    }

    #[test]
    fn partial_fields_render_as_not_required() {
        let text = rendered(&[json!({"a": 1}), json!({"b": "x"})]);
        assert!(text.contains("NotRequired"));
    }

    #[test]
    fn empty_stream_renders_any_via_not_ready_guard() {
        let learner = Learner::new(LearnerConfig::default());
        let mut path = std::env::temp_dir();
        path.push("shapeshift-emit-test-not-ready.py");
        let _ = std::fs::remove_file(&path);
        let result = write_type_definitions(&learner, &path, "Root", "doc", PythonTarget::Py38);
        assert!(matches!(result, Err(EmitError::NotReady)));
    }

    #[test]
    fn existing_output_file_is_not_overwritten() {
        let mut learner = Learner::new(LearnerConfig::default());
        learner.observe(&json!(1));
        let mut path = std::env::temp_dir();
        path.push("shapeshift-emit-test-already-exists.py");
        std::fs::write(&path, "# existing").unwrap();
        let result = write_type_definitions(&learner, &path, "Root", "doc", PythonTarget::Py38);
        assert!(matches!(result, Err(EmitError::AlreadyExists(_))));
        let _ = std::fs::remove_file(&path);
    }
}
