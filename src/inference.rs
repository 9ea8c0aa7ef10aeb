//! Single-document schema inference.
//!
//! Walk one decoded mapping depth-first and build a [`Record`] for it: one
//! field per key, each typed by classifying its value. Mappings become nested
//! records named after their key; sequences go through the unifier, which
//! collapses the element types into one (or `Unknown` when they disagree).
//!
//! Design goals:
//! - Pure: no state beyond the strategy seams below; every call builds a fresh tree.
//! - Deterministic: field order is the mapping's iteration order.
//! - Fail fast: `null`/`boolean` values abort the whole inference.
pub mod arr;
pub mod naming;
pub mod obj;

use std::fmt;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::ir::{Record, Ty};

pub use naming::{Identity, Naming};

/// Name of the record synthesized for the document root.
pub const ROOT_TYPE_NAME: &str = "TopLevelElement";

// ------------------------------- Policy ---------------------------------- //

/// How the element types of a sequence are collapsed into one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Unification {
    /// Compare only the last two elements. Order-sensitive:
    /// `[1, 1, "x"]` is unknown but `[1, "x", "x"]` is a string sequence.
    #[default]
    LastPair,
    /// Fold every element into the first one's type; any difference
    /// collapses the sequence to unknown.
    Strict,
}

// ------------------------------- Engine ---------------------------------- //

#[derive(Clone, Debug, Default)]
pub struct Inference<N = Identity> {
    naming: N,
    unification: Unification,
}

impl Inference {
    pub fn new() -> Self { Self::default() }
}

impl<N: Naming> Inference<N> {
    pub fn with_naming(naming: N) -> Self {
        Self { naming, unification: Unification::default() }
    }

    pub fn unification(mut self, unification: Unification) -> Self {
        self.unification = unification;
        self
    }

    /// Infer the root record, always named [`ROOT_TYPE_NAME`].
    pub fn infer(&self, root: &Map<String, Value>) -> Result<Record> {
        self.synthesize(ROOT_TYPE_NAME, root)
    }

    /// Type Synthesizer entry point: build a record for `map` named `name`.
    pub fn synthesize(&self, name: &str, map: &Map<String, Value>) -> Result<Record> {
        self.synthesize_at(name, map, &mut Pointer::default())
    }

    /// Sequence Unifier entry point: compute the element type of `elements`.
    pub fn unify(&self, name: &str, elements: &[Value]) -> Result<Ty> {
        self.unify_at(name, elements, &mut Pointer::default())
    }

    /// Classify one value. `name` names the record if `value` is a mapping,
    /// or the element records if it is a sequence.
    fn classify(&self, name: &str, value: &Value, at: &mut Pointer) -> Result<Ty> {
        match value {
            Value::Number(_) => Ok(Ty::NUMBER),
            Value::String(_) => Ok(Ty::STRING),
            Value::Object(map) => self.synthesize_at(name, map, at).map(Ty::Record),
            Value::Array(xs) => self.unify_at(name, xs, at).map(Ty::sequence_of),
            Value::Null | Value::Bool(_) => Err(Error::UnsupportedValueKind {
                kind: kind_name(value),
                path: at.to_string(),
            }),
        }
    }
}

fn kind_name(v: &Value) -> &'static str {
    match v {
        Value::Null      => "null",
        Value::Bool(_)   => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_)  => "array",
        Value::Object(_) => "object",
    }
}

// ------------------------------ Location --------------------------------- //

/// JSON Pointer (RFC 6901) to the value being classified.
#[derive(Clone, Debug, Default)]
struct Pointer(Vec<String>);

impl Pointer {
    fn push(&mut self, token: impl ToString) { self.0.push(token.to_string()); }
    fn pop(&mut self) { self.0.pop(); }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.0 {
            write!(f, "/{}", token.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

// -------------------------------- Tests ---------------------------------- //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Field;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn mapping(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            other => panic!("fixture must be a mapping, got {other}"),
        }
    }

    fn unify(v: Value) -> Ty {
        let xs = v.as_array().expect("fixture must be a sequence").clone();
        Inference::new().unify("items", &xs).unwrap()
    }

    fn unify_strict(v: Value) -> Ty {
        let xs = v.as_array().expect("fixture must be a sequence").clone();
        Inference::new().unification(Unification::Strict).unify("items", &xs).unwrap()
    }

    #[test]
    fn flat_mapping_keeps_key_order() {
        let root = mapping(json!({ "name": "Ann", "age": 30, "tags": ["x", "y"] }));
        let record = Inference::new().infer(&root).unwrap();

        assert_eq!(record.name, "TopLevelElement");
        assert_eq!(record.fields, vec![
            Field { name: "name".into(), tag: "name".into(), ty: Ty::STRING },
            Field { name: "age".into(), tag: "age".into(), ty: Ty::NUMBER },
            Field { name: "tags".into(), tag: "tags".into(), ty: Ty::sequence_of(Ty::STRING) },
        ]);
    }

    #[test]
    fn key_order_is_not_sorted() {
        let root = mapping(json!({ "zeta": 1, "alpha": 2, "mid": "m" }));
        let record = Inference::new().infer(&root).unwrap();
        let tags: Vec<&str> = record.fields.iter().map(|f| f.tag.as_str()).collect();
        assert_eq!(tags, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn integers_and_floats_share_one_kind() {
        let root = mapping(json!({ "i": -3, "u": 18446744073709551615u64, "f": 2.5 }));
        let record = Inference::new().infer(&root).unwrap();
        assert!(record.fields.iter().all(|f| f.ty == Ty::NUMBER));
    }

    #[test]
    fn nested_mapping_becomes_record_named_after_key() {
        let root = mapping(json!({ "user": { "id": 1 } }));
        let record = Inference::new().infer(&root).unwrap();

        let user = record.field("user").unwrap().ty.as_record().expect("user is a record");
        assert_eq!(user.name, "user");
        assert_eq!(user.field("id").unwrap().ty, Ty::NUMBER);
    }

    #[test]
    fn empty_mapping_is_an_empty_record() {
        let record = Inference::new().infer(&Map::new()).unwrap();
        assert!(record.fields.is_empty());
    }

    #[test]
    fn uniform_scalar_sequences_keep_their_kind() {
        assert_eq!(unify(json!([7])), Ty::NUMBER);
        assert_eq!(unify(json!([1, 2.5, 3, 4])), Ty::NUMBER);
        assert_eq!(unify(json!(["a"])), Ty::STRING);
        assert_eq!(unify(json!(["a", "b", "c"])), Ty::STRING);
    }

    #[test]
    fn empty_sequence_is_unknown() {
        assert_eq!(unify(json!([])), Ty::UNKNOWN);
        assert_eq!(unify_strict(json!([])), Ty::UNKNOWN);
    }

    #[test]
    fn last_pair_policy_is_order_sensitive() {
        // last two differ
        assert_eq!(unify(json!([1, 1, "x"])), Ty::UNKNOWN);
        assert_eq!(unify(json!([1, "x"])), Ty::UNKNOWN);
        // last two agree, earlier disagreement is forgotten
        assert_eq!(unify(json!([1, "x", "x"])), Ty::STRING);
        assert_eq!(unify(json!(["x", 1, 1])), Ty::NUMBER);
    }

    #[test]
    fn strict_policy_collapses_on_any_difference() {
        assert_eq!(unify_strict(json!([1, 1, "x"])), Ty::UNKNOWN);
        assert_eq!(unify_strict(json!([1, "x", "x"])), Ty::UNKNOWN);
        assert_eq!(unify_strict(json!([1, 2, 3])), Ty::NUMBER);
    }

    #[test]
    fn sequence_of_mappings_unifies_structurally() {
        let same = unify(json!([{ "id": 1 }, { "id": 2 }]));
        let record = same.as_record().expect("identical shapes unify to a record");
        assert_eq!(record.name, "items");
        assert_eq!(record.field("id").unwrap().ty, Ty::NUMBER);

        // same name, different fields: not equal
        assert_eq!(unify(json!([{ "id": 1 }, { "id": "one" }])), Ty::UNKNOWN);
        assert_eq!(unify(json!([{ "id": 1 }, { "key": 1 }])), Ty::UNKNOWN);
        // field order is part of the structure
        assert_eq!(unify(json!([{ "a": 1, "b": 2 }, { "b": 2, "a": 1 }])), Ty::UNKNOWN);
    }

    #[test]
    fn nested_sequences_compare_by_structure() {
        assert_eq!(unify(json!([[1, 2], [3]])), Ty::sequence_of(Ty::NUMBER));
        assert_eq!(unify(json!([[1], ["a"]])), Ty::UNKNOWN);
        assert_eq!(unify(json!([[], []])), Ty::sequence_of(Ty::UNKNOWN));
        assert_eq!(
            unify(json!([[[1]], [[2, 3]]])),
            Ty::sequence_of(Ty::sequence_of(Ty::NUMBER)),
        );
    }

    #[test]
    fn records_inside_nested_sequences_keep_the_field_name() {
        let root = mapping(json!({ "grid": [[{ "x": 1 }]] }));
        let record = Inference::new().infer(&root).unwrap();

        let Ty::Sequence { element } = &record.field("grid").unwrap().ty else {
            panic!("grid is a sequence");
        };
        let Ty::Sequence { element: cell } = element.as_ref() else {
            panic!("grid holds sequences");
        };
        assert_eq!(cell.as_record().unwrap().name, "grid");
    }

    #[test]
    fn naming_strategy_names_sequence_records() {
        let drop_s = |name: &str| name.strip_suffix('s').unwrap_or(name).to_owned();
        let root = mapping(json!({ "users": [{ "id": 1 }], "owner": { "id": 2 } }));
        let record = Inference::with_naming(drop_s).infer(&root).unwrap();

        let Ty::Sequence { element } = &record.field("users").unwrap().ty else {
            panic!("users is a sequence");
        };
        assert_eq!(element.as_record().unwrap().name, "user");
        // plain nested mappings are never singularized
        assert_eq!(record.field("owner").unwrap().ty.as_record().unwrap().name, "owner");
    }

    #[test]
    fn boolean_anywhere_fails_with_its_location() {
        let root = mapping(json!({ "a": { "b": [1, { "ok": true }] } }));
        let err = Inference::new().infer(&root).unwrap_err();
        match err {
            Error::UnsupportedValueKind { kind, path } => {
                assert_eq!(kind, "boolean");
                assert_eq!(path, "/a/b/1/ok");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn null_fails_even_when_earlier_in_a_sequence() {
        // the unifier still classifies every element
        let root = mapping(json!({ "xs": [null, 1, 1] }));
        let err = Inference::new().infer(&root).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedValueKind { kind: "null", ref path } if path == "/xs/0"
        ));
    }

    #[test]
    fn pointer_escapes_special_characters() {
        let root = mapping(json!({ "a/b": { "c~d": null } }));
        let err = Inference::new().infer(&root).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedValueKind { ref path, .. } if path == "/a~1b/c~0d"
        ));
    }

    #[test]
    fn type_tree_serializes_for_the_debug_view() {
        let root = mapping(json!({ "tags": [] }));
        let record = Inference::new().infer(&root).unwrap();
        let v = serde_json::to_value(&record).unwrap();
        assert_eq!(v, json!({
            "name": "TopLevelElement",
            "fields": [{
                "name": "tags",
                "tag": "tags",
                "ty": { "type": "sequence", "element": { "type": "scalar", "kind": "unknown" } },
            }],
        }));
    }
}
