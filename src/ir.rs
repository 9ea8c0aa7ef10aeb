// Strongly-typed schema tree for codegen. No serde_json::Value here.
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Number,                  // every integer and float width
    String,
    Unknown,                 // empty or irreconcilably mixed sequences
}

/// Equality is structural: two records are equal when their names and
/// fields (in order) are equal, regardless of where they were built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Ty {
    Scalar { kind: ScalarKind },
    Record(Record),
    Sequence { element: Box<Ty> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub name: String,
    pub fields: Vec<Field>,  // mapping iteration order, never sorted
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub tag: String,         // original key, independent of display name
    pub ty: Ty,
}

impl Ty {
    pub const NUMBER: Ty = Ty::Scalar { kind: ScalarKind::Number };
    pub const STRING: Ty = Ty::Scalar { kind: ScalarKind::String };
    pub const UNKNOWN: Ty = Ty::Scalar { kind: ScalarKind::Unknown };

    pub fn sequence_of(element: Ty) -> Self {
        Ty::Sequence { element: Box::new(element) }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Ty::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl Record {
    pub fn field(&self, tag: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.tag == tag)
    }
}
