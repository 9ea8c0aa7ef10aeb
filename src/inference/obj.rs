use serde_json::{Map, Value};
use tracing::trace;

use super::{Inference, Naming, Pointer};
use crate::error::Result;
use crate::ir::{Field, Record};

impl<N: Naming> Inference<N> {
    /// One field per key, in iteration order. Nested records are built
    /// eagerly, before this record is returned.
    pub(super) fn synthesize_at(
        &self,
        name: &str,
        map: &Map<String, Value>,
        at: &mut Pointer,
    ) -> Result<Record> {
        let mut fields = Vec::with_capacity(map.len());
        for (key, value) in map {
            at.push(key);
            let ty = self.classify(key, value, at)?;
            at.pop();
            fields.push(Field { name: key.clone(), tag: key.clone(), ty });
        }
        trace!(record = name, fields = fields.len(), "synthesized record");
        Ok(Record { name: name.to_owned(), fields })
    }
}
