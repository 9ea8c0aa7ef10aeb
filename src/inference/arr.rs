use serde_json::Value;
use tracing::debug;

use super::{Inference, Naming, Pointer, Unification};
use crate::error::Result;
use crate::ir::Ty;

impl<N: Naming> Inference<N> {
    pub(super) fn unify_at(&self, name: &str, elements: &[Value], at: &mut Pointer) -> Result<Ty> {
        let mut last: Option<Ty> = None;
        let mut current: Option<Ty> = None;
        let mut mixed = false;

        // every element is classified, even after the outcome is settled
        for (i, el) in elements.iter().enumerate() {
            at.push(i);
            let ty = match el {
                Value::Object(map) => {
                    let singular = self.naming.singularize(name);
                    Ty::Record(self.synthesize_at(&singular, map, at)?)
                }
                other => self.classify(name, other, at)?,
            };
            at.pop();

            mixed |= current.as_ref().is_some_and(|prev| *prev != ty);
            last = current.replace(ty);
        }

        let Some(ty) = current else {
            return Ok(Ty::UNKNOWN);
        };

        let heterogeneous = match self.unification {
            Unification::LastPair => last.is_some_and(|prev| prev != ty),
            Unification::Strict => mixed,
        };
        if heterogeneous {
            debug!(sequence = name, at = %at, policy = ?self.unification, "mixed element types, falling back to unknown");
            return Ok(Ty::UNKNOWN);
        }
        Ok(ty)
    }
}
