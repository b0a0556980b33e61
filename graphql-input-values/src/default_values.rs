//! Lazily coerced, memoized field default values.

use std::collections::HashMap;

use apollo_compiler::Node;
use apollo_compiler::ast::InputValueDefinition;
use parking_lot::Mutex;
use serde_json_bytes::Value;

/// Cache of coerced default values, keyed by field-definition identity.
///
/// Owned by [`InputCoercion`](crate::InputCoercion), whose borrow of the
/// schema keeps every key alive for the cache's whole lifetime. A default
/// is coerced at most meaningfully once per definition: the coercion is a
/// pure function of the definition's type and literal, so two threads
/// racing to fill the same slot compute the same value and the first
/// insert wins.
///
/// `None` records a default that failed to coerce, so it is not retried.
#[derive(Debug, Default)]
pub(crate) struct DefaultValueCache {
    coerced: Mutex<HashMap<usize, Option<Value>>>,
}

impl DefaultValueCache {
    pub(crate) fn get_or_compute(
        &self,
        definition: &Node<InputValueDefinition>,
        compute: impl FnOnce() -> Option<Value>,
    ) -> Option<Value> {
        let key = std::ptr::from_ref::<InputValueDefinition>(definition) as usize;
        if let Some(hit) = self.coerced.lock().get(&key) {
            return hit.clone();
        }
        // Computed outside the lock: recomputation is deterministic, so a
        // race is redundant work, never an inconsistency.
        let computed = compute();
        self.coerced
            .lock()
            .entry(key)
            .or_insert(computed)
            .clone()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.coerced.lock().len()
    }
}
