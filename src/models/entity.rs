use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// A record type managed through `/api/<RESOURCE>`.
pub trait Entity:
    Clone + Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Singular name used in logs, alerts and errors (`engine`, `snippetMatchedRules`).
    const NAME: &'static str;
    /// Path segment under `/api`.
    const RESOURCE: &'static str;
    /// Whether create/update/patch/delete exist for this record type.
    const MUTABLE: bool = true;

    fn id(&self) -> Option<i64>;

    /// An id-only reference, as produced by a multi-select.
    fn reference(id: i64) -> Self;

    /// Drop relationship references that carry no id before sending.
    fn clean(self) -> Self {
        self
    }
}

/// Keep only references that point at a stored record.
pub(crate) fn clean_ref<T: Entity>(value: Option<T>) -> Option<T> {
    value.filter(|v| v.id().is_some())
}

pub(crate) fn clean_refs<T: Entity>(values: Option<Vec<T>>) -> Option<Vec<T>> {
    values.map(|list| list.into_iter().filter(|v| v.id().is_some()).collect())
}
