//! Editor workflows: load a record and the lists its selections draw from,
//! turn form values back into a record, then create or update it.

pub mod lookup;
pub mod engine;
pub mod rule;
pub mod snippet;
pub mod snippet_matched_rules;

pub use engine::EngineForm;
pub use rule::RuleForm;
pub use snippet::SnippetForm;
pub use snippet_matched_rules::SnippetMatchedRulesForm;

use crate::errors::AdminError;
use crate::models::Entity;
use crate::store::EntitySlice;

/// Form values for one record type.
pub trait EntityForm<T: Entity>: Default + Sized {
    /// Values an edit form starts from.
    fn from_entity(entity: &T) -> Self;

    /// Required-field checks run before anything is sent.
    fn validate(&self) -> Result<(), AdminError>;
}

/// Prepare the slice for editing: reset it for a new record, or fetch the
/// existing one. Returns the loaded record.
pub(crate) async fn load<T: Entity>(slice: &EntitySlice<T>, id: Option<i64>) -> Result<Option<T>, AdminError> {
    match id {
        Some(id) => slice.get_entity(id).await.map(Some),
        None => {
            slice.reset().await;
            Ok(None)
        }
    }
}

/// Values merged over the slice's current entity (or a blank one when new).
pub(crate) async fn base_entity<T: Entity>(slice: &EntitySlice<T>, is_new: bool) -> T {
    if is_new {
        T::default()
    } else {
        slice.snapshot().await.entity
    }
}

pub(crate) async fn submit<T: Entity>(slice: &EntitySlice<T>, entity: T, is_new: bool) -> Result<T, AdminError> {
    if is_new {
        slice.create_entity(&entity).await
    } else {
        slice.update_entity(&entity).await
    }
}

pub(crate) fn require(value: &str, entity: &str, field: &str) -> Result<(), AdminError> {
    if value.trim().is_empty() {
        Err(AdminError::Validation(format!("{}.{} is required", entity, field)))
    } else {
        Ok(())
    }
}

pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
