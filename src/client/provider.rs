use async_trait::async_trait;
use crate::errors::AdminError;
use crate::models::Entity;
use super::pagination::Page;
use super::query::QueryParams;

/// The CRUD contract every record type is served through.
#[async_trait]
pub trait EntityApi<T: Entity>: Send + Sync {
    async fn list(&self, query: &QueryParams) -> Result<Page<T>, AdminError>;

    async fn get(&self, id: i64) -> Result<T, AdminError>;

    /// Store a new record; the returned copy carries the assigned id.
    async fn create(&self, entity: &T) -> Result<T, AdminError>;

    /// Replace a stored record.
    async fn update(&self, entity: &T) -> Result<T, AdminError>;

    /// Merge the non-empty fields of `entity` into the stored record.
    async fn partial_update(&self, entity: &T) -> Result<T, AdminError>;

    async fn delete(&self, id: i64) -> Result<(), AdminError>;
}
