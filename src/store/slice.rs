use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use crate::client::{EntityApi, Page, QueryParams};
use crate::errors::AdminError;
use crate::models::Entity;
use super::state::{Action, EntityState, Operation};

/// One record type's state plus the async operations that drive it.
///
/// Each operation marks the request pending, performs it, then records the
/// outcome. Mutations refetch the full list afterwards; the refetch result
/// lands in state but never changes the mutation's own return value.
pub struct EntitySlice<T: Entity> {
    api: Arc<dyn EntityApi<T>>,
    state: Arc<RwLock<EntityState<T>>>,
}

impl<T: Entity> Clone for EntitySlice<T> {
    fn clone(&self) -> Self {
        Self { api: self.api.clone(), state: self.state.clone() }
    }
}

impl<T: Entity> EntitySlice<T> {
    pub fn new(api: Arc<dyn EntityApi<T>>) -> Self {
        Self { api, state: Arc::new(RwLock::new(EntityState::default())) }
    }

    pub fn name(&self) -> &'static str {
        T::NAME
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> EntityState<T> {
        self.state.read().await.clone()
    }

    /// Already-fetched list, for resolving references.
    pub async fn entities(&self) -> Vec<T> {
        self.state.read().await.entities.clone()
    }

    pub async fn dispatch(&self, action: Action<T>) {
        debug!(slice = T::NAME, action = action_label(&action), "Dispatch");
        self.state.write().await.reduce(action);
    }

    pub async fn reset(&self) {
        self.dispatch(Action::Reset).await;
    }

    pub async fn get_entities(&self, query: &QueryParams) -> Result<Page<T>, AdminError> {
        self.dispatch(Action::Pending(Operation::FetchList)).await;
        self.finish_list(query).await
    }

    pub async fn get_entity(&self, id: i64) -> Result<T, AdminError> {
        self.dispatch(Action::Pending(Operation::FetchOne)).await;
        match self.api.get(id).await {
            Ok(entity) => {
                self.dispatch(Action::EntityFulfilled(entity.clone())).await;
                Ok(entity)
            }
            Err(e) => Err(self.reject(Operation::FetchOne, e).await),
        }
    }

    pub async fn create_entity(&self, entity: &T) -> Result<T, AdminError> {
        self.mutate(Operation::Create, self.api.create(entity)).await
    }

    pub async fn update_entity(&self, entity: &T) -> Result<T, AdminError> {
        self.mutate(Operation::Update, self.api.update(entity)).await
    }

    pub async fn partial_update_entity(&self, entity: &T) -> Result<T, AdminError> {
        self.mutate(Operation::PartialUpdate, self.api.partial_update(entity)).await
    }

    pub async fn delete_entity(&self, id: i64) -> Result<(), AdminError> {
        self.guard_mutable(Operation::Delete).await?;
        self.dispatch(Action::Pending(Operation::Delete)).await;
        match self.api.delete(id).await {
            Ok(()) => {
                self.refetch_after(Action::DeleteFulfilled).await;
                Ok(())
            }
            Err(e) => Err(self.reject(Operation::Delete, e).await),
        }
    }

    async fn mutate<F>(&self, operation: Operation, request: F) -> Result<T, AdminError>
    where
        F: std::future::Future<Output = Result<T, AdminError>>,
    {
        self.guard_mutable(operation).await?;
        self.dispatch(Action::Pending(operation)).await;
        match request.await {
            Ok(saved) => {
                self.refetch_after(Action::SaveFulfilled(saved.clone())).await;
                Ok(saved)
            }
            Err(e) => Err(self.reject(operation, e).await),
        }
    }

    /// Read-only record types fail before anything is sent or recorded.
    async fn guard_mutable(&self, operation: Operation) -> Result<(), AdminError> {
        if T::MUTABLE {
            return Ok(());
        }
        warn!(slice = T::NAME, operation = operation.action_type(), "Mutation on read-only entity");
        Err(AdminError::ReadOnly(T::NAME))
    }

    /// The refetch is issued before the mutation's result is recorded, so
    /// the mutation's `update_success` survives the list's pending step.
    async fn refetch_after(&self, fulfilled: Action<T>) {
        self.dispatch(Action::Pending(Operation::FetchList)).await;
        self.dispatch(fulfilled).await;
        if let Err(e) = self.finish_list(&QueryParams::default()).await {
            warn!(slice = T::NAME, error = %e, "List refetch after mutation failed");
        }
    }

    async fn finish_list(&self, query: &QueryParams) -> Result<Page<T>, AdminError> {
        match self.api.list(query).await {
            Ok(page) => {
                self.dispatch(Action::ListFulfilled {
                    entities: page.items.clone(),
                    total_items: page.total_items,
                })
                .await;
                Ok(page)
            }
            Err(e) => Err(self.reject(Operation::FetchList, e).await),
        }
    }

    async fn reject(&self, operation: Operation, error: AdminError) -> AdminError {
        warn!(slice = T::NAME, operation = operation.action_type(), error = %error, "Request rejected");
        self.dispatch(Action::Rejected { operation, message: error.slice_message() }).await;
        error
    }
}

fn action_label<T>(action: &Action<T>) -> &'static str {
    match action {
        Action::Pending(_) => "pending",
        Action::ListFulfilled { .. } => "list_fulfilled",
        Action::EntityFulfilled(_) => "entity_fulfilled",
        Action::SaveFulfilled(_) => "save_fulfilled",
        Action::DeleteFulfilled => "delete_fulfilled",
        Action::Rejected { .. } => "rejected",
        Action::Reset => "reset",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::PageLinks;
    use crate::models::{Engine, SnippetMatchedRules};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// In-memory service double that counts list calls.
    struct FakeApi<T> {
        rows: Mutex<Vec<T>>,
        next_id: Mutex<i64>,
        list_calls: AtomicU32,
        fail_with: Option<u16>,
    }

    impl<T: Entity> FakeApi<T> {
        fn new(rows: Vec<T>) -> Self {
            Self { rows: Mutex::new(rows), next_id: Mutex::new(100), list_calls: AtomicU32::new(0), fail_with: None }
        }

        fn failing(status: u16) -> Self {
            Self { fail_with: Some(status), ..Self::new(Vec::new()) }
        }

        fn check(&self) -> Result<(), AdminError> {
            match self.fail_with {
                Some(status) => Err(AdminError::Status { status, problem: None }),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl EntityApi<Engine> for FakeApi<Engine> {
        async fn list(&self, _query: &QueryParams) -> Result<Page<Engine>, AdminError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            let rows = self.rows.lock().unwrap().clone();
            let total = rows.len() as u64;
            Ok(Page::new(rows, Some(total), PageLinks::default()))
        }

        async fn get(&self, id: i64) -> Result<Engine, AdminError> {
            self.check()?;
            self.rows.lock().unwrap().iter().find(|e| e.id == Some(id)).cloned()
                .ok_or(AdminError::NotFound { entity: "engine", id })
        }

        async fn create(&self, entity: &Engine) -> Result<Engine, AdminError> {
            self.check()?;
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            let saved = Engine { id: Some(*next), ..entity.clone() };
            self.rows.lock().unwrap().push(saved.clone());
            Ok(saved)
        }

        async fn update(&self, entity: &Engine) -> Result<Engine, AdminError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            let row = rows.iter_mut().find(|e| e.id == entity.id)
                .ok_or(AdminError::Status { status: 400, problem: None })?;
            *row = entity.clone();
            Ok(entity.clone())
        }

        async fn partial_update(&self, entity: &Engine) -> Result<Engine, AdminError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            let row = rows.iter_mut().find(|e| e.id == entity.id)
                .ok_or(AdminError::Status { status: 404, problem: None })?;
            if entity.name.is_some() {
                row.name = entity.name.clone();
            }
            Ok(row.clone())
        }

        async fn delete(&self, id: i64) -> Result<(), AdminError> {
            self.check()?;
            self.rows.lock().unwrap().retain(|e| e.id != Some(id));
            Ok(())
        }
    }

    fn engine(id: i64, name: &str) -> Engine {
        Engine { id: Some(id), name: Some(name.into()) }
    }

    fn slice_with(api: Arc<FakeApi<Engine>>) -> EntitySlice<Engine> {
        EntitySlice::new(api)
    }

    #[tokio::test]
    async fn test_get_entities_populates_state() {
        let api = Arc::new(FakeApi::new(vec![engine(1, "yara"), engine(2, "semgrep")]));
        let slice = slice_with(api.clone());
        slice.get_entities(&QueryParams::default()).await.unwrap();

        let state = slice.snapshot().await;
        assert_eq!(state.entities.len(), 2);
        assert_eq!(state.total_items, 2);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_create_refetches_list_once() {
        let api = Arc::new(FakeApi::new(vec![engine(1, "yara")]));
        let slice = slice_with(api.clone());

        let created = slice.create_entity(&Engine { id: None, name: Some("regex".into()) }).await.unwrap();
        assert_eq!(created.id, Some(101));
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);

        let state = slice.snapshot().await;
        assert!(state.update_success);
        assert!(!state.updating);
        assert_eq!(state.entity, created);
        assert_eq!(state.entities.len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_patch_refetch_once_each() {
        let api = Arc::new(FakeApi::new(vec![engine(1, "yara")]));
        let slice = slice_with(api.clone());

        slice.update_entity(&engine(1, "yara-x")).await.unwrap();
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
        let patched = slice.partial_update_entity(&Engine { id: Some(1), name: None }).await.unwrap();
        assert_eq!(patched.name.as_deref(), Some("yara-x"));
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_delete_clears_entity_and_sets_success() {
        let api = Arc::new(FakeApi::new(vec![engine(1, "yara")]));
        let slice = slice_with(api.clone());
        slice.get_entity(1).await.unwrap();
        assert_eq!(slice.snapshot().await.entity, engine(1, "yara"));

        slice.delete_entity(1).await.unwrap();
        let state = slice.snapshot().await;
        assert_eq!(state.entity, Engine::default());
        assert!(state.update_success);
        assert!(state.entities.is_empty());
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_request_stores_message() {
        let api = Arc::new(FakeApi::<Engine>::failing(500));
        let slice = slice_with(api.clone());
        let err = slice.create_entity(&Engine { id: None, name: Some("x".into()) }).await.unwrap_err();
        assert_eq!(err.status(), Some(500));

        let state = slice.snapshot().await;
        assert!(!state.update_success);
        assert!(!state.updating);
        assert_eq!(state.error_message.as_deref(), Some("Request failed with status code 500"));
        // no refetch after a failed mutation
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_get_missing_entity_is_rejected() {
        let api = Arc::new(FakeApi::new(vec![]));
        let slice = slice_with(api);
        let err = slice.get_entity(42).await.unwrap_err();
        assert!(matches!(err, AdminError::NotFound { id: 42, .. }));
        assert_eq!(slice.snapshot().await.error_message.as_deref(), Some("Request failed with status code 404"));
    }

    #[tokio::test]
    async fn test_read_only_slice_rejects_without_state_change() {
        struct ReadOnlyApi;

        #[async_trait]
        impl EntityApi<SnippetMatchedRules> for ReadOnlyApi {
            async fn list(&self, _q: &QueryParams) -> Result<Page<SnippetMatchedRules>, AdminError> {
                Ok(Page::new(vec![], None, PageLinks::default()))
            }
            async fn get(&self, id: i64) -> Result<SnippetMatchedRules, AdminError> {
                Ok(SnippetMatchedRules::reference(id))
            }
            async fn create(&self, _e: &SnippetMatchedRules) -> Result<SnippetMatchedRules, AdminError> {
                panic!("create must not be called")
            }
            async fn update(&self, _e: &SnippetMatchedRules) -> Result<SnippetMatchedRules, AdminError> {
                panic!("update must not be called")
            }
            async fn partial_update(&self, _e: &SnippetMatchedRules) -> Result<SnippetMatchedRules, AdminError> {
                panic!("partial_update must not be called")
            }
            async fn delete(&self, _id: i64) -> Result<(), AdminError> {
                panic!("delete must not be called")
            }
        }

        let slice = EntitySlice::<SnippetMatchedRules>::new(Arc::new(ReadOnlyApi));
        assert!(matches!(slice.delete_entity(1).await, Err(AdminError::ReadOnly(_))));
        assert!(matches!(
            slice.create_entity(&SnippetMatchedRules::default()).await,
            Err(AdminError::ReadOnly(_))
        ));
        assert_eq!(slice.snapshot().await, EntityState::default());
    }
}
