use serde::Serialize;
use crate::models::Entity;

/// The request kinds a slice tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    FetchList,
    FetchOne,
    Create,
    Update,
    PartialUpdate,
    Delete,
}

impl Operation {
    pub fn is_read(&self) -> bool {
        matches!(self, Self::FetchList | Self::FetchOne)
    }

    /// Action type in `<slice>/<operation>` form, for logs.
    pub fn action_type(&self) -> &'static str {
        match self {
            Self::FetchList => "fetch_entity_list",
            Self::FetchOne => "fetch_entity",
            Self::Create => "create_entity",
            Self::Update => "update_entity",
            Self::PartialUpdate => "partial_update_entity",
            Self::Delete => "delete_entity",
        }
    }
}

/// State transitions applied to a slice.
#[derive(Debug, Clone, PartialEq)]
pub enum Action<T> {
    Pending(Operation),
    ListFulfilled { entities: Vec<T>, total_items: u64 },
    EntityFulfilled(T),
    /// Create, update or partial update came back.
    SaveFulfilled(T),
    DeleteFulfilled,
    Rejected { operation: Operation, message: String },
    Reset,
}

/// List/detail/status state of one record type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityState<T> {
    pub loading: bool,
    pub error_message: Option<String>,
    pub entities: Vec<T>,
    pub entity: T,
    pub updating: bool,
    pub total_items: u64,
    pub update_success: bool,
}

impl<T: Entity> Default for EntityState<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error_message: None,
            entities: Vec::new(),
            entity: T::default(),
            updating: false,
            total_items: 0,
            update_success: false,
        }
    }
}

impl<T: Entity> EntityState<T> {
    pub fn reduce(&mut self, action: Action<T>) {
        match action {
            Action::Pending(op) if op.is_read() => {
                self.error_message = None;
                self.update_success = false;
                self.loading = true;
            }
            Action::Pending(_) => {
                self.error_message = None;
                self.update_success = false;
                self.updating = true;
            }
            Action::ListFulfilled { entities, total_items } => {
                self.loading = false;
                self.entities = entities;
                self.total_items = total_items;
            }
            Action::EntityFulfilled(entity) => {
                self.loading = false;
                self.entity = entity;
            }
            Action::SaveFulfilled(entity) => {
                self.updating = false;
                self.loading = false;
                self.update_success = true;
                self.entity = entity;
            }
            Action::DeleteFulfilled => {
                self.updating = false;
                self.update_success = true;
                self.entity = T::default();
            }
            Action::Rejected { message, .. } => {
                self.loading = false;
                self.updating = false;
                self.update_success = false;
                self.error_message = Some(message);
            }
            Action::Reset => *self = Self::default(),
        }
    }

    /// Whether any request is in flight.
    pub fn is_busy(&self) -> bool {
        self.loading || self.updating
    }

    /// Look up an already-fetched record by id.
    pub fn find(&self, id: i64) -> Option<&T> {
        self.entities.iter().find(|e| e.id() == Some(id))
    }
}
