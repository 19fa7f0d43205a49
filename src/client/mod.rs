pub mod alert;
pub mod http;
pub mod pagination;
pub mod provider;
pub mod query;
pub mod resource;

pub use alert::Alert;
pub use http::ApiClient;
pub use pagination::{Page, PageLinks};
pub use provider::EntityApi;
pub use query::QueryParams;
pub use resource::RestResource;
