use std::marker::PhantomData;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, Response, StatusCode};
use tracing::debug;
use crate::errors::AdminError;
use crate::models::Entity;
use super::http::ApiClient;
use super::pagination::{page_links, total_count, Page};
use super::provider::EntityApi;
use super::query::QueryParams;

/// REST access to `/api/<T::RESOURCE>`.
pub struct RestResource<T> {
    client: ApiClient,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for RestResource<T> {
    fn clone(&self) -> Self {
        Self { client: self.client.clone(), _entity: PhantomData }
    }
}

impl<T: Entity> RestResource<T> {
    pub fn new(client: ApiClient) -> Self {
        Self { client, _entity: PhantomData }
    }

    fn ensure_mutable(&self) -> Result<(), AdminError> {
        if T::MUTABLE {
            Ok(())
        } else {
            Err(AdminError::ReadOnly(T::NAME))
        }
    }

    fn require_id(entity: &T) -> Result<i64, AdminError> {
        entity
            .id()
            .ok_or_else(|| AdminError::Validation(format!("{} has no id", T::NAME)))
    }

    fn item_path(id: i64) -> String {
        format!("{}/{}", T::RESOURCE, id)
    }

    /// Reading the body can still fail in transport; a body that arrives
    /// but does not parse is a JSON error.
    async fn decode<R: serde::de::DeserializeOwned>(resp: Response) -> Result<R, AdminError> {
        let body = resp
            .bytes()
            .await
            .map_err(|e| AdminError::Network(format!("Failed to read {} response: {}", T::NAME, e)))?;
        parse_body(&body)
    }

    async fn save(&self, method: Method, entity: &T) -> Result<T, AdminError> {
        self.ensure_mutable()?;
        let id = Self::require_id(entity)?;
        debug!(entity = T::NAME, id, method = %method, "REST request to save");
        let url = self.client.endpoint(&Self::item_path(id))?;
        let body = entity.clone().clean();
        let resp = self
            .client
            .send(self.client.request(method, url).json(&body))
            .await?;
        Self::decode(resp).await
    }
}

#[async_trait]
impl<T: Entity> EntityApi<T> for RestResource<T> {
    async fn list(&self, query: &QueryParams) -> Result<Page<T>, AdminError> {
        debug!(entity = T::NAME, ?query, "REST request to get a page");
        let mut url = self.client.endpoint(T::RESOURCE)?;
        url.set_query(Some(&query.to_query(Utc::now().timestamp_millis())));

        let resp = self.client.send(self.client.request(Method::GET, url)).await?;
        let total = total_count(resp.headers());
        let links = page_links(resp.headers());
        let items: Vec<T> = Self::decode(resp).await?;
        Ok(Page::new(items, total, links))
    }

    async fn get(&self, id: i64) -> Result<T, AdminError> {
        debug!(entity = T::NAME, id, "REST request to get");
        let url = self.client.endpoint(&Self::item_path(id))?;
        match self.client.send(self.client.request(Method::GET, url)).await {
            Ok(resp) => Self::decode(resp).await,
            Err(AdminError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(AdminError::NotFound { entity: T::NAME, id })
            }
            Err(e) => Err(e),
        }
    }

    async fn create(&self, entity: &T) -> Result<T, AdminError> {
        self.ensure_mutable()?;
        if entity.id().is_some() {
            return Err(AdminError::Validation(format!(
                "A new {} cannot already have an ID",
                T::NAME
            )));
        }
        debug!(entity = T::NAME, "REST request to create");
        let url = self.client.endpoint(T::RESOURCE)?;
        let body = entity.clone().clean();
        let resp = self
            .client
            .send(self.client.request(Method::POST, url).json(&body))
            .await?;
        Self::decode(resp).await
    }

    async fn update(&self, entity: &T) -> Result<T, AdminError> {
        self.save(Method::PUT, entity).await
    }

    async fn partial_update(&self, entity: &T) -> Result<T, AdminError> {
        self.save(Method::PATCH, entity).await
    }

    async fn delete(&self, id: i64) -> Result<(), AdminError> {
        self.ensure_mutable()?;
        debug!(entity = T::NAME, id, "REST request to delete");
        let url = self.client.endpoint(&Self::item_path(id))?;
        self.client.send(self.client.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

fn parse_body<R: serde::de::DeserializeOwned>(body: &[u8]) -> Result<R, AdminError> {
    Ok(serde_json::from_slice(body)?)
}
