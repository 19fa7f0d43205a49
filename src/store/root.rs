use std::sync::Arc;
use crate::client::{ApiClient, EntityApi, RestResource};
use crate::models::{Engine, Entity, Rule, Snippet, SnippetMatchedRules, Vulnerability};
use super::slice::EntitySlice;

/// The root store: one slice per record type over a shared client.
#[derive(Clone)]
pub struct AdminStore {
    pub engine: EntitySlice<Engine>,
    pub vulnerability: EntitySlice<Vulnerability>,
    pub rule: EntitySlice<Rule>,
    pub snippet: EntitySlice<Snippet>,
    pub snippet_matched_rules: EntitySlice<SnippetMatchedRules>,
}

impl AdminStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            engine: rest_slice(&client),
            vulnerability: rest_slice(&client),
            rule: rest_slice(&client),
            snippet: rest_slice(&client),
            snippet_matched_rules: rest_slice(&client),
        }
    }

    /// Build a store over arbitrary backends.
    pub fn with_apis(
        engine: Arc<dyn EntityApi<Engine>>,
        vulnerability: Arc<dyn EntityApi<Vulnerability>>,
        rule: Arc<dyn EntityApi<Rule>>,
        snippet: Arc<dyn EntityApi<Snippet>>,
        snippet_matched_rules: Arc<dyn EntityApi<SnippetMatchedRules>>,
    ) -> Self {
        Self {
            engine: EntitySlice::new(engine),
            vulnerability: EntitySlice::new(vulnerability),
            rule: EntitySlice::new(rule),
            snippet: EntitySlice::new(snippet),
            snippet_matched_rules: EntitySlice::new(snippet_matched_rules),
        }
    }

    /// Reset every slice to its initial state.
    pub async fn reset_all(&self) {
        self.engine.reset().await;
        self.vulnerability.reset().await;
        self.rule.reset().await;
        self.snippet.reset().await;
        self.snippet_matched_rules.reset().await;
    }
}

fn rest_slice<T: Entity>(client: &ApiClient) -> EntitySlice<T> {
    EntitySlice::new(Arc::new(RestResource::<T>::new(client.clone())))
}
