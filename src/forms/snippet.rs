use crate::client::QueryParams;
use crate::errors::AdminError;
use crate::models::{Classification, Snippet, SnippetMatchedRules};
use crate::store::AdminStore;
use super::lookup::{find_by_id, id_string};
use super::{base_entity, load, non_empty, require, submit, EntityForm};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetForm {
    pub content: String,
    pub url: String,
    pub classification: Classification,
    pub matched_rules: String,
}

impl EntityForm<Snippet> for SnippetForm {
    fn from_entity(entity: &Snippet) -> Self {
        Self {
            content: entity.content.clone().unwrap_or_default(),
            url: entity.url.clone().unwrap_or_default(),
            classification: entity.classification(),
            matched_rules: id_string(entity.matched_rules.as_ref()),
        }
    }

    fn validate(&self) -> Result<(), AdminError> {
        require(&self.content, "snippet", "content")
    }
}

impl SnippetForm {
    /// Merge over `base`; hash and scan count stay whatever `base` holds.
    pub fn apply(self, base: Snippet, matched_rules: &[SnippetMatchedRules]) -> Result<Snippet, AdminError> {
        Ok(Snippet {
            content: Some(self.content),
            url: non_empty(self.url),
            classification: Some(self.classification),
            matched_rules: find_by_id(matched_rules, &self.matched_rules)?,
            ..base
        })
    }
}

impl AdminStore {
    pub async fn open_snippet_editor(&self, id: Option<i64>) -> Result<SnippetForm, AdminError> {
        let all = QueryParams::default();
        let (snippet, _) = futures::try_join!(
            load(&self.snippet, id),
            self.snippet_matched_rules.get_entities(&all),
        )?;
        Ok(snippet.map(|s| SnippetForm::from_entity(&s)).unwrap_or_default())
    }

    pub async fn save_snippet(&self, form: SnippetForm, is_new: bool) -> Result<Snippet, AdminError> {
        form.validate()?;
        let base = base_entity(&self.snippet, is_new).await;
        let matched_rules = self.snippet_matched_rules.entities().await;
        let snippet = form.apply(base, &matched_rules)?;
        submit(&self.snippet, snippet, is_new).await
    }
}
