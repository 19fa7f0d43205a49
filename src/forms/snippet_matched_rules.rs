use crate::client::QueryParams;
use crate::errors::AdminError;
use crate::models::{Rule, Snippet, SnippetMatchedRules};
use crate::store::AdminStore;
use super::lookup::{id_strings, map_id_list};
use super::{load, EntityForm};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetMatchedRulesForm {
    pub rules: Vec<String>,
    pub snippets: Vec<String>,
}

impl EntityForm<SnippetMatchedRules> for SnippetMatchedRulesForm {
    fn from_entity(entity: &SnippetMatchedRules) -> Self {
        Self {
            rules: id_strings(entity.rules.as_ref()),
            snippets: id_strings(entity.snippets.as_ref()),
        }
    }

    fn validate(&self) -> Result<(), AdminError> {
        Ok(())
    }
}

impl SnippetMatchedRulesForm {
    pub fn apply(self, base: SnippetMatchedRules) -> Result<SnippetMatchedRules, AdminError> {
        Ok(SnippetMatchedRules {
            rules: Some(map_id_list::<Rule>(&self.rules)?),
            snippets: Some(map_id_list::<Snippet>(&self.snippets)?),
            ..base
        })
    }
}

impl AdminStore {
    pub async fn open_snippet_matched_rules_editor(
        &self,
        id: Option<i64>,
    ) -> Result<SnippetMatchedRulesForm, AdminError> {
        let all = QueryParams::default();
        let (record, _, _) = futures::try_join!(
            load(&self.snippet_matched_rules, id),
            self.rule.get_entities(&all),
            self.snippet.get_entities(&all),
        )?;
        Ok(record.map(|r| SnippetMatchedRulesForm::from_entity(&r)).unwrap_or_default())
    }
}
