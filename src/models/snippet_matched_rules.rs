use serde::{Deserialize, Serialize};
use super::entity::{clean_refs, Entity};
use super::rule::Rule;
use super::snippet::Snippet;

/// Association between snippets and the rules that matched them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnippetMatchedRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<Rule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippets: Option<Vec<Snippet>>,
}

impl Entity for SnippetMatchedRules {
    const NAME: &'static str = "snippetMatchedRules";
    const RESOURCE: &'static str = "snippet-matched-rules";
    const MUTABLE: bool = false;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn reference(id: i64) -> Self {
        Self { id: Some(id), ..Default::default() }
    }

    fn clean(self) -> Self {
        Self {
            rules: clean_refs(self.rules),
            snippets: clean_refs(self.snippets),
            ..self
        }
    }
}

impl SnippetMatchedRules {
    /// Names of the matched rules, in the order the service returned them.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules
            .iter()
            .flatten()
            .filter_map(|r| r.name.as_deref())
            .collect()
    }
}
