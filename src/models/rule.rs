use serde::{Deserialize, Serialize};
use super::engine::Engine;
use super::entity::{clean_ref, clean_refs, Entity};
use super::snippet_matched_rules::SnippetMatchedRules;
use super::vulnerability::Vulnerability;

/// A detection rule executed by an engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Rule source as understood by its engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<Engine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vulnerability: Option<Vulnerability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet_matched_rules: Option<Vec<SnippetMatchedRules>>,
}

impl Entity for Rule {
    const NAME: &'static str = "rule";
    const RESOURCE: &'static str = "rules";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn reference(id: i64) -> Self {
        Self { id: Some(id), ..Default::default() }
    }

    fn clean(self) -> Self {
        Self {
            engine: clean_ref(self.engine),
            vulnerability: clean_ref(self.vulnerability),
            snippet_matched_rules: clean_refs(self.snippet_matched_rules),
            ..self
        }
    }
}
