use crate::client::QueryParams;
use crate::errors::AdminError;
use crate::models::{Engine, Rule, Vulnerability};
use crate::store::AdminStore;
use super::lookup::{find_by_id, id_string, id_strings, map_id_list};
use super::{base_entity, load, non_empty, require, submit, EntityForm};

/// Rule editor values; references are held as id strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleForm {
    pub name: String,
    pub raw: String,
    pub engine: String,
    pub vulnerability: String,
    pub snippet_matched_rules: Vec<String>,
}

impl EntityForm<Rule> for RuleForm {
    fn from_entity(entity: &Rule) -> Self {
        Self {
            name: entity.name.clone().unwrap_or_default(),
            raw: entity.raw.clone().unwrap_or_default(),
            engine: id_string(entity.engine.as_ref()),
            vulnerability: id_string(entity.vulnerability.as_ref()),
            snippet_matched_rules: id_strings(entity.snippet_matched_rules.as_ref()),
        }
    }

    fn validate(&self) -> Result<(), AdminError> {
        require(&self.name, "rule", "name")
    }
}

impl RuleForm {
    /// Merge over `base`, resolving the engine and vulnerability selections
    /// against the fetched lists.
    pub fn apply(
        self,
        base: Rule,
        engines: &[Engine],
        vulnerabilities: &[Vulnerability],
    ) -> Result<Rule, AdminError> {
        Ok(Rule {
            name: Some(self.name),
            raw: non_empty(self.raw),
            engine: find_by_id(engines, &self.engine)?,
            vulnerability: find_by_id(vulnerabilities, &self.vulnerability)?,
            snippet_matched_rules: Some(map_id_list(&self.snippet_matched_rules)?),
            ..base
        })
    }
}

impl AdminStore {
    /// Load the rule (or reset for a new one) together with the engine,
    /// vulnerability and matched-rules lists.
    pub async fn open_rule_editor(&self, id: Option<i64>) -> Result<RuleForm, AdminError> {
        let all = QueryParams::default();
        let (rule, _, _, _) = futures::try_join!(
            load(&self.rule, id),
            self.engine.get_entities(&all),
            self.vulnerability.get_entities(&all),
            self.snippet_matched_rules.get_entities(&all),
        )?;
        Ok(rule.map(|r| RuleForm::from_entity(&r)).unwrap_or_default())
    }

    pub async fn save_rule(&self, form: RuleForm, is_new: bool) -> Result<Rule, AdminError> {
        form.validate()?;
        let base = base_entity(&self.rule, is_new).await;
        let engines = self.engine.entities().await;
        let vulnerabilities = self.vulnerability.entities().await;
        let rule = form.apply(base, &engines, &vulnerabilities)?;
        submit(&self.rule, rule, is_new).await
    }
}
