use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// A scanning engine that rules are written for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Entity for Engine {
    const NAME: &'static str = "engine";
    const RESOURCE: &'static str = "engines";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn reference(id: i64) -> Self {
        Self { id: Some(id), ..Default::default() }
    }
}
