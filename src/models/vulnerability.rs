use serde::{Deserialize, Serialize};
use super::entity::Entity;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerability {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl Entity for Vulnerability {
    const NAME: &'static str = "vulnerability";
    const RESOURCE: &'static str = "vulnerabilities";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn reference(id: i64) -> Self {
        Self { id: Some(id) }
    }
}
