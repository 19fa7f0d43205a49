use crate::errors::AdminError;
use crate::models::Engine;
use crate::store::AdminStore;
use super::{base_entity, load, require, submit, EntityForm};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineForm {
    pub name: String,
}

impl EntityForm<Engine> for EngineForm {
    fn from_entity(entity: &Engine) -> Self {
        Self { name: entity.name.clone().unwrap_or_default() }
    }

    fn validate(&self) -> Result<(), AdminError> {
        require(&self.name, "engine", "name")
    }
}

impl EngineForm {
    pub fn apply(self, base: Engine) -> Engine {
        Engine { name: Some(self.name), ..base }
    }
}

impl AdminStore {
    pub async fn open_engine_editor(&self, id: Option<i64>) -> Result<EngineForm, AdminError> {
        let engine = load(&self.engine, id).await?;
        Ok(engine.map(|e| EngineForm::from_entity(&e)).unwrap_or_default())
    }

    pub async fn save_engine(&self, form: EngineForm, is_new: bool) -> Result<Engine, AdminError> {
        form.validate()?;
        let base = base_entity(&self.engine, is_new).await;
        submit(&self.engine, form.apply(base), is_new).await
    }
}
