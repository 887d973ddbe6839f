use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Source of the `modules.<name>` sections of the server config.
pub trait ConfigProvider: Send + Sync {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;
}

/// What a record module sees while it is wired: the shared database
/// connection and its own config section.
#[derive(Clone, Default)]
pub struct ModuleCtx {
    db: Option<sea_orm::DatabaseConnection>,
    config_provider: Option<Arc<dyn ConfigProvider>>,
    module_name: Option<Arc<str>>,
}

#[derive(Default)]
pub struct ModuleCtxBuilder {
    inner: ModuleCtx,
}

impl ModuleCtxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_db(mut self, db: sea_orm::DatabaseConnection) -> Self {
        self.inner.db = Some(db);
        self
    }

    pub fn with_config_provider(mut self, p: Arc<dyn ConfigProvider>) -> Self {
        self.inner.config_provider = Some(p);
        self
    }

    pub fn build(self) -> ModuleCtx {
        self.inner
    }
}

impl ModuleCtx {
    /// Scope a copy of the context to one module's config section.
    pub fn for_module(&self, name: &str) -> Self {
        let mut scoped = self.clone();
        scoped.module_name = Some(Arc::<str>::from(name));
        scoped
    }

    pub fn db(&self) -> Option<&sea_orm::DatabaseConnection> {
        self.db.as_ref()
    }

    pub fn current_module(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    /// The module's section as `T`. A missing section, or one that does not
    /// deserialize, yields `T::default()` (the latter with a warning).
    pub fn module_config<T: DeserializeOwned + Default>(&self) -> T {
        match (&self.module_name, &self.config_provider) {
            (Some(name), Some(p)) => p
                .get_module_config(name)
                .and_then(|v| match serde_json::from_value::<T>(v.clone()) {
                    Ok(cfg) => Some(cfg),
                    Err(e) => {
                        tracing::warn!(module = %name, error = %e, "Invalid module config, using defaults");
                        None
                    }
                })
                .unwrap_or_default(),
            _ => T::default(),
        }
    }
}
