use async_trait::async_trait;
use axum::Router;

use crate::api::openapi::OpenApiRegistry;
use crate::context::ModuleCtx;

/// Core module: DI/wiring; do not rely on migrated schema here.
#[async_trait]
pub trait Module: Send + Sync + 'static {
    fn name(&self) -> &'static str;
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()>;
}

#[async_trait]
pub trait DbModule: Send + Sync {
    /// Runs AFTER init, BEFORE REST/start.
    async fn migrate(&self, db: &sea_orm::DatabaseConnection) -> anyhow::Result<()>;
}

/// Pure wiring; must be sync. Runs AFTER DB migrations.
pub trait RestfulModule: Send + Sync {
    fn register_rest(
        &self,
        ctx: &ModuleCtx,
        router: Router,
        openapi: &dyn OpenApiRegistry,
    ) -> anyhow::Result<Router>;
}

/// A module that takes part in every startup phase; the server drives a list of these.
pub trait RecordModule: Module + DbModule + RestfulModule {}

impl<T: Module + DbModule + RestfulModule> RecordModule for T {}
