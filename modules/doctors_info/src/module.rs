use std::sync::Arc;

use arc_swap::{ArcSwap, ArcSwapOption};
use async_trait::async_trait;
use recordkit::{
    register_routes, DbModule, InMemoryStore, Module, ModuleCtx, OpenApiRegistry, RecordStore,
    RestfulModule, Service, ServiceConfig,
};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info, warn};

use crate::config::DoctorsInfoConfig;
use crate::domain::DoctorKind;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::SeaOrmDoctorsRepository;

pub const MODULE_NAME: &str = "doctors_info";

/// Doctor records: service wiring, schema migrations and REST routes.
#[derive(Default)]
pub struct DoctorsInfo {
    // Read-mostly after init
    config: ArcSwap<DoctorsInfoConfig>,
    service: ArcSwapOption<Service<DoctorKind>>,
}

impl DoctorsInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// The service built by `init`, if it ran.
    pub fn service(&self) -> Option<Arc<Service<DoctorKind>>> {
        self.service.load_full()
    }
}

#[async_trait]
impl Module for DoctorsInfo {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        info!("Initializing doctors_info module");

        let cfg: DoctorsInfoConfig = ctx.module_config();
        debug!(
            route_prefix = %cfg.route_prefix,
            check_email_on_update = cfg.check_email_on_update,
            "Loaded doctors_info config"
        );

        let store: Arc<dyn RecordStore<DoctorKind>> = match ctx.db() {
            Some(db) => Arc::new(SeaOrmDoctorsRepository::new(db.clone())),
            None => {
                warn!("No database configured; doctors are kept in memory");
                Arc::new(InMemoryStore::<DoctorKind>::new())
            }
        };
        let service = Service::new(
            store,
            ServiceConfig {
                check_email_on_update: cfg.check_email_on_update,
            },
        );

        self.service.store(Some(Arc::new(service)));
        self.config.store(Arc::new(cfg));
        Ok(())
    }
}

#[async_trait]
impl DbModule for DoctorsInfo {
    async fn migrate(&self, db: &sea_orm::DatabaseConnection) -> anyhow::Result<()> {
        info!("Running doctors_info database migrations");
        Migrator::up(db, None).await?;
        info!("Doctors database migrations completed successfully");
        Ok(())
    }
}

impl RestfulModule for DoctorsInfo {
    fn register_rest(
        &self,
        _ctx: &ModuleCtx,
        router: axum::Router,
        openapi: &dyn OpenApiRegistry,
    ) -> anyhow::Result<axum::Router> {
        info!("Registering doctors_info REST routes");

        let service = self
            .service()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?;
        let prefix = self.config.load().route_prefix.clone();

        let router = register_routes::<DoctorKind>(router, openapi, service, &prefix)?;
        info!(%prefix, "Doctors REST routes registered successfully");
        Ok(router)
    }
}
