use std::sync::Arc;

use arc_swap::{ArcSwap, ArcSwapOption};
use async_trait::async_trait;
use recordkit::{
    register_routes, DbModule, InMemoryStore, Module, ModuleCtx, OpenApiRegistry, RecordStore,
    RestfulModule, Service, ServiceConfig,
};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info, warn};

use crate::config::PatientsInfoConfig;
use crate::domain::PatientKind;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::SeaOrmPatientsRepository;

pub const MODULE_NAME: &str = "patients_info";

/// Patient records: service wiring, schema migrations and REST routes.
#[derive(Default)]
pub struct PatientsInfo {
    config: ArcSwap<PatientsInfoConfig>,
    service: ArcSwapOption<Service<PatientKind>>,
}

impl PatientsInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// The service built by `init`, if it ran.
    pub fn service(&self) -> Option<Arc<Service<PatientKind>>> {
        self.service.load_full()
    }
}

#[async_trait]
impl Module for PatientsInfo {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        info!("Initializing patients_info module");

        let cfg: PatientsInfoConfig = ctx.module_config();
        debug!(
            route_prefix = %cfg.route_prefix,
            check_email_on_update = cfg.check_email_on_update,
            "Loaded patients_info config"
        );

        let store: Arc<dyn RecordStore<PatientKind>> = match ctx.db() {
            Some(db) => Arc::new(SeaOrmPatientsRepository::new(db.clone())),
            None => {
                warn!("No database configured; patients are kept in memory");
                Arc::new(InMemoryStore::<PatientKind>::new())
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
impl DbModule for PatientsInfo {
    async fn migrate(&self, db: &sea_orm::DatabaseConnection) -> anyhow::Result<()> {
        info!("Running patients_info database migrations");
        Migrator::up(db, None).await?;
        info!("Patients database migrations completed successfully");
        Ok(())
    }
}

impl RestfulModule for PatientsInfo {
    fn register_rest(
        &self,
        _ctx: &ModuleCtx,
        router: axum::Router,
        openapi: &dyn OpenApiRegistry,
    ) -> anyhow::Result<axum::Router> {
        info!("Registering patients_info REST routes");

        let service = self
            .service()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?;
        let prefix = self.config.load().route_prefix.clone();

        let router = register_routes::<PatientKind>(router, openapi, service, &prefix)?;
        info!(%prefix, "Patients REST routes registered successfully");
        Ok(router)
    }
}
