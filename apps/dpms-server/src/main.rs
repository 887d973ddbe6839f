use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use axum::Router;
use clap::{Parser, Subcommand};
use doctors_info::DoctorsInfo;
use mimalloc::MiMalloc;
use patients_info::PatientsInfo;
use recordkit::{
    ConfigProvider, DbModule, Module, ModuleCtx, ModuleCtxBuilder, RecordModule, RestfulModule,
};
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tokio_util::sync::CancellationToken;
use url::Url;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Serves the `modules` section of the app config to each module.
struct ModulesConfig(HashMap<String, serde_json::Value>);

impl ConfigProvider for ModulesConfig {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.0.get(module_name)
    }
}

/// DPMS Server - doctor and patient record service
#[derive(Parser)]
#[command(name = "dpms-server")]
#[command(about = "DPMS Server - doctor and patient record service")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // home_dir is normalized and created while loading
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::init_logging_from_config(&logging_config, config.home_dir());
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "DPMS server starting");

    if args.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

/// Detect DB backend from URL scheme.
fn detect_backend(url: &str) -> Result<&'static str> {
    let raw = url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    let parsed = Url::parse(raw).map_err(|e| anyhow!("Invalid database URL '{raw}': {e}"))?;
    match parsed.scheme() {
        "sqlite" => Ok("sqlite"),
        "postgres" | "postgresql" => Ok("postgres"),
        other => Err(anyhow!("Unsupported database type: {other}")),
    }
}

async fn connect_db(cfg: &DatabaseConfig, home_dir: &Path) -> Result<DatabaseConnection> {
    let url = cfg.resolved_url(home_dir)?;
    let backend = detect_backend(&url)?;

    let mut opts = ConnectOptions::new(url);
    if let Some(max) = cfg.max_conns {
        opts.max_connections(max);
    }
    if let Some(ms) = cfg.busy_timeout_ms.filter(|_| backend == "sqlite") {
        let busy = Duration::from_millis(u64::from(ms));
        opts.map_sqlx_sqlite_opts(move |sqlite| sqlite.busy_timeout(busy));
    }

    tracing::info!(url = %cfg.redacted_url(), backend, "Connecting to database");
    let db = Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to {}", cfg.redacted_url()))?;
    tracing::info!(backend = ?db.get_database_backend(), "Connected to database");
    Ok(db)
}

fn record_modules() -> Vec<Arc<dyn RecordModule>> {
    vec![Arc::new(DoctorsInfo::new()), Arc::new(PatientsInfo::new())]
}

async fn run_server(config: AppConfig) -> Result<()> {
    let cancel = CancellationToken::new();

    let mut builder = ModuleCtxBuilder::new()
        .with_config_provider(Arc::new(ModulesConfig(config.modules.clone())));
    let db = match &config.database {
        Some(db_cfg) => {
            let conn = connect_db(db_cfg, config.home_dir()).await?;
            builder = builder.with_db(conn.clone());
            Some(conn)
        }
        None => {
            tracing::warn!("No database configuration found, records are kept in memory");
            None
        }
    };
    let ctx: ModuleCtx = builder.build();

    let mut ingress = ApiIngress::new(ApiIngressConfig {
        bind_addr: format!("{}:{}", config.server.host, config.server.port),
        ..Default::default()
    });
    if config.server.timeout_sec > 0 {
        ingress = ingress.with_request_timeout(Duration::from_secs(config.server.timeout_sec));
    }
    let ingress = Arc::new(ingress);
    ingress
        .init(&ctx.for_module(api_ingress::MODULE_NAME))
        .await?;

    let modules = record_modules();

    tracing::info!("Initializing modules...");
    for module in &modules {
        module
            .init(&ctx.for_module(module.name()))
            .await
            .with_context(|| format!("init failed for module '{}'", module.name()))?;
    }

    if let Some(db) = &db {
        for module in &modules {
            module
                .migrate(db)
                .await
                .with_context(|| format!("DB migration failed for module '{}'", module.name()))?;
        }
    }

    let mut router = ingress.rest_prepare(Router::new())?;
    for module in &modules {
        router = module
            .register_rest(&ctx.for_module(module.name()), router, ingress.as_ref())
            .with_context(|| format!("REST wiring failed for module '{}'", module.name()))?;
    }
    ingress.rest_finalize(router)?;

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = runtime::wait_for_shutdown().await {
            tracing::error!(error = %e, "Signal handler failed");
        }
        shutdown.cancel();
    });

    ingress.serve(cancel).await
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    if let Some(db) = &config.database {
        detect_backend(&db.url)?;
    }

    let section = |name: &str| config.modules.get(name).cloned();
    if let Some(v) = section(api_ingress::MODULE_NAME) {
        serde_json::from_value::<ApiIngressConfig>(v)
            .context("invalid modules.api_ingress config")?;
    }
    if let Some(v) = section(doctors_info::MODULE_NAME) {
        serde_json::from_value::<doctors_info::config::DoctorsInfoConfig>(v)
            .context("invalid modules.doctors_info config")?;
    }
    if let Some(v) = section(patients_info::MODULE_NAME) {
        serde_json::from_value::<patients_info::config::PatientsInfoConfig>(v)
            .context("invalid modules.patients_info config")?;
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_detection() {
        assert_eq!(detect_backend("sqlite::memory:").unwrap(), "sqlite");
        assert_eq!(
            detect_backend("sqlite:///tmp/dpms.db?mode=rwc").unwrap(),
            "sqlite"
        );
        assert_eq!(
            detect_backend("postgres://u:p@localhost/dpms").unwrap(),
            "postgres"
        );
        assert!(detect_backend("mysql://localhost/dpms").is_err());
        assert!(detect_backend("  ").is_err());
    }

    #[test]
    fn check_rejects_bad_module_section() {
        let mut config = AppConfig::default();
        config.modules.insert(
            doctors_info::MODULE_NAME.to_string(),
            serde_json::json!({ "route_prefx": "/x" }),
        );
        let err = check_config(&config).unwrap_err();
        assert!(err.to_string().contains("doctors_info"));
    }

    #[tokio::test]
    async fn sqlite_busy_timeout_is_applied_to_connections() {
        let home = tempfile::tempdir().unwrap();
        let cfg = DatabaseConfig {
            busy_timeout_ms: Some(1234),
            ..DatabaseConfig::in_memory()
        };
        let db = connect_db(&cfg, home.path()).await.unwrap();

        let row = db
            .query_one(sea_orm::Statement::from_string(
                sea_orm::DatabaseBackend::Sqlite,
                "PRAGMA busy_timeout",
            ))
            .await
            .unwrap()
            .expect("pragma row");
        let busy: i64 = row.try_get_by_index(0).unwrap();
        assert_eq!(busy, 1234);
    }

    #[tokio::test]
    async fn in_memory_database_connects() {
        let home = tempfile::tempdir().unwrap();
        let db = connect_db(&DatabaseConfig::in_memory(), home.path())
            .await
            .unwrap();
        assert_eq!(
            db.get_database_backend(),
            sea_orm::DatabaseBackend::Sqlite
        );
    }
}
