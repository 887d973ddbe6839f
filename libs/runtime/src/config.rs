use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::paths::resolve_home_dir;

/// Home directory used when `server.home_dir` is empty.
pub const DEFAULT_HOME_SUBDIR: &str = ".dpms";

/// Environment prefix: `APP__SERVER__PORT=9000` maps to `server.port`.
pub const ENV_PREFIX: &str = "APP__";

/// Main application configuration: typed global sections plus a per-module
/// bag that each module deserializes on its own.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: Option<DatabaseConfig>,
    /// Uses [`default_logging_config`] when absent.
    pub logging: Option<LoggingConfig>,
    /// Directory of `<module>.yaml` files merged into `modules`.
    #[serde(default)]
    pub modules_dir: Option<String>,
    /// module name → raw config section
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Normalized to an absolute path on load. Empty selects `~/.dpms`.
    pub home_dir: String,
    pub host: String,
    pub port: u16,
    /// Per-request timeout in seconds; 0 keeps the HTTP host default (30s).
    #[serde(default)]
    pub timeout_sec: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            home_dir: String::new(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            timeout_sec: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// `sqlite://relative/or/absolute.db?mode=rwc`, `sqlite::memory:` or `postgres://...`
    pub url: String,
    pub max_conns: Option<u32>,
    /// SQLite `busy_timeout` set on every pooled connection. Ignored for Postgres.
    pub busy_timeout_ms: Option<u32>,
}

impl DatabaseConfig {
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_conns: Some(1),
            busy_timeout_ms: None,
        }
    }

    /// Connection URL with relative SQLite file paths placed under `home_dir`.
    /// The parent directory of the database file is created.
    pub fn resolved_url(&self, home_dir: &Path) -> Result<String> {
        let Some(rest) = self.url.strip_prefix("sqlite://") else {
            return Ok(self.url.clone());
        };
        let (file, query) = match rest.split_once('?') {
            Some((file, query)) => (file, Some(query)),
            None => (rest, None),
        };
        let file = Path::new(file);
        let abs: PathBuf = if file.is_absolute() {
            file.to_path_buf()
        } else {
            home_dir.join(file)
        };
        if let Some(parent) = abs.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory {parent:?}"))?;
        }
        let mut url = format!("sqlite://{}", abs.to_string_lossy().replace('\\', "/"));
        if let Some(query) = query {
            url.push('?');
            url.push_str(query);
        }
        Ok(url)
    }

    /// URL safe for logs: any password is masked.
    pub fn redacted_url(&self) -> String {
        match url::Url::parse(&self.url) {
            Ok(mut parsed) if parsed.password().is_some() => {
                // Only fails for cannot-be-a-base URLs, which carry no password.
                let _ = parsed.set_password(Some("***"));
                parsed.to_string()
            }
            _ => self.url.clone(),
        }
    }
}

/// Logging configuration: subsystem (crate name) → section.
/// The "default" key covers every target not named explicitly.
pub type LoggingConfig = HashMap<String, LogSection>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    /// "trace" | "debug" | "info" | "warn" | "error" | "off"
    pub console_level: String,
    /// Log file relative to the home directory; empty disables file output.
    #[serde(default)]
    pub file: String,
    #[serde(default = "default_file_level")]
    pub file_level: String,
    /// Rotated files kept next to the active one.
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

fn default_file_level() -> String {
    "debug".to_string()
}

pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_string(),
        LogSection {
            console_level: "info".to_string(),
            file: "logs/dpms.log".to_string(),
            file_level: "debug".to_string(),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    );
    logging
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: Some(DatabaseConfig {
                url: "sqlite://database/dpms.db?mode=rwc".to_string(),
                max_conns: Some(10),
                busy_timeout_ms: Some(5000),
            }),
            logging: Some(default_logging_config()),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

/// Command line arguments that can override the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub port: Option<u16>,
    pub print_config: bool,
    pub verbose: u8,
    /// Replace the configured database with in-memory SQLite.
    pub mock: bool,
}

impl AppConfig {
    /// Layered load: defaults → YAML file → `APP__` environment.
    /// `server.home_dir` is normalized and created.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        let path = config_path.as_ref();
        if !path.is_file() {
            anyhow::bail!("config file {path:?} does not exist");
        }

        // Optional sections stay None unless the file or environment sets them.
        let base = AppConfig {
            server: ServerConfig::default(),
            database: None,
            logging: None,
            modules_dir: None,
            modules: HashMap::new(),
        };

        let mut config: AppConfig = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {path:?}"))?;

        config.normalize_home_dir()?;

        if let Some(dir) = config.modules_dir.clone() {
            merge_module_files(&mut config.modules, dir)?;
        }

        Ok(config)
    }

    /// Load the file if one is given, otherwise use built-in defaults.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => {
                let mut c = Self::default();
                c.normalize_home_dir()?;
                Ok(c)
            }
        }
    }

    fn normalize_home_dir(&mut self) -> Result<()> {
        let configured = Some(self.server.home_dir.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let resolved = resolve_home_dir(configured, DEFAULT_HOME_SUBDIR, true)
            .context("Failed to resolve server.home_dir")?;
        self.server.home_dir = resolved.to_string_lossy().to_string();
        Ok(())
    }

    pub fn home_dir(&self) -> &Path {
        Path::new(&self.server.home_dir)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(port) = args.port {
            self.server.port = port;
        }

        if args.mock {
            self.database = Some(DatabaseConfig::in_memory());
        }

        if args.verbose > 0 {
            let level = if args.verbose == 1 { "debug" } else { "trace" };
            let logging = self.logging.get_or_insert_with(default_logging_config);
            if let Some(default_section) = logging.get_mut("default") {
                default_section.console_level = level.to_string();
            }
        }
    }
}

fn merge_module_files(
    bag: &mut HashMap<String, serde_json::Value>,
    dir: impl AsRef<Path>,
) -> Result<()> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_yaml = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if !path.is_file() || !is_yaml {
            continue;
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read module config {path:?}"))?;
        let value: serde_yaml::Value = serde_yaml::from_str(&raw)
            .with_context(|| format!("Invalid YAML in module config {path:?}"))?;
        // File sections win over inline ones.
        bag.insert(name.to_string(), serde_json::to_value(value)?);
    }
    Ok(())
}
