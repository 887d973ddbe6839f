//! Subscriber setup driven by the `logging` config section.
//!
//! Every section contributes up to two layers: human-readable console output
//! and JSON lines in a size-rotated file. A named section ("api_ingress",
//! "doctors_info", ...) only sees events whose target belongs to that crate;
//! the "default" section sees everything no named section claims.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use file_rotate::{
    compression::Compression,
    suffix::AppendCount,
    ContentLimit, FileRotate,
};
use parking_lot::Mutex;
use tracing::{Level, Metadata};
use tracing_subscriber::{
    filter::FilterFn, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry,
};

use crate::config::{LogSection, LoggingConfig};

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// `None` means the output is switched off. Unknown names fall back to INFO.
fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" | "" => None,
        _ => Some(Level::INFO),
    }
}

/// `target` is `crate_name` itself or one of its modules.
fn target_in_crate(target: &str, crate_name: &str) -> bool {
    target
        .strip_prefix(crate_name)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// Which events a section receives.
#[derive(Clone)]
enum Scope {
    Crate(String),
    /// Everything except the listed crates.
    Rest(Arc<Vec<String>>),
}

impl Scope {
    fn accepts(&self, meta: &Metadata<'_>) -> bool {
        match self {
            Scope::Crate(name) => target_in_crate(meta.target(), name),
            Scope::Rest(claimed) => !claimed.iter().any(|c| target_in_crate(meta.target(), c)),
        }
    }

    fn filter(&self, max: Level) -> FilterFn<impl Fn(&Metadata<'_>) -> bool> {
        let scope = self.clone();
        FilterFn::new(move |meta| *meta.level() <= max && scope.accepts(meta))
    }
}

#[derive(Clone)]
struct RotatingFile(Arc<Mutex<FileRotate<AppendCount>>>);

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().flush()
    }
}

impl<'a> fmt::MakeWriter<'a> for RotatingFile {
    type Writer = RotatingFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Relative log paths live under the home directory.
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_rotating_file(section: &LogSection, base_dir: &Path) -> std::io::Result<RotatingFile> {
    let path = resolve_log_path(&section.file, base_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let backups = section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS);

    let rotate = FileRotate::new(
        path,
        AppendCount::new(backups),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(RotatingFile(Arc::new(Mutex::new(rotate))))
}

fn section_layers(
    name: &str,
    section: &LogSection,
    scope: Scope,
    base_dir: &Path,
) -> Vec<BoxedLayer> {
    let mut layers = Vec::new();
    let ansi = atty::is(atty::Stream::Stdout);

    if let Some(level) = parse_level(&section.console_level) {
        layers.push(
            fmt::layer()
                .with_ansi(ansi)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_filter(scope.filter(level))
                .boxed(),
        );
    }

    if section.file.trim().is_empty() {
        return layers;
    }
    let Some(level) = parse_level(&section.file_level) else {
        return layers;
    };
    match open_rotating_file(section, base_dir) {
        Ok(writer) => layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(writer)
                .with_filter(scope.filter(level))
                .boxed(),
        ),
        // No subscriber is installed yet, so stderr is the only channel.
        Err(e) => eprintln!(
            "logging: cannot open file '{}' for section '{name}': {e}",
            section.file
        ),
    }
    layers
}

fn build_layers(cfg: &LoggingConfig, base_dir: &Path) -> Vec<BoxedLayer> {
    let mut named: Vec<(&String, &LogSection)> = cfg
        .iter()
        .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
        .collect();
    named.sort_by(|a, b| a.0.cmp(b.0));

    let claimed = Arc::new(named.iter().map(|(n, _)| (*n).clone()).collect::<Vec<_>>());

    let mut layers = Vec::new();
    for (name, section) in named {
        layers.extend(section_layers(
            name,
            section,
            Scope::Crate(name.clone()),
            base_dir,
        ));
    }
    if let Some(section) = cfg.get(DEFAULT_SECTION) {
        layers.extend(section_layers(
            DEFAULT_SECTION,
            section,
            Scope::Rest(claimed),
            base_dir,
        ));
    }
    layers
}

/// Install the global subscriber. `base_dir` (normally `server.home_dir`)
/// anchors relative log file paths. Calling it twice keeps the first subscriber.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` records before the subscriber goes in.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = tracing_subscriber::fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let _ = Registry::default().with(build_layers(cfg, base_dir)).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_logging_config;
    use tempfile::tempdir;

    fn section(console: &str, file: &str) -> LogSection {
        LogSection {
            console_level: console.into(),
            file: file.into(),
            file_level: "debug".into(),
            max_backups: Some(2),
            max_size_mb: Some(1),
        }
    }

    #[test]
    fn level_parsing() {
        assert_eq!(parse_level("trace"), Some(Level::TRACE));
        assert_eq!(parse_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_level(" Warn "), Some(Level::WARN));
        assert_eq!(parse_level("off"), None);
        assert_eq!(parse_level(""), None);
        assert_eq!(parse_level("loud"), Some(Level::INFO));
    }

    #[test]
    fn crate_prefix_matching() {
        assert!(target_in_crate("doctors_info", "doctors_info"));
        assert!(target_in_crate("doctors_info::api::rest", "doctors_info"));
        assert!(!target_in_crate("doctors_info_extra", "doctors_info"));
        assert!(!target_in_crate("recordkit", "doctors_info"));
    }

    #[test]
    fn relative_log_paths_are_under_home() {
        let tmp = tempdir().unwrap();
        let resolved = resolve_log_path("logs/dpms.log", tmp.path());
        assert!(resolved.starts_with(tmp.path()));

        let abs = tmp.path().join("elsewhere.log");
        assert_eq!(resolve_log_path(&abs.to_string_lossy(), Path::new("/x")), abs);
    }

    #[test]
    fn rotating_file_creates_parent_and_writes() {
        let tmp = tempdir().unwrap();
        let sec = section("off", "nested/dir/app.log");

        let mut writer = open_rotating_file(&sec, tmp.path()).unwrap();
        writer.write_all(b"{\"msg\":\"hello\"}\n").unwrap();
        writer.flush().unwrap();

        let written = std::fs::read_to_string(tmp.path().join("nested/dir/app.log")).unwrap();
        assert!(written.contains("hello"));
    }

    #[test]
    fn layer_count_follows_sections() {
        let tmp = tempdir().unwrap();

        // default: console + file
        assert_eq!(build_layers(&default_logging_config(), tmp.path()).len(), 2);

        let mut cfg = LoggingConfig::new();
        cfg.insert("default".into(), section("info", ""));
        cfg.insert("api_ingress".into(), section("debug", "logs/api.log"));
        cfg.insert("patients_info".into(), section("off", ""));
        assert_eq!(build_layers(&cfg, tmp.path()).len(), 3);
    }
}
