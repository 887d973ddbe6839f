use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HomeDirError {
    #[error("cannot determine the user's home directory")]
    NoHome,

    #[error("cannot determine the working directory: {0}")]
    Cwd(#[source] std::io::Error),

    #[error("failed to create home directory '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Platform base for the default home directory:
/// `%APPDATA%` on Windows, `$HOME` elsewhere.
fn platform_base() -> Option<PathBuf> {
    if cfg!(windows) {
        dirs::config_dir()
    } else {
        dirs::home_dir()
    }
}

/// Replace a leading `~` with `home`. Other paths are returned unchanged.
pub(crate) fn expand_tilde(raw: &str, home: &Path) -> PathBuf {
    if raw == "~" {
        home.to_path_buf()
    } else if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        home.join(rest)
    } else {
        PathBuf::from(raw)
    }
}

/// Resolve the server home directory to an absolute path.
///
/// `None` selects `<platform base>/<default_subdir>`. A configured value may
/// start with `~`; relative values are taken against the working directory.
/// With `create` the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf, HomeDirError> {
    let path = match configured {
        None => platform_base()
            .ok_or(HomeDirError::NoHome)?
            .join(default_subdir),
        Some(raw) if raw.starts_with('~') => {
            let home = dirs::home_dir().ok_or(HomeDirError::NoHome)?;
            expand_tilde(&raw, &home)
        }
        Some(raw) => PathBuf::from(raw),
    };

    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir().map_err(HomeDirError::Cwd)?.join(path)
    };

    if create {
        std::fs::create_dir_all(&path).map_err(|source| HomeDirError::Create {
            path: path.clone(),
            source,
        })?;
    }

    Ok(path)
}
