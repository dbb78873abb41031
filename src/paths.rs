//! Locating `.mindmap.conf` relative to an outline file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::parser::config::{self, Config};

pub const CONFIG_FILE: &str = ".mindmap.conf";

/// Walk upward from `start` to the first directory holding a config file.
pub fn find_config_from(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = config_path(current);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = current.parent();
    }
    None
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

/// Directory an outline file lives in, `.` for bare file names.
pub fn outline_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Load settings for `outline`: the explicit path if given, else the
/// nearest config above the outline, else defaults.
pub fn load_config(explicit: Option<&Path>, outline: &Path) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match find_config_from(&outline_dir(outline)) {
            Some(path) => path,
            None => {
                debug!("no {CONFIG_FILE} found, using defaults");
                return Ok(Config::default());
            }
        },
    };
    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let cfg = config::parse(&content).with_context(|| format!("in {}", path.display()))?;
    debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}
