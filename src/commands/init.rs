//! `mindmap init`: start a new outline with the default structure.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use crossterm::style::Stylize;

use mindmap::parser::{config, outline};
use mindmap::paths;

/// Write the default outline to `file` and a default config beside it.
pub fn run(file: &Path) -> Result<()> {
    if file.exists() {
        bail!(
            "{} already exists. Use `mindmap fmt` or `mindmap edit` on it instead.",
            file.display()
        );
    }

    let dir = paths::outline_dir(file);
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    fs::write(file, outline::DEFAULT_OUTLINE)
        .with_context(|| format!("failed to write {}", file.display()))?;
    println!("  {} {}", "Created".green().bold(), file.display());

    // .mindmap.conf
    let config_path = paths::config_path(&dir);
    if !config_path.exists() {
        fs::write(&config_path, config::default_contents())
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        println!("  {} {}", "Created".green().bold(), config_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_outline_and_config() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("map.md");
        run(&file).unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), outline::DEFAULT_OUTLINE);
        let conf = fs::read_to_string(dir.path().join(paths::CONFIG_FILE)).unwrap();
        assert!(conf.contains("history_limit: 20"));
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("notes/ideas/map.md");
        run(&file).unwrap();
        assert!(file.is_file());
        assert!(dir.path().join("notes/ideas").join(paths::CONFIG_FILE).is_file());
    }

    #[test]
    fn does_not_overwrite_existing_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(paths::CONFIG_FILE), "history_limit: 3\n").unwrap();
        run(&dir.path().join("map.md")).unwrap();
        let conf = fs::read_to_string(dir.path().join(paths::CONFIG_FILE)).unwrap();
        assert_eq!(conf, "history_limit: 3\n");
    }

    #[test]
    fn error_if_outline_exists() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("map.md");
        fs::write(&file, "# Mine\n").unwrap();
        assert!(run(&file).is_err());
        assert_eq!(fs::read_to_string(&file).unwrap(), "# Mine\n");
    }
}
