pub mod edit;
pub mod fmt;
pub mod init;
pub mod layout;
pub mod links;
pub mod show;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use crossterm::style::Stylize;
use tracing::info;

use mindmap::parser::outline;
use mindmap::tree::Tree;

/// Read and parse an outline. An empty file is given the default
/// structure, which is written back immediately. A file with text but no
/// outline lines is rejected and left untouched.
pub fn load_outline(path: &Path) -> Result<Tree> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let (tree, synthesized) = outline::parse_or_default(&content);
    if tree.is_empty() {
        bail!(
            "{} has no outline lines (headers or `- ` items); file left unchanged",
            path.display()
        );
    }
    if synthesized {
        save_outline(path, &tree)?;
        info!(path = %path.display(), "wrote default outline into empty file");
        println!(
            "  {} {} was empty, wrote the default outline",
            "Note".yellow().bold(),
            path.display()
        );
    }
    Ok(tree)
}

pub fn save_outline(path: &Path, tree: &Tree) -> Result<()> {
    fs::write(path, outline::serialize(tree))
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), nodes = tree.len(), "saved outline");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_file_gets_default_outline_written_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("map.md");
        fs::write(&path, "\n\n").unwrap();

        let tree = load_outline(&path).unwrap();
        assert_eq!(tree.len(), 4);
        assert_eq!(fs::read_to_string(&path).unwrap(), outline::DEFAULT_OUTLINE);
    }

    #[test]
    fn non_empty_file_is_left_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("map.md");
        fs::write(&path, "# Only\nloose text\n").unwrap();

        let tree = load_outline(&path).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Only\nloose text\n");
    }

    #[test]
    fn prose_only_file_is_rejected_and_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.md");
        let prose = "Meeting notes\nAlice said hello\n* star bullet\n";
        fs::write(&path, prose).unwrap();

        let err = load_outline(&path).unwrap_err();
        assert!(err.to_string().contains("no outline lines"));
        assert_eq!(fs::read_to_string(&path).unwrap(), prose);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_outline(&dir.path().join("nope.md")).is_err());
    }
}
