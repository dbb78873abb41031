//! `mindmap fmt`: rewrite an outline in canonical form.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use crossterm::style::Stylize;

use mindmap::parser::outline;

pub fn run(file: &Path, check: bool) -> Result<()> {
    let content =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let Some(formatted) = canonical(&content) else {
        bail!(
            "{} has no outline lines (headers or `- ` items); file left unchanged",
            file.display()
        );
    };

    if formatted == content {
        println!("  {} {}", "Unchanged".green().bold(), file.display());
        return Ok(());
    }
    if check {
        bail!("{} is not in canonical form", file.display());
    }
    fs::write(file, &formatted).with_context(|| format!("failed to write {}", file.display()))?;
    println!("  {} {}", "Formatted".green().bold(), file.display());
    Ok(())
}

/// `serialize(parse(text))`, with the default outline for blank input.
/// `None` when non-blank text holds no outline lines.
fn canonical(content: &str) -> Option<String> {
    let (tree, _) = outline::parse_or_default(content);
    (!tree.is_empty()).then(|| outline::serialize(&tree))
}
