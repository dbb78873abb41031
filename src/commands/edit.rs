//! `mindmap edit`: apply a line-based edit script to an outline.
//!
//! One command per line, blank lines and `#` comments ignored:
//!
//! ```text
//! select Central Topic/Branch 1
//! add First idea
//! rename Better idea
//! move "Central Topic/Branch 3" "Central Topic/Branch 1"
//! color green
//! collapse
//! delete
//! undo
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use crossterm::style::Stylize;
use tracing::debug;

use mindmap::edit::{EditError, Session};
use mindmap::parser::config::Config;
use mindmap::tree::{Color, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Select(String),
    Add(Option<String>),
    Rename(String),
    Delete,
    Move { node: String, target: String },
    Color(Color),
    Collapse,
    Undo,
}

pub fn run(file: &Path, script: Option<&Path>, config: &Config) -> Result<()> {
    let source = match script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read script from stdin")?;
            buf
        }
    };
    let steps = parse_script(&source)?;

    let tree = super::load_outline(file)?;
    let mut session = Session::new(tree, config);
    apply(&mut session, &steps)?;

    if !session.is_dirty() {
        println!("  {} {}", "Unchanged".green().bold(), file.display());
        return Ok(());
    }
    super::save_outline(file, session.tree())?;
    session.mark_saved(session.revision());
    println!(
        "  {} {} ({} steps)",
        "Saved".green().bold(),
        file.display(),
        steps.len()
    );
    Ok(())
}

fn parse_script(source: &str) -> Result<Vec<(usize, Step)>> {
    let mut steps = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let line_num = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };
        let step = parse_step(command, rest).with_context(|| format!("script line {}", line_num))?;
        steps.push((line_num, step));
    }
    Ok(steps)
}

fn parse_step(command: &str, rest: &str) -> Result<Step> {
    let step = match command {
        "select" => Step::Select(single_arg(command, rest)?),
        "add" => Step::Add((!rest.is_empty()).then(|| rest.to_string())),
        "rename" => {
            if rest.is_empty() {
                bail!("`rename` needs the new text");
            }
            Step::Rename(rest.to_string())
        }
        "delete" => no_args(command, rest, Step::Delete)?,
        "move" => {
            let args = split_args(rest)?;
            let [node, target]: [String; 2] = args
                .try_into()
                .map_err(|_| anyhow!("`move` takes a node path and a target path"))?;
            Step::Move { node, target }
        }
        "color" => Step::Color(rest.parse::<Color>()?),
        "collapse" => no_args(command, rest, Step::Collapse)?,
        "undo" => no_args(command, rest, Step::Undo)?,
        other => bail!("unknown command {:?}", other),
    };
    Ok(step)
}

fn no_args(command: &str, rest: &str, step: Step) -> Result<Step> {
    if !rest.is_empty() {
        bail!("`{}` takes no arguments", command);
    }
    Ok(step)
}

/// The whole remainder as one path, surrounding quotes optional.
fn single_arg(command: &str, rest: &str) -> Result<String> {
    let arg = rest.trim_matches('"').trim();
    if arg.is_empty() {
        bail!("`{}` needs a node path", command);
    }
    Ok(arg.to_string())
}

/// Whitespace-separated words; double quotes group words with spaces.
fn split_args(rest: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut started = false;
    for c in rest.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                started = true;
            }
            c if c.is_whitespace() && !quoted => {
                if started {
                    args.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }
    if quoted {
        bail!("unterminated quote");
    }
    if started {
        args.push(current);
    }
    Ok(args)
}

fn apply(session: &mut Session, steps: &[(usize, Step)]) -> Result<()> {
    for (line_num, step) in steps {
        debug!(line = line_num, ?step, "applying script step");
        apply_step(session, step).with_context(|| format!("script line {}", line_num))?;
    }
    Ok(())
}

fn apply_step(session: &mut Session, step: &Step) -> Result<()> {
    match step {
        Step::Select(path) => {
            let id = resolve(session, path)?;
            session.select(id)?;
        }
        Step::Add(text) => {
            session.add_child()?;
            if let Some(text) = text {
                set_text(session, text)?;
            }
        }
        Step::Rename(text) => set_text(session, text)?,
        Step::Delete => {
            session.delete_selected()?;
        }
        Step::Move { node, target } => {
            let node = resolve(session, node)?;
            let target = resolve(session, target)?;
            session.move_node(node, target)?;
        }
        Step::Color(color) => session.recolor(*color)?,
        Step::Collapse => {
            session.toggle_collapse()?;
        }
        Step::Undo => session.undo()?,
    }
    Ok(())
}

fn set_text(session: &mut Session, text: &str) -> Result<(), EditError> {
    session.begin_edit()?;
    session.update_edit(text)?;
    session.commit_edit()?;
    Ok(())
}

fn resolve(session: &Session, path: &str) -> Result<NodeId> {
    session
        .tree()
        .find_path(path)
        .ok_or_else(|| anyhow!("no node at path {:?}", path))
}
