//! `.mindmap.conf`: line-based `key: value` settings with `#` comments.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::warn;

use crate::layout::LayoutParams;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub center_x: f64,
    pub center_y: f64,
    pub branch_offset: f64,
    pub level_spacing: f64,
    pub level_spacing_step: f64,
    pub level_spacing_min: f64,
    pub slot_height: f64,
    pub slot_height_step: f64,
    pub slot_height_min: f64,
    /// Maximum number of undo snapshots kept.
    pub history_limit: usize,
    pub autosave_delay_ms: u64,
    pub drag_hover_ms: u64,
    /// Text given to new nodes and to edits committed empty.
    pub placeholder: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            center_x: 600.0,
            center_y: 400.0,
            branch_offset: 220.0,
            level_spacing: 180.0,
            level_spacing_step: 20.0,
            level_spacing_min: 100.0,
            slot_height: 60.0,
            slot_height_step: 6.0,
            slot_height_min: 32.0,
            history_limit: 20,
            autosave_delay_ms: 1000,
            drag_hover_ms: 2000,
            placeholder: "New node".to_string(),
        }
    }
}

impl Config {
    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            center_x: self.center_x,
            center_y: self.center_y,
            branch_offset: self.branch_offset,
            level_spacing: self.level_spacing,
            level_spacing_step: self.level_spacing_step,
            level_spacing_min: self.level_spacing_min,
            slot_height: self.slot_height,
            slot_height_step: self.slot_height_step,
            slot_height_min: self.slot_height_min,
        }
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    pub fn drag_hover_delay(&self) -> Duration {
        Duration::from_millis(self.drag_hover_ms)
    }
}

/// Commented layout of a config file. `{key}` marks where each value goes.
const TEMPLATE: &str = "\
# mindmap configuration

# Canvas position of the center node
center_x: {center_x}
center_y: {center_y}

# Horizontal distance from the center to its main branches
branch_offset: {branch_offset}

# Horizontal distance from a node to its children: start, shrink per level, floor
level_spacing: {level_spacing}
level_spacing_step: {level_spacing_step}
level_spacing_min: {level_spacing_min}

# Vertical slot reserved for a leaf: start, shrink per level, floor
slot_height: {slot_height}
slot_height_step: {slot_height_step}
slot_height_min: {slot_height_min}

# Number of undo steps kept
history_limit: {history_limit}

# Quiet period before an edit is saved automatically
autosave_delay_ms: {autosave_delay_ms}

# How long a dragged node must hover over a target before it is re-parented
drag_hover_ms: {drag_hover_ms}

# Text for new nodes and for edits committed empty
placeholder: {placeholder}
";

/// Contents written by `mindmap init`.
pub fn default_contents() -> String {
    serialize_config(&Config::default())
}

/// Parse config text. Missing keys keep their defaults.
pub fn parse(input: &str) -> Result<Config> {
    let mut cfg = Config::default();

    for (idx, raw) in input.lines().enumerate() {
        let line_num = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            bail!("config line {}: expected `key: value`, got {:?}", line_num, raw);
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "center_x" => cfg.center_x = coordinate(key, value, line_num)?,
            "center_y" => cfg.center_y = coordinate(key, value, line_num)?,
            "branch_offset" => cfg.branch_offset = number(key, value, line_num)?,
            "level_spacing" => cfg.level_spacing = number(key, value, line_num)?,
            "level_spacing_step" => cfg.level_spacing_step = number(key, value, line_num)?,
            "level_spacing_min" => cfg.level_spacing_min = number(key, value, line_num)?,
            "slot_height" => cfg.slot_height = number(key, value, line_num)?,
            "slot_height_step" => cfg.slot_height_step = number(key, value, line_num)?,
            "slot_height_min" => cfg.slot_height_min = number(key, value, line_num)?,
            "history_limit" => cfg.history_limit = integer(key, value, line_num)?,
            "autosave_delay_ms" => cfg.autosave_delay_ms = integer(key, value, line_num)?,
            "drag_hover_ms" => cfg.drag_hover_ms = integer(key, value, line_num)?,
            "placeholder" => {
                if value.is_empty() {
                    bail!("config line {}: placeholder must not be empty", line_num);
                }
                cfg.placeholder = value.to_string();
            }
            other => warn!(key = other, line = line_num, "ignoring unknown config key"),
        }
    }

    Ok(cfg)
}

/// Render a config as a commented file that [`parse`] reads back.
pub fn serialize_config(config: &Config) -> String {
    let values = [
        ("center_x", config.center_x.to_string()),
        ("center_y", config.center_y.to_string()),
        ("branch_offset", config.branch_offset.to_string()),
        ("level_spacing", config.level_spacing.to_string()),
        ("level_spacing_step", config.level_spacing_step.to_string()),
        ("level_spacing_min", config.level_spacing_min.to_string()),
        ("slot_height", config.slot_height.to_string()),
        ("slot_height_step", config.slot_height_step.to_string()),
        ("slot_height_min", config.slot_height_min.to_string()),
        ("history_limit", config.history_limit.to_string()),
        ("autosave_delay_ms", config.autosave_delay_ms.to_string()),
        ("drag_hover_ms", config.drag_hover_ms.to_string()),
        ("placeholder", config.placeholder.clone()),
    ];
    values
        .iter()
        .fold(TEMPLATE.to_string(), |out, (key, value)| {
            out.replace(&format!("{{{key}}}"), value)
        })
}

/// Any finite number; the canvas origin may sit left of or above zero.
fn coordinate(key: &str, value: &str, line_num: usize) -> Result<f64> {
    let parsed: f64 = value
        .parse()
        .with_context(|| format!("config line {}: {} must be a number", line_num, key))?;
    if !parsed.is_finite() {
        bail!("config line {}: {} must be a finite number", line_num, key);
    }
    Ok(parsed)
}

/// Distances, steps and floors.
fn number(key: &str, value: &str, line_num: usize) -> Result<f64> {
    let parsed = coordinate(key, value, line_num)?;
    if parsed < 0.0 {
        bail!("config line {}: {} must be a non-negative number", line_num, key);
    }
    Ok(parsed)
}

fn integer<T: std::str::FromStr>(key: &str, value: &str, line_num: usize) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("config line {}: {} must be a whole number", line_num, key))
}
