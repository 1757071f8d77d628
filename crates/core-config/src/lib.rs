//! Configuration loading and parsing.
//!
//! Parses `textrange.toml` (or an override path provided by the binary):
//!
//! * `[buffer]` geometry of the in-memory circular buffer
//!   (`rows`, `width`, `viewport_rows`);
//! * `[metrics]` pixel size of one cell (`cell_width`, `cell_height`);
//! * `[text]` text query options (`line_separator`, `max_search_rows`).
//!
//! Every field has a default, so a missing file, a missing table or an
//! unparsable file all yield a usable configuration. Unknown fields are
//! ignored. The raw buffer geometry is kept as parsed; `Config::apply_context`
//! merges command line overrides and clamps it into a valid shape.

use anyhow::Result;
use core_coords::CellMetrics;
use core_range::RangeOptions;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

/// Overrides supplied at application time (command line flags).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigContext {
    pub rows: Option<u32>,
    pub width: Option<u32>,
    pub viewport_rows: Option<u32>,
}

impl ConfigContext {
    pub fn new(rows: Option<u32>, width: Option<u32>, viewport_rows: Option<u32>) -> Self {
        Self {
            rows,
            width,
            viewport_rows,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BufferConfig {
    #[serde(default = "BufferConfig::default_rows")]
    pub rows: u32,
    #[serde(default = "BufferConfig::default_width")]
    pub width: u32,
    #[serde(default = "BufferConfig::default_viewport_rows")]
    pub viewport_rows: u32,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            rows: Self::default_rows(),
            width: Self::default_width(),
            viewport_rows: Self::default_viewport_rows(),
        }
    }
}

impl BufferConfig {
    const fn default_rows() -> u32 {
        300
    }
    const fn default_width() -> u32 {
        80
    }
    const fn default_viewport_rows() -> u32 {
        25
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MetricsConfig {
    #[serde(default = "MetricsConfig::default_cell_width")]
    pub cell_width: f64,
    #[serde(default = "MetricsConfig::default_cell_height")]
    pub cell_height: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            cell_width: Self::default_cell_width(),
            cell_height: Self::default_cell_height(),
        }
    }
}

impl MetricsConfig {
    const fn default_cell_width() -> f64 {
        8.0
    }
    const fn default_cell_height() -> f64 {
        16.0
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TextConfig {
    #[serde(default = "TextConfig::default_line_separator")]
    pub line_separator: String,
    #[serde(default)] // 0 = unlimited
    pub max_search_rows: u32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            line_separator: Self::default_line_separator(),
            max_search_rows: 0,
        }
    }
}

impl TextConfig {
    fn default_line_separator() -> String {
        "\r\n".to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub buffer: BufferConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub text: TextConfig,
}

/// Buffer geometry after overrides and clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveBuffer {
    pub rows: u32,
    pub width: u32,
    pub viewport_rows: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,                // original file string (optional)
    pub file: ConfigFile,                   // parsed (or default) data
    pub effective: Option<EffectiveBuffer>, // set by apply_context
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("textrange.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("textrange").join("textrange.toml");
    }
    PathBuf::from("textrange.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    if let Ok(content) = fs::read_to_string(&path) {
        match toml::from_str::<ConfigFile>(&content) {
            Ok(file) => Ok(Config {
                raw: Some(content),
                file,
                effective: None,
            }),
            Err(e) => {
                warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
                Ok(Config::default())
            }
        }
    } else {
        Ok(Config::default())
    }
}

impl Config {
    /// Merge `ctx` overrides over the file values and clamp the result:
    /// at least one row and one column, and a viewport of `1..=rows` rows.
    pub fn apply_context(&mut self, ctx: ConfigContext) -> EffectiveBuffer {
        let buffer = &self.file.buffer;
        let raw_rows = ctx.rows.unwrap_or(buffer.rows);
        let raw_width = ctx.width.unwrap_or(buffer.width);
        let raw_viewport = ctx.viewport_rows.unwrap_or(buffer.viewport_rows);

        let rows = raw_rows.max(1);
        let width = raw_width.max(1);
        let viewport_rows = raw_viewport.clamp(1, rows);

        if (rows, width, viewport_rows) != (raw_rows, raw_width, raw_viewport) {
            info!(
                target: "config",
                raw_rows,
                raw_width,
                raw_viewport,
                rows,
                width,
                viewport_rows,
                "buffer_geometry_clamped"
            );
        }
        let effective = EffectiveBuffer {
            rows,
            width,
            viewport_rows,
        };
        self.effective = Some(effective);
        effective
    }

    /// Options handed to the text provider.
    pub fn range_options(&self) -> RangeOptions {
        RangeOptions {
            line_separator: self.file.text.line_separator.clone(),
            max_search_rows: self.file.text.max_search_rows,
        }
    }

    /// Cell size; non-positive values fall back to the defaults.
    pub fn cell_metrics(&self) -> CellMetrics {
        let m = &self.file.metrics;
        let defaults = MetricsConfig::default();
        let width = if m.cell_width > 0.0 { m.cell_width } else { defaults.cell_width };
        let height = if m.cell_height > 0.0 { m.cell_height } else { defaults.cell_height };
        CellMetrics::new(width, height)
    }
}
