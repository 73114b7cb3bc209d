// Library exports for alcodash

pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod dispatch;
pub mod graph;
pub mod ir;
pub mod logging;
pub mod options;
pub mod page;
pub mod parser;
pub mod scale;
pub mod session;
pub mod theme;
pub mod transform;

use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
    /// Plotly figure JSON
    #[serde(rename = "json")]
    Json,
    /// Static HTML snapshot of the dashboard page
    #[serde(rename = "html")]
    Html,
}

impl OutputFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(OutputFormat::Png),
            "svg" => Some(OutputFormat::Svg),
            "json" => Some(OutputFormat::Json),
            "html" | "htm" => Some(OutputFormat::Html),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
    /// Histogram bin count
    #[serde(default = "default_bins")]
    pub bins: usize,
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }
fn default_bins() -> usize { 30 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            format: OutputFormat::Png,
            bins: default_bins(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_defaults_from_json() {
        let options: RenderOptions = serde_json::from_str(r#"{"type": "svg"}"#).unwrap();
        assert_eq!(options.width, 800);
        assert_eq!(options.height, 600);
        assert_eq!(options.bins, 30);
        assert_eq!(options.format, OutputFormat::Svg);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("a.PNG")), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_path(Path::new("a.htm")), Some(OutputFormat::Html));
        assert_eq!(OutputFormat::from_path(Path::new("a.txt")), None);
        assert_eq!(OutputFormat::from_path(Path::new("noext")), None);
    }
}
