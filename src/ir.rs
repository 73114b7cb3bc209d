use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::options::Category;

// =============================================================================
// Phase 1: Chart description
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Histogram,
    Box,
}

/// How histogram series share the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    /// Series drawn on top of each other.
    Overlay,
    /// Series dodged side by side inside each bin.
    Group,
}

/// One named subgroup of rows, reduced to the plotted column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// The computed chart handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub key: String,
    pub category: Category,
    pub kind: ChartKind,
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub show_legend: bool,
    pub bar_mode: Option<BarMode>,
    pub series: Vec<Series>,
}

impl ChartSpec {
    pub fn series_names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }

    /// Bar mode as drawn; histograms without an explicit mode are grouped.
    pub fn effective_bar_mode(&self) -> BarMode {
        self.bar_mode.unwrap_or(BarMode::Group)
    }

    /// Plotly figure (`{"data": [...], "layout": {...}}`).
    pub fn to_figure(&self) -> Value {
        let trace_type = match self.kind {
            ChartKind::Histogram => "histogram",
            ChartKind::Box => "box",
        };
        let value_axis = match self.kind {
            ChartKind::Histogram => "x",
            ChartKind::Box => "y",
        };

        let data: Vec<Value> = self
            .series
            .iter()
            .map(|s| {
                let mut trace = Map::new();
                trace.insert("type".into(), json!(trace_type));
                trace.insert("name".into(), json!(s.name));
                trace.insert(value_axis.into(), json!(s.values));
                if let Some(opacity) = s.opacity {
                    trace.insert("opacity".into(), json!(opacity));
                }
                Value::Object(trace)
            })
            .collect();

        let mut layout = Map::new();
        layout.insert("title".into(), json!(self.title));
        layout.insert("showlegend".into(), json!(self.show_legend));
        if let Some(mode) = self.bar_mode {
            layout.insert("barmode".into(), json!(mode));
        }
        if let Some(x) = &self.x_label {
            layout.insert("xaxis".into(), json!({ "title": x }));
        }
        if let Some(y) = &self.y_label {
            layout.insert("yaxis".into(), json!({ "title": y }));
        }

        json!({ "data": data, "layout": layout })
    }
}

// =============================================================================
// Phase 2: Statistics
// =============================================================================

/// Counts for every series over one shared set of bins.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramData {
    /// `bins + 1` ascending edges.
    pub edges: Vec<f64>,
    /// One count vector per series, each `edges.len() - 1` long.
    pub counts: Vec<Vec<usize>>,
}

impl HistogramData {
    pub fn bin_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }
}

/// Five-number summary plus outliers for one box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_spec(kind: ChartKind) -> ChartSpec {
        ChartSpec {
            key: "k".to_string(),
            category: Category::Histogram,
            kind,
            title: "Title".to_string(),
            x_label: Some("x axis".to_string()),
            y_label: None,
            show_legend: true,
            bar_mode: Some(BarMode::Overlay),
            series: vec![Series {
                name: "a".to_string(),
                values: vec![1.0, 2.0],
                opacity: Some(0.75),
            }],
        }
    }

    #[test]
    fn test_histogram_figure() {
        let figure = make_spec(ChartKind::Histogram).to_figure();
        assert_eq!(figure["data"][0]["type"], "histogram");
        assert_eq!(figure["data"][0]["x"], json!([1.0, 2.0]));
        assert_eq!(figure["data"][0]["opacity"], 0.75);
        assert_eq!(figure["layout"]["barmode"], "overlay");
        assert_eq!(figure["layout"]["xaxis"]["title"], "x axis");
        assert!(figure["layout"].get("yaxis").is_none());
    }

    #[test]
    fn test_box_figure_uses_y_values() {
        let mut spec = make_spec(ChartKind::Box);
        spec.bar_mode = None;
        spec.series[0].opacity = None;
        let figure = spec.to_figure();
        assert_eq!(figure["data"][0]["type"], "box");
        assert_eq!(figure["data"][0]["y"], json!([1.0, 2.0]));
        assert!(figure["data"][0].get("opacity").is_none());
        assert!(figure["layout"].get("barmode").is_none());
    }

    #[test]
    fn test_effective_bar_mode() {
        let mut spec = make_spec(ChartKind::Histogram);
        assert_eq!(spec.effective_bar_mode(), BarMode::Overlay);
        spec.bar_mode = None;
        assert_eq!(spec.effective_bar_mode(), BarMode::Group);
    }
}
