use crate::ir::{BoxStats, HistogramData};

/// Axis domain for a chart panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    pub domain: (f64, f64),
    pub is_categorical: bool,
    pub categories: Vec<String>, // If categorical, maps index -> label
}

impl Scale {
    pub fn continuous(min: f64, max: f64) -> Self {
        Scale { domain: (min, max), is_categorical: false, categories: Vec::new() }
    }

    /// Category `i` is centred on `i`, with half a slot of room at both ends.
    pub fn categorical(categories: Vec<String>) -> Self {
        let n = categories.len() as f64;
        Scale { domain: (-0.5, n - 0.5), is_categorical: true, categories }
    }

    pub fn label_for(&self, x: f64) -> String {
        if !self.is_categorical {
            return String::new();
        }
        let idx = x.round();
        if idx < 0.0 || (x - idx).abs() > 1e-6 {
            return String::new();
        }
        self.categories.get(idx as usize).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelScales {
    pub x: Scale,
    pub y: Scale,
}

/// Histogram: x spans the bin edges, y runs from zero to the tallest bar.
pub fn histogram_scales(hist: &HistogramData) -> PanelScales {
    let x_min = hist.edges.first().copied().unwrap_or(0.0);
    let x_max = hist.edges.last().copied().unwrap_or(1.0);
    let (x_min, x_max) = pad_range(x_min, x_max);

    let y_max = hist.max_count() as f64;
    let y_max = if y_max == 0.0 { 1.0 } else { y_max * 1.05 };

    PanelScales {
        x: Scale::continuous(x_min, x_max),
        y: Scale::continuous(0.0, y_max),
    }
}

/// Boxplot: one category slot per series, y covers whiskers and outliers.
pub fn box_scales(names: &[String], boxes: &[Option<BoxStats>]) -> PanelScales {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for stats in boxes.iter().flatten() {
        let lo = stats.outliers.iter().copied().fold(stats.lower_whisker, f64::min);
        let hi = stats.outliers.iter().copied().fold(stats.upper_whisker, f64::max);
        min = min.min(lo);
        max = max.max(hi);
    }

    // Handle empty case
    if min == f64::INFINITY { min = 0.0; max = 1.0; }

    let (y_min, y_max) = pad_range(min, max);
    PanelScales {
        x: Scale::categorical(names.to_vec()),
        y: Scale::continuous(y_min, y_max),
    }
}

fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        (min - 1.0, max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding, max + padding)
    }
}
