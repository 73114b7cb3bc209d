//! Dashboard state: the category radio, the chart dropdown and the chart they select.
//!
//! The selection cascade is plain function composition:
//! `chart = build_chart(resolve_key(category, key), category)`. Changing the
//! category republishes the option list and resets the key to its first entry;
//! changing the key only rebuilds the chart.

use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::catalog;
use crate::data::RecordTable;
use crate::dispatch;
use crate::graph;
use crate::ir::ChartSpec;
use crate::options::{self, Category};
use crate::page;
use crate::{OutputFormat, RenderOptions};

/// Compute the chart for a (category, key) pair, substituting the default key
/// when `key` is not offered for `category`.
pub fn render(table: &RecordTable, category: Category, key: &str) -> Result<ChartSpec> {
    let resolved = options::resolve_key(category, key);
    dispatch::build_chart(table, resolved, category)
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    table: Arc<RecordTable>,
    category: Category,
    chart_key: &'static str,
}

impl Dashboard {
    /// Start on the first histogram. Fails if the table cannot serve every chart.
    pub fn new(table: Arc<RecordTable>) -> Result<Self> {
        table
            .require_columns(catalog::required_columns())
            .context("Dataset cannot back the dashboard")?;

        let category = Category::default();
        Ok(Self {
            table,
            category,
            chart_key: options::resolve_key(category, ""),
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn chart_key(&self) -> &'static str {
        self.chart_key
    }

    /// Keys offered by the dropdown for the current category.
    pub fn options(&self) -> &'static [&'static str] {
        options::options_for(self.category)
    }

    /// Switch category; the dropdown is repopulated and its value reset.
    pub fn select_category(&mut self, category: Category) -> &'static [&'static str] {
        let offered = options::options_for(category);
        self.category = category;
        self.chart_key = options::resolve_key(category, "");
        info!(%category, chart = self.chart_key, "category selected");
        offered
    }

    /// Pick a chart from the current dropdown.
    pub fn select_chart(&mut self, key: &str) -> Result<()> {
        match self.options().iter().find(|&&k| k == key) {
            Some(&k) => {
                self.chart_key = k;
                debug!(chart = k, "chart selected");
                Ok(())
            }
            None => bail!(
                "'{}' is not a {} chart (choose one of: {})",
                key,
                self.category,
                self.options().join(", ")
            ),
        }
    }

    pub fn chart(&self) -> Result<ChartSpec> {
        render(&self.table, self.category, self.chart_key)
    }

    /// Current chart in the requested output format.
    pub fn export(&self, options: &RenderOptions) -> Result<Vec<u8>> {
        let spec = self.chart()?;
        match options.format {
            OutputFormat::Png | OutputFormat::Svg => graph::render(&spec, options),
            OutputFormat::Json => serde_json::to_vec_pretty(&spec.to_figure())
                .context("Failed to serialize figure"),
            OutputFormat::Html => page::render_page(self, &spec, options).map(String::into_bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table() -> Arc<RecordTable> {
        let mut header: Vec<&str> = catalog::required_columns();
        header.sort_unstable();
        let row: Vec<String> = header
            .iter()
            .map(|col| match *col {
                "status" => "3".to_string(),
                "beertax" => "0.4".to_string(),
                "age" => "33".to_string(),
                _ => "1".to_string(),
            })
            .collect();
        let csv = format!("{}\n{}\n{}\n", header.join(","), row.join(","), row.join(","));
        Arc::new(RecordTable::from_reader(csv.as_bytes()).unwrap())
    }

    #[test]
    fn test_initial_state() {
        let dash = Dashboard::new(make_table()).unwrap();
        assert_eq!(dash.category(), Category::Histogram);
        assert_eq!(dash.chart_key(), "Ethanol by beertax");
    }

    #[test]
    fn test_switch_to_boxplot_resets_key() {
        let mut dash = Dashboard::new(make_table()).unwrap();
        dash.select_chart("Age by family size").unwrap();
        let offered = dash.select_category(Category::Boxplot);
        assert_eq!(offered.len(), 5);
        assert_eq!(offered, options::options_for(Category::Boxplot));
        assert_eq!(dash.chart_key(), "Work status vs. unemployment rate");
        assert_eq!(dash.chart().unwrap().title, "Work status vs. unemployment rate");
    }

    #[test]
    fn test_select_chart_outside_category_is_rejected() {
        let mut dash = Dashboard::new(make_table()).unwrap();
        let err = dash.select_chart("Health vs. age").unwrap_err();
        assert!(err.to_string().contains("not a Histogram chart"));
        assert_eq!(dash.chart_key(), "Ethanol by beertax");
    }

    #[test]
    fn test_chart_follows_selection() {
        let mut dash = Dashboard::new(make_table()).unwrap();
        dash.select_category(Category::Boxplot);
        dash.select_chart("Work status vs. age").unwrap();
        let spec = dash.chart().unwrap();
        assert_eq!(spec.series[2].name, "employed");
        assert_eq!(spec.series[2].values, vec![33.0, 33.0]);
    }

    #[test]
    fn test_render_composition_falls_back() {
        let table = make_table();
        let spec = render(&table, Category::Boxplot, "Ethanol by beertax").unwrap();
        assert_eq!(spec.key, "Work status vs. unemployment rate");
    }

    #[test]
    fn test_new_rejects_incomplete_table() {
        let table = Arc::new(RecordTable::from_reader("age\n1\n".as_bytes()).unwrap());
        let err = Dashboard::new(table).unwrap_err();
        assert!(format!("{:#}", err).contains("missing required columns"));
    }

    #[test]
    fn test_export_json() {
        let dash = Dashboard::new(make_table()).unwrap();
        let options = RenderOptions { format: OutputFormat::Json, ..RenderOptions::default() };
        let bytes = dash.export(&options).unwrap();
        let figure: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(figure["layout"]["title"], "Ethanol by beertax");
        assert_eq!(figure["data"].as_array().unwrap().len(), 3);
    }
}
