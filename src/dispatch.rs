// Chart dispatcher: chart key -> filtered series + presentation metadata

use anyhow::Result;
use tracing::{debug, warn};

use crate::catalog::{self, ChartDefinition};
use crate::data::RecordTable;
use crate::ir::{ChartSpec, Series};
use crate::options::Category;

/// Build the chart for `chart_key`, falling back to the default definition when
/// the key is unknown.
///
/// Only fails if the table lacks a column the definition reads; [`crate::data::load`]
/// callers are expected to have checked [`catalog::required_columns`] up front.
pub fn build_chart(table: &RecordTable, chart_key: &str, category: Category) -> Result<ChartSpec> {
    let definition = match catalog::find(chart_key) {
        Some(def) => def,
        None => {
            warn!(chart_key, %category, "unrecognized chart key, using default chart");
            &catalog::DEFAULT_DEFINITION
        }
    };
    apply_definition(table, definition, category)
}

/// Evaluate one definition against the table.
pub fn apply_definition(
    table: &RecordTable,
    definition: &ChartDefinition,
    category: Category,
) -> Result<ChartSpec> {
    let mut series = Vec::with_capacity(definition.groups.len());
    for group in definition.groups {
        let predicate = group.predicate;
        let values = table.select(definition.value_column, predicate.column(), |v| {
            predicate.matches(v)
        })?;
        debug!(group = group.name, rows = values.len(), "group selected");
        series.push(Series {
            name: group.name.to_string(),
            values,
            opacity: definition.opacity,
        });
    }

    Ok(ChartSpec {
        key: definition.key.to_string(),
        category,
        kind: definition.kind,
        title: definition.title.to_string(),
        x_label: definition.x_label.map(str::to_string),
        y_label: definition.y_label.map(str::to_string),
        show_legend: definition.show_legend,
        bar_mode: definition.bar_mode,
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BarMode, ChartKind};
    use crate::options::options_for;

    // status, age, educ, unemrate, beertax, cigtax, ethanol, employ, white, famsize,
    // northeast, midwest, south, centcity, outercity, exhealth, vghealth, goodhealth, fairhealth
    const SAMPLE: &str = "\
status,age,educ,unemrate,beertax,cigtax,ethanol,employ,white,famsize,northeast,midwest,south,centcity,outercity,exhealth,vghealth,goodhealth,fairhealth
1,62,10,5.2,0.3,12,1.9,0,1,2,1,0,0,1,0,1,0,0,0
2,25,12,7.1,0.5,15,2.1,0,0,4,0,1,0,0,1,0,1,0,0
3,40,16,4.9,1.0,20,2.4,1,1,3,0,0,1,0,1,0,0,1,0
3,35,14,6.0,1.5,25,2.2,1,1,1,1,0,0,1,0,0,0,0,1
3,51,13,5.5,2.0,30,2.8,1,0,5,0,0,1,0,0,1,0,0,0
1,70,8,NA,0.2,10,1.7,0,1,2,0,1,0,0,0,0,0,1,0
";

    fn make_table() -> RecordTable {
        RecordTable::from_reader(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn test_ethanol_by_beertax_brackets() {
        let spec = build_chart(&make_table(), "Ethanol by beertax", Category::Histogram).unwrap();
        assert_eq!(
            spec.series_names(),
            vec![
                "tax < 0.5 $ per gallon",
                "tax = 0.5-1.5 $ per gallon",
                "tax > 1.5 $ per gallon"
            ]
        );
        // beertax 0.5 and 1.5 sit on the cut points and fall in no bracket
        assert_eq!(spec.series[0].values, vec![1.9, 1.7]);
        assert_eq!(spec.series[1].values, vec![2.4]);
        assert_eq!(spec.series[2].values, vec![2.8]);
        assert_eq!(spec.bar_mode, Some(BarMode::Overlay));
        assert!(spec.series.iter().all(|s| s.opacity == Some(0.75)));
    }

    #[test]
    fn test_cigtax_and_famsize_cut_points() {
        let table = make_table();

        let spec = build_chart(&table, "Ethanol by cigtax", Category::Histogram).unwrap();
        // cigtax 15 and 25 fall in no bracket
        assert_eq!(spec.series[0].values, vec![1.9, 1.7]);
        assert_eq!(spec.series[1].values, vec![2.4]);
        assert_eq!(spec.series[2].values, vec![2.8]);

        let spec = build_chart(&table, "Age by family size", Category::Histogram).unwrap();
        assert_eq!(spec.series_names(), vec!["1-2familysize", ">=3familysize"]);
        assert_eq!(spec.series[0].values, vec![62.0, 35.0, 70.0]);
        assert_eq!(spec.series[1].values, vec![25.0, 40.0, 51.0]);
    }

    #[test]
    fn test_work_status_vs_age() {
        let spec = build_chart(&make_table(), "Work status vs. age", Category::Boxplot).unwrap();
        assert_eq!(spec.kind, ChartKind::Box);
        assert_eq!(spec.series_names(), vec!["out of workforce", "unemployed", "employed"]);
        assert_eq!(spec.series[0].values, vec![62.0, 70.0]);
        assert_eq!(spec.series[1].values, vec![25.0]);
        assert_eq!(spec.series[2].values, vec![40.0, 35.0, 51.0]);
        assert_eq!(spec.y_label.as_deref(), Some("Age (years)"));
    }

    #[test]
    fn test_missing_values_are_dropped() {
        let spec = build_chart(
            &make_table(),
            "Work status vs. unemployment rate",
            Category::Boxplot,
        )
        .unwrap();
        assert_eq!(spec.series[0].values, vec![5.2]);
    }

    #[test]
    fn test_every_histogram_key() {
        let table = make_table();
        for key in options_for(Category::Histogram) {
            let spec = build_chart(&table, key, Category::Histogram).unwrap();
            assert_eq!(spec.kind, ChartKind::Histogram);
            assert!(spec.series.len() >= 2, "{} has too few series", key);
            assert!(!spec.title.is_empty());
            assert!(spec.x_label.as_deref().is_some_and(|l| !l.is_empty()));
        }
    }

    #[test]
    fn test_every_boxplot_key() {
        let table = make_table();
        for key in options_for(Category::Boxplot) {
            let spec = build_chart(&table, key, Category::Boxplot).unwrap();
            let expected = if key.starts_with("Health") { 4 } else { 3 };
            assert_eq!(spec.series.len(), expected, "{}", key);
        }
    }

    #[test]
    fn test_unknown_key_uses_default() {
        let spec = build_chart(&make_table(), "no such chart", Category::Boxplot).unwrap();
        assert_eq!(spec.title, "Ethanol by beertax");
        assert_eq!(spec.series_names(), vec!["tax < 0.5", "tax = 0.5-1.5", "tax > 1.5"]);
        assert_eq!(spec.x_label, None);
        assert_eq!(spec.category, Category::Boxplot);
    }

    #[test]
    fn test_living_area_is_grouped() {
        let spec = build_chart(&make_table(), "Living area by age", Category::Histogram).unwrap();
        assert_eq!(spec.series.len(), 5);
        assert_eq!(spec.bar_mode, None);
        assert_eq!(spec.series[3].name, "central city");
        assert_eq!(spec.series[3].values, vec![62.0, 35.0]);
    }

    #[test]
    fn test_missing_column_is_error() {
        let table = RecordTable::from_reader("age\n30\n".as_bytes()).unwrap();
        assert!(build_chart(&table, "Work status vs. age", Category::Boxplot).is_err());
    }
}
