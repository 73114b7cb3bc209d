//! Static chart definitions.
//!
//! Each definition maps a chart key to a value column, an ordered list of named
//! row groups and the presentation metadata for the chart. Bracket edges are
//! written per definition: `Between` is exclusive at both ends, so a value that
//! sits exactly on a cut point belongs to no group.

use serde::Serialize;

use crate::ir::{BarMode, ChartKind};

/// Row predicate evaluated against a single column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Predicate {
    Lt(&'static str, f64),
    Gt(&'static str, f64),
    /// Strictly between the two bounds.
    Between(&'static str, f64, f64),
    Eq(&'static str, f64),
}

impl Predicate {
    pub fn column(&self) -> &'static str {
        match *self {
            Predicate::Lt(col, _)
            | Predicate::Gt(col, _)
            | Predicate::Between(col, _, _)
            | Predicate::Eq(col, _) => col,
        }
    }

    /// NaN never matches.
    pub fn matches(&self, value: f64) -> bool {
        match *self {
            Predicate::Lt(_, v) => value < v,
            Predicate::Gt(_, v) => value > v,
            Predicate::Between(_, lo, hi) => value > lo && value < hi,
            Predicate::Eq(_, v) => value == v,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GroupRule {
    pub name: &'static str,
    pub predicate: Predicate,
}

#[derive(Debug, Clone, Copy)]
pub struct ChartDefinition {
    pub key: &'static str,
    pub kind: ChartKind,
    pub title: &'static str,
    pub x_label: Option<&'static str>,
    pub y_label: Option<&'static str>,
    pub show_legend: bool,
    pub bar_mode: Option<BarMode>,
    pub opacity: Option<f64>,
    pub value_column: &'static str,
    pub groups: &'static [GroupRule],
}

impl ChartDefinition {
    /// Every column the definition reads.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.value_column).chain(self.groups.iter().map(|g| g.predicate.column()))
    }
}

/// Short description of a definition, used by listings.
#[derive(Debug, Clone, Serialize)]
pub struct DefinitionSummary {
    pub key: &'static str,
    pub kind: ChartKind,
    pub value_column: &'static str,
    pub groups: Vec<&'static str>,
}

impl From<&ChartDefinition> for DefinitionSummary {
    fn from(def: &ChartDefinition) -> Self {
        Self {
            key: def.key,
            kind: def.kind,
            value_column: def.value_column,
            groups: def.groups.iter().map(|g| g.name).collect(),
        }
    }
}

const ETHANOL_TITLE: &str = "State per-capita ethanol consumption (gallons ?)";

const fn rule(name: &'static str, predicate: Predicate) -> GroupRule {
    GroupRule { name, predicate }
}

const BEERTAX_GROUPS: &[GroupRule] = &[
    rule("tax < 0.5 $ per gallon", Predicate::Lt("beertax", 0.5)),
    rule("tax = 0.5-1.5 $ per gallon", Predicate::Between("beertax", 0.5, 1.5)),
    rule("tax > 1.5 $ per gallon", Predicate::Gt("beertax", 1.5)),
];

const CIGTAX_GROUPS: &[GroupRule] = &[
    rule("tax < 15 cents per pack", Predicate::Lt("cigtax", 15.0)),
    rule("tax = 15-25 cents per pack", Predicate::Between("cigtax", 15.0, 25.0)),
    rule("tax > 25 cents per pack", Predicate::Gt("cigtax", 25.0)),
];

const SKIN_GROUPS: &[GroupRule] = &[
    rule("employed", Predicate::Eq("white", 1.0)),
    rule("unemployed", Predicate::Eq("white", 0.0)),
];

const FAMSIZE_GROUPS: &[GroupRule] = &[
    rule("1-2familysize", Predicate::Lt("famsize", 3.0)),
    rule(">=3familysize", Predicate::Gt("famsize", 2.0)),
];

const AREA_GROUPS: &[GroupRule] = &[
    rule("northeast", Predicate::Eq("northeast", 1.0)),
    rule("midwest", Predicate::Eq("midwest", 1.0)),
    rule("south", Predicate::Eq("south", 1.0)),
    // Published dashboard shows this trace as "centra lcity".
    rule("central city", Predicate::Eq("centcity", 1.0)),
    rule("outer city", Predicate::Eq("outercity", 1.0)),
];

const STATUS_GROUPS: &[GroupRule] = &[
    rule("out of workforce", Predicate::Eq("status", 1.0)),
    rule("unemployed", Predicate::Eq("status", 2.0)),
    rule("employed", Predicate::Eq("status", 3.0)),
];

const HEALTH_GROUPS: &[GroupRule] = &[
    rule("excellent health", Predicate::Eq("exhealth", 1.0)),
    rule("very good health", Predicate::Eq("vghealth", 1.0)),
    rule("good health", Predicate::Eq("goodhealth", 1.0)),
    rule("fair health", Predicate::Eq("fairhealth", 1.0)),
];

const fn overlay_histogram(
    key: &'static str,
    title: &'static str,
    x_label: &'static str,
    value_column: &'static str,
    groups: &'static [GroupRule],
) -> ChartDefinition {
    ChartDefinition {
        key,
        kind: ChartKind::Histogram,
        title,
        x_label: Some(x_label),
        y_label: None,
        show_legend: true,
        bar_mode: Some(BarMode::Overlay),
        opacity: Some(0.75),
        value_column,
        groups,
    }
}

const fn grouped_histogram(
    key: &'static str,
    x_label: &'static str,
    value_column: &'static str,
) -> ChartDefinition {
    ChartDefinition {
        key,
        kind: ChartKind::Histogram,
        title: key,
        x_label: Some(x_label),
        y_label: None,
        show_legend: true,
        bar_mode: None,
        opacity: None,
        value_column,
        groups: AREA_GROUPS,
    }
}

const fn boxplot(
    key: &'static str,
    x_label: &'static str,
    y_label: &'static str,
    value_column: &'static str,
    groups: &'static [GroupRule],
) -> ChartDefinition {
    ChartDefinition {
        key,
        kind: ChartKind::Box,
        title: key,
        x_label: Some(x_label),
        y_label: Some(y_label),
        show_legend: true,
        bar_mode: None,
        opacity: None,
        value_column,
        groups,
    }
}

pub static DEFINITIONS: &[ChartDefinition] = &[
    boxplot(
        "Work status vs. unemployment rate",
        "Work status",
        "Unemployment rate (%)",
        "unemrate",
        STATUS_GROUPS,
    ),
    boxplot("Work status vs. age", "Work status", "Age (years)", "age", STATUS_GROUPS),
    boxplot(
        "Work status vs. education",
        "Work status",
        "Education (years of schooling)",
        "educ",
        STATUS_GROUPS,
    ),
    boxplot(
        "Health vs. education",
        "Health",
        "Education (years of schooling)",
        "educ",
        HEALTH_GROUPS,
    ),
    boxplot("Health vs. age", "Health", "Age (years)", "age", HEALTH_GROUPS),
    overlay_histogram(
        "Ethanol by beertax",
        "Ethanol by beertax",
        ETHANOL_TITLE,
        "ethanol",
        BEERTAX_GROUPS,
    ),
    overlay_histogram(
        "Ethanol by cigtax",
        "Ethanol by cigtax",
        ETHANOL_TITLE,
        "ethanol",
        CIGTAX_GROUPS,
    ),
    overlay_histogram(
        "Skin colour + employ",
        "Skin colour + employ",
        "white",
        "employ",
        SKIN_GROUPS,
    ),
    overlay_histogram(
        "Age by family size",
        "Age by familysize",
        "years",
        "age",
        FAMSIZE_GROUPS,
    ),
    grouped_histogram("Living area by age", "years", "age"),
    grouped_histogram("Education by living area", "years of schooling", "educ"),
];

/// Used when the chart key matches no definition.
pub static DEFAULT_DEFINITION: ChartDefinition = ChartDefinition {
    key: "Ethanol by beertax",
    kind: ChartKind::Histogram,
    title: "Ethanol by beertax",
    x_label: None,
    y_label: None,
    show_legend: true,
    bar_mode: Some(BarMode::Overlay),
    opacity: Some(0.75),
    value_column: "ethanol",
    groups: &[
        rule("tax < 0.5", Predicate::Lt("beertax", 0.5)),
        rule("tax = 0.5-1.5", Predicate::Between("beertax", 0.5, 1.5)),
        rule("tax > 1.5", Predicate::Gt("beertax", 1.5)),
    ],
};

pub fn find(key: &str) -> Option<&'static ChartDefinition> {
    DEFINITIONS.iter().find(|def| def.key == key)
}

/// Columns the dataset must provide for every definition to work.
pub fn required_columns() -> Vec<&'static str> {
    let mut columns: Vec<&'static str> = DEFINITIONS
        .iter()
        .chain(std::iter::once(&DEFAULT_DEFINITION))
        .flat_map(|def| def.columns())
        .collect();
    columns.sort_unstable();
    columns.dedup();
    columns
}
