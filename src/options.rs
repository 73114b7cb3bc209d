// Category -> chart key table driving the radio/dropdown cascade

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level chart family.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Category {
    #[default]
    Histogram,
    Boxplot,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Histogram, Category::Boxplot];

    pub fn name(self) -> &'static str {
        match self {
            Category::Histogram => "Histogram",
            Category::Boxplot => "Boxplot",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow!("Unknown category '{}' (expected Histogram or Boxplot)", s))
    }
}

const HISTOGRAM_KEYS: &[&str] = &[
    "Ethanol by beertax",
    "Ethanol by cigtax",
    "Skin colour + employ",
    "Age by family size",
    "Living area by age",
    "Education by living area",
];

const BOXPLOT_KEYS: &[&str] = &[
    "Work status vs. unemployment rate",
    "Work status vs. age",
    "Work status vs. education",
    "Health vs. education",
    "Health vs. age",
];

/// Ordered chart keys offered for a category.
pub fn options_for(category: Category) -> &'static [&'static str] {
    match category {
        Category::Histogram => HISTOGRAM_KEYS,
        Category::Boxplot => BOXPLOT_KEYS,
    }
}

/// The key selected whenever the option list changes.
pub fn default_key<'a>(options: &[&'a str]) -> Option<&'a str> {
    options.first().copied()
}

/// Keep `key` if it is offered for `category`, otherwise fall back to the default.
pub fn resolve_key(category: Category, key: &str) -> &'static str {
    let options = options_for(category);
    options
        .iter()
        .copied()
        .find(|&k| k == key)
        .or_else(|| default_key(options))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_non_empty_and_default_is_first() {
        for category in Category::ALL {
            let options = options_for(category);
            assert!(!options.is_empty());
            assert_eq!(default_key(options), Some(options[0]));
        }
    }

    #[test]
    fn test_option_counts() {
        assert_eq!(options_for(Category::Histogram).len(), 6);
        assert_eq!(options_for(Category::Boxplot).len(), 5);
    }

    #[test]
    fn test_default_key_empty() {
        assert_eq!(default_key(&[]), None);
    }

    #[test]
    fn test_resolve_key_keeps_valid_key() {
        assert_eq!(
            resolve_key(Category::Boxplot, "Health vs. age"),
            "Health vs. age"
        );
    }

    #[test]
    fn test_resolve_key_falls_back_across_categories() {
        // A histogram key left over after switching to Boxplot
        assert_eq!(
            resolve_key(Category::Boxplot, "Ethanol by beertax"),
            "Work status vs. unemployment rate"
        );
        assert_eq!(resolve_key(Category::Histogram, ""), "Ethanol by beertax");
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("boxplot".parse::<Category>().unwrap(), Category::Boxplot);
        assert_eq!(" Histogram ".parse::<Category>().unwrap(), Category::Histogram);
        assert!("scatter".parse::<Category>().is_err());
    }
}
