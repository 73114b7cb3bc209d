// Abstract Syntax Tree for session commands

use crate::options::Category;

/// One session command. A line may chain several with `|`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Pick the chart family; resets the chart to the family's first entry
    Category(Category),
    /// Pick a chart from the current family
    Chart(String),
    /// List the charts offered for the current family
    Options,
    /// Describe the current chart
    Show,
    /// Write the current chart to a file (format from the extension)
    Save(String),
    Help,
    Quit,
}
