// Static HTML snapshot of the dashboard page

use anyhow::Result;
use std::fmt::Write;

use crate::dashboard::Dashboard;
use crate::data::DEFAULT_SOURCE;
use crate::graph;
use crate::ir::ChartSpec;
use crate::options::Category;
use crate::theme::{to_hex, DashboardTheme};
use crate::RenderOptions;

pub const HEADING: &str = "Alcohol fairy tale: What we know about alcohol users from USA?";

const DESCRIPTION_PREFIX: &str = "Interactive application displays these ";
const DESCRIPTION_SUFFIX: &str =
    " about alcohol users in USA (no year or advanced information about investigation found)";

/// Render the page layout (heading, dataset note, category radio, chart dropdown)
/// with the current chart inlined as SVG.
pub fn render_page(dashboard: &Dashboard, spec: &ChartSpec, options: &RenderOptions) -> Result<String> {
    let theme = DashboardTheme::default();
    let svg = graph::render_svg(spec, options)?;
    let heading = to_hex(theme.heading);

    let mut html = String::new();
    write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n\
         <body style=\"padding: 30px 80px 50px 80px; background-color: {bg}; font-family: {font};\">\n\
         <h1 style=\"color: {heading}; text-align: center; font-weight: bold;\">{title}</h1>\n\
         <h3 style=\"color: {heading}; font-size: 16px; text-align: center;\">{prefix}<a href=\"{url}\">data</a>{suffix}</h3>\n\
         <h3 style=\"color: {heading}; font-size: 20px; font-weight: bold;\">Options:</h3>\n",
        title = escape(HEADING),
        bg = to_hex(theme.page_background),
        font = theme.font_family,
        heading = heading,
        prefix = escape(DESCRIPTION_PREFIX),
        url = DEFAULT_SOURCE,
        suffix = escape(DESCRIPTION_SUFFIX),
    )?;

    html.push_str("<form>\n");
    for category in Category::ALL {
        let checked = if category == dashboard.category() { " checked" } else { "" };
        writeln!(
            html,
            "<label><input type=\"radio\" name=\"category\" value=\"{name}\"{checked}> {name}</label>",
            name = category.name(),
            checked = checked,
        )?;
    }

    html.push_str("<br>\n<select name=\"chart\">\n");
    for key in dashboard.options() {
        let selected = if *key == dashboard.chart_key() { " selected" } else { "" };
        writeln!(
            html,
            "<option value=\"{key}\"{selected}>{key}</option>",
            key = escape(key),
            selected = selected,
        )?;
    }
    html.push_str("</select>\n</form>\n<br>\n<div id=\"chart\">\n");
    html.push_str(&svg);
    html.push_str("\n</div>\n</body>\n</html>\n");

    Ok(html)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
