//! Dashboard colours and series palette.
//!
//! The page uses a light blue background with a dark navy heading; chart
//! series cycle through the Plotly/D3 category10 palette so exported figures
//! and rendered images agree on colours.

use plotters::style::RGBColor;

/// Category10 palette.
pub const CATEGORY10: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

/// Resolved colours for the page and chart.
#[derive(Debug, Clone)]
pub struct DashboardTheme {
    pub page_background: RGBColor,
    pub heading: RGBColor,
    pub plot_background: RGBColor,
    pub axis_text: RGBColor,
    pub font_family: String,
    pub title_size: u32,
    pub label_size: u32,
}

impl Default for DashboardTheme {
    fn default() -> Self {
        DashboardTheme {
            page_background: RGBColor(0xb4, 0xd8, 0xee),
            heading: RGBColor(0x00, 0x04, 0x55),
            plot_background: RGBColor(255, 255, 255),
            axis_text: RGBColor(0x44, 0x44, 0x44),
            font_family: "sans-serif".to_string(),
            title_size: 22,
            label_size: 14,
        }
    }
}

impl DashboardTheme {
    /// Colour for the `idx`-th series.
    pub fn series_color(&self, idx: usize) -> RGBColor {
        CATEGORY10[idx % CATEGORY10.len()]
    }
}

/// `#rrggbb` form used by the HTML page.
pub fn to_hex(color: RGBColor) -> String {
    format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
}
