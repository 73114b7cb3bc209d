use anyhow::{bail, Context, Result};
use image::ImageEncoder;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::ir::{BarMode, BoxStats, ChartKind, ChartSpec, HistogramData};
use crate::scale::{self, PanelScales};
use crate::theme::DashboardTheme;
use crate::transform;
use crate::{OutputFormat, RenderOptions};

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Render a chart to image bytes in the format named by `options`.
pub fn render(spec: &ChartSpec, options: &RenderOptions) -> Result<Vec<u8>> {
    match options.format {
        OutputFormat::Png => render_png(spec, options),
        OutputFormat::Svg => render_svg(spec, options).map(String::into_bytes),
        other => bail!("{:?} is not an image format", other),
    }
}

/// Draw into an RGB buffer and encode it as PNG.
pub fn render_png(spec: &ChartSpec, options: &RenderOptions) -> Result<Vec<u8>> {
    let (width, height) = (options.width, options.height);
    if width == 0 || height == 0 {
        bail!("Image dimensions must be non-zero (got {}x{})", width, height);
    }
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .context("Image dimensions too large")?;
    let mut buffer = vec![0u8; len];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_chart(&root, spec, options, &DashboardTheme::default())?;
        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

pub fn render_svg(spec: &ChartSpec, options: &RenderOptions) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height)).into_drawing_area();
        draw_chart(&root, spec, options, &DashboardTheme::default())?;
        root.present().context("Failed to present drawing")?;
    }
    Ok(svg)
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    options: &RenderOptions,
    theme: &DashboardTheme,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&theme.plot_background).context("Failed to fill background")?;

    match spec.kind {
        ChartKind::Histogram => {
            let hist = transform::compute_histogram(&spec.series, options.bins)?;
            let scales = scale::histogram_scales(&hist);
            let mut chart = build_chart(root, spec, &scales, theme)?;
            chart
                .configure_mesh()
                .x_desc(spec.x_label.clone().unwrap_or_default())
                .y_desc(spec.y_label.clone().unwrap_or_else(|| "count".to_string()))
                .label_style((theme.font_family.as_str(), 12).into_font().color(&theme.axis_text))
                .axis_desc_style((theme.font_family.as_str(), theme.label_size))
                .draw()
                .context("Failed to draw mesh")?;
            draw_histogram(&mut chart, spec, &hist, theme)?;
            draw_legend(&mut chart, spec)?;
        }
        ChartKind::Box => {
            let names: Vec<String> = spec.series.iter().map(|s| s.name.clone()).collect();
            let boxes: Vec<Option<BoxStats>> = spec
                .series
                .iter()
                .map(|s| transform::compute_box_stats(&s.values))
                .collect();
            let scales = scale::box_scales(&names, &boxes);
            let mut chart = build_chart(root, spec, &scales, theme)?;
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(names.len() * 2 + 1)
                .x_label_formatter(&|x| scales.x.label_for(*x))
                .x_desc(spec.x_label.clone().unwrap_or_default())
                .y_desc(spec.y_label.clone().unwrap_or_default())
                .label_style((theme.font_family.as_str(), 12).into_font().color(&theme.axis_text))
                .axis_desc_style((theme.font_family.as_str(), theme.label_size))
                .draw()
                .context("Failed to draw mesh")?;
            draw_boxes(&mut chart, spec, &boxes, theme)?;
            draw_legend(&mut chart, spec)?;
        }
    }

    Ok(())
}

fn build_chart<'a, DB: DrawingBackend>(
    root: &'a DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    scales: &PanelScales,
    theme: &DashboardTheme,
) -> Result<Chart<'a, DB>>
where
    DB::ErrorType: 'static,
{
    let caption_style = (theme.font_family.as_str(), theme.title_size)
        .into_font()
        .color(&theme.heading);

    ChartBuilder::on(root)
        .margin(15)
        .caption(&spec.title, caption_style)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(
            scales.x.domain.0..scales.x.domain.1,
            scales.y.domain.0..scales.y.domain.1,
        )
        .context("Failed to build chart")
}

fn draw_histogram<'a, DB: DrawingBackend + 'a>(
    chart: &mut Chart<'a, DB>,
    spec: &ChartSpec,
    hist: &HistogramData,
    theme: &DashboardTheme,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let n_series = spec.series.len().max(1);
    let mode = spec.effective_bar_mode();

    for (idx, (series, counts)) in spec.series.iter().zip(&hist.counts).enumerate() {
        let color = theme.series_color(idx);
        let alpha = series.opacity.unwrap_or(1.0);
        let fill = color.mix(alpha).filled();

        let bars: Vec<Rectangle<(f64, f64)>> = counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(bin, &count)| {
                let left = hist.edges[bin];
                let right = hist.edges[bin + 1];
                let (x0, x1) = match mode {
                    BarMode::Overlay => (left, right),
                    BarMode::Group => {
                        let slot = (right - left) / n_series as f64;
                        (left + idx as f64 * slot, left + (idx + 1) as f64 * slot)
                    }
                };
                Rectangle::new([(x0, 0.0), (x1, count as f64)], fill)
            })
            .collect();

        chart
            .draw_series(bars)
            .context("Failed to draw histogram bars")?
            .label(series.name.clone())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    Ok(())
}

fn draw_boxes<'a, DB: DrawingBackend + 'a>(
    chart: &mut Chart<'a, DB>,
    spec: &ChartSpec,
    boxes: &[Option<BoxStats>],
    theme: &DashboardTheme,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    const HALF_WIDTH: f64 = 0.25;
    const CAP_HALF: f64 = 0.1;

    for (idx, (series, stats)) in spec.series.iter().zip(boxes).enumerate() {
        let color = theme.series_color(idx);
        let x = idx as f64;

        let Some(stats) = stats else {
            // Keep the legend entry for groups with no rows.
            chart
                .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())
                .context("Failed to draw empty box")?
                .label(series.name.clone())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
            continue;
        };

        let stroke = color.stroke_width(2);
        let lines = vec![
            vec![(x, stats.lower_whisker), (x, stats.q1)],
            vec![(x, stats.q3), (x, stats.upper_whisker)],
            vec![(x - CAP_HALF, stats.lower_whisker), (x + CAP_HALF, stats.lower_whisker)],
            vec![(x - CAP_HALF, stats.upper_whisker), (x + CAP_HALF, stats.upper_whisker)],
        ];
        chart
            .draw_series(lines.into_iter().map(|points| PathElement::new(points, stroke)))
            .context("Failed to draw whiskers")?;

        chart
            .draw_series([
                Rectangle::new(
                    [(x - HALF_WIDTH, stats.q3), (x + HALF_WIDTH, stats.q1)],
                    color.mix(0.5).filled(),
                ),
                Rectangle::new([(x - HALF_WIDTH, stats.q3), (x + HALF_WIDTH, stats.q1)], stroke),
            ])
            .context("Failed to draw box")?
            .label(series.name.clone())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));

        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x - HALF_WIDTH, stats.median), (x + HALF_WIDTH, stats.median)],
                WHITE.stroke_width(2),
            )))
            .context("Failed to draw median")?;

        chart
            .draw_series(stats.outliers.iter().map(|&v| Circle::new((x, v), 3, color.filled())))
            .context("Failed to draw outliers")?;
    }

    Ok(())
}

fn draw_legend<'a, DB: DrawingBackend + 'a>(chart: &mut Chart<'a, DB>, spec: &ChartSpec) -> Result<()>
where
    DB::ErrorType: 'static,
{
    if !spec.show_legend || spec.series.is_empty() {
        return Ok(());
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()
        .context("Failed to draw legend")
}
