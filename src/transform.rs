use anyhow::{bail, Result};
use crate::ir::{BoxStats, HistogramData, Series};

/// Bin every series against one shared set of edges so overlaid or dodged bars line up.
pub fn compute_histogram(series: &[Series], bin_count: usize) -> Result<HistogramData> {
    if bin_count == 0 {
        bail!("Histogram requires at least one bin");
    }

    let all_values = series.iter().flat_map(|s| s.values.iter().copied());
    let (min, max) = all_values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if min > max {
        // Every series is empty; keep a unit-width placeholder bin.
        return Ok(HistogramData {
            edges: vec![0.0, 1.0],
            counts: vec![vec![0]; series.len()],
        });
    }

    let range = max - min;
    let (bins, width) = if range == 0.0 { (1, 1.0) } else { (bin_count, range / bin_count as f64) };
    let start = if range == 0.0 { min - 0.5 } else { min };

    let edges: Vec<f64> = (0..=bins).map(|i| start + i as f64 * width).collect();

    let counts = series
        .iter()
        .map(|s| {
            let mut counts = vec![0usize; bins];
            for &v in &s.values {
                // The maximum lands on the closing edge; fold it into the last bin.
                let idx = (((v - start) / width).floor() as usize).min(bins - 1);
                counts[idx] += 1;
            }
            counts
        })
        .collect();

    Ok(HistogramData { edges, counts })
}

/// Quartiles with whiskers at the furthest points within 1.5 IQR. `None` for an empty series.
pub fn compute_box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }

    let mut ys = values.to_vec();
    ys.sort_by(|a, b| a.total_cmp(b));

    let q1 = percentile(&ys, 0.25);
    let median = percentile(&ys, 0.50);
    let q3 = percentile(&ys, 0.75);
    let iqr = q3 - q1;

    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    let lower_whisker = ys.iter().copied().find(|&v| v >= lower_fence).unwrap_or(q1);
    let upper_whisker = ys.iter().rev().copied().find(|&v| v <= upper_fence).unwrap_or(q3);

    let outliers = ys
        .iter()
        .copied()
        .filter(|&v| v < lower_fence || v > upper_fence)
        .collect();

    Some(BoxStats {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        outliers,
    })
}

fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    let n = sorted_data.len();
    if n == 0 { return 0.0; }
    if n == 1 { return sorted_data[0]; }

    let rank = p * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = rank.ceil() as usize;

    if lower_idx == upper_idx {
        sorted_data[lower_idx]
    } else {
        let weight = rank - lower_idx as f64;
        sorted_data[lower_idx] * (1.0 - weight) + sorted_data[upper_idx] * weight
    }
}
