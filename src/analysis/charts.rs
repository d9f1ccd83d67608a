//! Chart generation using plotters.
//!
//! Renders the digit distribution histogram to a PNG for admin review.

use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::Path;

/// Chart dimensions in pixels.
const CHART_WIDTH: u32 = 800;
const CHART_HEIGHT: u32 = 500;

/// Bar fill color.
const BAR_COLOR: RGBColor = RGBColor(255, 107, 53);

/// Renders a bar chart of samples per digit.
pub fn render_digit_histogram(
    histogram: &[u64; 10],
    total_samples: usize,
    output_path: &Path,
) -> Result<()> {
    let root =
        BitMapBackend::new(output_path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).context("Failed to fill chart background")?;

    let y_max = histogram.iter().copied().max().unwrap_or(0).max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Digit Distribution (n = {})", total_samples),
            ("sans-serif", 28).into_font().style(FontStyle::Bold),
        )
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0u32..10u32, 0u64..y_max + y_max / 10 + 1)
        .context("Failed to build chart axes")?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(10)
        .x_label_formatter(&|x| format!("{}", x))
        .y_desc("Samples")
        .draw()
        .context("Failed to draw chart mesh")?;

    chart
        .draw_series((0u32..10).map(|digit| {
            let count = histogram[digit as usize];
            let mut bar = Rectangle::new([(digit, 0), (digit + 1, count)], BAR_COLOR.filled());
            bar.set_margin(0, 0, 3, 3);
            bar
        }))
        .context("Failed to draw histogram bars")?;

    root.present().context("Failed to save chart")?;
    Ok(())
}
