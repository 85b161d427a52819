// Chart-specification consumer: draws a resolved ChartSpec against a dataset
// and encodes the result as PNG. Tolerant by contract: x/y columns that do
// not exist in the dataset produce empty/zero series, and non-numeric values
// coerce to 0.

use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::prelude::*;
use serde_json::Value;
use std::ops::Range;

use crate::dataset::{coerce_number, value_to_label, Dataset};
use crate::spec::{ChartSpec, ChartType};

// Series palette, in assignment order.
const PALETTE: [RGBColor; 7] = [
    RGBColor(0x25, 0x63, 0xeb),
    RGBColor(0xf5, 0x9e, 0x0b),
    RGBColor(0x10, 0xb9, 0x81),
    RGBColor(0xef, 0x44, 0x44),
    RGBColor(0x8b, 0x5c, 0xf6),
    RGBColor(0xec, 0x48, 0x99),
    RGBColor(0x06, 0xb6, 0xd4),
];

/// Render a chart specification to PNG bytes.
///
/// Fails only when there is nothing to draw: an empty dataset, a no-data
/// specification, or an empty y list.
pub fn render_chart(spec: &ChartSpec, data: &Dataset, width: u32, height: u32) -> Result<Vec<u8>> {
    let chart_type = spec
        .chart_type
        .ok_or_else(|| anyhow::anyhow!("Specification carries no chart type"))?;

    if data.is_empty() {
        anyhow::bail!("Cannot render a chart from an empty dataset");
    }
    if spec.y.is_empty() {
        anyhow::bail!("Specification has no y series");
    }

    // Missing columns fall through to null lookups and coerce to 0.
    let series: Vec<(String, Vec<f64>)> = spec
        .y
        .iter()
        .map(|col| (col.clone(), column_numbers(data, col)))
        .collect();

    let x_name = spec.x.clone().unwrap_or_default();
    let labels: Vec<String> = data
        .records
        .iter()
        .map(|r| value_to_label(r.get(&x_name).unwrap_or(&Value::Null)))
        .collect();

    let all_y: Vec<f64> = series.iter().flat_map(|(_, v)| v.iter().copied()).collect();
    let y_range = padded_range(&all_y);
    let n = data.records.len();

    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root =
            BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        match chart_type {
            ChartType::Line => {
                let mut chart = ChartBuilder::on(&root)
                    .margin(10)
                    .caption(&data.name, ("sans-serif", 20))
                    .x_label_area_size(40)
                    .y_label_area_size(50)
                    .build_cartesian_2d(padded_range(&index_axis(n)), y_range)
                    .context("Failed to build chart")?;

                let labels_clone = labels.clone();
                chart
                    .configure_mesh()
                    .x_labels(n.min(12))
                    .x_label_formatter(&|x| index_label(&labels_clone, *x))
                    .x_desc(x_name.clone())
                    .y_desc(spec.y.join(", "))
                    .draw()
                    .context("Failed to draw mesh")?;

                for (i, (_, values)) in series.iter().enumerate() {
                    let color = PALETTE[i % PALETTE.len()];
                    let points: Vec<(f64, f64)> = values
                        .iter()
                        .enumerate()
                        .map(|(idx, &v)| (idx as f64, v))
                        .collect();
                    chart
                        .draw_series(LineSeries::new(points, color.stroke_width(2)))
                        .context("Failed to draw line series")?;
                }
            }
            ChartType::Scatter => {
                // Scatter reads the x column numerically, coercing to 0 like
                // the y extraction does.
                let x_values = column_numbers(data, &x_name);
                let mut chart = ChartBuilder::on(&root)
                    .margin(10)
                    .caption(&data.name, ("sans-serif", 20))
                    .x_label_area_size(40)
                    .y_label_area_size(50)
                    .build_cartesian_2d(padded_range(&x_values), y_range)
                    .context("Failed to build chart")?;

                chart
                    .configure_mesh()
                    .x_desc(x_name.clone())
                    .y_desc(spec.y.join(", "))
                    .draw()
                    .context("Failed to draw mesh")?;

                for (i, (_, values)) in series.iter().enumerate() {
                    let color = PALETTE[i % PALETTE.len()];
                    chart
                        .draw_series(
                            x_values
                                .iter()
                                .zip(values.iter())
                                .map(|(&x, &y)| Circle::new((x, y), 4, color.filled())),
                        )
                        .context("Failed to draw point series")?;
                }
            }
            ChartType::Bar => {
                let mut chart = ChartBuilder::on(&root)
                    .margin(10)
                    .caption(&data.name, ("sans-serif", 20))
                    .x_label_area_size(40)
                    .y_label_area_size(50)
                    .build_cartesian_2d(0.0..n as f64, bar_range(&y_range))
                    .context("Failed to build chart")?;

                let labels_clone = labels.clone();
                chart
                    .configure_mesh()
                    .x_labels(n)
                    .x_label_formatter(&|x| index_label(&labels_clone, *x))
                    .x_desc(x_name.clone())
                    .y_desc(spec.y.join(", "))
                    .draw()
                    .context("Failed to draw mesh")?;

                // Side-by-side bars when more than one series.
                let bar_width = 0.8 / series.len() as f64;
                for (series_idx, (_, values)) in series.iter().enumerate() {
                    let color = PALETTE[series_idx % PALETTE.len()];
                    for (cat_idx, &y_val) in values.iter().enumerate() {
                        let x_offset = (series_idx as f64
                            - (series.len() as f64 - 1.0) / 2.0)
                            * bar_width;
                        let x_center = cat_idx as f64 + 0.5 + x_offset;
                        chart
                            .draw_series(std::iter::once(Rectangle::new(
                                [
                                    (x_center - bar_width / 2.0, 0.0),
                                    (x_center + bar_width / 2.0, y_val),
                                ],
                                color.filled(),
                            )))
                            .context("Failed to draw bar")?;
                    }
                }
            }
            ChartType::Pie | ChartType::Doughnut => {
                // First y series only; slices with nothing to show are skipped.
                let sizes: Vec<f64> = series[0].1.iter().map(|v| v.max(0.0)).collect();
                if sizes.iter().sum::<f64>() > 0.0 {
                    let center = (width as i32 / 2, height as i32 / 2);
                    let radius = (width.min(height) as f64) * 0.35;
                    let colors: Vec<RGBColor> = (0..sizes.len())
                        .map(|i| PALETTE[i % PALETTE.len()])
                        .collect();
                    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
                    pie.label_style(("sans-serif", 16).into_font().color(&BLACK));
                    root.draw(&pie).context("Failed to draw pie")?;

                    if chart_type == ChartType::Doughnut {
                        let hole = (radius * 0.45) as i32;
                        root.draw(&Circle::new(center, hole, WHITE.filled()))
                            .context("Failed to draw doughnut hole")?;
                    }
                }
            }
        }

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

/// Numeric column extraction; a missing column yields all zeros.
fn column_numbers(data: &Dataset, column: &str) -> Vec<f64> {
    data.records
        .iter()
        .map(|r| coerce_number(r.get(column).unwrap_or(&Value::Null)))
        .collect()
}

fn index_axis(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

fn index_label(labels: &[String], x: f64) -> String {
    let idx = x.round() as usize;
    if (x - idx as f64).abs() < 1e-9 && idx < labels.len() {
        labels[idx].clone()
    } else {
        String::new()
    }
}

fn padded_range(values: &[f64]) -> Range<f64> {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if min == max {
        (min - 1.0)..(max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding)..(max + padding)
    }
}

/// Bars are anchored at zero, so the y range must include it.
fn bar_range(y_range: &Range<f64>) -> Range<f64> {
    y_range.start.min(0.0)..y_range.end.max(0.0)
}
