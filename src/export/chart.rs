use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use serde::Serialize;

use crate::data::catalog::STATIONING_COLUMN;
use crate::data::model::{Series, ThresholdSet};

// Base geometry at scale 1. Everything a renderer needs to know about pixel
// placement lives in `ChartLayout`, so the HTML page can map cursor
// positions back to data space without parsing the SVG.
const BASE_WIDTH: u32 = 1000;
const BASE_HEIGHT: u32 = 600;
const BASE_MARGIN: u32 = 10;
const BASE_TITLE_AREA: u32 = 34;
const BASE_Y_LABEL_AREA: u32 = 60;
const BASE_X_LABEL_AREA: u32 = 40;

/// The exported chart's title, mirroring the on-screen plot.
pub fn chart_title(label: &str) -> String {
    format!("Stationing vs {label}")
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Fixed pixel geometry of an exported chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    margin: u32,
    title_area: u32,
    y_label_area: u32,
    x_label_area: u32,
}

impl ChartLayout {
    /// Layout with an in-chart title strip, everything multiplied by
    /// `scale`. Raster export uses scale 2 for a crisper image.
    pub fn scaled(scale: u32) -> Self {
        let s = scale.max(1);
        ChartLayout {
            width: BASE_WIDTH * s,
            height: BASE_HEIGHT * s,
            scale: s,
            margin: BASE_MARGIN * s,
            title_area: BASE_TITLE_AREA * s,
            y_label_area: BASE_Y_LABEL_AREA * s,
            x_label_area: BASE_X_LABEL_AREA * s,
        }
    }

    /// Layout without the title strip, for charts embedded in a page that
    /// carries its own heading.
    pub fn embedded() -> Self {
        ChartLayout {
            title_area: 0,
            ..Self::scaled(1)
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The data rectangle in pixels as (left, top, right, bottom); axis
    /// label strips and the title strip are outside of it.
    pub fn plot_rect(&self) -> (i32, i32, i32, i32) {
        (
            (self.margin + self.y_label_area) as i32,
            (self.margin + self.title_area) as i32,
            (self.width - self.margin) as i32,
            (self.height - self.margin - self.x_label_area) as i32,
        )
    }
}

// ---------------------------------------------------------------------------
// Axis ranges
// ---------------------------------------------------------------------------

/// Data-space extent of the chart, padded so markers and threshold lines do
/// not sit on the frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRanges {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

pub fn axis_ranges(series: &Series, thresholds: &ThresholdSet) -> AxisRanges {
    let (x_min, x_max) = padded(finite_bounds(series.x.iter().copied()), 0.02);
    let ys = series
        .y
        .iter()
        .copied()
        .chain(thresholds.iter().map(|t| t.y));
    let (y_min, y_max) = padded(finite_bounds(ys), 0.05);
    AxisRanges {
        x_min,
        x_max,
        y_min,
        y_max,
    }
}

fn finite_bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn padded(bounds: Option<(f64, f64)>, fraction: f64) -> (f64, f64) {
    match bounds {
        None => (0.0, 1.0),
        Some((lo, hi)) if lo == hi => (lo - 0.5, hi + 0.5),
        Some((lo, hi)) => {
            let pad = (hi - lo) * fraction;
            (lo - pad, hi + pad)
        }
    }
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// Draw the survey chart onto any plotters drawing area: line with markers
/// in the measurement colour, red dashed threshold lines spanning the data,
/// axis labels, legend, and (layout permitting) the title strip.
///
/// The area's size must match `layout`, or the pixel geometry the HTML
/// readout relies on drifts.
pub fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    layout: &ChartLayout,
    series: &Series,
    thresholds: &ThresholdSet,
    line_rgb: (u8, u8, u8),
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let s = layout.scale;
    let ranges = axis_ranges(series, thresholds);

    root.fill(&WHITE)?;

    if layout.title_area > 0 {
        let title_font = FontDesc::new(FontFamily::SansSerif, (20 * s) as f64, FontStyle::Normal);
        root.draw(&Text::new(
            chart_title(&series.label),
            (
                (layout.width / 2) as i32,
                (layout.margin + layout.title_area / 2) as i32,
            ),
            title_font
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center)),
        ))?;
    }

    let mut chart = ChartBuilder::on(&root)
        .margin(layout.margin as i32)
        .set_label_area_size(LabelAreaPosition::Top, layout.title_area as i32)
        .set_label_area_size(LabelAreaPosition::Left, layout.y_label_area as i32)
        .set_label_area_size(LabelAreaPosition::Bottom, layout.x_label_area as i32)
        .build_cartesian_2d(ranges.x_min..ranges.x_max, ranges.y_min..ranges.y_max)?;

    let label_font = FontDesc::new(FontFamily::SansSerif, (13 * s) as f64, FontStyle::Normal);
    chart
        .configure_mesh()
        .x_desc(STATIONING_COLUMN)
        .y_desc(&series.label)
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_label_formatter(&|v| format!("{v:.2}"))
        .label_style(label_font.clone().color(&BLACK.mix(0.85)))
        .axis_desc_style(label_font.clone().color(&BLACK))
        .draw()?;

    let color = RGBColor(line_rgb.0, line_rgb.1, line_rgb.2);
    let line_style = ShapeStyle {
        color: color.to_rgba(),
        filled: false,
        stroke_width: 2 * s,
    };
    chart
        .draw_series(LineSeries::new(
            series.x.iter().copied().zip(series.y.iter().copied()),
            line_style,
        ))?
        .label(series.label.clone())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

    // Markers on top of the line, matching the on-screen plot's
    // line-plus-points style.
    let marker_style = ShapeStyle {
        color: color.to_rgba(),
        filled: true,
        stroke_width: 1,
    };
    chart.draw_series(
        series
            .x
            .iter()
            .copied()
            .zip(series.y.iter().copied())
            .map(|(x, y)| Circle::new((x, y), (2 * s) as i32, marker_style)),
    )?;

    let threshold_style = ShapeStyle {
        color: RED.to_rgba(),
        filled: false,
        stroke_width: 2 * s,
    };
    for line in thresholds {
        chart.draw_series(DashedLineSeries::new(
            [(line.x_min, line.y), (line.x_max, line.y)],
            (6 * s) as i32,
            (10 * s) as i32,
            threshold_style,
        ))?;
    }

    let legend_font = FontDesc::new(FontFamily::SansSerif, (13 * s) as f64, FontStyle::Normal);
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.7))
        .border_style(&BLACK.mix(0.3))
        .label_font(legend_font.color(&BLACK))
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::data::model::ThresholdLine;

    fn psp_series() -> (Series, ThresholdSet) {
        let series = Series {
            label: "OFF PSP (-ve Volt)".to_string(),
            x: vec![0.0, 20.0, 40.0],
            y: vec![1.05, 0.98, 1.10],
        };
        let thresholds = vec![
            ThresholdLine {
                y: 0.85,
                x_min: 0.0,
                x_max: 40.0,
            },
            ThresholdLine {
                y: 1.2,
                x_min: 0.0,
                x_max: 40.0,
            },
        ];
        (series, thresholds)
    }

    #[test]
    fn title_follows_the_measurement_label() {
        assert_eq!(
            chart_title("Hoop Stress (% of SMYS)"),
            "Stationing vs Hoop Stress (% of SMYS)"
        );
    }

    #[test]
    fn y_range_covers_thresholds_beyond_the_data() {
        let (series, thresholds) = psp_series();
        let ranges = axis_ranges(&series, &thresholds);
        // 1.2 sits above every data point but must stay visible.
        assert!(ranges.y_max > 1.2);
        assert!(ranges.y_min < 0.85);
        assert!(ranges.x_min < 0.0 && ranges.x_max > 40.0);
    }

    #[test]
    fn ranges_ignore_non_finite_values() {
        let series = Series {
            label: "Depth (mm)".to_string(),
            x: vec![0.0, f64::NAN, 100.0],
            y: vec![2.0, 3.0, f64::INFINITY],
        };
        let ranges = axis_ranges(&series, &Vec::new());
        assert_relative_eq!(ranges.x_min, -2.0);
        assert_relative_eq!(ranges.x_max, 102.0);
        assert_relative_eq!(ranges.y_min, 2.0 - 0.05);
        assert_relative_eq!(ranges.y_max, 3.0 + 0.05);
    }

    #[test]
    fn degenerate_and_empty_ranges_still_span() {
        let flat = Series {
            label: "Pipe Age".to_string(),
            x: vec![500.0],
            y: vec![37.0],
        };
        let ranges = axis_ranges(&flat, &Vec::new());
        assert!(ranges.x_min < ranges.x_max);
        assert!(ranges.y_min < ranges.y_max);

        let empty = Series {
            label: "Pipe Age".to_string(),
            x: Vec::new(),
            y: Vec::new(),
        };
        let ranges = axis_ranges(&empty, &Vec::new());
        assert_eq!((ranges.x_min, ranges.x_max), (0.0, 1.0));
        assert_eq!((ranges.y_min, ranges.y_max), (0.0, 1.0));
    }

    #[test]
    fn plot_rect_scales_with_layout() {
        let base = ChartLayout::scaled(1);
        let (l, t, r, b) = base.plot_rect();
        assert_eq!((l, t), (70, 44));
        assert_eq!((r, b), (990, 550));

        let double = ChartLayout::scaled(2);
        assert_eq!(double.size(), (2000, 1200));
        assert_eq!(double.plot_rect(), (140, 88, 1980, 1100));

        let embedded = ChartLayout::embedded();
        assert_eq!(embedded.plot_rect().1, 10);
    }

    #[test]
    fn draws_into_an_svg_area() {
        let (series, thresholds) = psp_series();
        let layout = ChartLayout::embedded();
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, layout.size()).into_drawing_area();
            draw_chart(root, &layout, &series, &thresholds, (31, 119, 180)).unwrap();
        }
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("</svg>"));
        // Threshold dashes come out as short red path segments.
        assert!(svg.to_ascii_lowercase().contains("#ff0000"));
    }
}
