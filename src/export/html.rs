use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;
use serde::Serialize;

use super::chart::{axis_ranges, chart_title, draw_chart, AxisRanges, ChartLayout};
use super::ChartExporter;
use crate::data::model::{Series, ThresholdLine, ThresholdSet};

/// Exports the chart as one self-contained HTML page: an inline SVG plus a
/// short script that reads off the nearest station under the cursor.
/// Nothing is fetched at view time, so the file can be mailed around.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlExporter;

/// Everything the inline script needs, embedded as one JSON object.
#[derive(Serialize)]
struct ChartPayload<'a> {
    series: &'a Series,
    thresholds: &'a [ThresholdLine],
    ranges: AxisRanges,
    plot: PlotRect,
    width: u32,
    height: u32,
}

/// Pixel rectangle of the data area inside the SVG.
#[derive(Serialize)]
struct PlotRect {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl ChartExporter for HtmlExporter {
    fn label(&self) -> &'static str {
        "HTML"
    }

    fn extension(&self) -> &'static str {
        "html"
    }

    fn export(
        &self,
        series: &Series,
        thresholds: &ThresholdSet,
        line_rgb: (u8, u8, u8),
        path: &Path,
    ) -> Result<()> {
        let layout = ChartLayout::embedded();

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, layout.size()).into_drawing_area();
            draw_chart(root, &layout, series, thresholds, line_rgb)?;
        }

        let (left, top, right, bottom) = layout.plot_rect();
        let payload = ChartPayload {
            series,
            thresholds,
            ranges: axis_ranges(series, thresholds),
            plot: PlotRect {
                left,
                top,
                right,
                bottom,
            },
            width: layout.width,
            height: layout.height,
        };
        let payload_json = serde_json::to_string(&payload).context("serializing chart payload")?;

        let html = render_page(&chart_title(&series.label), &svg, &payload_json)?;
        let mut w = BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        );
        w.write_all(html.as_bytes())
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

fn render_page(title: &str, svg: &str, payload_json: &str) -> Result<String> {
    let mut html = String::with_capacity(svg.len() + 8 * 1024);

    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"en\">")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"utf-8\"/>")?;
    writeln!(html, "<title>{title}</title>")?;
    writeln!(html, "<style>")?;
    writeln!(
        html,
        "body{{font-family:Arial,Helvetica,sans-serif;margin:20px;color:#222;background:#fff;}}"
    )?;
    writeln!(html, "h1{{margin:0 0 12px 0;font-size:22px;}}")?;
    writeln!(html, "svg{{background:#fff;border:1px solid #e5e5e5;}}")?;
    writeln!(
        html,
        "#readout{{color:#444;font-size:13px;margin-top:6px;min-height:18px;}}"
    )?;
    writeln!(html, "</style>")?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;
    writeln!(html, "<h1>{title}</h1>")?;
    writeln!(html, "<div id=\"chart\">")?;
    html.push_str(svg);
    writeln!(html)?;
    writeln!(html, "</div>")?;
    writeln!(html, "<div id=\"readout\">{IDLE_READOUT}</div>")?;
    writeln!(html, "<script>")?;
    writeln!(html, "const CHART = {payload_json};")?;
    writeln!(html, "const IDLE = {IDLE_READOUT:?};")?;
    html.push_str(HOVER_SCRIPT);
    writeln!(html, "</script>")?;
    writeln!(html, "</body></html>")?;

    Ok(html)
}

const IDLE_READOUT: &str = "Hover over the chart to read station values.";

/// Maps the cursor back to data space through the plot rectangle and shows
/// the nearest station's value. Plain DOM, no libraries.
const HOVER_SCRIPT: &str = r#"
(function () {
  const svg = document.querySelector('#chart svg');
  const readout = document.getElementById('readout');
  if (!svg || !readout) { return; }
  const plot = CHART.plot;
  const xs = CHART.series.x;
  const ys = CHART.series.y;

  svg.addEventListener('mousemove', function (ev) {
    const rect = svg.getBoundingClientRect();
    const px = (ev.clientX - rect.left) * (CHART.width / rect.width);
    const py = (ev.clientY - rect.top) * (CHART.height / rect.height);
    if (px < plot.left || px > plot.right || py < plot.top || py > plot.bottom) {
      readout.textContent = IDLE;
      return;
    }
    const fx = (px - plot.left) / (plot.right - plot.left);
    const dataX = CHART.ranges.x_min + fx * (CHART.ranges.x_max - CHART.ranges.x_min);
    let best = -1;
    let bestDist = Infinity;
    for (let i = 0; i < xs.length; i++) {
      const d = Math.abs(xs[i] - dataX);
      if (Number.isFinite(d) && d < bestDist) {
        bestDist = d;
        best = i;
      }
    }
    if (best < 0) {
      readout.textContent = IDLE;
      return;
    }
    readout.textContent =
      'Stationing ' + xs[best].toFixed(1) + ' m, ' +
      CHART.series.label + ': ' + ys[best].toFixed(3);
  });

  svg.addEventListener('mouseleave', function () {
    readout.textContent = IDLE;
  });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn psp_chart() -> (Series, ThresholdSet) {
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
    fn page_is_self_contained() {
        let (series, thresholds) = psp_chart();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("psp.html");

        HtmlExporter
            .export(&series, &thresholds, (31, 119, 180), &path)
            .unwrap();

        let page = std::fs::read_to_string(&path).unwrap();
        assert!(page.contains("<svg"));
        assert!(page.contains("const CHART = "));
        assert!(page.contains("Stationing vs OFF PSP (-ve Volt)"));
        // Everything inline: no external scripts, styles or imports.
        assert!(!page.contains("<script src="));
        assert!(!page.contains("<link"));
        assert!(!page.contains("@import"));
    }

    #[test]
    fn payload_carries_data_and_thresholds() {
        let (series, thresholds) = psp_chart();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("psp.html");

        HtmlExporter
            .export(&series, &thresholds, (31, 119, 180), &path)
            .unwrap();

        let page = std::fs::read_to_string(&path).unwrap();
        assert!(page.contains("\"y\":0.85"));
        assert!(page.contains("\"y\":1.2"));
        assert!(page.contains("\"x\":[0.0,20.0,40.0]"));
        assert!(page.contains("\"plot\""));
        assert!(page.contains("\"ranges\""));
    }
}
