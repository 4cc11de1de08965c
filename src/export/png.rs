use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;

use super::backend::PixelTextBackend;
use super::chart::{draw_chart, ChartLayout};
use super::ChartExporter;
use crate::data::model::{Series, ThresholdSet};

/// Exports the chart as a PNG raster. Drawn at double scale by default so
/// labels stay readable when the image lands in a report.
#[derive(Debug, Clone, Copy)]
pub struct PngExporter {
    scale: u32,
}

impl PngExporter {
    pub fn new(scale: u32) -> Self {
        PngExporter {
            scale: scale.max(1),
        }
    }
}

impl Default for PngExporter {
    fn default() -> Self {
        PngExporter::new(2)
    }
}

impl ChartExporter for PngExporter {
    fn label(&self) -> &'static str {
        "PNG"
    }

    fn extension(&self) -> &'static str {
        "png"
    }

    fn export(
        &self,
        series: &Series,
        thresholds: &ThresholdSet,
        line_rgb: (u8, u8, u8),
        path: &Path,
    ) -> Result<()> {
        let layout = ChartLayout::scaled(self.scale);
        let (width, height) = layout.size();

        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let backend = BitMapBackend::with_buffer(&mut buffer, (width, height));
            let root = PixelTextBackend::new(backend).into_drawing_area();
            draw_chart(root, &layout, series, thresholds, line_rgb)?;
        }

        image::save_buffer(path, &buffer, width, height, image::ExtendedColorType::Rgb8)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::data::model::ThresholdLine;

    use super::*;

    #[test]
    fn exports_a_png_with_doubled_dimensions() {
        let series = Series {
            label: "Hoop Stress (% of SMYS)".to_string(),
            x: vec![0.0, 20.0, 40.0, 60.0],
            y: vec![45.0, 47.5, 44.0, 61.2],
        };
        let thresholds = vec![ThresholdLine {
            y: 60.0,
            x_min: 0.0,
            x_max: 60.0,
        }];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stress.png");
        PngExporter::default()
            .export(&series, &thresholds, (214, 39, 40), &path)
            .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(image::image_dimensions(&path).unwrap(), (2000, 1200));

        // Something must have been drawn over the white background.
        let pixels = image::open(&path).unwrap().into_rgb8();
        assert!(pixels.pixels().any(|p| p.0 != [255, 255, 255]));
    }

    #[test]
    fn handles_an_empty_series() {
        let series = Series {
            label: "Pipe Age".to_string(),
            x: Vec::new(),
            y: Vec::new(),
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        PngExporter::new(1)
            .export(&series, &Vec::new(), (31, 119, 180), &path)
            .unwrap();
        assert!(path.exists());
    }
}
