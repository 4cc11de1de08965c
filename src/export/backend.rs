use plotters_backend::text_anchor::{HPos, VPos};
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
};

// ---------------------------------------------------------------------------
// PixelTextBackend – text rendering without a font stack
// ---------------------------------------------------------------------------

/// Wraps a raster backend and renders text from a built-in pixel font.
///
/// The compiled plotters font stack can lay text out but not rasterize it,
/// so every bitmap target routes `draw_text` through this wrapper. Vector
/// targets (SVG) emit native text elements and do not need it.
pub struct PixelTextBackend<DB> {
    inner: DB,
}

impl<DB> PixelTextBackend<DB> {
    pub fn new(inner: DB) -> Self {
        Self { inner }
    }
}

impl<DB: DrawingBackend> DrawingBackend for PixelTextBackend<DB> {
    type ErrorType = DB::ErrorType;

    fn get_size(&self) -> (u32, u32) {
        self.inner.get_size()
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.ensure_prepared()
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.present()
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_pixel(point, color)
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_line(from, to, style)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_rect(upper_left, bottom_right, style, fill)
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_path(path, style)
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_circle(center, radius, style, fill)
    }

    fn blit_bitmap(
        &mut self,
        pos: BackendCoord,
        (iw, ih): (u32, u32),
        src: &[u8],
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.blit_bitmap(pos, (iw, ih), src)
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        self.inner.estimate_text_size(text, style)
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        let color = style.color();
        if color.alpha == 0.0 || text.trim().is_empty() {
            return Ok(());
        }

        let ((min_x, min_y), (max_x, max_y)) = style
            .layout_box(text)
            .map_err(|e| DrawingErrorKind::FontError(Box::new(e)))?;
        let height = (max_y - min_y).max(1);
        let scale = (height as f64 / GLYPH_HEIGHT as f64).max(1.0).round() as i32;

        let width = max_x - min_x;
        let dx = match style.anchor().h_pos {
            HPos::Left => 0,
            HPos::Right => -width,
            HPos::Center => -width / 2,
        };
        let dy = match style.anchor().v_pos {
            VPos::Top => 0,
            VPos::Center => -(height / 2),
            VPos::Bottom => -height,
        };

        let top = pos.1 + dy - min_y;
        let mut cursor = pos.0 + dx - min_x;
        for ch in text.chars() {
            let Some(glyph) = glyph(ch) else {
                cursor += scale * SPACE_WIDTH;
                continue;
            };
            for (row, bits) in glyph.rows.iter().enumerate() {
                for col in 0..glyph.width {
                    if bits & (1 << (glyph.width - 1 - col)) == 0 {
                        continue;
                    }
                    let x = cursor + col * scale;
                    let y = top + row as i32 * scale;
                    self.inner
                        .draw_rect((x, y), (x + scale - 1, y + scale - 1), &color, true)?;
                }
            }
            cursor += scale * (glyph.width + 1);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Built-in pixel font
// ---------------------------------------------------------------------------

const GLYPH_HEIGHT: i32 = 7;
const SPACE_WIDTH: i32 = 3;

/// Row-major bitmap, most significant bit is the leftmost column.
#[derive(Clone, Copy)]
struct Glyph {
    width: i32,
    rows: [u8; 7],
}

const fn g(width: i32, rows: [u8; 7]) -> Glyph {
    Glyph { width, rows }
}

/// Glyphs for everything the axis labels, titles and tick numbers use.
/// Letters fold to uppercase; anything missing advances like a space.
#[rustfmt::skip]
fn glyph(ch: char) -> Option<Glyph> {
    Some(match ch.to_ascii_uppercase() {
        'A' => g(5, [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'B' => g(5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
        'C' => g(5, [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
        'D' => g(5, [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110]),
        'E' => g(5, [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
        'F' => g(5, [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
        'G' => g(5, [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
        'H' => g(5, [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'I' => g(3, [0b111, 0b010, 0b010, 0b010, 0b010, 0b010, 0b111]),
        'J' => g(5, [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100]),
        'K' => g(5, [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
        'L' => g(5, [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
        'M' => g(5, [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
        'N' => g(5, [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001]),
        'O' => g(5, [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        'P' => g(5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
        'Q' => g(5, [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101]),
        'R' => g(5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
        'S' => g(5, [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
        'T' => g(5, [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
        'U' => g(5, [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        'V' => g(5, [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
        'W' => g(5, [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b11011, 0b10001]),
        'X' => g(5, [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
        'Y' => g(5, [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100]),
        'Z' => g(5, [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
        '0' => g(5, [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
        '1' => g(3, [0b010, 0b110, 0b010, 0b010, 0b010, 0b010, 0b111]),
        '2' => g(5, [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
        '3' => g(5, [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110]),
        '4' => g(5, [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
        '5' => g(5, [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
        '6' => g(5, [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
        '7' => g(5, [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
        '8' => g(5, [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
        '9' => g(5, [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
        '.' => g(2, [0b00, 0b00, 0b00, 0b00, 0b00, 0b11, 0b11]),
        ',' => g(2, [0b00, 0b00, 0b00, 0b00, 0b01, 0b01, 0b10]),
        ':' => g(2, [0b00, 0b11, 0b11, 0b00, 0b11, 0b11, 0b00]),
        '-' => g(4, [0b0000, 0b0000, 0b0000, 0b1111, 0b0000, 0b0000, 0b0000]),
        '%' => g(5, [0b11000, 0b11001, 0b00010, 0b00100, 0b01000, 0b10011, 0b00011]),
        '(' => g(3, [0b001, 0b010, 0b100, 0b100, 0b100, 0b010, 0b001]),
        ')' => g(3, [0b100, 0b010, 0b001, 0b001, 0b001, 0b010, 0b100]),
        '/' => g(5, [0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000]),
        '°' => g(3, [0b010, 0b101, 0b010, 0b000, 0b000, 0b000, 0b000]),
        'Ω' => g(5, [0b01110, 0b10001, 0b10001, 0b10001, 0b01010, 0b01010, 0b11011]),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use plotters::prelude::*;

    use super::*;
    use crate::data::catalog::ColumnCatalog;
    use crate::export::chart::chart_title;

    #[derive(Default)]
    struct Recording {
        pixels: Vec<BackendCoord>,
    }

    impl DrawingBackend for Recording {
        type ErrorType = std::convert::Infallible;

        fn get_size(&self) -> (u32, u32) {
            (400, 100)
        }

        fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
            Ok(())
        }

        fn present(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
            Ok(())
        }

        fn draw_pixel(
            &mut self,
            point: BackendCoord,
            color: BackendColor,
        ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
            if color.alpha > 0.0 {
                self.pixels.push(point);
            }
            Ok(())
        }
    }

    fn test_style() -> TextStyle<'static> {
        TextStyle::from(("sans-serif", 14).into_font()).color(&BLACK)
    }

    #[test]
    fn draw_text_rasterizes_without_a_font() {
        let mut backend = PixelTextBackend::new(Recording::default());
        backend
            .draw_text("OFF PSP 0.85", &test_style(), (20, 40))
            .unwrap();
        assert!(backend.inner.pixels.len() > 50);
    }

    #[test]
    fn blank_and_unknown_text_draws_nothing() {
        let mut backend = PixelTextBackend::new(Recording::default());
        backend.draw_text("   ", &test_style(), (5, 5)).unwrap();
        backend.draw_text("世界", &test_style(), (5, 5)).unwrap();
        assert!(backend.inner.pixels.is_empty());
    }

    #[test]
    fn every_chart_label_is_representable() {
        for measurement in ColumnCatalog::standard().entries() {
            for ch in chart_title(&measurement.label).chars() {
                assert!(
                    ch == ' ' || glyph(ch).is_some(),
                    "no glyph for {ch:?} in label {:?}",
                    measurement.label
                );
            }
        }
        for ch in "0123456789.-,:%/()".chars() {
            assert!(glyph(ch).is_some());
        }
    }
}
