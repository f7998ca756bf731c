//! Single-line text layout
//!
//! Text space has its origin at the top-left of the line box: x grows along
//! the baseline, y grows downward, and the baseline sits at `y = ascent`.

use contracts::RenderStyle;
use fontdue::Font;

use crate::error::{RenderError, Result};

/// Rasterized line of text with its coverage mask
#[derive(Debug, Clone)]
pub struct TextLayout {
    width: f32,
    ascent: f32,
    descent: f32,
    left: i32,
    top: i32,
    mask_width: usize,
    mask_height: usize,
    coverage: Vec<u8>,
}

struct PlacedGlyph {
    x: i32,
    y: i32,
    width: usize,
    height: usize,
    bitmap: Vec<u8>,
}

impl TextLayout {
    /// Lay `text` out on one line at `size` pixels
    ///
    /// `size` must be finite and in `(0, RenderStyle::MAX_FONT_SIZE]`.
    pub fn new(font: &Font, text: &str, size: f32) -> Result<Self> {
        if !(size.is_finite() && size > 0.0 && size <= RenderStyle::MAX_FONT_SIZE) {
            return Err(RenderError::InvalidStyle {
                message: format!("font size out of range: {size}"),
            });
        }

        let (ascent, descent) = match font.horizontal_line_metrics(size) {
            Some(line) => (line.ascent, line.descent),
            None => (size, 0.0),
        };
        let baseline = ascent.round() as i32;

        let mut pen_x = 0.0f32;
        let mut previous: Option<char> = None;
        let mut glyphs = Vec::with_capacity(text.len());

        for c in text.chars() {
            if font.lookup_glyph_index(c) == 0 {
                return Err(RenderError::MissingGlyph(c));
            }
            if let Some(prev) = previous {
                pen_x += font.horizontal_kern(prev, c, size).unwrap_or(0.0);
            }

            let (metrics, bitmap) = font.rasterize(c, size);
            glyphs.push(PlacedGlyph {
                x: (pen_x + metrics.xmin as f32).round() as i32,
                y: baseline - (metrics.ymin + metrics.height as i32),
                width: metrics.width,
                height: metrics.height,
                bitmap,
            });

            pen_x += metrics.advance_width;
            previous = Some(c);
        }

        let line_height = (ascent - descent).ceil() as i32;
        let mut left = 0;
        let mut top = 0;
        let mut right = pen_x.ceil() as i32;
        let mut bottom = line_height;
        for g in &glyphs {
            left = left.min(g.x);
            top = top.min(g.y);
            right = right.max(g.x + g.width as i32);
            bottom = bottom.max(g.y + g.height as i32);
        }

        let mask_width = (right - left).max(0) as usize;
        let mask_height = (bottom - top).max(0) as usize;
        let mut coverage = vec![0u8; mask_width * mask_height];

        for g in &glyphs {
            for (row, line) in g.bitmap.chunks(g.width.max(1)).enumerate() {
                let my = (g.y - top) as usize + row;
                for (col, &value) in line.iter().enumerate() {
                    let mx = (g.x - left) as usize + col;
                    let cell = &mut coverage[my * mask_width + mx];
                    *cell = (*cell).max(value);
                }
            }
        }

        Ok(Self {
            width: pen_x,
            ascent,
            descent,
            left,
            top,
            mask_width,
            mask_height,
            coverage,
        })
    }

    /// Advance width of the whole line, used for alignment
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Line height (ascent - descent)
    pub fn height(&self) -> f32 {
        self.ascent - self.descent
    }

    /// Text-space rectangle covered by the mask: (left, top, right, bottom)
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        (
            self.left as f32,
            self.top as f32,
            (self.left + self.mask_width as i32) as f32,
            (self.top + self.mask_height as i32) as f32,
        )
    }

    /// Coverage (0..=255) of the mask cell containing a text-space point
    pub fn coverage_at(&self, x: f32, y: f32) -> u8 {
        let mx = x.floor() as i64 - i64::from(self.left);
        let my = y.floor() as i64 - i64::from(self.top);
        if mx < 0 || my < 0 || mx >= self.mask_width as i64 || my >= self.mask_height as i64 {
            return 0;
        }
        self.coverage[my as usize * self.mask_width + mx as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontdue::FontSettings;

    const FONT: &[u8] = include_bytes!("../../../assets/fonts/DejaVuSans.ttf");

    fn font() -> Font {
        Font::from_bytes(FONT, FontSettings::default()).unwrap()
    }

    #[test]
    fn test_width_is_sum_of_advances() {
        let font = font();
        let layout = TextLayout::new(&font, "42", 32.0).unwrap();
        let expected = font.metrics('4', 32.0).advance_width
            + font.horizontal_kern('4', '2', 32.0).unwrap_or(0.0)
            + font.metrics('2', 32.0).advance_width;
        assert!((layout.width() - expected).abs() < 1e-3);
    }

    #[test]
    fn test_mask_has_ink() {
        let layout = TextLayout::new(&font(), "8", 40.0).unwrap();
        let (left, top, right, bottom) = layout.bounds();
        let mut inked = 0;
        let mut y = top;
        while y < bottom {
            let mut x = left;
            while x < right {
                if layout.coverage_at(x, y) > 0 {
                    inked += 1;
                }
                x += 1.0;
            }
            y += 1.0;
        }
        assert!(inked > 50);
        assert_eq!(layout.coverage_at(-1000.0, 0.0), 0);
    }

    #[test]
    fn test_empty_text() {
        let layout = TextLayout::new(&font(), "", 32.0).unwrap();
        assert_eq!(layout.width(), 0.0);
        assert!(layout.height() > 0.0);
    }

    #[test]
    fn test_size_out_of_range() {
        for size in [0.0, 1.0e7, f32::NAN] {
            let err = TextLayout::new(&font(), "42", size).unwrap_err();
            assert!(matches!(err, RenderError::InvalidStyle { .. }));
        }
    }

    #[test]
    fn test_missing_glyph() {
        let err = TextLayout::new(&font(), "\u{10FFFD}", 32.0).unwrap_err();
        assert!(matches!(err, RenderError::MissingGlyph(_)));
    }
}
