//! Text-onto-template compositing
//!
//! The line is translated to the anchor (plus the alignment offset) and the
//! result is rotated about the template origin, so a non-zero rotation moves
//! the anchor too. Output pixels are inverse-mapped into text space and
//! sampled nearest-cell, so the result is a pure function of its inputs.

use contracts::RenderStyle;
use fontdue::Font;
use image::{Rgba, RgbaImage};
use tracing::{debug, instrument};

use crate::error::{RenderError, Result};
use crate::layout::TextLayout;

/// Render `value` onto a copy of `template`
///
/// # Errors
/// - font size not in `(0, RenderStyle::MAX_FONT_SIZE]`, non-finite rotation
///   or anchor
/// - a character of the value missing from the font
#[instrument(
    name = "renderer_render",
    skip(template, font, style),
    fields(width = template.width(), height = template.height(), size = style.font_size)
)]
pub fn render(
    template: &RgbaImage,
    font: &Font,
    value: i64,
    style: &RenderStyle,
) -> Result<RgbaImage> {
    validate_style(style)?;

    let layout = TextLayout::new(font, &value.to_string(), style.font_size)?;
    let offset = style.alignment.offset(layout.width());
    let placement = Placement::new(style, offset);

    let mut output = template.clone();
    let Some((x0, y0, x1, y1)) = placement.pixel_bounds(&layout, output.width(), output.height())
    else {
        debug!("text falls outside the template");
        return Ok(output);
    };

    let color = rgb(style.color);
    for py in y0..y1 {
        for px in x0..x1 {
            let (tx, ty) = placement.to_text_space(px as f32 + 0.5, py as f32 + 0.5);
            let coverage = layout.coverage_at(tx, ty);
            if coverage > 0 {
                blend(output.get_pixel_mut(px, py), color, coverage);
            }
        }
    }

    Ok(output)
}

fn validate_style(style: &RenderStyle) -> Result<()> {
    if !style.font_size_in_range() {
        return Err(RenderError::InvalidStyle {
            message: format!(
                "font size must be in (0, {}], got {}",
                RenderStyle::MAX_FONT_SIZE,
                style.font_size
            ),
        });
    }
    if !style.rotation_deg.is_finite() {
        return Err(RenderError::InvalidStyle {
            message: "rotation must be finite".into(),
        });
    }
    if !(style.anchor.x.is_finite() && style.anchor.y.is_finite()) {
        return Err(RenderError::InvalidStyle {
            message: "anchor must be finite".into(),
        });
    }
    Ok(())
}

/// Rigid transform text space → image space: translate, then rotate about
/// the origin
struct Placement {
    anchor_x: f32,
    anchor_y: f32,
    offset: f32,
    sin: f32,
    cos: f32,
}

impl Placement {
    fn new(style: &RenderStyle, offset: f32) -> Self {
        let (sin, cos) = style.rotation_deg.to_radians().sin_cos();
        Self {
            anchor_x: style.anchor.x,
            anchor_y: style.anchor.y,
            offset,
            sin,
            cos,
        }
    }

    fn to_image_space(&self, tx: f32, ty: f32) -> (f32, f32) {
        let x = self.anchor_x + self.offset + tx;
        let y = self.anchor_y + ty;
        (self.cos * x - self.sin * y, self.sin * x + self.cos * y)
    }

    fn to_text_space(&self, px: f32, py: f32) -> (f32, f32) {
        let x = self.cos * px + self.sin * py;
        let y = -self.sin * px + self.cos * py;
        (x - self.anchor_x - self.offset, y - self.anchor_y)
    }

    /// Image pixel rectangle `[x0, x1) x [y0, y1)` that can receive ink
    fn pixel_bounds(&self, layout: &TextLayout, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let (left, top, right, bottom) = layout.bounds();
        let corners = [
            self.to_image_space(left, top),
            self.to_image_space(right, top),
            self.to_image_space(left, bottom),
            self.to_image_space(right, bottom),
        ];

        let min_x = corners.iter().map(|c| c.0).fold(f32::INFINITY, f32::min);
        let max_x = corners.iter().map(|c| c.0).fold(f32::NEG_INFINITY, f32::max);
        let min_y = corners.iter().map(|c| c.1).fold(f32::INFINITY, f32::min);
        let max_y = corners.iter().map(|c| c.1).fold(f32::NEG_INFINITY, f32::max);

        let x0 = min_x.floor().max(0.0) as u32;
        let y0 = min_y.floor().max(0.0) as u32;
        let x1 = (max_x.ceil().max(0.0) as u32).min(width);
        let y1 = (max_y.ceil().max(0.0) as u32).min(height);

        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }
}

fn rgb(color: u32) -> [u8; 3] {
    [
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
    ]
}

/// Source-over compositing of an opaque color at `coverage`
fn blend(dst: &mut Rgba<u8>, color: [u8; 3], coverage: u8) {
    let a = u32::from(coverage);
    let inv = 255 - a;
    let dst_a = u32::from(dst[3]);

    let out_a = a * 255 + dst_a * inv;
    if out_a == 0 {
        return;
    }
    for i in 0..3 {
        let src = u32::from(color[i]) * a * 255;
        let below = u32::from(dst[i]) * dst_a * inv;
        dst[i] = ((src + below + out_a / 2) / out_a) as u8;
    }
    dst[3] = ((out_a + 127) / 255) as u8;
}
