//! `render` command implementation.
//!
//! Draws a single value with a local font, bypassing the catalog, the data
//! sources and the sinks. Useful to tune a style before subscribing.

use std::path::Path;

use anyhow::{Context, Result};
use contracts::{Alignment, Anchor, FontVariant, RenderStyle};
use renderer::RgbaImage;
use tracing::info;

use crate::cli::{Align, RenderArgs};
use crate::error::CliError;

/// Execute the `render` command
pub fn run_render(args: &RenderArgs) -> Result<()> {
    let output = render_to_file(args)?;
    println!("✓ Banner written to {}", output);
    Ok(())
}

fn render_to_file(args: &RenderArgs) -> Result<String> {
    let font_bytes = std::fs::read(&args.font)
        .with_context(|| format!("Failed to read font {}", args.font.display()))?;
    let font = font_cache::parse_font(&font_bytes)
        .map_err(|message| CliError::invalid_font(args.font.display().to_string(), message))?;

    let template = load_template(args.template.as_deref(), args.width, args.height)?;
    let style = RenderStyle {
        font_family: args.font.display().to_string(),
        font_variant: FontVariant::REGULAR,
        font_size: args.size,
        color: parse_color(&args.color)?,
        rotation_deg: args.rotation,
        alignment: args.align.into(),
        anchor: Anchor {
            x: args.x,
            y: args.y,
        },
    };

    let image = renderer::render(&template, &font, args.value, &style).map_err(CliError::from)?;
    let png = renderer::encode_png(&image).map_err(CliError::from)?;
    std::fs::write(&args.output, &png)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!(
        output = %args.output.display(),
        width = image.width(),
        height = image.height(),
        bytes = png.len(),
        "banner rendered"
    );
    Ok(args.output.display().to_string())
}

fn load_template(path: Option<&Path>, width: u32, height: u32) -> Result<RgbaImage> {
    match path {
        Some(path) => {
            let data = std::fs::read(path)
                .with_context(|| format!("Failed to read template {}", path.display()))?;
            Ok(renderer::decode_template(&data).map_err(CliError::from)?)
        }
        None => {
            if width == 0 || height == 0 {
                return Err(
                    CliError::invalid_argument("width/height", "canvas must not be empty").into(),
                );
            }
            Ok(RgbaImage::new(width, height))
        }
    }
}

/// Parse `RRGGBB` (optionally prefixed with `#` or `0x`)
fn parse_color(value: &str) -> std::result::Result<u32, CliError> {
    let hex = value
        .trim()
        .trim_start_matches('#')
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    if hex.len() != 6 {
        return Err(CliError::invalid_argument(
            "color",
            format!("expected 6 hex digits, got '{value}'"),
        ));
    }
    u32::from_str_radix(hex, 16)
        .map_err(|e| CliError::invalid_argument("color", format!("'{value}': {e}")))
}

impl From<Align> for Alignment {
    fn from(align: Align) -> Self {
        match align {
            Align::Left => Alignment::Left,
            Align::Center => Alignment::Center,
            Align::Right => Alignment::Right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn font_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets/fonts/DejaVuSans.ttf")
    }

    fn args(output: PathBuf) -> RenderArgs {
        RenderArgs {
            font: font_path(),
            template: None,
            width: 200,
            height: 80,
            value: 1234,
            size: 32.0,
            color: "#FF8800".into(),
            rotation: 0.0,
            align: Align::Center,
            x: 100.0,
            y: 20.0,
            output,
        }
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("FFFFFF").unwrap(), 0xFFFFFF);
        assert_eq!(parse_color("#00ff7f").unwrap(), 0x00FF7F);
        assert_eq!(parse_color("0x123456").unwrap(), 0x123456);
        assert!(parse_color("FFF").is_err());
        assert!(parse_color("GGGGGG").is_err());
    }

    #[test]
    fn test_render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("banner.png");
        render_to_file(&args(output.clone())).unwrap();

        let data = std::fs::read(&output).unwrap();
        let image = renderer::decode_template(&data).unwrap();
        assert_eq!((image.width(), image.height()), (200, 80));
        assert!(image.pixels().any(|p| p[3] > 0));
    }

    #[test]
    fn test_render_uses_template() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template.png");
        let png = renderer::encode_png(&RgbaImage::new(64, 32)).unwrap();
        std::fs::write(&template, &png).unwrap();

        let output = dir.path().join("out.png");
        let mut args = args(output.clone());
        args.template = Some(template);
        args.x = 2.0;
        args.align = Align::Left;
        render_to_file(&args).unwrap();

        let image = renderer::decode_template(&std::fs::read(&output).unwrap()).unwrap();
        assert_eq!((image.width(), image.height()), (64, 32));
    }

    #[test]
    fn test_invalid_font_file() {
        let dir = tempfile::tempdir().unwrap();
        let font = dir.path().join("broken.ttf");
        std::fs::write(&font, b"not a font").unwrap();

        let mut args = args(dir.path().join("out.png"));
        args.font = font;
        let err = render_to_file(&args).unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
    }
}
