//! # Renderer
//!
//! Draws an extracted value onto a tenant's template image.
//!
//! Responsibilities:
//! - Lay the value's decimal text out with a `fontdue` font
//! - Place it at the anchor, rotate it about the template origin, and
//!   composite it in the tenant color
//! - Decode templates and encode the result as PNG
//!
//! Rendering is deterministic: the same inputs give byte-identical output.

mod codec;
mod engine;
mod error;
mod layout;

pub use codec::{decode_template, encode_png};
pub use engine::render;
pub use error::{RenderError, Result};
pub use layout::TextLayout;

pub use image::RgbaImage;
