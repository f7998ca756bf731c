//! # Font Cache
//!
//! Web font catalog and memoized font loading.
//!
//! Responsibilities:
//! - Parse the web font catalog and look families up by name
//! - Fetch font files on first use and keep one parsed `fontdue::Font` per key
//! - Release every cached font on demand

mod cache;
mod catalog;
mod error;

pub use cache::{parse_font, CacheStats, FontCache};
pub use catalog::{CatalogFont, FontCatalog};
pub use error::{FontError, Result};

pub use fontdue::Font;
