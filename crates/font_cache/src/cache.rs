//! Insert-once font cache
//!
//! Keyed by (family, variant). Each key owns a `OnceCell`: concurrent callers
//! for the same key wait on a single load, and a failed load leaves the cell
//! empty so the next caller retries.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use contracts::{FontVariant, ResourceFetcher};
use dashmap::DashMap;
use fontdue::{Font, FontSettings};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

use crate::catalog::FontCatalog;
use crate::error::{FontError, Result};

type FontKey = (String, FontVariant);

/// Font handle cache scoped to its owner
pub struct FontCache {
    catalog: Arc<FontCatalog>,
    fonts: DashMap<FontKey, Arc<OnceCell<Arc<Font>>>>,
    loads: AtomicU64,
    hits: AtomicU64,
}

impl FontCache {
    pub fn new(catalog: Arc<FontCatalog>) -> Self {
        Self {
            catalog,
            fonts: DashMap::new(),
            loads: AtomicU64::new(0),
            hits: AtomicU64::new(0),
        }
    }

    pub fn catalog(&self) -> &FontCatalog {
        &self.catalog
    }

    /// Cached font, or fetch + parse it on first request
    ///
    /// # Errors
    /// - family or variant not in the catalog
    /// - font file fetch failure
    /// - bytes not parsable as a font
    #[instrument(name = "font_cache_get", skip(self, fetcher), fields(variant = %variant))]
    pub async fn get_or_load<F>(
        &self,
        family: &str,
        variant: FontVariant,
        fetcher: &F,
    ) -> Result<Arc<Font>>
    where
        F: ResourceFetcher + Sync,
    {
        let url = self.catalog.resolve(family, variant)?;
        let key = (family.to_lowercase(), variant);

        let cell = Arc::clone(self.fonts.entry(key).or_default().value());
        if let Some(font) = cell.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(font));
        }

        let font = cell
            .get_or_try_init(|| async {
                let bytes = fetcher.fetch(url).await?;
                let font = parse_font(&bytes).map_err(|message| FontError::InvalidFont {
                    family: family.to_string(),
                    variant,
                    message,
                })?;
                self.loads.fetch_add(1, Ordering::Relaxed);
                info!(url, size = bytes.len(), "font loaded");
                Ok::<_, FontError>(Arc::new(font))
            })
            .await?;

        Ok(Arc::clone(font))
    }

    /// Drop every cached font
    ///
    /// Loads still in flight finish into a detached cell and are not cached;
    /// callers that need a clean state must not evict concurrently with loads.
    pub fn evict_all(&self) {
        let count = self.fonts.len();
        self.fonts.clear();
        debug!(count, "font cache cleared");
    }

    /// Number of keys with a loaded font
    pub fn len(&self) -> usize {
        self.fonts
            .iter()
            .filter(|entry| entry.value().initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            loads: self.loads.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            cached: self.len(),
        }
    }
}

/// Cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub loads: u64,
    pub hits: u64,
    pub cached: usize,
}

/// Materialize a font from raw TTF/OTF bytes
pub fn parse_font(bytes: &[u8]) -> std::result::Result<Font, String> {
    Font::from_bytes(bytes, FontSettings::default()).map_err(str::to_string)
}
