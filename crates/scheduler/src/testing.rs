//! Test doubles shared by the unit tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use contracts::{
    Alignment, Anchor, BannerSink, ContractError, FontVariant, RenderStyle, RenderedBanner,
    ResourceFetcher, TenantId, TenantSubscription,
};
use chrono::{DateTime, Utc};
use font_cache::{FontCache, FontCatalog};
use renderer::{encode_png, RgbaImage};

pub const FONT: &[u8] = include_bytes!("../../../assets/fonts/DejaVuSans.ttf");
pub const FONT_URL: &str = "https://fonts.test/dejavu.ttf";
pub const TEMPLATE_URL: &str = "https://assets.test/template.png";

/// Fetcher serving fixed bodies and counting calls per URL
#[derive(Default)]
pub struct MapFetcher {
    resources: HashMap<String, Bytes>,
    calls: Mutex<HashMap<String, usize>>,
    delay: Duration,
}

impl MapFetcher {
    pub fn with(mut self, url: &str, body: impl Into<Bytes>) -> Self {
        self.resources.insert(url.to_string(), body.into());
        self
    }

    /// Template image and font file
    pub fn with_assets(self) -> Self {
        let template = encode_png(&RgbaImage::new(200, 80)).unwrap();
        self.with(TEMPLATE_URL, template)
            .with(FONT_URL, Bytes::from_static(FONT))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

impl ResourceFetcher for MapFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, ContractError> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.resources
            .get(url)
            .cloned()
            .ok_or_else(|| ContractError::fetch(url, "404 Not Found"))
    }
}

/// Font cache whose catalog serves DejaVu Sans from [`FONT_URL`]
pub fn font_cache() -> Arc<FontCache> {
    let catalog = format!(
        r#"{{"items": [{{"family": "DejaVu Sans", "variants": ["regular"], "files": {{"regular": "{FONT_URL}"}}}}]}}"#
    );
    Arc::new(FontCache::new(Arc::new(
        FontCatalog::from_json(&catalog).unwrap(),
    )))
}

pub fn subscription(id: TenantId, source: &str, selector: &str) -> TenantSubscription {
    TenantSubscription {
        id,
        enabled: true,
        source: source.into(),
        selector: selector.to_string(),
        template: TEMPLATE_URL.to_string(),
        style: RenderStyle {
            font_family: "DejaVu Sans".into(),
            font_variant: FontVariant::REGULAR,
            font_size: 32.0,
            color: 0xFFFFFF,
            rotation_deg: 0.0,
            alignment: Alignment::Center,
            anchor: Anchor { x: 100.0, y: 20.0 },
        },
        interval_minutes: 5,
        next_run: DateTime::<Utc>::UNIX_EPOCH,
    }
}

/// Sink remembering `(tenant, value)` of every banner
#[derive(Clone)]
pub struct RecordingSink {
    name: String,
    fail: bool,
    published: Arc<Mutex<Vec<(TenantId, i64)>>>,
}

impl RecordingSink {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fail: false,
            published: Arc::default(),
        }
    }

    pub fn failing(name: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(name)
        }
    }

    /// Published banners, sorted by tenant
    pub fn published(&self) -> Vec<(TenantId, i64)> {
        let mut published = self.published.lock().unwrap().clone();
        published.sort();
        published
    }
}

impl BannerSink for RecordingSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&self, banner: &RenderedBanner) -> Result<(), ContractError> {
        if self.fail {
            return Err(ContractError::sink_write(&self.name, "upload rejected"));
        }
        self.published
            .lock()
            .unwrap()
            .push((banner.tenant_id, banner.value));
        Ok(())
    }
}
