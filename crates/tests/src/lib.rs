//! # Integration Tests
//!
//! End-to-end tests across the workspace crates, without network access.
//!
//! Covers:
//! - configuration file → scheduler wiring
//! - shared data sources fetched once per tick
//! - `ddb://` guild routes, invalid targets and the file sink

#[cfg(test)]
mod support {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use bytes::Bytes;
    use contracts::{BannerSink, ContractError, RenderedBanner, ResourceFetcher, TenantId};
    use font_cache::{FontCache, FontCatalog};
    use renderer::{encode_png, RgbaImage};

    pub const FONT: &[u8] = include_bytes!("../../../assets/fonts/DejaVuSans.ttf");
    pub const FONT_URL: &str = "https://fonts.test/dejavu.ttf";
    pub const TEMPLATE_URL: &str = "https://assets.test/template.png";

    /// In-memory web: fixed bodies, call counts per URL
    #[derive(Default)]
    pub struct FakeWeb {
        resources: HashMap<String, Bytes>,
        calls: Mutex<HashMap<String, usize>>,
    }

    impl FakeWeb {
        pub fn new() -> Self {
            let template = encode_png(&RgbaImage::new(240, 90)).unwrap();
            Self::default()
                .with(TEMPLATE_URL, template)
                .with(FONT_URL, Bytes::from_static(FONT))
        }

        pub fn with(mut self, url: &str, body: impl Into<Bytes>) -> Self {
            self.resources.insert(url.to_string(), body.into());
            self
        }

        pub fn calls(&self, url: &str) -> usize {
            self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
        }
    }

    impl ResourceFetcher for FakeWeb {
        async fn fetch(&self, url: &str) -> Result<Bytes, ContractError> {
            *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;
            self.resources
                .get(url)
                .cloned()
                .ok_or_else(|| ContractError::fetch(url, "404 Not Found"))
        }
    }

    /// Sink keeping `(tenant, value)` pairs
    #[derive(Clone, Default)]
    pub struct Collector {
        published: Arc<Mutex<Vec<(TenantId, i64)>>>,
    }

    impl Collector {
        pub fn published(&self) -> Vec<(TenantId, i64)> {
            let mut published = self.published.lock().unwrap().clone();
            published.sort();
            published
        }
    }

    impl BannerSink for Collector {
        fn name(&self) -> &str {
            "collector"
        }

        async fn publish(&self, banner: &RenderedBanner) -> Result<(), ContractError> {
            self.published
                .lock()
                .unwrap()
                .push((banner.tenant_id, banner.value));
            Ok(())
        }
    }

    pub fn font_cache() -> Arc<FontCache> {
        let catalog = format!(
            r#"{{"items": [{{"family": "DejaVu Sans", "variants": ["regular"], "files": {{"regular": "{FONT_URL}"}}}}]}}"#
        );
        Arc::new(FontCache::new(Arc::new(
            FontCatalog::from_json(&catalog).unwrap(),
        )))
    }

    /// `[[subscriptions]]` entry in TOML
    pub fn subscription_toml(id: u64, source: &str, selector: &str) -> String {
        format!(
            r#"
[[subscriptions]]
id = {id}
source = "{source}"
selector = "{selector}"
template = "{TEMPLATE_URL}"
interval_minutes = 5

[subscriptions.style]
font_family = "dejavu sans"
font_size = 28.0
color = 0xFFCC00
alignment = "center"
anchor = {{ x = 120.0, y = 30.0 }}
"#
        )
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;

    use chrono::{TimeDelta, TimeZone, Utc};
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{Platform, ServiceBlueprint};
    use scheduler::{create_sinks, MemoryStore, SchedulerBuilder, StaticPlatform};

    use crate::support::{font_cache, subscription_toml, Collector, FakeWeb};

    const COUNT_URL: &str = "https://example.test/count";

    fn blueprint(body: &str) -> ServiceBlueprint {
        let content = format!(
            r#"
[scheduler]
tick_period_secs = 60
worker_slots = 3

[fonts]
catalog_path = "fonts.json"
{body}"#
        );
        ConfigLoader::load_from_str(&content, ConfigFormat::Toml).unwrap()
    }

    /// Two tenants on one HTTP document: one fetch, two different values
    #[tokio::test]
    async fn test_shared_source_two_selectors() {
        let bp = blueprint(&format!(
            r#"
[[sinks]]
name = "console"
sink_type = "log"

[[guilds]]
id = 1

[[guilds]]
id = 2
{}{}"#,
            subscription_toml(1, COUNT_URL, "$.count"),
            subscription_toml(2, COUNT_URL, "$.total"),
        ));

        let web = Arc::new(FakeWeb::new().with(COUNT_URL, r#"{"count": 5, "total": 9}"#));
        let collector = Collector::default();
        let platform: Arc<dyn Platform> = Arc::new(StaticPlatform::new(&bp.guilds));

        let scheduler = SchedulerBuilder::new(
            bp.scheduler.clone(),
            MemoryStore::new(bp.subscriptions.clone()),
            Arc::clone(&web),
            platform,
            font_cache(),
        )
        .sink(collector.clone())
        .build()
        .unwrap();

        let stats = scheduler.run_tick(Utc::now()).await.unwrap();

        assert_eq!(stats.due, 2);
        assert_eq!(stats.groups, 1);
        assert_eq!(stats.rendered, 2);
        assert_eq!(collector.published(), vec![(1, 5), (2, 9)]);
        assert_eq!(web.calls(COUNT_URL), 1);
        assert_eq!(scheduler.fonts().stats().loads, 1);
    }

    /// Guild route through the file sink; a guild without the banner
    /// feature is reported and gets no file
    #[tokio::test]
    async fn test_guild_route_to_file_sink() {
        let dir = tempfile::tempdir().unwrap();
        let bp = blueprint(&format!(
            r#"
[[sinks]]
name = "disk"
sink_type = "file"
params = {{ base_path = "{}" }}

[[guilds]]
id = 10
name = "Ten"
humans = {{ online = 3, idle = 1, offline = 2 }}
bots = {{ online = 1 }}

[[guilds]]
id = 11
name = "Eleven"
features = []
{}{}"#,
            dir.path().display(),
            subscription_toml(10, "ddb://guild/members/count", "$.humans.not_offline"),
            subscription_toml(11, "ddb://guild/members/count", "$.all"),
        ));

        let store = MemoryStore::new(bp.subscriptions.clone());
        let platform: Arc<dyn Platform> = Arc::new(StaticPlatform::new(&bp.guilds));
        let scheduler = SchedulerBuilder::new(
            bp.scheduler.clone(),
            store,
            Arc::new(FakeWeb::new()),
            platform,
            font_cache(),
        )
        .sinks(create_sinks(&bp.sinks).unwrap())
        .build()
        .unwrap();

        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let stats = scheduler.run_tick(now).await.unwrap();

        assert_eq!(stats.rendered, 1);
        assert_eq!(stats.invalid_tenants, vec![11]);

        let png = std::fs::read(dir.path().join("10.png")).unwrap();
        let image = renderer::decode_template(&png).unwrap();
        assert_eq!((image.width(), image.height()), (240, 90));
        assert!(image.pixels().any(|p| p[3] > 0));
        assert!(!dir.path().join("11.png").exists());

        let snapshot = scheduler.sink_metrics();
        assert_eq!(snapshot[0].1.write_count, 1);
    }

    /// Each subscription is picked again only after its interval
    #[tokio::test]
    async fn test_interval_gates_next_tick() {
        let bp = blueprint(&format!(
            r#"
[[sinks]]
name = "console"
sink_type = "log"

[[guilds]]
id = 3
{}"#,
            subscription_toml(3, "ddb://clock", "$.minute"),
        ));

        let collector = Collector::default();
        let platform: Arc<dyn Platform> = Arc::new(StaticPlatform::new(&bp.guilds));
        let scheduler = SchedulerBuilder::new(
            bp.scheduler.clone(),
            MemoryStore::new(bp.subscriptions.clone()),
            Arc::new(FakeWeb::new()),
            platform,
            font_cache(),
        )
        .sink(collector.clone())
        .build()
        .unwrap();

        let start = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(scheduler.run_tick(start).await.unwrap().rendered, 1);

        let early = scheduler
            .run_tick(start + TimeDelta::minutes(4))
            .await
            .unwrap();
        assert_eq!(early.due, 0);

        let later = start + TimeDelta::minutes(5);
        assert_eq!(scheduler.run_tick(later).await.unwrap().rendered, 1);

        assert_eq!(collector.published(), vec![(3, 0), (3, 5)]);
        let stored = scheduler.store().get(3).await.unwrap();
        assert_eq!(stored.next_run, later + TimeDelta::minutes(5));
    }

    /// Tick stats feed the metrics aggregator
    #[tokio::test]
    async fn test_tick_stats_aggregate() {
        let bp = blueprint(&format!(
            r#"
[[sinks]]
name = "console"
sink_type = "log"
{}{}"#,
            subscription_toml(1, COUNT_URL, "$.count"),
            subscription_toml(2, "https://example.test/missing", "$.count"),
        ));

        let platform: Arc<dyn Platform> = Arc::new(StaticPlatform::default());
        let scheduler = SchedulerBuilder::new(
            bp.scheduler.clone(),
            MemoryStore::new(bp.subscriptions.clone()),
            Arc::new(FakeWeb::new().with(COUNT_URL, r#"{"count": 1}"#)),
            platform,
            font_cache(),
        )
        .sink(Collector::default())
        .build()
        .unwrap();

        let stats = scheduler.run_tick(Utc::now()).await.unwrap();
        assert_eq!(stats.due, 2);
        assert_eq!(stats.rendered, 0);
        assert_eq!(stats.fetch_failures, 1);
        assert_eq!(stats.invalid_tenants, vec![1]);

        let mut aggregator = observability::TickMetricsAggregator::new();
        aggregator.update(&stats);
        let summary = aggregator.summary();
        assert_eq!(summary.total_ticks, 1);
        assert_eq!(summary.total_due, 2);
    }
}
