//! Tick driver
//!
//! One tick: select due → advance next-run → group by source → group tasks
//! on the group pool → tenant tasks on the tenant pool → barrier.
//!
//! Next-run markers are advanced before any fetch or render, so a failing
//! tenant is retried one interval later rather than on every tick.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use contracts::{
    BannerSink, Platform, RenderedBanner, ResourceFetcher, SchedulerConfig, SourceUri,
    SubscriptionStore, TenantId, TenantSubscription, TickStats, BANNER_FEATURE,
};
use font_cache::FontCache;
use observability::{MetricsSummary, TickMetricsAggregator};
use protocol_router::ProtocolRouter;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{Result, SchedulerError};
use crate::metrics::MetricsSnapshot;
use crate::pool::WorkerPool;
use crate::sinks::SinkSet;
use crate::source::{SourceFetcher, SourceHandle};

/// Subscriptions sharing one data source within a tick
#[derive(Debug, Clone)]
pub struct SourceGroup {
    pub uri: SourceUri,
    pub members: Vec<Arc<TenantSubscription>>,
}

/// Partition by source URI, groups in first-seen order
pub fn group_by_source(due: Vec<TenantSubscription>) -> Vec<SourceGroup> {
    let mut index: HashMap<SourceUri, usize> = HashMap::new();
    let mut groups: Vec<SourceGroup> = Vec::new();

    for subscription in due {
        let slot = *index.entry(subscription.source.clone()).or_insert_with(|| {
            groups.push(SourceGroup {
                uri: subscription.source.clone(),
                members: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].members.push(Arc::new(subscription));
    }

    groups
}

/// Result of one tenant task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TenantOutcome {
    Rendered,
    Invalid(TenantId),
    Failed,
}

impl TenantOutcome {
    fn label(&self) -> &'static str {
        match self {
            TenantOutcome::Rendered => "rendered",
            TenantOutcome::Invalid(_) => "invalid",
            TenantOutcome::Failed => "failed",
        }
    }

    fn record(self, stats: &mut TickStats) {
        observability::record_tenant_outcome(self.label());
        match self {
            TenantOutcome::Rendered => stats.rendered += 1,
            TenantOutcome::Invalid(id) => stats.invalid_tenants.push(id),
            TenantOutcome::Failed => stats.failed += 1,
        }
    }
}

/// Collaborators shared by every task of every tick
struct Shared<F, K> {
    fetcher: Arc<F>,
    sources: SourceFetcher<F>,
    platform: Arc<dyn Platform>,
    fonts: Arc<FontCache>,
    sinks: SinkSet<K>,
    fetch_timeout: Option<Duration>,
    tenant_timeout: Option<Duration>,
}

/// Builder for creating a Scheduler
pub struct SchedulerBuilder<S, F, K> {
    config: SchedulerConfig,
    store: S,
    fetcher: Arc<F>,
    platform: Arc<dyn Platform>,
    fonts: Arc<FontCache>,
    router: Option<Arc<ProtocolRouter>>,
    sinks: Vec<K>,
}

impl<S, F, K> SchedulerBuilder<S, F, K>
where
    S: SubscriptionStore + Sync,
    F: ResourceFetcher + Sync + 'static,
    K: BannerSink + Sync + 'static,
{
    pub fn new(
        config: SchedulerConfig,
        store: S,
        fetcher: Arc<F>,
        platform: Arc<dyn Platform>,
        fonts: Arc<FontCache>,
    ) -> Self {
        Self {
            config,
            store,
            fetcher,
            platform,
            fonts,
            router: None,
            sinks: Vec::new(),
        }
    }

    /// Route table for `ddb://` sources (default: built-in hosts)
    pub fn router(mut self, router: Arc<ProtocolRouter>) -> Self {
        self.router = Some(router);
        self
    }

    pub fn sink(mut self, sink: K) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn sinks(mut self, sinks: impl IntoIterator<Item = K>) -> Self {
        self.sinks.extend(sinks);
        self
    }

    /// # Errors
    /// - zero tick period
    /// - no sink
    /// - built-in route registration failure
    #[instrument(name = "scheduler_builder_build", skip(self), fields(sinks = self.sinks.len()))]
    pub fn build(self) -> Result<Scheduler<S, F, K>> {
        if self.config.tick_period().is_zero() {
            return Err(SchedulerError::Setup("tick period must be > 0".into()));
        }
        if self.sinks.is_empty() {
            return Err(SchedulerError::Setup("at least one sink is required".into()));
        }

        let router = match self.router {
            Some(router) => router,
            None => Arc::new(ProtocolRouter::with_builtin_hosts()?),
        };

        let shared = Shared {
            sources: SourceFetcher::new(Arc::clone(&self.fetcher), router),
            fetcher: self.fetcher,
            platform: self.platform,
            fonts: self.fonts,
            sinks: SinkSet::new(self.sinks),
            fetch_timeout: self.config.fetch_timeout(),
            tenant_timeout: self.config.tenant_timeout(),
        };

        Ok(Scheduler {
            group_pool: WorkerPool::new("group", self.config.worker_slots),
            tenant_pool: WorkerPool::new("tenant", self.config.worker_slots),
            config: self.config,
            store: self.store,
            shared: Arc::new(shared),
        })
    }
}

/// Periodic banner refresher
pub struct Scheduler<S, F, K> {
    config: SchedulerConfig,
    store: S,
    group_pool: WorkerPool,
    tenant_pool: WorkerPool,
    shared: Arc<Shared<F, K>>,
}

impl<S, F, K> Scheduler<S, F, K>
where
    S: SubscriptionStore + Sync,
    F: ResourceFetcher + Sync + 'static,
    K: BannerSink + Sync + 'static,
{
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn fonts(&self) -> &FontCache {
        &self.shared.fonts
    }

    pub fn group_pool(&self) -> &WorkerPool {
        &self.group_pool
    }

    pub fn tenant_pool(&self) -> &WorkerPool {
        &self.tenant_pool
    }

    /// Counters of every sink, by name
    pub fn sink_metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.shared.sinks.snapshot()
    }

    /// Run one tick at `now` and wait for every task it started
    ///
    /// # Errors
    /// Only store failures; every fetch, render or sink failure is contained
    /// and counted in the returned [`TickStats`].
    #[instrument(name = "scheduler_tick", skip(self), fields(now = %now))]
    pub async fn run_tick(&self, now: DateTime<Utc>) -> Result<TickStats> {
        let started = Instant::now();
        let mut stats = TickStats::new(now);

        let due = self.store.select_due(now).await?;
        stats.due = due.len();
        if due.is_empty() {
            debug!("nothing due");
            stats.duration_ms = started.elapsed().as_secs_f64() * 1000.0;
            return Ok(stats);
        }

        let ids: Vec<TenantId> = due.iter().map(|s| s.id).collect();
        self.store.advance(&ids, now).await?;

        let groups = group_by_source(due);
        stats.groups = groups.len();

        let mut tasks = JoinSet::new();
        for group in groups {
            let task = run_group(
                Arc::clone(&self.shared),
                self.tenant_pool.clone(),
                group,
                now,
            );
            if let Err(e) = self.group_pool.submit(&mut tasks, task).await {
                error!(error = %e, "group task not submitted, group skipped");
                stats.fetch_failures += 1;
            }
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(partial) => stats.merge(partial),
                Err(e) => error!(error = %e, "group task panicked"),
            }
        }

        stats.duration_ms = started.elapsed().as_secs_f64() * 1000.0;
        observability::record_tick(&stats);
        info!(
            due = stats.due,
            groups = stats.groups,
            rendered = stats.rendered,
            failed = stats.failed,
            skipped_groups = stats.fetch_failures,
            invalid = stats.invalid_tenants.len(),
            duration_ms = stats.duration_ms,
            "tick complete"
        );
        Ok(stats)
    }

    /// Tick every `tick_period` until `shutdown` is cancelled
    ///
    /// A tick in progress is finished before returning.
    pub async fn run(&self, shutdown: CancellationToken) -> MetricsSummary {
        let mut aggregator = TickMetricsAggregator::new();
        let mut ticker = tokio::time::interval(self.config.tick_period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            period_secs = self.config.tick_period_secs,
            worker_slots = self.config.worker_slots,
            "scheduler started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => match self.run_tick(Utc::now()).await {
                    Ok(stats) => aggregator.update(&stats),
                    Err(e) => error!(error = %e, "tick aborted"),
                },
            }
        }

        info!(ticks = aggregator.total_ticks, "scheduler stopped");
        aggregator.summary()
    }
}

/// Resolve the group's source once, then fan out to its tenants
#[instrument(
    name = "scheduler_group",
    skip(shared, tenant_pool, group, now),
    fields(uri = %group.uri, tenants = group.members.len())
)]
async fn run_group<F, K>(
    shared: Arc<Shared<F, K>>,
    tenant_pool: WorkerPool,
    group: SourceGroup,
    now: DateTime<Utc>,
) -> TickStats
where
    F: ResourceFetcher + Sync + 'static,
    K: BannerSink + Sync + 'static,
{
    let mut stats = TickStats {
        fetches: 1,
        ..Default::default()
    };
    let kind = if group.uri.is_internal() { "route" } else { "http" };

    let source = match bounded(
        shared.fetch_timeout,
        "source fetch",
        shared.sources.resolve(&group.uri),
    )
    .await
    {
        Ok(source) => {
            observability::record_source_fetch(kind, true);
            Arc::new(source)
        }
        Err(e) => {
            observability::record_source_fetch(kind, false);
            warn!(error = %e, reason = e.label(), "source unavailable, group skipped");
            stats.fetch_failures = 1;
            return stats;
        }
    };

    let mut tenants = JoinSet::new();
    for subscription in group.members {
        let task = run_tenant(Arc::clone(&shared), Arc::clone(&source), subscription, now);
        if let Err(e) = tenant_pool.submit(&mut tenants, task).await {
            error!(error = %e, "tenant task not submitted");
            stats.failed += 1;
        }
    }

    while let Some(joined) = tenants.join_next().await {
        match joined {
            Ok(outcome) => outcome.record(&mut stats),
            Err(e) => {
                error!(error = %e, "tenant task panicked");
                TenantOutcome::Failed.record(&mut stats);
            }
        }
    }

    stats
}

#[instrument(
    name = "scheduler_tenant",
    skip(shared, source, subscription, now),
    fields(tenant = subscription.id)
)]
async fn run_tenant<F, K>(
    shared: Arc<Shared<F, K>>,
    source: Arc<SourceHandle>,
    subscription: Arc<TenantSubscription>,
    now: DateTime<Utc>,
) -> TenantOutcome
where
    F: ResourceFetcher + Sync + 'static,
    K: BannerSink + Sync + 'static,
{
    let work = refresh_banner(&shared, &source, &subscription, now);
    match bounded(shared.tenant_timeout, "tenant task", work).await {
        Ok(()) => TenantOutcome::Rendered,
        Err(SchedulerError::InvalidTarget { tenant_id }) => {
            info!("target lost the banner feature or the manage permission");
            TenantOutcome::Invalid(tenant_id)
        }
        Err(e) => {
            warn!(error = %e, reason = e.label(), "tenant skipped");
            TenantOutcome::Failed
        }
    }
}

/// Check the target, extract, render and publish one banner
async fn refresh_banner<F, K>(
    shared: &Shared<F, K>,
    source: &SourceHandle,
    subscription: &Arc<TenantSubscription>,
    now: DateTime<Utc>,
) -> Result<()>
where
    F: ResourceFetcher + Sync + 'static,
    K: BannerSink + Sync + 'static,
{
    let tenant_id = subscription.id;
    let guild = shared
        .platform
        .guild(tenant_id)
        .filter(|g| g.has_feature(BANNER_FEATURE) && g.can_manage())
        .ok_or(SchedulerError::InvalidTarget { tenant_id })?;

    let value = source.value_for(subscription, guild, now).await?;

    let template_bytes = shared.fetcher.fetch(&subscription.template).await?;
    let template = renderer::decode_template(&template_bytes)?;

    let style = &subscription.style;
    let font = shared
        .fonts
        .get_or_load(&style.font_family, style.font_variant, shared.fetcher.as_ref())
        .await?;

    let render_started = Instant::now();
    let image = renderer::render(&template, &font, value, style)?;
    let png = renderer::encode_png(&image)?;
    observability::record_render_ms(render_started.elapsed().as_secs_f64() * 1000.0);

    let banner = RenderedBanner {
        tenant_id,
        value,
        png,
        width: image.width(),
        height: image.height(),
        rendered_at: now,
    };
    shared.sinks.publish(&banner).await?;
    debug!(value, "banner published");
    Ok(())
}

/// Run `work` under an optional time limit
async fn bounded<T>(
    limit: Option<Duration>,
    what: &'static str,
    work: impl Future<Output = Result<T>>,
) -> Result<T> {
    match limit {
        Some(after) => tokio::time::timeout(after, work)
            .await
            .map_err(|_| SchedulerError::Timeout { what, after })?,
        None => work.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::StaticPlatform;
    use crate::store::MemoryStore;
    use crate::testing::{font_cache, subscription, MapFetcher, RecordingSink, FONT_URL, TEMPLATE_URL};
    use contracts::{GuildConfig, PresenceCounts};

    const COUNT_URL: &str = "https://example.test/count";

    fn guild(id: TenantId) -> GuildConfig {
        GuildConfig {
            id,
            name: format!("guild {id}"),
            features: vec![BANNER_FEATURE.to_string()],
            can_manage: true,
            humans: PresenceCounts {
                online: 4,
                idle: 2,
                dnd: 1,
                offline: 3,
            },
            bots: PresenceCounts {
                online: 1,
                ..Default::default()
            },
        }
    }

    fn config(worker_slots: usize) -> SchedulerConfig {
        SchedulerConfig {
            worker_slots,
            ..Default::default()
        }
    }

    struct Harness {
        scheduler: Scheduler<MemoryStore, MapFetcher, RecordingSink>,
        fetcher: Arc<MapFetcher>,
        sink: RecordingSink,
    }

    fn harness(
        subscriptions: Vec<TenantSubscription>,
        guilds: Vec<GuildConfig>,
        fetcher: MapFetcher,
        worker_slots: usize,
    ) -> Harness {
        let fetcher = Arc::new(fetcher.with_assets());
        let sink = RecordingSink::new("recording");
        let scheduler = SchedulerBuilder::new(
            config(worker_slots),
            MemoryStore::new(subscriptions),
            Arc::clone(&fetcher),
            Arc::new(StaticPlatform::new(&guilds)),
            font_cache(),
        )
        .sink(sink.clone())
        .build()
        .unwrap();

        Harness {
            scheduler,
            fetcher,
            sink,
        }
    }

    #[test]
    fn test_group_by_source() {
        let groups = group_by_source(vec![
            subscription(1, "https://a.test", "$.a"),
            subscription(2, "https://b.test", "$.b"),
            subscription(3, "https://a.test", "$.c"),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].uri, "https://a.test");
        assert_eq!(
            groups[0].members.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(groups[1].members.len(), 1);
    }

    #[tokio::test]
    async fn test_shared_source_fetched_once() {
        let h = harness(
            vec![
                subscription(1, COUNT_URL, "$.count"),
                subscription(2, COUNT_URL, "$.total"),
            ],
            vec![guild(1), guild(2)],
            MapFetcher::default().with(COUNT_URL, r#"{"count":5,"total":9}"#),
            5,
        );

        let stats = h.scheduler.run_tick(Utc::now()).await.unwrap();

        assert_eq!(h.fetcher.calls(COUNT_URL), 1);
        assert_eq!(h.sink.published(), vec![(1, 5), (2, 9)]);
        assert_eq!((stats.due, stats.groups, stats.fetches), (2, 1, 1));
        assert_eq!(stats.rendered, 2);
        assert_eq!(h.scheduler.fonts().stats().loads, 1);
        assert_eq!(h.fetcher.calls(FONT_URL), 1);
        assert_eq!(h.fetcher.calls(TEMPLATE_URL), 2);
    }

    #[tokio::test]
    async fn test_disabled_subscription_never_processed() {
        let mut disabled = subscription(2, COUNT_URL, "$.total");
        disabled.enabled = false;
        let h = harness(
            vec![subscription(1, COUNT_URL, "$.count"), disabled],
            vec![guild(1), guild(2)],
            MapFetcher::default().with(COUNT_URL, r#"{"count":5,"total":9}"#),
            5,
        );

        let stats = h.scheduler.run_tick(Utc::now()).await.unwrap();
        assert_eq!(stats.due, 1);
        assert_eq!(h.sink.published(), vec![(1, 5)]);
        let untouched = h.scheduler.store().get(2).await.unwrap();
        assert_eq!(untouched.next_run, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[tokio::test]
    async fn test_next_run_advanced_even_on_failure() {
        let h = harness(
            vec![
                subscription(1, "https://example.test/down", "$.count"),
                subscription(2, COUNT_URL, "$.count"),
            ],
            vec![guild(1), guild(2)],
            MapFetcher::default().with(COUNT_URL, r#"{"count":5}"#),
            5,
        );
        let now = Utc::now();

        let stats = h.scheduler.run_tick(now).await.unwrap();
        assert_eq!(stats.fetch_failures, 1);
        assert_eq!(stats.rendered, 1);

        for id in [1, 2] {
            let s = h.scheduler.store().get(id).await.unwrap();
            assert_eq!(s.next_run, now + s.interval());
        }

        // nothing due until the interval elapses
        let again = h.scheduler.run_tick(now).await.unwrap();
        assert_eq!(again.due, 0);
        assert_eq!(h.fetcher.calls("https://example.test/down"), 1);
    }

    #[tokio::test]
    async fn test_closed_group_pool_drains_started_groups() {
        let h = harness(
            vec![
                subscription(1, COUNT_URL, "$.count"),
                subscription(2, "https://example.test/other", "$.count"),
            ],
            vec![guild(1), guild(2)],
            MapFetcher::default()
                .with(COUNT_URL, r#"{"count":5}"#)
                .with("https://example.test/other", r#"{"count":6}"#)
                .with_delay(Duration::from_millis(50)),
            1,
        );
        let now = Utc::now();

        // the first group holds the only slot while the pool closes
        let pool = h.scheduler.group_pool().clone();
        let closer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            pool.close();
        });

        let stats = h.scheduler.run_tick(now).await.unwrap();
        closer.await.unwrap();

        assert_eq!(stats.groups, 2);
        assert_eq!(stats.fetch_failures, 1);
        assert_eq!(stats.rendered, 1);
        assert_eq!(h.sink.published(), vec![(1, 5)]);
        for id in [1, 2] {
            let s = h.scheduler.store().get(id).await.unwrap();
            assert_eq!(s.next_run, now + s.interval());
        }
    }

    #[tokio::test]
    async fn test_invalid_targets_recorded() {
        let mut no_banner = guild(2);
        no_banner.features.clear();
        let mut no_permission = guild(3);
        no_permission.can_manage = false;

        let h = harness(
            (1..=4).map(|id| subscription(id, COUNT_URL, "$.count")).collect(),
            vec![guild(1), no_banner, no_permission],
            MapFetcher::default().with(COUNT_URL, r#"{"count":5}"#),
            5,
        );

        let mut stats = h.scheduler.run_tick(Utc::now()).await.unwrap();
        stats.invalid_tenants.sort();

        assert_eq!(stats.invalid_tenants, vec![2, 3, 4]);
        assert_eq!(stats.rendered, 1);
        assert_eq!(stats.failed, 0);
        assert_eq!(h.sink.published(), vec![(1, 5)]);
    }

    #[tokio::test]
    async fn test_tenant_failure_is_contained() {
        let mut unknown_font = subscription(3, COUNT_URL, "$.count");
        unknown_font.style.font_family = "Comic Sans".into();
        let mut missing_template = subscription(4, COUNT_URL, "$.count");
        missing_template.template = "https://assets.test/missing.png".into();

        let h = harness(
            vec![
                subscription(1, COUNT_URL, "$.count"),
                subscription(2, COUNT_URL, "$.missing"),
                unknown_font,
                missing_template,
            ],
            (1..=4).map(guild).collect(),
            MapFetcher::default().with(COUNT_URL, r#"{"count":5}"#),
            5,
        );

        let stats = h.scheduler.run_tick(Utc::now()).await.unwrap();
        assert_eq!(stats.rendered, 1);
        assert_eq!(stats.failed, 3);
        assert_eq!(stats.skipped(), 3);
        assert_eq!(h.sink.published(), vec![(1, 5)]);
    }

    #[tokio::test]
    async fn test_route_source_uses_tenant_guild() {
        let h = harness(
            vec![
                subscription(1, "ddb://guild/members/count", "$.humans.not_offline"),
                subscription(2, "ddb://guild/members/count", "$.bots.online"),
                subscription(3, "ddb://clock", "$.year"),
            ],
            vec![guild(1), guild(2), guild(3)],
            MapFetcher::default(),
            5,
        );
        let now = Utc::now();

        let stats = h.scheduler.run_tick(now).await.unwrap();
        assert_eq!(stats.groups, 2);
        assert_eq!(
            h.sink.published(),
            vec![(1, 7), (2, 1), (3, i64::from(chrono::Datelike::year(&now)))]
        );
    }

    #[tokio::test]
    async fn test_unknown_route_skips_group() {
        let h = harness(
            vec![subscription(1, "ddb://weather/today", "$.temp")],
            vec![guild(1)],
            MapFetcher::default(),
            5,
        );

        let stats = h.scheduler.run_tick(Utc::now()).await.unwrap();
        assert_eq!(stats.fetch_failures, 1);
        assert_eq!(stats.skipped(), 1);
        assert!(h.sink.published().is_empty());
    }

    #[tokio::test]
    async fn test_pool_peak_never_exceeds_slots() {
        let mut fetcher = MapFetcher::default().with_delay(Duration::from_millis(5));
        let mut subscriptions = Vec::new();
        for id in 0..24u64 {
            let url = format!("https://example.test/{}", id % 8);
            fetcher = fetcher.with(&url, r#"{"n":1}"#);
            subscriptions.push(subscription(id, &url, "$.n"));
        }

        let h = harness(subscriptions, (0..24).map(guild).collect(), fetcher, 2);
        let stats = h.scheduler.run_tick(Utc::now()).await.unwrap();

        assert_eq!(stats.rendered, 24);
        assert_eq!(stats.groups, 8);
        assert!(h.scheduler.group_pool().peak_in_flight() <= 2);
        assert!(h.scheduler.tenant_pool().peak_in_flight() <= 2);
        assert_eq!(h.scheduler.group_pool().in_flight(), 0);
        assert_eq!(h.scheduler.tenant_pool().in_flight(), 0);
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        };
        let err = bounded(Some(Duration::from_millis(10)), "probe", slow)
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulerError::Timeout { what: "probe", .. }));

        let fast = async { Ok(3) };
        assert_eq!(bounded(None, "probe", fast).await.unwrap(), 3);
    }

    #[test]
    fn test_build_requires_a_sink() {
        let result = SchedulerBuilder::<MemoryStore, MapFetcher, RecordingSink>::new(
            config(1),
            MemoryStore::default(),
            Arc::new(MapFetcher::default()),
            Arc::new(StaticPlatform::default()),
            font_cache(),
        )
        .build();
        assert!(matches!(result, Err(SchedulerError::Setup(_))));
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let h = harness(
            vec![subscription(1, COUNT_URL, "$.count")],
            vec![guild(1)],
            MapFetcher::default().with(COUNT_URL, r#"{"count":5}"#),
            1,
        );
        let shutdown = CancellationToken::new();
        let trigger = shutdown.clone();

        let (summary, _) = tokio::join!(h.scheduler.run(shutdown), async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            trigger.cancel();
        });

        assert!(summary.total_ticks >= 1);
        assert_eq!(summary.total_rendered, 1);
        assert_eq!(h.sink.published(), vec![(1, 5)]);
    }
}
