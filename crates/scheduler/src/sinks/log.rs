//! LogSink - logs a banner summary via tracing

use contracts::{BannerSink, ContractError, RenderedBanner};
use tracing::{info, instrument};

/// Sink that only logs what would be uploaded
pub struct LogSink {
    name: String,
}

impl LogSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl BannerSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_publish",
        skip(self, banner),
        fields(sink = %self.name, tenant = banner.tenant_id)
    )]
    async fn publish(&self, banner: &RenderedBanner) -> Result<(), ContractError> {
        info!(
            sink = %self.name,
            tenant = banner.tenant_id,
            value = banner.value,
            width = banner.width,
            height = banner.height,
            bytes = banner.png.len(),
            "banner rendered"
        );
        Ok(())
    }
}
