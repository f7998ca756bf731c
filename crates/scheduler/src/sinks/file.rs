//! FileSink - writes `<base_path>/<tenant>.png`

use std::collections::HashMap;
use std::path::PathBuf;

use contracts::{BannerSink, ContractError, RenderedBanner};
use tracing::{debug, instrument};

/// Configuration for FileSink
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    /// Output directory
    pub base_path: PathBuf,
}

impl FileSinkConfig {
    /// Read `base_path` from the params map (default `./output`)
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let base_path = params
            .get("base_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./output"));

        Self { base_path }
    }
}

/// Sink that keeps the latest banner of each tenant on disk
pub struct FileSink {
    name: String,
    config: FileSinkConfig,
}

impl FileSink {
    /// Create the sink and its output directory
    pub fn new(name: impl Into<String>, config: FileSinkConfig) -> std::io::Result<Self> {
        std::fs::create_dir_all(&config.base_path)?;
        Ok(Self {
            name: name.into(),
            config,
        })
    }

    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> std::io::Result<Self> {
        Self::new(name, FileSinkConfig::from_params(params))
    }

    /// Path the banner of `tenant_id` is written to
    pub fn path_for(&self, tenant_id: u64) -> PathBuf {
        self.config.base_path.join(format!("{tenant_id}.png"))
    }
}

impl BannerSink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_sink_publish",
        skip(self, banner),
        fields(sink = %self.name, tenant = banner.tenant_id)
    )]
    async fn publish(&self, banner: &RenderedBanner) -> Result<(), ContractError> {
        let path = self.path_for(banner.tenant_id);
        tokio::fs::write(&path, &banner.png)
            .await
            .map_err(|e| ContractError::sink_write(&self.name, format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), bytes = banner.png.len(), "banner written");
        Ok(())
    }
}
