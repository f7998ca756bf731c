//! Command implementations.

mod info;
mod render;
mod run;
mod validate;

use std::path::{Path, PathBuf};

pub use info::run_info;
pub use render::run_render;
pub use run::run_pipeline;
pub use validate::run_validate;

/// Resolve a path from the configuration against the config file's directory
pub(crate) fn config_relative(config: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match config.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(path),
        _ => path.to_path_buf(),
    }
}
