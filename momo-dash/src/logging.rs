//! File-backed diagnostics; the terminal itself belongs to the TUI

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::ensure_momo_home;

/// Route tracing output to `~/.momo/logs/momo.log`.
///
/// `RUST_LOG` overrides the default filter.
pub fn init() -> Result<()> {
    let dir = ensure_momo_home()?.join("logs");
    std::fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;

    let path = dir.join("momo.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("momo_dash=info,momo_core=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    tracing::info!("logging initialized ({})", path.display());
    Ok(())
}
