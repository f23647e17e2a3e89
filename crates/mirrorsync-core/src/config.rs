use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Timeouts applied to every HTTP request (optional `[http]` table in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Seconds allowed for establishing a connection.
    pub connect_timeout_secs: u64,
    /// Upper bound in seconds for one whole request, body included.
    pub timeout_secs: u64,
    /// Abort when throughput stays below this many bytes/sec ...
    pub low_speed_limit_bytes: u32,
    /// ... for this many seconds.
    pub low_speed_time_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 600,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
        }
    }
}

/// Global configuration loaded from `~/.config/mirrorsync/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Worker threads for both pools (items and listing entries).
    pub threads: usize,
    /// Detail page URL; `{id}` is replaced by the zero-padded item number.
    pub item_page_url: String,
    /// Minimum digit count of the item number inside `item_page_url`.
    pub item_id_width: usize,
    /// RSS feed whose newest entry links to the newest item.
    pub feed_url: String,
    /// Directory-style page listing archive bundles, newest first.
    pub listing_url: String,
    /// Base for resolving relative links found on the listing page.
    pub listing_base_url: String,
    /// User-Agent sent with every request.
    pub user_agent: String,
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            item_page_url: "https://ocremix.org/remix/OCR{id}".to_string(),
            item_id_width: 5,
            feed_url: "https://ocremix.org/feeds/ten20/".to_string(),
            listing_url: "https://bt.ocremix.org/index.php?order=date&sort=descending".to_string(),
            listing_base_url: "https://bt.ocremix.org/".to_string(),
            user_agent: concat!("mirrorsync/", env!("CARGO_PKG_VERSION")).to_string(),
            http: HttpConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Detail page URL for one item.
    pub fn item_page_url(&self, id: crate::item::ItemId) -> String {
        let padded = format!("{:0width$}", id.get(), width = self.item_id_width);
        self.item_page_url.replace("{id}", &padded)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mirrorsync")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SyncConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<SyncConfig> {
    if !path.exists() {
        let default_cfg = SyncConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: SyncConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
