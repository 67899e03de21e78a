use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub monitor: MonitorConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub templates: TemplateConfig,

    /// Cluster directory keyed by the upper-case letter(s) ending the host name.
    #[serde(default = "Site::defaults")]
    pub sites: BTreeMap<String, Site>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Seconds between live refreshes in --progress mode
    pub refresh_interval_secs: u32,
    /// Length of one wait step in milliseconds (at least 1); the cancel key is
    /// checked after each step. The interval above is split into such steps.
    pub tick_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Monitoring server answering `xymondlog` queries
    pub host: String,
    pub port: u16,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// ssh binary used to reach the host
    pub ssh: String,
    /// Controller query run on the host
    pub command: String,
    pub connect_timeout_secs: u64,
    /// Hard limit for the whole remote query; the child is killed after this
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Signature appended to every template
    pub closing: String,
    /// Prefix for the disk-status link in tickets; `HOST` and `SERVICE` are appended
    pub status_url: String,
    /// Prefix for the log link in tickets
    pub log_url: String,
}

/// One datacenter/cluster entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub name:    String,
    pub code:    String,
    pub url:     String,
    pub address: String,
    pub contact: String,
}

impl Site {
    pub fn defaults() -> BTreeMap<String, Site> {
        ["A", "B", "C"].iter()
            .map(|l| {
                (l.to_string(), Site {
                    name:    format!("Cluster {} Location", l),
                    code:    format!("Cluster {} Code", l),
                    url:     format!("Cluster {} URL", l),
                    address: format!("Cluster {} Address", l),
                    contact: format!("Cluster {} Contact details", l),
                })
            })
            .collect()
    }
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            general:   GeneralConfig::default(),
            monitor:   MonitorConfig::default(),
            remote:    RemoteConfig::default(),
            templates: TemplateConfig::default(),
            sites:     Site::defaults(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { refresh_interval_secs: 60, tick_ms: 1000 }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { host: "xymon".into(), port: 11984, timeout_secs: 10 }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            ssh:                  "ssh".into(),
            command:              "sudo omreport storage pdisk controller=0".into(),
            connect_timeout_secs: 10,
            timeout_secs:         60,
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            closing:    "This is the template for closing, remember to change it.".into(),
            status_url: "https://xymon/xymon-cgi/svcstatus.sh".into(),
            log_url:    "https://xymon/xymon-cgi/svcstatus.sh".into(),
        }
    }
}

// ── Load / Save ───────────────────────────────────────────────────────

impl Config {
    /// Load the user config, falling back to defaults (and writing them on
    /// first run) when it is missing or unreadable.
    pub fn load() -> Self {
        let loaded = Config::config_path()
            .ok_or_else(|| anyhow::anyhow!("no config dir"))
            .and_then(|p| Config::load_from(&p));
        match loaded {
            Ok(c)  => c,
            Err(e) => {
                tracing::debug!(error = %e, "using default config");
                let _ = try_write_defaults();
                Config::default()
            }
        }
    }

    /// Load an explicit config file; errors are returned, not swallowed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let cfg: Config = toml::from_str(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(cfg)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pdtop").join("pdtop.toml"))
    }

    pub fn log_path() -> Option<PathBuf> {
        dirs::cache_dir().map(|p| p.join("pdtop").join("pdtop.log"))
    }

    pub fn site(&self, letter: &str) -> Option<&Site> {
        self.sites.get(letter)
    }
}

fn try_write_defaults() -> Result<()> {
    let path = Config::config_path().ok_or_else(|| anyhow::anyhow!("no config dir"))?;
    if path.exists() { return Ok(()); }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(&Config::default())?;
    fs::write(path, format!("# pdtop configuration\n# Generated on first run, edit freely\n\n{}", text))?;
    Ok(())
}
