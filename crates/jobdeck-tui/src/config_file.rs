use std::path::PathBuf;

use serde::Deserialize;

/// Resolved runtime settings: config file values overridden by CLI flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub concurrency: usize,
    pub dry_run: bool,
    pub tab_limit: usize,
    pub delay_ms: u64,
    pub timeout_secs: u64,
    pub theme_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            concurrency: 10,
            dry_run: false,
            tab_limit: 10,
            delay_ms: 150,
            timeout_secs: 8,
            theme_name: "hacker".to_string(),
        }
    }
}

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub open: Option<OpenConfig>,
    pub validation: Option<ValidationConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenConfig {
    pub tab_limit: Option<usize>,
    pub delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationConfig {
    pub concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
}

/// Platform config directory path: `<config_dir>/jobdeck/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("jobdeck").join("config.toml"))
}

/// Load config by cascading CWD `.jobdeck.toml` over the platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".jobdeck.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        open: Some(OpenConfig {
            tab_limit: overlay
                .open
                .as_ref()
                .and_then(|o| o.tab_limit)
                .or_else(|| base.open.as_ref().and_then(|o| o.tab_limit)),
            delay_ms: overlay
                .open
                .as_ref()
                .and_then(|o| o.delay_ms)
                .or_else(|| base.open.as_ref().and_then(|o| o.delay_ms)),
        }),
        validation: Some(ValidationConfig {
            concurrency: overlay
                .validation
                .as_ref()
                .and_then(|v| v.concurrency)
                .or_else(|| base.validation.as_ref().and_then(|v| v.concurrency)),
            timeout_secs: overlay
                .validation
                .as_ref()
                .and_then(|v| v.timeout_secs)
                .or_else(|| base.validation.as_ref().and_then(|v| v.timeout_secs)),
        }),
        display: Some(DisplayConfig {
            theme: overlay
                .display
                .as_ref()
                .and_then(|d| d.theme.clone())
                .or_else(|| base.display.as_ref().and_then(|d| d.theme.clone())),
        }),
    }
}

/// Apply file config onto settings. Only values that are `Some` in the file
/// are applied (defaults are never overwritten with defaults).
pub fn apply_to_settings(file_cfg: &ConfigFile, settings: &mut Settings) {
    if let Some(open) = &file_cfg.open {
        if let Some(v) = open.tab_limit {
            settings.tab_limit = v.max(1);
        }
        if let Some(v) = open.delay_ms {
            settings.delay_ms = v;
        }
    }
    if let Some(validation) = &file_cfg.validation {
        if let Some(v) = validation.concurrency {
            settings.concurrency = v.max(1);
        }
        if let Some(v) = validation.timeout_secs {
            settings.timeout_secs = v.max(1);
        }
    }
    if let Some(display) = &file_cfg.display
        && let Some(theme) = &display.theme
        && !theme.is_empty()
    {
        settings.theme_name = theme.clone();
    }
}
