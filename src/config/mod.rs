use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub rate: Option<u32>,
    pub timeout: Option<usize>,
    pub workers: Option<usize>,
    pub proxy: Option<String>,
    pub follow_redirects: Option<bool>,
    pub min_compatibility: Option<u8>,
    #[serde(alias = "type")]
    pub shoe_type: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<usize>,
    pub probe_images: Option<bool>,
    pub theme: Option<String>,
    pub no_color: Option<bool>,
    pub output: Option<String>,
    pub output_format: Option<String>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".fitscout").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

/// Writes the config back out, used when persisting the theme choice.
/// Comments in a hand-edited file do not survive the round trip.
pub fn save_config(path: &PathBuf, config: &ConfigFile) -> Result<(), String> {
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = serde_yaml::to_string(config)
        .map_err(|e| format!("failed to serialize config: {e}"))?;
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))
}

fn default_config_yaml() -> String {
    r#"# fitscout config
#
# Location (default):
#   ~/.fitscout/config.yml

# Service (required unless passed on the command line)
# base_url: http://localhost:5000/

# Session (optional; leave unset to browse unauthenticated)
# email: you@example.com
# password: hunter2

# Performance
rate: 50
timeout: 10
workers: 4

# HTTP (optional)
# proxy: http://127.0.0.1:8080
follow_redirects: false

# Filters
# min_compatibility: 60
# type: all
sort: compat-desc
limit: 12

# Photos
probe_images: true

# Output styling
theme: dark
no_color: false

# Export (optional)
# output: ./recommendations.html
# output_format: html
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(())
}
