//! Tool configuration loading and library path discovery.

use anyhow::{Context, Result};
use lib_ndi_ffi::LibraryFormat;
use lib_ndi_types::{RecvCreateSettings, SendCreateSettings};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Top-level tool configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where to find the runtime library.
    #[serde(default)]
    pub library: LibraryConfig,

    /// Settings for `send-video`.
    #[serde(default)]
    pub sender: Option<SendCreateSettings>,

    /// Settings for `recv`. The source given on the command line wins.
    #[serde(default)]
    pub receiver: Option<RecvCreateSettings>,
}

/// Runtime library location.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Explicit library file.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Environment variables naming a runtime directory, checked in order.
    #[serde(default = "default_runtime_env")]
    pub runtime_env: Vec<String>,
}

fn default_runtime_env() -> Vec<String> {
    vec!["NDI_RUNTIME_DIR_V6".into(), "NDI_RUNTIME_DIR_V5".into()]
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: None,
            runtime_env: default_runtime_env(),
        }
    }
}

/// Load configuration from a file.
pub fn load_config(path: &Path) -> Result<CliConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: CliConfig = if path.extension().is_some_and(|e| e == "json") {
        serde_json::from_str(&content)
            .with_context(|| "Failed to parse config as JSON")?
    } else {
        // Assume TOML
        toml::from_str(&content)
            .with_context(|| "Failed to parse config as TOML")?
    };

    validate_config(&config)?;

    Ok(config)
}

/// Validate configuration.
fn validate_config(config: &CliConfig) -> Result<()> {
    if let Some(ref path) = config.library.path {
        if !path.exists() {
            anyhow::bail!("Library file not found: {:?}", path);
        }
    }

    if let Some(ref sender) = config.sender {
        if sender.name.is_empty() {
            anyhow::bail!("Sender name must not be empty");
        }
    }

    if config.library.runtime_env.iter().any(|v| v.is_empty()) {
        anyhow::bail!("Runtime environment variable names must not be empty");
    }

    Ok(())
}

/// Pick the library to load.
///
/// Order: command-line flag, configured path, each runtime directory
/// variable joined with the platform's file names, then the bare file name
/// so the system search path applies.
pub fn resolve_library_path(flag: Option<&Path>, config: &LibraryConfig) -> Result<PathBuf> {
    resolve_with(flag, config, LibraryFormat::native(), |name| std::env::var_os(name))
}

fn resolve_with(
    flag: Option<&Path>,
    config: &LibraryConfig,
    format: LibraryFormat,
    env: impl Fn(&str) -> Option<OsString>,
) -> Result<PathBuf> {
    if let Some(path) = flag.or(config.path.as_deref()) {
        return Ok(path.to_path_buf());
    }

    let names = format.default_file_names();
    for var in &config.runtime_env {
        let Some(dir) = env(var) else { continue };
        let dir = PathBuf::from(dir);
        if let Some(found) = names.iter().map(|n| dir.join(n)).find(|p| p.exists()) {
            tracing::debug!(var = %var, path = ?found, "Found runtime library");
            return Ok(found);
        }
        tracing::debug!(var = %var, dir = ?dir, "No runtime library in directory");
    }

    match names.first() {
        Some(name) => Ok(PathBuf::from(name)),
        None => anyhow::bail!("No known runtime library name for this platform"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ndi-cli-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_flag_wins() {
        let config = LibraryConfig {
            path: Some("/opt/ndi/libndi.so.6".into()),
            ..Default::default()
        };
        let path = resolve_with(Some(Path::new("/tmp/libndi.so")), &config, LibraryFormat::So, |_| None)
            .unwrap();
        assert_eq!(path, PathBuf::from("/tmp/libndi.so"));

        let path = resolve_with(None, &config, LibraryFormat::So, |_| None).unwrap();
        assert_eq!(path, PathBuf::from("/opt/ndi/libndi.so.6"));
    }

    #[test]
    fn test_runtime_dir_variables_in_order() {
        let v5 = scratch_dir("v5");
        std::fs::write(v5.join("libndi.so.5"), b"").unwrap();
        let empty = scratch_dir("empty");

        let env = |name: &str| match name {
            "NDI_RUNTIME_DIR_V6" => Some(OsString::from(&empty)),
            "NDI_RUNTIME_DIR_V5" => Some(OsString::from(&v5)),
            _ => None,
        };
        let path = resolve_with(None, &LibraryConfig::default(), LibraryFormat::So, env).unwrap();
        assert_eq!(path, v5.join("libndi.so.5"));

        std::fs::remove_dir_all(&v5).ok();
        std::fs::remove_dir_all(&empty).ok();
    }

    #[test]
    fn test_falls_back_to_bare_name() {
        let path = resolve_with(None, &LibraryConfig::default(), LibraryFormat::So, |_| None).unwrap();
        assert_eq!(path, PathBuf::from("libndi.so.6"));
        assert!(resolve_with(None, &LibraryConfig::default(), LibraryFormat::Unknown, |_| None).is_err());
    }

    #[test]
    fn test_parse_toml() {
        let config: CliConfig = toml::from_str(
            r#"
            [sender]
            name = "Test Pattern"

            [receiver]
            bandwidth = "lowest"
            source = { name = "HOST-A (Camera 1)" }
            "#,
        )
        .unwrap();
        assert_eq!(config.library.runtime_env, default_runtime_env());
        let sender = config.sender.unwrap();
        assert_eq!(sender.name, "Test Pattern");
        assert!(sender.clock_video);
        let receiver = config.receiver.unwrap();
        assert_eq!(receiver.source.name, "HOST-A (Camera 1)");
        assert!(receiver.allow_video_fields);
    }

    #[test]
    fn test_validation() {
        let mut config = CliConfig::default();
        assert!(validate_config(&config).is_ok());
        config.sender = Some(SendCreateSettings::default());
        assert!(validate_config(&config).is_err());
        config.sender = None;
        config.library.path = Some("/nonexistent/libndi.so.6".into());
        assert!(validate_config(&config).is_err());
    }
}
