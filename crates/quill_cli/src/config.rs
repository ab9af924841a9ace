use anyhow::{Context, Result};
use quill_core::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Contents of `~/.quillrc`.
///
/// ```toml
/// [display]
/// output_format = "table"
/// table_style = "rounded"
/// max_column_width = 40
///
/// [completion]
/// schema = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: RenderOptions,
    pub completion: CompletionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Offer table and column names.
    pub schema: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self { schema: true }
    }
}

/// Returns the default config path: `~/.quillrc`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs_next::home_dir().map(|h| h.join(".quillrc"))
}

/// Load the config. An explicitly given file must exist and parse; a
/// missing default file means defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => {
                debug!("No config file, using defaults");
                return Ok(Config::default());
            }
        },
    };
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Cannot read config file: {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    // Style names are checked up front so a typo does not surface on the
    // first query.
    quill_core::TableStyle::by_name(&config.display.table_style)?;
    Ok(config)
}

pub fn default_config_toml() -> Result<String> {
    Ok(toml::to_string_pretty(&Config::default())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_display_section() {
        let config = parse_config(
            r#"
            [display]
            output_format = "vertical"
            max_column_width = 40
            null_value = "NULL"

            [completion]
            schema = false
            "#,
        )
        .unwrap();
        assert_eq!(config.display.output_format, "vertical");
        assert_eq!(config.display.max_column_width, 40);
        assert_eq!(config.display.null_value.as_deref(), Some("NULL"));
        assert_eq!(config.display.header_interval, 100);
        assert!(!config.completion.schema);
    }

    #[test]
    fn test_unknown_style_rejected() {
        assert!(parse_config("[display]\ntable_style = \"fancy\"\n").is_err());
    }

    #[test]
    fn test_default_config_round_trips() {
        let text = default_config_toml().unwrap();
        assert!(text.contains("[display]"));
        assert_eq!(parse_config(&text).unwrap(), Config::default());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let missing = Path::new("/nonexistent/quill/config.toml");
        assert!(load_config(Some(missing)).is_err());
    }

    #[test]
    fn test_default_path_name() {
        if let Some(p) = default_config_path() {
            assert_eq!(p.file_name().unwrap(), ".quillrc");
        }
    }
}
