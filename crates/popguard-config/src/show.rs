//! Resolved configuration and its rendering.

use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources};
use crate::types::Config;

/// A loaded configuration plus where each value came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The final configuration.
    pub config: Config,
    /// Which layer set each leaf field.
    pub field_sources: FieldSources,
    /// Files that contributed, lowest precedence first.
    pub loaded_files: Vec<String>,
}

impl ResolvedConfig {
    /// Layer that set `field` (dotted path), if known.
    #[must_use]
    pub fn source_of(&self, field: &str) -> Option<&ConfigLayer> {
        self.field_sources.get(field)
    }

    /// Render the configuration in `format`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RenderError`] if serialization fails.
    pub fn render(&self, format: ShowFormat) -> ConfigResult<String> {
        match format {
            ShowFormat::Toml => toml::to_string_pretty(&self.config)
                .map_err(|e| ConfigError::RenderError(e.to_string())),
            ShowFormat::Json => serde_json::to_string_pretty(&self.config)
                .map_err(|e| ConfigError::RenderError(e.to_string())),
        }
    }

    /// Fields not left at their defaults, sorted, with their source layer.
    #[must_use]
    pub fn overridden_fields(&self) -> Vec<(&str, &ConfigLayer)> {
        let mut fields: Vec<_> = self
            .field_sources
            .iter()
            .filter(|(_, layer)| **layer != ConfigLayer::Defaults)
            .map(|(field, layer)| (field.as_str(), layer))
            .collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        fields
    }
}

/// Output format for `config show`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShowFormat {
    /// TOML, as it would appear in a config file.
    #[default]
    Toml,
    /// Pretty-printed JSON.
    Json,
}

impl FromStr for ShowFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::ValidationError {
                field: "format".to_owned(),
                message: format!("unsupported format '{other}'; expected toml or json"),
            }),
        }
    }
}

impl fmt::Display for ShowFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml => write!(f, "toml"),
            Self::Json => write!(f, "json"),
        }
    }
}
