use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file exists but could not be read.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// File path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A config file is not valid TOML or does not match the schema.
    #[error("failed to parse config {path}: {source}")]
    ParseError {
        /// File path, or a `<...>` marker for in-memory layers.
        path: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// A value is out of range or inconsistent with another.
    #[error("invalid config value for {field}: {message}")]
    ValidationError {
        /// Dotted field path (or file path for size violations).
        field: String,
        /// What is wrong.
        message: String,
    },

    /// An environment fallback variable holds an unusable value.
    #[error("invalid value for environment variable {var}: {message}")]
    EnvError {
        /// Variable name.
        var: String,
        /// What is wrong.
        message: String,
    },

    /// The resolved configuration could not be rendered.
    #[error("failed to render config: {0}")]
    RenderError(String),

    /// No home directory could be determined for the user config file.
    #[error("could not determine home directory")]
    NoHomeDir,
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
