use std::collections::HashMap;

/// Which configuration layer a value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLayer {
    /// Compiled-in defaults (`defaults.toml`).
    Defaults,
    /// User-level configuration (`~/.popguard/config.toml`).
    User,
    /// File passed explicitly, e.g. with `--config`.
    Explicit,
    /// Environment variable fallback.
    Environment,
}

impl ConfigLayer {
    /// Whether a file layer (not defaults, not environment) set the value.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::User | Self::Explicit)
    }
}

impl std::fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Defaults => write!(f, "defaults"),
            Self::User => write!(f, "user (~/.popguard/config.toml)"),
            Self::Explicit => write!(f, "explicit (--config)"),
            Self::Environment => write!(f, "environment variable"),
        }
    }
}

/// Tracks which layer set each field's value.
pub type FieldSources = HashMap<String, ConfigLayer>;
