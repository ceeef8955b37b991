/// Errors raised by the popguard engine outside of decision evaluation.
///
/// Decision functions themselves never fail; these surface from URL parsing
/// and from the deferred-confirmation API.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A URL could not be canonicalized.
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The current document location could not be parsed.
    #[error("invalid page location '{url}': {reason}")]
    InvalidPageLocation {
        /// The offending location.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A confirmation answer referenced a prompt that is not outstanding.
    #[error("no pending confirmation with id {id}")]
    UnknownPrompt {
        /// The prompt identifier that was supplied.
        id: String,
    },

    /// The host cannot intercept navigations.
    #[error("navigation interception is not available on this host")]
    NavigationUnsupported,
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
