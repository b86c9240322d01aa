use thiserror::Error;

/// Errors raised while building clients or memory managers from configuration.
///
/// Everything that can go wrong after construction (network, HTTP status, bad JSON) is
/// propagated as `anyhow::Error` instead; this type is recoverable with `downcast_ref`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be set in environment or passed explicitly")]
    MissingApiKey { var: String },

    #[error("Unsupported {role} provider: {provider}")]
    UnsupportedProvider { role: String, provider: String },

    #[error("Invalid config: {0}")]
    Invalid(String),
}
