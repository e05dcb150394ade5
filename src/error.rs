//! Error types for the dashboard

use thiserror::Error;

#[allow(clippy::enum_variant_names)]
#[derive(Error, Debug)]
pub enum Error {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error means the requested object does not exist.
    ///
    /// A 404 from the API server is the primary signal. Errors that reach us
    /// without a status code (e.g. a proxy that rewrites the body) fall back
    /// to matching the message.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::KubeError(kube::Error::Api(resp)) if resp.code == 404 => true,
            Error::KubeError(kube::Error::Api(resp)) if resp.code != 0 => false,
            other => {
                let message = other.to_string().to_lowercase();
                message.contains("404") || message.contains("not found")
            }
        }
    }

    /// The message carried back to callers in error documents.
    pub fn message(&self) -> String {
        match self {
            Error::KubeError(kube::Error::Api(resp)) => resp.message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
