use dockgen_core::agent::ProtocolError;
use dockgen_core::config::ConfigError;
use dockgen_core::sanitize::SanitizeError;

/// Failures that abort a generation run.
///
/// None of them is retried. They travel inside a `color_eyre::Report` and can
/// be recovered with `downcast_ref::<Error>()`.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Request failed with status {status}: {body}")]
    Transport { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("{0}")]
    Protocol(String),

    #[error("Agent run did not complete; status={status}")]
    RunFailed { status: String },
}

impl From<ProtocolError> for Error {
    fn from(err: ProtocolError) -> Self {
        Error::Protocol(err.to_string())
    }
}

impl From<SanitizeError> for Error {
    fn from(err: SanitizeError) -> Self {
        Error::Protocol(err.to_string())
    }
}
