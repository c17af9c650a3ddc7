use std::path::PathBuf;
use std::time::Duration;

/// Errors surfaced through the `NetworkFacade` call surface.
///
/// Unknown domains, addresses and services are not errors; they resolve to
/// sentinel results. The network kinds below belong to the trait contract so
/// a client doing real I/O can report them distinctly; the mock facade never
/// produces them.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("{operation} timed out after {}ms", after.as_millis())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
    #[error("connection refused by {0}")]
    ConnectionRefused(String),
    #[error("failed to resolve name: {0}")]
    NameResolution(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("cannot load tables from {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: Box<SandboxError>,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SandboxError>;
