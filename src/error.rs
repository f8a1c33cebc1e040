//! Error type shared by the sync adapter, store, board and configuration.

use thiserror::Error;

/// Everything that can go wrong between the board and the remote task API.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure (connection refused, timeout, TLS...).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("no task matches '{0}'")]
    TaskNotFound(String),

    /// A title lookup matched more than one task; the message lists them.
    #[error("{0}")]
    AmbiguousTask(String),

    /// An update or delete was attempted on a task the server never assigned an id to.
    #[error("task '{0}' has no id yet")]
    MissingId(String),
}

pub type Result<T> = std::result::Result<T, Error>;
