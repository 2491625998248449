use thiserror::Error;

#[derive(Error, Debug)]
pub enum VhostError {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("environment error: {0}")]
    Environment(String),

    #[error("baseline request to {url} failed: {source}")]
    Baseline {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected failure while probing '{candidate}': {reason}")]
    ProbeUnexpected { candidate: String, reason: String },

    #[error("interrupted by operator")]
    Interrupted,

    #[error("configuration error: {0:#}")]
    Config(anyhow::Error),

    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl VhostError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            VhostError::Interrupted => 130,
            _ => 1,
        }
    }
}

/// Failure at the candidate probe boundary. Only `Transport` is tolerated.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Unexpected(String),
}

impl ProbeError {
    /// Splits failures building a client into the tolerated network class
    /// and the rest. A builder error here means no request can ever be sent.
    pub fn classify(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ProbeError::Unexpected(format!("request could not be built: {}", err))
        } else {
            ProbeError::Transport(err)
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ProbeError::Transport(_))
    }
}
