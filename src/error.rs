use thiserror::Error;

/// Why a report could not be fetched. Any of these marks the cycle unreachable.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source:  std::io::Error,
    },

    #[error("no answer within {secs}s")]
    Timeout { secs: u64 },

    #[error("empty response: {stderr}")]
    Empty { stderr: String },

    #[error("cannot connect to {addr}: {source}")]
    Connect {
        addr:   String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
