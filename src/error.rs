use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HatError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// the draw for `n` people had to start over more than the allowed number of times.
    #[error("drawing for n={n} restarted {restarts} times without finishing")]
    RetryLimitExceeded { n: usize, restarts: u64 },
    #[error("config error: {0}")]
    Config(String),
}

impl HatError {
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        HatError::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, HatError>;
