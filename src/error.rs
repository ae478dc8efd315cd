use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no room to place {what}: the placement area has no cells")]
    EmptyArea { what: &'static str },

    #[error("gave up placing {what} after {attempts} attempts")]
    PlacementExhausted { what: &'static str, attempts: u64 },

    #[error("terminal error: {0}")]
    Terminal(#[from] crossterm::ErrorKind),
}

pub type Result<T> = std::result::Result<T, GameError>;
