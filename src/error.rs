/// Errors returned by spinner configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A style name that is not part of the recognized set.
    #[error("invalid style: {0:?}")]
    InvalidStyle(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
