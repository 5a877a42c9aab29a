#[derive(Debug, thiserror::Error)]
pub enum QuoteBookError {
    #[error("requested volume must be greater than zero")]
    ZeroVolume,
    #[error("invalid timestamp {value:?} for format {format:?}: {source}")]
    InvalidTimestamp {
        value: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },
}

pub type Result<T> = std::result::Result<T, QuoteBookError>;
