/// Errors produced while reading or using a price feed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// The feed could not be read at all.
    #[error("price feed {feed} is unavailable")]
    Unavailable { feed: String },

    /// The feed answered with a non-positive price.
    #[error("price feed answered a non-positive price: {answer}")]
    InvalidAnswer { answer: i128 },

    /// Converting an amount overflowed 128-bit arithmetic.
    #[error("arithmetic overflow converting {wei} wei at answer {answer}")]
    Overflow { wei: u128, answer: i128 },

    /// The feed reports more decimals than can be scaled.
    #[error("unsupported feed decimals: {0}")]
    UnsupportedDecimals(u8),
}

pub type OracleResult<T> = Result<T, OracleError>;
