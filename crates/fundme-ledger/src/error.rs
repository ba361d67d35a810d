use fundme_oracle::OracleError;

/// Errors produced by ledger operations.
///
/// The display strings of the gating variants are the exact revert reasons
/// clients match on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("windown is closed")]
    WindowClosed,

    #[error("windown is not closed")]
    WindowNotClosed,

    #[error("Send more ETH")]
    InsufficientAmount,

    #[error("this function can only be called by owner")]
    NotOwner,

    #[error("Target is reached")]
    TargetReached,

    #[error("Target is not reached")]
    TargetNotReached,

    #[error("There is no fund for you")]
    NoFundsForCaller,

    #[error("price feed unavailable: {0}")]
    OracleUnavailable(OracleError),

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    #[error("invalid ledger configuration: {0}")]
    InvalidConfig(String),

    #[error("ledger lock poisoned")]
    LockPoisoned,
}

impl LedgerError {
    /// Stable machine-readable code for tooling output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::WindowClosed => "WindowClosed",
            Self::WindowNotClosed => "WindowNotClosed",
            Self::InsufficientAmount => "InsufficientAmount",
            Self::NotOwner => "NotOwner",
            Self::TargetReached => "TargetReached",
            Self::TargetNotReached => "TargetNotReached",
            Self::NoFundsForCaller => "NoFundsForCaller",
            Self::OracleUnavailable(_) => "OracleUnavailable",
            Self::ArithmeticOverflow => "ArithmeticOverflow",
            Self::InvalidConfig(_) => "InvalidConfig",
            Self::LockPoisoned => "LockPoisoned",
        }
    }
}

impl From<OracleError> for LedgerError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::Overflow { .. } => Self::ArithmeticOverflow,
            other => Self::OracleUnavailable(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revert_reasons_are_exact() {
        assert_eq!(LedgerError::WindowClosed.to_string(), "windown is closed");
        assert_eq!(LedgerError::WindowNotClosed.to_string(), "windown is not closed");
        assert_eq!(LedgerError::InsufficientAmount.to_string(), "Send more ETH");
        assert_eq!(
            LedgerError::NotOwner.to_string(),
            "this function can only be called by owner"
        );
        assert_eq!(LedgerError::TargetReached.to_string(), "Target is reached");
        assert_eq!(LedgerError::TargetNotReached.to_string(), "Target is not reached");
        assert_eq!(LedgerError::NoFundsForCaller.to_string(), "There is no fund for you");
    }

    #[test]
    fn oracle_errors_map_to_unavailable() {
        let err: LedgerError = OracleError::Unavailable { feed: "0x00".into() }.into();
        assert_eq!(err.code(), "OracleUnavailable");
        let err: LedgerError = OracleError::InvalidAnswer { answer: 0 }.into();
        assert_eq!(err.code(), "OracleUnavailable");
    }

    #[test]
    fn oracle_overflow_maps_to_arithmetic_overflow() {
        let err: LedgerError = OracleError::Overflow { wei: 1, answer: 1 }.into();
        assert_eq!(err, LedgerError::ArithmeticOverflow);
    }
}
