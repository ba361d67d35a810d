use fundme_types::Amount;

use crate::error::{OracleError, OracleResult};
use crate::feed::PriceFeed;

/// Decimals of every USD value produced by this module.
pub const USD_DECIMALS: u32 = 18;

/// A whole-dollar amount expressed with [`USD_DECIMALS`] decimals.
pub const fn usd(dollars: u64) -> u128 {
    dollars as u128 * 10u128.pow(USD_DECIMALS)
}

/// Convert a native amount to USD (18 decimals) at the feed's latest answer.
///
/// `usd = wei * answer / 10^decimals`, rounded down. The native unit and
/// the result share 18 decimals, so only the feed's own scale is removed.
pub fn to_usd(amount: Amount, feed: &dyn PriceFeed) -> OracleResult<u128> {
    let round = feed.latest_round_data()?;
    if round.answer <= 0 {
        return Err(OracleError::InvalidAnswer {
            answer: round.answer,
        });
    }
    let decimals = feed.decimals();
    let scale = 10u128
        .checked_pow(u32::from(decimals))
        .ok_or(OracleError::UnsupportedDecimals(decimals))?;

    // Positive i128 always fits in u128.
    let price = round.answer as u128;
    let wei = amount.as_wei();
    wei.checked_mul(price)
        .map(|p| p / scale)
        .ok_or(OracleError::Overflow {
            wei,
            answer: round.answer,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockV3Aggregator, DECIMALS, INITIAL_ANSWER};
    use fundme_types::{Address, Timestamp};

    fn feed(answer: i128) -> MockV3Aggregator {
        MockV3Aggregator::new(
            Address::derive("feed"),
            DECIMALS,
            answer,
            Timestamp::from_secs(1),
        )
    }

    #[test]
    fn usd_scales_whole_dollars() {
        assert_eq!(usd(1), 1_000_000_000_000_000_000);
        assert_eq!(usd(0), 0);
    }

    #[test]
    fn one_ether_at_initial_answer_is_3000_usd() {
        let value = to_usd(Amount::from_ether(1), &feed(INITIAL_ANSWER)).unwrap();
        assert_eq!(value, usd(3000));
    }

    #[test]
    fn fractional_amounts_convert_proportionally() {
        let f = feed(INITIAL_ANSWER);
        assert_eq!(to_usd(Amount::parse_ether("0.1").unwrap(), &f).unwrap(), usd(300));
        assert_eq!(to_usd(Amount::parse_ether("0.05").unwrap(), &f).unwrap(), usd(150));
        assert_eq!(to_usd(Amount::parse_ether("0.01").unwrap(), &f).unwrap(), usd(30));
    }

    #[test]
    fn zero_amount_is_zero_usd() {
        assert_eq!(to_usd(Amount::ZERO, &feed(INITIAL_ANSWER)).unwrap(), 0);
    }

    #[test]
    fn non_positive_answer_is_rejected() {
        assert_eq!(
            to_usd(Amount::from_ether(1), &feed(0)).unwrap_err(),
            OracleError::InvalidAnswer { answer: 0 }
        );
        assert_eq!(
            to_usd(Amount::from_ether(1), &feed(-5)).unwrap_err(),
            OracleError::InvalidAnswer { answer: -5 }
        );
    }

    #[test]
    fn overflow_is_reported() {
        let err = to_usd(Amount::from_wei(u128::MAX), &feed(INITIAL_ANSWER)).unwrap_err();
        assert!(matches!(err, OracleError::Overflow { .. }));
    }

    #[test]
    fn unavailable_feed_propagates() {
        let f = feed(INITIAL_ANSWER);
        f.set_unavailable(true).unwrap();
        assert!(matches!(
            to_usd(Amount::from_ether(1), &f),
            Err(OracleError::Unavailable { .. })
        ));
    }
}
