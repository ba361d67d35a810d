use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Decimal places of the native currency.
pub const NATIVE_DECIMALS: u32 = 18;

/// Smallest units per whole ether.
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// A non-negative native-currency amount, held in wei.
///
/// Serialized as a decimal ether string (`"0.1"`) so it survives formats
/// without 128-bit integers.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub const fn from_wei(wei: u128) -> Self {
        Self(wei)
    }

    pub const fn from_ether(ether: u64) -> Self {
        Self(ether as u128 * WEI_PER_ETHER)
    }

    pub const fn as_wei(&self) -> u128 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parse a decimal ether string such as `"0.1"` or `"1"`.
    ///
    /// At most 18 fractional digits are accepted; signs, exponents and
    /// whitespace are rejected.
    pub fn parse_ether(input: &str) -> Result<Self, TypeError> {
        let invalid = |reason: &str| TypeError::InvalidAmount {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (whole, frac) = match input.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (input, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("no digits"));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid("only decimal digits and one '.' are allowed"));
        }
        if frac.len() > NATIVE_DECIMALS as usize {
            return Err(invalid("more than 18 fractional digits"));
        }

        let whole_wei = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<u128>()
                .ok()
                .and_then(|w| w.checked_mul(WEI_PER_ETHER))
                .ok_or_else(|| invalid("amount too large"))?
        };
        let frac_wei = if frac.is_empty() {
            0
        } else {
            let scale = 10u128.pow(NATIVE_DECIMALS - frac.len() as u32);
            frac.parse::<u128>().map_err(|e| invalid(&e.to_string()))? * scale
        };

        whole_wei
            .checked_add(frac_wei)
            .map(Self)
            .ok_or_else(|| invalid("amount too large"))
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Decimal ether representation without a unit suffix.
    pub fn to_ether_string(&self) -> String {
        let whole = self.0 / WEI_PER_ETHER;
        let frac = self.0 % WEI_PER_ETHER;
        if frac == 0 {
            return whole.to_string();
        }
        let frac = format!("{frac:018}");
        format!("{whole}.{}", frac.trim_end_matches('0'))
    }
}

impl FromStr for Amount {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_ether(s)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|a| a.0).sum())
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({} wei)", self.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ETH", self.to_ether_string())
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_ether_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_ether(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_fractional_ether() {
        assert_eq!(
            Amount::parse_ether("0.1").unwrap().as_wei(),
            100_000_000_000_000_000
        );
        assert_eq!(
            Amount::parse_ether("0.0299").unwrap().as_wei(),
            29_900_000_000_000_000
        );
    }

    #[test]
    fn parses_whole_ether() {
        assert_eq!(Amount::parse_ether("1").unwrap(), Amount::from_ether(1));
        assert_eq!(Amount::parse_ether("1.").unwrap(), Amount::from_ether(1));
        assert_eq!(Amount::parse_ether(".5").unwrap().as_wei(), WEI_PER_ETHER / 2);
    }

    #[test]
    fn smallest_unit() {
        assert_eq!(
            Amount::parse_ether("0.000000000000000001").unwrap(),
            Amount::from_wei(1)
        );
    }

    #[test]
    fn rejects_invalid_input() {
        for bad in ["", ".", "-1", "1e18", "0.1.2", " 1", "0.0000000000000000001"] {
            assert!(
                matches!(Amount::parse_ether(bad), Err(TypeError::InvalidAmount { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_overflow() {
        let huge = "9".repeat(40);
        assert!(Amount::parse_ether(&huge).is_err());
    }

    #[test]
    fn display_trims_trailing_zeros() {
        assert_eq!(Amount::parse_ether("0.10").unwrap().to_string(), "0.1 ETH");
        assert_eq!(Amount::from_ether(2).to_string(), "2 ETH");
        assert_eq!(Amount::ZERO.to_string(), "0 ETH");
    }

    #[test]
    fn sum_adds_all() {
        let total: Amount = [Amount::from_ether(1), Amount::parse_ether("0.5").unwrap()]
            .iter()
            .sum();
        assert_eq!(total.to_ether_string(), "1.5");
    }

    #[test]
    fn checked_arithmetic() {
        assert!(Amount::from_wei(u128::MAX)
            .checked_add(Amount::from_wei(1))
            .is_none());
        assert!(Amount::ZERO.checked_sub(Amount::from_wei(1)).is_none());
        assert_eq!(
            Amount::ZERO.saturating_sub(Amount::from_wei(1)),
            Amount::ZERO
        );
    }

    #[test]
    fn serializes_as_ether_string() {
        let amount = Amount::parse_ether("0.05").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"0.05\"");
        let parsed: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, amount);
    }

    proptest! {
        #[test]
        fn ether_string_is_lossless(wei in 0u128..u128::MAX / 2) {
            let amount = Amount::from_wei(wei);
            prop_assert_eq!(Amount::parse_ether(&amount.to_ether_string()).unwrap(), amount);
        }
    }
}
