use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// A point in time, in whole seconds since the UNIX epoch.
///
/// Funding windows are compared at second granularity, the same resolution
/// block timestamps carry.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self(secs)
    }

    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    /// This timestamp shifted forward, saturating at the maximum.
    pub const fn plus(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Seconds from `earlier` to `self`, zero if `earlier` is later.
    pub const fn seconds_since(&self, earlier: &Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match i64::try_from(self.0)
            .ok()
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        {
            Some(dt) => write!(f, "{}", dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
            None => write!(f, "{}s", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_produces_reasonable_timestamp() {
        // After 2020-01-01.
        assert!(Timestamp::now().as_secs() > 1_577_836_800);
    }

    #[test]
    fn plus_saturates() {
        assert_eq!(Timestamp::from_secs(u64::MAX).plus(10).as_secs(), u64::MAX);
        assert_eq!(Timestamp::from_secs(100).plus(120).as_secs(), 220);
    }

    #[test]
    fn seconds_since() {
        let a = Timestamp::from_secs(100);
        let b = Timestamp::from_secs(250);
        assert_eq!(b.seconds_since(&a), 150);
        assert_eq!(a.seconds_since(&b), 0);
    }

    #[test]
    fn ordering() {
        let a = Timestamp::from_secs(1);
        let b = Timestamp::from_secs(2);
        assert!(a < b);
        assert_eq!(a.plus(1), b);
    }

    #[test]
    fn display_is_rfc3339() {
        assert_eq!(Timestamp::from_secs(0).to_string(), "1970-01-01T00:00:00Z");
        assert_eq!(
            Timestamp::from_secs(1_700_000_000).to_string(),
            "2023-11-14T22:13:20Z"
        );
    }

    #[test]
    fn serde_is_plain_seconds() {
        let ts = Timestamp::from_secs(1234);
        assert_eq!(serde_json::to_string(&ts).unwrap(), "1234");
        let parsed: Timestamp = serde_json::from_str("1234").unwrap();
        assert_eq!(parsed, ts);
    }
}
