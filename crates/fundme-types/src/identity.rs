use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Account or contract identity.
///
/// An `Address` is 20 bytes, rendered as `0x` followed by 40 lowercase hex
/// characters. Named accounts and contract addresses are derived
/// deterministically with BLAKE3, so the same label (or deployer and nonce)
/// always produces the same address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    bytes: [u8; 20],
}

impl Address {
    pub const LEN: usize = 20;

    /// The all-zero address.
    pub const ZERO: Self = Self { bytes: [0; 20] };

    /// Derive an account address from a human-readable label.
    pub fn derive(label: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"fundme-address-v1:account:");
        hasher.update(label.as_bytes());
        Self::from_digest(hasher.finalize().as_bytes())
    }

    /// Derive the address of a contract created by `deployer` at `nonce`.
    pub fn contract(deployer: &Address, nonce: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"fundme-address-v1:contract:");
        hasher.update(&deployer.bytes);
        hasher.update(&nonce.to_le_bytes());
        Self::from_digest(hasher.finalize().as_bytes())
    }

    /// Create from raw bytes.
    pub fn from_raw(bytes: [u8; 20]) -> Self {
        Self { bytes }
    }

    /// The raw 20 bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.bytes
    }

    /// Full `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.bytes))
    }

    /// Short identifier for log lines (`0x` + first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("0x{}", hex::encode(&self.bytes[..4]))
    }

    /// Parse from a hex string, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != Self::LEN {
            return Err(TypeError::InvalidLength {
                expected: Self::LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self { bytes: arr })
    }

    fn from_digest(digest: &[u8; 32]) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[..20]);
        Self { bytes }
    }
}

impl FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.short_id())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        assert_eq!(Address::derive("firstAccount"), Address::derive("firstAccount"));
    }

    #[test]
    fn different_labels_produce_different_addresses() {
        assert_ne!(Address::derive("firstAccount"), Address::derive("secondAccount"));
    }

    #[test]
    fn contract_address_depends_on_nonce() {
        let deployer = Address::derive("deployer");
        assert_ne!(Address::contract(&deployer, 0), Address::contract(&deployer, 1));
        assert_eq!(Address::contract(&deployer, 3), Address::contract(&deployer, 3));
    }

    #[test]
    fn contract_and_account_namespaces_differ() {
        let deployer = Address::derive("deployer");
        assert_ne!(Address::contract(&deployer, 0), deployer);
    }

    #[test]
    fn hex_format() {
        let addr = Address::from_raw([0xab; 20]);
        let hex = addr.to_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.len(), 42);
        assert_eq!(addr.short_id(), "0xabababab");
    }

    #[test]
    fn parses_known_feed_address() {
        let addr: Address = "0x694AA1769357215DE4FAC081bf1f309aDC325306".parse().unwrap();
        assert_eq!(addr.to_hex(), "0x694aa1769357215de4fac081bf1f309adc325306");
    }

    #[test]
    fn from_hex_without_prefix() {
        let addr = Address::derive("x");
        let bare = hex::encode(addr.as_bytes());
        assert_eq!(Address::from_hex(&bare).unwrap(), addr);
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        let err = Address::from_hex("0xabcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 20,
                actual: 2
            }
        );
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert!(matches!(
            Address::from_hex("0xzz"),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn serializes_as_hex_string() {
        let addr = Address::from_raw([1; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", addr.to_hex()));
        let parsed: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, addr);
    }
}
