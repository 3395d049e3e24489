//! Registry of the blockchain networks this backend can sync.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One of the supported blockchain networks.
///
/// The set is closed: anything outside it is rejected with
/// [`Error::UnknownNetwork`] before any I/O happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkId {
    #[serde(rename = "ETH")]
    Eth,
    #[serde(rename = "BTC")]
    Btc,
    #[serde(rename = "DASH")]
    Dash,
    #[serde(rename = "LTC")]
    Ltc,
    #[serde(rename = "BTC_TEST3")]
    BtcTest3,
}

impl NetworkId {
    /// Every registered network, in registry order
    pub const ALL: [NetworkId; 5] = [
        NetworkId::Eth,
        NetworkId::Btc,
        NetworkId::Dash,
        NetworkId::Ltc,
        NetworkId::BtcTest3,
    ];

    /// Canonical identifier, as stored in the `blockchain_type` column
    pub const fn as_str(&self) -> &'static str {
        match self {
            NetworkId::Eth => "ETH",
            NetworkId::Btc => "BTC",
            NetworkId::Dash => "DASH",
            NetworkId::Ltc => "LTC",
            NetworkId::BtcTest3 => "BTC_TEST3",
        }
    }

    /// Path of the chain endpoint, relative to the API base URL
    pub const fn endpoint_path(&self) -> &'static str {
        match self {
            NetworkId::Eth => "eth/main",
            NetworkId::Btc => "btc/main",
            NetworkId::Dash => "dash/main",
            NetworkId::Ltc => "ltc/main",
            NetworkId::BtcTest3 => "btc/test3",
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NetworkId::ALL
            .into_iter()
            .find(|network| network.as_str() == s)
            .ok_or_else(|| Error::UnknownNetwork(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_canonical_identifier() {
        for network in NetworkId::ALL {
            assert_eq!(network.as_str().parse::<NetworkId>().unwrap(), network);
            assert_eq!(network.to_string(), network.as_str());
        }
    }

    #[test]
    fn endpoint_paths_are_fixed() {
        assert_eq!(NetworkId::Eth.endpoint_path(), "eth/main");
        assert_eq!(NetworkId::Btc.endpoint_path(), "btc/main");
        assert_eq!(NetworkId::Dash.endpoint_path(), "dash/main");
        assert_eq!(NetworkId::Ltc.endpoint_path(), "ltc/main");
        assert_eq!(NetworkId::BtcTest3.endpoint_path(), "btc/test3");
    }

    #[test]
    fn rejects_anything_outside_the_registry() {
        for input in ["INVALID", "btc", "Btc", "BTC ", "BTC_TEST", "eth/main", ""] {
            let err = input.parse::<NetworkId>().unwrap_err();
            assert!(
                matches!(err, Error::UnknownNetwork(ref id) if id == input),
                "`{input}` should be rejected"
            );
        }
    }

    #[test]
    fn serializes_as_canonical_string() {
        assert_eq!(
            serde_json::to_string(&NetworkId::BtcTest3).unwrap(),
            "\"BTC_TEST3\""
        );
    }
}
