//! Network profiles.
//!
//! A profile tells the network client where a development or test node
//! lives. The reserved in-process profile ([`DEFAULT_NETWORK`]) has no
//! endpoint: the toolchain spins up an ephemeral chain itself.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Name of the built-in ephemeral network that needs no parameters.
pub const DEFAULT_NETWORK: &str = "hardhat";

/// Endpoint schemes a JSON-RPC client can reach.
pub const SUPPORTED_URL_SCHEMES: &[&str] = &["http", "https", "ws", "wss"];

/// Gas limit or gas price setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GasRepr", into = "GasRepr")]
pub enum GasSetting {
    /// Let the client estimate.
    Auto,
    /// Fixed amount.
    Fixed(u64),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum GasRepr {
    Amount(u64),
    Keyword(String),
}

impl TryFrom<GasRepr> for GasSetting {
    type Error = String;

    fn try_from(repr: GasRepr) -> Result<Self, Self::Error> {
        match repr {
            GasRepr::Amount(0) => Err("must be a positive integer or \"auto\"".to_string()),
            GasRepr::Amount(n) => Ok(GasSetting::Fixed(n)),
            GasRepr::Keyword(k) if k == "auto" => Ok(GasSetting::Auto),
            GasRepr::Keyword(k) => Err(format!("expected \"auto\" or an integer, got \"{k}\"")),
        }
    }
}

impl From<GasSetting> for GasRepr {
    fn from(gas: GasSetting) -> Self {
        match gas {
            GasSetting::Auto => GasRepr::Keyword("auto".to_string()),
            GasSetting::Fixed(n) => GasRepr::Amount(n),
        }
    }
}

impl fmt::Display for GasSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GasSetting::Auto => write!(f, "auto"),
            GasSetting::Fixed(n) => write!(f, "{n}"),
        }
    }
}

/// Connection parameters for one named profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkParameters {
    /// Endpoint exactly as written in the source; checked with `Url::parse`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<GasSetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<GasSetting>,
    /// Request timeout in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl NetworkParameters {
    /// The reserved profile: no endpoint, nothing else set.
    pub fn in_process() -> Self {
        Self::default()
    }

    /// Whether this profile is served by the toolchain's own ephemeral chain.
    pub fn is_in_process(&self) -> bool {
        self.url.is_none()
    }

    /// Endpoint as text, or `in-process` for the reserved profile.
    pub fn endpoint(&self) -> &str {
        self.url.as_deref().unwrap_or("in-process")
    }
}

/// Profile entry exactly as written in the source.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct RawNetwork {
    url: Option<String>,
    chain_id: Option<u64>,
    gas: Option<GasSetting>,
    gas_price: Option<GasSetting>,
    timeout: Option<u64>,
}

impl RawNetwork {
    /// Check one entry and turn it into typed parameters.
    pub(crate) fn validate(self, name: &str) -> Result<NetworkParameters, ConfigError> {
        let url = match (name == DEFAULT_NETWORK, self.url) {
            (true, Some(_)) => {
                return Err(ConfigError::schema(
                    format!("networks.{name}.url"),
                    "the in-process network cannot have a url",
                ));
            }
            (true, None) => None,
            (false, None) => {
                return Err(ConfigError::schema(
                    format!("networks.{name}.url"),
                    "missing required field",
                ));
            }
            (false, Some(raw)) => {
                check_endpoint(name, &raw)?;
                Some(raw)
            }
        };

        if self.chain_id == Some(0) {
            return Err(ConfigError::schema(
                format!("networks.{name}.chainId"),
                "chain id must be non-zero",
            ));
        }

        if self.timeout == Some(0) {
            return Err(ConfigError::schema(
                format!("networks.{name}.timeout"),
                "timeout must be non-zero",
            ));
        }

        Ok(NetworkParameters {
            url,
            chain_id: self.chain_id,
            gas: self.gas,
            gas_price: self.gas_price,
            timeout: self.timeout,
        })
    }
}

fn check_endpoint(name: &str, raw: &str) -> Result<(), ConfigError> {
    let field = format!("networks.{name}.url");
    if raw.trim() != raw {
        return Err(ConfigError::schema(
            &field,
            format!("`{raw}` has surrounding whitespace"),
        ));
    }

    let url = Url::parse(raw)
        .map_err(|e| ConfigError::schema(&field, format!("`{raw}` is not a valid url: {e}")))?;

    if !SUPPORTED_URL_SCHEMES.contains(&url.scheme()) {
        return Err(ConfigError::schema(
            &field,
            format!(
                "unsupported scheme `{}`; must be one of {}",
                url.scheme(),
                SUPPORTED_URL_SCHEMES.join(", ")
            ),
        ));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::schema(&field, format!("`{raw}` has no host")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawNetwork {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_localhost_profile() {
        let params = raw(json!({ "url": "http://127.0.0.1:8545", "chainId": 31337 }))
            .validate("localhost")
            .unwrap();
        assert_eq!(params.url.as_deref(), Some("http://127.0.0.1:8545"));
        assert_eq!(params.endpoint(), "http://127.0.0.1:8545");
        assert_eq!(params.chain_id, Some(31337));
        assert!(!params.is_in_process());
    }

    #[test]
    fn test_in_process_needs_no_url() {
        let params = raw(json!({})).validate(DEFAULT_NETWORK).unwrap();
        assert!(params.is_in_process());
        assert_eq!(params.endpoint(), "in-process");
    }

    #[test]
    fn test_in_process_rejects_url() {
        let err = raw(json!({ "url": "http://127.0.0.1:8545" }))
            .validate(DEFAULT_NETWORK)
            .unwrap_err();
        assert_eq!(err.field(), Some("networks.hardhat.url"));
    }

    #[test]
    fn test_missing_url() {
        let err = raw(json!({ "chainId": 5 })).validate("goerli").unwrap_err();
        assert!(err.is_schema());
        assert_eq!(err.field(), Some("networks.goerli.url"));
    }

    #[test]
    fn test_bad_urls() {
        for url in [
            "not a url",
            "ftp://example.com",
            "127.0.0.1:8545",
            " http://localhost:8545",
        ] {
            let err = raw(json!({ "url": url })).validate("remote").unwrap_err();
            assert_eq!(err.field(), Some("networks.remote.url"), "{url}");
        }
    }

    #[test]
    fn test_websocket_endpoint() {
        let params = raw(json!({ "url": "wss://node.example.org/rpc" }))
            .validate("remote")
            .unwrap();
        assert_eq!(params.endpoint(), "wss://node.example.org/rpc");
    }

    #[test]
    fn test_gas_settings() {
        let params = raw(json!({
            "url": "http://localhost:8545",
            "gas": "auto",
            "gasPrice": 1_000_000_000u64,
        }))
        .validate("local")
        .unwrap();
        assert_eq!(params.gas, Some(GasSetting::Auto));
        assert_eq!(params.gas_price, Some(GasSetting::Fixed(1_000_000_000)));
        assert_eq!(params.gas_price.unwrap().to_string(), "1000000000");
    }

    #[test]
    fn test_gas_rejects_zero_and_unknown_keyword() {
        assert!(serde_json::from_value::<RawNetwork>(json!({ "gas": 0 })).is_err());
        assert!(serde_json::from_value::<RawNetwork>(json!({ "gas": "max" })).is_err());
    }

    #[test]
    fn test_accounts_not_accepted() {
        let result = serde_json::from_value::<RawNetwork>(json!({
            "url": "http://localhost:8545",
            "accounts": ["0x01"],
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_chain_id() {
        let err = raw(json!({ "url": "http://localhost:8545", "chainId": 0 }))
            .validate("local")
            .unwrap_err();
        assert_eq!(err.field(), Some("networks.local.chainId"));
    }
}
