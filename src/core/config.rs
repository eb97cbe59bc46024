use crate::core::{constants::*, error::SwapResult, SwapError};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Whether the Router executes adapters that are not in the Trust Registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionPolicy {
    /// Trust bounds automated search only; explicit paths execute as given.
    #[default]
    Permissive,
    /// Every adapter of an executed path must be trusted.
    TrustedOnly,
}

impl FromStr for ExecutionPolicy {
    type Err = SwapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "permissive" => Ok(ExecutionPolicy::Permissive),
            "trusted-only" | "trusted_only" | "trusted" => Ok(ExecutionPolicy::TrustedOnly),
            other => Err(SwapError::ConfigError(format!(
                "Unknown execution policy: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ExecutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionPolicy::Permissive => write!(f, "permissive"),
            ExecutionPolicy::TrustedOnly => write!(f, "trusted-only"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub max_hops: usize,
    pub gas_price: u64,
    pub default_slippage_bps: u16,
    pub max_slippage_bps: u16,
    pub execution_policy: ExecutionPolicy,
    pub wrapped_native: Pubkey,
}

impl Config {
    pub fn from_env() -> SwapResult<Self> {
        let execution_policy = match env::var("ROUTER_EXECUTION_POLICY") {
            Ok(value) => value.parse()?,
            Err(_) => ExecutionPolicy::default(),
        };

        let wrapped_native = match env::var("WRAPPED_NATIVE_MINT") {
            Ok(value) => Pubkey::from_str(&value).map_err(|e| {
                SwapError::ConfigError(format!("Invalid WRAPPED_NATIVE_MINT: {}", e))
            })?,
            Err(_) => *WRAPPED_NATIVE,
        };

        Ok(Self {
            max_hops: env::var("ROUTER_MAX_HOPS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(DEFAULT_MAX_HOPS),
            gas_price: env::var("ROUTER_GAS_PRICE")
                .unwrap_or_default()
                .parse()
                .unwrap_or(0),
            default_slippage_bps: env::var("ROUTER_DEFAULT_SLIPPAGE_BPS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(DEFAULT_SLIPPAGE_BPS),
            max_slippage_bps: env::var("ROUTER_MAX_SLIPPAGE_BPS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(MAX_SLIPPAGE_BPS),
            execution_policy,
            wrapped_native,
        })
    }

    pub fn validate(&self) -> SwapResult<()> {
        if self.max_hops == 0 || self.max_hops > MAX_HOPS_LIMIT {
            return Err(SwapError::ConfigError(format!(
                "Max hops must be between 1 and {}",
                MAX_HOPS_LIMIT
            )));
        }

        if self.max_slippage_bps > 10000 {
            return Err(SwapError::ConfigError(
                "Max slippage cannot exceed 100%".to_string(),
            ));
        }

        if self.default_slippage_bps > self.max_slippage_bps {
            return Err(SwapError::ConfigError(
                "Default slippage cannot exceed max slippage".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
            gas_price: 0,
            default_slippage_bps: DEFAULT_SLIPPAGE_BPS,
            max_slippage_bps: MAX_SLIPPAGE_BPS,
            execution_policy: ExecutionPolicy::default(),
            wrapped_native: *WRAPPED_NATIVE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test_case(0 ; "zero hops")]
    #[test_case(MAX_HOPS_LIMIT + 1 ; "above limit")]
    fn test_rejects_hop_cap(max_hops: usize) {
        let config = Config {
            max_hops,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(SwapError::ConfigError(_))));
    }

    #[test]
    fn test_rejects_inverted_slippage() {
        let config = Config {
            default_slippage_bps: 500,
            max_slippage_bps: 100,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test_case("permissive", ExecutionPolicy::Permissive)]
    #[test_case("trusted-only", ExecutionPolicy::TrustedOnly)]
    #[test_case(" Trusted_Only ", ExecutionPolicy::TrustedOnly)]
    fn test_parse_execution_policy(input: &str, expected: ExecutionPolicy) {
        assert_eq!(input.parse::<ExecutionPolicy>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_execution_policy() {
        assert!("strict".parse::<ExecutionPolicy>().is_err());
    }
}
