use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

pub type SwapResult<T> = Result<T, SwapError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("No route found from {0} to {1}")]
    NoRouteFound(Pubkey, Pubkey),

    #[error("Insufficient liquidity in {venue}: available {available}, required {required}")]
    InsufficientLiquidity {
        venue: String,
        available: u64,
        required: u64,
    },

    #[error("Slippage exceeded: minimum {expected}, got {actual}")]
    SlippageExceeded { expected: u64, actual: u64 },

    #[error("Adapter {adapter} does not support {token_in} -> {token_out}")]
    UnsupportedPair {
        adapter: Pubkey,
        token_in: Pubkey,
        token_out: Pubkey,
    },

    #[error("Unauthorized: {caller} may not {action}")]
    Unauthorized { caller: Pubkey, action: &'static str },

    #[error("Insufficient deposit at {deposit}: available {available}, required {required}")]
    InsufficientDeposit {
        deposit: Pubkey,
        available: u64,
        required: u64,
    },

    #[error("Insufficient balance of {token} for {account}: available {available}, required {required}")]
    InsufficientBalance {
        account: Pubkey,
        token: Pubkey,
        available: u64,
        required: u64,
    },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Adapter {0} is not trusted for execution")]
    UntrustedAdapter(Pubkey),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Math overflow in calculation")]
    MathOverflow,

    #[error("Invalid pool state: {0}")]
    InvalidPoolState(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Scenario error: {0}")]
    ScenarioError(String),

    #[error("Token not found: {0}")]
    TokenNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<anyhow::Error> for SwapError {
    fn from(err: anyhow::Error) -> Self {
        SwapError::Other(err.to_string())
    }
}

impl From<serde_json::Error> for SwapError {
    fn from(err: serde_json::Error) -> Self {
        SwapError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for SwapError {
    fn from(err: std::io::Error) -> Self {
        SwapError::Other(err.to_string())
    }
}
