pub mod config;
pub mod constants;
pub mod error;
pub mod ledger;
pub mod types;

pub use config::{Config, ExecutionPolicy};
pub use constants::*;
pub use error::{SwapError, SwapResult};
pub use ledger::{Ledger, SharedLedger};
pub use types::*;
