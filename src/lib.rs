pub mod adapters;
pub mod cli;
pub mod core;
pub mod quoter;
pub mod registry;
pub mod router;
pub mod scenario;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use adapters::{Adapter, ConstantProductAdapter, ConstantSumAdapter, StableSwapAdapter};
pub use core::{
    Config, ExecutionPolicy, Ledger, PathQuote, SwapError, SwapParams, SwapPath, SwapReceipt,
    SwapResult,
};
pub use quoter::Quoter;
pub use registry::{RegistryView, TrustRegistry};
pub use router::Router;
pub use scenario::{deploy, Deployment, ScenarioConfig};
