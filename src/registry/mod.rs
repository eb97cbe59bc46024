use crate::adapters::Adapter;
use crate::core::{SwapError, SwapResult};
use log::{debug, info};
use parking_lot::RwLock;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashSet;
use std::sync::Arc;

pub type SharedRegistry = Arc<RwLock<TrustRegistry>>;

/// Adapters and intermediate tokens eligible for automated path search.
///
/// There is one registry per Router/Quoter pair. Only the writer identity
/// (the Quoter) may mutate it. The Router holds a [`RegistryView`] over the
/// same data.
#[derive(Debug)]
pub struct TrustRegistry {
    writer: Pubkey,
    adapters: Vec<Arc<dyn Adapter>>,
    tokens: Vec<Pubkey>,
}

impl TrustRegistry {
    pub fn new(writer: Pubkey) -> Self {
        Self {
            writer,
            adapters: Vec::new(),
            tokens: Vec::new(),
        }
    }

    pub fn shared(writer: Pubkey) -> SharedRegistry {
        Arc::new(RwLock::new(Self::new(writer)))
    }

    pub fn writer(&self) -> Pubkey {
        self.writer
    }

    fn authorize(&self, caller: &Pubkey, action: &'static str) -> SwapResult<()> {
        if *caller != self.writer {
            return Err(SwapError::Unauthorized {
                caller: *caller,
                action,
            });
        }
        Ok(())
    }

    /// Returns `false` if the adapter was already trusted.
    pub fn add_adapter(&mut self, caller: &Pubkey, adapter: Arc<dyn Adapter>) -> SwapResult<bool> {
        self.authorize(caller, "add trusted adapter")?;
        if self.is_trusted_adapter(&adapter.address()) {
            debug!("Adapter {} already trusted", adapter.name());
            return Ok(false);
        }
        info!("Trusting adapter {} ({})", adapter.name(), adapter.address());
        self.adapters.push(adapter);
        Ok(true)
    }

    /// Returns `false` if the adapter was not trusted.
    pub fn remove_adapter(&mut self, caller: &Pubkey, address: &Pubkey) -> SwapResult<bool> {
        self.authorize(caller, "remove trusted adapter")?;
        let before = self.adapters.len();
        self.adapters.retain(|a| a.address() != *address);
        let removed = self.adapters.len() != before;
        if removed {
            info!("Removed adapter {} from trust registry", address);
        }
        Ok(removed)
    }

    /// Replace the whole adapter set. Later duplicates are dropped.
    pub fn set_adapters(&mut self, caller: &Pubkey, adapters: Vec<Arc<dyn Adapter>>) -> SwapResult<()> {
        self.authorize(caller, "set trusted adapters")?;
        let mut seen = HashSet::new();
        self.adapters = adapters
            .into_iter()
            .filter(|a| seen.insert(a.address()))
            .collect();
        info!("Trust registry now holds {} adapters", self.adapters.len());
        Ok(())
    }

    pub fn add_token(&mut self, caller: &Pubkey, token: Pubkey) -> SwapResult<bool> {
        self.authorize(caller, "add trusted token")?;
        if self.tokens.contains(&token) {
            return Ok(false);
        }
        info!("Trusting token {}", token);
        self.tokens.push(token);
        Ok(true)
    }

    pub fn remove_token(&mut self, caller: &Pubkey, token: &Pubkey) -> SwapResult<bool> {
        self.authorize(caller, "remove trusted token")?;
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        let removed = self.tokens.len() != before;
        if removed {
            info!("Removed token {} from trust registry", token);
        }
        Ok(removed)
    }

    pub fn set_tokens(&mut self, caller: &Pubkey, tokens: Vec<Pubkey>) -> SwapResult<()> {
        self.authorize(caller, "set trusted tokens")?;
        let mut seen = HashSet::new();
        self.tokens = tokens.into_iter().filter(|t| seen.insert(*t)).collect();
        info!("Trust registry now holds {} tokens", self.tokens.len());
        Ok(())
    }

    pub fn adapters(&self) -> &[Arc<dyn Adapter>] {
        &self.adapters
    }

    pub fn tokens(&self) -> &[Pubkey] {
        &self.tokens
    }

    pub fn adapter(&self, address: &Pubkey) -> Option<Arc<dyn Adapter>> {
        self.adapters
            .iter()
            .find(|a| a.address() == *address)
            .cloned()
    }

    pub fn is_trusted_adapter(&self, address: &Pubkey) -> bool {
        self.adapters.iter().any(|a| a.address() == *address)
    }

    pub fn is_trusted_token(&self, token: &Pubkey) -> bool {
        self.tokens.contains(token)
    }
}

/// Read-only handle on a shared registry.
#[derive(Debug, Clone)]
pub struct RegistryView {
    inner: SharedRegistry,
}

impl RegistryView {
    pub fn new(inner: SharedRegistry) -> Self {
        Self { inner }
    }

    pub fn writer(&self) -> Pubkey {
        self.inner.read().writer()
    }

    pub fn is_trusted_adapter(&self, address: &Pubkey) -> bool {
        self.inner.read().is_trusted_adapter(address)
    }

    pub fn is_trusted_token(&self, token: &Pubkey) -> bool {
        self.inner.read().is_trusted_token(token)
    }

    pub fn adapter(&self, address: &Pubkey) -> Option<Arc<dyn Adapter>> {
        self.inner.read().adapter(address)
    }

    pub fn adapters(&self) -> Vec<Arc<dyn Adapter>> {
        self.inner.read().adapters().to_vec()
    }

    pub fn tokens(&self) -> Vec<Pubkey> {
        self.inner.read().tokens().to_vec()
    }

    pub fn adapters_count(&self) -> usize {
        self.inner.read().adapters().len()
    }

    pub fn tokens_count(&self) -> usize {
        self.inner.read().tokens().len()
    }
}
