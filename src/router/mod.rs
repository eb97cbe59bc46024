use crate::adapters::Adapter;
use crate::core::{
    ExecutionPolicy, Ledger, SharedLedger, SwapError, SwapParams, SwapReceipt, SwapResult,
};
use crate::registry::RegistryView;
use chrono::Utc;
use log::{debug, info, warn};
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;

/// Where the input of a swap comes from and where its output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leg {
    Token,
    Native,
}

/// Replays a path hop by hop against live adapters.
#[derive(Debug)]
pub struct Router {
    address: Pubkey,
    governance: Pubkey,
    ledger: SharedLedger,
    registry: RegistryView,
    policy: ExecutionPolicy,
}

impl Router {
    pub fn new(
        address: Pubkey,
        governance: Pubkey,
        ledger: SharedLedger,
        registry: RegistryView,
        policy: ExecutionPolicy,
    ) -> Self {
        Self {
            address,
            governance,
            ledger,
            registry,
            policy,
        }
    }

    /// The Router's own account. Only value mistakenly left here is
    /// recoverable by governance.
    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn governance(&self) -> Pubkey {
        self.governance
    }

    /// Identity allowed to mutate the trust registry.
    pub fn quoter(&self) -> Pubkey {
        self.registry.writer()
    }

    pub fn policy(&self) -> ExecutionPolicy {
        self.policy
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    pub fn is_trusted_adapter(&self, address: &Pubkey) -> bool {
        self.registry.is_trusted_adapter(address)
    }

    pub fn is_trusted_token(&self, token: &Pubkey) -> bool {
        self.registry.is_trusted_token(token)
    }

    pub fn trusted_adapters_count(&self) -> usize {
        self.registry.adapters_count()
    }

    pub fn trusted_tokens_count(&self) -> usize {
        self.registry.tokens_count()
    }

    /// Swap `caller`'s tokens along `params.path`, delivering the output
    /// token to `params.recipient`.
    pub fn swap(&self, caller: &Pubkey, params: &SwapParams) -> SwapResult<SwapReceipt> {
        self.run(caller, params, Leg::Token, Leg::Token)
    }

    /// Like [`Router::swap`], but the input is `caller`'s native currency,
    /// wrapped before the first hop. The path must start at the wrapped
    /// native token.
    pub fn swap_from_gas(&self, caller: &Pubkey, params: &SwapParams) -> SwapResult<SwapReceipt> {
        self.run(caller, params, Leg::Native, Leg::Token)
    }

    /// Like [`Router::swap`], but the path must end at the wrapped native
    /// token, which is unwrapped and paid out as native currency.
    pub fn swap_to_gas(&self, caller: &Pubkey, params: &SwapParams) -> SwapResult<SwapReceipt> {
        self.run(caller, params, Leg::Token, Leg::Native)
    }

    fn run(
        &self,
        caller: &Pubkey,
        params: &SwapParams,
        input: Leg,
        output: Leg,
    ) -> SwapResult<SwapReceipt> {
        validate_params(params)?;
        self.check_policy(params)?;

        let mut ledger = self.ledger.write();
        let wrapped = ledger.wrapped_native();
        let tokens = &params.path.tokens;

        if input == Leg::Native && tokens.first() != Some(&wrapped) {
            return Err(SwapError::InvalidPath(
                "Native input requires a path starting at the wrapped native token".to_string(),
            ));
        }
        if output == Leg::Native && tokens.last() != Some(&wrapped) {
            return Err(SwapError::InvalidPath(
                "Native output requires a path ending at the wrapped native token".to_string(),
            ));
        }

        let result = ledger.transact(|tx| {
            let source = match input {
                Leg::Token => *caller,
                Leg::Native => {
                    tx.transfer_native(caller, &self.address, params.amount_in)?;
                    tx.wrap_native(&self.address, params.amount_in)?;
                    self.address
                }
            };
            let destination = match output {
                Leg::Token => params.recipient,
                Leg::Native => self.address,
            };

            let hop_amounts = execute_hops(tx, &source, &destination, params)?;
            let amount_out = hop_amounts.last().copied().unwrap_or(0);

            if output == Leg::Native {
                tx.unwrap_native(&self.address, amount_out)?;
                tx.transfer_native(&self.address, &params.recipient, amount_out)?;
            }
            Ok(hop_amounts)
        });

        match result {
            Ok(hop_amounts) => {
                let receipt = SwapReceipt {
                    amount_in: params.amount_in,
                    amount_out: hop_amounts.last().copied().unwrap_or(0),
                    hop_amounts,
                    recipient: params.recipient,
                    native_in: input == Leg::Native,
                    native_out: output == Leg::Native,
                    timestamp: Utc::now().timestamp(),
                };
                info!(
                    "Swapped {} -> {} over {} hop(s) for {}",
                    receipt.amount_in,
                    receipt.amount_out,
                    params.path.hops(),
                    receipt.recipient
                );
                Ok(receipt)
            }
            Err(e) => {
                warn!("Swap reverted: {}", e);
                Err(e)
            }
        }
    }

    fn check_policy(&self, params: &SwapParams) -> SwapResult<()> {
        if self.policy == ExecutionPolicy::Permissive {
            return Ok(());
        }
        match params
            .path
            .adapters
            .iter()
            .find(|a| !self.registry.is_trusted_adapter(&a.address()))
        {
            Some(untrusted) => Err(SwapError::UntrustedAdapter(untrusted.address())),
            None => Ok(()),
        }
    }

    /// Governance-only rescue of tokens held by the Router's own account.
    pub fn recover_token(&self, caller: &Pubkey, token: &Pubkey, amount: u64) -> SwapResult<()> {
        self.ensure_governance(caller, "recover router tokens")?;
        self.ledger
            .write()
            .transfer(&self.address, &self.governance, token, amount)?;
        info!("Recovered {} of {} from router", amount, token);
        Ok(())
    }

    /// Governance-only rescue of native currency held by the Router.
    pub fn recover_gas(&self, caller: &Pubkey, amount: u64) -> SwapResult<()> {
        self.ensure_governance(caller, "recover router native currency")?;
        self.ledger
            .write()
            .transfer_native(&self.address, &self.governance, amount)?;
        info!("Recovered {} native from router", amount);
        Ok(())
    }

    fn ensure_governance(&self, caller: &Pubkey, action: &'static str) -> SwapResult<()> {
        if *caller != self.governance {
            warn!("Rejected {} by {}", action, caller);
            return Err(SwapError::Unauthorized {
                caller: *caller,
                action,
            });
        }
        Ok(())
    }
}

fn validate_params(params: &SwapParams) -> SwapResult<()> {
    let path = &params.path;
    if path.is_empty() {
        return Err(SwapError::InvalidPath("Path has no hops".to_string()));
    }
    if path.tokens.len() != path.adapters.len() + 1 {
        return Err(SwapError::InvalidPath(format!(
            "{} adapters need {} tokens, got {}",
            path.adapters.len(),
            path.adapters.len() + 1,
            path.tokens.len()
        )));
    }
    if params.amount_in == 0 {
        return Err(SwapError::InvalidAmount(
            "Swap amount must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Run every hop of `params.path`, moving `source`'s input into the first
/// deposit address and handing each output straight to the next hop.
/// Returns the amount held at each token of the path.
fn execute_hops(
    ledger: &mut Ledger,
    source: &Pubkey,
    destination: &Pubkey,
    params: &SwapParams,
) -> SwapResult<Vec<u64>> {
    let tokens = &params.path.tokens;
    let adapters: &[Arc<dyn Adapter>] = &params.path.adapters;

    let first_deposit = adapters[0].deposit_address(&tokens[0], &tokens[1]);
    ledger.transfer(source, &first_deposit, &tokens[0], params.amount_in)?;

    let mut amounts = Vec::with_capacity(tokens.len());
    amounts.push(params.amount_in);
    let mut running = params.amount_in;

    for (i, adapter) in adapters.iter().enumerate() {
        let (token_in, token_out) = (&tokens[i], &tokens[i + 1]);
        let recipient = match adapters.get(i + 1) {
            Some(next) => next.deposit_address(token_out, &tokens[i + 2]),
            None => *destination,
        };

        running = adapter.swap(ledger, running, token_in, token_out, &recipient)?;
        debug!(
            "Hop {} via {}: {} {} -> {} {}",
            i + 1,
            adapter.name(),
            amounts[i],
            token_in,
            running,
            token_out
        );
        amounts.push(running);
    }

    if running < params.min_amount_out {
        return Err(SwapError::SlippageExceeded {
            expected: params.min_amount_out,
            actual: running,
        });
    }
    Ok(amounts)
}
