use crate::core::{SwapError, SwapResult};
use log::debug;
use parking_lot::RwLock;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::sync::Arc;

pub type SharedLedger = Arc<RwLock<Ledger>>;

/// In-memory host state: token balances, native balances and the reserves
/// each venue has synced for its pool account.
///
/// A pool account's token balance is never below its synced reserve. Any
/// surplus is an unclaimed deposit that the next swap on that venue consumes.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    wrapped_native: Pubkey,
    balances: HashMap<(Pubkey, Pubkey), u64>,
    native: HashMap<Pubkey, u64>,
    reserves: HashMap<(Pubkey, Pubkey), u64>,
}

impl Ledger {
    pub fn new(wrapped_native: Pubkey) -> Self {
        Self {
            wrapped_native,
            ..Self::default()
        }
    }

    pub fn shared(wrapped_native: Pubkey) -> SharedLedger {
        Arc::new(RwLock::new(Self::new(wrapped_native)))
    }

    pub fn wrapped_native(&self) -> Pubkey {
        self.wrapped_native
    }

    pub fn balance_of(&self, account: &Pubkey, token: &Pubkey) -> u64 {
        self.balances.get(&(*account, *token)).copied().unwrap_or(0)
    }

    pub fn native_balance_of(&self, account: &Pubkey) -> u64 {
        self.native.get(account).copied().unwrap_or(0)
    }

    pub fn reserve_of(&self, pool: &Pubkey, token: &Pubkey) -> u64 {
        self.reserves.get(&(*pool, *token)).copied().unwrap_or(0)
    }

    /// Balance held by `pool` above its synced reserve.
    pub fn unsynced_balance(&self, pool: &Pubkey, token: &Pubkey) -> u64 {
        self.balance_of(pool, token)
            .saturating_sub(self.reserve_of(pool, token))
    }

    pub fn set_reserve(&mut self, pool: &Pubkey, token: &Pubkey, amount: u64) {
        self.reserves.insert((*pool, *token), amount);
    }

    /// Create `amount` of `token` out of thin air. Setup only.
    pub fn mint(&mut self, account: &Pubkey, token: &Pubkey, amount: u64) -> SwapResult<()> {
        let balance = self.balances.entry((*account, *token)).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(SwapError::MathOverflow)?;
        Ok(())
    }

    /// Create native currency out of thin air. Setup only.
    pub fn credit_native(&mut self, account: &Pubkey, amount: u64) -> SwapResult<()> {
        let balance = self.native.entry(*account).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(SwapError::MathOverflow)?;
        Ok(())
    }

    pub fn transfer(
        &mut self,
        from: &Pubkey,
        to: &Pubkey,
        token: &Pubkey,
        amount: u64,
    ) -> SwapResult<()> {
        let available = self.balance_of(from, token);
        if available < amount {
            return Err(SwapError::InsufficientBalance {
                account: *from,
                token: *token,
                available,
                required: amount,
            });
        }
        if from == to || amount == 0 {
            return Ok(());
        }

        let credited = self
            .balance_of(to, token)
            .checked_add(amount)
            .ok_or(SwapError::MathOverflow)?;
        self.balances.insert((*from, *token), available - amount);
        self.balances.insert((*to, *token), credited);

        debug!("transfer {} of {} from {} to {}", amount, token, from, to);
        Ok(())
    }

    pub fn transfer_native(&mut self, from: &Pubkey, to: &Pubkey, amount: u64) -> SwapResult<()> {
        let available = self.native_balance_of(from);
        if available < amount {
            return Err(SwapError::InsufficientBalance {
                account: *from,
                token: Pubkey::default(),
                available,
                required: amount,
            });
        }
        if from == to || amount == 0 {
            return Ok(());
        }

        let credited = self
            .native_balance_of(to)
            .checked_add(amount)
            .ok_or(SwapError::MathOverflow)?;
        self.native.insert(*from, available - amount);
        self.native.insert(*to, credited);
        Ok(())
    }

    /// Convert native currency held by `account` into the wrapped-native token.
    /// The wrapped token's own account holds the native backing.
    pub fn wrap_native(&mut self, account: &Pubkey, amount: u64) -> SwapResult<()> {
        let vault = self.wrapped_native;
        self.transfer_native(account, &vault, amount)?;
        self.mint(account, &vault, amount)
    }

    /// Burn wrapped-native tokens held by `account` and release the backing.
    pub fn unwrap_native(&mut self, account: &Pubkey, amount: u64) -> SwapResult<()> {
        let vault = self.wrapped_native;
        let available = self.balance_of(account, &vault);
        if available < amount {
            return Err(SwapError::InsufficientBalance {
                account: *account,
                token: vault,
                available,
                required: amount,
            });
        }
        self.balances.insert((*account, vault), available - amount);
        self.transfer_native(&vault, account, amount)
    }

    /// Run `f` against the ledger, restoring the prior state if it fails.
    pub fn transact<T, F>(&mut self, f: F) -> SwapResult<T>
    where
        F: FnOnce(&mut Ledger) -> SwapResult<T>,
    {
        let checkpoint = self.clone();
        match f(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                *self = checkpoint;
                debug!("ledger transaction rolled back: {}", err);
                Err(err)
            }
        }
    }
}
