use crate::adapters::{
    Adapter, AdapterInfo, ConstantProductAdapter, ConstantSumAdapter, StableSwapAdapter,
};
use crate::core::{
    Config, Ledger, SharedLedger, SwapError, SwapResult, TokenInfo, VenueKind,
    CONSTANT_PRODUCT_FEE_BPS, CONSTANT_PRODUCT_GAS_ESTIMATE, CONSTANT_PRODUCT_PROGRAM,
    CONSTANT_SUM_FEE_BPS, CONSTANT_SUM_GAS_ESTIMATE, CONSTANT_SUM_PROGRAM, DEFAULT_AMP_FACTOR,
    MAX_TOKEN_DECIMALS, NATIVE_SYMBOL, STABLE_SWAP_FEE_BPS, STABLE_SWAP_GAS_ESTIMATE,
    STABLE_SWAP_PROGRAM, STABLE_SWAP_UNDERQUOTE,
};
use crate::quoter::Quoter;
use crate::router::Router;
use crate::utils::{derive_address, parse_token_identifier};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;

/// Simulated market described in JSON: tokens, venues with their seeded
/// liquidity and funded accounts. [`deploy`] turns it into a ledger plus a
/// wired Router/Quoter pair, registering every venue marked `trusted`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    pub tokens: Vec<TokenSpec>,
    pub venues: Vec<VenueSpec>,
    #[serde(default)]
    pub accounts: Vec<AccountSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSpec {
    pub symbol: String,
    pub decimals: u8,
    /// Eligible as an intermediate hop.
    #[serde(default)]
    pub trusted: bool,
    /// Use the configured wrapped-native mint for this token.
    #[serde(default)]
    pub wrapped_native: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueSpec {
    pub name: String,
    pub kind: VenueKind,
    pub tokens: Vec<String>,
    /// Base-unit liquidity, in `tokens` order.
    pub reserves: Vec<u64>,
    pub fee_bps: Option<u64>,
    pub amp: Option<u64>,
    pub gas_estimate: Option<u64>,
    pub underquote_tolerance: Option<u64>,
    #[serde(default = "default_trusted")]
    pub trusted: bool,
}

fn default_trusted() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSpec {
    pub name: String,
    /// Base-unit balances keyed by token symbol.
    #[serde(default)]
    pub balances: BTreeMap<String, u64>,
    #[serde(default)]
    pub native: u64,
}

impl ScenarioConfig {
    pub fn from_json(json: &str) -> SwapResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> SwapResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SwapError::ScenarioError(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }
}

/// A deployed scenario: shared ledger, Router/Quoter pair and the
/// identities that administer them.
#[derive(Debug, Clone)]
pub struct Deployment {
    pub name: String,
    pub ledger: SharedLedger,
    pub router: Arc<Router>,
    pub quoter: Arc<Quoter>,
    /// Owner of the Quoter and of every deployed adapter.
    pub owner: Pubkey,
    pub governance: Pubkey,
    pub tokens: Vec<TokenInfo>,
    /// Every deployed venue, trusted or not.
    pub adapters: Vec<Arc<dyn Adapter>>,
    pub accounts: BTreeMap<String, Pubkey>,
}

impl Deployment {
    /// Look up a token by symbol or address.
    pub fn token(&self, input: &str) -> SwapResult<&TokenInfo> {
        let mint = parse_token_identifier(input, &self.tokens)
            .ok_or_else(|| SwapError::TokenNotFound(input.to_string()))?;
        self.token_by_mint(&mint)
            .ok_or_else(|| SwapError::TokenNotFound(input.to_string()))
    }

    pub fn token_by_mint(&self, mint: &Pubkey) -> Option<&TokenInfo> {
        self.tokens.iter().find(|t| t.mint == *mint)
    }

    pub fn symbol(&self, mint: &Pubkey) -> String {
        self.token_by_mint(mint)
            .map(|t| t.symbol.clone())
            .unwrap_or_else(|| mint.to_string())
    }

    /// Look up an account by scenario name or address.
    pub fn account(&self, input: &str) -> SwapResult<Pubkey> {
        if let Some(account) = self.accounts.get(input) {
            return Ok(*account);
        }
        input
            .parse()
            .map_err(|_| SwapError::ScenarioError(format!("Unknown account: {}", input)))
    }

    pub fn wrapped_native(&self) -> Pubkey {
        self.ledger.read().wrapped_native()
    }
}

pub fn deploy(scenario: &ScenarioConfig, config: &Config) -> SwapResult<Deployment> {
    config.validate()?;

    let owner = derive_address("role", "owner");
    let governance = derive_address("role", "governance");
    let tokens = build_tokens(scenario, config)?;
    let ledger = Ledger::shared(config.wrapped_native);

    let quoter = Arc::new(Quoter::new(
        derive_address("role", "quoter"),
        owner,
        ledger.clone(),
        config.max_hops,
    ));
    let router = Arc::new(Router::new(
        derive_address("role", "router"),
        governance,
        ledger.clone(),
        quoter.registry_view(),
        config.execution_policy,
    ));

    let mut adapters = Vec::with_capacity(scenario.venues.len());
    let mut names = HashSet::new();
    for venue in &scenario.venues {
        if !names.insert(venue.name.as_str()) {
            return Err(SwapError::ScenarioError(format!(
                "Venue {} defined twice",
                venue.name
            )));
        }
        let adapter = build_venue(venue, &tokens, owner)?;
        adapter.seed_liquidity(&mut ledger.write(), &venue.reserves)?;
        if venue.trusted {
            quoter.add_trusted_adapter(&owner, adapter.clone())?;
        }
        debug!(
            "Deployed {} venue {} at {}",
            adapter.kind(),
            adapter.name(),
            adapter.address()
        );
        adapters.push(adapter);
    }

    let trusted: Vec<Pubkey> = scenario
        .tokens
        .iter()
        .zip(&tokens)
        .filter(|(spec, _)| spec.trusted)
        .map(|(_, token)| token.mint)
        .collect();
    quoter.set_tokens(&owner, trusted)?;

    let mut accounts = BTreeMap::new();
    {
        let mut ledger = ledger.write();
        for account in &scenario.accounts {
            let address = derive_address("account", &account.name);
            for (symbol, amount) in &account.balances {
                let token = find_token(&tokens, symbol)?;
                ledger.mint(&address, &token.mint, *amount)?;
            }
            ledger.credit_native(&address, account.native)?;
            accounts.insert(account.name.clone(), address);
        }
    }

    info!(
        "Deployed scenario {}: {} tokens, {} venues ({} trusted), {} accounts",
        scenario.name,
        tokens.len(),
        adapters.len(),
        quoter.trusted_adapters_count(),
        accounts.len()
    );

    Ok(Deployment {
        name: scenario.name.clone(),
        ledger,
        router,
        quoter,
        owner,
        governance,
        tokens,
        adapters,
        accounts,
    })
}

fn build_tokens(scenario: &ScenarioConfig, config: &Config) -> SwapResult<Vec<TokenInfo>> {
    let mut seen = HashSet::new();
    let mut wrapped_seen = false;
    let mut tokens = Vec::with_capacity(scenario.tokens.len());

    for spec in &scenario.tokens {
        if spec.symbol.eq_ignore_ascii_case(NATIVE_SYMBOL) {
            return Err(SwapError::ScenarioError(format!(
                "{} is reserved for the native currency",
                NATIVE_SYMBOL
            )));
        }
        if spec.decimals > MAX_TOKEN_DECIMALS {
            return Err(SwapError::ScenarioError(format!(
                "Token {} has {} decimals, at most {} are supported",
                spec.symbol, spec.decimals, MAX_TOKEN_DECIMALS
            )));
        }
        if !seen.insert(spec.symbol.to_uppercase()) {
            return Err(SwapError::ScenarioError(format!(
                "Token {} defined twice",
                spec.symbol
            )));
        }
        let mint = if spec.wrapped_native {
            if wrapped_seen {
                return Err(SwapError::ScenarioError(
                    "Only one token may be the wrapped native token".to_string(),
                ));
            }
            wrapped_seen = true;
            config.wrapped_native
        } else {
            derive_address("token", &spec.symbol)
        };
        tokens.push(TokenInfo {
            mint,
            symbol: spec.symbol.clone(),
            decimals: spec.decimals,
        });
    }
    Ok(tokens)
}

fn find_token<'a>(tokens: &'a [TokenInfo], symbol: &str) -> SwapResult<&'a TokenInfo> {
    tokens
        .iter()
        .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
        .ok_or_else(|| SwapError::ScenarioError(format!("Unknown token symbol: {}", symbol)))
}

fn build_venue(
    venue: &VenueSpec,
    tokens: &[TokenInfo],
    owner: Pubkey,
) -> SwapResult<Arc<dyn Adapter>> {
    let venue_tokens = venue
        .tokens
        .iter()
        .map(|symbol| find_token(tokens, symbol))
        .collect::<SwapResult<Vec<_>>>()?;
    if venue.reserves.len() != venue_tokens.len() {
        return Err(SwapError::ScenarioError(format!(
            "Venue {} lists {} tokens but {} reserves",
            venue.name,
            venue_tokens.len(),
            venue.reserves.len()
        )));
    }

    let (program_id, fee_default, gas_default, tolerance_default) = match venue.kind {
        VenueKind::ConstantProduct => (
            *CONSTANT_PRODUCT_PROGRAM,
            CONSTANT_PRODUCT_FEE_BPS,
            CONSTANT_PRODUCT_GAS_ESTIMATE,
            0,
        ),
        VenueKind::StableSwap => (
            *STABLE_SWAP_PROGRAM,
            STABLE_SWAP_FEE_BPS,
            STABLE_SWAP_GAS_ESTIMATE,
            STABLE_SWAP_UNDERQUOTE,
        ),
        VenueKind::ConstantSum => (
            *CONSTANT_SUM_PROGRAM,
            CONSTANT_SUM_FEE_BPS,
            CONSTANT_SUM_GAS_ESTIMATE,
            0,
        ),
    };

    let info = AdapterInfo {
        name: venue.name.clone(),
        address: derive_address("adapter", &venue.name),
        owner,
        program_id,
        gas_estimate: venue.gas_estimate.unwrap_or(gas_default),
        underquote_tolerance: venue.underquote_tolerance.unwrap_or(tolerance_default),
    };
    let fee_bps = venue.fee_bps.unwrap_or(fee_default);
    let mints: Vec<Pubkey> = venue_tokens.iter().map(|t| t.mint).collect();
    let decimals: Vec<u8> = venue_tokens.iter().map(|t| t.decimals).collect();

    let pair_only = matches!(venue.kind, VenueKind::ConstantProduct | VenueKind::ConstantSum);
    if pair_only && mints.len() != 2 {
        return Err(SwapError::ScenarioError(format!(
            "{} venue {} needs exactly 2 tokens",
            venue.kind, venue.name
        )));
    }

    let adapter: Arc<dyn Adapter> = match venue.kind {
        VenueKind::ConstantProduct => Arc::new(ConstantProductAdapter::new(
            info, mints[0], mints[1], fee_bps,
        )?),
        VenueKind::ConstantSum => Arc::new(ConstantSumAdapter::new(
            info,
            [mints[0], mints[1]],
            [decimals[0], decimals[1]],
            fee_bps,
        )?),
        VenueKind::StableSwap => Arc::new(StableSwapAdapter::new(
            info,
            mints,
            &decimals,
            venue.amp.unwrap_or(DEFAULT_AMP_FACTOR),
            fee_bps,
        )?),
    };
    Ok(adapter)
}
