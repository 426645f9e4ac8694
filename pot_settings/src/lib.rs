#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, log, token, Address, Env, TryFromVal, Val,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum SettingsError {
    /// Settings already initialized
    AlreadyInitialized = 1,
    /// Settings not initialized
    NotInitialized = 2,
    /// Only the owner can perform this action
    Unauthorized = 3,
    /// Duration, percentage or cap must be positive
    InvalidValue = 4,
    /// Fee above 10 000 basis points
    FeeTooHigh = 5,
    /// Withdrawal amount must be positive
    InvalidAmount = 6,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Owner address (can change settings and withdraw fees)
    Owner,
    MinBidDeltaPercentage,
    AuctionDuration,
    ExtensionWindow,
    ExtensionDuration,
    MaxReservePrice,
    Safeguarded,
    MaxFundraising,
    FeeEnabled,
    FeeBasisPoints,
}

pub const DEFAULT_MIN_BID_DELTA_PERCENTAGE: u32 = 10;
pub const DEFAULT_AUCTION_DURATION: u64 = 86_400;
pub const DEFAULT_EXTENSION_WINDOW: u64 = 900;
pub const DEFAULT_EXTENSION_DURATION: u64 = 900;
pub const MAX_FEE_BASIS_POINTS: u32 = 10_000;

const DAY_IN_LEDGERS: u32 = 17_280;
const BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const BUMP_THRESHOLD: u32 = BUMP_AMOUNT - DAY_IN_LEDGERS;

/// Pot Settings Contract
///
/// Global parameters shared by every pot. Auction timing and the bid increment
/// are copied by a pot when it is created; the reserve cap, the fundraising
/// safeguard and the fee are read on each use. Fees taken from claimed pots
/// accumulate at this contract's address.
#[contract]
pub struct PotSettings;

#[contractimpl]
impl PotSettings {
    /// Initialize with default parameters.
    ///
    /// # Arguments
    /// * `owner` - Address allowed to change parameters and withdraw fees
    pub fn initialize(env: Env, owner: Address) -> Result<(), SettingsError> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(SettingsError::AlreadyInitialized);
        }

        owner.require_auth();

        let storage = env.storage().instance();
        storage.set(&DataKey::Owner, &owner);
        storage.set(
            &DataKey::MinBidDeltaPercentage,
            &DEFAULT_MIN_BID_DELTA_PERCENTAGE,
        );
        storage.set(&DataKey::AuctionDuration, &DEFAULT_AUCTION_DURATION);
        storage.set(&DataKey::ExtensionWindow, &DEFAULT_EXTENSION_WINDOW);
        storage.set(&DataKey::ExtensionDuration, &DEFAULT_EXTENSION_DURATION);
        storage.set(&DataKey::MaxReservePrice, &i128::MAX);
        storage.set(&DataKey::Safeguarded, &false);
        storage.set(&DataKey::MaxFundraising, &0i128);
        storage.set(&DataKey::FeeEnabled, &false);
        storage.set(&DataKey::FeeBasisPoints, &0u32);
        Self::bump(&env);

        Ok(())
    }

    // --- Getters read by pots ---

    pub fn min_bid_delta_percentage(env: Env) -> u32 {
        Self::get_or(&env, DataKey::MinBidDeltaPercentage, DEFAULT_MIN_BID_DELTA_PERCENTAGE)
    }

    pub fn auction_duration(env: Env) -> u64 {
        Self::get_or(&env, DataKey::AuctionDuration, DEFAULT_AUCTION_DURATION)
    }

    pub fn extension_window(env: Env) -> u64 {
        Self::get_or(&env, DataKey::ExtensionWindow, DEFAULT_EXTENSION_WINDOW)
    }

    pub fn extension_duration(env: Env) -> u64 {
        Self::get_or(&env, DataKey::ExtensionDuration, DEFAULT_EXTENSION_DURATION)
    }

    pub fn max_reserve_price(env: Env) -> i128 {
        Self::get_or(&env, DataKey::MaxReservePrice, i128::MAX)
    }

    pub fn safeguarded(env: Env) -> bool {
        Self::get_or(&env, DataKey::Safeguarded, false)
    }

    /// Upper bound on funds a pot may raise while the safeguard is on.
    pub fn max_fundraising(env: Env) -> i128 {
        Self::get_or(&env, DataKey::MaxFundraising, 0)
    }

    pub fn fee_enabled(env: Env) -> bool {
        Self::get_or(&env, DataKey::FeeEnabled, false)
    }

    pub fn fee_basis_points(env: Env) -> u32 {
        Self::get_or(&env, DataKey::FeeBasisPoints, 0)
    }

    pub fn get_owner(env: Env) -> Result<Address, SettingsError> {
        Self::read_owner(&env)
    }

    // --- Owner-gated setters ---

    pub fn set_min_bid_delta_percentage(
        env: Env,
        owner: Address,
        percentage: u32,
    ) -> Result<(), SettingsError> {
        Self::require_owner(&env, &owner)?;
        if percentage == 0 {
            return Err(SettingsError::InvalidValue);
        }
        env.storage()
            .instance()
            .set(&DataKey::MinBidDeltaPercentage, &percentage);
        Ok(())
    }

    pub fn set_auction_duration(env: Env, owner: Address, seconds: u64) -> Result<(), SettingsError> {
        Self::set_positive_duration(&env, &owner, DataKey::AuctionDuration, seconds)
    }

    pub fn set_extension_window(env: Env, owner: Address, seconds: u64) -> Result<(), SettingsError> {
        Self::set_positive_duration(&env, &owner, DataKey::ExtensionWindow, seconds)
    }

    pub fn set_extension_duration(env: Env, owner: Address, seconds: u64) -> Result<(), SettingsError> {
        Self::set_positive_duration(&env, &owner, DataKey::ExtensionDuration, seconds)
    }

    /// Cap on any single reserve price vote.
    pub fn set_max_reserve_price(env: Env, owner: Address, cap: i128) -> Result<(), SettingsError> {
        Self::require_owner(&env, &owner)?;
        if cap <= 0 {
            return Err(SettingsError::InvalidValue);
        }
        env.storage().instance().set(&DataKey::MaxReservePrice, &cap);
        Ok(())
    }

    /// Turn the fundraising cap on or off. `max_fundraising` is only checked
    /// when enabling.
    pub fn set_safeguard(
        env: Env,
        owner: Address,
        enabled: bool,
        max_fundraising: i128,
    ) -> Result<(), SettingsError> {
        Self::require_owner(&env, &owner)?;
        if enabled && max_fundraising <= 0 {
            return Err(SettingsError::InvalidValue);
        }
        let storage = env.storage().instance();
        storage.set(&DataKey::Safeguarded, &enabled);
        storage.set(&DataKey::MaxFundraising, &max_fundraising);
        Ok(())
    }

    pub fn set_fee(
        env: Env,
        owner: Address,
        enabled: bool,
        basis_points: u32,
    ) -> Result<(), SettingsError> {
        Self::require_owner(&env, &owner)?;
        if basis_points > MAX_FEE_BASIS_POINTS {
            return Err(SettingsError::FeeTooHigh);
        }
        let storage = env.storage().instance();
        storage.set(&DataKey::FeeEnabled, &enabled);
        storage.set(&DataKey::FeeBasisPoints, &basis_points);
        log!(&env, "fee updated", enabled, basis_points);
        Ok(())
    }

    pub fn transfer_ownership(
        env: Env,
        owner: Address,
        new_owner: Address,
    ) -> Result<(), SettingsError> {
        Self::require_owner(&env, &owner)?;
        env.storage().instance().set(&DataKey::Owner, &new_owner);
        log!(&env, "ownership transferred", new_owner);
        Ok(())
    }

    /// Send collected fees held by this contract.
    pub fn withdraw(
        env: Env,
        owner: Address,
        token: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), SettingsError> {
        Self::require_owner(&env, &owner)?;
        if amount <= 0 {
            return Err(SettingsError::InvalidAmount);
        }
        token::Client::new(&env, &token).transfer(&env.current_contract_address(), &to, &amount);
        Ok(())
    }

    // --- Internal helpers ---

    fn bump(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(BUMP_THRESHOLD, BUMP_AMOUNT);
    }

    fn get_or<V: TryFromVal<Env, Val>>(env: &Env, key: DataKey, default: V) -> V {
        env.storage().instance().get(&key).unwrap_or(default)
    }

    fn read_owner(env: &Env) -> Result<Address, SettingsError> {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(SettingsError::NotInitialized)
    }

    fn require_owner(env: &Env, caller: &Address) -> Result<(), SettingsError> {
        let owner = Self::read_owner(env)?;
        if *caller != owner {
            return Err(SettingsError::Unauthorized);
        }
        caller.require_auth();
        Self::bump(env);
        Ok(())
    }

    fn set_positive_duration(
        env: &Env,
        owner: &Address,
        key: DataKey,
        seconds: u64,
    ) -> Result<(), SettingsError> {
        Self::require_owner(env, owner)?;
        if seconds == 0 {
            return Err(SettingsError::InvalidValue);
        }
        env.storage().instance().set(&key, &seconds);
        Ok(())
    }
}
