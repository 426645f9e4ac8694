#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, log, Address, BytesN, Env, TryFromVal, Val,
    Vec,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum FactoryError {
    /// Factory already initialized
    AlreadyInitialized = 1,
    /// Factory not initialized
    NotInitialized = 2,
    /// Only admin can perform this action
    Unauthorized = 3,
    /// No pot at the requested index
    IndexOutOfRange = 4,
    /// Initial funding must not be negative
    InvalidAmount = 5,
    /// Pot counter overflow
    Overflow = 6,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Admin address (can replace the pot WASM)
    Admin,
    /// WASM hash of the pot contract
    PotWasmHash,
    /// Settings contract handed to every new pot
    Settings,
    /// Payment token handed to every new pot
    PaymentToken,
    /// Number of deployed pots
    PotCount,
    /// Deployed pot by creation index, 0-based (persistent)
    PotAt(u32),
    /// Membership flag for a deployed pot (persistent)
    IsPot(Address),
}

/// Token standard of the asset a pot targets. Must stay wire-compatible with
/// the pot contract's own definition.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AssetStandard {
    NonFungible = 0,
    MultiToken = 1,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TargetAsset {
    pub contract: Address,
    pub token_id: u128,
    pub standard: AssetStandard,
}

const DAY_IN_LEDGERS: u32 = 17_280;
const BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const BUMP_THRESHOLD: u32 = BUMP_AMOUNT - DAY_IN_LEDGERS;

/// Pot Factory Contract
///
/// Deploys and indexes pot contracts. Each pot is a separate contract
/// instance sharing the factory's settings contract and payment token.
#[contract]
pub struct PotFactory;

#[contractimpl]
impl PotFactory {
    /// Initialize the factory.
    ///
    /// # Arguments
    /// * `admin` - Address that can update the pot WASM hash
    /// * `pot_wasm_hash` - WASM hash of the pot contract
    /// * `settings` - Settings contract used by every pot
    /// * `payment_token` - Token pots raise and pay out in
    pub fn initialize(
        env: Env,
        admin: Address,
        pot_wasm_hash: BytesN<32>,
        settings: Address,
        payment_token: Address,
    ) -> Result<(), FactoryError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(FactoryError::AlreadyInitialized);
        }

        admin.require_auth();

        let storage = env.storage().instance();
        storage.set(&DataKey::Admin, &admin);
        storage.set(&DataKey::PotWasmHash, &pot_wasm_hash);
        storage.set(&DataKey::Settings, &settings);
        storage.set(&DataKey::PaymentToken, &payment_token);
        storage.set(&DataKey::PotCount, &0u32);
        Self::bump(&env);

        Ok(())
    }

    /// Deploy a new pot.
    ///
    /// # Arguments
    /// * `creator` - Pot creator (authorizes initial funding)
    /// * `asset` - NFT the pot will try to acquire
    /// * `initial_funding` - First contribution from the creator (0 for none)
    /// * `salt` - Unique salt for deterministic address generation
    ///
    /// # Returns
    /// Address of the deployed pot contract
    pub fn create_pot(
        env: Env,
        creator: Address,
        asset: TargetAsset,
        initial_funding: i128,
        salt: BytesN<32>,
    ) -> Result<Address, FactoryError> {
        Self::require_initialized(&env)?;
        if initial_funding < 0 {
            return Err(FactoryError::InvalidAmount);
        }

        creator.require_auth();

        let wasm_hash: BytesN<32> = Self::read(&env, &DataKey::PotWasmHash)?;
        let settings: Address = Self::read(&env, &DataKey::Settings)?;
        let payment_token: Address = Self::read(&env, &DataKey::PaymentToken)?;

        let pot_address = env.deployer().with_current_contract(salt).deploy_v2(
            wasm_hash,
            (
                creator.clone(),
                settings,
                payment_token,
                asset,
                initial_funding,
            ),
        );

        let count = Self::record_pot(&env, &pot_address)?;
        Self::bump(&env);

        log!(&env, "pot deployed", pot_address, creator, count);
        Ok(pot_address)
    }

    /// Get the number of deployed pots.
    pub fn pot_count(env: Env) -> Result<u32, FactoryError> {
        Self::read(&env, &DataKey::PotCount)
    }

    /// Get a pot address by creation index (0-based).
    pub fn get_pot(env: Env, index: u32) -> Result<Address, FactoryError> {
        Self::require_initialized(&env)?;
        Self::pot_at(&env, index).ok_or(FactoryError::IndexOutOfRange)
    }

    /// Whether `pot` was deployed by this factory.
    pub fn is_pot(env: Env, pot: Address) -> bool {
        env.storage().persistent().has(&DataKey::IsPot(pot))
    }

    /// Page through deployed pots.
    ///
    /// Returns up to `count` addresses starting at `cursor` and the cursor of
    /// the next page. A cursor past the end yields an empty page.
    pub fn fetch_page(env: Env, cursor: u32, count: u32) -> Result<(Vec<Address>, u32), FactoryError> {
        let total: u32 = Self::read(&env, &DataKey::PotCount)?;
        let (start, end) = page_bounds(total, cursor, count);
        let mut page = Vec::new(&env);
        for index in start..end {
            page.push_back(Self::pot_at(&env, index).ok_or(FactoryError::IndexOutOfRange)?);
        }
        Ok((page, end))
    }

    pub fn get_admin(env: Env) -> Result<Address, FactoryError> {
        Self::require_initialized(&env)?;
        Self::read(&env, &DataKey::Admin)
    }

    pub fn get_settings(env: Env) -> Result<Address, FactoryError> {
        Self::require_initialized(&env)?;
        Self::read(&env, &DataKey::Settings)
    }

    pub fn get_payment_token(env: Env) -> Result<Address, FactoryError> {
        Self::require_initialized(&env)?;
        Self::read(&env, &DataKey::PaymentToken)
    }

    pub fn get_pot_wasm_hash(env: Env) -> Result<BytesN<32>, FactoryError> {
        Self::require_initialized(&env)?;
        Self::read(&env, &DataKey::PotWasmHash)
    }

    /// Update the pot WASM hash (admin only). Existing pots are unaffected.
    pub fn set_pot_wasm_hash(
        env: Env,
        admin: Address,
        new_wasm_hash: BytesN<32>,
    ) -> Result<(), FactoryError> {
        Self::require_initialized(&env)?;
        Self::require_admin(&env, &admin)?;

        admin.require_auth();

        env.storage()
            .instance()
            .set(&DataKey::PotWasmHash, &new_wasm_hash);
        Self::bump(&env);

        Ok(())
    }

    // --- Internal helpers ---

    fn bump(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(BUMP_THRESHOLD, BUMP_AMOUNT);
    }

    fn read<V: TryFromVal<Env, Val>>(env: &Env, key: &DataKey) -> Result<V, FactoryError> {
        env.storage()
            .instance()
            .get(key)
            .ok_or(FactoryError::NotInitialized)
    }

    fn extend_persistent(env: &Env, key: &DataKey) {
        env.storage()
            .persistent()
            .extend_ttl(key, BUMP_THRESHOLD, BUMP_AMOUNT);
    }

    fn pot_at(env: &Env, index: u32) -> Option<Address> {
        let key = DataKey::PotAt(index);
        let pot = env.storage().persistent().get(&key);
        if pot.is_some() {
            Self::extend_persistent(env, &key);
        }
        pot
    }

    /// Append `pot` to the registry. Returns the new pot count.
    fn record_pot(env: &Env, pot: &Address) -> Result<u32, FactoryError> {
        let index: u32 = Self::read(env, &DataKey::PotCount)?;
        let count = index.checked_add(1).ok_or(FactoryError::Overflow)?;

        let at = DataKey::PotAt(index);
        let member = DataKey::IsPot(pot.clone());
        let persistent = env.storage().persistent();
        persistent.set(&at, pot);
        persistent.set(&member, &true);
        Self::extend_persistent(env, &at);
        Self::extend_persistent(env, &member);

        env.storage().instance().set(&DataKey::PotCount, &count);
        Ok(count)
    }

    fn require_initialized(env: &Env) -> Result<(), FactoryError> {
        if !env.storage().instance().has(&DataKey::Admin) {
            return Err(FactoryError::NotInitialized);
        }
        Ok(())
    }

    fn require_admin(env: &Env, caller: &Address) -> Result<(), FactoryError> {
        let admin: Address = Self::read(env, &DataKey::Admin)?;
        if *caller != admin {
            return Err(FactoryError::Unauthorized);
        }
        Ok(())
    }
}

/// Half-open index range `[start, end)` of a page, clamped to `len`.
fn page_bounds(len: u32, cursor: u32, count: u32) -> (u32, u32) {
    let start = cursor.min(len);
    let end = start.saturating_add(count).min(len);
    (start, end)
}
