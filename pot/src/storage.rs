use soroban_sdk::{contracttype, Address, Env, IntoVal, TryFromVal, Val};

use crate::error::PotError;

/// Storage keys for the contract.
/// Using enum with variants for type-safe storage access.
///
/// Keyed records (`Contribution`, `ContributorAt`, `ReserveVote`, `BidAt`,
/// `Refund`) live in persistent storage, one entry each. Everything else is a
/// singleton in instance storage.
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Address that deployed the pot
    Creator,
    /// Settings contract address (also receives protocol fees)
    Settings,
    /// Token used for contributions, bids and payouts
    PaymentToken,
    /// NFT targeted by this pot
    Asset,
    /// Ledger timestamp at creation
    CreatedAt,
    /// Current lifecycle state
    State,
    /// Sum of all current contributions
    FundsRaised,
    /// Protocol fee taken when the pot was claimed
    FeeCollected,
    /// Address that sold the asset to the pot
    Seller,
    /// Auction parameters snapshotted from settings at creation
    Params,
    /// Contribution record: Contribution(contributor)
    Contribution(Address),
    /// Contributor list slot, 1-indexed: ContributorAt(index)
    ContributorAt(u32),
    /// Length of the contributor list
    ContributorCount,
    /// Explicit reserve price vote: ReserveVote(contributor)
    ReserveVote(Address),
    /// Shares of contributors with a nonzero reserve vote
    VotingShares,
    /// Sum of shares * price over counted voters (I256)
    ReserveTotal,
    /// Bid log slot, 0-indexed: BidAt(index)
    BidAt(u32),
    /// Length of the bid log
    BidCount,
    /// Auction deadline (ledger timestamp)
    AuctionEnd,
    /// Refund owed to an outbid bidder: Refund(bidder)
    Refund(Address),
    /// Reentrancy lock
    Locked,
}

/// Lifecycle of a pot. Transitions only move forward.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum PotState {
    Fundraising = 0,
    Claimed = 1,
    Auctioning = 2,
    Settled = 3,
}

/// Percent denominator for bid increments.
pub const PERCENT_DENOMINATOR: i128 = 100;

/// Basis points denominator (100% = 10000 bp).
pub const BPS_DENOMINATOR: i128 = 10_000;

/// Roughly one day of ledgers at 5 seconds per ledger.
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance TTL is extended to this many ledgers on every mutating call.
pub const BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;

/// Extension only happens once the remaining TTL drops below this.
pub const BUMP_THRESHOLD: u32 = BUMP_AMOUNT - DAY_IN_LEDGERS;

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(BUMP_THRESHOLD, BUMP_AMOUNT);
}

pub fn extend_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, BUMP_THRESHOLD, BUMP_AMOUNT);
}

/// Fetch a keyed record, extending its TTL when present.
pub fn load<V: TryFromVal<Env, Val>>(env: &Env, key: &DataKey) -> Option<V> {
    let value = env.storage().persistent().get(key);
    if value.is_some() {
        extend_persistent(env, key);
    }
    value
}

pub fn save<V: IntoVal<Env, Val>>(env: &Env, key: &DataKey, value: &V) {
    env.storage().persistent().set(key, value);
    extend_persistent(env, key);
}

pub fn erase(env: &Env, key: &DataKey) {
    env.storage().persistent().remove(key);
}

/// Read a value that must exist once the pot is initialized.
pub fn read<V: TryFromVal<Env, Val>>(env: &Env, key: &DataKey) -> Result<V, PotError> {
    env.storage()
        .instance()
        .get(key)
        .ok_or(PotError::StorageCorrupted)
}

pub fn read_state(env: &Env) -> Result<PotState, PotError> {
    read(env, &DataKey::State)
}

pub fn write_state(env: &Env, state: PotState) {
    env.storage().instance().set(&DataKey::State, &state);
}

pub fn read_funds_raised(env: &Env) -> Result<i128, PotError> {
    read(env, &DataKey::FundsRaised)
}

pub fn write_funds_raised(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::FundsRaised, &amount);
}
