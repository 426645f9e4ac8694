//! Lifecycle events. Every state-changing entry point publishes exactly one,
//! under the topics `("pot", <action>)`.

use soroban_sdk::{contracttype, symbol_short, Address, Env, IntoVal, Symbol, Val};

use crate::asset::TargetAsset;

const POT: Symbol = symbol_short!("pot");

pub const CREATED: Symbol = symbol_short!("created");
pub const CONTRIBUTED: Symbol = symbol_short!("contrib");
pub const WITHDRAWN: Symbol = symbol_short!("withdrawn");
pub const CLAIMED: Symbol = symbol_short!("claimed");
pub const RESERVE_SET: Symbol = symbol_short!("reserve");
pub const AUCTION_STARTED: Symbol = symbol_short!("started");
pub const BID_PLACED: Symbol = symbol_short!("bid");
pub const REFUND_CLAIMED: Symbol = symbol_short!("refund");
pub const SETTLED: Symbol = symbol_short!("settled");
pub const PROCEEDS_CLAIMED: Symbol = symbol_short!("proceeds");

pub fn emit<D: IntoVal<Env, Val>>(env: &Env, action: Symbol, data: D) {
    env.events().publish((POT, action), data);
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PotCreated {
    pub creator: Address,
    pub asset: TargetAsset,
    pub initial_funding: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionMade {
    pub contributor: Address,
    pub amount: i128,
    pub total_contribution: i128,
    pub funds_raised: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionWithdrawn {
    pub contributor: Address,
    pub amount: i128,
    pub remaining: i128,
    pub funds_raised: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PotClaimed {
    pub seller: Address,
    pub amount: i128,
    pub fee: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReservePriceSet {
    pub contributor: Address,
    pub old_price: i128,
    pub new_price: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuctionStarted {
    pub bidder: Address,
    pub amount: i128,
    pub auction_end: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BidPlaced {
    pub bidder: Address,
    pub amount: i128,
    pub previous_bid: i128,
    pub bid_count: u32,
    pub auction_end: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefundClaimed {
    pub bidder: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuctionSettled {
    pub winner: Address,
    pub winning_bid: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProceedsClaimed {
    pub contributor: Address,
    pub amount: i128,
}
