//! English auction over the claimed asset.
//!
//! Bids are appended to a log (`BidAt(i)`, `BidCount`); the last entry is the
//! leading bid. An outbid bidder's amount moves to `Refund(bidder)` and stays
//! there until claimed or reused in a later bid.

use soroban_sdk::{contracttype, Address, Env};

use crate::error::PotError;
use crate::math::apply_percentage_increase;
use crate::settings::AuctionParams;
use crate::storage::{erase, load, read, save, DataKey};
use crate::voting;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bid {
    pub bidder: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Result of an accepted bid.
pub struct BidOutcome {
    /// Leader before this bid
    pub previous: Bid,
    /// Deadline after any anti-snipe extension
    pub auction_end: u64,
    pub extended: bool,
}

pub fn bid_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::BidCount)
        .unwrap_or(0)
}

pub fn bid_at(env: &Env, index: u32) -> Option<Bid> {
    load(env, &DataKey::BidAt(index))
}

pub fn top_bid(env: &Env) -> Option<Bid> {
    match bid_count(env) {
        0 => None,
        n => bid_at(env, n - 1),
    }
}

fn push_bid(env: &Env, bid: &Bid) -> Result<(), PotError> {
    let n = bid_count(env);
    save(env, &DataKey::BidAt(n), bid);
    env.storage().instance().set(
        &DataKey::BidCount,
        &n.checked_add(1).ok_or(PotError::Overflow)?,
    );
    Ok(())
}

pub fn auction_end(env: &Env) -> Result<u64, PotError> {
    read(env, &DataKey::AuctionEnd)
}

pub fn refund_of(env: &Env, who: &Address) -> i128 {
    load(env, &DataKey::Refund(who.clone())).unwrap_or(0)
}

/// Zero the refund owed to `who` and return it.
pub fn take_refund(env: &Env, who: &Address) -> Result<i128, PotError> {
    let amount = refund_of(env, who);
    if amount <= 0 {
        return Err(PotError::NoRefund);
    }
    erase(env, &DataKey::Refund(who.clone()));
    Ok(amount)
}

/// Smallest acceptable bid: the reserve price before any bid, then the
/// leading bid raised by the configured percentage.
pub fn min_bid(env: &Env, params: &AuctionParams) -> Result<i128, PotError> {
    match top_bid(env) {
        None => voting::reserve_price(env),
        Some(top) => apply_percentage_increase(env, top.amount, params.min_bid_delta_percentage),
    }
}

/// Record the opening bid and set the deadline. Returns the deadline.
pub fn open(
    env: &Env,
    who: &Address,
    amount: i128,
    params: &AuctionParams,
) -> Result<u64, PotError> {
    if amount < voting::reserve_price(env)? {
        return Err(PotError::BelowMinimum);
    }
    let now = env.ledger().timestamp();
    push_bid(
        env,
        &Bid {
            bidder: who.clone(),
            amount,
            timestamp: now,
        },
    )?;
    let end = now
        .checked_add(params.auction_duration)
        .ok_or(PotError::Overflow)?;
    env.storage().instance().set(&DataKey::AuctionEnd, &end);
    Ok(end)
}

/// Validate and record a bid of `total` where `funds_sent` is what the
/// bidder transfers with this call.
///
/// The leader tops up their standing bid; anyone holding a refund must
/// spend it in full; everyone else pays the whole amount. The displaced
/// leader's bid becomes their refund.
pub fn place_bid(
    env: &Env,
    who: &Address,
    total: i128,
    funds_sent: i128,
    params: &AuctionParams,
) -> Result<BidOutcome, PotError> {
    let now = env.ledger().timestamp();
    let mut end = auction_end(env)?;
    if now >= end {
        return Err(PotError::AuctionNotLive);
    }
    if funds_sent < 0 {
        return Err(PotError::InvalidAmount);
    }
    if total < min_bid(env, params)? {
        return Err(PotError::BelowMinimum);
    }

    let previous = top_bid(env).ok_or(PotError::StorageCorrupted)?;
    if previous.bidder == *who {
        let expected = previous
            .amount
            .checked_add(funds_sent)
            .ok_or(PotError::Overflow)?;
        if total != expected {
            return Err(PotError::AmountMismatch);
        }
    } else {
        let refund = refund_of(env, who);
        let expected = funds_sent.checked_add(refund).ok_or(PotError::Overflow)?;
        if total != expected {
            return Err(PotError::AmountMismatch);
        }
        if refund > 0 {
            erase(env, &DataKey::Refund(who.clone()));
        }
        save(env, &DataKey::Refund(previous.bidder.clone()), &previous.amount);
    }

    push_bid(
        env,
        &Bid {
            bidder: who.clone(),
            amount: total,
            timestamp: now,
        },
    )?;

    // Late bids push the deadline out; there is no cap on repeats.
    let extended = now >= end.saturating_sub(params.extension_window);
    if extended {
        end = end
            .checked_add(params.extension_duration)
            .ok_or(PotError::Overflow)?;
        env.storage().instance().set(&DataKey::AuctionEnd, &end);
    }

    Ok(BidOutcome {
        previous,
        auction_end: end,
        extended,
    })
}
