//! Reserve price voting.
//!
//! The reserve price is the share-weighted average of every contributor's
//! vote. Instead of rescanning contributors, the pot keeps two running sums:
//! `VotingShares` (shares of contributors whose vote is nonzero) and
//! `ReserveTotal` (sum of shares * vote). A contributor who never voted counts
//! as voting the full amount raised.

use soroban_sdk::{Address, Env, I256};

use crate::error::PotError;
use crate::math::weighted;
use crate::storage::{load, save, DataKey};

pub fn voting_shares(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::VotingShares)
        .unwrap_or(0)
}

fn reserve_total(env: &Env) -> I256 {
    env.storage()
        .instance()
        .get(&DataKey::ReserveTotal)
        .unwrap_or_else(|| I256::from_i32(env, 0))
}

/// Written when a pot is created with initial funding. `open` overwrites it
/// when the pot is claimed, so nothing reads this value in between.
pub fn seed_shares(env: &Env, shares: i128) {
    env.storage().instance().set(&DataKey::VotingShares, &shares);
}

/// Start voting with every contributor implicitly voting `funds_raised`:
/// sum(shares_i) = funds_raised and sum(shares_i * funds_raised) = funds_raised^2.
pub fn open(env: &Env, funds_raised: i128) {
    let storage = env.storage().instance();
    storage.set(&DataKey::VotingShares, &funds_raised);
    storage.set(
        &DataKey::ReserveTotal,
        &weighted(env, funds_raised, funds_raised),
    );
}

/// Current vote of `who`, defaulting to the amount raised.
pub fn effective_vote(env: &Env, who: &Address, funds_raised: i128) -> i128 {
    load(env, &DataKey::ReserveVote(who.clone())).unwrap_or(funds_raised)
}

pub fn reserve_price(env: &Env) -> Result<i128, PotError> {
    let shares = voting_shares(env);
    if shares <= 0 {
        return Err(PotError::NoReserve);
    }
    reserve_total(env)
        .div(&I256::from_i128(env, shares))
        .to_i128()
        .ok_or(PotError::Overflow)
}

/// Replace the vote of `who` (holding `shares`) with `new_price`.
/// Returns the previous effective vote.
pub fn cast_vote(
    env: &Env,
    who: &Address,
    shares: i128,
    new_price: i128,
    funds_raised: i128,
    cap: i128,
) -> Result<i128, PotError> {
    if new_price < 0 {
        return Err(PotError::InvalidAmount);
    }
    if new_price > cap {
        return Err(PotError::ExceedsLimit);
    }
    let old_price = effective_vote(env, who, funds_raised);
    if old_price == new_price {
        return Err(PotError::SameValue);
    }

    let mut counted = voting_shares(env);
    if new_price == 0 {
        counted = counted.checked_sub(shares).ok_or(PotError::Overflow)?;
    } else if old_price == 0 {
        counted = counted.checked_add(shares).ok_or(PotError::Overflow)?;
    }

    let total = reserve_total(env)
        .sub(&weighted(env, shares, old_price))
        .add(&weighted(env, shares, new_price));

    let storage = env.storage().instance();
    storage.set(&DataKey::VotingShares, &counted);
    storage.set(&DataKey::ReserveTotal, &total);
    save(env, &DataKey::ReserveVote(who.clone()), &new_price);

    Ok(old_price)
}
