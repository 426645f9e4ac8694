//! Contributor ledger.
//!
//! Records live under persistent `Contribution(address)` entries; the ordered
//! list lives in 1-indexed persistent `ContributorAt(i)` slots with the count
//! kept in instance storage. Removal swaps the last slot into the hole so it
//! never shifts more than one entry.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::error::PotError;
use crate::storage::{erase, load, save, DataKey};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contribution {
    /// Position in the contributor list, starting at 1
    pub index: u32,
    /// Cumulative amount contributed
    pub value: i128,
    /// Set once proceeds are paid out after settlement
    pub proceeds_claimed: bool,
}

pub fn get(env: &Env, who: &Address) -> Option<Contribution> {
    load(env, &DataKey::Contribution(who.clone()))
}

fn put(env: &Env, who: &Address, record: &Contribution) {
    save(env, &DataKey::Contribution(who.clone()), record);
}

pub fn count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::ContributorCount)
        .unwrap_or(0)
}

pub fn contributor_at(env: &Env, index: u32) -> Option<Address> {
    load(env, &DataKey::ContributorAt(index))
}

pub fn contributors(env: &Env) -> Result<Vec<Address>, PotError> {
    let mut list = Vec::new(env);
    for index in 1..=count(env) {
        list.push_back(contributor_at(env, index).ok_or(PotError::CorruptLedger)?);
    }
    Ok(list)
}

/// Add `amount` to `who`, appending them to the list on first contribution.
pub fn add_contribution(env: &Env, who: &Address, amount: i128) -> Result<Contribution, PotError> {
    let record = match get(env, who) {
        Some(mut existing) => {
            existing.value = existing
                .value
                .checked_add(amount)
                .ok_or(PotError::Overflow)?;
            existing
        }
        None => {
            let index = count(env).checked_add(1).ok_or(PotError::Overflow)?;
            save(env, &DataKey::ContributorAt(index), who);
            env.storage()
                .instance()
                .set(&DataKey::ContributorCount, &index);
            Contribution {
                index,
                value: amount,
                proceeds_claimed: false,
            }
        }
    };
    put(env, who, &record);
    Ok(record)
}

/// Partial withdrawal. Full withdrawals go through `remove_contribution`.
pub fn decrease_contribution(
    env: &Env,
    who: &Address,
    amount: i128,
) -> Result<Contribution, PotError> {
    let mut record = get(env, who).ok_or(PotError::NotAContributor)?;
    if amount >= record.value {
        return Err(PotError::AmountMismatch);
    }
    record.value -= amount;
    put(env, who, &record);
    Ok(record)
}

/// Delete `who` from the ledger, moving the last contributor into their slot.
pub fn remove_contribution(env: &Env, who: &Address) -> Result<(), PotError> {
    let record = get(env, who).ok_or(PotError::NotAContributor)?;
    let len = count(env);
    if record.index == 0 || record.index > len {
        return Err(PotError::CorruptLedger);
    }

    if record.index != len {
        let last = contributor_at(env, len).ok_or(PotError::CorruptLedger)?;
        let mut moved = get(env, &last).ok_or(PotError::CorruptLedger)?;
        moved.index = record.index;
        save(env, &DataKey::ContributorAt(record.index), &last);
        put(env, &last, &moved);
    }

    erase(env, &DataKey::ContributorAt(len));
    erase(env, &DataKey::Contribution(who.clone()));
    env.storage()
        .instance()
        .set(&DataKey::ContributorCount, &(len - 1));
    Ok(())
}

pub fn mark_claimed(env: &Env, who: &Address, mut record: Contribution) {
    record.proceeds_claimed = true;
    put(env, who, &record);
}
