//! Custody of the target asset.
//!
//! Two token standards are supported: single-owner NFTs and multi-token
//! contracts where the pot holds one unit of a token id. Calls go through
//! `try_` clients so a rejecting asset contract surfaces as a pot error.

use soroban_sdk::{contractclient, contracttype, Address, Env};

use crate::error::PotError;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AssetStandard {
    /// One owner per token id
    NonFungible = 0,
    /// Balances per (owner, token id)
    MultiToken = 1,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TargetAsset {
    pub contract: Address,
    pub token_id: u128,
    pub standard: AssetStandard,
}

#[contractclient(name = "NonFungibleClient")]
pub trait NonFungibleInterface {
    fn owner_of(env: Env, token_id: u128) -> Address;
    fn transfer(env: Env, from: Address, to: Address, token_id: u128);
}

#[contractclient(name = "MultiTokenClient")]
pub trait MultiTokenInterface {
    fn balance(env: Env, owner: Address, token_id: u128) -> i128;
    fn transfer(env: Env, from: Address, to: Address, token_id: u128, amount: i128);
}

/// Check that the asset contract answers for this token. For NFTs the token
/// must currently exist; multi-token contracts only need to be live.
pub fn verify(env: &Env, asset: &TargetAsset, probe: &Address) -> Result<(), PotError> {
    let live = match asset.standard {
        AssetStandard::NonFungible => matches!(
            NonFungibleClient::new(env, &asset.contract).try_owner_of(&asset.token_id),
            Ok(Ok(_))
        ),
        AssetStandard::MultiToken => matches!(
            MultiTokenClient::new(env, &asset.contract).try_balance(probe, &asset.token_id),
            Ok(Ok(_))
        ),
    };
    if !live {
        return Err(PotError::InvalidAsset);
    }
    Ok(())
}

/// Whether `who` currently holds the asset.
pub fn holds(env: &Env, asset: &TargetAsset, who: &Address) -> Result<bool, PotError> {
    match asset.standard {
        AssetStandard::NonFungible => {
            match NonFungibleClient::new(env, &asset.contract).try_owner_of(&asset.token_id) {
                Ok(Ok(owner)) => Ok(owner == *who),
                _ => Err(PotError::InvalidAsset),
            }
        }
        AssetStandard::MultiToken => {
            match MultiTokenClient::new(env, &asset.contract).try_balance(who, &asset.token_id) {
                Ok(Ok(balance)) => Ok(balance >= 1),
                _ => Err(PotError::InvalidAsset),
            }
        }
    }
}

/// Move a single unit of the asset.
pub fn transfer(env: &Env, asset: &TargetAsset, from: &Address, to: &Address) -> Result<(), PotError> {
    let moved = match asset.standard {
        AssetStandard::NonFungible => matches!(
            NonFungibleClient::new(env, &asset.contract).try_transfer(from, to, &asset.token_id),
            Ok(Ok(()))
        ),
        AssetStandard::MultiToken => matches!(
            MultiTokenClient::new(env, &asset.contract).try_transfer(from, to, &asset.token_id, &1),
            Ok(Ok(()))
        ),
    };
    if !moved {
        return Err(PotError::TransferFailure);
    }
    Ok(())
}
