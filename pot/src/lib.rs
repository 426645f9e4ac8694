#![no_std]

mod asset;
mod auction;
mod error;
mod events;
mod guard;
mod ledger;
mod math;
mod settings;
mod storage;
mod voting;


pub use asset::{AssetStandard, TargetAsset};
pub use auction::Bid;
pub use error::PotError;
pub use ledger::Contribution;
pub use settings::AuctionParams;
pub use storage::PotState;

use events::{
    AuctionSettled, AuctionStarted, BidPlaced, ContributionMade, ContributionWithdrawn,
    PotClaimed, PotCreated, ProceedsClaimed, RefundClaimed, ReservePriceSet,
};
use settings::SettingsClient;
use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Vec};
use storage::{
    bump_instance, read, read_funds_raised, read_state, write_funds_raised, write_state, DataKey,
};

/// NFT Pot Contract
///
/// Pools contributions to buy a single NFT, lets contributors vote on a
/// reserve price, auctions the NFT and splits the winning bid pro rata.
///
/// Lifecycle:
/// - Fundraising: contributors add and withdraw funds
/// - Claimed: the seller handed over the NFT for the raised amount; contributors vote
/// - Auctioning: English auction with anti-snipe extension
/// - Settled: NFT sent to the winner, contributors claim their share
#[contract]
pub struct Pot;

#[contractimpl]
impl Pot {
    /// Constructor: Called automatically when deployed via factory's deploy_v2.
    ///
    /// Delegates to initialize() for the actual setup logic.
    pub fn __constructor(
        env: Env,
        creator: Address,
        settings: Address,
        payment_token: Address,
        asset: TargetAsset,
        initial_funding: i128,
    ) {
        Self::initialize(env, creator, settings, payment_token, asset, initial_funding)
            .expect("initialization failed");
    }

    /// Initialize the pot.
    ///
    /// # Arguments
    /// * `creator` - Address creating the pot (authorizes initial funding)
    /// * `settings` - Global settings contract; auction parameters are copied from it
    /// * `payment_token` - Token used for contributions, bids and payouts
    /// * `asset` - NFT the pot tries to acquire
    /// * `initial_funding` - Optional first contribution from the creator (0 for none)
    pub fn initialize(
        env: Env,
        creator: Address,
        settings: Address,
        payment_token: Address,
        asset: TargetAsset,
        initial_funding: i128,
    ) -> Result<(), PotError> {
        if env.storage().instance().has(&DataKey::Creator) {
            return Err(PotError::AlreadyInitialized);
        }
        if initial_funding < 0 {
            return Err(PotError::InvalidAmount);
        }

        asset::verify(&env, &asset, &creator)?;
        let params = AuctionParams::snapshot(&env, &settings);
        let now = env.ledger().timestamp();

        let storage = env.storage().instance();
        storage.set(&DataKey::Creator, &creator);
        storage.set(&DataKey::Settings, &settings);
        storage.set(&DataKey::PaymentToken, &payment_token);
        storage.set(&DataKey::Asset, &asset);
        storage.set(&DataKey::CreatedAt, &now);
        storage.set(&DataKey::Params, &params);
        storage.set(&DataKey::FeeCollected, &0i128);
        write_state(&env, PotState::Fundraising);
        write_funds_raised(&env, 0);

        if initial_funding > 0 {
            creator.require_auth();
            Self::collect(&env, &creator, initial_funding)?;
            ledger::add_contribution(&env, &creator, initial_funding)?;
            write_funds_raised(&env, initial_funding);
            voting::seed_shares(&env, initial_funding);
        }

        bump_instance(&env);
        events::emit(
            &env,
            events::CREATED,
            PotCreated {
                creator,
                asset,
                initial_funding,
                timestamp: now,
            },
        );
        Ok(())
    }

    // --- Fundraising ---

    /// Add funds to the pot.
    ///
    /// # Returns
    /// The contributor's cumulative contribution
    pub fn contribute(env: Env, contributor: Address, amount: i128) -> Result<i128, PotError> {
        Self::enter(&env, PotState::Fundraising)?;
        if amount <= 0 {
            return Err(PotError::InvalidAmount);
        }
        contributor.require_auth();

        let raised = read_funds_raised(&env)?
            .checked_add(amount)
            .ok_or(PotError::Overflow)?;

        // Read live, not from the creation snapshot
        let settings = SettingsClient::new(&env, &read::<Address>(&env, &DataKey::Settings)?);
        if settings.safeguarded() && raised > settings.max_fundraising() {
            return Err(PotError::ExceedsLimit);
        }

        Self::collect(&env, &contributor, amount)?;
        let record = ledger::add_contribution(&env, &contributor, amount)?;
        write_funds_raised(&env, raised);

        events::emit(
            &env,
            events::CONTRIBUTED,
            ContributionMade {
                contributor,
                amount,
                total_contribution: record.value,
                funds_raised: raised,
            },
        );
        Ok(record.value)
    }

    /// Take back part or all of a contribution while the pot is still raising.
    /// Withdrawing everything removes the contributor from the pot.
    ///
    /// # Returns
    /// The contribution left after the withdrawal
    pub fn withdraw_contribution(
        env: Env,
        contributor: Address,
        amount: i128,
    ) -> Result<i128, PotError> {
        Self::enter(&env, PotState::Fundraising)?;
        if amount <= 0 {
            return Err(PotError::InvalidAmount);
        }
        contributor.require_auth();

        guard::non_reentrant(&env, || {
            let record = ledger::get(&env, &contributor).ok_or(PotError::NotAContributor)?;
            if amount > record.value {
                return Err(PotError::AmountMismatch);
            }
            let remaining = if amount == record.value {
                ledger::remove_contribution(&env, &contributor)?;
                0
            } else {
                ledger::decrease_contribution(&env, &contributor, amount)?.value
            };

            let raised = read_funds_raised(&env)?
                .checked_sub(amount)
                .ok_or(PotError::Overflow)?;
            write_funds_raised(&env, raised);

            Self::pay(&env, &contributor, amount)?;

            events::emit(
                &env,
                events::WITHDRAWN,
                ContributionWithdrawn {
                    contributor: contributor.clone(),
                    amount,
                    remaining,
                    funds_raised: raised,
                },
            );
            Ok(remaining)
        })
    }

    /// Sell the target asset to the pot for everything raised.
    ///
    /// # Arguments
    /// * `seller` - Current holder of the asset (must authorize)
    /// * `amount` - Must equal the funds raised at execution time, so a
    ///              withdrawal landing first makes the claim fail instead of
    ///              selling for less than the seller saw
    ///
    /// # Returns
    /// Amount paid to the seller after the protocol fee
    pub fn claim_pot(env: Env, seller: Address, amount: i128) -> Result<i128, PotError> {
        Self::enter(&env, PotState::Fundraising)?;
        seller.require_auth();

        guard::non_reentrant(&env, || {
            let raised = read_funds_raised(&env)?;
            if raised <= 0 {
                return Err(PotError::InvalidAmount);
            }
            if amount != raised {
                return Err(PotError::AmountMismatch);
            }

            let target: TargetAsset = read(&env, &DataKey::Asset)?;
            if !asset::holds(&env, &target, &seller)? {
                return Err(PotError::NotAssetOwner);
            }
            asset::transfer(&env, &target, &seller, &env.current_contract_address())?;

            write_state(&env, PotState::Claimed);
            env.storage().instance().set(&DataKey::Seller, &seller);
            voting::open(&env, raised);

            let settings_address: Address = read(&env, &DataKey::Settings)?;
            let settings = SettingsClient::new(&env, &settings_address);
            let fee = if settings.fee_enabled() {
                math::basis_points(&env, raised, settings.fee_basis_points())?
            } else {
                0
            };
            env.storage().instance().set(&DataKey::FeeCollected, &fee);

            let payout = raised.checked_sub(fee).ok_or(PotError::Overflow)?;
            if fee > 0 {
                Self::pay(&env, &settings_address, fee)?;
            }
            Self::pay(&env, &seller, payout)?;

            log!(&env, "pot claimed", seller, raised, fee);
            events::emit(
                &env,
                events::CLAIMED,
                PotClaimed {
                    seller: seller.clone(),
                    amount: raised,
                    fee,
                    timestamp: env.ledger().timestamp(),
                },
            );
            Ok(payout)
        })
    }

    // --- Reserve price voting ---

    /// Vote on the reserve price. A vote of 0 abstains and removes the
    /// contributor's shares from the average.
    pub fn set_reserve_price(env: Env, contributor: Address, price: i128) -> Result<(), PotError> {
        Self::enter(&env, PotState::Claimed)?;
        contributor.require_auth();

        let record = ledger::get(&env, &contributor).ok_or(PotError::NotAContributor)?;
        let settings = SettingsClient::new(&env, &read::<Address>(&env, &DataKey::Settings)?);
        let cap = settings.max_reserve_price();
        let raised = read_funds_raised(&env)?;

        let old_price = voting::cast_vote(&env, &contributor, record.value, price, raised, cap)?;

        events::emit(
            &env,
            events::RESERVE_SET,
            ReservePriceSet {
                contributor,
                old_price,
                new_price: price,
            },
        );
        Ok(())
    }

    /// Share-weighted average of all reserve votes.
    pub fn reserve_price(env: Env) -> Result<i128, PotError> {
        Self::require_initialized(&env)?;
        if read_state(&env)? == PotState::Fundraising {
            return Err(PotError::InvalidState);
        }
        voting::reserve_price(&env)
    }

    /// Effective vote of a contributor; defaults to the funds raised.
    pub fn reserve_vote(env: Env, contributor: Address) -> Result<i128, PotError> {
        Self::require_initialized(&env)?;
        if ledger::get(&env, &contributor).is_none() {
            return Err(PotError::NotAContributor);
        }
        Ok(voting::effective_vote(
            &env,
            &contributor,
            read_funds_raised(&env)?,
        ))
    }

    // --- Auction ---

    /// Open the auction with a first bid of at least the reserve price.
    ///
    /// # Returns
    /// Auction deadline (ledger timestamp)
    pub fn start_auction(env: Env, bidder: Address, amount: i128) -> Result<u64, PotError> {
        Self::enter(&env, PotState::Claimed)?;
        bidder.require_auth();

        let params: AuctionParams = read(&env, &DataKey::Params)?;
        let auction_end = auction::open(&env, &bidder, amount, &params)?;
        Self::collect(&env, &bidder, amount)?;
        write_state(&env, PotState::Auctioning);

        log!(&env, "auction started", bidder, amount, auction_end);
        events::emit(
            &env,
            events::AUCTION_STARTED,
            AuctionStarted {
                bidder,
                amount,
                auction_end,
            },
        );
        Ok(auction_end)
    }

    /// Place a bid.
    ///
    /// # Arguments
    /// * `bidder` - Bidder (must authorize)
    /// * `amount` - Total bid
    /// * `funds_sent` - Tokens transferred with this call. The leader adds to
    ///                  their standing bid; an outbid bidder's refund is spent
    ///                  in full before new funds
    ///
    /// # Returns
    /// Auction deadline after any extension
    pub fn bid(env: Env, bidder: Address, amount: i128, funds_sent: i128) -> Result<u64, PotError> {
        Self::enter(&env, PotState::Auctioning)?;
        bidder.require_auth();

        guard::non_reentrant(&env, || {
            let params: AuctionParams = read(&env, &DataKey::Params)?;
            let outcome = auction::place_bid(&env, &bidder, amount, funds_sent, &params)?;
            if funds_sent > 0 {
                Self::collect(&env, &bidder, funds_sent)?;
            }

            if outcome.extended {
                log!(&env, "auction extended", outcome.auction_end);
            }
            events::emit(
                &env,
                events::BID_PLACED,
                BidPlaced {
                    bidder: bidder.clone(),
                    amount,
                    previous_bid: outcome.previous.amount,
                    bid_count: auction::bid_count(&env),
                    auction_end: outcome.auction_end,
                },
            );
            Ok(outcome.auction_end)
        })
    }

    /// Withdraw the refund owed after being outbid.
    pub fn claim_refund(env: Env, bidder: Address) -> Result<i128, PotError> {
        Self::require_initialized(&env)?;
        bump_instance(&env);
        bidder.require_auth();

        guard::non_reentrant(&env, || {
            let amount = auction::take_refund(&env, &bidder)?;
            Self::pay(&env, &bidder, amount)?;
            events::emit(
                &env,
                events::REFUND_CLAIMED,
                RefundClaimed {
                    bidder: bidder.clone(),
                    amount,
                },
            );
            Ok(amount)
        })
    }

    /// Close the auction and send the asset to the winner. Callable by anyone
    /// once the deadline has passed.
    ///
    /// # Returns
    /// The winning bidder
    pub fn settle_auction(env: Env) -> Result<Address, PotError> {
        Self::enter(&env, PotState::Auctioning)?;

        guard::non_reentrant(&env, || {
            let now = env.ledger().timestamp();
            if now < auction::auction_end(&env)? {
                return Err(PotError::AuctionNotEnded);
            }
            let winner = auction::top_bid(&env).ok_or(PotError::StorageCorrupted)?;

            write_state(&env, PotState::Settled);
            let target: TargetAsset = read(&env, &DataKey::Asset)?;
            asset::transfer(&env, &target, &env.current_contract_address(), &winner.bidder)?;

            log!(&env, "auction settled", winner.bidder, winner.amount);
            events::emit(
                &env,
                events::SETTLED,
                AuctionSettled {
                    winner: winner.bidder.clone(),
                    winning_bid: winner.amount,
                    timestamp: now,
                },
            );
            Ok(winner.bidder)
        })
    }

    // --- Proceeds ---

    /// Claim a pro-rata share of the winning bid.
    pub fn claim_proceeds(env: Env, contributor: Address) -> Result<i128, PotError> {
        Self::enter(&env, PotState::Settled)?;
        contributor.require_auth();

        guard::non_reentrant(&env, || {
            let record = ledger::get(&env, &contributor).ok_or(PotError::NotAContributor)?;
            if record.proceeds_claimed {
                return Err(PotError::AlreadyClaimed);
            }
            let amount = Self::share_of_winning_bid(&env, record.value)?;
            ledger::mark_claimed(&env, &contributor, record);
            Self::pay(&env, &contributor, amount)?;

            events::emit(
                &env,
                events::PROCEEDS_CLAIMED,
                ProceedsClaimed {
                    contributor: contributor.clone(),
                    amount,
                },
            );
            Ok(amount)
        })
    }

    /// Proceeds still claimable by `contributor`; 0 before settlement, for
    /// non-contributors and after claiming.
    pub fn contributor_proceeds(env: Env, contributor: Address) -> Result<i128, PotError> {
        Self::require_initialized(&env)?;
        if read_state(&env)? != PotState::Settled {
            return Ok(0);
        }
        match ledger::get(&env, &contributor) {
            Some(record) if !record.proceeds_claimed => {
                Self::share_of_winning_bid(&env, record.value)
            }
            _ => Ok(0),
        }
    }

    // --- Views ---

    pub fn get_state(env: Env) -> Result<PotState, PotError> {
        Self::require_initialized(&env)?;
        read_state(&env)
    }

    pub fn get_creator(env: Env) -> Result<Address, PotError> {
        Self::require_initialized(&env)?;
        read(&env, &DataKey::Creator)
    }

    /// Seller of the asset, set once the pot is claimed.
    pub fn get_seller(env: Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::Seller)
    }

    pub fn get_settings(env: Env) -> Result<Address, PotError> {
        Self::require_initialized(&env)?;
        read(&env, &DataKey::Settings)
    }

    pub fn get_payment_token(env: Env) -> Result<Address, PotError> {
        Self::require_initialized(&env)?;
        read(&env, &DataKey::PaymentToken)
    }

    pub fn get_asset(env: Env) -> Result<TargetAsset, PotError> {
        Self::require_initialized(&env)?;
        read(&env, &DataKey::Asset)
    }

    pub fn get_created_at(env: Env) -> Result<u64, PotError> {
        Self::require_initialized(&env)?;
        read(&env, &DataKey::CreatedAt)
    }

    pub fn get_auction_params(env: Env) -> Result<AuctionParams, PotError> {
        Self::require_initialized(&env)?;
        read(&env, &DataKey::Params)
    }

    pub fn get_funds_raised(env: Env) -> Result<i128, PotError> {
        Self::require_initialized(&env)?;
        read_funds_raised(&env)
    }

    pub fn get_fee_collected(env: Env) -> Result<i128, PotError> {
        Self::require_initialized(&env)?;
        read(&env, &DataKey::FeeCollected)
    }

    pub fn get_voting_shares(env: Env) -> i128 {
        voting::voting_shares(&env)
    }

    /// Current contribution of an address (0 if none).
    pub fn get_contribution(env: Env, contributor: Address) -> i128 {
        ledger::get(&env, &contributor).map_or(0, |record| record.value)
    }

    pub fn get_contribution_record(env: Env, contributor: Address) -> Option<Contribution> {
        ledger::get(&env, &contributor)
    }

    pub fn contributor_count(env: Env) -> u32 {
        ledger::count(&env)
    }

    /// Contributor at a 1-based position.
    pub fn contributor_at(env: Env, index: u32) -> Option<Address> {
        ledger::contributor_at(&env, index)
    }

    pub fn get_contributors(env: Env) -> Result<Vec<Address>, PotError> {
        ledger::contributors(&env)
    }

    /// Smallest bid the auction currently accepts.
    pub fn min_bid(env: Env) -> Result<i128, PotError> {
        Self::require_initialized(&env)?;
        let state = read_state(&env)?;
        if state != PotState::Claimed && state != PotState::Auctioning {
            return Err(PotError::InvalidState);
        }
        let params: AuctionParams = read(&env, &DataKey::Params)?;
        auction::min_bid(&env, &params)
    }

    pub fn top_bid(env: Env) -> Option<Bid> {
        auction::top_bid(&env)
    }

    pub fn bid_count(env: Env) -> u32 {
        auction::bid_count(&env)
    }

    /// Bid at a 0-based position in the bid log.
    pub fn bid_at(env: Env, index: u32) -> Option<Bid> {
        auction::bid_at(&env, index)
    }

    pub fn auction_end(env: Env) -> Result<u64, PotError> {
        auction::auction_end(&env)
    }

    pub fn refund_of(env: Env, bidder: Address) -> i128 {
        auction::refund_of(&env, &bidder)
    }

    // --- Internal helpers ---

    fn require_initialized(env: &Env) -> Result<(), PotError> {
        if !env.storage().instance().has(&DataKey::Creator) {
            return Err(PotError::NotInitialized);
        }
        Ok(())
    }

    /// Common prologue of state-changing entry points.
    fn enter(env: &Env, expected: PotState) -> Result<(), PotError> {
        Self::require_initialized(env)?;
        if read_state(env)? != expected {
            return Err(PotError::InvalidState);
        }
        bump_instance(env);
        Ok(())
    }

    fn share_of_winning_bid(env: &Env, contribution: i128) -> Result<i128, PotError> {
        let winning = auction::top_bid(env).ok_or(PotError::StorageCorrupted)?;
        math::mul_div(env, winning.amount, contribution, read_funds_raised(env)?)
    }

    // Token transfers panic on failure and revert the whole invocation.

    fn collect(env: &Env, from: &Address, amount: i128) -> Result<(), PotError> {
        let payment_token: Address = read(env, &DataKey::PaymentToken)?;
        token::Client::new(env, &payment_token).transfer(
            from,
            &env.current_contract_address(),
            &amount,
        );
        Ok(())
    }

    fn pay(env: &Env, to: &Address, amount: i128) -> Result<(), PotError> {
        let payment_token: Address = read(env, &DataKey::PaymentToken)?;
        token::Client::new(env, &payment_token).transfer(
            &env.current_contract_address(),
            to,
            &amount,
        );
        Ok(())
    }
}
