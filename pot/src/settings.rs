use soroban_sdk::{contractclient, contracttype, Address, Env};

/// Read side of the global settings contract.
#[contractclient(name = "SettingsClient")]
pub trait SettingsInterface {
    fn min_bid_delta_percentage(env: Env) -> u32;
    fn auction_duration(env: Env) -> u64;
    fn extension_window(env: Env) -> u64;
    fn extension_duration(env: Env) -> u64;
    fn max_reserve_price(env: Env) -> i128;
    fn safeguarded(env: Env) -> bool;
    fn max_fundraising(env: Env) -> i128;
    fn fee_enabled(env: Env) -> bool;
    fn fee_basis_points(env: Env) -> u32;
}

/// Auction parameters copied from settings when the pot is created.
/// Later settings changes do not affect an existing pot.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuctionParams {
    pub min_bid_delta_percentage: u32,
    pub auction_duration: u64,
    pub extension_window: u64,
    pub extension_duration: u64,
}

impl AuctionParams {
    pub fn snapshot(env: &Env, settings: &Address) -> Self {
        let client = SettingsClient::new(env, settings);
        AuctionParams {
            min_bid_delta_percentage: client.min_bid_delta_percentage(),
            auction_duration: client.auction_duration(),
            extension_window: client.extension_window(),
            extension_duration: client.extension_duration(),
        }
    }
}
