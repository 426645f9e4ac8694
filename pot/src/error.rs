use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PotError {
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,
    /// Operation not allowed in the current lifecycle state
    InvalidState = 3,
    /// Caller has no contribution in this pot
    NotAContributor = 4,
    /// Supplied amount does not match the required value
    AmountMismatch = 5,
    /// Bid or auction opening below the current minimum
    BelowMinimum = 6,
    /// Reserve price cap or fundraising cap exceeded
    ExceedsLimit = 7,
    /// Proceeds already claimed
    AlreadyClaimed = 8,
    /// No refund owed to caller
    NoRefund = 9,
    /// Asset transfer was rejected by the asset contract
    TransferFailure = 10,
    /// Contributor index points outside the contributor list
    CorruptLedger = 11,
    /// Reserve price vote equals the current one
    SameValue = 12,
    /// Auction has already ended
    AuctionNotLive = 13,
    /// Auction still running
    AuctionNotEnded = 14,
    /// Amount must be positive
    InvalidAmount = 15,
    /// Every contributor abstained, reserve price is undefined
    NoReserve = 16,
    /// Target asset contract or token does not exist
    InvalidAsset = 17,
    /// Seller does not hold the target asset
    NotAssetOwner = 18,
    /// Reentrant call rejected
    Reentrant = 19,
    /// Arithmetic overflow
    Overflow = 20,
    /// Critical storage data missing (contract state corrupted)
    StorageCorrupted = 21,
}
