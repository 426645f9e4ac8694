use soroban_sdk::Env;

use crate::error::PotError;
use crate::storage::DataKey;

/// Run `body` while holding the pot lock. A call that finds the lock held is
/// rejected with Reentrant. The lock is released whether `body` succeeds or
/// fails.
pub fn non_reentrant<T>(
    env: &Env,
    body: impl FnOnce() -> Result<T, PotError>,
) -> Result<T, PotError> {
    if env.storage().instance().has(&DataKey::Locked) {
        return Err(PotError::Reentrant);
    }
    env.storage().instance().set(&DataKey::Locked, &true);
    let result = body();
    env.storage().instance().remove(&DataKey::Locked);
    result
}
