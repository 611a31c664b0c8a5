//! Delay policy: the mandatory wait between queuing and eta.

use soroban_sdk::{symbol_short, Env, Symbol};

use crate::{events, TimelockError};

/// Shortest permitted delay (2 days).
pub const MIN_DELAY: u64 = 172_800;
/// Longest permitted delay (30 days).
pub const MAX_DELAY: u64 = 2_592_000;
/// Window after eta during which execution stays valid (14 days).
pub const GRACE_PERIOD: u64 = 1_209_600;

const DELAY: Symbol = symbol_short!("DELAY");

/// Bounds check: `MIN_DELAY ≤ value ≤ MAX_DELAY`.
pub(crate) fn validate(value: u64) -> Result<(), TimelockError> {
    if value < MIN_DELAY || value > MAX_DELAY {
        return Err(TimelockError::OutOfBounds);
    }
    Ok(())
}

pub(crate) fn get(env: &Env) -> Result<u64, TimelockError> {
    env.storage()
        .instance()
        .get(&DELAY)
        .ok_or(TimelockError::NotInitialized)
}

/// Unchecked write, used by `initialize` after validation.
pub(crate) fn put(env: &Env, value: u64) {
    env.storage().instance().set(&DELAY, &value);
}

/// Validated mutation. Reachable only through the self-dispatch gate, so a
/// delay change always waits out the current delay first.
pub(crate) fn update(env: &Env, new_delay: u64) -> Result<(), TimelockError> {
    validate(new_delay)?;
    let old_delay = get(env)?;
    put(env, new_delay);
    events::publish_delay_updated(env, old_delay, new_delay);
    Ok(())
}
