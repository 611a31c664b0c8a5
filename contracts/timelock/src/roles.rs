//! Admin role storage and the two-phase handover protocol.
//!
//! The admin is the single identity allowed to queue, cancel, and execute.
//! Reassignment is strictly two-phase: an offer is scheduled through the
//! gate like any other reconfiguration, and only the offered address can
//! complete it by accepting. A single-step reassignment does not exist.

use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::{events, TimelockError};

const ADMIN: Symbol = symbol_short!("ADMIN");
const PENDING_ADMIN: Symbol = symbol_short!("PEND_ADM");

pub(crate) fn admin(env: &Env) -> Result<Address, TimelockError> {
    env.storage()
        .instance()
        .get(&ADMIN)
        .ok_or(TimelockError::NotInitialized)
}

pub(crate) fn put_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&ADMIN, admin);
}

pub(crate) fn pending(env: &Env) -> Option<Address> {
    env.storage().instance().get(&PENDING_ADMIN)
}

/// Record a handover offer, overwriting any prior one. At most one offer is
/// outstanding at a time.
pub(crate) fn offer(env: &Env, candidate: Address) -> Result<(), TimelockError> {
    env.storage().instance().set(&PENDING_ADMIN, &candidate);
    events::publish_admin_offered(env, candidate);
    Ok(())
}

/// Complete a handover. `caller` must match the offered address exactly.
pub(crate) fn accept(env: &Env, caller: &Address) -> Result<(), TimelockError> {
    let offered = pending(env).ok_or(TimelockError::Unauthorized)?;
    if *caller != offered {
        return Err(TimelockError::Unauthorized);
    }

    let previous = admin(env)?;
    put_admin(env, caller);
    env.storage().instance().remove(&PENDING_ADMIN);

    events::publish_admin_accepted(env, previous, caller.clone());
    Ok(())
}
