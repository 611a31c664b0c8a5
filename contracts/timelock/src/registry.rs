//! Queued-flag registry.
//!
//! Persistent identity→flag mapping. Absent means not queued; the registry
//! holds no descriptor data, so clearing an entry makes the identity
//! indistinguishable from one that was never queued.

use soroban_sdk::{symbol_short, BytesN, Env, Symbol};

const QUEUED: Symbol = symbol_short!("QUEUED");

// TTL: ~60 days at 5s/ledger, comfortably above MAX_DELAY + GRACE_PERIOD.
const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

fn entry_key(id: &BytesN<32>) -> (Symbol, BytesN<32>) {
    (QUEUED, id.clone())
}

/// Whether `id` currently has an active queued flag.
pub(crate) fn is_queued(env: &Env, id: &BytesN<32>) -> bool {
    env.storage()
        .persistent()
        .get(&entry_key(id))
        .unwrap_or(false)
}

/// Flip the flag for `id`. Mutation is lifecycle-internal; entries are
/// removed rather than stored false so absent and cleared read identically.
pub(crate) fn set_queued(env: &Env, id: &BytesN<32>, queued: bool) {
    let key = entry_key(id);
    if queued {
        env.storage().persistent().set(&key, &true);
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    } else {
        env.storage().persistent().remove(&key);
    }
}
