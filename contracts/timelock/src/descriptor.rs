//! Scheduled-call descriptor and its content-derived identity.
//!
//! A [`ScheduledCall`] fully describes one future action: which contract to
//! act on, how much of the native asset to send, which entry point to invoke
//! (if any) with which arguments, and the earliest timestamp at which the
//! action becomes executable. The registry never stores the descriptor —
//! only the 32-byte digest derived from it — so every lifecycle operation
//! takes the complete descriptor again and recomputes the identity.

use soroban_sdk::xdr::ToXdr;

use soroban_sdk::{contracttype, Address, Bytes, BytesN, Env, Symbol, Val, Vec};

/// Full description of a delayed action.
///
/// Two descriptors are equal iff all five fields are equal; any single-field
/// change produces a different identity.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScheduledCall {
    /// Contract the action acts on.
    pub target: Address,
    /// Native-asset amount transferred to the target before the call.
    pub amount: i128,
    /// Entry point to invoke on the target; `None` means a pure transfer.
    pub function: Option<Symbol>,
    /// XDR-encoded `Vec<Val>` argument list, decoded only at dispatch time.
    pub payload: Bytes,
    /// Earliest timestamp (seconds) at which execution becomes valid.
    pub eta: u64,
}

/// Deterministic identity of a scheduled call.
///
/// SHA-256 over the XDR encoding of the whole descriptor. XDR is a tagged,
/// canonical serialisation, so the digest is injective over the field domain
/// and the same descriptor always hashes to the same identity.
pub fn call_id(env: &Env, call: &ScheduledCall) -> BytesN<32> {
    let encoded = call.clone().to_xdr(env);
    env.crypto().sha256(&encoded).into()
}

/// Encode an argument list into the `payload` wire form.
///
/// Convenience for callers assembling descriptors off-chain or in tests.
pub fn encode_args(env: &Env, args: Vec<Val>) -> Bytes {
    args.to_xdr(env)
}
