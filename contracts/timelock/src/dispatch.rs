//! Call dispatch: the executor for approved actions plus the self-dispatch
//! gate that protects the timelock's own reconfiguration entry points.
//!
//! Soroban forbids reentrancy, including a contract invoking itself, so a
//! self-targeted action cannot go through the host's cross-contract call
//! path. Instead `execute` routes it internally and arms a temporary-storage
//! marker for the duration of the routed call. `set_delay` and `offer_admin`
//! demand the armed marker; an external frame can never observe it armed
//! (temporary storage does not outlive the transaction and the marker is
//! disarmed before `execute` returns), so those entry points fail with
//! `Unauthorized` for every direct caller.

use soroban_sdk::xdr::FromXdr;

use soroban_sdk::{symbol_short, token, Address, Bytes, Env, IntoVal, Symbol, TryFromVal, Val, Vec};

use crate::{descriptor::ScheduledCall, TimelockError};

const SELF_GATE: Symbol = symbol_short!("SELFGATE");

// ── Self-dispatch marker ──────────────────────────────────────────────────────

pub(crate) fn arm(env: &Env) {
    env.storage().temporary().set(&SELF_GATE, &true);
}

pub(crate) fn disarm(env: &Env) {
    env.storage().temporary().remove(&SELF_GATE);
}

/// Guard for self-routed entry points. Passes only while `execute` is
/// routing a call whose target is this contract.
pub(crate) fn require_self(env: &Env) -> Result<(), TimelockError> {
    let armed: bool = env
        .storage()
        .temporary()
        .get(&SELF_GATE)
        .unwrap_or(false);
    if !armed {
        return Err(TimelockError::Unauthorized);
    }
    Ok(())
}

// ── Payload decoding ──────────────────────────────────────────────────────────

/// Decode the descriptor payload into an argument list.
///
/// An empty payload means no arguments; anything else must be the XDR
/// encoding of a `Vec<Val>`. A payload that fails to decode is a failed
/// call, not a lifecycle error.
pub(crate) fn decode_args(env: &Env, payload: &Bytes) -> Result<Vec<Val>, TimelockError> {
    if payload.is_empty() {
        return Ok(Vec::new(env));
    }
    Vec::<Val>::from_xdr(env, payload).map_err(|_| TimelockError::ExecutionReverted)
}

/// Extract and convert the argument at `index`.
pub(crate) fn arg<T: TryFromVal<Env, Val>>(
    env: &Env,
    args: &Vec<Val>,
    index: u32,
) -> Result<T, TimelockError> {
    let raw = args.get(index).ok_or(TimelockError::ExecutionReverted)?;
    T::try_from_val(env, &raw).map_err(|_| TimelockError::ExecutionReverted)
}

// ── External dispatch ─────────────────────────────────────────────────────────

/// Dispatch an approved action to an external target.
///
/// Moves the descriptor amount first, then invokes the named entry point
/// with the decoded arguments. Either step failing surfaces as
/// `ExecutionReverted`; the failed sub-frame commits nothing and the caller
/// rolls the rest back. A descriptor with no function and no amount is a
/// successful no-op.
pub(crate) fn call_external(
    env: &Env,
    native_token: &Address,
    call: &ScheduledCall,
) -> Result<Val, TimelockError> {
    if call.amount > 0 {
        let outcome = token::TokenClient::new(env, native_token).try_transfer(
            &env.current_contract_address(),
            &call.target,
            &call.amount,
        );
        if !matches!(outcome, Ok(Ok(()))) {
            return Err(TimelockError::ExecutionReverted);
        }
    }

    match &call.function {
        None => Ok(().into_val(env)),
        Some(function) => {
            let args = decode_args(env, &call.payload)?;
            match env.try_invoke_contract::<Val, soroban_sdk::Error>(&call.target, function, args) {
                Ok(Ok(value)) => Ok(value),
                _ => Err(TimelockError::ExecutionReverted),
            }
        }
    }
}
