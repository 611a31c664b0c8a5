#![no_std]

//! # Holdfast Timelock
//!
//! Delayed-execution authorization gate for the Holdfast contract suite:
//!
//! - **Content-addressed scheduling**: every action is identified by the
//!   SHA-256 digest of its full descriptor; the registry stores only an
//!   identity→flag mapping, never the descriptor itself.
//! - **Bounded delay policy**: 2 to 30 days, changeable only through the
//!   gate's own queue→execute pipeline.
//! - **Grace window**: a queued action is executable from `eta` until
//!   `eta + 14 days`, after which it goes stale.
//! - **Two-phase admin handover**: offers are scheduled through the gate;
//!   only the offered address can accept.
//! - **Atomic execution**: a failed dispatch aborts the whole operation and
//!   the queued flag survives untouched.
//!
//! Per-identity lifecycle:
//!
//! ```text
//!   Unqueued ──queue──▶ Queued ──execute──▶ Unqueued
//!       ▲                  │
//!       └───── cancel ─────┘
//! ```
//!
//! Executed and cancelled identities both collapse back into the unqueued
//! bucket; the event stream carries the distinction.

pub mod delay;
pub mod descriptor;
pub mod dispatch;
pub mod events;
pub mod registry;
pub mod roles;

pub use descriptor::ScheduledCall;

use soroban_sdk::{
    contract, contractimpl, symbol_short, token, Address, BytesN, Env, IntoVal, Symbol, Val,
};

// ── Storage key constants ─────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const NATIVE_TOKEN: Symbol = symbol_short!("NTV_TOK");

// ── Error codes ───────────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum TimelockError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    OutOfBounds = 4,
    DelayNotElapsed = 5,
    NotQueued = 6,
    TooEarly = 7,
    Stale = 8,
    ExecutionReverted = 9,
    InvalidAmount = 10,
}

// ── Contract ──────────────────────────────────────────────────────────────────

#[contract]
pub struct TimelockContract;

#[contractimpl]
impl TimelockContract {
    // ── Initialisation ────────────────────────────────────────────────────────

    /// Bootstrap the timelock.
    ///
    /// * `admin`        — identity allowed to queue, cancel, and execute.
    /// * `native_token` — classic-asset contract backing value-bearing
    ///                    scheduled calls (normally wrapped XLM).
    /// * `delay`        — initial mandatory wait, bounds-checked against
    ///                    [`delay::MIN_DELAY`], [`delay::MAX_DELAY`].
    pub fn initialize(
        env: Env,
        admin: Address,
        native_token: Address,
        delay: u64,
    ) -> Result<(), TimelockError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(TimelockError::AlreadyInitialized);
        }
        delay::validate(delay)?;

        roles::put_admin(&env, &admin);
        env.storage().instance().set(&NATIVE_TOKEN, &native_token);
        delay::put(&env, delay);
        env.storage().instance().set(&INITIALIZED, &true);

        Ok(())
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Schedule a call for delayed execution and return its identity.
    ///
    /// The eta must leave at least the current delay between now and
    /// execution. Queuing an identity that is already queued is a no-op
    /// that re-emits the queued event.
    pub fn queue(
        env: Env,
        caller: Address,
        call: ScheduledCall,
    ) -> Result<BytesN<32>, TimelockError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let now = env.ledger().timestamp();
        if call.eta < now.saturating_add(delay::get(&env)?) {
            return Err(TimelockError::DelayNotElapsed);
        }

        let id = descriptor::call_id(&env, &call);
        registry::set_queued(&env, &id, true);
        events::publish_call_queued(&env, id.clone(), &call);

        Ok(id)
    }

    /// Withdraw a scheduled call.
    ///
    /// Clears the flag unconditionally; cancelling a descriptor that was
    /// never queued is a silent no-op.
    pub fn cancel(env: Env, caller: Address, call: ScheduledCall) -> Result<(), TimelockError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let id = descriptor::call_id(&env, &call);
        registry::set_queued(&env, &id, false);
        events::publish_call_cancelled(&env, id, &call);

        Ok(())
    }

    /// Execute a queued call inside its validity window and return the
    /// dispatched call's result.
    ///
    /// The window is inclusive on both ends: execution is valid from
    /// `eta` through `eta + GRACE_PERIOD`. The queued flag is cleared
    /// before dispatch so the same identity cannot run twice; a failed
    /// dispatch aborts the operation and rolls the clear back with it.
    pub fn execute(env: Env, caller: Address, call: ScheduledCall) -> Result<Val, TimelockError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let id = descriptor::call_id(&env, &call);
        if !registry::is_queued(&env, &id) {
            return Err(TimelockError::NotQueued);
        }

        let now = env.ledger().timestamp();
        if now < call.eta {
            return Err(TimelockError::TooEarly);
        }
        if now > call.eta.saturating_add(delay::GRACE_PERIOD) {
            return Err(TimelockError::Stale);
        }

        registry::set_queued(&env, &id, false);

        let result = if call.target == env.current_contract_address() {
            Self::dispatch_self(&env, &call)?
        } else {
            let native_token = Self::native_token(&env)?;
            dispatch::call_external(&env, &native_token, &call)?
        };

        events::publish_call_executed(&env, id, &call);
        Ok(result)
    }

    // ── Self-routed reconfiguration ───────────────────────────────────────────

    /// Change the delay. Only reachable through the gate's own dispatch: a
    /// direct call fails with `Unauthorized` no matter who signs it.
    pub fn set_delay(env: Env, new_delay: u64) -> Result<(), TimelockError> {
        Self::require_initialized(&env)?;
        dispatch::require_self(&env)?;
        delay::update(&env, new_delay)
    }

    /// Offer the admin role to `candidate`. Self-routed like `set_delay`;
    /// the handover completes only when the candidate accepts.
    pub fn offer_admin(env: Env, candidate: Address) -> Result<(), TimelockError> {
        Self::require_initialized(&env)?;
        dispatch::require_self(&env)?;
        roles::offer(&env, candidate)
    }

    /// Accept an outstanding admin offer. The caller must be the exact
    /// offered address.
    pub fn accept_admin(env: Env, caller: Address) -> Result<(), TimelockError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        roles::accept(&env, &caller)
    }

    // ── Funding ───────────────────────────────────────────────────────────────

    /// Move native-asset funds into the timelock for later value-bearing
    /// executions. Anyone may fund; the event keeps the inflow auditable.
    pub fn deposit(env: Env, from: Address, amount: i128) -> Result<(), TimelockError> {
        Self::require_initialized(&env)?;
        from.require_auth();

        if amount <= 0 {
            return Err(TimelockError::InvalidAmount);
        }

        let native_token = Self::native_token(&env)?;
        token::TokenClient::new(&env, &native_token).transfer(
            &from,
            &env.current_contract_address(),
            &amount,
        );
        events::publish_deposited(&env, from, amount);

        Ok(())
    }

    // ── View functions ────────────────────────────────────────────────────────

    pub fn is_queued(env: Env, id: BytesN<32>) -> bool {
        registry::is_queued(&env, &id)
    }

    /// Compute the identity a descriptor would queue under.
    pub fn call_id(env: Env, call: ScheduledCall) -> BytesN<32> {
        descriptor::call_id(&env, &call)
    }

    pub fn get_delay(env: Env) -> Result<u64, TimelockError> {
        delay::get(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, TimelockError> {
        roles::admin(&env)
    }

    pub fn get_pending_admin(env: Env) -> Option<Address> {
        roles::pending(&env)
    }

    pub fn get_native_token(env: Env) -> Result<Address, TimelockError> {
        Self::native_token(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), TimelockError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(TimelockError::NotInitialized);
        }
        Ok(())
    }

    fn require_admin(env: &Env, caller: &Address) -> Result<(), TimelockError> {
        let admin = roles::admin(env)?;
        if *caller != admin {
            return Err(TimelockError::Unauthorized);
        }
        Ok(())
    }

    fn native_token(env: &Env) -> Result<Address, TimelockError> {
        env.storage()
            .instance()
            .get(&NATIVE_TOKEN)
            .ok_or(TimelockError::NotInitialized)
    }

    /// Route a self-targeted call to its reconfiguration entry point.
    ///
    /// Arms the self-dispatch marker, routes through the same public entry
    /// point a direct caller would hit, then disarms the marker. Unknown
    /// entry points and undecodable argument lists are failed calls;
    /// reconfiguration errors like `OutOfBounds` propagate with their
    /// precise code.
    fn dispatch_self(env: &Env, call: &ScheduledCall) -> Result<Val, TimelockError> {
        let function = match &call.function {
            Some(function) => function.clone(),
            None => return Err(TimelockError::ExecutionReverted),
        };
        let args = dispatch::decode_args(env, &call.payload)?;

        dispatch::arm(env);
        let outcome = if function == Symbol::new(env, "set_delay") {
            dispatch::arg::<u64>(env, &args, 0)
                .and_then(|new_delay| Self::set_delay(env.clone(), new_delay))
        } else if function == Symbol::new(env, "offer_admin") {
            dispatch::arg::<Address>(env, &args, 0)
                .and_then(|candidate| Self::offer_admin(env.clone(), candidate))
        } else {
            Err(TimelockError::ExecutionReverted)
        };
        dispatch::disarm(env);

        outcome.map(|_| ().into_val(env))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
