#![allow(deprecated)] // events().publish migration to #[contractevent] tracked separately

//! Events emitted by the timelock contract.

use soroban_sdk::{symbol_short, Address, Bytes, BytesN, Env, Symbol};

use crate::descriptor::ScheduledCall;

// ── Internal helper ───────────────────────────────────────────────────────────

fn emit<T: soroban_sdk::IntoVal<Env, soroban_sdk::Val>>(env: &Env, topic: &str, data: T) {
    env.events()
        .publish((symbol_short!("TIMELOCK"), Symbol::new(env, topic)), data);
}

// ── Event structs ─────────────────────────────────────────────────────────────

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CallQueuedEvent {
    pub id: BytesN<32>,
    pub target: Address,
    pub amount: i128,
    pub function: Option<Symbol>,
    pub payload: Bytes,
    pub eta: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CallCancelledEvent {
    pub id: BytesN<32>,
    pub target: Address,
    pub eta: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CallExecutedEvent {
    pub id: BytesN<32>,
    pub target: Address,
    pub amount: i128,
    pub function: Option<Symbol>,
    pub eta: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DelayUpdatedEvent {
    pub old_delay: u64,
    pub new_delay: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminOfferedEvent {
    pub candidate: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminAcceptedEvent {
    pub previous: Address,
    pub new_admin: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositedEvent {
    pub from: Address,
    pub amount: i128,
    pub timestamp: u64,
}

// ── Publishers ────────────────────────────────────────────────────────────────

pub fn publish_call_queued(env: &Env, id: BytesN<32>, call: &ScheduledCall) {
    emit(
        env,
        "Queued",
        CallQueuedEvent {
            id,
            target: call.target.clone(),
            amount: call.amount,
            function: call.function.clone(),
            payload: call.payload.clone(),
            eta: call.eta,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_call_cancelled(env: &Env, id: BytesN<32>, call: &ScheduledCall) {
    emit(
        env,
        "Cancelled",
        CallCancelledEvent {
            id,
            target: call.target.clone(),
            eta: call.eta,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_call_executed(env: &Env, id: BytesN<32>, call: &ScheduledCall) {
    emit(
        env,
        "Executed",
        CallExecutedEvent {
            id,
            target: call.target.clone(),
            amount: call.amount,
            function: call.function.clone(),
            eta: call.eta,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_delay_updated(env: &Env, old_delay: u64, new_delay: u64) {
    emit(
        env,
        "DelaySet",
        DelayUpdatedEvent {
            old_delay,
            new_delay,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_offered(env: &Env, candidate: Address) {
    emit(
        env,
        "AdmOffer",
        AdminOfferedEvent {
            candidate,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_accepted(env: &Env, previous: Address, new_admin: Address) {
    emit(
        env,
        "AdmAccept",
        AdminAcceptedEvent {
            previous,
            new_admin,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_deposited(env: &Env, from: Address, amount: i128) {
    emit(
        env,
        "Deposited",
        DepositedEvent {
            from,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}
