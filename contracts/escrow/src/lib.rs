#![no_std]
#![allow(deprecated)] // events().publish migration tracked separately

//! # Holdfast Escrow
//!
//! Capped-membership contribution pool. Members pay a fixed contribution to
//! join; once the member cap is reached anyone may trigger release, which
//! pays the whole pool to the configured beneficiary. Members can refund
//! out any time before release.
//!
//! The pool never calls into other Holdfast contracts; it is a plain
//! scheduled-call target.


use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, token, Address, Env, Symbol,
};

const INIT: Symbol = symbol_short!("INIT");
const CONFIG: Symbol = symbol_short!("CONFIG");
const COUNT: Symbol = symbol_short!("COUNT");
const RELEASED: Symbol = symbol_short!("RELEASED");
const MEMBER: Symbol = symbol_short!("MEMBER");

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum EscrowError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidInput = 3,
    AlreadyMember = 4,
    NotMember = 5,
    PoolFull = 6,
    PoolNotFull = 7,
    AlreadyReleased = 8,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EscrowConfig {
    pub organizer: Address,
    pub token: Address,
    pub beneficiary: Address,
    pub member_cap: u32,
    pub contribution: i128,
}

#[contract]
pub struct EscrowContract;

#[contractimpl]
impl EscrowContract {
    /// Configure the pool. The full payout `member_cap × contribution`
    /// must fit in an `i128`.
    pub fn initialize(
        env: Env,
        organizer: Address,
        token: Address,
        beneficiary: Address,
        member_cap: u32,
        contribution: i128,
    ) -> Result<(), EscrowError> {
        if env.storage().instance().has(&INIT) {
            return Err(EscrowError::AlreadyInitialized);
        }
        organizer.require_auth();

        if member_cap == 0 || contribution <= 0 {
            return Err(EscrowError::InvalidInput);
        }
        contribution
            .checked_mul(member_cap as i128)
            .ok_or(EscrowError::InvalidInput)?;

        let config = EscrowConfig {
            organizer,
            token,
            beneficiary,
            member_cap,
            contribution,
        };
        env.storage().instance().set(&CONFIG, &config);
        env.storage().instance().set(&INIT, &true);

        Ok(())
    }

    /// Join the pool by paying the fixed contribution.
    pub fn join(env: Env, member: Address) -> Result<u32, EscrowError> {
        let config = Self::require_init(&env)?;
        member.require_auth();

        if Self::released(&env) {
            return Err(EscrowError::AlreadyReleased);
        }
        if Self::member(&env, &member) {
            return Err(EscrowError::AlreadyMember);
        }

        let count = Self::member_count(&env);
        if count >= config.member_cap {
            return Err(EscrowError::PoolFull);
        }

        token::TokenClient::new(&env, &config.token).transfer(
            &member,
            &env.current_contract_address(),
            &config.contribution,
        );

        let new_count = count + 1;
        env.storage()
            .persistent()
            .set(&(MEMBER, member.clone()), &true);
        env.storage().instance().set(&COUNT, &new_count);

        env.events().publish(
            (symbol_short!("ESCROW"), symbol_short!("JOINED")),
            (member, new_count),
        );

        Ok(new_count)
    }

    /// Leave the pool before release and take the contribution back.
    pub fn refund(env: Env, member: Address) -> Result<(), EscrowError> {
        let config = Self::require_init(&env)?;
        member.require_auth();

        if Self::released(&env) {
            return Err(EscrowError::AlreadyReleased);
        }
        if !Self::member(&env, &member) {
            return Err(EscrowError::NotMember);
        }

        token::TokenClient::new(&env, &config.token).transfer(
            &env.current_contract_address(),
            &member,
            &config.contribution,
        );

        let new_count = Self::member_count(&env).saturating_sub(1);
        env.storage().persistent().remove(&(MEMBER, member.clone()));
        env.storage().instance().set(&COUNT, &new_count);

        env.events().publish(
            (symbol_short!("ESCROW"), symbol_short!("REFUNDED")),
            (member, new_count),
        );

        Ok(())
    }

    /// Pay the full pool to the beneficiary. Anyone may trigger this once
    /// the member cap is reached.
    pub fn release(env: Env) -> Result<(), EscrowError> {
        let config = Self::require_init(&env)?;

        if Self::released(&env) {
            return Err(EscrowError::AlreadyReleased);
        }
        if Self::member_count(&env) < config.member_cap {
            return Err(EscrowError::PoolNotFull);
        }

        let payout = config
            .contribution
            .checked_mul(config.member_cap as i128)
            .ok_or(EscrowError::InvalidInput)?;

        token::TokenClient::new(&env, &config.token).transfer(
            &env.current_contract_address(),
            &config.beneficiary,
            &payout,
        );
        env.storage().instance().set(&RELEASED, &true);

        env.events().publish(
            (symbol_short!("ESCROW"), symbol_short!("RELEASED")),
            (config.beneficiary, payout),
        );

        Ok(())
    }

    // ── View functions ────────────────────────────────────────────────────────

    pub fn get_member_count(env: Env) -> u32 {
        Self::member_count(&env)
    }

    pub fn is_member(env: Env, addr: Address) -> bool {
        Self::member(&env, &addr)
    }

    pub fn is_released(env: Env) -> bool {
        Self::released(&env)
    }

    pub fn get_config(env: Env) -> Result<EscrowConfig, EscrowError> {
        Self::require_init(&env)
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn require_init(env: &Env) -> Result<EscrowConfig, EscrowError> {
        env.storage()
            .instance()
            .get(&CONFIG)
            .ok_or(EscrowError::NotInitialized)
    }

    fn member_count(env: &Env) -> u32 {
        env.storage().instance().get(&COUNT).unwrap_or(0)
    }

    fn member(env: &Env, addr: &Address) -> bool {
        env.storage()
            .persistent()
            .get(&(MEMBER, addr.clone()))
            .unwrap_or(false)
    }

    fn released(env: &Env) -> bool {
        env.storage().instance().get(&RELEASED).unwrap_or(false)
    }
}
