#![no_std]
#![allow(deprecated)] // events().publish migration tracked separately

//! # Holdfast Vesting
//!
//! Fixed-term token holder. Deposits accumulate into a locked total that
//! anyone can release to the beneficiary once the maturity timestamp has
//! passed. Deposits may continue after a release; a later release pays out
//! whatever accumulated since.


use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, token, Address, Env, Symbol,
};

const CONFIG: Symbol = symbol_short!("CONFIG");
const LOCKED: Symbol = symbol_short!("LOCKED");

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum VestingError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidInput = 3,
    InvalidAmount = 4,
    NotMatured = 5,
    NothingToRelease = 6,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VestingConfig {
    pub token: Address,
    pub beneficiary: Address,
    pub release_at: u64,
}

#[contract]
pub struct VestingContract;

#[contractimpl]
impl VestingContract {
    /// Configure the lock. `release_at` must be strictly in the future.
    pub fn initialize(
        env: Env,
        token: Address,
        beneficiary: Address,
        release_at: u64,
    ) -> Result<(), VestingError> {
        if env.storage().instance().has(&CONFIG) {
            return Err(VestingError::AlreadyInitialized);
        }
        if release_at <= env.ledger().timestamp() {
            return Err(VestingError::InvalidInput);
        }

        let config = VestingConfig {
            token,
            beneficiary,
            release_at,
        };
        env.storage().instance().set(&CONFIG, &config);

        Ok(())
    }

    /// Add `amount` to the locked total.
    pub fn deposit(env: Env, from: Address, amount: i128) -> Result<(), VestingError> {
        let config = Self::config(&env)?;
        from.require_auth();

        if amount <= 0 {
            return Err(VestingError::InvalidAmount);
        }

        token::TokenClient::new(&env, &config.token).transfer(
            &from,
            &env.current_contract_address(),
            &amount,
        );

        let total = Self::locked(&env)
            .checked_add(amount)
            .ok_or(VestingError::InvalidAmount)?;
        env.storage().instance().set(&LOCKED, &total);

        env.events().publish(
            (symbol_short!("VESTING"), symbol_short!("DEPOSIT")),
            (from, amount, total),
        );

        Ok(())
    }

    /// Pay the entire locked total to the beneficiary. Anyone may trigger
    /// this once the maturity timestamp has passed.
    pub fn release(env: Env) -> Result<i128, VestingError> {
        let config = Self::config(&env)?;

        if env.ledger().timestamp() < config.release_at {
            return Err(VestingError::NotMatured);
        }
        let total = Self::locked(&env);
        if total == 0 {
            return Err(VestingError::NothingToRelease);
        }

        token::TokenClient::new(&env, &config.token).transfer(
            &env.current_contract_address(),
            &config.beneficiary,
            &total,
        );
        env.storage().instance().set(&LOCKED, &0i128);

        env.events().publish(
            (symbol_short!("VESTING"), symbol_short!("RELEASE")),
            (config.beneficiary, total),
        );

        Ok(total)
    }

    // ── View functions ────────────────────────────────────────────────────────

    pub fn get_beneficiary(env: Env) -> Result<Address, VestingError> {
        Self::config(&env).map(|c| c.beneficiary)
    }

    pub fn get_release_at(env: Env) -> Result<u64, VestingError> {
        Self::config(&env).map(|c| c.release_at)
    }

    pub fn get_locked(env: Env) -> i128 {
        Self::locked(&env)
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn config(env: &Env) -> Result<VestingConfig, VestingError> {
        env.storage()
            .instance()
            .get(&CONFIG)
            .ok_or(VestingError::NotInitialized)
    }

    fn locked(env: &Env) -> i128 {
        env.storage().instance().get(&LOCKED).unwrap_or(0)
    }
}
