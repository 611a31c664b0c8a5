//! # Contract Testing Framework — Integration Tests
//!
//! Comprehensive tests exercising the testing framework itself and the
//! contracts working together:
//! - Property-based testing with invariant verification
//! - Random action sequences and scheduling patterns
//! - Cross-contract scheduling (timelock driving escrow and vesting)

extern crate std;

use proptest::prelude::*;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{Address, IntoVal};

use escrow::{EscrowContract, EscrowContractClient};
use timelock::delay::{GRACE_PERIOD, MIN_DELAY};
use timelock::{ScheduledCall, TimelockContract, TimelockContractClient, TimelockError};
use vesting::{VestingContract, VestingContractClient};

use test_framework::generators::*;
use test_framework::invariants::*;
use test_framework::*;

// ── Action Driver ────────────────────────────────────────────────────────────

/// Apply one generated action to the harness, tracking every descriptor the
/// run has built so snapshots can capture its registry flag.
///
/// Contract-defined failures are part of normal operation under random
/// sequences (cancelled calls get executed, etas lapse); anything outside
/// the contract's error taxonomy is a bug.
fn apply_action(
    harness: &TimelockHarness,
    recipients: &[Address],
    calls: &mut std::vec::Vec<ScheduledCall>,
    action: &TimelockAction,
) -> ActionOutcome {
    match action {
        TimelockAction::Queue {
            recipient_index,
            amount,
            eta_slack,
        } => {
            let recipient = &recipients[recipient_index % recipients.len()];
            let eta = harness.min_eta().saturating_add(*eta_slack);
            let call = harness.transfer_call(recipient, *amount, eta);
            let outcome = outcome_of(harness.client.try_queue(&harness.admin, &call));
            if matches!(outcome, ActionOutcome::Ok) {
                calls.push(call);
            }
            outcome
        }
        TimelockAction::Cancel { call_index } => {
            if calls.is_empty() {
                return ActionOutcome::Ok;
            }
            let call = &calls[call_index % calls.len()];
            outcome_of(harness.client.try_cancel(&harness.admin, call))
        }
        TimelockAction::Execute { call_index } => {
            if calls.is_empty() {
                return ActionOutcome::Ok;
            }
            let call = &calls[call_index % calls.len()];
            outcome_of(harness.client.try_execute(&harness.admin, call))
        }
        TimelockAction::AdvanceTime { delta } => {
            harness.env.advance_time(*delta);
            ActionOutcome::Ok
        }
        TimelockAction::Deposit { amount } => {
            let funder = Address::generate(&harness.env.env);
            if *amount > 0 {
                harness.env.mint_tokens(&harness.token, &funder, *amount);
            }
            outcome_of(harness.client.try_deposit(&funder, amount))
        }
    }
}

/// Collapse a `try_*` client result into an [`ActionOutcome`].
fn outcome_of<T, E: std::fmt::Debug>(
    result: Result<T, Result<TimelockError, E>>,
) -> ActionOutcome {
    match result {
        Ok(_) => ActionOutcome::Ok,
        Err(Ok(contract_error)) => ActionOutcome::ExpectedError(contract_error as u32),
        Err(Err(host_error)) => {
            ActionOutcome::UnexpectedError(std::format!("{:?}", host_error))
        }
    }
}

/// Run a full action sequence, asserting the invariant suite after every
/// step. Panics (via the invariant sets) on any violation.
fn run_sequence(harness: &TimelockHarness, recipients: &[Address], actions: &[TimelockAction]) {
    let invariants = InvariantSet::timelock_defaults();
    let transitions = TransitionInvariantSet::timelock_defaults();

    let mut calls = std::vec::Vec::new();
    let mut previous = harness.snapshot(&calls);

    for action in actions {
        let outcome = apply_action(harness, recipients, &mut calls, action);
        assert!(
            outcome.is_well_defined(),
            "action {:?} escaped the error taxonomy: {:?}",
            action,
            outcome
        );

        let current = harness.snapshot(&calls);
        MonotonicTime::check_transition(&previous, &current).unwrap();
        invariants.assert_all(&current);
        transitions.assert_all(&previous, &current);
        previous = current;
    }
}

// ═════════════════════════════════════════════════════════════════════════════
//  Property-Based Tests
// ═════════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// **Property**: any slack on top of the minimum eta produces a queued flag.
    #[test]
    fn prop_queue_accepts_any_valid_slack(
        slack in eta_slack_strategy(),
        amount in positive_amount_strategy(),
    ) {
        let mut env = TestEnv::new();
        let harness = TimelockHarness::new(&mut env, MIN_DELAY);
        let recipient = harness.create_recipient();

        let call = harness.transfer_call(&recipient, amount, harness.min_eta() + slack);
        let before = harness.snapshot(std::slice::from_ref(&call));
        let id = harness.queue(&call);
        let after = harness.snapshot(std::slice::from_ref(&call));

        let inv = QueueSetsFlag { id };
        prop_assert!(inv.check(&before, &after).is_ok(),
            "queue with slack {} did not set the registry flag", slack);
    }

    /// **Property**: etas short of the minimum are always rejected.
    #[test]
    fn prop_short_etas_always_rejected(shortfall in eta_shortfall_strategy()) {
        let mut env = TestEnv::new();
        let harness = TimelockHarness::new(&mut env, MIN_DELAY);
        let recipient = harness.create_recipient();

        let eta = harness.min_eta().saturating_sub(shortfall);
        let call = harness.transfer_call(&recipient, 1_000, eta);

        let result = harness.client.try_queue(&harness.admin, &call);
        prop_assert_eq!(result, Err(Ok(TimelockError::DelayNotElapsed)),
            "eta {} below the minimum should have been rejected", eta);
    }

    /// **Property**: every in-bounds deployment config yields a healthy gate.
    #[test]
    fn prop_setup_configs_deploy_and_hold_invariants(setup in timelock_setup_strategy()) {
        let mut env = TestEnv::new();
        let harness = TimelockHarness::new(&mut env, setup.delay);
        harness.fund(setup.funding);

        prop_assert_eq!(harness.client.get_delay(), setup.delay);

        let invariants = InvariantSet::timelock_defaults();
        invariants.assert_all(&harness.snapshot(&[]));
    }

    /// **Property**: out-of-bounds delays never survive deployment.
    #[test]
    fn prop_out_of_bounds_delays_rejected(delay in out_of_bounds_delay_strategy()) {
        let mut env = TestEnv::new();
        let token = env.deploy_token();
        let contract_id = env.env.register(TimelockContract, ());
        let client = TimelockContractClient::new(&env.env, &contract_id);
        let admin = env.generate_address();

        let result = client.try_initialize(&admin, &token, &delay);
        prop_assert_eq!(result, Err(Ok(TimelockError::OutOfBounds)),
            "delay {} outside the policy bounds should have been rejected", delay);
    }

    /// **Property**: invariants hold after arbitrary action sequences.
    #[test]
    fn prop_invariants_hold_under_random_actions(
        actions in timelock_action_sequence(3, 15),
    ) {
        let mut env = TestEnv::new();
        let harness = TimelockHarness::new(&mut env, MIN_DELAY);
        let recipients: std::vec::Vec<Address> =
            (0..3).map(|_| harness.create_recipient()).collect();

        run_sequence(&harness, &recipients, &actions);
    }

    /// **Property**: every scheduling pattern preserves the invariant suite.
    #[test]
    fn prop_patterns_preserve_invariants(pattern in schedule_pattern_strategy()) {
        let mut env = TestEnv::new();
        let harness = TimelockHarness::new(&mut env, MIN_DELAY);
        let recipients: std::vec::Vec<Address> =
            (0..3).map(|_| harness.create_recipient()).collect();

        let actions = pattern_to_actions(&pattern, recipients.len());
        run_sequence(&harness, &recipients, &actions);
    }

    /// **Property**: an executed transfer moves exactly the scheduled amount.
    #[test]
    fn prop_executed_transfer_conserves_value(amount in 1i128..=1_000_000_000_000i128) {
        let mut env = TestEnv::new();
        let harness = TimelockHarness::new(&mut env, MIN_DELAY);
        let recipient = harness.create_recipient();
        harness.fund(amount);

        let call = harness.transfer_call(&recipient, amount, harness.min_eta());
        harness.queue(&call);
        harness.env.advance_time(MIN_DELAY);
        harness.execute(&call);

        prop_assert_eq!(harness.native_balance(&recipient), amount);
        prop_assert_eq!(harness.native_balance(&harness.contract_id), 0);
        prop_assert!(!harness.is_queued(&call));
    }
}

// ═════════════════════════════════════════════════════════════════════════════
//  Invariant Tests
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_all_invariants_hold_on_fresh_contract() {
    let mut env = TestEnv::new();
    let harness = TimelockHarness::new(&mut env, MIN_DELAY);

    let invariants = InvariantSet::timelock_defaults();
    invariants.assert_all(&harness.snapshot(&[]));
}

#[test]
fn test_invariants_through_schedule_lifecycle() {
    let mut env = TestEnv::new();
    let harness = TimelockHarness::new(&mut env, MIN_DELAY);
    let recipient = harness.create_recipient();
    harness.fund(10_000);

    let call = harness.transfer_call(&recipient, 10_000, harness.min_eta() + 600);
    let tracked = std::vec![call.clone()];
    let invariants = InvariantSet::timelock_defaults();

    // Fresh state.
    invariants.assert_all(&harness.snapshot(&tracked));

    // Queued.
    harness.queue(&call);
    invariants.assert_all(&harness.snapshot(&tracked));

    // Cancelled and re-queued.
    harness.cancel(&call);
    invariants.assert_all(&harness.snapshot(&tracked));
    harness.queue(&call);
    invariants.assert_all(&harness.snapshot(&tracked));

    // Executed inside the window.
    harness.env.advance_time(MIN_DELAY + 600);
    harness.execute(&call);
    invariants.assert_all(&harness.snapshot(&tracked));

    assert_eq!(harness.native_balance(&recipient), 10_000);
}

#[test]
fn test_transition_invariant_queue_sets_flag() {
    let mut env = TestEnv::new();
    let harness = TimelockHarness::new(&mut env, MIN_DELAY);
    let recipient = harness.create_recipient();

    let call = harness.transfer_call(&recipient, 500, harness.min_eta());
    let tracked = std::vec![call.clone()];

    let before = harness.snapshot(&tracked);
    let id = harness.queue(&call);
    let after = harness.snapshot(&tracked);

    let inv = QueueSetsFlag { id };
    assert!(inv.check(&before, &after).is_ok());
}

#[test]
fn test_transition_invariant_execute_clears_flag() {
    let mut env = TestEnv::new();
    let harness = TimelockHarness::new(&mut env, MIN_DELAY);
    let recipient = harness.create_recipient();
    harness.fund(500);

    let call = harness.transfer_call(&recipient, 500, harness.min_eta());
    let tracked = std::vec![call.clone()];

    let id = harness.queue(&call);
    harness.env.advance_time(MIN_DELAY);

    let before = harness.snapshot(&tracked);
    harness.execute(&call);
    let after = harness.snapshot(&tracked);

    let inv = ExecuteClearsFlag { id };
    assert!(inv.check(&before, &after).is_ok());
}

// ═════════════════════════════════════════════════════════════════════════════
//  Cross-Contract Scheduling
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_scheduled_escrow_release_through_timelock() {
    let mut env = TestEnv::new();
    let escrow_token = env.deploy_token();
    let escrow_id = env.env.register(EscrowContract, ());
    let escrow_client = EscrowContractClient::new(&env.env, &escrow_id);

    let organizer = env.generate_address();
    let beneficiary = env.generate_address();
    escrow_client.initialize(&organizer, &escrow_token, &beneficiary, &2, &1_000);

    let harness = TimelockHarness::new(&mut env, MIN_DELAY);

    // Two members fill the pool while the release sits in the queue.
    for _ in 0..2 {
        let member = Address::generate(&harness.env.env);
        harness.env.mint_tokens(&escrow_token, &member, 1_000);
        escrow_client.join(&member);
    }

    let args = soroban_sdk::Vec::new(&harness.env.env);
    let call = harness.invoke_call(&escrow_id, "release", args, harness.min_eta());
    harness.queue(&call);

    harness.env.advance_time(MIN_DELAY);
    harness.execute(&call);

    assert!(escrow_client.is_released());
    assert_eq!(
        harness.env.token_balance(&escrow_token, &beneficiary),
        2_000
    );
    assert!(!harness.is_queued(&call));
}

#[test]
fn test_reverted_escrow_release_keeps_call_queued() {
    let mut env = TestEnv::new();
    let escrow_token = env.deploy_token();
    let escrow_id = env.env.register(EscrowContract, ());
    let escrow_client = EscrowContractClient::new(&env.env, &escrow_id);

    let organizer = env.generate_address();
    let beneficiary = env.generate_address();
    escrow_client.initialize(&organizer, &escrow_token, &beneficiary, &2, &1_000);

    let harness = TimelockHarness::new(&mut env, MIN_DELAY);

    let args = soroban_sdk::Vec::new(&harness.env.env);
    let call = harness.invoke_call(&escrow_id, "release", args, harness.min_eta());
    harness.queue(&call);
    harness.env.advance_time(MIN_DELAY);

    // Pool is empty, so the inner release fails and the whole execution
    // reverts with the flag intact.
    let result = harness.client.try_execute(&harness.admin, &call);
    assert_eq!(result, Err(Ok(TimelockError::ExecutionReverted)));
    assert!(harness.is_queued(&call));
    assert!(!escrow_client.is_released());

    // Members join; the same queued call now succeeds inside its window.
    for _ in 0..2 {
        let member = Address::generate(&harness.env.env);
        harness.env.mint_tokens(&escrow_token, &member, 1_000);
        escrow_client.join(&member);
    }
    harness.execute(&call);

    assert!(escrow_client.is_released());
    assert!(!harness.is_queued(&call));
}

#[test]
fn test_scheduled_vesting_release_through_timelock() {
    let mut env = TestEnv::new();
    let vesting_token = env.deploy_token();
    let vesting_id = env.env.register(VestingContract, ());
    let vesting_client = VestingContractClient::new(&env.env, &vesting_id);

    let beneficiary = env.generate_address();
    // Matures long before the timelock's own delay elapses.
    let release_at = env.timestamp() + 3_600;
    vesting_client.initialize(&vesting_token, &beneficiary, &release_at);

    let depositor = env.generate_address();
    env.mint_tokens(&vesting_token, &depositor, 7_500);
    vesting_client.deposit(&depositor, &7_500);

    let harness = TimelockHarness::new(&mut env, MIN_DELAY);

    let args = soroban_sdk::Vec::new(&harness.env.env);
    let call = harness.invoke_call(&vesting_id, "release", args, harness.min_eta());
    harness.queue(&call);

    harness.env.advance_time(MIN_DELAY);
    harness.execute(&call);

    assert_eq!(
        harness.env.token_balance(&vesting_token, &beneficiary),
        7_500
    );
    assert_eq!(vesting_client.get_locked(), 0);
}

#[test]
fn test_scheduled_self_reconfiguration() {
    let mut env = TestEnv::new();
    let harness = TimelockHarness::new(&mut env, MIN_DELAY);
    let new_delay = MIN_DELAY * 3;

    let args: soroban_sdk::Vec<soroban_sdk::Val> = (new_delay,).into_val(&harness.env.env);
    let target = harness.contract_id.clone();
    let call = harness.invoke_call(&target, "set_delay", args, harness.min_eta());

    harness.queue(&call);
    harness.env.advance_time(MIN_DELAY);
    harness.execute(&call);

    assert_eq!(harness.client.get_delay(), new_delay);

    // The next queue must respect the new, longer delay.
    let recipient = harness.create_recipient();
    let short = harness.transfer_call(
        &recipient,
        100,
        harness.env.timestamp() + MIN_DELAY,
    );
    let result = harness.client.try_queue(&harness.admin, &short);
    assert_eq!(result, Err(Ok(TimelockError::DelayNotElapsed)));
}

#[test]
fn test_scheduled_admin_handover() {
    let mut env = TestEnv::new();
    let harness = TimelockHarness::new(&mut env, MIN_DELAY);
    let successor = harness.create_recipient();

    let args: soroban_sdk::Vec<soroban_sdk::Val> =
        (successor.clone(),).into_val(&harness.env.env);
    let target = harness.contract_id.clone();
    let call = harness.invoke_call(&target, "offer_admin", args, harness.min_eta());

    harness.queue(&call);
    harness.env.advance_time(MIN_DELAY);
    harness.execute(&call);

    assert_eq!(harness.client.get_pending_admin(), Some(successor.clone()));

    let before = harness.snapshot(&[]);
    harness.client.accept_admin(&successor);
    let after = harness.snapshot(&[]);

    assert_eq!(harness.client.get_admin(), successor);
    let inv = AdminChangeRequiresOffer;
    assert!(inv.check(&before, &after).is_ok());

    // The superseded admin has lost its scheduling powers.
    let recipient = harness.create_recipient();
    let call = harness.transfer_call(&recipient, 100, harness.min_eta());
    let result = harness.client.try_queue(&harness.admin, &call);
    assert_eq!(result, Err(Ok(TimelockError::Unauthorized)));

    // The successor queues under the same policy.
    harness.client.queue(&successor, &call);
    assert!(harness.is_queued(&call));
}

#[test]
fn test_grace_window_boundary_through_harness() {
    let mut env = TestEnv::new();
    let harness = TimelockHarness::new(&mut env, MIN_DELAY);
    let recipient = harness.create_recipient();
    harness.fund(2_000);

    let eta = harness.min_eta();
    let first = harness.transfer_call(&recipient, 1_000, eta);
    let second = harness.transfer_call(&recipient, 999, eta);
    harness.queue(&first);
    harness.queue(&second);

    // Last inclusive second of the window.
    harness.env.set_timestamp(eta + GRACE_PERIOD);
    harness.execute(&first);
    assert_eq!(harness.native_balance(&recipient), 1_000);

    // One second later the window has closed.
    harness.env.advance_time(1);
    let result = harness.client.try_execute(&harness.admin, &second);
    assert_eq!(result, Err(Ok(TimelockError::Stale)));
    assert!(harness.is_queued(&second));
}
