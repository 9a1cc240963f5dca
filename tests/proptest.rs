// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Property-based tests for the coupon ledger.
//!
//! These tests verify invariants that should hold for any sequence of
//! earn/spend operations.

use coupon_ledger_rs::{Ledger, LedgerError, Storage};
use proptest::prelude::*;
use tempfile::TempDir;

const CUSTOMERS: [&str; 4] = ["Alice", "Bob", "Carol", "김철수"];

// =============================================================================
// Arbitrary Strategies
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Earn(&'static str, u64),
    Spend(&'static str, u64),
}

fn arb_op() -> impl Strategy<Value = Op> {
    (
        prop::sample::select(&CUSTOMERS[..]),
        1u64..=20,
        prop::bool::ANY,
    )
        .prop_map(|(customer, amount, earning)| {
            if earning {
                Op::Earn(customer, amount)
            } else {
                Op::Spend(customer, amount)
            }
        })
}

fn apply(ledger: &mut Ledger, ops: &[Op]) {
    for op in ops {
        match op {
            Op::Earn(customer, amount) => {
                ledger.earn(customer, *amount).unwrap();
            }
            Op::Spend(customer, amount) => {
                // Rejection is a legal outcome; anything else must succeed.
                match ledger.spend(customer, *amount) {
                    Ok(_) | Err(LedgerError::InsufficientBalance { .. }) => {}
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }
        }
    }
}

// =============================================================================
// Ledger Invariant Tests
// =============================================================================

proptest! {
    // Each operation hits the disk, so keep the case count moderate.
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Spends never drive a balance below zero, and a rejected spend leaves
    /// balance and log length unchanged.
    #[test]
    fn balances_never_go_negative(ops in prop::collection::vec(arb_op(), 1..40)) {
        let dir = TempDir::new().unwrap();
        let mut ledger = Ledger::open(Storage::new(dir.path())).unwrap();

        let mut expected_len = 0usize;
        for op in &ops {
            match op {
                Op::Earn(customer, amount) => {
                    ledger.earn(customer, *amount).unwrap();
                    expected_len += 1;
                }
                Op::Spend(customer, amount) => {
                    let before = ledger.balance(customer);
                    match ledger.spend(customer, *amount) {
                        Ok(after) => {
                            prop_assert!(before >= *amount);
                            prop_assert_eq!(after, before - *amount);
                            expected_len += 1;
                        }
                        Err(LedgerError::InsufficientBalance { balance, requested }) => {
                            prop_assert!(before < *amount);
                            prop_assert_eq!(balance, before);
                            prop_assert_eq!(requested, *amount);
                            prop_assert_eq!(ledger.balance(customer), before);
                        }
                        Err(e) => prop_assert!(false, "unexpected error: {e}"),
                    }
                }
            }
            // Append-only: the log grows exactly on success, never shrinks.
            prop_assert_eq!(ledger.history().len(), expected_len);
        }
    }

    /// Every balance equals total earned minus total spent for that customer.
    #[test]
    fn balances_conserve_history_sums(ops in prop::collection::vec(arb_op(), 1..40)) {
        let dir = TempDir::new().unwrap();
        let mut ledger = Ledger::open(Storage::new(dir.path())).unwrap();
        apply(&mut ledger, &ops);

        for customer in CUSTOMERS {
            let earned: u64 = ledger
                .history()
                .iter()
                .filter(|r| r.customer == customer)
                .map(|r| r.earned)
                .sum();
            let spent: u64 = ledger
                .history()
                .iter()
                .filter(|r| r.customer == customer)
                .map(|r| r.spent)
                .sum();
            prop_assert_eq!(ledger.balance(customer), earned - spent);
        }
    }

    /// The ranking is sorted by balance descending with name-ascending ties,
    /// identically across calls.
    #[test]
    fn ranking_is_sorted_and_deterministic(ops in prop::collection::vec(arb_op(), 1..40)) {
        let dir = TempDir::new().unwrap();
        let mut ledger = Ledger::open(Storage::new(dir.path())).unwrap();
        apply(&mut ledger, &ops);

        let ranking = ledger.ranked_balances();
        for pair in ranking.windows(2) {
            prop_assert!(
                pair[0].balance > pair[1].balance
                    || (pair[0].balance == pair[1].balance
                        && pair[0].customer < pair[1].customer),
                "ranking out of order: {:?} before {:?}",
                pair[0],
                pair[1]
            );
        }
        prop_assert_eq!(ledger.ranked_balances(), ranking);
    }

    /// Reopening the data directory reproduces the exact same state.
    #[test]
    fn reload_reproduces_state(ops in prop::collection::vec(arb_op(), 1..40)) {
        let dir = TempDir::new().unwrap();
        let mut ledger = Ledger::open(Storage::new(dir.path())).unwrap();
        apply(&mut ledger, &ops);

        let reloaded = Ledger::open(Storage::new(dir.path())).unwrap();
        prop_assert_eq!(reloaded.history(), ledger.history());
        prop_assert_eq!(reloaded.ranked_balances(), ledger.ranked_balances());
    }
}
