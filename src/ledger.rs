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

//! The coupon ledger store.
//!
//! [`Ledger`] owns the customer balance map and the append-only transaction
//! history, and mirrors both to disk through [`Storage`] after every
//! successful mutation. It is an explicit value owned by the caller; there is
//! no process-wide singleton.
//!
//! # Invariants
//!
//! - Balances never go negative: a spend that exceeds the held balance is
//!   rejected before any mutation, append, or save.
//! - The history is append-only; a rejected operation appends nothing.
//! - For every customer, the balance equals the sum of their earned amounts
//!   minus the sum of their spent amounts.

use crate::error::LedgerError;
use crate::record::TransactionRecord;
use crate::storage::Storage;
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// One row of the ranking view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedBalance {
    pub customer: String,
    pub balance: u64,
}

/// One row of the history view.
///
/// Field order matches the export column order: date, customer, delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub customer: String,
    pub delta: String,
}

/// Coupon ledger: balance map plus transaction history, persisted on every
/// mutation.
#[derive(Debug)]
pub struct Ledger {
    /// Balances keyed by customer name (case-sensitive).
    balances: BTreeMap<String, u64>,
    /// Append-only history in insertion order.
    history: Vec<TransactionRecord>,
    storage: Storage,
}

impl Ledger {
    /// Loads the ledger from disk.
    ///
    /// Missing files initialize empty state (first run). Present but
    /// malformed files fail with [`LedgerError::CorruptState`]; the caller
    /// must treat that as fatal rather than continue on an empty ledger.
    pub fn open(storage: Storage) -> Result<Self, LedgerError> {
        let balances = storage.load_balances()?;
        let history = storage.load_history()?;
        info!(
            customers = balances.len(),
            records = history.len(),
            "ledger loaded"
        );
        Ok(Self {
            balances,
            history,
            storage,
        })
    }

    /// Credits `amount` coupons to `customer`, stamped with the current
    /// local time. Returns the new balance.
    pub fn earn(&mut self, customer: &str, amount: u64) -> Result<u64, LedgerError> {
        self.earn_at(customer, amount, Local::now().naive_local())
    }

    /// Debits `amount` coupons from `customer`, stamped with the current
    /// local time. Returns the new balance.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InsufficientBalance`] if the customer holds fewer than
    /// `amount` coupons; nothing is mutated, appended, or saved.
    pub fn spend(&mut self, customer: &str, amount: u64) -> Result<u64, LedgerError> {
        self.spend_at(customer, amount, Local::now().naive_local())
    }

    /// [`earn`](Self::earn) with an explicit timestamp, for replays and
    /// tests.
    pub fn earn_at(
        &mut self,
        customer: &str,
        amount: u64,
        timestamp: NaiveDateTime,
    ) -> Result<u64, LedgerError> {
        validate(customer, amount)?;

        let balance = self.balances.entry(customer.to_string()).or_insert(0);
        *balance += amount;
        let new_balance = *balance;

        self.commit(TransactionRecord::earn(customer, amount, timestamp))?;
        info!(customer, amount, balance = new_balance, "coupons earned");
        Ok(new_balance)
    }

    /// [`spend`](Self::spend) with an explicit timestamp, for replays and
    /// tests.
    pub fn spend_at(
        &mut self,
        customer: &str,
        amount: u64,
        timestamp: NaiveDateTime,
    ) -> Result<u64, LedgerError> {
        validate(customer, amount)?;

        let balance = self.balance(customer);
        if balance < amount {
            warn!(customer, balance, requested = amount, "spend rejected");
            return Err(LedgerError::InsufficientBalance {
                balance,
                requested: amount,
            });
        }

        let new_balance = balance - amount;
        self.balances.insert(customer.to_string(), new_balance);

        self.commit(TransactionRecord::spend(customer, amount, timestamp))?;
        info!(customer, amount, balance = new_balance, "coupons spent");
        Ok(new_balance)
    }

    /// Current balance for `customer`, 0 if unknown.
    pub fn balance(&self, customer: &str) -> u64 {
        self.balances.get(customer).copied().unwrap_or(0)
    }

    /// Sum of all held coupons across customers.
    pub fn total_coupons(&self) -> u64 {
        self.balances.values().sum()
    }

    /// Number of known customers, including those back at zero.
    pub fn customer_count(&self) -> usize {
        self.balances.len()
    }

    /// The raw transaction history in insertion order.
    pub fn history(&self) -> &[TransactionRecord] {
        &self.history
    }

    /// All customers sorted by balance descending.
    ///
    /// Ties break by customer name ascending: the balance map iterates in
    /// name order and the sort is stable. Zero-balance customers are
    /// included.
    pub fn ranked_balances(&self) -> Vec<RankedBalance> {
        let mut rows: Vec<RankedBalance> = self
            .balances
            .iter()
            .map(|(customer, balance)| RankedBalance {
                customer: customer.clone(),
                balance: *balance,
            })
            .collect();
        rows.sort_by(|a, b| b.balance.cmp(&a.balance));
        rows
    }

    /// Date-truncated, signed-delta view of the history, sorted by date
    /// descending.
    ///
    /// The stable sort keys on the date alone, so entries within one day
    /// keep their insertion order.
    pub fn history_view(&self) -> Vec<HistoryEntry> {
        let mut rows: Vec<HistoryEntry> = self
            .history
            .iter()
            .map(|record| HistoryEntry {
                date: record.date(),
                customer: record.customer.clone(),
                delta: record.delta_label(),
            })
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows
    }

    /// Appends the record and mirrors the full state to disk.
    fn commit(&mut self, record: TransactionRecord) -> Result<(), LedgerError> {
        self.history.push(record);
        self.assert_invariants();
        self.storage.save(&self.balances, &self.history)
    }

    fn assert_invariants(&self) {
        if let Some(last) = self.history.last() {
            debug_assert!(
                (last.earned == 0) != (last.spent == 0),
                "Invariant violated: record must have exactly one of earned/spent non-zero: {last:?}"
            );
        }
    }
}

fn validate(customer: &str, amount: u64) -> Result<(), LedgerError> {
    if customer.trim().is_empty() {
        return Err(LedgerError::EmptyCustomer);
    }
    if amount == 0 {
        return Err(LedgerError::InvalidAmount);
    }
    Ok(())
}
