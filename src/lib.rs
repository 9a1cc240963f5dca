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

//! # Coupon Ledger
//!
//! This library provides a small persisted ledger for per-customer coupon
//! balances: customers earn and spend coupons, every completed operation is
//! appended to a transaction history, and both the balance map and the
//! history are mirrored to JSON files after each mutation.
//!
//! ## Core Components
//!
//! - [`Ledger`]: The store owning the balance map and the append-only history
//! - [`Storage`]: Two-file JSON persistence with staged atomic writes
//! - [`TransactionRecord`]: One immutable earn or spend entry
//! - [`LedgerError`]: Error types for validation, business-rule, and I/O failures
//! - [`export_history`]: CSV spreadsheet export of the history view
//!
//! ## Example
//!
//! ```no_run
//! use coupon_ledger_rs::{Ledger, Storage};
//!
//! # fn main() -> Result<(), coupon_ledger_rs::LedgerError> {
//! let mut ledger = Ledger::open(Storage::new("data"))?;
//!
//! // Credit five coupons, then redeem two.
//! let balance = ledger.earn("Alice", 5)?;
//! assert_eq!(balance, 5);
//! let balance = ledger.spend("Alice", 2)?;
//! assert_eq!(balance, 3);
//!
//! // Views for the ranking and history tables.
//! let ranking = ledger.ranked_balances();
//! assert_eq!(ranking[0].customer, "Alice");
//! let history = ledger.history_view();
//! assert_eq!(history.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! The ledger is single-threaded by design: one interaction at a time, each
//! run to completion. Nothing coordinates concurrent processes pointed at the
//! same data directory.

pub mod error;
mod export;
mod ledger;
pub mod record;
mod storage;

pub use error::LedgerError;
pub use export::{EXPORT_FILE, ExportOutcome, export_history};
pub use ledger::{HistoryEntry, Ledger, RankedBalance};
pub use record::TransactionRecord;
pub use storage::{BALANCES_FILE, HISTORY_FILE, Storage};
