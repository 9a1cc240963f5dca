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

//! Error types for ledger operations, persistence, and export.

use std::path::PathBuf;
use thiserror::Error;

/// Ledger operation and persistence errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Customer name is empty (or whitespace only)
    #[error("customer name must not be empty")]
    EmptyCustomer,

    /// Amount is zero
    #[error("amount must be at least 1")]
    InvalidAmount,

    /// Spend would drive the balance below zero
    #[error("insufficient balance: {balance} held, {requested} requested")]
    InsufficientBalance { balance: u64, requested: u64 },

    /// A persisted resource exists but cannot be parsed.
    ///
    /// Fatal at startup: loading never falls back to an empty state when a
    /// file is present but malformed, since that would discard user data.
    #[error("corrupt ledger file {}: {source}", .path.display())]
    CorruptState {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing a persisted resource failed.
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Export target is held open by another process.
    ///
    /// Recoverable: the in-memory ledger is untouched and the export can be
    /// retried once the other writer releases the file.
    #[error("export target {} is locked by another process", .path.display())]
    ExportLocked { path: PathBuf },
}
