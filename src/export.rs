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

//! Spreadsheet export of the transaction history.
//!
//! Writes the same date-truncated, signed-delta view the history table shows
//! as a three-column CSV (`date,customer,delta`), newest date first, with
//! full overwrite semantics. The export reads the in-memory ledger only; a
//! failed or retried export never changes ledger state.

use crate::error::LedgerError;
use crate::ledger::Ledger;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default export file name inside the data directory.
pub const EXPORT_FILE: &str = "coupon_history.csv";

/// Result of a completed export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The file at `path` was (over)written with `rows` transaction rows.
    Written { path: PathBuf, rows: usize },
    /// The history is empty; no file was created or touched.
    NothingToExport,
}

/// Exports the ledger history to a CSV file at `path`.
///
/// # Errors
///
/// [`LedgerError::ExportLocked`] when the target is held open by another
/// process (surfaced as permission-denied on open). Recoverable: retry after
/// the other writer closes the file.
pub fn export_history(ledger: &Ledger, path: &Path) -> Result<ExportOutcome, LedgerError> {
    if ledger.history().is_empty() {
        info!("nothing to export, history is empty");
        return Ok(ExportOutcome::NothingToExport);
    }

    let file = File::create(path).map_err(|source| match source.kind() {
        io::ErrorKind::PermissionDenied => LedgerError::ExportLocked {
            path: path.to_path_buf(),
        },
        _ => LedgerError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let rows = ledger.history_view();
    let mut writer = csv::Writer::from_writer(file);
    for entry in &rows {
        writer.serialize(entry).map_err(|source| to_io_error(path, source))?;
    }
    writer.flush().map_err(|source| LedgerError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(rows = rows.len(), path = %path.display(), "history exported");
    Ok(ExportOutcome::Written {
        path: path.to_path_buf(),
        rows: rows.len(),
    })
}

fn to_io_error(path: &Path, source: csv::Error) -> LedgerError {
    LedgerError::Io {
        path: path.to_path_buf(),
        source: io::Error::other(source),
    }
}
