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

//! Two-file JSON persistence for the ledger.
//!
//! The balance map and the transaction history live in separate JSON files
//! inside one data directory. Every save rewrites both files in full: each is
//! first staged to a `.tmp` sibling, and only once both are staged are they
//! renamed into place. A crash mid-save therefore leaves either the old pair
//! or the new pair, never a half-written file.
//!
//! A missing file loads as empty state (first run). A file that exists but
//! fails to parse is a fatal [`LedgerError::CorruptState`]; loading never
//! papers over malformed data with an empty default.

use crate::error::LedgerError;
use crate::record::TransactionRecord;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the persisted balance map.
pub const BALANCES_FILE: &str = "coupon_data.json";

/// File name of the persisted transaction history.
pub const HISTORY_FILE: &str = "coupon_history.json";

/// Locations of the two persisted ledger resources.
#[derive(Debug, Clone)]
pub struct Storage {
    balances_path: PathBuf,
    history_path: PathBuf,
}

impl Storage {
    /// Points the storage at the standard file names inside `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        Self {
            balances_path: dir.join(BALANCES_FILE),
            history_path: dir.join(HISTORY_FILE),
        }
    }

    pub fn balances_path(&self) -> &Path {
        &self.balances_path
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    /// Loads the balance map, empty if the file does not exist yet.
    pub fn load_balances(&self) -> Result<BTreeMap<String, u64>, LedgerError> {
        load_json(&self.balances_path)
    }

    /// Loads the transaction history, empty if the file does not exist yet.
    pub fn load_history(&self) -> Result<Vec<TransactionRecord>, LedgerError> {
        load_json(&self.history_path)
    }

    /// Overwrites both persisted resources with the given state.
    pub fn save(
        &self,
        balances: &BTreeMap<String, u64>,
        history: &[TransactionRecord],
    ) -> Result<(), LedgerError> {
        // Stage both files before renaming either, so a failure while
        // staging leaves the previous pair intact on disk.
        let staged_balances = stage_json(&self.balances_path, balances)?;
        let staged_history = stage_json(&self.history_path, history)?;

        commit(&staged_balances, &self.balances_path)?;
        commit(&staged_history, &self.history_path)?;

        debug!(
            customers = balances.len(),
            records = history.len(),
            "ledger persisted"
        );
        Ok(())
    }
}

fn load_json<T>(path: &Path) -> Result<T, LedgerError>
where
    T: DeserializeOwned + Default,
{
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no prior file, starting empty");
            return Ok(T::default());
        }
        Err(source) => {
            return Err(LedgerError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&raw).map_err(|source| LedgerError::CorruptState {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `value` as pretty-printed JSON to a `.tmp` sibling of `target`.
///
/// serde_json leaves non-ASCII text unescaped, so customer names survive
/// byte-for-byte.
fn stage_json<T: Serialize + ?Sized>(target: &Path, value: &T) -> Result<PathBuf, LedgerError> {
    let tmp = tmp_path(target);
    let body = serde_json::to_string_pretty(value).map_err(|source| LedgerError::Io {
        path: tmp.clone(),
        source: io::Error::other(source),
    })?;
    fs::write(&tmp, body).map_err(|source| LedgerError::Io {
        path: tmp.clone(),
        source,
    })?;
    Ok(tmp)
}

fn commit(staged: &Path, target: &Path) -> Result<(), LedgerError> {
    fs::rename(staged, target).map_err(|source| LedgerError::Io {
        path: target.to_path_buf(),
        source,
    })
}

fn tmp_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}
