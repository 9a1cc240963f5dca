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

//! Transaction records.
//!
//! Each completed earn or spend appends exactly one [`TransactionRecord`] to
//! the ledger history. Records are immutable once appended and exactly one of
//! `earned`/`spent` is non-zero; the other field is always serialized as an
//! explicit `0`, never omitted.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Wire format for record timestamps, e.g. `2026-08-23 14:05:09`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One entry in the append-only transaction history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub customer: String,
    pub earned: u64,
    pub spent: u64,
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
}

impl TransactionRecord {
    /// Builds a credit record (`earned` set, `spent` zero).
    pub fn earn(customer: impl Into<String>, amount: u64, timestamp: NaiveDateTime) -> Self {
        Self {
            customer: customer.into(),
            earned: amount,
            spent: 0,
            timestamp,
        }
    }

    /// Builds a debit record (`spent` set, `earned` zero).
    pub fn spend(customer: impl Into<String>, amount: u64, timestamp: NaiveDateTime) -> Self {
        Self {
            customer: customer.into(),
            earned: 0,
            spent: amount,
            timestamp,
        }
    }

    /// Timestamp truncated to its calendar date.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Signed delta for display: `+N` for earns, `-N` for spends.
    pub fn delta_label(&self) -> String {
        if self.earned > 0 {
            format!("+{}", self.earned)
        } else {
            format!("-{}", self.spent)
        }
    }
}

/// Serde adapter pinning the persisted timestamp to [`TIMESTAMP_FORMAT`].
mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(timestamp: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&timestamp.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(de::Error::custom)
    }
}
