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

use clap::Parser;
use coupon_ledger_rs::{
    EXPORT_FILE, ExportOutcome, Ledger, LedgerError, Storage, export_history,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

/// Coupon Ledger - interactive coupon balance tracker
///
/// Records per-customer coupon earns and spends. Balances and the full
/// transaction history are persisted as JSON in the data directory; the
/// history can be exported as a CSV spreadsheet.
#[derive(Parser, Debug)]
#[command(name = "coupon-ledger-rs")]
#[command(about = "An interactive coupon balance and history ledger", long_about = None)]
struct Args {
    /// Directory holding coupon_data.json and coupon_history.json
    #[arg(long, value_name = "DIR", default_value = ".")]
    data_dir: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let export_path = args.data_dir.join(EXPORT_FILE);

    // Malformed files are fatal here: continuing on an empty ledger would
    // overwrite the user's data on the next save.
    let mut ledger = match Ledger::open(Storage::new(&args.data_dir)) {
        Ok(ledger) => ledger,
        Err(e) => {
            eprintln!("Error loading ledger: {e}");
            process::exit(1);
        }
    };

    println!("Coupon ledger ready. Type 'help' for commands.");

    let stdin = io::stdin();
    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                process::exit(1);
            }
        }

        if !dispatch(&mut ledger, line.trim(), &export_path) {
            break;
        }
    }
}

/// Runs one command line. Returns `false` when the session should end.
fn dispatch(ledger: &mut Ledger, line: &str, export_path: &Path) -> bool {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.split_first() {
        None => {}
        Some((&"earn", rest)) => handle_mutation(ledger, rest, true),
        Some((&"spend", rest)) => handle_mutation(ledger, rest, false),
        Some((&"ranking", _)) => print_ranking(ledger),
        Some((&"history", _)) => print_history(ledger),
        Some((&"export", _)) => handle_export(ledger, export_path),
        Some((&"help", _)) => print_help(),
        Some((&"quit", _)) | Some((&"exit", _)) => return false,
        Some((other, _)) => println!("Unknown command '{other}'. Type 'help' for commands."),
    }
    true
}

fn handle_mutation(ledger: &mut Ledger, rest: &[&str], earning: bool) {
    let usage = if earning {
        "Usage: earn NAME AMOUNT"
    } else {
        "Usage: spend NAME AMOUNT"
    };
    let Some((amount_raw, name_parts)) = rest.split_last() else {
        println!("{usage}");
        return;
    };
    // Everything before the trailing amount is the customer name, so names
    // with spaces work without quoting.
    let name = name_parts.join(" ");
    if name.is_empty() {
        println!("Please enter a customer name.");
        return;
    }
    let Ok(amount) = amount_raw.parse::<u64>() else {
        println!("Amount must be a whole number of at least 1.");
        return;
    };

    let result = if earning {
        ledger.earn(&name, amount)
    } else {
        ledger.spend(&name, amount)
    };

    match result {
        Ok(balance) if earning => {
            println!("Credited {amount} coupon(s) to {name}. (total: {balance})");
        }
        Ok(balance) => {
            println!("{name} spent {amount} coupon(s). (remaining: {balance})");
        }
        Err(LedgerError::EmptyCustomer) => println!("Please enter a customer name."),
        Err(LedgerError::InvalidAmount) => {
            println!("Amount must be a whole number of at least 1.");
        }
        Err(e) => println!("Error: {e}"),
    }
}

fn print_ranking(ledger: &Ledger) {
    if ledger.customer_count() == 0 {
        println!("No customers registered.");
        return;
    }
    if ledger.total_coupons() == 0 {
        println!("No customer currently holds coupons.");
        return;
    }

    println!("{:<24} {:>8}", "customer", "balance");
    for row in ledger.ranked_balances() {
        println!("{:<24} {:>8}", row.customer, row.balance);
    }
}

fn print_history(ledger: &Ledger) {
    let view = ledger.history_view();
    if view.is_empty() {
        println!("No earn/spend records yet.");
        return;
    }

    println!("{:<12} {:<24} {:>8}", "date", "customer", "delta");
    for row in view {
        println!("{:<12} {:<24} {:>8}", row.date, row.customer, row.delta);
    }
}

fn handle_export(ledger: &Ledger, export_path: &Path) {
    match export_history(ledger, export_path) {
        Ok(ExportOutcome::Written { path, rows }) => {
            println!("Exported {rows} row(s) to {}.", path.display());
        }
        Ok(ExportOutcome::NothingToExport) => {
            println!("No earn/spend records to export.");
        }
        Err(e @ LedgerError::ExportLocked { .. }) => {
            println!("Error: {e}. Close the file and try again.");
        }
        Err(e) => println!("Error: {e}"),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  earn NAME AMOUNT    credit coupons to a customer");
    println!("  spend NAME AMOUNT   redeem coupons (fails if balance is short)");
    println!("  ranking             customers sorted by balance");
    println!("  history             all earn/spend records, newest date first");
    println!("  export              write the history to {EXPORT_FILE}");
    println!("  quit                exit");
}
