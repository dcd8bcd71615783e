//! Points Ledger CLI
//!
//! A streaming loyalty-point processor that reads CSV transactions and
//! outputs final payer balances.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- transactions.csv > balances.csv
//! cargo run -- transactions.csv 5000 > balances.csv
//! ```
//!
//! The optional second argument spends that many points after ingestion,
//! oldest earns first, before balances are reported.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//!   (`debug` also dumps the unspent entries remaining after processing)

use log::debug;
use points_ledger::{EngineError, PointsEngine, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(EngineError::MissingArgument);
    }

    let spend_amount = match args.get(2) {
        Some(raw) => Some(
            raw.parse::<i64>()
                .ok()
                .filter(|amount| *amount >= 0)
                .ok_or_else(|| EngineError::InvalidSpendAmount(raw.clone()))?,
        ),
        None => None,
    };

    let input_path = &args[1];
    let file = File::open(input_path)?;
    let reader = BufReader::new(file);

    let mut engine = PointsEngine::new();
    engine.process_csv(reader)?;

    if let Some(amount) = spend_amount {
        engine.spend(amount);
    }

    for entry in engine.pending_entries() {
        debug!(
            "Unspent: {} points from {} earned at {}",
            entry.points, entry.payer, entry.timestamp
        );
    }

    let stdout = io::stdout();
    let handle = stdout.lock();
    engine.write_output(handle)?;

    Ok(())
}
