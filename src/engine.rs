//! Ingestion and reporting around the points ledger.
//!
//! Streams transaction records from CSV into the ledger and writes final
//! payer balances back out. Spend requests take effect immediately against
//! the earns ingested so far, so input delivery order matters even though
//! the ledger consumes entries by earn timestamp.

use crate::error::Result;
use crate::ledger::{Ledger, LedgerEntry};
use crate::transaction::TransactionRecord;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::collections::HashMap;
use std::io::{Read, Write};

/// The points processing engine.
///
/// Wraps a [`Ledger`] with CSV input and output. Processes transactions
/// in the order they are received.
///
/// # Output Ordering
///
/// Final balances are output sorted by payer name in ascending order
/// to ensure deterministic, reproducible output.
#[derive(Debug)]
pub struct PointsEngine {
    ledger: Ledger,
}

impl PointsEngine {
    /// Creates a new engine with an empty ledger.
    pub fn new() -> Self {
        PointsEngine {
            ledger: Ledger::new(),
        }
    }

    /// Processes transactions from a CSV reader in streaming fashion.
    ///
    /// Records are read one at a time to minimize memory usage.
    /// Invalid records are logged at warn level and skipped; they never
    /// reach the ledger.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<TransactionRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => {
                    if let Some(tx) = record.parse() {
                        if tx.points >= 0 {
                            debug!(
                                "Row {}: Earned {} points from {} at {}",
                                row_num, tx.points, tx.payer, tx.timestamp
                            );
                        } else {
                            debug!("Row {}: Spending {} points", row_num, -tx.points);
                        }
                        let remainder = self.ledger.apply(&tx);
                        if remainder > 0 {
                            warn!(
                                "Row {}: Spend request exceeded available points by {}; \
                                 remainder dropped",
                                row_num, remainder
                            );
                        }
                    } else {
                        warn!("Row {}: Failed to parse transaction record", row_num);
                    }
                }
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                }
            }
        }

        Ok(())
    }

    /// Spends points against the ingested earns, oldest first.
    ///
    /// Used for the optional spend amount supplied at program start.
    /// An amount exceeding the available points drains the ledger and
    /// logs the dropped remainder.
    pub fn spend(&mut self, amount: i64) {
        let remainder = self.ledger.spend(amount);
        if remainder > 0 {
            warn!(
                "Spend of {} exceeded available points by {}; remainder dropped",
                amount, remainder
            );
        }
    }

    /// Returns the current per-payer balances.
    pub fn balances(&self) -> &HashMap<String, i64> {
        self.ledger.balances()
    }

    /// Returns the unspent entries in timestamp order, for diagnostics.
    pub fn pending_entries(&self) -> Vec<&LedgerEntry> {
        self.ledger.pending_entries()
    }

    /// Writes final payer balances to CSV.
    ///
    /// Output is sorted by payer name in ascending order for deterministic
    /// results.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["payer", "points"])?;

        // Sort by payer name for deterministic output
        let mut balances: Vec<_> = self.ledger.balances().iter().collect();
        balances.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (payer, points) in balances {
            csv_writer.write_record([payer.to_string(), points.to_string()])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Writes the unspent entries to CSV in timestamp order.
    ///
    /// A diagnostics dump of the queue the spend-down algorithm consumes.
    pub fn write_pending<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["payer", "points", "timestamp"])?;

        for entry in self.ledger.pending_entries() {
            csv_writer.write_record([
                entry.payer.clone(),
                entry.points.to_string(),
                entry.timestamp.to_rfc3339(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

impl Default for PointsEngine {
    fn default() -> Self {
        Self::new()
    }
}
