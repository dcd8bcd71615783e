//! Core points ledger: time-ordered earn events and per-payer balances.
//!
//! Maintains the invariant: the sum of all payer balances equals the sum of
//! points remaining in the pending queue at all times. Spends consume the
//! oldest-earned points first, across all payers.

use crate::transaction::Transaction;
use chrono::{DateTime, Utc};
use std::cmp::{Ordering, Reverse};
use std::collections::binary_heap::PeekMut;
use std::collections::{BinaryHeap, HashMap};

/// An unspent (or partially spent) block of points earned by one payer
/// at one instant.
///
/// Entries are ordered by `(timestamp, seq)`, where `seq` is an insertion
/// counter that keeps same-timestamp entries in arrival order. `points` is
/// reduced in place as the block is consumed; an entry reaching zero is
/// removed from the queue in the same operation.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    /// Payer that contributed this block of points.
    pub payer: String,

    /// Points remaining in this block. Always positive while the entry
    /// is in the queue.
    pub points: i64,

    /// Instant the points were earned.
    pub timestamp: DateTime<Utc>,

    /// Insertion order, used only as an ordering tiebreak.
    seq: u64,
}

impl Ord for LedgerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.timestamp, self.seq).cmp(&(other.timestamp, other.seq))
    }
}

impl PartialOrd for LedgerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for LedgerEntry {
    fn eq(&self, other: &Self) -> bool {
        (self.timestamp, self.seq) == (other.timestamp, other.seq)
    }
}

impl Eq for LedgerEntry {}

/// The points ledger.
///
/// Owns two synchronized views of the same earn events: a min-heap of
/// unspent entries ordered by earn timestamp, and a running total per payer.
/// Every mutating operation updates both in the same step, so the
/// conservation invariant holds after every call.
///
/// # Over-spend
///
/// Spending more than the total pending points is not rejected: the queue
/// is drained in timestamp order and the unspendable remainder is returned
/// to the caller, which may log or otherwise report it. This mirrors the
/// behavior of the reference system.
#[derive(Debug)]
pub struct Ledger {
    /// Unspent earn events, earliest timestamp first.
    pending: BinaryHeap<Reverse<LedgerEntry>>,

    /// Net point total per payer. Keys are every payer that has ever
    /// earned points, including those fully spent down to zero.
    balances: HashMap<String, i64>,

    /// Monotonic counter assigned to entries on insertion.
    next_seq: u64,
}

impl Ledger {
    /// Creates a new empty ledger.
    pub fn new() -> Self {
        Ledger {
            pending: BinaryHeap::new(),
            balances: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Records an earn event.
    ///
    /// Inserts a pending entry and increments the payer's balance in the
    /// same step. A zero-point earn registers the payer but queues no
    /// entry, so the queue never holds an empty block.
    ///
    /// Negative amounts are a caller contract violation; they must be
    /// routed to [`spend`](Self::spend) instead.
    pub fn record_earn(&mut self, payer: &str, points: i64, timestamp: DateTime<Utc>) {
        debug_assert!(points >= 0, "negative earn must be routed to spend");

        *self.balances.entry(payer.to_string()).or_insert(0) += points;

        if points > 0 {
            let seq = self.next_seq;
            self.next_seq += 1;
            self.pending.push(Reverse(LedgerEntry {
                payer: payer.to_string(),
                points,
                timestamp,
                seq,
            }));
        }

        debug_assert!(self.check_conservation());
    }

    /// Spends `amount` points, consuming the oldest-earned entries first.
    ///
    /// Each entry is either consumed fully (removed from the queue, its
    /// payer's balance reduced by its points) or partially (both the entry
    /// and the balance reduced by the remaining amount). Entry and balance
    /// are always decremented together.
    ///
    /// Returns the unspent remainder, which is zero unless the queue ran
    /// out of points.
    pub fn spend(&mut self, mut amount: i64) -> i64 {
        debug_assert!(amount >= 0, "spend amount must be non-negative");

        while amount > 0 {
            let Some(mut earliest) = self.pending.peek_mut() else {
                break;
            };
            let entry = &mut earliest.0;

            if entry.points <= amount {
                amount -= entry.points;
                // Safety: every queued entry's payer has a balances key,
                // created when the entry was recorded
                *self
                    .balances
                    .get_mut(&entry.payer)
                    .expect("payer exists for queued entry") -= entry.points;
                PeekMut::pop(earliest);
            } else {
                entry.points -= amount;
                // Safety: same as above
                *self
                    .balances
                    .get_mut(&entry.payer)
                    .expect("payer exists for queued entry") -= amount;
                amount = 0;
            }
        }

        debug_assert!(self.check_conservation());
        amount
    }

    /// Applies one transaction: non-negative points are an earn, negative
    /// points a spend request for the absolute amount.
    ///
    /// Returns the unspent remainder of a spend request (zero for earns).
    pub fn apply(&mut self, tx: &Transaction) -> i64 {
        if tx.points >= 0 {
            self.record_earn(&tx.payer, tx.points, tx.timestamp);
            0
        } else {
            self.spend(-tx.points)
        }
    }

    /// Loads a sequence of transactions in delivery order.
    ///
    /// A spend request only consumes entries ingested before it, so the
    /// position of a transaction in the sequence matters even though the
    /// queue itself is ordered by timestamp.
    ///
    /// Returns the total unspent remainder across all spend requests.
    pub fn load<'a, I>(&mut self, transactions: I) -> i64
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions.into_iter().map(|tx| self.apply(tx)).sum()
    }

    /// Returns the current per-payer balances.
    pub fn balances(&self) -> &HashMap<String, i64> {
        &self.balances
    }

    /// Returns the total points remaining in the queue.
    pub fn total_pending(&self) -> i64 {
        self.pending.iter().map(|Reverse(e)| e.points).sum()
    }

    /// Returns the pending entries in timestamp order, for diagnostics.
    pub fn pending_entries(&self) -> Vec<&LedgerEntry> {
        let mut entries: Vec<&LedgerEntry> = self.pending.iter().map(|Reverse(e)| e).collect();
        entries.sort();
        entries
    }

    /// Verifies the conservation invariant: balances sum to pending points.
    fn check_conservation(&self) -> bool {
        self.balances.values().sum::<i64>() == self.total_pending()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
