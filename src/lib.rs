//! # Points Ledger
//!
//! A streaming transaction processor that tracks loyalty points earned
//! from multiple payers and spends them oldest-earned-first across all
//! payers, never letting a payer's balance go negative under well-formed
//! input.
//!
//! ## Design Principles
//!
//! - **Single owned aggregate**: the earn queue and the per-payer totals
//!   live inside one [`Ledger`] type; every mutation updates both in the
//!   same step
//! - **Streaming processing**: memory-efficient CSV ingestion
//! - **Strict invariants**: balances always sum to the points remaining
//!   in the queue
//! - **Deterministic output**: balances sorted by payer name
//!
//! ## Example
//!
//! ```no_run
//! use points_ledger::PointsEngine;
//! use std::io::Cursor;
//!
//! let csv = "payer,points,timestamp\nDANNON,300,2020-10-31T10:00:00Z\n";
//! let mut engine = PointsEngine::new();
//! engine.process_csv(Cursor::new(csv)).unwrap();
//! engine.spend(100);
//! engine.write_output(std::io::stdout()).unwrap();
//! ```

pub mod engine;
pub mod error;
pub mod ledger;
pub mod transaction;

pub use engine::PointsEngine;
pub use error::{EngineError, Result};
pub use ledger::{Ledger, LedgerEntry};
pub use transaction::{Transaction, TransactionRecord};
