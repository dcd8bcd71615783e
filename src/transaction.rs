//! Transaction models for CSV parsing and internal representation.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

/// Raw transaction record as read from CSV.
///
/// Uses string-based fields for flexibility; validation happens in
/// [`parse`](Self::parse) so a bad row can be skipped without aborting
/// the whole file.
#[derive(Debug, Deserialize)]
pub struct TransactionRecord {
    /// Payer name (non-empty)
    pub payer: String,

    /// Signed point amount: positive earns, negative spend requests
    pub points: String,

    /// ISO-8601 timestamp of the earn event
    pub timestamp: String,
}

impl TransactionRecord {
    /// Parses the raw CSV record into a typed transaction.
    ///
    /// Returns `None` if the record is invalid (empty payer, non-integer
    /// points, unparseable timestamp).
    pub fn parse(&self) -> Option<Transaction> {
        let payer = self.payer.trim();
        if payer.is_empty() {
            return None;
        }

        let points: i64 = self.points.trim().parse().ok()?;
        let timestamp = parse_timestamp(self.timestamp.trim())?;

        Some(Transaction {
            payer: payer.to_string(),
            points,
            timestamp,
        })
    }
}

/// Parses an ISO-8601 UTC instant.
///
/// Accepts full RFC 3339 (`2020-11-02T14:00:00Z`) as well as the
/// seconds-less form (`2020-01-02T10:00Z`) that appears in some
/// transaction exports.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%MZ")
        .ok()
        .map(|naive| naive.and_utc())
}

/// A parsed and validated transaction ready for the ledger.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Payer the points belong to
    pub payer: String,

    /// Signed point amount; negative values are spend requests of the
    /// absolute amount against no specific payer
    pub points: i64,

    /// Instant the points were earned
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_earn() {
        let record = TransactionRecord {
            payer: "DANNON".to_string(),
            points: "300".to_string(),
            timestamp: "2020-10-31T10:00:00Z".to_string(),
        };

        let tx = record.parse().unwrap();
        assert_eq!(tx.payer, "DANNON");
        assert_eq!(tx.points, 300);
        assert_eq!(
            tx.timestamp,
            Utc.with_ymd_and_hms(2020, 10, 31, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_spend_request() {
        let record = TransactionRecord {
            payer: "DANNON".to_string(),
            points: "-200".to_string(),
            timestamp: "2020-10-31T15:00:00Z".to_string(),
        };

        let tx = record.parse().unwrap();
        assert_eq!(tx.points, -200);
    }

    #[test]
    fn test_parse_timestamp_without_seconds() {
        let record = TransactionRecord {
            payer: "UNILEVER".to_string(),
            points: "200".to_string(),
            timestamp: "2020-01-02T10:00Z".to_string(),
        };

        let tx = record.parse().unwrap();
        assert_eq!(
            tx.timestamp,
            Utc.with_ymd_and_hms(2020, 1, 2, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_timestamp_with_offset_converts_to_utc() {
        let record = TransactionRecord {
            payer: "DANNON".to_string(),
            points: "100".to_string(),
            timestamp: "2020-01-02T10:00:00+02:00".to_string(),
        };

        let tx = record.parse().unwrap();
        assert_eq!(
            tx.timestamp,
            Utc.with_ymd_and_hms(2020, 1, 2, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_handles_whitespace() {
        let record = TransactionRecord {
            payer: "  DANNON  ".to_string(),
            points: "  300  ".to_string(),
            timestamp: "  2020-10-31T10:00:00Z  ".to_string(),
        };

        let tx = record.parse().unwrap();
        assert_eq!(tx.payer, "DANNON");
        assert_eq!(tx.points, 300);
    }

    #[test]
    fn test_parse_rejects_empty_payer() {
        let record = TransactionRecord {
            payer: "   ".to_string(),
            points: "300".to_string(),
            timestamp: "2020-10-31T10:00:00Z".to_string(),
        };

        assert!(record.parse().is_none());
    }

    #[test]
    fn test_parse_rejects_non_integer_points() {
        let record = TransactionRecord {
            payer: "DANNON".to_string(),
            points: "12.5".to_string(),
            timestamp: "2020-10-31T10:00:00Z".to_string(),
        };

        assert!(record.parse().is_none());
    }

    #[test]
    fn test_parse_rejects_bad_timestamp() {
        let record = TransactionRecord {
            payer: "DANNON".to_string(),
            points: "300".to_string(),
            timestamp: "yesterday".to_string(),
        };

        assert!(record.parse().is_none());
    }
}
