//! Transaction record types as served by the mobile-money API

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the SMS message a transaction was extracted from.
///
/// The API serializes it as a JSON number or a string depending on the
/// export batch, so both shapes deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageId {
    Number(i64),
    Text(String),
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Number(n) => write!(f, "{n}"),
            MessageId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for MessageId {
    fn from(n: i64) -> Self {
        MessageId::Number(n)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        MessageId::Text(s.to_string())
    }
}

/// One mobile-money transaction as returned by `GET /api/transactions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique message identifier
    pub message_id: MessageId,
    /// Timestamp string, kept verbatim; may not parse as a date
    pub timestamp: String,
    /// Originating address of the SMS (short code or phone number)
    #[serde(default)]
    pub sender: Option<String>,
    /// Counterparty name or phone number, when the message carried one
    #[serde(default)]
    pub recipient: Option<String>,
    /// Amount in RWF; absent when no amount could be extracted
    #[serde(default)]
    pub amount: Option<f64>,
    /// Transaction category (payment, incoming, bank_deposit, airtime, ...)
    pub transaction_type: String,
    /// Provider transaction id (TxId / Financial Transaction Id)
    #[serde(default)]
    pub reference: Option<String>,
    /// Running account balance after the transaction, in RWF
    #[serde(default)]
    pub balance: Option<f64>,
    /// "success" or "failed"
    pub status: String,
}

impl Transaction {
    /// Parse the record's timestamp, if it is parsable at all
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }

    /// Amount with absent treated as zero, for aggregation
    pub fn amount_or_zero(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }

    /// Returns true if the provider reported the transaction as failed
    pub fn is_failed(&self) -> bool {
        self.status.eq_ignore_ascii_case("failed")
    }
}

/// Parse the timestamp formats the API is known to emit: the SQLite-backed
/// `%Y-%m-%d %H:%M:%S`, RFC 3339, or a bare `%Y-%m-%d` date. Anything else
/// is an invalid date and yields `None`.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    None
}

/// The three transaction types shown in the payment distribution panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentCategory {
    Payment,
    Incoming,
    BankDeposit,
}

impl PaymentCategory {
    /// Fixed panel order, regardless of which types the data contains
    pub const ALL: [PaymentCategory; 3] = [
        PaymentCategory::Payment,
        PaymentCategory::Incoming,
        PaymentCategory::BankDeposit,
    ];

    /// The `transaction_type` value this category matches
    pub fn type_name(&self) -> &'static str {
        match self {
            PaymentCategory::Payment => "payment",
            PaymentCategory::Incoming => "incoming",
            PaymentCategory::BankDeposit => "bank_deposit",
        }
    }

    /// Human-readable panel label
    pub fn label(&self) -> &'static str {
        match self {
            PaymentCategory::Payment => "Payments",
            PaymentCategory::Incoming => "Incoming",
            PaymentCategory::BankDeposit => "Bank Deposits",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_numeric_message_id() {
        let json = r#"{
            "message_id": 1715351458724,
            "timestamp": "2024-01-15 08:30:00",
            "sender": "M-Money",
            "recipient": "Jane Smith",
            "amount": 2000,
            "transaction_type": "payment",
            "reference": "73214484437",
            "balance": 25000,
            "status": "success"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.message_id, MessageId::Number(1715351458724));
        assert_eq!(tx.amount, Some(2000.0));
        assert!(!tx.is_failed());
    }

    #[test]
    fn test_deserialize_with_string_id_and_missing_optionals() {
        let json = r#"{
            "message_id": "sms-42",
            "timestamp": "not a date",
            "transaction_type": "airtime",
            "status": "failed"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.message_id.to_string(), "sms-42");
        assert_eq!(tx.amount, None);
        assert_eq!(tx.amount_or_zero(), 0.0);
        assert!(tx.parsed_timestamp().is_none());
        assert!(tx.is_failed());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-01-15 08:30:00").is_some());
        assert!(parse_timestamp("2024-01-15T08:30:00+02:00").is_some());
        assert!(parse_timestamp("2024-01-15").is_some());
        assert!(parse_timestamp("invalid").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("15/01/2024").is_none());
    }

    #[test]
    fn test_payment_category_order_is_fixed() {
        let names: Vec<&str> = PaymentCategory::ALL.iter().map(|c| c.type_name()).collect();
        assert_eq!(names, vec!["payment", "incoming", "bank_deposit"]);
    }
}
