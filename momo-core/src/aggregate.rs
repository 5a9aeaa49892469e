//! Pure aggregations over the current transaction set
//!
//! Each function is deterministic and re-entrant: the same input slice
//! always produces the same output, with no dependency on prior calls.
//! Ordered results preserve first-seen order, matching the order the API
//! returned the records in.

use crate::record::{PaymentCategory, Transaction};

/// Count records per `transaction_type`, keyed in first-seen order
pub fn count_by_type(records: &[Transaction]) -> Vec<(String, u64)> {
    let mut counts: Vec<(String, u64)> = Vec::new();
    for tx in records {
        match counts.iter_mut().find(|(ty, _)| *ty == tx.transaction_type) {
            Some((_, n)) => *n += 1,
            None => counts.push((tx.transaction_type.clone(), 1)),
        }
    }
    counts
}

/// Sum amounts per month, labelled "Mon YYYY", in first-seen month order.
///
/// Records whose timestamp does not parse are skipped silently; they still
/// appear in the type counts and the table.
pub fn sum_by_month(records: &[Transaction]) -> Vec<(String, f64)> {
    let mut sums: Vec<(String, f64)> = Vec::new();
    for tx in records {
        let label = match tx.parsed_timestamp() {
            Some(ts) => ts.format("%b %Y").to_string(),
            None => continue,
        };
        match sums.iter_mut().find(|(month, _)| *month == label) {
            Some((_, total)) => *total += tx.amount_or_zero(),
            None => sums.push((label, tx.amount_or_zero())),
        }
    }
    sums
}

/// Sum amounts for the three fixed payment categories, in
/// [payment, incoming, bank_deposit] order.
///
/// Categories absent from the data yield 0.0; transaction types outside the
/// three are excluded from every bucket.
pub fn sum_by_payment_category(records: &[Transaction]) -> [f64; 3] {
    let mut sums = [0.0; 3];
    for tx in records {
        for (i, category) in PaymentCategory::ALL.iter().enumerate() {
            if tx.transaction_type == category.type_name() {
                sums[i] += tx.amount_or_zero();
            }
        }
    }
    sums
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MessageId;

    fn tx(id: i64, ty: &str, amount: Option<f64>, timestamp: &str) -> Transaction {
        Transaction {
            message_id: MessageId::Number(id),
            timestamp: timestamp.to_string(),
            sender: Some("M-Money".to_string()),
            recipient: None,
            amount,
            transaction_type: ty.to_string(),
            reference: None,
            balance: None,
            status: "success".to_string(),
        }
    }

    #[test]
    fn test_count_by_type_first_seen_order() {
        let records = vec![
            tx(1, "payment", Some(100.0), "2024-01-15 09:00:00"),
            tx(2, "incoming", Some(50.0), "2024-01-16 09:00:00"),
            tx(3, "payment", Some(200.0), "2024-01-17 09:00:00"),
            tx(4, "airtime", None, "2024-01-18 09:00:00"),
        ];
        let counts = count_by_type(&records);
        assert_eq!(
            counts,
            vec![
                ("payment".to_string(), 2),
                ("incoming".to_string(), 1),
                ("airtime".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_sum_by_month_skips_invalid_timestamps() {
        // The worked example from the dashboard's original data set.
        let records = vec![
            tx(1, "payment", Some(1000.0), "2024-01-15"),
            tx(2, "incoming", Some(500.0), "2024-01-20"),
            tx(3, "payment", Some(2000.0), "invalid"),
        ];

        let counts = count_by_type(&records);
        assert_eq!(
            counts,
            vec![("payment".to_string(), 2), ("incoming".to_string(), 1)]
        );

        let months = sum_by_month(&records);
        assert_eq!(months, vec![("Jan 2024".to_string(), 1500.0)]);

        let distribution = sum_by_payment_category(&records);
        assert_eq!(distribution, [3000.0, 500.0, 0.0]);
    }

    #[test]
    fn test_sum_by_month_buckets_in_first_seen_order() {
        let records = vec![
            tx(1, "payment", Some(100.0), "2024-02-10 12:00:00"),
            tx(2, "payment", Some(200.0), "2024-01-05 12:00:00"),
            tx(3, "incoming", None, "2024-02-20 12:00:00"),
        ];
        let months = sum_by_month(&records);
        // February first because it appeared first; absent amount sums as 0.
        assert_eq!(
            months,
            vec![("Feb 2024".to_string(), 100.0), ("Jan 2024".to_string(), 200.0)]
        );
    }

    #[test]
    fn test_payment_distribution_fixed_order_and_exclusions() {
        let records = vec![
            tx(1, "bank_deposit", Some(700.0), "2024-03-01 08:00:00"),
            tx(2, "airtime", Some(9999.0), "2024-03-02 08:00:00"),
            tx(3, "withdrawal", Some(400.0), "2024-03-03 08:00:00"),
        ];
        // Unrecognized types are dropped from the distribution, never
        // re-bucketed into the three categories.
        assert_eq!(sum_by_payment_category(&records), [0.0, 0.0, 700.0]);
    }

    #[test]
    fn test_empty_input_yields_empty_aggregates() {
        let records: Vec<Transaction> = Vec::new();
        assert!(count_by_type(&records).is_empty());
        assert!(sum_by_month(&records).is_empty());
        assert_eq!(sum_by_payment_category(&records), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_aggregations_are_idempotent() {
        let records = vec![
            tx(1, "payment", Some(1000.0), "2024-01-15"),
            tx(2, "transfer", Some(250.0), "2024-01-16"),
        ];
        assert_eq!(count_by_type(&records), count_by_type(&records));
        assert_eq!(sum_by_month(&records), sum_by_month(&records));
        assert_eq!(
            sum_by_payment_category(&records),
            sum_by_payment_category(&records)
        );
    }
}
