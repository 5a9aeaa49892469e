//! momo-core: record model, aggregations, and filter criteria for the momo
//! transaction dashboard

pub mod aggregate;
pub mod filter;
pub mod record;

pub use aggregate::{count_by_type, sum_by_month, sum_by_payment_category};
pub use filter::FilterCriteria;
pub use record::{MessageId, PaymentCategory, Transaction, parse_timestamp};
