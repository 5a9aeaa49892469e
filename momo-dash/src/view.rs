//! View state: the current record set and the three chart slots
//!
//! Charts follow a two-state lifecycle: Uninitialized until the first
//! successful load, then Live. Refreshes overwrite the Live data in place —
//! labels and values are replaced, never appended — so each chart keeps its
//! identity across filter-driven refreshes. Only an explicit reset returns
//! a slot to Uninitialized.

use momo_core::{
    PaymentCategory, Transaction, count_by_type, sum_by_month, sum_by_payment_category,
};

/// Data backing one chart panel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Chart lifecycle: constructed once, updated in place thereafter
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ChartSlot {
    #[default]
    Uninitialized,
    Live(ChartData),
}

impl ChartSlot {
    /// Apply fresh data: the first call constructs the chart, later calls
    /// overwrite the existing arrays.
    fn apply(&mut self, labels: Vec<String>, values: Vec<f64>) {
        match self {
            ChartSlot::Uninitialized => *self = ChartSlot::Live(ChartData { labels, values }),
            ChartSlot::Live(data) => {
                data.labels.clear();
                data.labels.extend(labels);
                data.values.clear();
                data.values.extend(values);
            }
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, ChartSlot::Live(_))
    }

    pub fn data(&self) -> Option<&ChartData> {
        match self {
            ChartSlot::Live(data) => Some(data),
            ChartSlot::Uninitialized => None,
        }
    }

    /// Drop the chart instance; the next load constructs a fresh one
    pub fn reset(&mut self) {
        *self = ChartSlot::Uninitialized;
    }
}

/// Owned state behind the dashboard: the last successfully fetched records,
/// the three chart slots, and the transient notice line.
#[derive(Debug, Default)]
pub struct ViewState {
    pub records: Vec<Transaction>,
    pub volume_by_type: ChartSlot,
    pub monthly_summary: ChartSlot,
    pub payment_distribution: ChartSlot,
    /// User-visible message from the last failed fetch
    pub notice: Option<String>,
    pub loading: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once all three charts have been constructed
    pub fn initialized(&self) -> bool {
        self.volume_by_type.is_live()
            && self.monthly_summary.is_live()
            && self.payment_distribution.is_live()
    }

    /// Replace the record set wholesale and refresh all three charts
    pub fn on_data_loaded(&mut self, records: Vec<Transaction>) {
        self.records = records;
        self.notice = None;
        self.loading = false;

        let (labels, values): (Vec<String>, Vec<f64>) = count_by_type(&self.records)
            .into_iter()
            .map(|(ty, n)| (ty, n as f64))
            .unzip();
        self.volume_by_type.apply(labels, values);

        let (labels, values): (Vec<String>, Vec<f64>) =
            sum_by_month(&self.records).into_iter().unzip();
        self.monthly_summary.apply(labels, values);

        let sums = sum_by_payment_category(&self.records);
        let labels = PaymentCategory::ALL
            .iter()
            .map(|c| c.label().to_string())
            .collect();
        self.payment_distribution.apply(labels, sums.to_vec());
    }

    /// A fetch failed: surface the notice, leave records and charts alone
    pub fn on_fetch_failed(&mut self, message: impl Into<String>) {
        self.notice = Some(format!("Failed to load transactions: {}", message.into()));
        self.loading = false;
    }

    /// Drop all three chart instances so the next load rebuilds them
    pub fn reset_charts(&mut self) {
        self.volume_by_type.reset();
        self.monthly_summary.reset();
        self.payment_distribution.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use momo_core::MessageId;

    fn tx(id: i64, ty: &str, amount: Option<f64>, timestamp: &str) -> Transaction {
        Transaction {
            message_id: MessageId::Number(id),
            timestamp: timestamp.to_string(),
            sender: None,
            recipient: None,
            amount,
            transaction_type: ty.to_string(),
            reference: None,
            balance: None,
            status: "success".to_string(),
        }
    }

    #[test]
    fn test_first_load_constructs_all_charts() {
        let mut view = ViewState::new();
        assert!(!view.initialized());

        view.on_data_loaded(vec![tx(1, "payment", Some(1000.0), "2024-01-15")]);
        assert!(view.initialized());

        let volume = view.volume_by_type.data().unwrap();
        assert_eq!(volume.labels, vec!["payment"]);
        assert_eq!(volume.values, vec![1.0]);

        let distribution = view.payment_distribution.data().unwrap();
        assert_eq!(
            distribution.labels,
            vec!["Payments", "Incoming", "Bank Deposits"]
        );
        assert_eq!(distribution.values, vec![1000.0, 0.0, 0.0]);
    }

    #[test]
    fn test_refresh_overwrites_in_place_without_reconstruction() {
        let mut view = ViewState::new();
        view.on_data_loaded(vec![
            tx(1, "payment", Some(1000.0), "2024-01-15"),
            tx(2, "incoming", Some(500.0), "2024-02-10"),
        ]);
        assert!(view.initialized());

        // Second load has fewer types and months; data is replaced, never
        // appended, and the slots stay Live.
        view.on_data_loaded(vec![tx(3, "airtime", Some(200.0), "2024-03-01")]);
        assert!(view.initialized());

        let volume = view.volume_by_type.data().unwrap();
        assert_eq!(volume.labels, vec!["airtime"]);
        assert_eq!(volume.values, vec![1.0]);

        let monthly = view.monthly_summary.data().unwrap();
        assert_eq!(monthly.labels, vec!["Mar 2024"]);
        assert_eq!(monthly.values, vec![200.0]);
    }

    #[test]
    fn test_failed_fetch_leaves_previous_view_untouched() {
        let mut view = ViewState::new();
        view.on_data_loaded(vec![tx(1, "payment", Some(1000.0), "2024-01-15")]);
        let records_before = view.records.clone();
        let volume_before = view.volume_by_type.clone();

        view.on_fetch_failed("HTTP 500: db down");

        let notice = view.notice.as_deref().unwrap();
        assert!(notice.contains("500"));
        assert!(notice.contains("db down"));
        assert_eq!(view.records, records_before);
        assert_eq!(view.volume_by_type, volume_before);
    }

    #[test]
    fn test_empty_load_keeps_charts_live_with_zeroed_data() {
        let mut view = ViewState::new();
        view.on_data_loaded(vec![tx(1, "payment", Some(1000.0), "2024-01-15")]);
        view.on_data_loaded(Vec::new());

        assert!(view.initialized());
        assert!(view.records.is_empty());
        assert!(view.volume_by_type.data().unwrap().labels.is_empty());
        assert_eq!(
            view.payment_distribution.data().unwrap().values,
            vec![0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_reset_returns_charts_to_uninitialized() {
        let mut view = ViewState::new();
        view.on_data_loaded(vec![tx(1, "payment", Some(1000.0), "2024-01-15")]);
        view.reset_charts();
        assert!(!view.initialized());
        assert!(view.volume_by_type.data().is_none());

        // The next load constructs fresh charts again.
        view.on_data_loaded(vec![tx(2, "incoming", Some(700.0), "2024-04-02")]);
        assert!(view.initialized());
    }

    #[test]
    fn test_successful_load_clears_the_notice() {
        let mut view = ViewState::new();
        view.on_fetch_failed("request failed: connection refused");
        assert!(view.notice.is_some());

        view.on_data_loaded(Vec::new());
        assert!(view.notice.is_none());
    }
}
