//! Filter criteria for the transactions query

use serde::Serialize;

/// Filter set submitted with `GET /api/transactions`.
///
/// Absent fields are omitted from the query string entirely; the API treats
/// a missing parameter as "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterCriteria {
    pub transaction_type: Option<String>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub amount_min: Option<i64>,
    pub amount_max: Option<i64>,
}

impl FilterCriteria {
    /// Build criteria from the raw filter-form fields.
    ///
    /// Empty or whitespace-only fields are absent. Amount fields that do
    /// not parse as non-negative integers are absent too, never an error —
    /// the server only accepts whole RWF amounts.
    pub fn from_input(
        transaction_type: &str,
        date_start: &str,
        date_end: &str,
        amount_min: &str,
        amount_max: &str,
    ) -> Self {
        Self {
            transaction_type: non_empty(transaction_type),
            date_start: non_empty(date_start),
            date_end: non_empty(date_end),
            amount_min: parse_amount(amount_min),
            amount_max: parse_amount(amount_max),
        }
    }

    /// True when no filter field is supplied
    pub fn is_empty(&self) -> bool {
        self.transaction_type.is_none()
            && self.date_start.is_none()
            && self.date_end.is_none()
            && self.amount_min.is_none()
            && self.amount_max.is_none()
    }

    /// Query pairs for the request, containing only supplied fields
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(ty) = &self.transaction_type {
            query.push(("type", ty.clone()));
        }
        if let Some(start) = &self.date_start {
            query.push(("date_start", start.clone()));
        }
        if let Some(end) = &self.date_end {
            query.push(("date_end", end.clone()));
        }
        if let Some(min) = self.amount_min {
            query.push(("amount_min", min.to_string()));
        }
        if let Some(max) = self.amount_max {
            query.push(("amount_max", max.to_string()));
        }
        query
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}

fn parse_amount(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|n| *n >= 0)
}
