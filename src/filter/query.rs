use std::collections::BTreeSet;

use serde::Deserialize;
use time::Date;

use crate::{
    expense::ReimbursementStatus,
    filter::{FilterSpec, TimeWindow, spec::ISO_DATE_FORMAT},
};

/// Filter constraints as they arrive in a query string.
///
/// Every field is kept as text so that malformed input never rejects the
/// request. [FilterQuery::to_spec] drops whatever cannot be understood.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    /// Repeated keys and comma separated lists are both accepted.
    #[serde(default)]
    pub category_id: Vec<String>,
    #[serde(default)]
    pub payment_method_id: Vec<String>,
    #[serde(default)]
    pub min_amount: Option<String>,
    #[serde(default)]
    pub max_amount: Option<String>,
    #[serde(default)]
    pub reimbursable_only: Option<String>,
    #[serde(default)]
    pub reimbursement_status: Option<String>,
    /// A time window shorthand such as "week" or "year".
    #[serde(default)]
    pub period: Option<String>,
}

impl FilterQuery {
    /// Convert the query into a [FilterSpec], ignoring malformed values.
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec {
            start_date: parse_date(self.start_date.as_deref()),
            end_date: parse_date(self.end_date.as_deref()),
            category_ids: parse_ids(&self.category_id),
            payment_method_ids: parse_ids(&self.payment_method_id),
            min_cost: parse_cost(self.min_amount.as_deref()),
            max_cost: parse_cost(self.max_amount.as_deref()),
            reimbursable_only: parse_flag(self.reimbursable_only.as_deref()),
            reimbursement_status: self
                .reimbursement_status
                .as_deref()
                .filter(|text| !text.trim().is_empty())
                .and_then(ReimbursementStatus::parse),
        }
    }

    /// The requested time window, a month if absent or unknown.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::parse(self.period.as_deref())
    }
}

fn parse_date(text: Option<&str>) -> Option<Date> {
    let text = text?.trim();

    Date::parse(text, ISO_DATE_FORMAT)
        .inspect_err(|error| {
            if !text.is_empty() {
                tracing::debug!("Ignoring unparseable filter date {text:?}: {error}");
            }
        })
        .ok()
}

fn parse_ids(values: &[String]) -> BTreeSet<i64> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .filter_map(|id| id.trim().parse().ok())
        .collect()
}

fn parse_cost(text: Option<&str>) -> Option<f64> {
    text?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|cost| cost.is_finite())
}

fn parse_flag(text: Option<&str>) -> Option<bool> {
    match text?.trim().to_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Some(true),
        "false" | "off" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use time::macros::date;

    use crate::{
        expense::ReimbursementStatus,
        filter::{FilterSpec, TimeWindow},
    };

    use super::FilterQuery;

    #[test]
    fn parses_valid_query() {
        let query: FilterQuery = serde_html_form::from_str(
            "start_date=2024-01-01&end_date=2024-01-31&category_id=2&category_id=1\
            &payment_method_id=3,4&min_amount=5&max_amount=100.5&reimbursable_only=on\
            &reimbursement_status=pending&period=quarter",
        )
        .unwrap();

        let spec = query.to_spec();

        assert_eq!(
            spec,
            FilterSpec {
                start_date: Some(date!(2024 - 01 - 01)),
                end_date: Some(date!(2024 - 01 - 31)),
                category_ids: BTreeSet::from([1, 2]),
                payment_method_ids: BTreeSet::from([3, 4]),
                min_cost: Some(5.0),
                max_cost: Some(100.5),
                reimbursable_only: Some(true),
                reimbursement_status: Some(ReimbursementStatus::Pending),
            }
        );
        assert_eq!(query.window(), TimeWindow::Quarter);
    }

    #[test]
    fn malformed_values_become_no_constraint() {
        let query: FilterQuery = serde_html_form::from_str(
            "start_date=last+tuesday&category_id=food&min_amount=lots&max_amount=\
            &reimbursement_status=maybe&period=decade",
        )
        .unwrap();

        assert_eq!(query.to_spec(), FilterSpec::default());
        assert_eq!(query.window(), TimeWindow::Month);
    }

    #[test]
    fn empty_query_is_unrestricted() {
        let query: FilterQuery = serde_html_form::from_str("").unwrap();

        assert!(query.to_spec().is_unrestricted());
    }
}
