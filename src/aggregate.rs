//! Grouped sums and summary statistics over a filtered set of expense records.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer, ser::SerializeStruct};
use time::{Date, Month};

use crate::expense::{ExpenseRecord, ReimbursementStatus};

/// The label for expenses without a category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";
/// The label for expenses without a payment method.
pub const UNKNOWN_PAYMENT_LABEL: &str = "Unknown";
/// The label that groups the smallest entries in [Breakdown::top_with_other].
pub const OTHER_LABEL: &str = "Other";

/// Labelled sums in a defined order.
///
/// Serializes as `{"labels": [...], "data": [...]}` for ECharts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Breakdown {
    entries: Vec<(String, f64)>,
}

impl Breakdown {
    /// Add `value` to the entry for `label`, appending a new entry the first
    /// time `label` is seen.
    pub fn add(&mut self, label: &str, value: f64) {
        match self.entries.iter_mut().find(|(existing, _)| existing == label) {
            Some((_, total)) => *total += value,
            None => self.entries.push((label.to_owned(), value)),
        }
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, value)| *value)
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|(label, _)| label.clone()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, value)| *value).collect()
    }

    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|(_, value)| value).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries sorted by descending value.
    ///
    /// The sort is stable, so equal values keep the order they were first seen in.
    pub fn sorted_descending(&self) -> Breakdown {
        let mut entries = self.entries.clone();
        entries.sort_by(|(_, left), (_, right)| right.total_cmp(left));

        Breakdown { entries }
    }

    /// The `n` largest entries, ties broken by first-seen order.
    pub fn top(&self, n: usize) -> Breakdown {
        let mut sorted = self.sorted_descending();
        sorted.entries.truncate(n);
        sorted
    }

    /// The `n` largest entries with the rest summed under "Other".
    ///
    /// The remainder is always its own entry, even when one of the top
    /// entries is itself labelled "Other".
    pub fn top_with_other(&self, n: usize) -> Breakdown {
        let sorted = self.sorted_descending();

        if sorted.len() <= n {
            return sorted;
        }

        let mut top = sorted.top(n);
        let rest: f64 = sorted.entries[n..].iter().map(|(_, value)| value).sum();
        top.entries.push((OTHER_LABEL.to_owned(), rest));
        top
    }
}

impl FromIterator<(String, f64)> for Breakdown {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        let mut breakdown = Breakdown::default();

        for (label, value) in iter {
            breakdown.add(&label, value);
        }

        breakdown
    }
}

impl Serialize for Breakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Breakdown", 2)?;
        state.serialize_field("labels", &self.labels())?;
        state.serialize_field("data", &self.values())?;
        state.end()
    }
}

/// Totals for reimbursable expenses.
///
/// The per-status totals only include reimbursable expenses.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReimbursementSummary {
    pub total: f64,
    pub pending: f64,
    pub approved: f64,
    pub received: f64,
}

/// The sums and statistics for a set of expense records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateResult {
    pub total: f64,
    pub count: usize,
    /// Zero when there are no records.
    pub average: f64,
    pub min: f64,
    pub max: f64,
    /// Category sums in the order categories were first seen.
    pub by_category: Breakdown,
    /// Payment method sums in the order payment methods were first seen.
    pub by_payment_method: Breakdown,
    /// Daily sums keyed by `YYYY-MM-DD`, earliest first.
    pub by_day: Breakdown,
    /// Monthly sums keyed by e.g. "January 2024", earliest first.
    pub by_month: Breakdown,
    pub reimbursement: ReimbursementSummary,
}

/// Compute the sums and statistics for `records`.
///
/// An empty slice gives an all zero result.
pub fn aggregate(records: &[ExpenseRecord]) -> AggregateResult {
    let mut result = AggregateResult::default();
    let mut by_day: BTreeMap<Date, f64> = BTreeMap::new();
    let mut by_month: BTreeMap<(i32, u8), f64> = BTreeMap::new();

    for (index, record) in records.iter().enumerate() {
        let cost = record.cost;

        result.total += cost;
        result.count += 1;

        if index == 0 {
            result.min = cost;
            result.max = cost;
        } else {
            result.min = result.min.min(cost);
            result.max = result.max.max(cost);
        }

        result.by_category.add(
            record
                .category_name
                .as_deref()
                .unwrap_or(UNCATEGORIZED_LABEL),
            cost,
        );
        result.by_payment_method.add(
            record
                .payment_method_name
                .as_deref()
                .unwrap_or(UNKNOWN_PAYMENT_LABEL),
            cost,
        );

        *by_day.entry(record.date).or_insert(0.0) += cost;
        *by_month
            .entry((record.date.year(), record.date.month() as u8))
            .or_insert(0.0) += cost;

        if record.is_reimbursable {
            result.reimbursement.total += cost;

            match record.reimbursement_status {
                ReimbursementStatus::Pending => result.reimbursement.pending += cost,
                ReimbursementStatus::Approved => result.reimbursement.approved += cost,
                ReimbursementStatus::Received => result.reimbursement.received += cost,
                ReimbursementStatus::NotApplicable => {}
            }
        }
    }

    if result.count > 0 {
        result.average = result.total / result.count as f64;
    }

    result.by_day = by_day
        .into_iter()
        .map(|(date, total)| (iso_date_label(date), total))
        .collect();
    result.by_month = by_month
        .into_iter()
        .map(|((year, month), total)| (month_label(year, month), total))
        .collect();

    result
}

/// The share of `total` that `value` makes up as a percentage, zero when
/// `total` is zero.
pub fn percentage(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        value / total * 100.0
    }
}

fn iso_date_label(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month() as u8,
        date.day()
    )
}

fn month_label(year: i32, month: u8) -> String {
    match Month::try_from(month) {
        Ok(month) => format!("{month} {year}"),
        Err(_) => format!("{year}-{month:02}"),
    }
}
