//! The constraints that narrow down which expenses take part in a view,
//! aggregate or report.

use std::collections::BTreeSet;

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    category::CategoryId, expense::ReimbursementStatus, payment_method::PaymentMethodId,
};

pub(crate) const ISO_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]");

/// An immutable set of constraints over expense records.
///
/// Every bound is optional and inclusive. Empty id sets do not restrict
/// anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub category_ids: BTreeSet<CategoryId>,
    pub payment_method_ids: BTreeSet<PaymentMethodId>,
    pub min_cost: Option<f64>,
    pub max_cost: Option<f64>,
    /// `Some(true)` admits only reimbursable expenses. `Some(false)` and
    /// `None` do not restrict anything.
    pub reimbursable_only: Option<bool>,
    pub reimbursement_status: Option<ReimbursementStatus>,
}

impl FilterSpec {
    /// The set constraints as `(name, value)` pairs for building cache keys.
    ///
    /// Id sets are written in ascending order separated by commas, so equal
    /// specs always give equal pairs.
    pub fn cache_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(start_date) = self.start_date {
            params.push(("start_date", format_date(start_date)));
        }

        if let Some(end_date) = self.end_date {
            params.push(("end_date", format_date(end_date)));
        }

        if !self.category_ids.is_empty() {
            params.push(("category_id", join_ids(&self.category_ids)));
        }

        if !self.payment_method_ids.is_empty() {
            params.push(("payment_method_id", join_ids(&self.payment_method_ids)));
        }

        if let Some(min_cost) = self.min_cost {
            params.push(("min_amount", min_cost.to_string()));
        }

        if let Some(max_cost) = self.max_cost {
            params.push(("max_amount", max_cost.to_string()));
        }

        if let Some(reimbursable_only) = self.reimbursable_only {
            params.push(("reimbursable_only", reimbursable_only.to_string()));
        }

        if let Some(status) = self.reimbursement_status {
            params.push(("reimbursement_status", status.as_str().to_owned()));
        }

        params
    }

    /// Whether no constraint is set.
    pub fn is_unrestricted(&self) -> bool {
        *self == FilterSpec::default()
    }
}

fn format_date(date: Date) -> String {
    date.format(ISO_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

fn join_ids(ids: &BTreeSet<i64>) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
