use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    expense::{ExpenseRecord, get_expense_records},
    filter::{FilterSpec, TimeWindow},
};

/// Build a predicate that admits the records matching `spec`.
///
/// When `spec` has no start date, `window` supplies one relative to `today`.
/// An explicit start date always takes precedence over the window. Pass
/// `None` for `window` to leave the start unbounded.
///
/// Conflicting cost bounds (min above max) admit nothing.
pub fn evaluate_filters(
    spec: &FilterSpec,
    window: Option<TimeWindow>,
    today: Date,
) -> impl Fn(&ExpenseRecord) -> bool + use<> {
    let spec = spec.clone();
    let start_date = spec
        .start_date
        .or_else(|| window.map(|window| window.start_date(today)));

    move |record: &ExpenseRecord| {
        if start_date.is_some_and(|start| record.date < start) {
            return false;
        }

        if spec.end_date.is_some_and(|end| record.date > end) {
            return false;
        }

        if !spec.category_ids.is_empty()
            && !record
                .category_id
                .is_some_and(|id| spec.category_ids.contains(&id))
        {
            return false;
        }

        if !spec.payment_method_ids.is_empty()
            && !record
                .payment_method_id
                .is_some_and(|id| spec.payment_method_ids.contains(&id))
        {
            return false;
        }

        if spec.min_cost.is_some_and(|min| record.cost < min) {
            return false;
        }

        if spec.max_cost.is_some_and(|max| record.cost > max) {
            return false;
        }

        if spec.reimbursable_only == Some(true) && !record.is_reimbursable {
            return false;
        }

        if spec
            .reimbursement_status
            .is_some_and(|status| record.reimbursement_status != status)
        {
            return false;
        }

        true
    }
}

/// Load the expense records matching `spec`, newest first.
pub fn get_filtered_records(
    spec: &FilterSpec,
    window: Option<TimeWindow>,
    today: Date,
    connection: &Connection,
) -> Result<Vec<ExpenseRecord>, Error> {
    let predicate = evaluate_filters(spec, window, today);

    let records = get_expense_records(connection)?
        .into_iter()
        .filter(|record| predicate(record))
        .collect();

    Ok(records)
}
