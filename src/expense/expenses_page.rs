//! The page that lists expenses as a table or a grid of cards.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    aggregate::{UNCATEGORIZED_LABEL, UNKNOWN_PAYMENT_LABEL},
    category::{Category, get_all_categories},
    endpoints::{self, format_endpoint},
    expense::{ExpenseRecord, ReimbursementStatus},
    filter::{FilterQuery, FilterSpec, filter_form_fields, get_filtered_records},
    html::{
        BADGE_STYLE, BUTTON_PRIMARY_STYLE, CARD_STYLE, HeadElement, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency, link,
    },
    navigation::NavBar,
    payment_method::{PaymentMethod, get_all_payment_methods},
    settings::{DefaultView, get_settings, saved_accent_style},
    timezone::local_today,
};

/// The state needed for the expenses page.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// How to lay out the expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Layout {
    List,
    Grid,
}

#[derive(Debug, Default, Deserialize)]
pub struct LayoutQuery {
    #[serde(default)]
    view: Option<String>,
}

impl LayoutQuery {
    fn layout(&self, default_view: DefaultView) -> Layout {
        match self.view.as_deref() {
            Some("grid") => Layout::Grid,
            Some("list") => Layout::List,
            _ => match default_view {
                DefaultView::Grid => Layout::Grid,
                DefaultView::List | DefaultView::Dashboard => Layout::List,
            },
        }
    }
}

/// Render the expenses matching the filter in the query string.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    Query(filter_query): Query<FilterQuery>,
    Query(layout_query): Query<LayoutQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let spec = filter_query.to_spec();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let records = get_filtered_records(&spec, None, today, &connection)
        .inspect_err(|error| tracing::error!("Could not get expenses: {error}"))?;
    let categories = get_all_categories(&connection)?;
    let payment_methods = get_all_payment_methods(&connection)?;
    let default_view = get_settings(&connection)
        .map(|settings| settings.default_view)
        .unwrap_or_default();
    let accent = saved_accent_style(&connection);

    let view = ExpensesView {
        records: &records,
        spec: &spec,
        layout: layout_query.layout(default_view),
        categories: &categories,
        payment_methods: &payment_methods,
    };

    Ok(expenses_view(view, accent).into_response())
}

struct ExpensesView<'a> {
    records: &'a [ExpenseRecord],
    spec: &'a FilterSpec,
    layout: Layout,
    categories: &'a [Category],
    payment_methods: &'a [PaymentMethod],
}

fn expenses_view(view: ExpensesView<'_>, accent: HeadElement) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();
    let total: f64 = view.records.iter().map(|record| record.cost).sum();
    let layout_value = match view.layout {
        Layout::List => "list",
        Layout::Grid => "grid",
    };

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-6xl space-y-6"
            {
                div class="flex flex-wrap items-center justify-between gap-4"
                {
                    div
                    {
                        h1 class="text-2xl font-bold" { "Expenses" }
                        p id="expenses-total" class="text-lg"
                        {
                            "Total: " (format_currency(total))
                            " (" (view.records.len()) " expenses)"
                        }
                    }

                    div class="flex gap-4"
                    {
                        (link(&format!("{}?view=list", endpoints::EXPENSES_VIEW), "List"))
                        (link(&format!("{}?view=grid", endpoints::EXPENSES_VIEW), "Grid"))
                        (link(endpoints::NEW_EXPENSE_VIEW, "Add Expense"))
                    }
                }

                details class=(CARD_STYLE) open[!view.spec.is_unrestricted()]
                {
                    summary class="cursor-pointer font-semibold" { "Filter" }

                    form
                        method="get"
                        action=(endpoints::EXPENSES_VIEW)
                        class="space-y-4 mt-4"
                    {
                        input type="hidden" name="view" value=(layout_value);

                        (filter_form_fields(view.spec, view.categories, view.payment_methods))

                        div class="flex gap-4 items-center"
                        {
                            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
                            (link(endpoints::EXPENSES_VIEW, "Clear"))
                        }
                    }
                }

                @if view.records.is_empty() {
                    p class="text-center py-8"
                    {
                        "No expenses found. "
                        (link(endpoints::NEW_EXPENSE_VIEW, "Add an expense"))
                        " or "
                        (link(endpoints::IMPORT_VIEW, "import a CSV file"))
                        "."
                    }
                } @else {
                    @match view.layout {
                        Layout::List => (expense_table(view.records)),
                        Layout::Grid => (expense_grid(view.records)),
                    }
                }
            }
        }
    };

    base("Expenses", &[accent], &content)
}

fn category_badge(record: &ExpenseRecord) -> Markup {
    let name = record.category_name.as_deref().unwrap_or(UNCATEGORIZED_LABEL);
    let color = record.category_color.as_deref().unwrap_or("#6c757d");

    html! {
        span class=(BADGE_STYLE) style={ "background-color: " (color) "; color: white;" }
        {
            (name)
        }
    }
}

fn reimbursement_text(record: &ExpenseRecord) -> Option<&'static str> {
    match (record.is_reimbursable, record.reimbursement_status) {
        (false, _) => None,
        (true, ReimbursementStatus::NotApplicable) => Some("Reimbursable"),
        (true, status) => Some(status.label()),
    }
}

fn expense_table(records: &[ExpenseRecord]) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow-md"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Payment" }
                        th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Cost" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Reimbursement" }
                        th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Actions" } }
                    }
                }

                tbody
                {
                    @for record in records {
                        tr class=(TABLE_ROW_STYLE) data-expense-id=(record.id)
                        {
                            td class=(TABLE_CELL_STYLE) { (record.date) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                div class="font-medium text-gray-900 dark:text-white" { (record.title) }
                                @if !record.vendor.is_empty() {
                                    div class="text-xs" { (record.vendor) }
                                }
                            }
                            td class=(TABLE_CELL_STYLE) { (category_badge(record)) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                (record.payment_method_name.as_deref().unwrap_or(UNKNOWN_PAYMENT_LABEL))
                            }
                            td class={ (TABLE_CELL_STYLE) " text-right" } { (format_currency(record.cost)) }
                            td class=(TABLE_CELL_STYLE) { (reimbursement_text(record).unwrap_or("")) }
                            td class={ (TABLE_CELL_STYLE) " space-x-2 whitespace-nowrap" }
                            {
                                @if record.has_receipt {
                                    a href=(format_endpoint(endpoints::RECEIPT, record.id))
                                        target="_blank"
                                        class=(LINK_STYLE)
                                    {
                                        "Receipt"
                                    }
                                }
                                (link(&format_endpoint(endpoints::EDIT_EXPENSE_VIEW, record.id), "Edit"))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn expense_grid(records: &[ExpenseRecord]) -> Markup {
    html! {
        div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4"
        {
            @for record in records {
                article class=(CARD_STYLE) data-expense-id=(record.id)
                {
                    div class="flex justify-between items-start mb-2"
                    {
                        h3 class="font-semibold" { (record.title) }
                        span class="font-bold" { (format_currency(record.cost)) }
                    }

                    p class="text-sm mb-2" { (record.date) }
                    (category_badge(record))

                    @if !record.description.is_empty() {
                        p class="text-sm mt-2" { (record.description) }
                    }

                    @if let Some(text) = reimbursement_text(record) {
                        p class="text-xs mt-2" { (text) }
                    }

                    div class="flex gap-3 mt-3 text-sm"
                    {
                        @if record.has_receipt {
                            a href=(format_endpoint(endpoints::RECEIPT, record.id))
                                target="_blank"
                                class=(LINK_STYLE)
                            {
                                "Receipt"
                            }
                        }
                        (link(&format_endpoint(endpoints::EDIT_EXPENSE_VIEW, record.id), "Edit"))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum_extra::extract::Query;
    use scraper::Selector;
    use time::OffsetDateTime;

    use crate::{
        expense::{Expense, create_expense},
        filter::FilterQuery,
        test_utils::{assert_status_ok, assert_valid_html, must_open_db, parse_html_document},
    };

    use super::{ExpensesPageState, LayoutQuery, get_expenses_page};

    fn get_state() -> ExpensesPageState {
        let connection = must_open_db();

        let today = OffsetDateTime::now_utc().date();
        for (cost, title, category) in [(10.0, "Lunch", Some(7)), (25.0, "Taxi", None)] {
            create_expense(
                Expense::build(cost, today, title).category_id(category),
                &connection,
            )
            .unwrap();
        }

        ExpensesPageState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn lists_all_expenses_with_total() {
        let response = get_expenses_page(
            State(get_state()),
            Query(FilterQuery::default()),
            Query(LayoutQuery::default()),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let rows = Selector::parse("tbody tr").unwrap();
        assert_eq!(document.select(&rows).count(), 2);
        let total = document
            .select(&Selector::parse("#expenses-total").unwrap())
            .next()
            .unwrap()
            .text()
            .collect::<String>();
        assert!(total.contains("$35.00"), "got total text {total:?}");
    }

    #[tokio::test]
    async fn filters_by_category() {
        let query = FilterQuery {
            category_id: vec!["7".to_owned()],
            ..FilterQuery::default()
        };

        let response = get_expenses_page(
            State(get_state()),
            Query(query),
            Query(LayoutQuery::default()),
        )
        .await
        .unwrap();

        let document = parse_html_document(response).await;
        let rows = Selector::parse("tbody tr").unwrap();
        assert_eq!(document.select(&rows).count(), 1);
    }

    #[tokio::test]
    async fn grid_layout_renders_cards() {
        let response = get_expenses_page(
            State(get_state()),
            Query(FilterQuery::default()),
            Query(LayoutQuery {
                view: Some("grid".to_owned()),
            }),
        )
        .await
        .unwrap();

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let cards = Selector::parse("article[data-expense-id]").unwrap();
        assert_eq!(document.select(&cards).count(), 2);
    }
}
