use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    Error,
    category::{Category, get_all_categories},
    database_id::ExpenseId,
    endpoints::{self, format_endpoint},
    expense::{
        Expense, core::get_expense, create_page::ExpensePageState, form::expense_form_fields,
        record::get_expense_record,
    },
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, HeadElement, LINK_STYLE,
        base, loading_spinner,
    },
    navigation::NavBar,
    payment_method::{PaymentMethod, get_all_payment_methods},
    settings::saved_accent_style,
    timezone::local_today,
};

struct EditExpenseView<'a> {
    expense: &'a Expense,
    has_receipt: bool,
    today: Date,
    categories: &'a [Category],
    payment_methods: &'a [PaymentMethod],
}

fn edit_expense_view(view: EditExpenseView<'_>, accent: HeadElement) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();
    let spinner = loading_spinner();
    let update_url = format_endpoint(endpoints::EXPENSE, view.expense.id);
    let receipt_url = format_endpoint(endpoints::RECEIPT, view.expense.id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_url)
                hx-encoding="multipart/form-data"
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                class="w-full max-w-2xl space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Expense" }

                (expense_form_fields(
                    Some(view.expense),
                    view.today,
                    view.categories,
                    view.payment_methods,
                ))

                @if view.has_receipt {
                    p class="text-sm"
                    {
                        "A receipt is attached. "
                        a href=(receipt_url) target="_blank" class=(LINK_STYLE) { "View receipt" }
                        ". Uploading a new file replaces it."
                    }
                }

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator" { (spinner) }
                    " Save Changes"
                }
            }

            button
                hx-delete=(update_url)
                hx-confirm="Delete this expense? This cannot be undone."
                hx-target-error="#alert-container"
                class={ "mt-4 " (BUTTON_DELETE_STYLE) }
            {
                "Delete Expense"
            }
        }
    };

    base("Edit Expense", &[accent], &content)
}

/// Renders the page for editing an existing expense.
pub async fn get_edit_expense_page(
    State(state): State<ExpensePageState>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = get_expense(expense_id, &connection)?;
    let has_receipt = get_expense_record(expense_id, &connection)?.has_receipt;
    let categories = get_all_categories(&connection)?;
    let payment_methods = get_all_payment_methods(&connection)?;
    let accent = saved_accent_style(&connection);

    Ok(edit_expense_view(
        EditExpenseView {
            expense: &expense,
            has_receipt,
            today,
            categories: &categories,
            payment_methods: &payment_methods,
        },
        accent,
    )
    .into_response())
}
