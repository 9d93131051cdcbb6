use maud::{Markup, html};
use time::Date;

use crate::{
    category::Category,
    expense::{Expense, ReimbursementStatus, multipart::ALLOWED_RECEIPT_EXTENSIONS},
    html::{FORM_CHECKBOX_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    payment_method::PaymentMethod,
};

/// Render the fields shared by the create and edit expense forms.
///
/// When `expense` is given its values prefill the fields, otherwise the date
/// defaults to `today`.
pub fn expense_form_fields(
    expense: Option<&Expense>,
    today: Date,
    categories: &[Category],
    payment_methods: &[PaymentMethod],
) -> Markup {
    let cost = expense.map(|expense| format!("{:.2}", expense.cost));
    let date = expense.map_or(today, |expense| expense.date);
    let category_id = expense.and_then(|expense| expense.category_id);
    let payment_method_id = expense.and_then(|expense| expense.payment_method_id);
    let status = expense.map_or(ReimbursementStatus::NotApplicable, |expense| {
        expense.reimbursement_status
    });
    let accept = ALLOWED_RECEIPT_EXTENSIONS
        .iter()
        .map(|extension| format!(".{extension}"))
        .collect::<Vec<_>>()
        .join(",");

    html! {
        div
        {
            label for="title" class=(FORM_LABEL_STYLE) { "Title" }

            input
                name="title"
                id="title"
                type="text"
                placeholder="Untitled Expense"
                required
                autofocus
                value=[expense.map(|expense| expense.title.as_str())]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div class="grid grid-cols-2 gap-4"
        {
            div
            {
                label for="cost" class=(FORM_LABEL_STYLE) { "Cost" }

                input
                    name="cost"
                    id="cost"
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    required
                    value=[cost.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    required
                    value=(date)
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div class="grid grid-cols-2 gap-4"
        {
            div
            {
                label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }

                select name="category_id" id="category_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Uncategorized" }

                    @for category in categories {
                        option value=(category.id) selected[Some(category.id) == category_id]
                        {
                            (category.name)
                        }
                    }
                }
            }

            div
            {
                label for="payment_method_id" class=(FORM_LABEL_STYLE) { "Payment Method" }

                select
                    name="payment_method_id"
                    id="payment_method_id"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Unknown" }

                    @for payment_method in payment_methods {
                        option
                            value=(payment_method.id)
                            selected[Some(payment_method.id) == payment_method_id]
                        {
                            (payment_method.name)
                        }
                    }
                }
            }
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            textarea name="description" id="description" rows="2" class=(FORM_TEXT_INPUT_STYLE)
            {
                (expense.map(|expense| expense.description.as_str()).unwrap_or_default())
            }
        }

        div class="grid grid-cols-2 gap-4"
        {
            div
            {
                label for="location" class=(FORM_LABEL_STYLE) { "Location" }

                input
                    name="location"
                    id="location"
                    type="text"
                    value=[expense.map(|expense| expense.location.as_str())]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="vendor" class=(FORM_LABEL_STYLE) { "Vendor" }

                input
                    name="vendor"
                    id="vendor"
                    type="text"
                    value=[expense.map(|expense| expense.vendor.as_str())]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="tags" class=(FORM_LABEL_STYLE) { "Tags" }

            input
                name="tags"
                id="tags"
                type="text"
                placeholder="moving, transport"
                value=[expense.map(|expense| expense.tags.as_str())]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="notes" class=(FORM_LABEL_STYLE) { "Notes" }

            textarea name="notes" id="notes" rows="2" class=(FORM_TEXT_INPUT_STYLE)
            {
                (expense.map(|expense| expense.notes.as_str()).unwrap_or_default())
            }
        }

        fieldset class="space-y-2"
        {
            div class="flex items-center gap-3"
            {
                input
                    name="is_reimbursable"
                    id="is_reimbursable"
                    type="checkbox"
                    checked[expense.is_some_and(|expense| expense.is_reimbursable)]
                    class=(FORM_CHECKBOX_STYLE);

                label for="is_reimbursable" class=(FORM_LABEL_STYLE) { "Reimbursable" }
            }

            div
            {
                label for="reimbursement_status" class=(FORM_LABEL_STYLE)
                {
                    "Reimbursement status"
                }

                select
                    name="reimbursement_status"
                    id="reimbursement_status"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for option_status in ReimbursementStatus::ALL {
                        option value=(option_status.as_str()) selected[option_status == status]
                        {
                            (option_status.label())
                        }
                    }
                }
            }

            div
            {
                label for="reimbursement_notes" class=(FORM_LABEL_STYLE)
                {
                    "Reimbursement notes"
                }

                input
                    name="reimbursement_notes"
                    id="reimbursement_notes"
                    type="text"
                    value=[expense.map(|expense| expense.reimbursement_notes.as_str())]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="receipt" class=(FORM_LABEL_STYLE) { "Receipt" }

            input
                name="receipt"
                id="receipt"
                type="file"
                accept=(accept)
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::{OffsetDateTime, macros::date};

    use crate::expense::{Expense, ReimbursementStatus};

    use super::expense_form_fields;

    fn render(expense: Option<&Expense>) -> Html {
        let fields = expense_form_fields(expense, date!(2024 - 05 - 01), &[], &[]);
        let markup = maud::html! { form { (fields) } };
        Html::parse_document(&markup.into_string())
    }

    #[test]
    fn new_form_defaults_date_to_today() {
        let document = render(None);

        let date = document
            .select(&Selector::parse("input[name=date]").unwrap())
            .next()
            .expect("want date input");
        assert_eq!(date.value().attr("value"), Some("2024-05-01"));
    }

    #[test]
    fn edit_form_selects_status() {
        let expense = Expense {
            id: 1,
            title: "Hotel".to_owned(),
            description: String::new(),
            cost: 125.0,
            date: date!(2024 - 01 - 16),
            category_id: None,
            payment_method_id: None,
            location: String::new(),
            vendor: String::new(),
            notes: String::new(),
            tags: String::new(),
            is_reimbursable: true,
            reimbursement_status: ReimbursementStatus::Received,
            reimbursement_notes: String::new(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };

        let document = render(Some(&expense));

        let selected = document
            .select(&Selector::parse("select[name=reimbursement_status] option[selected]").unwrap())
            .next()
            .expect("want a selected status");
        assert_eq!(selected.value().attr("value"), Some("received"));
        let cost = document
            .select(&Selector::parse("input[name=cost]").unwrap())
            .next()
            .unwrap();
        assert_eq!(cost.value().attr("value"), Some("125.00"));
    }
}
