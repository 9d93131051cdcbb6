use maud::{Markup, html};

use crate::{
    category::Category,
    expense::ReimbursementStatus,
    filter::FilterSpec,
    html::{FORM_CHECKBOX_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    payment_method::PaymentMethod,
};

/// Render inputs for every filter constraint, prefilled from `spec`.
///
/// The input names match [crate::filter::FilterQuery] so the enclosing form
/// can submit with GET.
pub fn filter_form_fields(
    spec: &FilterSpec,
    categories: &[Category],
    payment_methods: &[PaymentMethod],
) -> Markup {
    let min_cost = spec.min_cost.map(|cost| cost.to_string());
    let max_cost = spec.max_cost.map(|cost| cost.to_string());

    html! {
        div class="grid grid-cols-2 gap-4"
        {
            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "From" }
                input
                    name="start_date"
                    id="start_date"
                    type="date"
                    value=[spec.start_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "To" }
                input
                    name="end_date"
                    id="end_date"
                    type="date"
                    value=[spec.end_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="min_amount" class=(FORM_LABEL_STYLE) { "Minimum cost" }
                input
                    name="min_amount"
                    id="min_amount"
                    type="number"
                    step="0.01"
                    min="0"
                    value=[min_cost.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="max_amount" class=(FORM_LABEL_STYLE) { "Maximum cost" }
                input
                    name="max_amount"
                    id="max_amount"
                    type="number"
                    step="0.01"
                    min="0"
                    value=[max_cost.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        @if !categories.is_empty() {
            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Categories" }

                div class="flex flex-wrap gap-3"
                {
                    @for category in categories {
                        label class="flex items-center gap-1 text-sm"
                        {
                            input
                                type="checkbox"
                                name="category_id"
                                value=(category.id)
                                checked[spec.category_ids.contains(&category.id)]
                                class=(FORM_CHECKBOX_STYLE);
                            (category.name)
                        }
                    }
                }
            }
        }

        @if !payment_methods.is_empty() {
            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Payment methods" }

                div class="flex flex-wrap gap-3"
                {
                    @for payment_method in payment_methods {
                        label class="flex items-center gap-1 text-sm"
                        {
                            input
                                type="checkbox"
                                name="payment_method_id"
                                value=(payment_method.id)
                                checked[spec.payment_method_ids.contains(&payment_method.id)]
                                class=(FORM_CHECKBOX_STYLE);
                            (payment_method.name)
                        }
                    }
                }
            }
        }

        div class="grid grid-cols-2 gap-4 items-end"
        {
            label class="flex items-center gap-2 text-sm"
            {
                input
                    type="checkbox"
                    name="reimbursable_only"
                    value="true"
                    checked[spec.reimbursable_only == Some(true)]
                    class=(FORM_CHECKBOX_STYLE);
                "Reimbursable only"
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
                    option value="" { "Any" }

                    @for status in ReimbursementStatus::ALL {
                        option
                            value=(status.as_str())
                            selected[spec.reimbursement_status == Some(status)]
                        {
                            (status.label())
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::filter::FilterSpec;

    use super::filter_form_fields;

    #[test]
    fn prefills_from_spec() {
        let spec = FilterSpec {
            start_date: Some(date!(2024 - 02 - 01)),
            min_cost: Some(12.5),
            category_ids: BTreeSet::from([1]),
            ..FilterSpec::default()
        };

        let markup = maud::html! { form { (filter_form_fields(&spec, &[], &[])) } };
        let document = Html::parse_document(&markup.into_string());

        let start = document
            .select(&Selector::parse("input[name=start_date]").unwrap())
            .next()
            .unwrap();
        assert_eq!(start.value().attr("value"), Some("2024-02-01"));
        let min = document
            .select(&Selector::parse("input[name=min_amount]").unwrap())
            .next()
            .unwrap();
        assert_eq!(min.value().attr("value"), Some("12.5"));
        let end = document
            .select(&Selector::parse("input[name=end_date]").unwrap())
            .next()
            .unwrap();
        assert_eq!(end.value().attr("value"), None);
    }
}
