//! Table views for dashboard data display.

use maud::{Markup, html};

use crate::{
    aggregate::{AggregateResult, percentage},
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
};

/// How many categories the top categories table lists.
const TOP_CATEGORY_COUNT: usize = 5;

/// Renders the largest categories with their share of the total.
///
/// Returns empty markup when there are no expenses.
pub(super) fn top_categories_table(result: &AggregateResult) -> Markup {
    let top = result.by_category.top(TOP_CATEGORY_COUNT);

    if top.is_empty() {
        return html! {};
    }

    html! {
        div id="top-categories"
        {
            h3 class="text-xl font-semibold mb-4" { "Top Categories" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Amount" }
                            th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Share" }
                        }
                    }

                    tbody
                    {
                        @for (name, amount) in top.entries() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                th scope="row" class={ (TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white" }
                                {
                                    (name)
                                }
                                td class={ (TABLE_CELL_STYLE) " text-right" } { (format_currency(*amount)) }
                                td class={ (TABLE_CELL_STYLE) " text-right" }
                                {
                                    (format!("{:.1}%", percentage(*amount, result.total)))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::aggregate::{AggregateResult, Breakdown};

    use super::top_categories_table;

    #[test]
    fn lists_at_most_five_categories_largest_first() {
        let by_category: Breakdown = (1..=7)
            .map(|value| (format!("Category {value}"), value as f64))
            .collect();
        let result = AggregateResult {
            total: by_category.sum(),
            by_category,
            ..AggregateResult::default()
        };

        let html = Html::parse_fragment(&top_categories_table(&result).into_string());

        let row_headers: Vec<String> = html
            .select(&Selector::parse("tbody th").unwrap())
            .map(|cell| cell.text().collect())
            .collect();
        assert_eq!(
            row_headers,
            ["Category 7", "Category 6", "Category 5", "Category 4", "Category 3"]
        );
    }

    #[test]
    fn share_is_a_percentage_of_the_total() {
        let result = AggregateResult {
            total: 40.0,
            by_category: [("Food".to_owned(), 10.0), ("Travel".to_owned(), 30.0)]
                .into_iter()
                .collect(),
            ..AggregateResult::default()
        };

        let text = top_categories_table(&result).into_string();

        assert!(text.contains("75.0%"));
        assert!(text.contains("25.0%"));
    }

    #[test]
    fn no_expenses_renders_nothing() {
        assert!(
            top_categories_table(&AggregateResult::default())
                .into_string()
                .is_empty()
        );
    }
}
