//! Summary cards shown at the top of the dashboard.

use maud::{Markup, html};

use crate::{
    aggregate::AggregateResult,
    html::{CARD_STYLE, format_currency},
};

/// A single headline figure.
struct SummaryCard<'a> {
    id: &'a str,
    label: &'a str,
    value: String,
    detail: Option<String>,
}

/// Renders the total, count, average and reimbursable total as cards.
pub(super) fn summary_cards_view(result: &AggregateResult) -> Markup {
    let pending = result.reimbursement.pending;

    let cards = [
        SummaryCard {
            id: "total-card",
            label: "Total Spent",
            value: format_currency(result.total),
            detail: None,
        },
        SummaryCard {
            id: "count-card",
            label: "Expenses",
            value: result.count.to_string(),
            detail: None,
        },
        SummaryCard {
            id: "average-card",
            label: "Average Expense",
            value: format_currency(result.average),
            detail: (result.count > 0).then(|| {
                format!(
                    "{} to {}",
                    format_currency(result.min),
                    format_currency(result.max)
                )
            }),
        },
        SummaryCard {
            id: "reimbursable-card",
            label: "Reimbursable",
            value: format_currency(result.reimbursement.total),
            detail: (pending > 0.0).then(|| format!("{} pending", format_currency(pending))),
        },
    ];

    html! {
        section class="w-full grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4 mb-6"
        {
            @for card in cards {
                div id=(card.id) class=(CARD_STYLE)
                {
                    h4 class="text-sm text-gray-600 dark:text-gray-400" { (card.label) }
                    div class="text-3xl font-bold" { (card.value) }

                    @if let Some(detail) = card.detail {
                        div class="text-xs text-gray-600 dark:text-gray-400 mt-1" { (detail) }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::aggregate::AggregateResult;

    use super::summary_cards_view;

    fn card_text(html: &Html, id: &str) -> String {
        let selector = Selector::parse(&format!("#{id}")).unwrap();
        html.select(&selector)
            .next()
            .unwrap_or_else(|| panic!("card {id} not found"))
            .text()
            .collect()
    }

    #[test]
    fn shows_headline_figures() {
        let mut result = AggregateResult {
            total: 40.0,
            count: 3,
            average: 40.0 / 3.0,
            min: 5.0,
            max: 25.0,
            ..AggregateResult::default()
        };
        result.reimbursement.total = 12.5;
        result.reimbursement.pending = 12.5;

        let html = Html::parse_fragment(&summary_cards_view(&result).into_string());

        assert!(card_text(&html, "total-card").contains("$40.00"));
        assert!(card_text(&html, "count-card").contains('3'));
        assert!(card_text(&html, "average-card").contains("$13.33"));
        assert!(card_text(&html, "average-card").contains("$5.00 to $25.00"));
        assert!(card_text(&html, "reimbursable-card").contains("$12.50 pending"));
    }

    #[test]
    fn empty_result_shows_zeroes() {
        let html = Html::parse_fragment(&summary_cards_view(&AggregateResult::default()).into_string());

        assert!(card_text(&html, "total-card").contains("$0.00"));
        assert!(!card_text(&html, "average-card").contains(" to "));
    }
}
