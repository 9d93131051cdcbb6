//! Turns a list of expenses and a [ReportConfig] into ordered report sections.

use unicode_segmentation::UnicodeSegmentation;

use crate::{
    aggregate::{AggregateResult, Breakdown, aggregate, percentage},
    expense::ExpenseRecord,
    html::format_currency,
    report::{
        config::ReportConfig,
        section::{
            BreakdownRow, DetailColumn, DetailTable, ReportSection, SummaryStats, TitleBlock,
        },
    },
};

/// The number of categories the pie chart shows before grouping the rest.
pub const PIE_CHART_CATEGORY_LIMIT: usize = 8;

/// Shown in the detail table for an expense without a category or payment method.
pub const MISSING_REFERENCE_LABEL: &str = "N/A";

const TRUNCATION_MARKER: &str = "...";

/// Widths within this many inches of the usable width count as fitting.
const WIDTH_TOLERANCE_INCHES: f64 = 1e-9;

/// Compose the sections of a report on `records`.
///
/// `records` should already be filtered and sorted newest first. Sections
/// come out in a fixed order: title, the tables, the charts and finally the
/// detail table. Adjacent groups that both have content are separated by a
/// page break. Sections whose data is empty are left out.
pub fn compose_report(records: &[ExpenseRecord], config: &ReportConfig) -> Vec<ReportSection> {
    let result = aggregate(records);

    let mut sections = vec![ReportSection::Title(title_block(records, config))];

    let tables = table_sections(&result, config);
    let charts = chart_sections(&result, config);
    let detail = (config.include_detail_table && !records.is_empty())
        .then(|| ReportSection::DetailTable(detail_table(records, config)));

    let groups = [tables, charts, detail.into_iter().collect()];
    let mut previous_group_has_content = false;

    for group in groups {
        if group.is_empty() {
            continue;
        }

        if previous_group_has_content {
            sections.push(ReportSection::PageBreak);
        }

        sections.extend(group);
        previous_group_has_content = true;
    }

    sections
}

fn title_block(records: &[ExpenseRecord], config: &ReportConfig) -> TitleBlock {
    let earliest = records.iter().map(|record| record.date).min();
    let latest = records.iter().map(|record| record.date).max();

    TitleBlock {
        title: config.title.clone(),
        generated_on: config.generated_on,
        date_range: earliest.zip(latest),
        expense_count: records.len(),
    }
}

fn table_sections(result: &AggregateResult, config: &ReportConfig) -> Vec<ReportSection> {
    let mut sections = Vec::new();

    if config.include_summary {
        sections.push(ReportSection::Summary(SummaryStats {
            total: result.total,
            count: result.count,
            average: result.average,
            min: result.min,
            max: result.max,
            reimbursable_total: result.reimbursement.total,
        }));
    }

    if config.include_category_breakdown && !result.by_category.is_empty() {
        sections.push(ReportSection::CategoryBreakdown(breakdown_rows(
            &result.by_category.sorted_descending(),
            result.total,
        )));
    }

    if config.include_payment_breakdown && !result.by_payment_method.is_empty() {
        sections.push(ReportSection::PaymentBreakdown(breakdown_rows(
            &result.by_payment_method.sorted_descending(),
            result.total,
        )));
    }

    if config.include_monthly_trend && !result.by_month.is_empty() {
        sections.push(ReportSection::MonthlyTrend(breakdown_rows(
            &result.by_month,
            result.total,
        )));
    }

    sections
}

fn chart_sections(result: &AggregateResult, config: &ReportConfig) -> Vec<ReportSection> {
    let mut sections = Vec::new();

    if config.include_pie_chart && !result.by_category.is_empty() {
        sections.push(ReportSection::PieChart(
            result.by_category.top_with_other(PIE_CHART_CATEGORY_LIMIT),
        ));
    }

    if config.include_bar_chart && !result.by_payment_method.is_empty() {
        sections.push(ReportSection::BarChart(
            result.by_payment_method.sorted_descending(),
        ));
    }

    if config.include_trend_chart && !result.by_month.is_empty() {
        sections.push(ReportSection::TrendChart(result.by_month.clone()));
    }

    sections
}

fn breakdown_rows(breakdown: &Breakdown, total: f64) -> Vec<BreakdownRow> {
    breakdown
        .entries()
        .iter()
        .map(|(label, amount)| BreakdownRow {
            label: label.clone(),
            amount: *amount,
            percentage: percentage(*amount, total),
        })
        .collect()
}

/// The detail table columns for `config`, in display order.
pub fn detail_columns(config: &ReportConfig) -> Vec<DetailColumn> {
    let mut columns = vec![DetailColumn::Date, DetailColumn::Title];

    if config.include_descriptions {
        columns.push(DetailColumn::Description);
    }

    columns.extend([
        DetailColumn::Category,
        DetailColumn::Amount,
        DetailColumn::Payment,
    ]);

    if config.include_locations {
        columns.push(DetailColumn::Location);
    }

    if config.include_notes {
        columns.push(DetailColumn::Notes);
    }

    columns
}

/// Scale `widths` down proportionally if together they are wider than
/// `usable_width`, otherwise return them unchanged.
pub fn fit_column_widths(widths: &[f64], usable_width: f64) -> Vec<f64> {
    let total: f64 = widths.iter().sum();

    if total <= usable_width + WIDTH_TOLERANCE_INCHES || total <= 0.0 {
        return widths.to_vec();
    }

    let scale = usable_width / total;
    widths.iter().map(|width| width * scale).collect()
}

/// Cut `text` to at most `max_graphemes` characters followed by "..." if it
/// is longer than that.
pub fn truncate(text: &str, max_graphemes: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(max_graphemes).collect();

    if graphemes.next().is_some() {
        format!("{head}{TRUNCATION_MARKER}")
    } else {
        head
    }
}

fn detail_table(records: &[ExpenseRecord], config: &ReportConfig) -> DetailTable {
    let columns = detail_columns(config);
    let base_widths: Vec<f64> = columns
        .iter()
        .map(|column| column.base_width_inches())
        .collect();
    let widths = fit_column_widths(&base_widths, config.page_size.usable_width_inches());

    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| detail_cell(record, *column))
                .collect()
        })
        .collect();

    DetailTable {
        columns,
        widths,
        rows,
    }
}

fn detail_cell(record: &ExpenseRecord, column: DetailColumn) -> String {
    let text = match column {
        DetailColumn::Date => record.date.to_string(),
        DetailColumn::Title => record.title.clone(),
        DetailColumn::Description => record.description.clone(),
        DetailColumn::Category => record
            .category_name
            .clone()
            .unwrap_or_else(|| MISSING_REFERENCE_LABEL.to_owned()),
        DetailColumn::Amount => format_currency(record.cost),
        DetailColumn::Payment => record
            .payment_method_name
            .clone()
            .unwrap_or_else(|| MISSING_REFERENCE_LABEL.to_owned()),
        DetailColumn::Location => {
            if record.location.is_empty() {
                record.vendor.clone()
            } else {
                record.location.clone()
            }
        }
        DetailColumn::Notes => record.notes.clone(),
    };

    match column.max_graphemes() {
        Some(limit) => truncate(&text, limit),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        expense::{ExpenseRecord, test_records::record},
        report::{
            config::{PageSize, ReportConfig},
            section::{DetailColumn, ReportSection},
        },
    };

    use super::{compose_report, detail_columns, fit_column_widths, truncate};

    fn kinds(sections: &[ReportSection]) -> Vec<&'static str> {
        sections.iter().map(ReportSection::kind).collect()
    }

    fn sample_records() -> Vec<ExpenseRecord> {
        let mut lunch = record(10.0, date!(2024 - 01 - 03), Some((1, "Food")));
        lunch.payment_method_name = Some("Cash".to_owned());
        lunch.payment_method_id = Some(1);

        vec![
            lunch,
            record(5.0, date!(2024 - 01 - 02), Some((1, "Food"))),
            record(25.0, date!(2024 - 01 - 01), Some((2, "Travel"))),
        ]
    }

    #[test]
    fn all_sections_in_canonical_order() {
        let sections = compose_report(&sample_records(), &ReportConfig::default());

        assert_eq!(
            kinds(&sections),
            [
                "title",
                "summary",
                "category_breakdown",
                "payment_breakdown",
                "monthly_trend",
                "page_break",
                "pie_chart",
                "bar_chart",
                "trend_chart",
                "page_break",
                "detail_table",
            ]
        );
    }

    #[test]
    fn no_page_break_before_charts_without_tables() {
        let config = ReportConfig {
            include_summary: false,
            include_category_breakdown: false,
            include_payment_breakdown: false,
            include_monthly_trend: false,
            include_detail_table: false,
            ..ReportConfig::default()
        };

        let sections = compose_report(&sample_records(), &config);

        assert_eq!(
            kinds(&sections),
            ["title", "pie_chart", "bar_chart", "trend_chart"]
        );
    }

    #[test]
    fn no_charts_means_single_break_before_detail() {
        let config = ReportConfig {
            include_pie_chart: false,
            include_bar_chart: false,
            include_trend_chart: false,
            include_category_breakdown: false,
            include_payment_breakdown: false,
            include_monthly_trend: false,
            ..ReportConfig::default()
        };

        let sections = compose_report(&sample_records(), &config);

        assert_eq!(
            kinds(&sections),
            ["title", "summary", "page_break", "detail_table"]
        );
    }

    #[test]
    fn empty_records_omit_charts_and_breakdowns() {
        let sections = compose_report(&[], &ReportConfig::default());

        assert_eq!(kinds(&sections), ["title", "summary"]);
        let ReportSection::Summary(summary) = &sections[1] else {
            panic!("expected a summary section");
        };
        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.average, 0.0);
    }

    #[test]
    fn pie_chart_groups_categories_past_eight() {
        let records: Vec<ExpenseRecord> = (1..=10)
            .map(|id| {
                let name = format!("Category {id}");
                record(id as f64, date!(2024 - 01 - 01), Some((id, &name)))
            })
            .collect();
        let config = ReportConfig {
            include_bar_chart: false,
            include_trend_chart: false,
            ..ReportConfig::default()
        };

        let sections = compose_report(&records, &config);

        let pie = sections
            .iter()
            .find_map(|section| match section {
                ReportSection::PieChart(breakdown) => Some(breakdown),
                _ => None,
            })
            .unwrap();
        assert_eq!(pie.len(), 9);
        assert_eq!(pie.get("Other"), Some(3.0));
    }

    #[test]
    fn breakdown_percentages_use_filtered_total() {
        let sections = compose_report(&sample_records(), &ReportConfig::default());

        let rows = sections
            .iter()
            .find_map(|section| match section {
                ReportSection::CategoryBreakdown(rows) => Some(rows),
                _ => None,
            })
            .unwrap();
        assert_eq!(rows[0].label, "Travel");
        assert_eq!(rows[0].percentage, 62.5);
        assert_eq!(rows[1].label, "Food");
        assert_eq!(rows[1].percentage, 37.5);
    }

    #[test]
    fn zero_total_gives_zero_percentages() {
        let records = [record(0.0, date!(2024 - 01 - 01), Some((1, "Food")))];

        let sections = compose_report(&records, &ReportConfig::default());

        let rows = sections
            .iter()
            .find_map(|section| match section {
                ReportSection::CategoryBreakdown(rows) => Some(rows),
                _ => None,
            })
            .unwrap();
        assert_eq!(rows[0].percentage, 0.0);
    }

    #[test]
    fn widths_within_page_are_unchanged() {
        let widths = [1.0, 1.8, 1.5, 1.2, 0.9, 1.1];

        assert_eq!(
            fit_column_widths(&widths, PageSize::Letter.usable_width_inches()),
            widths
        );
    }

    #[test]
    fn widths_wider_than_page_are_scaled() {
        let widths = [1.0, 1.8, 1.5, 1.2, 0.9, 1.1, 1.5];
        let total: f64 = widths.iter().sum();
        assert!((total - 9.0).abs() < 1e-9);

        let fitted = fit_column_widths(&widths, 7.5);

        for (want, got) in widths.iter().zip(&fitted) {
            assert!((want * 7.5 / 9.0 - got).abs() < 1e-9);
        }
        assert!((fitted.iter().sum::<f64>() - 7.5).abs() < 1e-9);
    }

    #[test]
    fn detail_columns_follow_flags() {
        let config = ReportConfig {
            include_descriptions: true,
            include_locations: true,
            include_notes: true,
            ..ReportConfig::default()
        };

        assert_eq!(
            detail_columns(&config),
            [
                DetailColumn::Date,
                DetailColumn::Title,
                DetailColumn::Description,
                DetailColumn::Category,
                DetailColumn::Amount,
                DetailColumn::Payment,
                DetailColumn::Location,
                DetailColumn::Notes,
            ]
        );
        assert_eq!(
            detail_columns(&ReportConfig::default()),
            [
                DetailColumn::Date,
                DetailColumn::Title,
                DetailColumn::Category,
                DetailColumn::Amount,
                DetailColumn::Payment,
            ]
        );
    }

    #[test]
    fn detail_rows_use_placeholders_and_fallbacks() {
        let mut moving = record(299.99, date!(2024 - 01 - 15), None);
        moving.title = "Moving Truck Rental for the long trip north".to_owned();
        moving.vendor = "U-Haul".to_owned();
        let config = ReportConfig {
            include_locations: true,
            ..ReportConfig::default()
        };

        let sections = compose_report(&[moving], &config);

        let table = sections
            .iter()
            .find_map(|section| match section {
                ReportSection::DetailTable(table) => Some(table),
                _ => None,
            })
            .unwrap();
        assert_eq!(
            table.rows[0],
            [
                "2024-01-15",
                "Moving Truck Rental for the lo...",
                "N/A",
                "$299.99",
                "N/A",
                "U-Haul",
            ]
        );
    }

    #[test]
    fn truncate_counts_graphemes() {
        assert_eq!(truncate("short", 30), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("éééé", 4), "éééé");
        assert_eq!(truncate("👍🏽👍🏽👍🏽", 2), "👍🏽👍🏽...");
    }
}
