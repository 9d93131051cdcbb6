//! Turns composed report sections into a downloadable document.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::{
    Error,
    dashboard::charts::{
        DashboardChart, category_pie_chart, charts_script, payment_bar_chart, trend_line_chart,
    },
    html::{ECHARTS_SCRIPT, HeadElement, format_currency},
    report::{
        config::{PAGE_MARGIN_INCHES, PageSize},
        section::{BreakdownRow, DetailTable, ReportSection, SummaryStats, TitleBlock},
    },
};

/// Produces a document from report sections.
pub trait DocumentRenderer {
    /// The MIME type of the rendered document.
    fn content_type(&self) -> &'static str;

    /// The file extension for the rendered document, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Render `sections` in order for pages of `page_size`.
    ///
    /// # Errors
    /// Returns an [Error::RenderError] if the document cannot be produced.
    fn render(&self, sections: &[ReportSection], page_size: PageSize) -> Result<Vec<u8>, Error>;
}

/// Renders a report as a printable HTML page.
///
/// The page size and margins are set with CSS `@page`, page breaks use
/// `break-after`, and charts are drawn by ECharts when the page loads.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlDocumentRenderer;

const CHART_HEIGHT_INCHES: f64 = 3.5;

impl DocumentRenderer for HtmlDocumentRenderer {
    fn content_type(&self) -> &'static str {
        "text/html; charset=utf-8"
    }

    fn file_extension(&self) -> &'static str {
        "html"
    }

    fn render(&self, sections: &[ReportSection], page_size: PageSize) -> Result<Vec<u8>, Error> {
        let title = sections
            .iter()
            .find_map(|section| match section {
                ReportSection::Title(block) => Some(block.title.as_str()),
                _ => None,
            })
            .unwrap_or("Report");

        let charts = report_charts(sections);
        let mut chart_ids = charts.iter().map(|chart| chart.id);

        let body = html! {
            @for section in sections {
                @match section {
                    ReportSection::Title(block) => { (title_view(block)) }
                    ReportSection::Summary(stats) => { (summary_view(stats)) }
                    ReportSection::CategoryBreakdown(rows) => {
                        (breakdown_view("Category Breakdown", "Category", rows))
                    }
                    ReportSection::PaymentBreakdown(rows) => {
                        (breakdown_view("Payment Method Breakdown", "Payment Method", rows))
                    }
                    ReportSection::MonthlyTrend(rows) => {
                        (breakdown_view("Monthly Trend", "Month", rows))
                    }
                    ReportSection::PageBreak => { div class="page-break" {} }
                    ReportSection::PieChart(_)
                    | ReportSection::BarChart(_)
                    | ReportSection::TrendChart(_) => {
                        @if let Some(id) = chart_ids.next() {
                            div id=(id) class="chart" {}
                        }
                    }
                    ReportSection::DetailTable(table) => { (detail_view(table)) }
                }
            }
        };

        let document = html! {
            (DOCTYPE)
            html lang="en"
            {
                head
                {
                    meta charset="utf-8";
                    title { (title) }
                    style { (PreEscaped(stylesheet(page_size))) }

                    @if !charts.is_empty() {
                        script src=(ECHARTS_SCRIPT) {}

                        @if let HeadElement::ScriptSource(script) = charts_script(&charts) {
                            script { (script) }
                        }
                    }
                }

                body { (body) }
            }
        };

        Ok(document.into_string().into_bytes())
    }
}

/// One chart per chart section, in section order.
fn report_charts(sections: &[ReportSection]) -> Vec<DashboardChart> {
    sections
        .iter()
        .filter_map(|section| match section {
            ReportSection::PieChart(breakdown) => Some(DashboardChart {
                id: "report-pie-chart",
                options: category_pie_chart("Spending by Category", breakdown).to_string(),
            }),
            ReportSection::BarChart(breakdown) => Some(DashboardChart {
                id: "report-bar-chart",
                options: payment_bar_chart("Spending by Payment Method", breakdown).to_string(),
            }),
            ReportSection::TrendChart(breakdown) => Some(DashboardChart {
                id: "report-trend-chart",
                options: trend_line_chart("Spending Trend", "Total per month", breakdown)
                    .to_string(),
            }),
            _ => None,
        })
        .collect()
}

fn stylesheet(page_size: PageSize) -> String {
    format!(
        "@page {{ size: {width}in {height}in; margin: {margin}in; }}
        body {{ font-family: Helvetica, Arial, sans-serif; font-size: 10pt; color: #212529;
            max-width: {usable}in; margin: 0 auto; }}
        h1 {{ color: #0d6efd; font-size: 20pt; margin-bottom: 4pt; }}
        h2 {{ color: #0d6efd; font-size: 13pt; margin-top: 16pt; }}
        .meta {{ color: #6c757d; margin: 0; }}
        table {{ border-collapse: collapse; width: 100%; margin-bottom: 8pt; }}
        th {{ background: #0d6efd; color: white; text-align: left; padding: 4pt; }}
        td {{ border-bottom: 1px solid #dee2e6; padding: 4pt; }}
        td.amount, th.amount {{ text-align: right; }}
        table.detail {{ table-layout: fixed; font-size: 8pt; }}
        table.detail td {{ overflow: hidden; }}
        .chart {{ width: {usable}in; height: {chart_height}in; margin-bottom: 12pt; }}
        .page-break {{ break-after: page; page-break-after: always; }}",
        width = page_size.width_inches(),
        height = page_size.height_inches(),
        margin = PAGE_MARGIN_INCHES,
        usable = page_size.usable_width_inches(),
        chart_height = CHART_HEIGHT_INCHES,
    )
}

fn title_view(block: &TitleBlock) -> Markup {
    html! {
        header
        {
            h1 { (block.title) }
            p class="meta" { "Generated on " (block.generated_on) }
            p class="meta"
            {
                @match block.date_range {
                    Some((start, end)) => { "Period: " (start) " to " (end) }
                    None => { "Period: no expenses" }
                }
            }
            p class="meta" { "Expenses: " (block.expense_count) }
        }
    }
}

fn summary_view(stats: &SummaryStats) -> Markup {
    let rows = [
        ("Total Expenses", format_currency(stats.total)),
        ("Number of Expenses", stats.count.to_string()),
        ("Average Expense", format_currency(stats.average)),
        ("Largest Expense", format_currency(stats.max)),
        ("Smallest Expense", format_currency(stats.min)),
        ("Reimbursable Total", format_currency(stats.reimbursable_total)),
    ];

    html! {
        section id="summary"
        {
            h2 { "Summary" }
            table
            {
                thead { tr { th { "Metric" } th class="amount" { "Value" } } }
                tbody
                {
                    @for (label, value) in rows {
                        tr { td { (label) } td class="amount" { (value) } }
                    }
                }
            }
        }
    }
}

fn breakdown_view(heading: &str, label_header: &str, rows: &[BreakdownRow]) -> Markup {
    html! {
        section
        {
            h2 { (heading) }
            table
            {
                thead
                {
                    tr
                    {
                        th { (label_header) }
                        th class="amount" { "Amount" }
                        th class="amount" { "Percentage" }
                    }
                }
                tbody
                {
                    @for row in rows {
                        tr
                        {
                            td { (row.label) }
                            td class="amount" { (format_currency(row.amount)) }
                            td class="amount" { (format!("{:.1}%", row.percentage)) }
                        }
                    }
                }
            }
        }
    }
}

fn detail_view(table: &DetailTable) -> Markup {
    html! {
        section id="details"
        {
            h2 { "Expense Details" }
            table class="detail"
            {
                colgroup
                {
                    @for width in &table.widths {
                        col style=(format!("width: {width:.3}in"));
                    }
                }
                thead
                {
                    tr
                    {
                        @for column in &table.columns {
                            th { (column.header()) }
                        }
                    }
                }
                tbody
                {
                    @for row in &table.rows {
                        tr
                        {
                            @for cell in row {
                                td { (cell) }
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
    use time::macros::date;

    use crate::{
        expense::test_records::record,
        report::{
            composer::compose_report,
            config::{PageSize, ReportConfig},
        },
    };

    use super::{DocumentRenderer, HtmlDocumentRenderer};

    fn render(config: &ReportConfig) -> Html {
        let records = [
            record(10.0, date!(2024 - 01 - 02), Some((1, "Food"))),
            record(25.0, date!(2024 - 01 - 01), Some((2, "Travel"))),
        ];
        let sections = compose_report(&records, config);

        let bytes = HtmlDocumentRenderer
            .render(&sections, config.page_size)
            .unwrap();

        Html::parse_document(&String::from_utf8(bytes).unwrap())
    }

    fn count(html: &Html, selector: &str) -> usize {
        html.select(&Selector::parse(selector).unwrap()).count()
    }

    #[test]
    fn renders_every_section() {
        let html = render(&ReportConfig::default());

        assert!(html.errors.is_empty(), "{:?}", html.errors);
        assert_eq!(count(&html, "h1"), 1);
        assert_eq!(count(&html, "#summary"), 1);
        assert_eq!(count(&html, "#report-pie-chart"), 1);
        assert_eq!(count(&html, "#report-bar-chart"), 1);
        assert_eq!(count(&html, "#report-trend-chart"), 1);
        assert_eq!(count(&html, ".page-break"), 2);
        assert_eq!(count(&html, "table.detail tbody tr"), 2);
        assert_eq!(count(&html, "table.detail col"), 5);
    }

    #[test]
    fn page_size_sets_css_page() {
        let html = render(&ReportConfig {
            page_size: PageSize::Legal,
            ..ReportConfig::default()
        })
        .html();

        assert!(html.contains("size: 8.5in 14in"), "{html}");
    }

    #[test]
    fn no_chart_script_without_charts() {
        let html = render(&ReportConfig {
            include_pie_chart: false,
            include_bar_chart: false,
            include_trend_chart: false,
            ..ReportConfig::default()
        });

        assert_eq!(count(&html, "script"), 0);
        assert_eq!(count(&html, ".chart"), 0);
    }

    #[test]
    fn describes_file_type() {
        assert_eq!(HtmlDocumentRenderer.file_extension(), "html");
        assert!(HtmlDocumentRenderer.content_type().starts_with("text/html"));
    }
}
