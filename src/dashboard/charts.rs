//! ECharts configurations for breakdowns of expenses.
//!
//! The same charts are used by the dashboard and by generated reports:
//! - **Category pie**: share of spending per category
//! - **Payment bar**: spending per payment method, largest first
//! - **Trend line**: spending over time, e.g. per day or per month

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Emphasis, JsFunction, Tooltip,
        Trigger,
    },
    series::{Line, Pie, bar},
};
use maud::PreEscaped;

use crate::{aggregate::Breakdown, html::HeadElement};

/// A chart with its HTML container ID and ECharts configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Generates JavaScript that initializes an ECharts instance for each chart.
///
/// Charts follow the system colour scheme and resize with the window.
pub(crate) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    if (!chartDom) {{ return; }}
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A doughnut chart of `breakdown`, one slice per label.
pub(crate) fn category_pie_chart(title: &str, breakdown: &Breakdown) -> Chart {
    let data: Vec<(f64, &str)> = breakdown
        .entries()
        .iter()
        .map(|(label, value)| (*value, label.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text(title).left("center"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().left("left").top(40))
        .series(Pie::new().name(title).radius(vec!["40%", "70%"]).data(data))
}

/// A bar chart of `breakdown` sorted by descending value.
pub(crate) fn payment_bar_chart(title: &str, breakdown: &Breakdown) -> Chart {
    let sorted = breakdown.sorted_descending();

    Chart::new()
        .title(Title::new().text(title))
        .tooltip(currency_tooltip())
        .grid(default_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(sorted.labels()))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            bar::Bar::new()
                .name("Amount")
                .emphasis(Emphasis::new())
                .data(sorted.values()),
        )
}

/// A line chart of `breakdown` in its existing (chronological) order.
pub(crate) fn trend_line_chart(title: &str, subtitle: &str, breakdown: &Breakdown) -> Chart {
    Chart::new()
        .title(Title::new().text(title).subtext(subtitle))
        .tooltip(currency_tooltip())
        .grid(default_grid())
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(breakdown.labels()),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Amount").data(breakdown.values()))
}

fn default_grid() -> Grid {
    Grid::new()
        .left("3%")
        .right("4%")
        .bottom("3%")
        .top(70)
        .contain_label(true)
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
