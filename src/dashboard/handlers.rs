//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for the dashboard page and the expense data API
//! - HTML view functions for rendering the dashboard UI
//! - The cached aggregation shared by both handlers

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Serialize;
use time::Date;

use crate::{
    AppState, Error,
    aggregate::{AggregateResult, Breakdown, ReimbursementSummary, aggregate},
    app_state::SharedResultCache,
    cache::{cache_key, get_or_compute},
    dashboard::{
        cards::summary_cards_view,
        charts::{
            DashboardChart, category_pie_chart, charts_script, payment_bar_chart,
            trend_line_chart,
        },
        tables::top_categories_table,
    },
    endpoints,
    filter::{FilterQuery, FilterSpec, TimeWindow, get_filtered_records},
    html::{ECHARTS_SCRIPT, HeadElement, base, link},
    navigation::NavBar,
    settings::saved_accent_style,
    timezone::local_today,
};

/// The logical endpoint name used in cache keys for aggregated expense data.
const EXPENSE_DATA_CACHE_NAME: &str = "expense_data";

/// The state needed for the dashboard and the expense data API.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// Aggregates from earlier requests.
    pub result_cache: SharedResultCache,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            result_cache: state.result_cache.clone(),
        }
    }
}

/// The JSON body of the expense data API.
///
/// The chart series are `categories`, `payment_methods` and `daily_trend`, each
/// serialized as `{"labels": [...], "data": [...]}`. The summary figures ride
/// alongside them.
#[derive(Debug, Serialize)]
struct ExpenseData<'a> {
    categories: &'a Breakdown,
    payment_methods: &'a Breakdown,
    daily_trend: &'a Breakdown,
    monthly_trend: &'a Breakdown,
    period: &'static str,
    total: f64,
    count: usize,
    average: f64,
    min: f64,
    max: f64,
    reimbursement: &'a ReimbursementSummary,
}

impl<'a> ExpenseData<'a> {
    fn new(window: TimeWindow, result: &'a AggregateResult) -> Self {
        Self {
            categories: &result.by_category,
            payment_methods: &result.by_payment_method,
            daily_trend: &result.by_day,
            monthly_trend: &result.by_month,
            period: window.as_str(),
            total: result.total,
            count: result.count,
            average: result.average,
            min: result.min,
            max: result.max,
            reimbursement: &result.reimbursement,
        }
    }
}

/// Display a page with an overview of the expenses in the selected period.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let spec = query.to_spec();
    let window = query.window();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let result = cached_aggregate(&state.result_cache, &spec, window, today, &connection)?;
    let accent = saved_accent_style(&connection);

    if result.count == 0 {
        return Ok(dashboard_no_data_view(window, accent).into_response());
    }

    let charts = build_dashboard_charts(&result);

    Ok(dashboard_view(window, &result, &charts, accent).into_response())
}

/// Return the aggregated expense data for the filter in the query string as JSON.
pub async fn get_expense_data(
    State(state): State<DashboardState>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let spec = query.to_spec();
    let window = query.window();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let result = cached_aggregate(&state.result_cache, &spec, window, today, &connection)?;

    Ok(Json(ExpenseData::new(window, &result)).into_response())
}

/// Aggregate the records matching `spec` within `window`, reusing a cached
/// result for the same parameters if one is still fresh.
fn cached_aggregate(
    cache: &SharedResultCache,
    spec: &FilterSpec,
    window: TimeWindow,
    today: Date,
    connection: &Connection,
) -> Result<AggregateResult, Error> {
    let mut params = spec.cache_params();
    params.push(("period", window.as_str().to_owned()));
    params.push(("today", today.to_string()));
    let key = cache_key(EXPENSE_DATA_CACHE_NAME, &params);

    get_or_compute(cache, &key, || {
        let records = get_filtered_records(spec, Some(window), today, connection)
            .inspect_err(|error| tracing::error!("Could not get expenses: {error}"))?;

        Ok(aggregate(&records))
    })
}

/// Creates the dashboard charts from the aggregated data.
///
/// Charts whose data is empty are left out.
fn build_dashboard_charts(result: &AggregateResult) -> Vec<DashboardChart> {
    let mut charts = Vec::with_capacity(3);

    if !result.by_category.is_empty() {
        charts.push(DashboardChart {
            id: "category-chart",
            options: category_pie_chart("Spending by Category", &result.by_category).to_string(),
        });
    }

    if !result.by_payment_method.is_empty() {
        charts.push(DashboardChart {
            id: "payment-method-chart",
            options: payment_bar_chart("Spending by Payment Method", &result.by_payment_method)
                .to_string(),
        });
    }

    if !result.by_day.is_empty() {
        charts.push(DashboardChart {
            id: "daily-trend-chart",
            options: trend_line_chart("Daily Spending", "Total per day", &result.by_day)
                .to_string(),
        });
    }

    charts
}

fn period_selector(selected: TimeWindow) -> Markup {
    html! {
        nav aria-label="Period" class="flex gap-2 mb-6"
        {
            @for window in TimeWindow::ALL {
                @let is_selected = window == selected;
                a
                    href={ (endpoints::DASHBOARD_VIEW) "?period=" (window.as_str()) }
                    aria-current=[is_selected.then_some("page")]
                    class=(if is_selected {
                        "px-3 py-1 rounded bg-blue-600 text-white"
                    } else {
                        "px-3 py-1 rounded bg-gray-100 dark:bg-gray-700 hover:bg-gray-200"
                    })
                {
                    (window.label())
                }
            }
        }
    }
}

/// Renders the dashboard when no expenses fall in the selected period.
fn dashboard_no_data_view(window: TimeWindow, accent: HeadElement) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let new_expense_link = link(endpoints::NEW_EXPENSE_VIEW, "manually");
    let import_link = link(endpoints::IMPORT_VIEW, "importing");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            (period_selector(window))

            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Charts will show up here once you add some expenses.
                You can add expenses " (new_expense_link) " or
                by " (import_link) "."
            }
        }
    );

    base("Dashboard", &[accent], &content)
}

/// Renders the main dashboard page with summary cards, charts and tables.
fn dashboard_view(
    window: TimeWindow,
    result: &AggregateResult,
    charts: &[DashboardChart],
    accent: HeadElement,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (period_selector(window))

            (summary_cards_view(result))

            section
                id="charts"
                class="w-full mx-auto mb-4"
            {
                div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                {
                    @for chart in charts {
                        div
                            id=(chart.id)
                            class="min-h-[380px] rounded dark:bg-gray-100"
                        {}
                    }

                    (top_categories_table(result))
                }
            }
        }
    );

    let head_elements = [
        accent,
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(charts),
    ];

    base("Dashboard", &head_elements, &content)
}
