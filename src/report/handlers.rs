//! The report builder page and the endpoint that generates report documents.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::get_all_categories,
    endpoints,
    filter::{FilterQuery, FilterSpec, filter_form_fields, get_filtered_records},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CHECKBOX_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, HeadElement, base,
    },
    navigation::NavBar,
    payment_method::get_all_payment_methods,
    report::{
        composer::compose_report,
        config::{DEFAULT_REPORT_TITLE, PageSize, ReportConfig, ReportOptionsQuery},
        render::{DocumentRenderer, HtmlDocumentRenderer},
    },
    settings::saved_accent_style,
    timezone::{dated_file_name, local_today},
};

/// The state needed for building reports.
#[derive(Debug, Clone)]
pub struct ReportState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the form for choosing the expenses and sections of a report.
pub async fn get_report_page(State(state): State<ReportState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)?;
    let payment_methods = get_all_payment_methods(&connection)?;
    let accent = saved_accent_style(&connection);

    let filter_fields = filter_form_fields(&FilterSpec::default(), &categories, &payment_methods);

    Ok(report_builder_view(filter_fields, &ReportConfig::default(), accent).into_response())
}

/// Generate a report on the expenses matching the query string.
///
/// The time window from `period` is only applied when `period` is given.
pub async fn get_report(
    State(state): State<ReportState>,
    Query(filter_query): Query<FilterQuery>,
    Query(options): Query<ReportOptionsQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let spec = filter_query.to_spec();
    let window = filter_query.period.is_some().then(|| filter_query.window());
    let config = options.to_config(today);

    let records = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_filtered_records(&spec, window, today, &connection)
            .inspect_err(|error| tracing::error!("Could not get expenses for report: {error}"))?
    };

    let sections = compose_report(&records, &config);
    tracing::debug!(
        "composed report with {} sections from {} expenses",
        sections.len(),
        records.len()
    );

    let renderer = HtmlDocumentRenderer;
    let document = renderer
        .render(&sections, config.page_size)
        .inspect_err(|error| tracing::error!("Could not render report: {error}"))?;

    let file_name = dated_file_name("expense_report", today, renderer.file_extension());

    Ok((
        [
            (CONTENT_TYPE, renderer.content_type().to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("inline; filename=\"{file_name}\""),
            ),
        ],
        document,
    )
        .into_response())
}

fn section_checkbox(name: &str, label: &str, checked: bool) -> Markup {
    html! {
        label class="flex items-center gap-2"
        {
            input type="checkbox" name=(name) value="on" checked[checked] class=(FORM_CHECKBOX_STYLE);
            span class="text-sm" { (label) }
        }
    }
}

fn report_builder_view(
    filter_fields: Markup,
    defaults: &ReportConfig,
    accent: HeadElement,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::REPORT_VIEW).into_html();

    let sections = [
        ("include_summary", "Summary statistics", defaults.include_summary),
        (
            "include_category_breakdown",
            "Category breakdown",
            defaults.include_category_breakdown,
        ),
        (
            "include_payment_breakdown",
            "Payment method breakdown",
            defaults.include_payment_breakdown,
        ),
        ("include_monthly_trend", "Monthly trend", defaults.include_monthly_trend),
        ("include_pie_chart", "Category pie chart", defaults.include_pie_chart),
        ("include_bar_chart", "Payment method bar chart", defaults.include_bar_chart),
        ("include_trend_chart", "Spending trend chart", defaults.include_trend_chart),
        ("include_detail_table", "Detailed expense table", defaults.include_detail_table),
    ];
    let detail_columns = [
        ("include_descriptions", "Descriptions", defaults.include_descriptions),
        ("include_locations", "Locations", defaults.include_locations),
        ("include_notes", "Notes", defaults.include_notes),
    ];

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full max-w-2xl space-y-4"
            {
                h1 class="text-2xl font-bold" { "Generate Report" }

                form
                    method="get"
                    action=(endpoints::REPORT_API)
                    target="_blank"
                    class="space-y-6"
                {
                    input type="hidden" name="options" value="1";

                    div
                    {
                        label for="title" class=(FORM_LABEL_STYLE) { "Report title" }
                        input
                            id="title"
                            name="title"
                            type="text"
                            value=(DEFAULT_REPORT_TITLE)
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="page_size" class=(FORM_LABEL_STYLE) { "Page size" }
                        select id="page_size" name="page_size" class=(FORM_TEXT_INPUT_STYLE)
                        {
                            @for size in PageSize::ALL {
                                option value=(size.as_str()) selected[size == defaults.page_size]
                                {
                                    (size.label())
                                }
                            }
                        }
                    }

                    fieldset class="space-y-2"
                    {
                        legend class=(FORM_LABEL_STYLE) { "Expenses" }
                        (filter_fields)
                    }

                    fieldset class="grid grid-cols-2 gap-2"
                    {
                        legend class=(FORM_LABEL_STYLE) { "Sections" }
                        @for (name, label, checked) in sections {
                            (section_checkbox(name, label, checked))
                        }
                    }

                    fieldset class="flex gap-4"
                    {
                        legend class=(FORM_LABEL_STYLE) { "Detail table columns" }
                        @for (name, label, checked) in detail_columns {
                            (section_checkbox(name, label, checked))
                        }
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Generate Report" }
                }
            }
        }
    };

    base("Report", &[accent], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum_extra::extract::Query;
    use scraper::{Html, Selector};
    use time::OffsetDateTime;

    use crate::{
        expense::{Expense, create_expense},
        filter::FilterQuery,
        report::config::ReportOptionsQuery,
        test_utils::{
            assert_content_type, assert_status_ok, assert_valid_html, get_header, must_get_form,
            must_open_db, parse_html_document,
        },
        timezone::dated_file_name,
    };

    use super::{ReportState, get_report, get_report_page};

    fn get_state() -> ReportState {
        let connection = must_open_db();

        let today = OffsetDateTime::now_utc().date();
        create_expense(
            Expense::build(299.99, today, "Moving Truck Rental").category_id(Some(3)),
            &connection,
        )
        .unwrap();
        create_expense(Expense::build(125.0, today, "Hotel Stay"), &connection).unwrap();

        ReportState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn report_page_has_builder_form() {
        let response = get_report_page(State(get_state())).await.unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_eq!(form.value().attr("action"), Some("/api/report"));
        for (name, type_) in [
            ("title", "text"),
            ("include_summary", "checkbox"),
            ("include_notes", "checkbox"),
            ("start_date", "date"),
        ] {
            let selector = Selector::parse(&format!("input[name={name}][type={type_}]")).unwrap();
            assert!(
                form.select(&selector).next().is_some(),
                "missing {type_} input {name}"
            );
        }
    }

    #[tokio::test]
    async fn report_is_a_named_html_document() {
        let response = get_report(
            State(get_state()),
            Query(FilterQuery::default()),
            Query(ReportOptionsQuery::default()),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let want_file_name =
            dated_file_name("expense_report", OffsetDateTime::now_utc().date(), "html");
        assert!(get_header(&response, "content-disposition").contains(&want_file_name));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let document = Html::parse_document(&String::from_utf8(body.to_vec()).unwrap());
        let rows = Selector::parse("table.detail tbody tr").unwrap();
        assert_eq!(document.select(&rows).count(), 2);
    }

    #[tokio::test]
    async fn report_respects_filter() {
        let query = FilterQuery {
            min_amount: Some("200".to_owned()),
            ..FilterQuery::default()
        };

        let response = get_report(
            State(get_state()),
            Query(query),
            Query(ReportOptionsQuery::default()),
        )
        .await
        .unwrap();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("Moving Truck Rental"));
        assert!(!text.contains("Hotel Stay"));
    }
}
