//! Alert fragments for reporting the outcome of form submissions.
//!
//! Alerts are swapped into the `#alert-container` element of the base page by
//! HTMX, either as the target of an error response or as an out-of-band swap.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// An alert message to display to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with extra details.
    Success { message: String, details: String },
    /// A success message on its own.
    SuccessSimple { message: String },
    /// An error message with extra details.
    Error { message: String, details: String },
    /// An error message on its own.
    ErrorSimple { message: String },
}

impl Alert {
    fn is_error(&self) -> bool {
        matches!(self, Alert::Error { .. } | Alert::ErrorSimple { .. })
    }

    fn message(&self) -> &str {
        match self {
            Alert::Success { message, .. }
            | Alert::SuccessSimple { message }
            | Alert::Error { message, .. }
            | Alert::ErrorSimple { message } => message,
        }
    }

    fn details(&self) -> Option<&str> {
        match self {
            Alert::Success { details, .. } | Alert::Error { details, .. } => Some(details),
            Alert::SuccessSimple { .. } | Alert::ErrorSimple { .. } => None,
        }
    }

    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Html<String> {
        Html(self.view().into_string())
    }

    fn view(&self) -> Markup {
        let container_style = if self.is_error() {
            "flex items-start gap-3 p-4 mb-4 text-sm rounded-lg border \
            text-red-800 bg-red-50 border-red-300 \
            dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        } else {
            "flex items-start gap-3 p-4 mb-4 text-sm rounded-lg border \
            text-green-800 bg-green-50 border-green-300 \
            dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        };

        html! {
            div
                role="alert"
                class=(container_style)
                hx-swap-oob="innerHTML:#alert-container"
            {
                div class="flex-1"
                {
                    p class="font-medium" { (self.message()) }

                    @if let Some(details) = self.details() {
                        @if !details.is_empty() {
                            span { (details) }
                        }
                    }
                }

                button
                    type="button"
                    aria-label="Close"
                    class="ms-auto font-bold"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn error_alert_shows_message_and_details() {
        let alert = Alert::Error {
            message: "Could not save".to_owned(),
            details: "Try again".to_owned(),
        };

        let html = Html::parse_fragment(&alert.into_html().0);

        let p = Selector::parse("p").unwrap();
        let span = Selector::parse("span").unwrap();
        assert_eq!(
            html.select(&p).next().unwrap().text().collect::<String>(),
            "Could not save"
        );
        assert_eq!(
            html.select(&span).next().unwrap().text().collect::<String>(),
            "Try again"
        );
    }

    #[test]
    fn simple_alert_has_no_details() {
        let alert = Alert::SuccessSimple {
            message: "Saved".to_owned(),
        };

        let html = Html::parse_fragment(&alert.into_html().0);

        let span = Selector::parse("span").unwrap();
        assert!(html.select(&span).next().is_none());
    }
}
