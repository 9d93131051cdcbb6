use axum::response::Response;
use scraper::{Html, Selector};

async fn response_text(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");

    String::from_utf8_lossy(&body).into_owned()
}

pub(crate) async fn parse_html_document(response: Response) -> Html {
    Html::parse_document(&response_text(response).await)
}

pub(crate) async fn parse_html_fragment(response: Response) -> Html {
    Html::parse_fragment(&response_text(response).await)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

fn alert_text(html: &Html, selector: &str) -> Option<String> {
    html.select(&Selector::parse(selector).unwrap())
        .next()
        .map(|element| element.text().collect::<String>().trim().to_owned())
}

/// Assert that `html` is a valid alert fragment with the message
/// `want_message` and, if given, the details `want_details`.
#[track_caller]
pub(crate) fn assert_alert(html: &Html, want_message: &str, want_details: Option<&str>) {
    assert_valid_html(html);

    let message = alert_text(html, "[role=alert] p.font-medium").expect("No alert message found");
    assert_eq!(message, want_message);

    if let Some(want_details) = want_details {
        let details = alert_text(html, "[role=alert] span").expect("No alert details found");
        assert_eq!(details, want_details);
    }
}
