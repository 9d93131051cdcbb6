use axum::{http::StatusCode, response::Response};

#[track_caller]
pub(crate) fn assert_status_ok(response: &Response) {
    assert_eq!(response.status(), StatusCode::OK);
}

#[track_caller]
pub(crate) fn get_header(response: &Response, header_name: &str) -> String {
    response
        .headers()
        .get(header_name)
        .unwrap_or_else(|| panic!("Headers missing {header_name}"))
        .to_str()
        .expect("Could not convert header to str")
        .to_owned()
}

#[track_caller]
pub(crate) fn assert_content_type(response: &Response, content_type: &str) {
    assert_eq!(get_header(response, "content-type"), content_type);
}

/// Assert that HTMX is told to navigate to `endpoint`.
#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response, endpoint: &str) {
    assert_eq!(get_header(response, "hx-redirect"), endpoint);
}
