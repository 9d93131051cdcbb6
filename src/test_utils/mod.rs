//! Helpers shared by the handler and page tests.

#![allow(missing_docs)]

pub(crate) mod db;
pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use db::must_open_db;
pub(crate) use form::{
    assert_hx_endpoint, assert_input_value, assert_required_input, assert_submit_button,
    must_get_form,
};
pub(crate) use html::{assert_alert, assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::{assert_content_type, assert_hx_redirect, assert_status_ok, get_header};
