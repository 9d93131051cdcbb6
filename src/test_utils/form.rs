use scraper::{ElementRef, Selector};

#[track_caller]
pub(crate) fn must_get_form(html: &scraper::Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("No form found")
}

/// Assert that `form` sends its request to `endpoint` with the HTMX verb
/// `attribute`, e.g. "hx-post" or "hx-put".
#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    assert_eq!(
        form.value().attr(attribute),
        Some(endpoint),
        "want form with {attribute}=\"{endpoint}\""
    );
}

#[track_caller]
fn must_get_input<'a>(form: &ElementRef<'a>, name: &str) -> ElementRef<'a> {
    let selector = Selector::parse(&format!("input[name='{name}']")).unwrap();

    form.select(&selector)
        .next()
        .unwrap_or_else(|| panic!("No input found with name \"{name}\""))
}

/// Assert that `form` has a required input called `name` of type `type_`.
#[track_caller]
pub(crate) fn assert_required_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    let input = must_get_input(form, name);

    assert_eq!(
        input.value().attr("type"),
        Some(type_),
        "want input {name} with type \"{type_}\""
    );
    assert!(
        input.value().attr("required").is_some(),
        "want input {name} to be required"
    );
}

/// Assert that the required input `name` is prefilled with `value`.
#[track_caller]
pub(crate) fn assert_input_value(form: &ElementRef<'_>, name: &str, type_: &str, value: &str) {
    assert_required_input(form, name, type_);

    let input = must_get_input(form, name);
    assert_eq!(
        input.value().attr("value"),
        Some(value),
        "want input {name} with value \"{value}\""
    );
}

#[track_caller]
pub(crate) fn assert_submit_button(form: &ElementRef<'_>) {
    let selector = Selector::parse("button[type=submit]").unwrap();

    assert!(
        form.select(&selector).next().is_some(),
        "No submit button found"
    );
}
