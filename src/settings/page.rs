//! The settings page for appearance, categories and payment methods.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, get_all_categories},
    endpoints::{self, format_endpoint},
    html::{
        BADGE_STYLE, BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, HeadElement, PAGE_CONTAINER_STYLE, accent_style, base,
    },
    navigation::NavBar,
    payment_method::{PaymentMethod, get_all_payment_methods},
    settings::{ColorScheme, DefaultView, Settings, get_settings},
};

/// The accent style for the saved colour scheme.
///
/// Falls back to the default scheme if the settings cannot be read so that
/// pages still render.
pub fn saved_accent_style(connection: &Connection) -> HeadElement {
    let color_scheme = match get_settings(connection) {
        Ok(settings) => settings.color_scheme,
        Err(error) => {
            tracing::warn!("Could not read settings, using the default colour scheme: {error}");
            ColorScheme::default()
        }
    };

    accent_style(color_scheme.accent_hex())
}

/// The state needed for the settings page.
#[derive(Debug, Clone)]
pub struct SettingsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettingsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the settings page.
pub async fn get_settings_page(State(state): State<SettingsPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let settings = get_settings(&connection)
        .inspect_err(|error| tracing::error!("Could not get settings: {error}"))?;
    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Could not get categories: {error}"))?;
    let payment_methods = get_all_payment_methods(&connection)
        .inspect_err(|error| tracing::error!("Could not get payment methods: {error}"))?;

    Ok(settings_view(settings, &categories, &payment_methods).into_response())
}

fn settings_view(
    settings: Settings,
    categories: &[Category],
    payment_methods: &[PaymentMethod],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::SETTINGS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-4xl space-y-6"
            {
                h1 class="text-2xl font-bold" { "Settings" }

                (appearance_card(settings))
                (categories_card(categories))
                (payment_methods_card(payment_methods))
            }
        }
    };

    base(
        "Settings",
        &[accent_style(settings.color_scheme.accent_hex())],
        &content,
    )
}

fn appearance_card(settings: Settings) -> Markup {
    html! {
        section class=(CARD_STYLE)
        {
            h2 class="text-xl font-semibold mb-4" { "Appearance" }

            form
                id="settings-form"
                hx-post=(endpoints::SETTINGS_API)
                hx-target-error="#alert-container"
                class="space-y-4"
            {
                div
                {
                    label for="color_scheme" class=(FORM_LABEL_STYLE) { "Color scheme" }

                    select name="color_scheme" id="color_scheme" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for scheme in ColorScheme::ALL {
                            option value=(scheme.as_str()) selected[scheme == settings.color_scheme]
                            {
                                (scheme.label())
                            }
                        }
                    }
                }

                div
                {
                    label for="default_view" class=(FORM_LABEL_STYLE) { "Default view" }

                    select name="default_view" id="default_view" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for view in DefaultView::ALL {
                            option value=(view.as_str()) selected[view == settings.default_view]
                            {
                                (view.label())
                            }
                        }
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Settings" }
            }
        }
    }
}

fn categories_card(categories: &[Category]) -> Markup {
    html! {
        section class=(CARD_STYLE)
        {
            h2 class="text-xl font-semibold mb-4" { "Categories" }

            ul id="category-list" class="divide-y divide-gray-200 dark:divide-gray-700 mb-4"
            {
                @for category in categories {
                    li class="flex items-center justify-between py-2"
                    {
                        span class="flex items-center gap-2"
                        {
                            span
                                class="inline-block w-3 h-3 rounded-full"
                                style={ "background-color: " (category.color) } {}
                            (category.name)
                            @if category.is_default {
                                span class=(BADGE_STYLE) { "Default" }
                            }
                        }

                        @if !category.is_default {
                            button
                                hx-delete=(format_endpoint(endpoints::CATEGORY, category.id))
                                hx-confirm={ "Delete the category " (category.name) "? Expenses in this category will become uncategorized." }
                                hx-target="closest li"
                                hx-swap="delete"
                                hx-target-error="#alert-container"
                                class=(BUTTON_DELETE_STYLE)
                            {
                                "Delete"
                            }
                        }
                    }
                }
            }

            form
                id="category-form"
                hx-post=(endpoints::CATEGORIES_API)
                hx-target-error="#alert-container"
                class="grid grid-cols-1 md:grid-cols-2 gap-4"
            {
                div
                {
                    label for="category-name" class=(FORM_LABEL_STYLE) { "Name" }
                    input
                        name="name"
                        id="category-name"
                        type="text"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="category-description" class=(FORM_LABEL_STYLE) { "Description" }
                    input
                        name="description"
                        id="category-description"
                        type="text"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="category-color" class=(FORM_LABEL_STYLE) { "Color" }
                    input
                        name="color"
                        id="category-color"
                        type="color"
                        value="#0d6efd"
                        class="h-10 w-full";
                }

                div
                {
                    label for="category-icon" class=(FORM_LABEL_STYLE) { "Icon" }
                    input
                        name="icon"
                        id="category-icon"
                        type="text"
                        placeholder="fa-tag"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="md:col-span-2"
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Category" }
                }
            }
        }
    }
}

fn payment_methods_card(payment_methods: &[PaymentMethod]) -> Markup {
    html! {
        section class=(CARD_STYLE)
        {
            h2 class="text-xl font-semibold mb-4" { "Payment Methods" }

            ul id="payment-method-list" class="divide-y divide-gray-200 dark:divide-gray-700 mb-4"
            {
                @for payment_method in payment_methods {
                    li class="flex items-center justify-between py-2"
                    {
                        span class="flex items-center gap-2"
                        {
                            (payment_method.name)
                            @if payment_method.is_default {
                                span class=(BADGE_STYLE) { "Default" }
                            }
                        }

                        @if !payment_method.is_default {
                            button
                                hx-delete=(format_endpoint(endpoints::PAYMENT_METHOD, payment_method.id))
                                hx-confirm={ "Delete the payment method " (payment_method.name) "?" }
                                hx-target="closest li"
                                hx-swap="delete"
                                hx-target-error="#alert-container"
                                class=(BUTTON_DELETE_STYLE)
                            {
                                "Delete"
                            }
                        }
                    }
                }
            }

            form
                id="payment-method-form"
                hx-post=(endpoints::PAYMENT_METHODS_API)
                hx-target-error="#alert-container"
                class="grid grid-cols-1 md:grid-cols-2 gap-4"
            {
                div
                {
                    label for="payment-method-name" class=(FORM_LABEL_STYLE) { "Name" }
                    input
                        name="name"
                        id="payment-method-name"
                        type="text"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="payment-method-icon" class=(FORM_LABEL_STYLE) { "Icon" }
                    input
                        name="icon"
                        id="payment-method-icon"
                        type="text"
                        placeholder="fa-credit-card"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="md:col-span-2"
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Payment Method" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use scraper::Selector;

    use axum::extract::State;

    use crate::{
        endpoints,
        test_utils::{
            assert_hx_endpoint, assert_status_ok, assert_valid_html, must_open_db,
            parse_html_document,
        },
    };

    use super::{SettingsPageState, get_settings_page};

    fn get_state() -> SettingsPageState {
        let connection = must_open_db();

        SettingsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn renders_forms() {
        let response = get_settings_page(State(get_state())).await.unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form_selector = Selector::parse("form").unwrap();
        let forms: Vec<_> = document.select(&form_selector).collect();
        assert_eq!(forms.len(), 3, "want 3 forms, got {}", forms.len());
        assert_hx_endpoint(&forms[0], endpoints::SETTINGS_API, "hx-post");
        assert_hx_endpoint(&forms[1], endpoints::CATEGORIES_API, "hx-post");
        assert_hx_endpoint(&forms[2], endpoints::PAYMENT_METHODS_API, "hx-post");
    }

    #[tokio::test]
    async fn default_entities_have_no_delete_button() {
        let response = get_settings_page(State(get_state())).await.unwrap();

        let document = parse_html_document(response).await;
        let delete_buttons = Selector::parse("button[hx-delete]").unwrap();
        assert_eq!(document.select(&delete_buttons).count(), 0);
        let items = Selector::parse("#category-list li").unwrap();
        assert_eq!(document.select(&items).count(), 10);
    }
}
