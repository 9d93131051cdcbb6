//! The navigation bar shown at the top of every page.

use maud::{Markup, html};

use crate::endpoints;

/// A link in the navigation bar.
///
/// Only one link should be marked as current at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm lg:bg-transparent \
            lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100 \
            lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0 \
            dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700 \
            dark:hover:text-white lg:dark:hover:bg-transparent"
        };

        html!(
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar with the link for `active_endpoint` highlighted.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let links = [
            (endpoints::DASHBOARD_VIEW, "Dashboard"),
            (endpoints::EXPENSES_VIEW, "Expenses"),
            (endpoints::NEW_EXPENSE_VIEW, "Add Expense"),
            (endpoints::REPORT_VIEW, "Report"),
            (endpoints::IMPORT_VIEW, "Import"),
            (endpoints::SETTINGS_VIEW, "Settings"),
        ]
        .into_iter()
        .map(|(url, title)| Link {
            url,
            title,
            is_current: active_endpoint == url,
        })
        .collect();

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a href=(endpoints::ROOT) class="flex items-center space-x-3"
                    {
                        span
                            class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "Expense Tracker"
                        }
                    }

                    ul
                        class="font-medium flex flex-wrap gap-4 p-4 lg:p-0 mt-4
                        lg:flex-row lg:space-x-8 lg:mt-0"
                    {
                        @for link in self.links {
                            li { (link.into_html()) }
                        }
                    }
                }
            }
        )
    }
}
