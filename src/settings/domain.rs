//! Typed application settings.

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::endpoints;

/// The accent colour used across the app.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Default,
    Dark,
    Green,
    Purple,
    Orange,
    Teal,
    Red,
    Pink,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 8] = [
        ColorScheme::Default,
        ColorScheme::Dark,
        ColorScheme::Green,
        ColorScheme::Purple,
        ColorScheme::Orange,
        ColorScheme::Teal,
        ColorScheme::Red,
        ColorScheme::Pink,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColorScheme::Default => "default",
            ColorScheme::Dark => "dark",
            ColorScheme::Green => "green",
            ColorScheme::Purple => "purple",
            ColorScheme::Orange => "orange",
            ColorScheme::Teal => "teal",
            ColorScheme::Red => "red",
            ColorScheme::Pink => "pink",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        ColorScheme::ALL
            .into_iter()
            .find(|scheme| scheme.as_str() == text.trim().to_lowercase())
    }

    pub fn label(self) -> &'static str {
        match self {
            ColorScheme::Default => "Default (Blue)",
            ColorScheme::Dark => "Dark",
            ColorScheme::Green => "Green",
            ColorScheme::Purple => "Purple",
            ColorScheme::Orange => "Orange",
            ColorScheme::Teal => "Teal",
            ColorScheme::Red => "Red",
            ColorScheme::Pink => "Pink",
        }
    }

    /// The hex colour for headings, the navigation bar and charts.
    pub fn accent_hex(self) -> &'static str {
        match self {
            ColorScheme::Default => "#0d6efd",
            ColorScheme::Dark => "#212529",
            ColorScheme::Green => "#198754",
            ColorScheme::Purple => "#6f42c1",
            ColorScheme::Orange => "#fd7e14",
            ColorScheme::Teal => "#20c997",
            ColorScheme::Red => "#dc3545",
            ColorScheme::Pink => "#d63384",
        }
    }
}

/// The page shown when visiting the root URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultView {
    #[default]
    List,
    Grid,
    Dashboard,
}

impl DefaultView {
    pub const ALL: [DefaultView; 3] = [DefaultView::List, DefaultView::Grid, DefaultView::Dashboard];

    pub fn as_str(self) -> &'static str {
        match self {
            DefaultView::List => "list",
            DefaultView::Grid => "grid",
            DefaultView::Dashboard => "dashboard",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        DefaultView::ALL
            .into_iter()
            .find(|view| view.as_str() == text.trim().to_lowercase())
    }

    pub fn label(self) -> &'static str {
        match self {
            DefaultView::List => "Expense list",
            DefaultView::Grid => "Expense grid",
            DefaultView::Dashboard => "Dashboard",
        }
    }

    /// The URL the root path redirects to.
    pub fn url(self) -> String {
        match self {
            DefaultView::List => endpoints::EXPENSES_VIEW.to_owned(),
            DefaultView::Grid => format!("{}?view=grid", endpoints::EXPENSES_VIEW),
            DefaultView::Dashboard => endpoints::DASHBOARD_VIEW.to_owned(),
        }
    }
}

macro_rules! impl_text_sql {
    ($type:ty, $name:literal) => {
        impl ToSql for $type {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $type {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let text = value.as_str()?;

                <$type>::parse(text)
                    .ok_or_else(|| FromSqlError::Other(format!("unknown {} {text}", $name).into()))
            }
        }
    };
}

impl_text_sql!(ColorScheme, "color scheme");
impl_text_sql!(DefaultView, "default view");

/// User preferences for how the app looks and where it opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub color_scheme: ColorScheme,
    pub default_view: DefaultView,
}

#[cfg(test)]
mod tests {
    use super::{ColorScheme, DefaultView};

    #[test]
    fn color_scheme_parses_every_variant() {
        for scheme in ColorScheme::ALL {
            assert_eq!(ColorScheme::parse(scheme.as_str()), Some(scheme));
        }
        assert_eq!(ColorScheme::parse("Teal"), Some(ColorScheme::Teal));
        assert_eq!(ColorScheme::parse("rainbow"), None);
    }

    #[test]
    fn default_view_urls() {
        assert_eq!(DefaultView::List.url(), "/expenses");
        assert_eq!(DefaultView::Grid.url(), "/expenses?view=grid");
        assert_eq!(DefaultView::Dashboard.url(), "/dashboard");
    }
}
