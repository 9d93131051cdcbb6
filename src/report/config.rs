//! Options controlling which sections a report contains and how it is laid out.

use serde::Deserialize;
use time::{Date, OffsetDateTime};

/// The margin on every side of a page, in inches.
pub const PAGE_MARGIN_INCHES: f64 = 0.5;

/// The title used when none is given.
pub const DEFAULT_REPORT_TITLE: &str = "Expense Report";

/// The supported physical page sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageSize {
    /// US Letter, 8.5 x 11 inches.
    #[default]
    Letter,
    /// US Legal, 8.5 x 14 inches.
    Legal,
    /// ISO A4, 8.27 x 11.69 inches.
    A4,
}

impl PageSize {
    pub const ALL: [PageSize; 3] = [PageSize::Letter, PageSize::Legal, PageSize::A4];

    pub fn width_inches(self) -> f64 {
        match self {
            PageSize::Letter | PageSize::Legal => 8.5,
            PageSize::A4 => 8.27,
        }
    }

    pub fn height_inches(self) -> f64 {
        match self {
            PageSize::Letter => 11.0,
            PageSize::Legal => 14.0,
            PageSize::A4 => 11.69,
        }
    }

    /// The width left for content once the left and right margins are removed.
    pub fn usable_width_inches(self) -> f64 {
        self.width_inches() - 2.0 * PAGE_MARGIN_INCHES
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PageSize::Letter => "letter",
            PageSize::Legal => "legal",
            PageSize::A4 => "a4",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PageSize::Letter => "Letter (8.5 x 11 in)",
            PageSize::Legal => "Legal (8.5 x 14 in)",
            PageSize::A4 => "A4 (210 x 297 mm)",
        }
    }

    /// Case-insensitive lookup of a page size by name, [PageSize::Letter] if unknown.
    pub fn parse(text: Option<&str>) -> Self {
        let Some(text) = text else {
            return PageSize::default();
        };

        PageSize::ALL
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(text.trim()))
            .unwrap_or_default()
    }
}

/// Which sections and detail columns to include in a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub title: String,
    pub page_size: PageSize,
    /// The date shown as the generation date.
    pub generated_on: Date,
    pub include_summary: bool,
    pub include_category_breakdown: bool,
    pub include_payment_breakdown: bool,
    pub include_monthly_trend: bool,
    pub include_pie_chart: bool,
    pub include_bar_chart: bool,
    pub include_trend_chart: bool,
    pub include_detail_table: bool,
    pub include_descriptions: bool,
    pub include_notes: bool,
    pub include_locations: bool,
}

impl Default for ReportConfig {
    /// Every section, no optional detail columns, Letter paper.
    fn default() -> Self {
        Self {
            title: DEFAULT_REPORT_TITLE.to_owned(),
            page_size: PageSize::default(),
            generated_on: OffsetDateTime::now_utc().date(),
            include_summary: true,
            include_category_breakdown: true,
            include_payment_breakdown: true,
            include_monthly_trend: true,
            include_pie_chart: true,
            include_bar_chart: true,
            include_trend_chart: true,
            include_detail_table: true,
            include_descriptions: false,
            include_notes: false,
            include_locations: false,
        }
    }
}

/// Report options as they arrive from the report builder form.
///
/// Checkboxes are only sent when ticked, so the form also sends `options`
/// to tell an unticked box apart from a request with no options at all.
/// Without `options` the defaults of [ReportConfig] apply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportOptionsQuery {
    #[serde(default)]
    pub options: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub page_size: Option<String>,
    #[serde(default)]
    pub include_summary: Option<String>,
    #[serde(default)]
    pub include_category_breakdown: Option<String>,
    #[serde(default)]
    pub include_payment_breakdown: Option<String>,
    #[serde(default)]
    pub include_monthly_trend: Option<String>,
    #[serde(default)]
    pub include_pie_chart: Option<String>,
    #[serde(default)]
    pub include_bar_chart: Option<String>,
    #[serde(default)]
    pub include_trend_chart: Option<String>,
    #[serde(default)]
    pub include_detail_table: Option<String>,
    #[serde(default)]
    pub include_descriptions: Option<String>,
    #[serde(default)]
    pub include_notes: Option<String>,
    #[serde(default)]
    pub include_locations: Option<String>,
}

impl ReportOptionsQuery {
    /// Build the report configuration, dated `generated_on`.
    pub fn to_config(&self, generated_on: Date) -> ReportConfig {
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(DEFAULT_REPORT_TITLE)
            .to_owned();
        let page_size = PageSize::parse(self.page_size.as_deref());

        if self.options.is_none() {
            return ReportConfig {
                title,
                page_size,
                generated_on,
                ..ReportConfig::default()
            };
        }

        ReportConfig {
            title,
            page_size,
            generated_on,
            include_summary: is_ticked(&self.include_summary),
            include_category_breakdown: is_ticked(&self.include_category_breakdown),
            include_payment_breakdown: is_ticked(&self.include_payment_breakdown),
            include_monthly_trend: is_ticked(&self.include_monthly_trend),
            include_pie_chart: is_ticked(&self.include_pie_chart),
            include_bar_chart: is_ticked(&self.include_bar_chart),
            include_trend_chart: is_ticked(&self.include_trend_chart),
            include_detail_table: is_ticked(&self.include_detail_table),
            include_descriptions: is_ticked(&self.include_descriptions),
            include_notes: is_ticked(&self.include_notes),
            include_locations: is_ticked(&self.include_locations),
        }
    }
}

fn is_ticked(value: &Option<String>) -> bool {
    match value.as_deref().map(str::trim) {
        None => false,
        Some(text) => !matches!(text.to_ascii_lowercase().as_str(), "" | "false" | "0" | "off"),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{DEFAULT_REPORT_TITLE, PageSize, ReportConfig, ReportOptionsQuery};

    #[test]
    fn usable_widths_remove_margins() {
        assert_eq!(PageSize::Letter.usable_width_inches(), 7.5);
        assert_eq!(PageSize::Legal.usable_width_inches(), 7.5);
        assert!((PageSize::A4.usable_width_inches() - 7.27).abs() < 1e-9);
    }

    #[test]
    fn unknown_page_size_is_letter() {
        assert_eq!(PageSize::parse(Some("A4")), PageSize::A4);
        assert_eq!(PageSize::parse(Some("tabloid")), PageSize::Letter);
        assert_eq!(PageSize::parse(None), PageSize::Letter);
    }

    #[test]
    fn no_options_gives_defaults() {
        let query: ReportOptionsQuery = serde_html_form::from_str("title=Move").unwrap();

        let config = query.to_config(date!(2024 - 03 - 01));

        assert_eq!(
            config,
            ReportConfig {
                title: "Move".to_owned(),
                generated_on: date!(2024 - 03 - 01),
                ..ReportConfig::default()
            }
        );
    }

    #[test]
    fn unticked_boxes_are_off_when_options_sent() {
        let query: ReportOptionsQuery = serde_html_form::from_str(
            "options=1&title=&page_size=legal&include_summary=on&include_notes=on",
        )
        .unwrap();

        let config = query.to_config(date!(2024 - 03 - 01));

        assert_eq!(config.title, DEFAULT_REPORT_TITLE);
        assert_eq!(config.page_size, PageSize::Legal);
        assert!(config.include_summary);
        assert!(config.include_notes);
        assert!(!config.include_pie_chart);
        assert!(!config.include_detail_table);
    }
}
