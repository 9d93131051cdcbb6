use serde::{Deserialize, Serialize};
use time::{Date, Duration};

/// A named lookback period ending today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 4] = [
        TimeWindow::Week,
        TimeWindow::Month,
        TimeWindow::Quarter,
        TimeWindow::Year,
    ];

    /// Parse a shorthand such as "week", falling back to [TimeWindow::Month]
    /// for missing or unknown text.
    pub fn parse(text: Option<&str>) -> Self {
        match text.map(|text| text.trim().to_lowercase()).as_deref() {
            Some("week") => TimeWindow::Week,
            Some("month") => TimeWindow::Month,
            Some("quarter") => TimeWindow::Quarter,
            Some("year") => TimeWindow::Year,
            _ => TimeWindow::Month,
        }
    }

    /// How many days before today the window starts.
    pub fn lookback_days(self) -> i64 {
        match self {
            TimeWindow::Week => 7,
            TimeWindow::Month => 30,
            TimeWindow::Quarter => 90,
            TimeWindow::Year => 365,
        }
    }

    /// The first date inside the window that ends on `today`.
    pub fn start_date(self, today: Date) -> Date {
        today
            .checked_sub(Duration::days(self.lookback_days()))
            .unwrap_or(Date::MIN)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Quarter => "quarter",
            TimeWindow::Year => "year",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeWindow::Week => "Last 7 days",
            TimeWindow::Month => "Last 30 days",
            TimeWindow::Quarter => "Last 90 days",
            TimeWindow::Year => "Last 365 days",
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::TimeWindow;

    #[test]
    fn parses_known_shorthands() {
        assert_eq!(TimeWindow::parse(Some("week")), TimeWindow::Week);
        assert_eq!(TimeWindow::parse(Some("Quarter")), TimeWindow::Quarter);
        assert_eq!(TimeWindow::parse(Some("year")), TimeWindow::Year);
    }

    #[test]
    fn unknown_or_missing_shorthand_is_a_month() {
        assert_eq!(TimeWindow::parse(Some("fortnight")), TimeWindow::Month);
        assert_eq!(TimeWindow::parse(None), TimeWindow::Month);
        assert_eq!(TimeWindow::parse(Some("fortnight")).lookback_days(), 30);
    }

    #[test]
    fn start_date_subtracts_lookback() {
        assert_eq!(
            TimeWindow::Week.start_date(date!(2024 - 03 - 08)),
            date!(2024 - 03 - 01)
        );
        assert_eq!(
            TimeWindow::Year.start_date(date!(2024 - 12 - 31)),
            date!(2024 - 01 - 01)
        );
    }
}
