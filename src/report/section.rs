//! The building blocks of a composed report.

use time::Date;

use crate::aggregate::Breakdown;

/// One self-contained part of a report, in the order it should be rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportSection {
    Title(TitleBlock),
    Summary(SummaryStats),
    CategoryBreakdown(Vec<BreakdownRow>),
    PaymentBreakdown(Vec<BreakdownRow>),
    MonthlyTrend(Vec<BreakdownRow>),
    PageBreak,
    PieChart(Breakdown),
    BarChart(Breakdown),
    TrendChart(Breakdown),
    DetailTable(DetailTable),
}

impl ReportSection {
    /// A short name for the kind of section, used in logs and tests.
    pub fn kind(&self) -> &'static str {
        match self {
            ReportSection::Title(_) => "title",
            ReportSection::Summary(_) => "summary",
            ReportSection::CategoryBreakdown(_) => "category_breakdown",
            ReportSection::PaymentBreakdown(_) => "payment_breakdown",
            ReportSection::MonthlyTrend(_) => "monthly_trend",
            ReportSection::PageBreak => "page_break",
            ReportSection::PieChart(_) => "pie_chart",
            ReportSection::BarChart(_) => "bar_chart",
            ReportSection::TrendChart(_) => "trend_chart",
            ReportSection::DetailTable(_) => "detail_table",
        }
    }
}

/// The report heading and the facts about what it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleBlock {
    pub title: String,
    pub generated_on: Date,
    /// The earliest and latest expense dates, `None` for an empty report.
    pub date_range: Option<(Date, Date)>,
    pub expense_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryStats {
    pub total: f64,
    pub count: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub reimbursable_total: f64,
}

/// A labelled amount with its share of the report total.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownRow {
    pub label: String,
    pub amount: f64,
    /// Between 0 and 100, zero when the report total is zero.
    pub percentage: f64,
}

/// The columns the detail table can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailColumn {
    Date,
    Title,
    Description,
    Category,
    Amount,
    Payment,
    /// The location, or the vendor when there is no location.
    Location,
    Notes,
}

impl DetailColumn {
    pub fn header(self) -> &'static str {
        match self {
            DetailColumn::Date => "Date",
            DetailColumn::Title => "Title",
            DetailColumn::Description => "Description",
            DetailColumn::Category => "Category",
            DetailColumn::Amount => "Amount",
            DetailColumn::Payment => "Payment",
            DetailColumn::Location => "Location",
            DetailColumn::Notes => "Notes",
        }
    }

    /// The width of the column in inches before fitting to the page.
    pub fn base_width_inches(self) -> f64 {
        match self {
            DetailColumn::Date => 1.0,
            DetailColumn::Title => 1.8,
            DetailColumn::Description => 1.5,
            DetailColumn::Category => 1.2,
            DetailColumn::Amount => 0.9,
            DetailColumn::Payment => 1.1,
            DetailColumn::Location => 1.2,
            DetailColumn::Notes => 1.5,
        }
    }

    /// The most graphemes shown before the text is cut short, if limited.
    pub fn max_graphemes(self) -> Option<usize> {
        match self {
            DetailColumn::Title | DetailColumn::Location => Some(30),
            DetailColumn::Description | DetailColumn::Notes => Some(40),
            DetailColumn::Date
            | DetailColumn::Category
            | DetailColumn::Amount
            | DetailColumn::Payment => None,
        }
    }
}

/// The itemised list of expenses.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailTable {
    pub columns: Vec<DetailColumn>,
    /// Column widths in inches, one per column, already fitted to the page.
    pub widths: Vec<f64>,
    /// Cell text, one row per expense and one cell per column.
    pub rows: Vec<Vec<String>>,
}
