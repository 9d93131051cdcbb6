//! Printable expense reports.
//!
//! A report is built in two steps: [compose_report] turns filtered expenses
//! and a [ReportConfig] into an ordered list of [ReportSection]s, then a
//! [DocumentRenderer] turns the sections into a document for download.

mod composer;
mod config;
mod handlers;
mod render;
mod section;

pub use composer::{compose_report, fit_column_widths, truncate};
pub use config::{PageSize, ReportConfig, ReportOptionsQuery};
pub use handlers::{get_report, get_report_page};
pub use render::{DocumentRenderer, HtmlDocumentRenderer};
pub use section::{
    BreakdownRow, DetailColumn, DetailTable, ReportSection, SummaryStats, TitleBlock,
};
