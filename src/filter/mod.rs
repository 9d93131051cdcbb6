//! Turns user supplied constraints into a predicate over expense records.
//!
//! - [FilterQuery] is the lenient query string form,
//! - [FilterSpec] is the validated set of constraints,
//! - [evaluate_filters] builds the predicate, optionally bounded by a
//!   [TimeWindow].

mod evaluate;
mod form;
mod query;
mod spec;
mod window;

pub use evaluate::{evaluate_filters, get_filtered_records};
pub use form::filter_form_fields;
pub use query::FilterQuery;
pub use spec::FilterSpec;
pub use window::TimeWindow;
