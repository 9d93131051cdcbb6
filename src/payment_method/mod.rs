//! Payment methods for recording how expenses were paid.

mod db;
mod domain;
mod endpoints;

pub use db::{
    create_payment_method, create_payment_method_table, get_all_payment_methods,
    get_payment_method, seed_default_payment_methods,
};
pub use domain::{PaymentMethod, PaymentMethodForm, PaymentMethodId};
pub use endpoints::{create_payment_method_endpoint, delete_payment_method_endpoint};
