//! Core payment method domain types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{database_id::DatabaseId, name::Name};

/// Database identifier for a payment method.
pub type PaymentMethodId = DatabaseId;

/// The icon class given to payment methods created without one.
pub const DEFAULT_PAYMENT_METHOD_ICON: &str = "fa-credit-card";

/// How an expense was paid for (e.g., 'Cash', 'Credit Card').
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: PaymentMethodId,
    pub name: Name,
    pub icon: String,
    /// Default payment methods are seeded on start up and cannot be deleted.
    pub is_default: bool,
    pub created_at: OffsetDateTime,
}

/// Form data for payment method creation.
#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentMethodForm {
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

/// The payment methods seeded into an empty database as (name, icon).
pub const DEFAULT_PAYMENT_METHODS: [(&str, &str); 10] = [
    ("Cash", "fa-money-bill"),
    ("Credit Card", "fa-credit-card"),
    ("Debit Card", "fa-credit-card"),
    ("Check", "fa-money-check"),
    ("Bank Transfer", "fa-university"),
    ("PayPal", "fab fa-paypal"),
    ("Venmo", "fa-mobile-alt"),
    ("Company Card", "fa-building"),
    ("Reimbursement", "fa-hand-holding-usd"),
    ("Other", "fa-question-circle"),
];
