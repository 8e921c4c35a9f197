//! Invoice status and the transitions offered to the user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 4] = [
        InvoiceStatus::Draft,
        InvoiceStatus::Pending,
        InvoiceStatus::Paid,
        InvoiceStatus::Overdue,
    ];

    /// Next states a user is offered from this one.
    ///
    /// This is a menu, not a guard: `Store::set_invoice_status` accepts any status.
    /// Overdue is never reached automatically from the due date.
    pub fn available_transitions(self) -> &'static [InvoiceStatus] {
        match self {
            InvoiceStatus::Draft => &[InvoiceStatus::Pending, InvoiceStatus::Overdue],
            InvoiceStatus::Pending => &[InvoiceStatus::Paid, InvoiceStatus::Overdue],
            InvoiceStatus::Paid | InvoiceStatus::Overdue => &[],
        }
    }

    pub fn can_transition_to(self, next: InvoiceStatus) -> bool {
        self.available_transitions().contains(&next)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        }
    }

    /// Human label used in detail views.
    pub fn label(self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Pending => "Pending Payment",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Overdue => "Overdue",
        }
    }

    /// Action wording for a transition into this status.
    pub fn action(self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Revert to Draft",
            InvoiceStatus::Pending => "Mark as Sent",
            InvoiceStatus::Paid => "Mark as Paid",
            InvoiceStatus::Overdue => "Mark as Overdue",
        }
    }

    /// Badge colour (RGB) for rendered documents and tables.
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            InvoiceStatus::Draft => (100, 116, 139),
            InvoiceStatus::Pending => (234, 88, 12),
            InvoiceStatus::Paid => (34, 197, 94),
            InvoiceStatus::Overdue => (239, 68, 68),
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(InvoiceStatus::Draft),
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            "overdue" => Ok(InvoiceStatus::Overdue),
            other => Err(format!("unknown invoice status: {other}")),
        }
    }
}
