//! Structured intake record produced at the end of a conversation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dispatch priority for a service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    /// Emergency: gas smell, active leak, no heat in winter.
    P1,
    /// Urgent comfort or noise issue.
    P2,
    /// Standard diagnostic visit.
    P3,
    /// Planned maintenance.
    P4,
}

impl Priority {
    /// Short code used in dispatch displays.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
            Priority::P4 => "P4",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduling constraints stated by the customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerConstraints {
    pub same_day_preferred: Option<bool>,
    pub time_window: Option<String>,
}

/// Service location, as far as the customer stated it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub address: Option<String>,
    pub city: Option<String>,
}

/// Classified intake record for one finished conversation.
///
/// Every leaf field is nullable: the extraction service is instructed to
/// never fabricate information the customer did not state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeRecord {
    pub job_type: Option<String>,
    pub priority: Option<Priority>,
    pub issue_summary: Option<String>,
    pub estimated_duration_minutes: Option<u32>,
    pub customer_constraints: CustomerConstraints,
    pub location: Location,
    pub recommended_action: Option<String>,
}
