//! Data Transfer Objects (DTOs)
//!
//! Commands accepted by the application services and the read models they
//! hand back across the HTTP boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Account, ActorId, Complaint, Department, Role, StatusChange};
use crate::lifecycle::ComplaintStatus;

// =============================================================================
// Account Commands
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterCitizenCommand {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterAdminCommand {
    /// Defaults to "<Department> Admin" when blank
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub password: String,
    pub department: Department,
}

// =============================================================================
// Views (Read Models)
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountView {
    pub id: ActorId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub department: Option<Department>,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id(),
            name: account.name().to_string(),
            email: account.email().as_str().to_string(),
            phone: account.phone().to_string(),
            role: account.actor().role(),
            department: account.actor().department(),
            created_at: account.created_at(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComplaintView {
    pub ticket_id: String,
    pub author_id: ActorId,
    pub department: Department,
    pub department_name: String,
    pub category: String,
    pub description: String,
    pub location: String,
    pub status: ComplaintStatus,
    pub status_label: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub history: Vec<StatusChangeView>,
}

impl From<&Complaint> for ComplaintView {
    fn from(complaint: &Complaint) -> Self {
        Self {
            ticket_id: complaint.ticket_id().to_string(),
            author_id: complaint.author_id(),
            department: complaint.department(),
            department_name: complaint.department().display_name().to_string(),
            category: complaint.category().to_string(),
            description: complaint.description().to_string(),
            location: complaint.location().to_string(),
            status: complaint.status(),
            status_label: complaint.status().to_string(),
            created_at: complaint.created_at(),
            updated_at: complaint.updated_at(),
            resolved_at: complaint.resolved_at(),
            history: complaint.history().iter().map(StatusChangeView::from).collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatusChangeView {
    pub status: ComplaintStatus,
    pub changed_by: ActorId,
    pub notes: Option<String>,
    pub at: DateTime<Utc>,
}

impl From<&StatusChange> for StatusChangeView {
    fn from(change: &StatusChange) -> Self {
        Self {
            status: change.status,
            changed_by: change.changed_by,
            notes: change.notes.clone(),
            at: change.at,
        }
    }
}
