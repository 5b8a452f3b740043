//! Access Policy
//!
//! Pure decisions about what an actor may see and do:
//!
//! | Actor | Sees | May fire |
//! |---|---|---|
//! | Citizen | complaints they authored | `Author` rows on those |
//! | DepartmentAdmin | complaints of their department | `Administrator` rows on those |
//! | SuperAdmin | everything | `Administrator` rows on anything |

use serde::Deserialize;

use crate::domain::{Actor, Complaint, Department};
use crate::lifecycle::{ComplaintLifecycle, ComplaintStatus, Permitted, TransitionRule};
use crate::ports::ComplaintQuery;

/// Status narrowing accepted by listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    Pending,
    InProgress,
    Resolved,
    UserResolved,
    /// Pending or in progress
    Active,
    /// Either terminal status
    Closed,
}

impl StatusFilter {
    pub fn statuses(&self) -> Vec<ComplaintStatus> {
        match self {
            Self::Pending => vec![ComplaintStatus::Pending],
            Self::InProgress => vec![ComplaintStatus::InProgress],
            Self::Resolved => vec![ComplaintStatus::Resolved],
            Self::UserResolved => vec![ComplaintStatus::UserResolved],
            Self::Active => ComplaintStatus::ALL.into_iter().filter(|s| s.is_active()).collect(),
            Self::Closed => ComplaintStatus::ALL.into_iter().filter(|s| s.is_terminal()).collect(),
        }
    }
}

/// Listing order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// `created_at` descending
    #[default]
    Newest,
    /// `created_at` ascending
    Oldest,
    /// `updated_at` descending
    RecentlyUpdated,
}

/// Caller-supplied listing narrowing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub status: Option<StatusFilter>,
    /// Honoured for super admins only
    pub department: Option<Department>,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy {
    lifecycle: ComplaintLifecycle,
}

impl AccessPolicy {
    pub fn new(lifecycle: ComplaintLifecycle) -> Self {
        Self { lifecycle }
    }

    pub fn can_view(&self, actor: &Actor, complaint: &Complaint) -> bool {
        match actor {
            Actor::Citizen { id } => complaint.author_id() == *id,
            Actor::DepartmentAdmin { department, .. } => complaint.department() == *department,
            Actor::SuperAdmin { .. } => true,
        }
    }

    /// Whether `actor` is the kind of party the row names, scoped to `complaint`.
    /// Ignores the complaint's current status.
    pub fn permits(&self, actor: &Actor, complaint: &Complaint, rule: &TransitionRule) -> bool {
        match (rule.permitted, actor) {
            (Permitted::Author, Actor::Citizen { id }) => complaint.author_id() == *id,
            (Permitted::Administrator, Actor::DepartmentAdmin { department, .. }) => {
                complaint.department() == *department
            }
            (Permitted::Administrator, Actor::SuperAdmin { .. }) => true,
            _ => false,
        }
    }

    /// True iff `(current status -> target)` is a table row and `actor` may fire it here.
    pub fn can_transition(&self, actor: &Actor, complaint: &Complaint, target: ComplaintStatus) -> bool {
        self.lifecycle
            .rule(complaint.status(), target)
            .is_some_and(|rule| self.permits(actor, complaint, rule))
    }

    /// Storage query covering exactly what `actor` may see under `filter`.
    ///
    /// Scope always comes from the actor: a citizen gets their own complaints,
    /// a department admin their department's. Only a super admin's explicit
    /// department filter is applied.
    pub fn scope_query(&self, actor: &Actor, filter: &ListFilter) -> ComplaintQuery {
        let mut query = ComplaintQuery {
            statuses: filter.status.map(|s| s.statuses()),
            ..Default::default()
        };
        match actor {
            Actor::Citizen { id } => query.author_id = Some(*id),
            Actor::DepartmentAdmin { department, .. } => query.department = Some(*department),
            Actor::SuperAdmin { .. } => query.department = filter.department,
        }
        query
    }
}
