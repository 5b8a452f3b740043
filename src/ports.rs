//! Outbound ports
//!
//! Hexagonal architecture: the interfaces infrastructure must implement.

use async_trait::async_trait;
use std::fmt;

use crate::domain::{Account, ActorId, Complaint, Department, DomainEvent, Email, TicketId};
use crate::lifecycle::ComplaintStatus;

/// Account repository port
#[async_trait]
pub trait ActorRepository: Send + Sync {
    async fn find_by_id(&self, id: &ActorId) -> Result<Option<Account>, RepositoryError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError>;

    /// Insert a new account. Fails with `DuplicateKey` when the email is taken.
    async fn insert(&self, account: &Account) -> Result<(), RepositoryError>;
}

/// Complaint repository port
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    async fn find_by_ticket(&self, ticket_id: &TicketId) -> Result<Option<Complaint>, RepositoryError>;

    /// Insert a new complaint. Fails with `DuplicateKey` when the ticket id is taken.
    async fn insert(&self, complaint: &Complaint) -> Result<(), RepositoryError>;

    /// All complaints matching `query`, in no particular order
    async fn query(&self, query: &ComplaintQuery) -> Result<Vec<Complaint>, RepositoryError>;

    /// Replace a stored complaint only if its stored status is still `expected`.
    ///
    /// The check and the write are atomic per ticket. A mismatch fails with
    /// `StatusMismatch` and writes nothing.
    async fn compare_and_swap(
        &self,
        updated: &Complaint,
        expected: ComplaintStatus,
    ) -> Result<(), RepositoryError>;
}

/// Storage-level filter; every `Some` field must match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintQuery {
    pub author_id: Option<ActorId>,
    pub department: Option<Department>,
    pub statuses: Option<Vec<ComplaintStatus>>,
}

impl ComplaintQuery {
    pub fn matches(&self, complaint: &Complaint) -> bool {
        self.author_id.map_or(true, |a| complaint.author_id() == a)
            && self.department.map_or(true, |d| complaint.department() == d)
            && self
                .statuses
                .as_ref()
                .map_or(true, |s| s.contains(&complaint.status()))
    }
}

/// Result of routing a complaint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: String,
    pub department: Department,
}

/// Department classifier port. Opaque to the core; called once per filing.
#[async_trait]
pub trait DepartmentClassifier: Send + Sync {
    async fn classify(&self, description: &str) -> Result<Classification, ClassifierError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ClassifierError(pub String);

/// Event publisher port
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError>;
}

/// Repository error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    NotFound(String),
    DuplicateKey(String),
    StatusMismatch {
        expected: ComplaintStatus,
        actual: ComplaintStatus,
    },
    Unavailable(String),
}

impl std::error::Error for RepositoryError {}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(k) => write!(f, "Entity not found: {}", k),
            Self::DuplicateKey(k) => write!(f, "Duplicate key: {}", k),
            Self::StatusMismatch { expected, actual } => {
                write!(f, "Status mismatch: expected {}, found {}", expected, actual)
            }
            Self::Unavailable(e) => write!(f, "Storage unavailable: {}", e),
        }
    }
}
