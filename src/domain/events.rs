//! Domain Events
//!
//! Events raised by aggregates and services to communicate state changes.

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{ActorId, Department, TicketId};
use crate::lifecycle::ComplaintStatus;

#[derive(Clone, Debug)]
pub enum DomainEvent {
    Complaint(ComplaintEvent),
    Account(AccountEvent),
}

#[derive(Clone, Debug)]
pub enum ComplaintEvent {
    Filed {
        ticket_id: TicketId,
        author_id: ActorId,
        department: Department,
        filed_at: DateTime<Utc>,
    },
    StatusChanged {
        ticket_id: TicketId,
        from: ComplaintStatus,
        to: ComplaintStatus,
        changed_by: ActorId,
        changed_at: DateTime<Utc>,
    },
}

#[derive(Clone, Debug)]
pub enum AccountEvent {
    CitizenRegistered {
        actor_id: ActorId,
    },
    AdminRegistered {
        actor_id: ActorId,
        department: Department,
        registered_by: ActorId,
    },
}

impl DomainEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Complaint(ComplaintEvent::Filed { .. }) => "complaint.filed",
            Self::Complaint(ComplaintEvent::StatusChanged { .. }) => "complaint.status_changed",
            Self::Account(AccountEvent::CitizenRegistered { .. }) => "account.citizen_registered",
            Self::Account(AccountEvent::AdminRegistered { .. }) => "account.admin_registered",
        }
    }
}
