//! Complaint Aggregate
//!
//! A filed complaint. Identity, authorship, routing and the filed text are
//! fixed at creation; only the status moves, and only along the rows of the
//! lifecycle table.

use chrono::{DateTime, Utc};

use crate::domain::events::{ComplaintEvent, DomainEvent};
use crate::domain::value_objects::{ActorId, Department, TicketId};
use crate::lifecycle::{
    ComplaintLifecycle, ComplaintStatus, TimestampEffect, TransitionRejection, TransitionRule,
};

/// Complaint aggregate root
#[derive(Clone, Debug)]
pub struct Complaint {
    ticket_id: TicketId,
    author_id: ActorId,
    department: Department,
    category: String,
    description: String,
    location: String,
    status: ComplaintStatus,
    history: Vec<StatusChange>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
    events: Vec<DomainEvent>,
}

/// One entry of a complaint's status history
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusChange {
    pub status: ComplaintStatus,
    pub changed_by: ActorId,
    pub notes: Option<String>,
    pub at: DateTime<Utc>,
}

impl Complaint {
    /// File a new complaint in `Pending`
    pub fn file(
        ticket_id: TicketId,
        author_id: ActorId,
        department: Department,
        category: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut complaint = Self {
            ticket_id: ticket_id.clone(),
            author_id,
            department,
            category: category.into(),
            description: description.into(),
            location: location.into(),
            status: ComplaintStatus::Pending,
            history: vec![StatusChange {
                status: ComplaintStatus::Pending,
                changed_by: author_id,
                notes: Some("Complaint created by user".into()),
                at: now,
            }],
            created_at: now,
            updated_at: now,
            resolved_at: None,
            events: vec![],
        };

        complaint.raise_event(DomainEvent::Complaint(ComplaintEvent::Filed {
            ticket_id,
            author_id,
            department,
            filed_at: now,
        }));

        complaint
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn ticket_id(&self) -> &TicketId { &self.ticket_id }
    pub fn author_id(&self) -> ActorId { self.author_id }
    pub fn department(&self) -> Department { self.department }
    pub fn category(&self) -> &str { &self.category }
    pub fn description(&self) -> &str { &self.description }
    pub fn location(&self) -> &str { &self.location }
    pub fn status(&self) -> ComplaintStatus { self.status }
    pub fn history(&self) -> &[StatusChange] { &self.history }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }
    pub fn resolved_at(&self) -> Option<DateTime<Utc>> { self.resolved_at }

    // =========================================================================
    // Business Operations
    // =========================================================================

    /// Fire one row of the transition table.
    ///
    /// Authorization is the caller's concern; this only guards the status
    /// graph. On rejection the complaint is left untouched.
    pub fn apply(
        &mut self,
        rule: &TransitionRule,
        changed_by: ActorId,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionRejection> {
        if self.status != rule.from {
            return Err(match ComplaintLifecycle::new().check(self.status, rule.to) {
                Err(rejection) => rejection,
                Ok(_) => TransitionRejection::Stale {
                    expected: rule.from,
                    actual: self.status,
                },
            });
        }

        let from = self.status;
        self.status = rule.to;
        self.updated_at = now;
        if rule.effect == TimestampEffect::Resolved {
            self.resolved_at = Some(now);
        }

        self.history.push(StatusChange {
            status: rule.to,
            changed_by,
            notes: notes.filter(|n| !n.trim().is_empty()),
            at: now,
        });

        self.raise_event(DomainEvent::Complaint(ComplaintEvent::StatusChanged {
            ticket_id: self.ticket_id.clone(),
            from,
            to: rule.to,
            changed_by,
            changed_at: now,
        }));

        Ok(())
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    fn raise_event(&mut self, event: DomainEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn pothole(author: ActorId, now: DateTime<Utc>) -> Complaint {
        Complaint::file(
            TicketId::generate(Department::Roads, now),
            author,
            Department::Roads,
            "pothole",
            "pothole",
            "Main St",
            now,
        )
    }

    #[test]
    fn test_filed_complaint_is_pending() {
        let author = ActorId::new();
        let now = Utc::now();
        let mut complaint = pothole(author, now);

        assert_eq!(complaint.status(), ComplaintStatus::Pending);
        assert_eq!(complaint.author_id(), author);
        assert_eq!(complaint.created_at(), now);
        assert!(complaint.resolved_at().is_none());
        assert_eq!(complaint.history().len(), 1);
        assert_eq!(complaint.take_events().len(), 1);
        assert!(complaint.take_events().is_empty());
    }

    #[test]
    fn test_admin_path_sets_timestamps() {
        let lifecycle = ComplaintLifecycle::new();
        let admin = ActorId::new();
        let filed = Utc::now();
        let mut complaint = pothole(ActorId::new(), filed);

        let started = filed + Duration::minutes(5);
        let rule = lifecycle.rule(ComplaintStatus::Pending, ComplaintStatus::InProgress).unwrap();
        complaint.apply(rule, admin, Some("crew dispatched".into()), started).unwrap();
        assert_eq!(complaint.status(), ComplaintStatus::InProgress);
        assert_eq!(complaint.updated_at(), started);
        assert!(complaint.resolved_at().is_none());

        let closed = started + Duration::hours(2);
        let rule = lifecycle.rule(ComplaintStatus::InProgress, ComplaintStatus::Resolved).unwrap();
        complaint.apply(rule, admin, None, closed).unwrap();
        assert_eq!(complaint.status(), ComplaintStatus::Resolved);
        assert_eq!(complaint.resolved_at(), Some(closed));
        assert_eq!(complaint.created_at(), filed);

        let statuses: Vec<_> = complaint.history().iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![ComplaintStatus::Pending, ComplaintStatus::InProgress, ComplaintStatus::Resolved]
        );
        assert_eq!(complaint.history()[1].notes.as_deref(), Some("crew dispatched"));
    }

    #[test]
    fn test_rejected_transition_leaves_state_unchanged() {
        let lifecycle = ComplaintLifecycle::new();
        let now = Utc::now();
        let mut complaint = pothole(ActorId::new(), now);
        let rule = lifecycle.rule_into(ComplaintStatus::UserResolved).unwrap();

        let err = complaint.apply(rule, complaint.author_id(), None, now).unwrap_err();
        assert!(matches!(err, TransitionRejection::Illegal { .. }));
        assert_eq!(complaint.status(), ComplaintStatus::Pending);
        assert_eq!(complaint.history().len(), 1);
        assert_eq!(complaint.updated_at(), now);
    }

    #[test]
    fn test_second_start_is_stale() {
        let lifecycle = ComplaintLifecycle::new();
        let now = Utc::now();
        let mut complaint = pothole(ActorId::new(), now);
        let rule = lifecycle.rule_into(ComplaintStatus::InProgress).unwrap();

        complaint.apply(rule, ActorId::new(), None, now).unwrap();
        let err = complaint.apply(rule, ActorId::new(), None, now).unwrap_err();
        assert_eq!(
            err,
            TransitionRejection::Stale {
                expected: ComplaintStatus::Pending,
                actual: ComplaintStatus::InProgress
            }
        );
    }
}
