//! Complaint store
//!
//! Filing, transitions and scoped listings. Every mutation goes through the
//! transition table and commits with a compare-and-swap on the status it was
//! computed from, so two actors racing on one ticket cannot both win.

use chrono::Utc;
use std::sync::Arc;

use crate::domain::{Actor, Complaint, TicketId};
use crate::error::{CoreError, CoreResult};
use crate::lifecycle::{ComplaintLifecycle, ComplaintStatus};
use crate::policy::{AccessPolicy, ListFilter, SortOrder};
use crate::ports::{ComplaintRepository, DepartmentClassifier, EventPublisher, RepositoryError};

use super::publish_committed;

const MAX_TICKET_ATTEMPTS: usize = 5;

/// Complaint application service
pub struct ComplaintStore {
    complaints: Arc<dyn ComplaintRepository>,
    classifier: Arc<dyn DepartmentClassifier>,
    event_publisher: Arc<dyn EventPublisher>,
    policy: AccessPolicy,
    lifecycle: ComplaintLifecycle,
}

impl ComplaintStore {
    pub fn new(
        complaints: Arc<dyn ComplaintRepository>,
        classifier: Arc<dyn DepartmentClassifier>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        let lifecycle = ComplaintLifecycle::new();
        Self {
            complaints,
            classifier,
            event_publisher,
            policy: AccessPolicy::new(lifecycle),
            lifecycle,
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// File a complaint on behalf of a citizen.
    ///
    /// Nothing is stored when the classifier fails.
    pub async fn create(&self, actor: &Actor, description: &str, location: &str) -> CoreResult<Complaint> {
        let Actor::Citizen { id: author_id } = *actor else {
            return Err(CoreError::Unauthorized("only citizens file complaints".into()));
        };

        let description = description.trim();
        let location = location.trim();
        if description.is_empty() {
            return Err(CoreError::InvalidInput("description is required".into()));
        }
        if location.is_empty() {
            return Err(CoreError::InvalidInput("location is required".into()));
        }

        let classification = self.classifier.classify(description).await.map_err(|e| {
            tracing::warn!(author_id = %author_id, error = %e, "classification failed");
            CoreError::ClassificationFailed(e.0)
        })?;

        let now = Utc::now();
        for _ in 0..MAX_TICKET_ATTEMPTS {
            let mut complaint = Complaint::file(
                TicketId::generate(classification.department, now),
                author_id,
                classification.department,
                classification.category.as_str(),
                description,
                location,
                now,
            );
            let events = complaint.take_events();

            match self.complaints.insert(&complaint).await {
                Ok(()) => {
                    publish_committed(self.event_publisher.as_ref(), events).await;
                    return Ok(complaint);
                }
                Err(RepositoryError::DuplicateKey(ticket)) => {
                    tracing::debug!(%ticket, "ticket id collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(CoreError::Unavailable("could not allocate a ticket id".into()))
    }

    /// Move a complaint to `target`.
    ///
    /// Checked in order: the ticket exists, the actor can see it, some row
    /// leads into `target`, the actor may fire that row on this complaint,
    /// and the complaint is still in the row's source status. The write only
    /// lands if the stored status is unchanged since it was read.
    pub async fn transition(
        &self,
        actor: &Actor,
        ticket_id: &TicketId,
        target: ComplaintStatus,
        notes: Option<String>,
    ) -> CoreResult<Complaint> {
        let mut complaint = self
            .complaints
            .find_by_ticket(ticket_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(ticket_id.to_string()))?;

        if !self.policy.can_view(actor, &complaint) {
            tracing::warn!(actor_id = %actor.id(), role = %actor.role(), %ticket_id, "transition outside scope");
            return Err(CoreError::Unauthorized(format!("{} is outside your scope", ticket_id)));
        }

        let current = complaint.status();
        let rule = self
            .lifecycle
            .rule_into(target)
            .ok_or(CoreError::IllegalTransition { from: current, to: target })?;

        if !self.policy.permits(actor, &complaint, rule) {
            tracing::warn!(
                actor_id = %actor.id(),
                role = %actor.role(),
                %ticket_id,
                %target,
                "transition refused"
            );
            return Err(CoreError::Unauthorized(format!(
                "{} may not move {} to {}",
                actor.role(),
                ticket_id,
                target
            )));
        }

        let rule = self.lifecycle.check(current, target).map_err(|rejection| {
            let err = CoreError::from(rejection);
            if matches!(err, CoreError::StaleState { .. }) {
                tracing::warn!(%ticket_id, %current, %target, "stale transition");
            }
            err
        })?;
        complaint.apply(rule, actor.id(), notes, Utc::now())?;
        let events = complaint.take_events();

        if let Err(e) = self.complaints.compare_and_swap(&complaint, rule.from).await {
            tracing::warn!(%ticket_id, %target, error = %e, "transition lost the race");
            return Err(e.into());
        }
        publish_committed(self.event_publisher.as_ref(), events).await;

        Ok(complaint)
    }

    /// Complaints visible to `actor`, narrowed by `filter`
    pub async fn list_for(&self, actor: &Actor, filter: &ListFilter) -> CoreResult<ComplaintListing> {
        let query = self.policy.scope_query(actor, filter);
        tracing::debug!(actor_id = %actor.id(), ?query, "listing complaints");
        let mut items = self.complaints.query(&query).await?;
        items.retain(|c| self.policy.can_view(actor, c));

        match filter.order {
            SortOrder::Newest => items.sort_by(|a, b| {
                b.created_at().cmp(&a.created_at()).then_with(|| a.ticket_id().cmp(b.ticket_id()))
            }),
            SortOrder::Oldest => items.sort_by(|a, b| {
                a.created_at().cmp(&b.created_at()).then_with(|| a.ticket_id().cmp(b.ticket_id()))
            }),
            SortOrder::RecentlyUpdated => items.sort_by(|a, b| {
                b.updated_at().cmp(&a.updated_at()).then_with(|| a.ticket_id().cmp(b.ticket_id()))
            }),
        }

        Ok(ComplaintListing { items })
    }

    /// One complaint, if `actor` may see it
    pub async fn get(&self, actor: &Actor, ticket_id: &TicketId) -> CoreResult<Complaint> {
        let complaint = self
            .complaints
            .find_by_ticket(ticket_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(ticket_id.to_string()))?;

        if !self.policy.can_view(actor, &complaint) {
            return Err(CoreError::Unauthorized(format!("{} is outside your scope", ticket_id)));
        }
        Ok(complaint)
    }
}

/// Ordered snapshot of a listing. Iterating it again starts from the top.
#[derive(Debug, Clone, Default)]
pub struct ComplaintListing {
    items: Vec<Complaint>,
}

impl ComplaintListing {
    pub fn iter(&self) -> std::slice::Iter<'_, Complaint> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a ComplaintListing {
    type Item = &'a Complaint;
    type IntoIter = std::slice::Iter<'a, Complaint>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for ComplaintListing {
    type Item = Complaint;
    type IntoIter = std::vec::IntoIter<Complaint>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
