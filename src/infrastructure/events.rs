//! Event publisher that writes domain events to the log

use async_trait::async_trait;

use crate::domain::{AccountEvent, ComplaintEvent, DomainEvent};
use crate::ports::{EventPublisher, RepositoryError};

#[derive(Debug, Default)]
pub struct TracingEventPublisher;

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError> {
        for event in events {
            let name = event.name();
            match event {
                DomainEvent::Complaint(ComplaintEvent::Filed { ticket_id, author_id, department, .. }) => {
                    tracing::info!(event = name, %ticket_id, %author_id, department = department.as_str(), "complaint filed");
                }
                DomainEvent::Complaint(ComplaintEvent::StatusChanged { ticket_id, from, to, changed_by, .. }) => {
                    tracing::info!(event = name, %ticket_id, %from, %to, %changed_by, "complaint status changed");
                }
                DomainEvent::Account(AccountEvent::CitizenRegistered { actor_id }) => {
                    tracing::info!(event = name, %actor_id, "citizen registered");
                }
                DomainEvent::Account(AccountEvent::AdminRegistered { actor_id, department, registered_by }) => {
                    tracing::info!(
                        event = name,
                        %actor_id,
                        department = department.as_str(),
                        %registered_by,
                        "department admin registered"
                    );
                }
            }
        }
        Ok(())
    }
}
