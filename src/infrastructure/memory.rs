//! In-memory repository implementations

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::domain::{Account, ActorId, Complaint, Email, TicketId};
use crate::lifecycle::ComplaintStatus;
use crate::ports::{ActorRepository, ComplaintQuery, ComplaintRepository, RepositoryError};

/// In-memory account repository.
///
/// Both indexes sit behind one lock so the email uniqueness check and the
/// insert are a single step.
#[derive(Default)]
pub struct InMemoryActorRepository {
    tables: RwLock<ActorTables>,
}

#[derive(Default)]
struct ActorTables {
    by_id: HashMap<ActorId, Account>,
    by_email: HashMap<Email, ActorId>,
}

impl InMemoryActorRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActorRepository for InMemoryActorRepository {
    async fn find_by_id(&self, id: &ActorId) -> Result<Option<Account>, RepositoryError> {
        Ok(self.tables.read().by_id.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        let tables = self.tables.read();
        Ok(tables
            .by_email
            .get(email)
            .and_then(|id| tables.by_id.get(id))
            .cloned())
    }

    async fn insert(&self, account: &Account) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write();
        if tables.by_email.contains_key(account.email()) {
            return Err(RepositoryError::DuplicateKey(account.email().to_string()));
        }
        if tables.by_id.contains_key(&account.id()) {
            return Err(RepositoryError::DuplicateKey(account.id().to_string()));
        }
        tables.by_email.insert(account.email().clone(), account.id());
        tables.by_id.insert(account.id(), account.clone());
        Ok(())
    }
}

/// In-memory complaint repository keyed by ticket id
#[derive(Default)]
pub struct InMemoryComplaintRepository {
    complaints: DashMap<TicketId, Complaint>,
}

impl InMemoryComplaintRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.complaints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.complaints.is_empty()
    }
}

#[async_trait]
impl ComplaintRepository for InMemoryComplaintRepository {
    async fn find_by_ticket(&self, ticket_id: &TicketId) -> Result<Option<Complaint>, RepositoryError> {
        Ok(self.complaints.get(ticket_id).map(|c| c.clone()))
    }

    async fn insert(&self, complaint: &Complaint) -> Result<(), RepositoryError> {
        match self.complaints.entry(complaint.ticket_id().clone()) {
            Entry::Occupied(_) => Err(RepositoryError::DuplicateKey(complaint.ticket_id().to_string())),
            Entry::Vacant(slot) => {
                slot.insert(complaint.clone());
                Ok(())
            }
        }
    }

    async fn query(&self, query: &ComplaintQuery) -> Result<Vec<Complaint>, RepositoryError> {
        Ok(self
            .complaints
            .iter()
            .filter(|c| query.matches(c.value()))
            .map(|c| c.value().clone())
            .collect())
    }

    async fn compare_and_swap(
        &self,
        updated: &Complaint,
        expected: ComplaintStatus,
    ) -> Result<(), RepositoryError> {
        // the shard write lock is held from the status read until the write
        let mut stored = self
            .complaints
            .get_mut(updated.ticket_id())
            .ok_or_else(|| RepositoryError::NotFound(updated.ticket_id().to_string()))?;

        if stored.status() != expected {
            return Err(RepositoryError::StatusMismatch {
                expected,
                actual: stored.status(),
            });
        }

        *stored = updated.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Actor, Department, PasswordHash};
    use crate::lifecycle::ComplaintLifecycle;
    use chrono::Utc;

    fn citizen_account(email: &str) -> Account {
        Account::create(
            Actor::Citizen { id: ActorId::new() },
            "Asha",
            Email::new(email).unwrap(),
            "5550100",
            PasswordHash::create("correct horse").unwrap(),
        )
    }

    fn complaint(department: Department, author: ActorId) -> Complaint {
        let now = Utc::now();
        Complaint::file(
            TicketId::generate(department, now),
            author,
            department,
            "General",
            "broken",
            "Elm St",
            now,
        )
    }

    #[tokio::test]
    async fn test_actor_save_and_find() {
        let repo = InMemoryActorRepository::new();
        let account = citizen_account("asha@example.com");
        repo.insert(&account).await.unwrap();

        let by_id = repo.find_by_id(&account.id()).await.unwrap().unwrap();
        assert_eq!(by_id.email().as_str(), "asha@example.com");

        let by_email = repo.find_by_email(account.email()).await.unwrap().unwrap();
        assert_eq!(by_email.id(), account.id());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryActorRepository::new();
        repo.insert(&citizen_account("dup@example.com")).await.unwrap();
        let err = repo.insert(&citizen_account("DUP@example.com")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateKey(_)));
    }

    #[tokio::test]
    async fn test_query_filters() {
        let repo = InMemoryComplaintRepository::new();
        let author = ActorId::new();
        repo.insert(&complaint(Department::Roads, author)).await.unwrap();
        repo.insert(&complaint(Department::Water, author)).await.unwrap();
        repo.insert(&complaint(Department::Roads, ActorId::new())).await.unwrap();

        let mine = ComplaintQuery { author_id: Some(author), ..Default::default() };
        assert_eq!(repo.query(&mine).await.unwrap().len(), 2);

        let roads = ComplaintQuery { department: Some(Department::Roads), ..Default::default() };
        assert_eq!(repo.query(&roads).await.unwrap().len(), 2);

        let closed = ComplaintQuery {
            statuses: Some(vec![ComplaintStatus::Resolved]),
            ..Default::default()
        };
        assert!(repo.query(&closed).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_compare_and_swap_detects_mismatch() {
        let repo = InMemoryComplaintRepository::new();
        let original = complaint(Department::Roads, ActorId::new());
        repo.insert(&original).await.unwrap();

        let rule = ComplaintLifecycle::new().rule_into(ComplaintStatus::InProgress).unwrap();
        let mut started = original.clone();
        started.apply(rule, ActorId::new(), None, Utc::now()).unwrap();

        repo.compare_and_swap(&started, ComplaintStatus::Pending).await.unwrap();
        let err = repo.compare_and_swap(&started, ComplaintStatus::Pending).await.unwrap_err();
        assert_eq!(
            err,
            RepositoryError::StatusMismatch {
                expected: ComplaintStatus::Pending,
                actual: ComplaintStatus::InProgress
            }
        );
    }

    #[tokio::test]
    async fn test_compare_and_swap_unknown_ticket() {
        let repo = InMemoryComplaintRepository::new();
        let missing = complaint(Department::Waste, ActorId::new());
        let err = repo.compare_and_swap(&missing, ComplaintStatus::Pending).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }
}
