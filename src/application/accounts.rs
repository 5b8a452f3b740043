//! Account service
//!
//! Citizen self-registration, department admin provisioning, super admin
//! seeding and profile lookup.

use std::sync::Arc;

use crate::config::SuperAdminSeed;
use crate::domain::{Account, AccountEvent, Actor, ActorId, Department, DomainEvent, Email, PasswordHash};
use crate::error::{CoreError, CoreResult};
use crate::ports::{ActorRepository, EventPublisher};

use super::dto::{RegisterAdminCommand, RegisterCitizenCommand};
use super::publish_committed;

/// Account application service
pub struct AccountService {
    actors: Arc<dyn ActorRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    min_password_len: usize,
}

impl AccountService {
    pub fn new(
        actors: Arc<dyn ActorRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        min_password_len: usize,
    ) -> Self {
        Self {
            actors,
            event_publisher,
            min_password_len,
        }
    }

    pub async fn register_citizen(&self, command: RegisterCitizenCommand) -> CoreResult<Account> {
        let name = command.name.trim();
        if name.is_empty() {
            return Err(CoreError::InvalidInput("name is required".into()));
        }

        let actor = Actor::Citizen { id: ActorId::new() };
        let account = self
            .open_account(actor, name, &command.email, &command.phone, &command.password)
            .await?;

        publish_committed(
            self.event_publisher.as_ref(),
            vec![DomainEvent::Account(AccountEvent::CitizenRegistered { actor_id: account.id() })],
        )
        .await;

        Ok(account)
    }

    /// Provision an administrator for one department. Super admins only.
    pub async fn register_department_admin(
        &self,
        actor: &Actor,
        command: RegisterAdminCommand,
    ) -> CoreResult<Account> {
        let Actor::SuperAdmin { id: registered_by } = *actor else {
            tracing::warn!(actor_id = %actor.id(), role = %actor.role(), "admin registration refused");
            return Err(CoreError::Unauthorized("only super admins register department admins".into()));
        };

        let department = command.department;
        if department == Department::Unassigned {
            return Err(CoreError::InvalidInput("unassigned complaints have no department admin".into()));
        }

        let name = match command.name.trim() {
            "" => format!("{} Admin", department.display_name()),
            name => name.to_string(),
        };

        let admin = Actor::DepartmentAdmin { id: ActorId::new(), department };
        let account = self
            .open_account(admin, &name, &command.email, &command.phone, &command.password)
            .await?;

        publish_committed(
            self.event_publisher.as_ref(),
            vec![DomainEvent::Account(AccountEvent::AdminRegistered {
                actor_id: account.id(),
                department,
                registered_by,
            })],
        )
        .await;

        Ok(account)
    }

    /// Create the configured super admin unless it already exists
    pub async fn seed_super_admin(&self, seed: &SuperAdminSeed) -> CoreResult<Account> {
        let email = Email::new(seed.email.as_str()).map_err(|e| CoreError::InvalidInput(e.to_string()))?;

        if let Some(existing) = self.actors.find_by_email(&email).await? {
            return match existing.actor() {
                Actor::SuperAdmin { .. } => {
                    tracing::debug!(email = %email, "super admin already present");
                    Ok(existing)
                }
                _ => Err(CoreError::DuplicateAccount(email.to_string())),
            };
        }

        let account = self
            .open_account(
                Actor::SuperAdmin { id: ActorId::new() },
                &seed.name,
                &seed.email,
                &seed.phone,
                &seed.password,
            )
            .await?;
        tracing::info!(actor_id = %account.id(), email = %email, "super admin seeded");
        Ok(account)
    }

    pub async fn profile(&self, actor: &Actor) -> CoreResult<Account> {
        self.actors
            .find_by_id(&actor.id())
            .await?
            .ok_or(CoreError::Unauthenticated)
    }

    async fn open_account(
        &self,
        actor: Actor,
        name: &str,
        email: &str,
        phone: &str,
        password: &str,
    ) -> CoreResult<Account> {
        let email = Email::new(email).map_err(|e| CoreError::InvalidInput(e.to_string()))?;

        if password.chars().count() < self.min_password_len {
            return Err(CoreError::InvalidInput(format!(
                "password must be at least {} characters",
                self.min_password_len
            )));
        }

        if self.actors.find_by_email(&email).await?.is_some() {
            return Err(CoreError::DuplicateAccount(email.to_string()));
        }

        let password = PasswordHash::create(password)?;
        let account = Account::create(actor, name.trim(), email, phone.trim(), password);
        // insert re-checks the email under the write lock
        self.actors.insert(&account).await?;

        tracing::info!(actor_id = %account.id(), role = %actor.role(), "account created");
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::infrastructure::{InMemoryActorRepository, TracingEventPublisher};

    fn service() -> AccountService {
        AccountService::new(
            Arc::new(InMemoryActorRepository::new()),
            Arc::new(TracingEventPublisher),
            8,
        )
    }

    fn citizen_command(email: &str) -> RegisterCitizenCommand {
        RegisterCitizenCommand {
            name: "Asha".into(),
            email: email.into(),
            phone: "555-0100".into(),
            password: "correct horse".into(),
        }
    }

    fn admin_command(email: &str, department: Department) -> RegisterAdminCommand {
        RegisterAdminCommand {
            name: String::new(),
            email: email.into(),
            phone: String::new(),
            password: "longpassword".into(),
            department,
        }
    }

    #[tokio::test]
    async fn test_register_citizen() {
        let service = service();
        let account = service.register_citizen(citizen_command("Asha@Example.com")).await.unwrap();
        assert_eq!(account.actor().role(), Role::Citizen);
        assert_eq!(account.email().as_str(), "asha@example.com");
        assert!(account.verify_password("correct horse"));

        let profile = service.profile(account.actor()).await.unwrap();
        assert_eq!(profile.name(), "Asha");
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_bad_input() {
        let service = service();
        service.register_citizen(citizen_command("asha@example.com")).await.unwrap();

        assert!(matches!(
            service.register_citizen(citizen_command("ASHA@example.com")).await,
            Err(CoreError::DuplicateAccount(_))
        ));
        assert!(matches!(
            service.register_citizen(citizen_command("not-an-email")).await,
            Err(CoreError::InvalidInput(_))
        ));

        let mut short = citizen_command("short@example.com");
        short.password = "short".into();
        assert!(matches!(service.register_citizen(short).await, Err(CoreError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_only_super_admin_registers_admins() {
        let service = service();
        let root = Actor::SuperAdmin { id: ActorId::new() };

        let admin = service
            .register_department_admin(&root, admin_command("roads@city.gov", Department::Roads))
            .await
            .unwrap();
        assert_eq!(admin.name(), "Roads Admin");
        assert_eq!(admin.actor().department(), Some(Department::Roads));

        let water = service
            .register_department_admin(&root, admin_command("water@city.gov", Department::Water))
            .await
            .unwrap();
        assert_eq!(water.name(), "Water Supply Admin");

        assert!(matches!(
            service
                .register_department_admin(admin.actor(), admin_command("x@city.gov", Department::Roads))
                .await,
            Err(CoreError::Unauthorized(_))
        ));
        assert!(matches!(
            service
                .register_department_admin(&root, admin_command("roads@city.gov", Department::Waste))
                .await,
            Err(CoreError::DuplicateAccount(_))
        ));
        assert!(matches!(
            service
                .register_department_admin(&root, admin_command("none@city.gov", Department::Unassigned))
                .await,
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_seed_super_admin_is_idempotent() {
        let service = service();
        let seed = SuperAdminSeed {
            name: "Root".into(),
            email: "root@city.gov".into(),
            phone: String::new(),
            password: "rootpassword".into(),
        };

        let first = service.seed_super_admin(&seed).await.unwrap();
        let second = service.seed_super_admin(&seed).await.unwrap();
        assert_eq!(first.id(), second.id());
        assert_eq!(first.actor().role(), Role::SuperAdmin);
    }

    #[tokio::test]
    async fn test_seed_does_not_take_over_existing_account() {
        let service = service();
        service.register_citizen(citizen_command("root@city.gov")).await.unwrap();
        let seed = SuperAdminSeed {
            name: "Root".into(),
            email: "root@city.gov".into(),
            phone: String::new(),
            password: "rootpassword".into(),
        };
        assert!(matches!(service.seed_super_admin(&seed).await, Err(CoreError::DuplicateAccount(_))));
    }
}
