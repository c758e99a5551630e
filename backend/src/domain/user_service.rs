//! User management.
use chrono::{SubsecRound, Utc};
use shared::validation::{normalize_email, normalize_name, parse_id};
use shared::{FieldError, ValidationLimits};
use std::sync::Arc;
use tracing::{info, warn};

use super::commands::users::{
    CreateUserCommand, DeleteUserResult, UpdateUserCommand, UserRemoval,
};
use super::error::{DomainError, DomainResult};
use super::models::user::User;
use crate::storage::{Connection, UserStorage};

#[derive(Clone)]
pub struct UserService<C: Connection> {
    user_repository: C::UserRepository,
    limits: ValidationLimits,
}

impl<C: Connection> UserService<C> {
    pub fn new(connection: Arc<C>, limits: ValidationLimits) -> Self {
        Self {
            user_repository: connection.create_user_repository(),
            limits,
        }
    }

    pub async fn create_user(&self, command: CreateUserCommand) -> DomainResult<User> {
        info!("Creating user: name={}", command.name);

        let mut errors = Vec::new();
        let name = normalize_name(&command.name, &self.limits)
            .map_err(|e| errors.push(FieldError::new("name", e)))
            .ok();
        let email = normalize_email(command.email.as_deref())
            .map_err(|e| errors.push(FieldError::new("email", e)))
            .ok()
            .flatten();

        let Some(name) = name.filter(|_| errors.is_empty()) else {
            return Err(DomainError::Validation(errors));
        };

        let user = User::new(name, email, Utc::now().trunc_subsecs(3));
        self.user_repository.store_user(&user).await?;

        info!("Created user {} with ID {}", user.username, user.id);
        Ok(user)
    }

    /// Fetch a user, including deactivated ones
    pub async fn get_user(&self, user_id: &str) -> DomainResult<User> {
        let id = parse_id(user_id).map_err(|e| DomainError::invalid("id", e))?;

        match self.user_repository.get_user(id).await? {
            Some(user) => Ok(user),
            None => {
                warn!("User not found: {}", user_id);
                Err(DomainError::not_found("User", user_id))
            }
        }
    }

    /// Active users, ordered by name
    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        let users = self.user_repository.list_users(false).await?;
        info!("Found {} users", users.len());
        Ok(users)
    }

    pub async fn update_user(&self, command: UpdateUserCommand) -> DomainResult<User> {
        info!("Updating user: {}", command.user_id);

        let mut user = self.get_user(&command.user_id).await?;
        let mut errors = Vec::new();

        if let Some(name) = command.name {
            match normalize_name(&name, &self.limits) {
                Ok(name) => user.username = name,
                Err(e) => errors.push(FieldError::new("name", e)),
            }
        }
        if let Some(email) = command.email {
            match normalize_email(Some(&email)) {
                Ok(email) => user.email = email,
                Err(e) => errors.push(FieldError::new("email", e)),
            }
        }

        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        if !self.user_repository.update_user(&user).await? {
            return Err(DomainError::not_found("User", user.id));
        }
        Ok(user)
    }

    /// Remove a user. Users still referenced by a transaction or payment are
    /// deactivated instead, so historical balances keep resolving.
    pub async fn delete_user(&self, user_id: &str) -> DomainResult<DeleteUserResult> {
        info!("Deleting user: {}", user_id);

        let mut user = self.get_user(user_id).await?;
        if !user.is_active {
            return Err(DomainError::AlreadyDeleted {
                entity: "User",
                id: user_id.to_string(),
            });
        }

        let removal = if self.user_repository.is_user_referenced(user.id).await? {
            user.is_active = false;
            self.user_repository.update_user(&user).await?;
            UserRemoval::Deactivated
        } else {
            self.user_repository.delete_user(user.id).await?;
            UserRemoval::Deleted
        };

        info!("User {} removal: {:?}", user.id, removal);
        Ok(DeleteUserResult { user, removal })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DbConnection, TransactionStorage};
    use crate::domain::models::transaction::Transaction;
    use rust_decimal_macros::dec;
    use shared::ValidationError;

    async fn create_test_service() -> (UserService<DbConnection>, Arc<DbConnection>) {
        let connection = Arc::new(DbConnection::init_test().await.unwrap());
        let service = UserService::new(connection.clone(), ValidationLimits::default());
        (service, connection)
    }

    fn create(name: &str) -> CreateUserCommand {
        CreateUserCommand {
            name: name.to_string(),
            email: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let (service, _) = create_test_service().await;

        let user = service
            .create_user(CreateUserCommand {
                name: "  Asha ".to_string(),
                email: Some("asha@example.com".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(user.username, "Asha");
        assert!(user.is_active);
        let loaded = service.get_user(&user.id.to_string()).await.unwrap();
        assert_eq!(loaded, user);
    }

    #[tokio::test]
    async fn test_create_user_reports_all_field_errors() {
        let (service, _) = create_test_service().await;

        let result = service
            .create_user(CreateUserCommand {
                name: "A".to_string(),
                email: Some("nope".to_string()),
            })
            .await;

        match result {
            Err(DomainError::Validation(errors)) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].error, ValidationError::NameTooShort(2));
                assert_eq!(errors[1].error, ValidationError::InvalidEmail);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_user_errors() {
        let (service, _) = create_test_service().await;

        assert!(matches!(
            service.get_user("not-a-uuid").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.get_user(&uuid::Uuid::new_v4().to_string()).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_user_keeps_unspecified_fields() {
        let (service, _) = create_test_service().await;
        let user = service
            .create_user(CreateUserCommand {
                name: "Asha".to_string(),
                email: Some("asha@example.com".to_string()),
            })
            .await
            .unwrap();

        let updated = service
            .update_user(UpdateUserCommand {
                user_id: user.id.to_string(),
                name: Some("Asha K".to_string()),
                email: None,
            })
            .await
            .unwrap();

        assert_eq!(updated.username, "Asha K");
        assert_eq!(updated.email.as_deref(), Some("asha@example.com"));
        assert_eq!(updated.id, user.id);
    }

    #[tokio::test]
    async fn test_delete_unreferenced_user_removes_row() {
        let (service, _) = create_test_service().await;
        let user = service.create_user(create("Asha")).await.unwrap();

        let result = service.delete_user(&user.id.to_string()).await.unwrap();

        assert_eq!(result.removal, UserRemoval::Deleted);
        assert!(matches!(
            service.get_user(&user.id.to_string()).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_referenced_user_deactivates() {
        let (service, connection) = create_test_service().await;
        let payer = service.create_user(create("Asha")).await.unwrap();
        let member = service.create_user(create("Bela")).await.unwrap();
        connection
            .create_transaction_repository()
            .store_transaction(&Transaction {
                id: uuid::Uuid::new_v4(),
                payer_id: payer.id,
                amount: dec!(10),
                members: vec![member.id],
                remark: None,
                created_at: Utc::now(),
                is_deleted: false,
                deleted_at: None,
            })
            .await
            .unwrap();

        let result = service.delete_user(&member.id.to_string()).await.unwrap();

        assert_eq!(result.removal, UserRemoval::Deactivated);
        let listed: Vec<_> = service.list_users().await.unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(listed, vec![payer.id]);
        assert!(!service.get_user(&member.id.to_string()).await.unwrap().is_active);
        assert!(matches!(
            service.delete_user(&member.id.to_string()).await,
            Err(DomainError::AlreadyDeleted { .. })
        ));
    }
}
