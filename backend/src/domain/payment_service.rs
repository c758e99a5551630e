//! Settlement payments between users.
use chrono::{SubsecRound, Utc};
use shared::validation::{parse_id, validate_payment_input};
use shared::ValidationLimits;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::commands::payments::{
    CreatePaymentCommand, PaymentListQuery, PaymentListResult, UpdatePaymentCommand,
};
use super::date_range::DateRange;
use super::error::{DomainError, DomainResult};
use super::models::payment::Payment;
use super::pagination::PageSettings;
use super::validation::check_known_users;
use crate::storage::{Connection, ListFilter, PaymentStorage};

#[derive(Clone)]
pub struct PaymentService<C: Connection> {
    payment_repository: C::PaymentRepository,
    user_repository: C::UserRepository,
    limits: ValidationLimits,
    page_settings: PageSettings,
}

impl<C: Connection> PaymentService<C> {
    pub fn new(connection: Arc<C>, limits: ValidationLimits, page_settings: PageSettings) -> Self {
        Self {
            payment_repository: connection.create_payment_repository(),
            user_repository: connection.create_user_repository(),
            limits,
            page_settings,
        }
    }

    async fn check_parties(&self, payer_id: Uuid, receiver_id: Uuid, grandfathered: &[Uuid]) -> DomainResult<()> {
        let mut errors =
            check_known_users(&self.user_repository, "payer_id", &[payer_id], grandfathered).await?;
        errors.extend(
            check_known_users(&self.user_repository, "receiver_id", &[receiver_id], grandfathered)
                .await?,
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(errors))
        }
    }

    pub async fn create_payment(&self, command: CreatePaymentCommand) -> DomainResult<Payment> {
        info!(
            "Creating payment: {} -> {}, amount={}",
            command.payer_id, command.receiver_id, command.amount
        );

        let validated = validate_payment_input(
            &command.payer_id,
            &command.receiver_id,
            command.amount,
            command.remark.as_deref(),
            &self.limits,
        )
        .map_err(DomainError::Validation)?;
        self.check_parties(validated.payer_id, validated.receiver_id, &[])
            .await?;

        let payment = Payment {
            id: Uuid::new_v4(),
            payer_id: validated.payer_id,
            receiver_id: validated.receiver_id,
            amount: validated.amount,
            remark: validated.remark,
            created_at: Utc::now().trunc_subsecs(3),
            is_deleted: false,
            deleted_at: None,
        };

        self.payment_repository.store_payment(&payment).await?;
        info!("Created payment {}", payment.id);
        Ok(payment)
    }

    pub async fn get_payment(&self, payment_id: &str) -> DomainResult<Payment> {
        let id = parse_id(payment_id).map_err(|e| DomainError::invalid("id", e))?;

        self.payment_repository
            .get_payment(id)
            .await?
            .ok_or_else(|| {
                warn!("Payment not found: {}", payment_id);
                DomainError::not_found("Payment", payment_id)
            })
    }

    pub async fn list_payments(&self, query: PaymentListQuery) -> DomainResult<PaymentListResult> {
        let page = self.page_settings.resolve(query.page, query.limit);
        let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())?;
        let payer_id = match query.payer_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_id(raw).map_err(|e| DomainError::invalid("payer_id", e))?),
        };

        let filter = ListFilter {
            payer_id,
            created_from: range.start(),
            created_before: range.end_exclusive(),
            include_deleted: false,
            limit: Some(page.fetch_limit()),
            offset: page.offset(),
        };
        let mut payments = self.payment_repository.list_payments(&filter).await?;

        let has_more = payments.len() > page.limit as usize;
        payments.truncate(page.limit as usize);

        Ok(PaymentListResult {
            payments,
            page: page.number,
            limit: page.limit,
            has_more,
        })
    }

    pub async fn update_payment(&self, command: UpdatePaymentCommand) -> DomainResult<Payment> {
        info!("Updating payment: {}", command.path_id);

        if command.path_id != command.body_id {
            return Err(DomainError::IdMismatch {
                path_id: command.path_id,
                body_id: command.body_id,
            });
        }

        let mut payment = self.get_payment(&command.path_id).await?;
        if payment.is_deleted {
            return Err(DomainError::AlreadyDeleted {
                entity: "Payment",
                id: command.path_id,
            });
        }

        let validated = validate_payment_input(
            &command.payer_id,
            &command.receiver_id,
            command.amount,
            command.remark.as_deref(),
            &self.limits,
        )
        .map_err(DomainError::Validation)?;
        self.check_parties(
            validated.payer_id,
            validated.receiver_id,
            &[payment.payer_id, payment.receiver_id],
        )
        .await?;

        payment.payer_id = validated.payer_id;
        payment.receiver_id = validated.receiver_id;
        payment.amount = validated.amount;
        payment.remark = validated.remark;

        if !self.payment_repository.update_payment(&payment).await? {
            return Err(DomainError::not_found("Payment", payment.id));
        }
        Ok(payment)
    }

    pub async fn soft_delete_payment(&self, payment_id: &str) -> DomainResult<Uuid> {
        info!("Soft deleting payment: {}", payment_id);

        let payment = self.get_payment(payment_id).await?;
        let deleted = self
            .payment_repository
            .soft_delete_payment(payment.id, Utc::now().trunc_subsecs(3))
            .await?;

        if !deleted {
            return Err(DomainError::AlreadyDeleted {
                entity: "Payment",
                id: payment_id.to_string(),
            });
        }
        Ok(payment.id)
    }

    pub async fn delete_payment(&self, payment_id: &str) -> DomainResult<Uuid> {
        info!("Deleting payment: {}", payment_id);

        let payment = self.get_payment(payment_id).await?;
        self.payment_repository.delete_payment(payment.id).await?;
        Ok(payment.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::users::CreateUserCommand;
    use crate::domain::user_service::UserService;
    use crate::storage::DbConnection;
    use rust_decimal_macros::dec;
    use shared::ValidationError;

    async fn create_test_service() -> (PaymentService<DbConnection>, String, String) {
        let connection = Arc::new(DbConnection::init_test().await.unwrap());
        let users = UserService::new(connection.clone(), ValidationLimits::default());
        let mut ids = Vec::new();
        for name in ["Priya", "Arun"] {
            let user = users
                .create_user(CreateUserCommand {
                    name: name.to_string(),
                    email: None,
                })
                .await
                .unwrap();
            ids.push(user.id.to_string());
        }
        let service =
            PaymentService::new(connection, ValidationLimits::default(), PageSettings::default());
        (service, ids[0].clone(), ids[1].clone())
    }

    fn create(payer: &str, receiver: &str, amount: rust_decimal::Decimal) -> CreatePaymentCommand {
        CreatePaymentCommand {
            payer_id: payer.to_string(),
            receiver_id: receiver.to_string(),
            amount,
            remark: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_payments() {
        let (service, p, a) = create_test_service().await;

        let payment = service.create_payment(create(&a, &p, dec!(33.33))).await.unwrap();
        assert_eq!(payment.amount, dec!(33.33));

        let listed = service.list_payments(PaymentListQuery::default()).await.unwrap();
        assert_eq!(listed.payments, vec![payment.clone()]);
        assert!(!listed.has_more);
        assert_eq!(service.get_payment(&payment.id.to_string()).await.unwrap(), payment);
    }

    #[tokio::test]
    async fn test_self_payment_rejected() {
        let (service, p, _) = create_test_service().await;

        match service.create_payment(create(&p, &p, dec!(5))).await {
            Err(DomainError::Validation(errors)) => {
                assert_eq!(errors[0].error, ValidationError::SelfPayment);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_receiver_rejected() {
        let (service, p, _) = create_test_service().await;
        let ghost = Uuid::new_v4().to_string();

        match service.create_payment(create(&p, &ghost, dec!(5))).await {
            Err(DomainError::Validation(errors)) => {
                assert_eq!(errors[0].field, "receiver_id");
                assert_eq!(errors[0].error, ValidationError::UnknownUser(ghost));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_and_soft_delete_payment() {
        let (service, p, a) = create_test_service().await;
        let payment = service.create_payment(create(&a, &p, dec!(10))).await.unwrap();
        let id = payment.id.to_string();

        let updated = service
            .update_payment(UpdatePaymentCommand {
                path_id: id.clone(),
                body_id: id.clone(),
                payer_id: p.clone(),
                receiver_id: a.clone(),
                amount: dec!(12),
                remark: Some("refund".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(updated.payer_id.to_string(), p);
        assert_eq!(updated.amount, dec!(12));

        service.soft_delete_payment(&id).await.unwrap();
        assert!(matches!(
            service.soft_delete_payment(&id).await,
            Err(DomainError::AlreadyDeleted { .. })
        ));
        assert!(service
            .list_payments(PaymentListQuery::default())
            .await
            .unwrap()
            .payments
            .is_empty());

        service.delete_payment(&id).await.unwrap();
        assert!(matches!(
            service.get_payment(&id).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
