use shared::{
    CreatePaymentRequest, Payment as SharedPayment, PaymentListResponse, UpdatePaymentRequest,
};

use super::timestamp_to_dto;
use crate::domain::commands::payments::{
    CreatePaymentCommand, PaymentListResult, UpdatePaymentCommand,
};
use crate::domain::models::payment::Payment as DomainPayment;

pub struct PaymentMapper;

impl PaymentMapper {
    pub fn to_dto(domain: DomainPayment) -> SharedPayment {
        SharedPayment {
            id: domain.id.to_string(),
            payer_id: domain.payer_id.to_string(),
            receiver_id: domain.receiver_id.to_string(),
            amount: domain.amount,
            remark: domain.remark,
            created_at: timestamp_to_dto(&domain.created_at),
            is_deleted: domain.is_deleted,
            deleted_at: domain.deleted_at.as_ref().map(timestamp_to_dto),
        }
    }

    pub fn to_create_command(dto: CreatePaymentRequest) -> CreatePaymentCommand {
        CreatePaymentCommand {
            payer_id: dto.payer_id,
            receiver_id: dto.receiver_id,
            amount: dto.amount,
            remark: dto.remark,
        }
    }

    pub fn to_update_command(path_id: String, dto: UpdatePaymentRequest) -> UpdatePaymentCommand {
        UpdatePaymentCommand {
            path_id,
            body_id: dto.id,
            payer_id: dto.payer_id,
            receiver_id: dto.receiver_id,
            amount: dto.amount,
            remark: dto.remark,
        }
    }

    pub fn to_list_response(result: PaymentListResult) -> PaymentListResponse {
        PaymentListResponse {
            payments: result.payments.into_iter().map(Self::to_dto).collect(),
            page: result.page,
            limit: result.limit,
            has_more: result.has_more,
        }
    }
}
