use shared::{
    CreateTransactionRequest, Transaction as SharedTransaction, TransactionListRequest,
    TransactionListResponse, UpdateTransactionRequest,
};
use uuid::Uuid;

use super::timestamp_to_dto;
use crate::domain::commands::transactions::{
    CreateTransactionCommand, TransactionListQuery, TransactionListResult,
    UpdateTransactionCommand,
};
use crate::domain::models::transaction::Transaction as DomainTransaction;

pub struct TransactionMapper;

impl TransactionMapper {
    pub fn to_dto(domain: DomainTransaction) -> SharedTransaction {
        SharedTransaction {
            id: domain.id.to_string(),
            payer_id: domain.payer_id.to_string(),
            amount: domain.amount,
            members: domain.members.iter().map(Uuid::to_string).collect(),
            remark: domain.remark,
            created_at: timestamp_to_dto(&domain.created_at),
            is_deleted: domain.is_deleted,
            deleted_at: domain.deleted_at.as_ref().map(timestamp_to_dto),
        }
    }

    pub fn to_create_command(dto: CreateTransactionRequest) -> CreateTransactionCommand {
        CreateTransactionCommand {
            payer_id: dto.payer_id,
            amount: dto.amount,
            members: dto.members,
            remark: dto.remark,
        }
    }

    pub fn to_update_command(path_id: String, dto: UpdateTransactionRequest) -> UpdateTransactionCommand {
        UpdateTransactionCommand {
            path_id,
            body_id: dto.id,
            payer_id: dto.payer_id,
            amount: dto.amount,
            members: dto.members,
            remark: dto.remark,
        }
    }

    pub fn to_list_query(dto: TransactionListRequest) -> TransactionListQuery {
        TransactionListQuery {
            page: dto.page,
            limit: dto.limit,
            payer_id: dto.payer_id,
            start_date: dto.start_date,
            end_date: dto.end_date,
        }
    }

    pub fn to_list_response(result: TransactionListResult) -> TransactionListResponse {
        TransactionListResponse {
            transactions: result.transactions.into_iter().map(Self::to_dto).collect(),
            page: result.page,
            limit: result.limit,
            has_more: result.has_more,
        }
    }
}
