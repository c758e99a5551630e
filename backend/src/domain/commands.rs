//! Domain-level command and query types.
//!
//! Services take these instead of the public DTOs from `shared`; the REST
//! layer maps between the two.

pub mod users {
    use crate::domain::models::user::User;

    #[derive(Debug, Clone)]
    pub struct CreateUserCommand {
        pub name: String,
        pub email: Option<String>,
    }

    /// Fields left as `None` keep their current value
    #[derive(Debug, Clone, Default)]
    pub struct UpdateUserCommand {
        pub user_id: String,
        pub name: Option<String>,
        pub email: Option<String>,
    }

    /// How a delete request was carried out
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum UserRemoval {
        /// Row removed
        Deleted,
        /// Still referenced by history, so only deactivated
        Deactivated,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteUserResult {
        pub user: User,
        pub removal: UserRemoval,
    }
}

pub mod transactions {
    use rust_decimal::Decimal;

    use crate::domain::models::transaction::Transaction;

    #[derive(Debug, Clone)]
    pub struct CreateTransactionCommand {
        pub payer_id: String,
        pub amount: Decimal,
        pub members: Vec<String>,
        pub remark: Option<String>,
    }

    /// Full replacement of a transaction's editable fields
    #[derive(Debug, Clone)]
    pub struct UpdateTransactionCommand {
        pub path_id: String,
        pub body_id: String,
        pub payer_id: String,
        pub amount: Decimal,
        pub members: Vec<String>,
        pub remark: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct TransactionListQuery {
        pub page: Option<u32>,
        pub limit: Option<u32>,
        pub payer_id: Option<String>,
        pub start_date: Option<String>,
        pub end_date: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct TransactionListResult {
        pub transactions: Vec<Transaction>,
        pub page: u32,
        pub limit: u32,
        pub has_more: bool,
    }
}

pub mod payments {
    use rust_decimal::Decimal;

    use crate::domain::models::payment::Payment;

    #[derive(Debug, Clone)]
    pub struct CreatePaymentCommand {
        pub payer_id: String,
        pub receiver_id: String,
        pub amount: Decimal,
        pub remark: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct UpdatePaymentCommand {
        pub path_id: String,
        pub body_id: String,
        pub payer_id: String,
        pub receiver_id: String,
        pub amount: Decimal,
        pub remark: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct PaymentListQuery {
        pub page: Option<u32>,
        pub limit: Option<u32>,
        pub payer_id: Option<String>,
        pub start_date: Option<String>,
        pub end_date: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct PaymentListResult {
        pub payments: Vec<Payment>,
        pub page: u32,
        pub limit: u32,
        pub has_more: bool,
    }
}

pub mod summary {
    #[derive(Debug, Clone, Default)]
    pub struct SummaryQuery {
        pub start_date: Option<String>,
        pub end_date: Option<String>,
    }
}
