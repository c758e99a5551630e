pub mod payment_mapper;
pub mod summary_mapper;
pub mod transaction_mapper;
pub mod user_mapper;

pub use payment_mapper::PaymentMapper;
pub use summary_mapper::SummaryMapper;
pub use transaction_mapper::TransactionMapper;
pub use user_mapper::UserMapper;

use chrono::{DateTime, SecondsFormat, Utc};

/// Wire format for timestamps: RFC 3339, UTC, milliseconds
pub(crate) fn timestamp_to_dto(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
